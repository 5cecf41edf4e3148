//! Structured error codes shared with the generation backend.
//!
//! Every code belongs to a category, is either retryable or not, and has a
//! user-facing message in Japanese and English.

use std::fmt;

use derive_more::Display;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::request::Language;

/// Groups related error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum ErrorCategory {
    #[display(fmt = "network")]
    Network,

    #[display(fmt = "generation")]
    Generation,

    #[display(fmt = "validation")]
    Validation,

    #[display(fmt = "server")]
    Server,

    #[display(fmt = "rate_limit")]
    RateLimit,

    #[display(fmt = "autofix")]
    Autofix,
}

impl From<String> for ErrorCategory {
    /// Unknown categories are treated as server errors.
    fn from(name: String) -> Self {
        match name.as_str() {
            "network" => Self::Network,
            "generation" => Self::Generation,
            "validation" => Self::Validation,
            "rate_limit" => Self::RateLimit,
            "autofix" => Self::Autofix,
            _ => Self::Server,
        }
    }
}

/// A structured error code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", from = "String")]
pub enum ErrorCode {
    NetworkDisconnected,
    NetworkTimeout,
    GenerationFailed,
    GenerationTimeout,
    GenerationEmpty,
    ValidationSyntaxError,
    ValidationInvalidType,
    ValidationUnbalancedBrackets,
    ValidationEmptyNode,
    ServerInternalError,
    ServerDatabaseError,
    RateLimitExceeded,
    AutofixFailed,
    AutofixMaxAttempts,
}

impl ErrorCode {
    pub const ALL: [ErrorCode; 14] = [
        Self::NetworkDisconnected,
        Self::NetworkTimeout,
        Self::GenerationFailed,
        Self::GenerationTimeout,
        Self::GenerationEmpty,
        Self::ValidationSyntaxError,
        Self::ValidationInvalidType,
        Self::ValidationUnbalancedBrackets,
        Self::ValidationEmptyNode,
        Self::ServerInternalError,
        Self::ServerDatabaseError,
        Self::RateLimitExceeded,
        Self::AutofixFailed,
        Self::AutofixMaxAttempts,
    ];

    /// The wire name, e.g. `"NETWORK_TIMEOUT"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NetworkDisconnected => "NETWORK_DISCONNECTED",
            Self::NetworkTimeout => "NETWORK_TIMEOUT",
            Self::GenerationFailed => "GENERATION_FAILED",
            Self::GenerationTimeout => "GENERATION_TIMEOUT",
            Self::GenerationEmpty => "GENERATION_EMPTY",
            Self::ValidationSyntaxError => "VALIDATION_SYNTAX_ERROR",
            Self::ValidationInvalidType => "VALIDATION_INVALID_TYPE",
            Self::ValidationUnbalancedBrackets => "VALIDATION_UNBALANCED_BRACKETS",
            Self::ValidationEmptyNode => "VALIDATION_EMPTY_NODE",
            Self::ServerInternalError => "SERVER_INTERNAL_ERROR",
            Self::ServerDatabaseError => "SERVER_DATABASE_ERROR",
            Self::RateLimitExceeded => "RATE_LIMIT_EXCEEDED",
            Self::AutofixFailed => "AUTOFIX_FAILED",
            Self::AutofixMaxAttempts => "AUTOFIX_MAX_ATTEMPTS",
        }
    }

    /// Look up a code by its wire name.
    pub fn from_wire(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|code| code.as_str() == name)
    }

    /// The category, derived from the code's prefix.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NetworkDisconnected | Self::NetworkTimeout => ErrorCategory::Network,
            Self::GenerationFailed | Self::GenerationTimeout | Self::GenerationEmpty => {
                ErrorCategory::Generation
            }
            Self::ValidationSyntaxError
            | Self::ValidationInvalidType
            | Self::ValidationUnbalancedBrackets
            | Self::ValidationEmptyNode => ErrorCategory::Validation,
            Self::ServerInternalError | Self::ServerDatabaseError => ErrorCategory::Server,
            Self::RateLimitExceeded => ErrorCategory::RateLimit,
            Self::AutofixFailed | Self::AutofixMaxAttempts => ErrorCategory::Autofix,
        }
    }

    /// Whether re-sending the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::NetworkDisconnected
                | Self::NetworkTimeout
                | Self::GenerationTimeout
                | Self::RateLimitExceeded
                | Self::ServerInternalError
        )
    }

    /// User-facing message in the given language.
    pub fn message(&self, language: Language) -> &'static str {
        let (ja, en) = match self {
            Self::NetworkDisconnected => ("ネットワーク接続が切断されました", "Network connection lost"),
            Self::NetworkTimeout => ("接続がタイムアウトしました", "Connection timed out"),
            Self::GenerationFailed => ("図の生成に失敗しました", "Failed to generate diagram"),
            Self::GenerationTimeout => ("生成がタイムアウトしました", "Generation timed out"),
            Self::GenerationEmpty => ("空の結果が返されました", "Empty result returned"),
            Self::ValidationSyntaxError => (
                "Mermaid構文エラーが検出されました",
                "Mermaid syntax error detected",
            ),
            Self::ValidationInvalidType => ("無効な図タイプです", "Invalid diagram type"),
            Self::ValidationUnbalancedBrackets => {
                ("括弧の対応が不正です", "Unbalanced brackets in diagram")
            }
            Self::ValidationEmptyNode => {
                ("空のノードラベルが検出されました", "Empty node label detected")
            }
            Self::ServerInternalError => ("サーバー内部エラーが発生しました", "Internal server error"),
            Self::ServerDatabaseError => ("データベースエラーが発生しました", "Database error"),
            Self::RateLimitExceeded => (
                "リクエスト制限を超過しました。しばらく待ってから再試行してください",
                "Rate limit exceeded. Please wait and try again",
            ),
            Self::AutofixFailed => ("自動修正に失敗しました", "Autofix failed"),
            Self::AutofixMaxAttempts => ("最大修正回数に達しました", "Maximum fix attempts reached"),
        };

        match language {
            Language::Ja => ja,
            Language::En => en,
        }
    }
}

impl From<String> for ErrorCode {
    /// Codes this client does not know are treated as internal server errors.
    fn from(name: String) -> Self {
        Self::from_wire(&name).unwrap_or_else(|| {
            warn!("Unknown error code {name:?}, treating as SERVER_INTERNAL_ERROR");
            Self::ServerInternalError
        })
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
