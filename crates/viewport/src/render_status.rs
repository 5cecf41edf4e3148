//! Lifecycle of a diagram render.
//!
//! `Idle -> Loading -> Success | Error`, and `reset` back to `Idle`. Every
//! transition is unconditional: a new request may start from any state and
//! supersedes whatever was there before. There is no terminal state.

use derive_more::Display;

use crate::bbox::NaturalDimensions;

/// The state of the current diagram render.
///
/// Two statuses are equal when they are the same variant with equal payloads.
#[derive(Clone, Debug, Default, PartialEq, Display)]
pub enum RenderStatus {
    /// Nothing requested yet.
    #[default]
    #[display(fmt = "idle")]
    Idle,

    /// A render is in flight.
    #[display(fmt = "loading")]
    Loading,

    /// The graphic was produced.
    #[display(fmt = "success")]
    Success {
        svg_content: String,
        dimensions: NaturalDimensions,
    },

    /// Rendering failed with a human-readable message.
    #[display(fmt = "error")]
    Error { message: String },
}

impl RenderStatus {
    pub fn idle() -> Self {
        Self::Idle
    }

    pub fn loading() -> Self {
        Self::Loading
    }

    pub fn success(svg_content: impl Into<String>, dimensions: NaturalDimensions) -> Self {
        Self::Success {
            svg_content: svg_content.into(),
            dimensions,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    /// Back to idle, whatever the current state.
    pub fn reset(&self) -> Self {
        Self::Idle
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    /// The rendered markup, only while in `Success`.
    pub fn svg_content(&self) -> Option<&str> {
        match self {
            Self::Success { svg_content, .. } => Some(svg_content),
            _ => None,
        }
    }

    /// The graphic's natural dimensions, only while in `Success`.
    pub fn dimensions(&self) -> Option<NaturalDimensions> {
        match self {
            Self::Success { dimensions, .. } => Some(*dimensions),
            _ => None,
        }
    }

    /// The failure message, only while in `Error`.
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Error { message } => Some(message),
            _ => None,
        }
    }
}
