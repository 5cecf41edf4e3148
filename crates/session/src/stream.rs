//! Events of a diagram generation stream.
//!
//! The backend sends named events (`meta`, `chunk`, `done`, `error`) whose
//! data is a JSON object. Each event carries an id `<trace_id>:<n>` where `n`
//! counts up from 1 within one generation.

use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, bail, Context as _};
use serde::{Deserialize, Serialize};

use crate::error_code::{ErrorCategory, ErrorCode};

/// First event of a stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamMeta {
    pub trace_id: String,
    pub model: String,
    pub diagram_type: String,
    pub language: String,
}

/// Generation statistics attached to the final result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationMeta {
    pub model: String,
    pub latency_ms: u64,
    pub attempts: u32,
    #[serde(default)]
    pub trace_id: Option<String>,
}

/// The final result of a generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamDone {
    pub mermaid_code: String,
    pub diagram_type: String,
    pub language: String,
    #[serde(default)]
    pub errors: Vec<String>,
    pub meta: GenerationMeta,
}

/// A structured failure reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamError {
    pub code: ErrorCode,
    pub category: ErrorCategory,
    pub message: String,
    #[serde(default)]
    pub details: Option<Vec<String>>,
    pub trace_id: String,
    pub retryable: bool,
}

impl StreamError {
    /// An error raised on this side of the stream rather than by the backend.
    pub fn local(code: ErrorCode, message: impl Into<String>, trace_id: impl Into<String>) -> Self {
        Self {
            code,
            category: code.category(),
            message: message.into(),
            details: None,
            trace_id: trace_id.into(),
            retryable: code.is_retryable(),
        }
    }

    /// Whether the session should try to reconnect.
    pub fn should_reconnect(&self) -> bool {
        self.retryable && self.category == ErrorCategory::Network
    }
}

impl fmt::Display for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

#[derive(Debug, Deserialize)]
struct ChunkData {
    text: String,
}

/// A decoded stream event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    Meta(StreamMeta),
    /// The full diagram text so far. Each chunk replaces the previous one.
    Chunk { text: String },
    Done(StreamDone),
    Error(StreamError),
}

impl StreamEvent {
    /// Decode an event from its name and JSON data.
    pub fn decode(event: &str, data: &str) -> anyhow::Result<Self> {
        let decoded = match event {
            "meta" => Self::Meta(parse(event, data)?),
            "chunk" => {
                let chunk: ChunkData = parse(event, data)?;
                Self::Chunk { text: chunk.text }
            }
            "done" => Self::Done(parse(event, data)?),
            "error" => Self::Error(parse(event, data)?),
            other => bail!("Unknown stream event {other:?}"),
        };
        Ok(decoded)
    }

    /// The event name on the wire.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Meta(_) => "meta",
            Self::Chunk { .. } => "chunk",
            Self::Done(_) => "done",
            Self::Error(_) => "error",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done(_) | Self::Error(_))
    }
}

fn parse<T: for<'de> Deserialize<'de>>(event: &str, data: &str) -> anyhow::Result<T> {
    serde_json::from_str(data).with_context(|| format!("Malformed {event} event data"))
}

/// Identifies an event within a stream: `<trace_id>:<sequence>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EventId {
    pub trace_id: String,
    pub sequence: u64,
}

impl FromStr for EventId {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (trace_id, sequence) = s
            .rsplit_once(':')
            .ok_or_else(|| anyhow!("Event id {s:?} has no sequence number"))?;
        if trace_id.is_empty() {
            bail!("Event id {s:?} has no trace id");
        }
        let sequence = sequence
            .parse()
            .with_context(|| format!("Invalid sequence number in event id {s:?}"))?;
        Ok(Self {
            trace_id: trace_id.to_owned(),
            sequence,
        })
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.trace_id, self.sequence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_decode_meta() {
        let event = StreamEvent::decode(
            "meta",
            r#"{"trace_id": "t1", "model": "mock", "diagram_type": "flowchart", "language": "en"}"#,
        )
        .unwrap();
        assert_eq!(
            event,
            StreamEvent::Meta(StreamMeta {
                trace_id: "t1".into(),
                model: "mock".into(),
                diagram_type: "flowchart".into(),
                language: "en".into(),
            })
        );
        assert!(!event.is_terminal());
    }

    #[test]
    fn test_decode_chunk() {
        let event = StreamEvent::decode("chunk", r#"{"text": "graph TD\nA-->B"}"#).unwrap();
        assert_eq!(
            event,
            StreamEvent::Chunk {
                text: "graph TD\nA-->B".into()
            }
        );
    }

    #[test]
    fn test_decode_done_without_optional_fields() {
        let event = StreamEvent::decode(
            "done",
            r#"{
                "mermaid_code": "graph TD\nA-->B",
                "diagram_type": "flowchart",
                "language": "en",
                "meta": {"model": "mock", "latency_ms": 12, "attempts": 1}
            }"#,
        )
        .unwrap();
        let StreamEvent::Done(done) = event else {
            panic!("expected done, got {event:?}");
        };
        assert!(done.errors.is_empty());
        assert_eq!(done.meta.trace_id, None);
        assert_eq!(done.meta.attempts, 1);
    }

    #[test]
    fn test_decode_error() {
        let event = StreamEvent::decode(
            "error",
            r#"{
                "code": "NETWORK_TIMEOUT",
                "category": "network",
                "message": "Connection timed out",
                "details": null,
                "trace_id": "t1",
                "retryable": true
            }"#,
        )
        .unwrap();
        let StreamEvent::Error(error) = event else {
            panic!("expected error, got {event:?}");
        };
        assert_eq!(error.code, ErrorCode::NetworkTimeout);
        assert!(error.should_reconnect());
        assert_eq!(error.to_string(), "NETWORK_TIMEOUT: Connection timed out");
    }

    #[test]
    fn test_retryable_server_error_does_not_reconnect() {
        let error = StreamError::local(ErrorCode::ServerInternalError, "boom", "t");
        assert!(error.retryable);
        assert!(!error.should_reconnect());
    }

    #[test]
    fn test_decode_rejects_unknown_event_and_bad_data() {
        assert!(StreamEvent::decode("ping", "{}").is_err());

        let err = StreamEvent::decode("chunk", "{").unwrap_err();
        assert_eq!(err.to_string(), "Malformed chunk event data");
    }

    #[test]
    fn test_event_id() {
        let id: EventId = "3f2a-77:12".parse().unwrap();
        assert_eq!(id.trace_id, "3f2a-77");
        assert_eq!(id.sequence, 12);
        assert_eq!(id.to_string(), "3f2a-77:12");

        assert!("no-sequence".parse::<EventId>().is_err());
        assert!(":4".parse::<EventId>().is_err());
        assert!("t:x".parse::<EventId>().is_err());
    }
}
