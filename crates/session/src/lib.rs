//! Diagram generation session
//!
//! Connects a streamed diagram generation to the viewer store: decodes
//! stream events, tracks connection state, renders the final definition in
//! the background and reports failures with structured error codes.
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use diagram_session::prelude::*;
//! use diagram_viewport::ViewerStore;
//!
//! struct Fixed;
//!
//! impl DiagramRenderer for Fixed {
//!     fn render(&self, _definition: &str, _id: &str) -> anyhow::Result<String> {
//!         Ok(r#"<svg viewBox="0 0 640 480"/>"#.to_owned())
//!     }
//! }
//!
//! let store = Rc::new(ViewerStore::default());
//! let init = Arc::new(RenderInit::new());
//! let mut session = DiagramSession::new(store.clone(), Arc::new(Fixed), init)?;
//!
//! session.begin(DiagramRequest::new("login flow"))?;
//! session.handle_event(StreamEvent::decode(
//!     "done",
//!     r#"{"mermaid_code": "graph TD\nA-->B", "diagram_type": "flowchart", "language": "en",
//!         "errors": [], "meta": {"model": "mock", "latency_ms": 3, "attempts": 1}}"#,
//! )?);
//! assert!(session.wait_for_render(Duration::from_secs(5)));
//! assert!(store.get_snapshot().render.is_success());
//! # Ok::<(), anyhow::Error>(())
//! ```

mod connection;
mod error_code;
mod render;
mod request;
mod session;
mod stream;

pub use connection::*;
pub use error_code::*;
pub use render::*;
pub use request::*;
pub use session::*;
pub use stream::*;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::connection::{ConnectionState, ConnectionStatus};
    pub use crate::error_code::{ErrorCategory, ErrorCode};
    pub use crate::render::{DiagramRenderer, RenderInit};
    pub use crate::request::{DiagramRequest, DiagramType, Language};
    pub use crate::session::DiagramSession;
    pub use crate::stream::{StreamError, StreamEvent};
}
