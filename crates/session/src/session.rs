//! One diagram generation session.
//!
//! [`DiagramSession`] sits between the generation stream and the viewer
//! store: it tracks the connection, keeps the text received so far, hands the
//! final text to the render pipeline and turns failures into the store's
//! error state. The last request is kept so a failed generation can be
//! retried without re-entering it.

use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context as _};
use diagram_viewport::ViewerStore;
use log::{debug, info, warn};

use crate::connection::{ConnectionState, ConnectionStatus};
use crate::error_code::ErrorCode;
use crate::render::{DiagramRenderer, RenderInit, RenderPipeline};
use crate::request::{DiagramRequest, Language};
use crate::stream::{StreamDone, StreamError, StreamEvent, StreamMeta};

pub struct DiagramSession {
    store: Rc<ViewerStore>,
    pipeline: RenderPipeline,
    connection: ConnectionState,
    text: String,
    meta: Option<StreamMeta>,
    result: Option<StreamDone>,
    error: Option<StreamError>,
    request: Option<DiagramRequest>,
}

impl DiagramSession {
    pub fn new(
        store: Rc<ViewerStore>,
        renderer: Arc<dyn DiagramRenderer>,
        init: Arc<RenderInit>,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            store,
            pipeline: RenderPipeline::new(renderer, init)?,
            connection: ConnectionState::new(),
            text: String::new(),
            meta: None,
            result: None,
            error: None,
            request: None,
        })
    }

    pub fn store(&self) -> &Rc<ViewerStore> {
        &self.store
    }

    pub fn connection(&self) -> ConnectionState {
        self.connection
    }

    /// Diagram text received so far.
    pub fn displayed_text(&self) -> &str {
        &self.text
    }

    pub fn meta(&self) -> Option<&StreamMeta> {
        self.meta.as_ref()
    }

    pub fn result(&self) -> Option<&StreamDone> {
        self.result.as_ref()
    }

    pub fn last_error(&self) -> Option<&StreamError> {
        self.error.as_ref()
    }

    pub fn current_request(&self) -> Option<&DiagramRequest> {
        self.request.as_ref()
    }

    /// Whether the last generation failed with a retryable error.
    pub fn can_retry(&self) -> bool {
        self.request.is_some() && self.error.as_ref().is_some_and(|e| e.retryable)
    }

    /// Start a new generation. Anything still rendering from a previous one
    /// is superseded.
    pub fn begin(&mut self, request: DiagramRequest) -> anyhow::Result<()> {
        request.validate().context("Invalid diagram request")?;
        info!(
            "Starting generation (language: {:?}, type: {:?})",
            request.language_hint.normalized(),
            request.diagram_type_hint.normalized()
        );

        self.pipeline.cancel();
        self.text.clear();
        self.meta = None;
        self.result = None;
        self.error = None;
        self.request = Some(request);

        self.connection.connect();
        self.store.set_loading();
        Ok(())
    }

    /// Resend the last request.
    pub fn retry(&mut self) -> anyhow::Result<()> {
        let Some(request) = self.request.clone() else {
            bail!("No request to retry");
        };
        info!("Retrying generation");
        self.begin(request)
    }

    /// Apply one event from the generation stream.
    pub fn handle_event(&mut self, event: StreamEvent) {
        if !self.connection.status().is_active() {
            debug!("Ignoring {} event while disconnected", event.name());
            return;
        }
        if matches!(
            self.connection.status(),
            ConnectionStatus::Connecting | ConnectionStatus::Reconnecting
        ) && !matches!(event, StreamEvent::Error(_))
        {
            self.connection.connected();
        }

        match event {
            StreamEvent::Meta(meta) => {
                debug!("Generation {} using {}", meta.trace_id, meta.model);
                self.meta = Some(meta);
            }
            StreamEvent::Chunk { text } => {
                self.text = text;
            }
            StreamEvent::Done(done) => self.finish(done),
            StreamEvent::Error(error) => self.fail(error),
        }
    }

    /// Stop listening for events and drop any in-flight render.
    pub fn cancel(&mut self) {
        self.pipeline.cancel();
        self.connection.disconnect();
        if self.store.get_snapshot().render.is_loading() {
            self.store.reset_render_state();
        }
    }

    /// Apply finished renders to the store.
    pub fn poll_renders(&mut self) -> usize {
        self.pipeline.poll(&self.store)
    }

    /// Block until a render reaches the store or `timeout` elapses.
    pub fn wait_for_render(&mut self, timeout: Duration) -> bool {
        self.pipeline.wait(&self.store, timeout)
    }

    fn finish(&mut self, done: StreamDone) {
        self.connection.disconnect();
        self.text = done.mermaid_code.clone();
        if !done.errors.is_empty() {
            debug!("Generation finished with {} validation errors", done.errors.len());
        }

        if self.text.trim().is_empty() {
            let language = Language::from(done.language.clone());
            let trace_id = done.meta.trace_id.clone().unwrap_or_default();
            let error = StreamError::local(
                ErrorCode::GenerationEmpty,
                ErrorCode::GenerationEmpty.message(language),
                trace_id,
            );
            self.result = Some(done);
            self.fail(error);
            return;
        }

        info!(
            "Generation finished in {}ms after {} attempts",
            done.meta.latency_ms, done.meta.attempts
        );
        self.result = Some(done);
        self.pipeline.submit(&self.store, self.text.clone());
    }

    fn fail(&mut self, error: StreamError) {
        if error.should_reconnect() {
            self.connection.reconnect();
        } else {
            self.connection.disconnect();
        }
        warn!("Generation failed: {error} (trace {})", error.trace_id);

        self.pipeline.cancel();
        self.store.set_error(error.message.clone());
        self.error = Some(error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::GenerationMeta;

    struct EchoRenderer;

    impl DiagramRenderer for EchoRenderer {
        fn render(&self, definition: &str, _id: &str) -> anyhow::Result<String> {
            Ok(format!("<svg width=\"{}\" height=\"10\"/>", definition.len()))
        }
    }

    fn session() -> DiagramSession {
        DiagramSession::new(
            Rc::new(ViewerStore::default()),
            Arc::new(EchoRenderer),
            Arc::new(RenderInit::new()),
        )
        .unwrap()
    }

    fn done(code: &str) -> StreamEvent {
        StreamEvent::Done(StreamDone {
            mermaid_code: code.into(),
            diagram_type: "flowchart".into(),
            language: "ja".into(),
            errors: vec![],
            meta: GenerationMeta {
                model: "mock".into(),
                latency_ms: 5,
                attempts: 1,
                trace_id: Some("t".into()),
            },
        })
    }

    #[test]
    fn test_begin_rejects_empty_prompt() {
        let mut session = session();
        assert!(session.begin(DiagramRequest::new(" ")).is_err());
        assert_eq!(session.connection().status(), ConnectionStatus::Disconnected);
        assert!(session.store().get_snapshot().render.is_idle());
    }

    #[test]
    fn test_chunks_replace_text_and_connect() {
        let mut session = session();
        session.begin(DiagramRequest::new("flow")).unwrap();
        assert_eq!(session.connection().status(), ConnectionStatus::Connecting);

        session.handle_event(StreamEvent::Chunk { text: "graph".into() });
        session.handle_event(StreamEvent::Chunk { text: "graph TD".into() });
        assert_eq!(session.displayed_text(), "graph TD");
        assert_eq!(session.connection().status(), ConnectionStatus::Connected);
        assert!(session.store().get_snapshot().render.is_loading());
    }

    #[test]
    fn test_empty_result_is_generation_empty() {
        let mut session = session();
        session.begin(DiagramRequest::new("flow")).unwrap();
        session.handle_event(done("   "));

        let error = session.last_error().unwrap();
        assert_eq!(error.code, ErrorCode::GenerationEmpty);
        assert!(!session.can_retry());
        assert_eq!(
            session.store().get_snapshot().render.error_message(),
            Some("空の結果が返されました")
        );
        assert_eq!(session.connection().status(), ConnectionStatus::Disconnected);
    }

    #[test]
    fn test_events_after_cancel_are_ignored() {
        let mut session = session();
        session.begin(DiagramRequest::new("flow")).unwrap();
        session.cancel();
        assert!(session.store().get_snapshot().render.is_idle());

        session.handle_event(done("graph TD"));
        assert!(session.result().is_none());
        assert_eq!(session.poll_renders(), 0);
    }

    #[test]
    fn test_retry_without_request_fails() {
        assert!(session().retry().is_err());
    }
}
