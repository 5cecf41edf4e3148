//! Background diagram rendering.
//!
//! Definitions are rendered on a worker thread. Completions come back over a
//! channel and are applied to the store when the UI thread polls. Every
//! request captures a cancellation flag; submitting a newer request or
//! calling [`RenderPipeline::cancel`] sets it, and a completion whose flag is
//! set is dropped instead of reaching the store.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context as _};
use diagram_viewport::{parse_svg_dimensions, ViewerStore};
use log::{debug, info, trace, warn};

/// Turns a diagram definition into SVG markup.
pub trait DiagramRenderer: Send + Sync {
    /// One-time setup. Called at most once per [`RenderInit`].
    fn initialize(&self) -> anyhow::Result<()> {
        Ok(())
    }

    /// Render `definition`. `id` is unique per request and may be used as
    /// the id of the produced `<svg>` element.
    fn render(&self, definition: &str, id: &str) -> anyhow::Result<String>;
}

/// Records whether the renderer has been initialized.
///
/// Share one gate between pipelines that share a renderer so initialization
/// runs once. A failed initialization is remembered and reported for every
/// later render.
#[derive(Debug, Default)]
pub struct RenderInit {
    outcome: OnceLock<Result<(), String>>,
}

impl RenderInit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_initialized(&self) -> bool {
        matches!(self.outcome.get(), Some(Ok(())))
    }

    /// Initialize `renderer` unless this gate already did.
    pub fn ensure(&self, renderer: &dyn DiagramRenderer) -> anyhow::Result<()> {
        let outcome = self.outcome.get_or_init(|| {
            info!("Initializing diagram renderer");
            renderer.initialize().map_err(|e| format!("{e:#}"))
        });
        outcome
            .clone()
            .map_err(|e| anyhow!("Renderer initialization failed: {e}"))
    }
}

struct RenderJob {
    id: String,
    definition: String,
    cancelled: Arc<AtomicBool>,
}

struct RenderCompletion {
    id: String,
    cancelled: Arc<AtomicBool>,
    result: Result<String, String>,
}

/// Submits definitions to a render worker and applies the results.
pub struct RenderPipeline {
    jobs: flume::Sender<RenderJob>,
    completions: flume::Receiver<RenderCompletion>,
    in_flight: Option<Arc<AtomicBool>>,
    next_id: u64,
}

impl RenderPipeline {
    /// Start a render worker for `renderer`.
    pub fn new(renderer: Arc<dyn DiagramRenderer>, init: Arc<RenderInit>) -> anyhow::Result<Self> {
        let (jobs, job_rx) = flume::unbounded::<RenderJob>();
        let (completion_tx, completions) = flume::unbounded();

        thread::Builder::new()
            .name("diagram-render".into())
            .spawn(move || {
                for job in job_rx.iter() {
                    if job.cancelled.load(Ordering::Acquire) {
                        debug!("Skipping cancelled render {}", job.id);
                        continue;
                    }

                    trace!("Rendering {}", job.id);
                    let result = panic::catch_unwind(AssertUnwindSafe(|| {
                        init.ensure(renderer.as_ref())
                            .and_then(|()| renderer.render(&job.definition, &job.id))
                    }))
                    .unwrap_or_else(|payload| {
                        Err(anyhow!("Renderer panicked: {}", panic_message(payload.as_ref())))
                    })
                    .map_err(|e| format!("{e:#}"));

                    let completion = RenderCompletion {
                        id: job.id,
                        cancelled: job.cancelled,
                        result,
                    };
                    if completion_tx.send(completion).is_err() {
                        break;
                    }
                }
                debug!("Render worker exiting");
            })
            .context("Failed to spawn render worker")?;

        Ok(Self {
            jobs,
            completions,
            in_flight: None,
            next_id: 0,
        })
    }

    /// Whether a submitted render has not completed yet.
    pub fn is_rendering(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Supersede any in-flight render, mark the store as loading and queue
    /// `definition`. Returns the new request id.
    pub fn submit(&mut self, store: &ViewerStore, definition: impl Into<String>) -> String {
        self.cancel();

        self.next_id += 1;
        let id = format!("diagram-{}", self.next_id);
        let cancelled = Arc::new(AtomicBool::new(false));

        store.set_loading();
        let job = RenderJob {
            id: id.clone(),
            definition: definition.into(),
            cancelled: cancelled.clone(),
        };
        if self.jobs.send(job).is_err() {
            warn!("Render worker is gone, cannot render {id}");
            store.set_error("Renderer is not running");
        } else {
            debug!("Submitted render {id}");
            self.in_flight = Some(cancelled);
        }
        id
    }

    /// Cancel the in-flight render, if any. Its result will be discarded.
    pub fn cancel(&mut self) {
        if let Some(flag) = self.in_flight.take() {
            flag.store(true, Ordering::Release);
        }
    }

    /// Apply every completion that has arrived. Returns how many reached the
    /// store.
    pub fn poll(&mut self, store: &ViewerStore) -> usize {
        let mut applied = 0;
        while let Ok(completion) = self.completions.try_recv() {
            if self.apply(store, completion) {
                applied += 1;
            }
        }
        applied
    }

    /// Block until a completion reaches the store or `timeout` elapses.
    pub fn wait(&mut self, store: &ViewerStore, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.completions.recv_timeout(remaining) {
                Ok(completion) => {
                    if self.apply(store, completion) {
                        return true;
                    }
                }
                Err(_) => return false,
            }
        }
    }

    fn apply(&mut self, store: &ViewerStore, completion: RenderCompletion) -> bool {
        if completion.cancelled.load(Ordering::Acquire) {
            debug!("Discarding superseded render {}", completion.id);
            return false;
        }

        if self
            .in_flight
            .as_ref()
            .is_some_and(|flag| Arc::ptr_eq(flag, &completion.cancelled))
        {
            self.in_flight = None;
        }

        match completion.result {
            Ok(markup) => {
                let dims = parse_svg_dimensions(&markup, None);
                debug!(
                    "Render {} finished: {}x{}",
                    completion.id, dims.width, dims.height
                );
                store.set_success(markup, dims);
            }
            Err(message) => {
                warn!("Render {} failed: {message}", completion.id);
                store.set_error(message);
            }
        }
        true
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}
