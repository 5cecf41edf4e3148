//! The viewer's external store.
//!
//! [`ViewerStore`] owns exactly one pan/zoom session, one render status and
//! the fullscreen flag. Consumers pull state with
//! [`get_snapshot`](ViewerStore::get_snapshot) and learn about changes
//! through [`subscribe`](ViewerStore::subscribe). The snapshot is cached and
//! keeps its identity until the next mutation, so `Rc::ptr_eq` on two
//! snapshots tells a consumer whether anything changed.
//!
//! The store is single-threaded: every transition happens synchronously
//! inside one UI callback, and listeners run before the mutating call
//! returns, in registration order.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use log::{trace, warn};
use smallvec::SmallVec;

use crate::bbox::{MinimapLayout, NaturalDimensions};
use crate::geometry::Size;
use crate::options::{MinimapCanvas, ViewerOptions};
use crate::pan_zoom::PanZoomState;
use crate::render_status::RenderStatus;
use crate::transform::{to_transform_css, TransformState};

/// Immutable view of the store at one point in time.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewerSnapshot {
    pub pan_zoom: Rc<PanZoomState>,
    pub render: Rc<RenderStatus>,
    pub is_fullscreen: bool,
}

impl ViewerSnapshot {
    /// Current transform as a CSS `transform` value.
    pub fn transform_css(&self) -> String {
        to_transform_css(&self.pan_zoom.transform())
    }

    /// Minimap layout for the current state.
    ///
    /// `None` until a render succeeded, since there is nothing to draw.
    pub fn minimap_layout(&self, canvas: &MinimapCanvas) -> Option<MinimapLayout> {
        let dims = self.render.dimensions()?;
        Some(canvas.layout(
            &self.pan_zoom.transform(),
            self.pan_zoom.viewport_size(),
            &dims,
        ))
    }
}

/// Identifies a registered listener.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Rc<dyn Fn()>;

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: SmallVec<[(ListenerId, Listener); 4]>,
}

/// Handle returned by [`ViewerStore::subscribe`].
///
/// Dropping the handle keeps the listener registered; call
/// [`unsubscribe`](Subscription::unsubscribe) to remove it.
#[must_use = "keep the subscription to be able to unsubscribe later"]
pub struct Subscription {
    id: ListenerId,
    listeners: Weak<RefCell<Listeners>>,
}

impl Subscription {
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Remove the listener. Safe to call from inside a notification.
    pub fn unsubscribe(self) {
        if let Some(listeners) = self.listeners.upgrade() {
            listeners
                .borrow_mut()
                .entries
                .retain(|(id, _)| *id != self.id);
        }
    }
}

#[derive(Clone)]
struct StoreState {
    pan_zoom: Rc<PanZoomState>,
    render: Rc<RenderStatus>,
    is_fullscreen: bool,
}

impl Default for StoreState {
    fn default() -> Self {
        Self {
            pan_zoom: PanZoomState::empty(),
            render: Rc::new(RenderStatus::Idle),
            is_fullscreen: false,
        }
    }
}

/// Subscribable store combining pan/zoom, render status and fullscreen.
pub struct ViewerStore {
    options: ViewerOptions,
    state: RefCell<StoreState>,
    snapshot: RefCell<Option<Rc<ViewerSnapshot>>>,
    listeners: Rc<RefCell<Listeners>>,
}

impl Default for ViewerStore {
    fn default() -> Self {
        Self::new(ViewerOptions::default())
    }
}

impl ViewerStore {
    /// Create a store with the given options.
    pub fn new(options: ViewerOptions) -> Self {
        Self {
            options,
            state: RefCell::new(StoreState::default()),
            snapshot: RefCell::new(None),
            listeners: Rc::new(RefCell::new(Listeners::default())),
        }
    }

    pub fn options(&self) -> &ViewerOptions {
        &self.options
    }

    /// Register a change listener.
    pub fn subscribe(&self, listener: impl Fn() + 'static) -> Subscription {
        let mut listeners = self.listeners.borrow_mut();
        let id = ListenerId(listeners.next_id);
        listeners.next_id += 1;
        listeners.entries.push((id, Rc::new(listener)));

        Subscription {
            id,
            listeners: Rc::downgrade(&self.listeners),
        }
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().entries.len()
    }

    /// The current snapshot; the same `Rc` until the next mutation.
    pub fn get_snapshot(&self) -> Rc<ViewerSnapshot> {
        if let Some(snapshot) = self.snapshot.borrow().as_ref() {
            return Rc::clone(snapshot);
        }

        let state = self.state.borrow();
        let snapshot = Rc::new(ViewerSnapshot {
            pan_zoom: Rc::clone(&state.pan_zoom),
            render: Rc::clone(&state.render),
            is_fullscreen: state.is_fullscreen,
        });
        *self.snapshot.borrow_mut() = Some(Rc::clone(&snapshot));
        snapshot
    }

    pub fn set_loading(&self) {
        self.set_render(RenderStatus::loading());
    }

    pub fn set_success(&self, svg_content: impl Into<String>, dimensions: NaturalDimensions) {
        self.set_render(RenderStatus::success(svg_content, dimensions));
    }

    pub fn set_error(&self, message: impl Into<String>) {
        self.set_render(RenderStatus::error(message));
    }

    pub fn reset_render_state(&self) {
        let next = self.state.borrow().render.reset();
        self.set_render(next);
    }

    fn set_render(&self, status: RenderStatus) {
        trace!("render status -> {status}");
        self.state.borrow_mut().render = Rc::new(status);
        self.emit_change();
    }

    /// Fit the graphic into the viewport and make that the reset target.
    ///
    /// Ignored when either size is not positive, since the fit zoom would
    /// not be finite.
    /// Uses the configured fit padding, and the fitted zoom is clamped into
    /// the configured zoom range.
    pub fn initialize_pan_zoom(
        &self,
        dims: &NaturalDimensions,
        viewport_width: f64,
        viewport_height: f64,
    ) {
        let viewport = Size::new(viewport_width, viewport_height);
        if !(dims.size().is_positive() && viewport.is_positive()) {
            warn!(
                "Skipping pan/zoom init for graphic {:?} in viewport {viewport:?}",
                dims.size()
            );
            return;
        }
        let dims = *dims;
        let padding = self.options.fit_padding;
        let constraints = self.options.constraints;
        self.update_pan_zoom(|_| {
            PanZoomState::initial_with(&dims, viewport, padding, &constraints)
        });
    }

    /// Zoom in by the configured step around `(center_x, center_y)`.
    pub fn zoom_in(&self, center_x: f64, center_y: f64) {
        self.zoom_by_factor(self.options.zoom_in_factor, center_x, center_y);
    }

    /// Zoom out by the configured step around `(center_x, center_y)`.
    pub fn zoom_out(&self, center_x: f64, center_y: f64) {
        self.zoom_by_factor(self.options.zoom_out_factor, center_x, center_y);
    }

    pub fn zoom_by_factor(&self, factor: f64, pivot_x: f64, pivot_y: f64) {
        let constraints = self.options.constraints;
        self.update_pan_zoom(|state| {
            state.zoom_by_factor(factor, pivot_x, pivot_y, Some(&constraints))
        });
    }

    pub fn reset_zoom(&self) {
        self.update_pan_zoom(|state| state.reset_zoom());
    }

    pub fn start_pan(&self, client_x: f64, client_y: f64) {
        self.update_pan_zoom(|state| state.start_pan(client_x, client_y));
    }

    pub fn update_pan(&self, client_x: f64, client_y: f64) {
        self.update_pan_zoom(|state| state.update_pan(client_x, client_y));
    }

    pub fn end_pan(&self) {
        self.update_pan_zoom(|state| state.end_pan());
    }

    pub fn update_viewport_size(&self, width: f64, height: f64) {
        self.update_pan_zoom(|state| state.update_viewport_size(width, height));
    }

    /// Replace the transform, e.g. after minimap navigation.
    pub fn set_transform(&self, transform: TransformState) {
        self.update_pan_zoom(|state| state.with_transform(transform));
    }

    /// Refit the last successful render to the current viewport.
    ///
    /// No-op until a render has succeeded.
    pub fn initialize_pan_zoom_for_fullscreen(&self) {
        let Some(dims) = self.state.borrow().render.dimensions() else {
            return;
        };
        let padding = self.options.fit_padding;
        let constraints = self.options.constraints;
        self.update_pan_zoom(|state| {
            state.initialize_for_fullscreen_with(&dims, padding, &constraints)
        });
    }

    fn update_pan_zoom(&self, f: impl FnOnce(&Rc<PanZoomState>) -> Rc<PanZoomState>) {
        let changed = {
            let mut state = self.state.borrow_mut();
            let next = f(&state.pan_zoom);
            if Rc::ptr_eq(&next, &state.pan_zoom) || next.equals(&state.pan_zoom) {
                false
            } else {
                state.pan_zoom = next;
                true
            }
        };

        if changed {
            self.emit_change();
        }
    }

    pub fn open_fullscreen(&self) {
        self.state.borrow_mut().is_fullscreen = true;
        self.emit_change();
    }

    /// Leave fullscreen. The pan/zoom session is discarded, not kept.
    pub fn close_fullscreen(&self) {
        {
            let mut state = self.state.borrow_mut();
            state.is_fullscreen = false;
            state.pan_zoom = PanZoomState::empty();
        }
        self.emit_change();
    }

    pub fn toggle_fullscreen(&self) {
        let is_fullscreen = self.state.borrow().is_fullscreen;
        if is_fullscreen {
            self.close_fullscreen();
        } else {
            self.open_fullscreen();
        }
    }

    /// Back to the initial state: empty session, idle, not fullscreen.
    pub fn reset(&self) {
        *self.state.borrow_mut() = StoreState::default();
        self.emit_change();
    }

    /// Drop the cached snapshot and notify listeners in registration order.
    ///
    /// Listeners are copied out first so they may subscribe, unsubscribe or
    /// mutate the store while being notified.
    fn emit_change(&self) {
        self.snapshot.borrow_mut().take();

        let listeners: SmallVec<[Listener; 4]> = self
            .listeners
            .borrow()
            .entries
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();

        trace!("notifying {} listener(s)", listeners.len());
        for listener in listeners {
            listener();
        }
    }
}
