//! Transform math for the diagram viewport.
//!
//! A [`TransformState`] is the affine map from content space to viewport
//! space: a content point `(cx, cy)` renders at
//! `(pan_x + cx * zoom, pan_y + cy * zoom)`. Every function here is pure and
//! returns a new state; nothing is mutated in place.
//!
//! No defensive checks happen at this layer beyond the zoom constraint
//! clamp. Zero or negative content sizes produce non-finite values and must
//! be rejected by the caller.

use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Size};
use crate::options::{ZoomConstraints, FIT_PADDING};

/// Zoom and pan of the rendered diagram.
///
/// - **Content space**: the graphic's own coordinate frame
/// - **Viewport space**: pixels relative to the viewport's top-left corner
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransformState {
    /// Zoom level (1.0 = 100%, 2.0 = 200%, 0.5 = 50%).
    pub zoom: f64,

    /// Where content x = 0 appears in the viewport.
    pub pan_x: f64,

    /// Where content y = 0 appears in the viewport.
    pub pan_y: f64,
}

impl Default for TransformState {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan_x: 0.0,
            pan_y: 0.0,
        }
    }
}

impl TransformState {
    /// Create a transform with a specific zoom and pan.
    pub fn new(zoom: f64, pan_x: f64, pan_y: f64) -> Self {
        Self { zoom, pan_x, pan_y }
    }

    /// The pan offset as a point.
    pub fn pan(&self) -> Point {
        Point::new(self.pan_x, self.pan_y)
    }

    /// Convert a point from viewport space to content space.
    pub fn viewport_to_content(&self, point: Point) -> Point {
        Point::new(
            (point.x - self.pan_x) / self.zoom,
            (point.y - self.pan_y) / self.zoom,
        )
    }

    /// Convert a point from content space to viewport space.
    pub fn content_to_viewport(&self, point: Point) -> Point {
        Point::new(
            point.x * self.zoom + self.pan_x,
            point.y * self.zoom + self.pan_y,
        )
    }
}

/// Clamp a zoom level into the constraint range.
pub fn clamp_zoom(zoom: f64, constraints: &ZoomConstraints) -> f64 {
    zoom.max(constraints.min_zoom).min(constraints.max_zoom)
}

/// Zoom by a factor, keeping the content point under `(pivot_x, pivot_y)` fixed.
///
/// This is what scroll-wheel zooming uses: the cursor stays over the same
/// content location after zooming. X and Y are solved independently with
/// `new_pan = pivot - (pivot - pan) * (new_zoom / old_zoom)`.
pub fn zoom_at_point(
    state: &TransformState,
    factor: f64,
    pivot_x: f64,
    pivot_y: f64,
    constraints: &ZoomConstraints,
) -> TransformState {
    let new_zoom = clamp_zoom(state.zoom * factor, constraints);
    let ratio = new_zoom / state.zoom;

    TransformState {
        zoom: new_zoom,
        pan_x: pivot_x - (pivot_x - state.pan_x) * ratio,
        pan_y: pivot_y - (pivot_y - state.pan_y) * ratio,
    }
}

/// The zoom at which content exactly fits inside the padded viewport.
///
/// Not clamped to any constraint set; that is the caller's job.
pub fn calculate_fit_zoom(content: Size, viewport: Size, padding: f64) -> f64 {
    let zoom_x = (viewport.width - padding * 2.0) / content.width;
    let zoom_y = (viewport.height - padding * 2.0) / content.height;
    zoom_x.min(zoom_y)
}

/// The pan that centres content of the given size, scaled by `zoom`.
pub fn calculate_centered_pan(content: Size, viewport: Size, zoom: f64) -> Point {
    Point::new(
        (viewport.width - content.width * zoom) / 2.0,
        (viewport.height - content.height * zoom) / 2.0,
    )
}

/// The canonical first view of a diagram: fitted and centred.
pub fn create_initial_transform(content: Size, viewport: Size, padding: f64) -> TransformState {
    let zoom = calculate_fit_zoom(content, viewport, padding);
    let pan = calculate_centered_pan(content, viewport, zoom);
    TransformState::new(zoom, pan.x, pan.y)
}

/// [`create_initial_transform`] with the fit zoom clamped into `constraints`.
///
/// The pan is centred for the clamped zoom, so a viewport smaller than the
/// padding still yields a usable, finite view.
pub fn create_constrained_initial_transform(
    content: Size,
    viewport: Size,
    padding: f64,
    constraints: &ZoomConstraints,
) -> TransformState {
    let zoom = clamp_zoom(calculate_fit_zoom(content, viewport, padding), constraints);
    let pan = calculate_centered_pan(content, viewport, zoom);
    TransformState::new(zoom, pan.x, pan.y)
}

/// [`create_initial_transform`] with the default padding.
pub fn create_default_initial_transform(content: Size, viewport: Size) -> TransformState {
    create_initial_transform(content, viewport, FIT_PADDING)
}

/// Move the pan by a delta in viewport pixels; zoom is unchanged.
pub fn apply_pan_delta(state: &TransformState, dx: f64, dy: f64) -> TransformState {
    TransformState {
        pan_x: state.pan_x + dx,
        pan_y: state.pan_y + dy,
        ..*state
    }
}

/// Serialize as a CSS transform.
///
/// Translate comes before scale, so the pan is expressed in unscaled
/// viewport pixels.
pub fn to_transform_css(state: &TransformState) -> String {
    format!(
        "translate({}px, {}px) scale({})",
        state.pan_x, state.pan_y, state.zoom
    )
}
