//! Gesture handling for the viewer, minimap and control buttons.
//!
//! This is the validation boundary for raw input: coordinates that are not
//! finite are dropped here, so the math and state layers never see them.

use std::rc::Rc;

use log::{debug, warn};

use crate::geometry::{Point, Size};
use crate::minimap::{
    calculate_center_on_point, calculate_drag_pan, is_point_in_viewport, minimap_to_content,
};
use crate::options::WheelBehavior;
use crate::store::ViewerStore;
use crate::transform::{apply_pan_delta, TransformState};

/// Scroll distance, in pixels, of one wheel line.
const WHEEL_LINE_HEIGHT: f64 = 20.0;

/// Which button of the viewer toolbar was pressed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlButton {
    ZoomIn,
    ZoomOut,
    ResetZoom,
    OpenFullscreen,
    CloseFullscreen,
}

/// Scroll delta as reported by the host.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum WheelDelta {
    Pixels(Point),
    Lines(Point),
}

impl WheelDelta {
    fn pixel_delta(&self) -> Point {
        match *self {
            Self::Pixels(delta) => delta,
            Self::Lines(lines) => {
                Point::new(lines.x * WHEEL_LINE_HEIGHT, lines.y * WHEEL_LINE_HEIGHT)
            }
        }
    }
}

/// An in-progress drag of the minimap's viewport indicator.
#[derive(Clone, Copy, Debug, PartialEq)]
struct MinimapDrag {
    start: Point,
    start_transform: TransformState,
    scale: f64,
}

/// Routes pointer, wheel, button and resize events into a [`ViewerStore`].
pub struct ViewerControls {
    store: Rc<ViewerStore>,
    minimap_drag: Option<MinimapDrag>,
}

impl ViewerControls {
    pub fn new(store: Rc<ViewerStore>) -> Self {
        Self {
            store,
            minimap_drag: None,
        }
    }

    pub fn store(&self) -> &Rc<ViewerStore> {
        &self.store
    }

    /// Whether the minimap viewport indicator is being dragged.
    pub fn is_dragging_minimap(&self) -> bool {
        self.minimap_drag.is_some()
    }

    fn accepts_gestures(&self) -> bool {
        !self.store.options().locked
    }

    /// Wheel over the canvas; `position` is relative to the viewport.
    pub fn wheel(&self, delta: WheelDelta, position: Point) {
        let delta = delta.pixel_delta();
        if !self.accepts_gestures() || !finite(&[delta, position]) {
            return;
        }

        let options = self.store.options();
        match options.wheel_behavior {
            WheelBehavior::Zoom => {
                let factor = 1.0 - delta.y * options.wheel_zoom_speed * 0.001;
                if factor > 0.0 {
                    self.store.zoom_by_factor(factor, position.x, position.y);
                }
            }
            WheelBehavior::Pan => {
                let transform = self.store.get_snapshot().pan_zoom.transform();
                self.store
                    .set_transform(apply_pan_delta(&transform, -delta.x, -delta.y));
            }
            WheelBehavior::Disabled => {}
        }
    }

    pub fn canvas_pointer_down(&self, client: Point) {
        if self.accepts_gestures() && finite(&[client]) {
            self.store.start_pan(client.x, client.y);
        }
    }

    pub fn canvas_pointer_move(&self, client: Point) {
        if finite(&[client]) {
            self.store.update_pan(client.x, client.y);
        }
    }

    pub fn canvas_pointer_up(&self) {
        self.store.end_pan();
    }

    /// Pointer down on the minimap at minimap pixel `position`.
    ///
    /// Inside the viewport indicator this starts a drag; anywhere else it
    /// recentres the viewport on the clicked content point.
    pub fn minimap_pointer_down(&mut self, position: Point) {
        if !self.accepts_gestures() || !finite(&[position]) {
            return;
        }

        let snapshot = self.store.get_snapshot();
        let Some(layout) = snapshot.minimap_layout(&self.store.options().minimap) else {
            return;
        };
        let transform = snapshot.pan_zoom.transform();

        if is_point_in_viewport(position.x, position.y, &layout.viewport_rect) {
            debug!("minimap drag started at {position:?}");
            self.minimap_drag = Some(MinimapDrag {
                start: position,
                start_transform: transform,
                scale: layout.scale,
            });
            return;
        }

        let Some(dims) = snapshot.render.dimensions() else {
            return;
        };
        let target = minimap_to_content(position.x, position.y, &layout);
        let viewport = snapshot.pan_zoom.viewport_size();
        self.store.set_transform(calculate_center_on_point(
            target.x - dims.origin_x,
            target.y - dims.origin_y,
            viewport.width,
            viewport.height,
            transform.zoom,
        ));
    }

    pub fn minimap_pointer_move(&self, position: Point) {
        let Some(drag) = self.minimap_drag else {
            return;
        };
        if !finite(&[position]) {
            return;
        }

        let pan = calculate_drag_pan(
            position.x - drag.start.x,
            position.y - drag.start.y,
            drag.scale,
            drag.start_transform.zoom,
            drag.start_transform.pan_x,
            drag.start_transform.pan_y,
        );
        self.store.set_transform(TransformState {
            pan_x: pan.x,
            pan_y: pan.y,
            ..drag.start_transform
        });
    }

    pub fn minimap_pointer_up(&mut self) {
        self.minimap_drag = None;
    }

    /// Toolbar buttons. Zoom steps pivot on the viewport centre.
    pub fn button(&self, button: ControlButton) {
        let center = self.store.get_snapshot().pan_zoom.viewport_size().center();
        match button {
            ControlButton::OpenFullscreen => self.store.open_fullscreen(),
            ControlButton::CloseFullscreen => self.store.close_fullscreen(),
            _ if !self.accepts_gestures() => {}
            ControlButton::ZoomIn => self.store.zoom_in(center.x, center.y),
            ControlButton::ZoomOut => self.store.zoom_out(center.x, center.y),
            ControlButton::ResetZoom => self.store.reset_zoom(),
        }
    }

    /// The viewport was laid out at a new size.
    pub fn resize(&self, size: Size) {
        if !(size.width.is_finite() && size.height.is_finite()) {
            warn!("Ignoring non-finite viewport size {size:?}");
            return;
        }
        self.store.update_viewport_size(size.width, size.height);
    }
}

fn finite(points: &[Point]) -> bool {
    let ok = points.iter().all(Point::is_finite);
    if !ok {
        warn!("Ignoring non-finite pointer input {points:?}");
    }
    ok
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bbox::NaturalDimensions;
    use crate::options::{MinimapCanvas, ViewerOptions};

    fn ready_store(options: ViewerOptions) -> Rc<ViewerStore> {
        let store = Rc::new(ViewerStore::new(options));
        let dims = NaturalDimensions::new(800.0, 600.0);
        store.set_success("<svg/>", dims);
        store.initialize_pan_zoom(&dims, 400.0, 300.0);
        store
    }

    #[test]
    fn test_wheel_zooms_around_cursor() {
        let controls = ViewerControls::new(ready_store(ViewerOptions::default()));
        let before = controls.store().get_snapshot().pan_zoom.transform();
        let cursor = Point::new(120.0, 80.0);
        let content_before = before.viewport_to_content(cursor);

        controls.wheel(WheelDelta::Pixels(Point::new(0.0, -100.0)), cursor);

        let after = controls.store().get_snapshot().pan_zoom.transform();
        assert!(after.zoom > before.zoom);
        let content_after = after.viewport_to_content(cursor);
        assert!((content_after.x - content_before.x).abs() < 1e-9);
        assert!((content_after.y - content_before.y).abs() < 1e-9);
    }

    #[test]
    fn test_wheel_pans_or_is_ignored_per_options() {
        let panning = ViewerControls::new(ready_store(
            ViewerOptions::new().wheel_behavior(WheelBehavior::Pan),
        ));
        let before = panning.store().get_snapshot().pan_zoom.transform();
        panning.wheel(WheelDelta::Lines(Point::new(1.0, 2.0)), Point::default());
        let after = panning.store().get_snapshot().pan_zoom.transform();
        assert_eq!(after, apply_pan_delta(&before, -20.0, -40.0));

        let disabled = ViewerControls::new(ready_store(
            ViewerOptions::new().wheel_behavior(WheelBehavior::Disabled),
        ));
        let before = disabled.store().get_snapshot();
        disabled.wheel(WheelDelta::Pixels(Point::new(0.0, -100.0)), Point::default());
        assert!(Rc::ptr_eq(&before, &disabled.store().get_snapshot()));
    }

    #[test]
    fn test_non_finite_input_is_dropped() {
        let controls = ViewerControls::new(ready_store(ViewerOptions::default()));
        let before = controls.store().get_snapshot();

        controls.canvas_pointer_down(Point::new(f64::NAN, 0.0));
        controls.wheel(WheelDelta::Lines(Point::new(0.0, f64::INFINITY)), Point::default());

        assert!(Rc::ptr_eq(&before, &controls.store().get_snapshot()));
    }

    #[test]
    fn test_locked_viewer_ignores_gestures() {
        let controls = ViewerControls::new(ready_store(ViewerOptions::new().locked(true)));
        let before = controls.store().get_snapshot();

        controls.canvas_pointer_down(Point::new(10.0, 10.0));
        controls.button(ControlButton::ZoomIn);

        assert!(Rc::ptr_eq(&before, &controls.store().get_snapshot()));
    }

    #[test]
    fn test_minimap_click_outside_indicator_recentres() {
        let store = ready_store(ViewerOptions::default());
        store.zoom_by_factor(4.0, 0.0, 0.0);
        let mut controls = ViewerControls::new(store);

        let snapshot = controls.store().get_snapshot();
        let layout = snapshot.minimap_layout(&MinimapCanvas::default()).unwrap();
        let click = Point::new(
            layout.svg_rect.x + layout.svg_rect.width - 1.0,
            layout.svg_rect.y + layout.svg_rect.height - 1.0,
        );
        assert!(!is_point_in_viewport(click.x, click.y, &layout.viewport_rect));

        controls.minimap_pointer_down(click);
        assert!(!controls.is_dragging_minimap());

        let target = minimap_to_content(click.x, click.y, &layout);
        let transform = controls.store().get_snapshot().pan_zoom.transform();
        let centre = transform.viewport_to_content(Point::new(200.0, 150.0));
        assert!((centre.x - target.x).abs() < 1e-9);
        assert!((centre.y - target.y).abs() < 1e-9);
    }

    #[test]
    fn test_minimap_drag_moves_view_opposite() {
        let store = ready_store(ViewerOptions::default());
        let mut controls = ViewerControls::new(store);

        let snapshot = controls.store().get_snapshot();
        let layout = snapshot.minimap_layout(&MinimapCanvas::default()).unwrap();
        let start = Point::new(
            layout.viewport_rect.x + layout.viewport_rect.width / 2.0,
            layout.viewport_rect.y + layout.viewport_rect.height / 2.0,
        );
        let before = snapshot.pan_zoom.transform();

        controls.minimap_pointer_down(start);
        assert!(controls.is_dragging_minimap());
        controls.minimap_pointer_move(Point::new(start.x + 10.0, start.y));
        controls.minimap_pointer_up();

        let after = controls.store().get_snapshot().pan_zoom.transform();
        assert!(after.pan_x < before.pan_x);
        assert_eq!(after.pan_y, before.pan_y);
        assert!(!controls.is_dragging_minimap());
    }
}
