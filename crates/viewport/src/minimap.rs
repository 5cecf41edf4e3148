//! Minimap interaction math.
//!
//! Converts minimap pixels back into content coordinates and turns drags of
//! the viewport indicator into pan values for the main viewport.

use crate::bbox::{MinimapLayout, ViewportBounds};
use crate::geometry::Point;
use crate::transform::TransformState;

/// The content-space point under a minimap pixel.
///
/// Deliberately unclamped: the layout's union already keeps every reachable
/// point on the canvas, and clamping to the content would stop navigation
/// at the content edge.
pub fn minimap_to_content(mx: f64, my: f64, layout: &MinimapLayout) -> Point {
    Point::new(
        layout.union_bbox.min_x + (mx - layout.offset.x) / layout.scale,
        layout.union_bbox.min_y + (my - layout.offset.y) / layout.scale,
    )
}

/// The minimap pixel that shows a content-space point.
pub fn content_to_minimap(cx: f64, cy: f64, layout: &MinimapLayout) -> Point {
    Point::new(
        layout.offset.x + (cx - layout.union_bbox.min_x) * layout.scale,
        layout.offset.y + (cy - layout.union_bbox.min_y) * layout.scale,
    )
}

/// Inclusive hit test of a minimap point against a rectangle.
pub fn is_point_in_viewport(mx: f64, my: f64, rect: &ViewportBounds) -> bool {
    rect.contains(Point::new(mx, my))
}

/// Transform that puts a content point at the exact viewport centre.
///
/// `content_x`/`content_y` are in the transform's frame, i.e. relative to
/// the graphic's origin. The zoom is kept as given.
pub fn calculate_center_on_point(
    content_x: f64,
    content_y: f64,
    viewport_width: f64,
    viewport_height: f64,
    zoom: f64,
) -> TransformState {
    TransformState::new(
        zoom,
        viewport_width / 2.0 - content_x * zoom,
        viewport_height / 2.0 - content_y * zoom,
    )
}

/// Pan produced by dragging the viewport indicator by `(drag_dx, drag_dy)`
/// minimap pixels.
///
/// The indicator stands for the window, not the content, so the delta is
/// inverted: dragging it right moves the content left.
pub fn calculate_drag_pan(
    drag_dx: f64,
    drag_dy: f64,
    minimap_scale: f64,
    zoom: f64,
    start_pan_x: f64,
    start_pan_y: f64,
) -> Point {
    let content_dx = drag_dx / minimap_scale;
    let content_dy = drag_dy / minimap_scale;

    Point::new(
        start_pan_x - content_dx * zoom,
        start_pan_y - content_dy * zoom,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bbox::{calculate_minimap_layout, NaturalDimensions};
    use crate::geometry::Size;

    #[test]
    fn test_center_on_point() {
        let state = calculate_center_on_point(100.0, 50.0, 400.0, 300.0, 2.0);
        assert_eq!(state, TransformState::new(2.0, 0.0, 50.0));
    }

    #[test]
    fn test_drag_pan_is_inverted() {
        let pan = calculate_drag_pan(10.0, 0.0, 0.5, 2.0, 0.0, 0.0);
        assert_eq!(pan, Point::new(-40.0, 0.0));
    }

    #[test]
    fn test_hit_test_inclusive() {
        let rect = ViewportBounds::new(0.0, 0.0, 10.0, 10.0);
        assert!(is_point_in_viewport(10.0, 10.0, &rect));
        assert!(is_point_in_viewport(0.0, 0.0, &rect));
        assert!(!is_point_in_viewport(10.5, 5.0, &rect));
    }

    #[test]
    fn test_svg_rect_corner_maps_to_content_origin() {
        let dims = NaturalDimensions::with_origin(800.0, 600.0, -20.0, 10.0);
        let transform = TransformState::new(0.5, 30.0, 40.0);
        let layout = calculate_minimap_layout(&transform, Size::new(400.0, 300.0), &dims);

        let corner = minimap_to_content(layout.svg_rect.x, layout.svg_rect.y, &layout);
        assert!((corner.x - dims.origin_x).abs() < 1e-9);
        assert!((corner.y - dims.origin_y).abs() < 1e-9);
    }
}
