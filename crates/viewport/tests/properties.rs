use diagram_viewport::{
    calculate_minimap_layout, calculate_union_bbox, clamp_zoom, content_to_minimap,
    minimap_to_content, zoom_at_point, BBox, NaturalDimensions, PanZoomState, Size,
    TransformState, ZoomConstraints, MIN_MINIMAP_SCALE,
};
use proptest::prelude::*;

fn close(a: f64, b: f64, tolerance: f64) -> bool {
    (a - b).abs() <= tolerance * a.abs().max(b.abs()).max(1.0)
}

fn bbox() -> impl Strategy<Value = BBox> {
    (-1e4..1e4f64, -1e4..1e4f64, 0.0..1e4f64, 0.0..1e4f64)
        .prop_map(|(x, y, w, h)| BBox::new(x, y, x + w, y + h))
}

#[derive(Clone, Debug)]
enum Gesture {
    Zoom { factor: f64, x: f64, y: f64 },
    Pan { from: (f64, f64), to: (f64, f64) },
    Resize { width: f64, height: f64 },
}

fn gesture() -> impl Strategy<Value = Gesture> {
    prop_oneof![
        (0.2..5.0f64, 0.0..1000.0f64, 0.0..1000.0f64)
            .prop_map(|(factor, x, y)| Gesture::Zoom { factor, x, y }),
        ((0.0..1000.0f64, 0.0..1000.0f64), (0.0..1000.0f64, 0.0..1000.0f64))
            .prop_map(|(from, to)| Gesture::Pan { from, to }),
        (1.0..3000.0f64, 1.0..3000.0f64)
            .prop_map(|(width, height)| Gesture::Resize { width, height }),
    ]
}

proptest! {
    #[test]
    fn zoom_keeps_pivot_content_fixed(
        zoom in 0.2..5.0f64,
        pan_x in -1000.0..1000.0f64,
        pan_y in -1000.0..1000.0f64,
        factor in 0.5..2.0f64,
        pivot_x in 0.0..1000.0f64,
        pivot_y in 0.0..1000.0f64,
    ) {
        let constraints = ZoomConstraints::default();
        let before = TransformState::new(zoom, pan_x, pan_y);
        prop_assume!(clamp_zoom(zoom * factor, &constraints) == zoom * factor);

        let after = zoom_at_point(&before, factor, pivot_x, pivot_y, &constraints);

        prop_assert!(close(
            (pivot_x - before.pan_x) / before.zoom,
            (pivot_x - after.pan_x) / after.zoom,
            1e-9
        ));
        prop_assert!(close(
            (pivot_y - before.pan_y) / before.zoom,
            (pivot_y - after.pan_y) / after.zoom,
            1e-9
        ));
    }

    #[test]
    fn clamp_is_idempotent(
        zoom in -100.0..100.0f64,
        min in 0.01..1.0f64,
        max in 1.0..20.0f64,
    ) {
        let constraints = ZoomConstraints::new(min, max);
        let once = clamp_zoom(zoom, &constraints);
        prop_assert_eq!(clamp_zoom(once, &constraints), once);
        prop_assert!(once >= min && once <= max);
    }

    #[test]
    fn union_contains_both_inputs(a in bbox(), b in bbox()) {
        let union = calculate_union_bbox(&a, &b);
        prop_assert!(union.contains(&a));
        prop_assert!(union.contains(&b));
    }

    #[test]
    fn minimap_round_trip_recovers_content_point(
        zoom in 0.1..10.0f64,
        pan_x in -5000.0..5000.0f64,
        pan_y in -5000.0..5000.0f64,
        viewport_w in 1.0..2000.0f64,
        viewport_h in 1.0..2000.0f64,
        content_w in 1.0..5000.0f64,
        content_h in 1.0..5000.0f64,
        origin_x in -500.0..500.0f64,
        origin_y in -500.0..500.0f64,
        tx in 0.0..1.0f64,
        ty in 0.0..1.0f64,
    ) {
        let dims = NaturalDimensions::with_origin(content_w, content_h, origin_x, origin_y);
        let transform = TransformState::new(zoom, pan_x, pan_y);
        let layout = calculate_minimap_layout(&transform, Size::new(viewport_w, viewport_h), &dims);

        let union = layout.union_bbox;
        let px = union.min_x + tx * (union.max_x - union.min_x);
        let py = union.min_y + ty * (union.max_y - union.min_y);

        let pixel = content_to_minimap(px, py, &layout);
        let back = minimap_to_content(pixel.x, pixel.y, &layout);

        prop_assert!(close(back.x, px, 1e-9));
        prop_assert!(close(back.y, py, 1e-9));
    }

    #[test]
    fn minimap_keeps_content_and_viewport_on_canvas(
        zoom in 0.1..10.0f64,
        pan_x in -2000.0..2000.0f64,
        pan_y in -2000.0..2000.0f64,
        content_w in 10.0..3000.0f64,
        content_h in 10.0..3000.0f64,
    ) {
        let dims = NaturalDimensions::new(content_w, content_h);
        let transform = TransformState::new(zoom, pan_x, pan_y);
        let layout = calculate_minimap_layout(&transform, Size::new(800.0, 600.0), &dims);
        prop_assume!(layout.scale > MIN_MINIMAP_SCALE);

        let eps = 1e-6;
        for rect in [layout.svg_rect, layout.viewport_rect] {
            prop_assert!(rect.x >= 8.0 - eps && rect.y >= 8.0 - eps);
            prop_assert!(rect.right() <= 192.0 + eps && rect.bottom() <= 142.0 + eps);
        }
    }

    #[test]
    fn reset_restores_initial_transform(
        content_w in 10.0..3000.0f64,
        content_h in 10.0..3000.0f64,
        gestures in prop::collection::vec(gesture(), 0..20),
    ) {
        let dims = NaturalDimensions::new(content_w, content_h);
        let initial = PanZoomState::initial(&dims, 1024.0, 768.0);

        let mut state = initial.clone();
        for gesture in gestures {
            state = match gesture {
                Gesture::Zoom { factor, x, y } => state.zoom_by_factor(factor, x, y, None),
                Gesture::Pan { from, to } => state
                    .start_pan(from.0, from.1)
                    .update_pan(to.0, to.1)
                    .end_pan(),
                Gesture::Resize { width, height } => state.update_viewport_size(width, height),
            };
        }

        prop_assert_eq!(state.reset_zoom().transform(), initial.transform());
    }
}
