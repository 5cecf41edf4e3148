//! Configuration options for the diagram viewer.
//!
//! This module provides the `ViewerOptions` struct which controls zoom
//! limits, zoom step factors, wheel handling and the minimap canvas, plus
//! the `ZoomConstraints` pair that the transform math consumes directly.

use serde::{Deserialize, Serialize};

use crate::geometry::Size;

/// Default zoom multiplier for a single "zoom in" step.
pub const ZOOM_IN_FACTOR: f64 = 1.25;

/// Default zoom multiplier for a single "zoom out" step.
pub const ZOOM_OUT_FACTOR: f64 = 0.8;

/// Default padding (viewport pixels) kept around content when fitting it.
pub const FIT_PADDING: f64 = 40.0;

/// Lower and upper bound for the zoom level.
///
/// Supplied per operation; nothing in the viewer mutates a constraint set.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ZoomConstraints {
    /// Minimum allowed zoom level (0.1 = 10%).
    pub min_zoom: f64,

    /// Maximum allowed zoom level (10.0 = 1000%).
    pub max_zoom: f64,
}

impl Default for ZoomConstraints {
    fn default() -> Self {
        Self {
            min_zoom: 0.1,
            max_zoom: 10.0,
        }
    }
}

impl ZoomConstraints {
    /// Create a constraint set from explicit bounds.
    pub fn new(min_zoom: f64, max_zoom: f64) -> Self {
        Self { min_zoom, max_zoom }
    }
}

/// Size and inner padding of the minimap overview canvas, in minimap pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MinimapCanvas {
    /// Width of the minimap canvas.
    pub width: f64,

    /// Height of the minimap canvas.
    pub height: f64,

    /// Padding kept free on every side of the canvas.
    pub padding: f64,
}

impl Default for MinimapCanvas {
    fn default() -> Self {
        Self {
            width: 200.0,
            height: 150.0,
            padding: 8.0,
        }
    }
}

impl MinimapCanvas {
    /// Create a minimap canvas description.
    pub fn new(width: f64, height: f64, padding: f64) -> Self {
        Self {
            width,
            height,
            padding,
        }
    }

    /// The area left for drawing once padding is removed from both sides.
    pub fn usable_size(&self) -> Size {
        Size::new(
            self.width - self.padding * 2.0,
            self.height - self.padding * 2.0,
        )
    }
}

/// Configuration options for a diagram viewer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerOptions {
    /// Zoom limits applied by every zoom gesture.
    pub constraints: ZoomConstraints,

    /// Multiplier applied by the "zoom in" button.
    pub zoom_in_factor: f64,

    /// Multiplier applied by the "zoom out" button.
    pub zoom_out_factor: f64,

    /// Padding used when fitting content into the viewport.
    pub fit_padding: f64,

    /// Multiplier for zoom speed when using scroll wheel (1.0 = normal).
    pub wheel_zoom_speed: f64,

    /// Behavior when using the scroll wheel.
    pub wheel_behavior: WheelBehavior,

    /// Minimap canvas geometry.
    pub minimap: MinimapCanvas,

    /// Whether pan/zoom gestures are ignored.
    pub locked: bool,
}

impl Default for ViewerOptions {
    fn default() -> Self {
        Self {
            constraints: ZoomConstraints::default(),
            zoom_in_factor: ZOOM_IN_FACTOR,
            zoom_out_factor: ZOOM_OUT_FACTOR,
            fit_padding: FIT_PADDING,
            wheel_zoom_speed: 1.0,
            wheel_behavior: WheelBehavior::default(),
            minimap: MinimapCanvas::default(),
            locked: false,
        }
    }
}

impl ViewerOptions {
    /// Create new viewer options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the minimum zoom level.
    pub fn min_zoom(mut self, min_zoom: f64) -> Self {
        self.constraints.min_zoom = min_zoom;
        self
    }

    /// Set the maximum zoom level.
    pub fn max_zoom(mut self, max_zoom: f64) -> Self {
        self.constraints.max_zoom = max_zoom;
        self
    }

    /// Set both min and max zoom levels.
    pub fn zoom_range(mut self, min: f64, max: f64) -> Self {
        self.constraints = ZoomConstraints::new(min, max);
        self
    }

    /// Set the "zoom in" step factor.
    pub fn zoom_in_factor(mut self, factor: f64) -> Self {
        self.zoom_in_factor = factor;
        self
    }

    /// Set the "zoom out" step factor.
    pub fn zoom_out_factor(mut self, factor: f64) -> Self {
        self.zoom_out_factor = factor;
        self
    }

    /// Set the padding used when fitting content.
    pub fn fit_padding(mut self, padding: f64) -> Self {
        self.fit_padding = padding;
        self
    }

    /// Set the wheel zoom speed multiplier.
    pub fn wheel_zoom_speed(mut self, speed: f64) -> Self {
        self.wheel_zoom_speed = speed;
        self
    }

    /// Set the scroll wheel behavior.
    pub fn wheel_behavior(mut self, behavior: WheelBehavior) -> Self {
        self.wheel_behavior = behavior;
        self
    }

    /// Set the minimap canvas geometry.
    pub fn minimap(mut self, minimap: MinimapCanvas) -> Self {
        self.minimap = minimap;
        self
    }

    /// Lock or unlock pan/zoom gestures.
    pub fn locked(mut self, locked: bool) -> Self {
        self.locked = locked;
        self
    }
}

/// What a scroll wheel over the diagram does.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WheelBehavior {
    /// Zoom around the cursor.
    #[default]
    Zoom,

    /// Scroll the diagram by the wheel delta.
    Pan,

    /// Wheel events are ignored, so the host page can scroll instead.
    #[serde(rename = "none")]
    Disabled,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = ViewerOptions::default();
        assert_eq!(options.constraints.min_zoom, 0.1);
        assert_eq!(options.constraints.max_zoom, 10.0);
        assert_eq!(options.zoom_in_factor, 1.25);
        assert_eq!(options.zoom_out_factor, 0.8);
        assert_eq!(options.fit_padding, 40.0);
        assert!(!options.locked);
    }

    #[test]
    fn test_builder_pattern() {
        let options = ViewerOptions::new()
            .min_zoom(0.5)
            .max_zoom(4.0)
            .locked(true)
            .wheel_zoom_speed(2.0);

        assert_eq!(options.constraints, ZoomConstraints::new(0.5, 4.0));
        assert!(options.locked);
        assert_eq!(options.wheel_zoom_speed, 2.0);
    }

    #[test]
    fn test_wheel_behavior_wire_names() {
        let names: Vec<String> = [WheelBehavior::Zoom, WheelBehavior::Pan, WheelBehavior::Disabled]
            .iter()
            .map(|behavior| serde_json::to_string(behavior).unwrap())
            .collect();
        assert_eq!(names, vec!["\"zoom\"", "\"pan\"", "\"none\""]);
    }

    #[test]
    fn test_minimap_usable_size() {
        let canvas = MinimapCanvas::default();
        assert_eq!(canvas.usable_size(), Size::new(184.0, 134.0));
    }

    #[test]
    fn test_partial_options_deserialize_with_defaults() {
        let options: ViewerOptions =
            serde_json::from_str(r#"{"locked": true, "wheel_behavior": "pan"}"#).unwrap();
        assert!(options.locked);
        assert_eq!(options.wheel_behavior, WheelBehavior::Pan);
        assert_eq!(options.constraints, ZoomConstraints::default());
    }
}
