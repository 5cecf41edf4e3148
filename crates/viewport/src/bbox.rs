//! Bounding boxes, visible-region math and the minimap layout.
//!
//! The minimap does not just show the content: it shows the union of the
//! content bounds and the currently visible viewport bounds, so both stay
//! fully inside the minimap canvas however far the user zooms or pans away.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Size};
use crate::options::MinimapCanvas;
use crate::transform::TransformState;

/// Natural size used when a graphic cannot be measured.
pub const DEFAULT_NATURAL_SIZE: Size = Size::new(800.0, 600.0);

/// Lower bound for the minimap scale.
pub const MIN_MINIMAP_SCALE: f64 = 0.01;

/// Intrinsic size and coordinate-frame origin of a rendered graphic.
///
/// Equivalent to an SVG `viewBox`. Measured once when the graphic is
/// produced and never changed afterwards.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct NaturalDimensions {
    pub width: f64,
    pub height: f64,
    pub origin_x: f64,
    pub origin_y: f64,
}

impl Default for NaturalDimensions {
    fn default() -> Self {
        Self::new(DEFAULT_NATURAL_SIZE.width, DEFAULT_NATURAL_SIZE.height)
    }
}

impl NaturalDimensions {
    /// Dimensions with the origin at `(0, 0)`.
    pub fn new(width: f64, height: f64) -> Self {
        Self::with_origin(width, height, 0.0, 0.0)
    }

    pub fn with_origin(width: f64, height: f64, origin_x: f64, origin_y: f64) -> Self {
        Self {
            width,
            height,
            origin_x,
            origin_y,
        }
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// An origin + size rectangle.
///
/// Depending on where it comes from this is either a region of content space
/// (the visible bounds) or a positioned rectangle in minimap pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewportBounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ViewportBounds {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Inclusive containment test.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.right()
            && point.y >= self.y
            && point.y <= self.bottom()
    }
}

/// A min/max rectangle. Always derived from bounds or natural dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BBox {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Convert back to an origin + size rectangle.
    pub fn to_bounds(&self) -> ViewportBounds {
        ViewportBounds::new(
            self.min_x,
            self.min_y,
            self.max_x - self.min_x,
            self.max_y - self.min_y,
        )
    }

    /// Returns true if `other` lies entirely inside this box (edges included).
    pub fn contains(&self, other: &BBox) -> bool {
        self.min_x <= other.min_x
            && self.min_y <= other.min_y
            && self.max_x >= other.max_x
            && self.max_y >= other.max_y
    }
}

impl From<ViewportBounds> for BBox {
    fn from(bounds: ViewportBounds) -> Self {
        create_bbox(&bounds)
    }
}

/// Build a bbox from an origin + size rectangle.
pub fn create_bbox(bounds: &ViewportBounds) -> BBox {
    BBox::new(bounds.x, bounds.y, bounds.right(), bounds.bottom())
}

/// Build the content bbox from a graphic's size and origin.
pub fn create_content_bbox(width: f64, height: f64, origin_x: f64, origin_y: f64) -> BBox {
    BBox::new(origin_x, origin_y, origin_x + width, origin_y + height)
}

/// Smallest bbox containing both inputs.
pub fn calculate_union_bbox(a: &BBox, b: &BBox) -> BBox {
    BBox::new(
        a.min_x.min(b.min_x),
        a.min_y.min(b.min_y),
        a.max_x.max(b.max_x),
        a.max_y.max(b.max_y),
    )
}

/// Width and height of a bbox, each floored at 1.
pub fn get_bbox_dimensions(bbox: &BBox) -> Size {
    Size::new(
        (bbox.max_x - bbox.min_x).max(1.0),
        (bbox.max_y - bbox.min_y).max(1.0),
    )
}

/// Result of [`calculate_minimap_dimensions`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MinimapDimensions {
    pub width: f64,
    pub height: f64,
    pub scale: f64,
}

/// Aspect-preserving fit of content into a `max_width` x `max_height` box.
pub fn calculate_minimap_dimensions(
    content_width: f64,
    content_height: f64,
    max_width: f64,
    max_height: f64,
) -> MinimapDimensions {
    let scale = (max_width / content_width).min(max_height / content_height);
    MinimapDimensions {
        width: content_width * scale,
        height: content_height * scale,
        scale,
    }
}

/// The viewport rectangle mapped back into content coordinates.
pub fn calculate_visible_bounds(
    transform: &TransformState,
    viewport: Size,
    origin_x: f64,
    origin_y: f64,
) -> ViewportBounds {
    ViewportBounds::new(
        origin_x - transform.pan_x / transform.zoom,
        origin_y - transform.pan_y / transform.zoom,
        viewport.width.max(1.0) / transform.zoom,
        viewport.height.max(1.0) / transform.zoom,
    )
}

/// Scale and positioned rectangles for drawing the minimap.
///
/// Recomputed on every render from the current transform; never cached.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MinimapLayout {
    /// Content units to minimap pixels.
    pub scale: f64,

    /// Union of the content bbox and the visible-viewport bbox.
    pub union_bbox: BBox,

    /// Where the union's top-left corner sits on the minimap canvas.
    pub offset: Point,

    /// The content thumbnail, in minimap pixels.
    pub svg_rect: ViewportBounds,

    /// The visible-viewport indicator, in minimap pixels.
    pub viewport_rect: ViewportBounds,
}

/// Minimap layout on the default 200x150 canvas.
pub fn calculate_minimap_layout(
    transform: &TransformState,
    viewport: Size,
    content: &NaturalDimensions,
) -> MinimapLayout {
    MinimapCanvas::default().layout(transform, viewport, content)
}

impl MinimapCanvas {
    /// Compute the minimap layout for this canvas.
    ///
    /// The content bbox and the visible-viewport bbox are unioned, the union
    /// is scaled to fit the padded canvas and centred in it, and both
    /// rectangles are positioned relative to the union's top-left corner.
    pub fn layout(
        &self,
        transform: &TransformState,
        viewport: Size,
        content: &NaturalDimensions,
    ) -> MinimapLayout {
        let content_bbox =
            create_content_bbox(content.width, content.height, content.origin_x, content.origin_y);

        let visible =
            calculate_visible_bounds(transform, viewport, content.origin_x, content.origin_y);
        let viewport_bbox = create_bbox(&visible);

        let union_bbox = calculate_union_bbox(&content_bbox, &viewport_bbox);
        let union_size = get_bbox_dimensions(&union_bbox);

        let usable = self.usable_size();
        let scale = (usable.width / union_size.width)
            .min(usable.height / union_size.height)
            .max(MIN_MINIMAP_SCALE);

        let offset = Point::new(
            self.padding + (usable.width - union_size.width * scale) / 2.0,
            self.padding + (usable.height - union_size.height * scale) / 2.0,
        );

        let svg_rect = ViewportBounds::new(
            offset.x + (content_bbox.min_x - union_bbox.min_x) * scale,
            offset.y + (content_bbox.min_y - union_bbox.min_y) * scale,
            content.width * scale,
            content.height * scale,
        );

        let viewport_rect = ViewportBounds::new(
            offset.x + (visible.x - union_bbox.min_x) * scale,
            offset.y + (visible.y - union_bbox.min_y) * scale,
            visible.width * scale,
            visible.height * scale,
        );

        MinimapLayout {
            scale,
            union_bbox,
            offset,
            svg_rect,
            viewport_rect,
        }
    }
}

/// Read a graphic's natural dimensions from its SVG markup.
///
/// A `viewBox` wins when present; its four fields are split on whitespace
/// and commas. Width/height fields that do not parse (or are not positive)
/// fall back to 800/600, origin fields fall back to 0. Without a `viewBox`
/// the explicit `width`/`height` attributes are used, then `measured` (the
/// rendered size, if the host could measure it), then 800x600, always with
/// the origin at `(0, 0)`.
pub fn parse_svg_dimensions(markup: &str, measured: Option<Size>) -> NaturalDimensions {
    let doc = match roxmltree::Document::parse(markup) {
        Ok(doc) => doc,
        Err(err) => {
            warn!("Unparseable graphic markup, using default dimensions: {err}");
            return NaturalDimensions::default();
        }
    };

    let root = doc.root_element();

    if let Some(view_box) = root.attribute("viewBox") {
        return parse_view_box(view_box);
    }

    let width = root.attribute("width").and_then(parse_length);
    let height = root.attribute("height").and_then(parse_length);
    if let (Some(width), Some(height)) = (width, height) {
        return NaturalDimensions::new(width, height);
    }

    match measured {
        Some(size) if size.is_positive() => NaturalDimensions::new(size.width, size.height),
        _ => {
            warn!("Graphic has no usable size, using default dimensions");
            NaturalDimensions::default()
        }
    }
}

fn parse_view_box(view_box: &str) -> NaturalDimensions {
    let fields: Vec<Option<f64>> = view_box
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|field| !field.is_empty())
        .map(|field| field.parse::<f64>().ok().filter(|v| v.is_finite()))
        .collect();

    let field = |index: usize| fields.get(index).copied().flatten();
    let positive = |index: usize| field(index).filter(|v| *v > 0.0);

    NaturalDimensions {
        width: positive(2).unwrap_or(DEFAULT_NATURAL_SIZE.width),
        height: positive(3).unwrap_or(DEFAULT_NATURAL_SIZE.height),
        origin_x: field(0).unwrap_or(0.0),
        origin_y: field(1).unwrap_or(0.0),
    }
}

/// Parse an SVG length attribute in user units (`"640"` or `"640px"`).
fn parse_length(value: &str) -> Option<f64> {
    let value = value.trim();
    let number = value.strip_suffix("px").unwrap_or(value).trim();
    number.parse::<f64>().ok().filter(|v| v.is_finite() && *v > 0.0)
}
