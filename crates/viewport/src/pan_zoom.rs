//! Pan/zoom session state.
//!
//! A [`PanZoomState`] holds the geometry of one viewing session. It is a
//! persistent value: every operation takes `&Rc<Self>` and hands back an
//! `Rc<Self>`. Operations that change nothing return the very same `Rc`, so
//! callers can use [`Rc::ptr_eq`] to skip change notifications.

use std::rc::Rc;

use crate::bbox::NaturalDimensions;
use crate::geometry::{Point, Size};
use crate::options::{ZoomConstraints, FIT_PADDING, ZOOM_IN_FACTOR, ZOOM_OUT_FACTOR};
use crate::transform::{create_constrained_initial_transform, zoom_at_point, TransformState};

/// Geometry of one viewing session.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PanZoomState {
    transform: TransformState,
    is_panning: bool,
    pan_start: Point,
    viewport_size: Size,
    initial_transform: Option<TransformState>,
}

impl PanZoomState {
    /// Zoom 1, no pan, not panning, zero viewport and no reset target.
    pub fn empty() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Fit and centre `dims` in a `viewport_width` x `viewport_height`
    /// viewport, and remember the result as the reset target.
    ///
    /// Uses the default padding and zoom range.
    pub fn initial(
        dims: &NaturalDimensions,
        viewport_width: f64,
        viewport_height: f64,
    ) -> Rc<Self> {
        Self::initial_with(
            dims,
            Size::new(viewport_width, viewport_height),
            FIT_PADDING,
            &ZoomConstraints::default(),
        )
    }

    /// [`initial`](Self::initial) with an explicit padding and zoom range.
    /// The fitted zoom is clamped into `constraints`.
    pub fn initial_with(
        dims: &NaturalDimensions,
        viewport_size: Size,
        padding: f64,
        constraints: &ZoomConstraints,
    ) -> Rc<Self> {
        let transform =
            create_constrained_initial_transform(dims.size(), viewport_size, padding, constraints);

        Rc::new(Self {
            transform,
            is_panning: false,
            pan_start: Point::default(),
            viewport_size,
            initial_transform: Some(transform),
        })
    }

    pub fn transform(&self) -> TransformState {
        self.transform
    }

    pub fn zoom(&self) -> f64 {
        self.transform.zoom
    }

    pub fn is_panning(&self) -> bool {
        self.is_panning
    }

    /// Offset recorded by [`start_pan`](Self::start_pan).
    pub fn pan_start(&self) -> Point {
        self.pan_start
    }

    pub fn viewport_size(&self) -> Size {
        self.viewport_size
    }

    /// The transform [`reset_zoom`](Self::reset_zoom) restores, if any.
    pub fn initial_transform(&self) -> Option<TransformState> {
        self.initial_transform
    }

    /// Structural equality over every field of the session.
    pub fn equals(&self, other: &Self) -> bool {
        self == other
    }

    /// Replace the transform wholesale (minimap navigation).
    pub fn with_transform(self: &Rc<Self>, transform: TransformState) -> Rc<Self> {
        if self.transform == transform {
            return Rc::clone(self);
        }
        Rc::new(Self {
            transform,
            ..(**self).clone()
        })
    }

    /// Zoom in by one step around `(center_x, center_y)`.
    pub fn zoom_in(
        self: &Rc<Self>,
        center_x: f64,
        center_y: f64,
        constraints: Option<&ZoomConstraints>,
    ) -> Rc<Self> {
        self.zoom_by_factor(ZOOM_IN_FACTOR, center_x, center_y, constraints)
    }

    /// Zoom out by one step around `(center_x, center_y)`.
    pub fn zoom_out(
        self: &Rc<Self>,
        center_x: f64,
        center_y: f64,
        constraints: Option<&ZoomConstraints>,
    ) -> Rc<Self> {
        self.zoom_by_factor(ZOOM_OUT_FACTOR, center_x, center_y, constraints)
    }

    /// Zoom by `factor`, keeping the content under the pivot fixed.
    pub fn zoom_by_factor(
        self: &Rc<Self>,
        factor: f64,
        pivot_x: f64,
        pivot_y: f64,
        constraints: Option<&ZoomConstraints>,
    ) -> Rc<Self> {
        let constraints = constraints.copied().unwrap_or_default();
        let transform = zoom_at_point(&self.transform, factor, pivot_x, pivot_y, &constraints);

        Rc::new(Self {
            transform,
            ..(**self).clone()
        })
    }

    /// Restore the recorded initial transform; no-op without one.
    pub fn reset_zoom(self: &Rc<Self>) -> Rc<Self> {
        match self.initial_transform {
            Some(initial) => Rc::new(Self {
                transform: initial,
                ..(**self).clone()
            }),
            None => Rc::clone(self),
        }
    }

    /// Enter panning mode at the given pointer position.
    ///
    /// The recorded start is an offset such that later pointer positions map
    /// straight to pan values.
    pub fn start_pan(self: &Rc<Self>, client_x: f64, client_y: f64) -> Rc<Self> {
        Rc::new(Self {
            is_panning: true,
            pan_start: Point::new(
                client_x - self.transform.pan_x,
                client_y - self.transform.pan_y,
            ),
            ..(**self).clone()
        })
    }

    /// Move the pan to follow the pointer; no-op unless panning.
    ///
    /// The pan depends only on the absolute pointer position and the start
    /// offset, so missed intermediate events do not accumulate error.
    pub fn update_pan(self: &Rc<Self>, client_x: f64, client_y: f64) -> Rc<Self> {
        if !self.is_panning {
            return Rc::clone(self);
        }
        Rc::new(Self {
            transform: TransformState {
                pan_x: client_x - self.pan_start.x,
                pan_y: client_y - self.pan_start.y,
                ..self.transform
            },
            ..(**self).clone()
        })
    }

    /// Leave panning mode, keeping the transform; no-op unless panning.
    pub fn end_pan(self: &Rc<Self>) -> Rc<Self> {
        if !self.is_panning {
            return Rc::clone(self);
        }
        Rc::new(Self {
            is_panning: false,
            ..(**self).clone()
        })
    }

    /// Record a new viewport size; no-op if it is unchanged.
    pub fn update_viewport_size(self: &Rc<Self>, width: f64, height: f64) -> Rc<Self> {
        let viewport_size = Size::new(width, height);
        if self.viewport_size == viewport_size {
            return Rc::clone(self);
        }
        Rc::new(Self {
            viewport_size,
            ..(**self).clone()
        })
    }

    /// Refit `dims` to the current viewport and make that the reset target.
    ///
    /// Used once an enlarged view knows its real size. No-op while the
    /// viewport size is not positive.
    pub fn initialize_for_fullscreen(self: &Rc<Self>, dims: &NaturalDimensions) -> Rc<Self> {
        self.initialize_for_fullscreen_with(dims, FIT_PADDING, &ZoomConstraints::default())
    }

    /// [`initialize_for_fullscreen`](Self::initialize_for_fullscreen) with an
    /// explicit padding and zoom range.
    pub fn initialize_for_fullscreen_with(
        self: &Rc<Self>,
        dims: &NaturalDimensions,
        padding: f64,
        constraints: &ZoomConstraints,
    ) -> Rc<Self> {
        if !self.viewport_size.is_positive() {
            return Rc::clone(self);
        }
        let transform = create_constrained_initial_transform(
            dims.size(),
            self.viewport_size,
            padding,
            constraints,
        );
        Rc::new(Self {
            transform,
            initial_transform: Some(transform),
            ..(**self).clone()
        })
    }
}
