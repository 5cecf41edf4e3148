//! Diagram viewport engine
//!
//! Pan, zoom and minimap state for an interactive diagram viewer, kept
//! independent of any UI toolkit.
//!
//! # Core Concepts
//!
//! - **Transform**: zoom + pan mapping content space to viewport space
//! - **BBox / minimap layout**: union of content and visible bounds, fitted
//!   into the minimap canvas
//! - **PanZoomState**: one viewing session, replaced wholesale on change
//! - **RenderStatus**: idle / loading / success / error
//! - **ViewerStore**: subscribable store handing out cached snapshots
//!
//! # Example
//!
//! ```
//! use diagram_viewport::prelude::*;
//!
//! let store = ViewerStore::default();
//! let dims = parse_svg_dimensions(r#"<svg viewBox="0 0 800 600"></svg>"#, None);
//! store.set_success("<svg/>", dims);
//! store.initialize_pan_zoom(&dims, 400.0, 300.0);
//!
//! let snapshot = store.get_snapshot();
//! assert!(snapshot.pan_zoom.zoom() < 1.0);
//! ```

mod bbox;
mod controls;
mod geometry;
mod minimap;
mod options;
mod pan_zoom;
mod render_status;
mod store;
mod transform;

pub use bbox::*;
pub use controls::*;
pub use geometry::*;
pub use minimap::*;
pub use options::*;
pub use pan_zoom::*;
pub use render_status::*;
pub use store::*;
pub use transform::*;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::bbox::{parse_svg_dimensions, MinimapLayout, NaturalDimensions};
    pub use crate::controls::{ControlButton, ViewerControls, WheelDelta};
    pub use crate::geometry::{Point, Size};
    pub use crate::options::{MinimapCanvas, ViewerOptions, ZoomConstraints};
    pub use crate::pan_zoom::PanZoomState;
    pub use crate::render_status::RenderStatus;
    pub use crate::store::{ViewerSnapshot, ViewerStore};
    pub use crate::transform::TransformState;
}
