//! Reservoir fault traces and the ray algebra on top of them.
//!
//! A fault is given as a list of face records (rectangular spans on grid
//! faces, the grdecl `FAULTS` keyword). Per k-layer the records are cut into
//! corner-lattice segments, chained into ordered traces (`FaultLine`), and
//! turned into polylines. `Fault` then extends, joins and intersects these
//! traces with each other, with arbitrary polylines and with bounding boxes.
//!
//! Layout
//! - `grid`: the read-only grid collaborator (`Grid`) and a regular `RectGrid`.
//! - `geom2`: 2D polyline container and the ray/segment primitives.
//! - `faults`: segments, segment map, lines, layers, faults and collections.
//! - `api`: curated re-exports for callers.

pub mod api;
pub mod error;
pub mod faults;
pub mod geom2;
pub mod grid;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use error::{FaultError, Result};
pub use nalgebra::Vector2 as Vec2;

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::error::{FaultError, Result};
    pub use crate::faults::{
        Face, Fault, FaultCollection, FaultLine, FaultRecord, FaultSegment, IntRay, Layer,
        SegmentMap, Target,
    };
    pub use crate::geom2::{GeomCfg, Polyline};
    pub use crate::grid::{Grid, RectGrid};
    pub use nalgebra::Vector2 as Vec2;
}
