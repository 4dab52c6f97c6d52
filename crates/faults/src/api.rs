//! Curated API for callers (the CLI and benches).
//!
//! Prefer these re-exports over reaching into submodules; the module layout
//! below `faults` may still move.

// Grid collaborator
pub use crate::grid::{Grid, RectGrid};

// 2D primitives
pub use crate::geom2::{
    join_polylines, line_to_ray, polylines_intersect, ray_polygon_intersections, GeomCfg, Polyline,
};

// Fault traces
pub use crate::faults::{
    intersect_fault_rays, Face, Fault, FaultCollection, FaultLine, FaultRecord, FaultSegment,
    Ij, IntRay, Layer, SegmentMap, Target,
};

// Errors
pub use crate::error::{FaultError, Result};
