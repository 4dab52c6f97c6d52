//! 2D polylines and the ray/segment primitives used by the fault algebra.
//!
//! Purpose
//! - Provide an open `Polyline` container (optionally named) and the handful
//!   of predicates the extend/join/connect operations are built on.
//! - Keep tolerances explicit through `GeomCfg`.
//!
//! Conventions
//! - Polylines are open: there is no implicit closing edge, also not for
//!   polylines used as bounding boxes.
//! - Rays are `(point, unit direction)`; a ray hits a segment for `t >= 0`
//!   and `0 <= u <= 1` (both ends inclusive).

mod types;
mod util;

pub use types::{GeomCfg, Polyline};
pub use util::{
    distance, join_polylines, line_intersection, line_to_ray, polylines_intersect,
    ray_line_intersection, ray_polygon_intersections, ray_ray_intersection,
};
