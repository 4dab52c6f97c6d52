//! Faults: face records → segments → ordered lines → polylines → ray algebra.
//!
//! Purpose
//! - Turn grdecl `FAULTS` face records into one or more ordered, oriented
//!   traces per k-layer and answer extend/join/intersect/connect queries on
//!   them.
//!
//! Structure
//! - `face`: the closed 12-code face enumeration and the raw `FaultRecord`.
//! - `segment`: `FaultSegment` (undirected corner pair) and `SegmentMap`, the
//!   corner-indexed working set consumed while chaining.
//! - `line`: `FaultLine`, an oriented chain with cached polylines.
//! - `layer`: `Layer`, the chaining loop and the multi-line ordering heuristic.
//! - `rays`: integer end rays and their pairwise intersection.
//! - `fault`: `Fault`, record validation and the polyline ray algebra.
//! - `collection`: `FaultCollection`, name-indexed faults on one grid.
//!
//! Derived state
//! - Layer lines and line polylines live in `OnceCell`s: an empty cell is
//!   stale, a filled cell is fresh. Mutations take `&mut self` and clear the
//!   cell; reads take `&self` and fill it.

mod collection;
mod face;
mod fault;
mod layer;
mod line;
mod rays;
mod segment;

pub use collection::FaultCollection;
pub use face::{Face, FaultRecord};
pub use fault::{Fault, Target};
pub use layer::Layer;
pub use line::FaultLine;
pub use rays::{intersect_fault_rays, Ij, IntRay};
pub use segment::{Corner, FaultSegment, SegmentKey, SegmentMap};

#[cfg(test)]
mod tests;
