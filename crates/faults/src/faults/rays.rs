//! Integer axis-aligned rays on the corner lattice.

use crate::error::{FaultError, Result};

/// Lattice coordinate `(i, j)`.
pub type Ij = (i64, i64);

/// Ray with a lattice origin and a unit axis direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct IntRay {
    pub origin: Ij,
    pub dir: (i64, i64),
}

impl IntRay {
    /// Ray starting at `p2`, pointing away from `p1`.
    ///
    /// The two points must differ and share exactly one coordinate.
    pub fn between(p1: Ij, p2: Ij) -> Result<Self> {
        if p1 == p2 {
            return Err(FaultError::CoincidentPoints);
        }
        let dir = if p1.0 == p2.0 {
            (0, (p2.1 - p1.1).signum())
        } else if p1.1 == p2.1 {
            ((p2.0 - p1.0).signum(), 0)
        } else {
            return Err(FaultError::InvalidDirection);
        };
        Ok(Self { origin: p2, dir })
    }
}

/// Meeting path of two axis rays, or an error when they can never meet.
///
/// Coincident origins give an empty path. Origins differing in both axes are
/// connected through the corner reached by following `ray1` first; otherwise
/// the path is the two origins.
pub fn intersect_fault_rays(ray1: &IntRay, ray2: &IntRay) -> Result<Vec<Ij>> {
    let (p1, p2) = (ray1.origin, ray2.origin);
    if p1 == p2 {
        return Ok(Vec::new());
    }
    let dx = p2.0 - p1.0;
    let dy = p2.1 - p1.1;
    if dx != 0 && ray1.dir.0 * dx <= 0 && ray2.dir.0 * dx >= 0 {
        return Err(FaultError::RaysNeverIntersect);
    }
    if dy != 0 && ray1.dir.1 * dy <= 0 && ray2.dir.1 * dy >= 0 {
        return Err(FaultError::RaysNeverIntersect);
    }
    if dx * dy != 0 {
        let corner = if ray1.dir.0 != 0 {
            (p2.0, p1.1)
        } else {
            (p1.0, p2.1)
        };
        Ok(vec![p1, corner, p2])
    } else {
        Ok(vec![p1, p2])
    }
}
