//! Face codes and raw face records.

use std::fmt;
use std::str::FromStr;

use crate::error::{FaultError, Result};
use crate::grid::Grid;

/// Grid face designator of a fault record.
///
/// `I`/`J`/`K` are aliases of `X`/`Y`/`Z`; the `Neg` variants are the faces
/// on the low side of the cell (`X-` etc.).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Face {
    X,
    Y,
    Z,
    I,
    J,
    K,
    XNeg,
    YNeg,
    ZNeg,
    INeg,
    JNeg,
    KNeg,
}

impl Face {
    pub const ALL: [Face; 12] = [
        Face::X,
        Face::Y,
        Face::Z,
        Face::I,
        Face::J,
        Face::K,
        Face::XNeg,
        Face::YNeg,
        Face::ZNeg,
        Face::INeg,
        Face::JNeg,
        Face::KNeg,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Face::X => "X",
            Face::Y => "Y",
            Face::Z => "Z",
            Face::I => "I",
            Face::J => "J",
            Face::K => "K",
            Face::XNeg => "X-",
            Face::YNeg => "Y-",
            Face::ZNeg => "Z-",
            Face::INeg => "I-",
            Face::JNeg => "J-",
            Face::KNeg => "K-",
        }
    }

    /// Index axis normal to the face: `'I'`, `'J'` or `'K'`.
    pub fn axis(self) -> char {
        match self {
            Face::X | Face::I | Face::XNeg | Face::INeg => 'I',
            Face::Y | Face::J | Face::YNeg | Face::JNeg => 'J',
            Face::Z | Face::K | Face::ZNeg | Face::KNeg => 'K',
        }
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Face {
    type Err = FaultError;

    fn from_str(s: &str) -> Result<Self> {
        Face::ALL
            .into_iter()
            .find(|face| face.code() == s)
            .ok_or_else(|| FaultError::InvalidFace(s.to_string()))
    }
}

/// One `FAULTS` entry: a rectangular span of one face class (0-based).
///
/// Indices are signed so that out-of-range input survives until validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FaultRecord {
    pub i1: i64,
    pub i2: i64,
    pub j1: i64,
    pub j2: i64,
    pub k1: i64,
    pub k2: i64,
    pub face: Face,
}

impl FaultRecord {
    pub fn new(i1: i64, i2: i64, j1: i64, j2: i64, k1: i64, k2: i64, face: Face) -> Self {
        Self {
            i1,
            i2,
            j1,
            j2,
            k1,
            k2,
            face,
        }
    }

    /// Validate ordering, range and face/span compatibility against `grid`.
    ///
    /// Checks run in a fixed order so the first violation is reported.
    pub fn validate(&self, grid: &dyn Grid) -> Result<()> {
        let ranges = [
            ('I', self.i1, self.i2, grid.nx()),
            ('J', self.j1, self.j2, grid.ny()),
            ('K', self.k1, self.k2, grid.nz()),
        ];
        for (axis, lo, hi, _) in ranges {
            if lo > hi {
                return Err(FaultError::InvalidOrder(axis));
            }
        }
        const NAMES: [[&str; 2]; 3] = [["I1", "I2"], ["J1", "J2"], ["K1", "K2"]];
        for ((_, lo, hi, n), names) in ranges.into_iter().zip(NAMES) {
            for (value, name) in [lo, hi].into_iter().zip(names) {
                if value < 0 || value >= n as i64 {
                    return Err(FaultError::IndexOutOfRange { name, value });
                }
            }
        }
        // Only the positive codes pin their axis; negative faces may span it.
        let (lo, hi) = match self.face {
            Face::X | Face::I => (self.i1, self.i2),
            Face::Y | Face::J => (self.j1, self.j2),
            Face::Z | Face::K => (self.k1, self.k2),
            _ => return Ok(()),
        };
        if lo != hi {
            return Err(FaultError::FaceSpan {
                face: self.face.code().to_string(),
                axis: self.face.axis(),
            });
        }
        Ok(())
    }
}
