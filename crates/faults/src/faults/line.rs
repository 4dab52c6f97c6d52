//! Oriented chains of segments within one layer.

use std::cell::OnceCell;
use std::fmt::Write as _;

use nalgebra::Vector2;

use super::rays::Ij;
use super::segment::{Corner, FaultSegment};
use crate::geom2::Polyline;
use crate::grid::Grid;

/// Ordered chain of segments in layer `k`; consecutive segments share a
/// corner (`s[n].c2 == s[n+1].c1`).
///
/// Polylines are derived lazily and cached until the chain changes.
#[derive(Clone, Debug)]
pub struct FaultLine<'g> {
    grid: &'g dyn Grid,
    k: usize,
    segments: Vec<FaultSegment>,
    polyline: OnceCell<Polyline>,
    ij_polyline: OnceCell<Vec<Ij>>,
}

impl<'g> FaultLine<'g> {
    pub fn new(grid: &'g dyn Grid, k: usize) -> Self {
        Self {
            grid,
            k,
            segments: Vec::new(),
            polyline: OnceCell::new(),
            ij_polyline: OnceCell::new(),
        }
    }

    #[inline]
    pub fn k(&self) -> usize {
        self.k
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&FaultSegment> {
        self.segments.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FaultSegment> {
        self.segments.iter()
    }

    pub fn segments(&self) -> &[FaultSegment] {
        &self.segments
    }

    /// Corner the next segment has to attach to.
    pub fn tail(&self) -> Option<Corner> {
        self.segments.last().map(FaultSegment::c2)
    }

    fn invalidate(&mut self) {
        self.polyline.take();
        self.ij_polyline.take();
    }

    /// Append `segment` at the tail, orienting it (and, while the chain has a
    /// single segment, the chain itself) so that the corners match.
    ///
    /// Returns `false` and leaves the chain untouched if the segment does not
    /// connect to the tail.
    pub fn try_append(&mut self, mut segment: FaultSegment) -> bool {
        let n = self.segments.len();
        if n == 0 {
            self.segments.push(segment);
            self.invalidate();
            return true;
        }

        let tail = self.segments[n - 1].c2();
        let mut flipped_head = false;
        if segment.c1() != tail {
            if n == 1 {
                if segment.c2() == tail {
                    segment.swap();
                } else {
                    self.segments[0].swap();
                    flipped_head = true;
                    if self.segments[0].c2() == segment.c2() {
                        segment.swap();
                    }
                }
            } else {
                segment.swap();
            }
        }

        if self.segments[n - 1].c2() != segment.c1() {
            if flipped_head {
                self.segments[0].swap();
            }
            return false;
        }
        self.segments.push(segment);
        self.invalidate();
        true
    }

    /// Reverse the chain: segment order and each segment's orientation.
    pub fn reverse(&mut self) {
        self.segments.reverse();
        for segment in &mut self.segments {
            segment.swap();
        }
        self.invalidate();
    }

    /// Panic unless every pair of consecutive segments shares its corner.
    pub fn verify(&self) {
        for (index, w) in self.segments.windows(2).enumerate() {
            assert_eq!(
                w[0].c2(),
                w[1].c1(),
                "fault line in layer {} broken between segments {index} and {}",
                self.k,
                index + 1
            );
        }
    }

    fn corners(&self) -> impl Iterator<Item = Corner> + '_ {
        self.segments
            .iter()
            .map(FaultSegment::c1)
            .chain(self.segments.last().map(FaultSegment::c2))
    }

    /// Node coordinates `(x, y)` of every corner along the chain.
    pub fn polyline(&self) -> &Polyline {
        self.polyline.get_or_init(|| {
            self.corners()
                .map(|corner| self.grid.corner_xyz(corner, self.k).xy())
                .collect::<Vec<_>>()
                .into()
        })
    }

    /// Integer `(i, j)` lattice coordinates of every corner along the chain.
    pub fn ij_polyline(&self) -> &[Ij] {
        self.ij_polyline.get_or_init(|| {
            let stride = self.grid.nx() + 1;
            self.corners()
                .map(|corner| ((corner % stride) as i64, (corner / stride) as i64))
                .collect()
        })
    }

    /// Arithmetic mean of the polyline points (NaN for an empty chain).
    pub fn center(&self) -> Vector2<f64> {
        let polyline = self.polyline();
        let sum = polyline
            .iter()
            .fold(Vector2::zeros(), |acc: Vector2<f64>, p| acc + p);
        sum / polyline.len() as f64
    }

    pub fn start_point(&self) -> Option<Vector2<f64>> {
        self.polyline().first()
    }

    pub fn end_point(&self) -> Option<Vector2<f64>> {
        self.polyline().last()
    }

    /// Global indices of the cell pair on either side of each unit edge.
    ///
    /// For an edge of constant `i` the pair is (west, east), for constant `j`
    /// (south, north). `None` marks a side outside the grid.
    pub fn neighbor_cells(&self) -> Vec<(Option<usize>, Option<usize>)> {
        let (nx, ny) = (self.grid.nx(), self.grid.ny());
        let stride = nx + 1;
        let k = self.k;
        let mut cells = Vec::new();
        for segment in &self.segments {
            let (i1, j1) = (segment.c1() % stride, segment.c1() / stride);
            let (i2, j2) = (segment.c2() % stride, segment.c2() / stride);
            if i1 == i2 {
                let (lo, hi) = (j1.min(j2), j1.max(j2));
                for j in lo..hi {
                    let west = (i1 > 0).then(|| self.grid.global_index(i1 - 1, j, k));
                    let east = (i1 < nx).then(|| self.grid.global_index(i1, j, k));
                    cells.push((west, east));
                }
            } else {
                let (lo, hi) = (i1.min(i2), i1.max(i2));
                for i in lo..hi {
                    let south = (j1 > 0).then(|| self.grid.global_index(i, j1 - 1, k));
                    let north = (j1 < ny).then(|| self.grid.global_index(i, j1, k));
                    cells.push((south, north));
                }
            }
        }
        cells
    }

    /// Human-readable listing of the chain, one segment per line.
    pub fn dump(&self) -> String {
        let stride = self.grid.nx() + 1;
        let mut out = format!("Fault line k={} segments={}\n", self.k, self.len());
        for segment in &self.segments {
            let (c1, c2) = (segment.c1(), segment.c2());
            let _ = writeln!(
                out,
                "  {c1:>8} -> {c2:<8} ({},{}) -> ({},{})",
                c1 % stride,
                c1 / stride,
                c2 % stride,
                c2 / stride
            );
        }
        out
    }
}

impl<'a, 'g> IntoIterator for &'a FaultLine<'g> {
    type Item = &'a FaultSegment;
    type IntoIter = std::slice::Iter<'a, FaultSegment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}
