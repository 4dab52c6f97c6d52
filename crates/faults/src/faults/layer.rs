//! One k-layer of a fault: raw segments and the ordered lines built from them.

use std::cell::OnceCell;
use std::cmp::Ordering;
use std::ops::Index;

use nalgebra::{Matrix2, Vector2};

use super::line::FaultLine;
use super::rays::Ij;
use super::segment::{FaultSegment, SegmentMap};
use crate::geom2::Polyline;
use crate::grid::Grid;

/// All segments of a fault in layer `k` plus the lines chained from them.
///
/// Adding a segment marks the lines stale; the next read rebuilds every line
/// from the full segment set.
#[derive(Clone, Debug)]
pub struct Layer<'g> {
    grid: &'g dyn Grid,
    k: usize,
    segments: Vec<FaultSegment>,
    lines: OnceCell<Vec<FaultLine<'g>>>,
}

impl<'g> Layer<'g> {
    pub fn new(grid: &'g dyn Grid, k: usize) -> Self {
        Self {
            grid,
            k,
            segments: Vec::new(),
            lines: OnceCell::new(),
        }
    }

    #[inline]
    pub fn k(&self) -> usize {
        self.k
    }

    pub fn add_segment(&mut self, segment: FaultSegment) {
        self.segments.push(segment);
        self.lines.take();
    }

    pub fn num_segments(&self) -> usize {
        self.segments.len()
    }

    /// The ordered lines, rebuilding them if segments were added since the
    /// last read.
    pub fn process_segments(&self) -> &[FaultLine<'g>] {
        self.lines
            .get_or_init(|| build_lines(self.grid, self.k, &self.segments))
    }

    pub fn lines(&self) -> &[FaultLine<'g>] {
        self.process_segments()
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.lines().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines().is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&FaultLine<'g>> {
        self.lines().get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FaultLine<'g>> {
        self.lines().iter()
    }

    /// Concatenated polylines of all lines, in line order.
    pub fn polyline(&self) -> Polyline {
        let mut out = Polyline::new();
        for line in self.lines() {
            out.extend_from(line.polyline());
        }
        out
    }

    /// Concatenated lattice polylines of all lines, in line order.
    pub fn ij_polyline(&self) -> Vec<Ij> {
        self.lines()
            .iter()
            .flat_map(|line| line.ij_polyline().iter().copied())
            .collect()
    }

    pub fn neighbor_cells(&self) -> Vec<(Option<usize>, Option<usize>)> {
        self.lines()
            .iter()
            .flat_map(FaultLine::neighbor_cells)
            .collect()
    }
}

impl<'g> Index<usize> for Layer<'g> {
    type Output = FaultLine<'g>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.lines()[index]
    }
}

impl<'a, 'g> IntoIterator for &'a Layer<'g> {
    type Item = &'a FaultLine<'g>;
    type IntoIter = std::slice::Iter<'a, FaultLine<'g>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Chain `segments` into lines, then order and orient the lines.
fn build_lines<'g>(grid: &'g dyn Grid, k: usize, segments: &[FaultSegment]) -> Vec<FaultLine<'g>> {
    let mut map = SegmentMap::new();
    for segment in segments {
        map.add(*segment);
    }
    #[cfg(debug_assertions)]
    map.verify();

    let mut lines = Vec::new();
    while let Some(start) = map.pop_start() {
        let mut line = FaultLine::new(grid, k);
        line.try_append(start);
        while let Some(next) = line.tail().and_then(|tail| map.pop_next(tail)) {
            if !line.try_append(next) {
                lines.push(std::mem::replace(&mut line, FaultLine::new(grid, k)));
                line.try_append(next);
            }
        }
        lines.push(line);
    }

    if lines.len() > 1 {
        sort_lines(&mut lines);
    }
    tracing::debug!(
        k,
        segments = segments.len(),
        lines = lines.len(),
        "layer lines rebuilt"
    );
    lines
}

/// Order lines along the least-squares line through their centers and
/// orient each line in the direction of increasing projection.
///
/// With a singular fit (all centers share one x, up to rounding) the
/// discovery order and orientation are kept.
fn sort_lines(lines: &mut Vec<FaultLine<'_>>) {
    let centers: Vec<Vector2<f64>> = lines.iter().map(FaultLine::center).collect();
    let Some((a, b)) = fit_line(&centers) else {
        tracing::warn!(
            lines = lines.len(),
            "singular fit through line centers; keeping discovery order"
        );
        return;
    };
    let project = |p: Vector2<f64>| p.x + b * (p.y - a);

    let mut keyed: Vec<(f64, FaultLine<'_>)> = lines
        .drain(..)
        .zip(centers)
        .map(|(line, center)| (project(center), line))
        .collect();
    keyed.sort_by(|x, y| x.0.partial_cmp(&y.0).unwrap_or(Ordering::Equal));

    for (_, mut line) in keyed {
        if let (Some(start), Some(end)) = (line.start_point(), line.end_point()) {
            if project(start) > project(end) {
                line.reverse();
            }
        }
        lines.push(line);
    }
}

/// Ordinary least squares `y = a + b·x` through `points` via the normal
/// equations; `None` when the system is singular.
///
/// The equations are set up in x shifted by the mean, which gives the same
/// fit without cancellation at large coordinate offsets. Singular means the
/// x spread is at rounding level.
fn fit_line(points: &[Vector2<f64>]) -> Option<(f64, f64)> {
    if points.is_empty() {
        return None;
    }
    let n = points.len() as f64;
    let mean_x = points.iter().map(|p| p.x).sum::<f64>() / n;
    let scale = points.iter().fold(0.0_f64, |m, p| m.max(p.x.abs()));
    let (sx, sy, sxx, sxy) = points.iter().fold((0.0, 0.0, 0.0, 0.0), |acc, p| {
        let x = p.x - mean_x;
        (acc.0 + x, acc.1 + p.y, acc.2 + x * x, acc.3 + x * p.y)
    });
    if sxx <= n * (16.0 * f64::EPSILON * scale).powi(2) {
        return None;
    }
    let xtx = Matrix2::new(n, sx, sx, sxx);
    let beta = xtx.try_inverse()? * Vector2::new(sy, sxy);
    let b = beta.y;
    Some((beta.x - b * mean_x, b))
}
