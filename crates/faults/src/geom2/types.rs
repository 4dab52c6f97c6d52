//! Basic 2D types: tolerances and the polyline container.

use std::ops::Index;

use nalgebra::Vector2;

/// Geometry configuration (tolerances).
#[derive(Clone, Copy, Debug)]
pub struct GeomCfg {
    /// Threshold for parallel/coincident tests in segment intersection.
    pub eps: f64,
}

impl Default for GeomCfg {
    fn default() -> Self {
        Self { eps: 1e-9 }
    }
}

/// Open 2D polyline with an optional name.
///
/// Equality compares the points only; the name is a label.
#[derive(Clone, Debug, Default)]
pub struct Polyline {
    pub name: Option<String>,
    pub points: Vec<Vector2<f64>>,
}

impl Polyline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(x, y)` pairs.
    pub fn from_xy<I>(points: I) -> Self
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let points = points
            .into_iter()
            .map(|(x, y)| Vector2::new(x, y))
            .collect();
        Self { name: None, points }
    }

    pub fn with_name(mut self, name: Option<String>) -> Self {
        self.name = name;
        self
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    pub fn push(&mut self, p: Vector2<f64>) {
        self.points.push(p);
    }

    /// Append every point of `other` (no de-duplication at the seam).
    pub fn extend_from(&mut self, other: &Polyline) {
        self.points.extend_from_slice(&other.points);
    }

    #[inline]
    pub fn first(&self) -> Option<Vector2<f64>> {
        self.points.first().copied()
    }

    #[inline]
    pub fn last(&self) -> Option<Vector2<f64>> {
        self.points.last().copied()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Vector2<f64>> {
        self.points.iter()
    }
}

impl PartialEq for Polyline {
    fn eq(&self, other: &Self) -> bool {
        self.points == other.points
    }
}

impl Index<usize> for Polyline {
    type Output = Vector2<f64>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.points[index]
    }
}

impl From<Vec<Vector2<f64>>> for Polyline {
    fn from(points: Vec<Vector2<f64>>) -> Self {
        Self { name: None, points }
    }
}

impl<'a> IntoIterator for &'a Polyline {
    type Item = &'a Vector2<f64>;
    type IntoIter = std::slice::Iter<'a, Vector2<f64>>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}
