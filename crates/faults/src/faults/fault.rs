//! Named fault: per-layer traces and the polyline ray algebra on top of them.

use std::borrow::Cow;
use std::collections::BTreeMap;

use nalgebra::Vector2;

use super::face::{Face, FaultRecord};
use super::layer::Layer;
use super::rays::{intersect_fault_rays, Ij, IntRay};
use super::segment::FaultSegment;
use crate::error::{FaultError, Result};
use crate::geom2::{
    distance, join_polylines, line_to_ray, polylines_intersect, ray_polygon_intersections,
    ray_ray_intersection, GeomCfg, Polyline,
};
use crate::grid::Grid;

/// Something a fault can be extended towards, joined with or connected to.
#[derive(Clone, Copy, Debug)]
pub enum Target<'a, 'g> {
    Fault(&'a Fault<'g>),
    Polyline(&'a Polyline),
}

impl<'a, 'g> Target<'a, 'g> {
    fn polyline(&self, k: usize) -> Result<Cow<'a, Polyline>> {
        match *self {
            Target::Fault(fault) => Ok(Cow::Owned(fault.polyline(k)?)),
            Target::Polyline(polyline) => Ok(Cow::Borrowed(polyline)),
        }
    }

    fn name(&self) -> String {
        match self {
            Target::Fault(fault) => fault.name().to_string(),
            Target::Polyline(polyline) => polyline
                .name
                .clone()
                .unwrap_or_else(|| "polyline".to_string()),
        }
    }
}

impl<'a, 'g> From<&'a Fault<'g>> for Target<'a, 'g> {
    fn from(fault: &'a Fault<'g>) -> Self {
        Target::Fault(fault)
    }
}

impl<'a, 'g> From<&'a Polyline> for Target<'a, 'g> {
    fn from(polyline: &'a Polyline) -> Self {
        Target::Polyline(polyline)
    }
}

/// A named fault on a grid: one `Layer` per k that has at least one segment.
#[derive(Clone, Debug)]
pub struct Fault<'g> {
    grid: &'g dyn Grid,
    name: String,
    layers: BTreeMap<usize, Layer<'g>>,
    cfg: GeomCfg,
}

impl<'g> Fault<'g> {
    pub fn new(grid: &'g dyn Grid, name: impl Into<String>) -> Self {
        Self::with_cfg(grid, name, GeomCfg::default())
    }

    pub fn with_cfg(grid: &'g dyn Grid, name: impl Into<String>, cfg: GeomCfg) -> Self {
        Self {
            grid,
            name: name.into(),
            layers: BTreeMap::new(),
            cfg,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn grid(&self) -> &'g dyn Grid {
        self.grid
    }

    /// Number of layers.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn has_layer(&self, k: usize) -> bool {
        self.layers.contains_key(&k)
    }

    pub fn layer(&self, k: usize) -> Result<&Layer<'g>> {
        self.layers.get(&k).ok_or_else(|| FaultError::MissingLayer {
            fault: self.name.clone(),
            k,
        })
    }

    /// Layers in ascending k.
    pub fn layers(&self) -> impl Iterator<Item = &Layer<'g>> + '_ {
        self.layers.values()
    }

    /// Validate `record` and add its segment to every layer in `k1..=k2`.
    ///
    /// Z/K faces are accepted but produce no segment.
    pub fn add_record(&mut self, record: &FaultRecord) -> Result<()> {
        record.validate(self.grid)?;
        let Some(segment) = self.create_segment(record) else {
            tracing::debug!(fault = %self.name, face = %record.face, "horizontal face skipped");
            return Ok(());
        };
        let grid = self.grid;
        for k in record.k1 as usize..=record.k2 as usize {
            self.layers
                .entry(k)
                .or_insert_with(|| Layer::new(grid, k))
                .add_segment(segment);
        }
        Ok(())
    }

    /// Parse `face` and add the record; see [`Fault::add_record`].
    #[allow(clippy::too_many_arguments)]
    pub fn add_face_record(
        &mut self,
        i1: i64,
        i2: i64,
        j1: i64,
        j2: i64,
        k1: i64,
        k2: i64,
        face: &str,
    ) -> Result<()> {
        let face: Face = face.parse()?;
        self.add_record(&FaultRecord::new(i1, i2, j1, j2, k1, k2, face))
    }

    /// Corner-lattice segment of a validated record; `None` for Z/K faces.
    fn create_segment(&self, record: &FaultRecord) -> Option<FaultSegment> {
        let stride = self.grid.nx() + 1;
        let (i1, i2) = (record.i1 as usize, record.i2 as usize);
        let (j1, j2) = (record.j1 as usize, record.j2 as usize);
        let (c1, c2) = match record.face {
            Face::X | Face::I => {
                let c1 = i1 + 1 + j1 * stride;
                (c1, c1 + (1 + j2 - j1) * stride)
            }
            Face::XNeg | Face::INeg => {
                let c1 = i1 + j1 * stride;
                (c1, c1 + (1 + j2 - j1) * stride)
            }
            Face::Y | Face::J => {
                let c1 = i1 + (j1 + 1) * stride;
                (c1, c1 + 1 + i2 - i1)
            }
            Face::YNeg | Face::JNeg => {
                let c1 = i1 + j1 * stride;
                (c1, c1 + 1 + i2 - i1)
            }
            Face::Z | Face::K | Face::ZNeg | Face::KNeg => return None,
        };
        Some(FaultSegment::new(c1, c2))
    }

    pub fn neighbor_cells(&self) -> Vec<(Option<usize>, Option<usize>)> {
        self.layers().flat_map(Layer::neighbor_cells).collect()
    }

    pub fn polyline(&self, k: usize) -> Result<Polyline> {
        Ok(self.layer(k)?.polyline())
    }

    pub fn ij_polyline(&self, k: usize) -> Result<Vec<Ij>> {
        Ok(self.layer(k)?.ij_polyline())
    }

    pub fn num_lines(&self, k: usize) -> Result<usize> {
        Ok(self.layer(k)?.len())
    }

    /// Outward rays at the start and the end of the lattice trace in layer `k`.
    pub fn end_rays(&self, k: usize) -> Result<(IntRay, IntRay)> {
        let pl = self.ij_polyline(k)?;
        let n = pl.len();
        if n < 2 {
            return Err(FaultError::PolylineTooShort { len: n });
        }
        Ok((
            IntRay::between(pl[1], pl[0])?,
            IntRay::between(pl[n - 2], pl[n - 1])?,
        ))
    }

    pub fn intersect_fault_rays(ray1: &IntRay, ray2: &IntRay) -> Result<Vec<Ij>> {
        intersect_fault_rays(ray1, ray2)
    }

    /// Lattice path joining an end of `first` with an end of `second`.
    ///
    /// All four end-ray pairings are tried; exactly one may succeed.
    pub fn join_faults(first: &Fault<'_>, second: &Fault<'_>, k: usize) -> Result<Vec<Ij>> {
        let (a0, a1) = first.end_rays(k)?;
        let (b0, b1) = second.end_rays(k)?;
        let joins: Vec<Vec<Ij>> = [(a0, b0), (a0, b1), (a1, b0), (a1, b1)]
            .iter()
            .filter_map(|(r1, r2)| intersect_fault_rays(r1, r2).ok())
            .collect();
        match <[Vec<Ij>; 1]>::try_from(joins) {
            Ok([join]) => Ok(join),
            Err(_) => Err(FaultError::NotUniquelyJoined {
                first: first.name.clone(),
                second: second.name.clone(),
            }),
        }
    }

    pub fn intersects_polyline(&self, polyline: &Polyline, k: usize) -> Result<bool> {
        Ok(polylines_intersect(&self.polyline(k)?, polyline, self.cfg))
    }

    pub fn intersects_fault(&self, other: &Fault<'_>, k: usize) -> Result<bool> {
        self.intersects_polyline(&other.polyline(k)?, k)
    }

    /// Cast a ray from `p1` away from `p0` and return `[p1, hit]` for the
    /// first target segment it crosses.
    fn ray_extension(
        p0: Vector2<f64>,
        p1: Vector2<f64>,
        target: &Polyline,
    ) -> Option<[Vector2<f64>; 2]> {
        let dir = line_to_ray(p0, p1)?;
        let (_, hit) = *ray_polygon_intersections(p1, dir, target).first()?;
        Some([p1, hit])
    }

    fn extend_to(
        &self,
        polyline: &Polyline,
        target_name: String,
        k: usize,
    ) -> Result<Option<[Vector2<f64>; 2]>> {
        if self.intersects_polyline(polyline, k)? {
            return Ok(None);
        }
        let pl = self.polyline(k)?;
        let n = pl.len();
        if n < 2 {
            return Err(FaultError::PolylineTooShort { len: n });
        }
        // End segment, start segment, then the chord in both directions.
        for (a, b) in [(n - 2, n - 1), (1, 0), (0, n - 1), (n - 1, 0)] {
            if let Some(ext) = Self::ray_extension(pl[a], pl[b], polyline) {
                return Ok(Some(ext));
            }
        }
        Err(FaultError::CannotExtend {
            fault: self.name.clone(),
            target: target_name,
        })
    }

    /// Straight extension of the trace in layer `k` until it hits `polyline`.
    ///
    /// `Ok(None)` if they already intersect.
    pub fn extend_to_polyline(
        &self,
        polyline: &Polyline,
        k: usize,
    ) -> Result<Option<[Vector2<f64>; 2]>> {
        let name = Target::Polyline(polyline).name();
        self.extend_to(polyline, name, k)
    }

    pub fn extend_to_fault(
        &self,
        other: &Fault<'_>,
        k: usize,
    ) -> Result<Option<[Vector2<f64>; 2]>> {
        self.extend_to(&other.polyline(k)?, other.name.clone(), k)
    }

    pub fn extend_to_edge(
        &self,
        edge: Target<'_, '_>,
        k: usize,
    ) -> Result<Option<[Vector2<f64>; 2]>> {
        match edge {
            Target::Fault(fault) => self.extend_to_fault(fault, k),
            Target::Polyline(polyline) => self.extend_to_polyline(polyline, k),
        }
    }

    /// Extend the start (or end) segment until it meets `bbox`.
    ///
    /// # Panics
    /// If the extension ray misses the box; the trace is expected to lie
    /// inside it.
    pub fn extend_to_bbox(&self, bbox: &Polyline, k: usize, start: bool) -> Result<Polyline> {
        let pl = self.polyline(k)?;
        let n = pl.len();
        if n < 2 {
            return Err(FaultError::PolylineTooShort { len: n });
        }
        let (p0, p1) = if start {
            (pl[1], pl[0])
        } else {
            (pl[n - 2], pl[n - 1])
        };
        let hit = line_to_ray(p0, p1)
            .and_then(|dir| ray_polygon_intersections(p1, dir, bbox).first().copied());
        let Some((_, p2)) = hit else {
            panic!("Logical error - must intersect with bounding box");
        };
        let name = if self.name.is_empty() {
            None
        } else {
            Some(format!("Extend:{}", self.name))
        };
        Ok(Polyline::from(vec![p1, p2]).with_name(name))
    }

    /// Shortest ray connection from an end of the trace to `target`.
    ///
    /// Rays from both ends are cast onto the target; if neither hits, they
    /// are intersected with the outward extensions of the target's end
    /// segments. `None` if the two already intersect or nothing connects.
    pub fn connect(&self, target: Target<'_, '_>, k: usize) -> Result<Option<[Vector2<f64>; 2]>> {
        let target = target.polyline(k)?;
        if self.intersects_polyline(&target, k)? {
            return Ok(None);
        }
        let pl = self.polyline(k)?;
        let n = pl.len();
        if n < 2 {
            return Err(FaultError::PolylineTooShort { len: n });
        }
        let end_rays = end_segment_rays(&pl);

        let mut candidates: Vec<[Vector2<f64>; 2]> = Vec::new();
        for &(origin, dir) in &end_rays {
            let hits = ray_polygon_intersections(origin, dir, &target);
            if let Some(ext) = nearest(origin, hits) {
                candidates.push(ext);
            }
        }

        if candidates.is_empty() {
            let target_rays = end_segment_rays(&target);
            for &(origin, dir) in &end_rays {
                for &(q, s) in &target_rays {
                    if let Some(p) = ray_ray_intersection(origin, dir, q, s) {
                        candidates.push([origin, p]);
                    }
                }
            }
        }

        let shortest = candidates
            .into_iter()
            .min_by(|x, y| distance(x[0], x[1]).total_cmp(&distance(y[0], y[1])));
        Ok(shortest)
    }

    /// Shortest end-to-end connection between the trace and `target`.
    pub fn end_join(&self, target: Target<'_, '_>, k: usize) -> Result<Option<[Vector2<f64>; 2]>> {
        let target = target.polyline(k)?;
        Ok(join_polylines(&self.polyline(k)?, &target, self.cfg))
    }

    /// Extend `polyline` (not the fault) from either end onto the trace.
    ///
    /// The nearer of the two extensions wins.
    pub fn extend_polyline_onto(
        &self,
        polyline: &Polyline,
        k: usize,
    ) -> Result<Option<[Vector2<f64>; 2]>> {
        if self.intersects_polyline(polyline, k)? {
            return Ok(None);
        }
        let n = polyline.len();
        if n < 2 {
            return Err(FaultError::PolylineTooShort { len: n });
        }
        let fault_pl = self.polyline(k)?;
        let ext1 = Self::ray_extension(polyline[n - 2], polyline[n - 1], &fault_pl);
        let ext2 = Self::ray_extension(polyline[1], polyline[0], &fault_pl);
        Ok(match (ext1, ext2) {
            (Some(a), Some(b)) => {
                if distance(a[0], a[1]) <= distance(b[0], b[1]) {
                    Some(a)
                } else {
                    Some(b)
                }
            }
            (a, b) => a.or(b),
        })
    }
}

impl<'a, 'g> IntoIterator for &'a Fault<'g> {
    type Item = &'a Layer<'g>;
    type IntoIter = std::collections::btree_map::Values<'a, usize, Layer<'g>>;

    fn into_iter(self) -> Self::IntoIter {
        self.layers.values()
    }
}

/// Outward rays `(origin, dir)` off the last and the first segment of `pl`.
fn end_segment_rays(pl: &Polyline) -> Vec<(Vector2<f64>, Vector2<f64>)> {
    let n = pl.len();
    let mut rays = Vec::with_capacity(2);
    if n < 2 {
        return rays;
    }
    for (a, b) in [(n - 2, n - 1), (1, 0)] {
        if let Some(dir) = line_to_ray(pl[a], pl[b]) {
            rays.push((pl[b], dir));
        }
    }
    rays
}

/// `[origin, closest hit]` among the ray hits, if any.
fn nearest(origin: Vector2<f64>, hits: Vec<(usize, Vector2<f64>)>) -> Option<[Vector2<f64>; 2]> {
    let closest = hits
        .into_iter()
        .map(|(_, p)| p)
        .min_by(|a, b| distance(origin, *a).total_cmp(&distance(origin, *b)))?;
    Some([origin, closest])
}
