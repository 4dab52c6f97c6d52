use nalgebra::Vector2;

use super::types::{GeomCfg, Polyline};

#[inline]
fn cross(a: Vector2<f64>, b: Vector2<f64>) -> f64 {
    a.x * b.y - a.y * b.x
}

#[inline]
pub fn distance(a: Vector2<f64>, b: Vector2<f64>) -> f64 {
    (b - a).norm()
}

/// Unit direction from `p0` towards `p1`; `None` for coincident points.
pub fn line_to_ray(p0: Vector2<f64>, p1: Vector2<f64>) -> Option<Vector2<f64>> {
    let d = p1 - p0;
    let norm = d.norm();
    if !(norm.is_finite()) || norm <= 0.0 {
        return None;
    }
    Some(d / norm)
}

/// Intersection of the ray `point + t·dir, t >= 0` with segment `[p1, p2]`.
///
/// Parallel (including collinear) configurations report no intersection.
pub fn ray_line_intersection(
    point: Vector2<f64>,
    dir: Vector2<f64>,
    p1: Vector2<f64>,
    p2: Vector2<f64>,
) -> Option<Vector2<f64>> {
    let s = p2 - p1;
    let rxs = cross(dir, s);
    if rxs == 0.0 {
        return None;
    }
    let qp = p1 - point;
    let t = cross(qp, s) / rxs;
    let u = cross(qp, dir) / rxs;
    if t >= 0.0 && (0.0..=1.0).contains(&u) {
        Some(point + dir * t)
    } else {
        None
    }
}

/// All hits of a ray with the segments of an open polyline, as
/// `(segment index, point)` in segment order.
pub fn ray_polygon_intersections(
    point: Vector2<f64>,
    dir: Vector2<f64>,
    polyline: &Polyline,
) -> Vec<(usize, Vector2<f64>)> {
    polyline
        .points
        .windows(2)
        .enumerate()
        .filter_map(|(index, w)| {
            ray_line_intersection(point, dir, w[0], w[1]).map(|p| (index, p))
        })
        .collect()
}

/// Intersection of two rays `p + t·r` and `q + u·s` with `t, u >= 0`.
pub fn ray_ray_intersection(
    p: Vector2<f64>,
    r: Vector2<f64>,
    q: Vector2<f64>,
    s: Vector2<f64>,
) -> Option<Vector2<f64>> {
    let rxs = cross(r, s);
    if rxs == 0.0 {
        return None;
    }
    let qp = q - p;
    let t = cross(qp, s) / rxs;
    let u = cross(qp, r) / rxs;
    if t >= 0.0 && u >= 0.0 {
        Some(p + r * t)
    } else {
        None
    }
}

/// Segment/segment intersection `[p1, p2]` × `[p3, p4]` (Bourke).
///
/// Collinear segments that overlap report the midpoint of `[p1, p2]`;
/// collinear but disjoint segments and parallel segments report `None`.
pub fn line_intersection(
    p1: Vector2<f64>,
    p2: Vector2<f64>,
    p3: Vector2<f64>,
    p4: Vector2<f64>,
    cfg: GeomCfg,
) -> Option<Vector2<f64>> {
    let den = (p4.y - p3.y) * (p2.x - p1.x) - (p4.x - p3.x) * (p2.y - p1.y);
    let num_a = (p4.x - p3.x) * (p1.y - p3.y) - (p4.y - p3.y) * (p1.x - p3.x);
    let num_b = (p2.x - p1.x) * (p1.y - p3.y) - (p2.y - p1.y) * (p1.x - p3.x);

    if num_a.abs() < cfg.eps && num_b.abs() < cfg.eps && den.abs() < cfg.eps {
        return collinear_overlap(p1, p2, p3, p4, cfg).then(|| (p1 + p2) * 0.5);
    }
    if den.abs() < cfg.eps {
        return None;
    }
    let mua = num_a / den;
    let mub = num_b / den;
    if !(0.0..=1.0).contains(&mua) || !(0.0..=1.0).contains(&mub) {
        return None;
    }
    Some(p1 + (p2 - p1) * mua)
}

fn collinear_overlap(
    p1: Vector2<f64>,
    p2: Vector2<f64>,
    p3: Vector2<f64>,
    p4: Vector2<f64>,
    cfg: GeomCfg,
) -> bool {
    let d = p2 - p1;
    let len2 = d.norm_squared();
    if len2 < cfg.eps {
        let e = p4 - p3;
        let e2 = e.norm_squared();
        if e2 < cfg.eps {
            return distance(p1, p3) < cfg.eps;
        }
        let s = (p1 - p3).dot(&e) / e2;
        return (-cfg.eps..=1.0 + cfg.eps).contains(&s);
    }
    let s3 = (p3 - p1).dot(&d) / len2;
    let s4 = (p4 - p1).dot(&d) / len2;
    let (lo, hi) = if s3 <= s4 { (s3, s4) } else { (s4, s3) };
    hi >= -cfg.eps && lo <= 1.0 + cfg.eps
}

/// True if any segment of `a` meets any segment of `b`.
pub fn polylines_intersect(a: &Polyline, b: &Polyline, cfg: GeomCfg) -> bool {
    a.points.windows(2).any(|s1| {
        b.points.windows(2).any(|s2| {
            let hit = line_intersection(s1[0], s1[1], s2[0], s2[1], cfg);
            hit.is_some()
        })
    })
}

/// Shortest straight connection between the end points of `a` and `b`.
///
/// Only end points are considered (no ray extension). Returns `None` when the
/// polylines already intersect or one of them is empty. Ties resolve in the
/// order: end of `a` → start of `b`, start of `a` → start of `b`,
/// end of `a` → end of `b`, start of `a` → end of `b`.
pub fn join_polylines(a: &Polyline, b: &Polyline, cfg: GeomCfg) -> Option<[Vector2<f64>; 2]> {
    let (a0, a1) = (a.first()?, a.last()?);
    let (b0, b1) = (b.first()?, b.last()?);
    if polylines_intersect(a, b, cfg) {
        return None;
    }
    [[a1, b0], [a0, b0], [a1, b1], [a0, b1]]
        .into_iter()
        .min_by(|x, y| {
            distance(x[0], x[1])
                .partial_cmp(&distance(y[0], y[1]))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
}
