use super::*;
use crate::error::FaultError;
use crate::geom2::Polyline;
use crate::grid::{Grid, RectGrid};
use approx::assert_relative_eq;
use nalgebra::vector;
use proptest::prelude::*;
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

//    Fault1                    Fault4
//      |                         |
//      |                         |
//      |   -------  Fault2       |
//      |                         |
//
//          -------- Fault3
fn four_faults(g: &RectGrid) -> [Fault<'_>; 4] {
    let ny = g.ny() as i64;
    let mut f1 = Fault::new(g, "Fault1");
    let mut f2 = Fault::new(g, "Fault2");
    let mut f3 = Fault::new(g, "Fault3");
    let mut f4 = Fault::new(g, "Fault4");
    f1.add_face_record(1, 1, 10, ny - 1, 0, 0, "X").unwrap();
    f2.add_face_record(5, 10, 15, 15, 0, 0, "Y").unwrap();
    f3.add_face_record(5, 10, 5, 5, 0, 0, "Y").unwrap();
    f4.add_face_record(20, 20, 10, ny - 1, 0, 0, "X").unwrap();
    [f1, f2, f3, f4]
}

fn corners(s: &FaultSegment) -> (Corner, Corner) {
    (s.c1(), s.c2())
}

#[test]
fn ij_polyline_starts_at_smallest_free_end() {
    let g = RectGrid::new((10, 10, 10), (0.1, 0.1, 0.1));
    let mut f = Fault::new(&g, "F");
    f.add_face_record(0, 1, 0, 0, 0, 0, "Y-").unwrap();
    f.add_face_record(2, 2, 0, 1, 0, 0, "X-").unwrap();
    f.add_face_record(2, 2, 1, 1, 0, 0, "Y").unwrap();
    let ij = f.ij_polyline(0).unwrap();
    assert_eq!(ij, vec![(0, 0), (2, 0), (2, 2), (3, 2)]);
    assert_eq!(f.num_lines(0).unwrap(), 1);
}

#[test]
fn add_record_validation_messages() {
    let g = RectGrid::unit((151, 100, 50));
    let mut f = Fault::new(&g, "NAME");
    let cases: &[((i64, i64, i64, i64, i64, i64, &str), &str)] = &[
        ((10, 10, 11, 11, 1, 43, "F"), "Invalid face:F"),
        ((-1, 10, 11, 11, 1, 43, "X"), "Invalid I1:-1"),
        ((10000, 100000, 11, 11, 1, 43, "X"), "Invalid I1:10000"),
        ((10, 10002, 11, 11, 1, 43, "X"), "Invalid I2:10002"),
        ((10, 10, -11, 11, 1, 43, "X"), "Invalid J1:-11"),
        ((10, 10, 11, 11110, 1, 43, "X"), "Invalid J2:11110"),
        ((10, 10, 11, 11, -11, 43, "X"), "Invalid K1:-11"),
        ((10, 10, 11, 11, 1, 43000, "X"), "Invalid K2:43000"),
        ((10, 9, 11, 11, 1, 43, "X"), "Invalid I1 I2 indices"),
        ((8, 9, 12, 11, 1, 43, "X"), "Invalid J1 J2 indices"),
        ((8, 9, 11, 11, 100, 43, "X"), "Invalid K1 K2 indices"),
        (
            (10, 11, 11, 11, 1, 43, "X"),
            "For face:X we must have I1 == I2",
        ),
        (
            (10, 11, 11, 12, 1, 43, "Y"),
            "For face:Y we must have J1 == J2",
        ),
        (
            (10, 11, 11, 12, 1, 43, "K"),
            "For face:K we must have K1 == K2",
        ),
    ];
    for &((i1, i2, j1, j2, k1, k2, face), msg) in cases {
        let err = f.add_face_record(i1, i2, j1, j2, k1, k2, face).unwrap_err();
        assert_eq!(err.to_string(), msg);
    }
    assert!(f.is_empty());
    f.add_face_record(10, 10, 0, 10, 1, 10, "X").unwrap();
    assert_eq!(f.len(), 10);
    assert!(f.has_layer(1) && f.has_layer(10) && !f.has_layer(0));
}

#[test]
fn horizontal_faces_create_no_layers() {
    let g = RectGrid::unit((6, 1, 4));
    let mut f = Fault::new(&g, "F");
    f.add_face_record(2, 2, 0, 0, 1, 1, "Z").unwrap();
    assert!(f.is_empty());
    f.add_face_record(4, 4, 0, 0, 0, 1, "X").unwrap();
    assert_eq!(f.len(), 2);
    let err = f.layer(3).unwrap_err();
    assert_eq!(
        err,
        FaultError::MissingLayer {
            fault: "F".into(),
            k: 3
        }
    );
}

#[test]
fn negative_faces_spanning_their_axis_use_the_low_index() {
    let g = RectGrid::unit((10, 10, 2));
    let mut fx = Fault::new(&g, "FX");
    fx.add_face_record(2, 4, 1, 3, 0, 0, "X-").unwrap();
    assert_eq!(fx.ij_polyline(0).unwrap(), vec![(2, 1), (2, 4)]);

    let mut fy = Fault::new(&g, "FY");
    fy.add_face_record(2, 4, 5, 6, 0, 0, "Y-").unwrap();
    assert_eq!(fy.ij_polyline(0).unwrap(), vec![(2, 5), (5, 5)]);

    let mut fz = Fault::new(&g, "FZ");
    fz.add_face_record(2, 2, 5, 5, 0, 1, "Z-").unwrap();
    assert!(fz.is_empty());

    let err = fx.add_face_record(2, 4, 1, 3, 0, 0, "X").unwrap_err();
    assert_eq!(err.to_string(), "For face:X we must have I1 == I2");
}

#[test]
fn line_order_follows_fitted_trend() {
    let (nx, ny, nz) = (120, 60, 43);
    let g = RectGrid::unit((nx, ny, nz));
    let mut f = Fault::new(&g, "F");
    for (i1, i2, j1, j2, k1, k2, face) in [
        (104, 106, 49, 49, 0, 42, "Y"),
        (107, 107, 49, 49, 0, 42, "X"),
        (107, 107, 49, 49, 21, 42, "Y"),
        (108, 108, 48, 48, 0, 42, "Y"),
        (109, 109, 48, 48, 0, 42, "X"),
        (110, 110, 47, 47, 0, 42, "Y"),
    ] {
        f.add_face_record(i1, i2, j1, j2, k1, k2, face).unwrap();
    }
    let layer = f.layer(29).unwrap();
    assert_eq!(layer.len(), 2);
    let (line1, line2) = (&layer[0], &layer[1]);
    assert_eq!(line1.len(), 4);
    assert_eq!(line2.len(), 2);

    let s = nx + 1;
    let got: Vec<_> = line1.iter().map(corners).collect();
    assert_eq!(
        got,
        vec![
            (50 * s + 104, 50 * s + 107),
            (50 * s + 107, 50 * s + 108),
            (50 * s + 108, 49 * s + 108),
            (49 * s + 108, 49 * s + 109),
        ]
    );
    for line in layer {
        line.verify();
    }

    // Below k = 21 the step between i = 107 and 108 is missing.
    assert_eq!(f.layer(10).unwrap().len(), 3);
}

#[test]
fn neighbour_cells_along_edges() {
    let (nx, ny) = (10usize, 8usize);
    let g = RectGrid::unit((nx, ny, 7));
    let mut faults = FaultCollection::new();
    let (nxi, nyi) = (nx as i64, ny as i64);
    for (name, i1, i2, j1, j2, face) in [
        ("FY", 0, 4, 0, 0, Face::Y),
        ("FY", 6, 9, 0, 0, Face::Y),
        ("FY0", 0, 2, 0, 0, Face::YNeg),
        ("FYNY", 0, 2, nyi - 1, nyi - 1, Face::Y),
        ("FX", 0, 0, 0, 2, Face::X),
        ("FX0", 0, 0, 0, 2, Face::XNeg),
        ("FXNX", nxi - 1, nxi - 1, 0, 2, Face::X),
    ] {
        let record = FaultRecord::new(i1, i2, j1, j2, 0, 0, face);
        faults.add_record(&g, name, &record).unwrap();
    }

    let fy = &faults["FY"];
    assert_eq!(fy.len(), 1);
    let layer = fy.layer(0).unwrap();
    let nb1: Vec<_> = (0..5).map(|i| (Some(i), Some(nx + i))).collect();
    let nb2: Vec<_> = (6..10).map(|i| (Some(i), Some(nx + i))).collect();
    assert_eq!(layer[0].neighbor_cells(), nb1);
    assert_eq!(layer[1].neighbor_cells(), nb2);
    assert_eq!(layer.neighbor_cells(), [nb1, nb2].concat());

    let first_line = |name: &str| faults[name].layer(0).unwrap()[0].neighbor_cells();
    assert_eq!(first_line("FY0"), vec![(None, Some(0)), (None, Some(1)), (None, Some(2))]);
    let top = nx * (ny - 1);
    assert_eq!(
        first_line("FYNY"),
        vec![(Some(top), None), (Some(top + 1), None), (Some(top + 2), None)]
    );
    assert_eq!(
        first_line("FX"),
        vec![
            (Some(0), Some(1)),
            (Some(nx), Some(nx + 1)),
            (Some(2 * nx), Some(2 * nx + 1))
        ]
    );
    assert_eq!(
        first_line("FX0"),
        vec![(None, Some(0)), (None, Some(nx)), (None, Some(2 * nx))]
    );
    assert_eq!(
        first_line("FXNX"),
        vec![
            (Some(nx - 1), None),
            (Some(2 * nx - 1), None),
            (Some(3 * nx - 1), None)
        ]
    );
}

#[test]
fn split_traces_count_lines() {
    let g = RectGrid::unit((10, 10, 1));
    let mut f1 = Fault::new(&g, "F1");
    f1.add_face_record(0, 3, 1, 1, 0, 0, "Y").unwrap();
    f1.add_face_record(5, 7, 1, 1, 0, 0, "Y").unwrap();
    let mut f2 = Fault::new(&g, "F2");
    f2.add_face_record(0, 7, 1, 1, 0, 0, "Y").unwrap();
    assert_eq!(f1.num_lines(0).unwrap(), 2);
    assert_eq!(f2.num_lines(0).unwrap(), 1);
    assert!(f1.num_lines(1).is_err());
}

#[test]
fn end_rays_and_join() {
    let g = RectGrid::unit((100, 100, 10));
    let [f1, _, f3, _] = four_faults(&g);
    let (r0, r1) = f1.end_rays(0).unwrap();
    assert_eq!(r0, IntRay { origin: (2, 10), dir: (0, -1) });
    assert_eq!(r1, IntRay { origin: (2, 100), dir: (0, 1) });

    let join = Fault::join_faults(&f1, &f3, 0).unwrap();
    assert_eq!(join, vec![(2, 10), (2, 6), (5, 6)]);
}

#[test]
fn join_requires_unique_pairing() {
    let g = RectGrid::unit((100, 100, 10));
    let [f1, _, _, f4] = four_faults(&g);
    // Two parallel verticals: no pairing meets.
    let err = Fault::join_faults(&f1, &f4, 0).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Faults Fault1 and Fault4 could not be uniquely joined"
    );
}

#[test]
fn fault_ray_table() {
    let r = |origin: Ij, dir: (i64, i64)| IntRay { origin, dir };
    let p1 = (0, 0);
    let dir1 = (1, 0);
    assert!(Fault::intersect_fault_rays(&r(p1, dir1), &r((0, 0), (0, 1)))
        .unwrap()
        .is_empty());

    let never = [
        (r(p1, dir1), r((-1, 0), (-1, 0))),
        (r((-1, 0), (-1, 0)), r(p1, dir1)),
        (r(p1, dir1), r((0, 1), (1, 0))),
        (r(p1, dir1), r((0, 1), (-1, 0))),
        (r(p1, dir1), r((1, 1), (1, 0))),
        (r(p1, dir1), r((1, 1), (0, 1))),
        (r(p1, dir1), r((0, 1), (0, 1))),
        (r(p1, dir1), r((-1, 0), (0, 1))),
        (r(p1, dir1), r((-1, 1), (0, 1))),
        (r(p1, dir1), r((-1, 1), (0, -1))),
        (r(p1, dir1), r((3, -1), (0, -1))),
    ];
    for (a, b) in &never {
        assert_eq!(
            Fault::intersect_fault_rays(a, b).unwrap_err(),
            FaultError::RaysNeverIntersect,
            "{a:?} {b:?}"
        );
    }

    let meets = [
        (r((-1, 0), dir1), r(p1, (-1, 0)), vec![(-1, 0), p1]),
        (r(p1, (-1, 0)), r((-1, 0), dir1), vec![p1, (-1, 0)]),
        (r(p1, dir1), r((1, 0), (1, 0)), vec![p1, (1, 0)]),
        (r(p1, dir1), r((1, -1), (0, 1)), vec![p1, (1, 0), (1, -1)]),
        (r(p1, dir1), r((1, 1), (0, -1)), vec![p1, (1, 0), (1, 1)]),
        (r(p1, dir1), r((0, 3), (0, -1)), vec![p1, (0, 3)]),
        (r(p1, dir1), r((3, 0), (0, -1)), vec![p1, (3, 0)]),
    ];
    for (a, b, path) in &meets {
        assert_eq!(&Fault::intersect_fault_rays(a, b).unwrap(), path);
    }
}

#[test]
fn extend_to_fault_cases() {
    let g = RectGrid::unit((100, 100, 10));
    let [f1, f2, f3, f4] = four_faults(&g);

    for other in [&f2, &f3, &f4] {
        assert!(matches!(
            f1.extend_to_fault(other, 0),
            Err(FaultError::CannotExtend { .. })
        ));
    }
    assert!(f2.extend_to_fault(&f3, 0).is_err());
    for other in [&f1, &f2, &f4] {
        assert!(f3.extend_to_fault(other, 0).is_err());
    }
    for other in [&f1, &f2, &f3] {
        assert!(f4.extend_to_fault(other, 0).is_err());
    }

    let ext21 = f2.extend_to_fault(&f1, 0).unwrap().unwrap();
    assert_relative_eq!(ext21[0], vector![5.0, 16.0]);
    assert_relative_eq!(ext21[1], vector![2.0, 16.0]);

    let ext24 = f2
        .extend_to_edge(Target::from(&f4), 0)
        .unwrap()
        .unwrap();
    assert_relative_eq!(ext24[0], vector![11.0, 16.0]);
    assert_relative_eq!(ext24[1], vector![21.0, 16.0]);

    // A ray crossing the target twice stops on the earlier target segment,
    // not on the hit closest to the fault.
    let zigzag = Polyline::from_xy([(30.0, 10.0), (30.0, 20.0), (20.0, 20.0), (20.0, 10.0)]);
    let ext = f2.extend_to_polyline(&zigzag, 0).unwrap().unwrap();
    assert_relative_eq!(ext[0], vector![11.0, 16.0]);
    assert_relative_eq!(ext[1], vector![30.0, 16.0]);
    let ext = f2
        .extend_to_edge(Target::from(&zigzag), 0)
        .unwrap()
        .unwrap();
    assert_relative_eq!(ext[1], vector![30.0, 16.0]);

    let err = f1.extend_to_fault(&f2, 0).unwrap_err();
    assert_eq!(
        err.to_string(),
        "The fault Fault1 can not be extended to intersect with:Fault2"
    );
}

#[test]
fn contact_with_self_and_polylines() {
    let g = RectGrid::unit((100, 100, 10));
    let [f1, ..] = four_faults(&g);
    assert!(f1.intersects_fault(&f1, 0).unwrap());

    let g = RectGrid::new((100, 100, 10), (0.25, 0.25, 1.0));
    let [.., f4] = four_faults(&g);
    assert!(f4
        .intersects_polyline(&Polyline::from_xy([(4.0, 4.0), (8.0, 4.0)]), 0)
        .unwrap());
    assert!(!f4
        .intersects_polyline(&Polyline::from_xy([(8.0, 4.0), (16.0, 4.0)]), 0)
        .unwrap());
}

// o   o   o   o
//
// o---o---o---o
//
// o===+   o   o
// |
// o   o   o   o
#[test]
fn extend_and_end_join_against_polyline() {
    let g = RectGrid::unit((3, 3, 1));
    let mut f1 = Fault::new(&g, "Fault");
    f1.add_face_record(0, 0, 0, 0, 0, 0, "X-").unwrap();
    f1.add_face_record(0, 0, 0, 0, 0, 0, "Y").unwrap();
    let mut f2 = Fault::new(&g, "Fault2");
    f2.add_face_record(0, 2, 1, 1, 0, 0, "Y").unwrap();

    let polyline = Polyline::from_xy([(0.0, 2.0), (3.0, 2.0)]);
    let ext = f1.extend_to_polyline(&polyline, 0).unwrap().unwrap();
    assert_relative_eq!(ext[0], vector![1.0, 1.0]);
    assert_relative_eq!(ext[1], vector![2.0, 2.0], epsilon = 1e-12);

    let j1 = f1.end_join(Target::from(&polyline), 0).unwrap().unwrap();
    let j2 = f1.end_join(Target::from(&f2), 0).unwrap().unwrap();
    assert_eq!(j1, [vector![1.0, 1.0], vector![0.0, 2.0]]);
    assert_eq!(j2, j1);

    let crossing = Polyline::from_xy([(0.8, 2.0), (0.8, 0.8)]);
    assert!(f1.end_join(Target::from(&crossing), 0).unwrap().is_none());
    assert!(f1.extend_to_polyline(&crossing, 0).unwrap().is_none());
}

// o   o   o   o
//
// o---o---o---o
//
// o===o===o===o
//
// o   o   o   o
#[test]
fn extend_polyline_onto_fault() {
    let g = RectGrid::unit((3, 3, 1));
    let mut f = Fault::new(&g, "Fault");
    f.add_face_record(0, 2, 0, 0, 0, 0, "Y").unwrap();

    let single = Polyline::from_xy([(0.0, 2.0)]);
    assert_eq!(
        f.extend_polyline_onto(&single, 0).unwrap_err(),
        FaultError::PolylineTooShort { len: 1 }
    );

    let parallel = Polyline::from_xy([(0.0, 2.0), (3.0, 2.0)]);
    assert!(f.extend_polyline_onto(&parallel, 0).unwrap().is_none());

    let above = Polyline::from_xy([(1.0, 3.0), (1.0, 2.0)]);
    let ext = f.extend_polyline_onto(&above, 0).unwrap().unwrap();
    assert_eq!(ext, [vector![1.0, 2.0], vector![1.0, 1.0]]);

    let crossing = Polyline::from_xy([(1.0, 3.0), (1.0, 0.0)]);
    assert!(f.extend_polyline_onto(&crossing, 0).unwrap().is_none());
}

// o   o   o   o   o
//
// o   o   o   o   o
//
// o---o---o---o---o
//
// o   o   o   o   o
//         |
// o   o   o   o   o
#[test]
fn connect_with_faults_and_polylines() {
    let g = RectGrid::unit((4, 4, 1));
    let mut f1 = Fault::new(&g, "Fault1");
    f1.add_face_record(0, 3, 1, 1, 0, 0, "Y").unwrap();
    let mut f2 = Fault::new(&g, "Fault2");
    f2.add_face_record(1, 1, 0, 0, 0, 0, "X").unwrap();
    let mut f3 = Fault::new(&g, "Fault3");
    f3.add_face_record(1, 1, 0, 2, 0, 0, "X").unwrap();

    let f1_pl = f1.polyline(0).unwrap();
    assert!(f3.connect(Target::from(&f1), 0).unwrap().is_none());
    assert!(f3.connect(Target::from(&f1_pl), 0).unwrap().is_none());
    let slanted = Polyline::from_xy([(4.0, 4.0), (1.0, 2.0)]);
    assert!(f3.connect(Target::from(&slanted), 0).unwrap().is_none());

    let hit = f2.connect(Target::from(&f1), 0).unwrap().unwrap();
    assert_eq!(hit, [vector![2.0, 1.0], vector![2.0, 2.0]]);

    // No direct hit: the ray meets the extension of the target's end segment.
    let short = Polyline::from_xy([(0.0, 0.0), (1.0, 2.0)]);
    let via = f2.connect(Target::from(&short), 0).unwrap().unwrap();
    assert_relative_eq!(via[0], vector![2.0, 1.0]);
    assert_relative_eq!(via[1], vector![2.0, 4.0], epsilon = 1e-9);
}

#[test]
#[should_panic(expected = "Logical error - must intersect with bounding box")]
fn extend_to_bbox_miss_panics() {
    let bbox = Polyline::from_xy([(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);
    let g = RectGrid::unit((4, 4, 1));
    let mut f1 = Fault::new(&g, "Fault1");
    f1.add_face_record(0, 3, 1, 1, 0, 0, "Y").unwrap();
    let _ = f1.extend_to_bbox(&bbox, 0, true);
}

#[test]
fn extend_to_bbox_hits() {
    let bbox = Polyline::from_xy([(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);
    let g = RectGrid::unit((4, 4, 1));
    let mut f1 = Fault::new(&g, "Fault1");
    f1.add_face_record(0, 3, 1, 1, 0, 0, "Y").unwrap();
    let mut f2 = Fault::new(&g, "Fault2");
    f2.add_face_record(1, 1, 0, 1, 0, 0, "X").unwrap();

    let line1 = f1.extend_to_bbox(&bbox, 0, false).unwrap();
    assert_eq!(line1.name.as_deref(), Some("Extend:Fault1"));
    assert_eq!(line1, Polyline::from_xy([(4.0, 2.0), (10.0, 2.0)]));

    let line2 = f2.extend_to_bbox(&bbox, 0, true).unwrap();
    assert_eq!(line2.name.as_deref(), Some("Extend:Fault2"));
    assert_eq!(line2, Polyline::from_xy([(2.0, 0.0), (2.0, 0.0)]));

    let mut anon = Fault::new(&g, "");
    anon.add_face_record(1, 1, 0, 1, 0, 0, "X").unwrap();
    assert!(anon.extend_to_bbox(&bbox, 0, true).unwrap().name.is_none());
}

#[test]
fn missing_layer_propagates() {
    let g = RectGrid::unit((4, 4, 2));
    let mut f = Fault::new(&g, "F");
    f.add_face_record(1, 1, 0, 1, 0, 0, "X").unwrap();
    let pl = Polyline::from_xy([(0.0, 0.0), (1.0, 0.0)]);
    assert!(matches!(f.polyline(1), Err(FaultError::MissingLayer { k: 1, .. })));
    assert!(f.extend_to_polyline(&pl, 1).is_err());
    assert!(f.connect(Target::from(&pl), 1).is_err());
    assert!(f.end_rays(1).is_err());
}

/// Monotone staircase of `steps` unit moves starting at `(x0, y0)`.
fn staircase(g: &RectGrid, (x0, y0): (usize, usize), steps: &[bool]) -> Vec<FaultSegment> {
    let stride = g.nx() + 1;
    let (mut i, mut j) = (x0, y0);
    let mut out = Vec::with_capacity(steps.len());
    for &right in steps {
        let c1 = i + j * stride;
        if right {
            i += 1;
        } else {
            j += 1;
        }
        out.push(FaultSegment::new(c1, i + j * stride));
    }
    out
}

proptest! {
    #[test]
    fn shuffled_staircase_chains_into_one_line(
        steps in prop::collection::vec(any::<bool>(), 1..40),
        seed in any::<u64>(),
    ) {
        let g = RectGrid::unit((50, 50, 1));
        let mut segments = staircase(&g, (2, 3), &steps);
        let mut rng = StdRng::seed_from_u64(seed);
        segments.shuffle(&mut rng);
        for s in &mut segments {
            if rng.gen_bool(0.5) {
                s.swap();
            }
        }

        let mut layer = Layer::new(&g, 0);
        for s in &segments {
            layer.add_segment(*s);
        }
        prop_assert_eq!(layer.len(), 1);
        let line = &layer[0];
        line.verify();
        prop_assert_eq!(line.len(), steps.len());
        // The lower-left end has the smaller corner index and starts the chain.
        prop_assert_eq!(line.ij_polyline()[0], (2, 3));
    }

    #[test]
    fn disjoint_paths_partition_exactly(
        paths in prop::collection::vec(prop::collection::vec(any::<bool>(), 1..8), 1..5),
        seed in any::<u64>(),
    ) {
        let g = RectGrid::unit((50, 60, 1));
        let mut all: Vec<FaultSegment> = Vec::new();
        for (p, steps) in paths.iter().enumerate() {
            all.extend(staircase(&g, (1, 1 + 10 * p), steps));
        }
        let mut shuffled = all.clone();
        shuffled.shuffle(&mut StdRng::seed_from_u64(seed));

        let mut layer = Layer::new(&g, 0);
        for s in shuffled {
            layer.add_segment(s);
        }
        prop_assert_eq!(layer.len(), paths.len());
        let mut seen: Vec<FaultSegment> = layer.iter().flat_map(|l| l.iter().copied()).collect();
        prop_assert_eq!(seen.len(), all.len());
        seen.sort_by_key(|s| (s.c1().min(s.c2()), s.c1().max(s.c2())));
        all.sort_by_key(|s| (s.c1().min(s.c2()), s.c1().max(s.c2())));
        prop_assert_eq!(seen, all);
        for line in &layer {
            line.verify();
        }
    }

    #[test]
    fn segment_equality_ignores_orientation(a in 0usize..1000, b in 0usize..1000) {
        let s = FaultSegment::new(a, b);
        prop_assert_eq!(s, s.swapped());
        prop_assert!(s == FaultSegment::new(b, a));
        prop_assert_eq!(corners(&s.swapped()), (b, a));
    }

    #[test]
    fn joins_is_symmetric_and_ignores_orientation(
        a in 0usize..40, b in 0usize..40, c in 0usize..40, d in 0usize..40,
    ) {
        let s = FaultSegment::new(a, b);
        let t = FaultSegment::new(c, d);
        let expected = a == c || a == d || b == c || b == d;
        prop_assert_eq!(s.joins(&t), expected);
        prop_assert_eq!(s.joins(&t), t.joins(&s));
        prop_assert_eq!(s.swapped().joins(&t), expected);
        prop_assert_eq!(s.joins(&t.swapped()), expected);
    }
}
