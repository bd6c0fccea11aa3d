use super::*;
use crate::cfg::{DuplicatePolicy, ResolveCfg};
use crate::constraints::ConstraintSet;
use crate::geodesy::haversine_distance;
use crate::model::{DistanceConstraint, GpsCoord, Point};
use crate::units::Unit;
use nalgebra::vector;

fn pts(labels: &[&str]) -> Vec<Point> {
    labels
        .iter()
        .map(|l| Point::new(l.to_lowercase(), *l))
        .collect()
}

fn m(a: &str, b: &str, d: f64) -> DistanceConstraint {
    DistanceConstraint::new(format!("{a}{b}"), a, b, d, Unit::Meters)
}

fn square_constraints() -> Vec<DistanceConstraint> {
    vec![
        m("a", "b", 10.0),
        m("b", "c", 10.0),
        m("c", "d", 10.0),
        m("d", "a", 10.0),
        m("a", "c", 200f64.sqrt()),
    ]
}

fn local(points: &[Point], cs: &[DistanceConstraint]) -> Resolution {
    let set = ConstraintSet::new(cs, Unit::Meters, DuplicatePolicy::FirstMatch);
    resolve_local(points, &set, ResolveCfg::default())
}

#[test]
fn empty_and_single_point() {
    assert!(local(&[], &[]).is_empty());
    let r = local(&pts(&["A"]), &[]);
    assert_eq!(r.len(), 1);
    assert!(r.points[0].resolved);
    assert_eq!(r.points[0].position.to_vec2(), vector![0.0, 0.0]);
}

#[test]
fn square_is_reconstructed_counter_clockwise() {
    let r = local(&pts(&["A", "B", "C", "D"]), &square_constraints());
    assert!(r.is_complete());
    let expect = [
        vector![0.0, 0.0],
        vector![10.0, 0.0],
        vector![10.0, 10.0],
        vector![0.0, 10.0],
    ];
    for (p, e) in r.points.iter().zip(expect) {
        assert!((p.position.to_vec2() - e).norm() < 1e-9, "{} at {:?}", p.id, p.position);
    }
}

#[test]
fn missing_gauge_edge_leaves_second_point_to_later_passes() {
    // No A-B edge: B has no placed neighbor and C only one, so both stay put.
    let points = pts(&["A", "B", "C"]);
    let cs = vec![m("a", "c", 5.0), m("b", "c", 5.0)];
    let r = local(&points, &cs);
    assert!(r.points[0].resolved);
    assert!(!r.points[1].resolved);
    assert!(!r.points[2].resolved);
    // Fallback spacing (index*10, index*5).
    assert_eq!(r.points[2].position.to_vec2(), vector![20.0, 10.0]);
}

#[test]
fn gauge_fallback_distance_is_opt_in() {
    let points = pts(&["A", "B", "C"]);
    let cs = vec![m("a", "c", 5.0), m("b", "c", 5.0)];
    let set = ConstraintSet::new(&cs, Unit::Meters, DuplicatePolicy::FirstMatch);
    let cfg = ResolveCfg {
        gauge_fallback: Some(6.0),
        ..ResolveCfg::default()
    };
    let r = resolve_local(&points, &set, cfg);
    assert!(r.is_complete());
    let c = r.points[2].position.to_vec2();
    assert!((c - vector![3.0, 4.0]).norm() < 1e-9);
}

#[test]
fn triangle_inequality_violation_leaves_point_unresolved() {
    let points = pts(&["A", "B", "C"]);
    let cs = vec![m("a", "b", 10.0), m("b", "c", 1.0), m("a", "c", 50.0)];
    let r = local(&points, &cs);
    assert!(r.points[1].resolved);
    assert!(!r.points[2].resolved);
    assert_eq!(r.unresolved_ids().collect::<Vec<_>>(), vec!["c"]);
}

#[test]
fn inconsistent_third_reference_rejects_candidate() {
    // D from A and B lands at (0,10); C claims D is 30 away instead of 10.
    let points = pts(&["A", "B", "C", "D"]);
    let cs = vec![
        m("a", "b", 10.0),
        m("b", "c", 10.0),
        m("a", "c", 200f64.sqrt()),
        m("d", "a", 10.0),
        m("d", "b", 200f64.sqrt()),
        m("d", "c", 30.0),
    ];
    let r = local(&points, &cs);
    assert!(r.points[2].resolved);
    assert!(!r.points[3].resolved);

    // With a consistent third distance the same point resolves.
    let mut ok = cs.clone();
    ok[5] = m("d", "c", 10.0);
    let r = local(&points, &ok);
    assert!(r.is_complete());
    assert!((r.points[3].position.to_vec2() - vector![0.0, 10.0]).norm() < 1e-9);
}

#[test]
fn later_pass_resolves_out_of_order_points() {
    // D depends on C, which appears after it in registry order.
    let points = pts(&["A", "B", "D", "C"]);
    let cs = vec![
        m("a", "b", 4.0),
        m("a", "c", 5.0),
        m("b", "c", 3.0),
        m("d", "c", 4.0),
        m("d", "a", 3.0),
    ];
    let r = local(&points, &cs);
    assert!(r.is_complete());
    let c = r.get("c").unwrap().position.to_vec2();
    let d = r.get("d").unwrap().position.to_vec2();
    assert!((c - vector![4.0, 3.0]).norm() < 1e-9);
    assert!(((d - c).norm() - 4.0).abs() < 1e-9);
    assert!((d.norm() - 3.0).abs() < 1e-9);
}

#[test]
fn planar_hints_replace_gauge() {
    let points = vec![
        Point::planar("a", "A", 5.0, 5.0),
        Point::new("b", "B"),
        Point::planar("c", "C", 11.0, 5.0),
    ];
    let cs = vec![m("a", "b", 5.0), m("b", "c", 5.0)];
    let r = local(&points, &cs);
    assert!(r.is_complete());
    // A→C runs along +x, so the CCW root sits above.
    assert!((r.points[1].position.to_vec2() - vector![8.0, 9.0]).norm() < 1e-9);
}

#[test]
fn dispatch_by_mode() {
    let points = pts(&["A", "B", "C", "D"]);
    let cs = square_constraints();
    let set = ConstraintSet::new(&cs, Unit::Meters, DuplicatePolicy::FirstMatch);
    let r = resolve(&points, &set, CoordinateMode::Local, ResolveCfg::default());
    assert!(r.is_complete());
    // Free points have no GPS: everything falls back.
    let g = resolve(&points, &set, CoordinateMode::Gps, ResolveCfg::default());
    assert_eq!(g.resolved_count(), 0);
    assert_eq!(g.len(), 4);
}

#[test]
fn gps_offsets_follow_predecessor() {
    let points = vec![
        Point::gps("a", "A", 51.5, -0.12),
        Point::offset("b", "B", 20.0, Unit::Meters, 90.0),
        Point::offset("c", "C", 20.0, Unit::Meters, 0.0),
        Point::offset("d", "D", 20.0, Unit::Meters, 270.0),
    ];
    let coords = gps_positions(&points);
    let c: Vec<GpsCoord> = coords.iter().map(|c| c.unwrap()).collect();
    for k in 1..4 {
        assert!((haversine_distance(c[k - 1], c[k]) - 20.0).abs() < 1e-6);
    }

    let r = resolve_gps(&points, Unit::Meters, ResolveCfg::default());
    assert!(r.is_complete());
    let a = r.points[0].position.to_vec2();
    let b = r.points[1].position.to_vec2();
    let cc = r.points[2].position.to_vec2();
    assert!((b - a).x > 19.0 && (b - a).y.abs() < 0.1);
    assert!((cc - b).y > 19.0);
    // Centered on the centroid.
    let sum: nalgebra::Vector2<f64> = r.points.iter().map(|p| p.position.to_vec2()).sum();
    assert!(sum.norm() < 1e-6);

    let feet = resolve_gps(&points, Unit::Feet, ResolveCfg::default());
    let bf = feet.points[1].position.to_vec2() - feet.points[0].position.to_vec2();
    assert!((bf.norm() - (b - a).norm() * 3.28084).abs() < 1e-6);
}

#[test]
fn gps_offset_in_feet_and_orphan_offsets() {
    let points = vec![
        Point::offset("x", "X", 5.0, Unit::Meters, 10.0),
        Point::gps("a", "A", 10.0, 10.0),
        Point::offset("b", "B", 32.8084, Unit::Feet, 180.0),
    ];
    let coords = gps_positions(&points);
    assert!(coords[0].is_none());
    let d = haversine_distance(coords[1].unwrap(), coords[2].unwrap());
    assert!((d - 10.0).abs() < 1e-6);

    let r = resolve_gps(&points, Unit::Meters, ResolveCfg::default());
    assert!(!r.points[0].resolved);
    assert_eq!(r.points[0].position.to_vec2(), vector![0.0, 0.0]);
    assert!(r.points[1].resolved && r.points[2].resolved);
}

#[test]
fn passes_report_why_they_stopped() {
    let points = pts(&["A", "B", "D", "C"]);
    let cs = vec![
        m("a", "b", 4.0),
        m("a", "c", 5.0),
        m("b", "c", 3.0),
        m("d", "c", 4.0),
        m("d", "a", 3.0),
    ];
    let set = ConstraintSet::new(&cs, Unit::Meters, DuplicatePolicy::FirstMatch);
    let seeded = || vec![Some(vector![0.0, 0.0]), Some(vector![4.0, 0.0]), None, None];

    let mut pos = seeded();
    assert_eq!(run_passes(&points, &mut pos, &set, 0.05, 8), (2, Stop::Complete));
    let mut pos = seeded();
    assert_eq!(run_passes(&points, &mut pos, &set, 0.05, 1), (1, Stop::PassCap));
    assert!(pos[3].is_some() && pos[2].is_none());

    let stuck = vec![m("a", "b", 4.0), m("a", "c", 5.0)];
    let set = ConstraintSet::new(&stuck, Unit::Meters, DuplicatePolicy::FirstMatch);
    let mut pos = seeded();
    assert_eq!(run_passes(&points, &mut pos, &set, 0.05, 8), (1, Stop::FixedPoint));
}

fn all_finite(r: &Resolution) -> bool {
    r.points
        .iter()
        .all(|p| p.position.x.is_finite() && p.position.y.is_finite())
}

#[test]
fn non_finite_and_non_positive_distances_do_not_place_points() {
    for bad in [f64::NAN, f64::INFINITY, 0.0, -10.0] {
        let points = pts(&["A", "B", "C"]);
        let cs = vec![m("a", "b", 10.0), m("b", "c", bad), m("a", "c", 10.0)];
        let r = local(&points, &cs);
        assert!(all_finite(&r), "bad = {bad}");
        assert!(r.points[1].resolved);
        assert!(!r.points[2].resolved, "bad = {bad}");

        // A bad gauge edge leaves the second point to the passes.
        let cs = vec![m("a", "b", bad), m("b", "c", 10.0), m("a", "c", 10.0)];
        let r = local(&points, &cs);
        assert!(all_finite(&r), "bad = {bad}");
        assert!(!r.points[1].resolved && !r.points[2].resolved, "bad = {bad}");
    }

    let mut diag_nan = square_constraints();
    diag_nan[4] = m("a", "c", f64::NAN);
    let r = local(&pts(&["A", "B", "C", "D"]), &diag_nan);
    assert!(all_finite(&r));
    assert_eq!(r.unresolved_ids().collect::<Vec<_>>(), vec!["c", "d"]);
}

#[test]
fn non_finite_gauge_fallback_and_hints_are_ignored() {
    let points = pts(&["A", "B", "C"]);
    let cs = vec![m("b", "c", 3.0), m("a", "c", 4.0)];
    let set = ConstraintSet::new(&cs, Unit::Meters, DuplicatePolicy::FirstMatch);
    let cfg = ResolveCfg {
        gauge_fallback: Some(f64::NAN),
        ..ResolveCfg::default()
    };
    let r = resolve_local(&points, &set, cfg);
    assert!(all_finite(&r));
    assert!(!r.points[1].resolved);

    let hinted = vec![
        Point::planar("a", "A", 0.0, 0.0),
        Point::planar("b", "B", f64::NAN, 1.0),
        Point::new("c", "C"),
    ];
    let r = local(&hinted, &[m("a", "c", 2.0)]);
    assert!(all_finite(&r));
    assert!(r.points[0].resolved);
    assert!(!r.points[1].resolved);
}

#[test]
fn gps_offsets_with_non_finite_values_stay_unresolved() {
    let points = vec![
        Point::gps("a", "A", 51.5, -0.12),
        Point::offset("b", "B", 20.0, Unit::Meters, f64::NAN),
        Point::offset("c", "C", 20.0, Unit::Meters, 90.0),
        Point::gps("d", "D", 51.5001, -0.12),
        Point::offset("e", "E", f64::INFINITY, Unit::Meters, 0.0),
    ];
    let coords = gps_positions(&points);
    assert!(coords[0].is_some() && coords[3].is_some());
    assert!(coords[1].is_none() && coords[2].is_none() && coords[4].is_none());

    let r = resolve_gps(&points, Unit::Meters, ResolveCfg::default());
    assert!(all_finite(&r));
    assert_eq!(r.unresolved_ids().collect::<Vec<_>>(), vec!["b", "c", "e"]);
}
