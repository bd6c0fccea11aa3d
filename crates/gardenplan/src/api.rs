//! Curated function surface for UI collaborators.
//!
//! Thin, stable-named wrappers over the modules. Inputs are snapshots; every
//! call recomputes from scratch and holds no state between calls.

use crate::cfg::ResolveCfg;
use crate::constraints::ConstraintSet;
use crate::geom::Metric;
use crate::model::{CoordinateMode, DistanceConstraint, GpsCoord, PlanarPosition, Point, Resolution};
use crate::resolve;
use crate::units::Unit;
use nalgebra::Vector2;

pub use crate::geom::{angle_at, circle_area, circle_perimeter, gps_polygon_area};
pub use crate::metrics::{compute_garden_metrics, compute_metrics, compute_metrics_with};
pub use crate::suggest::layout_suggestions;
pub use crate::units::{convert_area, convert_unit, format_area, format_distance};
pub use crate::validate::{validate_garden, ValidationError};

/// Positions for every point, in registry order, expressed in `unit`.
pub fn resolve_positions(
    points: &[Point],
    constraints: &[DistanceConstraint],
    mode: CoordinateMode,
    unit: Unit,
    cfg: ResolveCfg,
) -> Resolution {
    let set = ConstraintSet::new(constraints, unit, cfg.duplicates);
    resolve::resolve(points, &set, mode, cfg)
}

/// Two positions in either coordinate mode.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Endpoints {
    Planar(PlanarPosition, PlanarPosition),
    Gps(GpsCoord, GpsCoord),
}

/// Euclidean distance for planar endpoints, haversine meters for GPS.
pub fn distance(endpoints: Endpoints) -> f64 {
    match endpoints {
        Endpoints::Planar(a, b) => a.distance_to(&b),
        Endpoints::Gps(a, b) => a.distance_to(&b),
    }
}

/// Shoelace area over planar positions; 0 below three points.
pub fn polygon_area(points: &[PlanarPosition]) -> f64 {
    let ring: Vec<Vector2<f64>> = points.iter().map(|p| p.to_vec2()).collect();
    crate::geom::polygon_area(&ring)
}

/// Closed-ring perimeter over planar positions.
pub fn perimeter(points: &[PlanarPosition]) -> f64 {
    crate::geom::perimeter(points)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> (Vec<Point>, Vec<DistanceConstraint>) {
        let points = ["a", "b", "c", "d"]
            .iter()
            .map(|id| Point::new(*id, id.to_uppercase()))
            .collect();
        let m = |id: &str, a: &str, b: &str, d: f64| {
            DistanceConstraint::new(id, a, b, d, Unit::Feet)
        };
        let constraints = vec![
            m("ab", "a", "b", 10.0),
            m("bc", "b", "c", 10.0),
            m("cd", "c", "d", 10.0),
            m("da", "d", "a", 10.0),
            m("ac", "a", "c", 200f64.sqrt()),
        ];
        (points, constraints)
    }

    #[test]
    fn resolve_positions_in_requested_unit() {
        let (points, constraints) = square();
        let r = resolve_positions(
            &points,
            &constraints,
            CoordinateMode::Local,
            Unit::Meters,
            ResolveCfg::default(),
        );
        assert!(r.is_complete());
        let b = r.resolved_position("b").unwrap();
        assert!((b - Vector2::new(10.0 / 3.28084, 0.0)).norm() < 1e-9);
    }

    #[test]
    fn distance_by_mode() {
        let planar = Endpoints::Planar(
            PlanarPosition::new(0.0, 0.0),
            PlanarPosition::new(3.0, 4.0),
        );
        assert!((distance(planar) - 5.0).abs() < 1e-12);
        let same = GpsCoord::new(47.0, 8.0);
        assert_eq!(distance(Endpoints::Gps(same, same)), 0.0);
        let d = distance(Endpoints::Gps(GpsCoord::new(0.0, 0.0), GpsCoord::new(0.0, 1.0)));
        assert!((d - 111_320.0).abs() / 111_320.0 < 0.01);
    }

    #[test]
    fn planar_perimeter_and_formatting() {
        let ring: Vec<PlanarPosition> = [(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]
            .iter()
            .map(|&(x, y)| PlanarPosition::new(x, y))
            .collect();
        assert!((perimeter(&ring) - 40.0).abs() < 1e-12);
        assert!((polygon_area(&ring) - 100.0).abs() < 1e-12);
        assert_eq!(polygon_area(&ring[..2]), 0.0);
        assert_eq!(format_distance(perimeter(&ring), Unit::Meters), "40.00 m");
        assert_eq!(format_area(100.0, Unit::Feet), "100.00 ft²");
    }

    #[test]
    fn metrics_through_the_surface() {
        let (points, constraints) = square();
        let m = compute_metrics(&points, &constraints);
        assert!(m.is_valid);
        assert!((m.area - 100.0).abs() < 1e-9);
        assert_eq!(m.unit, Unit::Feet);
    }
}
