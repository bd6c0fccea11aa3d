//! Metrics Aggregator: resolution + geometry + consistency diagnostics.
//!
//! Pipeline
//! - Fewer than 3 points: fail fast (`is_valid = false`, zeroed metrics).
//! - Resolve positions, keep the resolved points in registry order.
//! - Fewer than 3 resolved: invalid, positions still surfaced for rendering.
//! - Area/perimeter of the resolved ring, vertex angles for interior points.
//! - Cross-check every constraint against the layout; each miss beyond
//!   `stated × tolerance` adds `"{A}-{B}: {diff} {unit} off"` and invalidates.
//!   Measurements that are not finite and positive always invalidate, placed
//!   or not.
//!
//! A result can carry numbers and still be invalid. Callers must read
//! `is_valid`, not the presence of an area.

use std::collections::{BTreeMap, HashMap};

use nalgebra::Vector2;
use tracing::debug;

use crate::cfg::ResolveCfg;
use crate::constraints::{is_usable_distance, ConstraintSet};
use crate::geom::{angle_at, circle_area, circle_perimeter, perimeter, polygon_area};
use crate::model::{
    CoordinateMode, DistanceConstraint, GardenData, MetricsResult, Point, ResolvedPoint, Shape,
    ShapeKind,
};
use crate::resolve::{GpsResolver, PositionResolver, Trilateration};
use crate::units::Unit;

/// Minimum number of points for area and perimeter to mean anything.
pub const MIN_POLYGON_POINTS: usize = 3;

pub const NEED_MORE_POINTS: &str = "need at least 3 points";

/// Local-mode metrics with default configuration.
///
/// The working unit is the unit of the first constraint (meters if none).
pub fn compute_metrics(points: &[Point], constraints: &[DistanceConstraint]) -> MetricsResult {
    let unit = constraints.first().map(|c| c.unit).unwrap_or_default();
    let cfg = ResolveCfg::default();
    compute_metrics_with(&Trilateration::new(cfg), points, constraints, unit, cfg)
}

/// Metrics with an explicit resolver, working unit, and configuration.
pub fn compute_metrics_with<R: PositionResolver + ?Sized>(
    resolver: &R,
    points: &[Point],
    constraints: &[DistanceConstraint],
    unit: Unit,
    cfg: ResolveCfg,
) -> MetricsResult {
    if points.len() < MIN_POLYGON_POINTS {
        return MetricsResult {
            is_valid: false,
            error_message: Some(NEED_MORE_POINTS.to_string()),
            unit,
            ..MetricsResult::default()
        };
    }

    let set = ConstraintSet::new(constraints, unit, cfg.duplicates);
    let resolution = resolver.resolve(points, &set);
    let ordered = resolution.resolved_positions();
    let labels: HashMap<&str, &str> = points
        .iter()
        .map(|p| (p.id.as_str(), p.label.as_str()))
        .collect();
    let label = |id: &str| labels.get(id).copied().unwrap_or(id).to_string();

    let unresolved: Vec<String> = resolution.unresolved_ids().map(label).collect();
    let mut problems: Vec<String> = Vec::new();
    if !unresolved.is_empty() {
        problems.push(format!("could not place: {}", unresolved.join(", ")));
    }

    if ordered.len() < MIN_POLYGON_POINTS {
        problems.insert(
            0,
            format!(
                "only {} of {} points could be placed; {NEED_MORE_POINTS}",
                ordered.len(),
                points.len()
            ),
        );
        return MetricsResult {
            is_valid: false,
            error_message: Some(problems.join("; ")),
            positions: resolution.points,
            unit,
            ..MetricsResult::default()
        };
    }

    let ring: Vec<Vector2<f64>> = ordered.iter().map(|(_, p)| *p).collect();
    let area = polygon_area(&ring);
    let perim = perimeter(&ring);
    let angles = vertex_angles(&ordered);

    let lookup: HashMap<&str, Vector2<f64>> = ordered.iter().copied().collect();
    let mismatches = cross_check(constraints, &lookup, &label, unit, cfg.tolerance);
    if !mismatches.is_empty() {
        debug!(count = mismatches.len(), "constraint mismatches");
        problems.push(format!(
            "measurements are inconsistent: {}",
            mismatches.join(", ")
        ));
    }

    MetricsResult {
        area,
        perimeter: perim,
        is_valid: problems.is_empty(),
        error_message: (!problems.is_empty()).then(|| problems.join("; ")),
        angles,
        section_areas: BTreeMap::new(),
        positions: resolution.points,
        mismatches,
        unit,
    }
}

/// Full snapshot metrics: mode-specific resolver plus per-section areas.
pub fn compute_garden_metrics(garden: &GardenData, cfg: ResolveCfg) -> MetricsResult {
    let mut result = match garden.mode {
        CoordinateMode::Local => compute_metrics_with(
            &Trilateration::new(cfg),
            &garden.points,
            &garden.constraints,
            garden.unit,
            cfg,
        ),
        CoordinateMode::Gps => compute_metrics_with(
            &GpsResolver::new(cfg),
            &garden.points,
            &garden.constraints,
            garden.unit,
            cfg,
        ),
    };
    let lookup = resolved_lookup(&result.positions);
    result.section_areas = garden
        .sections
        .iter()
        .map(|s| {
            let total: f64 = s.shapes.iter().map(|sh| shape_area(sh, &lookup)).sum();
            (s.id.clone(), total)
        })
        .collect();
    result
}

/// Area of one shape; polygon kinds use whichever of their points resolved.
pub fn shape_area(shape: &Shape, positions: &HashMap<&str, Vector2<f64>>) -> f64 {
    match shape.kind {
        ShapeKind::Circle => shape.radius.filter(|r| *r > 0.0).map_or(0.0, circle_area),
        ShapeKind::Rectangle | ShapeKind::Triangle | ShapeKind::Polygon => {
            polygon_area(&shape_ring(shape, positions))
        }
    }
}

pub fn shape_perimeter(shape: &Shape, positions: &HashMap<&str, Vector2<f64>>) -> f64 {
    match shape.kind {
        ShapeKind::Circle => shape
            .radius
            .filter(|r| *r > 0.0)
            .map_or(0.0, circle_perimeter),
        ShapeKind::Rectangle | ShapeKind::Triangle | ShapeKind::Polygon => {
            perimeter(&shape_ring(shape, positions))
        }
    }
}

/// Resolved positions keyed by point id (placeholders excluded).
pub fn resolved_lookup(positions: &[ResolvedPoint]) -> HashMap<&str, Vector2<f64>> {
    positions
        .iter()
        .filter(|p| p.resolved)
        .map(|p| (p.id.as_str(), p.position.to_vec2()))
        .collect()
}

fn shape_ring(shape: &Shape, positions: &HashMap<&str, Vector2<f64>>) -> Vec<Vector2<f64>> {
    shape
        .point_ids
        .iter()
        .filter_map(|id| positions.get(id.as_str()).copied())
        .collect()
}

/// Angle at every point with both a previous and a next resolved neighbor.
fn vertex_angles(ordered: &[(&str, Vector2<f64>)]) -> BTreeMap<String, f64> {
    ordered
        .windows(3)
        .map(|w| (w[1].0.to_string(), angle_at(w[0].1, w[1].1, w[2].1)))
        .collect()
}

fn cross_check(
    constraints: &[DistanceConstraint],
    positions: &HashMap<&str, Vector2<f64>>,
    label: &dyn Fn(&str) -> String,
    unit: Unit,
    tolerance: f64,
) -> Vec<String> {
    let mut out = Vec::new();
    for c in constraints {
        if !is_usable_distance(c.distance) {
            out.push(format!(
                "{}-{}: unusable distance {} {}",
                label(&c.point_a_id),
                label(&c.point_b_id),
                c.distance,
                c.unit.symbol()
            ));
            continue;
        }
        let (Some(a), Some(b)) = (
            positions.get(c.point_a_id.as_str()),
            positions.get(c.point_b_id.as_str()),
        ) else {
            continue;
        };
        let measured = (b - a).norm();
        let stated = c.distance_in(unit);
        let diff = (measured - stated).abs();
        if !diff.is_finite() || diff > stated * tolerance {
            out.push(format!(
                "{}-{}: {:.2} {} off",
                label(&c.point_a_id),
                label(&c.point_b_id),
                unit.convert(diff, c.unit),
                c.unit.symbol()
            ));
        }
    }
    out
}
