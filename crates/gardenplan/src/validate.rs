//! Boundary validation for collaborator input.
//!
//! The core tolerates malformed-but-typed data (it degrades instead of
//! failing); these checks let the collaborator reject bad input before it is
//! stored. Each rule reports every violation rather than stopping at the first.

use std::collections::HashSet;

use thiserror::Error;

use crate::cfg::DuplicatePolicy;
use crate::constraints::ConstraintSet;
use crate::model::{DistanceConstraint, GardenData, GpsCoord, Placement, Point, Shape, ShapeKind};

#[derive(Clone, Debug, PartialEq, Error)]
pub enum ValidationError {
    #[error("point {point}: label is required")]
    MissingLabel { point: String },
    #[error("latitude {lat} must be between -90 and 90")]
    LatitudeOutOfRange { lat: f64 },
    #[error("longitude {lng} must be between -180 and 180")]
    LongitudeOutOfRange { lng: f64 },
    #[error("point {point}: bearing {bearing} must be in [0, 360)")]
    BearingOutOfRange { point: String, bearing: f64 },
    #[error("point {point}: offset distance {distance} must be greater than 0")]
    NonPositiveOffset { point: String, distance: f64 },
    #[error("point {point}: offset has no previous point to start from")]
    OffsetWithoutPredecessor { point: String },
    #[error("duplicate point id {point}")]
    DuplicatePointId { point: String },
    #[error("measurement {constraint}: distance {distance} must be greater than 0")]
    NonPositiveDistance { constraint: String, distance: f64 },
    #[error("measurement {constraint}: unknown point {point}")]
    UnknownPoint { constraint: String, point: String },
    #[error("measurement {constraint}: both ends are point {point}")]
    SelfMeasurement { constraint: String, point: String },
    #[error("points {a} and {b} are measured {count} times")]
    DuplicateMeasurement { a: String, b: String, count: usize },
    #[error("{kind} shape {shape} needs {expected} points, got {got}")]
    ShapeArity {
        shape: String,
        kind: &'static str,
        expected: String,
        got: usize,
    },
    #[error("circle shape {shape} needs a positive radius")]
    CircleRadius { shape: String },
    #[error("shape {shape}: unknown point {point}")]
    ShapeUnknownPoint { shape: String, point: String },
}

pub fn validate_gps(c: GpsCoord) -> Vec<ValidationError> {
    let mut out = Vec::new();
    if !(-90.0..=90.0).contains(&c.lat) {
        out.push(ValidationError::LatitudeOutOfRange { lat: c.lat });
    }
    if !(-180.0..=180.0).contains(&c.lng) {
        out.push(ValidationError::LongitudeOutOfRange { lng: c.lng });
    }
    out
}

pub fn validate_point(p: &Point) -> Vec<ValidationError> {
    let mut out = Vec::new();
    if p.label.trim().is_empty() {
        out.push(ValidationError::MissingLabel {
            point: p.id.clone(),
        });
    }
    match p.placement {
        Placement::Gps { lat, lng } => out.extend(validate_gps(GpsCoord::new(lat, lng))),
        Placement::Offset {
            distance, bearing, ..
        } => {
            if !(distance.is_finite() && distance > 0.0) {
                out.push(ValidationError::NonPositiveOffset {
                    point: p.id.clone(),
                    distance,
                });
            }
            if !(0.0..360.0).contains(&bearing) {
                out.push(ValidationError::BearingOutOfRange {
                    point: p.id.clone(),
                    bearing,
                });
            }
        }
        Placement::Free | Placement::Planar { .. } => {}
    }
    out
}

/// Checks that do not need the point registry.
pub fn validate_constraint(c: &DistanceConstraint) -> Vec<ValidationError> {
    let mut out = Vec::new();
    if !(c.distance.is_finite() && c.distance > 0.0) {
        out.push(ValidationError::NonPositiveDistance {
            constraint: c.id.clone(),
            distance: c.distance,
        });
    }
    if c.point_a_id == c.point_b_id {
        out.push(ValidationError::SelfMeasurement {
            constraint: c.id.clone(),
            point: c.point_a_id.clone(),
        });
    }
    out
}

pub fn validate_shape(s: &Shape) -> Vec<ValidationError> {
    let mut out = Vec::new();
    let (min, max) = s.kind.point_arity();
    let got = s.point_ids.len();
    if got < min || max.is_some_and(|m| got > m) {
        let expected = match max {
            Some(m) if m == min => format!("exactly {m}"),
            Some(m) => format!("{min} to {m}"),
            None => format!("at least {min}"),
        };
        out.push(ValidationError::ShapeArity {
            shape: s.id.clone(),
            kind: s.kind.name(),
            expected,
            got,
        });
    }
    if s.kind == ShapeKind::Circle && !s.radius.is_some_and(|r| r.is_finite() && r > 0.0) {
        out.push(ValidationError::CircleRadius {
            shape: s.id.clone(),
        });
    }
    out
}

/// All rules over a full snapshot, including cross-references.
pub fn validate_garden(g: &GardenData) -> Vec<ValidationError> {
    let mut out = Vec::new();
    let mut ids: HashSet<&str> = HashSet::new();
    for (k, p) in g.points.iter().enumerate() {
        if !ids.insert(p.id.as_str()) {
            out.push(ValidationError::DuplicatePointId {
                point: p.id.clone(),
            });
        }
        out.extend(validate_point(p));
        if k == 0 && matches!(p.placement, Placement::Offset { .. }) {
            out.push(ValidationError::OffsetWithoutPredecessor {
                point: p.id.clone(),
            });
        }
    }

    for c in &g.constraints {
        out.extend(validate_constraint(c));
        for end in [&c.point_a_id, &c.point_b_id] {
            if !ids.contains(end.as_str()) {
                out.push(ValidationError::UnknownPoint {
                    constraint: c.id.clone(),
                    point: end.clone(),
                });
            }
        }
    }
    let set = ConstraintSet::new(&g.constraints, g.unit, DuplicatePolicy::FirstMatch);
    for ((a, b), count) in set.duplicates() {
        out.push(ValidationError::DuplicateMeasurement {
            a: a.to_string(),
            b: b.to_string(),
            count,
        });
    }

    for shape in g.sections.iter().flat_map(|s| &s.shapes) {
        out.extend(validate_shape(shape));
        for pid in &shape.point_ids {
            if !ids.contains(pid.as_str()) {
                out.push(ValidationError::ShapeUnknownPoint {
                    shape: shape.id.clone(),
                    point: pid.clone(),
                });
            }
        }
    }
    out
}
