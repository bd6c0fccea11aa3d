//! Position Resolver: point registry + constraints → planar positions.
//!
//! Purpose
//! - Hide the placement strategy behind `PositionResolver` so the Geometry
//!   Engine and Metrics Aggregator never depend on how positions were found.
//!   A global solver (e.g. least-squares MDS) can be dropped in later.
//!
//! Strategies
//! - `Trilateration` (local mode): greedy, order-dependent, tolerance-based.
//! - `GpsResolver` (GPS mode): direct geodesic pass, then tangent projection.
//!
//! Output contract
//! - Every input point appears once, in registry order. Points that could not
//!   be placed carry `ResolveCfg::fallback_position` with `resolved = false`.

mod circle;
mod gps;
mod local;

pub use circle::{intersect_ccw, Circle};
pub use gps::{gps_positions, resolve_gps, GpsResolver};
pub use local::{resolve_local, Trilateration};
#[cfg(test)]
pub(crate) use local::{run_passes, Stop};

use nalgebra::Vector2;

use crate::cfg::ResolveCfg;
use crate::constraints::ConstraintSet;
use crate::model::{CoordinateMode, PlanarPosition, Point, Resolution, ResolvedPoint};

/// Strategy seam for position resolution.
///
/// Output positions are in `constraints.unit()`.
pub trait PositionResolver {
    fn resolve(&self, points: &[Point], constraints: &ConstraintSet<'_>) -> Resolution;
}

/// Resolve with the strategy matching `mode`.
pub fn resolve(
    points: &[Point],
    constraints: &ConstraintSet<'_>,
    mode: CoordinateMode,
    cfg: ResolveCfg,
) -> Resolution {
    match mode {
        CoordinateMode::Local => Trilateration::new(cfg).resolve(points, constraints),
        CoordinateMode::Gps => GpsResolver::new(cfg).resolve(points, constraints),
    }
}

/// Build the output record, substituting placeholders for missing or
/// non-finite positions.
pub(crate) fn fill_fallbacks(
    points: &[Point],
    pos: Vec<Option<Vector2<f64>>>,
    cfg: &ResolveCfg,
) -> Resolution {
    let points = points
        .iter()
        .zip(pos)
        .enumerate()
        .map(|(k, (p, v))| match v.filter(|v| v.x.is_finite() && v.y.is_finite()) {
            Some(v) => ResolvedPoint {
                id: p.id.clone(),
                position: PlanarPosition::from(v),
                resolved: true,
            },
            None => {
                let (x, y) = cfg.fallback_position(k);
                ResolvedPoint {
                    id: p.id.clone(),
                    position: PlanarPosition::new(x, y),
                    resolved: false,
                }
            }
        })
        .collect();
    Resolution { points }
}

#[cfg(test)]
mod tests;
