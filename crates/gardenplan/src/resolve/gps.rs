//! GPS-mode resolver: single linear pass, no iterative solving.
//!
//! - Reference points use their entered latitude/longitude.
//! - Derived points step from the previous point's GPS position with the
//!   forward geodesic (distance converted to meters, bearing from north).
//! - All GPS positions are projected onto the tangent plane at their mean
//!   latitude/longitude and scaled into the working unit.

use nalgebra::Vector2;
use tracing::debug;

use super::{fill_fallbacks, PositionResolver};
use crate::cfg::ResolveCfg;
use crate::constraints::ConstraintSet;
use crate::geodesy::{destination, LocalProjection};
use crate::model::{GpsCoord, Placement, Point, Resolution};
use crate::units::Unit;

#[derive(Clone, Copy, Debug, Default)]
pub struct GpsResolver {
    pub cfg: ResolveCfg,
}

impl GpsResolver {
    pub fn new(cfg: ResolveCfg) -> Self {
        Self { cfg }
    }
}

impl PositionResolver for GpsResolver {
    fn resolve(&self, points: &[Point], constraints: &ConstraintSet<'_>) -> Resolution {
        resolve_gps(points, constraints.unit(), self.cfg)
    }
}

/// GPS position of every point, in registry order.
///
/// A derived point whose predecessor has no GPS position stays `None`, as do
/// `Free` and `Planar` points and anything with a non-finite coordinate.
pub fn gps_positions(points: &[Point]) -> Vec<Option<GpsCoord>> {
    let mut out: Vec<Option<GpsCoord>> = Vec::with_capacity(points.len());
    for p in points {
        let coord = match p.placement {
            Placement::Gps { lat, lng } => Some(GpsCoord::new(lat, lng)),
            Placement::Offset {
                distance,
                unit,
                bearing,
            } => out
                .last()
                .copied()
                .flatten()
                .map(|prev| destination(prev, unit.convert(distance, Unit::Meters), bearing)),
            Placement::Free | Placement::Planar { .. } => None,
        }
        .filter(|c| c.lat.is_finite() && c.lng.is_finite());
        if coord.is_none() {
            debug!(point = %p.label, "no GPS position");
        }
        out.push(coord);
    }
    out
}

/// Planar layout (in `unit`) from GPS references and offsets.
pub fn resolve_gps(points: &[Point], unit: Unit, cfg: ResolveCfg) -> Resolution {
    let coords = gps_positions(points);
    let known: Vec<GpsCoord> = coords.iter().flatten().copied().collect();
    let scale = Unit::Meters.factor_to(unit);
    let pos: Vec<Option<Vector2<f64>>> = match LocalProjection::centered_on(&known) {
        Some(proj) => coords
            .iter()
            .map(|c| c.map(|c| proj.project(c) * scale))
            .collect(),
        None => vec![None; points.len()],
    };
    fill_fallbacks(points, pos, &cfg)
}
