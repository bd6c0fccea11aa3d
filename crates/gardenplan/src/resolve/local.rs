//! Local-mode resolver: greedy, tolerance-based trilateration.
//!
//! Algorithm
//! - Gauge: first point at the origin, second point on `+x` at its measured
//!   distance from the first (or `cfg.gauge_fallback`, if configured). Planar
//!   hints replace this gauge when present.
//! - Passes: every unresolved point gathers up to three already-resolved
//!   neighbors (registry order). Two neighbors place it via the CCW circle
//!   intersection; a third, if present, must agree within tolerance.
//! - Stops when everything is placed, a pass places nothing, or after
//!   `2 × n` passes. Leftovers get the fallback position, flagged unresolved.
//!   Each pass that does not stop places at least one point, so the pass cap
//!   only guards against that invariant breaking; the stop reason is logged.
//! - Only finite, positive measurements and finite planar hints take part.
//!
//! Limitations
//! - Order-dependent: a different registry order can pick different neighbor
//!   pairs and therefore a different (still locally consistent) layout.
//! - No global consistency solve; errors are detected later by the metrics
//!   cross-check, not corrected here.

use nalgebra::Vector2;
use tracing::{debug, trace};

use super::circle::{intersect_ccw, Circle};
use super::{fill_fallbacks, PositionResolver};
use crate::cfg::ResolveCfg;
use crate::constraints::{is_usable_distance, ConstraintSet};
use crate::model::{Placement, Point, Resolution};

/// Trilateration resolver for constraint-only layouts.
#[derive(Clone, Copy, Debug, Default)]
pub struct Trilateration {
    pub cfg: ResolveCfg,
}

impl Trilateration {
    pub fn new(cfg: ResolveCfg) -> Self {
        Self { cfg }
    }
}

impl PositionResolver for Trilateration {
    fn resolve(&self, points: &[Point], constraints: &ConstraintSet<'_>) -> Resolution {
        resolve_local(points, constraints, self.cfg)
    }
}

/// Place points from pairwise distances; see the module docs for the strategy.
pub fn resolve_local(
    points: &[Point],
    constraints: &ConstraintSet<'_>,
    cfg: ResolveCfg,
) -> Resolution {
    let n = points.len();
    let mut pos: Vec<Option<Vector2<f64>>> = vec![None; n];
    if n == 0 {
        return Resolution::default();
    }

    let mut hinted = false;
    for (slot, p) in pos.iter_mut().zip(points) {
        if let Placement::Planar { x, y } = p.placement {
            if !(x.is_finite() && y.is_finite()) {
                debug!(point = %p.label, "ignoring non-finite planar hint");
                continue;
            }
            *slot = Some(Vector2::new(x, y));
            hinted = true;
        }
    }

    if !hinted {
        pos[0] = Some(Vector2::zeros());
        if n >= 2 {
            let d01 = constraints
                .between(&points[0].id, &points[1].id)
                .or(cfg.gauge_fallback.filter(|d| is_usable_distance(*d)));
            match d01 {
                Some(d) => pos[1] = Some(Vector2::new(d, 0.0)),
                None => debug!(
                    first = %points[0].label,
                    second = %points[1].label,
                    "no gauge edge between the first two points"
                ),
            }
        }
    }

    let (passes, stop) = run_passes(points, &mut pos, constraints, cfg.tolerance, 2 * n);
    let missing = pos.iter().filter(|p| p.is_none()).count();
    match stop {
        Stop::Complete => trace!(passes, "all points placed"),
        Stop::FixedPoint => debug!(missing, passes, "no progress in last pass; using fallbacks"),
        Stop::PassCap => debug!(missing, passes, "pass cap reached; using fallbacks"),
    }
    fill_fallbacks(points, pos, &cfg)
}

/// Why the placement passes ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Stop {
    Complete,
    FixedPoint,
    PassCap,
}

/// Placement passes over `pos`; returns the number of passes run and why they stopped.
pub(crate) fn run_passes(
    points: &[Point],
    pos: &mut [Option<Vector2<f64>>],
    constraints: &ConstraintSet<'_>,
    tolerance: f64,
    max_passes: usize,
) -> (usize, Stop) {
    let mut passes = 0;
    loop {
        if pos.iter().all(Option::is_some) {
            return (passes, Stop::Complete);
        }
        if passes >= max_passes {
            return (passes, Stop::PassCap);
        }
        passes += 1;
        let mut progress = false;
        for i in 0..pos.len() {
            if pos[i].is_some() {
                continue;
            }
            if let Some(p) = place_point(i, points, pos, constraints, tolerance) {
                trace!(point = %points[i].label, x = p.x, y = p.y, pass = passes, "placed");
                pos[i] = Some(p);
                progress = true;
            }
        }
        if !progress {
            return (passes, Stop::FixedPoint);
        }
    }
}

/// Try to place point `i` from up to three resolved neighbors.
fn place_point(
    i: usize,
    points: &[Point],
    pos: &[Option<Vector2<f64>>],
    constraints: &ConstraintSet<'_>,
    tolerance: f64,
) -> Option<Vector2<f64>> {
    let id = &points[i].id;
    let refs: Vec<(Vector2<f64>, f64)> = points
        .iter()
        .zip(pos)
        .filter_map(|(q, qp)| {
            let qp = (*qp)?;
            if q.id == *id {
                return None;
            }
            constraints.between(id, &q.id).map(|d| (qp, d))
        })
        .take(3)
        .collect();
    if refs.len() < 2 {
        return None;
    }

    let c0 = Circle::new(refs[0].0, refs[0].1);
    let c1 = Circle::new(refs[1].0, refs[1].1);
    let Some(candidate) = intersect_ccw(c0, c1, tolerance) else {
        debug!(point = %points[i].label, "reference circles do not intersect");
        return None;
    };

    if !(candidate.x.is_finite() && candidate.y.is_finite()) {
        return None;
    }
    if let Some(&(p3, d3)) = refs.get(2) {
        let off = ((candidate - p3).norm() - d3).abs();
        if off > d3 * tolerance {
            debug!(
                point = %points[i].label,
                off,
                "candidate disagrees with third reference"
            );
            return None;
        }
    }
    Some(candidate)
}
