//! Two-circle intersection with relative slack.
//!
//! Root choice
//! - Of the two intersections we always return the one to the LEFT of the
//!   directed line `c0 → c1` (counter-clockwise turn):
//!   `x = px − (h/d)·dy`, `y = py + (h/d)·dx`.
//! - Swapping this sign mirrors every layout the resolver produces, so it is
//!   fixed here and pinned by tests.

use nalgebra::Vector2;

use crate::cfg::COINCIDENT_EPS;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Circle {
    pub center: Vector2<f64>,
    pub radius: f64,
}

impl Circle {
    #[inline]
    pub fn new(center: Vector2<f64>, radius: f64) -> Self {
        Self { center, radius }
    }
}

/// Counter-clockwise intersection of `c0` and `c1`.
///
/// Circles that miss each other by at most `(r0 + r1) * tolerance` are
/// treated as tangent (h clamped to 0). Returns `None` for concentric centers
/// or a miss beyond the slack.
pub fn intersect_ccw(c0: Circle, c1: Circle, tolerance: f64) -> Option<Vector2<f64>> {
    let delta = c1.center - c0.center;
    let d = delta.norm();
    if !d.is_finite() || d < COINCIDENT_EPS {
        return None;
    }
    let (r0, r1) = (c0.radius, c1.radius);
    let slack = (r0 + r1) * tolerance;
    if d > r0 + r1 + slack || d < (r0 - r1).abs() - slack {
        return None;
    }
    let a = (r0 * r0 - r1 * r1 + d * d) / (2.0 * d);
    let h = (r0 * r0 - a * a).max(0.0).sqrt();
    let p = c0.center + delta * (a / d);
    Some(Vector2::new(
        p.x - (h / d) * delta.y,
        p.y + (h / d) * delta.x,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::vector;

    #[test]
    fn picks_counter_clockwise_root() {
        let c0 = Circle::new(vector![0.0, 0.0], 200f64.sqrt());
        let c1 = Circle::new(vector![10.0, 0.0], 10.0);
        let p = intersect_ccw(c0, c1, 0.05).unwrap();
        assert!((p - vector![10.0, 10.0]).norm() < 1e-9);
        // Swapping the references mirrors the pick across their axis.
        let q = intersect_ccw(c1, c0, 0.05).unwrap();
        assert!((q - vector![10.0, -10.0]).norm() < 1e-9);
    }

    #[test]
    fn slack_snaps_near_misses_to_tangent() {
        // Gap of 0.5 with slack (3+3)*0.1 = 0.6.
        let c0 = Circle::new(vector![0.0, 0.0], 3.0);
        let c1 = Circle::new(vector![6.5, 0.0], 3.0);
        assert!(intersect_ccw(c0, c1, 0.05).is_none());
        let p = intersect_ccw(c0, c1, 0.1).unwrap();
        assert!((p - vector![3.25, 0.0]).norm() < 1e-9);
    }

    #[test]
    fn nested_and_concentric_circles_fail() {
        let big = Circle::new(vector![0.0, 0.0], 50.0);
        let small = Circle::new(vector![10.0, 0.0], 1.0);
        assert!(intersect_ccw(big, small, 0.05).is_none());
        let same_center = Circle::new(vector![0.0, 0.0], 1.0);
        assert!(intersect_ccw(big, same_center, 0.05).is_none());
    }
}
