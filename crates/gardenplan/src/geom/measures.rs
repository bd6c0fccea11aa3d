use std::f64::consts::PI;

use nalgebra::Vector2;

use crate::geodesy::{haversine_distance, LocalProjection};
use crate::model::{GpsCoord, PlanarPosition};

/// Distance between two locations of the same kind.
pub trait Metric {
    fn distance_to(&self, other: &Self) -> f64;
}

impl Metric for Vector2<f64> {
    #[inline]
    fn distance_to(&self, other: &Self) -> f64 {
        (other - self).norm()
    }
}

impl Metric for PlanarPosition {
    #[inline]
    fn distance_to(&self, other: &Self) -> f64 {
        self.to_vec2().distance_to(&other.to_vec2())
    }
}

/// Great-circle meters.
impl Metric for GpsCoord {
    #[inline]
    fn distance_to(&self, other: &Self) -> f64 {
        haversine_distance(*self, *other)
    }
}

/// Euclidean distance for planar inputs, haversine meters for GPS inputs.
#[inline]
pub fn distance<P: Metric>(a: &P, b: &P) -> f64 {
    a.distance_to(b)
}

/// Signed shoelace area; positive for counter-clockwise order.
pub fn signed_area(points: &[Vector2<f64>]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut twice = 0.0;
    for i in 0..n {
        let p = points[i];
        let q = points[(i + 1) % n];
        twice += p.x * q.y - q.x * p.y;
    }
    twice / 2.0
}

/// Shoelace area `|Σ(x_i·y_{i+1} − x_{i+1}·y_i)| / 2`; 0 for fewer than 3 points.
#[inline]
pub fn polygon_area(points: &[Vector2<f64>]) -> f64 {
    signed_area(points).abs()
}

/// Area in square meters of a GPS ring, via the tangent plane at its centroid.
pub fn gps_polygon_area(coords: &[GpsCoord]) -> f64 {
    if coords.len() < 3 {
        return 0.0;
    }
    match LocalProjection::centered_on(coords) {
        Some(proj) => {
            let local: Vec<Vector2<f64>> = coords.iter().map(|&c| proj.project(c)).collect();
            polygon_area(&local)
        }
        None => 0.0,
    }
}

/// Closed-ring perimeter; 0 for fewer than 2 points.
///
/// Two points count the segment twice (there and back), matching the
/// wrap-around definition.
pub fn perimeter<P: Metric>(points: &[P]) -> f64 {
    let n = points.len();
    if n < 2 {
        return 0.0;
    }
    (0..n)
        .map(|i| points[i].distance_to(&points[(i + 1) % n]))
        .sum()
}

/// Interior angle at `vertex`, degrees in `[0, 180]`.
///
/// Difference of the `atan2` directions towards `prev` and `next`, wrapped
/// into `[0, 360)` and reflected (`360 − a`) above 180. Collinear points with
/// `vertex` between the others give 180; folding back onto the same ray gives 0.
/// A neighbor coinciding with `vertex` has direction `atan2(0, 0) = 0`.
pub fn angle_at(prev: Vector2<f64>, vertex: Vector2<f64>, next: Vector2<f64>) -> f64 {
    let a = prev - vertex;
    let b = next - vertex;
    let theta1 = a.y.atan2(a.x);
    let theta2 = b.y.atan2(b.x);
    let mut angle = (theta2 - theta1).to_degrees();
    if angle < 0.0 {
        angle += 360.0;
    }
    if angle > 180.0 {
        angle = 360.0 - angle;
    }
    angle
}

#[inline]
pub fn circle_area(radius: f64) -> f64 {
    PI * radius * radius
}

#[inline]
pub fn circle_perimeter(radius: f64) -> f64 {
    2.0 * PI * radius
}
