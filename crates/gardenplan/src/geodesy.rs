//! Spherical-Earth helpers: haversine distance, forward geodesic, and a
//! local tangent-plane projection.
//!
//! Conventions
//! - Degrees at the API boundary, radians internally.
//! - Bearings are clockwise from north, normalized to `[0, 360)`.
//! - Spherical Earth of radius `EARTH_RADIUS_M`; good to well under 1% at
//!   garden scale, which is all the projection is used for.

use nalgebra::Vector2;

use crate::cfg::{EARTH_RADIUS_M, METERS_PER_DEGREE_LAT};
use crate::model::GpsCoord;

/// Great-circle distance in meters (haversine).
pub fn haversine_distance(a: GpsCoord, b: GpsCoord) -> f64 {
    let phi1 = a.lat.to_radians();
    let phi2 = b.lat.to_radians();
    let d_phi = (b.lat - a.lat).to_radians();
    let d_lambda = (b.lng - a.lng).to_radians();
    let s_phi = (d_phi / 2.0).sin();
    let s_lambda = (d_lambda / 2.0).sin();
    let h = s_phi * s_phi + phi1.cos() * phi2.cos() * s_lambda * s_lambda;
    // Rounding can push h a hair above 1 for antipodal inputs.
    let h = h.clamp(0.0, 1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_M * c
}

/// Destination reached from `start` after `distance_m` meters along `bearing_deg`.
pub fn destination(start: GpsCoord, distance_m: f64, bearing_deg: f64) -> GpsCoord {
    let delta = distance_m / EARTH_RADIUS_M;
    let theta = normalize_bearing(bearing_deg).to_radians();
    let phi1 = start.lat.to_radians();
    let lambda1 = start.lng.to_radians();

    let sin_phi2 = phi1.sin() * delta.cos() + phi1.cos() * delta.sin() * theta.cos();
    let phi2 = sin_phi2.clamp(-1.0, 1.0).asin();
    let y = theta.sin() * delta.sin() * phi1.cos();
    let x = delta.cos() - phi1.sin() * phi2.sin();
    let lambda2 = lambda1 + y.atan2(x);

    GpsCoord::new(phi2.to_degrees(), normalize_longitude(lambda2.to_degrees()))
}

/// Initial bearing from `a` to `b`, degrees in `[0, 360)`.
pub fn initial_bearing(a: GpsCoord, b: GpsCoord) -> f64 {
    let phi1 = a.lat.to_radians();
    let phi2 = b.lat.to_radians();
    let d_lambda = (b.lng - a.lng).to_radians();
    let y = d_lambda.sin() * phi2.cos();
    let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * d_lambda.cos();
    normalize_bearing(y.atan2(x).to_degrees())
}

#[inline]
pub fn normalize_bearing(deg: f64) -> f64 {
    let b = deg.rem_euclid(360.0);
    // rem_euclid can return exactly 360.0 for tiny negative inputs.
    if b >= 360.0 {
        0.0
    } else {
        b
    }
}

#[inline]
fn normalize_longitude(deg: f64) -> f64 {
    (deg + 540.0).rem_euclid(360.0) - 180.0
}

/// Equirectangular tangent-plane projection around a fixed center.
///
/// `x` grows east, `y` grows north, both in meters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LocalProjection {
    pub center: GpsCoord,
    pub meters_per_deg_lat: f64,
    pub meters_per_deg_lng: f64,
}

impl LocalProjection {
    pub fn new(center: GpsCoord) -> Self {
        Self {
            center,
            meters_per_deg_lat: METERS_PER_DEGREE_LAT,
            meters_per_deg_lng: METERS_PER_DEGREE_LAT * center.lat.to_radians().cos(),
        }
    }

    /// Projection centered on the mean latitude/longitude; `None` when empty.
    pub fn centered_on(coords: &[GpsCoord]) -> Option<Self> {
        if coords.is_empty() {
            return None;
        }
        let n = coords.len() as f64;
        let lat = coords.iter().map(|c| c.lat).sum::<f64>() / n;
        let lng = coords.iter().map(|c| c.lng).sum::<f64>() / n;
        Some(Self::new(GpsCoord::new(lat, lng)))
    }

    #[inline]
    pub fn project(&self, c: GpsCoord) -> Vector2<f64> {
        Vector2::new(
            (c.lng - self.center.lng) * self.meters_per_deg_lng,
            (c.lat - self.center.lat) * self.meters_per_deg_lat,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn haversine_zero_and_one_degree() {
        let o = GpsCoord::new(0.0, 0.0);
        assert_eq!(haversine_distance(o, o), 0.0);
        let d = haversine_distance(o, GpsCoord::new(0.0, 1.0));
        assert!((d - 111_320.0).abs() / 111_320.0 < 0.01, "d = {d}");
        let d_lat = haversine_distance(o, GpsCoord::new(1.0, 0.0));
        assert!((d - d_lat).abs() < 1e-6);
    }

    #[test]
    fn destination_matches_haversine() {
        let start = GpsCoord::new(52.52, 13.405);
        for bearing in [0.0, 45.0, 90.0, 200.0, 359.0] {
            let end = destination(start, 25.0, bearing);
            let back = haversine_distance(start, end);
            assert!((back - 25.0).abs() < 1e-6, "bearing {bearing}: {back}");
            let b = initial_bearing(start, end);
            let diff = (b - bearing).abs().min(360.0 - (b - bearing).abs());
            assert!(diff < 1e-4, "bearing {bearing} came back as {b}");
        }
    }

    #[test]
    fn destination_north_increases_latitude_only() {
        let start = GpsCoord::new(10.0, 20.0);
        let end = destination(start, 1000.0, 0.0);
        assert!(end.lat > start.lat);
        assert!((end.lng - start.lng).abs() < 1e-12);
    }

    #[test]
    fn longitude_wraps_across_antimeridian() {
        let end = destination(GpsCoord::new(0.0, 179.9999), 100.0, 90.0);
        assert!(end.lng < -179.0);
    }

    #[test]
    fn projection_centers_and_scales_axes() {
        let coords = [GpsCoord::new(48.0, 11.0), GpsCoord::new(48.001, 11.002)];
        let proj = LocalProjection::centered_on(&coords).unwrap();
        let a = proj.project(coords[0]);
        let b = proj.project(coords[1]);
        assert!(b.x > a.x && b.y > a.y);
        assert!((a + b).norm() < 1e-9, "centroid at origin");
        assert!((b.y - a.y - 0.001 * METERS_PER_DEGREE_LAT).abs() < 1e-9);
        assert!((b.x - a.x - 0.002 * proj.meters_per_deg_lng).abs() < 1e-9);
        assert!(LocalProjection::centered_on(&[]).is_none());
    }

    #[test]
    fn bearing_normalization() {
        assert_eq!(normalize_bearing(360.0), 0.0);
        assert_eq!(normalize_bearing(-90.0), 270.0);
        assert!(normalize_bearing(-1e-18) < 360.0);
    }
}
