//! Geometry Engine: distances, polygon area/perimeter, vertex angles, circles.
//!
//! Purpose
//! - Pure measures over ordered point sequences, independent of how the
//!   positions were obtained (trilateration, GPS projection, planar hints).
//!
//! Conventions
//! - Angles are degrees at the API boundary.
//! - Polygons are implicitly closed (last vertex connects to the first).
//! - `Metric` abstracts planar (Euclidean) and GPS (haversine) distance so
//!   `perimeter` works for both modes.

mod hull;
mod measures;

pub use hull::convex_hull;
pub use measures::{
    angle_at, circle_area, circle_perimeter, distance, gps_polygon_area, perimeter,
    polygon_area, signed_area, Metric,
};
