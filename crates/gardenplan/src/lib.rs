//! Garden survey geometry: positions from tape measurements or GPS, then
//! area, perimeter, angles and consistency diagnostics.
//!
//! Layers
//! - `resolve`: point registry + distance constraints → planar positions.
//! - `geom`: pure measures over ordered positions.
//! - `metrics`: runs both and cross-checks every measurement.
//!
//! Everything here is synchronous and stateless. Bad but well-typed input
//! degrades into flags and messages on the result records; nothing panics
//! or returns an error. `validate` is the opt-in strict layer for callers
//! that want to reject input at the boundary.
//!
//! `api` is the curated surface; the modules stay public for callers that
//! need the lower-level pieces.

pub mod api;
pub mod cfg;
pub mod constraints;
pub mod geodesy;
pub mod geom;
pub mod metrics;
pub mod model;
pub mod rand_survey;
pub mod resolve;
pub mod suggest;
pub mod units;
pub mod validate;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use nalgebra::Vector2 as Vec2;

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::cfg::{DuplicatePolicy, ResolveCfg, MEASUREMENT_TOLERANCE};
    pub use crate::metrics::{compute_garden_metrics, compute_metrics};
    pub use crate::model::{
        CoordinateMode, DistanceConstraint, GardenData, GpsCoord, MetricsResult, ObjectType,
        Placement, PlanarPosition, Point, Resolution, ResolvedPoint, Section, Shape, ShapeKind,
    };
    pub use crate::rand_survey::{draw_survey, ReplayToken, SurveyCfg, VertexCount};
    pub use crate::resolve::PositionResolver;
    pub use crate::units::Unit;
    pub use nalgebra::Vector2 as Vec2;
}
