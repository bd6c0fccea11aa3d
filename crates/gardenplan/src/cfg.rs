//! Tolerance and physical constants, plus the resolver configuration.
//!
//! Policy
//! - Defaults are fixed constants so call sites do not juggle tolerances.
//!   `ResolveCfg` exposes the few knobs a collaborator legitimately needs
//!   (tolerance, gauge fallback, duplicate handling, placeholder spacing).

/// Relative slack applied to measured distances (5%).
pub const MEASUREMENT_TOLERANCE: f64 = 0.05;
/// Mean Earth radius used by haversine and the forward geodesic.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;
/// Meters per degree of latitude for the local tangent-plane projection.
pub const METERS_PER_DEGREE_LAT: f64 = 111_320.0;
/// Exact conversion factor between the two supported units.
pub const FEET_PER_METER: f64 = 3.28084;
/// Placeholder spacing for unresolved points: point `i` lands at `(i*dx, i*dy)`.
pub const FALLBACK_STEP: (f64, f64) = (10.0, 5.0);

/// Below this separation two reference centers count as coincident.
pub(crate) const COINCIDENT_EPS: f64 = 1e-12;

/// What to do when more than one constraint exists for the same unordered pair.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Use the first constraint in input order.
    #[default]
    FirstMatch,
    /// Use the arithmetic mean of all constraints for the pair.
    Average,
}

/// Resolver configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResolveCfg {
    /// Relative tolerance for circle slack and third-reference validation.
    pub tolerance: f64,
    /// Distance used for the second point when no constraint links it to the
    /// first one. `None` leaves the second point to the iterative passes.
    pub gauge_fallback: Option<f64>,
    pub duplicates: DuplicatePolicy,
    pub fallback_step: (f64, f64),
}

impl Default for ResolveCfg {
    fn default() -> Self {
        Self {
            tolerance: MEASUREMENT_TOLERANCE,
            gauge_fallback: None,
            duplicates: DuplicatePolicy::FirstMatch,
            fallback_step: FALLBACK_STEP,
        }
    }
}

impl ResolveCfg {
    /// Deterministic placeholder for the point at registry index `index`.
    #[inline]
    pub fn fallback_position(&self, index: usize) -> (f64, f64) {
        let i = index as f64;
        (i * self.fallback_step.0, i * self.fallback_step.1)
    }
}
