//! Length units, exact conversion, and display formatting.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cfg::FEET_PER_METER;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    #[default]
    Meters,
    Feet,
}

impl Unit {
    /// Length suffix (`m` / `ft`).
    pub fn symbol(self) -> &'static str {
        match self {
            Unit::Meters => "m",
            Unit::Feet => "ft",
        }
    }

    /// Area suffix (`m²` / `ft²`).
    pub fn area_symbol(self) -> &'static str {
        match self {
            Unit::Meters => "m²",
            Unit::Feet => "ft²",
        }
    }

    /// Multiplier taking a length in `self` to a length in `to`.
    #[inline]
    pub fn factor_to(self, to: Unit) -> f64 {
        match (self, to) {
            (Unit::Meters, Unit::Feet) => FEET_PER_METER,
            (Unit::Feet, Unit::Meters) => 1.0 / FEET_PER_METER,
            _ => 1.0,
        }
    }

    #[inline]
    pub fn convert(self, value: f64, to: Unit) -> f64 {
        convert_unit(value, self, to)
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Unit::Meters => "meters",
            Unit::Feet => "feet",
        })
    }
}

impl std::str::FromStr for Unit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "m" | "meter" | "meters" | "metre" | "metres" => Ok(Unit::Meters),
            "ft" | "foot" | "feet" => Ok(Unit::Feet),
            other => Err(format!("unknown unit '{other}' (expected meters or feet)")),
        }
    }
}

/// Exact linear conversion; identity when the units match.
///
/// `feet = meters * 3.28084`; the inverse divides by the same constant.
pub fn convert_unit(value: f64, from: Unit, to: Unit) -> f64 {
    match (from, to) {
        (Unit::Meters, Unit::Feet) => value * FEET_PER_METER,
        (Unit::Feet, Unit::Meters) => value / FEET_PER_METER,
        _ => value,
    }
}

/// Convert an area (squared length) between units.
pub fn convert_area(value: f64, from: Unit, to: Unit) -> f64 {
    let k = from.factor_to(to);
    value * k * k
}

/// Two-decimal area with unit suffix, e.g. `12.50 m²`.
pub fn format_area(value: f64, unit: Unit) -> String {
    format!("{value:.2} {}", unit.area_symbol())
}

/// Two-decimal distance with unit suffix, e.g. `3.00 ft`.
pub fn format_distance(value: f64, unit: Unit) -> String {
    format!("{value:.2} {}", unit.symbol())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn identity_and_known_values() {
        assert_eq!(convert_unit(7.5, Unit::Feet, Unit::Feet), 7.5);
        assert!((convert_unit(1.0, Unit::Meters, Unit::Feet) - 3.28084).abs() < 1e-12);
        assert!((convert_unit(3.28084, Unit::Feet, Unit::Meters) - 1.0).abs() < 1e-12);
        assert!((convert_area(1.0, Unit::Meters, Unit::Feet) - 3.28084 * 3.28084).abs() < 1e-9);
    }

    #[test]
    fn formatting() {
        assert_eq!(format_area(12.5, Unit::Meters), "12.50 m²");
        assert_eq!(format_area(0.004, Unit::Feet), "0.00 ft²");
        assert_eq!(format_distance(3.0, Unit::Feet), "3.00 ft");
        assert_eq!(format_distance(10.126, Unit::Meters), "10.13 m");
    }

    #[test]
    fn parse_unit_names() {
        assert_eq!("Meters".parse::<Unit>(), Ok(Unit::Meters));
        assert_eq!("ft".parse::<Unit>(), Ok(Unit::Feet));
        assert!("yards".parse::<Unit>().is_err());
    }

    proptest! {
        #[test]
        fn meters_feet_round_trip(x in -1e6f64..1e6) {
            let feet = convert_unit(x, Unit::Meters, Unit::Feet);
            let back = convert_unit(feet, Unit::Feet, Unit::Meters);
            prop_assert!((back - x).abs() <= 1e-6 * x.abs().max(1e-9));
        }
    }
}
