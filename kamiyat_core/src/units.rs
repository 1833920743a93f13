//! # Unit Types
//!
//! Lightweight newtype wrappers for the metric lengths the calculators mix.
//! Element dimensions arrive in meters, base heights and beam sections in
//! centimeters, and steel design works in millimeters.
//!
//! All wrappers serialize as bare numbers.
//!
//! ## Example
//!
//! ```rust
//! use kamiyat_core::units::{Centimeters, Meters, Millimeters};
//!
//! let base_height = Centimeters(60.0);
//! let base_height_m: Meters = base_height.into();
//! assert!((base_height_m.0 - 0.6).abs() < 1e-12);
//!
//! let depth: Millimeters = Centimeters(50.0).into();
//! assert_eq!(depth.0, 500.0);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::Sub;

/// Length in meters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meters(pub f64);

/// Length in centimeters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Centimeters(pub f64);

/// Length in millimeters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Millimeters(pub f64);

impl From<Centimeters> for Meters {
    fn from(cm: Centimeters) -> Self {
        Meters(cm.0 / 100.0)
    }
}

impl From<Meters> for Centimeters {
    fn from(m: Meters) -> Self {
        Centimeters(m.0 * 100.0)
    }
}

impl From<Centimeters> for Millimeters {
    fn from(cm: Centimeters) -> Self {
        Millimeters(cm.0 * 10.0)
    }
}

impl From<Millimeters> for Centimeters {
    fn from(mm: Millimeters) -> Self {
        Centimeters(mm.0 / 10.0)
    }
}

impl Sub for Millimeters {
    type Output = Millimeters;

    fn sub(self, rhs: Millimeters) -> Millimeters {
        Millimeters(self.0 - rhs.0)
    }
}

/// Round to two decimals for display. Stored values keep full precision.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centimeter_conversions() {
        let m: Meters = Centimeters(45.0).into();
        assert!((m.0 - 0.45).abs() < 1e-12);

        let cm: Centimeters = Meters(0.8).into();
        assert!((cm.0 - 80.0).abs() < 1e-12);
    }

    #[test]
    fn test_millimeter_difference() {
        let d = Millimeters::from(Centimeters(50.0)) - Millimeters::from(Centimeters(2.5));
        assert_eq!(d, Millimeters(475.0));
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(2.345_67), 2.35);
        assert_eq!(round2(24.0), 24.0);
        assert_eq!(round2(0.004), 0.0);
    }

    #[test]
    fn test_transparent_serialization() {
        let json = serde_json::to_string(&Meters(3.5)).unwrap();
        assert_eq!(json, "3.5");
    }
}
