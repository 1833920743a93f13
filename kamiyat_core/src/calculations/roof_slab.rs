//! # Roof Slab Concrete
//!
//! Concrete for a roof slab, solid or ribbed, on one floor or repeated over
//! several floors.
//!
//! ## Formulas
//!
//! - Ribs: `ribs_count = area × 5`, `ribs_volume = l × w × h × ribs_count`
//! - Base slab volume: `slab_volume` when ribbed; otherwise `slab_volume` if
//!   given and positive, else `area × thickness`
//! - Single floor, ribbed: `max(0, base_slab_volume − ribs_volume)`
//! - Single floor, solid: `area × thickness`
//! - Multi floor (ribs ignored):
//!   `dead = area × thickness × 25`, `live = area × live_load`,
//!   `final = area × thickness + floors × (dead + live)`
//!
//! The multi-floor expression adds a load (kN) to a volume (m³) and takes no
//! account of ribs. It is kept exactly as the quantity sheets compute it.
//!
//! ## Example
//!
//! ```rust
//! use kamiyat_core::calculations::roof_slab::{calculate, FloorMode, RoofSlabInput};
//!
//! let input = RoofSlabInput {
//!     area_m2: 120.0,
//!     thickness_m: 0.20,
//!     slab_volume_m3: None,
//!     ribs: None,
//!     floor_mode: FloorMode::Single,
//! };
//! assert!((calculate(&input).total_concrete_m3 - 24.0).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};

use crate::calculations::element::{BoxDimensions, RawBoxDimensions};
use crate::raw::RawNumber;
use crate::validation::Violations;

/// Ribs per square meter of ribbed slab
pub const RIBS_PER_M2: f64 = 5.0;

/// Unit weight of reinforced concrete (kN/m³)
pub const CONCRETE_UNIT_WEIGHT_KN_M3: f64 = 25.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FloorModeKind {
    #[default]
    Single,
    Multi,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum FloorMode {
    Single,
    Multi {
        floors_count: u32,
        live_load_kn_per_m2: f64,
    },
}

impl FloorMode {
    pub fn kind(&self) -> FloorModeKind {
        match self {
            FloorMode::Single => FloorModeKind::Single,
            FloorMode::Multi { .. } => FloorModeKind::Multi,
        }
    }
}

/// Rib geometry of a ribbed slab
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlabRibs {
    pub rib: BoxDimensions,
    /// Gross slab volume the ribs are taken out of (m³)
    pub slab_volume_m3: f64,
}

/// Validated roof slab input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoofSlabInput {
    pub area_m2: f64,
    pub thickness_m: f64,
    /// Optional explicit slab volume for a solid slab
    pub slab_volume_m3: Option<f64>,
    /// Present only for ribbed slabs
    pub ribs: Option<SlabRibs>,
    pub floor_mode: FloorMode,
}

impl RoofSlabInput {
    pub fn has_ribs(&self) -> bool {
        self.ribs.is_some()
    }
}

/// Roof slab form as submitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRoofSlabInput {
    #[serde(default)]
    pub has_ribs: bool,
    #[serde(default)]
    pub area: RawNumber,
    #[serde(default)]
    pub thickness: RawNumber,
    #[serde(default)]
    pub slab_volume: RawNumber,
    #[serde(default)]
    pub rib: RawBoxDimensions,
    #[serde(default)]
    pub floor_mode: FloorModeKind,
    #[serde(default)]
    pub floors_count: RawNumber,
    #[serde(default)]
    pub live_load_per_m2: RawNumber,
}

impl RawRoofSlabInput {
    pub fn validate(&self) -> Result<RoofSlabInput, Vec<String>> {
        let mut v = Violations::new();

        let area_m2 = v.positive("area", &self.area);
        let thickness_m = v.positive("thickness", &self.thickness);

        let (slab_volume_m3, ribs) = if self.has_ribs {
            let slab_volume = v.positive("slab_volume", &self.slab_volume);
            let rib = self.rib.check(&mut v, "rib");
            let ribs = match (rib, slab_volume) {
                (Some(rib), Some(slab_volume_m3)) => Some(SlabRibs {
                    rib,
                    slab_volume_m3,
                }),
                _ => None,
            };
            (slab_volume, ribs)
        } else {
            (v.optional_finite("slab_volume", &self.slab_volume), None)
        };

        let floor_mode = match self.floor_mode {
            FloorModeKind::Single => Some(FloorMode::Single),
            FloorModeKind::Multi => {
                let floors_count = v.positive_integer("floors_count", &self.floors_count);
                let live_load = v.non_negative("live_load_per_m2", &self.live_load_per_m2);
                match (floors_count, live_load) {
                    (Some(floors_count), Some(live_load_kn_per_m2)) => Some(FloorMode::Multi {
                        floors_count,
                        live_load_kn_per_m2,
                    }),
                    _ => None,
                }
            }
        };

        if self.has_ribs && ribs.is_none() {
            return Err(v.into_errors());
        }

        let built = match (area_m2, thickness_m, floor_mode) {
            (Some(area_m2), Some(thickness_m), Some(floor_mode)) => Some(RoofSlabInput {
                area_m2,
                thickness_m,
                slab_volume_m3,
                ribs,
                floor_mode,
            }),
            _ => None,
        };
        v.finish(built)
    }
}

/// Load path for the multi-floor case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiFloorLoads {
    pub floors_count: u32,
    pub live_load_kn_per_m2: f64,
    /// area × thickness × 25 (kN)
    pub dead_load_kn: f64,
    /// area × live load (kN)
    pub live_load_kn: f64,
    pub total_load_kn: f64,
    /// area × thickness + floors × total load
    pub final_concrete: f64,
}

/// Results from the roof slab calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoofSlabResult {
    pub has_ribs: bool,
    pub floor_mode: FloorModeKind,
    pub ribs_count: Option<f64>,
    pub ribs_volume_m3: Option<f64>,
    pub base_slab_volume_m3: f64,
    /// max(0, base slab volume − ribs volume), ribbed slabs only
    pub concrete_with_ribs_m3: Option<f64>,
    /// area × thickness
    pub concrete_no_ribs_single_m3: f64,
    pub multi_floor: Option<MultiFloorLoads>,
    /// The figure shown as the slab's concrete quantity
    pub total_concrete_m3: f64,
}

pub fn calculate(input: &RoofSlabInput) -> RoofSlabResult {
    let solid_volume = input.area_m2 * input.thickness_m;

    let (ribs_count, ribs_volume_m3, base_slab_volume_m3) = match &input.ribs {
        Some(ribs) => {
            let count = input.area_m2 * RIBS_PER_M2;
            let volume = ribs.rib.length_m * ribs.rib.width_m * ribs.rib.height_m * count;
            (Some(count), Some(volume), ribs.slab_volume_m3)
        }
        None => {
            let base = match input.slab_volume_m3 {
                Some(v) if v > 0.0 => v,
                _ => solid_volume,
            };
            (None, None, base)
        }
    };

    let concrete_with_ribs_m3 = ribs_volume_m3.map(|ribs| (base_slab_volume_m3 - ribs).max(0.0));

    let multi_floor = match input.floor_mode {
        FloorMode::Single => None,
        FloorMode::Multi {
            floors_count,
            live_load_kn_per_m2,
        } => {
            let dead_load_kn = input.area_m2 * input.thickness_m * CONCRETE_UNIT_WEIGHT_KN_M3;
            let live_load_kn = input.area_m2 * live_load_kn_per_m2;
            let total_load_kn = dead_load_kn + live_load_kn;
            Some(MultiFloorLoads {
                floors_count,
                live_load_kn_per_m2,
                dead_load_kn,
                live_load_kn,
                total_load_kn,
                final_concrete: solid_volume + f64::from(floors_count) * total_load_kn,
            })
        }
    };

    let total_concrete_m3 = match (&multi_floor, concrete_with_ribs_m3) {
        (Some(multi), _) => multi.final_concrete,
        (None, Some(with_ribs)) => with_ribs,
        (None, None) => solid_volume,
    };

    RoofSlabResult {
        has_ribs: input.has_ribs(),
        floor_mode: input.floor_mode.kind(),
        ribs_count,
        ribs_volume_m3,
        base_slab_volume_m3,
        concrete_with_ribs_m3,
        concrete_no_ribs_single_m3: solid_volume,
        multi_floor,
        total_concrete_m3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raw::RawValue;

    fn s(text: &str) -> RawNumber {
        Some(RawValue::from(text))
    }

    fn ribbed(slab_volume: f64, rib: (f64, f64, f64)) -> RoofSlabInput {
        RoofSlabInput {
            area_m2: 10.0,
            thickness_m: 0.3,
            slab_volume_m3: None,
            ribs: Some(SlabRibs {
                rib: BoxDimensions::new(rib.0, rib.1, rib.2),
                slab_volume_m3: slab_volume,
            }),
            floor_mode: FloorMode::Single,
        }
    }

    #[test]
    fn test_solid_single_floor() {
        let input = RoofSlabInput {
            area_m2: 120.0,
            thickness_m: 0.20,
            slab_volume_m3: None,
            ribs: None,
            floor_mode: FloorMode::Single,
        };
        let result = calculate(&input);
        assert!((result.total_concrete_m3 - 24.0).abs() < 1e-9);
        assert!((result.base_slab_volume_m3 - 24.0).abs() < 1e-9);
        assert_eq!(result.ribs_count, None);
        assert_eq!(result.concrete_with_ribs_m3, None);
    }

    #[test]
    fn test_solid_slab_prefers_explicit_volume_for_base() {
        let mut input = RoofSlabInput {
            area_m2: 100.0,
            thickness_m: 0.2,
            slab_volume_m3: Some(18.0),
            ribs: None,
            floor_mode: FloorMode::Single,
        };
        let result = calculate(&input);
        assert_eq!(result.base_slab_volume_m3, 18.0);
        // Displayed figure for a solid single floor is still area × thickness
        assert!((result.total_concrete_m3 - 20.0).abs() < 1e-9);

        input.slab_volume_m3 = Some(0.0);
        assert!((calculate(&input).base_slab_volume_m3 - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_ribbed_slab() {
        // 50 ribs of 0.4 × 0.2 × 0.2 = 0.8 m³
        let result = calculate(&ribbed(3.0, (0.4, 0.2, 0.2)));
        assert_eq!(result.ribs_count, Some(50.0));
        assert!((result.ribs_volume_m3.unwrap() - 0.8).abs() < 1e-9);
        assert!((result.concrete_with_ribs_m3.unwrap() - 2.2).abs() < 1e-9);
        assert!((result.total_concrete_m3 - 2.2).abs() < 1e-9);
    }

    #[test]
    fn test_ribbed_slab_clamps_at_zero() {
        // 50 ribs of 1 × 1 × 1 far exceed the slab volume
        let result = calculate(&ribbed(3.0, (1.0, 1.0, 1.0)));
        assert_eq!(result.concrete_with_ribs_m3, Some(0.0));
        assert_eq!(result.total_concrete_m3, 0.0);
    }

    #[test]
    fn test_multi_floor_ignores_ribs() {
        let mut input = ribbed(3.0, (0.4, 0.2, 0.2));
        input.floor_mode = FloorMode::Multi {
            floors_count: 3,
            live_load_kn_per_m2: 2.0,
        };
        let result = calculate(&input);
        let multi = result.multi_floor.clone().unwrap();

        // dead = 10 × 0.3 × 25 = 75, live = 10 × 2 = 20
        assert!((multi.dead_load_kn - 75.0).abs() < 1e-9);
        assert!((multi.live_load_kn - 20.0).abs() < 1e-9);
        assert!((multi.total_load_kn - 95.0).abs() < 1e-9);
        // 3 + 3 × 95
        assert!((multi.final_concrete - 288.0).abs() < 1e-9);
        assert_eq!(result.total_concrete_m3, multi.final_concrete);

        let mut solid = input.clone();
        solid.ribs = None;
        assert_eq!(calculate(&solid).total_concrete_m3, result.total_concrete_m3);
    }

    #[test]
    fn test_ribbed_requires_volume_and_rib() {
        let raw = RawRoofSlabInput {
            has_ribs: true,
            area: s("10"),
            thickness: s("0.3"),
            rib: RawBoxDimensions {
                length: s("0.4"),
                width: None,
                height: s("0"),
            },
            ..Default::default()
        };
        let errors = raw.validate().unwrap_err();
        assert_eq!(
            errors,
            vec![
                "slab_volume: is required",
                "rib.width: is required",
                "rib.height: must be greater than 0",
            ]
        );
    }

    #[test]
    fn test_rib_fields_ignored_without_ribs() {
        let raw = RawRoofSlabInput {
            has_ribs: false,
            area: s("10"),
            thickness: s("0.3"),
            rib: RawBoxDimensions {
                length: s("garbage"),
                width: None,
                height: None,
            },
            ..Default::default()
        };
        let input = raw.validate().unwrap();
        assert!(!input.has_ribs());
    }

    #[test]
    fn test_multi_floor_rules() {
        let mut raw = RawRoofSlabInput {
            area: s("100"),
            thickness: s("0.2"),
            floor_mode: FloorModeKind::Multi,
            floors_count: s("2"),
            live_load_per_m2: s("0"),
            ..Default::default()
        };
        assert!(raw.validate().is_ok());

        raw.floors_count = s("0");
        raw.live_load_per_m2 = s("-2");
        assert_eq!(
            raw.validate().unwrap_err(),
            vec![
                "floors_count: must be greater than 0",
                "live_load_per_m2: must not be negative",
            ]
        );
    }
}
