//! # Roof Slab Steel
//!
//! Bar or mesh count for the slab reinforcement.
//!
//! - Mesh: each sheet loses a fixed 0.2 m of lap on both sides,
//!   `sheets = ceil(roof_area / ((mesh_length − 0.2) × (mesh_width − 0.2)))`
//! - Separate bars: `k = sqrt(roof_area / spacing)`, `bars = ceil(2 × (k + 1))`
//!
//! ## Example
//!
//! ```rust
//! use kamiyat_core::calculations::roof_slab_steel::{calculate, RoofSlabSteelInput, SlabReinforcement};
//!
//! let input = RoofSlabSteelInput {
//!     roof_area_m2: 100.0,
//!     reinforcement: SlabReinforcement::Mesh { mesh_length_m: 3.0, mesh_width_m: 2.0 },
//! };
//! assert_eq!(calculate(&input).bar_count(), 20);
//! ```

use serde::{Deserialize, Serialize};

use crate::raw::RawNumber;
use crate::validation::Violations;

/// Lap trimmed off each mesh dimension (m)
pub const MESH_TRIM_M: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReinforcementType {
    Mesh,
    Separate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum SlabReinforcement {
    Mesh { mesh_length_m: f64, mesh_width_m: f64 },
    Separate { spacing_m: f64 },
}

/// Validated slab steel input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoofSlabSteelInput {
    pub roof_area_m2: f64,
    pub reinforcement: SlabReinforcement,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRoofSlabSteelInput {
    pub reinforcement_type: ReinforcementType,
    #[serde(default)]
    pub roof_area: RawNumber,
    #[serde(default)]
    pub mesh_length: RawNumber,
    #[serde(default)]
    pub mesh_width: RawNumber,
    #[serde(default)]
    pub spacing: RawNumber,
}

impl RawRoofSlabSteelInput {
    pub fn validate(&self) -> Result<RoofSlabSteelInput, Vec<String>> {
        let mut v = Violations::new();
        let roof_area_m2 = v.positive("roof_area", &self.roof_area);

        let reinforcement = match self.reinforcement_type {
            ReinforcementType::Mesh => {
                let length = mesh_side(&mut v, "mesh_length", &self.mesh_length);
                let width = mesh_side(&mut v, "mesh_width", &self.mesh_width);
                match (length, width) {
                    (Some(mesh_length_m), Some(mesh_width_m)) => Some(SlabReinforcement::Mesh {
                        mesh_length_m,
                        mesh_width_m,
                    }),
                    _ => None,
                }
            }
            ReinforcementType::Separate => v
                .positive("spacing", &self.spacing)
                .map(|spacing_m| SlabReinforcement::Separate { spacing_m }),
        };

        let built = match (roof_area_m2, reinforcement) {
            (Some(roof_area_m2), Some(reinforcement)) => Some(RoofSlabSteelInput {
                roof_area_m2,
                reinforcement,
            }),
            _ => None,
        };
        v.finish(built)
    }
}

/// A mesh side must leave usable mesh after the lap trim.
fn mesh_side(v: &mut Violations, name: &str, raw: &RawNumber) -> Option<f64> {
    let side = v.finite(name, raw)?;
    if side <= MESH_TRIM_M {
        v.push(
            name,
            format!(
                "must be greater than {} m so the mesh keeps a usable area after the {} m lap",
                MESH_TRIM_M, MESH_TRIM_M
            ),
        );
        return None;
    }
    Some(side)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum SlabBars {
    Mesh {
        adjusted_length_m: f64,
        adjusted_width_m: f64,
        mesh_area_m2: f64,
        mesh_bars: u64,
    },
    Separate {
        spacing_m: f64,
        k: f64,
        separate_bars: u64,
    },
}

/// Results from the slab steel calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoofSlabSteelResult {
    pub roof_area_m2: f64,
    pub bars: SlabBars,
}

impl RoofSlabSteelResult {
    /// Mesh sheets or separate bars, whichever applies
    pub fn bar_count(&self) -> u64 {
        match self.bars {
            SlabBars::Mesh { mesh_bars, .. } => mesh_bars,
            SlabBars::Separate { separate_bars, .. } => separate_bars,
        }
    }
}

pub fn calculate(input: &RoofSlabSteelInput) -> RoofSlabSteelResult {
    let bars = match input.reinforcement {
        SlabReinforcement::Mesh {
            mesh_length_m,
            mesh_width_m,
        } => {
            let adjusted_length_m = mesh_length_m - MESH_TRIM_M;
            let adjusted_width_m = mesh_width_m - MESH_TRIM_M;
            let mesh_area_m2 = adjusted_length_m * adjusted_width_m;
            SlabBars::Mesh {
                adjusted_length_m,
                adjusted_width_m,
                mesh_area_m2,
                mesh_bars: (input.roof_area_m2 / mesh_area_m2).ceil() as u64,
            }
        }
        SlabReinforcement::Separate { spacing_m } => {
            let k = (input.roof_area_m2 / spacing_m).sqrt();
            SlabBars::Separate {
                spacing_m,
                k,
                separate_bars: (2.0 * (k + 1.0)).ceil() as u64,
            }
        }
    };

    RoofSlabSteelResult {
        roof_area_m2: input.roof_area_m2,
        bars,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raw::RawValue;

    fn s(text: &str) -> RawNumber {
        Some(RawValue::from(text))
    }

    #[test]
    fn test_mesh_sheets() {
        let input = RoofSlabSteelInput {
            roof_area_m2: 100.0,
            reinforcement: SlabReinforcement::Mesh {
                mesh_length_m: 3.0,
                mesh_width_m: 2.0,
            },
        };
        let result = calculate(&input);
        match result.bars {
            SlabBars::Mesh {
                adjusted_length_m,
                adjusted_width_m,
                mesh_area_m2,
                mesh_bars,
            } => {
                assert!((adjusted_length_m - 2.8).abs() < 1e-9);
                assert!((adjusted_width_m - 1.8).abs() < 1e-9);
                assert!((mesh_area_m2 - 5.04).abs() < 1e-9);
                assert_eq!(mesh_bars, 20);
            }
            other => panic!("expected mesh bars, got {:?}", other),
        }
    }

    #[test]
    fn test_separate_bars() {
        let input = RoofSlabSteelInput {
            roof_area_m2: 100.0,
            reinforcement: SlabReinforcement::Separate { spacing_m: 0.2 },
        };
        let result = calculate(&input);
        match result.bars {
            SlabBars::Separate { k, separate_bars, .. } => {
                assert!((k - 500f64.sqrt()).abs() < 1e-9);
                assert_eq!(separate_bars, 47);
            }
            other => panic!("expected separate bars, got {:?}", other),
        }
        assert_eq!(result.bar_count(), 47);
    }

    #[test]
    fn test_mesh_side_must_exceed_lap() {
        let raw = RawRoofSlabSteelInput {
            reinforcement_type: ReinforcementType::Mesh,
            roof_area: s("100"),
            mesh_length: s("0.2"),
            mesh_width: s("2"),
            spacing: None,
        };
        let errors = raw.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("mesh_length: must be greater than 0.2 m"));
    }

    #[test]
    fn test_mesh_ignores_spacing() {
        let raw = RawRoofSlabSteelInput {
            reinforcement_type: ReinforcementType::Mesh,
            roof_area: s("100"),
            mesh_length: s("3"),
            mesh_width: s("2"),
            spacing: s("oops"),
        };
        assert!(raw.validate().is_ok());
    }

    #[test]
    fn test_separate_spacing_must_be_positive() {
        let raw = RawRoofSlabSteelInput {
            reinforcement_type: ReinforcementType::Separate,
            roof_area: s("100"),
            mesh_length: None,
            mesh_width: None,
            spacing: s("0"),
        };
        assert_eq!(raw.validate().unwrap_err(), vec!["spacing: must be greater than 0"]);
    }

    #[test]
    fn test_result_json_is_tagged() {
        let input = RoofSlabSteelInput {
            roof_area_m2: 50.0,
            reinforcement: SlabReinforcement::Separate { spacing_m: 0.25 },
        };
        let json = serde_json::to_value(calculate(&input)).unwrap();
        assert_eq!(json["bars"]["type"], "separate");
    }
}
