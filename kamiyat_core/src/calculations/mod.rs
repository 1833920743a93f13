//! # Quantity Calculations
//!
//! Every element family follows the same pattern:
//!
//! - `Raw*Input` - the form as submitted, numbers possibly still strings
//! - `*Input` - validated input (JSON-serializable)
//! - `*Result` - calculation results, carrying every intermediate value shown
//! - `calculate(&input) -> *Result` - pure and total over validated input
//!
//! [`ElementInput`] and [`CalculationResult`] wrap the families in one tagged
//! union keyed by [`CalculationType`].
//!
//! ## Available Calculations
//!
//! - [`foundation`] - Isolated foundation bases
//! - [`column`] - Column concrete volume
//! - [`ground_bridge`] - Ground bridge (tie beam) volume
//! - [`roof_slab`] - Roof slab concrete, solid or ribbed
//! - [`roof_beams_steel`] - Longitudinal steel for roof beams
//! - [`roof_slab_steel`] - Slab mesh or bar count
//! - [`element`] - Generic `l × w × h` tabs
//! - [`aggregate`] - Totals and logistics across tabs

pub mod aggregate;
pub mod column;
pub mod element;
pub mod foundation;
pub mod ground_bridge;
pub mod roof_beams_steel;
pub mod roof_slab;
pub mod roof_slab_steel;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{EngineError, EngineResult};

pub use aggregate::{AggregateResult, TabVolume};
pub use column::{ColumnsInput, ColumnsResult, RawColumnsInput};
pub use element::{ElementTab, ElementVolumeInput, ElementVolumeResult, RawElementVolumeInput};
pub use foundation::{FoundationInput, FoundationResult, RawFoundationInput};
pub use ground_bridge::{GroundBridgesInput, GroundBridgesResult, RawGroundBridgesInput};
pub use roof_beams_steel::{RawRoofBeamsSteelInput, RoofBeamsSteelInput, RoofBeamsSteelResult};
pub use roof_slab::{RawRoofSlabInput, RoofSlabInput, RoofSlabResult};
pub use roof_slab_steel::{RawRoofSlabSteelInput, RoofSlabSteelInput, RoofSlabSteelResult};

/// The closed set of calculations the engine supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CalculationType {
    FoundationBase,
    Columns,
    GroundBridges,
    RoofSlab,
    RoofBeamsSteel,
    RoofSlabSteel,
    ElementVolume,
}

impl CalculationType {
    pub const ALL: [CalculationType; 7] = [
        CalculationType::FoundationBase,
        CalculationType::Columns,
        CalculationType::GroundBridges,
        CalculationType::RoofSlab,
        CalculationType::RoofBeamsSteel,
        CalculationType::RoofSlabSteel,
        CalculationType::ElementVolume,
    ];

    /// Stable identifier (matches the JSON value)
    pub fn as_str(&self) -> &'static str {
        match self {
            CalculationType::FoundationBase => "foundation-base",
            CalculationType::Columns => "columns",
            CalculationType::GroundBridges => "ground-bridges",
            CalculationType::RoofSlab => "roof-slab",
            CalculationType::RoofBeamsSteel => "roof-beams-steel",
            CalculationType::RoofSlabSteel => "roof-slab-steel",
            CalculationType::ElementVolume => "element-volume",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            CalculationType::FoundationBase => "Foundation Bases",
            CalculationType::Columns => "Columns",
            CalculationType::GroundBridges => "Ground Bridges",
            CalculationType::RoofSlab => "Roof Slab",
            CalculationType::RoofBeamsSteel => "Roof Beams Steel",
            CalculationType::RoofSlabSteel => "Roof Slab Steel",
            CalculationType::ElementVolume => "Element Volume",
        }
    }

    pub fn arabic_name(&self) -> &'static str {
        match self {
            CalculationType::FoundationBase => "القواعد",
            CalculationType::Columns => "الأعمدة",
            CalculationType::GroundBridges => "الجسور الأرضية",
            CalculationType::RoofSlab => "بلاطة السقف",
            CalculationType::RoofBeamsSteel => "حديد جسور السقف",
            CalculationType::RoofSlabSteel => "حديد بلاطة السقف",
            CalculationType::ElementVolume => "حجم العنصر",
        }
    }
}

impl fmt::Display for CalculationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CalculationType {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CalculationType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| {
                EngineError::input(vec![format!(
                    "calculation_type: unknown calculation type '{}'",
                    s
                )])
            })
    }
}

/// Raw input for any calculation, tagged by `calculation_type`.
///
/// ## JSON Example
///
/// ```json
/// {
///   "calculation_type": "roof-slab",
///   "has_ribs": false,
///   "area": "120",
///   "thickness": "0.2"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "calculation_type", rename_all = "kebab-case")]
pub enum RawElementInput {
    FoundationBase(RawFoundationInput),
    Columns(RawColumnsInput),
    GroundBridges(RawGroundBridgesInput),
    RoofSlab(RawRoofSlabInput),
    RoofBeamsSteel(RawRoofBeamsSteelInput),
    RoofSlabSteel(RawRoofSlabSteelInput),
    ElementVolume(RawElementVolumeInput),
}

impl RawElementInput {
    pub fn calculation_type(&self) -> CalculationType {
        match self {
            RawElementInput::FoundationBase(_) => CalculationType::FoundationBase,
            RawElementInput::Columns(_) => CalculationType::Columns,
            RawElementInput::GroundBridges(_) => CalculationType::GroundBridges,
            RawElementInput::RoofSlab(_) => CalculationType::RoofSlab,
            RawElementInput::RoofBeamsSteel(_) => CalculationType::RoofBeamsSteel,
            RawElementInput::RoofSlabSteel(_) => CalculationType::RoofSlabSteel,
            RawElementInput::ElementVolume(_) => CalculationType::ElementVolume,
        }
    }
}

/// Validated input for any calculation.
///
/// Only [`crate::validation::validate`] produces these from form data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "calculation_type", rename_all = "kebab-case")]
pub enum ElementInput {
    FoundationBase(FoundationInput),
    Columns(ColumnsInput),
    GroundBridges(GroundBridgesInput),
    RoofSlab(RoofSlabInput),
    RoofBeamsSteel(RoofBeamsSteelInput),
    RoofSlabSteel(RoofSlabSteelInput),
    ElementVolume(ElementVolumeInput),
}

impl ElementInput {
    pub fn calculation_type(&self) -> CalculationType {
        match self {
            ElementInput::FoundationBase(_) => CalculationType::FoundationBase,
            ElementInput::Columns(_) => CalculationType::Columns,
            ElementInput::GroundBridges(_) => CalculationType::GroundBridges,
            ElementInput::RoofSlab(_) => CalculationType::RoofSlab,
            ElementInput::RoofBeamsSteel(_) => CalculationType::RoofBeamsSteel,
            ElementInput::RoofSlabSteel(_) => CalculationType::RoofSlabSteel,
            ElementInput::ElementVolume(_) => CalculationType::ElementVolume,
        }
    }
}

/// Result of any calculation, mirroring [`ElementInput`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "calculation_type", rename_all = "kebab-case")]
pub enum CalculationResult {
    FoundationBase(FoundationResult),
    Columns(ColumnsResult),
    GroundBridges(GroundBridgesResult),
    RoofSlab(RoofSlabResult),
    RoofBeamsSteel(RoofBeamsSteelResult),
    RoofSlabSteel(RoofSlabSteelResult),
    ElementVolume(ElementVolumeResult),
}

/// One line of a steel schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarQuantity {
    pub label: String,
    pub count: u64,
    pub diameter_mm: Option<f64>,
}

impl CalculationResult {
    pub fn calculation_type(&self) -> CalculationType {
        match self {
            CalculationResult::FoundationBase(_) => CalculationType::FoundationBase,
            CalculationResult::Columns(_) => CalculationType::Columns,
            CalculationResult::GroundBridges(_) => CalculationType::GroundBridges,
            CalculationResult::RoofSlab(_) => CalculationType::RoofSlab,
            CalculationResult::RoofBeamsSteel(_) => CalculationType::RoofBeamsSteel,
            CalculationResult::RoofSlabSteel(_) => CalculationType::RoofSlabSteel,
            CalculationResult::ElementVolume(_) => CalculationType::ElementVolume,
        }
    }

    /// Concrete volume (m³) for results that produce one
    pub fn concrete_volume_m3(&self) -> Option<f64> {
        match self {
            CalculationResult::FoundationBase(r) => Some(r.total_concrete_m3),
            CalculationResult::Columns(r) => Some(r.total_volume_m3),
            CalculationResult::GroundBridges(r) => Some(r.total_volume_m3),
            CalculationResult::RoofSlab(r) => Some(r.total_concrete_m3),
            CalculationResult::ElementVolume(r) => Some(r.volume_m3),
            CalculationResult::RoofBeamsSteel(_) | CalculationResult::RoofSlabSteel(_) => None,
        }
    }

    /// Steel schedule for results that produce one; empty otherwise
    pub fn steel_bars(&self) -> Vec<BarQuantity> {
        match self {
            CalculationResult::RoofBeamsSteel(r) => vec![
                BarQuantity {
                    label: "upper".to_string(),
                    count: u64::from(r.count_upper),
                    diameter_mm: Some(r.rod_diameter_mm),
                },
                BarQuantity {
                    label: "lower".to_string(),
                    count: u64::from(r.count_lower),
                    diameter_mm: Some(r.rod_diameter_mm),
                },
            ],
            CalculationResult::RoofSlabSteel(r) => {
                let label = match r.bars {
                    roof_slab_steel::SlabBars::Mesh { .. } => "mesh-sheets",
                    roof_slab_steel::SlabBars::Separate { .. } => "separate-bars",
                };
                vec![BarQuantity {
                    label: label.to_string(),
                    count: r.bar_count(),
                    diameter_mm: None,
                }]
            }
            _ => Vec::new(),
        }
    }
}

/// Run the calculator for a validated input.
///
/// Calculators cannot fail on validated input. A non-finite quantity here
/// means validation let something through.
pub fn compute(input: &ElementInput) -> CalculationResult {
    let result = match input {
        ElementInput::FoundationBase(i) => CalculationResult::FoundationBase(foundation::calculate(i)),
        ElementInput::Columns(i) => CalculationResult::Columns(column::calculate(i)),
        ElementInput::GroundBridges(i) => CalculationResult::GroundBridges(ground_bridge::calculate(i)),
        ElementInput::RoofSlab(i) => CalculationResult::RoofSlab(roof_slab::calculate(i)),
        ElementInput::RoofBeamsSteel(i) => {
            CalculationResult::RoofBeamsSteel(roof_beams_steel::calculate(i))
        }
        ElementInput::RoofSlabSteel(i) => CalculationResult::RoofSlabSteel(roof_slab_steel::calculate(i)),
        ElementInput::ElementVolume(i) => CalculationResult::ElementVolume(element::calculate(i)),
    };
    debug_assert!(
        result.concrete_volume_m3().map_or(true, f64::is_finite),
        "non-finite concrete volume for {}",
        input.calculation_type()
    );
    result
}

/// Like [`compute`], but checks the input belongs to `calculation_type`.
pub fn compute_as(
    calculation_type: CalculationType,
    input: &ElementInput,
) -> EngineResult<CalculationResult> {
    if input.calculation_type() != calculation_type {
        return Err(EngineError::input(vec![format!(
            "calculation_type: expected '{}' but the input is '{}'",
            calculation_type,
            input.calculation_type()
        )]));
    }
    Ok(compute(input))
}

/// A validated input together with its result.
///
/// This is what a quantity report stores as its calculation data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationRecord {
    pub input: ElementInput,
    pub result: CalculationResult,
}

impl CalculationRecord {
    pub fn new(input: ElementInput) -> Self {
        let result = compute(&input);
        CalculationRecord { input, result }
    }

    pub fn calculation_type(&self) -> CalculationType {
        self.input.calculation_type()
    }
}
