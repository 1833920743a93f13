//! # Roof Beams Steel
//!
//! Longitudinal steel for one simple roof beam or a run of two or three
//! continuous beams.
//!
//! ## Formulas
//!
//! - Effective depth: `d = beam_height_cm × 10 − iron_cover_cm × 10` (mm)
//! - Single beam: `M = w × L² / 8`, upper = lower = M
//! - Continuous (2–3 spans): `ΣwL² = Σ wᵢ × Lᵢ²`,
//!   `M_upper = ΣwL² / 10`, `M_lower = ΣwL² / 12`
//! - Steel area: `As = M × 10⁶ / (0.87 × fy × d × 0.9)` (mm²), fy = 420 MPa
//! - Bars: `ceil(As / A_bar)` for the selected rod
//!
//! ## Example
//!
//! ```rust
//! use kamiyat_core::calculations::roof_beams_steel::{calculate, BeamSpan, RoofBeamsSteelInput};
//! use kamiyat_core::reference::IronBar;
//!
//! let input = RoofBeamsSteelInput {
//!     rod: IronBar::new(16.0),
//!     beam_height_cm: 60.0,
//!     iron_cover_cm: 5.0,
//!     spans: vec![BeamSpan { length_m: 4.0, load_kn_per_m: 10.0 }],
//! };
//! let result = calculate(&input);
//! assert!((result.max_moment_knm - 20.0).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};

use crate::calculations::element::field;
use crate::raw::RawNumber;
use crate::reference::{IronBar, ReferenceTables};
use crate::units::{Centimeters, Millimeters};
use crate::validation::Violations;

/// Steel yield strength (MPa)
pub const FY_MPA: f64 = 420.0;

/// Steel strength reduction factor
pub const STEEL_FACTOR: f64 = 0.87;

/// Lever arm as a fraction of the effective depth
pub const LEVER_ARM_RATIO: f64 = 0.9;

/// Simply supported span moment coefficient (wL²/8)
pub const SIMPLE_SPAN_COEFFICIENT: f64 = 8.0;

/// Continuous beam support moment coefficient (ΣwL²/10)
pub const CONTINUOUS_UPPER_COEFFICIENT: f64 = 10.0;

/// Continuous beam span moment coefficient (ΣwL²/12)
pub const CONTINUOUS_LOWER_COEFFICIENT: f64 = 12.0;

/// Most spans a single calculation accepts
pub const MAX_BEAMS: u32 = 3;

/// One loaded span
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BeamSpan {
    pub length_m: f64,
    /// Distributed load (kN/m)
    pub load_kn_per_m: f64,
}

impl BeamSpan {
    /// w × L² (kN·m)
    pub fn wl2(&self) -> f64 {
        self.load_kn_per_m * self.length_m.powi(2)
    }
}

/// Validated roof beam input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoofBeamsSteelInput {
    /// Selected rod, resolved from the reference table
    pub rod: IronBar,
    pub beam_height_cm: f64,
    pub iron_cover_cm: f64,
    /// One span per beam, 1 to 3
    pub spans: Vec<BeamSpan>,
}

impl RoofBeamsSteelInput {
    pub fn effective_depth(&self) -> Millimeters {
        Millimeters::from(Centimeters(self.beam_height_cm))
            - Millimeters::from(Centimeters(self.iron_cover_cm))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawBeamSpan {
    #[serde(default)]
    pub length: RawNumber,
    #[serde(default)]
    pub distributed_load: RawNumber,
}

/// Roof beam form as submitted.
///
/// Only the first `beam_count` entries of `beams` are read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRoofBeamsSteelInput {
    #[serde(default)]
    pub beam_count: RawNumber,
    #[serde(default)]
    pub rod_diameter_mm: RawNumber,
    #[serde(default)]
    pub beam_height_cm: RawNumber,
    #[serde(default)]
    pub iron_cover_cm: RawNumber,
    #[serde(default)]
    pub beams: Vec<RawBeamSpan>,
}

impl RawRoofBeamsSteelInput {
    pub fn validate(&self, tables: &ReferenceTables) -> Result<RoofBeamsSteelInput, Vec<String>> {
        let mut v = Violations::new();

        let beam_count = v
            .positive_integer("beam_count", &self.beam_count)
            .and_then(|n| {
                if n > MAX_BEAMS {
                    v.push("beam_count", format!("must be between 1 and {}", MAX_BEAMS));
                    None
                } else {
                    Some(n)
                }
            });

        let rod = v
            .positive("rod_diameter_mm", &self.rod_diameter_mm)
            .and_then(|d| match tables.iron_bar(d) {
                Some(bar) => Some(bar.clone()),
                None => {
                    v.push(
                        "rod_diameter_mm",
                        format!("no iron bar with diameter {} mm in the reference table", d),
                    );
                    None
                }
            });

        let beam_height_cm = v.positive("beam_height_cm", &self.beam_height_cm);
        let iron_cover_cm = v.positive("iron_cover_cm", &self.iron_cover_cm);
        if let (Some(height), Some(cover)) = (beam_height_cm, iron_cover_cm) {
            if cover >= height {
                v.push("iron_cover_cm", "must be less than beam_height_cm");
            }
        }

        let spans = beam_count.and_then(|n| {
            let empty = RawBeamSpan::default();
            let spans: Vec<Option<BeamSpan>> = (0..n as usize)
                .map(|i| {
                    let raw = self.beams.get(i).unwrap_or(&empty);
                    let prefix = format!("beams[{}]", i);
                    let length = v.positive(&field(&prefix, "length"), &raw.length);
                    let load = v.positive(&field(&prefix, "distributed_load"), &raw.distributed_load);
                    Some(BeamSpan {
                        length_m: length?,
                        load_kn_per_m: load?,
                    })
                })
                .collect();
            spans.into_iter().collect::<Option<Vec<_>>>()
        });

        let built = (|| {
            Some(RoofBeamsSteelInput {
                rod: rod?,
                beam_height_cm: beam_height_cm?,
                iron_cover_cm: iron_cover_cm?,
                spans: spans?,
            })
        })();
        v.finish(built)
    }
}

/// Results from the roof beam steel calculation.
///
/// ## JSON Example
///
/// ```json
/// {
///   "beam_count": 1,
///   "rod_diameter_mm": 16.0,
///   "cross_section_area_mm2": 201.06,
///   "effective_depth_mm": 550.0,
///   "fy_mpa": 420.0,
///   "steel_factor": 0.87,
///   "sum_wl2": null,
///   "moment_upper_knm": 20.0,
///   "moment_lower_knm": 20.0,
///   "max_moment_knm": 20.0,
///   "as_upper_mm2": 110.6,
///   "as_lower_mm2": 110.6,
///   "count_upper": 1,
///   "count_lower": 1
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoofBeamsSteelResult {
    pub beam_count: u32,
    pub rod_diameter_mm: f64,
    pub cross_section_area_mm2: f64,
    pub effective_depth_mm: f64,
    pub fy_mpa: f64,
    pub steel_factor: f64,
    /// Σ wL² for continuous beams; absent for a single beam
    pub sum_wl2: Option<f64>,
    pub moment_upper_knm: f64,
    pub moment_lower_knm: f64,
    pub max_moment_knm: f64,
    pub as_upper_mm2: f64,
    pub as_lower_mm2: f64,
    pub count_upper: u32,
    pub count_lower: u32,
}

/// Required steel area (mm²) for a moment in kN·m.
pub fn required_steel_area(moment_knm: f64, effective_depth: Millimeters) -> f64 {
    moment_knm * 1e6 / (STEEL_FACTOR * FY_MPA * effective_depth.0 * LEVER_ARM_RATIO)
}

pub fn calculate(input: &RoofBeamsSteelInput) -> RoofBeamsSteelResult {
    let depth = input.effective_depth();

    let (sum_wl2, moment_upper_knm, moment_lower_knm) = match input.spans.as_slice() {
        [single] => {
            let moment = single.wl2() / SIMPLE_SPAN_COEFFICIENT;
            (None, moment, moment)
        }
        spans => {
            let sum: f64 = spans.iter().map(BeamSpan::wl2).sum();
            (
                Some(sum),
                sum / CONTINUOUS_UPPER_COEFFICIENT,
                sum / CONTINUOUS_LOWER_COEFFICIENT,
            )
        }
    };

    let as_upper_mm2 = required_steel_area(moment_upper_knm, depth);
    let as_lower_mm2 = required_steel_area(moment_lower_knm, depth);
    let bar_area = input.rod.cross_sectional_area_mm2;

    RoofBeamsSteelResult {
        beam_count: input.spans.len() as u32,
        rod_diameter_mm: input.rod.diameter_mm,
        cross_section_area_mm2: bar_area,
        effective_depth_mm: depth.0,
        fy_mpa: FY_MPA,
        steel_factor: STEEL_FACTOR,
        sum_wl2,
        moment_upper_knm,
        moment_lower_knm,
        max_moment_knm: moment_upper_knm.max(moment_lower_knm),
        as_upper_mm2,
        as_lower_mm2,
        count_upper: (as_upper_mm2 / bar_area).ceil() as u32,
        count_lower: (as_lower_mm2 / bar_area).ceil() as u32,
    }
}
