//! # Foundation Bases
//!
//! Concrete quantities for isolated foundation bases.
//!
//! ## Formulas
//!
//! - Base height: `h_b = base_height_cm / 100` (m), limited to 40–80 cm
//! - Footprint of each base: `length × width`
//! - Reinforced concrete: `Σ footprint × h_b`
//! - Plain (blinding) concrete under the bases: `Σ footprint × height`
//! - Total concrete: reinforced + plain
//!
//! When all bases are similar, the base is `length × width` repeated
//! `total_number_of_bases` times. Otherwise each listed base counts once.
//!
//! The slab area, number of floors, soil type and building type are carried
//! into the result for the report; they do not enter the volume formulas.

use serde::{Deserialize, Serialize};

use crate::calculations::element::field;
use crate::raw::{parse_field, FieldValue, RawNumber};
use crate::reference::{BuildingType, ReferenceTables, SoilType};
use crate::units::{Centimeters, Meters};
use crate::validation::Violations;

/// Minimum foundation base height (cm)
pub const MIN_BASE_HEIGHT_CM: f64 = 40.0;

/// Maximum foundation base height (cm)
pub const MAX_BASE_HEIGHT_CM: f64 = 80.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BaseShape {
    Square,
    #[default]
    Rectangular,
}

/// Plan dimensions of one base (m)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BaseFootprint {
    pub length_m: f64,
    pub width_m: f64,
}

impl BaseFootprint {
    pub fn area_m2(&self) -> f64 {
        self.length_m * self.width_m
    }
}

/// How the bases are described
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "layout", rename_all = "kebab-case")]
pub enum BaseLayout {
    /// All bases share one footprint
    Uniform { base: BaseFootprint, count: u32 },
    /// Each base listed individually
    Individual { bases: Vec<BaseFootprint> },
}

/// Validated foundation input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoundationInput {
    /// Plain concrete thickness under the bases (m)
    pub height_m: f64,
    pub number_of_floors: u32,
    pub slab_area_m2: f64,
    pub soil_type: SoilType,
    pub building_type: BuildingType,
    pub base_height_cm: f64,
    pub base_shape: BaseShape,
    pub layout: BaseLayout,
}

/// One base as typed into the non-uniform list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawBase {
    #[serde(default)]
    pub length: RawNumber,
    #[serde(default)]
    pub width: RawNumber,
}

/// Foundation form as submitted.
///
/// ## JSON Example
///
/// ```json
/// {
///   "length": "1.6", "width": "1.4", "height": "0.1",
///   "number_of_floors": "3", "slab_area": "180",
///   "soil_type": 2, "building_type": 1,
///   "base_height_cm": "60", "base_shape": "rectangular",
///   "all_bases_similar": true, "total_number_of_bases": "12"
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawFoundationInput {
    #[serde(default)]
    pub length: RawNumber,
    #[serde(default)]
    pub width: RawNumber,
    #[serde(default)]
    pub height: RawNumber,
    #[serde(default)]
    pub number_of_floors: RawNumber,
    #[serde(default)]
    pub slab_area: RawNumber,
    /// Soil type id from the reference tables
    #[serde(default)]
    pub soil_type: RawNumber,
    /// Building type id from the reference tables
    #[serde(default)]
    pub building_type: RawNumber,
    #[serde(default)]
    pub base_height_cm: RawNumber,
    #[serde(default)]
    pub base_shape: BaseShape,
    #[serde(default = "default_true")]
    pub all_bases_similar: bool,
    #[serde(default)]
    pub total_number_of_bases: RawNumber,
    #[serde(default)]
    pub bases: Vec<RawBase>,
}

fn default_true() -> bool {
    true
}

impl RawFoundationInput {
    pub fn validate(&self, tables: &ReferenceTables) -> Result<FoundationInput, Vec<String>> {
        let mut v = Violations::new();

        let height_m = v.positive("height", &self.height);
        let number_of_floors = v.positive_integer("number_of_floors", &self.number_of_floors);
        let slab_area_m2 = v.positive("slab_area", &self.slab_area);

        let soil_type = v
            .positive_integer("soil_type", &self.soil_type)
            .and_then(|id| match tables.soil_type(id) {
                Some(soil) => Some(soil.clone()),
                None => {
                    v.push("soil_type", format!("unknown soil type id {}", id));
                    None
                }
            });
        let building_type = v
            .positive_integer("building_type", &self.building_type)
            .and_then(|id| match tables.building_type(id) {
                Some(building) => Some(building.clone()),
                None => {
                    v.push("building_type", format!("unknown building type id {}", id));
                    None
                }
            });

        let base_height_cm = v.in_range(
            "base_height_cm",
            &self.base_height_cm,
            MIN_BASE_HEIGHT_CM,
            MAX_BASE_HEIGHT_CM,
        );

        let layout = if self.all_bases_similar {
            let length = v.positive("length", &self.length);
            let width = v.positive("width", &self.width);
            let count = v.positive_integer("total_number_of_bases", &self.total_number_of_bases);
            match (length, width, count) {
                (Some(length_m), Some(width_m), Some(count)) => Some(BaseLayout::Uniform {
                    base: BaseFootprint { length_m, width_m },
                    count,
                }),
                _ => None,
            }
        } else {
            self.check_individual_bases(&mut v)
        };

        let built = (|| {
            Some(FoundationInput {
                height_m: height_m?,
                number_of_floors: number_of_floors?,
                slab_area_m2: slab_area_m2?,
                soil_type: soil_type?,
                building_type: building_type?,
                base_height_cm: base_height_cm?,
                base_shape: self.base_shape,
                layout: layout?,
            })
        })();
        v.finish(built)
    }

    /// Rows left entirely blank are skipped; a half-filled row is an error.
    fn check_individual_bases(&self, v: &mut Violations) -> Option<BaseLayout> {
        let mut bases = Vec::new();
        let mut complete = true;

        for (i, raw) in self.bases.iter().enumerate() {
            let prefix = format!("bases[{}]", i);
            if is_blank(&raw.length) && is_blank(&raw.width) {
                continue;
            }
            let length = v.positive(&field(&prefix, "length"), &raw.length);
            let width = v.positive(&field(&prefix, "width"), &raw.width);
            match (length, width) {
                (Some(length_m), Some(width_m)) => bases.push(BaseFootprint { length_m, width_m }),
                _ => complete = false,
            }
        }

        if bases.is_empty() && complete {
            v.push(
                "bases",
                "at least one base with both length and width is required",
            );
            return None;
        }
        if complete {
            Some(BaseLayout::Individual { bases })
        } else {
            None
        }
    }
}

fn is_blank(raw: &RawNumber) -> bool {
    matches!(parse_field(raw), FieldValue::Missing)
}

/// Quantities for one row of bases
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseVolume {
    pub length_m: f64,
    pub width_m: f64,
    /// How many bases share this footprint
    pub count: u32,
    pub footprint_m2: f64,
    /// Reinforced concrete for all bases in the row (m³)
    pub reinforced_concrete_m3: f64,
    /// Plain concrete for all bases in the row (m³)
    pub plain_concrete_m3: f64,
}

/// Results from the foundation calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoundationResult {
    pub base_height_m: f64,
    pub base_shape: BaseShape,
    pub bases: Vec<BaseVolume>,
    pub number_of_bases: u32,
    pub total_footprint_m2: f64,
    pub reinforced_concrete_m3: f64,
    pub plain_concrete_m3: f64,
    pub total_concrete_m3: f64,
    /// slab_area × number_of_floors (m²)
    pub total_floor_area_m2: f64,
    pub soil_type: String,
    pub building_type: String,
}

pub fn calculate(input: &FoundationInput) -> FoundationResult {
    let base_height_m = Meters::from(Centimeters(input.base_height_cm)).0;

    let rows: Vec<(BaseFootprint, u32)> = match &input.layout {
        BaseLayout::Uniform { base, count } => vec![(*base, *count)],
        BaseLayout::Individual { bases } => bases.iter().map(|b| (*b, 1)).collect(),
    };

    let bases: Vec<BaseVolume> = rows
        .into_iter()
        .map(|(base, count)| {
            let footprint_m2 = base.area_m2();
            let n = f64::from(count);
            BaseVolume {
                length_m: base.length_m,
                width_m: base.width_m,
                count,
                footprint_m2,
                reinforced_concrete_m3: footprint_m2 * base_height_m * n,
                plain_concrete_m3: footprint_m2 * input.height_m * n,
            }
        })
        .collect();

    let number_of_bases = bases.iter().map(|b| b.count).sum();
    let total_footprint_m2 = bases.iter().map(|b| b.footprint_m2 * f64::from(b.count)).sum();
    let reinforced_concrete_m3: f64 = bases.iter().map(|b| b.reinforced_concrete_m3).sum();
    let plain_concrete_m3: f64 = bases.iter().map(|b| b.plain_concrete_m3).sum();

    FoundationResult {
        base_height_m,
        base_shape: input.base_shape,
        bases,
        number_of_bases,
        total_footprint_m2,
        reinforced_concrete_m3,
        plain_concrete_m3,
        total_concrete_m3: reinforced_concrete_m3 + plain_concrete_m3,
        total_floor_area_m2: input.slab_area_m2 * f64::from(input.number_of_floors),
        soil_type: input.soil_type.name.clone(),
        building_type: input.building_type.building_type.clone(),
    }
}
