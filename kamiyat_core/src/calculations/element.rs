//! # Generic Element Volume
//!
//! Concrete tabs whose quantity reduces to `length × width × height`:
//! column bases, ground beams, ground slab and roof.
//!
//! ## Example
//!
//! ```rust
//! use kamiyat_core::calculations::element::{calculate, BoxDimensions, ElementTab, ElementVolumeInput};
//!
//! let input = ElementVolumeInput {
//!     tab: ElementTab::GroundSlab,
//!     dimensions: BoxDimensions::new(12.0, 10.0, 0.15),
//! };
//! let result = calculate(&input);
//! assert_eq!(result.rounded_volume_m3, 18.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::raw::RawNumber;
use crate::units::round2;
use crate::validation::Violations;

/// Concrete tabs handled by the generic volume calculator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ElementTab {
    ColumnBase,
    GroundBeams,
    GroundSlab,
    Roof,
}

impl ElementTab {
    pub const ALL: [ElementTab; 4] = [
        ElementTab::ColumnBase,
        ElementTab::GroundBeams,
        ElementTab::GroundSlab,
        ElementTab::Roof,
    ];

    /// Stable identifier (matches the JSON value)
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementTab::ColumnBase => "column-base",
            ElementTab::GroundBeams => "ground-beams",
            ElementTab::GroundSlab => "ground-slab",
            ElementTab::Roof => "roof",
        }
    }

    /// Arabic tab title
    pub fn arabic_name(&self) -> &'static str {
        match self {
            ElementTab::ColumnBase => "رقاب الأعمدة",
            ElementTab::GroundBeams => "الميد الأرضية",
            ElementTab::GroundSlab => "البلاطة الأرضية",
            ElementTab::Roof => "السقف",
        }
    }
}

/// Rectangular box in meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxDimensions {
    pub length_m: f64,
    pub width_m: f64,
    pub height_m: f64,
}

impl BoxDimensions {
    pub fn new(length_m: f64, width_m: f64, height_m: f64) -> Self {
        BoxDimensions {
            length_m,
            width_m,
            height_m,
        }
    }

    /// V = l × w × h (m³)
    pub fn volume_m3(&self) -> f64 {
        self.length_m * self.width_m * self.height_m
    }
}

/// Raw box dimensions as typed into a form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawBoxDimensions {
    #[serde(default)]
    pub length: RawNumber,
    #[serde(default)]
    pub width: RawNumber,
    #[serde(default)]
    pub height: RawNumber,
}

impl RawBoxDimensions {
    /// Check all three sides, prefixing field names with `prefix`.
    pub(crate) fn check(&self, v: &mut Violations, prefix: &str) -> Option<BoxDimensions> {
        let length = v.positive(&field(prefix, "length"), &self.length);
        let width = v.positive(&field(prefix, "width"), &self.width);
        let height = v.positive(&field(prefix, "height"), &self.height);
        Some(BoxDimensions::new(length?, width?, height?))
    }
}

pub(crate) fn field(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", prefix, name)
    }
}

/// Validated input for one generic element tab.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementVolumeInput {
    pub tab: ElementTab,
    pub dimensions: BoxDimensions,
}

/// Raw input for one generic element tab.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawElementVolumeInput {
    pub tab: ElementTab,
    #[serde(default)]
    pub length: RawNumber,
    #[serde(default)]
    pub width: RawNumber,
    #[serde(default)]
    pub height: RawNumber,
}

impl RawElementVolumeInput {
    pub fn validate(&self) -> Result<ElementVolumeInput, Vec<String>> {
        let mut v = Violations::new();
        let dimensions = RawBoxDimensions {
            length: self.length.clone(),
            width: self.width.clone(),
            height: self.height.clone(),
        }
        .check(&mut v, "");
        v.finish(dimensions.map(|dimensions| ElementVolumeInput {
            tab: self.tab,
            dimensions,
        }))
    }
}

/// Result for one generic element tab.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementVolumeResult {
    pub tab: ElementTab,
    /// Full-precision volume (m³)
    pub volume_m3: f64,
    /// Volume rounded to 2 decimals for display (m³)
    pub rounded_volume_m3: f64,
}

pub fn calculate(input: &ElementVolumeInput) -> ElementVolumeResult {
    let volume_m3 = input.dimensions.volume_m3();
    ElementVolumeResult {
        tab: input.tab,
        volume_m3,
        rounded_volume_m3: round2(volume_m3),
    }
}
