//! # Column Concrete Volume
//!
//! Concrete volume of a set of columns.
//!
//! - Square / rectangular: `V = length × width × height`
//! - Circular: `V = π × (diameter / 2)² × height`
//!
//! The result lists every column's volume and the total.
//!
//! ## Example
//!
//! ```rust
//! use kamiyat_core::calculations::column::{calculate, ColumnSection, ColumnsInput};
//!
//! let input = ColumnsInput {
//!     columns: vec![
//!         ColumnSection::Rectangular { length_m: 0.3, width_m: 0.5, height_m: 3.0 },
//!         ColumnSection::Circular { diameter_m: 0.4, height_m: 3.0 },
//!     ],
//! };
//! let result = calculate(&input);
//! assert_eq!(result.columns.len(), 2);
//! assert!((result.total_volume_m3 - (0.45 + 0.376_991)).abs() < 1e-5);
//! ```

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::raw::RawNumber;
use crate::validation::Violations;

/// Column cross-section shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColumnShape {
    Square,
    Rectangular,
    Circular,
}

/// One validated column.
///
/// ## JSON Example
///
/// ```json
/// { "shape": "circular", "diameter_m": 0.4, "height_m": 3.0 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "kebab-case")]
pub enum ColumnSection {
    Square {
        length_m: f64,
        width_m: f64,
        height_m: f64,
    },
    Rectangular {
        length_m: f64,
        width_m: f64,
        height_m: f64,
    },
    Circular {
        diameter_m: f64,
        height_m: f64,
    },
}

impl ColumnSection {
    pub fn shape(&self) -> ColumnShape {
        match self {
            ColumnSection::Square { .. } => ColumnShape::Square,
            ColumnSection::Rectangular { .. } => ColumnShape::Rectangular,
            ColumnSection::Circular { .. } => ColumnShape::Circular,
        }
    }

    /// Concrete volume of this column (m³)
    pub fn volume_m3(&self) -> f64 {
        match *self {
            ColumnSection::Square {
                length_m,
                width_m,
                height_m,
            }
            | ColumnSection::Rectangular {
                length_m,
                width_m,
                height_m,
            } => length_m * width_m * height_m,
            ColumnSection::Circular {
                diameter_m,
                height_m,
            } => PI * (diameter_m / 2.0).powi(2) * height_m,
        }
    }
}

/// Validated input: every column of the tab.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnsInput {
    pub columns: Vec<ColumnSection>,
}

/// One column as typed into the form.
///
/// Circular columns read `diameter` and `height`; the other shapes read
/// `length`, `width` and `height`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawColumn {
    pub shape: ColumnShape,
    #[serde(default)]
    pub length: RawNumber,
    #[serde(default)]
    pub width: RawNumber,
    #[serde(default)]
    pub height: RawNumber,
    #[serde(default)]
    pub diameter: RawNumber,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawColumnsInput {
    #[serde(default)]
    pub columns: Vec<RawColumn>,
}

impl RawColumnsInput {
    pub fn validate(&self) -> Result<ColumnsInput, Vec<String>> {
        let mut v = Violations::new();
        if self.columns.is_empty() {
            v.push("columns", "at least one column is required");
        }

        let columns: Vec<Option<ColumnSection>> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, raw)| raw.check(&mut v, &format!("columns[{}]", i)))
            .collect();

        v.finish(columns.into_iter().collect::<Option<Vec<_>>>().map(|columns| ColumnsInput { columns }))
    }
}

impl RawColumn {
    fn check(&self, v: &mut Violations, prefix: &str) -> Option<ColumnSection> {
        let height = v.positive(&format!("{}.height", prefix), &self.height);
        match self.shape {
            ColumnShape::Circular => {
                let diameter = v.positive(&format!("{}.diameter", prefix), &self.diameter);
                Some(ColumnSection::Circular {
                    diameter_m: diameter?,
                    height_m: height?,
                })
            }
            ColumnShape::Square | ColumnShape::Rectangular => {
                let length = v.positive(&format!("{}.length", prefix), &self.length);
                let width = v.positive(&format!("{}.width", prefix), &self.width);
                let (length_m, width_m, height_m) = (length?, width?, height?);
                Some(if self.shape == ColumnShape::Square {
                    ColumnSection::Square {
                        length_m,
                        width_m,
                        height_m,
                    }
                } else {
                    ColumnSection::Rectangular {
                        length_m,
                        width_m,
                        height_m,
                    }
                })
            }
        }
    }
}

/// Volume of a single column in the result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnVolume {
    pub shape: ColumnShape,
    pub volume_m3: f64,
}

/// Results from the column calculation.
///
/// ## JSON Example
///
/// ```json
/// {
///   "columns": [
///     { "shape": "rectangular", "volume_m3": 0.45 },
///     { "shape": "circular", "volume_m3": 0.377 }
///   ],
///   "total_volume_m3": 0.827
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnsResult {
    pub columns: Vec<ColumnVolume>,
    pub total_volume_m3: f64,
}

pub fn calculate(input: &ColumnsInput) -> ColumnsResult {
    let columns: Vec<ColumnVolume> = input
        .columns
        .iter()
        .map(|c| ColumnVolume {
            shape: c.shape(),
            volume_m3: c.volume_m3(),
        })
        .collect();
    let total_volume_m3 = columns.iter().map(|c| c.volume_m3).sum();

    ColumnsResult {
        columns,
        total_volume_m3,
    }
}
