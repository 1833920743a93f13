//! # Input Validation
//!
//! Every calculation runs only after its raw input passes validation. Validation
//! never panics and never mutates the raw input; it either produces the typed
//! [`ElementInput`] the calculators accept, or the full list of human-readable
//! violations.
//!
//! ## Example
//!
//! ```rust
//! use kamiyat_core::calculations::{CalculationType, RawElementInput};
//! use kamiyat_core::reference::ReferenceTables;
//! use kamiyat_core::validation::validate;
//!
//! let raw: RawElementInput = serde_json::from_str(r#"{
//!     "calculation_type": "element-volume",
//!     "tab": "roof",
//!     "length": "12",
//!     "width": "10",
//!     "height": "0"
//! }"#).unwrap();
//!
//! let result = validate(CalculationType::ElementVolume, &raw, &ReferenceTables::builtin());
//! assert_eq!(result.errors(), ["height: must be greater than 0"]);
//! ```

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::calculations::{CalculationType, ElementInput, RawElementInput};
use crate::errors::{EngineError, EngineResult};
use crate::raw::{parse_field, FieldValue, RawNumber};
use crate::reference::ReferenceTables;

/// Outcome of validating one raw input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ValidationResult {
    /// Input passed every rule; carries the typed input for the calculator
    Valid { input: ElementInput },
    /// Input failed; every violation is listed
    Invalid { errors: Vec<String> },
}

impl ValidationResult {
    pub fn is_ok(&self) -> bool {
        matches!(self, ValidationResult::Valid { .. })
    }

    /// Violations (empty when valid)
    pub fn errors(&self) -> &[String] {
        match self {
            ValidationResult::Valid { .. } => &[],
            ValidationResult::Invalid { errors } => errors,
        }
    }

    /// Convert into the engine's error type.
    pub fn into_result(self) -> EngineResult<ElementInput> {
        match self {
            ValidationResult::Valid { input } => Ok(input),
            ValidationResult::Invalid { errors } => Err(EngineError::input(errors)),
        }
    }
}

impl From<Result<ElementInput, Vec<String>>> for ValidationResult {
    fn from(result: Result<ElementInput, Vec<String>>) -> Self {
        match result {
            Ok(input) => ValidationResult::Valid { input },
            Err(errors) => ValidationResult::Invalid { errors },
        }
    }
}

/// Validate raw input for the given calculation type.
///
/// The raw input's own `calculation_type` tag must match `calculation_type`.
pub fn validate(
    calculation_type: CalculationType,
    raw: &RawElementInput,
    tables: &ReferenceTables,
) -> ValidationResult {
    if raw.calculation_type() != calculation_type {
        return ValidationResult::Invalid {
            errors: vec![format!(
                "calculation_type: expected '{}' but the input is '{}'",
                calculation_type,
                raw.calculation_type()
            )],
        };
    }

    let result = match raw {
        RawElementInput::FoundationBase(r) => r.validate(tables).map(ElementInput::FoundationBase),
        RawElementInput::Columns(r) => r.validate().map(ElementInput::Columns),
        RawElementInput::GroundBridges(r) => r.validate().map(ElementInput::GroundBridges),
        RawElementInput::RoofSlab(r) => r.validate().map(ElementInput::RoofSlab),
        RawElementInput::RoofBeamsSteel(r) => r.validate(tables).map(ElementInput::RoofBeamsSteel),
        RawElementInput::RoofSlabSteel(r) => r.validate().map(ElementInput::RoofSlabSteel),
        RawElementInput::ElementVolume(r) => r.validate().map(ElementInput::ElementVolume),
    };
    result.into()
}

/// Collects violations while reading raw fields.
///
/// Each reader returns `Some(value)` only when the field passes, so a typed
/// input can be assembled with `?` once every field has been read.
#[derive(Debug, Default)]
pub struct Violations {
    errors: Vec<String>,
}

impl Violations {
    pub fn new() -> Self {
        Violations::default()
    }

    pub fn push(&mut self, field: &str, message: impl Display) {
        self.errors.push(format!("{}: {}", field, message));
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Required finite number, any sign.
    pub fn finite(&mut self, field: &str, raw: &RawNumber) -> Option<f64> {
        match parse_field(raw) {
            FieldValue::Missing => {
                self.push(field, "is required");
                None
            }
            value => self.finite_value(field, value),
        }
    }

    /// Optional finite number: `None` without a violation when left empty.
    pub fn optional_finite(&mut self, field: &str, raw: &RawNumber) -> Option<f64> {
        match parse_field(raw) {
            FieldValue::Missing => None,
            value => self.finite_value(field, value),
        }
    }

    fn finite_value(&mut self, field: &str, value: FieldValue) -> Option<f64> {
        match value {
            FieldValue::Missing => None,
            FieldValue::Unparseable(text) => {
                self.push(field, format!("'{}' is not a number", text));
                None
            }
            FieldValue::Number(n) if !n.is_finite() => {
                self.push(field, "must be a finite number");
                None
            }
            FieldValue::Number(n) => Some(n),
        }
    }

    /// Required number `> 0`.
    pub fn positive(&mut self, field: &str, raw: &RawNumber) -> Option<f64> {
        let value = self.finite(field, raw)?;
        if value <= 0.0 {
            self.push(field, "must be greater than 0");
            return None;
        }
        Some(value)
    }

    /// Required number `>= 0`.
    pub fn non_negative(&mut self, field: &str, raw: &RawNumber) -> Option<f64> {
        let value = self.finite(field, raw)?;
        if value < 0.0 {
            self.push(field, "must not be negative");
            return None;
        }
        Some(value)
    }

    /// Required whole number `> 0`.
    pub fn positive_integer(&mut self, field: &str, raw: &RawNumber) -> Option<u32> {
        let value = self.positive(field, raw)?;
        if value.fract() != 0.0 || value > f64::from(u32::MAX) {
            self.push(field, "must be a whole number");
            return None;
        }
        Some(value as u32)
    }

    /// Required number within `[min, max]` inclusive.
    pub fn in_range(&mut self, field: &str, raw: &RawNumber, min: f64, max: f64) -> Option<f64> {
        let value = self.finite(field, raw)?;
        if value < min || value > max {
            self.push(field, format!("must be between {} and {}", min, max));
            return None;
        }
        Some(value)
    }

    /// Finish validation: the built value when clean, the violations otherwise.
    pub fn finish<T>(self, built: Option<T>) -> Result<T, Vec<String>> {
        match built {
            Some(value) if self.errors.is_empty() => Ok(value),
            _ if !self.errors.is_empty() => Err(self.errors),
            _ => Err(vec!["input: incomplete".to_string()]),
        }
    }

    pub fn into_errors(self) -> Vec<String> {
        self.errors
    }
}
