//! # Raw Field Values
//!
//! Form fields reach the engine as they were typed: a JSON number, a string,
//! or nothing at all. Strings may use Arabic-Indic digits and the Arabic
//! decimal separator, e.g. `"١٢٫٥"` for 12.5.
//!
//! ```rust
//! use kamiyat_core::raw::{FieldValue, RawValue};
//!
//! assert_eq!(RawValue::from("١٢٫٥").parse(), FieldValue::Number(12.5));
//! assert_eq!(RawValue::from(" 3 ").parse(), FieldValue::Number(3.0));
//! assert_eq!(RawValue::from("").parse(), FieldValue::Missing);
//! ```

use serde::{Deserialize, Serialize};

/// A raw numeric field as submitted by the UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
}

/// Optional raw field; `None` and `null` both mean "not filled in".
pub type RawNumber = Option<RawValue>;

/// Outcome of reading one raw field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Field left empty
    Missing,
    /// Field has text that is not a number
    Unparseable(String),
    /// Parsed value (not yet checked for finiteness or range)
    Number(f64),
}

impl RawValue {
    /// Parse the field into a number.
    pub fn parse(&self) -> FieldValue {
        match self {
            RawValue::Number(n) => FieldValue::Number(*n),
            RawValue::Text(text) => {
                let normalized = normalize_digits(text.trim());
                if normalized.is_empty() {
                    return FieldValue::Missing;
                }
                match normalized.parse::<f64>() {
                    Ok(n) => FieldValue::Number(n),
                    Err(_) => FieldValue::Unparseable(text.clone()),
                }
            }
        }
    }
}

impl From<f64> for RawValue {
    fn from(n: f64) -> Self {
        RawValue::Number(n)
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Text(s.to_string())
    }
}

/// Parse an optional raw field.
pub fn parse_field(raw: &RawNumber) -> FieldValue {
    match raw {
        Some(value) => value.parse(),
        None => FieldValue::Missing,
    }
}

/// Map Arabic-Indic and Extended Arabic-Indic digits to ASCII.
///
/// `٫` (U+066B) becomes `.`, `٬` (U+066C) is dropped.
pub fn normalize_digits(input: &str) -> String {
    input
        .chars()
        .filter_map(|c| match c {
            '\u{0660}'..='\u{0669}' => char::from_digit(c as u32 - 0x0660, 10),
            '\u{06F0}'..='\u{06F9}' => char::from_digit(c as u32 - 0x06F0, 10),
            '\u{066B}' => Some('.'),
            '\u{066C}' => None,
            other => Some(other),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_number_or_string() {
        let n: RawValue = serde_json::from_str("4").unwrap();
        assert_eq!(n.parse(), FieldValue::Number(4.0));

        let s: RawValue = serde_json::from_str("\"0.25\"").unwrap();
        assert_eq!(s.parse(), FieldValue::Number(0.25));
    }

    #[test]
    fn test_null_is_missing() {
        let raw: RawNumber = serde_json::from_str("null").unwrap();
        assert_eq!(parse_field(&raw), FieldValue::Missing);
        assert_eq!(RawValue::from("   ").parse(), FieldValue::Missing);
    }

    #[test]
    fn test_arabic_digits() {
        assert_eq!(normalize_digits("١٢٠"), "120");
        assert_eq!(normalize_digits("۱۲۳"), "123");
        assert_eq!(normalize_digits("١٬٢٠٠٫٥"), "1200.5");
        assert_eq!(RawValue::from("٠٫٢").parse(), FieldValue::Number(0.2));
    }

    #[test]
    fn test_garbage_is_unparseable() {
        assert_eq!(
            RawValue::from("12m").parse(),
            FieldValue::Unparseable("12m".to_string())
        );
    }

    #[test]
    fn test_non_finite_text_still_parses() {
        // Finiteness is a validation rule, not a parsing one
        match RawValue::from("inf").parse() {
            FieldValue::Number(n) => assert!(n.is_infinite()),
            other => panic!("expected a number, got {:?}", other),
        }
    }
}
