//! Field values accepted by the draft mutators, and their coercions

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A loosely-typed value as produced by a form input.
///
/// Text boxes hand over strings, pickers hand over numbers; the editor
/// coerces whatever arrives into the shape the target field needs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FieldValue {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Null,
}

impl FieldValue {
    /// Get the value as a string if possible
    pub fn as_string(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Check if the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Render the value as text for a free-form field.
    ///
    /// `Null` becomes the empty string.
    pub fn to_text(&self) -> String {
        match self {
            FieldValue::String(s) => s.clone(),
            FieldValue::Integer(i) => i.to_string(),
            FieldValue::Float(f) => f.to_string(),
            FieldValue::Boolean(b) => b.to_string(),
            FieldValue::Null => String::new(),
        }
    }

    /// Coerce the value into a non-negative decimal.
    ///
    /// Strings keep their leading numeric prefix (`"12abc"` is 12), anything
    /// that yields no number is 0, and negative results clamp to 0.
    pub fn to_decimal(&self) -> Decimal {
        let parsed = match self {
            FieldValue::String(s) => parse_leading_decimal(s),
            FieldValue::Integer(i) => Some(Decimal::from(*i)),
            FieldValue::Float(f) if f.is_finite() => parse_leading_decimal(&f.to_string()),
            FieldValue::Float(_) | FieldValue::Boolean(_) | FieldValue::Null => None,
        };

        parsed
            .filter(|value| value.is_sign_positive())
            .map(|value| value.normalize())
            .unwrap_or(Decimal::ZERO)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::String(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::String(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Integer(value.into())
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Boolean(value)
    }
}

impl From<Decimal> for FieldValue {
    fn from(value: Decimal) -> Self {
        FieldValue::String(value.to_string())
    }
}

/// Parse the longest numeric prefix of `input`.
///
/// Grammar: optional whitespace, optional sign, digits with at most one
/// decimal point, optional exponent. Returns `None` when no digit is found
/// or the value does not fit a `Decimal`.
fn parse_leading_decimal(input: &str) -> Option<Decimal> {
    let bytes = input.trim_start().as_bytes();
    let mut pos = 0;

    let negative = match bytes.first() {
        Some(b'-') => {
            pos += 1;
            true
        }
        Some(b'+') => {
            pos += 1;
            false
        }
        _ => false,
    };

    let int_start = pos;
    while pos < bytes.len() && bytes[pos].is_ascii_digit() {
        pos += 1;
    }
    let int_digits = &bytes[int_start..pos];

    let mut frac_digits: &[u8] = &[];
    if pos < bytes.len() && bytes[pos] == b'.' {
        let frac_start = pos + 1;
        let mut end = frac_start;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
        frac_digits = &bytes[frac_start..end];
        pos = end;
    }

    if int_digits.is_empty() && frac_digits.is_empty() {
        return None;
    }

    let mut exponent: Option<&[u8]> = None;
    if pos < bytes.len() && (bytes[pos] == b'e' || bytes[pos] == b'E') {
        let exp_start = pos + 1;
        let mut end = exp_start;
        if end < bytes.len() && (bytes[end] == b'-' || bytes[end] == b'+') {
            end += 1;
        }
        let digits_start = end;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
        if end > digits_start {
            exponent = Some(&bytes[exp_start..end]);
        }
    }

    let mut literal = String::new();
    if negative {
        literal.push('-');
    }
    if int_digits.is_empty() {
        literal.push('0');
    } else {
        literal.push_str(std::str::from_utf8(int_digits).ok()?);
    }
    if !frac_digits.is_empty() {
        literal.push('.');
        literal.push_str(std::str::from_utf8(frac_digits).ok()?);
    }

    match exponent {
        Some(exp) => {
            let exp = exp.strip_prefix(b"+").unwrap_or(exp);
            literal.push('e');
            literal.push_str(std::str::from_utf8(exp).ok()?);
            Decimal::from_scientific(&literal).ok()
        }
        None => Decimal::from_str(&literal).ok(),
    }
}
