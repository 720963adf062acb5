//! Strict parsing of numeric form fields
//!
//! A blank field means "not recorded" and becomes `None`. Anything else must
//! parse, otherwise the mapping fails naming the field and where it was found.

use crate::domain::errors::MappingError;
use crate::domain::result::MappingResult;

/// Parses an optional decimal value
pub fn parse_number(text: Option<&str>, field: &str, context: &str) -> MappingResult<Option<f64>> {
    let Some(raw) = text.map(str::trim).filter(|t| !t.is_empty()) else {
        return Ok(None);
    };

    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(Some(value)),
        _ => Err(MappingError::invalid_number(field, raw, context)),
    }
}

/// Parses a decimal value that must be present
pub fn require_number(text: Option<&str>, field: &str, context: &str) -> MappingResult<f64> {
    parse_number(text, field, context)?.ok_or_else(|| MappingError::missing(field, context))
}

/// Parses an optional whole count such as a revolution count
pub fn parse_count(text: Option<&str>, field: &str, context: &str) -> MappingResult<Option<u32>> {
    let Some(raw) = text.map(str::trim).filter(|t| !t.is_empty()) else {
        return Ok(None);
    };

    raw.parse::<u32>()
        .map(Some)
        .map_err(|_| MappingError::invalid_number(field, raw, context))
}

/// Formats a value the way the form displays it, to three decimals
pub fn format_f3(value: f64) -> String {
    format!("{value:.3}")
}
