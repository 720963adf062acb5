//! Domain error types
//!
//! This module defines the error hierarchy for fieldvisit.
//! Mapping failures are typed so the host can report them as
//! "parsed but data is invalid" rather than as a parse failure.

use thiserror::Error;

/// Main fieldvisit error type
///
/// This is the primary error type used throughout the application.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum FieldVisitError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The document could be read but its content is invalid
    #[error("Mapping error: {0}")]
    Mapping(#[from] MappingError),

    /// Errors raised by a record appender
    #[error("Appender error: {0}")]
    Appender(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

impl FieldVisitError {
    /// Returns true when the error came from the document content itself
    pub fn is_invalid_data(&self) -> bool {
        matches!(self, FieldVisitError::Mapping(_))
    }
}

/// Fatal, structural problems found while mapping one survey document
///
/// Any of these aborts the mapping of the whole document. No partial
/// record set is ever appended.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MappingError {
    /// The version identifier has no leading digit group
    #[error("'{0}' is not a valid survey document version identifier")]
    MalformedVersion(String),

    /// The document version is outside the configured window
    #[error("Unsupported document version '{version}': {reason}")]
    UnsupportedVersion { version: String, reason: String },

    /// A required field is absent
    #[error("Missing required field '{field}' in {context}")]
    MissingField { field: String, context: String },

    /// A numeric field is present but cannot be parsed
    #[error("Can't parse '{value}' as a number for '{field}' in {context}")]
    InvalidNumber {
        field: String,
        value: String,
        context: String,
    },

    /// A required time field is present but cannot be parsed
    #[error("Invalid time '{value}' for '{field}' in {context}")]
    InvalidTime {
        field: String,
        value: String,
        context: String,
    },

    /// A selector or classification text has no known mapping
    #[error("'{value}' is not a supported {field} value")]
    UnsupportedValue { field: String, value: String },

    /// A mid-section channel does not have exactly two edges
    #[error("Channel {channel}: only 2 edges expected but {found} were found")]
    EdgeCount { channel: usize, found: usize },

    /// Not enough timestamps to infer the visit window
    #[error("Can't infer the visit start and end time: {count} time value(s) found [{times}]")]
    InsufficientTimes { count: usize, times: String },

    /// A measurement period ends before it starts
    #[error("Measurement period end {end} is before its start {start}")]
    InvalidPeriod { start: String, end: String },
}

impl MappingError {
    /// Creates a missing field error
    pub fn missing(field: impl Into<String>, context: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
            context: context.into(),
        }
    }

    /// Creates an unparsable number error
    pub fn invalid_number(
        field: impl Into<String>,
        value: impl Into<String>,
        context: impl Into<String>,
    ) -> Self {
        Self::InvalidNumber {
            field: field.into(),
            value: value.into(),
            context: context.into(),
        }
    }

    /// Creates an unparsable time error
    pub fn invalid_time(
        field: impl Into<String>,
        value: impl Into<String>,
        context: impl Into<String>,
    ) -> Self {
        Self::InvalidTime {
            field: field.into(),
            value: value.into(),
            context: context.into(),
        }
    }

    /// Creates an unsupported value error
    pub fn unsupported(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::UnsupportedValue {
            field: field.into(),
            value: value.into(),
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for FieldVisitError {
    fn from(err: std::io::Error) -> Self {
        FieldVisitError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for FieldVisitError {
    fn from(err: serde_json::Error) -> Self {
        FieldVisitError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for FieldVisitError {
    fn from(err: toml::de::Error) -> Self {
        FieldVisitError::Configuration(format!("TOML parse error: {err}"))
    }
}
