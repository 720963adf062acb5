//! Domain models and types for fieldvisit.
//!
//! This module contains the input document tree, the normalized output records
//! and the error types shared by every layer.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **The input tree** ([`SurveyDocument`]) mirroring the survey form section by section
//! - **Output records** ([`FieldVisitDetails`], [`DischargeActivity`], [`Reading`], [`LevelSurvey`], ...)
//! - **Time values** ([`TimeValue`], [`MeasurementPeriod`]) with an explicit absent state
//! - **Identifiers** ([`LocationIdentifier`], [`ReferencePointName`])
//! - **Error types** ([`FieldVisitError`], [`MappingError`]) and the [`Result`] alias
//!
//! # Missing Data
//!
//! Survey forms omit fields freely. Optional values stay `Option` all the way
//! to the output records; nothing missing is ever turned into a zero.
//!
//! ```rust
//! use fieldvisit::domain::ReferencePointName;
//!
//! assert_eq!(ReferencePointName::sanitize("**BM2").unwrap().as_str(), "BM2");
//! assert!(ReferencePointName::sanitize("RP1").is_none());
//! ```
//!
//! # Error Handling
//!
//! Mapping failures are [`MappingError`]s and lift into [`FieldVisitError`] with `?`:
//!
//! ```rust
//! use fieldvisit::domain::{MappingError, Result};
//!
//! fn example() -> Result<()> {
//!     let parsed: std::result::Result<(), MappingError> =
//!         Err(MappingError::missing("date", "general info"));
//!     parsed?;
//!     Ok(())
//! }
//! assert!(example().unwrap_err().is_invalid_data());
//! ```

pub mod document;
pub mod errors;
pub mod ids;
pub mod records;
pub mod result;
pub mod time;
pub mod version;

// Re-export commonly used types for convenience
pub use document::SurveyDocument;
pub use errors::{FieldVisitError, MappingError};
pub use ids::{LocationIdentifier, ReferencePointName};
pub use records::{
    ChannelMeasurement, ChannelMeasurementSection, ControlCondition, DischargeActivity,
    FieldVisitDetails, LevelSurvey, LevelSurveyMeasurement, LocationInfo, MeanGageHeight,
    Measurement, Reading, ReadingType, Vertical,
};
pub use result::{MappingResult, Result};
pub use time::{MeasurementPeriod, TimeValue};
pub use version::Version;
