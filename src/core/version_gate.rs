//! Supported document version window

use crate::domain::errors::{FieldVisitError, MappingError};
use crate::domain::result::{MappingResult, Result};
use crate::domain::version::Version;

/// Rejects documents whose version falls outside `[min, max]`
#[derive(Debug, Clone)]
pub struct VersionGate {
    min: Version,
    max: Version,
}

impl VersionGate {
    /// Builds the gate from configured bounds
    ///
    /// # Errors
    ///
    /// Returns a configuration error when either bound is malformed or `max < min`.
    pub fn new(min: &str, max: &str) -> Result<Self> {
        let min = Version::parse(min).map_err(|e| {
            FieldVisitError::Configuration(format!("Invalid min_version: {e}"))
        })?;
        let max = Version::parse(max).map_err(|e| {
            FieldVisitError::Configuration(format!("Invalid max_version: {e}"))
        })?;

        if max.is_less_than(&min) {
            return Err(FieldVisitError::Configuration(format!(
                "max_version '{max}' must not be less than min_version '{min}'"
            )));
        }

        Ok(Self { min, max })
    }

    pub fn min(&self) -> &Version {
        &self.min
    }

    pub fn max(&self) -> &Version {
        &self.max
    }

    /// Parses the document's version text and checks it against the window
    pub fn reject_if_out_of_range(&self, version_text: Option<&str>) -> MappingResult<Version> {
        let text = version_text
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| MappingError::missing("version", "document root"))?;

        let version = Version::parse(text)?;

        if version.is_less_than(&self.min) {
            return Err(MappingError::UnsupportedVersion {
                version: version.to_string(),
                reason: format!("less than the minimum version of '{}'", self.min),
            });
        }

        if self.max.is_less_than(&version) {
            return Err(MappingError::UnsupportedVersion {
                version: version.to_string(),
                reason: format!("greater than the maximum version of '{}'", self.max),
            });
        }

        Ok(version)
    }
}
