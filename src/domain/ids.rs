//! Domain identifier types with validation
//!
//! This module provides newtype wrappers for the identifiers that leave the
//! engine: the location a visit belongs to and the names of surveyed
//! reference points.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Decoration some forms put in front of a benchmark name
const DECORATION_PREFIX: &str = "**";

/// Reference point codes that are form placeholders rather than real benchmarks
const PLACEHOLDER_REFERENCE_POINTS: &[&str] = &["RP1", "RP2", "RP3", "RP4", "RP5", "RP6"];

/// Location identifier newtype wrapper
///
/// The station number a survey document was collected at.
///
/// # Examples
///
/// ```
/// use fieldvisit::domain::ids::LocationIdentifier;
/// use std::str::FromStr;
///
/// let location = LocationIdentifier::from_str("05BH004").unwrap();
/// assert_eq!(location.as_str(), "05BH004");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocationIdentifier(String);

impl LocationIdentifier {
    /// Creates a new LocationIdentifier, trimming surrounding whitespace
    ///
    /// # Returns
    ///
    /// Returns `Ok(LocationIdentifier)` if the identifier is non-blank, `Err` otherwise
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err("Location identifier cannot be empty".to_string());
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LocationIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for LocationIdentifier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Name of a surveyed reference point (benchmark)
///
/// Only constructed through [`ReferencePointName::sanitize`], so every value
/// is free of form decoration and is never a placeholder code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReferencePointName(String);

impl ReferencePointName {
    /// Cleans a benchmark name taken from the form
    ///
    /// Strips the `**` decoration prefix and surrounding whitespace. Blank
    /// names and placeholder codes (`RP1`..`RP6`) mean "no reference point"
    /// and yield `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// use fieldvisit::domain::ids::ReferencePointName;
    ///
    /// assert_eq!(ReferencePointName::sanitize("**BM2").unwrap().as_str(), "BM2");
    /// assert!(ReferencePointName::sanitize("RP1").is_none());
    /// ```
    pub fn sanitize(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        let name = trimmed
            .strip_prefix(DECORATION_PREFIX)
            .unwrap_or(trimmed)
            .trim();

        if name.is_empty() {
            return None;
        }

        if PLACEHOLDER_REFERENCE_POINTS
            .iter()
            .any(|placeholder| placeholder.eq_ignore_ascii_case(name))
        {
            return None;
        }

        Some(Self(name.to_string()))
    }

    /// Returns the name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive key used to detect remeasured reference points
    pub fn matching_key(&self) -> String {
        self.0.to_uppercase()
    }
}

impl fmt::Display for ReferencePointName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ReferencePointName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
