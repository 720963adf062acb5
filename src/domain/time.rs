//! Time values used by the mapping engine
//!
//! Survey forms leave most time fields optional, so a resolved time is either
//! a concrete offset-aware instant or an explicit [`TimeValue::Absent`].

use super::errors::MappingError;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A resolved timestamp, or the explicit absence of one
///
/// Absent values are never compared or averaged; callers filter them out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeValue {
    /// A concrete instant in the location's UTC offset
    Instant(DateTime<FixedOffset>),
    /// The source field was missing or not a recognizable time
    #[default]
    Absent,
}

impl TimeValue {
    /// Returns the instant, if present
    pub fn instant(self) -> Option<DateTime<FixedOffset>> {
        match self {
            TimeValue::Instant(instant) => Some(instant),
            TimeValue::Absent => None,
        }
    }

    /// Returns true when no instant was resolved
    pub fn is_absent(self) -> bool {
        matches!(self, TimeValue::Absent)
    }

    /// Returns this value, or `other` when this one is absent
    pub fn or(self, other: TimeValue) -> TimeValue {
        match self {
            TimeValue::Instant(_) => self,
            TimeValue::Absent => other,
        }
    }

    /// Returns this value, or computes a fallback when this one is absent
    pub fn or_else(self, fallback: impl FnOnce() -> TimeValue) -> TimeValue {
        match self {
            TimeValue::Instant(_) => self,
            TimeValue::Absent => fallback(),
        }
    }
}

impl From<Option<DateTime<FixedOffset>>> for TimeValue {
    fn from(value: Option<DateTime<FixedOffset>>) -> Self {
        value.map_or(TimeValue::Absent, TimeValue::Instant)
    }
}

impl fmt::Display for TimeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeValue::Instant(instant) => write!(f, "{}", instant.to_rfc3339()),
            TimeValue::Absent => write!(f, "<absent>"),
        }
    }
}

/// A closed time window with `start <= end`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeasurementPeriod {
    /// First instant of the window
    pub start: DateTime<FixedOffset>,

    /// Last instant of the window
    pub end: DateTime<FixedOffset>,
}

impl MeasurementPeriod {
    /// Creates a period from two concrete instants
    ///
    /// # Errors
    ///
    /// Returns [`MappingError::InvalidPeriod`] when `end` precedes `start`
    pub fn new(
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
    ) -> Result<Self, MappingError> {
        if end < start {
            return Err(MappingError::InvalidPeriod {
                start: start.to_rfc3339(),
                end: end.to_rfc3339(),
            });
        }
        Ok(Self { start, end })
    }

    /// Creates a period from two resolved time values, if both are present
    pub fn from_time_values(
        start: TimeValue,
        end: TimeValue,
    ) -> Option<Result<Self, MappingError>> {
        match (start.instant(), end.instant()) {
            (Some(start), Some(end)) => Some(Self::new(start, end)),
            _ => None,
        }
    }

    /// Returns true when `instant` falls inside the window
    pub fn contains(&self, instant: DateTime<FixedOffset>) -> bool {
        self.start <= instant && instant <= self.end
    }
}

impl fmt::Display for MeasurementPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.start.to_rfc3339(), self.end.to_rfc3339())
    }
}
