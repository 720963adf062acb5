//! Time resolution against the visit date and location offset
//!
//! Survey forms record bare times of day (`HH:MM` or `HH:MM:SS`) next to a
//! single visit date, and a few wall-clock date-times whose offset marker
//! cannot be trusted. [`VisitContext`] turns both into offset-aware instants
//! in the location's UTC offset.

use crate::domain::errors::MappingError;
use crate::domain::result::MappingResult;
use crate::domain::time::TimeValue;
use chrono::{
    DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike,
};
use regex::Regex;
use std::sync::OnceLock;

const VISIT_DATE_FORMATS: &[&str] = &["%Y/%m/%d", "%Y-%m-%d"];

const WALL_CLOCK_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

fn time_of_day_regex() -> &'static Regex {
    static TIME_OF_DAY: OnceLock<Regex> = OnceLock::new();
    TIME_OF_DAY.get_or_init(|| {
        Regex::new(r"^\s*(\d{1,2}):(\d{2})(?::(\d{2}))?\s*$").expect("time pattern is valid")
    })
}

/// Date and offset every bare time of day in one document is resolved against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisitContext {
    visit_date: NaiveDate,
    utc_offset: FixedOffset,
}

impl VisitContext {
    pub fn new(visit_date: NaiveDate, utc_offset: FixedOffset) -> Self {
        Self {
            visit_date,
            utc_offset,
        }
    }

    pub fn visit_date(&self) -> NaiveDate {
        self.visit_date
    }

    pub fn utc_offset(&self) -> FixedOffset {
        self.utc_offset
    }

    /// Resolves an `HH:MM[:SS]` time of day on the visit date
    ///
    /// Blank, missing or malformed text yields [`TimeValue::Absent`]; this never fails.
    pub fn parse_time_or_absent(&self, text: Option<&str>) -> TimeValue {
        let Some(captures) = text.and_then(|t| time_of_day_regex().captures(t)) else {
            return TimeValue::Absent;
        };

        let field = |index: usize| -> Option<u32> {
            captures
                .get(index)
                .map_or(Some(0), |m| m.as_str().parse().ok())
        };

        let time = match (field(1), field(2), field(3)) {
            (Some(hour), Some(minute), Some(second)) => {
                NaiveTime::from_hms_opt(hour, minute, second)
            }
            _ => None,
        };

        match time {
            Some(time) => self.coerce_local_date_time(self.visit_date.and_time(time)),
            None => TimeValue::Absent,
        }
    }

    /// Like [`parse_time_or_absent`](Self::parse_time_or_absent) but a present,
    /// unrecognizable value is an error
    ///
    /// Missing text is still absent.
    pub fn parse_time_strict(
        &self,
        text: Option<&str>,
        field: &str,
        context: &str,
    ) -> MappingResult<TimeValue> {
        let Some(raw) = text.filter(|t| !t.trim().is_empty()) else {
            return Ok(TimeValue::Absent);
        };

        match self.parse_time_or_absent(Some(raw)) {
            TimeValue::Absent => Err(MappingError::invalid_time(field, raw, context)),
            resolved => Ok(resolved),
        }
    }

    /// Reinterprets a wall-clock date and time as being in the location offset
    pub fn coerce_local_date_time(&self, local: NaiveDateTime) -> TimeValue {
        self.utc_offset.from_local_datetime(&local).single().into()
    }

    /// Resolves a date-time stamp recorded by the form itself
    ///
    /// Any offset in the text is discarded; only the wall clock is kept and
    /// coerced into the location offset.
    pub fn parse_wall_clock(&self, text: Option<&str>) -> TimeValue {
        let Some(raw) = text.map(str::trim).filter(|t| !t.is_empty()) else {
            return TimeValue::Absent;
        };

        if let Ok(with_offset) = DateTime::parse_from_rfc3339(raw) {
            return self.coerce_local_date_time(with_offset.naive_local());
        }

        WALL_CLOCK_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
            .map_or(TimeValue::Absent, |local| self.coerce_local_date_time(local))
    }
}

/// Parses the visit date (`yyyy/MM/dd`, ISO `yyyy-MM-dd` also accepted)
///
/// # Errors
///
/// Missing or malformed dates are fatal: nothing can be resolved without one.
pub fn parse_visit_date(text: Option<&str>) -> MappingResult<NaiveDate> {
    let raw = text
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| MappingError::missing("date", "general info"))?;

    VISIT_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
        .ok_or_else(|| MappingError::invalid_time("date", raw, "general info"))
}

/// Midpoint of two instants, truncated to the start of its minute
///
/// The inputs may come in either order. When truncation would land before the
/// earlier instant, the earlier instant is returned instead, so the result
/// always lies inside the pair.
pub fn mean_truncated_to_minute(
    a: DateTime<FixedOffset>,
    b: DateTime<FixedOffset>,
) -> DateTime<FixedOffset> {
    let (start, end) = if a <= b { (a, b) } else { (b, a) };

    let exact = start + (end - start) / 2;
    let truncated = exact
        - Duration::seconds(i64::from(exact.second()))
        - Duration::nanoseconds(i64::from(exact.nanosecond()));

    if truncated < start {
        start
    } else {
        truncated
    }
}

/// Midpoint of two resolved times; absent unless both are present
pub fn mean_of(a: TimeValue, b: TimeValue) -> TimeValue {
    match (a.instant(), b.instant()) {
        (Some(a), Some(b)) => TimeValue::Instant(mean_truncated_to_minute(a, b)),
        _ => TimeValue::Absent,
    }
}

/// Midpoint of the first and last present values, in the order given
///
/// Rows are not assumed to be in time order. A single present value is its
/// own midpoint.
pub fn mean_of_span(values: impl IntoIterator<Item = TimeValue>) -> TimeValue {
    let mut instants = values.into_iter().filter_map(TimeValue::instant);
    let Some(first) = instants.next() else {
        return TimeValue::Absent;
    };
    let last = instants.last().unwrap_or(first);
    TimeValue::Instant(mean_truncated_to_minute(first, last))
}
