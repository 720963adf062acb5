//! Import summary and reporting
//!
//! Tracks what one document import handed to the appender.

use crate::domain::ids::LocationIdentifier;
use crate::domain::time::MeasurementPeriod;
use std::time::Duration;

/// Summary of one document import
#[derive(Debug, Clone)]
pub struct ImportSummary {
    /// Station the visit was appended to
    pub location: LocationIdentifier,

    /// Visit window
    pub period: MeasurementPeriod,

    /// Number of control conditions appended (0 or 1)
    pub control_conditions: usize,

    /// Number of discharge activities appended (0 or 1)
    pub discharge_activities: usize,

    /// Number of readings appended
    pub readings: usize,

    /// Number of level surveys appended
    pub level_surveys: usize,

    /// True when records were mapped but not appended
    pub dry_run: bool,

    /// Duration of the import
    pub duration: Duration,
}

impl ImportSummary {
    /// Create a summary with no records counted
    pub fn new(location: LocationIdentifier, period: MeasurementPeriod) -> Self {
        Self {
            location,
            period,
            control_conditions: 0,
            discharge_activities: 0,
            readings: 0,
            level_surveys: 0,
            dry_run: false,
            duration: Duration::from_secs(0),
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Total number of records, the visit itself included
    pub fn total_records(&self) -> usize {
        1 + self.control_conditions + self.discharge_activities + self.readings + self.level_surveys
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            station = %self.location,
            start = %self.period.start,
            end = %self.period.end,
            control_conditions = self.control_conditions,
            discharge_activities = self.discharge_activities,
            readings = self.readings,
            level_surveys = self.level_surveys,
            dry_run = self.dry_run,
            duration_ms = self.duration.as_millis() as u64,
            "Import completed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn summary() -> ImportSummary {
        let start = DateTime::parse_from_rfc3339("2024-06-12T09:00:00-06:00").unwrap();
        let end = DateTime::parse_from_rfc3339("2024-06-12T11:30:00-06:00").unwrap();
        ImportSummary::new(
            LocationIdentifier::new("05BH004").unwrap(),
            MeasurementPeriod { start, end },
        )
    }

    #[test]
    fn test_import_summary_creation() {
        let summary = summary();

        assert_eq!(summary.readings, 0);
        assert_eq!(summary.level_surveys, 0);
        assert!(!summary.dry_run);
        assert_eq!(summary.duration, Duration::from_secs(0));
        assert_eq!(summary.total_records(), 1);
    }

    #[test]
    fn test_import_summary_total_records() {
        let mut summary = summary().with_duration(Duration::from_millis(40));
        summary.control_conditions = 1;
        summary.discharge_activities = 1;
        summary.readings = 7;
        summary.level_surveys = 2;

        assert_eq!(summary.total_records(), 12);
        assert_eq!(summary.duration, Duration::from_millis(40));
    }
}
