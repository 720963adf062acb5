//! Visit assembly
//!
//! The visit window is inferred from every timestamp on the form, then the
//! discharge, readings and level survey are mapped against it. Nothing is
//! handed out until all of them succeeded.

use super::discharge::{join_lines, DischargeMapper};
use super::level_survey::{log_events, reconcile};
use super::readings::{flagged_rows, ReadingAssembler};
use super::time::{mean_of_span, VisitContext};
use crate::config::{lookup, FieldVisitConfig};
use crate::domain::document::{non_blank, SurveyDocument};
use crate::domain::errors::MappingError;
use crate::domain::records::{
    ControlCondition, DischargeActivity, FieldVisitDetails, LevelSurvey, Reading,
};
use crate::domain::result::MappingResult;
use crate::domain::time::{MeasurementPeriod, TimeValue};
use chrono::{DateTime, FixedOffset};

/// Every record mapped from one document
#[derive(Debug, Clone)]
pub struct MappedVisit {
    pub details: FieldVisitDetails,
    pub control_condition: Option<ControlCondition>,
    pub discharge_activity: Option<DischargeActivity>,
    pub readings: Vec<Reading>,
    pub level_surveys: Vec<LevelSurvey>,
}

pub struct VisitAssembler<'a> {
    config: &'a FieldVisitConfig,
    visit: VisitContext,
    document: &'a SurveyDocument,
}

impl<'a> VisitAssembler<'a> {
    pub fn new(
        config: &'a FieldVisitConfig,
        visit: VisitContext,
        document: &'a SurveyDocument,
    ) -> Self {
        Self {
            config,
            visit,
            document,
        }
    }

    /// Maps the whole document
    ///
    /// # Errors
    ///
    /// Any [`MappingError`] from a component aborts the mapping.
    pub fn assemble(&self) -> MappingResult<MappedVisit> {
        let period = self.visit_period()?;

        let discharge = DischargeMapper::new(self.config, &self.visit, self.document).map()?;
        let readings = ReadingAssembler::new(
            self.config,
            &self.visit,
            self.document,
            discharge.series_selector,
        )
        .assemble()?;
        let level_surveys = self.level_surveys(period.start)?;

        Ok(MappedVisit {
            details: self.details(period),
            control_condition: self.control_condition(),
            discharge_activity: discharge.activity,
            readings,
            level_surveys,
        })
    }

    /// Every timestamp on the form, in document order
    pub fn all_times(&self) -> Vec<TimeValue> {
        let document = self.document;
        let visit = &self.visit;
        let time = |text: &Option<String>| visit.parse_time_or_absent(text.as_deref());
        let mut times = Vec::new();

        if let Some(mid_section) = &document.mid_section {
            for channel in &mid_section.channels {
                let panel_dates = channel.panels.iter().map(|p| &p.date);
                let edge_dates = channel.edges.iter().map(|e| &e.date);
                times.extend(
                    panel_dates
                        .chain(edge_dates)
                        .map(|date| visit.parse_wall_clock(date.as_deref())),
                );
            }
        }

        if let Some(stage) = &document.stage_measurements {
            times.extend(stage.rows.iter().map(|row| time(&row.time)));
        }

        if let Some(summary) = &document.discharge_summary {
            times.extend([
                time(&summary.start_time),
                time(&summary.end_time),
                time(&summary.mean_time),
            ]);
        }

        if let Some(results) = &document.measurement_results {
            times.extend(results.sensors.iter().map(|row| time(&row.time)));
        }

        if let Some(notes) = &document.level_notes {
            times.extend(notes.summary_rows.iter().map(|row| time(&row.time)));
        }

        if let Some(moving_boat) = &document.moving_boat {
            times.extend(moving_boat.transects.iter().map(|t| time(&t.start_time)));
            if let Some(results) = &moving_boat.results {
                times.extend([
                    time(&results.start_time),
                    time(&results.end_time),
                    time(&results.mean_time),
                ]);
            }
        }

        times
    }

    /// Earliest to latest timestamp on the form
    ///
    /// # Errors
    ///
    /// Fewer than two timestamps is [`MappingError::InsufficientTimes`].
    pub fn visit_period(&self) -> MappingResult<MeasurementPeriod> {
        let mut instants: Vec<DateTime<FixedOffset>> = self
            .all_times()
            .into_iter()
            .filter_map(TimeValue::instant)
            .collect();
        instants.sort();

        match (instants.first(), instants.last()) {
            (Some(&start), Some(&end)) if instants.len() >= 2 => {
                Ok(MeasurementPeriod::new(start, end)?)
            }
            _ => Err(MappingError::InsufficientTimes {
                count: instants.len(),
                times: instants
                    .iter()
                    .map(DateTime::to_rfc3339)
                    .collect::<Vec<_>>()
                    .join(", "),
            }),
        }
    }

    fn details(&self, period: MeasurementPeriod) -> FieldVisitDetails {
        let conditions = self.document.environment_conditions.as_ref();

        let weather = conditions.and_then(|c| {
            let labelled = [
                ("Cloud Cover", &c.cloud_cover),
                ("Precipitation", &c.precipitation),
                ("Wind Conditions", &c.wind_magnitude),
                ("Wind Speed", &c.wind_speed),
                ("Wind Direction", &c.wind_direction),
            ];
            join_lines(labelled.into_iter().map(|(label, value)| {
                non_blank(value.as_deref()).map(|v| format!("{label}: {v}"))
            }))
        });

        let comments = join_lines([
            conditions.and_then(|c| c.station_health_remark.clone()),
            self.document
                .field_review
                .as_ref()
                .and_then(|r| r.site_notes.clone()),
        ]);

        FieldVisitDetails {
            period,
            party: self.document.party(),
            weather,
            comments,
        }
    }

    fn control_condition(&self) -> Option<ControlCondition> {
        let section = self.document.control_condition.as_ref()?;
        let condition = non_blank(section.condition.as_deref());
        let remarks = non_blank(section.remarks.as_deref()).map(str::to_string);

        if condition.is_none() && remarks.is_none() {
            return None;
        }

        let condition_type = lookup(&self.config.lookups.control_conditions, condition).cloned();
        let comments = match (condition, &condition_type) {
            (Some(text), None) => Some(format!("Control condition: {text}")),
            _ => None,
        };

        Some(ControlCondition {
            condition_type,
            remarks,
            comments,
            party: self.document.party(),
        })
    }

    /// Time given to level survey measurements without a summary-row time
    ///
    /// The middle of the flagged stage rows, else the discharge mean time,
    /// else the start of the visit.
    pub fn survey_time(&self, visit_start: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
        let flagged = self.document.stage_measurements.as_ref().map_or(
            TimeValue::Absent,
            |stage| {
                mean_of_span(
                    flagged_rows(stage)
                        .map(|row| self.visit.parse_time_or_absent(row.time.as_deref())),
                )
            },
        );

        let discharge_mean = self
            .document
            .discharge_summary
            .as_ref()
            .map_or(TimeValue::Absent, |summary| {
                self.visit.parse_time_or_absent(summary.mean_time.as_deref())
            });

        flagged.or(discharge_mean).instant().unwrap_or(visit_start)
    }

    fn level_surveys(&self, visit_start: DateTime<FixedOffset>) -> MappingResult<Vec<LevelSurvey>> {
        let Some(notes) = self.document.level_notes.as_ref() else {
            return Ok(Vec::new());
        };

        let result = reconcile(
            notes,
            self.document.party(),
            self.survey_time(visit_start),
            &self.visit,
        )?;
        log_events(&result.events);

        Ok(result.survey.into_iter().collect())
    }
}
