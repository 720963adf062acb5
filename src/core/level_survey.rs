//! Level survey reconciliation
//!
//! A form may hold several level-check circuits. Each included circuit starts
//! at an established benchmark (its origin) and measures further reference
//! points. Circuits may re-measure the same benchmark; the first observation
//! wins and later ones are reported as [`SurveyEvent`]s.
//!
//! [`reconcile`] is pure. [`log_events`] turns its events into log lines.

use super::numbers::parse_number;
use super::time::VisitContext;
use crate::domain::document::{is_checked, non_blank, LevelNotes, LevelRow};
use crate::domain::ids::ReferencePointName;
use crate::domain::records::{LevelSurvey, LevelSurveyMeasurement};
use crate::domain::result::MappingResult;
use chrono::{DateTime, FixedOffset};
use regex::Regex;
use std::sync::OnceLock;

/// Elevations closer than this are the same measurement
pub const ELEVATION_TOLERANCE: f64 = 0.0005;

fn turning_point_regex() -> &'static Regex {
    static TURNING_POINT: OnceLock<Regex> = OnceLock::new();
    TURNING_POINT
        .get_or_init(|| Regex::new(r"(?i)^TP\d*$").expect("turning point pattern is valid"))
}

/// Something worth reporting that did not stop the reconciliation
#[derive(Debug, Clone, PartialEq)]
pub enum SurveyEvent {
    /// A later circuit started from a different origin; the first origin is kept
    OriginConflict { kept: String, ignored: String },
    /// A benchmark was re-measured with a different elevation; the first is kept
    ElevationConflict {
        reference: String,
        kept: f64,
        ignored: f64,
    },
    /// A benchmark was re-measured with the same elevation
    Remeasured { reference: String, elevation: f64 },
    /// The summary table lists a benchmark more than once; the first row is used
    DuplicateSummaryRow { reference: String },
}

/// Output of [`reconcile`]
#[derive(Debug, Clone, Default)]
pub struct ReconciledSurvey {
    pub survey: Option<LevelSurvey>,
    pub events: Vec<SurveyEvent>,
}

struct Observation {
    name: ReferencePointName,
    elevation: f64,
    comments: Option<String>,
}

/// Merges every included circuit into at most one level survey
///
/// Measurements are timed by their summary-table row when it has a valid
/// time, otherwise by `survey_time`.
///
/// # Errors
///
/// A present elevation that is not a number is fatal.
pub fn reconcile(
    notes: &LevelNotes,
    party: Option<String>,
    survey_time: DateTime<FixedOffset>,
    visit: &VisitContext,
) -> MappingResult<ReconciledSurvey> {
    let mut events = Vec::new();
    let mut origin: Option<ReferencePointName> = None;
    let mut merged: Vec<(Observation, Vec<String>)> = Vec::new();

    for (circuit_index, circuit) in notes.circuits.iter().enumerate() {
        if !is_checked(circuit.include.as_deref()) {
            continue;
        }

        let observations = circuit_observations(&circuit.rows, circuit_index + 1)?;
        let Some((circuit_origin, observations)) = observations else {
            continue;
        };

        match &origin {
            None => origin = Some(circuit_origin),
            Some(kept) if kept.matching_key() != circuit_origin.matching_key() => {
                events.push(SurveyEvent::OriginConflict {
                    kept: kept.to_string(),
                    ignored: circuit_origin.to_string(),
                });
            }
            Some(_) => {}
        }

        for observation in observations {
            let key = observation.name.matching_key();
            match merged.iter_mut().find(|(m, _)| m.name.matching_key() == key) {
                Some((first, comments)) => {
                    if (first.elevation - observation.elevation).abs() <= ELEVATION_TOLERANCE {
                        events.push(SurveyEvent::Remeasured {
                            reference: first.name.to_string(),
                            elevation: first.elevation,
                        });
                    } else {
                        events.push(SurveyEvent::ElevationConflict {
                            reference: first.name.to_string(),
                            kept: first.elevation,
                            ignored: observation.elevation,
                        });
                    }
                    push_comment(comments, observation.comments);
                }
                None => {
                    let mut comments = Vec::new();
                    push_comment(&mut comments, observation.comments.clone());
                    merged.push((observation, comments));
                }
            }
        }
    }

    let Some(origin) = origin else {
        return Ok(ReconciledSurvey {
            survey: None,
            events,
        });
    };

    let measurements = merged
        .into_iter()
        .map(|(observation, comments)| {
            let time = summary_time(notes, &observation.name, visit, &mut events)
                .unwrap_or(survey_time);
            LevelSurveyMeasurement {
                reference_point_name: observation.name,
                elevation: observation.elevation,
                time,
                comments: (!comments.is_empty()).then(|| comments.join("\n")),
            }
        })
        .collect();

    Ok(ReconciledSurvey {
        survey: Some(LevelSurvey {
            origin_reference_point_name: origin,
            comments: non_blank(notes.comments.as_deref()).map(str::to_string),
            party,
            measurements,
        }),
        events,
    })
}

/// Writes reconciliation events to the log
pub fn log_events(events: &[SurveyEvent]) {
    for event in events {
        match event {
            SurveyEvent::OriginConflict { kept, ignored } => tracing::warn!(
                kept = %kept,
                ignored = %ignored,
                "Level circuits start from different origins, keeping the first"
            ),
            SurveyEvent::ElevationConflict {
                reference,
                kept,
                ignored,
            } => tracing::warn!(
                reference = %reference,
                kept = kept,
                ignored = ignored,
                "Conflicting elevations for reference point, keeping the first"
            ),
            SurveyEvent::Remeasured {
                reference,
                elevation,
            } => tracing::info!(
                reference = %reference,
                elevation = elevation,
                "Reference point remeasured with the same elevation"
            ),
            SurveyEvent::DuplicateSummaryRow { reference } => tracing::warn!(
                reference = %reference,
                "Reference point has multiple summary rows, using the first"
            ),
        }
    }
}

/// The circuit's origin and measured observations, if it establishes one
fn circuit_observations(
    rows: &[LevelRow],
    circuit: usize,
) -> MappingResult<Option<(ReferencePointName, Vec<Observation>)>> {
    let mut origin = None;
    let mut observations = Vec::new();

    for (index, row) in rows.iter().enumerate() {
        let context = format!("level circuit {circuit} row {}", index + 1);
        let established = parse_number(row.establish.as_deref(), "establish", &context)?;

        let elevation = match established {
            Some(elevation) if origin.is_none() => {
                let Some(name) = measured_name(row) else {
                    continue;
                };
                origin = Some(name);
                elevation
            }
            _ if non_blank(row.foresight.as_deref()).is_some() => {
                match parse_number(row.elevation.as_deref(), "elevation", &context)? {
                    Some(elevation) => elevation,
                    None => continue,
                }
            }
            _ => continue,
        };

        let Some(name) = measured_name(row) else {
            continue;
        };

        observations.push(Observation {
            name,
            elevation,
            comments: non_blank(row.comments.as_deref()).map(str::to_string),
        });
    }

    Ok(origin.map(|origin| (origin, observations)))
}

/// Benchmark name of a row, skipping placeholders and turning points
fn measured_name(row: &LevelRow) -> Option<ReferencePointName> {
    let name = ReferencePointName::sanitize(row.station.as_deref()?)?;
    (!turning_point_regex().is_match(name.as_str())).then_some(name)
}

fn push_comment(comments: &mut Vec<String>, comment: Option<String>) {
    if let Some(comment) = comment {
        if !comments.contains(&comment) {
            comments.push(comment);
        }
    }
}

fn summary_time(
    notes: &LevelNotes,
    name: &ReferencePointName,
    visit: &VisitContext,
    events: &mut Vec<SurveyEvent>,
) -> Option<DateTime<FixedOffset>> {
    let key = name.matching_key();
    let mut rows = notes.summary_rows.iter().filter(|row| {
        row.reference
            .as_deref()
            .and_then(ReferencePointName::sanitize)
            .is_some_and(|reference| reference.matching_key() == key)
    });

    let first = rows.next()?;
    if rows.next().is_some() {
        events.push(SurveyEvent::DuplicateSummaryRow {
            reference: name.to_string(),
        });
    }

    visit.parse_time_or_absent(first.time.as_deref()).instant()
}
