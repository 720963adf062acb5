//! Integration tests for level survey reconciliation across circuits

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone};
use fieldvisit::core::level_survey::{reconcile, SurveyEvent};
use fieldvisit::core::time::VisitContext;
use fieldvisit::domain::document::LevelNotes;
use fieldvisit::domain::ReferencePointName;
use serde_json::{json, Value};
use test_case::test_case;

fn offset() -> FixedOffset {
    FixedOffset::west_opt(6 * 3600).unwrap()
}

fn visit() -> VisitContext {
    VisitContext::new(NaiveDate::from_ymd_opt(2024, 6, 12).unwrap(), offset())
}

fn survey_time() -> DateTime<FixedOffset> {
    offset().with_ymd_and_hms(2024, 6, 12, 10, 30, 0).unwrap()
}

fn notes(value: Value) -> LevelNotes {
    serde_json::from_value(value).unwrap()
}

fn two_circuits(first: &str, second: &str) -> LevelNotes {
    notes(json!({
        "circuits": [
            { "include": "True", "rows": [
                { "station": "BM1", "backsight": "1.5", "establish": first },
                { "station": "BM3", "foresight": "1.2", "elevation": "100.400" }
            ]},
            { "include": "True", "rows": [
                { "station": "BM1", "backsight": "1.4", "establish": second }
            ]}
        ]
    }))
}

#[test]
fn test_matching_remeasurement_is_reported_not_duplicated() {
    let result = reconcile(&two_circuits("100.123", "100.123"), None, survey_time(), &visit())
        .unwrap();

    let survey = result.survey.unwrap();
    assert_eq!(survey.measurements.len(), 2);
    assert_eq!(survey.measurements[0].reference_point_name.as_str(), "BM1");
    assert_eq!(survey.measurements[0].elevation, 100.123);
    assert_eq!(
        result.events,
        [SurveyEvent::Remeasured {
            reference: "BM1".to_string(),
            elevation: 100.123
        }]
    );
}

#[test]
fn test_conflicting_remeasurement_keeps_first_elevation() {
    let result = reconcile(&two_circuits("100.123", "100.200"), None, survey_time(), &visit())
        .unwrap();

    let survey = result.survey.unwrap();
    let bm1: Vec<f64> = survey
        .measurements
        .iter()
        .filter(|m| m.reference_point_name.as_str() == "BM1")
        .map(|m| m.elevation)
        .collect();
    assert_eq!(bm1, [100.123]);
    assert_eq!(
        result.events,
        [SurveyEvent::ElevationConflict {
            reference: "BM1".to_string(),
            kept: 100.123,
            ignored: 100.200
        }]
    );
}

#[test]
fn test_excluded_circuits_are_ignored() {
    let result = reconcile(
        &notes(json!({
            "circuits": [
                { "include": "False", "rows": [
                    { "station": "BM9", "backsight": "1.5", "establish": "50.0" }
                ]}
            ]
        })),
        None,
        survey_time(),
        &visit(),
    )
    .unwrap();

    assert!(result.survey.is_none());
    assert!(result.events.is_empty());
}

#[test]
fn test_summary_row_time_wins_over_survey_time() {
    let result = reconcile(
        &notes(json!({
            "circuits": [
                { "include": "True", "rows": [
                    { "station": "BM1", "backsight": "1.5", "establish": "100.0" },
                    { "station": "BM2", "foresight": "1.0", "elevation": "100.5" }
                ]}
            ],
            "summaryRows": [
                { "reference": "bm2", "time": "11:05" },
                { "reference": "BM2", "time": "11:10" }
            ]
        })),
        Some("JD".to_string()),
        survey_time(),
        &visit(),
    )
    .unwrap();

    let survey = result.survey.unwrap();
    assert_eq!(survey.measurements[0].time, survey_time());
    assert_eq!(
        survey.measurements[1].time,
        offset().with_ymd_and_hms(2024, 6, 12, 11, 5, 0).unwrap()
    );
    assert_eq!(
        result.events,
        [SurveyEvent::DuplicateSummaryRow {
            reference: "BM2".to_string()
        }]
    );
}

#[test_case("**BM2", Some("BM2") ; "stars stripped")]
#[test_case("BM3", Some("BM3") ; "unchanged")]
#[test_case("RP1", None ; "placeholder excluded")]
#[test_case("  ", None ; "blank")]
fn test_benchmark_sanitization(raw: &str, expected: Option<&str>) {
    assert_eq!(
        ReferencePointName::sanitize(raw).as_ref().map(|n| n.as_str()),
        expected
    );
}
