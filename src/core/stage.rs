//! Mean gage height column selection
//!
//! The stage table carries four redundant mean-gage-height columns: two from
//! loggers (HG1, HG2) and two from water-level references (WLR1, WLR2). The
//! discharge summary names the authoritative one in a combo-box label such as
//! `Logger (HG1)`.

use super::numbers::{format_f3, parse_number, require_number};
use super::time::VisitContext;
use crate::domain::document::{
    is_checked, non_blank, DischargeSummary, StageColumn, StageMeasurements, StageRow,
};
use crate::domain::errors::MappingError;
use crate::domain::records::{units, GageHeightMeasurement, MeanGageHeight, Measurement};
use crate::domain::result::MappingResult;
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

const AVERAGE_METHOD: &str = "Average";

fn selected_column_regex() -> &'static Regex {
    static SELECTED_COLUMN: OnceLock<Regex> = OnceLock::new();
    SELECTED_COLUMN.get_or_init(|| {
        Regex::new(r"\(\s*(?P<name>.+?)\s*\)\s*$").expect("selector pattern is valid")
    })
}

/// Which stage column is authoritative for the visit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeanGageHeightSelector {
    Hg1,
    Hg2,
    Wlr1,
    Wlr2,
}

impl MeanGageHeightSelector {
    /// Reads the selector out of a combo-box label
    ///
    /// A blank label means no column was selected. The legacy label `HG`
    /// selects HG1.
    ///
    /// # Errors
    ///
    /// Fails when the label has no parenthesized token or names no known column.
    pub fn from_combo(label: Option<&str>) -> MappingResult<Option<Self>> {
        let Some(label) = non_blank(label) else {
            return Ok(None);
        };

        let name = selected_column_regex()
            .captures(label)
            .and_then(|c| c.name("name"))
            .map(|m| m.as_str())
            .ok_or_else(|| MappingError::unsupported("mean gage height selection", label))?;

        let selector = match name.to_ascii_uppercase().as_str() {
            "HG1" | "HG" => Self::Hg1,
            "HG2" => Self::Hg2,
            "WLR1" => Self::Wlr1,
            "WLR2" => Self::Wlr2,
            _ => return Err(MappingError::unsupported("mean gage height selection", label)),
        };

        Ok(Some(selector))
    }

    pub fn is_logger(self) -> bool {
        matches!(self, Self::Hg1 | Self::Hg2)
    }

    /// This selector's value in one stage row
    pub fn row_value(self, row: &StageRow) -> Option<&str> {
        match self {
            Self::Hg1 => row.hg1.as_deref(),
            Self::Hg2 => row.hg2.as_deref(),
            Self::Wlr1 => row.wl1.as_deref(),
            Self::Wlr2 => row.wl2.as_deref(),
        }
    }

    fn column(self, stage: &StageMeasurements) -> &StageColumn {
        match self {
            Self::Hg1 => &stage.hg1,
            Self::Hg2 => &stage.hg2,
            Self::Wlr1 => &stage.wlr1,
            Self::Wlr2 => &stage.wlr2,
        }
    }
}

impl fmt::Display for MeanGageHeightSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Hg1 => "HG1",
            Self::Hg2 => "HG2",
            Self::Wlr1 => "WLR1",
            Self::Wlr2 => "WLR2",
        };
        write!(f, "{name}")
    }
}

/// Summary values of the selected column
#[derive(Debug, Clone, PartialEq)]
pub struct StageSummary {
    pub selector: MeanGageHeightSelector,
    pub mean_gage_height: f64,
    pub sensor_reset_correction: Option<f64>,
    pub gage_correction: Option<f64>,
    pub corrected_mean_gage_height: f64,
}

impl StageSummary {
    /// Explains how the corrected mean differs from the weighted mean
    ///
    /// `None` when both agree to three decimals.
    pub fn correction_comment(&self) -> Option<String> {
        if format_f3(self.mean_gage_height) == format_f3(self.corrected_mean_gage_height) {
            return None;
        }

        let corrections: Vec<String> = [
            self.sensor_reset_correction
                .map(|v| format!("Sensor Reset Correction of {}", format_f3(v))),
            self.gage_correction
                .map(|v| format!("Gage Correction of {}", format_f3(v))),
        ]
        .into_iter()
        .flatten()
        .collect();

        Some(format!(
            "Corrected M.G.H. includes {} applied to Weighted M.G.H of {}",
            corrections.join(" and "),
            format_f3(self.mean_gage_height)
        ))
    }
}

/// Builds the summary of the column the discharge summary selected
///
/// Returns `None` when no column is selected or the form has no stage section.
pub fn select_stage_summary(
    discharge: &DischargeSummary,
    stage: Option<&StageMeasurements>,
) -> MappingResult<Option<StageSummary>> {
    let Some(selector) = MeanGageHeightSelector::from_combo(discharge.mgh_selection.as_deref())?
    else {
        return Ok(None);
    };
    let Some(stage) = stage else {
        return Ok(None);
    };

    let column = selector.column(stage);
    let context = format!("{selector} stage summary");

    let mean_gage_height =
        require_number(column.mean_gage_height.as_deref(), "mean gage height", &context)?;
    let corrected_mean_gage_height = require_number(
        column.corrected_mean_gage_height.as_deref(),
        "corrected mean gage height",
        &context,
    )?;
    let gage_correction =
        parse_number(column.gage_correction.as_deref(), "gage correction", &context)?;

    // Water-level columns have no sensor to reset
    let sensor_reset_correction = if selector.is_logger() {
        parse_number(
            column.sensor_reset_correction.as_deref(),
            "sensor reset correction",
            &context,
        )?
    } else {
        None
    };

    Ok(Some(StageSummary {
        selector,
        mean_gage_height,
        sensor_reset_correction,
        gage_correction,
        corrected_mean_gage_height,
    }))
}

/// Timestamped readings of the selected column, each flagged by its checkbox
///
/// Rows without a value in the column are skipped. A row with a value must
/// have a valid time.
pub fn gage_height_series(
    stage: &StageMeasurements,
    selector: MeanGageHeightSelector,
    visit: &VisitContext,
) -> MappingResult<Vec<GageHeightMeasurement>> {
    let mut series = Vec::new();

    for (index, row) in stage.rows.iter().enumerate() {
        let context = format!("{selector} stage row {}", row.row.unwrap_or(index as u32 + 1));

        let Some(value) = parse_number(selector.row_value(row), &selector.to_string(), &context)?
        else {
            continue;
        };

        let time = visit
            .parse_time_or_absent(row.time.as_deref())
            .instant()
            .ok_or_else(|| {
                MappingError::invalid_time("time", row.time.clone().unwrap_or_default(), &context)
            })?;

        series.push(GageHeightMeasurement {
            gage_height: Measurement::new(value, units::DISTANCE),
            time,
            include: is_checked(row.mgh_included.as_deref()),
        });
    }

    Ok(series)
}

/// Decides between the per-row series and a single corrected value
///
/// The series is kept only when the form averaged its rows and the corrected
/// mean matches the average of the included rows to three decimals.
pub fn decide_mean_gage_height(
    summary: &StageSummary,
    series: Vec<GageHeightMeasurement>,
    mgh_method: Option<&str>,
) -> MeanGageHeight {
    let averaged = non_blank(mgh_method).map_or(true, |m| m.eq_ignore_ascii_case(AVERAGE_METHOD));

    let included: Vec<f64> = series
        .iter()
        .filter(|m| m.include)
        .map(|m| m.gage_height.value)
        .collect();

    if averaged && !included.is_empty() {
        let average = included.iter().sum::<f64>() / included.len() as f64;
        if format_f3(average) == format_f3(summary.corrected_mean_gage_height) {
            return MeanGageHeight::Series(series);
        }
    }

    MeanGageHeight::Manual(Measurement::new(
        summary.corrected_mean_gage_height,
        units::DISTANCE,
    ))
}
