//! Discharge activity mapping
//!
//! A form carries at most one discharge measurement, taken either by the
//! mid-section method (channels of edges and panels, see [`channels`] and
//! [`verticals`]) or by a moving boat ([`adcp`]). The instrument deployment
//! method type decides which.

pub mod adcp;
pub mod channels;
pub mod verticals;

use self::adcp::build_adcp_section;
use self::channels::assemble_stations;
use self::verticals::{lookup_or_default, most_common_method, VerticalBuilder};
use super::numbers::{parse_number, require_number};
use super::stage::{
    decide_mean_gage_height, gage_height_series, select_stage_summary, MeanGageHeightSelector,
};
use super::time::VisitContext;
use crate::config::FieldVisitConfig;
use crate::domain::document::{non_blank, DischargeSummary, Edge, SurveyDocument};
use crate::domain::errors::MappingError;
use crate::domain::records::{
    units, ChannelMeasurement, ChannelMeasurementSection, DischargeActivity, MeanGageHeight,
    Measurement, MidSectionSection, PointVelocityMethod, StartPoint,
};
use crate::domain::result::MappingResult;
use crate::domain::time::{MeasurementPeriod, TimeValue};

const SUMMARY_CONTEXT: &str = "discharge summary";

/// How the discharge was measured, from the deployment method type text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DischargeMethodType {
    None,
    MidSection,
    MovingBoat,
}

impl DischargeMethodType {
    /// Classifies the method type text, ignoring case
    ///
    /// # Errors
    ///
    /// Missing or unknown text is [`MappingError::UnsupportedValue`].
    pub fn classify(text: Option<&str>) -> MappingResult<Self> {
        let text = text.map(str::trim).unwrap_or_default();

        [
            ("None", Self::None),
            ("Mid-section", Self::MidSection),
            ("ADCP by Moving Boat", Self::MovingBoat),
        ]
        .into_iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(text))
        .map(|(_, method)| method)
        .ok_or_else(|| MappingError::unsupported("instrument deployment method type", text))
    }
}

/// Result of mapping the discharge sections
#[derive(Debug, Clone, Default)]
pub struct DischargeOutcome {
    pub activity: Option<DischargeActivity>,
    /// Stage column whose rows were emitted as the mean gage height series
    pub series_selector: Option<MeanGageHeightSelector>,
}

/// Maps the discharge summary and its measurement section
pub struct DischargeMapper<'a> {
    config: &'a FieldVisitConfig,
    visit: &'a VisitContext,
    document: &'a SurveyDocument,
}

impl<'a> DischargeMapper<'a> {
    pub fn new(
        config: &'a FieldVisitConfig,
        visit: &'a VisitContext,
        document: &'a SurveyDocument,
    ) -> Self {
        Self {
            config,
            visit,
            document,
        }
    }

    /// Builds the discharge activity, if the form has one
    ///
    /// A form without a discharge summary, or with method type `None`, has no
    /// activity.
    pub fn map(&self) -> MappingResult<DischargeOutcome> {
        let Some(summary) = self.document.discharge_summary.as_ref() else {
            return Ok(DischargeOutcome::default());
        };

        let deployment = self.document.instrument_deployment.as_ref();
        let method = DischargeMethodType::classify(deployment.and_then(|d| d.method_type.as_deref()))?;
        if method == DischargeMethodType::None {
            return Ok(DischargeOutcome::default());
        }

        let discharge = Measurement::new(
            require_number(summary.discharge.as_deref(), "discharge", SUMMARY_CONTEXT)?,
            units::DISCHARGE,
        );
        let measurement_period = self.measurement_period(summary)?;
        let party = self.document.party();

        let (mean_gage_height, series_selector, stage_comment) = self.mean_gage_height(summary)?;

        let (section, section_comments) = match method {
            DischargeMethodType::MovingBoat => {
                let (section, comments) = build_adcp_section(
                    deployment,
                    self.document.moving_boat.as_ref(),
                    summary,
                    &self.config.lookups,
                )?;
                (ChannelMeasurementSection::Adcp(section), comments)
            }
            _ => (
                ChannelMeasurementSection::MidSection(self.mid_section()?),
                non_blank(summary.remarks.as_deref()).map(str::to_string),
            ),
        };

        let optional = |text: &Option<String>, field: &str, unit: &str| {
            parse_number(text.as_deref(), field, SUMMARY_CONTEXT)
                .map(|value| value.map(|v| Measurement::new(v, unit)))
        };

        let channel_measurement = ChannelMeasurement {
            channel_name: self.config.mapping.default_channel_name.clone(),
            measurement_period,
            discharge: discharge.clone(),
            area: optional(&summary.area, "area", units::AREA)?,
            width: optional(&summary.width, "width", units::DISTANCE)?,
            mean_velocity: optional(&summary.mean_velocity, "mean velocity", units::VELOCITY)?,
            party: party.clone(),
            comments: section_comments,
            section,
        };

        let stage_remarks = self
            .document
            .stage_measurements
            .as_ref()
            .and_then(|s| s.remarks.clone());
        let comments = join_lines([summary.remarks.clone(), stage_comment, stage_remarks]);

        Ok(DischargeOutcome {
            activity: Some(DischargeActivity {
                measurement_period,
                discharge,
                party,
                comments,
                mean_gage_height,
                channel_measurement,
            }),
            series_selector,
        })
    }

    /// The discharge's own start and end, else the ADCP result times
    fn measurement_period(&self, summary: &DischargeSummary) -> MappingResult<MeasurementPeriod> {
        let strict = |text: &Option<String>, field: &str, context: &str| {
            self.visit.parse_time_strict(text.as_deref(), field, context)
        };

        let mut start = strict(&summary.start_time, "start time", SUMMARY_CONTEXT)?;
        let mut end = strict(&summary.end_time, "end time", SUMMARY_CONTEXT)?;

        if let Some(results) = self
            .document
            .moving_boat
            .as_ref()
            .and_then(|m| m.results.as_ref())
        {
            start = start.or(strict(&results.start_time, "start time", "ADCP results")?);
            end = end.or(strict(&results.end_time, "end time", "ADCP results")?);
        }

        match (start, end) {
            (TimeValue::Instant(start), TimeValue::Instant(end)) => {
                Ok(MeasurementPeriod::new(start, end)?)
            }
            (TimeValue::Absent, _) => Err(MappingError::missing("start time", SUMMARY_CONTEXT)),
            (_, TimeValue::Absent) => Err(MappingError::missing("end time", SUMMARY_CONTEXT)),
        }
    }

    #[allow(clippy::type_complexity)]
    fn mean_gage_height(
        &self,
        summary: &DischargeSummary,
    ) -> MappingResult<(Option<MeanGageHeight>, Option<MeanGageHeightSelector>, Option<String>)>
    {
        let stage = self.document.stage_measurements.as_ref();
        let Some(stage_summary) = select_stage_summary(summary, stage)? else {
            return Ok((None, None, None));
        };
        let Some(stage) = stage else {
            return Ok((None, None, None));
        };

        let series = gage_height_series(stage, stage_summary.selector, self.visit)?;
        let mean = decide_mean_gage_height(&stage_summary, series, stage.mgh_method.as_deref());
        let series_selector = matches!(mean, MeanGageHeight::Series(_)).then_some(stage_summary.selector);

        Ok((Some(mean), series_selector, stage_summary.correction_comment()))
    }

    fn mid_section(&self) -> MappingResult<MidSectionSection> {
        let deployment = self.document.instrument_deployment.as_ref();
        let deployment_method = lookup_or_default(
            &self.config.lookups.mid_section_deployment_methods,
            deployment.and_then(|d| d.deployment.as_deref()),
            "deployment method",
        );

        let Some(measurement) = self.document.mid_section.as_ref() else {
            return Ok(MidSectionSection {
                deployment_method,
                start_point: StartPoint::Unspecified,
                velocity_observation_method: PointVelocityMethod::Unknown,
                verticals: Vec::new(),
            });
        };

        let Some(sequence) = assemble_stations(&measurement.channels)? else {
            return Ok(MidSectionSection {
                deployment_method,
                start_point: StartPoint::Unspecified,
                velocity_observation_method: PointVelocityMethod::Unknown,
                verticals: Vec::new(),
            });
        };

        let builder = VerticalBuilder::new(
            self.visit,
            &self.config.lookups,
            &measurement.meters,
            deployment,
            &self.config.mapping.unknown_meter_placeholder,
        )?;
        let verticals = builder.build(&sequence)?;

        Ok(MidSectionSection {
            deployment_method,
            start_point: start_point(sequence.start_edge),
            velocity_observation_method: most_common_method(&verticals),
            verticals,
        })
    }
}

fn start_point(edge: &Edge) -> StartPoint {
    match non_blank(edge.left_or_right.as_deref()) {
        Some(side) if side.eq_ignore_ascii_case("Left Bank") => StartPoint::LeftEdgeOfWater,
        Some(side) if side.eq_ignore_ascii_case("Right Bank") => StartPoint::RightEdgeOfWater,
        _ => StartPoint::Unspecified,
    }
}

/// Joins the non-blank parts with newlines
pub(crate) fn join_lines(parts: impl IntoIterator<Item = Option<String>>) -> Option<String> {
    let lines: Vec<String> = parts
        .into_iter()
        .flatten()
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .collect();

    (!lines.is_empty()).then(|| lines.join("\n"))
}
