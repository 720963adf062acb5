//! Vertical construction for mid-section measurements

use super::channels::{InteriorPanel, StationSequence};
use crate::config::{lookup, LookupsConfig};
use crate::core::numbers::{parse_count, parse_number};
use crate::core::time::VisitContext;
use crate::domain::document::{
    is_checked, non_blank, Edge, InstrumentDeployment, MeterUsed, Panel, PointMeasurement,
};
use crate::domain::errors::MappingError;
use crate::domain::records::{
    units, DeploymentMethod, FlowDirection, IceCoveredData, MeasurementCondition, MeterCalibration,
    MeterEquation, MeterType, OpenWaterData, PointVelocityMethod, Segment,
    VelocityDepthObservation, VelocityObservation, Vertical, VerticalType,
};
use crate::domain::result::MappingResult;
use std::collections::BTreeMap;

/// Fractional sampling depth patterns, joined with `/`
const POINT_VELOCITY_PATTERNS: &[(&str, PointVelocityMethod)] = &[
    ("0.5", PointVelocityMethod::OneAtPointFive),
    ("0.6", PointVelocityMethod::OneAtPointSix),
    ("0.2/0.8", PointVelocityMethod::OneAtPointTwoAndPointEight),
    (
        "0.2/0.6/0.8",
        PointVelocityMethod::OneAtPointTwoPointSixAndPointEight,
    ),
];

/// Resolves a panel's point-velocity method from its sampling depths
///
/// `None` when the panel has no point observations.
pub fn point_velocity_method(
    points: &[PointMeasurement],
) -> MappingResult<Option<PointVelocityMethod>> {
    if points.is_empty() {
        return Ok(None);
    }

    let pattern = points
        .iter()
        .map(|p| p.sampling_depth_coefficient.as_deref().unwrap_or("").trim())
        .collect::<Vec<_>>()
        .join("/");

    POINT_VELOCITY_PATTERNS
        .iter()
        .find(|(known, _)| *known == pattern)
        .map(|(_, method)| Some(*method))
        .ok_or_else(|| MappingError::unsupported("point velocity observation pattern", pattern))
}

/// Mode of the verticals' methods; ties go to the first one encountered
pub fn most_common_method(verticals: &[Vertical]) -> PointVelocityMethod {
    let mut counts: Vec<(PointVelocityMethod, usize)> = Vec::new();

    for vertical in verticals {
        let method = vertical.velocity_observation.method;
        match counts.iter_mut().find(|(m, _)| *m == method) {
            Some((_, count)) => *count += 1,
            None => counts.push((method, 1)),
        }
    }

    let mut best: Option<(PointVelocityMethod, usize)> = None;
    for (method, count) in counts {
        if best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((method, count));
        }
    }

    best.map_or(PointVelocityMethod::Unknown, |(method, _)| method)
}

/// Builds verticals for a station sequence
pub struct VerticalBuilder<'a> {
    visit: &'a VisitContext,
    lookups: &'a LookupsConfig,
    meters: Vec<MeterCalibration>,
    placeholder: &'a str,
}

impl<'a> VerticalBuilder<'a> {
    /// Creates a builder with the visit's declared meters
    pub fn new(
        visit: &'a VisitContext,
        lookups: &'a LookupsConfig,
        meters: &[MeterUsed],
        deployment: Option<&InstrumentDeployment>,
        placeholder: &'a str,
    ) -> MappingResult<Self> {
        let meters = meters
            .iter()
            .enumerate()
            .map(|(index, meter)| meter_calibration(meter, index, deployment, lookups, placeholder))
            .collect::<MappingResult<Vec<_>>>()?;

        Ok(Self {
            visit,
            lookups,
            meters,
            placeholder,
        })
    }

    /// Calibration with the given serial number, or the placeholder meter
    pub fn find_meter(&self, serial_number: Option<&str>) -> MeterCalibration {
        non_blank(serial_number)
            .and_then(|serial| self.meters.iter().find(|m| m.serial_number == serial))
            .cloned()
            .unwrap_or_else(|| MeterCalibration::placeholder(self.placeholder))
    }

    /// Builds the ordered verticals, numbered from 1
    pub fn build(&self, sequence: &StationSequence<'_>) -> MappingResult<Vec<Vertical>> {
        let mut verticals = Vec::with_capacity(sequence.vertical_count());

        verticals.push(self.edge_vertical(
            sequence.start_edge,
            VerticalType::StartEdgeNoWaterBefore,
            1,
        )?);

        for InteriorPanel { panel, .. } in &sequence.panels {
            let sequence_number = verticals.len() as u32 + 1;
            verticals.push(self.panel_vertical(panel, sequence_number)?);
        }

        let sequence_number = verticals.len() as u32 + 1;
        verticals.push(self.edge_vertical(
            sequence.end_edge,
            VerticalType::EndEdgeNoWaterAfter,
            sequence_number,
        )?);

        Ok(verticals)
    }

    fn edge_vertical(
        &self,
        edge: &Edge,
        vertical_type: VerticalType,
        sequence_number: u32,
    ) -> MappingResult<Vertical> {
        let context = format!("edge {}", edge.panel_id.unwrap_or(sequence_number));
        let number = |text: &Option<String>, field: &str| parse_number(text.as_deref(), field, &context);

        let tagline_position = number(&edge.tagmark, "tagmark")?;
        let depth = number(&edge.depth, "depth")?;
        let area = number(&edge.area, "area")?;
        let velocity = number(&edge.velocity, "velocity")?;
        let discharge = number(&edge.discharge, "discharge")?;
        let width = number(&edge.width, "width")?;
        let percent_flow = number(&edge.flow, "flow")?;

        Ok(Vertical {
            sequence_number,
            vertical_type,
            measurement_time: self.visit.parse_wall_clock(edge.date.as_deref()).instant(),
            tagline_position,
            sounded_depth: depth,
            effective_depth: depth,
            condition: MeasurementCondition::open_water(),
            flow_direction: FlowDirection::Normal,
            velocity_observation: VelocityObservation {
                method: PointVelocityMethod::Surface,
                mean_velocity: velocity,
                deployment_method: DeploymentMethod::Unspecified,
                meter: self.find_meter(None),
                observations: vec![VelocityDepthObservation {
                    depth,
                    velocity,
                    observation_interval: None,
                    revolution_count: None,
                }],
            },
            segment: Segment {
                area,
                discharge,
                width,
                velocity,
                percent_flow,
            },
        })
    }

    fn panel_vertical(&self, panel: &Panel, sequence_number: u32) -> MappingResult<Vertical> {
        let context = format!("panel {}", panel.panel_id.unwrap_or(sequence_number));
        let number = |text: Option<&str>, field: &str| parse_number(text, field, &context);

        let tagline_position = number(panel.tagmark.as_deref(), "tagmark")?;
        let mut sounded_depth = number(panel.depth_reading.as_deref(), "depth reading")?;
        let mut effective_depth =
            number(panel.depth_with_offset.as_deref(), "depth with offset")?.or(sounded_depth);
        let velocity = number(panel.average_velocity.as_deref(), "average velocity")?;
        let discharge = number(panel.discharge.as_deref(), "discharge")?;
        let width = number(panel.width.as_deref(), "width")?;
        let percent_flow = number(panel.flow.as_deref(), "flow")?;

        let condition = match &panel.ice_covered {
            Some(ice) => {
                let bottom_of_ice = number(
                    ice.water_surface_to_bottom_of_ice.as_deref(),
                    "water surface to bottom of ice",
                )?;
                let bottom_of_slush = number(
                    ice.water_surface_to_bottom_of_slush.as_deref(),
                    "water surface to bottom of slush",
                )?
                .or(bottom_of_ice);

                effective_depth =
                    number(ice.effective_depth.as_deref(), "effective depth")?.or(effective_depth);

                MeasurementCondition::IceCovered(IceCoveredData {
                    ice_assembly: non_blank(ice.ice_assembly.as_deref()).map(str::to_string),
                    ice_thickness: number(ice.ice_thickness.as_deref(), "ice thickness")?,
                    above_footing: number(ice.meter_above_footing.as_deref(), "meter above footing")?,
                    below_footing: number(ice.meter_below_footing.as_deref(), "meter below footing")?,
                    water_surface_to_bottom_of_ice: bottom_of_ice,
                    water_surface_to_bottom_of_slush: bottom_of_slush,
                })
            }
            None => {
                let open = panel.open_water.as_ref();
                MeasurementCondition::OpenWater(OpenWaterData {
                    distance_to_meter: number(
                        open.and_then(|o| o.distance_above_weight.as_deref()),
                        "distance above weight",
                    )?,
                    dry_line_angle: number(panel.dry_angle.as_deref(), "dry angle")?,
                    dry_line_correction: number(panel.dry_correction.as_deref(), "dry correction")?,
                    wet_line_correction: number(panel.wet_correction.as_deref(), "wet correction")?,
                    suspension_weight: non_blank(open.and_then(|o| o.amount_of_weight.as_deref()))
                        .map(str::to_string),
                })
            }
        };

        let (method, observations) = match point_velocity_method(&panel.point_measurements)? {
            Some(method) => {
                let observations = panel
                    .point_measurements
                    .iter()
                    .map(|point| {
                        Ok(VelocityDepthObservation {
                            depth: number(point.measurement_depth.as_deref(), "measurement depth")?,
                            velocity: number(point.velocity.as_deref(), "point velocity")?,
                            observation_interval: number(point.elapsed_time.as_deref(), "elapsed time")?,
                            revolution_count: parse_count(
                                point.revolutions.as_deref(),
                                "revolutions",
                                &context,
                            )?,
                        })
                    })
                    .collect::<MappingResult<Vec<_>>>()?;
                (method, observations)
            }
            None => {
                // Surface observation: no sounding below the water surface
                sounded_depth = Some(0.0);
                effective_depth = Some(0.0);
                let surface = VelocityDepthObservation {
                    depth: Some(0.0),
                    velocity: Some(0.0),
                    observation_interval: None,
                    revolution_count: None,
                };
                (PointVelocityMethod::Surface, vec![surface])
            }
        };

        let area = sounded_depth.zip(width).map(|(depth, width)| depth * width);

        Ok(Vertical {
            sequence_number,
            vertical_type: VerticalType::MidRiver,
            measurement_time: self.visit.parse_wall_clock(panel.date.as_deref()).instant(),
            tagline_position,
            sounded_depth,
            effective_depth,
            condition,
            flow_direction: if is_checked(panel.reverse_flow.as_deref()) {
                FlowDirection::Reversed
            } else {
                FlowDirection::Normal
            },
            velocity_observation: VelocityObservation {
                method,
                mean_velocity: velocity,
                deployment_method: self.panel_deployment_method(panel),
                meter: self.find_meter(panel.meter_number.as_deref()),
                observations,
            },
            segment: Segment {
                area,
                discharge,
                width,
                velocity,
                percent_flow,
            },
        })
    }

    fn panel_deployment_method(&self, panel: &Panel) -> DeploymentMethod {
        if panel.ice_covered.is_some() {
            return DeploymentMethod::Ice;
        }

        let text = panel
            .open_water
            .as_ref()
            .and_then(|o| o.deployment_method.as_deref());

        lookup_or_default(
            &self.lookups.mid_section_deployment_methods,
            text,
            "panel deployment method",
        )
    }
}

/// Maps form text through a lookup table, tolerating unknown text
///
/// Blank text and unknown text both fall back to the unspecified value; only
/// unknown text is logged.
pub fn lookup_or_default<V: Copy + Default>(
    table: &BTreeMap<String, V>,
    text: Option<&str>,
    field: &str,
) -> V {
    let Some(text) = non_blank(text) else {
        return V::default();
    };

    match lookup(table, Some(text)) {
        Some(value) => *value,
        None => {
            tracing::warn!(field = field, text = text, "Unrecognized value, using Unspecified");
            V::default()
        }
    }
}

fn meter_calibration(
    meter: &MeterUsed,
    index: usize,
    deployment: Option<&InstrumentDeployment>,
    lookups: &LookupsConfig,
    placeholder: &str,
) -> MappingResult<MeterCalibration> {
    let context = format!("meter {}", index + 1);
    let or_placeholder =
        |text: Option<&str>| non_blank(text).unwrap_or(placeholder).to_string();

    let model = deployment.and_then(|d| d.model.as_deref());

    let mut equations = Vec::new();
    for equation in &meter.equations {
        let slope = parse_number(equation.slope.as_deref(), "slope", &context)?;
        let intercept = parse_number(equation.intercept.as_deref(), "intercept", &context)?;
        if let (Some(slope), Some(intercept)) = (slope, intercept) {
            equations.push(MeterEquation {
                slope,
                intercept,
                intercept_unit_id: units::VELOCITY.to_string(),
            });
        }
    }

    Ok(MeterCalibration {
        manufacturer: or_placeholder(deployment.and_then(|d| d.manufacturer.as_deref())),
        model: or_placeholder(model),
        serial_number: or_placeholder(meter.number.as_deref()),
        calibration_date: non_blank(meter.calibration_date.as_deref()).map(str::to_string),
        firmware_version: non_blank(deployment.and_then(|d| d.firmware.as_deref()))
            .map(str::to_string),
        meter_type: lookup(&lookups.meter_types, model)
            .copied()
            .unwrap_or(MeterType::Unspecified),
        equations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::discharge::channels::assemble_stations;
    use crate::domain::document::{Channel, IceCovered, MeterEquationText, OpenWater};
    use chrono::{FixedOffset, NaiveDate, Timelike};
    use test_case::test_case;

    fn visit() -> VisitContext {
        VisitContext::new(
            NaiveDate::from_ymd_opt(2024, 6, 12).unwrap(),
            FixedOffset::west_opt(6 * 3600).unwrap(),
        )
    }

    fn point(coefficient: &str) -> PointMeasurement {
        PointMeasurement {
            sampling_depth_coefficient: Some(coefficient.to_string()),
            measurement_depth: Some("0.3".to_string()),
            velocity: Some("0.5".to_string()),
            elapsed_time: Some("40".to_string()),
            revolutions: Some("25".to_string()),
        }
    }

    fn edge(tagmark: &str) -> Edge {
        Edge {
            edge_type: Some("Edge @ Bank".to_string()),
            left_or_right: Some("Left Bank".to_string()),
            tagmark: Some(tagmark.to_string()),
            depth: Some("0.0".to_string()),
            date: Some("2024-06-12T10:00:00".to_string()),
            ..Default::default()
        }
    }

    fn panel(tagmark: &str, coefficients: &[&str]) -> Panel {
        Panel {
            tagmark: Some(tagmark.to_string()),
            depth_reading: Some("1.2".to_string()),
            width: Some("2.0".to_string()),
            average_velocity: Some("0.45".to_string()),
            meter_number: Some("M-100".to_string()),
            point_measurements: coefficients.iter().map(|c| point(c)).collect(),
            ..Default::default()
        }
    }

    fn meters() -> Vec<MeterUsed> {
        vec![MeterUsed {
            number: Some("M-100".to_string()),
            calibration_date: Some("2023-04-01".to_string()),
            equations: vec![
                MeterEquationText {
                    slope: Some("0.68".to_string()),
                    intercept: Some("0.01".to_string()),
                },
                MeterEquationText {
                    slope: Some("0.70".to_string()),
                    intercept: None,
                },
            ],
        }]
    }

    fn builder<'a>(visit: &'a VisitContext, lookups: &'a LookupsConfig) -> VerticalBuilder<'a> {
        let deployment = InstrumentDeployment {
            manufacturer: Some("SonTek".to_string()),
            model: Some("FlowTracker".to_string()),
            ..Default::default()
        };
        VerticalBuilder::new(visit, lookups, &meters(), Some(&deployment), "Unknown").unwrap()
    }

    #[test_case(&["0.6"], PointVelocityMethod::OneAtPointSix ; "six tenths")]
    #[test_case(&["0.5"], PointVelocityMethod::OneAtPointFive ; "half depth")]
    #[test_case(&["0.2", "0.8"], PointVelocityMethod::OneAtPointTwoAndPointEight ; "two point")]
    #[test_case(&["0.2", "0.6", "0.8"], PointVelocityMethod::OneAtPointTwoPointSixAndPointEight ; "three point")]
    fn test_point_velocity_method(coefficients: &[&str], expected: PointVelocityMethod) {
        let points: Vec<_> = coefficients.iter().map(|c| point(c)).collect();
        assert_eq!(point_velocity_method(&points).unwrap(), Some(expected));
    }

    #[test]
    fn test_point_velocity_method_unknown_pattern_is_fatal() {
        let points = vec![point("0.8"), point("0.2")];
        assert!(matches!(
            point_velocity_method(&points),
            Err(MappingError::UnsupportedValue { .. })
        ));
        assert_eq!(point_velocity_method(&[]).unwrap(), None);
    }

    #[test]
    fn test_builds_contiguous_verticals() {
        let channels = vec![Channel {
            edges: vec![edge("0"), edge("10")],
            panels: vec![
                panel("2", &["0.6"]),
                panel("5", &["0.2", "0.8"]),
                panel("8", &["0.6"]),
            ],
        }];
        let sequence = assemble_stations(&channels).unwrap().unwrap();
        let (visit, lookups) = (visit(), LookupsConfig::default());

        let verticals = builder(&visit, &lookups).build(&sequence).unwrap();

        assert_eq!(verticals.len(), 5);
        let numbers: Vec<u32> = verticals.iter().map(|v| v.sequence_number).collect();
        assert_eq!(numbers, [1, 2, 3, 4, 5]);
        assert_eq!(verticals[0].vertical_type, VerticalType::StartEdgeNoWaterBefore);
        assert_eq!(verticals[4].vertical_type, VerticalType::EndEdgeNoWaterAfter);
        assert!(verticals[1..4]
            .iter()
            .all(|v| v.vertical_type == VerticalType::MidRiver));
        assert_eq!(most_common_method(&verticals), PointVelocityMethod::Surface);
    }

    #[test]
    fn test_panel_vertical_details() {
        let (visit, lookups) = (visit(), LookupsConfig::default());
        let mut reversed = panel("4", &["0.6"]);
        reversed.reverse_flow = Some("True".to_string());
        reversed.date = Some("2024-06-12T10:20:00+00:00".to_string());
        reversed.open_water = Some(OpenWater {
            deployment_method: Some("wading".to_string()),
            amount_of_weight: Some("15 lb".to_string()),
            ..Default::default()
        });

        let vertical = builder(&visit, &lookups).panel_vertical(&reversed, 2).unwrap();

        assert_eq!(vertical.flow_direction, FlowDirection::Reversed);
        assert_eq!(vertical.segment.area, Some(1.2 * 2.0));
        assert_eq!(vertical.effective_depth, Some(1.2));
        assert_eq!(vertical.measurement_time.unwrap().minute(), 20);
        assert_eq!(vertical.measurement_time.unwrap().offset(), &visit.utc_offset());
        let observation = &vertical.velocity_observation;
        assert_eq!(observation.deployment_method, DeploymentMethod::Wading);
        assert_eq!(observation.meter.serial_number, "M-100");
        assert_eq!(observation.meter.meter_type, MeterType::Adv);
        assert_eq!(observation.meter.equations.len(), 1);
        assert_eq!(observation.observations[0].revolution_count, Some(25));
        match &vertical.condition {
            MeasurementCondition::OpenWater(open) => {
                assert_eq!(open.suspension_weight.as_deref(), Some("15 lb"))
            }
            other => panic!("expected open water, got {other:?}"),
        }
    }

    #[test]
    fn test_panel_without_points_is_surface_at_zero_depth() {
        let (visit, lookups) = (visit(), LookupsConfig::default());
        let vertical = builder(&visit, &lookups)
            .panel_vertical(&panel("4", &[]), 2)
            .unwrap();

        assert_eq!(vertical.velocity_observation.method, PointVelocityMethod::Surface);
        assert_eq!(vertical.sounded_depth, Some(0.0));
        assert_eq!(vertical.effective_depth, Some(0.0));
        assert_eq!(vertical.segment.area, Some(0.0));
        assert_eq!(vertical.velocity_observation.observations.len(), 1);
    }

    #[test]
    fn test_ice_covered_panel() {
        let (visit, lookups) = (visit(), LookupsConfig::default());
        let mut iced = panel("4", &["0.2", "0.8"]);
        iced.ice_covered = Some(IceCovered {
            ice_thickness: Some("0.4".to_string()),
            water_surface_to_bottom_of_ice: Some("0.35".to_string()),
            effective_depth: Some("0.8".to_string()),
            ..Default::default()
        });

        let vertical = builder(&visit, &lookups).panel_vertical(&iced, 2).unwrap();

        assert_eq!(vertical.effective_depth, Some(0.8));
        assert_eq!(vertical.velocity_observation.deployment_method, DeploymentMethod::Ice);
        match &vertical.condition {
            MeasurementCondition::IceCovered(ice) => {
                assert_eq!(ice.water_surface_to_bottom_of_slush, Some(0.35));
                assert_eq!(ice.ice_thickness, Some(0.4));
            }
            other => panic!("expected ice cover, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_meter_serial_uses_placeholder() {
        let (visit, lookups) = (visit(), LookupsConfig::default());
        let b = builder(&visit, &lookups);
        let meter = b.find_meter(Some("NOPE"));
        assert_eq!(meter.serial_number, "Unknown");
        assert_eq!(meter.equations.len(), 1);
        assert_eq!(b.find_meter(None).serial_number, "Unknown");
    }

    #[test]
    fn test_unparsable_panel_number_is_fatal() {
        let (visit, lookups) = (visit(), LookupsConfig::default());
        let mut broken = panel("4", &["0.6"]);
        broken.width = Some("two".to_string());

        let err = builder(&visit, &lookups).panel_vertical(&broken, 3).unwrap_err();
        assert_eq!(err, MappingError::invalid_number("width", "two", "panel 3"));
    }

    #[test]
    fn test_most_common_method_tie_goes_to_first() {
        let (visit, lookups) = (visit(), LookupsConfig::default());
        let b = builder(&visit, &lookups);
        let verticals = vec![
            b.panel_vertical(&panel("1", &["0.6"]), 1).unwrap(),
            b.panel_vertical(&panel("2", &["0.2", "0.8"]), 2).unwrap(),
            b.panel_vertical(&panel("3", &["0.2", "0.8"]), 3).unwrap(),
            b.panel_vertical(&panel("4", &["0.6"]), 4).unwrap(),
        ];
        assert_eq!(most_common_method(&verticals), PointVelocityMethod::OneAtPointSix);
        assert_eq!(most_common_method(&[]), PointVelocityMethod::Unknown);
    }

    #[test]
    fn test_lookup_or_default_fallback() {
        let lookups = LookupsConfig::default();
        let table = &lookups.mid_section_deployment_methods;
        assert_eq!(
            lookup_or_default(table, Some("Cableway"), "deployment"),
            DeploymentMethod::Cableway
        );
        assert_eq!(
            lookup_or_default(table, Some("Hovercraft"), "deployment"),
            DeploymentMethod::Unspecified
        );
        assert_eq!(
            lookup_or_default(table, None, "deployment"),
            DeploymentMethod::Unspecified
        );
    }
}
