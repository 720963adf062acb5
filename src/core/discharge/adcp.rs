//! Moving-boat (ADCP) discharge summary

use super::verticals::lookup_or_default;
use crate::config::{lookup, LookupsConfig};
use crate::core::numbers::parse_number;
use crate::domain::document::{
    is_checked, non_blank, DischargeSummary, InstrumentDeployment, MovingBoatMeasurement,
};
use crate::domain::records::{AdcpSection, MeasurementDevice};
use crate::domain::result::MappingResult;

const DEFAULT_INSTRUMENT: &str = "ADCP";

fn owned(text: Option<&str>) -> Option<String> {
    non_blank(text).map(str::to_string)
}

/// Builds the ADCP section and its comments
///
/// Comments come from the ADCP results, falling back to the discharge remarks.
pub fn build_adcp_section(
    deployment: Option<&InstrumentDeployment>,
    moving_boat: Option<&MovingBoatMeasurement>,
    discharge: &DischargeSummary,
    lookups: &LookupsConfig,
) -> MappingResult<(AdcpSection, Option<String>)> {
    let context = "ADCP info";
    let adcp = deployment.and_then(|d| d.adcp.as_ref());

    let magnetic_variation = parse_number(
        adcp.and_then(|a| a.magnetic_declination.as_deref()),
        "magnetic declination",
        context,
    )?;
    let transducer_depth = parse_number(
        adcp.and_then(|a| a.transducer_depth.as_deref()),
        "transducer depth",
        context,
    )?;
    let bottom_estimate_exponent = parse_number(
        moving_boat.and_then(|m| m.velocity_exponent.as_deref()),
        "velocity exponent",
        "moving boat measurement",
    )?;

    let section = AdcpSection {
        instrument: non_blank(deployment.and_then(|d| d.instrument.as_deref()))
            .unwrap_or(DEFAULT_INSTRUMENT)
            .to_string(),
        firmware_version: owned(deployment.and_then(|d| d.firmware.as_deref())),
        software_version: owned(deployment.and_then(|d| d.software.as_deref())),
        device: MeasurementDevice {
            manufacturer: owned(deployment.and_then(|d| d.manufacturer.as_deref())),
            model: owned(deployment.and_then(|d| d.model.as_deref())),
            serial_number: owned(deployment.and_then(|d| d.serial_number.as_deref())),
        },
        magnetic_variation,
        transducer_depth,
        deployment_method: lookup_or_default(
            &lookups.adcp_deployment_methods,
            deployment.and_then(|d| d.deployment.as_deref()),
            "ADCP deployment method",
        ),
        depth_reference: lookup_or_default(
            &lookups.depth_references,
            moving_boat.and_then(|m| m.depth_reference.as_deref()),
            "depth reference",
        ),
        top_estimate_method: lookup(
            &lookups.top_estimate_methods,
            moving_boat.and_then(|m| m.velocity_top.as_deref()),
        )
        .cloned(),
        bottom_estimate_method: lookup(
            &lookups.bottom_estimate_methods,
            moving_boat.and_then(|m| m.velocity_bottom.as_deref()),
        )
        .cloned(),
        bottom_estimate_exponent,
        number_of_transects: moving_boat.map_or(0, |m| {
            m.transects
                .iter()
                .filter(|t| is_checked(t.included.as_deref()))
                .count()
        }),
    };

    let comments = owned(
        moving_boat
            .and_then(|m| m.results.as_ref())
            .and_then(|r| r.comments.as_deref()),
    )
    .or_else(|| owned(discharge.remarks.as_deref()));

    Ok((section, comments))
}
