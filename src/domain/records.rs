//! Normalized hydrological records
//!
//! These are the records handed to a [`FieldDataAppender`](crate::adapters::FieldDataAppender)
//! once a survey document has been mapped. They carry no references back into
//! the input document.

use super::ids::{LocationIdentifier, ReferencePointName};
use super::time::MeasurementPeriod;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Parameter identifiers used by readings the engine emits itself
pub mod parameters {
    /// Stage (gage height)
    pub const GAGE_HEIGHT: &str = "HG";
    /// Water temperature
    pub const WATER_TEMPERATURE: &str = "TW";
    /// Air temperature
    pub const AIR_TEMPERATURE: &str = "TA";
}

/// Unit identifiers of the metric unit system
pub mod units {
    pub const DISTANCE: &str = "m";
    pub const AREA: &str = "m^2";
    pub const VELOCITY: &str = "m/s";
    pub const DISCHARGE: &str = "m^3/s";
    pub const TEMPERATURE: &str = "degC";
}

/// Location a document belongs to, as resolved by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationInfo {
    pub identifier: LocationIdentifier,
    pub utc_offset: FixedOffset,
}

/// A value with its unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub value: f64,
    pub unit_id: String,
}

impl Measurement {
    pub fn new(value: f64, unit_id: impl Into<String>) -> Self {
        Self {
            value,
            unit_id: unit_id.into(),
        }
    }
}

/// Visit-level details: the authoritative window plus free text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldVisitDetails {
    pub period: MeasurementPeriod,
    pub party: Option<String>,
    pub weather: Option<String>,
    pub comments: Option<String>,
}

/// Observed condition of the hydraulic control
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlCondition {
    /// Code from the known control-condition table
    pub condition_type: Option<String>,
    pub remarks: Option<String>,
    /// Holds the condition text when it had no known code
    pub comments: Option<String>,
    pub party: Option<String>,
}

/// How the reading was obtained relative to maintenance at the site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ReadingType {
    #[default]
    Unknown,
    Routine,
    Reference,
    ResetBefore,
    ResetAfter,
    CleaningBefore,
    CleaningAfter,
}

impl ReadingType {
    /// Recognizes a reading type label such as `Reset After` or `reset_after`
    pub fn from_label(text: &str) -> Option<Self> {
        let normalized: String = text
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();

        match normalized.as_str() {
            "unknown" => Some(ReadingType::Unknown),
            "routine" => Some(ReadingType::Routine),
            "reference" => Some(ReadingType::Reference),
            "resetbefore" => Some(ReadingType::ResetBefore),
            "resetafter" => Some(ReadingType::ResetAfter),
            "cleaningbefore" => Some(ReadingType::CleaningBefore),
            "cleaningafter" => Some(ReadingType::CleaningAfter),
            _ => None,
        }
    }
}

/// One time-series reading taken during the visit
///
/// Several readings may share a parameter and time; they are told apart by
/// their method and reading type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub parameter_id: String,
    pub value: f64,
    pub unit_id: String,
    pub time: Option<DateTime<FixedOffset>>,
    pub publish: bool,
    pub reading_type: ReadingType,
    pub method: Option<String>,
    pub reference_point_name: Option<ReferencePointName>,
    pub adjustment_amount: Option<f64>,
    pub comments: Option<String>,
}

impl Reading {
    /// Creates a published reading of unknown type with no time
    pub fn new(parameter_id: impl Into<String>, unit_id: impl Into<String>, value: f64) -> Self {
        Self {
            parameter_id: parameter_id.into(),
            value,
            unit_id: unit_id.into(),
            time: None,
            publish: true,
            reading_type: ReadingType::Unknown,
            method: None,
            reference_point_name: None,
            adjustment_amount: None,
            comments: None,
        }
    }

    pub fn at(mut self, time: Option<DateTime<FixedOffset>>) -> Self {
        self.time = time;
        self
    }

    pub fn of_type(mut self, reading_type: ReadingType) -> Self {
        self.reading_type = reading_type;
        self
    }

    pub fn with_method(mut self, method: Option<String>) -> Self {
        self.method = method;
        self
    }

    pub fn with_reference_point(mut self, name: Option<ReferencePointName>) -> Self {
        self.reference_point_name = name;
        self
    }

    pub fn with_adjustment(mut self, amount: Option<f64>) -> Self {
        self.adjustment_amount = amount;
        self
    }

    pub fn with_comments(mut self, comments: Option<String>) -> Self {
        self.comments = comments;
        self
    }
}

/// One timestamped gage height contributing to a discharge's mean
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GageHeightMeasurement {
    pub gage_height: Measurement,
    pub time: DateTime<FixedOffset>,
    pub include: bool,
}

/// Mean gage height attached to a discharge activity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum MeanGageHeight {
    /// A single corrected value computed on the form
    Manual(Measurement),
    /// The individual readings the mean was averaged from
    Series(Vec<GageHeightMeasurement>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DischargeActivity {
    pub measurement_period: MeasurementPeriod,
    pub discharge: Measurement,
    pub party: Option<String>,
    pub comments: Option<String>,
    pub mean_gage_height: Option<MeanGageHeight>,
    pub channel_measurement: ChannelMeasurement,
}

/// The channel measurement that produced a discharge activity's value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelMeasurement {
    pub channel_name: String,
    pub measurement_period: MeasurementPeriod,
    pub discharge: Measurement,
    pub area: Option<Measurement>,
    pub width: Option<Measurement>,
    pub mean_velocity: Option<Measurement>,
    pub party: Option<String>,
    pub comments: Option<String>,
    pub section: ChannelMeasurementSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method")]
pub enum ChannelMeasurementSection {
    MidSection(MidSectionSection),
    Adcp(AdcpSection),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DeploymentMethod {
    #[default]
    Unspecified,
    Wading,
    BridgeUpstreamSide,
    BridgeDownstreamSide,
    BridgeCrane,
    Cableway,
    MannedMovingBoat,
    Boat,
    Ice,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AdcpDeploymentMethod {
    #[default]
    Unspecified,
    Cableway,
    BridgeUpstreamSide,
    BridgeDownstreamSide,
    MannedMovingBoat,
    RemoteControlledBoat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DepthReference {
    #[default]
    Unspecified,
    BottomTrack,
    VerticalBeam,
    Composite,
    DepthSounder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MeterType {
    #[default]
    Unspecified,
    PriceAa,
    Pygmy,
    Adv,
}

/// Bank the measurement started from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum StartPoint {
    #[default]
    Unspecified,
    LeftEdgeOfWater,
    RightEdgeOfWater,
}

/// Point-velocity observation method, named by fractional sampling depths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PointVelocityMethod {
    #[default]
    Unknown,
    Surface,
    OneAtPointFive,
    OneAtPointSix,
    OneAtPointTwoAndPointEight,
    OneAtPointTwoPointSixAndPointEight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VerticalType {
    StartEdgeNoWaterBefore,
    MidRiver,
    EndEdgeNoWaterAfter,
}

impl VerticalType {
    pub fn is_edge(self) -> bool {
        !matches!(self, VerticalType::MidRiver)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FlowDirection {
    #[default]
    Normal,
    Reversed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeterEquation {
    pub slope: f64,
    pub intercept: f64,
    pub intercept_unit_id: String,
}

/// Current meter used at a vertical, with its rating equations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeterCalibration {
    pub manufacturer: String,
    pub model: String,
    pub serial_number: String,
    pub calibration_date: Option<String>,
    pub firmware_version: Option<String>,
    pub meter_type: MeterType,
    pub equations: Vec<MeterEquation>,
}

impl MeterCalibration {
    /// Stand-in for a meter the form does not describe
    pub fn placeholder(name: &str) -> Self {
        Self {
            manufacturer: name.to_string(),
            model: name.to_string(),
            serial_number: name.to_string(),
            calibration_date: None,
            firmware_version: None,
            meter_type: MeterType::Unspecified,
            equations: vec![MeterEquation {
                slope: 0.0,
                intercept: 0.0,
                intercept_unit_id: units::VELOCITY.to_string(),
            }],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenWaterData {
    pub distance_to_meter: Option<f64>,
    pub dry_line_angle: Option<f64>,
    pub dry_line_correction: Option<f64>,
    pub wet_line_correction: Option<f64>,
    pub suspension_weight: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IceCoveredData {
    pub ice_assembly: Option<String>,
    pub ice_thickness: Option<f64>,
    pub above_footing: Option<f64>,
    pub below_footing: Option<f64>,
    pub water_surface_to_bottom_of_ice: Option<f64>,
    pub water_surface_to_bottom_of_slush: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "condition")]
pub enum MeasurementCondition {
    OpenWater(OpenWaterData),
    IceCovered(IceCoveredData),
}

impl MeasurementCondition {
    /// Open water with nothing recorded, as used for edges
    pub fn open_water() -> Self {
        MeasurementCondition::OpenWater(OpenWaterData {
            distance_to_meter: None,
            dry_line_angle: None,
            dry_line_correction: None,
            wet_line_correction: None,
            suspension_weight: None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VelocityDepthObservation {
    pub depth: Option<f64>,
    pub velocity: Option<f64>,
    pub observation_interval: Option<f64>,
    pub revolution_count: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VelocityObservation {
    pub method: PointVelocityMethod,
    pub mean_velocity: Option<f64>,
    pub deployment_method: DeploymentMethod,
    pub meter: MeterCalibration,
    pub observations: Vec<VelocityDepthObservation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub area: Option<f64>,
    pub discharge: Option<f64>,
    pub width: Option<f64>,
    pub velocity: Option<f64>,
    /// Share of the total discharge, in percent
    pub percent_flow: Option<f64>,
}

/// One station across the measured cross-section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vertical {
    /// Position in the section, contiguous from 1
    pub sequence_number: u32,
    pub vertical_type: VerticalType,
    pub measurement_time: Option<DateTime<FixedOffset>>,
    pub tagline_position: Option<f64>,
    pub sounded_depth: Option<f64>,
    pub effective_depth: Option<f64>,
    pub condition: MeasurementCondition,
    pub flow_direction: FlowDirection,
    pub velocity_observation: VelocityObservation,
    pub segment: Segment,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MidSectionSection {
    pub deployment_method: DeploymentMethod,
    pub start_point: StartPoint,
    /// Most common method across all verticals
    pub velocity_observation_method: PointVelocityMethod,
    pub verticals: Vec<Vertical>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementDevice {
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    pub serial_number: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdcpSection {
    pub instrument: String,
    pub firmware_version: Option<String>,
    pub software_version: Option<String>,
    pub device: MeasurementDevice,
    pub magnetic_variation: Option<f64>,
    pub transducer_depth: Option<f64>,
    pub deployment_method: AdcpDeploymentMethod,
    pub depth_reference: DepthReference,
    /// Picklist code
    pub top_estimate_method: Option<String>,
    /// Picklist code
    pub bottom_estimate_method: Option<String>,
    pub bottom_estimate_exponent: Option<f64>,
    pub number_of_transects: usize,
}

/// Elevation observed for one reference point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelSurveyMeasurement {
    pub reference_point_name: ReferencePointName,
    pub elevation: f64,
    pub time: DateTime<FixedOffset>,
    pub comments: Option<String>,
}

/// Benchmark elevations tied to a common origin
///
/// Each reference point appears at most once in `measurements`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelSurvey {
    pub origin_reference_point_name: ReferencePointName,
    pub comments: Option<String>,
    pub party: Option<String>,
    pub measurements: Vec<LevelSurveyMeasurement>,
}
