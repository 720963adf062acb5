//! Survey document input tree
//!
//! The in-memory shape of one hydrometric field-survey form, as produced by an
//! external deserializer. Every section and almost every value is optional and
//! kept as the text the surveyor typed; the engine decides what is required.
//!
//! Documents are usually exchanged as JSON with camelCase keys:
//!
//! ```
//! use fieldvisit::domain::document::SurveyDocument;
//!
//! let document: SurveyDocument = serde_json::from_str(r#"{
//!     "version": "v1.3.2",
//!     "generalInfo": { "stationNumber": "05BH004", "date": "2024/06/12" }
//! }"#).unwrap();
//! assert_eq!(document.version.as_deref(), Some("v1.3.2"));
//! ```

use serde::{Deserialize, Serialize};

/// Interprets a form checkbox value
///
/// Forms store checkboxes as `"True"`/`"False"` text; anything else is unchecked.
pub fn is_checked(value: Option<&str>) -> bool {
    value.is_some_and(|v| v.trim().eq_ignore_ascii_case("true"))
}

/// Returns the trimmed text when it is non-blank
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Root of a parsed survey document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SurveyDocument {
    /// Form version identifier, e.g. `v1.3.2`
    pub version: Option<String>,
    pub general_info: Option<GeneralInfo>,
    pub party_info: Option<PartyInfo>,
    pub environment_conditions: Option<EnvironmentConditions>,
    pub field_review: Option<FieldReview>,
    pub control_condition: Option<ControlConditionSection>,
    pub stage_measurements: Option<StageMeasurements>,
    pub discharge_summary: Option<DischargeSummary>,
    pub instrument_deployment: Option<InstrumentDeployment>,
    pub mid_section: Option<MidSectionMeasurement>,
    pub moving_boat: Option<MovingBoatMeasurement>,
    pub level_notes: Option<LevelNotes>,
    pub measurement_results: Option<MeasurementResults>,
}

impl SurveyDocument {
    /// Station number the survey was collected at
    pub fn station_number(&self) -> Option<&str> {
        non_blank(self.general_info.as_ref()?.station_number.as_deref())
    }

    /// Party (crew) text shared by most records
    pub fn party(&self) -> Option<String> {
        non_blank(self.party_info.as_ref()?.party.as_deref()).map(str::to_string)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneralInfo {
    pub station_number: Option<String>,
    pub station_name: Option<String>,
    /// Visit date, `yyyy/MM/dd`
    pub date: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PartyInfo {
    pub party: Option<String>,
}

/// A value read on arrival and again on departure, each with its own time
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ArrivalDeparture {
    pub arrival: Option<String>,
    pub arrival_time: Option<String>,
    pub departure: Option<String>,
    pub departure_time: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EnvironmentConditions {
    pub cloud_cover: Option<String>,
    pub precipitation: Option<String>,
    pub wind_magnitude: Option<String>,
    pub wind_speed: Option<String>,
    pub wind_direction: Option<String>,
    pub battery_voltage: Option<String>,
    pub tank_pressure: Option<ArrivalDeparture>,
    pub tank_feed: Option<ArrivalDeparture>,
    pub bubble_rate: Option<ArrivalDeparture>,
    pub station_health_remark: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FieldReview {
    pub site_notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ControlConditionSection {
    pub condition: Option<String>,
    pub remarks: Option<String>,
}

/// Summary values of one mean-gage-height column
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StageColumn {
    pub mean_gage_height: Option<String>,
    pub sensor_reset_correction: Option<String>,
    pub gage_correction: Option<String>,
    pub corrected_mean_gage_height: Option<String>,
    /// Benchmark the column's water-level readings were taken from
    pub reference_point: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StageMeasurements {
    pub hg1: StageColumn,
    pub hg2: StageColumn,
    pub wlr1: StageColumn,
    pub wlr2: StageColumn,
    /// How the mean gage height was computed, e.g. `Average`
    pub mgh_method: Option<String>,
    pub remarks: Option<String>,
    pub rows: Vec<StageRow>,
}

/// One timed row of the stage table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StageRow {
    pub row: Option<u32>,
    pub time: Option<String>,
    pub hg1: Option<String>,
    pub hg2: Option<String>,
    pub wl1: Option<String>,
    pub wl2: Option<String>,
    /// Checkbox: row contributes to the mean gage height
    pub mgh_included: Option<String>,
    pub sensor_reset_correction: Option<String>,
    /// Free text such as `Reset After`
    pub correction_action: Option<String>,
    /// Explicit reading type, when the form revision provides one
    pub reading_type: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DischargeSummary {
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub mean_time: Option<String>,
    pub discharge: Option<String>,
    pub area: Option<String>,
    pub width: Option<String>,
    pub mean_velocity: Option<String>,
    pub water_temperature: Option<String>,
    pub air_temperature: Option<String>,
    /// Combo-box label naming the authoritative column, e.g. `Logger (HG1)`
    pub mgh_selection: Option<String>,
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InstrumentDeployment {
    /// `None`, `Mid-section` or `ADCP by Moving Boat`
    pub method_type: Option<String>,
    pub deployment: Option<String>,
    pub instrument: Option<String>,
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    pub serial_number: Option<String>,
    pub firmware: Option<String>,
    pub software: Option<String>,
    pub adcp: Option<AdcpInfo>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdcpInfo {
    pub magnetic_declination: Option<String>,
    pub transducer_depth: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MidSectionMeasurement {
    pub channels: Vec<Channel>,
    pub meters: Vec<MeterUsed>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MeterUsed {
    pub number: Option<String>,
    pub calibration_date: Option<String>,
    pub equations: Vec<MeterEquationText>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MeterEquationText {
    pub slope: Option<String>,
    pub intercept: Option<String>,
}

/// One channel of a mid-section measurement: two edges bounding interior panels
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Channel {
    pub edges: Vec<Edge>,
    pub panels: Vec<Panel>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Edge {
    pub panel_id: Option<u32>,
    /// Wall-clock date and time; any offset marker is not trusted
    pub date: Option<String>,
    /// `Edge @ Bank` for bank edges, anything else for island edges
    pub edge_type: Option<String>,
    /// `Left Bank` or `Right Bank`
    pub left_or_right: Option<String>,
    pub tagmark: Option<String>,
    pub depth: Option<String>,
    pub area: Option<String>,
    pub velocity: Option<String>,
    pub discharge: Option<String>,
    pub width: Option<String>,
    /// Percentage of total flow
    pub flow: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Panel {
    pub panel_id: Option<u32>,
    pub date: Option<String>,
    pub tagmark: Option<String>,
    pub depth_reading: Option<String>,
    pub depth_with_offset: Option<String>,
    pub average_velocity: Option<String>,
    pub discharge: Option<String>,
    pub width: Option<String>,
    pub flow: Option<String>,
    pub reverse_flow: Option<String>,
    pub meter_number: Option<String>,
    pub dry_angle: Option<String>,
    pub dry_correction: Option<String>,
    pub wet_correction: Option<String>,
    pub open_water: Option<OpenWater>,
    pub ice_covered: Option<IceCovered>,
    pub point_measurements: Vec<PointMeasurement>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OpenWater {
    pub deployment_method: Option<String>,
    pub distance_above_weight: Option<String>,
    pub amount_of_weight: Option<String>,
    pub total_depth: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IceCovered {
    pub ice_assembly: Option<String>,
    pub ice_thickness: Option<String>,
    pub meter_above_footing: Option<String>,
    pub meter_below_footing: Option<String>,
    pub water_surface_to_bottom_of_ice: Option<String>,
    pub water_surface_to_bottom_of_slush: Option<String>,
    pub effective_depth: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PointMeasurement {
    /// Fractional sampling depth, e.g. `0.2`
    pub sampling_depth_coefficient: Option<String>,
    pub measurement_depth: Option<String>,
    pub velocity: Option<String>,
    pub elapsed_time: Option<String>,
    pub revolutions: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MovingBoatMeasurement {
    pub depth_reference: Option<String>,
    pub velocity_top: Option<String>,
    pub velocity_bottom: Option<String>,
    pub velocity_exponent: Option<String>,
    pub transects: Vec<Transect>,
    pub results: Option<AdcpResults>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Transect {
    /// Checkbox: transect used in the final discharge
    pub included: Option<String>,
    /// `HH:MM:SS`
    pub start_time: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdcpResults {
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub mean_time: Option<String>,
    pub comments: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LevelNotes {
    pub circuits: Vec<LevelCircuit>,
    pub summary_rows: Vec<LevelSummaryRow>,
    pub comments: Option<String>,
}

/// One differential-leveling circuit
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LevelCircuit {
    /// Checkbox: circuit is uploaded with the visit
    pub include: Option<String>,
    pub rows: Vec<LevelRow>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LevelRow {
    pub station: Option<String>,
    pub backsight: Option<String>,
    pub height_of_instrument: Option<String>,
    pub foresight: Option<String>,
    pub elevation: Option<String>,
    /// Known (established) elevation of the circuit's origin benchmark
    pub establish: Option<String>,
    pub comments: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LevelSummaryRow {
    pub reference: Option<String>,
    pub time: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MeasurementResults {
    pub sensors: Vec<SensorRow>,
}

/// One row of the measurement-results sensor table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SensorRow {
    pub row: Option<u32>,
    /// Sensor label, matched against the configured known sensors
    pub sensor_ref: Option<String>,
    pub time: Option<String>,
    pub observed_value: Option<String>,
    pub sensor_value: Option<String>,
}
