//! Configuration schema types
//!
//! This module defines the configuration structure for fieldvisit: the version
//! window, location offsets, mapping placeholders, the known-sensor table and
//! the text lookup tables used while mapping a survey document.

use crate::domain::records::{AdcpDeploymentMethod, DeploymentMethod, DepthReference, MeterType};
use crate::domain::version::Version;
use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Main fieldvisit configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldVisitConfig {
    /// Application-level settings
    pub application: ApplicationConfig,

    /// Supported document version window
    #[serde(default)]
    pub versions: VersionsConfig,

    /// Station UTC offsets
    #[serde(default)]
    pub location: LocationConfig,

    /// Placeholders and method codes used by the mapping engine
    #[serde(default)]
    pub mapping: MappingConfig,

    /// Known sensors, keyed by the label used on the form
    #[serde(default = "default_sensors")]
    pub sensors: BTreeMap<String, SensorConfig>,

    /// Text lookup tables
    #[serde(default)]
    pub lookups: LookupsConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl FieldVisitConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.versions.validate()?;
        self.location.validate()?;
        self.mapping.validate()?;

        for (label, sensor) in &self.sensors {
            sensor
                .validate()
                .map_err(|e| format!("sensors.\"{label}\": {e}"))?;
        }

        self.logging.validate()?;
        Ok(())
    }

    /// Looks up a known sensor by its form label
    pub fn sensor(&self, label: &str) -> Option<&SensorConfig> {
        self.sensors.get(label.trim())
    }
}

impl Default for FieldVisitConfig {
    fn default() -> Self {
        Self {
            application: ApplicationConfig::default(),
            versions: VersionsConfig::default(),
            location: LocationConfig::default(),
            mapping: MappingConfig::default(),
            sensors: default_sensors(),
            lookups: LookupsConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Dry run mode (map documents but don't write records)
    #[serde(default)]
    pub dry_run: bool,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            dry_run: false,
        }
    }
}

/// Supported survey document versions, both bounds inclusive
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionsConfig {
    #[serde(default = "default_min_version")]
    pub min_version: String,

    #[serde(default = "default_max_version")]
    pub max_version: String,
}

impl VersionsConfig {
    fn validate(&self) -> Result<(), String> {
        let min = Version::parse(&self.min_version)
            .map_err(|e| format!("Invalid versions.min_version: {e}"))?;
        let max = Version::parse(&self.max_version)
            .map_err(|e| format!("Invalid versions.max_version: {e}"))?;

        if max.is_less_than(&min) {
            return Err(format!(
                "versions.max_version '{max}' should not be less than versions.min_version '{min}'"
            ));
        }
        Ok(())
    }
}

impl Default for VersionsConfig {
    fn default() -> Self {
        Self {
            min_version: default_min_version(),
            max_version: default_max_version(),
        }
    }
}

/// UTC offsets of the stations documents come from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationConfig {
    /// Offset used for stations without an entry, `±HH:MM`
    #[serde(default = "default_utc_offset")]
    pub default_utc_offset: String,

    /// Station number to `±HH:MM`
    #[serde(default)]
    pub utc_offsets: BTreeMap<String, String>,
}

impl LocationConfig {
    fn validate(&self) -> Result<(), String> {
        parse_utc_offset(&self.default_utc_offset)
            .map_err(|e| format!("location.default_utc_offset: {e}"))?;
        for (station, offset) in &self.utc_offsets {
            parse_utc_offset(offset).map_err(|e| format!("location.utc_offsets.{station}: {e}"))?;
        }
        Ok(())
    }

    /// Resolves the UTC offset of a station
    pub fn utc_offset_for(&self, station: &str) -> Result<FixedOffset, String> {
        let text = self
            .utc_offsets
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(station.trim()))
            .map_or(self.default_utc_offset.as_str(), |(_, offset)| offset.as_str());
        parse_utc_offset(text)
    }
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            default_utc_offset: default_utc_offset(),
            utc_offsets: BTreeMap::new(),
        }
    }
}

/// Parses a `±HH:MM` offset
pub fn parse_utc_offset(text: &str) -> Result<FixedOffset, String> {
    let text = text.trim();
    text.parse::<FixedOffset>()
        .map_err(|e| format!("Invalid UTC offset '{text}' ({e}). Expected ±HH:MM"))
}

/// Placeholders and method codes used while mapping
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappingConfig {
    /// Channel name given to every channel measurement
    #[serde(default = "default_channel_name")]
    pub default_channel_name: String,

    /// Manufacturer/model/serial used for meters the form does not describe
    #[serde(default = "default_unknown_meter_placeholder")]
    pub unknown_meter_placeholder: String,

    /// Method code of stage readings taken from a logger
    #[serde(default = "default_logger_method_code")]
    pub logger_method_code: String,

    /// Method code of stage readings taken from a water-level reference
    #[serde(default = "default_water_level_method_code")]
    pub water_level_method_code: String,
}

impl MappingConfig {
    fn validate(&self) -> Result<(), String> {
        let required = [
            ("mapping.default_channel_name", &self.default_channel_name),
            ("mapping.unknown_meter_placeholder", &self.unknown_meter_placeholder),
            ("mapping.logger_method_code", &self.logger_method_code),
            ("mapping.water_level_method_code", &self.water_level_method_code),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(format!("{name} cannot be empty"));
            }
        }
        Ok(())
    }
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            default_channel_name: default_channel_name(),
            unknown_meter_placeholder: default_unknown_meter_placeholder(),
            logger_method_code: default_logger_method_code(),
            water_level_method_code: default_water_level_method_code(),
        }
    }
}

/// Parameter and unit a sensor label maps to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorConfig {
    pub parameter_id: String,
    pub unit_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method_code: Option<String>,
}

impl SensorConfig {
    fn new(parameter_id: &str, unit_id: &str) -> Self {
        Self {
            parameter_id: parameter_id.to_string(),
            unit_id: unit_id.to_string(),
            method_code: None,
        }
    }

    fn validate(&self) -> Result<(), String> {
        if self.parameter_id.trim().is_empty() {
            return Err("parameter_id cannot be empty".to_string());
        }
        if self.unit_id.trim().is_empty() {
            return Err("unit_id cannot be empty".to_string());
        }
        Ok(())
    }
}

/// Form text to code or enumerated value tables
///
/// Keys are matched case-insensitively after trimming.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupsConfig {
    #[serde(default = "default_control_conditions")]
    pub control_conditions: BTreeMap<String, String>,

    #[serde(default = "default_top_estimate_methods")]
    pub top_estimate_methods: BTreeMap<String, String>,

    #[serde(default = "default_bottom_estimate_methods")]
    pub bottom_estimate_methods: BTreeMap<String, String>,

    #[serde(default = "default_mid_section_deployment_methods")]
    pub mid_section_deployment_methods: BTreeMap<String, DeploymentMethod>,

    #[serde(default = "default_adcp_deployment_methods")]
    pub adcp_deployment_methods: BTreeMap<String, AdcpDeploymentMethod>,

    #[serde(default = "default_depth_references")]
    pub depth_references: BTreeMap<String, DepthReference>,

    #[serde(default = "default_meter_types")]
    pub meter_types: BTreeMap<String, MeterType>,
}

impl Default for LookupsConfig {
    fn default() -> Self {
        Self {
            control_conditions: default_control_conditions(),
            top_estimate_methods: default_top_estimate_methods(),
            bottom_estimate_methods: default_bottom_estimate_methods(),
            mid_section_deployment_methods: default_mid_section_deployment_methods(),
            adcp_deployment_methods: default_adcp_deployment_methods(),
            depth_references: default_depth_references(),
            meter_types: default_meter_types(),
        }
    }
}

/// Finds a table entry by case-insensitive key
///
/// Blank or missing text never matches.
pub fn lookup<'a, V>(table: &'a BTreeMap<String, V>, text: Option<&str>) -> Option<&'a V> {
    let text = text.map(str::trim).filter(|t| !t.is_empty())?;
    table
        .iter()
        .find(|(key, _)| key.trim().eq_ignore_ascii_case(text))
        .map(|(_, value)| value)
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable the JSON log file
    #[serde(default)]
    pub local_enabled: bool,

    /// Directory the log files are written to
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy (daily, hourly)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local logging is enabled".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_min_version() -> String {
    "v1.3".to_string()
}

fn default_max_version() -> String {
    "v1.3.2".to_string()
}

fn default_utc_offset() -> String {
    "+00:00".to_string()
}

fn default_channel_name() -> String {
    "Main".to_string()
}

fn default_unknown_meter_placeholder() -> String {
    "Unknown".to_string()
}

fn default_logger_method_code() -> String {
    "Logger".to_string()
}

fn default_water_level_method_code() -> String {
    "WaterLevelReference".to_string()
}

fn default_local_path() -> String {
    "logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}

fn default_sensors() -> BTreeMap<String, SensorConfig> {
    [
        ("Wind Speed (km/h)", SensorConfig::new("WS", "km/h")),
        ("Battery Voltage Under Load (V)", SensorConfig::new("VB", "V")),
        ("Tank Pressure (psi)", SensorConfig::new("PT", "psi")),
        ("Tank Feed (psi)", SensorConfig::new("PF", "psi")),
        ("N2 Bubble Rate (B./min)", SensorConfig::new("BR", "B/min")),
        ("Head Stage (m)", SensorConfig::new("HD", "m")),
    ]
    .into_iter()
    .map(|(label, sensor)| (label.to_string(), sensor))
    .collect()
}

fn text_table(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
    entries
        .iter()
        .map(|(text, code)| (text.to_string(), code.to_string()))
        .collect()
}

fn enum_table<V: Copy>(entries: &[(&str, V)]) -> BTreeMap<String, V> {
    entries
        .iter()
        .map(|(text, value)| (text.to_string(), *value))
        .collect()
}

fn default_control_conditions() -> BTreeMap<String, String> {
    text_table(&[
        ("Clear", "Clear"),
        ("Debris Light", "DebrisLight"),
        ("Debris Moderate", "DebrisModerate"),
        ("Debris Heavy", "DebrisHeavy"),
        ("Vegetation Light", "VegetationLight"),
        ("Vegetation Moderate", "VegetationModerate"),
        ("Vegetation Heavy", "VegetationHeavy"),
        ("Ice Anchor", "IceAnchor"),
        ("Ice Cover", "IceCover"),
        ("Fill", "Fill"),
        ("Scour", "Scour"),
    ])
}

fn default_top_estimate_methods() -> BTreeMap<String, String> {
    text_table(&[
        ("Power", "Power"),
        ("Constant", "Constant"),
        ("3-Point", "ThreePoint"),
    ])
}

fn default_bottom_estimate_methods() -> BTreeMap<String, String> {
    text_table(&[("Power", "Power"), ("No Slip", "NoSlip")])
}

fn default_mid_section_deployment_methods() -> BTreeMap<String, DeploymentMethod> {
    use DeploymentMethod::*;
    enum_table(&[
        ("Wading", Wading),
        ("Bridge Upstream", BridgeUpstreamSide),
        ("Bridge Downstream", BridgeDownstreamSide),
        ("Tethered Bridge Upstream", BridgeUpstreamSide),
        ("Tethered Bridge Downstream", BridgeDownstreamSide),
        ("Tethered Cableway", Cableway),
        ("Cableway", Cableway),
        ("Manned Boat", MannedMovingBoat),
        ("Ice Cover", Ice),
        ("Bridge", BridgeCrane),
        ("Boat", Boat),
        ("Ice", Ice),
        ("Ice_Bridge", Ice),
        ("Ice_Cableway", Ice),
        ("Ice_Wading", Ice),
    ])
}

fn default_adcp_deployment_methods() -> BTreeMap<String, AdcpDeploymentMethod> {
    use AdcpDeploymentMethod::*;
    enum_table(&[
        ("Tethered Cableway", Cableway),
        ("Tethered Bridge Upstream", BridgeUpstreamSide),
        ("Tethered Bridge Downstream", BridgeDownstreamSide),
        ("Manned Boat", MannedMovingBoat),
        ("Remote Control", RemoteControlledBoat),
    ])
}

fn default_depth_references() -> BTreeMap<String, DepthReference> {
    use DepthReference::*;
    enum_table(&[
        ("Bottom Track", BottomTrack),
        ("Vertical Beam", VerticalBeam),
        ("Composite (BT)", Composite),
        ("Composite (VB)", Composite),
        ("Depth Sounder", DepthSounder),
    ])
}

fn default_meter_types() -> BTreeMap<String, MeterType> {
    use MeterType::*;
    enum_table(&[("Price AA", PriceAa), ("Pygmy", Pygmy), ("FlowTracker", Adv)])
}
