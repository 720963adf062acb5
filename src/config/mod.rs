//! Configuration management for fieldvisit.
//!
//! This module provides TOML-based configuration loading, parsing, and validation.
//!
//! # Overview
//!
//! fieldvisit uses TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `FIELDVISIT_*` environment overrides
//! - Default values for every optional section
//! - Validation on load
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use fieldvisit::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("fieldvisit.toml")?;
//!
//! println!("Versions: {}..={}", config.versions.min_version, config.versions.max_version);
//! println!("Known sensors: {}", config.sensors.len());
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Application settings (log level, dry run)
//! - [`VersionsConfig`] - Supported document version window
//! - [`LocationConfig`] - Station UTC offsets
//! - [`MappingConfig`] - Channel name, meter placeholder, stage method codes
//! - [`SensorConfig`] - Known sensor labels and their parameter/unit
//! - [`LookupsConfig`] - Form text to code tables
//! - [`LoggingConfig`] - Logging configuration
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [versions]
//! min_version = "v1.3"
//! max_version = "v1.3.2"
//!
//! [location]
//! default_utc_offset = "-06:00"
//!
//! [location.utc_offsets]
//! "05BH004" = "-07:00"
//!
//! [sensors."Head Stage (m)"]
//! parameter_id = "HD"
//! unit_id = "m"
//!
//! [lookups.control_conditions]
//! "Clear" = "Clear"
//! ```

pub mod loader;
pub mod schema;

// Re-export commonly used types
pub use loader::{load_config, parse_config};
pub use schema::{
    lookup, parse_utc_offset, ApplicationConfig, FieldVisitConfig, LocationConfig,
    LoggingConfig, LookupsConfig, MappingConfig, SensorConfig, VersionsConfig,
};
