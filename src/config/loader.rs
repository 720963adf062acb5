//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::FieldVisitConfig;
use crate::domain::errors::FieldVisitError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into FieldVisitConfig
/// 4. Applies environment variable overrides (FIELDVISIT_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - Environment variable substitution fails
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use fieldvisit::config::loader::load_config;
///
/// let config = load_config("fieldvisit.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<FieldVisitConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(FieldVisitError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        FieldVisitError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    parse_config(&contents)
}

/// Parses configuration text with the same steps as [`load_config`]
pub fn parse_config(contents: &str) -> Result<FieldVisitConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: FieldVisitConfig = toml::from_str(&contents)
        .map_err(|e| FieldVisitError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config);

    config.validate().map_err(|e| {
        FieldVisitError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Expands `${VAR_NAME}` references from the environment
///
/// Comment lines are copied untouched so the generated template can mention
/// variables that are not set.
///
/// # Errors
///
/// Names every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let pattern = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| FieldVisitError::Other(format!("Invalid substitution pattern: {e}")))?;
    let mut unset: Vec<String> = Vec::new();

    let expanded: Vec<String> = input
        .lines()
        .map(|line| {
            if line.trim_start().starts_with('#') {
                return line.to_string();
            }
            pattern
                .replace_all(line, |caps: &regex::Captures<'_>| {
                    std::env::var(&caps[1]).unwrap_or_else(|_| {
                        if !unset.iter().any(|name| name == &caps[1]) {
                            unset.push(caps[1].to_string());
                        }
                        String::new()
                    })
                })
                .into_owned()
        })
        .collect();

    if !unset.is_empty() {
        return Err(FieldVisitError::Configuration(format!(
            "Unset environment variables referenced in configuration: {}",
            unset.join(", ")
        )));
    }

    Ok(expanded.join("\n"))
}

/// Applies environment variable overrides using FIELDVISIT_* prefix
///
/// Environment variables follow the pattern: FIELDVISIT_<SECTION>_<KEY>
/// For example: FIELDVISIT_VERSIONS_MAX_VERSION, FIELDVISIT_LOGGING_LOCAL_PATH
fn apply_env_overrides(config: &mut FieldVisitConfig) {
    // Application overrides
    if let Ok(val) = std::env::var("FIELDVISIT_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Ok(val) = std::env::var("FIELDVISIT_APPLICATION_DRY_RUN") {
        config.application.dry_run = val.parse().unwrap_or(false);
    }

    // Version window overrides
    if let Ok(val) = std::env::var("FIELDVISIT_VERSIONS_MIN_VERSION") {
        config.versions.min_version = val;
    }
    if let Ok(val) = std::env::var("FIELDVISIT_VERSIONS_MAX_VERSION") {
        config.versions.max_version = val;
    }

    // Location overrides
    if let Ok(val) = std::env::var("FIELDVISIT_LOCATION_DEFAULT_UTC_OFFSET") {
        config.location.default_utc_offset = val;
    }

    // Mapping overrides
    if let Ok(val) = std::env::var("FIELDVISIT_MAPPING_DEFAULT_CHANNEL_NAME") {
        config.mapping.default_channel_name = val;
    }

    // Logging overrides
    if let Ok(val) = std::env::var("FIELDVISIT_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("FIELDVISIT_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
}
