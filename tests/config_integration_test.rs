//! Integration tests for configuration loading and validation
//!
//! Tests touching environment variables hold `ENV_MUTEX` so they do not
//! observe each other's overrides.

use fieldvisit::config::load_config;
use fieldvisit::domain::records::DeploymentMethod;
use fieldvisit::domain::FieldVisitError;
use std::io::Write;
use std::sync::Mutex;
use tempfile::NamedTempFile;

static ENV_MUTEX: Mutex<()> = Mutex::new(());

fn cleanup_env_vars() {
    std::env::remove_var("FIELDVISIT_APPLICATION_LOG_LEVEL");
    std::env::remove_var("FIELDVISIT_APPLICATION_DRY_RUN");
    std::env::remove_var("FIELDVISIT_VERSIONS_MIN_VERSION");
    std::env::remove_var("FIELDVISIT_VERSIONS_MAX_VERSION");
    std::env::remove_var("FIELDVISIT_LOCATION_DEFAULT_UTC_OFFSET");
    std::env::remove_var("FIELDVISIT_MAPPING_DEFAULT_CHANNEL_NAME");
    std::env::remove_var("FIELDVISIT_LOGGING_LOCAL_ENABLED");
    std::env::remove_var("FIELDVISIT_LOGGING_LOCAL_PATH");
    std::env::remove_var("TEST_STATION_OFFSET");
}

fn write_config(contents: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(contents.as_bytes()).unwrap();
    temp_file.flush().unwrap();
    temp_file
}

#[test]
fn test_load_complete_config() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let temp_file = write_config(
        r#"
[application]
log_level = "debug"
dry_run = true

[versions]
min_version = "v1.3"
max_version = "v1.4"

[location]
default_utc_offset = "-06:00"

[location.utc_offsets]
"05BH004" = "-07:00"

[mapping]
default_channel_name = "Main Channel"
unknown_meter_placeholder = "N/A"
logger_method_code = "LoggerMethod"
water_level_method_code = "WLRMethod"

[sensors."Head Stage (m)"]
parameter_id = "HD"
unit_id = "m"
method_code = "Bubbler"

[lookups.mid_section_deployment_methods]
"Wading" = "Wading"
"Ice" = "Ice"

[logging]
local_enabled = false
local_path = "/tmp/fieldvisit"
local_rotation = "hourly"
"#,
    );

    let config = load_config(temp_file.path()).expect("Failed to load config");

    assert_eq!(config.application.log_level, "debug");
    assert!(config.application.dry_run);
    assert_eq!(config.versions.max_version, "v1.4");
    assert_eq!(
        config
            .location
            .utc_offset_for("05bh004")
            .unwrap()
            .local_minus_utc(),
        -7 * 3600
    );
    assert_eq!(
        config
            .location
            .utc_offset_for("07AA001")
            .unwrap()
            .local_minus_utc(),
        -6 * 3600
    );
    assert_eq!(config.mapping.default_channel_name, "Main Channel");
    assert_eq!(config.mapping.unknown_meter_placeholder, "N/A");

    // An explicit sensors table replaces the built-in one
    assert_eq!(config.sensors.len(), 1);
    let sensor = config.sensor("Head Stage (m)").unwrap();
    assert_eq!(sensor.method_code.as_deref(), Some("Bubbler"));

    assert_eq!(config.lookups.mid_section_deployment_methods.len(), 2);
    assert_eq!(
        config.lookups.mid_section_deployment_methods.get("Ice"),
        Some(&DeploymentMethod::Ice)
    );
    // Tables that were not declared keep their defaults
    assert!(!config.lookups.control_conditions.is_empty());

    assert_eq!(config.logging.local_rotation, "hourly");
}

#[test]
fn test_load_minimal_config_with_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let temp_file = write_config("[application]\n");
    let config = load_config(temp_file.path()).expect("Failed to load config");

    assert_eq!(config.application.log_level, "info");
    assert!(!config.application.dry_run);
    assert_eq!(config.versions.min_version, "v1.3");
    assert_eq!(config.versions.max_version, "v1.3.2");
    assert_eq!(config.location.default_utc_offset, "+00:00");
    assert_eq!(config.mapping.default_channel_name, "Main");
    assert_eq!(config.mapping.logger_method_code, "Logger");
    assert!(config.sensor("Wind Speed (km/h)").is_some());
    assert!(config.sensor("N2 Bubble Rate (B./min)").is_some());
    assert!(!config.logging.local_enabled);
}

#[test]
fn test_env_var_substitution() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("TEST_STATION_OFFSET", "-05:00");

    let temp_file = write_config(
        r#"
[application]

[location]
default_utc_offset = "${TEST_STATION_OFFSET}"
"#,
    );

    let config = load_config(temp_file.path()).expect("Failed to load config");
    assert_eq!(config.location.default_utc_offset, "-05:00");

    std::env::remove_var("TEST_STATION_OFFSET");
}

#[test]
fn test_missing_substitution_variable_is_configuration_error() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let temp_file = write_config(
        r#"
[application]

[location]
default_utc_offset = "${TEST_STATION_OFFSET}"
"#,
    );

    let err = load_config(temp_file.path()).unwrap_err();
    assert!(matches!(err, FieldVisitError::Configuration(_)));
    assert!(err.to_string().contains("TEST_STATION_OFFSET"));
}

#[test]
fn test_env_var_overrides() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("FIELDVISIT_APPLICATION_LOG_LEVEL", "trace");
    std::env::set_var("FIELDVISIT_VERSIONS_MAX_VERSION", "v1.5");
    std::env::set_var("FIELDVISIT_MAPPING_DEFAULT_CHANNEL_NAME", "Left Channel");

    let temp_file = write_config(
        r#"
[application]
log_level = "info"

[versions]
max_version = "v1.3.2"
"#,
    );

    let config = load_config(temp_file.path()).expect("Failed to load config");

    assert_eq!(config.application.log_level, "trace");
    assert_eq!(config.versions.max_version, "v1.5");
    assert_eq!(config.mapping.default_channel_name, "Left Channel");

    cleanup_env_vars();
}

#[test]
fn test_invalid_config_validation() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let cases = [
        "[application]\nlog_level = \"invalid_level\"\n",
        "[application]\n[versions]\nmin_version = \"v2.0\"\nmax_version = \"v1.3\"\n",
        "[application]\n[location]\ndefault_utc_offset = \"6 hours\"\n",
        "[application]\n[mapping]\nlogger_method_code = \" \"\n",
        "[application]\n[logging]\nlocal_rotation = \"weekly\"\n",
    ];

    for contents in cases {
        let temp_file = write_config(contents);
        let result = load_config(temp_file.path());
        assert!(
            matches!(result, Err(FieldVisitError::Configuration(_))),
            "expected a configuration error for:\n{contents}"
        );
    }
}

#[test]
fn test_missing_application_section_is_rejected() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let temp_file = write_config("[versions]\nmin_version = \"v1.3\"\n");
    assert!(load_config(temp_file.path()).is_err());
}
