//! Integration tests for logging functionality
//!
//! The global subscriber can only be installed once per process, so
//! initialization is exercised by a single test in this binary.

use fieldvisit::config::LoggingConfig;
use fieldvisit::domain::{FieldVisitError, MappingError};
use fieldvisit::logging::init_logging;
use fieldvisit::{log_document_start, log_error_with_context, log_visit_mapped};
use tempfile::TempDir;

#[test]
fn test_logging_config_default() {
    let config = LoggingConfig::default();
    assert!(!config.local_enabled);
    assert_eq!(config.local_path, "logs");
    assert_eq!(config.local_rotation, "daily");
}

#[test]
fn test_init_logging_with_local_file() {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("logs");

    let config = LoggingConfig {
        local_enabled: true,
        local_path: log_path.to_string_lossy().to_string(),
        local_rotation: "hourly".to_string(),
    };

    assert!(!log_path.exists());
    let guard = init_logging("debug", &config).expect("Failed to initialize logging");
    assert!(log_path.is_dir());

    let error: FieldVisitError = MappingError::missing("date", "general info").into();
    log_document_start!("05BH004", "v1.3.2", "2024-06-12");
    log_visit_mapped!("05BH004", "2024-06-12T09:00:00-06:00", "2024-06-12T11:30:00-06:00", 4);
    log_error_with_context!(&error, "Failed to map survey document");

    // A second subscriber cannot be installed
    let err = init_logging("info", &LoggingConfig::default())
        .err()
        .expect("second initialization should fail");
    assert!(matches!(err, FieldVisitError::Configuration(_)));

    drop(guard);
}

#[test]
fn test_invalid_level_is_rejected_before_install() {
    let err = init_logging("verbose", &LoggingConfig::default())
        .err()
        .expect("invalid level should fail");
    assert!(err.to_string().contains("Invalid log level"));
}
