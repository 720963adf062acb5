//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Configurable log levels, overridable through `RUST_LOG`
//! - Local JSON file logging with rotation
//! - Field-named macros for the importer's recurring events
//!
//! # Example
//!
//! ```no_run
//! use fieldvisit::config::LoggingConfig;
//! use fieldvisit::logging::init_logging;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log the start of a document import
///
/// # Example
///
/// ```no_run
/// use fieldvisit::log_document_start;
///
/// log_document_start!("05BH004", "v1.3.2", "2024-06-12");
/// ```
#[macro_export]
macro_rules! log_document_start {
    ($station:expr, $version:expr, $date:expr) => {
        tracing::info!(
            station = %$station,
            version = %$version,
            visit_date = %$date,
            "Mapping survey document"
        );
    };
}

/// Log the visit window and record counts of a mapped document
///
/// # Example
///
/// ```no_run
/// use fieldvisit::log_visit_mapped;
///
/// log_visit_mapped!("05BH004", "2024-06-12T09:00:00-06:00", "2024-06-12T11:30:00-06:00", 12);
/// ```
#[macro_export]
macro_rules! log_visit_mapped {
    ($station:expr, $start:expr, $end:expr, $readings:expr) => {
        tracing::info!(
            station = %$station,
            start = %$start,
            end = %$end,
            readings = $readings,
            "Visit mapped"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use fieldvisit::log_error_with_context;
/// use fieldvisit::domain::FieldVisitError;
///
/// let error = FieldVisitError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
