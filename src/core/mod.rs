//! Core mapping engine for fieldvisit.
//!
//! This module turns one parsed survey document into the normalized records
//! of a single field visit.
//!
//! # Modules
//!
//! - [`time`] - Visit date, partial time-of-day parsing, mean times
//! - [`version_gate`] - Supported document version window
//! - [`numbers`] - Strict numeric field parsing
//! - [`stage`] - Mean gage height column selection and summary
//! - [`discharge`] - Discharge activity: mid-section channels and ADCP
//! - [`readings`] - Gage height, sensor and environmental readings
//! - [`level_survey`] - Benchmark reconciliation across level circuits
//! - [`visit`] - Visit window inference and whole-document assembly
//! - [`import`] - Version gate, mapping and appending of one document
//! - [`summary`] - Import reporting
//!
//! # Mapping Workflow
//!
//! 1. **Gate**: reject documents outside the configured version window
//! 2. **Locate**: resolve the station and its UTC offset
//! 3. **Window**: infer the visit period from every timestamp on the form
//! 4. **Map**: discharge, readings, control condition and level surveys
//! 5. **Append**: hand the records to the appender, visit first
//!
//! Mapping is all-or-nothing. A [`MappingError`](crate::domain::MappingError)
//! anywhere aborts the document before anything is appended.
//!
//! # Example
//!
//! ```rust,no_run
//! use fieldvisit::adapters::CollectingAppender;
//! use fieldvisit::config::load_config;
//! use fieldvisit::core::import::DocumentImporter;
//! use fieldvisit::domain::SurveyDocument;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("fieldvisit.toml")?;
//! let document: SurveyDocument =
//!     serde_json::from_str(&std::fs::read_to_string("visit.json")?)?;
//!
//! let importer = DocumentImporter::new(&config)?;
//! let mut appender = CollectingAppender::new();
//! let summary = importer.import(&document, &mut appender)?;
//!
//! println!("Readings: {}", summary.readings);
//! println!("Level surveys: {}", summary.level_surveys);
//! # Ok(())
//! # }
//! ```

pub mod discharge;
pub mod import;
pub mod level_survey;
pub mod numbers;
pub mod readings;
pub mod stage;
pub mod summary;
pub mod time;
pub mod version_gate;
pub mod visit;
