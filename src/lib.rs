// fieldvisit - Hydrometric field visit mapper
// Copyright (c) 2025 fieldvisit Contributors
// Licensed under the MIT License

//! # fieldvisit - Hydrometric field visit mapper
//!
//! fieldvisit turns one hydrometric field survey document into the normalized
//! records of a single field visit: the visit window, a discharge activity,
//! readings, a control condition and level surveys.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Inferring** the visit window from every optional timestamp on the form
//! - **Assembling** mid-section or moving-boat (ADCP) discharge measurements
//! - **Selecting** the authoritative mean gage height column
//! - **Reconciling** benchmark elevations across level survey circuits
//!
//! ## Architecture
//!
//! fieldvisit follows a layered architecture:
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - The mapping engine and the document importer
//! - [`adapters`] - Record appenders
//! - [`domain`] - Input document tree, output records and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use fieldvisit::adapters::CollectingAppender;
//! use fieldvisit::config::load_config;
//! use fieldvisit::core::import::DocumentImporter;
//! use fieldvisit::domain::SurveyDocument;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("fieldvisit.toml")?;
//!     let document: SurveyDocument =
//!         serde_json::from_str(&std::fs::read_to_string("visit.json")?)?;
//!
//!     let importer = DocumentImporter::new(&config)?;
//!     let mut appender = CollectingAppender::new();
//!     let summary = importer.import(&document, &mut appender)?;
//!
//!     println!("Mapped {} records", summary.total_records());
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! All errors are [`domain::FieldVisitError`]. Problems with the document
//! content are [`domain::MappingError`]s and abort the whole document:
//!
//! ```rust
//! use fieldvisit::domain::{FieldVisitError, MappingError};
//!
//! let err: FieldVisitError = MappingError::missing("date", "general info").into();
//! assert!(err.is_invalid_data());
//! ```
//!
//! ## Logging
//!
//! fieldvisit uses structured logging with the `tracing` crate. Tolerated
//! problems in a document, such as a remeasured benchmark, are logged as
//! warnings and never fail the mapping.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
