//! Record appenders for fieldvisit.
//!
//! The mapping engine never persists anything itself. Once a document has
//! been mapped completely, its records are pushed one call at a time to a
//! [`FieldDataAppender`] supplied by the host:
//!
//! - [`appender`] - the appender trait and the visit handle
//! - [`collector`] - an in-memory appender that serializes to JSON
//!
//! # Example
//!
//! ```rust,no_run
//! use fieldvisit::adapters::CollectingAppender;
//! use fieldvisit::config::FieldVisitConfig;
//! use fieldvisit::core::import::DocumentImporter;
//! use fieldvisit::domain::SurveyDocument;
//!
//! # fn example(document: SurveyDocument) -> fieldvisit::domain::Result<()> {
//! let config = FieldVisitConfig::default();
//! let importer = DocumentImporter::new(&config)?;
//! let mut appender = CollectingAppender::new();
//!
//! let summary = importer.import(&document, &mut appender)?;
//! println!("{} readings", summary.readings);
//! println!("{}", appender.to_json()?);
//! # Ok(())
//! # }
//! ```

pub mod appender;
pub mod collector;

pub use appender::{FieldDataAppender, FieldVisitHandle};
pub use collector::{CollectedVisit, CollectingAppender};
