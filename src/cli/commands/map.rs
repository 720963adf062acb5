//! Map command implementation
//!
//! This module implements the `map` command: one survey document in, the
//! collected field visit records out as JSON.

use crate::adapters::CollectingAppender;
use crate::config::load_config;
use crate::core::import::DocumentImporter;
use crate::domain::{FieldVisitError, SurveyDocument};
use crate::log_error_with_context;
use clap::Args;
use std::fs;

/// Arguments for the map command
#[derive(Args, Debug)]
pub struct MapArgs {
    /// Survey document (JSON)
    pub document: String,

    /// Write the mapped records to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<String>,

    /// Map the document without writing any records
    #[arg(long)]
    pub dry_run: bool,
}

impl MapArgs {
    /// Execute the map command
    pub fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(document = %self.document, "Starting map command");

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                log_error_with_context!(&e, "Failed to load configuration");
                eprintln!("Configuration error: {e}");
                return Ok(2);
            }
        };

        let importer = match DocumentImporter::new(&config) {
            Ok(importer) => importer.with_dry_run(config.application.dry_run || self.dry_run),
            Err(e) => {
                log_error_with_context!(&e, "Invalid version window");
                eprintln!("Configuration error: {e}");
                return Ok(2);
            }
        };

        let contents = fs::read_to_string(&self.document)?;
        let document: SurveyDocument = serde_json::from_str(&contents)?;

        let mut appender = CollectingAppender::new();
        let summary = match importer.import(&document, &mut appender) {
            Ok(summary) => summary,
            Err(e) => {
                log_error_with_context!(&e, "Failed to map survey document");
                eprintln!("Error: {e}");
                return Ok(exit_code(&e));
            }
        };

        if summary.dry_run {
            println!(
                "Dry run: {} record(s) mapped for {}, nothing written",
                summary.total_records(),
                summary.location
            );
            return Ok(0);
        }

        let json = appender.to_json()?;
        match &self.output {
            Some(path) => {
                fs::write(path, json)?;
                println!(
                    "Wrote {} record(s) for {} to {}",
                    summary.total_records(),
                    summary.location,
                    path
                );
            }
            None => println!("{json}"),
        }

        Ok(0)
    }
}

/// Exit code for an import failure
fn exit_code(error: &FieldVisitError) -> i32 {
    match error {
        FieldVisitError::Mapping(_) => 3,
        FieldVisitError::Configuration(_) => 2,
        _ => 5,
    }
}
