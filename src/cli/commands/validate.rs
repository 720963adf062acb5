//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the fieldvisit configuration file.

use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("Validating configuration file: {config_path}");
        println!();

        // load_config validates as its last step
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("Configuration is invalid");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        println!("Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Dry Run: {}", config.application.dry_run);
        println!(
            "  Document Versions: {} ..= {}",
            config.versions.min_version, config.versions.max_version
        );
        println!("  Default UTC Offset: {}", config.location.default_utc_offset);
        println!("  Station Offsets: {}", config.location.utc_offsets.len());
        println!("  Channel Name: {}", config.mapping.default_channel_name);
        println!("  Known Sensors: {}", config.sensors.len());
        println!(
            "  Control Conditions: {}",
            config.lookups.control_conditions.len()
        );
        if config.logging.local_enabled {
            println!(
                "  Log Files: {} ({})",
                config.logging.local_path, config.logging.local_rotation
            );
        }
        println!();

        Ok(0)
    }
}
