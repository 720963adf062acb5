//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "fieldvisit.toml")]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        if Path::new(&self.output).exists() && !self.force {
            println!("Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2);
        }

        match fs::write(&self.output, Self::generate_config()) {
            Ok(_) => {
                println!("Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Set location.default_utc_offset and any per-station offsets");
                println!("  2. Add the sensor labels your forms use under [sensors]");
                println!("  3. Validate configuration: fieldvisit validate-config");
                println!("  4. Map a document: fieldvisit map visit.json");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("Failed to write configuration file");
                println!("   Error: {e}");
                Ok(5)
            }
        }
    }

    /// Default configuration with every section documented
    fn generate_config() -> String {
        r#"# fieldvisit Configuration File
# Maps hydrometric field survey documents into field visit records

[application]
# Log level: trace | debug | info | warn | error
log_level = "info"
# Map documents but do not write any records
dry_run = false

# Supported survey document versions (inclusive)
[versions]
min_version = "v1.3"
max_version = "v1.3.2"

# UTC offset of the stations documents come from
[location]
default_utc_offset = "+00:00"

[location.utc_offsets]
# "05BH004" = "-07:00"

[mapping]
default_channel_name = "Main"
unknown_meter_placeholder = "Unknown"
logger_method_code = "Logger"
water_level_method_code = "WaterLevelReference"

# Known sensors, keyed by the label used on the form.
# Declaring any [sensors."..."] table replaces the built-in list.
# [sensors."Head Stage (m)"]
# parameter_id = "HD"
# unit_id = "m"
# method_code = "Bubbler"

# Form text lookups are matched case-insensitively.
# Declaring a table replaces its built-in entries.
# [lookups.control_conditions]
# "Clear" = "Clear"
# "Debris Light" = "DebrisLight"

[logging]
local_enabled = false
local_path = "logs"
# Rotation: daily | hourly
local_rotation = "daily"
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;
    use tempfile::TempDir;

    #[test]
    fn test_init_args_defaults() {
        let args = InitArgs {
            output: "fieldvisit.toml".to_string(),
            force: false,
        };
        assert_eq!(args.output, "fieldvisit.toml");
        assert!(!args.force);
    }

    #[test]
    fn test_generated_config_is_valid() {
        let config = parse_config(&InitArgs::generate_config()).unwrap();
        assert_eq!(config.versions.max_version, "v1.3.2");
        assert_eq!(config.mapping.default_channel_name, "Main");
        assert!(config.sensor("Head Stage (m)").is_some());
        assert!(!config.lookups.control_conditions.is_empty());
    }

    #[test]
    fn test_existing_file_needs_force() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("fieldvisit.toml");
        fs::write(&path, "# keep").unwrap();

        let args = InitArgs {
            output: path.display().to_string(),
            force: false,
        };
        assert_eq!(args.execute().unwrap(), 2);
        assert_eq!(fs::read_to_string(&path).unwrap(), "# keep");

        let args = InitArgs {
            output: path.display().to_string(),
            force: true,
        };
        assert_eq!(args.execute().unwrap(), 0);
        assert!(fs::read_to_string(&path).unwrap().contains("[versions]"));
    }
}
