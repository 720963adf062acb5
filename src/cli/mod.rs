//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for fieldvisit using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// fieldvisit - Hydrometric field visit mapper
#[derive(Parser, Debug)]
#[command(name = "fieldvisit")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "fieldvisit.toml", env = "FIELDVISIT_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "FIELDVISIT_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Map a survey document into field visit records
    Map(commands::map::MapArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
