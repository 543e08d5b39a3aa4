//! CLI argument parsing and command definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Settings loader and validator for a voice assistant runtime
#[derive(Parser)]
#[command(
    name = "assistant-settings",
    version,
    about = "Settings loader and validator for a voice assistant runtime",
    long_about = "Loads a voice assistant settings.yml, validates every field \
                  (engines, triggers, REST API, cache path) and reports the result."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to the settings file (default: ./settings.yml)
    #[arg(long, short = 's', global = true, env = "ASSISTANT_SETTINGS")]
    pub settings: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Directory for debug logs (default: ~/.config/assistant-settings/logs)
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

/// Output format for `show`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    /// YAML (default)
    #[default]
    Yaml,
    /// JSON
    Json,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Validate the settings file
    Check,
    /// Print the validated settings
    Show {
        /// Output format
        #[arg(long, short = 'f', default_value = "yaml")]
        format: Format,
    },
    /// Display version information
    Version,
}
