//! assistant-settings: voice assistant settings checker
//!
//! Loads a settings.yml the way the assistant runtime does at start-up and
//! reports whether it is valid.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;

use assistant_settings::settings::resolve_path;
use assistant_settings::{logger, SettingsLoader};
use cli::{Cli, Commands, Format};

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.debug {
        let log_dir = cli.log_dir.clone().unwrap_or_else(logger::default_log_dir);
        logger::init(&log_dir)?;
    }

    let loader = SettingsLoader::new();
    let path = cli.settings.as_deref();

    match cli.command {
        Commands::Check => {
            loader
                .load(path)
                .with_context(|| format!("Invalid settings in {}", resolve_path(path).display()))?;
            if !cli.quiet {
                eprintln!("Settings are valid.");
            }
        }
        Commands::Show { format } => {
            let settings = loader
                .load(path)
                .with_context(|| format!("Invalid settings in {}", resolve_path(path).display()))?;
            let rendered = match format {
                Format::Yaml => serde_yaml::to_string(&*settings)?,
                Format::Json => serde_json::to_string_pretty(&*settings)?,
            };
            println!("{}", rendered.trim_end());
        }
        Commands::Version => {
            println!("assistant-settings {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
