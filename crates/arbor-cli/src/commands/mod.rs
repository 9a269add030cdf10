//! Subcommands.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::debug;

use arbor::prelude::*;

use crate::OutputFormat;

pub mod privileges;
pub mod register;
pub mod show;
pub mod validate;

/// Load the configuration file, or the defaults when none is given.
pub fn load_config(path: Option<&Path>) -> Result<ArborConfig> {
    match path {
        Some(path) => {
            debug!(path = %path.display(), "Loading configuration");
            ArborConfig::from_file(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))
        }
        None => Ok(ArborConfig::default()),
    }
}

/// Build a provider from the configuration file.
pub fn load_provider(path: Option<&Path>) -> Result<SecurityProvider> {
    let config = load_config(path)?;
    Arbor::builder()
        .with_config(config)
        .build()
        .context("Failed to assemble security provider")
}

/// Print `value` as JSON, or through `human` for human-readable output.
pub fn emit<T: Serialize>(format: OutputFormat, value: &T, human: impl FnOnce(&T)) -> Result<()> {
    match format {
        OutputFormat::Human => human(value),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormat::JsonCompact => println!("{}", serde_json::to_string(value)?),
    }
    Ok(())
}
