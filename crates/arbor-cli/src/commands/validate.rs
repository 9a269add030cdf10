//! Validate command - Validate CUG supported paths against the mount layout.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use arbor::prelude::*;

use super::{emit, load_config};
use crate::OutputFormat;

/// Arguments for the validate command.
#[derive(Args)]
pub struct ValidateArgs {
    /// Supported paths to check instead of the configured ones (repeatable)
    #[arg(short = 'p', long = "path")]
    pub paths: Vec<String>,
}

/// Validation result.
#[derive(Debug, Serialize)]
struct ValidationResult {
    valid: bool,
    configured: Vec<String>,
    effective: Vec<String>,
    mounts: Vec<MountDisplay>,
    errors: Vec<String>,
}

#[derive(Debug, Serialize)]
struct MountDisplay {
    name: String,
    paths: Vec<String>,
    read_only: bool,
}

/// Execute the validate command.
pub fn execute(args: ValidateArgs, config: Option<&Path>, format: OutputFormat) -> Result<()> {
    let config = load_config(config)?;
    let mounts = Mounts::from_specs(config.mounts).context("Invalid mount layout")?;

    let configured = if args.paths.is_empty() {
        config.cug.supported_paths
    } else {
        args.paths
    };

    let mut result = ValidationResult {
        valid: true,
        configured: configured.clone(),
        effective: Vec::new(),
        mounts: mounts
            .non_default_mounts()
            .iter()
            .map(|m| MountDisplay {
                name: m.name().to_string(),
                paths: m.paths().to_vec(),
                read_only: m.is_read_only(),
            })
            .collect(),
        errors: Vec::new(),
    };

    match MountAwarePathValidator::validate(&configured, &mounts) {
        Ok(paths) => result.effective = paths,
        Err(e) => {
            result.valid = false;
            result.errors.push(e.to_string());
        }
    }

    emit(format, &result, |result| {
        if result.valid {
            println!("CUG configuration is valid");
            println!("  Supported paths: {}", result.effective.join(", "));
            if result.effective.len() != result.configured.len() {
                println!("  Configured paths: {}", result.configured.join(", "));
            }
        } else {
            println!("CUG configuration is INVALID");
            for error in &result.errors {
                println!("  Error: {}", error);
            }
        }
        if !result.mounts.is_empty() {
            println!("\nMounts:");
            for mount in &result.mounts {
                let mode = if mount.read_only { " (read-only)" } else { "" };
                println!("  {}: {}{}", mount.name, mount.paths.join(", "), mode);
            }
        }
    })?;

    if result.valid {
        Ok(())
    } else {
        Err(anyhow::anyhow!("Validation failed"))
    }
}
