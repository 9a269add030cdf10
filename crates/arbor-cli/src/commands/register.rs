//! Register command - Check a custom privilege definition against the registry.
//!
//! Registration happens against the registry built from the configuration
//! file. Nothing is written back; on success the definition is printed as a
//! `[[privileges]]` entry ready to append to the file.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use arbor::prelude::*;

use super::{emit, load_provider};
use crate::OutputFormat;

/// Arguments for the register command.
#[derive(Args)]
pub struct RegisterArgs {
    /// Name of the new privilege, e.g. acme:approve
    #[arg(required = true)]
    pub name: String,

    /// Privileges the new one aggregates (repeatable)
    #[arg(short, long = "aggregate")]
    pub aggregates: Vec<String>,

    /// Mark the privilege abstract
    #[arg(long = "abstract")]
    pub is_abstract: bool,
}

#[derive(Debug, Serialize)]
struct RegistrationResult {
    name: String,
    bits: String,
    aggregates: Vec<String>,
    universal_members: Vec<String>,
    #[serde(skip)]
    definition: String,
}

#[derive(Serialize)]
struct PrivilegeEntry<'a> {
    privileges: [&'a PrivilegeDefinition; 1],
}

/// Execute the register command.
pub fn execute(args: RegisterArgs, config: Option<&Path>, format: OutputFormat) -> Result<()> {
    let provider = load_provider(config)?;
    let registry = provider.registry();

    let declared: Vec<&str> = args.aggregates.iter().map(String::as_str).collect();
    let privilege = registry
        .register_custom_privilege(&args.name, args.is_abstract, &declared)
        .with_context(|| format!("Cannot register '{}'", args.name))?;

    let definition = privilege.definition();
    let entry = toml::to_string(&PrivilegeEntry {
        privileges: [&definition],
    })?;

    let universal = registry.universal()?;
    let result = RegistrationResult {
        name: privilege.name().to_string(),
        bits: privilege.bits().to_string(),
        aggregates: registry
            .aggregate_privileges(&args.name)?
            .iter()
            .map(|p| p.name().to_string())
            .collect(),
        universal_members: universal
            .declared_aggregate_names()
            .iter()
            .map(ToString::to_string)
            .collect(),
        definition: entry,
    };

    emit(format, &result, |result| {
        println!("Privilege can be registered: {}", result.name);
        println!("  Bits: {}", result.bits);
        if !result.aggregates.is_empty() {
            println!("  Aggregates: {}", result.aggregates.join(", "));
        }
        println!("\nAdd to the configuration file:\n");
        print!("{}", result.definition);
    })
}
