//! Show command - Show one privilege with its aggregation.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use super::{emit, load_provider};
use crate::OutputFormat;

/// Arguments for the show command.
#[derive(Args)]
pub struct ShowArgs {
    /// Privilege name, e.g. jcr:write
    #[arg(required = true)]
    pub name: String,
}

#[derive(Debug, Serialize)]
struct PrivilegeDetail {
    name: String,
    #[serde(rename = "abstract")]
    is_abstract: bool,
    aggregate: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    bit: Option<u32>,
    bits: String,
    positions: Vec<u32>,
    declared: Vec<String>,
    aggregates: Vec<String>,
}

/// Execute the show command.
pub fn execute(args: ShowArgs, config: Option<&Path>, format: OutputFormat) -> Result<()> {
    let provider = load_provider(config)?;
    let registry = provider.registry();

    let privilege = registry
        .get_privilege(&args.name)
        .with_context(|| format!("Cannot show '{}'", args.name))?;
    let declared = registry.declared_aggregate_privileges(&args.name)?;
    let aggregates = registry.aggregate_privileges(&args.name)?;

    let detail = PrivilegeDetail {
        name: privilege.name().to_string(),
        is_abstract: privilege.is_abstract(),
        aggregate: privilege.is_aggregate(),
        bit: privilege.bit(),
        bits: privilege.bits().to_string(),
        positions: privilege.bits().positions().collect(),
        declared: declared.iter().map(|p| p.name().to_string()).collect(),
        aggregates: aggregates.iter().map(|p| p.name().to_string()).collect(),
    };

    emit(format, &detail, |detail| {
        println!("Privilege: {}", detail.name);
        println!("  Abstract: {}", detail.is_abstract);
        match detail.bit {
            Some(bit) => println!("  Atomic, bit {}", bit),
            None => println!("  Aggregate, bits {}", detail.bits),
        }
        if !detail.declared.is_empty() {
            println!("\nDeclared aggregates:");
            for name in &detail.declared {
                println!("  - {}", name);
            }
            println!("\nAll aggregated privileges ({}):", detail.aggregates.len());
            for name in &detail.aggregates {
                println!("  - {}", name);
            }
        }
    })
}
