//! Privileges command - List registered privileges.

use std::path::Path;

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use arbor::prelude::*;

use super::{emit, load_provider};
use crate::OutputFormat;

/// Arguments for the privileges command.
#[derive(Args)]
pub struct PrivilegesArgs {
    /// Only list aggregate privileges
    #[arg(long, conflicts_with = "atomic")]
    pub aggregate: bool,

    /// Only list atomic privileges
    #[arg(long)]
    pub atomic: bool,

    /// Only list privileges with this namespace prefix
    #[arg(long)]
    pub prefix: Option<String>,
}

#[derive(Debug, Serialize)]
struct PrivilegeRow {
    name: String,
    #[serde(rename = "abstract")]
    is_abstract: bool,
    aggregate: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    bit: Option<u32>,
    bits: String,
}

impl From<&Privilege> for PrivilegeRow {
    fn from(privilege: &Privilege) -> Self {
        Self {
            name: privilege.name().to_string(),
            is_abstract: privilege.is_abstract(),
            aggregate: privilege.is_aggregate(),
            bit: privilege.bit(),
            bits: privilege.bits().to_string(),
        }
    }
}

/// Execute the privileges command.
pub fn execute(args: PrivilegesArgs, config: Option<&Path>, format: OutputFormat) -> Result<()> {
    let provider = load_provider(config)?;
    let snapshot = provider.registry().snapshot();

    let rows: Vec<PrivilegeRow> = snapshot
        .iter()
        .filter(|p| !args.aggregate || p.is_aggregate())
        .filter(|p| !args.atomic || !p.is_aggregate())
        .filter(|p| {
            args.prefix
                .as_deref()
                .is_none_or(|prefix| p.name().prefix() == Some(prefix))
        })
        .map(|p| PrivilegeRow::from(&**p))
        .collect();

    emit(format, &rows, |rows| {
        for row in rows {
            let kind = if row.aggregate { "aggregate" } else { "atomic" };
            let marker = if row.is_abstract { " (abstract)" } else { "" };
            println!("{:<36} {:<10} {}{}", row.name, kind, row.bits, marker);
        }
        println!("\n{} privileges", rows.len());
    })
}
