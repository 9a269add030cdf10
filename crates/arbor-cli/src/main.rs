//! `arbor` - inspect the privilege registry and check CUG paths against a
//! mount layout, from the defaults or from an `arbor.toml` file.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{privileges, register, show, validate};

/// Crates whose log output `-v` controls.
const LOG_TARGETS: [&str; 5] = ["arbor", "arbor_cli", "arbor_privilege", "arbor_mount", "arbor_cug"];

#[derive(Parser)]
#[command(name = "arbor", author, version)]
#[command(about = "Privilege registry and closed user group tooling")]
struct Cli {
    #[command(flatten)]
    global: GlobalOpts,

    #[command(subcommand)]
    command: Commands,
}

/// Options accepted before or after any subcommand.
#[derive(Args)]
struct GlobalOpts {
    /// TOML file with mounts, CUG parameters and custom privileges
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// How results are printed
    #[arg(short = 'f', long, global = true, value_enum, default_value_t)]
    format: OutputFormat,

    /// Raise the log level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only report failures through the exit code
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

/// Output format options.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Human,
    /// Pretty-printed JSON
    Json,
    /// JSON on a single line
    JsonCompact,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered privileges
    Privileges(privileges::PrivilegesArgs),
    /// Show one privilege with its aggregation
    Show(show::ShowArgs),
    /// Check a custom privilege definition against the registry
    Register(register::RegisterArgs),
    /// Validate CUG supported paths against the mount layout
    Validate(validate::ValidateArgs),
}

impl Commands {
    fn run(self, config: Option<&Path>, format: OutputFormat) -> Result<()> {
        match self {
            Self::Privileges(args) => privileges::execute(args, config, format),
            Self::Show(args) => show::execute(args, config, format),
            Self::Register(args) => register::execute(args, config, format),
            Self::Validate(args) => validate::execute(args, config, format),
        }
    }
}

/// `RUST_LOG` wins over the verbosity flags.
fn log_filter(verbose: u8, quiet: bool) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        _ => "trace",
    };
    let directives: Vec<String> = LOG_TARGETS
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect();
    EnvFilter::new(directives.join(","))
}

fn main() -> ExitCode {
    let Cli { global, command } = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(global.verbose, global.quiet))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = command.run(global.config.as_deref(), global.format) {
        if !global.quiet {
            eprintln!("arbor: {e:#}");
        }
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
