//! # sfaf CLI entry point
//!
//! Parses command-line arguments, loads the engine configuration and
//! dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use sfaf_cli::config::EngineConfig;
use sfaf_cli::export::{run_export, ExportArgs};
use sfaf_cli::import::{run_import, ImportArgs};
use sfaf_cli::reference::{run_reference, ReferenceArgs};
use sfaf_cli::report::{run_report, ReportArgs};
use sfaf_cli::validate::{run_validate, ValidateArgs};

/// Exit code for unreadable input or bad configuration.
const EXIT_OPERATIONAL: u8 = 2;

/// SFAF rule engine
///
/// Validates Standard Frequency Action Format records against MCEB
/// Publication 7, exports them as SFAF text and imports SFAF text back.
#[derive(Parser, Debug)]
#[command(name = "sfaf", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to the YAML engine configuration.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a JSON record against MCEB Pub 7.
    Validate(ValidateArgs),

    /// Validate a JSON record and render it as SFAF text.
    Export(ExportArgs),

    /// Parse SFAF text into JSON record(s).
    Import(ImportArgs),

    /// Print the MCEB Pub 7 compliance checklist for a record.
    Report(ReportArgs),

    /// Search and browse reference codes.
    Reference(ReferenceArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("sfaf CLI v{} starting", env!("CARGO_PKG_VERSION"));

    let config = match EngineConfig::load_or_default(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{e:#}");
            return ExitCode::from(EXIT_OPERATIONAL);
        }
    };

    let result = match &cli.command {
        Commands::Validate(args) => run_validate(args, &config),
        Commands::Export(args) => run_export(args, &config),
        Commands::Import(args) => run_import(args, &config),
        Commands::Report(args) => run_report(args, &config),
        Commands::Reference(args) => run_reference(args, &config),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(EXIT_OPERATIONAL)
        }
    }
}
