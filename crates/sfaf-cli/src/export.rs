//! # Export Subcommand
//!
//! Validates a JSON record, then renders it as SFAF text. A record with
//! hard errors is refused unless `--force` is given; warnings are logged
//! and never block the export.
//!
//! ```bash
//! sfaf export record.json --out action.txt
//! sfaf export record.json --system "Range Control" --force
//! ```

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use sfaf_core::{Record, Timestamp};

use crate::config::EngineConfig;
use crate::{read_record, write_output, EXIT_FAILED};

/// Arguments for the export subcommand.
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// JSON record keyed by `fieldNNN`.
    pub record: PathBuf,

    /// Write the SFAF text here instead of stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Override the `System:` header line.
    #[arg(long)]
    pub system: Option<String>,

    /// Export even when validation reports errors.
    #[arg(long)]
    pub force: bool,
}

/// Execute the export subcommand.
pub fn run_export(args: &ExportArgs, config: &EngineConfig) -> Result<u8> {
    let record = read_record(&args.record)?;
    match export_record(args, config, &record, Timestamp::now())? {
        Some(text) => {
            write_output(args.out.as_deref(), &text)?;
            Ok(0)
        }
        None => Ok(EXIT_FAILED),
    }
}

/// Validate and render `record`. Returns `None` when validation refuses it.
pub fn export_record(
    args: &ExportArgs,
    config: &EngineConfig,
    record: &Record,
    generated: Timestamp,
) -> Result<Option<String>> {
    let summary = config.build_validator()?.validate_all(record);
    for warning in &summary.warnings {
        tracing::warn!("{warning}");
    }
    if !summary.is_valid() {
        for error in &summary.errors {
            tracing::error!("{error}");
        }
        if !args.force {
            eprintln!("{}", summary.to_string().trim_end());
            eprintln!("export refused: fix the errors above or pass --force");
            return Ok(None);
        }
        tracing::warn!(errors = summary.errors.len(), "exporting despite validation errors");
    }

    let mut exporter = config.exporter()?;
    if let Some(system) = &args.system {
        exporter = exporter.with_system(system.clone());
    }
    Ok(Some(exporter.export(record, generated)))
}
