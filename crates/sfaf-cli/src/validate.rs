//! # Validate Subcommand
//!
//! Validates a JSON record and prints the summary as text or JSON.
//!
//! ```bash
//! sfaf validate record.json
//! sfaf validate record.json --json
//! ```

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use sfaf_rules::FormValidationSummary;

use crate::config::EngineConfig;
use crate::{read_record, EXIT_FAILED};

/// Arguments for the validate subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// JSON record keyed by `fieldNNN`.
    pub record: PathBuf,

    /// Print the summary as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Execute the validate subcommand.
pub fn run_validate(args: &ValidateArgs, config: &EngineConfig) -> Result<u8> {
    let record = read_record(&args.record)?;
    let summary = config.build_validator()?.validate_all(&record);
    println!("{}", render_summary(&summary, args.json)?);
    Ok(exit_code(&summary))
}

/// Text or pretty JSON rendering of a summary.
pub fn render_summary(summary: &FormValidationSummary, json: bool) -> Result<String> {
    if json {
        Ok(serde_json::to_string_pretty(summary)?)
    } else {
        Ok(summary.to_string().trim_end().to_string())
    }
}

pub(crate) fn exit_code(summary: &FormValidationSummary) -> u8 {
    if summary.is_valid() {
        0
    } else {
        EXIT_FAILED
    }
}
