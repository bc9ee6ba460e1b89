//! # Import Subcommand
//!
//! Parses SFAF text into JSON records. With `--batch` the file may hold
//! several records and the output is a JSON array.
//!
//! ```bash
//! sfaf import action.txt --out record.json
//! sfaf import actions.txt --batch
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use sfaf_format::{ImportReport, SfafImporter, SkipReason};

use crate::config::EngineConfig;
use crate::{write_output, EXIT_FAILED};

/// Arguments for the import subcommand.
#[derive(Args, Debug)]
pub struct ImportArgs {
    /// SFAF text file.
    pub input: PathBuf,

    /// Write the JSON here instead of stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Treat the file as several records split by trailer or separator lines.
    #[arg(long)]
    pub batch: bool,
}

/// Execute the import subcommand. Exits 1 when no data line was found.
pub fn run_import(args: &ImportArgs, _config: &EngineConfig) -> Result<u8> {
    let text = std::fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let importer = SfafImporter::new().context("failed to compile SFAF line grammar")?;

    let (json, imported) = if args.batch {
        let reports = importer.parse_batch(&text);
        reports.iter().for_each(log_skipped);
        let records: Vec<_> = reports.iter().map(|r| &r.record).collect();
        (serde_json::to_string_pretty(&records)?, !records.is_empty())
    } else {
        let report = importer.parse_with_report(&text);
        log_skipped(&report);
        (
            serde_json::to_string_pretty(&report.record)?,
            !report.record.is_empty(),
        )
    };

    if !imported {
        tracing::warn!(path = %args.input.display(), "no SFAF data lines found");
        return Ok(EXIT_FAILED);
    }
    write_output(args.out.as_deref(), &json)?;
    Ok(0)
}

fn log_skipped(report: &ImportReport) {
    tracing::info!(
        fields = report.record.len(),
        auto_generated = report.count(|r| matches!(r, SkipReason::AutoGenerated(_))),
        malformed = report.count(|r| *r == SkipReason::Malformed),
        "imported SFAF record"
    );
    for skipped in &report.skipped {
        if skipped.reason == SkipReason::Malformed {
            tracing::debug!(line = skipped.line, text = %skipped.text, "ignored malformed line");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sfaf_core::Record;

    fn run(input: &str, batch: bool) -> (u8, Option<String>) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("action.txt");
        std::fs::write(&path, input).unwrap();
        let out = dir.path().join("record.json");
        let args = ImportArgs {
            input: path,
            out: Some(out.clone()),
            batch,
        };
        let code = run_import(&args, &EngineConfig::default()).unwrap();
        (code, std::fs::read_to_string(out).ok())
    }

    #[test]
    fn single_record_to_json() {
        let (code, json) = run("005. U\n113. MO\n113/02. FB\n373. A\n", false);
        assert_eq!(code, 0);
        let record: Record = serde_json::from_str(&json.unwrap()).unwrap();
        assert_eq!(record.len(), 2);
        assert_eq!(record.first("field005".parse().unwrap()), Some("U"));
    }

    #[test]
    fn batch_to_json_array() {
        let (code, json) = run("005. U\n---\n005. S\n", true);
        assert_eq!(code, 0);
        let records: Vec<Record> = serde_json::from_str(&json.unwrap()).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn no_data_lines_exits_one_without_output() {
        let (code, json) = run("nothing to see\n", false);
        assert_eq!(code, EXIT_FAILED);
        assert!(json.is_none());
    }

    #[test]
    fn missing_input_is_an_error() {
        let args = ImportArgs {
            input: PathBuf::from("/nonexistent/action.txt"),
            out: None,
            batch: false,
        };
        assert!(run_import(&args, &EngineConfig::default()).is_err());
    }
}
