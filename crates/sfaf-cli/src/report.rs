//! # Report Subcommand
//!
//! Prints the MCEB Pub 7 compliance checklist for a JSON record, validating
//! the record with the configured engine first.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use sfaf_core::Timestamp;
use sfaf_format::ComplianceReport;

use crate::config::EngineConfig;
use crate::{read_record, write_output, EXIT_FAILED};

/// Arguments for the report subcommand.
#[derive(Args, Debug)]
pub struct ReportArgs {
    /// JSON record keyed by `fieldNNN`.
    pub record: PathBuf,

    /// Emit the report as JSON.
    #[arg(long)]
    pub json: bool,

    /// Write the report here instead of stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

/// Execute the report subcommand. Exits 1 when the record is non-compliant.
pub fn run_report(args: &ReportArgs, config: &EngineConfig) -> Result<u8> {
    let record = read_record(&args.record)?;
    let validator = config.build_validator()?;
    let report = ComplianceReport::check(&validator, &record, Timestamp::now());
    let text = if args.json {
        serde_json::to_string_pretty(&report)?
    } else {
        report.to_string()
    };
    write_output(args.out.as_deref(), &text)?;
    Ok(if report.is_compliant() { 0 } else { EXIT_FAILED })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incomplete_record_is_non_compliant() {
        let dir = tempfile::tempdir().unwrap();
        let record = dir.path().join("record.json");
        std::fs::write(&record, r#"{"field005": "U", "field200": "USAF"}"#).unwrap();
        let out = dir.path().join("report.txt");
        let args = ReportArgs {
            record,
            json: false,
            out: Some(out.clone()),
        };
        assert_eq!(run_report(&args, &EngineConfig::default()).unwrap(), EXIT_FAILED);
        let text = std::fs::read_to_string(out).unwrap();
        assert!(text.contains("MISSING REQUIRED: field701 - Frequency Action Officer"));
        assert!(text.contains("Required Fields Status: 2/18 complete"));
        assert!(text.ends_with("Overall Compliance: NON-COMPLIANT"));
    }

    #[test]
    fn json_report_lists_missing_fields() {
        let dir = tempfile::tempdir().unwrap();
        let record = dir.path().join("record.json");
        std::fs::write(&record, "{}").unwrap();
        let out = dir.path().join("report.json");
        let args = ReportArgs {
            record,
            json: true,
            out: Some(out.clone()),
        };
        run_report(&args, &EngineConfig::default()).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(out).unwrap()).unwrap();
        assert_eq!(value["required_total"], 17);
        assert_eq!(value["missing"][0]["field"], "field005");
        assert_eq!(value["missing"][0]["level"], "critical");
        assert_eq!(value["format"]["total_fields"], 0);
        assert_eq!(value["coordination"][0]["field"], "field511");
    }

    #[test]
    fn format_errors_reported_with_configured_rules() {
        let dir = tempfile::tempdir().unwrap();
        let record = dir.path().join("record.json");
        std::fs::write(&record, r#"{"field005": "U", "field110": "4726.5.5"}"#).unwrap();
        let out = dir.path().join("report.txt");
        let args = ReportArgs {
            record,
            json: false,
            out: Some(out.clone()),
        };
        let config = EngineConfig {
            required_fields: vec!["field010".to_string()],
            ..Default::default()
        };
        assert_eq!(run_report(&args, &config).unwrap(), EXIT_FAILED);
        let text = std::fs::read_to_string(out).unwrap();
        assert!(text.contains("Format Validation Status: 1/3 compliant"), "{text}");
        assert!(text.contains("FORMAT ERROR: Field 010 (Type of Action)"), "{text}");
    }
}
