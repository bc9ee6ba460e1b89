//! # sfaf-cli — SFAF Rule Engine Command-Line Interface
//!
//! Provides the `sfaf` binary, a thin shell over the engine crates.
//!
//! ## Subcommands
//!
//! - `sfaf validate`: validate a JSON record and print the summary.
//! - `sfaf export`: validate, then render SFAF text.
//! - `sfaf import`: parse SFAF text into JSON record(s).
//! - `sfaf report`: MCEB Pub 7 compliance checklist.
//! - `sfaf reference`: search and browse reference lists.
//!
//! ## Exit Codes
//!
//! `0` success, `1` the record failed a check, `2` operational error
//! (unreadable file, bad configuration).
//!
//! ## Crate Policy
//!
//! - Argument parsing is separated from business logic.
//! - Handlers delegate to `sfaf-rules` and `sfaf-format`; no rules live here.

pub mod config;
pub mod export;
pub mod import;
pub mod reference;
pub mod report;
pub mod validate;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use sfaf_core::Record;

/// Exit code for a record that failed a check.
pub const EXIT_FAILED: u8 = 1;

/// Resolve a path that may be relative to a base directory.
///
/// Absolute paths are returned as-is. A relative path is joined onto
/// `base` when the result exists, otherwise it is left relative to the
/// current directory.
pub fn resolve_path(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    let joined = base.join(path);
    if joined.exists() {
        joined
    } else {
        path.to_path_buf()
    }
}

/// Read a JSON record file.
pub fn read_record(path: &Path) -> Result<Record> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read record {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("invalid record {}", path.display()))
}

/// Write `text` to `out`, or to stdout when no file is given.
pub fn write_output(out: Option<&Path>, text: &str) -> Result<()> {
    match out {
        Some(path) => {
            std::fs::write(path, text)
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), bytes = text.len(), "wrote output");
        }
        None => println!("{text}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_path_absolute_returned_as_is() {
        let result = resolve_path(Path::new("/data/reference.json"), Path::new("/etc/sfaf"));
        assert_eq!(result, PathBuf::from("/data/reference.json"));
    }

    #[test]
    fn resolve_path_prefers_existing_base_relative() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("reference.json"), b"{}").unwrap();
        let result = resolve_path(Path::new("reference.json"), dir.path());
        assert_eq!(result, dir.path().join("reference.json"));
    }

    #[test]
    fn resolve_path_missing_left_relative() {
        let dir = tempfile::tempdir().unwrap();
        let result = resolve_path(Path::new("missing.json"), dir.path());
        assert_eq!(result, PathBuf::from("missing.json"));
    }

    #[test]
    fn read_record_reports_path_on_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("record.json");
        std::fs::write(&path, b"{\"field005\": ").unwrap();
        let msg = format!("{:#}", read_record(&path).unwrap_err());
        assert!(msg.contains("invalid record"));
        assert!(msg.contains("record.json"));
    }

    #[test]
    fn read_record_rejects_malformed_field_id() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("record.json");
        std::fs::write(&path, br#"{"field11": "K4726.5"}"#).unwrap();
        assert!(read_record(&path).is_err());
    }

    #[test]
    fn write_output_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        write_output(Some(&path), "005. U").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "005. U");
    }
}
