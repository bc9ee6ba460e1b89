//! # SFAF Text Import
//!
//! Parses SFAF text into records. Data lines have the shape
//! `NNN. value` or `NNN/MM. value`; every occurrence of a field is appended
//! to that field's sequence in encounter order (the `/MM` number itself is
//! not trusted). Banner, header and trailer lines are skipped, as are
//! malformed lines.
//!
//! Fields the assigning system computes itself (the deny list in
//! [`AUTO_GENERATED_FIELDS`]) are always dropped so a re-import never
//! carries stale generated values.

use regex::Regex;
use serde::Serialize;

use sfaf_core::{FieldNumber, Record, SfafError};

use crate::export::{EMPTY_PLACEHOLDER, TRAILER};

/// Fields dropped on import.
pub const AUTO_GENERATED_FIELDS: &[u16] = &[
    103, 107, 117, 118, 373, 402, 473, 901, 904, 911, 924, 927, 928, 956,
];

/// Line prefixes of computer-generated header lines.
const DECORATION_PREFIXES: &[&str] = &["*****", "MCEB Publication", "Generated:", "System:"];

/// Lines that end one record in a multi-record file.
const RECORD_SEPARATORS: &[&str] = &[TRAILER, "---", "END"];

const DATA_LINE: &str = r"^([0-9]{3})(?:/([0-9]{2}))?\.\s*(.*)$";

/// Why a line did not contribute to the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", content = "field", rename_all = "snake_case")]
pub enum SkipReason {
    /// Banner, header or trailer line.
    Decoration,
    /// A deny-listed, system-computed field.
    AutoGenerated(FieldNumber),
    /// Not a recognizable data line.
    Malformed,
    /// A data line with a blank or placeholder value.
    EmptyValue(FieldNumber),
}

/// A skipped input line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedLine {
    /// 1-based line number.
    pub line: usize,
    /// Trimmed line text.
    pub text: String,
    /// Classification.
    pub reason: SkipReason,
}

/// A parsed record with the lines that were skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    /// The parsed record.
    pub record: Record,
    /// Non-blank lines that did not contribute.
    pub skipped: Vec<SkippedLine>,
}

impl ImportReport {
    /// Skipped lines of one kind of reason.
    pub fn count(&self, matches: impl Fn(&SkipReason) -> bool) -> usize {
        self.skipped.iter().filter(|s| matches(&s.reason)).count()
    }
}

/// Parses SFAF text.
#[derive(Debug, Clone)]
pub struct SfafImporter {
    data_line: Regex,
}

impl SfafImporter {
    /// Compile the line grammar.
    pub fn new() -> Result<Self, SfafError> {
        let data_line = Regex::new(DATA_LINE).map_err(|e| SfafError::Import(e.to_string()))?;
        Ok(Self { data_line })
    }

    /// Parse one record, discarding the skip report.
    pub fn parse(&self, text: &str) -> Record {
        self.parse_with_report(text).record
    }

    /// Parse one record and report every skipped line.
    pub fn parse_with_report(&self, text: &str) -> ImportReport {
        self.parse_lines(text.lines().enumerate())
    }

    /// Parse a file holding several records separated by the SFAF trailer,
    /// `---`, or `END` lines. Chunks without data lines are ignored.
    pub fn parse_batch(&self, text: &str) -> Vec<ImportReport> {
        let mut reports = Vec::new();
        let mut chunk: Vec<(usize, &str)> = Vec::new();
        for (i, line) in text.lines().enumerate() {
            if RECORD_SEPARATORS.contains(&line.trim()) {
                self.flush(&mut chunk, &mut reports);
            } else {
                chunk.push((i, line));
            }
        }
        self.flush(&mut chunk, &mut reports);
        tracing::debug!(records = reports.len(), "parsed SFAF batch");
        reports
    }

    fn flush(&self, chunk: &mut Vec<(usize, &str)>, reports: &mut Vec<ImportReport>) {
        let report = self.parse_lines(chunk.drain(..));
        if !report.record.is_empty() {
            reports.push(report);
        }
    }

    fn parse_lines<'t>(&self, lines: impl Iterator<Item = (usize, &'t str)>) -> ImportReport {
        let mut report = ImportReport::default();
        for (i, raw) in lines {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }
            let skip = |reason: SkipReason| SkippedLine {
                line: i + 1,
                text: line.to_string(),
                reason,
            };

            if DECORATION_PREFIXES.iter().any(|p| line.starts_with(p)) {
                report.skipped.push(skip(SkipReason::Decoration));
                continue;
            }

            let Some((field, value)) = self.split(line) else {
                tracing::debug!(line = i + 1, text = line, "skipping malformed SFAF line");
                report.skipped.push(skip(SkipReason::Malformed));
                continue;
            };

            if AUTO_GENERATED_FIELDS.contains(&field.get()) {
                tracing::debug!(field = %field.id(), "dropping auto-generated field");
                report.skipped.push(skip(SkipReason::AutoGenerated(field)));
                continue;
            }

            if value.is_empty() || value == EMPTY_PLACEHOLDER {
                report.skipped.push(skip(SkipReason::EmptyValue(field)));
                continue;
            }

            report.record.push(field, value);
        }
        report
    }

    fn split<'l>(&self, line: &'l str) -> Option<(FieldNumber, &'l str)> {
        let caps = self.data_line.captures(line)?;
        let field = FieldNumber::from_digits(caps.get(1)?.as_str())?;
        let value = caps.get(3).map_or("", |m| m.as_str().trim());
        Some((field, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(n: u16) -> FieldNumber {
        FieldNumber::new(n).unwrap()
    }

    fn importer() -> SfafImporter {
        SfafImporter::new().unwrap()
    }

    #[test]
    fn test_parses_single_and_repeated() {
        let record = importer().parse("005. U\n113. MO\n113/02. FB\n");
        assert_eq!(record.first(field(5)), Some("U"));
        assert_eq!(record.occurrences(field(113)), ["MO", "FB"]);
    }

    #[test]
    fn test_occurrence_number_not_trusted() {
        let record = importer().parse("113/03. ML\n113. MO\n");
        assert_eq!(record.occurrences(field(113)), ["ML", "MO"]);
    }

    #[test]
    fn test_deny_list_dropped() {
        let report = importer().parse_with_report("373. A\n473. B\n110. K4726.5\n");
        assert!(report.record.get(field(373)).is_none());
        assert!(report.record.get(field(473)).is_none());
        assert_eq!(report.record.len(), 1);
        assert_eq!(report.count(|r| matches!(r, SkipReason::AutoGenerated(_))), 2);
    }

    #[test]
    fn test_header_and_trailer_skipped() {
        let text = "***** STANDARD FREQUENCY ACTION FORMAT (SFAF) *****\n\
                    MCEB Publication 7, June 30, 2005\n\
                    Generated: 2026-01-15\n\
                    System: SFAF Plotter\n\
                    \n\
                    005. U\n\
                    \n\
                    ***** END OF SFAF RECORD *****";
        let report = importer().parse_with_report(text);
        assert_eq!(report.record.len(), 1);
        assert_eq!(report.count(|r| *r == SkipReason::Decoration), 5);
    }

    #[test]
    fn test_malformed_and_empty_lines() {
        let report = importer().parse_with_report(
            "just some text\n12. short\n1100. long\n501. $\n502.\n303. 303000N0865000W",
        );
        assert_eq!(report.record.len(), 1);
        assert_eq!(report.count(|r| *r == SkipReason::Malformed), 3);
        assert_eq!(report.count(|r| matches!(r, SkipReason::EmptyValue(_))), 2);
        assert_eq!(report.skipped[0].line, 1);
    }

    #[test]
    fn test_field_number_must_be_ascii_digits() {
        let report = importer().parse_with_report("٠٠٥. U\n005/٠٢. S\n005. C");
        assert_eq!(report.record.occurrences(field(5)), ["C"]);
        assert_eq!(report.count(|r| *r == SkipReason::Malformed), 2);
    }

    #[test]
    fn test_value_trimmed_inner_spacing_kept() {
        let record = importer().parse("301.    FORT  HOOD   ");
        assert_eq!(record.first(field(301)), Some("FORT  HOOD"));
    }

    #[test]
    fn test_batch_split() {
        let text = "005. U\n110. K4726.5\n***** END OF SFAF RECORD *****\n\
                    005. S\n---\n\n---\n005. C\nEND\n";
        let reports = importer().parse_batch(text);
        let classes: Vec<_> = reports.iter().map(|r| r.record.first(field(5))).collect();
        assert_eq!(classes, [Some("U"), Some("S"), Some("C")]);
        assert_eq!(reports[0].record.len(), 2);
    }
}
