//! # SFAF Text Export
//!
//! Renders a record into the canonical SFAF text layout:
//!
//! ```text
//! ***** STANDARD FREQUENCY ACTION FORMAT (SFAF) *****
//! MCEB Publication 7, June 30, 2005
//! Generated: 2026-01-15
//! System: SFAF Plotter
//!
//! 005. U
//! 113. MO
//! 113/02. FB
//!
//! ***** END OF SFAF RECORD *****
//! ```
//!
//! Field lines follow the field table's declaration order. Fields the table
//! does not know are appended in ascending numeric order. Blank values and
//! the `$` placeholder are never written, so every exported line survives a
//! re-import.

use sfaf_core::{FieldNumber, FieldSpecTable, FieldValue, Record, Timestamp};

/// First header line.
pub const BANNER: &str = "***** STANDARD FREQUENCY ACTION FORMAT (SFAF) *****";
/// Publication reference line.
pub const PUBLICATION: &str = "MCEB Publication 7, June 30, 2005";
/// Closing line.
pub const TRAILER: &str = "***** END OF SFAF RECORD *****";
/// `System:` identifier used when none is configured.
pub const DEFAULT_SYSTEM: &str = "SFAF Plotter";
/// Placeholder some systems write for an intentionally empty value.
pub const EMPTY_PLACEHOLDER: &str = "$";
/// Highest occurrence number the two-digit line grammar can carry.
pub const MAX_LINE_OCCURRENCE: usize = 99;

/// Renders records as SFAF text.
#[derive(Debug, Clone)]
pub struct SfafExporter {
    table: FieldSpecTable,
    system: String,
}

impl SfafExporter {
    /// Exporter ordering lines by `table`.
    pub fn new(table: FieldSpecTable) -> Self {
        Self {
            table,
            system: DEFAULT_SYSTEM.to_string(),
        }
    }

    /// Exporter over the default MCEB table.
    pub fn mceb() -> Self {
        Self::new(FieldSpecTable::mceb())
    }

    /// Set the `System:` identifier.
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = system.into();
        self
    }

    /// The `System:` identifier.
    pub fn system(&self) -> &str {
        &self.system
    }

    /// Render `record`, stamping the header with `generated`.
    pub fn export(&self, record: &Record, generated: Timestamp) -> String {
        let mut lines = vec![
            BANNER.to_string(),
            PUBLICATION.to_string(),
            format!("Generated: {}", generated.to_sfaf_date()),
            format!("System: {}", self.system),
            String::new(),
        ];
        lines.extend(self.field_lines(record));
        lines.push(String::new());
        lines.push(TRAILER.to_string());
        lines.join("\n")
    }

    /// Render `record` stamped with the current date.
    pub fn export_now(&self, record: &Record) -> String {
        self.export(record, Timestamp::now())
    }

    /// Field lines only, in canonical order.
    pub fn field_lines(&self, record: &Record) -> Vec<String> {
        let mut lines = Vec::new();
        for (field, value) in self.ordered(record) {
            render_field(field, value, &mut lines);
        }
        lines
    }

    fn ordered<'r>(&self, record: &'r Record) -> Vec<(FieldNumber, &'r FieldValue)> {
        let mut known: Vec<(usize, FieldNumber, &FieldValue)> = Vec::new();
        let mut unknown: Vec<(FieldNumber, &FieldValue)> = Vec::new();
        for (field, value) in record.iter() {
            match self.table.canonical_position(field) {
                Some(pos) => known.push((pos, field, value)),
                None => unknown.push((field, value)),
            }
        }
        known.sort_by_key(|(pos, _, _)| *pos);
        known
            .into_iter()
            .map(|(_, f, v)| (f, v))
            .chain(unknown)
            .collect()
    }
}

impl Default for SfafExporter {
    fn default() -> Self {
        Self::mceb()
    }
}

fn render_field(field: FieldNumber, value: &FieldValue, lines: &mut Vec<String>) {
    let values: Vec<String> = value
        .occurrences()
        .iter()
        .map(|v| single_line(v))
        .filter(|v| !v.is_empty())
        .filter(|v| {
            let placeholder = v == EMPTY_PLACEHOLDER;
            if placeholder {
                tracing::warn!(field = %field.id(), "skipping empty-value placeholder");
            }
            !placeholder
        })
        .collect();

    if values.len() > MAX_LINE_OCCURRENCE {
        tracing::warn!(
            field = %field.id(),
            occurrences = values.len(),
            "dropping occurrences beyond {}",
            MAX_LINE_OCCURRENCE
        );
    }

    for (i, v) in values.iter().take(MAX_LINE_OCCURRENCE).enumerate() {
        if i == 0 {
            lines.push(format!("{field}. {v}"));
        } else {
            lines.push(format!("{field}/{:02}. {v}", i + 1));
        }
    }
}

/// Trim and collapse embedded line breaks so a value occupies one line.
fn single_line(value: &str) -> String {
    value
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
