//! # sfaf-format — SFAF Text Export & Import
//!
//! - **Export** (`export.rs`): renders a record as SFAF text in the field
//!   table's canonical order, with `NNN/MM.` numbering for repeated values.
//!
//! - **Import** (`import.rs`): parses SFAF text back into records, dropping
//!   auto-generated fields and decoration lines. Multi-record files are
//!   split on trailer and separator lines.
//!
//! - **Compliance** (`compliance.rs`): the advisory submission checklist
//!   printed alongside an export. It folds in the validator's format status
//!   and the emission-group and coordination checks.
//!
//! ## Crate Policy
//!
//! - Depends on `sfaf-core` and `sfaf-rules` internally; never on the CLI.
//! - `import(export(record))` reproduces the record for every field outside
//!   the auto-generated deny list, within the occurrence limit.

pub mod compliance;
pub mod export;
pub mod import;

pub use compliance::{
    ComplianceReport, CoordinationFinding, EmissionGroup, FormatStatus, RequirementLevel,
    COMPLIANCE_CHECKLIST, US_AND_POSSESSIONS,
};
pub use export::{SfafExporter, DEFAULT_SYSTEM, EMPTY_PLACEHOLDER};
pub use import::{ImportReport, SfafImporter, SkipReason, SkippedLine, AUTO_GENERATED_FIELDS};
