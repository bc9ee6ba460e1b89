//! # sfaf-rules — MCEB Pub 7 Validation Rules
//!
//! Validates SFAF field values and whole records.
//!
//! ## Modules
//!
//! - [`rules`]: dedicated rule strategies keyed by field number, compiled
//!   once into a [`RuleRegistry`].
//! - [`validator`]: [`SfafValidator::validate`] for one value and
//!   [`SfafValidator::validate_all`] for a record.
//! - [`severity`]: per-field error/warning classification.
//! - [`reference`]: built-in Annex lists and the optional reference bundle.
//! - [`coordinates`]: `DDMMSS[N|S]DDDMMSS[E|W]` parsing.
//!
//! ## Crate Policy
//!
//! - Depends only on `sfaf-core` internally.
//! - Malformed values are reported as data, never as `Err`.
//! - Reference-data failures degrade to the fallback list with a warning.

pub mod coordinates;
pub mod reference;
pub mod rules;
pub mod severity;
pub mod validator;

pub use coordinates::{CoordinateError, Coordinates};
pub use reference::{ReferenceData, ReferenceEntry, ReferenceList, ReferenceLoader};
pub use rules::{FieldRule, RuleRegistry, RuleSpec, MCEB_RULES};
pub use severity::{Severity, SeverityPolicy};
pub use validator::{FormValidationSummary, SfafValidator, ValidationResult};
