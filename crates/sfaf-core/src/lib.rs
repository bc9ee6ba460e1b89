//! # sfaf-core — Foundational Types for the SFAF Rule Engine
//!
//! Defines the data model shared by the validator, exporter and importer for
//! Standard Frequency Action Format (MCEB Publication 7) records.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype field identifiers.** `FieldNumber` is validated at
//!    construction; no bare `"field110"` strings travel past the boundary.
//!
//! 2. **One field table.** `MCEB_FIELDS` is the single source of titles,
//!    limits and canonical export order.
//!
//! 3. **Occurrence-based values.** A field is one value or an ordered
//!    sequence; equality ignores which representation was used.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `sfaf-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod field;
pub mod record;
pub mod table;
pub mod temporal;

pub use error::SfafError;
pub use field::{FieldKey, FieldNumber};
pub use record::{FieldValue, Record};
pub use table::{FieldSpec, FieldSpecTable, MCEB_FIELDS};
pub use temporal::{parse_sfaf_date, Timestamp};
