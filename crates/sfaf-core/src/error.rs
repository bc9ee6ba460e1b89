//! # Error Types — Structured Error Hierarchy
//!
//! Defines the error types used throughout the SFAF rule engine. All errors
//! use `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Malformed field *values* are never errors at this level. They surface as
//!   diagnostics inside a validation result.
//! - Only programmer errors (a malformed field identifier passed to a strict
//!   call, a rule pattern that does not compile) and operational failures
//!   (I/O, reference data, configuration) become `SfafError`.

use thiserror::Error;

/// Top-level error type for the SFAF rule engine.
#[derive(Error, Debug)]
pub enum SfafError {
    /// A field identifier did not have the `fieldNNN` shape.
    #[error("invalid field identifier {0:?}: expected fieldNNN with three digits")]
    InvalidFieldId(String),

    /// A field number outside `000..=999`.
    #[error("field number {0} is out of range (000-999)")]
    FieldNumberOutOfRange(u32),

    /// Reference data bundle could not be read or decoded.
    #[error("reference data error at {path}: {reason}")]
    ReferenceData {
        /// Location of the bundle.
        path: String,
        /// Underlying failure.
        reason: String,
    },

    /// A rule pattern failed to compile.
    #[error("rule pattern for field {field} failed to compile: {reason}")]
    RulePattern {
        /// Three-digit field number owning the rule.
        field: String,
        /// Regex compiler message.
        reason: String,
    },

    /// The import line grammar failed to compile.
    #[error("SFAF import grammar failed to compile: {0}")]
    Import(String),

    /// Engine configuration is inconsistent.
    #[error("configuration error: {0}")]
    Config(String),

    /// Timestamp parse failure.
    #[error("invalid timestamp: {0}")]
    Timestamp(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
