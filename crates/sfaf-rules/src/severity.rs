//! # Severity Policy
//!
//! A mismatch against a closed enumeration (classification, agency) is a
//! hard error; a mismatch against an open-ended reference list (station
//! class, IRAC notes) is a warning. The split is per-field configuration:
//! hosts may reclassify any field's list-membership check at startup.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use sfaf_core::{FieldNumber, SfafError};

/// How a failed check is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Makes the field invalid.
    Error,
    /// Reported, field stays valid.
    Warning,
}

impl Severity {
    /// Lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = SfafError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "error" | "hard" => Ok(Self::Error),
            "warning" | "warn" | "soft" => Ok(Self::Warning),
            other => Err(SfafError::Config(format!(
                "unknown severity {other:?}; expected error or warning"
            ))),
        }
    }
}

/// Per-field overrides for list-membership severity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeverityPolicy {
    overrides: BTreeMap<FieldNumber, Severity>,
}

impl SeverityPolicy {
    /// No overrides: every field uses its rule's default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reclassify a field.
    pub fn with_override(mut self, field: FieldNumber, severity: Severity) -> Self {
        self.overrides.insert(field, severity);
        self
    }

    /// Reclassify a field in place.
    pub fn set(&mut self, field: FieldNumber, severity: Severity) {
        self.overrides.insert(field, severity);
    }

    /// Effective severity for `field` given the rule's default.
    pub fn resolve(&self, field: FieldNumber, default: Severity) -> Severity {
        self.overrides.get(&field).copied().unwrap_or(default)
    }

    /// Number of overrides.
    pub fn len(&self) -> usize {
        self.overrides.len()
    }

    /// Whether there are no overrides.
    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_from_str() {
        assert_eq!("Error".parse::<Severity>().unwrap(), Severity::Error);
        assert_eq!("soft".parse::<Severity>().unwrap(), Severity::Warning);
        assert!(matches!("fatal".parse::<Severity>(), Err(SfafError::Config(_))));
    }

    #[test]
    fn test_policy_resolve() {
        let station = FieldNumber::new(113).unwrap();
        let agency = FieldNumber::new(200).unwrap();
        let policy = SeverityPolicy::new().with_override(station, Severity::Error);
        assert_eq!(policy.resolve(station, Severity::Warning), Severity::Error);
        assert_eq!(policy.resolve(agency, Severity::Error), Severity::Error);
        assert_eq!(policy.len(), 1);
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Severity::Warning).unwrap(), "\"warning\"");
    }
}
