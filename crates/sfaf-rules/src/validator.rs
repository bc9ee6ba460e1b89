//! # SFAF Validator
//!
//! Validates field values and whole records against the field table and the
//! dedicated rule registry.
//!
//! ## Order of checks (per value)
//!
//! 1. Blank values pass unless the field is required.
//! 2. Maximum length.
//! 3. Allowed values (severity from [`SeverityPolicy`], error by default).
//! 4. Table pattern.
//! 5. Dedicated rule.
//!
//! The first hard error ends the checks for that value. Warnings never make
//! a value invalid.
//!
//! ## Behavior
//!
//! The validator never fails on a malformed value: every outcome is data in
//! a [`ValidationResult`]. Fields absent from the table are valid
//! pass-through. Record validation visits every field and every occurrence;
//! it does not stop at the first failure.

use serde::Serialize;
use std::fmt;
use std::sync::Arc;

use sfaf_core::{FieldNumber, FieldSpec, FieldSpecTable, Record, SfafError, Timestamp};

use crate::reference::ReferenceData;
use crate::rules::{Finding, RuleContext, RuleRegistry};
use crate::severity::{Severity, SeverityPolicy};

/// Outcome of validating one field value (or all occurrences of one field).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    /// Field that was validated.
    pub field: FieldNumber,
    /// False when any error was recorded.
    pub valid: bool,
    /// Hard errors.
    pub errors: Vec<String>,
    /// Soft warnings.
    pub warnings: Vec<String>,
}

impl ValidationResult {
    fn pass(field: FieldNumber) -> Self {
        Self {
            field,
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    fn push(&mut self, finding: Finding) {
        match finding.severity {
            Severity::Error => {
                self.valid = false;
                self.errors.push(finding.message);
            }
            Severity::Warning => self.warnings.push(finding.message),
        }
    }

    fn error(&mut self, message: String) {
        self.push(Finding {
            severity: Severity::Error,
            message,
        });
    }

    fn warning(&mut self, message: String) {
        self.push(Finding {
            severity: Severity::Warning,
            message,
        });
    }

    fn absorb(&mut self, other: ValidationResult, occurrence: Option<usize>) {
        let label = |m: String| match occurrence {
            Some(n) => format!("occurrence {n}: {m}"),
            None => m,
        };
        self.valid &= other.valid;
        self.errors.extend(other.errors.into_iter().map(label));
        self.warnings.extend(other.warnings.into_iter().map(label));
    }
}

/// Aggregate outcome of validating a record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormValidationSummary {
    /// Fields examined, including absent required fields.
    pub total_fields: usize,
    /// Fields with no errors.
    pub valid_fields: usize,
    /// Fields with at least one error.
    pub invalid_fields: usize,
    /// All errors, prefixed with the field number and title.
    pub errors: Vec<String>,
    /// All warnings, prefixed with the field number and title.
    pub warnings: Vec<String>,
    /// Per-field results in ascending field order.
    pub results: Vec<ValidationResult>,
}

impl FormValidationSummary {
    /// Whether the record has no errors.
    pub fn is_valid(&self) -> bool {
        self.invalid_fields == 0
    }

    /// Result for one field, if it was examined.
    pub fn result(&self, field: FieldNumber) -> Option<&ValidationResult> {
        self.results.iter().find(|r| r.field == field)
    }
}

impl fmt::Display for FormValidationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} field(s) checked: {} valid, {} invalid",
            self.total_fields, self.valid_fields, self.invalid_fields
        )?;
        for e in &self.errors {
            writeln!(f, "  ERROR: {e}")?;
        }
        for w in &self.warnings {
            writeln!(f, "  WARNING: {w}")?;
        }
        Ok(())
    }
}

/// The field validator.
///
/// Built once at startup and shared by reference; all state is read-only.
#[derive(Debug, Clone)]
pub struct SfafValidator {
    table: FieldSpecTable,
    registry: RuleRegistry,
    policy: SeverityPolicy,
    reference: Option<Arc<ReferenceData>>,
    reference_year: i32,
}

impl SfafValidator {
    /// Build a validator over `table` with the MCEB rule registry.
    pub fn new(table: FieldSpecTable) -> Result<Self, SfafError> {
        let registry = RuleRegistry::mceb(&table)?;
        Ok(Self {
            table,
            registry,
            policy: SeverityPolicy::new(),
            reference: None,
            reference_year: Timestamp::now().year(),
        })
    }

    /// Validator over the default MCEB table.
    pub fn mceb() -> Result<Self, SfafError> {
        Self::new(FieldSpecTable::mceb())
    }

    /// Replace the severity policy.
    pub fn with_policy(mut self, policy: SeverityPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Extend the built-in reference lists with a loaded bundle.
    pub fn with_reference_data(mut self, data: Arc<ReferenceData>) -> Self {
        self.reference = Some(data);
        self
    }

    /// Fix the year used for date plausibility checks.
    pub fn with_reference_year(mut self, year: i32) -> Self {
        self.reference_year = year;
        self
    }

    /// The field table.
    pub fn table(&self) -> &FieldSpecTable {
        &self.table
    }

    /// Validate one value of a field given as `fieldNNN`.
    ///
    /// A malformed identifier is a caller bug and is returned as
    /// [`SfafError::InvalidFieldId`].
    pub fn validate_id(&self, field_id: &str, raw: &str) -> Result<ValidationResult, SfafError> {
        let field = FieldNumber::from_field_id(field_id)?;
        Ok(self.validate(field, raw))
    }

    /// Validate one value of `field`.
    pub fn validate(&self, field: FieldNumber, raw: &str) -> ValidationResult {
        let mut result = ValidationResult::pass(field);
        let Some(spec) = self.table.lookup(field) else {
            return result;
        };

        let value = raw.trim();
        if value.is_empty() {
            if spec.required {
                result.error(format!("{} is required", spec.title));
            }
            return result;
        }

        let rule = self.registry.rule(field);
        let measured = rule.map_or(value, |r| r.measured(value));
        if spec.exceeds_length(measured) {
            result.error(format!(
                "maximum {} characters for {}",
                spec.max_length, spec.title
            ));
            return result;
        }

        let upper = value.to_uppercase();
        if !spec.allows(value) {
            let severity = self.policy.resolve(field, Severity::Error);
            result.push(Finding {
                severity,
                message: format!(
                    "invalid {} {upper:?}; valid values: {}",
                    spec.title,
                    spec.allowed_values.join(", ")
                ),
            });
            if severity == Severity::Error {
                return result;
            }
        }

        if let Some(pattern) = self.registry.pattern(field) {
            if !pattern.is_match(&upper) {
                result.error(pattern_message(spec));
                return result;
            }
        }

        if let Some(rule) = rule {
            let ctx = RuleContext {
                field,
                policy: &self.policy,
                reference: self.reference.as_deref(),
                reference_year: self.reference_year,
            };
            for finding in rule.evaluate(value, &upper, &ctx) {
                result.push(finding);
            }
        }
        result
    }

    /// Validate every field of a record.
    pub fn validate_all(&self, record: &Record) -> FormValidationSummary {
        let mut summary = FormValidationSummary::default();

        for (field, value) in record.iter() {
            let spec = self.table.lookup(field);
            let occurrences = value.occurrences();
            let mut result = ValidationResult::pass(field);

            if occurrences.is_empty() {
                result.absorb(self.validate(field, ""), None);
            } else if occurrences.len() == 1 {
                result.absorb(self.validate(field, &occurrences[0]), None);
            } else {
                for (i, occurrence) in occurrences.iter().enumerate() {
                    result.absorb(self.validate(field, occurrence), Some(i + 1));
                }
            }

            if let Some(spec) = spec {
                if occurrences.len() > spec.max_occurrences {
                    result.warning(format!(
                        "{} has {} occurrences (max {})",
                        field.id(),
                        occurrences.len(),
                        spec.max_occurrences
                    ));
                }
            }
            self.record(&mut summary, spec, result);
        }

        for spec in self.table.required_fields() {
            if record.get(spec.number).is_none() {
                let mut result = ValidationResult::pass(spec.number);
                result.error(format!("{} is required", spec.title));
                self.record(&mut summary, Some(spec), result);
            }
        }
        summary.results.sort_by_key(|r| r.field);

        tracing::debug!(
            total = summary.total_fields,
            invalid = summary.invalid_fields,
            warnings = summary.warnings.len(),
            "validated record"
        );
        summary
    }

    fn record(&self, summary: &mut FormValidationSummary, spec: Option<&FieldSpec>, result: ValidationResult) {
        let prefix = match spec {
            Some(spec) => format!("Field {} ({})", result.field, spec.title),
            None => format!("Field {}", result.field),
        };
        summary.total_fields += 1;
        if result.valid {
            summary.valid_fields += 1;
        } else {
            summary.invalid_fields += 1;
        }
        summary
            .errors
            .extend(result.errors.iter().map(|e| format!("{prefix}: {e}")));
        summary
            .warnings
            .extend(result.warnings.iter().map(|w| format!("{prefix}: {w}")));
        summary.results.push(result);
    }
}

fn pattern_message(spec: &FieldSpec) -> String {
    if spec.examples.is_empty() {
        format!("invalid {} format", spec.title)
    } else {
        format!(
            "invalid {} format (e.g., {})",
            spec.title,
            spec.examples.join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(n: u16) -> FieldNumber {
        FieldNumber::new(n).unwrap()
    }

    fn validator() -> SfafValidator {
        SfafValidator::mceb().unwrap().with_reference_year(2026)
    }

    #[test]
    fn test_unknown_field_passes_through() {
        let r = validator().validate(field(903), "anything at all, really");
        assert!(r.valid);
        assert!(r.errors.is_empty() && r.warnings.is_empty());
    }

    #[test]
    fn test_blank_is_valid_unless_required() {
        let v = validator();
        assert!(v.validate(field(5), "   ").valid);

        let mut table = FieldSpecTable::mceb();
        table.require(field(5));
        let strict = SfafValidator::new(table).unwrap();
        let r = strict.validate(field(5), "");
        assert!(!r.valid);
        assert_eq!(r.errors, ["Security Classification is required"]);
    }

    #[test]
    fn test_classification_lists_valid_values() {
        let r = validator().validate(field(5), "X");
        assert!(!r.valid);
        assert!(r.errors[0].contains("U, UE, C, S"), "{:?}", r.errors);
        assert!(validator().validate(field(5), "s").valid);
    }

    #[test]
    fn test_policy_can_soften_closed_list() {
        let policy = SeverityPolicy::new().with_override(field(200), Severity::Warning);
        let v = validator().with_policy(policy);
        let r = v.validate(field(200), "USSF");
        assert!(r.valid);
        assert_eq!(r.warnings.len(), 1);
    }

    #[test]
    fn test_length_checked_before_pattern() {
        let r = validator().validate(field(102), "AF 12345678");
        assert_eq!(r.errors, ["maximum 10 characters for Agency Serial Number"]);
    }

    #[test]
    fn test_pattern_error_quotes_examples() {
        let r = validator().validate(field(114), "ZZZ");
        assert!(!r.valid);
        assert!(r.errors[0].contains("16K0F3E"));
        assert!(validator().validate(field(114), "16k0f3e").valid);
    }

    #[test]
    fn test_frequency_with_reference() {
        let v = validator();
        assert!(v.validate(field(110), "K4726.5(4725)").valid);
        assert!(!v.validate(field(110), "4726.5.5").valid);
        assert!(!v.validate(field(110), "K12345678.12").valid);
    }

    #[test]
    fn test_validate_id_rejects_malformed() {
        let v = validator();
        assert!(matches!(
            v.validate_id("freq", "K4726.5"),
            Err(SfafError::InvalidFieldId(_))
        ));
        assert!(v.validate_id("field110", "K4726.5").unwrap().valid);
    }

    #[test]
    fn test_validate_all_counts_and_prefixes() {
        let record = Record::new()
            .with("field005", "X")
            .unwrap()
            .with("field110", "K4726.5")
            .unwrap()
            .with("field113", "QQ")
            .unwrap();
        let summary = validator().validate_all(&record);
        assert_eq!(summary.total_fields, 3);
        assert_eq!(summary.valid_fields, 2);
        assert_eq!(summary.invalid_fields, 1);
        assert!(summary.errors[0].starts_with("Field 005 (Security Classification): "));
        assert_eq!(summary.warnings.len(), 1);
        assert!(summary.warnings[0].starts_with("Field 113 (Station Class): "));
        assert!(!summary.is_valid());
    }

    #[test]
    fn test_validate_all_checks_every_occurrence() {
        let record = Record::new()
            .with("field114", ["16K0F3E", "BAD!", "A3E"])
            .unwrap();
        let summary = validator().validate_all(&record);
        assert_eq!(summary.invalid_fields, 1);
        assert_eq!(summary.errors.len(), 1);
        assert!(summary.errors[0].contains("occurrence 2"));
    }

    #[test]
    fn test_occurrence_overflow_is_warning() {
        let classes: Vec<String> = (0..21).map(|_| "MO".to_string()).collect();
        let mut record = Record::new();
        record.insert(field(113), classes);
        let summary = validator().validate_all(&record);
        assert!(summary.is_valid());
        assert!(summary
            .warnings
            .iter()
            .any(|w| w.contains("field113 has 21 occurrences (max 20)")));
    }

    #[test]
    fn test_absent_required_field_is_reported() {
        let mut table = FieldSpecTable::mceb();
        table.require(field(10));
        let v = SfafValidator::new(table).unwrap();
        let record = Record::new().with("field005", "S").unwrap();
        let summary = v.validate_all(&record);
        assert_eq!(summary.total_fields, 2);
        assert_eq!(summary.invalid_fields, 1);
        assert_eq!(summary.errors, ["Field 010 (Type of Action): Type of Action is required"]);
    }

    #[test]
    fn test_summary_display() {
        let record = Record::new().with("field005", "X").unwrap();
        let text = validator().validate_all(&record).to_string();
        assert!(text.starts_with("1 field(s) checked: 0 valid, 1 invalid"));
        assert!(text.contains("ERROR: Field 005"));
    }
}
