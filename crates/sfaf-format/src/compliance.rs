//! # MCEB Pub 7 Compliance Report
//!
//! An advisory checklist run alongside export. The report never blocks
//! export. It covers:
//!
//! - the fields an assignment needs before submission. Critical items are
//!   always required; some items apply only when another field has a given
//!   value (701 Frequency Action Officer is required for USAF actions);
//! - the format status from the field validator;
//! - per-field occurrence limits;
//! - emission groups: the i-th occurrences of 113/114/115 describe one
//!   emission, and a field given once applies to every group;
//! - coordination items: 015 on classified records, 201 outside US&P,
//!   511 always, and 512 alongside 511.
//!
//! Recommended items are printed but never fail the verdict.

use serde::Serialize;
use std::fmt;

use sfaf_core::{FieldNumber, FieldSpecTable, Record, Timestamp};
use sfaf_rules::{FormValidationSummary, SfafValidator};

/// How strongly a checklist item is required.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementLevel {
    /// Core assignment data.
    Critical,
    /// Administrative data expected on submission.
    Required,
    /// Advisory only.
    Recommended,
}

/// When a checklist item applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    /// Every record.
    Always,
    /// Only when field 200 (Agency) equals the value.
    Agency(&'static str),
}

/// One checklist item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Requirement {
    /// Field number.
    pub field: u16,
    /// Label used in the report.
    pub label: &'static str,
    /// Critical or required.
    pub level: RequirementLevel,
    /// Applicability.
    pub condition: Condition,
}

const fn critical(field: u16, label: &'static str) -> Requirement {
    Requirement {
        field,
        label,
        level: RequirementLevel::Critical,
        condition: Condition::Always,
    }
}

const fn required(field: u16, label: &'static str, condition: Condition) -> Requirement {
    Requirement {
        field,
        label,
        level: RequirementLevel::Required,
        condition,
    }
}

/// Field 200, consulted by agency-conditional items.
const AGENCY_FIELD: u16 = 200;

/// Station class, emission designator and transmitter power.
const EMISSION_FIELDS: [u16; 3] = [113, 114, 115];

/// Field 005 values that mark a classified record.
const CLASSIFIED: &[&str] = &["C", "S", "T"];

/// State/country codes inside the United States and its possessions.
pub const US_AND_POSSESSIONS: &[&str] = &[
    "US", "USA", "USP",
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "FL", "GA",
    "HI", "ID", "IL", "IN", "IA", "KS", "KY", "LA", "ME", "MD",
    "MA", "MI", "MN", "MS", "MO", "MT", "NE", "NV", "NH", "NJ",
    "NM", "NY", "NC", "ND", "OH", "OK", "OR", "PA", "RI", "SC",
    "SD", "TN", "TX", "UT", "VT", "VA", "WA", "WV", "WI", "WY",
    "DC", "PR", "VI", "GUM", "SMA", "MRA", "MDW", "PLM", "WAK", "JON",
];

/// The submission checklist.
pub const COMPLIANCE_CHECKLIST: &[Requirement] = &[
    critical(5, "Security Classification"),
    critical(10, "Type of Action"),
    critical(102, "Agency Serial Number"),
    critical(110, "Frequency"),
    critical(113, "Station Class"),
    critical(114, "Emission Designator"),
    critical(115, "Transmitter Power"),
    critical(200, "Agency"),
    critical(300, "State/Country (TX)"),
    critical(301, "Antenna Location (TX)"),
    critical(303, "Antenna Coordinates (TX)"),
    critical(400, "State/Country (RX)"),
    critical(401, "Antenna Location (RX)"),
    critical(403, "Antenna Coordinates (RX)"),
    required(701, "Frequency Action Officer", Condition::Agency("USAF")),
    required(716, "Usage Code", Condition::Always),
    required(803, "Requestor Data POC", Condition::Always),
    required(144, "Approval Authority", Condition::Always),
];

/// A checklist item the record does not satisfy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingField {
    /// Field number.
    pub field: FieldNumber,
    /// Checklist label.
    pub label: String,
    /// Critical or required.
    pub level: RequirementLevel,
}

/// A field with more occurrences than its limit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OccurrenceViolation {
    /// Field number.
    pub field: FieldNumber,
    /// Occurrences present.
    pub count: usize,
    /// Limit from the field table.
    pub max: usize,
}

/// Field-format outcome carried into the report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormatStatus {
    /// Fields examined by the validator.
    pub total_fields: usize,
    /// Fields with no errors.
    pub valid_fields: usize,
    /// Validator errors.
    pub errors: Vec<String>,
    /// Validator warnings.
    pub warnings: Vec<String>,
}

impl FormatStatus {
    /// Whether every examined field passed.
    pub fn is_valid(&self) -> bool {
        self.valid_fields == self.total_fields && self.errors.is_empty()
    }
}

impl From<&FormValidationSummary> for FormatStatus {
    fn from(summary: &FormValidationSummary) -> Self {
        Self {
            total_fields: summary.total_fields,
            valid_fields: summary.valid_fields,
            errors: summary.errors.clone(),
            warnings: summary.warnings.clone(),
        }
    }
}

/// One coordinated 113/114/115 set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmissionGroup {
    /// 1-based group number.
    pub number: usize,
    /// Emission fields with no value for this group.
    pub missing: Vec<FieldNumber>,
}

impl EmissionGroup {
    /// Whether station class, emission and power are all present.
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// A cross-field coordination item the record does not satisfy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoordinationFinding {
    /// Field that should be supplied.
    pub field: FieldNumber,
    /// Field label.
    pub label: String,
    /// Required or recommended.
    pub level: RequirementLevel,
    /// What triggered the item.
    pub reason: String,
}

/// Outcome of the compliance checklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComplianceReport {
    /// When the report was produced.
    pub generated: Timestamp,
    /// Applicable checklist items.
    pub required_total: usize,
    /// Applicable items that are present.
    pub required_present: usize,
    /// Applicable items that are missing.
    pub missing: Vec<MissingField>,
    /// Field-format validation outcome.
    pub format: FormatStatus,
    /// Occurrence-limit breaches.
    pub occurrence_violations: Vec<OccurrenceViolation>,
    /// Emission groups in occurrence order.
    pub emission_groups: Vec<EmissionGroup>,
    /// Unsatisfied coordination items.
    pub coordination: Vec<CoordinationFinding>,
}

impl ComplianceReport {
    /// Validate `record` with `validator` and run the checklist.
    pub fn check(validator: &SfafValidator, record: &Record, generated: Timestamp) -> Self {
        let summary = validator.validate_all(record);
        Self::evaluate(validator.table(), record, &summary, generated)
    }

    /// Run the checklist against `record` using an existing validation
    /// summary of the same record.
    pub fn evaluate(
        table: &FieldSpecTable,
        record: &Record,
        format: &FormValidationSummary,
        generated: Timestamp,
    ) -> Self {
        let agency = FieldNumber::new(AGENCY_FIELD)
            .ok()
            .and_then(|f| record.first(f))
            .map(|a| a.trim().to_uppercase());

        let mut required_total = 0;
        let mut missing = Vec::new();
        for item in COMPLIANCE_CHECKLIST {
            let applies = match item.condition {
                Condition::Always => true,
                Condition::Agency(code) => agency.as_deref() == Some(code),
            };
            if !applies {
                continue;
            }
            required_total += 1;
            let Ok(field) = FieldNumber::new(item.field) else {
                continue;
            };
            if !record.has_value(field) {
                missing.push(MissingField {
                    field,
                    label: item.label.to_string(),
                    level: item.level,
                });
            }
        }

        let occurrence_violations = record
            .iter()
            .filter_map(|(field, value)| {
                let spec = table.lookup(field)?;
                (value.len() > spec.max_occurrences).then(|| OccurrenceViolation {
                    field,
                    count: value.len(),
                    max: spec.max_occurrences,
                })
            })
            .collect();

        Self {
            generated,
            required_total,
            required_present: required_total - missing.len(),
            missing,
            format: FormatStatus::from(format),
            occurrence_violations,
            emission_groups: emission_groups(record),
            coordination: coordination(record),
        }
    }

    /// Whether the record is ready for submission: every applicable item
    /// present, every field well formed, no limit exceeded, every emission
    /// group complete and no required coordination item outstanding.
    pub fn is_compliant(&self) -> bool {
        self.missing.is_empty()
            && self.format.is_valid()
            && self.occurrence_violations.is_empty()
            && self.emission_groups.iter().all(EmissionGroup::is_complete)
            && self
                .coordination
                .iter()
                .all(|c| c.level == RequirementLevel::Recommended)
    }
}

fn field(n: u16) -> Option<FieldNumber> {
    FieldNumber::new(n).ok()
}

fn emission_groups(record: &Record) -> Vec<EmissionGroup> {
    let columns: Vec<(FieldNumber, &[String])> = EMISSION_FIELDS
        .iter()
        .filter_map(|&n| field(n))
        .map(|f| (f, record.occurrences(f)))
        .collect();
    let count = columns.iter().map(|(_, values)| values.len()).max().unwrap_or(0);

    (0..count)
        .map(|i| {
            let missing = columns
                .iter()
                .filter(|(_, values)| {
                    let value = if values.len() == 1 { values.first() } else { values.get(i) };
                    value.map_or(true, |v| v.trim().is_empty())
                })
                .map(|(f, _)| *f)
                .collect();
            EmissionGroup { number: i + 1, missing }
        })
        .collect()
}

fn coordination(record: &Record) -> Vec<CoordinationFinding> {
    let mut findings = Vec::new();
    let mut expect = |n: u16, label: &str, level: RequirementLevel, reason: &str| {
        if let Some(f) = field(n).filter(|f| !record.has_value(*f)) {
            findings.push(CoordinationFinding {
                field: f,
                label: label.to_string(),
                level,
                reason: reason.to_string(),
            });
        }
    };
    let code = |n: u16| field(n).and_then(|f| record.first(f)).map(|v| v.trim().to_uppercase());

    if code(5).is_some_and(|c| CLASSIFIED.contains(&c.as_str())) {
        expect(15, "Unclassified Data Fields", RequirementLevel::Required, "classified record");
    }

    let located = [300, 303, 400, 403]
        .into_iter()
        .all(|n| field(n).is_some_and(|f| record.has_value(f)));
    let outside = [300, 400].into_iter().any(|n| {
        field(n).is_some_and(|f| {
            record
                .occurrences(f)
                .iter()
                .map(|v| v.trim().to_uppercase())
                .filter(|v| !v.is_empty())
                .any(|v| !US_AND_POSSESSIONS.contains(&v.as_str()))
        })
    });
    if located && outside {
        expect(201, "Unified Command", RequirementLevel::Required, "assignment outside US&P");
    }

    if field(511).is_some_and(|f| record.has_value(f)) {
        expect(
            512,
            "Intermediate Function Identifier",
            RequirementLevel::Recommended,
            "completes the major function identifier",
        );
    } else {
        expect(511, "Major Function Identifier", RequirementLevel::Required, "all DoD assignments");
    }
    findings
}

impl fmt::Display for ComplianceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const TITLE: &str = "MCEB Publication 7 Compliance Report";
        writeln!(f, "{TITLE}")?;
        writeln!(f, "{}", "=".repeat(TITLE.len()))?;
        writeln!(f, "Generated: {}", self.generated)?;
        writeln!(f)?;

        for m in &self.missing {
            writeln!(f, "MISSING REQUIRED: {} - {}", m.field.id(), m.label)?;
        }
        writeln!(
            f,
            "Required Fields Status: {}/{} complete",
            self.required_present, self.required_total
        )?;
        writeln!(f)?;

        writeln!(
            f,
            "Format Validation Status: {}/{} compliant",
            self.format.valid_fields, self.format.total_fields
        )?;
        for e in &self.format.errors {
            writeln!(f, "FORMAT ERROR: {e}")?;
        }
        for w in &self.format.warnings {
            writeln!(f, "FORMAT WARNING: {w}")?;
        }
        writeln!(f)?;

        if self.occurrence_violations.is_empty() {
            writeln!(f, "All field occurrence limits compliant with MCEB Pub 7")?;
        } else {
            for v in &self.occurrence_violations {
                writeln!(
                    f,
                    "EXCEEDS LIMIT: {} has {} occurrences (max: {})",
                    v.field.id(),
                    v.count,
                    v.max
                )?;
            }
        }
        writeln!(f)?;

        if self.emission_groups.is_empty() {
            writeln!(f, "No emission groups defined (field113/field114/field115)")?;
        } else {
            writeln!(f, "Emission Groups: {} coordinated set(s)", self.emission_groups.len())?;
        }
        for g in &self.emission_groups {
            if g.is_complete() {
                writeln!(f, "EMISSION GROUP {}: complete (113/114/115)", g.number)?;
            } else {
                let missing: Vec<String> = g.missing.iter().map(|m| m.id()).collect();
                writeln!(
                    f,
                    "EMISSION GROUP {}: incomplete, missing {}",
                    g.number,
                    missing.join(", ")
                )?;
            }
        }
        writeln!(f)?;

        if self.coordination.is_empty() {
            writeln!(f, "All coordination requirements satisfied")?;
        }
        for c in &self.coordination {
            let tag = match c.level {
                RequirementLevel::Recommended => "RECOMMENDED",
                _ => "COORDINATION REQUIRED",
            };
            writeln!(f, "{tag}: {} - {} ({})", c.field.id(), c.label, c.reason)?;
        }
        writeln!(f)?;

        let verdict = if self.is_compliant() {
            "COMPLIANT"
        } else {
            "NON-COMPLIANT"
        };
        write!(f, "Overall Compliance: {verdict}")
    }
}
