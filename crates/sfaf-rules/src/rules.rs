//! # Field Rule Registry
//!
//! Dedicated validation strategies keyed by field number. The generic checks
//! (required, maximum length, allowed values, table pattern) come from the
//! field table; a field listed in [`MCEB_RULES`] additionally runs its
//! strategy once the generic checks pass.
//!
//! Rules are declared statically as [`RuleSpec`] and compiled once into a
//! [`RuleRegistry`]. Compilation is the only fallible step: a pattern that
//! does not compile is reported as [`SfafError::RulePattern`].

use regex::Regex;
use std::collections::BTreeMap;

use sfaf_core::{parse_sfaf_date, FieldNumber, FieldSpecTable, SfafError};

use crate::coordinates::Coordinates;
use crate::reference::{ReferenceData, ReferenceList};
use crate::severity::{Severity, SeverityPolicy};

// ─── Static Rule Declarations ───────────────────────────────────────

/// Assigned frequency: kHz/MHz/GHz prefix with optional reference frequency.
const FREQUENCY_PREFIXED: &str = r"^[KMG][0-9]{1,7}(\.[0-9]{1,3})?(\([0-9]{1,7}(\.[0-9]{1,3})?\))?$";
/// Assigned frequency: bare number.
const FREQUENCY_BARE: &str = r"^[0-9]{1,7}(\.[0-9]{1,6})?$";
/// Assigned frequency: Hz / THz prefix.
const FREQUENCY_EXTREME: &str = r"^[HV][0-9]{1,7}(\.[0-9]{1,3})?$";
/// Transmitter power with unit prefix.
const TRANSMITTER_POWER: &str = r"^[KMWV][0-9]{1,7}(\.[0-9]{1,3})?$";
/// Agency serial number shape after whitespace removal.
const SERIAL_SHAPE: &str = r"^[A-Z]{1,4}[0-9]{6}$";
/// Manufacturer code, AN/ nomenclature, optional variant.
const EQUIPMENT_NOMENCLATURE: &str = r"^[A-Z],AN/[A-Z]{3}-[0-9]+(\([A-Z]+\))?$";
/// Certification ID, e.g. `J/F 12/11171`.
const EQUIPMENT_CERTIFICATION: &str = r"^[A-Z]/[A-Z]\s[0-9]{2}/[0-9]{5}$";

/// Declarative form of a dedicated rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleSpec {
    /// Field 102 agency-prefix advisory.
    SerialNumber,
    /// Field 110.
    Frequency,
    /// Field 115.
    TransmitterPower,
    /// Fields 303/403.
    Coordinates,
    /// Open-ended code list, warning by default.
    Reference(ReferenceList),
    /// Advisory format, always a warning.
    Advisory {
        /// Pattern applied to the uppercased value.
        pattern: &'static str,
        /// Diagnostic on mismatch.
        message: &'static str,
    },
    /// Single printable line.
    FreeText,
    /// `YYYYMMDD` calendar date.
    CalendarDate,
    /// Field 131, 1-99.
    PercentTime,
    /// Fields 357/457 plausibility range.
    AntennaGain,
    /// Fields 362/462.
    Orientation,
}

/// Dedicated rules for the MCEB field table.
pub const MCEB_RULES: &[(u16, RuleSpec)] = &[
    (19, RuleSpec::CalendarDate),
    (102, RuleSpec::SerialNumber),
    (110, RuleSpec::Frequency),
    (113, RuleSpec::Reference(ReferenceList::StationClass)),
    (115, RuleSpec::TransmitterPower),
    (131, RuleSpec::PercentTime),
    (140, RuleSpec::CalendarDate),
    (141, RuleSpec::CalendarDate),
    (142, RuleSpec::CalendarDate),
    (143, RuleSpec::CalendarDate),
    (300, RuleSpec::Reference(ReferenceList::GeographicCode)),
    (303, RuleSpec::Coordinates),
    (340, RuleSpec::Advisory {
        pattern: EQUIPMENT_NOMENCLATURE,
        message: "equipment nomenclature should be <manufacturer>,AN/<type>-<number> (e.g., G,AN/PRC-117(F))",
    }),
    (343, RuleSpec::Advisory {
        pattern: EQUIPMENT_CERTIFICATION,
        message: "certification ID should be <letter>/<letter> <yy>/<nnnnn> (e.g., J/F 12/11171)",
    }),
    (357, RuleSpec::AntennaGain),
    (362, RuleSpec::Orientation),
    (400, RuleSpec::Reference(ReferenceList::GeographicCode)),
    (403, RuleSpec::Coordinates),
    (440, RuleSpec::Advisory {
        pattern: EQUIPMENT_NOMENCLATURE,
        message: "equipment nomenclature should be <manufacturer>,AN/<type>-<number> (e.g., G,AN/PRC-117(F))",
    }),
    (443, RuleSpec::Advisory {
        pattern: EQUIPMENT_CERTIFICATION,
        message: "certification ID should be <letter>/<letter> <yy>/<nnnnn> (e.g., J/F 12/11171)",
    }),
    (457, RuleSpec::AntennaGain),
    (462, RuleSpec::Orientation),
    (500, RuleSpec::Reference(ReferenceList::IracNote)),
    (501, RuleSpec::FreeText),
    (502, RuleSpec::FreeText),
    (503, RuleSpec::FreeText),
    (511, RuleSpec::Reference(ReferenceList::MajorFunction)),
    (512, RuleSpec::Reference(ReferenceList::IntermediateFunction)),
    (513, RuleSpec::Reference(ReferenceList::FunctionIdentifier)),
    (520, RuleSpec::FreeText),
];

// ─── Compiled Rules ─────────────────────────────────────────────────

/// A diagnostic produced by a check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    /// Error or warning.
    pub severity: Severity,
    /// Human-readable message.
    pub message: String,
}

impl Finding {
    fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }

    fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
        }
    }
}

/// Inputs a rule may consult besides the value.
pub struct RuleContext<'a> {
    /// Field under validation.
    pub field: FieldNumber,
    /// Per-field severity overrides.
    pub policy: &'a SeverityPolicy,
    /// Bundle extending the built-in reference lists.
    pub reference: Option<&'a ReferenceData>,
    /// Year used for date plausibility checks.
    pub reference_year: i32,
}

/// A compiled dedicated rule.
#[derive(Debug, Clone)]
pub enum FieldRule {
    /// Field 102 agency-prefix advisory.
    SerialNumber { shape: Regex },
    /// Field 110.
    Frequency { patterns: [Regex; 3] },
    /// Field 115.
    TransmitterPower { pattern: Regex },
    /// Fields 303/403.
    Coordinates,
    /// Open-ended code list.
    Reference(ReferenceList),
    /// Advisory format.
    Advisory { pattern: Regex, message: &'static str },
    /// Single printable line.
    FreeText,
    /// `YYYYMMDD` date.
    CalendarDate,
    /// Field 131.
    PercentTime,
    /// Fields 357/457.
    AntennaGain,
    /// Fields 362/462.
    Orientation,
}

fn compile(field: FieldNumber, pattern: &str) -> Result<Regex, SfafError> {
    Regex::new(pattern).map_err(|e| SfafError::RulePattern {
        field: field.to_string(),
        reason: e.to_string(),
    })
}

impl FieldRule {
    /// Compile a declared rule for `field`.
    pub fn compile(field: FieldNumber, spec: RuleSpec) -> Result<Self, SfafError> {
        Ok(match spec {
            RuleSpec::SerialNumber => Self::SerialNumber {
                shape: compile(field, SERIAL_SHAPE)?,
            },
            RuleSpec::Frequency => Self::Frequency {
                patterns: [
                    compile(field, FREQUENCY_PREFIXED)?,
                    compile(field, FREQUENCY_BARE)?,
                    compile(field, FREQUENCY_EXTREME)?,
                ],
            },
            RuleSpec::TransmitterPower => Self::TransmitterPower {
                pattern: compile(field, TRANSMITTER_POWER)?,
            },
            RuleSpec::Coordinates => Self::Coordinates,
            RuleSpec::Reference(list) => Self::Reference(list),
            RuleSpec::Advisory { pattern, message } => Self::Advisory {
                pattern: compile(field, pattern)?,
                message,
            },
            RuleSpec::FreeText => Self::FreeText,
            RuleSpec::CalendarDate => Self::CalendarDate,
            RuleSpec::PercentTime => Self::PercentTime,
            RuleSpec::AntennaGain => Self::AntennaGain,
            RuleSpec::Orientation => Self::Orientation,
        })
    }

    /// The part of the value the field's maximum length applies to.
    ///
    /// For frequencies the parenthesized reference frequency is excluded.
    pub fn measured<'v>(&self, value: &'v str) -> &'v str {
        match self {
            Self::Frequency { .. } => value.split('(').next().unwrap_or(value),
            _ => value,
        }
    }

    /// Run the rule. `value` is trimmed; `upper` is its uppercase form.
    pub fn evaluate(&self, value: &str, upper: &str, ctx: &RuleContext<'_>) -> Vec<Finding> {
        match self {
            Self::SerialNumber { shape } => {
                let compact: String = upper.chars().filter(|c| !c.is_whitespace()).collect();
                if shape.is_match(&compact) {
                    Vec::new()
                } else {
                    vec![Finding::warning(
                        "serial number should be an agency prefix followed by six digits (e.g., AF 192345)",
                    )]
                }
            }
            Self::Frequency { patterns } => {
                if patterns.iter().any(|p| p.is_match(upper)) {
                    Vec::new()
                } else {
                    vec![Finding::error(
                        "invalid frequency format; use a K, M or G prefix with an optional reference frequency (e.g., K4726.5, M225.8, K4726.5(4725))",
                    )]
                }
            }
            Self::TransmitterPower { pattern } => check_power(pattern, upper),
            Self::Coordinates => match upper.parse::<Coordinates>() {
                Ok(_) => Vec::new(),
                Err(e) => vec![Finding::error(e.to_string())],
            },
            Self::Reference(list) => {
                let known = list.builtin_contains(upper)
                    || ctx.reference.is_some_and(|r| r.contains(*list, upper));
                if known {
                    Vec::new()
                } else {
                    let severity = ctx.policy.resolve(ctx.field, Severity::Warning);
                    vec![Finding {
                        severity,
                        message: format!("{upper:?}: {}", list.mismatch_message()),
                    }]
                }
            }
            Self::Advisory { pattern, message } => {
                if pattern.is_match(upper) {
                    Vec::new()
                } else {
                    vec![Finding::warning(*message)]
                }
            }
            Self::FreeText => {
                if value.chars().any(char::is_control) {
                    vec![Finding::error(
                        "must be a single line of printable characters",
                    )]
                } else {
                    Vec::new()
                }
            }
            Self::CalendarDate => check_date(value, ctx.reference_year),
            Self::PercentTime => match value.parse::<u8>() {
                Ok(n) if value.bytes().all(|b| b.is_ascii_digit()) && (1..=99).contains(&n) => {
                    Vec::new()
                }
                _ => vec![Finding::error("percent time must be a whole number from 1 to 99")],
            },
            Self::AntennaGain => match value.parse::<f64>() {
                Ok(g) if !(-50.0..=100.0).contains(&g) => vec![Finding::warning(format!(
                    "antenna gain {value} dBi is outside the typical range -50 to 100"
                ))],
                _ => Vec::new(),
            },
            Self::Orientation => check_orientation(upper),
        }
    }
}

fn check_power(pattern: &Regex, upper: &str) -> Vec<Finding> {
    if !pattern.is_match(upper) {
        return vec![Finding::error(
            "invalid transmitter power; use a W, K, M or V unit prefix (e.g., K10, W50, M5)",
        )];
    }
    let (unit, amount) = upper.split_at(1);
    let Ok(amount) = amount.parse::<f64>() else {
        return vec![Finding::error("transmitter power amount is not a number")];
    };
    match unit {
        "K" | "M" if !(1.0..1000.0).contains(&amount) => vec![Finding::error(format!(
            "power in {unit} units must be at least 1 and below 1000; rescale the unit prefix"
        ))],
        "W" if amount >= 1000.0 => vec![Finding::warning(
            "power of 1000 W or more should use the K prefix",
        )],
        _ => Vec::new(),
    }
}

fn check_date(value: &str, reference_year: i32) -> Vec<Finding> {
    use chrono::Datelike;

    match parse_sfaf_date(value) {
        None => vec![Finding::error("must be a valid calendar date in YYYYMMDD format")],
        Some(date) => {
            let latest = reference_year + 50;
            if (1990..=latest).contains(&date.year()) {
                Vec::new()
            } else {
                vec![Finding::warning(format!(
                    "year {} is outside the expected range 1990-{latest}",
                    date.year()
                ))]
            }
        }
    }
}

fn check_orientation(upper: &str) -> Vec<Finding> {
    let ok = match upper {
        "ND" | "N" | "S" | "E" | "W" => true,
        digits => {
            !digits.is_empty()
                && digits.len() <= 3
                && digits.bytes().all(|b| b.is_ascii_digit())
                && digits.parse::<u16>().is_ok_and(|d| d <= 360)
        }
    };
    if ok {
        Vec::new()
    } else {
        vec![Finding::error(
            "antenna orientation must be ND, a cardinal direction (N, S, E, W) or degrees 0-360",
        )]
    }
}

// ─── Registry ───────────────────────────────────────────────────────

/// Compiled dedicated rules and table patterns, keyed by field.
#[derive(Debug, Clone, Default)]
pub struct RuleRegistry {
    rules: BTreeMap<FieldNumber, FieldRule>,
    patterns: BTreeMap<FieldNumber, Regex>,
}

impl RuleRegistry {
    /// Compile [`MCEB_RULES`] and every pattern in `table`.
    pub fn mceb(table: &FieldSpecTable) -> Result<Self, SfafError> {
        Self::compile(table, MCEB_RULES)
    }

    /// Compile an arbitrary rule set against `table`.
    pub fn compile(table: &FieldSpecTable, rules: &[(u16, RuleSpec)]) -> Result<Self, SfafError> {
        let mut registry = Self::default();
        for (number, spec) in rules {
            let field = FieldNumber::new(*number)?;
            registry.rules.insert(field, FieldRule::compile(field, *spec)?);
        }
        for spec in table.iter() {
            if let Some(pattern) = spec.pattern {
                registry.patterns.insert(spec.number, compile(spec.number, pattern)?);
            }
        }
        Ok(registry)
    }

    /// Dedicated rule for `field`.
    pub fn rule(&self, field: FieldNumber) -> Option<&FieldRule> {
        self.rules.get(&field)
    }

    /// Compiled table pattern for `field`.
    pub fn pattern(&self, field: FieldNumber) -> Option<&Regex> {
        self.patterns.get(&field)
    }

    /// Number of dedicated rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether no dedicated rules are registered.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
