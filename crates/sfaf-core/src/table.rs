//! # Field Specification Table
//!
//! The static registry of MCEB Publication 7 field constraints. One
//! [`FieldSpec`] per SFAF field: display title, maximum length, maximum
//! occurrences, optional closed set of allowed values and optional format
//! pattern.
//!
//! ## Invariants
//!
//! - [`MCEB_FIELDS`] is declared in canonical export order. The exporter
//!   derives its line order from this declaration and nothing else.
//! - A [`FieldSpecTable`] is built once at startup and is read-only from
//!   then on. Hosts that need stricter requirements mark fields required
//!   through [`FieldSpecTable::require`] before handing the table to the
//!   validator.
//! - Fields absent from the table are pass-through: they are neither
//!   validated nor rejected.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::field::FieldNumber;

/// Constraints for one SFAF field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    /// Field number.
    pub number: FieldNumber,
    /// Human-readable title used in diagnostics.
    pub title: &'static str,
    /// Maximum character count of a single value; `0` means unbounded.
    pub max_length: usize,
    /// Maximum number of occurrences; values above 1 mark the field repeatable.
    pub max_occurrences: usize,
    /// Whether a blank or absent value is an error.
    pub required: bool,
    /// Closed set of accepted values, compared after uppercase and trim.
    pub allowed_values: &'static [&'static str],
    /// Format rule applied to the uppercased, trimmed value.
    pub pattern: Option<&'static str>,
    /// Example values quoted when the pattern does not match.
    pub examples: &'static [&'static str],
}

impl FieldSpec {
    const fn new(number: u16, title: &'static str, max_length: usize, max_occurrences: usize) -> Self {
        Self {
            number: FieldNumber::known(number),
            title,
            max_length,
            max_occurrences,
            required: false,
            allowed_values: &[],
            pattern: None,
            examples: &[],
        }
    }

    const fn values(mut self, allowed: &'static [&'static str]) -> Self {
        self.allowed_values = allowed;
        self
    }

    const fn pattern(mut self, pattern: &'static str, examples: &'static [&'static str]) -> Self {
        self.pattern = Some(pattern);
        self.examples = examples;
        self
    }

    /// The record key, e.g. `field110`.
    pub fn id(&self) -> String {
        self.number.id()
    }

    /// Whether more than one occurrence is permitted.
    pub fn is_repeatable(&self) -> bool {
        self.max_occurrences > 1
    }

    /// Whether `value` (already trimmed) exceeds the maximum length.
    pub fn exceeds_length(&self, value: &str) -> bool {
        self.max_length > 0 && value.chars().count() > self.max_length
    }

    /// Whether the normalized form of `value` is in the allowed set.
    ///
    /// Always true when the field has no closed set.
    pub fn allows(&self, value: &str) -> bool {
        if self.allowed_values.is_empty() {
            return true;
        }
        let normalized = value.trim().to_uppercase();
        self.allowed_values.iter().any(|v| *v == normalized)
    }
}

/// Default MCEB Publication 7 field table, in canonical export order.
pub const MCEB_FIELDS: &[FieldSpec] = &[
    // ─── Administrative ─────────────────────────────────────────────
    FieldSpec::new(5, "Security Classification", 2, 1).values(&["U", "UE", "C", "S"]),
    FieldSpec::new(10, "Type of Action", 1, 1).values(&["A", "D", "E", "F", "M", "N", "R"]),
    FieldSpec::new(13, "Declassification Instruction Comment", 35, 1),
    FieldSpec::new(19, "Declassification Date", 8, 1),
    FieldSpec::new(102, "Agency Serial Number", 10, 1)
        .pattern(r"^[A-Z0-9\s]+$", &["AF 192345", "N 773101"]),
    FieldSpec::new(701, "Frequency Action Officer", 3, 1),
    FieldSpec::new(702, "Control/Request Number", 15, 1),
    // ─── Emission Characteristics ───────────────────────────────────
    FieldSpec::new(110, "Frequency(ies)", 11, 1),
    FieldSpec::new(113, "Station Class", 4, 20),
    FieldSpec::new(114, "Emission Designator", 11, 20).pattern(
        r"^([0-9]{1,4}[KMGHZ]?[0-9]{0,2})?[NAHGRJFCPKLQVMWX][0-9X][NABCDEFWX]([ABCDEFGHJKLMNWX]([NCFTWX])?)?$",
        &["A3E", "F3E", "16K0F3E", "2K70J3E"],
    ),
    FieldSpec::new(115, "Transmitter Power", 9, 20),
    FieldSpec::new(116, "Power Type", 1, 20).values(&["C", "M", "P"]),
    FieldSpec::new(117, "Effective Radiated Power", 6, 20),
    FieldSpec::new(118, "Power/ERP Augmentation", 1, 20),
    // ─── Time / Date ────────────────────────────────────────────────
    FieldSpec::new(130, "Time", 4, 1).pattern(
        r"^([1-4]H(24|X|N|J|T)|[1-4]|[0-9]{3,4})$",
        &["3H24", "1", "0800"],
    ),
    FieldSpec::new(131, "Percent Time", 2, 1),
    FieldSpec::new(140, "Required Date (YYYYMMDD)", 8, 1),
    FieldSpec::new(141, "Expiration Date (YYYYMMDD)", 8, 1),
    FieldSpec::new(142, "Review Date (YYYYMMDD)", 8, 1),
    FieldSpec::new(143, "Revision Date (YYYYMMDD)", 8, 1),
    FieldSpec::new(144, "Approval Authority", 1, 1).values(&["Y", "N", "U"]),
    // ─── Organizational ─────────────────────────────────────────────
    FieldSpec::new(200, "Agency", 6, 1).values(&["USAF", "USA", "USN", "USMC", "USCG"]),
    FieldSpec::new(201, "Unified Command", 8, 10),
    FieldSpec::new(202, "Unified Command Service", 8, 10),
    FieldSpec::new(204, "Command", 18, 1),
    FieldSpec::new(205, "Subcommand", 18, 1),
    FieldSpec::new(206, "Installation Frequency Manager", 18, 1),
    FieldSpec::new(207, "Operating Unit", 18, 10),
    FieldSpec::new(209, "Area AFC/DoD AFC", 18, 10),
    // ─── Transmitter Location ───────────────────────────────────────
    FieldSpec::new(300, "State/Country", 4, 1),
    FieldSpec::new(301, "Antenna Location", 24, 1)
        .pattern(r"^[A-Z0-9\s\-\.]+$", &["FORT HOOD", "EGLIN AFB"]),
    FieldSpec::new(303, "Antenna Coordinates", 15, 1),
    FieldSpec::new(306, "Authorized Radius", 5, 1)
        .pattern(r"^[0-9]+(\.[0-9]+)?[BT]?$", &["30", "50B", "12.5T"]),
    // ─── Transmitter Equipment ──────────────────────────────────────
    FieldSpec::new(340, "Equipment Nomenclature", 18, 10),
    FieldSpec::new(343, "Equipment Certification ID", 15, 10),
    FieldSpec::new(357, "Antenna Gain", 4, 10)
        .pattern(r"^-?[0-9]{1,3}(\.[0-9])?$", &["0", "12.5", "-3"]),
    FieldSpec::new(362, "Antenna Orientation", 3, 10),
    FieldSpec::new(363, "Antenna Polarization", 1, 10).values(&["V", "H", "C"]),
    FieldSpec::new(373, "JSC Area Code", 1, 1),
    // ─── Receiver Location ──────────────────────────────────────────
    FieldSpec::new(400, "State/Country", 4, 1),
    FieldSpec::new(401, "Antenna Location", 24, 1)
        .pattern(r"^[A-Z0-9\s\-\.]+$", &["FORT HOOD", "EGLIN AFB"]),
    FieldSpec::new(403, "Antenna Coordinates", 15, 1),
    // ─── Receiver Equipment ─────────────────────────────────────────
    FieldSpec::new(440, "Equipment Nomenclature", 18, 10),
    FieldSpec::new(443, "Equipment Certification ID", 15, 10),
    FieldSpec::new(457, "Antenna Gain", 4, 10)
        .pattern(r"^-?[0-9]{1,3}(\.[0-9])?$", &["0", "12.5", "-3"]),
    FieldSpec::new(462, "Antenna Orientation", 3, 10),
    FieldSpec::new(463, "Antenna Polarization", 1, 10).values(&["V", "H", "C"]),
    FieldSpec::new(473, "JSC Area Code", 1, 1).values(&["A", "B", "C", "D"]),
    // ─── Supplementary ──────────────────────────────────────────────
    FieldSpec::new(500, "IRAC Notes", 4, 10),
    FieldSpec::new(501, "Notes/Comments", 35, 30),
    FieldSpec::new(502, "Description of Requirement", 1440, 1),
    FieldSpec::new(503, "Agency Free-text Comments", 35, 30),
    FieldSpec::new(511, "Major Function Identifier", 30, 1),
    FieldSpec::new(512, "Intermediate Function Identifier", 30, 1),
    FieldSpec::new(513, "Minor Function Identifier", 30, 1),
    FieldSpec::new(520, "Supplementary Details", 1080, 1),
    // ─── Coordination ───────────────────────────────────────────────
    FieldSpec::new(716, "Usage Code", 1, 1),
    FieldSpec::new(801, "Coordination Data/Remarks", 60, 20),
    FieldSpec::new(803, "Requestor Data POC", 60, 1),
    FieldSpec::new(804, "Tuning Range/Tuning Increments", 60, 30),
];

/// An owned, read-only-after-build field table with constant-time lookup.
#[derive(Debug, Clone)]
pub struct FieldSpecTable {
    specs: Vec<FieldSpec>,
    index: BTreeMap<FieldNumber, usize>,
}

impl FieldSpecTable {
    /// The default MCEB Publication 7 table.
    pub fn mceb() -> Self {
        Self::from_specs(MCEB_FIELDS.to_vec())
    }

    /// Build a table from specs in canonical order. Later duplicates of a
    /// field number are ignored.
    pub fn from_specs(specs: Vec<FieldSpec>) -> Self {
        let mut index = BTreeMap::new();
        let mut kept = Vec::with_capacity(specs.len());
        for spec in specs {
            if index.contains_key(&spec.number) {
                continue;
            }
            index.insert(spec.number, kept.len());
            kept.push(spec);
        }
        Self { specs: kept, index }
    }

    /// Mark a field required. Unknown fields are ignored and reported as
    /// `false`.
    pub fn require(&mut self, field: FieldNumber) -> bool {
        match self.index.get(&field) {
            Some(&i) => {
                self.specs[i].required = true;
                true
            }
            None => false,
        }
    }

    /// Look up the constraints for `field`.
    pub fn lookup(&self, field: FieldNumber) -> Option<&FieldSpec> {
        self.index.get(&field).map(|&i| &self.specs[i])
    }

    /// Position of `field` in canonical export order.
    pub fn canonical_position(&self, field: FieldNumber) -> Option<usize> {
        self.index.get(&field).copied()
    }

    /// Specs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = &FieldSpec> {
        self.specs.iter()
    }

    /// Fields marked required.
    pub fn required_fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.specs.iter().filter(|s| s.required)
    }

    /// Number of fields in the table.
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

impl Default for FieldSpecTable {
    fn default() -> Self {
        Self::mceb()
    }
}
