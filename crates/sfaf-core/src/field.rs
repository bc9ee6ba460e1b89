//! # Field Identifiers
//!
//! Newtypes for SFAF field identifiers. A field is addressed by a three-digit
//! number (`110`); at the record boundary the same field is keyed as
//! `field110`, and dynamically added UI entries carry an occurrence suffix
//! (`field113_2`).
//!
//! ## Invariant
//!
//! A `FieldNumber` is always in `000..=999`. Construction from text is strict:
//! anything other than `field` followed by exactly three ASCII digits is
//! rejected with [`SfafError::InvalidFieldId`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SfafError;

/// A three-digit SFAF field number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FieldNumber(u16);

impl FieldNumber {
    /// Largest representable field number.
    pub const MAX: u16 = 999;

    /// Create a field number, rejecting values above 999.
    pub fn new(number: u16) -> Result<Self, SfafError> {
        if number > Self::MAX {
            return Err(SfafError::FieldNumberOutOfRange(u32::from(number)));
        }
        Ok(Self(number))
    }

    /// Compile-time constructor for the static field table.
    pub(crate) const fn known(number: u16) -> Self {
        Self(number)
    }

    /// Parse a record key of the form `fieldNNN`.
    pub fn from_field_id(id: &str) -> Result<Self, SfafError> {
        let digits = id
            .strip_prefix("field")
            .ok_or_else(|| SfafError::InvalidFieldId(id.to_string()))?;
        Self::from_digits(digits).ok_or_else(|| SfafError::InvalidFieldId(id.to_string()))
    }

    /// Parse exactly three ASCII digits (`"005"`, `"110"`).
    pub fn from_digits(digits: &str) -> Option<Self> {
        if digits.len() != 3 || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse::<u16>().ok().map(Self)
    }

    /// The numeric value.
    pub fn get(self) -> u16 {
        self.0
    }

    /// The record key, e.g. `field110`.
    pub fn id(self) -> String {
        format!("field{:03}", self.0)
    }
}

impl fmt::Display for FieldNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03}", self.0)
    }
}

impl FromStr for FieldNumber {
    type Err = SfafError;

    /// Accepts `field110` or the bare `110`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.starts_with("field") {
            Self::from_field_id(s)
        } else {
            Self::from_digits(s).ok_or_else(|| SfafError::InvalidFieldId(s.to_string()))
        }
    }
}

impl TryFrom<String> for FieldNumber {
    type Error = SfafError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FieldNumber> for String {
    fn from(value: FieldNumber) -> Self {
        value.id()
    }
}

/// A record key as produced by the form collector: a field number plus the
/// optional occurrence suffix of a dynamically added entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FieldKey {
    /// The addressed field.
    pub field: FieldNumber,
    /// `Some(n)` for `fieldNNN_n`; `None` for the base entry.
    pub occurrence: Option<u16>,
}

impl FieldKey {
    /// Occurrence index used for ordering; the base entry sorts first.
    pub fn ordinal(&self) -> u16 {
        self.occurrence.unwrap_or(0)
    }
}

impl FromStr for FieldKey {
    type Err = SfafError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('_') {
            None => Ok(Self {
                field: FieldNumber::from_field_id(s)?,
                occurrence: None,
            }),
            Some((base, suffix)) => {
                let field = FieldNumber::from_field_id(base)?;
                let occurrence = suffix
                    .parse::<u16>()
                    .ok()
                    .filter(|n| *n >= 1 && suffix.bytes().all(|b| b.is_ascii_digit()))
                    .ok_or_else(|| SfafError::InvalidFieldId(s.to_string()))?;
                Ok(Self {
                    field,
                    occurrence: Some(occurrence),
                })
            }
        }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.occurrence {
            Some(n) => write!(f, "{}_{n}", self.field.id()),
            None => f.write_str(&self.field.id()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_field_id_accepts_three_digits() {
        let f = FieldNumber::from_field_id("field005").unwrap();
        assert_eq!(f.get(), 5);
        assert_eq!(f.to_string(), "005");
        assert_eq!(f.id(), "field005");
    }

    #[test]
    fn test_from_field_id_rejects_malformed() {
        for bad in ["field5", "field1100", "fld110", "110", "field11a", "field", ""] {
            assert!(
                matches!(FieldNumber::from_field_id(bad), Err(SfafError::InvalidFieldId(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_new_rejects_out_of_range() {
        assert!(FieldNumber::new(999).is_ok());
        assert!(matches!(
            FieldNumber::new(1000),
            Err(SfafError::FieldNumberOutOfRange(1000))
        ));
    }

    #[test]
    fn test_from_str_accepts_bare_digits() {
        let f: FieldNumber = "303".parse().unwrap();
        assert_eq!(f.id(), "field303");
        let g: FieldNumber = "field303".parse().unwrap();
        assert_eq!(f, g);
    }

    #[test]
    fn test_serde_uses_record_key() {
        let f = FieldNumber::from_field_id("field110").unwrap();
        assert_eq!(serde_json::to_string(&f).unwrap(), "\"field110\"");
        let back: FieldNumber = serde_json::from_str("\"field110\"").unwrap();
        assert_eq!(back, f);
        assert!(serde_json::from_str::<FieldNumber>("\"frequency\"").is_err());
    }

    #[test]
    fn test_field_key_suffix() {
        let key: FieldKey = "field113_2".parse().unwrap();
        assert_eq!(key.field.get(), 113);
        assert_eq!(key.occurrence, Some(2));
        assert_eq!(key.to_string(), "field113_2");

        let base: FieldKey = "field113".parse().unwrap();
        assert_eq!(base.occurrence, None);
        assert!(base.ordinal() < key.ordinal());
    }

    #[test]
    fn test_field_key_rejects_bad_suffix() {
        assert!("field113_".parse::<FieldKey>().is_err());
        assert!("field113_0".parse::<FieldKey>().is_err());
        assert!("field113_x".parse::<FieldKey>().is_err());
        assert!("field113_+2".parse::<FieldKey>().is_err());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Every in-range number survives the `fieldNNN` key form.
        #[test]
        fn field_id_roundtrip(n in 0u16..=999) {
            let field = FieldNumber::new(n).unwrap();
            let parsed = FieldNumber::from_field_id(&field.id()).unwrap();
            prop_assert_eq!(parsed, field);
        }

        /// Suffixed keys keep both parts.
        #[test]
        fn field_key_roundtrip(n in 0u16..=999, occ in 1u16..=99) {
            let key = FieldKey { field: FieldNumber::new(n).unwrap(), occurrence: Some(occ) };
            let parsed: FieldKey = key.to_string().parse().unwrap();
            prop_assert_eq!(parsed, key);
        }
    }
}
