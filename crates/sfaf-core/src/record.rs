//! # Record Model
//!
//! An SFAF record maps field numbers to either a single value or an ordered
//! sequence of values (repeatable fields such as 113 Station Class).
//!
//! Records cross the boundary as JSON objects keyed `fieldNNN`:
//!
//! ```json
//! { "field005": "U", "field113": ["MO", "FB"] }
//! ```
//!
//! The form collector additionally produces `field113_2` style keys for
//! dynamically added entries; [`Record::from_form_entries`] folds those into
//! the sequence form.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::SfafError;
use crate::field::{FieldKey, FieldNumber};

/// The value of one field: a single string or an ordered sequence.
///
/// Equality compares occurrences, so `Single("X")` equals `Multiple(["X"])`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// One occurrence.
    Single(String),
    /// Ordered occurrences of a repeatable field.
    Multiple(Vec<String>),
}

impl FieldValue {
    /// Build from occurrences, collapsing a one-element sequence to `Single`.
    pub fn from_occurrences(mut values: Vec<String>) -> Self {
        if values.len() == 1 {
            Self::Single(values.remove(0))
        } else {
            Self::Multiple(values)
        }
    }

    /// All occurrences in order.
    pub fn occurrences(&self) -> &[String] {
        match self {
            Self::Single(v) => std::slice::from_ref(v),
            Self::Multiple(vs) => vs,
        }
    }

    /// Number of occurrences.
    pub fn len(&self) -> usize {
        self.occurrences().len()
    }

    /// Whether there are no occurrences.
    pub fn is_empty(&self) -> bool {
        self.occurrences().is_empty()
    }

    /// The first occurrence, if any.
    pub fn first(&self) -> Option<&str> {
        self.occurrences().first().map(String::as_str)
    }

    /// Append an occurrence, promoting `Single` to `Multiple`.
    pub fn push(&mut self, value: String) {
        match self {
            Self::Single(existing) => {
                let first = std::mem::take(existing);
                *self = Self::Multiple(vec![first, value]);
            }
            Self::Multiple(vs) => vs.push(value),
        }
    }

    /// Whether every occurrence is blank after trimming.
    pub fn is_blank(&self) -> bool {
        self.occurrences().iter().all(|v| v.trim().is_empty())
    }
}

impl PartialEq for FieldValue {
    fn eq(&self, other: &Self) -> bool {
        self.occurrences() == other.occurrences()
    }
}

impl Eq for FieldValue {}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Single(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Single(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(values: Vec<String>) -> Self {
        Self::Multiple(values)
    }
}

impl<const N: usize> From<[&str; N]> for FieldValue {
    fn from(values: [&str; N]) -> Self {
        Self::Multiple(values.iter().map(|v| v.to_string()).collect())
    }
}

/// A single SFAF frequency action, keyed by field number.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, FieldValue>", into = "BTreeMap<String, FieldValue>")]
pub struct Record {
    fields: BTreeMap<FieldNumber, FieldValue>,
}

impl Record {
    /// An empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, replacing any existing value.
    pub fn insert(&mut self, field: FieldNumber, value: impl Into<FieldValue>) -> Option<FieldValue> {
        self.fields.insert(field, value.into())
    }

    /// Append one occurrence to a field.
    pub fn push(&mut self, field: FieldNumber, value: impl Into<String>) {
        let value = value.into();
        match self.fields.get_mut(&field) {
            Some(existing) => existing.push(value),
            None => {
                self.fields.insert(field, FieldValue::Single(value));
            }
        }
    }

    /// Builder-style insert keyed by `fieldNNN`.
    pub fn with(mut self, field_id: &str, value: impl Into<FieldValue>) -> Result<Self, SfafError> {
        let field = FieldNumber::from_field_id(field_id)?;
        self.fields.insert(field, value.into());
        Ok(self)
    }

    /// Value of a field.
    pub fn get(&self, field: FieldNumber) -> Option<&FieldValue> {
        self.fields.get(&field)
    }

    /// First occurrence of a field.
    pub fn first(&self, field: FieldNumber) -> Option<&str> {
        self.get(field).and_then(FieldValue::first)
    }

    /// All occurrences of a field; empty when absent.
    pub fn occurrences(&self, field: FieldNumber) -> &[String] {
        self.get(field).map(FieldValue::occurrences).unwrap_or(&[])
    }

    /// Whether the field is present with at least one non-blank occurrence.
    pub fn has_value(&self, field: FieldNumber) -> bool {
        self.get(field).is_some_and(|v| !v.is_blank())
    }

    /// Remove a field.
    pub fn remove(&mut self, field: FieldNumber) -> Option<FieldValue> {
        self.fields.remove(&field)
    }

    /// Number of present fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether no fields are present.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fields in ascending numeric order.
    pub fn iter(&self) -> impl Iterator<Item = (FieldNumber, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (*k, v))
    }

    /// Normalize flat form-collector entries into a record.
    ///
    /// Keys may carry an occurrence suffix (`field113_2`); occurrences of the
    /// same field are ordered by suffix with the unsuffixed entry first.
    /// Blank values are dropped. Malformed keys are rejected.
    pub fn from_form_entries<I, K, V>(entries: I) -> Result<Self, SfafError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut keyed: Vec<(FieldKey, String)> = Vec::new();
        for (key, value) in entries {
            let key: FieldKey = key.as_ref().parse()?;
            let value: String = value.into();
            let value = value.trim();
            if !value.is_empty() {
                keyed.push((key, value.to_string()));
            }
        }
        keyed.sort_by_key(|(k, _)| (k.field, k.ordinal()));

        let mut record = Self::new();
        for (key, value) in keyed {
            record.push(key.field, value);
        }
        Ok(record)
    }
}

impl TryFrom<BTreeMap<String, FieldValue>> for Record {
    type Error = SfafError;

    fn try_from(map: BTreeMap<String, FieldValue>) -> Result<Self, Self::Error> {
        let mut suffixed: Vec<(FieldKey, Vec<String>)> = Vec::with_capacity(map.len());
        for (key, value) in map {
            let key: FieldKey = key.parse()?;
            suffixed.push((key, value.occurrences().to_vec()));
        }
        suffixed.sort_by_key(|(k, _)| (k.field, k.ordinal()));

        let mut fields: BTreeMap<FieldNumber, Vec<String>> = BTreeMap::new();
        for (key, values) in suffixed {
            fields.entry(key.field).or_default().extend(values);
        }
        Ok(Self {
            fields: fields
                .into_iter()
                .map(|(k, v)| (k, FieldValue::from_occurrences(v)))
                .collect(),
        })
    }
}

impl From<Record> for BTreeMap<String, FieldValue> {
    fn from(record: Record) -> Self {
        record.fields.into_iter().map(|(k, v)| (k.id(), v)).collect()
    }
}

impl FromIterator<(FieldNumber, FieldValue)> for Record {
    fn from_iter<T: IntoIterator<Item = (FieldNumber, FieldValue)>>(iter: T) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}
