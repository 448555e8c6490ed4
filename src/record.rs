//! Core record types.
//!
//! A `Record` is one typed business object built from caller-supplied raw
//! data. Every record carries a `seqNum` (its 1-based position within the
//! submitted batch) in addition to the fields of its variant.

use chrono::NaiveDateTime;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// Date pattern required by the platform for every date-valued field.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Declared type of a variant field, the target of the coercion rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Int,
    Double,
    Date,
    Text,
}

/// A coerced field value. `Null` inputs are preserved as-is, never
/// converted to a type default.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Int(i64),
    Double(f64),
    Date(NaiveDateTime),
    Text(String),
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Null => serializer.serialize_unit(),
            FieldValue::Int(v) => serializer.serialize_i64(*v),
            FieldValue::Double(v) => serializer.serialize_f64(*v),
            FieldValue::Date(dt) => {
                serializer.serialize_str(&dt.format(DATE_FORMAT).to_string())
            }
            FieldValue::Text(v) => serializer.serialize_str(v),
        }
    }
}

/// One record of a batch: named field values plus the sequence number.
///
/// Serializes flat, as the platform expects: every field at the top level
/// and `"seqNum"` alongside them.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    variant: String,
    seq_num: usize,
    fields: Vec<(String, FieldValue)>,
}

impl Record {
    pub fn new(variant: &str, seq_num: usize, fields: Vec<(String, FieldValue)>) -> Self {
        Self {
            variant: variant.to_string(),
            seq_num,
            fields,
        }
    }

    pub fn variant(&self) -> &str {
        &self.variant
    }

    /// 1-based position of this record within its batch.
    pub fn seq_num(&self) -> usize {
        self.seq_num
    }

    pub fn fields(&self) -> &[(String, FieldValue)] {
        &self.fields
    }

    /// Look up a field value by name (used by tests).
    #[allow(dead_code)]
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len() + 1))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.serialize_entry("seqNum", &self.seq_num)?;
        map.end()
    }
}
