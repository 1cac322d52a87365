//! Typed metainf values.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::schema::MetaInfSchema;

/// A single typed metainf value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum MetaValue {
    /// Field has no value (null default).
    Null,
    /// Integer value.
    Int(i64),
    /// Text value.
    Text(String),
    /// Date value; plain dates are stored at midnight.
    Date(NaiveDateTime),
    /// Boolean value.
    Bool(bool),
}

impl MetaValue {
    /// Whether the value is [`MetaValue::Null`].
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Rank used to order values of different kinds against each other.
    fn kind_rank(&self) -> u8 {
        match self {
            Self::Null => 0,
            Self::Int(_) => 1,
            Self::Date(_) => 2,
            Self::Bool(_) => 3,
            Self::Text(_) => 4,
        }
    }

    /// Total order used for listings.
    ///
    /// Text compares case-insensitively. Values of different kinds are
    /// ordered by kind so that mixed listings stay deterministic.
    #[must_use]
    pub fn sort_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a.cmp(b),
            (Self::Date(a), Self::Date(b)) => a.cmp(b),
            (Self::Bool(a), Self::Bool(b)) => a.cmp(b),
            (Self::Text(a), Self::Text(b)) => a.to_lowercase().cmp(&b.to_lowercase()),
            _ => self.kind_rank().cmp(&other.kind_rank()),
        }
    }
}

impl std::fmt::Display for MetaValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Int(v) => write!(f, "{v}"),
            Self::Text(v) => f.write_str(v),
            Self::Date(v) => write!(f, "{}", v.format("%Y-%m-%d %H:%M:%S")),
            Self::Bool(v) => write!(f, "{v}"),
        }
    }
}

/// Result of parsing a metainf block.
///
/// Every field of the schema used for parsing is present, either with the
/// parsed value or with its declared default. Unknown fields accepted by a
/// schema with custom fields enabled live in a separate text-only map.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ParsedMetaInf {
    #[serde(flatten)]
    values: BTreeMap<&'static str, MetaValue>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    custom_fields: BTreeMap<String, String>,
}

impl ParsedMetaInf {
    /// Metainf with every field of `schema` set to its default.
    #[must_use]
    pub fn defaults(schema: &MetaInfSchema) -> Self {
        let values = schema
            .fields()
            .iter()
            .map(|spec| (spec.name, spec.default.to_value()))
            .collect();
        Self {
            values,
            custom_fields: BTreeMap::new(),
        }
    }

    pub(crate) fn set(&mut self, name: &'static str, value: MetaValue) {
        self.values.insert(name, value);
    }

    pub(crate) fn set_custom(&mut self, name: String, value: String) {
        self.custom_fields.insert(name, value);
    }

    /// Copy `source` into `field` when `field` is null.
    ///
    /// Does nothing when either field is missing from the schema.
    pub fn fill_null_from(&mut self, field: &str, source: &str) {
        let Some(value) = self.values.get(source).filter(|v| !v.is_null()).cloned() else {
            return;
        };
        if let Some(slot) = self.values.get_mut(field).filter(|v| v.is_null()) {
            *slot = value;
        }
    }

    /// Value of a schema field. `None` when the schema has no such field.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&MetaValue> {
        self.values.get(name)
    }

    /// Text value of a field, `None` when absent, null or not text.
    #[must_use]
    pub fn text(&self, name: &str) -> Option<&str> {
        match self.values.get(name) {
            Some(MetaValue::Text(v)) => Some(v),
            _ => None,
        }
    }

    /// Integer value of a field.
    #[must_use]
    pub fn int(&self, name: &str) -> Option<i64> {
        match self.values.get(name) {
            Some(MetaValue::Int(v)) => Some(*v),
            _ => None,
        }
    }

    /// Date value of a field.
    #[must_use]
    pub fn date(&self, name: &str) -> Option<NaiveDateTime> {
        match self.values.get(name) {
            Some(MetaValue::Date(v)) => Some(*v),
            _ => None,
        }
    }

    /// Boolean value of a field.
    #[must_use]
    pub fn bool(&self, name: &str) -> Option<bool> {
        match self.values.get(name) {
            Some(MetaValue::Bool(v)) => Some(*v),
            _ => None,
        }
    }

    /// The `order` field, `0` when the schema does not define it.
    #[must_use]
    pub fn order(&self) -> i64 {
        self.int("order").unwrap_or(0)
    }

    /// Schema field values in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &MetaValue)> + '_ {
        self.values.iter().map(|(k, v)| (*k, v))
    }

    /// Accepted fields that are not part of the schema.
    #[must_use]
    pub fn custom_fields(&self) -> &BTreeMap<String, String> {
        &self.custom_fields
    }

    /// Value of an accepted custom field.
    #[must_use]
    pub fn custom(&self, name: &str) -> Option<&str> {
        self.custom_fields.get(name).map(String::as_str)
    }
}
