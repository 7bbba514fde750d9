//! Raw entity data and dynamically typed field values.
//!
//! [`EntityData`] is what data providers hand to the seeder: a named bundle of
//! records whose values are still plain strings. [`FieldValue`] is what a
//! transformation turns one of those strings into.

use chrono::NaiveDateTime;
use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One raw record: field name to raw value, in source order.
///
/// `None` marks an absent value (e.g. a YAML `null`).
pub type Record = IndexMap<String, Option<String>>;

/// Represents the converted value of a single property
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Decimal(Decimal),
    DateTime(NaiveDateTime),
    /// Variant name of an enum value
    Enum(String),
    String(String),
}

impl FieldValue {
    /// Short name of the variant, used in assignment errors.
    pub fn kind(&self) -> &'static str {
        match self {
            FieldValue::Null => "null",
            FieldValue::Bool(_) => "bool",
            FieldValue::Int(_) => "integer",
            FieldValue::UInt(_) => "unsigned integer",
            FieldValue::Float(_) => "float",
            FieldValue::Decimal(_) => "decimal",
            FieldValue::DateTime(_) => "date/time",
            FieldValue::Enum(_) => "enum",
            FieldValue::String(_) => "string",
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => write!(f, "null"),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Int(i) => write!(f, "{}", i),
            FieldValue::UInt(u) => write!(f, "{}", u),
            FieldValue::Float(fl) => write!(f, "{}", fl),
            FieldValue::Decimal(d) => write!(f, "{}", d),
            FieldValue::DateTime(dt) => write!(f, "{}", dt),
            FieldValue::Enum(v) => write!(f, "{}", v),
            FieldValue::String(s) => write!(f, "{}", s),
        }
    }
}

/// Raw records destined for one entity type.
///
/// `entity_name` must equal the canonical name of a configured entity
/// ([`crate::Seedable::TYPE_NAME`]) for the records to be seeded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityData {
    pub entity_name: String,
    #[serde(default)]
    pub objects: Vec<Record>,
}

impl EntityData {
    pub fn new(entity_name: impl Into<String>) -> Self {
        Self {
            entity_name: entity_name.into(),
            objects: Vec::new(),
        }
    }
}

/// Column-oriented builder for [`EntityData`], handy for fixtures.
///
/// # Example
///
/// ```
/// use seedbed::EntityDataBuilder;
///
/// let data = EntityDataBuilder::new("shop::Customer", &["Id", "Name"])
///     .with_entity(&["1", "Alice"])
///     .with_entity(&["2", "Bob"])
///     .build();
///
/// assert_eq!(data.objects.len(), 2);
/// assert_eq!(data.objects[1]["Name"].as_deref(), Some("Bob"));
/// ```
#[derive(Debug, Clone)]
pub struct EntityDataBuilder {
    entity_name: String,
    fields: Vec<String>,
    objects: Vec<Record>,
}

impl EntityDataBuilder {
    pub fn new(entity_name: impl Into<String>, fields: &[&str]) -> Self {
        Self {
            entity_name: entity_name.into(),
            fields: fields.iter().map(|f| f.to_string()).collect(),
            objects: Vec::new(),
        }
    }

    /// Add one record; values are matched to fields by position.
    /// Missing trailing values are recorded as absent.
    pub fn with_entity(mut self, values: &[&str]) -> Self {
        let record = self
            .fields
            .iter()
            .enumerate()
            .map(|(i, field)| (field.clone(), values.get(i).map(|v| v.to_string())))
            .collect();
        self.objects.push(record);
        self
    }

    pub fn build(self) -> EntityData {
        EntityData {
            entity_name: self.entity_name,
            objects: self.objects,
        }
    }
}
