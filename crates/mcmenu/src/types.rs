//! Core data types for scraped menu products.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key holding the product name in every record.
pub const NAME_KEY: &str = "name";

/// Key holding the product description in every record.
pub const DESCRIPTION_KEY: &str = "description";

/// One scraped product.
///
/// Nutrient keys differ from product to product, so the record is an
/// insertion-ordered map rather than a fixed struct. `name` and
/// `description` always come first when the scraper builds a record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductRecord {
    fields: Map<String, Value>,
}

impl ProductRecord {
    /// Start a record with its name and description.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        let mut record = Self::default();
        record.insert(NAME_KEY, name);
        record.insert(DESCRIPTION_KEY, description);
        record
    }

    /// Set a string field. An existing key keeps its position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(key.into(), Value::String(value.into()));
    }

    /// The product name, if present and a string.
    pub fn name(&self) -> Option<&str> {
        self.fields.get(NAME_KEY).and_then(Value::as_str)
    }

    /// The product description, if present and a string.
    pub fn description(&self) -> Option<&str> {
        self.fields.get(DESCRIPTION_KEY).and_then(Value::as_str)
    }

    /// Raw value of any field.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Field names in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record has no fields at all.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.fields
    }
}

impl From<Map<String, Value>> for ProductRecord {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ProductRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Self::default();
        for (key, value) in iter {
            record.insert(key, value);
        }
        record
    }
}

/// All records produced by one scrape run, in completion order.
///
/// Serialized as a bare JSON array.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductSnapshot {
    records: Vec<ProductRecord>,
}

impl ProductSnapshot {
    pub fn new(records: Vec<ProductRecord>) -> Self {
        Self { records }
    }

    /// Append a record.
    pub fn push(&mut self, record: ProductRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[ProductRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<ProductRecord> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ProductRecord> {
        self.records.iter()
    }

    /// First record whose name matches exactly (case-sensitive).
    pub fn find_by_name(&self, name: &str) -> Option<&ProductRecord> {
        self.records.iter().find(|r| r.name() == Some(name))
    }
}

impl From<Vec<ProductRecord>> for ProductSnapshot {
    fn from(records: Vec<ProductRecord>) -> Self {
        Self { records }
    }
}

impl FromIterator<ProductRecord> for ProductSnapshot {
    fn from_iter<I: IntoIterator<Item = ProductRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ProductSnapshot {
    type Item = &'a ProductRecord;
    type IntoIter = std::slice::Iter<'a, ProductRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Errors that can occur while reading or writing a snapshot.
#[derive(thiserror::Error, Debug)]
pub enum SnapshotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience result type.
pub type SnapshotResult<T> = Result<T, SnapshotError>;
