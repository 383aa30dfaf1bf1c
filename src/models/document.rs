//! Raw document set
//!
//! A directory of schema documents as read from disk or fetched from the
//! upstream repository, before any of them is interpreted as an entity.

use serde_json::Value;
use std::collections::BTreeMap;

/// File name of the OpenAPI document that lives next to the entity schemas
pub const OPENAPI_FILE: &str = "openapi.json";

/// True for the removal marker: `null`, `{}`, `[]` or `""`
pub fn is_empty_document(document: &Value) -> bool {
    match document {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::String(text) => text.is_empty(),
        _ => false,
    }
}

/// Documents keyed by file name, iterated in file name order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentSet {
    documents: BTreeMap<String, Value>,
}

impl DocumentSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, file_name: impl Into<String>, document: Value) -> Option<Value> {
        self.documents.insert(file_name.into(), document)
    }

    pub fn get(&self, file_name: &str) -> Option<&Value> {
        self.documents.get(file_name)
    }

    pub fn remove(&mut self, file_name: &str) -> Option<Value> {
        self.documents.remove(file_name)
    }

    pub fn contains(&self, file_name: &str) -> bool {
        self.documents.contains_key(file_name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.documents.iter()
    }

    pub fn file_names(&self) -> impl Iterator<Item = &String> {
        self.documents.keys()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl FromIterator<(String, Value)> for DocumentSet {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            documents: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for DocumentSet {
    type Item = (String, Value);
    type IntoIter = std::collections::btree_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.documents.into_iter()
    }
}
