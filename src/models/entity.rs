//! Entity schema model
//!
//! One JSON Schema document per data-model concept (organization, service,
//! location, ...). The raw JSON object is kept as authored so that property
//! order survives every conversion; the accessors below expose the parts
//! the conversions care about.

use super::document::{DocumentSet, OPENAPI_FILE, is_empty_document};
use super::relationship::RelationKind;
use crate::error::{SchemaError, SchemaResult};
use once_cell::sync::Lazy;
use serde_json::{Map, Value};
use std::collections::HashSet;

static EMPTY_MAP: Lazy<Map<String, Value>> = Lazy::new(Map::new);

/// File name for an entity (`service` -> `service.json`)
pub fn entity_file_name(name: &str) -> String {
    format!("{}.json", name)
}

/// Entity name for a `$ref` value (`service.json` -> `service`)
pub fn entity_name_from_ref(reference: &str) -> &str {
    reference.strip_suffix(".json").unwrap_or(reference)
}

/// Classify a property as a relation.
///
/// `{"$ref": "x.json"}` embeds one `x` (OBJECT); `{"items": {"$ref": "x.json"}}`
/// embeds many (ARRAY). Anything else is a scalar field.
pub fn property_reference(property: &Value) -> Option<(RelationKind, &str)> {
    if let Some(reference) = property.get("$ref").and_then(Value::as_str) {
        return Some((RelationKind::Object, reference));
    }
    property
        .get("items")
        .and_then(|items| items.get("$ref"))
        .and_then(Value::as_str)
        .map(|reference| (RelationKind::Array, reference))
}

/// A parsed entity schema document
#[derive(Debug, Clone, PartialEq)]
pub struct EntitySchema {
    name: String,
    order: i64,
    document: Map<String, Value>,
}

impl EntitySchema {
    /// Parse an entity document.
    ///
    /// `file_name` is only used for error messages.
    pub fn from_value(file_name: &str, value: Value) -> SchemaResult<Self> {
        let Value::Object(document) = value else {
            return Err(SchemaError::shape(file_name, "document is not a JSON object"));
        };

        let name = document
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| SchemaError::shape(file_name, "missing 'name'"))?
            .to_string();

        if !document.get("properties").is_some_and(Value::is_object) {
            return Err(SchemaError::shape(file_name, "missing 'properties'"));
        }

        let metadata = document
            .get("datapackage_metadata")
            .and_then(Value::as_object)
            .ok_or_else(|| SchemaError::shape(file_name, "missing 'datapackage_metadata'"))?;
        let order = metadata
            .get("order")
            .and_then(Value::as_i64)
            .ok_or_else(|| SchemaError::shape(file_name, "missing 'datapackage_metadata.order'"))?;

        Ok(Self {
            name,
            order,
            document,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn order(&self) -> i64 {
        self.order
    }

    pub fn file_name(&self) -> String {
        entity_file_name(&self.name)
    }

    pub fn document(&self) -> &Map<String, Value> {
        &self.document
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.document.clone())
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.document)
    }

    pub fn properties(&self) -> &Map<String, Value> {
        self.document
            .get("properties")
            .and_then(Value::as_object)
            .unwrap_or(&EMPTY_MAP)
    }

    pub fn properties_mut(&mut self) -> &mut Map<String, Value> {
        let slot = self
            .document
            .entry("properties")
            .or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            *slot = Value::Object(Map::new());
        }
        slot.as_object_mut()
            .expect("properties slot was just made an object")
    }

    /// Names listed in `required`
    pub fn required(&self) -> Vec<&str> {
        string_list(self.document.get("required"))
    }

    /// Names listed in `tabular_required`
    pub fn tabular_required(&self) -> Vec<&str> {
        string_list(self.document.get("tabular_required"))
    }

    pub fn datapackage_metadata(&self) -> Option<&Map<String, Value>> {
        self.document
            .get("datapackage_metadata")
            .and_then(Value::as_object)
    }

    /// Relation properties as `(property name, kind, target entity)`
    pub fn relations(&self) -> Vec<(&str, RelationKind, &str)> {
        self.properties()
            .iter()
            .filter_map(|(key, property)| {
                property_reference(property)
                    .map(|(kind, reference)| (key.as_str(), kind, entity_name_from_ref(reference)))
            })
            .collect()
    }
}

fn string_list(value: Option<&Value>) -> Vec<&str> {
    value
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default()
}

/// The full entity collection of one command invocation.
///
/// Entities are kept sorted by `datapackage_metadata.order` (ties broken by
/// file name); the `openapi.json` document, which has a different shape, is
/// kept aside.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntitySet {
    entities: Vec<EntitySchema>,
    openapi: Option<Value>,
}

impl EntitySet {
    /// Parse every entity document of a document set
    pub fn from_documents(documents: &DocumentSet) -> SchemaResult<Self> {
        let mut entities = Vec::new();
        let mut openapi = None;
        for (file_name, document) in documents.iter() {
            if file_name == OPENAPI_FILE {
                openapi = Some(document.clone());
                continue;
            }
            if is_empty_document(document) {
                tracing::warn!("Skipping removal marker {}", file_name);
                continue;
            }
            entities.push(EntitySchema::from_value(file_name, document.clone())?);
        }
        let mut set = Self::from_entities(entities)?;
        set.openapi = openapi;
        Ok(set)
    }

    pub fn from_entities(mut entities: Vec<EntitySchema>) -> SchemaResult<Self> {
        let mut seen = HashSet::new();
        for entity in &entities {
            if !seen.insert(entity.name.clone()) {
                return Err(SchemaError::shape(
                    entity.file_name(),
                    format!("duplicate entity name '{}'", entity.name),
                ));
            }
        }
        entities.sort_by(|a, b| a.name.cmp(&b.name));
        entities.sort_by_key(|entity| entity.order);
        Ok(Self {
            entities,
            openapi: None,
        })
    }

    pub fn with_openapi(mut self, openapi: Option<Value>) -> Self {
        self.openapi = openapi;
        self
    }

    pub fn openapi(&self) -> Option<&Value> {
        self.openapi.as_ref()
    }

    pub fn get(&self, name: &str) -> Option<&EntitySchema> {
        self.entities.iter().find(|entity| entity.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut EntitySchema> {
        self.entities.iter_mut().find(|entity| entity.name == name)
    }

    /// Look up an entity that must exist
    pub fn require(&self, name: &str) -> SchemaResult<&EntitySchema> {
        self.get(name)
            .ok_or_else(|| SchemaError::MissingFile(entity_file_name(name)))
    }

    pub fn require_mut(&mut self, name: &str) -> SchemaResult<&mut EntitySchema> {
        self.get_mut(name)
            .ok_or_else(|| SchemaError::MissingFile(entity_file_name(name)))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Entities in ascending order
    pub fn iter(&self) -> impl Iterator<Item = &EntitySchema> {
        self.entities.iter()
    }

    pub fn names(&self) -> Vec<String> {
        self.entities.iter().map(|entity| entity.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Back to file-name keyed documents, including `openapi.json`
    pub fn to_documents(&self) -> DocumentSet {
        let mut documents: DocumentSet = self
            .entities
            .iter()
            .map(|entity| (entity.file_name(), entity.to_value()))
            .collect();
        if let Some(openapi) = &self.openapi {
            documents.insert(OPENAPI_FILE, openapi.clone());
        }
        documents
    }
}
