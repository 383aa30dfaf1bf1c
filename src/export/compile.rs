//! Standalone compiled schemas
//!
//! Inlines every file `$ref` of an entity schema so the result can be used
//! without the rest of the directory, and derives the published variants
//! (list, package, definitions).

use crate::error::{SchemaError, SchemaResult};
use crate::models::{EntitySchema, EntitySet, entity_file_name, entity_name_from_ref};
use serde_json::{Map, Value, json};
use std::collections::HashMap;
use tracing::{debug, info};

/// Inlines `$ref`s between the documents of an entity set
#[derive(Debug, Clone)]
pub struct SchemaCompiler {
    documents: HashMap<String, Value>,
}

impl SchemaCompiler {
    pub fn new(entities: &EntitySet) -> Self {
        Self {
            documents: entities
                .iter()
                .map(|entity| (entity.file_name(), entity.to_value()))
                .collect(),
        }
    }

    /// Compile the document stored under `file_name`
    pub fn compile_file(&self, file_name: &str) -> SchemaResult<Value> {
        let document = self
            .documents
            .get(file_name)
            .ok_or_else(|| SchemaError::MissingFile(file_name.to_string()))?;
        let mut stack = vec![file_name.to_string()];
        self.resolve(document, &mut stack)
    }

    /// Compile a document that is not part of the set.
    ///
    /// The result replaces each `{"$ref": "x.json", ...}` by the compiled
    /// content of `x.json` with the sibling keys laid over it. Fragment
    /// references (`#/...`) are left alone.
    pub fn compile(&self, root: &Value) -> SchemaResult<Value> {
        self.resolve(root, &mut Vec::new())
    }

    fn resolve(&self, value: &Value, stack: &mut Vec<String>) -> SchemaResult<Value> {
        match value {
            Value::Object(map) => match map.get("$ref").and_then(Value::as_str) {
                Some(reference) if !reference.starts_with('#') => {
                    self.inline(reference, map, stack)
                }
                _ => {
                    let mut resolved = Map::new();
                    for (key, nested) in map {
                        resolved.insert(key.clone(), self.resolve(nested, stack)?);
                    }
                    Ok(Value::Object(resolved))
                }
            },
            Value::Array(items) => items
                .iter()
                .map(|item| self.resolve(item, stack))
                .collect::<SchemaResult<Vec<_>>>()
                .map(Value::Array),
            other => Ok(other.clone()),
        }
    }

    fn inline(
        &self,
        reference: &str,
        siblings: &Map<String, Value>,
        stack: &mut Vec<String>,
    ) -> SchemaResult<Value> {
        if stack.iter().any(|file| file == reference) {
            let mut path = stack.clone();
            path.push(reference.to_string());
            return Err(SchemaError::CyclicReference { path });
        }
        let target = self
            .documents
            .get(reference)
            .ok_or_else(|| SchemaError::Reference {
                from: stack.last().cloned().unwrap_or_else(|| "<root>".to_string()),
                target: entity_name_from_ref(reference).to_string(),
            })?;

        stack.push(reference.to_string());
        let mut resolved = self.resolve(target, stack)?;
        stack.pop();

        if let Value::Object(resolved) = &mut resolved {
            for (key, value) in siblings {
                if key != "$ref" {
                    resolved.insert(key.clone(), self.resolve(value, stack)?);
                }
            }
        }
        Ok(resolved)
    }
}

/// Drop every array-valued property, recursing into nested objects
pub fn remove_one_to_many(properties: &mut Map<String, Value>) {
    properties.retain(|_, value| {
        !(value.get("type").and_then(Value::as_str) == Some("array") && value.get("items").is_some())
    });
    for value in properties.values_mut() {
        if value.get("type").and_then(Value::as_str) == Some("object")
            && let Some(Value::Object(nested)) = value.get_mut("properties")
        {
            remove_one_to_many(nested);
        }
    }
}

fn remove_one_to_many_in(document: &mut Value) {
    if let Some(Value::Object(properties)) = document.get_mut("properties") {
        remove_one_to_many(properties);
    }
}

/// Remove the key at the end of `path`, if every step exists
fn remove_path(document: &mut Value, path: &[&str]) {
    let Some((last, parents)) = path.split_last() else {
        return;
    };
    let mut current = document;
    for key in parents {
        match current.get_mut(*key) {
            Some(next) => current = next,
            None => return,
        }
    }
    if let Value::Object(map) = current {
        map.shift_remove(*last);
    }
}

fn rewrite_reference(slot: Option<&mut Value>) {
    if let Some(Value::String(reference)) = slot {
        *reference = format!("#/definitions/{}", entity_name_from_ref(reference));
    }
}

fn with_local_references(entity: &EntitySchema) -> Value {
    let mut document = entity.to_value();
    if let Some(Value::Object(properties)) = document.get_mut("properties") {
        for property in properties.values_mut() {
            rewrite_reference(property.get_mut("$ref"));
            rewrite_reference(property.get_mut("items").and_then(|items| items.get_mut("$ref")));
        }
    }
    document
}

/// `root` with every entity reference pointing into a `definitions` block
/// holding all other entities in entity order
pub fn with_definitions(entities: &EntitySet, root: &str) -> SchemaResult<Value> {
    let mut compiled = with_local_references(entities.require(root)?);

    let definitions: Map<String, Value> = entities
        .iter()
        .filter(|entity| entity.name() != root)
        .map(|entity| (entity.name().to_string(), with_local_references(entity)))
        .collect();

    if let Value::Object(map) = &mut compiled {
        map.insert("definitions".to_string(), Value::Object(definitions));
    }
    Ok(compiled)
}

fn package_of(compiled: &Value) -> Value {
    json!({"type": "array", "items": compiled})
}

/// Every compiled artifact as `(file name, document)`
pub fn compile_all(entities: &EntitySet) -> SchemaResult<Vec<(String, Value)>> {
    let compiler = SchemaCompiler::new(entities);
    let mut outputs = Vec::new();

    outputs.push((
        "service_with_definitions.json".to_string(),
        with_definitions(entities, "service")?,
    ));

    let service = compiler.compile_file(&entity_file_name("service"))?;
    let mut service_list = service.clone();
    remove_one_to_many_in(&mut service_list);
    let service_package = package_of(&service);
    outputs.push(("service.json".to_string(), service));
    outputs.push(("service_list.json".to_string(), service_list));
    outputs.push(("service_package.json".to_string(), service_package));

    let mut organization = entities.require("organization")?.to_value();
    if let Some(Value::Object(properties)) = organization.get_mut("properties") {
        properties.insert(
            "services".to_string(),
            json!({"type": "array", "items": {"$ref": entity_file_name("service")}}),
        );
    }
    let organization = compiler.compile(&organization)?;
    let mut organization_list = organization.clone();
    remove_one_to_many_in(&mut organization_list);
    let organization_package = package_of(&organization);
    outputs.push(("organization.json".to_string(), organization));
    outputs.push(("organization_list.json".to_string(), organization_list));
    outputs.push(("organization_package.json".to_string(), organization_package));

    let mut service_at_location = entities.require("service_at_location")?.to_value();
    if let Some(Value::Object(properties)) = service_at_location.get_mut("properties") {
        properties.insert(
            "service".to_string(),
            json!({"name": "service", "$ref": entity_file_name("service")}),
        );
    }
    let mut service_at_location = compiler.compile(&service_at_location)?;
    remove_path(
        &mut service_at_location,
        &["properties", "service", "properties", "service_at_locations"],
    );
    let mut service_at_location_list = service_at_location.clone();
    remove_one_to_many_in(&mut service_at_location_list);
    let service_at_location_package = package_of(&service_at_location);
    outputs.push(("service_at_location.json".to_string(), service_at_location));
    outputs.push((
        "service_at_location_list.json".to_string(),
        service_at_location_list,
    ));
    outputs.push((
        "service_at_location_package.json".to_string(),
        service_at_location_package,
    ));

    for (file_name, _) in &outputs {
        debug!("Compiled {}", file_name);
    }
    info!("Compiled {} schema artifacts", outputs.len());
    Ok(outputs)
}
