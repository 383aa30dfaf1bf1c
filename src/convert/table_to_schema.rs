//! Data package to entity schemas

use crate::error::SchemaResult;
use crate::graph::{ReferenceGraph, foreign_key_edges};
use crate::mapping::{RequiredBucket, table_field_to_schema};
use crate::models::{DataPackage, EntitySchema, EntitySet, Resource, entity_file_name};
use serde_json::{Map, Value};
use tracing::{info, warn};

/// Resource keys that stay at the top level of the entity document
const TOP_LEVEL_KEYS: [&str; 2] = ["title", "description"];

/// Convert a data package descriptor back into an entity set.
///
/// Relations are rebuilt from the foreign keys by walking the reference
/// graph from `seeds`, then the synthetic side-table relations are added.
/// Each entity's `datapackage_metadata.order` is its 1-based resource
/// position.
pub fn datapackage_to_schemas(package: &DataPackage, seeds: &[String]) -> SchemaResult<EntitySet> {
    let names = package.resource_names();
    let graph = ReferenceGraph::from_foreign_keys(&foreign_key_edges(package), seeds, &names)?
        .with_side_tables(&names);

    let mut entities = Vec::with_capacity(package.resources.len());
    for (index, resource) in package.resources.iter().enumerate() {
        let document = entity_document(resource, &graph, index as i64 + 1)?;
        entities.push(EntitySchema::from_value(
            &entity_file_name(&resource.name),
            Value::Object(document),
        )?);
    }

    info!("Converted {} tabular resources to entities", entities.len());
    EntitySet::from_entities(entities)
}

fn entity_document(
    resource: &Resource,
    graph: &ReferenceGraph,
    order: i64,
) -> SchemaResult<Map<String, Value>> {
    let mut properties = Map::new();
    let mut required = Vec::new();
    let mut tabular_required = Vec::new();

    for field in &resource.schema.fields {
        let mapped = table_field_to_schema(field).map_err(|e| e.in_table(&resource.name))?;
        match mapped.bucket {
            RequiredBucket::Required => required.push(Value::String(mapped.name.clone())),
            RequiredBucket::TabularRequired => {
                tabular_required.push(Value::String(mapped.name.clone()))
            }
            RequiredBucket::Optional => {}
        }
        properties.insert(mapped.name, mapped.property);
    }

    for relation in graph.relations_for(&resource.name) {
        if properties.contains_key(&relation.property) {
            warn!(
                "{}.{} is both a field and a relation; keeping the relation",
                resource.name, relation.property
            );
        }
        properties.insert(relation.property.clone(), relation.to_property());
    }

    let mut document = Map::new();
    for key in TOP_LEVEL_KEYS {
        if let Some(value) = resource.metadata.get(key) {
            document.insert(key.to_string(), value.clone());
        }
    }
    document.insert("type".to_string(), Value::String("object".to_string()));
    document.insert("name".to_string(), Value::String(resource.name.clone()));
    document.insert("properties".to_string(), Value::Object(properties));
    document.insert("required".to_string(), Value::Array(required));
    document.insert("tabular_required".to_string(), Value::Array(tabular_required));

    let mut package_metadata: Map<String, Value> = resource
        .metadata
        .iter()
        .filter(|(key, _)| !TOP_LEVEL_KEYS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();
    package_metadata.insert("order".to_string(), Value::from(order));
    document.insert(
        "datapackage_metadata".to_string(),
        Value::Object(package_metadata),
    );

    Ok(document)
}
