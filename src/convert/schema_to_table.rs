//! Entity schemas to data package

use super::ENTITY_STRUCTURE_KEYS;
use crate::error::SchemaResult;
use crate::graph::ReferenceGraph;
use crate::mapping::schema_field_to_table;
use crate::models::{
    DataPackage, EntitySchema, EntitySet, ForeignKey, PackageMetadata, Resource, TableField,
    TableSchema, property_reference,
};
use serde_json::{Map, Value};
use std::collections::HashSet;
use tracing::{debug, info};

/// Convert an entity set into a data package descriptor.
///
/// Resources follow entity order. Relation properties produce foreign keys
/// on the holding side instead of columns; arrays of the `attribute` and
/// `metadata` side tables produce none.
pub fn schemas_to_datapackage(
    entities: &EntitySet,
    metadata: &PackageMetadata,
) -> SchemaResult<DataPackage> {
    let edges = ReferenceGraph::from_entities(entities)?.foreign_key_edges();

    let mut resources = Vec::with_capacity(entities.len());
    for entity in entities.iter() {
        let foreign_keys: Vec<ForeignKey> = edges
            .iter()
            .filter(|edge| edge.holder == entity.name())
            .map(|edge| ForeignKey::to_resource(&edge.target))
            .collect();
        debug!(
            "Resource '{}': {} foreign key(s)",
            entity.name(),
            foreign_keys.len()
        );

        resources.push(Resource {
            name: entity.name().to_string(),
            metadata: resource_metadata(entity),
            schema: TableSchema::new(table_fields(entity)?, foreign_keys),
        });
    }

    info!("Converted {} entities to tabular resources", resources.len());
    Ok(DataPackage::new(metadata.clone(), resources))
}

fn resource_metadata(entity: &EntitySchema) -> Map<String, Value> {
    let mut metadata: Map<String, Value> = entity
        .document()
        .iter()
        .filter(|(key, _)| !ENTITY_STRUCTURE_KEYS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    if let Some(package_metadata) = entity.datapackage_metadata() {
        for (key, value) in package_metadata {
            if key != "order" {
                metadata.insert(key.clone(), value.clone());
            }
        }
    }
    metadata
}

fn table_fields(entity: &EntitySchema) -> SchemaResult<Vec<TableField>> {
    let required: HashSet<&str> = entity
        .required()
        .into_iter()
        .chain(entity.tabular_required())
        .collect();

    let mut fields = Vec::new();
    for (name, property) in entity.properties() {
        if property_reference(property).is_some() {
            continue;
        }
        let field = schema_field_to_table(name, property, required.contains(name.as_str()))
            .map_err(|e| e.in_table(entity.name()))?;
        fields.push(field);
    }
    Ok(fields)
}
