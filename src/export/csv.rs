//! Flat CSV renderings of entity sets and data packages
//!
//! Nested objects are flattened into `parent.child` columns; arrays and
//! objects that cannot be spread over columns are JSON-encoded in a single
//! cell. Columns appear in first-seen order across all rows.

use crate::error::{SchemaError, SchemaResult};
use crate::models::{DataPackage, EntitySet, MetadataTables};
use serde_json::{Map, Value};
use std::collections::HashSet;
use tracing::info;

/// Separator between nested key segments in column names
pub const NESTING_SEPARATOR: char = '.';

/// One flattened row as `(column, cell)` pairs
pub(crate) type FlatRow = Vec<(String, String)>;

/// Flatten a JSON value into `(column, cell)` pairs
pub(crate) fn flatten(value: &Value) -> FlatRow {
    let mut row = Vec::new();
    flatten_into(None, value, &mut row);
    row
}

fn flatten_into(prefix: Option<&str>, value: &Value, row: &mut FlatRow) {
    match (prefix, value) {
        (_, Value::Object(map)) => {
            for (key, nested) in map {
                let column = match prefix {
                    Some(prefix) => format!("{}{}{}", prefix, NESTING_SEPARATOR, key),
                    None => key.clone(),
                };
                flatten_into(Some(&column), nested, row);
            }
        }
        (Some(column), scalar) => row.push((column.to_string(), cell(scalar))),
        (None, _) => {}
    }
}

/// Cell text: strings as-is, `null` empty, everything else as JSON
fn cell(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Write rows as CSV; columns are the union of row columns in first-seen order
pub(crate) fn rows_to_csv(rows: &[FlatRow]) -> SchemaResult<String> {
    let mut seen = HashSet::new();
    let mut columns: Vec<&str> = Vec::new();
    for row in rows {
        for (column, _) in row {
            if seen.insert(column.as_str()) {
                columns.push(column);
            }
        }
    }

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(&columns)?;
    for row in rows {
        let record: Vec<&str> = columns
            .iter()
            .map(|column| {
                row.iter()
                    .find(|(name, _)| name == column)
                    .map(|(_, value)| value.as_str())
                    .unwrap_or("")
            })
            .collect();
        writer.write_record(&record)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| SchemaError::Io(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| SchemaError::shape("csv", e.to_string()))
}

/// Every property of every entity, one row each.
///
/// Rows carry `table_name` plus `constraints.required` and
/// `constraints.tabular_required` derived from the entity's lists.
pub fn schemas_to_field_csv(entities: &EntitySet) -> SchemaResult<String> {
    let mut rows = Vec::new();
    for entity in entities.iter() {
        let required = entity.required();
        let tabular_required = entity.tabular_required();

        for (name, property) in entity.properties() {
            let mut descriptor = property.as_object().cloned().unwrap_or_default();
            descriptor.insert(
                "table_name".to_string(),
                Value::String(entity.name().to_string()),
            );

            let constraints = descriptor
                .entry("constraints")
                .or_insert_with(|| Value::Object(Map::new()));
            if !constraints.is_object() {
                *constraints = Value::Object(Map::new());
            }
            if let Value::Object(constraints) = constraints {
                constraints.insert(
                    "required".to_string(),
                    Value::Bool(required.contains(&name.as_str())),
                );
                constraints.insert(
                    "tabular_required".to_string(),
                    Value::Bool(tabular_required.contains(&name.as_str())),
                );
            }
            rows.push(flatten(&Value::Object(descriptor)));
        }
    }
    info!("Flattened {} properties", rows.len());
    rows_to_csv(&rows)
}

/// Split a data package into its four metadata tables
pub fn datapackage_to_csv(package: &DataPackage) -> SchemaResult<MetadataTables> {
    let package_row = flatten(&serde_json::to_value(&package.metadata)?);

    let mut table_rows = Vec::new();
    let mut field_rows = Vec::new();
    let mut foreign_key_rows = Vec::new();

    for resource in &package.resources {
        let table_name = ("table_name".to_string(), resource.name.clone());

        let mut table_row = vec![("name".to_string(), resource.name.clone())];
        table_row.extend(flatten(&Value::Object(resource.metadata.clone())));
        table_row.push(("primaryKey".to_string(), resource.schema.primary_key.clone()));
        table_rows.push(table_row);

        for field in &resource.schema.fields {
            let mut row = vec![table_name.clone()];
            row.extend(flatten(&Value::Object(field.descriptor().clone())));
            field_rows.push(row);
        }

        for foreign_key in &resource.schema.foreign_keys {
            let mut row = vec![table_name.clone()];
            row.extend(flatten(&serde_json::to_value(foreign_key)?));
            foreign_key_rows.push(row);
        }
    }

    info!(
        "Flattened {} tables, {} fields, {} foreign keys",
        table_rows.len(),
        field_rows.len(),
        foreign_key_rows.len()
    );
    Ok(MetadataTables {
        package: rows_to_csv(&[package_row])?,
        tables: rows_to_csv(&table_rows)?,
        fields: rows_to_csv(&field_rows)?,
        foreign_keys: rows_to_csv(&foreign_key_rows)?,
    })
}
