//! Data package from its flat metadata CSV tables

use crate::error::{SchemaError, SchemaResult};
use crate::export::NESTING_SEPARATOR;
use crate::models::{
    DataPackage, ForeignKey, MetadataTables, PackageMetadata, Resource, TableField, TableSchema,
};
use serde_json::{Map, Number, Value};
use std::collections::HashMap;
use tracing::info;

/// Key segments whose `true` / `false` cells are booleans
const BOOLEAN_KEYS: [&str; 3] = ["required", "unique", "tabular_required"];

/// Key segments whose cells are numbers
const NUMERIC_KEYS: [&str; 4] = ["minimum", "maximum", "minLength", "maxLength"];

type Row = Vec<(String, String)>;

fn read_rows(file_name: &str, content: &str) -> SchemaResult<Vec<Row>> {
    let mut reader = ::csv::Reader::from_reader(content.as_bytes());
    let headers = reader.headers()?.clone();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| SchemaError::shape(file_name, e.to_string()))?;
        rows.push(
            headers
                .iter()
                .zip(record.iter())
                .map(|(column, cell)| (column.to_string(), cell.to_string()))
                .collect(),
        );
    }
    Ok(rows)
}

fn parse_cell(column: &str, cell: &str) -> SchemaResult<Value> {
    let last = column.rsplit(NESTING_SEPARATOR).next().unwrap_or(column);

    if BOOLEAN_KEYS.contains(&last) && (cell == "true" || cell == "false") {
        return Ok(Value::Bool(cell == "true"));
    }
    if cell.starts_with('[') || cell.starts_with('{') {
        return serde_json::from_str(cell)
            .map_err(|e| SchemaError::shape(column, format!("invalid JSON cell: {}", e)));
    }
    if NUMERIC_KEYS.contains(&last)
        && let Ok(number) = serde_json::from_str::<Number>(cell)
    {
        return Ok(Value::Number(number));
    }
    Ok(Value::String(cell.to_string()))
}

fn insert_path(
    target: &mut Map<String, Value>,
    column: &str,
    segments: &[&str],
    value: Value,
) -> SchemaResult<()> {
    match segments {
        [] => Ok(()),
        [last] => {
            target.insert(last.to_string(), value);
            Ok(())
        }
        [first, rest @ ..] => {
            let nested = target
                .entry(first.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            match nested {
                Value::Object(nested) => insert_path(nested, column, rest, value),
                _ => Err(SchemaError::shape(
                    column,
                    format!("'{}' is both a value and a parent column", first),
                )),
            }
        }
    }
}

/// Rebuild a nested object from flattened `(column, cell)` pairs.
///
/// Empty cells are skipped; JSON-encoded cells are decoded.
pub fn unflatten(row: &[(String, String)]) -> SchemaResult<Map<String, Value>> {
    let mut object = Map::new();
    for (column, cell) in row {
        if cell.is_empty() {
            continue;
        }
        let segments: Vec<&str> = column.split(NESTING_SEPARATOR).collect();
        insert_path(&mut object, column, &segments, parse_cell(column, cell)?)?;
    }
    Ok(object)
}

fn take_string(row: &mut Map<String, Value>, key: &str) -> Option<String> {
    match row.shift_remove(key) {
        Some(Value::String(text)) => Some(text),
        _ => None,
    }
}

/// Group rows of a per-table CSV by their `table_name` column
fn rows_by_table(
    file_name: &str,
    content: &str,
) -> SchemaResult<Vec<(String, Map<String, Value>)>> {
    read_rows(file_name, content)?
        .iter()
        .map(|row| {
            let mut object = unflatten(row)?;
            let table = take_string(&mut object, "table_name")
                .ok_or_else(|| SchemaError::shape(file_name, "row without 'table_name'"))?;
            Ok((table, object))
        })
        .collect()
}

/// Rebuild a data package from its four metadata tables
pub fn csv_to_datapackage(tables: &MetadataTables) -> SchemaResult<DataPackage> {
    let package_row = read_rows(MetadataTables::PACKAGE_FILE, &tables.package)?
        .into_iter()
        .next()
        .ok_or_else(|| SchemaError::shape(MetadataTables::PACKAGE_FILE, "no rows"))?;
    let metadata: PackageMetadata = serde_json::from_value(Value::Object(unflatten(&package_row)?))
        .map_err(|e| SchemaError::shape(MetadataTables::PACKAGE_FILE, e.to_string()))?;

    let mut fields: HashMap<String, Vec<TableField>> = HashMap::new();
    for (table, object) in rows_by_table(MetadataTables::FIELDS_FILE, &tables.fields)? {
        fields.entry(table).or_default().push(TableField::new(object));
    }

    let mut foreign_keys: HashMap<String, Vec<ForeignKey>> = HashMap::new();
    for (table, object) in rows_by_table(MetadataTables::FOREIGN_KEYS_FILE, &tables.foreign_keys)? {
        let foreign_key: ForeignKey = serde_json::from_value(Value::Object(object))
            .map_err(|e| SchemaError::shape(MetadataTables::FOREIGN_KEYS_FILE, e.to_string()))?;
        foreign_keys.entry(table).or_default().push(foreign_key);
    }

    let mut resources = Vec::new();
    for row in read_rows(MetadataTables::TABLES_FILE, &tables.tables)? {
        let mut object = unflatten(&row)?;
        let name = take_string(&mut object, "name")
            .ok_or_else(|| SchemaError::shape(MetadataTables::TABLES_FILE, "row without 'name'"))?;
        let mut schema = TableSchema::new(
            fields.remove(&name).unwrap_or_default(),
            foreign_keys.remove(&name).unwrap_or_default(),
        );
        if let Some(primary_key) = take_string(&mut object, "primaryKey") {
            schema.primary_key = primary_key;
        }
        resources.push(Resource {
            name,
            metadata: object,
            schema,
        });
    }

    let mut orphans: Vec<&String> = fields.keys().chain(foreign_keys.keys()).collect();
    orphans.sort();
    if let Some(table) = orphans.first() {
        return Err(SchemaError::Reference {
            from: MetadataTables::TABLES_FILE.to_string(),
            target: table.to_string(),
        });
    }

    info!("Read {} tables from CSV metadata", resources.len());
    Ok(DataPackage::new(metadata, resources))
}
