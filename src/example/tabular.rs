//! Flat per-table example rows

use super::generator::{coerce_integer, is_truthy};
use crate::error::{SchemaError, SchemaResult};
use crate::models::{EntitySchema, EntitySet};
use serde_json::{Map, Value};

/// Example rows for one table, written to `path`
#[derive(Debug, Clone, PartialEq)]
pub struct TabularExample {
    pub path: String,
    pub rows: Vec<Map<String, Value>>,
}

impl TabularExample {
    /// True when no row has any column
    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(Map::is_empty)
    }

    /// Render as CSV; the header is the first row's columns.
    ///
    /// A table without columns renders as an empty document.
    pub fn to_csv(&self) -> SchemaResult<String> {
        let header: Vec<&String> = self
            .rows
            .first()
            .map(|row| row.keys().collect())
            .unwrap_or_default();
        if header.is_empty() {
            return Ok(String::new());
        }
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(&header)?;
        for row in &self.rows {
            let record: Vec<String> = header
                .iter()
                .map(|column| row.get(column.as_str()).map(cell).unwrap_or_default())
                .collect();
            writer.write_record(&record)?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| SchemaError::Io(e.into_error()))?;
        String::from_utf8(bytes).map_err(|e| SchemaError::shape(&self.path, e.to_string()))
    }
}

fn cell(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// CSV file name of an entity's table
fn table_path(entity: &EntitySchema) -> String {
    entity
        .document()
        .get("path")
        .or_else(|| entity.datapackage_metadata().and_then(|metadata| metadata.get("path")))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| format!("{}.csv", entity.name()))
}

/// One single-row example per entity, in entity order.
///
/// Every property with a truthy `example` becomes a column; string examples
/// that read as integers are written as numbers regardless of the declared
/// type.
pub fn tabular_examples(entities: &EntitySet) -> Vec<TabularExample> {
    entities
        .iter()
        .map(|entity| {
            let row: Map<String, Value> = entity
                .properties()
                .iter()
                .filter_map(|(key, property)| {
                    property
                        .get("example")
                        .filter(|example| is_truthy(example))
                        .map(|example| (key.clone(), coerce_integer(example)))
                })
                .collect();
            TabularExample {
                path: table_path(entity),
                rows: vec![row],
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn set() -> EntitySet {
        let service = EntitySchema::from_value(
            "service.json",
            json!({
                "name": "service",
                "properties": {
                    "id": {"type": "string", "example": "svc-1"},
                    "name": {"type": "string", "example": "Food, Bank"},
                    "minimum_age": {"type": "integer", "example": "18"},
                    "email": {"type": "string"}
                },
                "datapackage_metadata": {"path": "services.csv", "order": 2}
            }),
        )
        .unwrap();
        let funding = EntitySchema::from_value(
            "funding.json",
            json!({
                "name": "funding",
                "properties": {"id": {"type": "string"}},
                "datapackage_metadata": {"order": 1}
            }),
        )
        .unwrap();
        EntitySet::from_entities(vec![service, funding]).unwrap()
    }

    #[test]
    fn test_rows_and_paths() {
        let examples = tabular_examples(&set());
        assert_eq!(examples.len(), 2);

        assert_eq!(examples[0].path, "funding.csv");
        assert!(examples[0].is_empty());
        assert_eq!(examples[0].to_csv().unwrap(), "");

        assert_eq!(examples[1].path, "services.csv");
        assert_eq!(examples[1].rows[0]["minimum_age"], 18);
        assert!(examples[1].rows[0].get("email").is_none());
    }

    #[test]
    fn test_csv_rendering() {
        let examples = tabular_examples(&set());
        let csv = examples[1].to_csv().unwrap();
        assert_eq!(csv, "id,name,minimum_age\nsvc-1,\"Food, Bank\",18\n");
    }
}
