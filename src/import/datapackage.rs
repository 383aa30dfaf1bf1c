//! `datapackage.json` reader

use crate::error::{SchemaError, SchemaResult};
use crate::models::DataPackage;
use serde_json::Value;

const DESCRIPTOR: &str = "datapackage.json";

/// Parse a data package descriptor
pub fn read_datapackage(content: &str) -> SchemaResult<DataPackage> {
    let value: Value = serde_json::from_str(content)?;
    if !value.get("resources").is_some_and(Value::is_array) {
        return Err(SchemaError::shape(DESCRIPTOR, "missing 'resources'"));
    }
    serde_json::from_value(value).map_err(|e| SchemaError::shape(DESCRIPTOR, e.to_string()))
}
