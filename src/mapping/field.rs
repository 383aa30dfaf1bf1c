//! Single-field conversion between entity properties and table fields

use super::error::{MappingError, MappingResult};
use crate::models::{TableField, property_reference};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

/// Property key holding the tabular type of a temporal JSON Schema string
pub const DATAPACKAGE_TYPE: &str = "datapackage_type";

static TABULAR_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:.*_id|link_entity|resource_type)$").unwrap());

/// Which entity-level list a required field belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredBucket {
    /// Listed in `required`
    Required,
    /// Listed in `tabular_required` (keys and type discriminators)
    TabularRequired,
    Optional,
}

/// A table field converted back to a JSON Schema property
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaField {
    pub name: String,
    pub property: Value,
    pub bucket: RequiredBucket,
}

/// True for synthetic key and discriminator field names
pub fn is_tabular_key(name: &str) -> bool {
    TABULAR_KEY.is_match(name)
}

/// Bucket for a field that is marked required
pub fn required_bucket(name: &str) -> RequiredBucket {
    if is_tabular_key(name) {
        RequiredBucket::TabularRequired
    } else {
        RequiredBucket::Required
    }
}

/// JSON Schema `format` for a tabular temporal type
pub fn json_schema_format(table_type: &str) -> Option<&'static str> {
    match table_type {
        "date" => Some("date"),
        "datetime" => Some("date-time"),
        "time" => Some("time"),
        _ => None,
    }
}

fn is_temporal_format(format: &str) -> bool {
    matches!(format, "date" | "date-time" | "time")
}

/// Convert an entity property into a Table Schema field.
///
/// `required` is whether the entity lists the property in `required` or
/// `tabular_required`. Relation properties have no column and are rejected.
pub fn schema_field_to_table(
    name: &str,
    property: &Value,
    required: bool,
) -> MappingResult<TableField> {
    let Some(source) = property.as_object() else {
        return Err(invalid(name, "descriptor is not an object"));
    };
    if property_reference(property).is_some() {
        return Err(invalid(name, "relation property has no column"));
    }
    if !source.contains_key("type") {
        return Err(MappingError::MissingType {
            field: name.to_string(),
        });
    }

    let mut descriptor = with_name_first(name, source);
    let enum_values = descriptor.shift_remove("enum");
    let type_override = match descriptor.shift_remove(DATAPACKAGE_TYPE) {
        None => None,
        Some(Value::String(requested)) => Some(requested),
        Some(_) => return Err(invalid(name, "datapackage_type is not a string")),
    };

    if let Some(requested) = &type_override
        && let Some(expected) = json_schema_format(requested)
        && let Some(existing) = descriptor.get("format").and_then(Value::as_str)
        && is_temporal_format(existing)
        && existing != expected
    {
        return Err(MappingError::TypeOverrideConflict {
            field: name.to_string(),
            existing: existing.to_string(),
            requested: requested.clone(),
        });
    }

    let constraints = constraints_mut(name, &mut descriptor)?;
    constraints.insert("required".to_string(), Value::Bool(required));
    let unique = constraints
        .shift_remove("unique")
        .unwrap_or(Value::Bool(false));
    constraints.insert("unique".to_string(), unique);
    if let Some(values) = enum_values
        && values.as_array().is_some_and(|values| !values.is_empty())
    {
        constraints.insert("enum".to_string(), values);
    }

    if let Some(requested) = type_override {
        descriptor.insert("type".to_string(), Value::String(requested));
        // A Frictionless pattern such as `%Y-%m-%d` survives the override
        if descriptor
            .get("format")
            .and_then(Value::as_str)
            .is_none_or(is_temporal_format)
        {
            descriptor.shift_remove("format");
        }
    }

    Ok(TableField::new(descriptor))
}

/// Convert a Table Schema field into an entity property.
pub fn table_field_to_schema(field: &TableField) -> MappingResult<SchemaField> {
    let Some(name) = field.name().map(str::to_string) else {
        return Err(invalid("<unnamed>", "field has no name"));
    };
    let Some(table_type) = field.field_type().map(str::to_string) else {
        return Err(MappingError::MissingType { field: name });
    };

    let mut descriptor = field.descriptor().clone();
    let mut required = false;
    let mut enum_values = None;
    if descriptor.contains_key("constraints") {
        let constraints = constraints_mut(&name, &mut descriptor)?;
        required = constraints
            .shift_remove("required")
            .and_then(|value| value.as_bool())
            .unwrap_or(false);
        enum_values = constraints.shift_remove("enum");
    }
    if let Some(values) = enum_values {
        descriptor.insert("enum".to_string(), values);
    }

    if let Some(format) = json_schema_format(&table_type) {
        if let Some(existing) = descriptor.get(DATAPACKAGE_TYPE)
            && existing.as_str() != Some(table_type.as_str())
        {
            return Err(MappingError::TypeOverrideConflict {
                field: name,
                existing: existing
                    .as_str()
                    .map(str::to_string)
                    .unwrap_or_else(|| existing.to_string()),
                requested: table_type,
            });
        }
        descriptor.insert("type".to_string(), Value::String("string".to_string()));
        if !descriptor.contains_key("format") {
            descriptor.insert("format".to_string(), Value::String(format.to_string()));
        }
        descriptor.insert(DATAPACKAGE_TYPE.to_string(), Value::String(table_type));
    }

    let bucket = if required {
        required_bucket(&name)
    } else {
        RequiredBucket::Optional
    };

    Ok(SchemaField {
        name,
        property: Value::Object(descriptor),
        bucket,
    })
}

fn invalid(field: &str, detail: &str) -> MappingError {
    MappingError::InvalidField {
        field: field.to_string(),
        detail: detail.to_string(),
    }
}

fn with_name_first(name: &str, source: &Map<String, Value>) -> Map<String, Value> {
    if source.contains_key("name") {
        return source.clone();
    }
    let mut descriptor = Map::new();
    descriptor.insert("name".to_string(), Value::String(name.to_string()));
    descriptor.extend(source.clone());
    descriptor
}

fn constraints_mut<'a>(
    field: &str,
    descriptor: &'a mut Map<String, Value>,
) -> MappingResult<&'a mut Map<String, Value>> {
    descriptor
        .entry("constraints")
        .or_insert_with(|| Value::Object(Map::new()))
        .as_object_mut()
        .ok_or_else(|| invalid(field, "constraints is not an object"))
}
