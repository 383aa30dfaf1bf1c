//! Nested example documents

use crate::error::{SchemaError, SchemaResult};
use crate::graph::is_side_table;
use crate::models::{
    EntitySet, RelationKind, entity_file_name, entity_name_from_ref, property_reference,
};
use serde_json::{Map, Value, json};
use tracing::debug;

/// One documentation example file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocExample {
    pub entity: &'static str,
    pub file_name: &'static str,
    /// List variant: array relations omitted, pagination envelope added
    pub simple: bool,
}

const fn doc_example(entity: &'static str, file_name: &'static str, simple: bool) -> DocExample {
    DocExample {
        entity,
        file_name,
        simple,
    }
}

/// The documentation examples, in writing order
pub const DOC_EXAMPLES: [DocExample; 10] = [
    doc_example("service", "service_full.json", false),
    doc_example("service", "service_list.json", true),
    doc_example("service_at_location", "service_at_location_full.json", false),
    doc_example("service_at_location", "service_at_location_list.json", true),
    doc_example("organization", "organization_full.json", false),
    doc_example("organization", "organization_list.json", true),
    doc_example("taxonomy", "taxonomy.json", false),
    doc_example("taxonomy", "taxonomy_list.json", true),
    doc_example("taxonomy_term", "taxonomy_term.json", false),
    doc_example("taxonomy_term", "taxonomy_term_list.json", true),
];

/// Flip one direction of a mutual reference when generating from `root`.
///
/// `service` and `organization` (and `service` and `service_at_location`)
/// reference each other; an example rooted at either side keeps only the
/// direction leading away from the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MutualReferenceOverride {
    pub root: &'static str,
    /// `(entity, property)` deleted before generation
    pub remove: (&'static str, &'static str),
    /// Property added to the root entity
    pub add_property: &'static str,
    pub add_target: &'static str,
    pub add_kind: RelationKind,
}

pub const MUTUAL_REFERENCE_OVERRIDES: [MutualReferenceOverride; 2] = [
    MutualReferenceOverride {
        root: "organization",
        remove: ("service", "organization"),
        add_property: "services",
        add_target: "service",
        add_kind: RelationKind::Array,
    },
    MutualReferenceOverride {
        root: "service_at_location",
        remove: ("service", "service_at_locations"),
        add_property: "service",
        add_target: "service",
        add_kind: RelationKind::Object,
    },
];

impl MutualReferenceOverride {
    fn added_property(&self) -> Value {
        let reference = entity_file_name(self.add_target);
        match self.add_kind {
            RelationKind::Object => json!({"$ref": reference}),
            RelationKind::Array => json!({"type": "array", "items": {"$ref": reference}}),
        }
    }
}

/// Copy of `entities` with the overrides for `root` applied
pub fn apply_overrides(entities: &EntitySet, root: &str) -> SchemaResult<EntitySet> {
    let mut entities = entities.clone();
    for rule in MUTUAL_REFERENCE_OVERRIDES.iter().filter(|rule| rule.root == root) {
        let (entity, property) = rule.remove;
        entities
            .require_mut(entity)?
            .properties_mut()
            .shift_remove(property);
        entities
            .require_mut(rule.root)?
            .properties_mut()
            .insert(rule.add_property.to_string(), rule.added_property());
        debug!(
            "Example rooted at {}: dropped {}.{}, added {}.{}",
            root, entity, property, rule.root, rule.add_property
        );
    }
    Ok(entities)
}

/// Build a nested example rooted at `root`.
///
/// Scalars take their `example` value; `*_id` keys are skipped unless they
/// name a parent. OBJECT relations are expanded in place, ARRAY relations as
/// a one-element list, except in the `simple` variant where they are left
/// out. Side-table arrays are only expanded under `service`.
pub fn generate_example(entities: &EntitySet, root: &str, simple: bool) -> SchemaResult<Value> {
    let mut path = Vec::new();
    expand(entities, root, simple, &mut path).map(Value::Object)
}

fn expand(
    entities: &EntitySet,
    name: &str,
    simple: bool,
    path: &mut Vec<String>,
) -> SchemaResult<Map<String, Value>> {
    if path.iter().any(|visited| visited == name) {
        let mut cycle = path.clone();
        cycle.push(name.to_string());
        return Err(SchemaError::CyclicReference { path: cycle });
    }
    let entity = entities.require(name)?;
    path.push(name.to_string());

    let mut results = Map::new();
    for (key, property) in entity.properties() {
        if key.ends_with("_id") && !key.contains("parent") {
            continue;
        }
        if let Some(example) = property.get("example")
            && is_truthy(example)
        {
            results.insert(key.clone(), scalar_example(property, example));
        }

        match property_reference(property) {
            Some((RelationKind::Object, reference)) => {
                let nested = expand(entities, entity_name_from_ref(reference), simple, path)?;
                results.insert(key.clone(), Value::Object(nested));
            }
            Some((RelationKind::Array, reference)) if !simple => {
                let target = entity_name_from_ref(reference);
                if !is_side_table(target) || name == "service" {
                    let nested = expand(entities, target, simple, path)?;
                    results.insert(key.clone(), Value::Array(vec![Value::Object(nested)]));
                }
            }
            _ => {}
        }
    }

    path.pop();
    Ok(results)
}

/// Falsy examples (`null`, `false`, `0`, `""`, `[]`, `{}`) are not emitted
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// String examples that read as an integer become numbers
pub(crate) fn coerce_integer(example: &Value) -> Value {
    if let Value::String(text) = example
        && let Ok(number) = text.trim().parse::<i64>()
    {
        return Value::from(number);
    }
    example.clone()
}

fn scalar_example(property: &Value, example: &Value) -> Value {
    if property.get("type").and_then(Value::as_str) == Some("string") {
        example.clone()
    } else {
        coerce_integer(example)
    }
}

/// Wrap an example in the pagination envelope of list endpoints
pub fn paginate(example: Value) -> Value {
    json!({
        "total_items": 10,
        "total_pages": 10,
        "page_number": 1,
        "size": 1,
        "first_page": true,
        "last_page": false,
        "empty": false,
        "contents": [example],
    })
}

/// Example document as published: overrides applied, and for the list
/// variant array relations dropped and the result paginated
pub fn example_document(entities: &EntitySet, root: &str, paginated: bool) -> SchemaResult<Value> {
    let entities = apply_overrides(entities, root)?;
    let example = generate_example(&entities, root, paginated)?;
    Ok(if paginated { paginate(example) } else { example })
}

/// Every entry of [`DOC_EXAMPLES`] as `(file name, document)`
pub fn doc_examples(entities: &EntitySet) -> SchemaResult<Vec<(String, Value)>> {
    DOC_EXAMPLES
        .iter()
        .map(|doc| {
            example_document(entities, doc.entity, doc.simple)
                .map(|document| (doc.file_name.to_string(), document))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EntitySchema;

    fn entity(name: &str, order: i64, properties: Value) -> EntitySchema {
        EntitySchema::from_value(
            &format!("{}.json", name),
            json!({"name": name, "properties": properties, "datapackage_metadata": {"order": order}}),
        )
        .unwrap()
    }

    fn set() -> EntitySet {
        EntitySet::from_entities(vec![
            entity(
                "organization",
                1,
                json!({
                    "id": {"type": "string", "example": "org-1"},
                    "name": {"type": "string", "example": "Food Bank Trust"},
                    "year_incorporated": {"type": "integer", "example": "1985"}
                }),
            ),
            entity(
                "service",
                2,
                json!({
                    "id": {"type": "string", "example": "svc-1"},
                    "organization_id": {"type": "string", "example": "org-1"},
                    "name": {"type": "string", "example": "Food Bank"},
                    "code": {"type": "string", "example": "42"},
                    "organization": {"$ref": "organization.json"},
                    "phones": {"type": "array", "items": {"$ref": "phone.json"}},
                    "service_at_locations": {"type": "array", "items": {"$ref": "service_at_location.json"}}
                }),
            ),
            entity(
                "phone",
                3,
                json!({
                    "number": {"type": "string", "example": "555"},
                    "extension": {"type": "integer", "example": "ext"},
                    "priority": {"type": "integer", "example": 0}
                }),
            ),
            entity(
                "service_at_location",
                4,
                json!({
                    "id": {"type": "string", "example": "sal-1"},
                    "service_id": {"type": "string"}
                }),
            ),
        ])
        .unwrap()
    }

    #[test]
    fn test_simple_and_full_examples() {
        let simple = generate_example(&set(), "service", true).unwrap();
        assert_eq!(simple["name"], "Food Bank");
        assert_eq!(simple["code"], "42");
        assert!(simple.get("organization_id").is_none());
        assert!(simple.get("phones").is_none());
        assert_eq!(simple["organization"]["year_incorporated"], 1985);

        let full = generate_example(&set(), "service", false).unwrap();
        assert_eq!(full["phones"], json!([{"number": "555", "extension": "ext"}]));
    }

    #[test]
    fn test_overrides_flip_mutual_references() {
        let organization = example_document(&set(), "organization", false).unwrap();
        let service = &organization["services"][0];
        assert_eq!(service["name"], "Food Bank");
        assert!(service.get("organization").is_none());

        let service_at_location = example_document(&set(), "service_at_location", false).unwrap();
        assert_eq!(service_at_location["service"]["name"], "Food Bank");
        assert!(service_at_location["service"].get("service_at_locations").is_none());
    }

    #[test]
    fn test_list_variant_is_paginated() {
        let list = example_document(&set(), "service", true).unwrap();
        assert_eq!(list["total_items"], 10);
        assert_eq!(list["first_page"], true);
        assert_eq!(list["contents"][0]["name"], "Food Bank");
        let keys: Vec<&String> = list.as_object().unwrap().keys().collect();
        assert_eq!(keys.last().map(|key| key.as_str()), Some("contents"));
    }

    #[test]
    fn test_cycle_is_reported() {
        let looping = EntitySet::from_entities(vec![
            entity("a", 1, json!({"b": {"$ref": "b.json"}})),
            entity("b", 2, json!({"a": {"$ref": "a.json"}})),
        ])
        .unwrap();

        let err = generate_example(&looping, "a", true).unwrap_err();
        assert!(matches!(
            err,
            SchemaError::CyclicReference { ref path } if path == &["a", "b", "a"]
        ));
    }

    #[test]
    fn test_doc_examples_need_their_roots() {
        let err = doc_examples(&set()).unwrap_err();
        assert!(matches!(err, SchemaError::MissingFile(ref file) if file == "taxonomy.json"));
    }

    #[test]
    fn test_coercion() {
        assert_eq!(coerce_integer(&json!("42")), json!(42));
        assert_eq!(coerce_integer(&json!("forty two")), json!("forty two"));
        assert_eq!(coerce_integer(&json!(7)), json!(7));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!(0)));
        assert!(is_truthy(&json!("0")));
    }
}
