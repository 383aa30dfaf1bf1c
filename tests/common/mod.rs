//! Shared fixtures: a small HSDS-like entity set

#![allow(dead_code)]

use hsds_schema_tools::{EntitySchema, EntitySet};
use serde_json::{Value, json};

fn string(example: Option<&str>) -> Value {
    match example {
        Some(example) => json!({"type": "string", "example": example}),
        None => json!({"type": "string"}),
    }
}

fn array_of(entity: &str) -> Value {
    json!({"type": "array", "items": {"$ref": format!("{}.json", entity)}})
}

fn object_of(entity: &str) -> Value {
    json!({"$ref": format!("{}.json", entity)})
}

fn entity(name: &str, order: i64, properties: Value, required: &[&str], tabular: &[&str]) -> EntitySchema {
    let mut title = name.replace('_', " ");
    title[..1].make_ascii_uppercase();
    EntitySchema::from_value(
        &format!("{}.json", name),
        json!({
            "title": title,
            "description": format!("The {} entity", name),
            "type": "object",
            "name": name,
            "properties": properties,
            "required": required,
            "tabular_required": tabular,
            "datapackage_metadata": {"path": format!("{}.csv", name), "order": order}
        }),
    )
    .unwrap()
}

/// Documents of the fixture set, one per entity
pub fn hsds_entities() -> Vec<EntitySchema> {
    vec![
        entity(
            "organization",
            1,
            json!({
                "id": string(Some("org-1")),
                "name": string(Some("Food Bank Trust")),
                "year_incorporated": {"type": "number", "example": "1985"},
                "email": {"type": "string", "format": "email"},
                "phones": array_of("phone"),
                "locations": array_of("location"),
                "attributes": array_of("attribute")
            }),
            &["id", "name"],
            &[],
        ),
        entity(
            "service",
            2,
            json!({
                "id": string(Some("svc-1")),
                "organization_id": string(None),
                "name": string(Some("Food Bank")),
                "status": {
                    "type": "string",
                    "enum": ["active", "inactive", "defunct"],
                    "example": "active"
                },
                "assured_date": {
                    "type": "string",
                    "format": "date",
                    "datapackage_type": "date",
                    "example": "2023-05-01"
                },
                "organization": object_of("organization"),
                "phones": array_of("phone"),
                "service_at_locations": array_of("service_at_location"),
                "attributes": array_of("attribute"),
                "metadata": array_of("metadata")
            }),
            &["id", "name", "status"],
            &["organization_id"],
        ),
        entity(
            "location",
            3,
            json!({
                "id": string(Some("loc-1")),
                "organization_id": string(None),
                "name": string(Some("High Street")),
                "phones": array_of("phone")
            }),
            &["id"],
            &[],
        ),
        entity(
            "service_at_location",
            4,
            json!({
                "id": string(Some("sal-1")),
                "service_id": string(None),
                "location_id": string(None),
                "location": object_of("location")
            }),
            &["id"],
            &["service_id", "location_id"],
        ),
        entity(
            "phone",
            5,
            json!({
                "id": string(Some("phone-1")),
                "location_id": string(None),
                "service_id": string(None),
                "organization_id": string(None),
                "number": string(Some("555-0100")),
                "extension": {"type": "number", "example": "42"}
            }),
            &["id", "number"],
            &[],
        ),
        entity(
            "taxonomy",
            6,
            json!({
                "id": string(Some("tax-1")),
                "name": string(Some("Open Eligibility"))
            }),
            &["id", "name"],
            &[],
        ),
        entity(
            "taxonomy_term",
            7,
            json!({
                "id": string(Some("term-1")),
                "code": string(Some("food")),
                "parent_id": string(None),
                "taxonomy_id": string(None),
                "taxonomy": object_of("taxonomy")
            }),
            &["id", "code"],
            &[],
        ),
        entity(
            "attribute",
            8,
            json!({
                "id": string(Some("attr-1")),
                "link_id": string(None),
                "link_type": string(Some("service")),
                "link_entity": string(Some("service")),
                "taxonomy_term_id": string(None),
                "taxonomy_term": object_of("taxonomy_term")
            }),
            &["id"],
            &["link_id", "link_entity", "taxonomy_term_id"],
        ),
        entity(
            "metadata",
            9,
            json!({
                "id": string(Some("meta-1")),
                "resource_id": string(None),
                "resource_type": string(Some("service")),
                "last_action_date": {
                    "type": "string",
                    "format": "date",
                    "datapackage_type": "date",
                    "example": "2023-05-01"
                }
            }),
            &["id"],
            &["resource_id", "resource_type"],
        ),
    ]
}

/// The fixture as an entity set
pub fn hsds_set() -> EntitySet {
    EntitySet::from_entities(hsds_entities()).unwrap()
}
