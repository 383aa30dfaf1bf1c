//! Frictionless data package model
//!
//! The tabular counterpart of an entity set: one resource per entity, each
//! with a Table Schema (`primaryKey`, `fields`, `foreignKeys`).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Package license block
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct License {
    pub url: String,
    #[serde(rename = "type")]
    pub license_type: String,
    pub name: String,
}

/// Package-level metadata
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PackageMetadata {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<License>,
}

impl Default for PackageMetadata {
    fn default() -> Self {
        Self {
            name: "human_services_data".to_string(),
            title: Some("Human Services Data Specification".to_string()),
            description: Some(
                "HSDS describes data about organizations, the services they provide, the locations at which these services can be accessed, and associated details."
                    .to_string(),
            ),
            profile: Some("tabular-data-package".to_string()),
            version: Some("3.0.0".to_string()),
            homepage: Some("http://docs.openreferral.org".to_string()),
            license: Some(License {
                url: "https://creativecommons.org/licenses/by-sa/4.0/".to_string(),
                license_type: "CC-BY-SA-4.0".to_string(),
                name: "Creative Commons Attribution-ShareAlike 4.0".to_string(),
            }),
        }
    }
}

/// A complete data package descriptor
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DataPackage {
    #[serde(flatten)]
    pub metadata: PackageMetadata,
    pub resources: Vec<Resource>,
}

impl DataPackage {
    pub fn new(metadata: PackageMetadata, resources: Vec<Resource>) -> Self {
        Self {
            metadata,
            resources,
        }
    }

    pub fn resource(&self, name: &str) -> Option<&Resource> {
        self.resources.iter().find(|resource| resource.name == name)
    }

    pub fn resource_names(&self) -> Vec<String> {
        self.resources
            .iter()
            .map(|resource| resource.name.clone())
            .collect()
    }
}

/// One table of the package.
///
/// `metadata` keeps every descriptor key other than `name` and `schema`
/// (title, description, path, format, mediatype, profile, ...) in the order
/// it was authored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Resource {
    pub name: String,
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
    pub schema: TableSchema,
}

impl Resource {
    pub fn title(&self) -> Option<&str> {
        self.metadata.get("title").and_then(Value::as_str)
    }

    pub fn path(&self) -> Option<&str> {
        self.metadata.get("path").and_then(Value::as_str)
    }
}

fn default_primary_key() -> String {
    "id".to_string()
}

/// Table Schema of a resource
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TableSchema {
    #[serde(rename = "primaryKey", default = "default_primary_key")]
    pub primary_key: String,
    #[serde(default)]
    pub fields: Vec<TableField>,
    #[serde(
        rename = "foreignKeys",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub foreign_keys: Vec<ForeignKey>,
}

impl TableSchema {
    pub fn new(fields: Vec<TableField>, foreign_keys: Vec<ForeignKey>) -> Self {
        Self {
            primary_key: default_primary_key(),
            fields,
            foreign_keys,
        }
    }

    pub fn field(&self, name: &str) -> Option<&TableField> {
        self.fields.iter().find(|field| field.name() == Some(name))
    }
}

/// A Table Schema field descriptor, kept as an ordered JSON object
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(transparent)]
pub struct TableField {
    descriptor: Map<String, Value>,
}

impl TableField {
    pub fn new(descriptor: Map<String, Value>) -> Self {
        Self { descriptor }
    }

    pub fn name(&self) -> Option<&str> {
        self.descriptor.get("name").and_then(Value::as_str)
    }

    pub fn field_type(&self) -> Option<&str> {
        self.descriptor.get("type").and_then(Value::as_str)
    }

    pub fn constraints(&self) -> Option<&Map<String, Value>> {
        self.descriptor.get("constraints").and_then(Value::as_object)
    }

    /// `constraints.required`, false when absent
    pub fn is_required(&self) -> bool {
        self.constraints()
            .and_then(|constraints| constraints.get("required"))
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    pub fn descriptor(&self) -> &Map<String, Value> {
        &self.descriptor
    }

    pub fn into_descriptor(self) -> Map<String, Value> {
        self.descriptor
    }
}

/// `{"fields": "<target>_id", "reference": {"resource": "<target>", "fields": "id"}}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ForeignKey {
    pub fields: String,
    pub reference: ForeignKeyReference,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ForeignKeyReference {
    pub resource: String,
    pub fields: String,
}

impl ForeignKey {
    /// Foreign key from `<target>_id` to `<target>.id`
    pub fn to_resource(target: &str) -> Self {
        Self {
            fields: format!("{}_id", target),
            reference: ForeignKeyReference {
                resource: target.to_string(),
                fields: "id".to_string(),
            },
        }
    }
}
