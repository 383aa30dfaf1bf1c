//! Relation model
//!
//! Relations are never stored; they are derived from `$ref` properties on
//! the schema side and from foreign keys on the tabular side.

use super::entity::entity_file_name;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// How many of the target an entity embeds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationKind {
    /// One target; the entity holds the foreign key
    Object,
    /// Many targets; the target holds the foreign key back to the entity
    Array,
}

/// One outgoing relation of an entity
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Relation {
    /// Property name the relation is exposed under
    pub property: String,
    /// Target entity name
    pub target: String,
    pub kind: RelationKind,
}

impl Relation {
    pub fn new(property: impl Into<String>, target: impl Into<String>, kind: RelationKind) -> Self {
        Self {
            property: property.into(),
            target: target.into(),
            kind,
        }
    }

    /// JSON Schema property for this relation
    pub fn to_property(&self) -> Value {
        let reference = entity_file_name(&self.target);
        match self.kind {
            RelationKind::Object => json!({
                "name": self.property,
                "$ref": reference,
            }),
            RelationKind::Array => json!({
                "name": self.property,
                "type": "array",
                "items": {"$ref": reference},
            }),
        }
    }
}
