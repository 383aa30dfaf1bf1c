//! Entity validation
//!
//! Checks the required-field invariants of every entity:
//! - `required` and `tabular_required` are disjoint
//! - required key and discriminator fields sit in `tabular_required`
//! - every listed name is a property

use crate::mapping::is_tabular_key;
use crate::models::EntitySet;
use std::collections::HashSet;

/// One required-list problem
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityIssue {
    /// Listed in both `required` and `tabular_required`
    BucketOverlap { entity: String, field: String },
    /// A key field listed in `required` instead of `tabular_required`
    MisplacedKey { entity: String, field: String },
    /// A required name that is not a property
    UnknownRequired { entity: String, field: String },
}

impl std::fmt::Display for EntityIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityIssue::BucketOverlap { entity, field } => {
                write!(f, "{}.{} is in both required and tabular_required", entity, field)
            }
            EntityIssue::MisplacedKey { entity, field } => {
                write!(f, "{}.{} is a key field and belongs in tabular_required", entity, field)
            }
            EntityIssue::UnknownRequired { entity, field } => {
                write!(f, "{}.{} is required but not a property", entity, field)
            }
        }
    }
}

/// Result of entity validation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityValidationResult {
    pub issues: Vec<EntityIssue>,
}

impl EntityValidationResult {
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Check every entity's required lists
pub fn validate_entities(entities: &EntitySet) -> EntityValidationResult {
    let mut issues = Vec::new();

    for entity in entities.iter() {
        let name = entity.name().to_string();
        let required = entity.required();
        let tabular_required: HashSet<&str> = entity.tabular_required().into_iter().collect();
        let properties = entity.properties();

        for field in &required {
            if tabular_required.contains(field) {
                issues.push(EntityIssue::BucketOverlap {
                    entity: name.clone(),
                    field: field.to_string(),
                });
            } else if is_tabular_key(field) {
                issues.push(EntityIssue::MisplacedKey {
                    entity: name.clone(),
                    field: field.to_string(),
                });
            }
        }

        for field in required.iter().chain(entity.tabular_required().iter()) {
            if !properties.contains_key(*field) {
                issues.push(EntityIssue::UnknownRequired {
                    entity: name.clone(),
                    field: field.to_string(),
                });
            }
        }
    }

    EntityValidationResult { issues }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EntitySchema;
    use serde_json::json;

    #[test]
    fn test_issues_reported() {
        let service = EntitySchema::from_value(
            "service.json",
            json!({
                "name": "service",
                "properties": {
                    "id": {"type": "string"},
                    "name": {"type": "string"},
                    "organization_id": {"type": "string"}
                },
                "required": ["id", "name", "organization_id", "status"],
                "tabular_required": ["name"],
                "datapackage_metadata": {"order": 1}
            }),
        )
        .unwrap();
        let result = validate_entities(&EntitySet::from_entities(vec![service]).unwrap());

        assert!(!result.is_valid());
        assert_eq!(
            result.issues,
            vec![
                EntityIssue::BucketOverlap {
                    entity: "service".to_string(),
                    field: "name".to_string()
                },
                EntityIssue::MisplacedKey {
                    entity: "service".to_string(),
                    field: "organization_id".to_string()
                },
                EntityIssue::UnknownRequired {
                    entity: "service".to_string(),
                    field: "status".to_string()
                },
            ]
        );
    }
}
