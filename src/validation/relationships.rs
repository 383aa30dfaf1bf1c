//! Relationship validation
//!
//! Every `$ref` or foreign key must point at an entity of the set, and the
//! entities that take part in relations must form a single connected graph.
//! Entities with no relation at all are not counted against connectivity.

use crate::graph::{ATTRIBUTE_EXCLUDED, ATTRIBUTE_TABLE, METADATA_TABLE, foreign_key_edges};
use crate::models::{DataPackage, EntitySet};
use petgraph::unionfind::UnionFind;
use std::collections::{BTreeMap, HashMap};

/// A relation whose target is not in the set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingReference {
    /// Holding entity or resource
    pub entity: String,
    /// Property or foreign-key field
    pub property: String,
    pub target: String,
}

impl std::fmt::Display for DanglingReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}.{} references unknown entity '{}'",
            self.entity, self.property, self.target
        )
    }
}

/// Result of relationship validation over an entity set
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RelationshipValidationResult {
    pub dangling_references: Vec<DanglingReference>,
    /// Connected groups of related entities; more than one means the graph is split
    pub components: Vec<Vec<String>>,
}

impl RelationshipValidationResult {
    pub fn is_connected(&self) -> bool {
        self.components.len() <= 1
    }

    pub fn is_valid(&self) -> bool {
        self.dangling_references.is_empty() && self.is_connected()
    }
}

/// Result of relationship validation over a data package
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PackageValidationResult {
    /// Foreign keys whose resource is missing
    pub missing_targets: Vec<DanglingReference>,
    pub components: Vec<Vec<String>>,
}

impl PackageValidationResult {
    pub fn is_connected(&self) -> bool {
        self.components.len() <= 1
    }

    pub fn is_valid(&self) -> bool {
        self.missing_targets.is_empty() && self.is_connected()
    }
}

/// Group the endpoints of `edges` into connected components.
///
/// Components are sorted internally and by their first member.
fn connected_components(edges: &[(String, String)]) -> Vec<Vec<String>> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut names: Vec<&str> = Vec::new();
    for (from, to) in edges {
        for name in [from.as_str(), to.as_str()] {
            index.entry(name).or_insert_with(|| {
                names.push(name);
                names.len() - 1
            });
        }
    }

    let mut sets = UnionFind::<usize>::new(names.len());
    for (from, to) in edges {
        sets.union(index[from.as_str()], index[to.as_str()]);
    }

    let mut groups: BTreeMap<usize, Vec<String>> = BTreeMap::new();
    for (position, name) in names.iter().enumerate() {
        groups
            .entry(sets.find(position))
            .or_default()
            .push(name.to_string());
    }

    let mut components: Vec<Vec<String>> = groups
        .into_values()
        .map(|mut members| {
            members.sort();
            members
        })
        .collect();
    components.sort();
    components
}

/// Check every relation property of an entity set
pub fn validate_relationships(entities: &EntitySet) -> RelationshipValidationResult {
    let mut dangling_references = Vec::new();
    let mut edges = Vec::new();

    for entity in entities.iter() {
        for (property, _, target) in entity.relations() {
            if entities.contains(target) {
                edges.push((entity.name().to_string(), target.to_string()));
            } else {
                dangling_references.push(DanglingReference {
                    entity: entity.name().to_string(),
                    property: property.to_string(),
                    target: target.to_string(),
                });
            }
        }
    }

    RelationshipValidationResult {
        dangling_references,
        components: connected_components(&edges),
    }
}

/// Polymorphic `link_id` links into the side tables.
///
/// They carry no foreign key, so every resource is linked to `attribute`
/// (outside [`ATTRIBUTE_EXCLUDED`]) and to `metadata` when those exist.
fn side_table_edges(package: &DataPackage) -> Vec<(String, String)> {
    let mut edges = Vec::new();
    for side_table in [ATTRIBUTE_TABLE, METADATA_TABLE] {
        if package.resource(side_table).is_none() {
            continue;
        }
        for resource in &package.resources {
            let name = resource.name.as_str();
            let excluded = if side_table == ATTRIBUTE_TABLE {
                ATTRIBUTE_EXCLUDED.contains(&name)
            } else {
                name == METADATA_TABLE
            };
            if !excluded {
                edges.push((name.to_string(), side_table.to_string()));
            }
        }
    }
    edges
}

/// Check every foreign key of a data package
pub fn validate_datapackage(package: &DataPackage) -> PackageValidationResult {
    let mut missing_targets = Vec::new();
    for resource in &package.resources {
        for foreign_key in &resource.schema.foreign_keys {
            if package.resource(&foreign_key.reference.resource).is_none() {
                missing_targets.push(DanglingReference {
                    entity: resource.name.clone(),
                    property: foreign_key.fields.clone(),
                    target: foreign_key.reference.resource.clone(),
                });
            }
        }
    }

    let mut edges: Vec<(String, String)> = foreign_key_edges(package)
        .into_iter()
        .filter(|edge| package.resource(&edge.target).is_some())
        .map(|edge| (edge.holder, edge.target))
        .collect();
    edges.extend(side_table_edges(package));

    PackageValidationResult {
        missing_targets,
        components: connected_components(&edges),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ForeignKey, PackageMetadata, Resource, TableSchema};
    use serde_json::Map;

    fn resource(name: &str, targets: &[&str]) -> Resource {
        Resource {
            name: name.to_string(),
            metadata: Map::new(),
            schema: TableSchema::new(
                Vec::new(),
                targets.iter().map(|target| ForeignKey::to_resource(target)).collect(),
            ),
        }
    }

    #[test]
    fn test_components() {
        let edges = vec![
            ("service".to_string(), "organization".to_string()),
            ("phone".to_string(), "service".to_string()),
            ("taxonomy_term".to_string(), "taxonomy".to_string()),
        ];
        assert_eq!(
            connected_components(&edges),
            vec![
                vec!["organization", "phone", "service"],
                vec!["taxonomy", "taxonomy_term"]
            ]
        );
    }

    #[test]
    fn test_package_validation() {
        let package = DataPackage::new(
            PackageMetadata::default(),
            vec![
                resource("organization", &[]),
                resource("service", &["organization", "program"]),
                resource("contact", &[]),
            ],
        );

        let result = validate_datapackage(&package);
        assert!(!result.is_valid());
        assert_eq!(result.missing_targets.len(), 1);
        assert_eq!(result.missing_targets[0].target, "program");
        assert!(result.is_connected());
    }

    #[test]
    fn test_side_tables_join_the_package_graph() {
        let package = DataPackage::new(
            PackageMetadata::default(),
            vec![
                resource("organization", &[]),
                resource("service", &["organization"]),
                resource("taxonomy", &[]),
                resource("attribute", &[]),
                resource("metadata", &[]),
            ],
        );

        let result = validate_datapackage(&package);
        assert!(result.is_valid());
        assert_eq!(
            result.components,
            vec![vec!["attribute", "metadata", "organization", "service", "taxonomy"]]
        );
    }

    #[test]
    fn test_package_without_side_tables_can_split() {
        let package = DataPackage::new(
            PackageMetadata::default(),
            vec![
                resource("organization", &[]),
                resource("service", &["organization"]),
                resource("taxonomy_term", &["taxonomy"]),
                resource("taxonomy", &[]),
            ],
        );
        assert!(!validate_datapackage(&package).is_connected());
    }
}
