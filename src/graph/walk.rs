//! Breadth-first reconstruction of relations from foreign keys

use super::{ReferenceGraph, is_side_table, relation_property_name};
use crate::error::{SchemaError, SchemaResult};
use crate::models::{DataPackage, Relation, RelationKind};
use std::collections::{BTreeMap, HashSet, VecDeque};
use tracing::debug;

/// `holder` has a `<target>_id` column referencing `target.id`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ForeignKeyEdge {
    pub holder: String,
    pub target: String,
}

impl ForeignKeyEdge {
    pub fn new(holder: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            holder: holder.into(),
            target: target.into(),
        }
    }
}

/// Foreign-key edges of a package, in resource order, without duplicates
pub fn foreign_key_edges(package: &DataPackage) -> Vec<ForeignKeyEdge> {
    let mut seen = HashSet::new();
    let mut edges = Vec::new();
    for resource in &package.resources {
        for foreign_key in &resource.schema.foreign_keys {
            let edge = ForeignKeyEdge::new(&resource.name, &foreign_key.reference.resource);
            if seen.insert(edge.clone()) {
                edges.push(edge);
            }
        }
    }
    edges
}

/// Walk the foreign-key edges breadth-first from `seeds`.
///
/// For the entity being visited, every edge not yet translated becomes one
/// relation: OBJECT when the entity holds the key, ARRAY when the key points
/// at it (unless the holder is a side table, whose keys are only translated
/// from the holder's side). Each edge is translated exactly once. When the
/// queue drains with edges left over, the walk resumes from the holder of
/// the first remaining edge.
///
/// Every entity that appears on any edge gets an entry; isolated entities
/// get none. The input edge list is never modified.
pub(crate) fn walk_foreign_keys(
    edges: &[ForeignKeyEdge],
    seeds: &[String],
    entities: &[String],
) -> SchemaResult<ReferenceGraph> {
    let known: HashSet<&str> = entities.iter().map(String::as_str).collect();
    for edge in edges {
        for name in [&edge.holder, &edge.target] {
            if !known.contains(name.as_str()) {
                return Err(SchemaError::Reference {
                    from: edge.holder.clone(),
                    target: name.clone(),
                });
            }
        }
    }

    let mut relations: BTreeMap<String, Vec<Relation>> = BTreeMap::new();
    for edge in edges {
        relations.entry(edge.holder.clone()).or_default();
        relations.entry(edge.target.clone()).or_default();
    }

    let mut consumed = vec![false; edges.len()];
    let mut seen: HashSet<&str> = HashSet::new();
    let mut queue: VecDeque<&str> = VecDeque::new();
    for seed in seeds {
        if !known.contains(seed.as_str()) {
            debug!("Seed entity '{}' not in package, skipping", seed);
            continue;
        }
        if seen.insert(seed.as_str()) {
            queue.push_back(seed.as_str());
        }
    }

    loop {
        while let Some(current) = queue.pop_front() {
            for (index, edge) in edges.iter().enumerate() {
                if consumed[index] {
                    continue;
                }
                let (kind, neighbour) = if edge.holder == current {
                    (RelationKind::Object, edge.target.as_str())
                } else if edge.target == current && !is_side_table(&edge.holder) {
                    (RelationKind::Array, edge.holder.as_str())
                } else {
                    continue;
                };
                consumed[index] = true;

                let property = relation_property_name(neighbour, kind);
                debug!("{}.{} -> {} ({:?})", current, property, neighbour, kind);
                relations
                    .entry(current.to_string())
                    .or_default()
                    .push(Relation::new(property, neighbour, kind));

                if seen.insert(neighbour) {
                    queue.push_back(neighbour);
                }
            }
        }

        match consumed.iter().position(|done| !done) {
            Some(index) => {
                let next = edges[index].holder.as_str();
                debug!("Resuming walk from '{}'", next);
                seen.insert(next);
                queue.push_back(next);
            }
            None => break,
        }
    }

    Ok(ReferenceGraph::from_map(relations))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    fn relation_triples(graph: &ReferenceGraph, name: &str) -> Vec<(String, String, RelationKind)> {
        graph
            .relations_for(name)
            .iter()
            .map(|relation| (relation.property.clone(), relation.target.clone(), relation.kind))
            .collect()
    }

    #[test]
    fn test_walk_from_seed() {
        let edges = vec![
            ForeignKeyEdge::new("service", "organization"),
            ForeignKeyEdge::new("phone", "service"),
        ];
        let entities = names(&["organization", "service", "phone"]);
        let graph =
            ReferenceGraph::from_foreign_keys(&edges, &names(&["organization"]), &entities)
                .unwrap();

        assert_eq!(
            relation_triples(&graph, "organization"),
            vec![("services".to_string(), "service".to_string(), RelationKind::Array)]
        );
        assert_eq!(
            relation_triples(&graph, "service"),
            vec![("phones".to_string(), "phone".to_string(), RelationKind::Array)]
        );
        assert!(graph.relations_for("phone").is_empty());
        assert!(graph.contains("phone"));
    }

    #[test]
    fn test_each_edge_translated_once() {
        let edges = vec![
            ForeignKeyEdge::new("service", "organization"),
            ForeignKeyEdge::new("service_at_location", "service"),
            ForeignKeyEdge::new("service_at_location", "location"),
            ForeignKeyEdge::new("location", "organization"),
        ];
        let entities = names(&["organization", "service", "service_at_location", "location"]);
        let graph = ReferenceGraph::from_foreign_keys(
            &edges,
            &names(&["organization", "service", "service_at_location", "location"]),
            &entities,
        )
        .unwrap();

        let total: usize = graph.iter().map(|(_, relations)| relations.len()).sum();
        assert_eq!(total, edges.len());

        let normalised: Vec<ForeignKeyEdge> = graph.foreign_key_edges().into_iter().collect();
        let mut expected = edges.clone();
        expected.sort();
        assert_eq!(normalised, expected);
    }

    #[test]
    fn test_side_table_keys_translated_from_holder() {
        let edges = vec![ForeignKeyEdge::new("attribute", "taxonomy_term")];
        let entities = names(&["taxonomy_term", "attribute"]);
        let graph =
            ReferenceGraph::from_foreign_keys(&edges, &names(&["taxonomy_term"]), &entities)
                .unwrap();

        assert!(graph.relations_for("taxonomy_term").is_empty());
        assert_eq!(
            relation_triples(&graph, "attribute"),
            vec![(
                "taxonomy_term".to_string(),
                "taxonomy_term".to_string(),
                RelationKind::Object
            )]
        );
    }

    #[test]
    fn test_disconnected_component_and_missing_seed() {
        let edges = vec![
            ForeignKeyEdge::new("service", "organization"),
            ForeignKeyEdge::new("taxonomy_term", "taxonomy"),
        ];
        let entities = names(&["organization", "service", "taxonomy", "taxonomy_term", "contact"]);
        let graph = ReferenceGraph::from_foreign_keys(
            &edges,
            &names(&["organization", "location"]),
            &entities,
        )
        .unwrap();

        assert_eq!(
            relation_triples(&graph, "taxonomy_term"),
            vec![("taxonomy".to_string(), "taxonomy".to_string(), RelationKind::Object)]
        );
        assert!(!graph.contains("contact"));
    }

    #[test]
    fn test_unknown_resource_is_reference_error() {
        let edges = vec![ForeignKeyEdge::new("service", "program")];
        let err = ReferenceGraph::from_foreign_keys(&edges, &[], &names(&["service"]))
            .unwrap_err();
        assert!(matches!(err, SchemaError::Reference { .. }));
    }
}
