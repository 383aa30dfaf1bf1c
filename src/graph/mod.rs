//! Reference graph between entities
//!
//! Relations are read either from `$ref` / `items.$ref` properties of an
//! entity set, or reconstructed from the foreign keys of a data package by
//! a breadth-first walk (see [`walk`]). Both directions can be normalised
//! back to a set of foreign-key edges so that graphs built either way can be
//! compared irrespective of discovery order.

mod walk;

pub use walk::{ForeignKeyEdge, foreign_key_edges};

use crate::error::{SchemaError, SchemaResult};
use crate::models::{EntitySet, Relation, RelationKind};
use std::collections::{BTreeMap, BTreeSet};

/// Polymorphic side table of free-form attributes
pub const ATTRIBUTE_TABLE: &str = "attribute";
/// Polymorphic side table of change metadata
pub const METADATA_TABLE: &str = "metadata";

/// Entities that never get a synthetic `attributes` relation
pub const ATTRIBUTE_EXCLUDED: [&str; 4] = ["attribute", "taxonomy", "taxonomy_term", "metadata"];

/// Root entities the table-to-schema walk starts from
pub const DEFAULT_SEEDS: [&str; 4] = ["organization", "service", "service_at_location", "location"];

/// True for the `attribute` and `metadata` side tables
pub fn is_side_table(name: &str) -> bool {
    name == ATTRIBUTE_TABLE || name == METADATA_TABLE
}

/// Property name a relation is exposed under.
///
/// OBJECT relations use the target name; ARRAY relations append `s` to it,
/// with no irregular plurals (`metadata` becomes `metadatas`).
pub fn relation_property_name(target: &str, kind: RelationKind) -> String {
    match kind {
        RelationKind::Object => target.to_string(),
        RelationKind::Array => format!("{}s", target),
    }
}

/// Relations of every entity, keyed by entity name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceGraph {
    relations: BTreeMap<String, Vec<Relation>>,
}

impl ReferenceGraph {
    pub(crate) fn from_map(relations: BTreeMap<String, Vec<Relation>>) -> Self {
        Self { relations }
    }

    /// Scan the relation properties of an entity set.
    ///
    /// Every entity gets an entry. A `$ref` whose target is not in the set
    /// is a [`SchemaError::Reference`].
    pub fn from_entities(entities: &EntitySet) -> SchemaResult<Self> {
        let mut relations = BTreeMap::new();
        for entity in entities.iter() {
            let mut outgoing = Vec::new();
            for (property, kind, target) in entity.relations() {
                if !entities.contains(target) {
                    return Err(SchemaError::Reference {
                        from: format!("{}.{}", entity.name(), property),
                        target: target.to_string(),
                    });
                }
                outgoing.push(Relation::new(property, target, kind));
            }
            relations.insert(entity.name().to_string(), outgoing);
        }
        Ok(Self { relations })
    }

    /// Rebuild relations from foreign keys; see [`walk::walk_foreign_keys`]
    pub fn from_foreign_keys(
        edges: &[ForeignKeyEdge],
        seeds: &[String],
        entities: &[String],
    ) -> SchemaResult<Self> {
        walk::walk_foreign_keys(edges, seeds, entities)
    }

    /// Append the synthetic side-table relations.
    ///
    /// Every entity gets an ARRAY of `attribute` (unless it is listed in
    /// [`ATTRIBUTE_EXCLUDED`]) and an ARRAY of `metadata` (unless it is
    /// `metadata` itself). A side table that is not among `entities` is not
    /// referenced, and existing relations to it are not duplicated.
    pub fn with_side_tables(mut self, entities: &[String]) -> Self {
        let has = |name: &str| entities.iter().any(|entity| entity == name);
        let attribute = has(ATTRIBUTE_TABLE);
        let metadata = has(METADATA_TABLE);

        for (name, outgoing) in self.relations.iter_mut() {
            let relates_to = |outgoing: &[Relation], target: &str| {
                outgoing.iter().any(|relation| relation.target == target)
            };
            if attribute
                && !ATTRIBUTE_EXCLUDED.contains(&name.as_str())
                && !relates_to(outgoing, ATTRIBUTE_TABLE)
            {
                outgoing.push(Relation::new(
                    relation_property_name(ATTRIBUTE_TABLE, RelationKind::Array),
                    ATTRIBUTE_TABLE,
                    RelationKind::Array,
                ));
            }
            if metadata && name != METADATA_TABLE && !relates_to(outgoing, METADATA_TABLE) {
                outgoing.push(Relation::new(
                    relation_property_name(METADATA_TABLE, RelationKind::Array),
                    METADATA_TABLE,
                    RelationKind::Array,
                ));
            }
        }
        self
    }

    /// Relations of one entity, empty when it has none
    pub fn relations_for(&self, name: &str) -> &[Relation] {
        self.relations
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.relations.contains_key(name)
    }

    pub fn entities(&self) -> impl Iterator<Item = &String> {
        self.relations.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<Relation>)> {
        self.relations.iter()
    }

    pub fn len(&self) -> usize {
        self.relations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relations.is_empty()
    }

    /// Normalise relations to `(holder, target)` foreign-key edges.
    ///
    /// OBJECT `a -> b` means `a` holds `b_id`; ARRAY `a -> b` means `b` holds
    /// `a_id`. ARRAY relations to side tables are not foreign keys and are
    /// left out. Duplicates collapse, so a relation declared from both ends
    /// yields a single edge.
    pub fn foreign_key_edges(&self) -> BTreeSet<ForeignKeyEdge> {
        let mut edges = BTreeSet::new();
        for (name, outgoing) in &self.relations {
            for relation in outgoing {
                match relation.kind {
                    RelationKind::Object => {
                        edges.insert(ForeignKeyEdge::new(name, &relation.target));
                    }
                    RelationKind::Array if is_side_table(&relation.target) => {}
                    RelationKind::Array => {
                        edges.insert(ForeignKeyEdge::new(&relation.target, name));
                    }
                }
            }
        }
        edges
    }
}
