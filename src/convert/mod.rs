//! Entity set <-> data package conversion
//!
//! - [`schemas_to_datapackage`]: one tabular resource per entity, relation
//!   properties turned into foreign keys
//! - [`datapackage_to_schemas`]: one entity per resource, foreign keys
//!   turned back into relation properties by the reference graph walk

mod schema_to_table;
mod table_to_schema;

pub use schema_to_table::schemas_to_datapackage;
pub use table_to_schema::datapackage_to_schemas;

/// Entity keys that never become resource metadata
pub(crate) const ENTITY_STRUCTURE_KEYS: [&str; 6] = [
    "name",
    "type",
    "properties",
    "required",
    "tabular_required",
    "datapackage_metadata",
];
