//! Models module
//!
//! Defines the in-memory values passed between the conversion stages:
//! raw document sets, parsed entity schemas, Frictionless data packages
//! and the relations derived from `$ref`s and foreign keys.

pub mod datapackage;
pub mod document;
pub mod entity;
pub mod metadata_tables;
pub mod relationship;

pub use datapackage::{
    DataPackage, ForeignKey, ForeignKeyReference, License, PackageMetadata, Resource, TableField,
    TableSchema,
};
pub use document::{DocumentSet, OPENAPI_FILE, is_empty_document};
pub use entity::{
    EntitySchema, EntitySet, entity_file_name, entity_name_from_ref, property_reference,
};
pub use metadata_tables::MetadataTables;
pub use relationship::{Relation, RelationKind};
