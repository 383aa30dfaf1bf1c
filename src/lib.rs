//! HSDS schema tools - conversions between the representations of the Human
//! Services Data Specification
//!
//! Provides:
//! - Entity schema sets (a directory of JSON Schema documents linked by `$ref`)
//! - Frictionless data packages and their flat CSV metadata tables
//! - Profile merging onto the upstream core schema set
//! - Example payloads and compiled standalone schemas
//! - Structural validation of the reference graph
//!
//! Everything is read into memory once at the command boundary, transformed
//! by pure functions and written back by the storage layer.

pub mod config;
pub mod convert;
pub mod error;
pub mod example;
pub mod export;
pub mod graph;
pub mod import;
pub mod mapping;
pub mod models;
pub mod profile;
pub mod storage;
pub mod validation;

// Re-export commonly used types
pub use config::{ConfigError, ToolConfig};
pub use convert::{datapackage_to_schemas, schemas_to_datapackage};
pub use error::{SchemaError, SchemaResult};
pub use graph::{ForeignKeyEdge, ReferenceGraph};
pub use mapping::{MappingError, schema_field_to_table, table_field_to_schema};
pub use models::{
    DataPackage, DocumentSet, EntitySchema, EntitySet, MetadataTables, PackageMetadata, Relation,
    RelationKind, Resource, TableField, TableSchema,
};
pub use profile::{MergeOutcome, merge_profile};
pub use storage::{DirectorySchemaSource, FileSystemStorage, SchemaSource, StorageError};
#[cfg(feature = "api-backend")]
pub use storage::GithubSchemaSource;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Install the stderr tracing subscriber used by the binary.
///
/// `RUST_LOG` overrides the default `hsds_schema_tools=info` filter.
#[cfg(feature = "cli")]
pub fn init_tracing(verbose: bool) {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let default_filter = if verbose {
        "hsds_schema_tools=debug,hsds_schema=debug"
    } else {
        "hsds_schema_tools=info,hsds_schema=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}
