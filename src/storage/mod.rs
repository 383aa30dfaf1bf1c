//! Storage backends
//!
//! Everything that touches the outside world lives here:
//! - FileSystemStorage: directories of `*.json` entity documents and CSV tables
//! - SchemaSource: where the upstream ("core") schema set is fetched from
//!   - DirectorySchemaSource: a local directory
//!   - GithubSchemaSource: the GitHub contents API (api-backend feature)

use crate::models::DocumentSet;

/// Error type for storage operations
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("File not found: {0}")]
    FileNotFound(String),
    #[error("Directory not found: {0}")]
    DirectoryNotFound(String),
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("Network error: {0}")]
    NetworkError(String),
}

/// A source of upstream schema documents keyed by filename
pub trait SchemaSource {
    /// Fetch every document the source exposes
    fn fetch(&self) -> Result<DocumentSet, StorageError>;
}

pub mod filesystem;

#[cfg(feature = "api-backend")]
pub mod api;

pub use filesystem::{DATAPACKAGE_INDENT, DirectorySchemaSource, FileSystemStorage, pretty_json};
#[cfg(feature = "api-backend")]
pub use api::GithubSchemaSource;
