//! Crate-level error type
//!
//! Nothing in the library catches or retries these: a failure aborts the
//! current command and is surfaced to the caller.

use crate::mapping::MappingError;
use crate::storage::StorageError;
use thiserror::Error;

/// Errors raised while reading, converting, merging or generating schemas
#[derive(Error, Debug)]
pub enum SchemaError {
    /// An expected entity file is absent from a set
    #[error("Missing file: {0}")]
    MissingFile(String),

    /// A document lacks an expected key or has the wrong shape
    #[error("Invalid shape in {document}: {detail}")]
    SchemaShape { document: String, detail: String },

    /// A `$ref` or foreign key points at an entity that is not in the set
    #[error("{from} references unknown entity '{target}'")]
    Reference { from: String, target: String },

    /// The remote schema source could not be read
    #[error("Fetch failed: {0}")]
    Fetch(String),

    /// A merge-patch would produce an invalid document
    #[error("Merge conflict in {document} at {path}: {detail}")]
    Conflict {
        document: String,
        path: String,
        detail: String,
    },

    /// Following references loops back to an entity already being expanded
    #[error("Cyclic reference: {}", path.join(" -> "))]
    CyclicReference { path: Vec<String> },

    #[error(transparent)]
    Mapping(#[from] MappingError),

    #[error("Storage error: {0}")]
    Storage(StorageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SchemaError {
    pub(crate) fn shape(document: impl Into<String>, detail: impl Into<String>) -> Self {
        SchemaError::SchemaShape {
            document: document.into(),
            detail: detail.into(),
        }
    }
}

impl From<StorageError> for SchemaError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::FileNotFound(path) => SchemaError::MissingFile(path),
            StorageError::NetworkError(message) => SchemaError::Fetch(message),
            other => SchemaError::Storage(other),
        }
    }
}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;
