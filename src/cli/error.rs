//! CLI error type

use hsds_schema_tools::{ConfigError, SchemaError, StorageError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Check failed with {0} issue(s)")]
    CheckFailed(usize),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl From<StorageError> for CliError {
    fn from(err: StorageError) -> Self {
        CliError::Schema(err.into())
    }
}
