//! Error types for field mapping operations

use thiserror::Error;

/// Errors that can occur while mapping a single field
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MappingError {
    /// The field has no declared type
    #[error("Field '{field}' has no declared type")]
    MissingType { field: String },

    /// A tabular type override disagrees with an annotation already on the field
    #[error("Field '{field}': type override '{requested}' conflicts with existing '{existing}'")]
    TypeOverrideConflict {
        field: String,
        existing: String,
        requested: String,
    },

    /// The field descriptor is not shaped as expected
    #[error("Field '{field}': {detail}")]
    InvalidField { field: String, detail: String },
}

impl MappingError {
    /// Qualify the field name with its table (`service.name`)
    pub fn in_table(self, table: &str) -> Self {
        let qualify = |field: String| format!("{}.{}", table, field);
        match self {
            MappingError::MissingType { field } => MappingError::MissingType {
                field: qualify(field),
            },
            MappingError::TypeOverrideConflict {
                field,
                existing,
                requested,
            } => MappingError::TypeOverrideConflict {
                field: qualify(field),
                existing,
                requested,
            },
            MappingError::InvalidField { field, detail } => MappingError::InvalidField {
                field: qualify(field),
                detail,
            },
        }
    }
}

/// Result type for mapping operations
pub type MappingResult<T> = Result<T, MappingError>;
