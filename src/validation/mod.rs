//! Validation functionality
//!
//! Structural checks of an entity set or data package:
//! - Entity validation (required / tabular_required buckets)
//! - Relationship validation (dangling references, connectivity)
//!
//! Validators collect every issue instead of failing on the first one, so
//! the `check` command can report them all.

pub mod entities;
pub mod relationships;

pub use entities::{EntityIssue, EntityValidationResult, validate_entities};
pub use relationships::{
    DanglingReference, PackageValidationResult, RelationshipValidationResult,
    validate_datapackage, validate_relationships,
};
