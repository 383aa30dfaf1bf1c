//! Export functionality
//!
//! Renders an entity set or data package into the published artifacts:
//! - flat CSV metadata tables
//! - compiled standalone JSON Schemas
//! - the OpenAPI 3.0 document
//! - documentation examples (JSON and CSV)

mod compile;
mod csv;
mod openapi;

pub use self::csv::{NESTING_SEPARATOR, datapackage_to_csv, schemas_to_field_csv};
pub use compile::{SchemaCompiler, compile_all, remove_one_to_many, with_definitions};
pub use openapi::{OPENAPI30_FILE, OpenApiInfo, OpenApiLicense, openapi30};

use crate::error::SchemaResult;
use crate::example::{doc_examples, tabular_examples};
use crate::models::EntitySet;

/// Rendered documentation examples
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExampleFiles {
    /// `(file name, document)` for each nested JSON example
    pub json: Vec<(String, serde_json::Value)>,
    /// `(file name, contents)` for each table, empty when it has no example values
    pub csv: Vec<(String, String)>,
}

/// Render every documentation example of an entity set
pub fn example_files(entities: &EntitySet) -> SchemaResult<ExampleFiles> {
    let json = doc_examples(entities)?;
    let mut csv = Vec::new();
    for example in tabular_examples(entities) {
        if example.is_empty() {
            tracing::debug!("No example values for {}, writing an empty table", example.path);
        }
        let content = example.to_csv()?;
        csv.push((example.path, content));
    }
    Ok(ExampleFiles { json, csv })
}
