//! Check command implementation

use crate::error::CliError;
use crate::output::{CheckReport, format_check_report};
use hsds_schema_tools::validation::{
    validate_datapackage, validate_entities, validate_relationships,
};
use hsds_schema_tools::{FileSystemStorage, ToolConfig, schemas_to_datapackage};
use std::path::Path;

/// Handle `check`: report every structural issue, fail if there is any
pub fn handle_check(schemas: &Path, config: &ToolConfig) -> Result<(), CliError> {
    let entities = FileSystemStorage::current_dir().read_entity_set(schemas)?;

    let relationships = validate_relationships(&entities);
    let package = if relationships.dangling_references.is_empty() {
        let package = schemas_to_datapackage(&entities, &config.package)?;
        Some(validate_datapackage(&package))
    } else {
        None
    };

    let report = CheckReport {
        entity_count: entities.len(),
        entities: validate_entities(&entities),
        relationships,
        package,
    };
    print!("{}", format_check_report(&report));

    match report.issue_count() {
        0 => Ok(()),
        count => Err(CliError::CheckFailed(count)),
    }
}
