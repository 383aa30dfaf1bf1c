//! Example payload commands

use crate::error::CliError;
use hsds_schema_tools::config::CSV_EXAMPLES_DIR;
use hsds_schema_tools::export::example_files;
use hsds_schema_tools::storage::pretty_json;
use hsds_schema_tools::example::example_document;
use hsds_schema_tools::{EntitySet, FileSystemStorage};
use std::path::Path;

/// Write the JSON examples to `json_dir` and the CSV ones to `csv_dir`
pub fn write_examples(
    storage: &FileSystemStorage,
    entities: &EntitySet,
    json_dir: &Path,
    csv_dir: &Path,
) -> Result<(), CliError> {
    let files = example_files(entities)?;
    for (file_name, document) in &files.json {
        storage.write_json(json_dir.join(file_name), document)?;
    }
    storage.ensure_dir(csv_dir)?;
    for (file_name, content) in &files.csv {
        storage.write_text(csv_dir.join(file_name), content)?;
    }
    eprintln!(
        "Wrote {} JSON example(s) to {} and {} CSV example(s) to {}",
        files.json.len(),
        json_dir.display(),
        files.csv.len(),
        csv_dir.display()
    );
    Ok(())
}

/// Handle `schemas-to-example`: print one example rooted at `base`
pub fn handle_schemas_to_example(schemas: &Path, base: &str, simple: bool) -> Result<(), CliError> {
    let entities = FileSystemStorage::current_dir().read_entity_set(schemas)?;
    if !entities.contains(base) {
        return Err(CliError::InvalidArgument(format!(
            "Unknown entity '{}', expected one of: {}",
            base,
            entities.names().join(", ")
        )));
    }
    let example = example_document(&entities, base, simple)?;
    println!("{}", pretty_json(&example, 2)?);
    Ok(())
}

/// Handle `schemas-to-doc-examples`
pub fn handle_schemas_to_doc_examples(schemas: &Path, output: &Path) -> Result<(), CliError> {
    let storage = FileSystemStorage::current_dir();
    let entities = storage.read_entity_set(schemas)?;
    write_examples(&storage, &entities, output, &output.join(CSV_EXAMPLES_DIR))
}
