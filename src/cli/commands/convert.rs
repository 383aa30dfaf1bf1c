//! Conversions between schema directories, data packages and CSV tables

use crate::error::CliError;
use hsds_schema_tools::export::{datapackage_to_csv, schemas_to_field_csv};
use hsds_schema_tools::import::{csv_to_datapackage, read_datapackage};
use hsds_schema_tools::storage::{DATAPACKAGE_INDENT, pretty_json};
use hsds_schema_tools::{
    DataPackage, FileSystemStorage, ToolConfig, datapackage_to_schemas, schemas_to_datapackage,
};
use std::path::Path;

/// Write the package to `output`, or print it when no output is given
fn emit_datapackage(
    storage: &FileSystemStorage,
    package: &DataPackage,
    output: Option<&Path>,
) -> Result<(), CliError> {
    match output {
        Some(path) => {
            storage.write_datapackage(path, package)?;
            eprintln!("Wrote {}", path.display());
        }
        None => println!("{}", pretty_json(package, DATAPACKAGE_INDENT)?),
    }
    Ok(())
}

/// Handle `schemas-to-datapackage`
pub fn handle_schemas_to_datapackage(
    schema_dir: &Path,
    output: Option<&Path>,
    config: &ToolConfig,
) -> Result<(), CliError> {
    let storage = FileSystemStorage::current_dir();
    let entities = storage.read_entity_set(schema_dir)?;
    let package = schemas_to_datapackage(&entities, &config.package)?;
    emit_datapackage(&storage, &package, output)
}

/// Handle `datapackage-to-schemas`
pub fn handle_datapackage_to_schemas(
    datapackage: &Path,
    output_dir: &Path,
    config: &ToolConfig,
) -> Result<(), CliError> {
    let storage = FileSystemStorage::current_dir();
    let package = read_datapackage(&storage.read_text(datapackage)?)?;
    let entities = datapackage_to_schemas(&package, &config.seeds)?;
    storage.write_documents(output_dir, &entities.to_documents())?;
    eprintln!(
        "Wrote {} schema(s) to {}",
        entities.len(),
        output_dir.display()
    );
    Ok(())
}

/// Handle `schemas-to-csv`: one row per property, printed to stdout
pub fn handle_schemas_to_csv(schema_dir: &Path) -> Result<(), CliError> {
    let storage = FileSystemStorage::current_dir();
    let entities = storage.read_entity_set(schema_dir)?;
    print!("{}", schemas_to_field_csv(&entities)?);
    Ok(())
}

/// Handle `datapackage-to-csv`
pub fn handle_datapackage_to_csv(datapackage: &Path, output_dir: &Path) -> Result<(), CliError> {
    let storage = FileSystemStorage::current_dir();
    let package = read_datapackage(&storage.read_text(datapackage)?)?;
    let tables = datapackage_to_csv(&package)?;
    storage.write_metadata_tables(output_dir, &tables)?;
    eprintln!("Wrote metadata tables to {}", output_dir.display());
    Ok(())
}

/// Handle `csv-to-datapackage`
pub fn handle_csv_to_datapackage(csv_dir: &Path, output: Option<&Path>) -> Result<(), CliError> {
    let storage = FileSystemStorage::current_dir();
    let tables = storage.read_metadata_tables(csv_dir)?;
    let package = csv_to_datapackage(&tables)?;
    emit_datapackage(&storage, &package, output)
}
