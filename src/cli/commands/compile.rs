//! Compiled schema command

use crate::error::CliError;
use hsds_schema_tools::export::compile_all;
use hsds_schema_tools::{EntitySet, FileSystemStorage};
use std::path::Path;

/// Write every compiled artifact into `output_dir`
pub fn write_compiled(
    storage: &FileSystemStorage,
    entities: &EntitySet,
    output_dir: &Path,
) -> Result<(), CliError> {
    storage.ensure_dir(output_dir)?;
    let outputs = compile_all(entities)?;
    for (file_name, document) in &outputs {
        storage.write_json(output_dir.join(file_name), document)?;
    }
    eprintln!(
        "Wrote {} compiled schema(s) to {}",
        outputs.len(),
        output_dir.display()
    );
    Ok(())
}

/// Handle `compile-schemas`
pub fn handle_compile_schemas(schemas: &Path, output_dir: &Path) -> Result<(), CliError> {
    let storage = FileSystemStorage::current_dir();
    let entities = storage.read_entity_set(schemas)?;
    write_compiled(&storage, &entities, output_dir)
}
