//! Whole-workspace workflows
//!
//! `docs-all` republishes everything derived from the schema directory;
//! `profile-all` first rebuilds the schema directory by merging the local
//! profile onto the upstream core set.

use super::compile::write_compiled;
use super::examples::write_examples;
use crate::error::CliError;
use hsds_schema_tools::export::{OPENAPI30_FILE, openapi30};
use hsds_schema_tools::models::OPENAPI_FILE;
use hsds_schema_tools::profile::{merge_from_source, profile_url_to_raw};
use hsds_schema_tools::{
    DocumentSet, EntitySet, FileSystemStorage, GithubSchemaSource, SchemaError, ToolConfig,
    schemas_to_datapackage,
};
use tracing::{info, warn};

/// Arguments for the `profile-all` command
pub struct ProfileArgs {
    /// GitHub URL (or raw base URL) of the profile repository
    pub profile_url: String,
    pub branch: String,
    /// Empty the output directories first
    pub clean: bool,
}

/// Datapackage, examples and compiled schemas of an entity set
fn publish(
    storage: &FileSystemStorage,
    entities: &EntitySet,
    config: &ToolConfig,
) -> Result<(), CliError> {
    let paths = &config.paths;
    let package = schemas_to_datapackage(entities, &config.package)?;
    storage.write_datapackage(&paths.datapackage, &package)?;
    eprintln!("Wrote {}", paths.datapackage.display());

    write_examples(storage, entities, &paths.examples, &paths.csv_examples())?;
    write_compiled(storage, entities, &paths.compiled())
}

/// Handle `docs-all`
pub fn handle_docs_all(config: &ToolConfig) -> Result<(), CliError> {
    let storage = FileSystemStorage::current_dir();
    let paths = &config.paths;
    let entities = storage.read_entity_set(&paths.schema)?;

    let openapi = entities.openapi().ok_or_else(|| {
        SchemaError::MissingFile(paths.schema.join(OPENAPI_FILE).display().to_string())
    })?;
    let openapi = openapi30(openapi, &config.openapi_info)?;
    let openapi_path = paths.docs.join(OPENAPI30_FILE);
    storage.write_json(&openapi_path, &openapi)?;
    eprintln!("Wrote {}", openapi_path.display());

    publish(&storage, &entities, config)
}

/// Handle `profile-all`
pub fn handle_profile_all(args: &ProfileArgs, config: &ToolConfig) -> Result<(), CliError> {
    let storage = FileSystemStorage::current_dir();
    let paths = &config.paths;

    if args.clean {
        storage.clean_dir(&paths.schema)?;
    }

    let profile = if storage.exists(&paths.profile) {
        storage.read_documents(&paths.profile)?
    } else {
        warn!(
            "Profile directory {} not found, using the core schemas as is",
            paths.profile.display()
        );
        DocumentSet::new()
    };

    let raw_url = profile_url_to_raw(&args.profile_url, &args.branch);
    info!("Merging profile published at {}", raw_url);
    let source = GithubSchemaSource::new(raw_url)
        .with_contents_url(&config.upstream_contents_url)
        .with_upstream_raw_prefix(&config.upstream_raw_prefix);
    let outcome = merge_from_source(&source, &profile)?;
    storage.write_documents(&paths.schema, &outcome.documents)?;
    eprintln!(
        "Wrote {} schema(s) to {} ({} removed by the profile)",
        outcome.documents.len(),
        paths.schema.display(),
        outcome.removed.len()
    );

    storage.ensure_dir(&paths.examples)?;
    storage.ensure_dir(paths.compiled())?;
    if args.clean {
        storage.clean_dir(&paths.examples)?;
        storage.clean_dir(paths.compiled())?;
    }

    let entities = EntitySet::from_documents(&outcome.documents)?;
    publish(&storage, &entities, config)
}
