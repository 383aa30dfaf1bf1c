//! HSDS schema CLI
//!
//! Command-line interface for converting HSDS schemas between JSON Schema
//! directories, Frictionless data packages and CSV metadata tables.

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use commands::workflow::ProfileArgs;
use error::CliError;
use hsds_schema_tools::{ToolConfig, init_tracing};
use std::path::PathBuf;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(name = "hsds-schema")]
#[command(about = "Conversion tools for Human Services Data Specification schemas")]
#[command(version = hsds_schema_tools::VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (defaults to ./hsds-schema.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build a data package from a schema directory
    SchemasToDatapackage {
        jsonschema_dir: PathBuf,
        /// Output file (printed to stdout when omitted)
        output: Option<PathBuf>,
    },

    /// Rebuild a schema directory from a data package
    DatapackageToSchemas {
        datapackage: PathBuf,
        output_dir: PathBuf,
    },

    /// Print every property of a schema directory as CSV
    SchemasToCsv { jsonschema_dir: PathBuf },

    /// Split a data package into its CSV metadata tables
    DatapackageToCsv {
        datapackage: PathBuf,
        output_dir: PathBuf,
    },

    /// Rebuild a data package from its CSV metadata tables
    CsvToDatapackage {
        csv_dir: PathBuf,
        /// Output file (printed to stdout when omitted)
        output: Option<PathBuf>,
    },

    /// Print an example document rooted at one entity
    SchemasToExample {
        schemas: PathBuf,
        base: String,
        /// List variant: array relations dropped, wrapped in a page
        #[arg(long)]
        simple: bool,
    },

    /// Write the documentation examples (JSON and CSV)
    SchemasToDocExamples { schemas: PathBuf, output: PathBuf },

    /// Write the compiled standalone schemas
    CompileSchemas { schemas: PathBuf, output_dir: PathBuf },

    /// Check required lists and the reference graph
    Check { schemas: PathBuf },

    /// Regenerate the OpenAPI 3.0 document, datapackage, examples and compiled schemas
    DocsAll,

    /// Merge the local profile onto the upstream core schemas and regenerate everything
    ProfileAll {
        profile_url: String,
        #[arg(long, default_value = "main")]
        branch: String,
        /// Empty the output directories first
        #[arg(long)]
        clean: bool,
    },
}

fn run_command(command: Commands, config: &ToolConfig) -> Result<(), CliError> {
    use commands::{check, compile, convert, examples, workflow};

    match command {
        Commands::SchemasToDatapackage {
            jsonschema_dir,
            output,
        } => convert::handle_schemas_to_datapackage(&jsonschema_dir, output.as_deref(), config),
        Commands::DatapackageToSchemas {
            datapackage,
            output_dir,
        } => convert::handle_datapackage_to_schemas(&datapackage, &output_dir, config),
        Commands::SchemasToCsv { jsonschema_dir } => convert::handle_schemas_to_csv(&jsonschema_dir),
        Commands::DatapackageToCsv {
            datapackage,
            output_dir,
        } => convert::handle_datapackage_to_csv(&datapackage, &output_dir),
        Commands::CsvToDatapackage { csv_dir, output } => {
            convert::handle_csv_to_datapackage(&csv_dir, output.as_deref())
        }
        Commands::SchemasToExample {
            schemas,
            base,
            simple,
        } => examples::handle_schemas_to_example(&schemas, &base, simple),
        Commands::SchemasToDocExamples { schemas, output } => {
            examples::handle_schemas_to_doc_examples(&schemas, &output)
        }
        Commands::CompileSchemas {
            schemas,
            output_dir,
        } => compile::handle_compile_schemas(&schemas, &output_dir),
        Commands::Check { schemas } => check::handle_check(&schemas, config),
        Commands::DocsAll => workflow::handle_docs_all(config),
        Commands::ProfileAll {
            profile_url,
            branch,
            clean,
        } => workflow::handle_profile_all(
            &ProfileArgs {
                profile_url,
                branch,
                clean,
            },
            config,
        ),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let current_dir = std::env::current_dir()?;
    let config = ToolConfig::resolve(cli.config.as_deref(), &current_dir)?;
    debug!("Using configuration {:?}", config);

    run_command(cli.command, &config)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_profile_all() {
        let cli = Cli::parse_from([
            "hsds-schema",
            "profile-all",
            "https://github.com/acme/profile",
            "--clean",
        ]);
        match cli.command {
            Commands::ProfileAll {
                profile_url,
                branch,
                clean,
            } => {
                assert_eq!(profile_url, "https://github.com/acme/profile");
                assert_eq!(branch, "main");
                assert!(clean);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_optional_output() {
        let cli = Cli::parse_from(["hsds-schema", "schemas-to-datapackage", "schema"]);
        assert!(matches!(
            cli.command,
            Commands::SchemasToDatapackage { output: None, .. }
        ));

        let cli = Cli::parse_from([
            "hsds-schema",
            "--verbose",
            "schemas-to-example",
            "schema",
            "service",
            "--simple",
        ]);
        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Commands::SchemasToExample { simple: true, .. }
        ));
    }
}
