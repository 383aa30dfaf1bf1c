//! Tool configuration
//!
//! Every setting has a default reproducing the HSDS 3.0 constants, so a
//! config file only needs the keys it changes:
//!
//! ```toml
//! seeds = ["organization", "service"]
//!
//! [paths]
//! docs = "site"
//!
//! [package]
//! name = "my_profile"
//! ```

use crate::export::OpenApiInfo;
use crate::graph::DEFAULT_SEEDS;
use crate::models::PackageMetadata;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// File looked up in the working directory
pub const CONFIG_FILE: &str = "hsds-schema.toml";

/// Environment variable naming an explicit config file
pub const CONFIG_ENV: &str = "HSDS_SCHEMA_CONFIG";

/// Subdirectory of an examples directory holding the CSV examples
pub const CSV_EXAMPLES_DIR: &str = "csv";

/// GitHub contents API listing of the upstream core schema directory
pub const DEFAULT_CONTENTS_URL: &str =
    "https://api.github.com/repos/openreferral/specification/contents/schema?ref=3.0";

/// Raw-content prefix the upstream `openapi.json` points its schemas at
pub const DEFAULT_UPSTREAM_RAW_PREFIX: &str =
    "https://raw.githubusercontent.com/openreferral/specification/3.0";

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {message}")]
    Read { path: String, message: String },

    #[error("Failed to parse config file '{path}': {message}")]
    Parse { path: String, message: String },
}

/// Working directories of the `docs-all` and `profile-all` workflows
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WorkspacePaths {
    pub schema: PathBuf,
    pub profile: PathBuf,
    pub docs: PathBuf,
    pub examples: PathBuf,
    pub datapackage: PathBuf,
}

impl Default for WorkspacePaths {
    fn default() -> Self {
        Self {
            schema: PathBuf::from("schema"),
            profile: PathBuf::from("profile"),
            docs: PathBuf::from("docs"),
            examples: PathBuf::from("examples"),
            datapackage: PathBuf::from("datapackage.json"),
        }
    }
}

impl WorkspacePaths {
    /// Output directory of the compiled schemas
    pub fn compiled(&self) -> PathBuf {
        self.schema.join("compiled")
    }

    /// Output directory of the CSV examples
    pub fn csv_examples(&self) -> PathBuf {
        self.examples.join(CSV_EXAMPLES_DIR)
    }
}

/// Settings shared by all commands
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ToolConfig {
    pub upstream_contents_url: String,
    pub upstream_raw_prefix: String,
    /// Entities the table-to-schema walk starts from, in priority order
    pub seeds: Vec<String>,
    pub package: PackageMetadata,
    pub openapi_info: OpenApiInfo,
    pub paths: WorkspacePaths,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            upstream_contents_url: DEFAULT_CONTENTS_URL.to_string(),
            upstream_raw_prefix: DEFAULT_UPSTREAM_RAW_PREFIX.to_string(),
            seeds: DEFAULT_SEEDS.iter().map(|seed| seed.to_string()).collect(),
            package: PackageMetadata::default(),
            openapi_info: OpenApiInfo::default(),
            paths: WorkspacePaths::default(),
        }
    }
}

impl ToolConfig {
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load configuration from a specific file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let config = Self::from_toml(&content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Config file to use from `dir`: `$HSDS_SCHEMA_CONFIG` first, then
    /// `hsds-schema.toml` if it exists
    pub fn discover(dir: &Path) -> Option<PathBuf> {
        if let Some(explicit) = std::env::var_os(CONFIG_ENV) {
            return Some(PathBuf::from(explicit));
        }
        let candidate = dir.join(CONFIG_FILE);
        candidate.is_file().then_some(candidate)
    }

    /// Load the explicit path, or the discovered file, or the defaults
    pub fn resolve(explicit: Option<&Path>, dir: &Path) -> Result<Self, ConfigError> {
        match explicit
            .map(Path::to_path_buf)
            .or_else(|| Self::discover(dir))
        {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }
}
