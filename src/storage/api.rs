//! Upstream schema source on GitHub
//!
//! Lists the schema directory of the HSDS specification repository through
//! the GitHub contents API and downloads every JSON document in it with a
//! blocking client, one request per file. Any failure aborts the fetch.

use super::{SchemaSource, StorageError};
use crate::config::{DEFAULT_CONTENTS_URL, DEFAULT_UPSTREAM_RAW_PREFIX};
use crate::models::{DocumentSet, OPENAPI_FILE};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

const USER_AGENT: &str = concat!("hsds-schema-tools/", env!("CARGO_PKG_VERSION"));

/// One entry of a contents API listing
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ContentEntry {
    pub name: String,
    #[serde(default)]
    pub download_url: Option<String>,
}

/// Core schema set fetched from GitHub
#[derive(Debug, Clone)]
pub struct GithubSchemaSource {
    contents_url: String,
    upstream_raw_prefix: String,
    profile_raw_url: String,
}

impl GithubSchemaSource {
    /// Source that rewrites `openapi.json` to point at `profile_raw_url`
    ///
    /// # Example
    ///
    /// ```rust
    /// use hsds_schema_tools::storage::GithubSchemaSource;
    ///
    /// let source = GithubSchemaSource::new(
    ///     "https://raw.githubusercontent.com/openreferral/uk-profile/main",
    /// );
    /// ```
    pub fn new(profile_raw_url: impl Into<String>) -> Self {
        Self {
            contents_url: DEFAULT_CONTENTS_URL.to_string(),
            upstream_raw_prefix: DEFAULT_UPSTREAM_RAW_PREFIX.to_string(),
            profile_raw_url: profile_raw_url.into(),
        }
    }

    pub fn with_contents_url(mut self, contents_url: impl Into<String>) -> Self {
        self.contents_url = contents_url.into();
        self
    }

    pub fn with_upstream_raw_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.upstream_raw_prefix = prefix.into();
        self
    }

    fn client(&self) -> Result<reqwest::blocking::Client, StorageError> {
        reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| StorageError::NetworkError(format!("Failed to create HTTP client: {}", e)))
    }

    fn get_text(client: &reqwest::blocking::Client, url: &str) -> Result<String, StorageError> {
        let response = client
            .get(url)
            .send()
            .map_err(|e| StorageError::NetworkError(format!("Failed to fetch {}: {}", url, e)))?;

        if !response.status().is_success() {
            return Err(StorageError::NetworkError(format!(
                "HTTP error {} when fetching {}",
                response.status(),
                url
            )));
        }

        response.text().map_err(|e| {
            StorageError::NetworkError(format!("Failed to read response from {}: {}", url, e))
        })
    }

    /// Point the upstream `openapi.json` at the profile's raw URL
    pub fn rewrite_openapi(&self, text: &str) -> String {
        text.replace(&self.upstream_raw_prefix, &self.profile_raw_url)
    }
}

/// Downloadable `*.json` entries of a listing as `(name, url)` pairs
pub fn json_downloads(entries: &[ContentEntry]) -> Vec<(&str, &str)> {
    entries
        .iter()
        .filter(|entry| entry.name.ends_with(".json"))
        .filter_map(|entry| {
            entry
                .download_url
                .as_deref()
                .filter(|url| !url.is_empty())
                .map(|url| (entry.name.as_str(), url))
        })
        .collect()
}

impl SchemaSource for GithubSchemaSource {
    fn fetch(&self) -> Result<DocumentSet, StorageError> {
        let client = self.client()?;

        let listing = Self::get_text(&client, &self.contents_url)?;
        let entries: Vec<ContentEntry> = serde_json::from_str(&listing).map_err(|e| {
            StorageError::NetworkError(format!(
                "Malformed listing from {}: {}",
                self.contents_url, e
            ))
        })?;

        let mut documents = DocumentSet::new();
        for (name, url) in json_downloads(&entries) {
            let mut text = Self::get_text(&client, url)?;
            if name == OPENAPI_FILE {
                text = self.rewrite_openapi(&text);
            }
            let document: Value = serde_json::from_str(&text).map_err(|e| {
                StorageError::NetworkError(format!("Malformed content in {}: {}", name, e))
            })?;
            debug!("Fetched {}", name);
            documents.insert(name.to_string(), document);
        }

        info!(
            "Fetched {} document(s) from {}",
            documents.len(),
            self.contents_url
        );
        Ok(documents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_selection() {
        let entries: Vec<ContentEntry> = serde_json::from_str(
            r#"[
                {"name": "service.json", "download_url": "https://raw.example/service.json"},
                {"name": "compiled", "download_url": null},
                {"name": "README.md", "download_url": "https://raw.example/README.md"},
                {"name": "openapi.json", "download_url": "https://raw.example/openapi.json"}
            ]"#,
        )
        .unwrap();

        assert_eq!(
            json_downloads(&entries),
            vec![
                ("service.json", "https://raw.example/service.json"),
                ("openapi.json", "https://raw.example/openapi.json")
            ]
        );
    }

    #[test]
    fn test_openapi_rewrite() {
        let source = GithubSchemaSource::new("https://raw.githubusercontent.com/acme/profile/main");
        let text = r#"{"$ref": "https://raw.githubusercontent.com/openreferral/specification/3.0/schema/service.json"}"#;
        assert_eq!(
            source.rewrite_openapi(text),
            r#"{"$ref": "https://raw.githubusercontent.com/acme/profile/main/schema/service.json"}"#
        );
    }
}
