//! OpenAPI 3.0 rendering of the upstream OpenAPI document

use crate::error::{SchemaError, SchemaResult};
use crate::models::OPENAPI_FILE;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Output path of the 3.0 document, relative to the docs directory
pub const OPENAPI30_FILE: &str = "extras/openapi30.json";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OpenApiLicense {
    pub name: String,
    pub url: String,
}

/// `info` block of the published OpenAPI 3.0 document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OpenApiInfo {
    pub title: String,
    pub version: String,
    pub description: String,
    pub license: OpenApiLicense,
}

impl Default for OpenApiInfo {
    fn default() -> Self {
        Self {
            title: "HSDS OpenAPI".to_string(),
            version: "3.0".to_string(),
            description: "Open API for the Human Services Data Specification. See [HSDS documentation](http://docs.openreferral.org/en/3.0/) for more details on the specification.".to_string(),
            license: OpenApiLicense {
                name: "Creative Commons Attribution Share-Alike 4.0 license".to_string(),
                url: "https://creativecommons.org/licenses/by/4.0/".to_string(),
            },
        }
    }
}

/// Downgrade an OpenAPI 3.1 document to the 3.0 header and replace its `info`.
///
/// Paths and components are carried over untouched.
pub fn openapi30(openapi: &Value, info: &OpenApiInfo) -> SchemaResult<Value> {
    let mut document = openapi
        .as_object()
        .cloned()
        .ok_or_else(|| SchemaError::shape(OPENAPI_FILE, "document is not a JSON object"))?;

    document.insert("openapi".to_string(), Value::String("3.0.0".to_string()));
    document.shift_remove("jsonSchemaDialect");
    document.insert("info".to_string(), serde_json::to_value(info)?);
    Ok(Value::Object(document))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_openapi30() {
        let source = json!({
            "openapi": "3.1.0",
            "info": {"title": "Upstream"},
            "jsonSchemaDialect": "https://json-schema.org/draft/2020-12/schema",
            "paths": {}
        });

        let converted = openapi30(&source, &OpenApiInfo::default()).unwrap();
        assert_eq!(converted["openapi"], "3.0.0");
        assert!(converted.get("jsonSchemaDialect").is_none());
        assert_eq!(converted["info"]["title"], "HSDS OpenAPI");
        let keys: Vec<&String> = converted.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["openapi", "info", "paths"]);
    }

    #[test]
    fn test_not_an_object() {
        assert!(openapi30(&json!([]), &OpenApiInfo::default()).is_err());
    }
}
