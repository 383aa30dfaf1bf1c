//! Field mapping between JSON Schema properties and Table Schema fields
//!
//! This module provides functionality to:
//! - Convert one entity property into a Table Schema field (required flag,
//!   enum and tabular type override moved into their tabular places)
//! - Convert one Table Schema field back into a JSON Schema property
//!   (temporal types demoted to `string`, required flags bucketed)
//!
//! # Example
//!
//! ```rust
//! use hsds_schema_tools::mapping::{schema_field_to_table, table_field_to_schema, RequiredBucket};
//! use serde_json::json;
//!
//! let property = json!({
//!     "name": "assured_date",
//!     "type": "string",
//!     "format": "date",
//!     "datapackage_type": "date"
//! });
//!
//! let field = schema_field_to_table("assured_date", &property, true).unwrap();
//! assert_eq!(field.field_type(), Some("date"));
//!
//! let back = table_field_to_schema(&field).unwrap();
//! assert_eq!(back.property["type"], "string");
//! assert_eq!(back.bucket, RequiredBucket::Required);
//! ```

mod error;
mod field;

pub use error::{MappingError, MappingResult};
pub use field::{
    DATAPACKAGE_TYPE, RequiredBucket, SchemaField, is_tabular_key, json_schema_format,
    required_bucket, schema_field_to_table, table_field_to_schema,
};
