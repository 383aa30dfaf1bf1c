//! Flat CSV rendering of a data package descriptor

/// The four CSV documents a data package flattens into
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetadataTables {
    /// Package-level metadata, one row
    pub package: String,
    /// One row per resource
    pub tables: String,
    /// One row per field, keyed by `table_name`
    pub fields: String,
    /// One row per foreign key, keyed by `table_name`
    pub foreign_keys: String,
}

impl MetadataTables {
    pub const PACKAGE_FILE: &'static str = "package.csv";
    pub const TABLES_FILE: &'static str = "tables.csv";
    pub const FIELDS_FILE: &'static str = "fields.csv";
    pub const FOREIGN_KEYS_FILE: &'static str = "foreign_keys.csv";

    /// `(file name, contents)` pairs in writing order
    pub fn files(&self) -> [(&'static str, &str); 4] {
        [
            (Self::PACKAGE_FILE, self.package.as_str()),
            (Self::TABLES_FILE, self.tables.as_str()),
            (Self::FIELDS_FILE, self.fields.as_str()),
            (Self::FOREIGN_KEYS_FILE, self.foreign_keys.as_str()),
        ]
    }
}
