//! File system storage
//!
//! Synchronous reads and writes of schema directories, data package
//! descriptors and CSV tables. Relative paths resolve against `base_path`;
//! absolute paths are used as given.

use super::{SchemaSource, StorageError};
use crate::error::SchemaResult;
use crate::models::{DataPackage, DocumentSet, EntitySet, MetadataTables};
use serde::Serialize;
use serde_json::Value;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Indent of published `datapackage.json` descriptors
pub const DATAPACKAGE_INDENT: usize = 4;

/// Render `value` as pretty JSON with `indent` spaces per level
pub fn pretty_json<T: Serialize + ?Sized>(value: &T, indent: usize) -> Result<String, StorageError> {
    let indent = " ".repeat(indent);
    let mut buffer = Vec::new();
    let mut serializer =
        Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(indent.as_bytes()));
    value
        .serialize(&mut serializer)
        .map_err(|e| StorageError::SerializationError(format!("Failed to serialize JSON: {}", e)))?;
    String::from_utf8(buffer)
        .map_err(|e| StorageError::SerializationError(format!("Invalid UTF-8 in JSON: {}", e)))
}

/// File system storage rooted at a base directory
#[derive(Debug, Clone)]
pub struct FileSystemStorage {
    base_path: PathBuf,
}

impl FileSystemStorage {
    /// Create a storage rooted at `base_path`
    ///
    /// # Example
    ///
    /// ```rust
    /// use hsds_schema_tools::storage::FileSystemStorage;
    ///
    /// let storage = FileSystemStorage::new("/workspace/hsds");
    /// assert!(storage.resolve("schema").ends_with("schema"));
    /// ```
    pub fn new(base_path: impl AsRef<Path>) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    /// Storage rooted at the current directory
    pub fn current_dir() -> Self {
        Self::new(".")
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        self.base_path.join(path)
    }

    pub fn exists(&self, path: impl AsRef<Path>) -> bool {
        self.resolve(path).exists()
    }

    pub fn read_text(&self, path: impl AsRef<Path>) -> Result<String, StorageError> {
        let full_path = self.resolve(path);
        fs::read_to_string(&full_path).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                StorageError::FileNotFound(full_path.display().to_string())
            } else {
                StorageError::IoError(format!("Failed to read file {}: {}", full_path.display(), e))
            }
        })
    }

    pub fn read_json(&self, path: impl AsRef<Path>) -> Result<Value, StorageError> {
        let path = path.as_ref();
        let content = self.read_text(path)?;
        serde_json::from_str(&content).map_err(|e| {
            StorageError::SerializationError(format!(
                "Failed to parse JSON in {}: {}",
                path.display(),
                e
            ))
        })
    }

    /// Every `*.json` file directly inside `dir`, keyed by file name
    pub fn read_documents(&self, dir: impl AsRef<Path>) -> Result<DocumentSet, StorageError> {
        let dir = self.resolve(dir);
        let mut documents = DocumentSet::new();
        for path in self.list_files(&dir)? {
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            let Some(file_name) = path.file_name().and_then(|name| name.to_str()) else {
                continue;
            };
            let document = self.read_json(&path)?;
            debug!("Read {}", path.display());
            documents.insert(file_name.to_string(), document);
        }
        info!("Read {} document(s) from {}", documents.len(), dir.display());
        Ok(documents)
    }

    /// Parse a schema directory into an entity set
    pub fn read_entity_set(&self, dir: impl AsRef<Path>) -> SchemaResult<EntitySet> {
        let documents = self.read_documents(dir)?;
        EntitySet::from_documents(&documents)
    }

    pub fn write_text(&self, path: impl AsRef<Path>, content: &str) -> Result<(), StorageError> {
        let full_path = self.resolve(path);
        if let Some(parent) = full_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| {
                StorageError::IoError(format!(
                    "Failed to create directory for {}: {}",
                    full_path.display(),
                    e
                ))
            })?;
        }
        fs::write(&full_path, content).map_err(|e| {
            StorageError::IoError(format!("Failed to write file {}: {}", full_path.display(), e))
        })?;
        debug!("Wrote {}", full_path.display());
        Ok(())
    }

    /// Write 2-space indented JSON
    pub fn write_json<T: Serialize + ?Sized>(
        &self,
        path: impl AsRef<Path>,
        value: &T,
    ) -> Result<(), StorageError> {
        self.write_json_with_indent(path, value, 2)
    }

    pub fn write_json_with_indent<T: Serialize + ?Sized>(
        &self,
        path: impl AsRef<Path>,
        value: &T,
        indent: usize,
    ) -> Result<(), StorageError> {
        self.write_text(path, &pretty_json(value, indent)?)
    }

    /// Write a data package descriptor with [`DATAPACKAGE_INDENT`]
    pub fn write_datapackage(
        &self,
        path: impl AsRef<Path>,
        package: &DataPackage,
    ) -> Result<(), StorageError> {
        self.write_json_with_indent(path, package, DATAPACKAGE_INDENT)
    }

    /// Write each document to `dir/<file name>`
    pub fn write_documents(
        &self,
        dir: impl AsRef<Path>,
        documents: &DocumentSet,
    ) -> Result<(), StorageError> {
        let dir = dir.as_ref();
        for (file_name, document) in documents.iter() {
            self.write_json(dir.join(file_name), document)?;
        }
        info!("Wrote {} document(s) to {}", documents.len(), self.resolve(dir).display());
        Ok(())
    }

    pub fn ensure_dir(&self, dir: impl AsRef<Path>) -> Result<(), StorageError> {
        let full_path = self.resolve(dir);
        fs::create_dir_all(&full_path).map_err(|e| {
            StorageError::IoError(format!(
                "Failed to create directory {}: {}",
                full_path.display(),
                e
            ))
        })
    }

    /// Delete the regular files directly inside `dir`; subdirectories stay.
    /// A missing directory has nothing to clean.
    pub fn clean_dir(&self, dir: impl AsRef<Path>) -> Result<(), StorageError> {
        let full_path = self.resolve(dir);
        if !full_path.exists() {
            return Ok(());
        }
        let files = self.list_files(&full_path)?;
        for file in &files {
            fs::remove_file(file).map_err(|e| {
                StorageError::IoError(format!("Failed to remove {}: {}", file.display(), e))
            })?;
        }
        info!("Cleaned {} file(s) from {}", files.len(), full_path.display());
        Ok(())
    }

    pub fn read_metadata_tables(&self, dir: impl AsRef<Path>) -> Result<MetadataTables, StorageError> {
        let dir = dir.as_ref();
        Ok(MetadataTables {
            package: self.read_text(dir.join(MetadataTables::PACKAGE_FILE))?,
            tables: self.read_text(dir.join(MetadataTables::TABLES_FILE))?,
            fields: self.read_text(dir.join(MetadataTables::FIELDS_FILE))?,
            foreign_keys: self.read_text(dir.join(MetadataTables::FOREIGN_KEYS_FILE))?,
        })
    }

    pub fn write_metadata_tables(
        &self,
        dir: impl AsRef<Path>,
        tables: &MetadataTables,
    ) -> Result<(), StorageError> {
        let dir = dir.as_ref();
        for (file_name, content) in tables.files() {
            self.write_text(dir.join(file_name), content)?;
        }
        Ok(())
    }

    /// Regular files directly inside an already resolved directory, sorted
    fn list_files(&self, dir: &Path) -> Result<Vec<PathBuf>, StorageError> {
        let read_dir = fs::read_dir(dir).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                StorageError::DirectoryNotFound(dir.display().to_string())
            } else {
                StorageError::IoError(format!("Failed to read directory {}: {}", dir.display(), e))
            }
        })?;

        let mut files = Vec::new();
        for entry in read_dir {
            let entry = entry.map_err(|e| {
                StorageError::IoError(format!("Failed to read directory entry: {}", e))
            })?;
            if let Ok(file_type) = entry.file_type()
                && file_type.is_file()
            {
                files.push(entry.path());
            }
        }
        files.sort();
        Ok(files)
    }
}

/// Core schema set read from a local directory
#[derive(Debug, Clone)]
pub struct DirectorySchemaSource {
    path: PathBuf,
}

impl DirectorySchemaSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl SchemaSource for DirectorySchemaSource {
    fn fetch(&self) -> Result<DocumentSet, StorageError> {
        FileSystemStorage::new(&self.path).read_documents("")
    }
}
