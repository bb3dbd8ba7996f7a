//! Read-only schema store over a directory of JSON schema documents.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::definition::ResourceSchema;
use super::document::SchemaDocument;
use crate::error::GenError;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Schema not found: {key}")]
    NotFound { key: String },

    #[error("Failed to read schema directory '{path}': {message}")]
    ReadFailed { path: String, message: String },

    #[error("Invalid JSON in schema file '{path}': {message}")]
    ParseFailed { path: String, message: String },

    #[error("Schema '{schema}' is invalid: {message}")]
    InvalidSchema { schema: String, message: String },

    #[error(transparent)]
    Lowering(#[from] GenError),
}

/// Source of resource schemas.
///
/// Implementations return schemas that already satisfy the data model
/// invariants; the engine does not check them again.
pub trait SchemaStore {
    fn load(&self, id: &str) -> Result<ResourceSchema, StoreError>;

    fn load_by_name(&self, name: &str) -> Result<ResourceSchema, StoreError>;
}

/// Store backed by `*.json` files in a single directory.
#[derive(Debug, Clone)]
pub struct JsonSchemaStore {
    dir: PathBuf,
}

impl JsonSchemaStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Parse a single schema document from a JSON string.
    pub fn parse_str(content: &str, origin: &str) -> Result<ResourceSchema, StoreError> {
        let doc: SchemaDocument =
            serde_json::from_str(content).map_err(|e| StoreError::ParseFailed {
                path: origin.to_string(),
                message: e.to_string(),
            })?;
        let schema = ResourceSchema::try_from(doc)?;
        check_invariants(&schema)?;
        Ok(schema)
    }

    fn schema_files(&self) -> Result<Vec<PathBuf>, StoreError> {
        let entries = fs::read_dir(&self.dir).map_err(|e| StoreError::ReadFailed {
            path: self.dir.display().to_string(),
            message: e.to_string(),
        })?;

        let mut files: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
            .collect();
        // Directory order is platform dependent
        files.sort();
        Ok(files)
    }

    fn read_schema(path: &Path) -> Result<ResourceSchema, StoreError> {
        let content = fs::read_to_string(path).map_err(|e| StoreError::ReadFailed {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::parse_str(&content, &path.display().to_string())
    }

    fn find(
        &self,
        key: &str,
        matches: impl Fn(&ResourceSchema) -> bool,
    ) -> Result<ResourceSchema, StoreError> {
        let mut broken = None;
        for path in self.schema_files()? {
            match Self::read_schema(&path) {
                Ok(schema) if matches(&schema) => return Ok(schema),
                Ok(_) => {}
                // A broken file only matters if it was the one asked for
                Err(err) if broken.is_none() && stem_matches(&path, key) => broken = Some(err),
                Err(_) => {}
            }
        }
        Err(broken.unwrap_or_else(|| StoreError::NotFound {
            key: key.to_string(),
        }))
    }
}

impl SchemaStore for JsonSchemaStore {
    fn load(&self, id: &str) -> Result<ResourceSchema, StoreError> {
        self.find(id, |schema| schema.id == id)
    }

    fn load_by_name(&self, name: &str) -> Result<ResourceSchema, StoreError> {
        self.find(name, |schema| schema.name.eq_ignore_ascii_case(name))
    }
}

fn stem_matches(path: &Path, key: &str) -> bool {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .is_some_and(|stem| stem.eq_ignore_ascii_case(key))
}

fn check_invariants(schema: &ResourceSchema) -> Result<(), StoreError> {
    let invalid = |message: &str| StoreError::InvalidSchema {
        schema: schema.name.clone(),
        message: message.to_string(),
    };

    if schema.name.trim().is_empty() {
        return Err(invalid("name must not be empty"));
    }
    if schema.fields.is_empty() {
        return Err(invalid("schema must define at least one field"));
    }

    let mut seen = HashSet::new();
    for field in &schema.fields {
        if field.name.trim().is_empty() {
            return Err(invalid("field names must not be empty"));
        }
        if !seen.insert(field.name.as_str()) {
            return Err(invalid(&format!("duplicate field name '{}'", field.name)));
        }
    }
    Ok(())
}
