//! Error taxonomy for schema lowering and artifact emission.
//!
//! Lowering and relation errors are raised while enriching a schema, before
//! any file is written. `TemplateRender` and `Filesystem` can only occur while
//! emitting and abort the remaining artifacts of the run.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenError {
    #[error("Unknown field type '{type_name}' for field '{field}' in schema '{schema}'")]
    UnknownFieldType {
        schema: String,
        field: String,
        type_name: String,
    },

    #[error("Field '{field}' in schema '{schema}' is a relation without a target schema")]
    MissingRelationTarget { schema: String, field: String },

    #[error("Invalid constraint on field '{field}': {message}")]
    InvalidConstraint { field: String, message: String },

    #[error("Failed to render {artifact} template for '{schema}': {message}")]
    TemplateRender {
        artifact: String,
        schema: String,
        message: String,
    },

    #[error("Failed to write '{}': {source}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl GenError {
    /// Short, stable name of the error kind for callers that report it.
    pub fn kind(&self) -> &'static str {
        match self {
            GenError::UnknownFieldType { .. } => "UnknownFieldType",
            GenError::MissingRelationTarget { .. } => "MissingRelationTarget",
            GenError::InvalidConstraint { .. } => "InvalidConstraint",
            GenError::TemplateRender { .. } => "TemplateRenderError",
            GenError::Filesystem { .. } => "FilesystemError",
        }
    }

    pub(crate) fn invalid_constraint(field: &str, message: impl Into<String>) -> Self {
        GenError::InvalidConstraint {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, GenError>;
