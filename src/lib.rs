//! schema_forge library - Go backend generator for declarative resource schemas
//!
//! Lowers a resource schema (fields, constraints, relations) into the Go
//! artifacts of a REST service: model, repository, service, handler and SQL
//! migrations, for relational, document and key-value stores.

pub mod cli;
pub mod commands;
pub mod config;
pub mod emit;
pub mod enrich;
pub mod error;
pub mod lowering;
pub mod naming;
pub mod output;
pub mod schema;

pub use emit::{ArtifactKind, GenerationReport, RenderSettings, RenderedFile, emit_artifact, generate, render_artifact};
pub use enrich::{EnrichedSchema, enrich};
pub use error::{GenError, Result};
pub use naming::{NamingConventions, normalize, pluralize, singularize};
pub use schema::{DialectConfig, JsonSchemaStore, ResourceSchema, SchemaStore};

#[macro_use]
pub mod test_macros;

#[cfg(test)]
pub mod fixtures;

#[cfg(test)]
pub mod test_utils;
