//! Resource schema definitions.
//!
//! # Overview
//!
//! 1. **Core Types** (`definition.rs`):
//!    - `ResourceSchema` - identity, ordered fields, indexes, dialect config
//!    - `Field` / `FieldType` - a typed field and the closed set of abstract types
//!    - `Constraints` / `RelationSpec` - per-field validation and relation settings
//!
//! 2. **Dialects** (`dialect.rs`): `DialectConfig`, the closed set of storage
//!    dialects, grouped into relational, document and key-value families.
//!
//! 3. **Documents and storage** (`document.rs`, `store.rs`): the JSON shape of
//!    a schema file and a read-only directory store implementing `SchemaStore`.

mod definition;
mod dialect;
mod document;
mod store;

pub use definition::{
    CheckConstraint, Constraints, Field, FieldType, IndexDef, OutputSurface, RelationKind,
    RelationSpec, ResourceSchema,
};
pub use dialect::{DialectConfig, DialectFamily, DialectName};
pub use document::{FieldDocument, SchemaDocument};
pub use store::{JsonSchemaStore, SchemaStore, StoreError};
