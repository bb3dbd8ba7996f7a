//! Artifact templates.
//!
//! Each artifact kind has one fixed template (`model`, `repository`,
//! `service`, `handler`, `migration`). Anything that differs per dialect lives
//! in a named sub-template behind [`DialectTemplates`], picked once per run by
//! [`templates_for`], so no artifact template branches on the dialect inline.

pub mod document;
pub mod go;
pub mod handler;
pub mod key_value;
pub mod migration;
pub mod model;
pub mod repository;
pub mod service;
pub mod sql;

use std::fmt;

use enum_dispatch::enum_dispatch;

use crate::enrich::EnrichedSchema;
use crate::lowering::FORMAT_PATTERNS;
use crate::schema::DialectConfig;

pub use document::DocumentTemplates;
pub use go::{Imports, StructField};
pub use key_value::KeyValueTemplates;
pub use sql::{SqlFlavor, SqlTemplates};

/// Dialect-specific pieces of the model and repository templates.
#[enum_dispatch]
pub trait DialectTemplates {
    /// Primary-key member of the model struct.
    fn id_field(&self) -> StructField;

    /// Members appended after the schema fields (timestamps, soft delete).
    fn trailing_fields(&self) -> Vec<StructField>;

    /// Packages the model file needs beyond its field primitives.
    fn model_imports(&self, imports: &mut Imports);

    /// Declarations following the model struct: where records live (table
    /// name, collection, key layout) and any persistence hooks.
    fn write_model_extras(&self, schema: &EnrichedSchema<'_>, out: &mut String) -> fmt::Result;

    fn repository_imports(&self, schema: &EnrichedSchema<'_>, imports: &mut Imports);

    /// Repository struct, constructor and the five operations.
    fn write_repository(&self, schema: &EnrichedSchema<'_>, out: &mut String) -> fmt::Result;

    /// Case-insensitive "contains" predicate over the search fields, joined
    /// with logical OR.
    fn search_predicate(&self, schema: &EnrichedSchema<'_>) -> String;
}

#[enum_dispatch(DialectTemplates)]
#[derive(Debug, Clone)]
pub enum Templates {
    Sql(SqlTemplates),
    Document(DocumentTemplates),
    KeyValue(KeyValueTemplates),
}

/// Sub-templates for a dialect.
pub fn templates_for(dialect: &DialectConfig) -> Templates {
    match dialect {
        DialectConfig::Postgres => SqlTemplates::new(SqlFlavor::Postgres).into(),
        DialectConfig::Mysql => SqlTemplates::new(SqlFlavor::Mysql).into(),
        DialectConfig::Sqlite => SqlTemplates::new(SqlFlavor::Sqlite).into(),
        DialectConfig::Mongodb { database } => DocumentTemplates::new(database.clone()).into(),
        DialectConfig::Redis { key_prefix } => {
            KeyValueTemplates::new(key_prefix.clone().unwrap_or_default()).into()
        }
    }
}

/// Go keywords and the package names the generated files import.
const GO_RESERVED: &[&str] = &[
    "break", "case", "chan", "const", "continue", "default", "defer", "else", "fallthrough", "for",
    "func", "go", "goto", "if", "import", "interface", "map", "package", "range", "return",
    "select", "struct", "switch", "type", "var", "bson", "context", "errors", "fmt", "gin", "gorm",
    "http", "json", "models", "mongo", "options", "redis", "regexp", "repository", "services",
    "slices", "sort", "strconv", "strings", "time", "utf8", "uuid",
];

/// Go predeclared identifiers.
const GO_PREDECLARED: &[&str] = &[
    "any", "append", "bool", "byte", "cap", "clear", "close", "comparable", "complex",
    "complex64", "complex128", "copy", "delete", "error", "false", "float32", "float64", "imag",
    "int", "int8", "int16", "int32", "int64", "iota", "len", "make", "max", "min", "new", "nil",
    "panic", "print", "println", "real", "recover", "rune", "string", "true", "uint", "uint8",
    "uint16", "uint32", "uint64", "uintptr",
];

/// Receivers, parameters and locals the templates declare next to a record
/// variable.
const TEMPLATE_LOCALS: &[&str] = &[
    "c", "client", "ctx", "cursor", "db", "end", "err", "existing", "exists", "filter", "group", "h",
    "handler", "id", "ids", "input", "key", "keys", "limit", "matched", "n", "needle", "now",
    "offset", "ok", "opts", "page", "pageSize", "pattern", "pipe", "query", "r", "raw", "record",
    "records", "removed", "repo", "result", "router", "s", "service", "start", "total", "tx",
    "value", "values",
];

/// Local variable name for a record (`post`) or a record list (`posts`).
///
/// Names that would shadow a keyword, an imported package, a predeclared
/// identifier or a template local get a `Record` suffix.
pub fn go_local(camel: &str) -> String {
    let taken = GO_RESERVED.contains(&camel)
        || GO_PREDECLARED.contains(&camel)
        || TEMPLATE_LOCALS.contains(&camel)
        || FORMAT_PATTERNS.iter().any(|(name, _)| *name == camel);
    if taken {
        format!("{}Record", camel)
    } else {
        camel.to_string()
    }
}

/// `go_local` for the singular and plural camel names of a schema.
pub(crate) fn record_vars(schema: &EnrichedSchema<'_>) -> (String, String) {
    let one = go_local(&schema.naming.singular.camel);
    let mut many = go_local(&schema.naming.plural.camel);
    if many == one {
        many = format!("{}List", one);
    }
    (one, many)
}
