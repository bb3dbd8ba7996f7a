//! Core resource schema types.
//!
//! A `ResourceSchema` is owned by the schema store; the engine only borrows it
//! for the duration of one generation run.

use serde::{Deserialize, Serialize};

use super::dialect::DialectConfig;

/// Abstract, dialect-independent field type.
///
/// Adding a variant is a compile error everywhere a lowering must handle it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldType {
    ShortText,
    LongText,
    Integer,
    Float,
    Boolean,
    Timestamp,
    UniqueId,
    StructuredData,
    Email,
    Url,
    Slug,
    Color,
    Phone,
    FileRef,
    ImageRef,
    GeoPoint,
    Money,
    Enum,
    Reference,
    ReferenceCollection,
}

impl FieldType {
    pub const ALL: [FieldType; 20] = [
        FieldType::ShortText,
        FieldType::LongText,
        FieldType::Integer,
        FieldType::Float,
        FieldType::Boolean,
        FieldType::Timestamp,
        FieldType::UniqueId,
        FieldType::StructuredData,
        FieldType::Email,
        FieldType::Url,
        FieldType::Slug,
        FieldType::Color,
        FieldType::Phone,
        FieldType::FileRef,
        FieldType::ImageRef,
        FieldType::GeoPoint,
        FieldType::Money,
        FieldType::Enum,
        FieldType::Reference,
        FieldType::ReferenceCollection,
    ];

    /// Canonical spelling used in schema documents.
    pub fn name(&self) -> &'static str {
        match self {
            FieldType::ShortText => "short-text",
            FieldType::LongText => "long-text",
            FieldType::Integer => "integer",
            FieldType::Float => "float",
            FieldType::Boolean => "boolean",
            FieldType::Timestamp => "timestamp",
            FieldType::UniqueId => "unique-id",
            FieldType::StructuredData => "structured-data",
            FieldType::Email => "email",
            FieldType::Url => "url",
            FieldType::Slug => "slug",
            FieldType::Color => "color",
            FieldType::Phone => "phone",
            FieldType::FileRef => "file-ref",
            FieldType::ImageRef => "image-ref",
            FieldType::GeoPoint => "geo-point",
            FieldType::Money => "money",
            FieldType::Enum => "enum",
            FieldType::Reference => "reference",
            FieldType::ReferenceCollection => "reference-collection",
        }
    }

    /// Parse a canonical name or one of the accepted aliases.
    ///
    /// Underscores and hyphens are interchangeable and matching ignores case.
    pub fn parse(name: &str) -> Option<FieldType> {
        let key = name.trim().to_ascii_lowercase().replace('_', "-");
        let field_type = match key.as_str() {
            "short-text" | "string" => FieldType::ShortText,
            "long-text" | "text" => FieldType::LongText,
            "integer" | "int" => FieldType::Integer,
            "float" | "number" => FieldType::Float,
            "boolean" | "bool" => FieldType::Boolean,
            "timestamp" | "datetime" | "date-time" => FieldType::Timestamp,
            "unique-id" | "uuid" => FieldType::UniqueId,
            "structured-data" | "json" => FieldType::StructuredData,
            "email" => FieldType::Email,
            "url" => FieldType::Url,
            "slug" => FieldType::Slug,
            "color" => FieldType::Color,
            "phone" => FieldType::Phone,
            "file-ref" | "file" => FieldType::FileRef,
            "image-ref" | "image" => FieldType::ImageRef,
            "geo-point" | "location" => FieldType::GeoPoint,
            "money" => FieldType::Money,
            "enum" => FieldType::Enum,
            "reference" | "relation" => FieldType::Reference,
            "reference-collection" | "relation-array" => FieldType::ReferenceCollection,
            _ => return None,
        };
        Some(field_type)
    }

    /// Types stored as text and therefore subject to length bounds.
    pub fn is_text(&self) -> bool {
        matches!(
            self,
            FieldType::ShortText
                | FieldType::LongText
                | FieldType::Email
                | FieldType::Url
                | FieldType::Slug
                | FieldType::Color
                | FieldType::Phone
                | FieldType::FileRef
                | FieldType::ImageRef
                | FieldType::Enum
        )
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldType::Integer | FieldType::Float | FieldType::Money)
    }

    pub fn is_relation(&self) -> bool {
        matches!(self, FieldType::Reference | FieldType::ReferenceCollection)
    }

    /// Free-text fields that participate in search predicates.
    pub fn is_searchable(&self) -> bool {
        matches!(self, FieldType::ShortText | FieldType::LongText)
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Cardinality of a resolved relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    #[serde(alias = "one-to-one")]
    OneToOne,
    #[serde(alias = "one-to-many")]
    OneToMany,
    #[serde(alias = "many-to-many")]
    ManyToMany,
}

impl RelationKind {
    pub fn name(&self) -> &'static str {
        match self {
            RelationKind::OneToOne => "one-to-one",
            RelationKind::OneToMany => "one-to-many",
            RelationKind::ManyToMany => "many-to-many",
        }
    }
}

/// Relation settings carried by `reference` and `reference-collection` fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelationSpec {
    /// Target schema name (e.g., "User")
    pub target: String,

    /// Declared kind; derived from the field type and join table when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<RelationKind>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub foreign_key: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_key: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub join_table: Option<String>,

    /// Preload the related entity; lazy when false
    pub eager: bool,
}

/// Per-field constraints. Every member is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Constraints {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    /// Allowed values for `enum` fields
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,

    pub unique: bool,

    pub nullable: bool,

    /// Single-column index on this field
    pub index: bool,
}

/// A field of a resource schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    pub name: String,

    #[serde(rename = "type")]
    pub field_type: FieldType,

    pub display_name: String,

    pub required: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,

    pub constraints: Constraints,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub relation: Option<RelationSpec>,
}

impl Field {
    /// Minimal field with no constraints, used by tests and builders.
    pub fn new(name: &str, field_type: FieldType) -> Self {
        Self {
            name: name.to_string(),
            field_type,
            display_name: String::new(),
            required: false,
            default: None,
            constraints: Constraints::default(),
            relation: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_constraints(mut self, constraints: Constraints) -> Self {
        self.constraints = constraints;
        self
    }

    pub fn with_relation(mut self, relation: RelationSpec) -> Self {
        self.relation = Some(relation);
        self
    }

    pub fn with_default(mut self, default: serde_json::Value) -> Self {
        self.default = Some(default);
        self
    }
}

/// Schema-level index over one or more fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexDef {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub fields: Vec<String>,
    pub unique: bool,
}

/// Schema-level CHECK constraint, rendered verbatim into migrations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckConstraint {
    pub name: String,
    pub expression: String,
}

/// Output-surface settings (API framework and the like). Carried through for
/// collaborators; the lowering engine does not read it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSurface {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub framework: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_path: Option<String>,
}

/// A declarative resource description.
///
/// The store guarantees `name` and `fields` are non-empty and field names are
/// unique.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceSchema {
    pub id: String,
    pub name: String,
    pub display_name: String,
    pub description: String,
    pub version: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    pub fields: Vec<Field>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub indexes: Vec<IndexDef>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub constraints: Vec<CheckConstraint>,
    pub database: DialectConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<OutputSurface>,
}

impl ResourceSchema {
    /// Schema with the given fields and defaults everywhere else.
    pub fn new(name: &str, fields: Vec<Field>) -> Self {
        Self {
            id: name.to_lowercase(),
            name: name.to_string(),
            display_name: name.to_string(),
            description: String::new(),
            version: 1,
            created_at: None,
            updated_at: None,
            fields,
            indexes: Vec::new(),
            constraints: Vec::new(),
            database: DialectConfig::default(),
            output: None,
        }
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}
