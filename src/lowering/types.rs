//! Field type lowering table.
//!
//! Maps each abstract [`FieldType`] to a Go primitive, a per-dialect storage
//! type, an interchange (OpenAPI) type and an example value. The primitive,
//! interchange type and example depend on the field type alone; only the
//! storage type also depends on the dialect.
//!
//! | Field type | Primitive | Postgres | MongoDB | Redis | Interchange |
//! |------------|-----------|----------|---------|-------|-------------|
//! | short-text | string | varchar(255) | string | string | string |
//! | integer | int64 | bigint | long | string(int64) | integer/int64 |
//! | money | float64 | numeric(19,4) | double | string(float64) | number/double |
//! | structured-data | json.RawMessage | jsonb | object | string(json) | object |
//! | geo-point | GeoPoint | 2 x double precision | object | 2 x string(float64) | object |
//! | reference | uuid.UUID | uuid | binData | string(uuid) | string/uuid |

use serde::Serialize;
use serde_json::{Value, json};

use crate::schema::{DialectConfig, DialectFamily, FieldType};

/// Target-language primitive for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Primitive {
    String,
    Int64,
    Float64,
    Bool,
    Time,
    Uuid,
    RawJson,
    /// Latitude/longitude pair
    GeoPoint,
    /// Same primitive as the target's primary key
    ForeignKey,
    /// Sequence of the related target type
    TargetSequence,
}

impl Primitive {
    /// Render the Go type. `target` is the related model's type name and is
    /// only read for `TargetSequence`.
    pub fn go_type(&self, target: &str) -> String {
        match self {
            Primitive::String => "string".to_string(),
            Primitive::Int64 => "int64".to_string(),
            Primitive::Float64 => "float64".to_string(),
            Primitive::Bool => "bool".to_string(),
            Primitive::Time => "time.Time".to_string(),
            Primitive::Uuid | Primitive::ForeignKey => "uuid.UUID".to_string(),
            Primitive::RawJson => "json.RawMessage".to_string(),
            Primitive::GeoPoint => "GeoPoint".to_string(),
            Primitive::TargetSequence => format!("[]{}", target),
        }
    }

    pub fn zero_value(&self) -> &'static str {
        match self {
            Primitive::String => "\"\"",
            Primitive::Int64 | Primitive::Float64 => "0",
            Primitive::Bool => "false",
            Primitive::Time => "time.Time{}",
            Primitive::Uuid | Primitive::ForeignKey => "uuid.Nil",
            Primitive::RawJson | Primitive::TargetSequence => "nil",
            Primitive::GeoPoint => "GeoPoint{}",
        }
    }

    /// Go import required by the primitive, if any.
    pub fn import(&self) -> Option<&'static str> {
        match self {
            Primitive::Time => Some("time"),
            Primitive::Uuid | Primitive::ForeignKey => Some("github.com/google/uuid"),
            Primitive::RawJson => Some("encoding/json"),
            _ => None,
        }
    }
}

/// OpenAPI `(type, format)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InterchangeType {
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<&'static str>,
}

const fn interchange(kind: &'static str, format: Option<&'static str>) -> InterchangeType {
    InterchangeType { kind, format }
}

/// Components of a geo-point, in column order.
pub const GEO_COMPONENTS: [&str; 2] = ["latitude", "longitude"];

/// Lowered view of one abstract type for one dialect.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeLowering {
    pub field_type: FieldType,
    pub primitive: Primitive,
    /// Storage type; `None` when the field has no column of its own
    /// (e.g. a relational reference-collection).
    pub storage: Option<String>,
    pub interchange: InterchangeType,
    pub example: Value,
    /// Sub-fields for composite types; each uses `storage` as its type.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<&'static str>,
}

/// Lower an abstract type for a dialect, without length information.
pub fn lower_type(field_type: FieldType, dialect: &DialectConfig) -> TypeLowering {
    lower_type_sized(field_type, dialect, None)
}

/// Lower an abstract type, sizing relational string columns from
/// `max_length` when present.
pub fn lower_type_sized(
    field_type: FieldType,
    dialect: &DialectConfig,
    max_length: Option<u32>,
) -> TypeLowering {
    TypeLowering {
        field_type,
        primitive: primitive(field_type),
        storage: storage_type(field_type, dialect, max_length),
        interchange: interchange_type(field_type),
        example: example_value(field_type),
        components: if field_type == FieldType::GeoPoint {
            GEO_COMPONENTS.to_vec()
        } else {
            Vec::new()
        },
    }
}

pub fn primitive(field_type: FieldType) -> Primitive {
    match field_type {
        FieldType::ShortText
        | FieldType::LongText
        | FieldType::Email
        | FieldType::Url
        | FieldType::Slug
        | FieldType::Color
        | FieldType::Phone
        | FieldType::FileRef
        | FieldType::ImageRef
        | FieldType::Enum => Primitive::String,
        FieldType::Integer => Primitive::Int64,
        FieldType::Float | FieldType::Money => Primitive::Float64,
        FieldType::Boolean => Primitive::Bool,
        FieldType::Timestamp => Primitive::Time,
        FieldType::UniqueId => Primitive::Uuid,
        FieldType::StructuredData => Primitive::RawJson,
        FieldType::GeoPoint => Primitive::GeoPoint,
        FieldType::Reference => Primitive::ForeignKey,
        FieldType::ReferenceCollection => Primitive::TargetSequence,
    }
}

/// Interchange-format type, shared with API documentation generators.
pub fn interchange_type(field_type: FieldType) -> InterchangeType {
    match field_type {
        FieldType::ShortText
        | FieldType::LongText
        | FieldType::Slug
        | FieldType::Color
        | FieldType::Enum => interchange("string", None),
        FieldType::Phone => interchange("string", Some("phone")),
        FieldType::Email => interchange("string", Some("email")),
        FieldType::Url | FieldType::FileRef | FieldType::ImageRef => {
            interchange("string", Some("uri"))
        }
        FieldType::Integer => interchange("integer", Some("int64")),
        FieldType::Float | FieldType::Money => interchange("number", Some("double")),
        FieldType::Boolean => interchange("boolean", None),
        FieldType::Timestamp => interchange("string", Some("date-time")),
        FieldType::UniqueId | FieldType::Reference => interchange("string", Some("uuid")),
        FieldType::StructuredData | FieldType::GeoPoint => interchange("object", None),
        FieldType::ReferenceCollection => interchange("array", None),
    }
}

pub fn example_value(field_type: FieldType) -> Value {
    match field_type {
        FieldType::ShortText => json!("Sample text"),
        FieldType::LongText => json!("Lorem ipsum dolor sit amet, consectetur adipiscing elit."),
        FieldType::Integer => json!(42),
        FieldType::Float => json!(12.5),
        FieldType::Money => json!(99.99),
        FieldType::Boolean => json!(true),
        FieldType::Timestamp => json!("2024-01-01T00:00:00Z"),
        FieldType::UniqueId | FieldType::Reference => {
            json!("550e8400-e29b-41d4-a716-446655440000")
        }
        FieldType::StructuredData => json!({"key": "value"}),
        FieldType::Email => json!("user@example.com"),
        FieldType::Url => json!("https://example.com"),
        FieldType::Slug => json!("sample-slug"),
        FieldType::Color => json!("#FF5733"),
        FieldType::Phone => json!("+15555550123"),
        FieldType::FileRef => json!("/uploads/document.pdf"),
        FieldType::ImageRef => json!("/uploads/image.png"),
        FieldType::GeoPoint => json!({"latitude": 40.7128, "longitude": -74.006}),
        FieldType::Enum => json!("option_a"),
        FieldType::ReferenceCollection => json!(["550e8400-e29b-41d4-a716-446655440000"]),
    }
}

/// Dialect storage type for a field type.
pub fn storage_type(
    field_type: FieldType,
    dialect: &DialectConfig,
    max_length: Option<u32>,
) -> Option<String> {
    match dialect.family() {
        DialectFamily::Relational => relational_storage(field_type, dialect, max_length),
        DialectFamily::Document => Some(document_storage(field_type).to_string()),
        DialectFamily::KeyValue => Some(key_value_storage(field_type).to_string()),
    }
}

fn relational_storage(
    field_type: FieldType,
    dialect: &DialectConfig,
    max_length: Option<u32>,
) -> Option<String> {
    let varchar = |default_len: u32| format!("varchar({})", max_length.unwrap_or(default_len));
    let by_dialect = |postgres: &str, mysql: &str, sqlite: &str| match dialect {
        DialectConfig::Mysql => mysql.to_string(),
        DialectConfig::Sqlite => sqlite.to_string(),
        _ => postgres.to_string(),
    };

    let storage = match field_type {
        FieldType::ShortText | FieldType::Email | FieldType::Slug => varchar(255),
        FieldType::LongText => match max_length {
            Some(len) => format!("varchar({})", len),
            None => "text".to_string(),
        },
        FieldType::Url => varchar(2048),
        FieldType::Color => varchar(7),
        FieldType::Phone => varchar(32),
        FieldType::FileRef | FieldType::ImageRef => varchar(1024),
        FieldType::Enum => varchar(50),
        FieldType::Integer => by_dialect("bigint", "bigint", "integer"),
        FieldType::Float | FieldType::GeoPoint => by_dialect("double precision", "double", "real"),
        FieldType::Money => by_dialect("numeric(19,4)", "decimal(19,4)", "numeric"),
        FieldType::Boolean => by_dialect("boolean", "tinyint(1)", "integer"),
        FieldType::Timestamp => by_dialect("timestamptz", "datetime(3)", "datetime"),
        FieldType::UniqueId | FieldType::Reference => by_dialect("uuid", "char(36)", "text"),
        FieldType::StructuredData => by_dialect("jsonb", "json", "json"),
        FieldType::ReferenceCollection => return None,
    };
    Some(storage)
}

fn document_storage(field_type: FieldType) -> &'static str {
    match field_type {
        FieldType::ShortText
        | FieldType::LongText
        | FieldType::Email
        | FieldType::Url
        | FieldType::Slug
        | FieldType::Color
        | FieldType::Phone
        | FieldType::FileRef
        | FieldType::ImageRef
        | FieldType::Enum => "string",
        FieldType::Integer => "long",
        FieldType::Float | FieldType::Money => "double",
        FieldType::Boolean => "bool",
        FieldType::Timestamp => "date",
        FieldType::UniqueId | FieldType::Reference => "binData",
        FieldType::StructuredData | FieldType::GeoPoint => "object",
        FieldType::ReferenceCollection => "array",
    }
}

fn key_value_storage(field_type: FieldType) -> &'static str {
    match field_type {
        FieldType::ShortText
        | FieldType::LongText
        | FieldType::Email
        | FieldType::Url
        | FieldType::Slug
        | FieldType::Color
        | FieldType::Phone
        | FieldType::FileRef
        | FieldType::ImageRef
        | FieldType::Enum => "string",
        FieldType::Integer => "string(int64)",
        FieldType::Float | FieldType::Money | FieldType::GeoPoint => "string(float64)",
        FieldType::Boolean => "string(bool)",
        FieldType::Timestamp => "string(rfc3339)",
        FieldType::UniqueId | FieldType::Reference => "string(uuid)",
        FieldType::StructuredData | FieldType::ReferenceCollection => "string(json)",
    }
}
