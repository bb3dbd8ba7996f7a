//! On-disk JSON shape of a schema definition.
//!
//! Field types arrive as strings and are parsed into [`FieldType`] here, the
//! single place an unrecognized type can be reported.

use serde::{Deserialize, Serialize};

use super::definition::{
    CheckConstraint, Constraints, Field, FieldType, IndexDef, OutputSurface, RelationSpec,
    ResourceSchema,
};
use super::dialect::DialectConfig;
use crate::error::GenError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaDocument {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    pub fields: Vec<FieldDocument>,
    #[serde(default)]
    pub indexes: Vec<IndexDef>,
    #[serde(default)]
    pub constraints: Vec<CheckConstraint>,
    #[serde(default)]
    pub database: DialectConfig,
    #[serde(default)]
    pub output: Option<OutputSurface>,
}

fn default_version() -> u32 {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDocument {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub default: Option<serde_json::Value>,
    #[serde(default)]
    pub constraints: Constraints,
    #[serde(default)]
    pub relation: Option<RelationSpec>,
}

impl TryFrom<SchemaDocument> for ResourceSchema {
    type Error = GenError;

    fn try_from(doc: SchemaDocument) -> Result<Self, Self::Error> {
        let schema_name = doc.name;
        let fields = doc
            .fields
            .into_iter()
            .map(|f| {
                let field_type =
                    FieldType::parse(&f.type_name).ok_or_else(|| GenError::UnknownFieldType {
                        schema: schema_name.clone(),
                        field: f.name.clone(),
                        type_name: f.type_name.clone(),
                    })?;
                Ok(Field {
                    name: f.name,
                    field_type,
                    display_name: f.display_name,
                    required: f.required,
                    default: f.default,
                    constraints: f.constraints,
                    relation: f.relation,
                })
            })
            .collect::<Result<Vec<_>, GenError>>()?;

        let id = if doc.id.is_empty() {
            schema_name.to_lowercase()
        } else {
            doc.id
        };
        let display_name = if doc.display_name.is_empty() {
            schema_name.clone()
        } else {
            doc.display_name
        };

        Ok(ResourceSchema {
            id,
            name: schema_name,
            display_name,
            description: doc.description,
            version: doc.version,
            created_at: doc.created_at,
            updated_at: doc.updated_at,
            fields,
            indexes: doc.indexes,
            constraints: doc.constraints,
            database: doc.database,
            output: doc.output,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn parse(json: &str) -> Result<ResourceSchema, GenError> {
        let doc: SchemaDocument = serde_json::from_str(json).unwrap();
        ResourceSchema::try_from(doc)
    }

    #[rstest]
    fn test_document_conversion_with_defaults() {
        let schema = parse(
            r#"{
                "name": "Post",
                "fields": [
                    {"name": "title", "type": "short-text", "required": true},
                    {"name": "author", "type": "relation", "relation": {"target": "User"}}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(schema.id, "post");
        assert_eq!(schema.display_name, "Post");
        assert_eq!(schema.version, 1);
        assert_eq!(schema.database, DialectConfig::Postgres);
        assert_eq!(schema.fields[0].field_type, FieldType::ShortText);
        assert!(schema.fields[0].required);
        assert_eq!(schema.fields[1].field_type, FieldType::Reference);
        assert_eq!(
            schema.fields[1].relation.as_ref().map(|r| r.target.as_str()),
            Some("User")
        );
    }

    #[rstest]
    fn test_unknown_field_type_fails_closed() {
        let err = parse(
            r#"{
                "name": "Post",
                "fields": [{"name": "body", "type": "richtext"}]
            }"#,
        )
        .unwrap_err();

        match err {
            GenError::UnknownFieldType {
                schema,
                field,
                type_name,
            } => {
                assert_eq!(schema, "Post");
                assert_eq!(field, "body");
                assert_eq!(type_name, "richtext");
            }
            other => panic!("Expected UnknownFieldType, got {:?}", other),
        }
    }

    #[rstest]
    fn test_constraints_and_dialect_parse() {
        let schema = parse(
            r#"{
                "name": "Product",
                "version": 3,
                "database": {"type": "mongodb", "database": "shop"},
                "fields": [
                    {"name": "sku", "type": "string", "constraints": {"unique": true, "max_length": 32}},
                    {"name": "status", "type": "enum", "constraints": {"values": ["draft", "live"]}}
                ],
                "indexes": [{"fields": ["sku", "status"], "unique": true}]
            }"#,
        )
        .unwrap();

        assert_eq!(schema.version, 3);
        assert!(!schema.database.supports_migrations());
        assert!(schema.fields[0].constraints.unique);
        assert_eq!(schema.fields[0].constraints.max_length, Some(32));
        assert_eq!(schema.fields[1].constraints.values, vec!["draft", "live"]);
        assert_eq!(schema.indexes[0].fields, vec!["sku", "status"]);
    }
}
