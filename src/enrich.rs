//! Enrichment: naming, lowering and relation resolution over one schema.
//!
//! The enriched view borrows the schema for a single generation run and is
//! the only input the emitter reads.

use std::collections::HashSet;

use serde::Serialize;

use crate::error::{GenError, Result};
use crate::lowering::{
    GEO_COMPONENTS, LoweredConstraints, ResolvedRelation, ResolvedRelations, TypeLowering,
    lower_constraints, lower_type_sized, resolve_relations,
};
use crate::naming::{NamingConventions, go_identifier, normalize};
use crate::schema::{DialectConfig, DialectFamily, Field, FieldType, ResourceSchema};

/// Column searched when a schema has no free-text field. Every generated
/// model carries it, whatever the dialect.
pub const SEARCH_FALLBACK_FIELD: &str = "id";

/// Columns every generated model carries.
pub const RESERVED_FIELDS: &[&str] = &["id", "created_at", "updated_at", "deleted_at"];

/// Struct members every generated model carries.
const RESERVED_MEMBERS: &[&str] = &["ID", "CreatedAt", "UpdatedAt", "DeletedAt"];

/// Foreign-key column backing a relational `reference` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForeignKeyColumn {
    pub column: String,
    pub go_name: String,
    pub go_type: String,
    pub annotation: String,
}

/// One field with every derived view attached.
#[derive(Debug, Clone, Serialize)]
pub struct EnrichedField<'a> {
    #[serde(skip)]
    pub source: &'a Field,
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub naming: NamingConventions,
    pub go_name: String,
    pub go_type: String,
    /// Storage column (or document key) for the field; `None` when the
    /// relation lives elsewhere (join table or the target's foreign key).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
    pub lowering: TypeLowering,
    pub constraints: LoweredConstraints,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub foreign_key: Option<ForeignKeyColumn>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relation: Option<ResolvedRelation>,
}

impl EnrichedField<'_> {
    pub fn required(&self) -> bool {
        self.source.required
    }
}

/// A searchable column and the Go field it maps to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchField {
    pub column: String,
    pub go_name: String,
}

/// Schema plus naming, lowered fields and resolved relations.
#[derive(Debug, Clone, Serialize)]
pub struct EnrichedSchema<'a> {
    #[serde(skip)]
    pub source: &'a ResourceSchema,
    pub name: String,
    pub naming: NamingConventions,
    pub dialect: DialectConfig,
    pub fields: Vec<EnrichedField<'a>>,
    pub relations: ResolvedRelations,
    /// Columns joined into the free-text search predicate.
    pub search_fields: Vec<SearchField>,
    /// True when no field was searchable and the fallback column is used.
    pub search_fallback: bool,
}

impl<'a> EnrichedSchema<'a> {
    pub fn family(&self) -> DialectFamily {
        self.dialect.family()
    }

    pub fn field(&self, name: &str) -> Option<&EnrichedField<'a>> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Enrich `schema` for `dialect`.
///
/// Pure; every lowering and relation error surfaces here, before anything is
/// written.
pub fn enrich<'a>(schema: &'a ResourceSchema, dialect: &DialectConfig) -> Result<EnrichedSchema<'a>> {
    let naming = normalize(&schema.name);

    let mut fields = Vec::with_capacity(schema.fields.len());
    for field in &schema.fields {
        fields.push(enrich_field(field, &schema.name, dialect)?);
    }
    check_collisions(&fields, dialect)?;

    let relations = resolve_relations(schema)?;
    for field in fields.iter_mut() {
        field.relation = relations.get(&field.name).cloned();
    }

    check_indexes(schema)?;

    let mut search_fields: Vec<SearchField> = fields
        .iter()
        .filter(|f| f.field_type.is_searchable())
        .filter_map(|f| {
            f.column.as_ref().map(|column| SearchField {
                column: column.clone(),
                go_name: f.go_name.clone(),
            })
        })
        .collect();
    let search_fallback = search_fields.is_empty();
    if search_fallback {
        search_fields.push(SearchField {
            column: SEARCH_FALLBACK_FIELD.to_string(),
            go_name: go_identifier(SEARCH_FALLBACK_FIELD),
        });
    }

    Ok(EnrichedSchema {
        source: schema,
        name: schema.name.clone(),
        naming,
        dialect: dialect.clone(),
        fields,
        relations,
        search_fields,
        search_fallback,
    })
}

fn enrich_field<'a>(
    field: &'a Field,
    owner: &str,
    dialect: &DialectConfig,
) -> Result<EnrichedField<'a>> {
    let naming = normalize(&field.name);
    if RESERVED_FIELDS.contains(&naming.singular.snake.as_str()) {
        return Err(GenError::invalid_constraint(
            &field.name,
            "name collides with a generated column",
        ));
    }

    let lowering = lower_type_sized(field.field_type, dialect, field.constraints.max_length);
    let constraints = lower_constraints(field, owner, dialect)?;
    let target_type = field
        .relation
        .as_ref()
        .map(|r| normalize(&r.target).singular.pascal)
        .unwrap_or_default();
    let relational = dialect.family() == DialectFamily::Relational;

    let (go_name, go_type, column, foreign_key) = match field.field_type {
        FieldType::Reference => {
            let fk = crate::lowering::default_foreign_key(field);
            let fk_go = go_identifier(&fk);
            let fk_type = lowering.primitive.go_type(&target_type);
            if relational {
                let key = ForeignKeyColumn {
                    column: fk.clone(),
                    go_name: fk_go,
                    go_type: fk_type,
                    annotation: constraints.key_annotation.clone().unwrap_or_default(),
                };
                (
                    go_identifier(&field.name),
                    format!("*{}", target_type),
                    Some(fk),
                    Some(key),
                )
            } else {
                (fk_go, fk_type, Some(fk), None)
            }
        }
        FieldType::ReferenceCollection => {
            let column = (!relational).then(|| naming.singular.snake.clone());
            (
                go_identifier(&field.name),
                lowering.primitive.go_type(&target_type),
                column,
                None,
            )
        }
        _ => (
            go_identifier(&field.name),
            lowering.primitive.go_type(&target_type),
            Some(naming.singular.snake.clone()),
            None,
        ),
    };

    Ok(EnrichedField {
        source: field,
        name: field.name.clone(),
        field_type: field.field_type,
        naming,
        go_name,
        go_type,
        column,
        lowering,
        constraints,
        foreign_key,
        relation: None,
    })
}

/// Reject fields whose normalized names land on the same storage column or
/// struct member, either with each other or with the generated ones.
fn check_collisions(fields: &[EnrichedField<'_>], dialect: &DialectConfig) -> Result<()> {
    let relational = dialect.family() == DialectFamily::Relational;
    let mut columns: HashSet<String> = RESERVED_FIELDS.iter().map(|c| c.to_string()).collect();
    let mut members: HashSet<String> = RESERVED_MEMBERS.iter().map(|m| m.to_string()).collect();

    for field in fields {
        let mut field_columns = Vec::new();
        match (&field.column, field.field_type) {
            (Some(column), FieldType::GeoPoint) if relational => {
                field_columns.extend(GEO_COMPONENTS.iter().map(|c| format!("{}_{}", column, c)));
            }
            (Some(column), _) => field_columns.push(column.clone()),
            (None, _) => {}
        }
        // A relational reference records its key column in both places
        if let Some(key) = &field.foreign_key {
            if !field_columns.contains(&key.column) {
                field_columns.push(key.column.clone());
            }
        }
        for column in field_columns {
            if !columns.insert(column.clone()) {
                return Err(GenError::invalid_constraint(
                    &field.name,
                    format!("column '{}' is already used by another field", column),
                ));
            }
        }

        let mut field_members = vec![field.go_name.clone()];
        if let Some(key) = &field.foreign_key {
            field_members.push(key.go_name.clone());
        }
        for member in field_members {
            if !members.insert(member.clone()) {
                return Err(GenError::invalid_constraint(
                    &field.name,
                    format!("struct member '{}' is already used by another field", member),
                ));
            }
        }
    }
    Ok(())
}

fn check_indexes(schema: &ResourceSchema) -> Result<()> {
    for index in &schema.indexes {
        if index.fields.is_empty() {
            return Err(GenError::invalid_constraint(
                index.name.as_deref().unwrap_or(&schema.name),
                "index has no fields",
            ));
        }
        for name in &index.fields {
            let Some(field) = schema.field(name) else {
                return Err(GenError::invalid_constraint(
                    name,
                    format!("index references unknown field in schema '{}'", schema.name),
                ));
            };
            if field.field_type == FieldType::ReferenceCollection {
                return Err(GenError::invalid_constraint(
                    name,
                    "reference-collection fields cannot be indexed",
                ));
            }
        }
    }
    Ok(())
}
