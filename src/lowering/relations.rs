//! Relation resolution for `reference` and `reference-collection` fields.

use serde::Serialize;

use crate::error::{GenError, Result};
use crate::naming::{NamingConventions, go_identifier, normalize};
use crate::schema::{Field, FieldType, RelationKind, ResourceSchema};

/// Relation metadata resolved for one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedRelation {
    pub field: String,
    /// Go struct field holding the related entity (or entities)
    pub go_name: String,
    pub target: String,
    pub target_naming: NamingConventions,
    pub kind: RelationKind,
    pub foreign_key: String,
    pub foreign_key_go: String,
    pub local_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub join_table: Option<String>,
    pub eager: bool,
}

/// All relations of a schema.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolvedRelations {
    /// One entry per relation field, in field order.
    pub relations: Vec<ResolvedRelation>,
    /// Distinct target schema names, first-seen order.
    pub referenced: Vec<String>,
    /// Go field names to preload; only eager relations appear here.
    pub preloads: Vec<String>,
}

impl ResolvedRelations {
    pub fn is_empty(&self) -> bool {
        self.relations.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&ResolvedRelation> {
        self.relations.iter().find(|r| r.field == field)
    }
}

/// Foreign-key name for a relation field: the declared name, or
/// `<field>_id` in snake_case.
pub fn default_foreign_key(field: &Field) -> String {
    field
        .relation
        .as_ref()
        .and_then(|r| r.foreign_key.as_deref())
        .filter(|fk| !fk.trim().is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("{}_id", normalize(&field.name).singular.snake))
}

/// Kind implied by the field type and join-table presence, ignoring any
/// declared kind.
pub fn relation_kind_hint(field: &Field) -> RelationKind {
    let has_join_table = field
        .relation
        .as_ref()
        .is_some_and(|r| r.join_table.is_some());
    match field.field_type {
        FieldType::ReferenceCollection if has_join_table => RelationKind::ManyToMany,
        FieldType::ReferenceCollection => RelationKind::OneToMany,
        _ => RelationKind::OneToOne,
    }
}

/// Resolve every relation field of `schema`.
pub fn resolve_relations(schema: &ResourceSchema) -> Result<ResolvedRelations> {
    let mut resolved = ResolvedRelations::default();

    for field in schema.fields.iter().filter(|f| f.field_type.is_relation()) {
        let relation = resolve_field(schema, field)?;

        if !resolved.referenced.contains(&relation.target) {
            resolved.referenced.push(relation.target.clone());
        }
        if relation.eager {
            resolved.preloads.push(relation.go_name.clone());
        }
        resolved.relations.push(relation);
    }

    Ok(resolved)
}

fn resolve_field(schema: &ResourceSchema, field: &Field) -> Result<ResolvedRelation> {
    let spec = field
        .relation
        .as_ref()
        .filter(|r| !r.target.trim().is_empty())
        .ok_or_else(|| GenError::MissingRelationTarget {
            schema: schema.name.clone(),
            field: field.name.clone(),
        })?;

    if field.field_type == FieldType::Reference && spec.join_table.is_some() {
        return Err(GenError::invalid_constraint(
            &field.name,
            "a join table requires a reference-collection field",
        ));
    }

    let kind = relation_kind_hint(field);
    if let Some(declared) = spec.kind {
        if declared != kind {
            let message = match (declared, &spec.join_table) {
                (RelationKind::ManyToMany, None) => {
                    "declared many-to-many but no join table is set".to_string()
                }
                (_, Some(join_table)) => format!(
                    "join table '{}' implies many-to-many but {} was declared",
                    join_table,
                    declared.name()
                ),
                _ => format!(
                    "declared {} conflicts with {} for a {} field",
                    declared.name(),
                    kind.name(),
                    field.field_type
                ),
            };
            return Err(GenError::invalid_constraint(&field.name, message));
        }
    }

    let foreign_key = default_foreign_key(field);
    let target = spec.target.trim().to_string();

    Ok(ResolvedRelation {
        field: field.name.clone(),
        go_name: go_identifier(&field.name),
        target_naming: normalize(&target),
        target,
        kind,
        foreign_key_go: go_identifier(&foreign_key),
        foreign_key,
        local_key: spec
            .local_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .unwrap_or_else(|| "id".to_string()),
        join_table: spec.join_table.clone(),
        eager: spec.eager,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::RelationSpec;
    use rstest::rstest;

    fn reference(name: &str, target: &str) -> Field {
        Field::new(name, FieldType::Reference).with_relation(RelationSpec {
            target: target.to_string(),
            ..Default::default()
        })
    }

    fn collection(name: &str, target: &str, join_table: Option<&str>) -> Field {
        Field::new(name, FieldType::ReferenceCollection).with_relation(RelationSpec {
            target: target.to_string(),
            join_table: join_table.map(str::to_string),
            ..Default::default()
        })
    }

    #[rstest]
    fn test_reference_defaults() {
        let schema = ResourceSchema::new("Post", vec![reference("author", "User")]);
        let resolved = resolve_relations(&schema).unwrap();
        let author = resolved.get("author").unwrap();
        assert_eq!(author.foreign_key, "author_id");
        assert_eq!(author.foreign_key_go, "AuthorID");
        assert_eq!(author.kind, RelationKind::OneToOne);
        assert_eq!(author.local_key, "id");
        assert!(!author.eager);
        assert!(resolved.preloads.is_empty());
    }

    #[rstest]
    fn test_declared_foreign_key_is_kept() {
        let mut field = reference("author", "User");
        if let Some(spec) = field.relation.as_mut() {
            spec.foreign_key = Some("writer_uuid".to_string());
        }
        let schema = ResourceSchema::new("Post", vec![field]);
        let resolved = resolve_relations(&schema).unwrap();
        assert_eq!(resolved.relations[0].foreign_key, "writer_uuid");
    }

    #[rstest]
    #[case(None, RelationKind::OneToMany)]
    #[case(Some("post_tags"), RelationKind::ManyToMany)]
    fn test_collection_kind(#[case] join_table: Option<&str>, #[case] expected: RelationKind) {
        let schema = ResourceSchema::new("Post", vec![collection("tags", "Tag", join_table)]);
        let resolved = resolve_relations(&schema).unwrap();
        assert_eq!(resolved.relations[0].kind, expected);
    }

    #[rstest]
    fn test_eager_relations_become_preloads() {
        let mut author = reference("author", "User");
        if let Some(spec) = author.relation.as_mut() {
            spec.eager = true;
        }
        let schema = ResourceSchema::new("Post", vec![author, reference("editor", "User")]);
        let resolved = resolve_relations(&schema).unwrap();
        assert_eq!(resolved.preloads, vec!["Author"]);
    }

    #[rstest]
    fn test_referenced_names_are_distinct_in_first_seen_order() {
        let schema = ResourceSchema::new(
            "Post",
            vec![
                reference("author", "User"),
                collection("tags", "Tag", Some("post_tags")),
                reference("editor", "User"),
            ],
        );
        let resolved = resolve_relations(&schema).unwrap();
        assert_eq!(resolved.relations.len(), 3);
        assert_eq!(resolved.referenced, vec!["User", "Tag"]);
    }

    #[rstest]
    fn test_missing_target() {
        let schema = ResourceSchema::new("Post", vec![Field::new("author", FieldType::Reference)]);
        let err = resolve_relations(&schema).unwrap_err();
        assert!(matches!(
            err,
            GenError::MissingRelationTarget { ref schema, ref field } if schema == "Post" && field == "author"
        ));
    }

    #[rstest]
    fn test_blank_target_is_missing() {
        let schema = ResourceSchema::new("Post", vec![reference("author", "  ")]);
        let err = resolve_relations(&schema).unwrap_err();
        assert_eq!(err.kind(), "MissingRelationTarget");
    }

    #[rstest]
    fn test_declared_kind_must_agree_with_join_table() {
        let mut field = collection("tags", "Tag", Some("post_tags"));
        if let Some(spec) = field.relation.as_mut() {
            spec.kind = Some(RelationKind::OneToMany);
        }
        let schema = ResourceSchema::new("Post", vec![field]);
        let err = resolve_relations(&schema).unwrap_err();
        assert!(err.to_string().contains("implies many-to-many"));
    }

    #[rstest]
    fn test_many_to_many_without_join_table() {
        let mut field = collection("tags", "Tag", None);
        if let Some(spec) = field.relation.as_mut() {
            spec.kind = Some(RelationKind::ManyToMany);
        }
        let schema = ResourceSchema::new("Post", vec![field]);
        let err = resolve_relations(&schema).unwrap_err();
        assert!(matches!(err, GenError::InvalidConstraint { .. }));
    }

    #[rstest]
    fn test_join_table_on_single_reference() {
        let mut field = reference("author", "User");
        if let Some(spec) = field.relation.as_mut() {
            spec.join_table = Some("post_authors".to_string());
        }
        let schema = ResourceSchema::new("Post", vec![field]);
        assert!(resolve_relations(&schema).is_err());
    }

    #[rstest]
    fn test_schema_without_relations() {
        let schema = ResourceSchema::new("Post", vec![Field::new("title", FieldType::ShortText)]);
        let resolved = resolve_relations(&schema).unwrap();
        assert!(resolved.is_empty());
        assert!(resolved.referenced.is_empty());
    }
}
