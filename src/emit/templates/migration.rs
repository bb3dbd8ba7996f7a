//! Migration artifact: up/down SQL scripts for relational dialects.
//!
//! Statements are collected in creation order; the down script replays them
//! in reverse.

use std::fmt::{self, Write};

use serde_json::Value;

use super::sql::SqlFlavor;
use crate::enrich::{EnrichedField, EnrichedSchema};
use crate::lowering::{GEO_COMPONENTS, ResolvedRelation, format_number};
use crate::naming::normalize;
use crate::schema::{FieldType, RelationKind};

const HEADER: &str = "-- Code generated by schema_forge. DO NOT EDIT.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationScripts {
    pub up: String,
    pub down: String,
}

/// A created object and the statement that removes it again.
struct Step {
    create: String,
    drop: String,
}

pub fn render(schema: &EnrichedSchema<'_>, flavor: SqlFlavor) -> Result<MigrationScripts, fmt::Error> {
    let table = &schema.naming.table;
    let mut steps = vec![Step {
        create: create_table(schema, flavor)?,
        drop: format!("DROP TABLE IF EXISTS {};", flavor.quote_ident(table)),
    }];

    for (name, columns, unique) in indexes(schema) {
        steps.push(index_step(flavor, table, &name, &columns, unique));
    }

    for relation in schema
        .relations
        .relations
        .iter()
        .filter(|r| r.kind == RelationKind::ManyToMany)
    {
        if let Some(step) = join_table_step(schema, relation, flavor)? {
            steps.push(step);
        }
    }

    let mut up = String::new();
    writeln!(up, "{}", HEADER)?;
    writeln!(up, "-- {} (version {})", schema.name, schema.source.version)?;
    for step in &steps {
        writeln!(up)?;
        writeln!(up, "{}", step.create)?;
    }

    let mut down = String::new();
    writeln!(down, "{}", HEADER)?;
    writeln!(down)?;
    for step in steps.iter().rev() {
        writeln!(down, "{}", step.drop)?;
    }

    Ok(MigrationScripts { up, down })
}

/// Up and down file names, relative to the migrations directory.
pub fn file_names(schema: &EnrichedSchema<'_>) -> (String, String) {
    let stem = format!("{:06}_create_{}", schema.source.version, schema.naming.table);
    (format!("{}.up.sql", stem), format!("{}.down.sql", stem))
}

fn create_table(schema: &EnrichedSchema<'_>, flavor: SqlFlavor) -> Result<String, fmt::Error> {
    let q = |ident: &str| flavor.quote_ident(ident);
    let table = &schema.naming.table;
    let timestamp = flavor.timestamp_type();

    let mut lines = vec![format!("{} {} PRIMARY KEY", q("id"), flavor.key_type())];
    let mut trailing = Vec::new();

    for field in &schema.fields {
        lines.extend(field_columns(field, flavor));

        if let (Some(key), Some(relation)) = (&field.foreign_key, &field.relation) {
            trailing.push(format!(
                "CONSTRAINT {} FOREIGN KEY ({}) REFERENCES {} ({})",
                q(&format!("fk_{}_{}", table, field.naming.singular.snake)),
                q(&key.column),
                q(&relation.target_naming.table),
                q(&relation.local_key)
            ));
        }
    }

    lines.push(format!(
        "{} {} NOT NULL DEFAULT {}",
        q("created_at"),
        timestamp,
        flavor.current_timestamp()
    ));
    lines.push(format!(
        "{} {} NOT NULL DEFAULT {}",
        q("updated_at"),
        timestamp,
        flavor.current_timestamp()
    ));
    lines.push(format!("{} {}", q("deleted_at"), timestamp));

    for check in &schema.source.constraints {
        trailing.push(format!("CONSTRAINT {} CHECK ({})", q(&check.name), check.expression));
    }
    lines.extend(trailing);

    let mut out = String::new();
    writeln!(out, "CREATE TABLE IF NOT EXISTS {} (", q(table))?;
    let body = lines
        .iter()
        .map(|line| format!("    {}", line))
        .collect::<Vec<_>>()
        .join(",\n");
    writeln!(out, "{}", body)?;
    write!(out, ");")?;
    Ok(out)
}

fn field_columns(field: &EnrichedField<'_>, flavor: SqlFlavor) -> Vec<String> {
    let q = |ident: &str| flavor.quote_ident(ident);
    let constraints = &field.source.constraints;
    let not_null = field.required() && !constraints.nullable;

    match field.field_type {
        FieldType::ReferenceCollection => Vec::new(),
        FieldType::GeoPoint => {
            let storage = field.lowering.storage.clone().unwrap_or_default();
            let base = field.naming.singular.snake.clone();
            GEO_COMPONENTS
                .iter()
                .map(|component| {
                    let mut column = format!("{} {}", q(&format!("{}_{}", base, component)), storage);
                    if not_null {
                        column.push_str(" NOT NULL");
                    }
                    column
                })
                .collect()
        }
        _ => {
            let Some(name) = &field.column else {
                return Vec::new();
            };
            let storage = match field.field_type {
                FieldType::Reference => flavor.key_type(),
                _ => field.lowering.storage.clone().unwrap_or_default(),
            };

            let mut column = format!("{} {}", q(name), storage);
            if not_null {
                column.push_str(" NOT NULL");
            }
            if constraints.unique {
                column.push_str(" UNIQUE");
            }
            if let Some(default) = &field.source.default {
                column.push_str(&format!(" DEFAULT {}", sql_literal(default, flavor)));
            }
            if field.field_type == FieldType::Enum && !constraints.values.is_empty() {
                let values = constraints
                    .values
                    .iter()
                    .map(|v| quote_string(v))
                    .collect::<Vec<_>>()
                    .join(", ");
                column.push_str(&format!(" CHECK ({} IN ({}))", q(name), values));
            }
            vec![column]
        }
    }
}

/// Secondary indexes: foreign keys, flagged fields, then declared indexes.
fn indexes(schema: &EnrichedSchema<'_>) -> Vec<(String, Vec<String>, bool)> {
    let table = &schema.naming.table;
    let mut out: Vec<(String, Vec<String>, bool)> = Vec::new();
    let named = |columns: &[String]| format!("idx_{}_{}", table, columns.join("_"));

    for field in &schema.fields {
        let columns: Vec<String> = match (&field.foreign_key, field.field_type) {
            (Some(key), _) => vec![key.column.clone()],
            (None, FieldType::ReferenceCollection) => continue,
            (None, FieldType::GeoPoint) if field.source.constraints.index => GEO_COMPONENTS
                .iter()
                .map(|c| format!("{}_{}", field.naming.singular.snake, c))
                .collect(),
            (None, _) if field.source.constraints.index && !field.source.constraints.unique => {
                field.column.iter().cloned().collect()
            }
            _ => continue,
        };
        if !columns.is_empty() {
            out.push((named(&columns), columns, false));
        }
    }

    out.push((named(&["deleted_at".to_string()]), vec!["deleted_at".to_string()], false));

    for index in &schema.source.indexes {
        let columns: Vec<String> = index
            .fields
            .iter()
            .filter_map(|name| schema.field(name))
            .flat_map(index_columns)
            .collect();
        if columns.is_empty() {
            continue;
        }
        let name = index.name.clone().unwrap_or_else(|| named(&columns));
        out.push((name, columns, index.unique));
    }

    out
}

fn index_columns(field: &EnrichedField<'_>) -> Vec<String> {
    if field.field_type == FieldType::GeoPoint {
        return GEO_COMPONENTS
            .iter()
            .map(|c| format!("{}_{}", field.naming.singular.snake, c))
            .collect();
    }
    field.column.iter().cloned().collect()
}

fn index_step(flavor: SqlFlavor, table: &str, name: &str, columns: &[String], unique: bool) -> Step {
    let q = |ident: &str| flavor.quote_ident(ident);
    let kind = if unique { "UNIQUE INDEX" } else { "INDEX" };
    let columns = columns.iter().map(|c| q(c)).collect::<Vec<_>>().join(", ");

    let (create, drop) = if flavor.index_if_not_exists() {
        (
            format!("CREATE {} IF NOT EXISTS {} ON {} ({});", kind, q(name), q(table), columns),
            format!("DROP INDEX IF EXISTS {};", q(name)),
        )
    } else {
        (
            format!("CREATE {} {} ON {} ({});", kind, q(name), q(table), columns),
            format!("DROP INDEX {} ON {};", q(name), q(table)),
        )
    };
    Step { create, drop }
}

fn join_table_step(
    schema: &EnrichedSchema<'_>,
    relation: &ResolvedRelation,
    flavor: SqlFlavor,
) -> Result<Option<Step>, fmt::Error> {
    let Some(join_table) = &relation.join_table else {
        return Ok(None);
    };
    let q = |ident: &str| flavor.quote_ident(ident);
    let key_type = flavor.key_type();

    let owner_column = format!("{}_id", schema.naming.singular.snake);
    let mut target_column = format!("{}_id", relation.target_naming.singular.snake);
    if target_column == owner_column {
        // Self-referencing: name the far side after the field
        target_column = format!("{}_id", normalize(&relation.field).singular.snake);
    }

    let mut out = String::new();
    writeln!(out, "CREATE TABLE IF NOT EXISTS {} (", q(join_table))?;
    writeln!(out, "    {} {} NOT NULL,", q(&owner_column), key_type)?;
    writeln!(out, "    {} {} NOT NULL,", q(&target_column), key_type)?;
    writeln!(out, "    PRIMARY KEY ({}, {}),", q(&owner_column), q(&target_column))?;
    writeln!(
        out,
        "    CONSTRAINT {} FOREIGN KEY ({}) REFERENCES {} ({}) ON DELETE CASCADE,",
        q(&format!("fk_{}_{}", join_table, owner_column.trim_end_matches("_id"))),
        q(&owner_column),
        q(&schema.naming.table),
        q("id")
    )?;
    writeln!(
        out,
        "    CONSTRAINT {} FOREIGN KEY ({}) REFERENCES {} ({}) ON DELETE CASCADE",
        q(&format!("fk_{}_{}", join_table, target_column.trim_end_matches("_id"))),
        q(&target_column),
        q(&relation.target_naming.table),
        q(&relation.local_key)
    )?;
    write!(out, ");")?;

    Ok(Some(Step {
        create: out,
        drop: format!("DROP TABLE IF EXISTS {};", q(join_table)),
    }))
}

fn quote_string(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

fn sql_literal(value: &Value, flavor: SqlFlavor) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Bool(b) => flavor.bool_literal(*b).to_string(),
        Value::Number(n) => n
            .as_f64()
            .map(format_number)
            .unwrap_or_else(|| n.to_string()),
        Value::String(s) => quote_string(s),
        other => quote_string(&other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrich::enrich;
    use crate::schema::{
        CheckConstraint, Constraints, DialectConfig, Field, IndexDef, RelationSpec, ResourceSchema,
    };
    use rstest::{fixture, rstest};
    use serde_json::json;

    #[fixture]
    fn post() -> ResourceSchema {
        ResourceSchema::new(
            "Post",
            vec![
                Field::new("title", FieldType::ShortText)
                    .required()
                    .with_constraints(Constraints {
                        max_length: Some(200),
                        ..Default::default()
                    }),
                Field::new("slug", FieldType::Slug).with_constraints(Constraints {
                    unique: true,
                    ..Default::default()
                }),
                Field::new("author", FieldType::Reference).with_relation(RelationSpec {
                    target: "User".to_string(),
                    ..Default::default()
                }),
                Field::new("status", FieldType::Enum)
                    .with_default(json!("draft"))
                    .with_constraints(Constraints {
                        values: vec!["draft".to_string(), "published".to_string()],
                        ..Default::default()
                    }),
            ],
        )
    }

    #[rstest]
    fn test_postgres_create_table(post: ResourceSchema) {
        let enriched = enrich(&post, &DialectConfig::Postgres).unwrap();
        let scripts = render(&enriched, SqlFlavor::Postgres).unwrap();

        let expected_table = r#"CREATE TABLE IF NOT EXISTS "posts" (
    "id" uuid PRIMARY KEY,
    "title" varchar(200) NOT NULL,
    "slug" varchar(255) UNIQUE,
    "author_id" uuid,
    "status" varchar(50) DEFAULT 'draft' CHECK ("status" IN ('draft', 'published')),
    "created_at" timestamptz NOT NULL DEFAULT CURRENT_TIMESTAMP,
    "updated_at" timestamptz NOT NULL DEFAULT CURRENT_TIMESTAMP,
    "deleted_at" timestamptz,
    CONSTRAINT "fk_posts_author" FOREIGN KEY ("author_id") REFERENCES "users" ("id")
);"#;
        assert!(scripts.up.contains(expected_table), "{}", scripts.up);
        assert!(scripts.up.contains(
            r#"CREATE INDEX IF NOT EXISTS "idx_posts_author_id" ON "posts" ("author_id");"#
        ));
        assert!(scripts.up.starts_with("-- Code generated by schema_forge. DO NOT EDIT.\n-- Post (version 1)\n"));
    }

    #[rstest]
    fn test_down_reverses_up(post: ResourceSchema) {
        let enriched = enrich(&post, &DialectConfig::Postgres).unwrap();
        let scripts = render(&enriched, SqlFlavor::Postgres).unwrap();
        let drops: Vec<&str> = scripts.down.lines().skip(2).collect();
        assert_eq!(
            drops,
            vec![
                r#"DROP INDEX IF EXISTS "idx_posts_deleted_at";"#,
                r#"DROP INDEX IF EXISTS "idx_posts_author_id";"#,
                r#"DROP TABLE IF EXISTS "posts";"#,
            ]
        );
    }

    #[rstest]
    fn test_mysql_flavor(post: ResourceSchema) {
        let enriched = enrich(&post, &DialectConfig::Mysql).unwrap();
        let scripts = render(&enriched, SqlFlavor::Mysql).unwrap();
        assert!(scripts.up.contains("`id` char(36) PRIMARY KEY"));
        assert!(scripts.up.contains("`created_at` datetime(3) NOT NULL DEFAULT CURRENT_TIMESTAMP(3)"));
        assert!(scripts.up.contains("CREATE INDEX `idx_posts_author_id` ON `posts` (`author_id`);"));
        assert!(scripts.down.contains("DROP INDEX `idx_posts_author_id` ON `posts`;"));
    }

    #[rstest]
    fn test_many_to_many_join_table() {
        let schema = ResourceSchema::new(
            "Post",
            vec![Field::new("tags", FieldType::ReferenceCollection).with_relation(RelationSpec {
                target: "Tag".to_string(),
                join_table: Some("post_tags".to_string()),
                ..Default::default()
            })],
        );
        let enriched = enrich(&schema, &DialectConfig::Sqlite).unwrap();
        let scripts = render(&enriched, SqlFlavor::Sqlite).unwrap();

        assert!(!scripts.up.contains("\"tags\""));
        assert!(scripts.up.contains("CREATE TABLE IF NOT EXISTS \"post_tags\" ("));
        assert!(scripts.up.contains("PRIMARY KEY (\"post_id\", \"tag_id\")"));
        assert!(scripts.up.contains("REFERENCES \"tags\" (\"id\") ON DELETE CASCADE"));
        assert!(scripts.down.lines().nth(2) == Some("DROP TABLE IF EXISTS \"post_tags\";"));
    }

    #[rstest]
    fn test_self_referencing_join_table() {
        let schema = ResourceSchema::new(
            "User",
            vec![Field::new("friends", FieldType::ReferenceCollection).with_relation(RelationSpec {
                target: "User".to_string(),
                join_table: Some("user_friends".to_string()),
                ..Default::default()
            })],
        );
        let enriched = enrich(&schema, &DialectConfig::Postgres).unwrap();
        let scripts = render(&enriched, SqlFlavor::Postgres).unwrap();
        assert!(scripts.up.contains("PRIMARY KEY (\"user_id\", \"friend_id\")"));
    }

    #[rstest]
    fn test_geo_point_expands_to_two_columns() {
        let schema = ResourceSchema::new(
            "Store",
            vec![Field::new("location", FieldType::GeoPoint).required()],
        );
        let enriched = enrich(&schema, &DialectConfig::Postgres).unwrap();
        let scripts = render(&enriched, SqlFlavor::Postgres).unwrap();
        assert!(scripts.up.contains("\"location_latitude\" double precision NOT NULL"));
        assert!(scripts.up.contains("\"location_longitude\" double precision NOT NULL"));
    }

    #[rstest]
    fn test_declared_indexes_and_checks(mut post: ResourceSchema) {
        post.indexes.push(IndexDef {
            name: Some("posts_title_status".to_string()),
            fields: vec!["title".to_string(), "status".to_string()],
            unique: true,
        });
        post.constraints.push(CheckConstraint {
            name: "title_not_blank".to_string(),
            expression: "length(title) > 0".to_string(),
        });
        let enriched = enrich(&post, &DialectConfig::Postgres).unwrap();
        let scripts = render(&enriched, SqlFlavor::Postgres).unwrap();
        assert!(scripts.up.contains(
            r#"CREATE UNIQUE INDEX IF NOT EXISTS "posts_title_status" ON "posts" ("title", "status");"#
        ));
        assert!(scripts.up.contains(r#"CONSTRAINT "title_not_blank" CHECK (length(title) > 0)"#));
    }

    #[rstest]
    #[case(json!(true), SqlFlavor::Postgres, "TRUE")]
    #[case(json!(false), SqlFlavor::Sqlite, "0")]
    #[case(json!(10), SqlFlavor::Mysql, "10")]
    #[case(json!(2.5), SqlFlavor::Mysql, "2.5")]
    #[case(json!("it's"), SqlFlavor::Postgres, "'it''s'")]
    #[case(json!(null), SqlFlavor::Postgres, "NULL")]
    fn test_sql_literal(#[case] value: Value, #[case] flavor: SqlFlavor, #[case] expected: &str) {
        assert_eq!(sql_literal(&value, flavor), expected);
    }

    #[rstest]
    fn test_file_names(post: ResourceSchema) {
        let enriched = enrich(&post, &DialectConfig::Postgres).unwrap();
        assert_eq!(
            file_names(&enriched),
            (
                "000001_create_posts.up.sql".to_string(),
                "000001_create_posts.down.sql".to_string()
            )
        );
    }
}
