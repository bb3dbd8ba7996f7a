//! Repository artifact: persistence interface plus the dialect implementation.

use std::fmt::{self, Write};

use super::go::{Imports, write_preamble};
use super::{DialectTemplates, record_vars, templates_for};
use crate::enrich::EnrichedSchema;

pub fn render(schema: &EnrichedSchema<'_>, module_path: &str) -> Result<String, fmt::Error> {
    let templates = templates_for(&schema.dialect);
    let model = &schema.naming.singular.pascal;
    let (one, _) = record_vars(schema);

    let mut imports = Imports::default();
    imports
        .std("context")
        .std("errors")
        .external("github.com/google/uuid")
        .local(format!("{}/internal/models", module_path));
    templates.repository_imports(schema, &mut imports);

    let mut out = String::new();
    write_preamble(&mut out, "repository")?;
    imports.write(&mut out)?;

    writeln!(out, "// Err{}NotFound is returned when no {} has the given id.", model, model)?;
    writeln!(
        out,
        "var Err{}NotFound = errors.New(\"{} not found\")",
        model,
        schema.naming.singular.snake.replace('_', " ")
    )?;
    writeln!(out)?;

    writeln!(out, "// {}Repository persists {} records.", model, model)?;
    writeln!(out, "type {}Repository interface {{", model)?;
    writeln!(
        out,
        "\tList(ctx context.Context, query string, offset, limit int) ([]models.{}, int64, error)",
        model
    )?;
    writeln!(out, "\tGet(ctx context.Context, id uuid.UUID) (*models.{}, error)", model)?;
    writeln!(out, "\tCreate(ctx context.Context, {} *models.{}) error", one, model)?;
    writeln!(out, "\tUpdate(ctx context.Context, {} *models.{}) error", one, model)?;
    writeln!(out, "\tDelete(ctx context.Context, id uuid.UUID) error")?;
    writeln!(out, "}}")?;
    writeln!(out)?;

    templates.write_repository(schema, &mut out)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrich::enrich;
    use crate::schema::{DialectConfig, Field, FieldType, RelationSpec, ResourceSchema};
    use rstest::rstest;

    fn order_line() -> ResourceSchema {
        let mut product = Field::new("product", FieldType::Reference).with_relation(RelationSpec {
            target: "Product".to_string(),
            eager: true,
            ..Default::default()
        });
        product.required = true;
        ResourceSchema::new(
            "OrderLine",
            vec![product, Field::new("quantity", FieldType::Integer).required()],
        )
    }

    #[rstest]
    fn test_interface_and_not_found_error() {
        let schema = order_line();
        let enriched = enrich(&schema, &DialectConfig::Postgres).unwrap();
        let out = render(&enriched, "example.com/shop").unwrap();

        assert!(out.contains("package repository\n"));
        assert!(out.contains("\t\"example.com/shop/internal/models\"\n"));
        assert!(out.contains("var ErrOrderLineNotFound = errors.New(\"order line not found\")"));
        assert!(out.contains("type OrderLineRepository interface {"));
        assert!(out.contains("\tCreate(ctx context.Context, orderLine *models.OrderLine) error\n"));
    }

    #[rstest]
    fn test_eager_relation_is_preloaded() {
        let schema = order_line();
        let enriched = enrich(&schema, &DialectConfig::Mysql).unwrap();
        let out = render(&enriched, "example.com/shop").unwrap();
        assert!(out.contains(".Preload(\"Product\")"));
    }

    #[rstest]
    #[case(DialectConfig::Mongodb { database: None }, "go.mongodb.org/mongo-driver/mongo")]
    #[case(DialectConfig::Redis { key_prefix: None }, "github.com/redis/go-redis/v9")]
    #[case(DialectConfig::Sqlite, "gorm.io/gorm")]
    fn test_driver_import(#[case] dialect: DialectConfig, #[case] import: &str) {
        let schema = order_line();
        let enriched = enrich(&schema, &dialect).unwrap();
        let out = render(&enriched, "example.com/shop").unwrap();
        assert!(out.contains(&format!("\t\"{}\"\n", import)));
    }
}
