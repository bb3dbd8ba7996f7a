//! Relational sub-templates (gorm over postgres, mysql or sqlite).

use std::fmt::{self, Write};

use super::go::{Imports, StructField, indent};
use super::{DialectTemplates, record_vars};
use crate::enrich::EnrichedSchema;
use crate::lowering::{go_string_literal, lower_type};
use crate::schema::{DialectConfig, FieldType};

/// SQL dialect details shared by the gorm sub-templates and migrations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlFlavor {
    Postgres,
    Mysql,
    Sqlite,
}

impl SqlFlavor {
    pub fn from_dialect(dialect: &DialectConfig) -> Option<SqlFlavor> {
        match dialect {
            DialectConfig::Postgres => Some(SqlFlavor::Postgres),
            DialectConfig::Mysql => Some(SqlFlavor::Mysql),
            DialectConfig::Sqlite => Some(SqlFlavor::Sqlite),
            _ => None,
        }
    }

    pub fn dialect(&self) -> DialectConfig {
        match self {
            SqlFlavor::Postgres => DialectConfig::Postgres,
            SqlFlavor::Mysql => DialectConfig::Mysql,
            SqlFlavor::Sqlite => DialectConfig::Sqlite,
        }
    }

    /// Case-insensitive substring operator.
    pub fn contains_operator(&self) -> &'static str {
        match self {
            SqlFlavor::Postgres => "ILIKE",
            // LIKE is case-insensitive under mysql's default collation and
            // for ASCII in sqlite
            SqlFlavor::Mysql | SqlFlavor::Sqlite => "LIKE",
        }
    }

    /// `expr` converted to text so the contains operator applies to it.
    pub fn text_cast(&self, expr: &str) -> String {
        match self {
            SqlFlavor::Mysql => format!("CAST({} AS CHAR)", expr),
            SqlFlavor::Postgres | SqlFlavor::Sqlite => format!("CAST({} AS TEXT)", expr),
        }
    }

    pub fn quote_ident(&self, ident: &str) -> String {
        match self {
            SqlFlavor::Mysql => format!("`{}`", ident.replace('`', "``")),
            SqlFlavor::Postgres | SqlFlavor::Sqlite => format!("\"{}\"", ident.replace('"', "\"\"")),
        }
    }

    pub fn key_type(&self) -> String {
        lower_type(FieldType::UniqueId, &self.dialect())
            .storage
            .unwrap_or_else(|| "text".to_string())
    }

    pub fn timestamp_type(&self) -> String {
        lower_type(FieldType::Timestamp, &self.dialect())
            .storage
            .unwrap_or_else(|| "timestamp".to_string())
    }

    pub fn current_timestamp(&self) -> &'static str {
        match self {
            SqlFlavor::Mysql => "CURRENT_TIMESTAMP(3)",
            SqlFlavor::Postgres | SqlFlavor::Sqlite => "CURRENT_TIMESTAMP",
        }
    }

    pub fn bool_literal(&self, value: bool) -> &'static str {
        match (self, value) {
            (SqlFlavor::Postgres, true) => "TRUE",
            (SqlFlavor::Postgres, false) => "FALSE",
            (_, true) => "1",
            (_, false) => "0",
        }
    }

    /// Whether `CREATE INDEX` accepts `IF NOT EXISTS`.
    pub fn index_if_not_exists(&self) -> bool {
        !matches!(self, SqlFlavor::Mysql)
    }
}

/// gorm model and repository sub-templates.
#[derive(Debug, Clone)]
pub struct SqlTemplates {
    flavor: SqlFlavor,
}

impl SqlTemplates {
    pub fn new(flavor: SqlFlavor) -> Self {
        Self { flavor }
    }

    pub fn flavor(&self) -> SqlFlavor {
        self.flavor
    }
}

impl DialectTemplates for SqlTemplates {
    fn id_field(&self) -> StructField {
        StructField::new(
            "ID",
            "uuid.UUID",
            format!("json:\"id\" gorm:\"type:{};primaryKey\"", self.flavor.key_type()),
        )
    }

    fn trailing_fields(&self) -> Vec<StructField> {
        vec![
            StructField::new("CreatedAt", "time.Time", "json:\"created_at\""),
            StructField::new("UpdatedAt", "time.Time", "json:\"updated_at\""),
            StructField::new("DeletedAt", "gorm.DeletedAt", "json:\"-\" gorm:\"index\""),
        ]
    }

    fn model_imports(&self, imports: &mut Imports) {
        imports.external("gorm.io/gorm");
    }

    fn write_model_extras(&self, schema: &EnrichedSchema<'_>, out: &mut String) -> fmt::Result {
        let model = &schema.naming.singular.pascal;
        let receiver = receiver_name(model);

        writeln!(out, "// TableName returns the table backing {}.", model)?;
        writeln!(out, "func ({}) TableName() string {{", model)?;
        writeln!(out, "\treturn \"{}\"", schema.naming.table)?;
        writeln!(out, "}}")?;
        writeln!(out)?;
        writeln!(out, "// BeforeCreate assigns an ID when none is set.")?;
        writeln!(out, "func ({} *{}) BeforeCreate(tx *gorm.DB) error {{", receiver, model)?;
        writeln!(out, "\tif {}.ID == uuid.Nil {{", receiver)?;
        writeln!(out, "\t\t{}.ID = uuid.New()", receiver)?;
        writeln!(out, "\t}}")?;
        writeln!(out, "\treturn nil")?;
        writeln!(out, "}}")
    }

    fn repository_imports(&self, _schema: &EnrichedSchema<'_>, imports: &mut Imports) {
        imports.external("gorm.io/gorm");
    }

    fn write_repository(&self, schema: &EnrichedSchema<'_>, out: &mut String) -> fmt::Result {
        let model = &schema.naming.singular.pascal;
        let repo = format!("{}Repository", schema.naming.singular.camel);
        let (one, many) = record_vars(schema);
        let preloads: String = schema
            .relations
            .preloads
            .iter()
            .map(|p| format!(".Preload(\"{}\")", p))
            .collect();
        let pattern_args = vec!["pattern"; schema.search_fields.len()].join(", ");
        let predicate = go_string_literal(&self.search_predicate(schema));
        let id_column = self.flavor.quote_ident("id");
        let created_column = self.flavor.quote_ident("created_at");

        writeln!(out, "type {} struct {{", repo)?;
        writeln!(out, "\tdb *gorm.DB")?;
        writeln!(out, "}}")?;
        writeln!(out)?;
        writeln!(out, "// New{0}Repository returns a {0}Repository backed by gorm.", model)?;
        writeln!(out, "func New{}Repository(db *gorm.DB) {}Repository {{", model, model)?;
        writeln!(out, "\treturn &{}{{db: db}}", repo)?;
        writeln!(out, "}}")?;
        writeln!(out)?;

        writeln!(
            out,
            "func (r *{}) List(ctx context.Context, query string, offset, limit int) ([]models.{}, int64, error) {{",
            repo, model
        )?;
        let list_body = format!(
            "var {many} []models.{model}
var total int64

tx := r.db.WithContext(ctx).Model(&models.{model}{{}})
if query != \"\" {{
	pattern := \"%\" + query + \"%\"
	tx = tx.Where({predicate}, {pattern_args})
}}
if err := tx.Session(&gorm.Session{{}}).Count(&total).Error; err != nil {{
	return nil, 0, err
}}
if err := tx{preloads}.Order({order}).Offset(offset).Limit(limit).Find(&{many}).Error; err != nil {{
	return nil, 0, err
}}
return {many}, total, nil",
            order = go_string_literal(&format!("{} DESC", created_column)),
        );
        writeln!(out, "{}", indent(&list_body, 1))?;
        writeln!(out, "}}")?;
        writeln!(out)?;

        writeln!(
            out,
            "func (r *{}) Get(ctx context.Context, id uuid.UUID) (*models.{}, error) {{",
            repo, model
        )?;
        let get_body = format!(
            "var {one} models.{model}
err := r.db.WithContext(ctx){preloads}.First(&{one}, {where_id}, id).Error
if errors.Is(err, gorm.ErrRecordNotFound) {{
	return nil, Err{model}NotFound
}}
if err != nil {{
	return nil, err
}}
return &{one}, nil",
            where_id = go_string_literal(&format!("{} = ?", id_column)),
        );
        writeln!(out, "{}", indent(&get_body, 1))?;
        writeln!(out, "}}")?;
        writeln!(out)?;

        writeln!(
            out,
            "func (r *{}) Create(ctx context.Context, {} *models.{}) error {{",
            repo, one, model
        )?;
        writeln!(out, "\treturn r.db.WithContext(ctx).Create({}).Error", one)?;
        writeln!(out, "}}")?;
        writeln!(out)?;

        writeln!(
            out,
            "func (r *{}) Update(ctx context.Context, {} *models.{}) error {{",
            repo, one, model
        )?;
        writeln!(out, "\treturn r.db.WithContext(ctx).Save({}).Error", one)?;
        writeln!(out, "}}")?;
        writeln!(out)?;

        writeln!(
            out,
            "func (r *{}) Delete(ctx context.Context, id uuid.UUID) error {{",
            repo
        )?;
        let delete_body = format!(
            "result := r.db.WithContext(ctx).Delete(&models.{model}{{}}, {where_id}, id)
if result.Error != nil {{
	return result.Error
}}
if result.RowsAffected == 0 {{
	return Err{model}NotFound
}}
return nil",
            where_id = go_string_literal(&format!("{} = ?", id_column)),
        );
        writeln!(out, "{}", indent(&delete_body, 1))?;
        writeln!(out, "}}")
    }

    /// `"title" ILIKE ? OR "body" ILIKE ?`, one placeholder per field. The
    /// id fallback is cast to text first.
    fn search_predicate(&self, schema: &EnrichedSchema<'_>) -> String {
        schema
            .search_fields
            .iter()
            .map(|f| {
                let column = self.flavor.quote_ident(&f.column);
                let operand = if schema.search_fallback {
                    self.flavor.text_cast(&column)
                } else {
                    column
                };
                format!("{} {} ?", operand, self.flavor.contains_operator())
            })
            .collect::<Vec<_>>()
            .join(" OR ")
    }
}

/// Single-letter method receiver, as gofmt-style Go code uses.
pub(crate) fn receiver_name(model: &str) -> String {
    model
        .chars()
        .next()
        .map(|c| c.to_lowercase().to_string())
        .unwrap_or_else(|| "m".to_string())
}
