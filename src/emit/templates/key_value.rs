//! Key-value sub-templates (go-redis).
//!
//! Records are JSON blobs under `<prefix><table>:<id>`; the set at
//! `<prefix><table>` holds every id of the collection.

use std::fmt::{self, Write};

use super::go::{Imports, StructField, indent};
use super::{DialectTemplates, record_vars};
use crate::enrich::EnrichedSchema;
use crate::lowering::go_string_literal;

#[derive(Debug, Clone)]
pub struct KeyValueTemplates {
    key_prefix: String,
}

impl KeyValueTemplates {
    pub fn new(key_prefix: String) -> Self {
        Self { key_prefix }
    }

    /// Set holding every id of the collection.
    pub fn index_key(&self, table: &str) -> String {
        format!("{}{}", self.key_prefix, table)
    }

    /// Prefix of the per-record keys.
    pub fn record_prefix(&self, table: &str) -> String {
        format!("{}{}:", self.key_prefix, table)
    }
}

impl DialectTemplates for KeyValueTemplates {
    fn id_field(&self) -> StructField {
        StructField::new("ID", "uuid.UUID", "json:\"id\" redis:\"id\"")
    }

    fn trailing_fields(&self) -> Vec<StructField> {
        vec![
            StructField::new("CreatedAt", "time.Time", "json:\"created_at\" redis:\"created_at\""),
            StructField::new("UpdatedAt", "time.Time", "json:\"updated_at\" redis:\"updated_at\""),
        ]
    }

    fn model_imports(&self, _imports: &mut Imports) {}

    fn write_model_extras(&self, schema: &EnrichedSchema<'_>, out: &mut String) -> fmt::Result {
        let model = &schema.naming.singular.pascal;
        let table = &schema.naming.table;

        writeln!(out, "const (")?;
        writeln!(out, "\t// {}IndexKey is the set of every {} id.", model, model)?;
        writeln!(out, "\t{}IndexKey = {}", model, go_string_literal(&self.index_key(table)))?;
        writeln!(out, "\t// {}KeyPrefix prefixes the key of each {} record.", model, model)?;
        writeln!(out, "\t{}KeyPrefix = {}", model, go_string_literal(&self.record_prefix(table)))?;
        writeln!(out, ")")?;
        writeln!(out)?;
        writeln!(out, "// {}Key returns the key holding the {} with the given id.", model, model)?;
        writeln!(out, "func {}Key(id uuid.UUID) string {{", model)?;
        writeln!(out, "\treturn {}KeyPrefix + id.String()", model)?;
        writeln!(out, "}}")
    }

    fn repository_imports(&self, _schema: &EnrichedSchema<'_>, imports: &mut Imports) {
        imports
            .std("encoding/json")
            .std("sort")
            .std("strings")
            .std("time")
            .external("github.com/redis/go-redis/v9");
    }

    fn write_repository(&self, schema: &EnrichedSchema<'_>, out: &mut String) -> fmt::Result {
        let model = &schema.naming.singular.pascal;
        let repo = format!("{}Repository", schema.naming.singular.camel);
        let (one, many) = record_vars(schema);
        let predicate = self.search_predicate(schema);

        writeln!(out, "type {} struct {{", repo)?;
        writeln!(out, "\tclient *redis.Client")?;
        writeln!(out, "}}")?;
        writeln!(out)?;
        writeln!(out, "// New{0}Repository returns a {0}Repository backed by redis.", model)?;
        writeln!(out, "func New{}Repository(client *redis.Client) {}Repository {{", model, model)?;
        writeln!(out, "\treturn &{}{{client: client}}", repo)?;
        writeln!(out, "}}")?;
        writeln!(out)?;

        writeln!(
            out,
            "func (r *{}) List(ctx context.Context, query string, offset, limit int) ([]models.{}, int64, error) {{",
            repo, model
        )?;
        let list_body = format!(
            "ids, err := r.client.SMembers(ctx, models.{model}IndexKey).Result()
if err != nil {{
	return nil, 0, err
}}
sort.Strings(ids)

needle := strings.ToLower(query)
matched := []models.{model}{{}}
for _, id := range ids {{
	raw, err := r.client.Get(ctx, models.{model}KeyPrefix+id).Bytes()
	if errors.Is(err, redis.Nil) {{
		continue
	}}
	if err != nil {{
		return nil, 0, err
	}}
	var {one} models.{model}
	if err := json.Unmarshal(raw, &{one}); err != nil {{
		return nil, 0, err
	}}
	if needle != \"\" && !({predicate}) {{
		continue
	}}
	matched = append(matched, {one})
}}

total := int64(len(matched))
if offset >= len(matched) {{
	return []models.{model}{{}}, total, nil
}}
end := offset + limit
if end > len(matched) {{
	end = len(matched)
}}
{many} := matched[offset:end]
return {many}, total, nil"
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
            "raw, err := r.client.Get(ctx, models.{model}Key(id)).Bytes()
if errors.Is(err, redis.Nil) {{
	return nil, Err{model}NotFound
}}
if err != nil {{
	return nil, err
}}
var {one} models.{model}
if err := json.Unmarshal(raw, &{one}); err != nil {{
	return nil, err
}}
return &{one}, nil"
        );
        writeln!(out, "{}", indent(&get_body, 1))?;
        writeln!(out, "}}")?;
        writeln!(out)?;

        writeln!(
            out,
            "func (r *{}) Create(ctx context.Context, {} *models.{}) error {{",
            repo, one, model
        )?;
        let create_body = format!(
            "if {one}.ID == uuid.Nil {{
	{one}.ID = uuid.New()
}}
now := time.Now().UTC()
{one}.CreatedAt = now
{one}.UpdatedAt = now
return r.save(ctx, {one})"
        );
        writeln!(out, "{}", indent(&create_body, 1))?;
        writeln!(out, "}}")?;
        writeln!(out)?;

        writeln!(
            out,
            "func (r *{}) Update(ctx context.Context, {} *models.{}) error {{",
            repo, one, model
        )?;
        let update_body = format!(
            "exists, err := r.client.Exists(ctx, models.{model}Key({one}.ID)).Result()
if err != nil {{
	return err
}}
if exists == 0 {{
	return Err{model}NotFound
}}
{one}.UpdatedAt = time.Now().UTC()
return r.save(ctx, {one})"
        );
        writeln!(out, "{}", indent(&update_body, 1))?;
        writeln!(out, "}}")?;
        writeln!(out)?;

        writeln!(
            out,
            "func (r *{}) Delete(ctx context.Context, id uuid.UUID) error {{",
            repo
        )?;
        let delete_body = format!(
            "removed, err := r.client.Del(ctx, models.{model}Key(id)).Result()
if err != nil {{
	return err
}}
if removed == 0 {{
	return Err{model}NotFound
}}
return r.client.SRem(ctx, models.{model}IndexKey, id.String()).Err()"
        );
        writeln!(out, "{}", indent(&delete_body, 1))?;
        writeln!(out, "}}")?;
        writeln!(out)?;

        writeln!(
            out,
            "func (r *{}) save(ctx context.Context, {} *models.{}) error {{",
            repo, one, model
        )?;
        let save_body = format!(
            "raw, err := json.Marshal({one})
if err != nil {{
	return err
}}
_, err = r.client.TxPipelined(ctx, func(pipe redis.Pipeliner) error {{
	pipe.Set(ctx, models.{model}Key({one}.ID), raw, 0)
	pipe.SAdd(ctx, models.{model}IndexKey, {one}.ID.String())
	return nil
}})
return err"
        );
        writeln!(out, "{}", indent(&save_body, 1))?;
        writeln!(out, "}}")
    }

    /// `strings.Contains(strings.ToLower(post.Title), needle) || ...`, read
    /// against the decoded record.
    fn search_predicate(&self, schema: &EnrichedSchema<'_>) -> String {
        let (one, _) = record_vars(schema);
        schema
            .search_fields
            .iter()
            .map(|f| {
                // The id fallback is a uuid.UUID, not a string
                let value = if schema.search_fallback {
                    format!("{}.{}.String()", one, f.go_name)
                } else {
                    format!("{}.{}", one, f.go_name)
                };
                format!("strings.Contains(strings.ToLower({}), needle)", value)
            })
            .collect::<Vec<_>>()
            .join(" || ")
    }
}
