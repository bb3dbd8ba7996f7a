//! Document-store sub-templates (official MongoDB Go driver).

use std::fmt::{self, Write};

use super::go::{Imports, StructField, indent};
use super::{DialectTemplates, record_vars};
use crate::enrich::EnrichedSchema;
use crate::lowering::go_string_literal;

#[derive(Debug, Clone)]
pub struct DocumentTemplates {
    database: Option<String>,
}

impl DocumentTemplates {
    pub fn new(database: Option<String>) -> Self {
        Self { database }
    }
}

impl DialectTemplates for DocumentTemplates {
    fn id_field(&self) -> StructField {
        StructField::new("ID", "uuid.UUID", "json:\"id\" bson:\"_id\"")
    }

    fn trailing_fields(&self) -> Vec<StructField> {
        vec![
            StructField::new("CreatedAt", "time.Time", "json:\"created_at\" bson:\"created_at\""),
            StructField::new("UpdatedAt", "time.Time", "json:\"updated_at\" bson:\"updated_at\""),
        ]
    }

    fn model_imports(&self, _imports: &mut Imports) {}

    fn write_model_extras(&self, schema: &EnrichedSchema<'_>, out: &mut String) -> fmt::Result {
        let model = &schema.naming.singular.pascal;
        if let Some(database) = &self.database {
            writeln!(out, "// {}Database is the database holding {} documents.", model, model)?;
            writeln!(out, "const {}Database = {}", model, go_string_literal(database))?;
            writeln!(out)?;
        }
        writeln!(out, "// {}Collection is the collection holding {} documents.", model, model)?;
        writeln!(out, "const {}Collection = \"{}\"", model, schema.naming.table)
    }

    fn repository_imports(&self, _schema: &EnrichedSchema<'_>, imports: &mut Imports) {
        imports
            .std("regexp")
            .std("time")
            .external("go.mongodb.org/mongo-driver/bson")
            .external("go.mongodb.org/mongo-driver/mongo")
            .external("go.mongodb.org/mongo-driver/mongo/options");
    }

    fn write_repository(&self, schema: &EnrichedSchema<'_>, out: &mut String) -> fmt::Result {
        let model = &schema.naming.singular.pascal;
        let repo = format!("{}Repository", schema.naming.singular.camel);
        let (one, many) = record_vars(schema);
        let predicate = self.search_predicate(schema);

        writeln!(out, "type {} struct {{", repo)?;
        writeln!(out, "\tcollection *mongo.Collection")?;
        writeln!(out, "}}")?;
        writeln!(out)?;
        writeln!(out, "// New{0}Repository returns a {0}Repository backed by a MongoDB collection.", model)?;
        match &self.database {
            Some(_) => {
                writeln!(out, "func New{}Repository(client *mongo.Client) {}Repository {{", model, model)?;
                writeln!(
                    out,
                    "\treturn &{}{{collection: client.Database(models.{}Database).Collection(models.{}Collection)}}",
                    repo, model, model
                )?;
            }
            None => {
                writeln!(out, "func New{}Repository(db *mongo.Database) {}Repository {{", model, model)?;
                writeln!(
                    out,
                    "\treturn &{}{{collection: db.Collection(models.{}Collection)}}",
                    repo, model
                )?;
            }
        }
        writeln!(out, "}}")?;
        writeln!(out)?;

        writeln!(
            out,
            "func (r *{}) List(ctx context.Context, query string, offset, limit int) ([]models.{}, int64, error) {{",
            repo, model
        )?;
        let list_body = format!(
            "filter := bson.M{{}}
if query != \"\" {{
	pattern := bson.M{{\"$regex\": regexp.QuoteMeta(query), \"$options\": \"i\"}}
	filter = {predicate}
}}

total, err := r.collection.CountDocuments(ctx, filter)
if err != nil {{
	return nil, 0, err
}}

opts := options.Find().
	SetSort(bson.D{{{{Key: \"created_at\", Value: -1}}}}).
	SetSkip(int64(offset)).
	SetLimit(int64(limit))
cursor, err := r.collection.Find(ctx, filter, opts)
if err != nil {{
	return nil, 0, err
}}
defer cursor.Close(ctx)

{many} := []models.{model}{{}}
if err := cursor.All(ctx, &{many}); err != nil {{
	return nil, 0, err
}}
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
            "var {one} models.{model}
err := r.collection.FindOne(ctx, bson.M{{\"_id\": id}}).Decode(&{one})
if errors.Is(err, mongo.ErrNoDocuments) {{
	return nil, Err{model}NotFound
}}
if err != nil {{
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
_, err := r.collection.InsertOne(ctx, {one})
return err"
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
            "{one}.UpdatedAt = time.Now().UTC()
result, err := r.collection.ReplaceOne(ctx, bson.M{{\"_id\": {one}.ID}}, {one})
if err != nil {{
	return err
}}
if result.MatchedCount == 0 {{
	return Err{model}NotFound
}}
return nil"
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
            "result, err := r.collection.DeleteOne(ctx, bson.M{{\"_id\": id}})
if err != nil {{
	return err
}}
if result.DeletedCount == 0 {{
	return Err{model}NotFound
}}
return nil"
        );
        writeln!(out, "{}", indent(&delete_body, 1))?;
        writeln!(out, "}}")
    }

    /// `bson.M{"$or": bson.A{bson.M{"title": pattern}, ...}}` where `pattern`
    /// is a case-insensitive `$regex` document.
    fn search_predicate(&self, schema: &EnrichedSchema<'_>) -> String {
        let clauses = schema
            .search_fields
            .iter()
            .map(|f| {
                // The id fallback lives under the document key
                let key = if schema.search_fallback { "_id" } else { f.column.as_str() };
                format!("bson.M{{{}: pattern}}", go_string_literal(key))
            })
            .collect::<Vec<_>>()
            .join(", ");
        format!("bson.M{{\"$or\": bson.A{{{}}}}}", clauses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrich::enrich;
    use crate::schema::{DialectConfig, Field, FieldType, ResourceSchema};
    use rstest::rstest;

    fn note() -> ResourceSchema {
        ResourceSchema::new(
            "Note",
            vec![
                Field::new("title", FieldType::ShortText),
                Field::new("body", FieldType::LongText),
            ],
        )
    }

    #[rstest]
    fn test_search_predicate_fallback_uses_document_key() {
        let schema = ResourceSchema::new("Counter", vec![Field::new("value", FieldType::Integer)]);
        let enriched = enrich(&schema, &DialectConfig::Mongodb { database: None }).unwrap();
        assert_eq!(
            DocumentTemplates::new(None).search_predicate(&enriched),
            "bson.M{\"$or\": bson.A{bson.M{\"_id\": pattern}}}"
        );
    }

    #[rstest]
    fn test_search_predicate_ors_regex_clauses() {
        let schema = note();
        let enriched = enrich(&schema, &DialectConfig::Mongodb { database: None }).unwrap();
        assert_eq!(
            DocumentTemplates::new(None).search_predicate(&enriched),
            r#"bson.M{"$or": bson.A{bson.M{"title": pattern}, bson.M{"body": pattern}}}"#
        );
    }

    #[rstest]
    fn test_collection_constant() {
        let schema = note();
        let enriched = enrich(&schema, &DialectConfig::Mongodb { database: None }).unwrap();
        let mut out = String::new();
        DocumentTemplates::new(None)
            .write_model_extras(&enriched, &mut out)
            .unwrap();
        assert_eq!(
            out,
            "// NoteCollection is the collection holding Note documents.\nconst NoteCollection = \"notes\"\n"
        );
    }

    #[rstest]
    fn test_named_database_takes_client() {
        let schema = note();
        let dialect = DialectConfig::Mongodb {
            database: Some("blog".to_string()),
        };
        let enriched = enrich(&schema, &dialect).unwrap();
        let templates = DocumentTemplates::new(Some("blog".to_string()));

        let mut model = String::new();
        templates.write_model_extras(&enriched, &mut model).unwrap();
        assert!(model.contains("const NoteDatabase = \"blog\""));

        let mut repo = String::new();
        templates.write_repository(&enriched, &mut repo).unwrap();
        assert!(repo.contains("func NewNoteRepository(client *mongo.Client) NoteRepository {"));
        assert!(repo.contains("client.Database(models.NoteDatabase).Collection(models.NoteCollection)"));
    }

    #[rstest]
    fn test_repository_maps_missing_documents() {
        let schema = note();
        let enriched = enrich(&schema, &DialectConfig::Mongodb { database: None }).unwrap();
        let mut out = String::new();
        DocumentTemplates::new(None)
            .write_repository(&enriched, &mut out)
            .unwrap();
        assert!(out.contains("errors.Is(err, mongo.ErrNoDocuments)"));
        assert!(out.contains("return nil, ErrNoteNotFound"));
        assert!(out.contains("SetSort(bson.D{{Key: \"created_at\", Value: -1}})"));
    }
}
