//! End-to-end generation through the public library API.
//!
//! Each test writes into its own temp directory; no configuration file or
//! working directory is involved.

use std::fs;
use std::path::Path;

use rstest::{fixture, rstest};
use tempfile::TempDir;

use schema_forge::{
    ArtifactKind, DialectConfig, GenError, JsonSchemaStore, RenderSettings, ResourceSchema, enrich, generate,
    normalize, render_artifact,
};

const POST: &str = include_str!("../src/fixtures/post.json");
const STORE: &str = include_str!("../src/fixtures/store.json");
const MODULE: &str = "github.com/acme/blog";

#[fixture]
fn post() -> ResourceSchema {
    JsonSchemaStore::parse_str(POST, "post.json").unwrap()
}

fn read(root: &Path, relative: &str) -> String {
    fs::read_to_string(root.join(relative)).unwrap_or_else(|e| panic!("{}: {}", relative, e))
}

fn relative_paths(root: &Path, report: &schema_forge::GenerationReport) -> Vec<String> {
    report
        .written
        .iter()
        .map(|f| f.path.strip_prefix(root).unwrap().display().to_string())
        .collect()
}

#[rstest]
fn test_post_on_postgres(post: ResourceSchema) {
    let dir = TempDir::new().unwrap();
    let settings = RenderSettings::new(MODULE, dir.path());

    let report = generate(&post, &DialectConfig::Postgres, &ArtifactKind::ALL, &settings).unwrap();

    assert!(report.skipped.is_empty());
    assert!(relative_paths(dir.path(), &report).contains(&"migrations/000003_create_posts.up.sql".to_string()));

    let model = read(dir.path(), "internal/models/post.go");
    assert!(model.starts_with("// Code generated by schema_forge. DO NOT EDIT."));
    assert!(model.contains("type Post struct {"));
    assert!(model.contains("AuthorID"));
    assert!(model.contains("gorm:\"uniqueIndex\""));

    let repository = read(dir.path(), "internal/repository/post_repository.go");
    assert!(repository.contains("gorm.io/gorm"));
    assert!(!repository.contains("Preload("));

    let handler = read(dir.path(), "internal/handlers/post_handler.go");
    assert!(handler.contains("github.com/gin-gonic/gin"));
    assert!(handler.contains("\"github.com/acme/blog/internal/services\""));

    let up = read(dir.path(), "migrations/000003_create_posts.up.sql");
    assert!(up.contains("CREATE TABLE IF NOT EXISTS \"posts\" ("));
    assert!(up.contains("CREATE TABLE IF NOT EXISTS \"post_tags\" ("));
    let down = read(dir.path(), "migrations/000003_create_posts.down.sql");
    let join_drop = down.find("DROP TABLE IF EXISTS \"post_tags\"").unwrap();
    let table_drop = down.find("DROP TABLE IF EXISTS \"posts\"").unwrap();
    assert!(join_drop < table_drop, "join table must be dropped first");
}

#[rstest]
fn test_post_on_mongodb_skips_migrations(post: ResourceSchema) {
    let dir = TempDir::new().unwrap();
    let settings = RenderSettings::new(MODULE, dir.path());
    let dialect = DialectConfig::Mongodb {
        database: Some("blog".to_string()),
    };

    let report = generate(&post, &dialect, &ArtifactKind::ALL, &settings).unwrap();

    assert_eq!(report.dialect, "mongodb");
    assert_eq!(report.skipped, vec![ArtifactKind::Migration]);
    assert!(!dir.path().join("migrations").exists());
    for file in [
        "internal/models/post.go",
        "internal/repository/post_repository.go",
        "internal/services/post_service.go",
        "internal/handlers/post_handler.go",
    ] {
        assert!(dir.path().join(file).exists(), "missing {}", file);
    }
    let model = read(dir.path(), "internal/models/post.go");
    assert!(model.contains("bson:\"title\""));
}

#[rstest]
fn test_store_on_redis() {
    let store = JsonSchemaStore::parse_str(STORE, "store.json").unwrap();
    let dir = TempDir::new().unwrap();
    let settings = RenderSettings::new(MODULE, dir.path());
    let dialect = DialectConfig::Redis { key_prefix: None };

    let report = generate(&store, &dialect, &[ArtifactKind::Model, ArtifactKind::Repository], &settings).unwrap();

    assert_eq!(
        relative_paths(dir.path(), &report),
        vec![
            "internal/models/store.go",
            "internal/models/geo_point.go",
            "internal/repository/store_repository.go",
        ]
    );
    assert!(read(dir.path(), "internal/repository/store_repository.go").contains("github.com/redis/go-redis/v9"));
}

#[rstest]
fn test_regeneration_is_byte_identical(post: ResourceSchema) {
    let dir = TempDir::new().unwrap();
    let settings = RenderSettings::new(MODULE, dir.path());

    let first = generate(&post, &DialectConfig::Sqlite, &ArtifactKind::ALL, &settings).unwrap();
    let snapshot: Vec<String> = first.written.iter().map(|f| fs::read_to_string(&f.path).unwrap()).collect();
    let second = generate(&post, &DialectConfig::Sqlite, &ArtifactKind::ALL, &settings).unwrap();
    let again: Vec<String> = second.written.iter().map(|f| fs::read_to_string(&f.path).unwrap()).collect();

    assert_eq!(snapshot, again);
}

#[rstest]
fn test_render_is_pure(post: ResourceSchema) {
    let enriched = enrich(&post, &DialectConfig::Mysql).unwrap();
    for kind in ArtifactKind::ALL {
        let first = render_artifact(&enriched, kind, MODULE).unwrap();
        let second = render_artifact(&enriched, kind, MODULE).unwrap();
        assert_eq!(first, second, "{} render differs between calls", kind);
        assert!(!first.is_empty());
    }
}

#[rstest]
fn test_invalid_schema_writes_nothing() {
    let schema = JsonSchemaStore::parse_str(
        r#"{"name": "Bad", "fields": [{"name": "age", "type": "integer", "constraints": {"min": 10, "max": 1}}]}"#,
        "bad.json",
    )
    .unwrap();
    let dir = TempDir::new().unwrap();
    let settings = RenderSettings::new(MODULE, dir.path());

    let err = generate(&schema, &DialectConfig::Postgres, &ArtifactKind::ALL, &settings).unwrap_err();

    assert!(matches!(err, GenError::InvalidConstraint { .. }));
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[rstest]
#[case("BlogPost")]
#[case("blog_post")]
#[case("blog-post")]
#[case("order category")]
#[case("HTTPServer")]
fn test_naming_is_stable_across_casings(#[case] identifier: &str) {
    let naming = normalize(identifier);
    for form in [
        &naming.singular.pascal,
        &naming.singular.camel,
        &naming.singular.snake,
        &naming.singular.kebab,
    ] {
        assert_eq!(normalize(form).singular.snake, naming.singular.snake, "via {}", form);
    }
    assert_eq!(naming.table, naming.plural.snake);
}

#[rstest]
#[case("Category", "categories")]
#[case("Person", "people")]
#[case("BlogPost", "blog_posts")]
#[case("Box", "boxes")]
fn test_table_names(#[case] name: &str, #[case] table: &str) {
    assert_eq!(normalize(name).table, table);
}
