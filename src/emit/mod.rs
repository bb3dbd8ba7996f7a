//! Artifact emission.
//!
//! Rendering is pure ([`render_artifact`]); writing happens in
//! [`emit_artifact`] and [`generate`]. A run stops at the first error and
//! leaves files written before it in place.

pub mod templates;
mod writer;

use std::fmt;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::Serialize;

use crate::enrich::{EnrichedSchema, enrich};
use crate::error::{GenError, Result};
use crate::schema::{DialectConfig, ResourceSchema};
use templates::{SqlFlavor, handler, migration, model, repository, service};

pub use writer::{WriteState, WrittenFile, write_file};

/// Shared declarations, identical for every schema that needs them.
const GEO_POINT_FILE: &str = "internal/models/geo_point.go";
const PATTERNS_FILE: &str = "internal/services/patterns.go";
const PARAMS_FILE: &str = "internal/handlers/params.go";

/// Artifact kinds, in emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    Model,
    Repository,
    Service,
    Handler,
    Migration,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 5] = [
        ArtifactKind::Model,
        ArtifactKind::Repository,
        ArtifactKind::Service,
        ArtifactKind::Handler,
        ArtifactKind::Migration,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ArtifactKind::Model => "model",
            ArtifactKind::Repository => "repository",
            ArtifactKind::Service => "service",
            ArtifactKind::Handler => "handler",
            ArtifactKind::Migration => "migration",
        }
    }

    fn needs_module_path(&self) -> bool {
        matches!(
            self,
            ArtifactKind::Repository | ArtifactKind::Service | ArtifactKind::Handler
        )
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where and for which Go module artifacts are rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderSettings {
    /// Go module path used for imports between generated packages.
    pub module_path: String,
    pub output_root: PathBuf,
}

impl RenderSettings {
    pub fn new(module_path: impl Into<String>, output_root: impl Into<PathBuf>) -> Self {
        Self {
            module_path: module_path.into(),
            output_root: output_root.into(),
        }
    }
}

/// A rendered file, path relative to the output root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedFile {
    pub path: PathBuf,
    pub contents: String,
}

/// Paths of the files one artifact kind produces for `schema`, relative to
/// the output root. Empty for migrations on dialects without them.
pub fn artifact_paths(schema: &EnrichedSchema<'_>, kind: ArtifactKind) -> Vec<PathBuf> {
    let snake = &schema.naming.singular.snake;
    let mut paths = Vec::new();
    match kind {
        ArtifactKind::Model => {
            paths.push(PathBuf::from(format!("internal/models/{}.go", snake)));
            if model::uses_geo_point(schema) {
                paths.push(PathBuf::from(GEO_POINT_FILE));
            }
        }
        ArtifactKind::Repository => {
            paths.push(PathBuf::from(format!("internal/repository/{}_repository.go", snake)));
        }
        ArtifactKind::Service => {
            paths.push(PathBuf::from(format!("internal/services/{}_service.go", snake)));
            if service::uses_format_patterns(schema) {
                paths.push(PathBuf::from(PATTERNS_FILE));
            }
        }
        ArtifactKind::Handler => {
            paths.push(PathBuf::from(format!("internal/handlers/{}_handler.go", snake)));
            paths.push(PathBuf::from(PARAMS_FILE));
        }
        ArtifactKind::Migration => {
            if schema.dialect.supports_migrations() {
                let (up, down) = migration::file_names(schema);
                paths.push(Path::new("migrations").join(up));
                paths.push(Path::new("migrations").join(down));
            }
        }
    }
    paths
}

/// Render one artifact kind without touching the filesystem.
pub fn render_artifact(
    schema: &EnrichedSchema<'_>,
    kind: ArtifactKind,
    module_path: &str,
) -> Result<Vec<RenderedFile>> {
    let render_error = |message: String| GenError::TemplateRender {
        artifact: kind.name().to_string(),
        schema: schema.name.clone(),
        message,
    };
    let fmt_error = |_: fmt::Error| render_error("formatter error".to_string());

    if kind.needs_module_path() && module_path.trim().is_empty() {
        return Err(render_error("module path is empty".to_string()));
    }

    let contents: Vec<String> = match kind {
        ArtifactKind::Model => {
            let mut files = vec![model::render(schema).map_err(fmt_error)?];
            if model::uses_geo_point(schema) {
                files.push(model::render_geo_point().map_err(fmt_error)?);
            }
            files
        }
        ArtifactKind::Repository => vec![repository::render(schema, module_path).map_err(fmt_error)?],
        ArtifactKind::Service => {
            let mut files = vec![service::render(schema, module_path).map_err(fmt_error)?];
            if service::uses_format_patterns(schema) {
                files.push(service::render_patterns().map_err(fmt_error)?);
            }
            files
        }
        ArtifactKind::Handler => vec![
            handler::render(schema, module_path).map_err(fmt_error)?,
            handler::render_params().map_err(fmt_error)?,
        ],
        ArtifactKind::Migration => {
            if !schema.dialect.supports_migrations() {
                return Ok(Vec::new());
            }
            let flavor = SqlFlavor::from_dialect(&schema.dialect).ok_or_else(|| {
                render_error(format!("no SQL flavor for dialect '{}'", schema.dialect.name()))
            })?;
            let scripts = migration::render(schema, flavor).map_err(fmt_error)?;
            vec![scripts.up, scripts.down]
        }
    };

    Ok(artifact_paths(schema, kind)
        .into_iter()
        .zip(contents)
        .map(|(path, contents)| RenderedFile { path, contents })
        .collect())
}

fn emit_files(
    schema: &EnrichedSchema<'_>,
    kind: ArtifactKind,
    settings: &RenderSettings,
) -> Result<Vec<WrittenFile>> {
    render_artifact(schema, kind, &settings.module_path)?
        .iter()
        .map(|file| write_file(&settings.output_root.join(&file.path), &file.contents))
        .collect()
}

/// Render and write one artifact kind, returning the written paths.
///
/// Migrations on a dialect without them write nothing and return an empty
/// list.
pub fn emit_artifact(
    schema: &EnrichedSchema<'_>,
    kind: ArtifactKind,
    settings: &RenderSettings,
) -> Result<Vec<PathBuf>> {
    Ok(emit_files(schema, kind, settings)?
        .into_iter()
        .map(|file| file.path)
        .collect())
}

/// Outcome of a full generation run.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
    pub schema: String,
    pub dialect: String,
    pub written: Vec<WrittenFile>,
    /// Requested kinds the dialect has no concept of.
    pub skipped: Vec<ArtifactKind>,
    /// Distinct schemas the relations point at, first seen first.
    pub referenced: Vec<String>,
}

/// Enrich `schema` for `dialect` and emit `kinds` in fixed order.
///
/// Duplicate kinds are emitted once. The first error aborts the run.
pub fn generate(
    schema: &ResourceSchema,
    dialect: &DialectConfig,
    kinds: &[ArtifactKind],
    settings: &RenderSettings,
) -> Result<GenerationReport> {
    let enriched = enrich(schema, dialect)?;

    let mut ordered = kinds.to_vec();
    ordered.sort();
    ordered.dedup();

    let mut report = GenerationReport {
        schema: enriched.name.clone(),
        dialect: dialect.name().to_string(),
        written: Vec::new(),
        skipped: Vec::new(),
        referenced: enriched.relations.referenced.clone(),
    };

    for kind in ordered {
        if kind == ArtifactKind::Migration && !dialect.supports_migrations() {
            report.skipped.push(kind);
            continue;
        }
        report.written.extend(emit_files(&enriched, kind, settings)?);
    }

    Ok(report)
}
