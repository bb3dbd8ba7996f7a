use std::error::Error;
use std::path::PathBuf;

use serde::Serialize;

use super::GenerateCmd;
use crate::commands::{Execute, load_schema};
use crate::config::ConfigFile;
use crate::emit::{ArtifactKind, RenderSettings, WriteState, generate};

/// A file written by the run
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedFile {
    /// Path relative to the output root
    pub path: String,
    pub state: WriteState,
}

/// Result of the generate command execution
#[derive(Debug, Serialize)]
pub struct GenerateResult {
    pub schema: String,
    pub dialect: String,
    pub output_root: PathBuf,
    pub files: Vec<GeneratedFile>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<ArtifactKind>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub referenced: Vec<String>,
}

impl Execute for GenerateCmd {
    type Output = GenerateResult;

    fn execute(self, config: &ConfigFile) -> Result<Self::Output, Box<dyn Error>> {
        let schema = load_schema(&config.schemas_dir, &self.schema)?;
        let dialect = config.resolve_dialect(self.dialect, &schema);
        tracing::info!(schema = %schema.name, dialect = dialect.name(), "schema loaded");

        let module_path = match &self.module {
            Some(module) => module.clone(),
            None => config.require_module_path()?.to_string(),
        };
        let output_root = self.output.unwrap_or_else(|| config.output_root.clone());
        let kinds = if self.only.is_empty() {
            ArtifactKind::ALL.to_vec()
        } else {
            self.only
        };

        let settings = RenderSettings::new(module_path, output_root);
        let report = generate(&schema, &dialect, &kinds, &settings).map_err(|e| {
            tracing::error!(kind = e.kind(), schema = %schema.name, "generation aborted");
            format!("{}: {}", e.kind(), e)
        })?;

        let files = report
            .written
            .iter()
            .map(|file| {
                tracing::info!(path = %file.path.display(), state = ?file.state, "wrote artifact");
                let relative = file.path.strip_prefix(&settings.output_root).unwrap_or(&file.path);
                GeneratedFile {
                    path: relative.display().to_string(),
                    state: file.state,
                }
            })
            .collect();
        for kind in &report.skipped {
            tracing::info!(%kind, dialect = %report.dialect, "skipped: dialect has no schema migrations");
        }

        Ok(GenerateResult {
            schema: report.schema,
            dialect: report.dialect,
            output_root: settings.output_root,
            files,
            skipped: report.skipped,
            referenced: report.referenced,
        })
    }
}
