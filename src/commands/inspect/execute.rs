use std::error::Error;

use serde::Serialize;

use super::InspectCmd;
use crate::commands::{Execute, load_schema};
use crate::config::ConfigFile;
use crate::emit::{ArtifactKind, artifact_paths};
use crate::enrich::{EnrichedField, enrich};
use crate::lowering::ResolvedRelation;
use crate::naming::NamingConventions;
use crate::schema::{DialectConfig, FieldType};

/// A lowered field as shown by inspect
#[derive(Debug, Clone, Serialize)]
pub struct InspectedField {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub go_name: String,
    pub go_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage: Option<String>,
    pub annotation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_annotation: Option<String>,
    pub validations: Vec<String>,
}

impl From<&EnrichedField<'_>> for InspectedField {
    fn from(field: &EnrichedField<'_>) -> Self {
        Self {
            name: field.name.clone(),
            field_type: field.field_type,
            go_name: field.go_name.clone(),
            go_type: field.go_type.clone(),
            column: field.column.clone(),
            storage: field.lowering.storage.clone(),
            annotation: field.constraints.annotation.clone(),
            key_annotation: field.constraints.key_annotation.clone(),
            validations: field.constraints.validations.clone(),
        }
    }
}

/// Result of the inspect command execution
#[derive(Debug, Serialize)]
pub struct InspectResult {
    pub schema: String,
    pub dialect: DialectConfig,
    pub naming: NamingConventions,
    pub fields: Vec<InspectedField>,
    pub relations: Vec<ResolvedRelation>,
    /// Distinct referenced schemas, first seen first
    pub referenced: Vec<String>,
    pub preloads: Vec<String>,
    pub search_fields: Vec<String>,
    pub search_fallback: bool,
    /// Paths `generate` would write, relative to the output root
    pub artifacts: Vec<String>,
}

impl Execute for InspectCmd {
    type Output = InspectResult;

    fn execute(self, config: &ConfigFile) -> Result<Self::Output, Box<dyn Error>> {
        let schema = load_schema(&config.schemas_dir, &self.schema)?;
        let dialect = config.resolve_dialect(self.dialect, &schema);
        tracing::info!(schema = %schema.name, dialect = dialect.name(), "inspecting schema");

        let enriched = enrich(&schema, &dialect)?;
        let artifacts = ArtifactKind::ALL
            .iter()
            .flat_map(|kind| artifact_paths(&enriched, *kind))
            .map(|path| path.display().to_string())
            .collect();

        Ok(InspectResult {
            schema: enriched.name.clone(),
            naming: enriched.naming.clone(),
            fields: enriched.fields.iter().map(InspectedField::from).collect(),
            relations: enriched.relations.relations.clone(),
            referenced: enriched.relations.referenced.clone(),
            preloads: enriched.relations.preloads.clone(),
            search_fields: enriched.search_fields.iter().map(|f| f.column.clone()).collect(),
            search_fallback: enriched.search_fallback,
            artifacts,
            dialect,
        })
    }
}
