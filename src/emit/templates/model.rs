//! Model artifact: the Go struct for a resource.

use std::fmt::{self, Write};

use super::go::{Imports, StructField, write_preamble, write_struct};
use super::{DialectTemplates, templates_for};
use crate::enrich::EnrichedSchema;
use crate::lowering::GEO_COMPONENTS;
use crate::naming::pascal_case;
use crate::schema::FieldType;

pub fn render(schema: &EnrichedSchema<'_>) -> Result<String, fmt::Error> {
    let templates = templates_for(&schema.dialect);
    let model = &schema.naming.singular.pascal;

    let mut imports = Imports::default();
    imports.std("time").external("github.com/google/uuid");
    templates.model_imports(&mut imports);
    for field in &schema.fields {
        if let Some(import) = field.lowering.primitive.import() {
            imports.add(import);
        }
    }

    let mut members = vec![templates.id_field()];
    for field in &schema.fields {
        if let Some(key) = &field.foreign_key {
            members.push(StructField::new(&key.go_name, &key.go_type, &key.annotation));
        }
        members.push(StructField::new(
            &field.go_name,
            &field.go_type,
            &field.constraints.annotation,
        ));
    }
    members.extend(templates.trailing_fields());

    let mut out = String::new();
    write_preamble(&mut out, "models")?;
    imports.write(&mut out)?;

    let description = schema.source.description.trim();
    if description.is_empty() {
        writeln!(out, "// {} is the {} resource.", model, schema.source.display_name)?;
    } else {
        writeln!(out, "// {} {}", model, description)?;
    }
    write_struct(&mut out, model, &members)?;
    writeln!(out)?;
    templates.write_model_extras(schema, &mut out)?;
    Ok(out)
}

/// Whether the model needs the shared `GeoPoint` type.
pub fn uses_geo_point(schema: &EnrichedSchema<'_>) -> bool {
    schema
        .fields
        .iter()
        .any(|f| f.field_type == FieldType::GeoPoint)
}

/// Shared `GeoPoint` declaration. Identical for every schema so concurrent
/// models can overwrite it freely.
pub fn render_geo_point() -> Result<String, fmt::Error> {
    let members: Vec<StructField> = GEO_COMPONENTS
        .iter()
        .map(|component| {
            StructField::new(
                pascal_case(&[component.to_string()]),
                "float64",
                format!("json:\"{0}\" bson:\"{0}\"", component),
            )
        })
        .collect();

    let mut out = String::new();
    write_preamble(&mut out, "models")?;
    writeln!(out, "// GeoPoint is a latitude/longitude pair.")?;
    write_struct(&mut out, "GeoPoint", &members)?;
    Ok(out)
}
