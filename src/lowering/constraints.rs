//! Constraint and validation lowering.
//!
//! Turns per-field constraints into a Go struct tag and into Go validation
//! statements. Nothing is executed here; the output is code that validates at
//! artifact runtime.
//!
//! Tag clause order is fixed so regenerated files diff cleanly:
//! serialization keys, then ORM options (foreign key, uniqueness, index,
//! not-null, default, size), then binding keywords (required, format, length,
//! numeric range, enum membership).

use serde::Serialize;

use super::relations::{default_foreign_key, relation_kind_hint};
use super::types::lower_type_sized;
use crate::error::{GenError, Result};
use crate::naming::{go_identifier, normalize};
use crate::schema::{DialectConfig, DialectFamily, Field, FieldType, RelationKind};

/// Lowered metadata for one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoweredConstraints {
    /// Struct tag body for the field as declared (without backticks).
    pub annotation: String,

    /// Struct tag for the generated foreign-key column of a relational
    /// `reference` field.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_annotation: Option<String>,

    /// Go statements, one per applicable rule class, in evaluation order.
    pub validations: Vec<String>,
}

/// Named Go regexps referenced by format checks, declared once per file.
pub const FORMAT_PATTERNS: &[(&str, &str)] = &[
    ("emailPattern", r"^[^@\s]+@[^@\s]+\.[^@\s]+$"),
    ("urlPattern", r"^https?://[^\s/$.?#].[^\s]*$"),
    ("slugPattern", r"^[a-z0-9]+(?:-[a-z0-9]+)*$"),
    ("hexColorPattern", r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6})$"),
    ("phonePattern", r"^\+?[1-9][0-9]{6,14}$"),
];

/// Characters that would end or corrupt a quoted struct tag value.
const TAG_BREAKING: &[char] = &['"', '`', '\\'];

/// Check constraint legality and lower it for `dialect`.
///
/// `owner` is the schema the field belongs to; it scopes the names of the
/// package-level regexps the validation statements refer to.
pub fn lower_constraints(field: &Field, owner: &str, dialect: &DialectConfig) -> Result<LoweredConstraints> {
    check_legality(field)?;

    let json_key = normalize(&field.name).singular.snake;

    let (annotation, key_annotation) = match (field.field_type, dialect.family()) {
        (FieldType::Reference, DialectFamily::Relational) => {
            let fk = default_foreign_key(field);
            let relation_tag = join_clauses(vec![
                Some(format!("json:\"{},omitempty\"", json_key)),
                gorm_tag(orm_options(field, dialect)),
            ]);
            let key_tag = join_clauses(vec![
                Some(format!("json:\"{}\"", fk)),
                gorm_tag(foreign_key_column_options(field, dialect)),
                binding_tag(binding_keywords(field)),
            ]);
            (relation_tag, Some(key_tag))
        }
        (FieldType::Reference, _) => {
            let fk = default_foreign_key(field);
            let tag = join_clauses(vec![
                Some(serialization_keys(&fk, dialect, false)),
                binding_tag(binding_keywords(field)),
            ]);
            (tag, None)
        }
        (_, DialectFamily::Relational) => {
            let tag = join_clauses(vec![
                Some(serialization_keys(&json_key, dialect, field.field_type.is_relation())),
                gorm_tag(orm_options(field, dialect)),
                binding_tag(binding_keywords(field)),
            ]);
            (tag, None)
        }
        _ => {
            let tag = join_clauses(vec![
                Some(serialization_keys(&json_key, dialect, false)),
                binding_tag(binding_keywords(field)),
            ]);
            (tag, None)
        }
    };

    Ok(LoweredConstraints {
        annotation,
        key_annotation,
        validations: validation_statements(field, owner),
    })
}

fn check_legality(field: &Field) -> Result<()> {
    let c = &field.constraints;
    let name = field.name.as_str();
    let field_type = field.field_type;

    if let (Some(min), Some(max)) = (c.min_length, c.max_length) {
        if min > max {
            return Err(GenError::invalid_constraint(
                name,
                format!("min_length {} is greater than max_length {}", min, max),
            ));
        }
    }
    if let (Some(min), Some(max)) = (c.min, c.max) {
        if min > max {
            return Err(GenError::invalid_constraint(
                name,
                format!("min {} is greater than max {}", format_number(min), format_number(max)),
            ));
        }
    }
    if (c.min_length.is_some() || c.max_length.is_some()) && !field_type.is_text() {
        return Err(GenError::invalid_constraint(
            name,
            format!("length bounds do not apply to {} fields", field_type),
        ));
    }
    if (c.min.is_some() || c.max.is_some()) && !field_type.is_numeric() {
        return Err(GenError::invalid_constraint(
            name,
            format!("numeric bounds do not apply to {} fields", field_type),
        ));
    }
    if let Some(pattern) = &c.pattern {
        if !field_type.is_text() {
            return Err(GenError::invalid_constraint(
                name,
                format!("pattern does not apply to {} fields", field_type),
            ));
        }
        regex::Regex::new(pattern).map_err(|e| {
            GenError::invalid_constraint(name, format!("invalid pattern '{}': {}", pattern, e))
        })?;
    }
    if field_type == FieldType::Enum && c.values.is_empty() {
        return Err(GenError::invalid_constraint(name, "enum field has no allowed values"));
    }
    if field_type != FieldType::Enum && !c.values.is_empty() {
        return Err(GenError::invalid_constraint(
            name,
            format!("allowed values only apply to enum fields, not {}", field_type),
        ));
    }
    if let Some(default) = &field.default {
        // Rendered into the gorm clause, where `;` separates options
        let rendered = render_default(default);
        if let Some(bad) = rendered.chars().find(|c| TAG_BREAKING.contains(c) || *c == ';') {
            return Err(GenError::invalid_constraint(
                name,
                format!("default value {} contains '{}', which a struct tag cannot carry", rendered, bad),
            ));
        }
    }
    for value in &c.values {
        // Rendered into `oneof=`, space separated with `'` quoting
        if let Some(bad) = value.chars().find(|c| TAG_BREAKING.contains(c) || matches!(*c, ',' | '\'')) {
            return Err(GenError::invalid_constraint(
                name,
                format!("enum value {:?} contains '{}', which a struct tag cannot carry", value, bad),
            ));
        }
    }
    if field.relation.is_some() && !field_type.is_relation() {
        return Err(GenError::invalid_constraint(
            name,
            format!("relation settings do not apply to {} fields", field_type),
        ));
    }
    Ok(())
}

// =============================================================================
// Struct tags
// =============================================================================

fn join_clauses(clauses: Vec<Option<String>>) -> String {
    clauses.into_iter().flatten().collect::<Vec<_>>().join(" ")
}

fn serialization_keys(key: &str, dialect: &DialectConfig, omit_empty: bool) -> String {
    let json = if omit_empty {
        format!("json:\"{},omitempty\"", key)
    } else {
        format!("json:\"{}\"", key)
    };
    match dialect.family() {
        DialectFamily::Relational => json,
        DialectFamily::Document => format!("{} bson:\"{}\"", json, key),
        DialectFamily::KeyValue => format!("{} redis:\"{}\"", json, key),
    }
}

fn gorm_tag(options: Vec<String>) -> Option<String> {
    if options.is_empty() {
        None
    } else {
        Some(format!("gorm:\"{}\"", options.join(";")))
    }
}

fn binding_tag(keywords: Vec<String>) -> Option<String> {
    if keywords.is_empty() {
        None
    } else {
        Some(format!("binding:\"{}\"", keywords.join(",")))
    }
}

fn orm_options(field: &Field, dialect: &DialectConfig) -> Vec<String> {
    let c = &field.constraints;
    let mut options = Vec::new();

    match field.field_type {
        FieldType::Reference => {
            options.push(format!("foreignKey:{}", go_identifier(&default_foreign_key(field))));
            if let Some(local) = field.relation.as_ref().and_then(|r| r.local_key.as_deref()) {
                options.push(format!("references:{}", go_identifier(local)));
            }
            return options;
        }
        FieldType::ReferenceCollection => {
            match (relation_kind_hint(field), field.relation.as_ref().and_then(|r| r.join_table.as_deref())) {
                (RelationKind::ManyToMany, Some(join_table)) => {
                    options.push(format!("many2many:{}", join_table));
                }
                _ => {
                    options.push(format!("foreignKey:{}", go_identifier(&default_foreign_key(field))));
                }
            }
            return options;
        }
        _ => {}
    }

    if c.unique {
        options.push("uniqueIndex".to_string());
    } else if c.index {
        options.push("index".to_string());
    }
    if field.required && !c.nullable {
        options.push("not null".to_string());
    }
    if let Some(default) = &field.default {
        options.push(format!("default:{}", render_default(default)));
    }
    if field.field_type.is_text() {
        if let Some(max) = c.max_length {
            options.push(format!("size:{}", max));
        }
    }

    match field.field_type {
        FieldType::UniqueId | FieldType::StructuredData => {
            if let Some(storage) = lower_type_sized(field.field_type, dialect, None).storage {
                options.push(format!("type:{}", storage));
            }
        }
        FieldType::GeoPoint => {
            options.push("embedded".to_string());
            options.push(format!("embeddedPrefix:{}_", normalize(&field.name).singular.snake));
        }
        _ => {}
    }

    options
}

fn foreign_key_column_options(field: &Field, dialect: &DialectConfig) -> Vec<String> {
    let mut options = vec!["index".to_string()];
    if field.required && !field.constraints.nullable {
        options.push("not null".to_string());
    }
    if let Some(storage) = lower_type_sized(FieldType::Reference, dialect, None).storage {
        options.push(format!("type:{}", storage));
    }
    options
}

fn render_default(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// go-playground keywords. It has no regex keyword, so an explicit pattern
/// is only enforced by the generated `Validate` function.
fn binding_keywords(field: &Field) -> Vec<String> {
    let c = &field.constraints;
    let mut rules = Vec::new();

    if let Some(format) = format_keyword(field.field_type) {
        rules.push(format.to_string());
    }
    if field.field_type.is_text() {
        if let Some(min) = c.min_length {
            rules.push(format!("min={}", min));
        }
        if let Some(max) = c.max_length {
            rules.push(format!("max={}", max));
        }
    }
    if field.field_type.is_numeric() {
        if let Some(min) = c.min {
            rules.push(format!("gte={}", format_number(min)));
        }
        if let Some(max) = c.max {
            rules.push(format!("lte={}", format_number(max)));
        }
    }
    if field.field_type == FieldType::Enum && !c.values.is_empty() {
        let values: Vec<String> = c
            .values
            .iter()
            .map(|v| if v.contains(' ') { format!("'{}'", v) } else { v.clone() })
            .collect();
        rules.push(format!("oneof={}", values.join(" ")));
    }

    let requirable = !matches!(
        field.field_type,
        FieldType::Boolean | FieldType::GeoPoint | FieldType::ReferenceCollection
    );
    if field.required && requirable {
        rules.insert(0, "required".to_string());
    } else if !rules.is_empty() {
        rules.insert(0, "omitempty".to_string());
    }
    rules
}

fn format_keyword(field_type: FieldType) -> Option<&'static str> {
    match field_type {
        FieldType::Email => Some("email"),
        FieldType::Url => Some("url"),
        FieldType::Color => Some("hexcolor"),
        FieldType::Phone => Some("e164"),
        _ => None,
    }
}

/// Render a bound without a trailing `.0` for whole numbers.
pub(crate) fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

// =============================================================================
// Validation statements
// =============================================================================

/// Package-level regexp holding the explicit pattern of `field`, scoped by
/// the owning schema so services of several schemas share a package.
pub fn pattern_var(owner: &str, field: &Field) -> String {
    format!("{}{}Pattern", normalize(owner).singular.camel, go_identifier(&field.name))
}

/// Go statements validating `input.<Field>`, in rule-class order.
///
/// A field without applicable rules gets a comment placeholder.
pub fn validation_statements(field: &Field, owner: &str) -> Vec<String> {
    let c = &field.constraints;
    let label = normalize(&field.name).singular.snake;
    let accessor = match field.field_type {
        FieldType::Reference => format!("input.{}", go_identifier(&default_foreign_key(field))),
        _ => format!("input.{}", go_identifier(&field.name)),
    };
    let is_text = field.field_type.is_text();
    let mut statements = Vec::new();

    if field.required {
        if let Some(check) = required_check(field.field_type, &accessor) {
            statements.push(guard(&check, &format!("{} is required", label)));
        }
    }

    if let Some(pattern_var) = format_pattern_var(field.field_type) {
        statements.push(guard(
            &format!("{} != \"\" && !{}.MatchString({})", accessor, pattern_var, accessor),
            &format!("{} has an invalid format", label),
        ));
    }

    if is_text {
        let count = format!("utf8.RuneCountInString({})", accessor);
        let optional = if field.required { "" } else { "n > 0 && " };
        match (c.min_length, c.max_length) {
            (Some(min), Some(max)) => statements.push(guard(
                &format!("n := {}; {}(n < {} || n > {})", count, optional, min, max),
                &format!("{} must be between {} and {} characters", label, min, max),
            )),
            (Some(min), None) => statements.push(guard(
                &format!("n := {}; {}n < {}", count, optional, min),
                &format!("{} must be at least {} characters", label, min),
            )),
            (None, Some(max)) => statements.push(guard(
                &format!("n := {}; n > {}", count, max),
                &format!("{} must be at most {} characters", label, max),
            )),
            (None, None) => {}
        }
    }

    if field.field_type.is_numeric() {
        match (c.min, c.max) {
            (Some(min), Some(max)) => statements.push(guard(
                &format!(
                    "{} < {} || {} > {}",
                    accessor,
                    format_number(min),
                    accessor,
                    format_number(max)
                ),
                &format!(
                    "{} must be between {} and {}",
                    label,
                    format_number(min),
                    format_number(max)
                ),
            )),
            (Some(min), None) => statements.push(guard(
                &format!("{} < {}", accessor, format_number(min)),
                &format!("{} must be at least {}", label, format_number(min)),
            )),
            (None, Some(max)) => statements.push(guard(
                &format!("{} > {}", accessor, format_number(max)),
                &format!("{} must be at most {}", label, format_number(max)),
            )),
            (None, None) => {}
        }
    }

    if is_text {
        if c.pattern.is_some() {
            statements.push(guard(
                &format!(
                    "{} != \"\" && !{}.MatchString({})",
                    accessor,
                    pattern_var(owner, field),
                    accessor
                ),
                &format!("{} does not match the required pattern", label),
            ));
        }
    }

    if field.field_type == FieldType::Enum && !c.values.is_empty() {
        let values = c
            .values
            .iter()
            .map(|v| go_string_literal(v))
            .collect::<Vec<_>>()
            .join(", ");
        let optional = if field.required {
            String::new()
        } else {
            format!("{} != \"\" && ", accessor)
        };
        statements.push(guard(
            &format!("{}!slices.Contains([]string{{{}}}, {})", optional, values, accessor),
            &format!("{} must be one of: {}", label, c.values.join(", ")),
        ));
    }

    if statements.is_empty() {
        statements.push(format!("// no validation rules for {}", label));
    }
    statements
}

fn required_check(field_type: FieldType, accessor: &str) -> Option<String> {
    match field_type {
        FieldType::ShortText
        | FieldType::LongText
        | FieldType::Email
        | FieldType::Url
        | FieldType::Slug
        | FieldType::Color
        | FieldType::Phone
        | FieldType::FileRef
        | FieldType::ImageRef
        | FieldType::Enum => Some(format!("strings.TrimSpace({}) == \"\"", accessor)),
        FieldType::Integer | FieldType::Float | FieldType::Money => {
            Some(format!("{} <= 0", accessor))
        }
        FieldType::Timestamp => Some(format!("{}.IsZero()", accessor)),
        FieldType::UniqueId | FieldType::Reference => Some(format!("{} == uuid.Nil", accessor)),
        FieldType::StructuredData | FieldType::ReferenceCollection => {
            Some(format!("len({}) == 0", accessor))
        }
        FieldType::Boolean | FieldType::GeoPoint => None,
    }
}

fn format_pattern_var(field_type: FieldType) -> Option<&'static str> {
    match field_type {
        FieldType::Email => Some("emailPattern"),
        FieldType::Url => Some("urlPattern"),
        FieldType::Slug => Some("slugPattern"),
        FieldType::Color => Some("hexColorPattern"),
        FieldType::Phone => Some("phonePattern"),
        _ => None,
    }
}

fn guard(condition: &str, message: &str) -> String {
    format!(
        "if {} {{\n\treturn errors.New({})\n}}",
        condition,
        go_string_literal(message)
    )
}

/// Go string literal: a raw string when possible, otherwise an escaped one.
pub(crate) fn go_string_literal(value: &str) -> String {
    if !value.contains('`') && value.contains('\\') {
        return format!("`{}`", value);
    }
    let escaped = value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n");
    format!("\"{}\"", escaped)
}
