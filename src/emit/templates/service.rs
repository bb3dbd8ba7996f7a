//! Service artifact: business rules and the generated `Validate` function.

use std::fmt::{self, Write};

use super::go::{Imports, indent, write_preamble};
use super::record_vars;
use crate::enrich::EnrichedSchema;
use crate::lowering::{FORMAT_PATTERNS, go_string_literal, pattern_var};

/// Packages referenced by validation statements, keyed by the selector that
/// gives them away.
const STATEMENT_IMPORTS: &[(&str, &str)] = &[
    ("strings.", "strings"),
    ("utf8.", "unicode/utf8"),
    ("slices.", "slices"),
];

pub fn render(schema: &EnrichedSchema<'_>, module_path: &str) -> Result<String, fmt::Error> {
    let model = &schema.naming.singular.pascal;
    let (one, _) = record_vars(schema);
    let statements: Vec<&str> = schema
        .fields
        .iter()
        .flat_map(|f| f.constraints.validations.iter().map(String::as_str))
        .collect();
    let explicit_patterns: Vec<(String, &str)> = schema
        .fields
        .iter()
        .filter(|f| f.field_type.is_text())
        .filter_map(|f| {
            f.source
                .constraints
                .pattern
                .as_deref()
                .map(|pattern| (pattern_var(&schema.name, f.source), pattern))
        })
        .collect();

    let mut imports = Imports::default();
    imports
        .std("context")
        .std("errors")
        .std("fmt")
        .external("github.com/google/uuid")
        .local(format!("{}/internal/models", module_path))
        .local(format!("{}/internal/repository", module_path));
    for (selector, package) in STATEMENT_IMPORTS {
        if statements.iter().any(|s| s.contains(selector)) {
            imports.std(package);
        }
    }
    if !explicit_patterns.is_empty() {
        imports.std("regexp");
    }

    let mut out = String::new();
    write_preamble(&mut out, "services")?;
    imports.write(&mut out)?;

    writeln!(out, "// ErrInvalid{} wraps every validation failure of a {}.", model, model)?;
    writeln!(
        out,
        "var ErrInvalid{} = errors.New(\"invalid {}\")",
        model,
        schema.naming.singular.snake.replace('_', " ")
    )?;
    writeln!(out)?;

    if !explicit_patterns.is_empty() {
        let width = explicit_patterns.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
        writeln!(out, "// Patterns declared on {} fields, compiled once.", model)?;
        writeln!(out, "var (")?;
        for (name, pattern) in &explicit_patterns {
            writeln!(
                out,
                "\t{:<w$} = regexp.MustCompile({})",
                name,
                go_string_literal(pattern),
                w = width
            )?;
        }
        writeln!(out, ")")?;
        writeln!(out)?;
    }

    writeln!(out, "// {}Service holds the business rules for {}.", model, model)?;
    writeln!(out, "type {}Service struct {{", model)?;
    writeln!(out, "\trepo repository.{}Repository", model)?;
    writeln!(out, "}}")?;
    writeln!(out)?;
    writeln!(out, "func New{0}Service(repo repository.{0}Repository) *{0}Service {{", model)?;
    writeln!(out, "\treturn &{}Service{{repo: repo}}", model)?;
    writeln!(out, "}}")?;
    writeln!(out)?;

    writeln!(out, "// Validate{} checks a {} before it is written.", model, model)?;
    writeln!(out, "func Validate{}(input *models.{}) error {{", model, model)?;
    for statement in &statements {
        writeln!(out, "{}", indent(statement, 1))?;
    }
    writeln!(out, "\treturn nil")?;
    writeln!(out, "}}")?;
    writeln!(out)?;

    let methods = format!(
        "// List returns one page of {model} records matching query.
func (s *{model}Service) List(ctx context.Context, query string, page, pageSize int) ([]models.{model}, int64, error) {{
	if page < 1 {{
		page = 1
	}}
	if pageSize < 1 || pageSize > 100 {{
		pageSize = 20
	}}
	return s.repo.List(ctx, query, (page-1)*pageSize, pageSize)
}}

func (s *{model}Service) Get(ctx context.Context, id uuid.UUID) (*models.{model}, error) {{
	return s.repo.Get(ctx, id)
}}

func (s *{model}Service) Create(ctx context.Context, {one} *models.{model}) (*models.{model}, error) {{
	if err := Validate{model}({one}); err != nil {{
		return nil, fmt.Errorf(\"%w: %v\", ErrInvalid{model}, err)
	}}
	if err := s.repo.Create(ctx, {one}); err != nil {{
		return nil, err
	}}
	return {one}, nil
}}

// Update replaces the {model} with the given id, keeping its creation time.
func (s *{model}Service) Update(ctx context.Context, id uuid.UUID, {one} *models.{model}) (*models.{model}, error) {{
	existing, err := s.repo.Get(ctx, id)
	if err != nil {{
		return nil, err
	}}
	{one}.ID = existing.ID
	{one}.CreatedAt = existing.CreatedAt
	if err := Validate{model}({one}); err != nil {{
		return nil, fmt.Errorf(\"%w: %v\", ErrInvalid{model}, err)
	}}
	if err := s.repo.Update(ctx, {one}); err != nil {{
		return nil, err
	}}
	return {one}, nil
}}

func (s *{model}Service) Delete(ctx context.Context, id uuid.UUID) error {{
	return s.repo.Delete(ctx, id)
}}
"
    );
    out.push_str(&methods);
    Ok(out)
}

/// Whether any validation statement reads one of the shared format patterns.
pub fn uses_format_patterns(schema: &EnrichedSchema<'_>) -> bool {
    schema
        .fields
        .iter()
        .flat_map(|f| f.constraints.validations.iter())
        .any(|s| FORMAT_PATTERNS.iter().any(|(name, _)| s.contains(&format!("{}.", name))))
}

/// Shared format patterns. Identical for every schema.
pub fn render_patterns() -> Result<String, fmt::Error> {
    let width = FORMAT_PATTERNS.iter().map(|(name, _)| name.len()).max().unwrap_or(0);

    let mut out = String::new();
    write_preamble(&mut out, "services")?;
    writeln!(out, "import \"regexp\"")?;
    writeln!(out)?;
    writeln!(out, "// Format checks shared by the generated Validate functions.")?;
    writeln!(out, "var (")?;
    for (name, pattern) in FORMAT_PATTERNS {
        writeln!(out, "\t{:<w$} = regexp.MustCompile(`{}`)", name, pattern, w = width)?;
    }
    writeln!(out, ")")?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrich::enrich;
    use crate::schema::{Constraints, DialectConfig, Field, FieldType, ResourceSchema};
    use rstest::rstest;

    fn contact() -> ResourceSchema {
        ResourceSchema::new(
            "Contact",
            vec![
                Field::new("fullName", FieldType::ShortText)
                    .required()
                    .with_constraints(Constraints {
                        min_length: Some(2),
                        max_length: Some(80),
                        ..Default::default()
                    }),
                Field::new("email", FieldType::Email).required(),
                Field::new("subscribed", FieldType::Boolean),
            ],
        )
    }

    #[rstest]
    fn test_validate_function_collects_field_statements() {
        let schema = contact();
        let enriched = enrich(&schema, &DialectConfig::Postgres).unwrap();
        let out = render(&enriched, "example.com/crm").unwrap();

        assert!(out.contains("func ValidateContact(input *models.Contact) error {"));
        assert!(out.contains("\tif strings.TrimSpace(input.FullName) == \"\" {\n\t\treturn errors.New(\"full_name is required\")\n\t}"));
        assert!(out.contains("emailPattern.MatchString(input.Email)"));
        assert!(out.contains("\t// no validation rules for subscribed\n"));
        assert!(out.contains("\t\"unicode/utf8\"\n"));
        assert!(out.contains("\t\"strings\"\n"));
        assert!(!out.contains("\t\"slices\"\n"));
        assert!(uses_format_patterns(&enriched));
    }

    #[rstest]
    fn test_service_wraps_validation_errors() {
        let schema = contact();
        let enriched = enrich(&schema, &DialectConfig::Mongodb { database: None }).unwrap();
        let out = render(&enriched, "example.com/crm").unwrap();
        assert!(out.contains("var ErrInvalidContact = errors.New(\"invalid contact\")"));
        assert!(out.contains("fmt.Errorf(\"%w: %v\", ErrInvalidContact, err)"));
        assert!(out.contains("func NewContactService(repo repository.ContactRepository) *ContactService {"));
    }

    #[rstest]
    fn test_explicit_patterns_hoisted_to_package_level() {
        let schema = ResourceSchema::new(
            "Voucher",
            vec![
                Field::new("code", FieldType::ShortText).with_constraints(Constraints {
                    pattern: Some(r"^[A-Z]{3}\d$".to_string()),
                    ..Default::default()
                }),
                Field::new("batch", FieldType::ShortText).with_constraints(Constraints {
                    pattern: Some("^b-[0-9]+$".to_string()),
                    ..Default::default()
                }),
            ],
        );
        let enriched = enrich(&schema, &DialectConfig::Postgres).unwrap();
        let out = render(&enriched, "example.com/shop").unwrap();

        assert!(out.contains(
            "var (\n\tvoucherCodePattern  = regexp.MustCompile(`^[A-Z]{3}\\d$`)\n\tvoucherBatchPattern = regexp.MustCompile(\"^b-[0-9]+$\")\n)\n"
        ));
        assert!(out.contains("\t\"regexp\"\n"));
        let validate = &out[out.find("func ValidateVoucher").unwrap()..];
        assert!(!validate.contains("MustCompile"));
        assert!(validate.contains("!voucherCodePattern.MatchString(input.Code)"));
    }

    #[rstest]
    fn test_no_explicit_patterns_no_regexp_import() {
        let schema = contact();
        let enriched = enrich(&schema, &DialectConfig::Postgres).unwrap();
        let out = render(&enriched, "example.com/crm").unwrap();
        assert!(!out.contains("\t\"regexp\"\n"));
    }

    #[rstest]
    fn test_no_format_fields_no_patterns() {
        let schema = ResourceSchema::new("Tag", vec![Field::new("label", FieldType::ShortText)]);
        let enriched = enrich(&schema, &DialectConfig::Postgres).unwrap();
        assert!(!uses_format_patterns(&enriched));
    }

    #[rstest]
    fn test_patterns_file() {
        let out = render_patterns().unwrap();
        assert!(out.contains("import \"regexp\""));
        for (name, _) in FORMAT_PATTERNS {
            assert!(out.contains(&format!("\t{}", name)));
        }
    }
}
