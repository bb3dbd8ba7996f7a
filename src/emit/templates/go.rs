//! Go source building blocks shared by the artifact templates.

use std::collections::BTreeSet;
use std::fmt::{self, Write};

pub const GENERATED_HEADER: &str = "// Code generated by schema_forge. DO NOT EDIT.";

/// One struct member: Go name, Go type and the tag body (may be empty).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructField {
    pub name: String,
    pub go_type: String,
    pub tag: String,
}

impl StructField {
    pub fn new(name: impl Into<String>, go_type: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            go_type: go_type.into(),
            tag: tag.into(),
        }
    }
}

/// Import block, standard library first, then third-party and local packages.
#[derive(Debug, Default)]
pub struct Imports {
    std: BTreeSet<String>,
    external: BTreeSet<String>,
    local: BTreeSet<String>,
}

impl Imports {
    pub fn std(&mut self, path: &str) -> &mut Self {
        self.std.insert(path.to_string());
        self
    }

    pub fn external(&mut self, path: &str) -> &mut Self {
        self.external.insert(path.to_string());
        self
    }

    pub fn local(&mut self, path: String) -> &mut Self {
        self.local.insert(path);
        self
    }

    /// Classify a path the way goimports groups it.
    pub fn add(&mut self, path: &str) -> &mut Self {
        if path.contains('.') {
            self.external(path)
        } else {
            self.std(path)
        }
    }

    pub fn write(&self, out: &mut String) -> fmt::Result {
        let groups: Vec<&BTreeSet<String>> = [&self.std, &self.external, &self.local]
            .into_iter()
            .filter(|g| !g.is_empty())
            .collect();
        if groups.is_empty() {
            return Ok(());
        }

        writeln!(out, "import (")?;
        for (i, group) in groups.iter().enumerate() {
            if i > 0 {
                writeln!(out)?;
            }
            for path in group.iter() {
                writeln!(out, "\t\"{}\"", path)?;
            }
        }
        writeln!(out, ")")?;
        writeln!(out)
    }
}

/// File preamble: generated marker and package clause.
pub fn write_preamble(out: &mut String, package: &str) -> fmt::Result {
    writeln!(out, "{}", GENERATED_HEADER)?;
    writeln!(out)?;
    writeln!(out, "package {}", package)?;
    writeln!(out)
}

/// Struct declaration with names, types and tags aligned in columns.
pub fn write_struct(out: &mut String, name: &str, fields: &[StructField]) -> fmt::Result {
    let name_width = fields.iter().map(|f| f.name.len()).max().unwrap_or(0);
    let type_width = fields
        .iter()
        .filter(|f| !f.tag.is_empty())
        .map(|f| f.go_type.len())
        .max()
        .unwrap_or(0);

    writeln!(out, "type {} struct {{", name)?;
    for field in fields {
        if field.tag.is_empty() {
            writeln!(out, "\t{:<nw$} {}", field.name, field.go_type, nw = name_width)?;
        } else {
            writeln!(
                out,
                "\t{:<nw$} {:<tw$} `{}`",
                field.name,
                field.go_type,
                field.tag,
                nw = name_width,
                tw = type_width
            )?;
        }
    }
    writeln!(out, "}}")
}

/// Indent every non-empty line of `block` by `tabs` tabs.
pub fn indent(block: &str, tabs: usize) -> String {
    let prefix = "\t".repeat(tabs);
    block
        .lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{}{}", prefix, line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_imports_grouped_and_sorted() {
        let mut imports = Imports::default();
        imports
            .add("time")
            .add("github.com/google/uuid")
            .add("context")
            .local("example.com/app/internal/models".to_string());
        let mut out = String::new();
        imports.write(&mut out).unwrap();
        assert_eq!(
            out,
            "import (\n\t\"context\"\n\t\"time\"\n\n\t\"github.com/google/uuid\"\n\n\t\"example.com/app/internal/models\"\n)\n\n"
        );
    }

    #[rstest]
    fn test_empty_imports_render_nothing() {
        let mut out = String::new();
        Imports::default().write(&mut out).unwrap();
        assert!(out.is_empty());
    }

    #[rstest]
    fn test_struct_columns_are_aligned() {
        let mut out = String::new();
        write_struct(
            &mut out,
            "Post",
            &[
                StructField::new("ID", "uuid.UUID", "json:\"id\""),
                StructField::new("Title", "string", "json:\"title\""),
            ],
        )
        .unwrap();
        assert_eq!(
            out,
            "type Post struct {\n\tID    uuid.UUID `json:\"id\"`\n\tTitle string    `json:\"title\"`\n}\n"
        );
    }

    #[rstest]
    fn test_indent_skips_blank_lines() {
        assert_eq!(indent("a\n\nb", 1), "\ta\n\n\tb");
    }
}
