//! Output formatting for inspect command results.

use super::execute::InspectResult;
use crate::output::{Outputable, columns};

impl Outputable for InspectResult {
    fn to_table(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Schema: {} ({})", self.schema, self.dialect.name()));
        lines.push(format!("Table: {}", self.naming.table));
        lines.push(String::new());

        lines.push(format!("Fields ({}):", self.fields.len()));
        let rows: Vec<Vec<String>> = self
            .fields
            .iter()
            .map(|f| {
                vec![
                    f.name.clone(),
                    f.field_type.to_string(),
                    format!("{} {}", f.go_name, f.go_type),
                    f.column.clone().unwrap_or_else(|| "-".to_string()),
                    f.annotation.clone(),
                ]
            })
            .collect();
        for line in columns(&["NAME", "TYPE", "GO", "COLUMN", "TAG"], &rows) {
            lines.push(format!("  {}", line));
        }

        if !self.relations.is_empty() {
            lines.push(String::new());
            lines.push(format!("Relations ({}):", self.relations.len()));
            for r in &self.relations {
                let link = match &r.join_table {
                    Some(join) => format!("via {}", join),
                    None => format!("on {}", r.foreign_key),
                };
                let load = if r.eager { "eager" } else { "lazy" };
                lines.push(format!("  {} -> {}  {}  {}  {}", r.field, r.target, r.kind.name(), link, load));
            }
        }

        lines.push(String::new());
        let fallback = if self.search_fallback { " (fallback)" } else { "" };
        lines.push(format!("Search: {}{}", self.search_fields.join(", "), fallback));

        lines.push(String::new());
        lines.push(format!("Artifacts ({}):", self.artifacts.len()));
        for path in &self.artifacts {
            lines.push(format!("  {}", path));
        }

        lines.join("\n")
    }
}
