//! Output formatting for generate command results.

use super::execute::GenerateResult;
use crate::emit::WriteState;
use crate::output::Outputable;

impl Outputable for GenerateResult {
    fn to_table(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!(
            "Generated: {} ({}) -> {}",
            self.schema,
            self.dialect,
            self.output_root.display()
        ));
        lines.push(String::new());

        if self.files.is_empty() {
            lines.push("No files written.".to_string());
        } else {
            lines.push(format!("Files ({}):", self.files.len()));
            for file in &self.files {
                let state = match file.state {
                    WriteState::Created => "created",
                    WriteState::Overwritten => "overwritten",
                };
                lines.push(format!("  {:<11}  {}", state, file.path));
            }
        }

        if !self.skipped.is_empty() {
            let kinds: Vec<String> = self.skipped.iter().map(|k| k.to_string()).collect();
            lines.push(String::new());
            lines.push(format!(
                "Skipped: {} ({} has no schema migrations)",
                kinds.join(", "),
                self.dialect
            ));
        }

        if !self.referenced.is_empty() {
            lines.push(String::new());
            lines.push(format!("References: {}", self.referenced.join(", ")));
        }

        lines.join("\n")
    }
}
