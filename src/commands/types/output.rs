//! Output formatting for types command results.

use super::execute::TypesResult;
use crate::output::{Outputable, columns};

impl Outputable for TypesResult {
    fn to_table(&self) -> String {
        let mut lines = Vec::new();

        let migrations = if self.supports_migrations { "migrations" } else { "no migrations" };
        lines.push(format!("Types: {} ({})", self.dialect.name(), migrations));
        lines.push(String::new());

        let rows: Vec<Vec<String>> = self
            .types
            .iter()
            .map(|row| {
                let lowering = &row.lowering;
                let storage = match (&lowering.storage, lowering.components.is_empty()) {
                    (None, _) => "-".to_string(),
                    (Some(storage), true) => storage.clone(),
                    (Some(storage), false) => format!("{} x {}", lowering.components.len(), storage),
                };
                let interchange = match lowering.interchange.format {
                    Some(format) => format!("{}/{}", lowering.interchange.kind, format),
                    None => lowering.interchange.kind.to_string(),
                };
                vec![
                    lowering.field_type.to_string(),
                    row.go_type.clone(),
                    storage,
                    interchange,
                    lowering.example.to_string(),
                ]
            })
            .collect();

        lines.extend(columns(&["TYPE", "GO", "STORAGE", "INTERCHANGE", "EXAMPLE"], &rows));
        lines.join("\n")
    }
}
