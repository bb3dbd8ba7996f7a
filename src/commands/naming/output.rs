//! Output formatting for naming command results.

use super::execute::NamingResult;
use crate::output::Outputable;

impl Outputable for NamingResult {
    fn to_table(&self) -> String {
        let names = &self.conventions;
        let mut lines = Vec::new();

        lines.push(format!("Naming: {}", self.identifier));
        lines.push(format!("Words: {}", self.words.join(" ")));
        lines.push(String::new());

        let rows = [
            ("PascalCase", &names.singular.pascal, &names.plural.pascal),
            ("camelCase", &names.singular.camel, &names.plural.camel),
            ("snake_case", &names.singular.snake, &names.plural.snake),
            ("kebab-case", &names.singular.kebab, &names.plural.kebab),
        ];
        let width = rows.iter().map(|(_, s, _)| s.len()).max().unwrap_or(0).max("Singular".len());

        lines.push(format!("  {:<10}  {:<width$}  Plural", "", "Singular", width = width));
        for (casing, singular, plural) in rows {
            lines.push(format!("  {:<10}  {:<width$}  {}", casing, singular, plural, width = width));
        }
        lines.push(String::new());
        lines.push(format!("Table: {}", names.table));
        lines.push(format!("Go name: {}", self.go_name));

        lines.join("\n")
    }
}
