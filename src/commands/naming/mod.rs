mod execute;
mod output;
mod output_tests;

pub use execute::NamingResult;

use clap::Args;

/// Show every naming convention derived from an identifier
#[derive(Args, Debug)]
#[command(after_help = "\
Examples:
  schema_forge naming BlogPost               # Pascal, camel, snake, kebab, plural, table
  schema_forge naming HTTPServer -o json     # Acronym runs split before the last capital
  schema_forge naming 'order line item'      # Separators collapse to word breaks")]
pub struct NamingCmd {
    /// Identifier to normalize (any casing or separators)
    pub identifier: String,
}
