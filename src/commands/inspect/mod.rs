mod execute;
mod execute_tests;
mod output;

pub use execute::{InspectResult, InspectedField};

use clap::Args;

use crate::schema::DialectName;

/// Show the enriched view of a schema (names, lowered fields, relations)
#[derive(Args, Debug)]
#[command(after_help = "\
Examples:
  schema_forge inspect -s Post                # Enriched view for the schema's own dialect
  schema_forge inspect -s Post -d mongodb     # Same schema lowered for a document store
  schema_forge inspect -s post -o json        # Lookup falls back to the schema id")]
pub struct InspectCmd {
    /// Schema name (case-insensitive) or id
    #[arg(short, long)]
    pub schema: String,

    /// Dialect to lower for (defaults to the configured or declared dialect)
    #[arg(short, long, value_enum)]
    pub dialect: Option<DialectName>,
}
