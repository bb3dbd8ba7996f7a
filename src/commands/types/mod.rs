mod execute;
mod output;

pub use execute::{TypeRow, TypesResult};

use clap::Args;

use crate::schema::DialectName;

/// Show the field type lowering table for a dialect
#[derive(Args, Debug)]
#[command(after_help = "\
Examples:
  schema_forge types                         # Configured dialect (postgres by default)
  schema_forge types -d mongodb              # Document-store storage types
  schema_forge types -d mysql -o json        # Machine-readable table for doc generators")]
pub struct TypesCmd {
    /// Dialect to lower for (defaults to the configured dialect)
    #[arg(short, long, value_enum)]
    pub dialect: Option<DialectName>,
}
