mod execute;
mod output;

pub use execute::{GenerateResult, GeneratedFile};

use clap::Args;
use std::path::PathBuf;

use crate::emit::ArtifactKind;
use crate::schema::DialectName;

/// Generate model, repository, service, handler and migration artifacts
#[derive(Args, Debug)]
#[command(after_help = "\
Examples:
  schema_forge generate -s Post                        # Every artifact for the schema's dialect
  schema_forge generate -s Post -d mongodb             # Document store (no migrations)
  schema_forge generate -s Post --only model,service   # Selected artifacts only
  schema_forge generate -s Post --output ./service     # Different output root")]
pub struct GenerateCmd {
    /// Schema name (case-insensitive) or id
    #[arg(short, long)]
    pub schema: String,

    /// Dialect to generate for (defaults to the configured or declared dialect)
    #[arg(short, long, value_enum)]
    pub dialect: Option<DialectName>,

    /// Output root (defaults to the configured output_root)
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Go module path (defaults to the configured module_path)
    #[arg(long)]
    pub module: Option<String>,

    /// Artifact kinds to generate, comma separated (all when omitted)
    #[arg(long, value_enum, value_delimiter = ',')]
    pub only: Vec<ArtifactKind>,
}
