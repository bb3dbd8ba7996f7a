//! Command definitions and implementations.
//!
//! Each command is defined in its own module with:
//! - The command struct with clap attributes for CLI parsing
//! - `execute.rs` producing a serializable result
//! - `output.rs` rendering that result as a table

pub mod generate;
pub mod inspect;
pub mod naming;
pub mod types;

pub use generate::GenerateCmd;
pub use inspect::InspectCmd;
pub use naming::NamingCmd;
pub use types::TypesCmd;

use clap::Subcommand;
use std::error::Error;
use std::path::Path;

use crate::config::ConfigFile;
use crate::output::{OutputFormat, Outputable};
use crate::schema::{JsonSchemaStore, ResourceSchema, SchemaStore, StoreError};

/// Trait for executing commands with command-specific result types.
pub trait Execute {
    type Output: Outputable;

    fn execute(self, config: &ConfigFile) -> Result<Self::Output, Box<dyn Error>>;
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate model, repository, service, handler and migration artifacts
    Generate(GenerateCmd),

    /// Show the enriched view of a schema (names, lowered fields, relations)
    Inspect(InspectCmd),

    /// Show the field type lowering table for a dialect
    Types(TypesCmd),

    /// Show every naming convention derived from an identifier
    Naming(NamingCmd),

    /// Catch-all for unknown commands
    #[command(external_subcommand)]
    Unknown(Vec<String>),
}

impl Command {
    /// Execute the command and return formatted output
    pub fn run(self, config: &ConfigFile, format: OutputFormat) -> Result<String, Box<dyn Error>> {
        match self {
            Command::Generate(cmd) => {
                let result = cmd.execute(config)?;
                Ok(result.format(format))
            }
            Command::Inspect(cmd) => {
                let result = cmd.execute(config)?;
                Ok(result.format(format))
            }
            Command::Types(cmd) => {
                let result = cmd.execute(config)?;
                Ok(result.format(format))
            }
            Command::Naming(cmd) => {
                let result = cmd.execute(config)?;
                Ok(result.format(format))
            }
            Command::Unknown(args) => {
                Err(format!("Unknown command: {}", args.first().map(String::as_str).unwrap_or_default()).into())
            }
        }
    }
}

/// Load a schema by name, falling back to its id.
pub(crate) fn load_schema(schemas_dir: &Path, key: &str) -> Result<ResourceSchema, StoreError> {
    let store = JsonSchemaStore::new(schemas_dir);
    match store.load_by_name(key) {
        Err(StoreError::NotFound { .. }) => store.load(key),
        other => other,
    }
}
