//! Configuration file handling.
//!
//! Loads `.schema_forge.json` from the current directory (or an explicit
//! `--config` path). Every key has a default except `module_path`, which the
//! `generate` command needs before it can render imports.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use crate::schema::{DialectConfig, DialectName, ResourceSchema};

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".schema_forge.json";

const EXAMPLE_CONFIG: &str = "\
{
  \"module_path\": \"github.com/acme/blog\",
  \"schemas_dir\": \"./schemas\",
  \"output_root\": \".\",
  \"dialect\": { \"type\": \"postgres\" }
}";

/// Top-level configuration file structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Go module path of the generated service
    #[serde(default)]
    pub module_path: String,

    /// Directory holding the `*.json` schema documents
    #[serde(default = "default_schemas_dir")]
    pub schemas_dir: PathBuf,

    /// Root the artifact paths are resolved against
    #[serde(default = "default_output_root")]
    pub output_root: PathBuf,

    /// Project-wide dialect; when absent each schema's own `database` applies
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dialect: Option<DialectConfig>,
}

fn default_schemas_dir() -> PathBuf {
    PathBuf::from("./schemas")
}

fn default_output_root() -> PathBuf {
    PathBuf::from(".")
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            module_path: String::new(),
            schemas_dir: default_schemas_dir(),
            output_root: default_output_root(),
            dialect: None,
        }
    }
}

impl ConfigFile {
    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, `.schema_forge.json` in the
    /// current directory is read if present, otherwise defaults are used.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The explicit config file doesn't exist
    /// - The file cannot be read
    /// - The JSON is invalid
    pub fn load(explicit: Option<&Path>) -> Result<Self, Box<dyn Error>> {
        let config_path = match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(format!(
                        "Configuration file not found: {}\n\nExample:\n{}",
                        path.display(),
                        EXAMPLE_CONFIG
                    )
                    .into());
                }
                path.to_path_buf()
            }
            None => {
                let path = PathBuf::from(CONFIG_FILE_NAME);
                if !path.exists() {
                    tracing::debug!("no {} found, using defaults", CONFIG_FILE_NAME);
                    return Ok(Self::default());
                }
                path
            }
        };

        let content = fs::read_to_string(&config_path).map_err(|e| {
            format!("Failed to read {}: {}", config_path.display(), e)
        })?;

        let config: ConfigFile = serde_json::from_str(&content).map_err(|e| {
            format!("Invalid JSON in {}: {}", config_path.display(), e)
        })?;

        tracing::debug!(path = %config_path.display(), "loaded configuration");
        Ok(config)
    }

    /// The module path, or an error explaining how to set it.
    pub fn require_module_path(&self) -> Result<&str, Box<dyn Error>> {
        let module_path = self.module_path.trim();
        if module_path.is_empty() {
            return Err(format!(
                "No Go module path configured.\n\n\
                 Pass --module <path> or set \"module_path\" in {}:\n{}",
                CONFIG_FILE_NAME, EXAMPLE_CONFIG
            )
            .into());
        }
        Ok(module_path)
    }

    /// Dialect for a run over `schema`.
    ///
    /// A command-line dialect wins over the configured one, which wins over
    /// the schema's own `database`. Options such as the Mongo database name
    /// carry over when the flag names the same dialect.
    pub fn resolve_dialect(&self, flag: Option<DialectName>, schema: &ResourceSchema) -> DialectConfig {
        let base = self.dialect.as_ref().unwrap_or(&schema.database);
        match flag {
            Some(name) => name.to_config(base),
            None => base.clone(),
        }
    }
}
