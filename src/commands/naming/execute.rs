use std::error::Error;

use serde::Serialize;

use super::NamingCmd;
use crate::commands::Execute;
use crate::config::ConfigFile;
use crate::naming::{NamingConventions, go_identifier, normalize, split_words};

/// Result of the naming command execution
#[derive(Debug, Serialize)]
pub struct NamingResult {
    pub identifier: String,
    pub words: Vec<String>,
    /// Exported Go identifier (initialisms upper-cased)
    pub go_name: String,
    pub conventions: NamingConventions,
}

impl NamingResult {
    pub fn for_identifier(identifier: &str) -> Self {
        Self {
            identifier: identifier.to_string(),
            words: split_words(identifier),
            go_name: go_identifier(identifier),
            conventions: normalize(identifier),
        }
    }
}

impl Execute for NamingCmd {
    type Output = NamingResult;

    fn execute(self, _config: &ConfigFile) -> Result<Self::Output, Box<dyn Error>> {
        if self.identifier.trim().is_empty() {
            return Err("Identifier must contain at least one word".into());
        }
        Ok(NamingResult::for_identifier(&self.identifier))
    }
}
