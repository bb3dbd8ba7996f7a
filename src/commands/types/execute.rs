use std::error::Error;

use serde::Serialize;

use super::TypesCmd;
use crate::commands::Execute;
use crate::config::ConfigFile;
use crate::lowering::{TypeLowering, lower_type};
use crate::schema::{DialectConfig, DialectFamily, FieldType};

/// Placeholder target used to render sequence types.
const SAMPLE_TARGET: &str = "Target";

/// One row of the lowering table
#[derive(Debug, Clone, Serialize)]
pub struct TypeRow {
    pub go_type: String,
    #[serde(flatten)]
    pub lowering: TypeLowering,
}

/// Result of the types command execution
#[derive(Debug, Serialize)]
pub struct TypesResult {
    pub dialect: DialectConfig,
    pub family: DialectFamily,
    pub supports_migrations: bool,
    pub types: Vec<TypeRow>,
}

impl TypesResult {
    pub fn for_dialect(dialect: DialectConfig) -> Self {
        let types = FieldType::ALL
            .iter()
            .map(|field_type| {
                let lowering = lower_type(*field_type, &dialect);
                TypeRow {
                    go_type: lowering.primitive.go_type(SAMPLE_TARGET),
                    lowering,
                }
            })
            .collect();

        Self {
            family: dialect.family(),
            supports_migrations: dialect.supports_migrations(),
            dialect,
            types,
        }
    }
}

impl Execute for TypesCmd {
    type Output = TypesResult;

    fn execute(self, config: &ConfigFile) -> Result<Self::Output, Box<dyn Error>> {
        let base = config.dialect.clone().unwrap_or_default();
        let dialect = match self.dialect {
            Some(name) => name.to_config(&base),
            None => base,
        };
        Ok(TypesResult::for_dialect(dialect))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::DialectName;
    use rstest::rstest;

    #[rstest]
    fn test_every_type_listed() {
        let result = TypesCmd { dialect: None }.execute(&ConfigFile::default()).unwrap();
        assert_eq!(result.dialect, DialectConfig::Postgres);
        assert_eq!(result.types.len(), FieldType::ALL.len());
        assert!(result.supports_migrations);
    }

    #[rstest]
    fn test_flag_overrides_config() {
        let config = ConfigFile {
            dialect: Some(DialectConfig::Mysql),
            ..ConfigFile::default()
        };
        let result = TypesCmd {
            dialect: Some(DialectName::Redis),
        }
        .execute(&config)
        .unwrap();
        assert_eq!(result.family, DialectFamily::KeyValue);
        assert!(!result.supports_migrations);
    }

    #[rstest]
    fn test_sequence_rendered_with_placeholder() {
        let result = TypesResult::for_dialect(DialectConfig::Sqlite);
        let row = result
            .types
            .iter()
            .find(|r| r.lowering.field_type == FieldType::ReferenceCollection)
            .unwrap();
        assert_eq!(row.go_type, "[]Target");
        assert!(row.lowering.storage.is_none());
    }
}
