//! Storage dialect selection.
//!
//! The dialect is passed explicitly through every lowering and emission call;
//! nothing in the engine holds a "current dialect".

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Storage backend family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DialectFamily {
    Relational,
    Document,
    KeyValue,
}

/// Storage dialect configuration.
///
/// JSON format uses a "type" field with lowercase variant names, e.g.
/// `{"type": "mongodb", "database": "blog"}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DialectConfig {
    #[default]
    Postgres,
    Mysql,
    Sqlite,
    Mongodb {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        database: Option<String>,
    },
    Redis {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        key_prefix: Option<String>,
    },
}

impl DialectConfig {
    pub fn family(&self) -> DialectFamily {
        match self {
            DialectConfig::Postgres | DialectConfig::Mysql | DialectConfig::Sqlite => {
                DialectFamily::Relational
            }
            DialectConfig::Mongodb { .. } => DialectFamily::Document,
            DialectConfig::Redis { .. } => DialectFamily::KeyValue,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DialectConfig::Postgres => "postgres",
            DialectConfig::Mysql => "mysql",
            DialectConfig::Sqlite => "sqlite",
            DialectConfig::Mongodb { .. } => "mongodb",
            DialectConfig::Redis { .. } => "redis",
        }
    }

    /// Whether the dialect has a schema-migration concept.
    ///
    /// Document and key-value stores are schemaless, so migration emission is
    /// skipped for them.
    pub fn supports_migrations(&self) -> bool {
        self.family() == DialectFamily::Relational
    }

    pub fn is_relational(&self) -> bool {
        self.family() == DialectFamily::Relational
    }
}

/// Dialect names accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DialectName {
    Postgres,
    Mysql,
    Sqlite,
    Mongodb,
    Redis,
}

impl DialectName {
    /// Build a config for this dialect, keeping options from `base` when it
    /// names the same dialect.
    pub fn to_config(self, base: &DialectConfig) -> DialectConfig {
        match (self, base) {
            (DialectName::Mongodb, DialectConfig::Mongodb { .. })
            | (DialectName::Redis, DialectConfig::Redis { .. }) => base.clone(),
            (DialectName::Postgres, _) => DialectConfig::Postgres,
            (DialectName::Mysql, _) => DialectConfig::Mysql,
            (DialectName::Sqlite, _) => DialectConfig::Sqlite,
            (DialectName::Mongodb, _) => DialectConfig::Mongodb { database: None },
            (DialectName::Redis, _) => DialectConfig::Redis { key_prefix: None },
        }
    }
}
