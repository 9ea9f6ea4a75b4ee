use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::DbmsError;

/// Where an engine instance keeps its files, and whether it compacts them
/// on the way out (`SPEC_FULL.md` §2.2). The only configuration surface
/// this engine has — sessions, users, and transactions are Non-goals, so
/// there is nothing else to configure.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Root directory for the catalog document and the `data/`/`indexes/`
    /// subdirectories (`spec.md` §6).
    pub data_dir: PathBuf,
    /// Whether [`crate::Database`] should vacuum every table on drop,
    /// reclaiming tombstoned slots. Off by default: vacuuming renumbers
    /// slot ids, which is only safe between statements, never mid-batch.
    #[serde(default)]
    pub vacuum_on_drop: bool,
}

impl EngineConfig {
    /// A config pointing at `data_dir` with vacuum-on-drop left off.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            vacuum_on_drop: false,
        }
    }

    /// Reads a config from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, DbmsError> {
        let contents = fs::read_to_string(path.as_ref())
            .map_err(|e| tinysql_catalog::SchemaError::Io(e.to_string()))?;
        toml::from_str(&contents).map_err(|e| tinysql_catalog::SchemaError::Io(e.to_string()).into())
    }

    /// Writes this config to a TOML file.
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<(), DbmsError> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| tinysql_catalog::SchemaError::Io(e.to_string()))?;
        fs::write(path.as_ref(), contents).map_err(|e| tinysql_catalog::SchemaError::Io(e.to_string()).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_toml() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("tinysql.toml");
        let config = EngineConfig {
            data_dir: dir.path().join("db"),
            vacuum_on_drop: true,
        };
        config.to_file(&config_path).unwrap();
        let reloaded = EngineConfig::from_file(&config_path).unwrap();
        assert_eq!(config, reloaded);
    }

    #[test]
    fn vacuum_on_drop_defaults_to_false() {
        let config = EngineConfig::new("/tmp/tinysql-data");
        assert!(!config.vacuum_on_drop);
    }
}
