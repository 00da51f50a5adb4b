//! Configuration types and parsing for lateflow.yml

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file names searched by [`Config::load_from_dir`], in order
pub const CONFIG_FILE_NAMES: [&str; 2] = ["lateflow.yml", "lateflow.yaml"];

/// Main project configuration from lateflow.yml
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Project name
    pub name: String,

    /// Database connection configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Batch reprocessing settings
    #[serde(default)]
    pub reprocess: ReprocessConfig,
}

/// Database connection configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// DuckDB file path, relative to the project directory, or `:memory:`
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Reprocessor settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReprocessConfig {
    /// Employees processed in parallel
    #[serde(default = "default_threads")]
    pub threads: usize,
}

impl Default for ReprocessConfig {
    fn default() -> Self {
        Self {
            threads: default_threads(),
        }
    }
}

fn default_db_path() -> String {
    "lateflow.duckdb".to_string()
}

fn default_threads() -> usize {
    4
}

impl Config {
    /// Fresh config for `lf init`
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            database: DatabaseConfig::default(),
            reprocess: ReprocessConfig::default(),
        }
    }

    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Config =
            serde_yaml::from_str(&content).map_err(|e| CoreError::ConfigParseError {
                message: format!("{}: {}", path.display(), e),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a project directory
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        match CONFIG_FILE_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.exists())
        {
            Some(path) => Self::load(&path),
            None => Err(CoreError::ConfigNotFound {
                path: dir.join(CONFIG_FILE_NAMES[0]).display().to_string(),
            }),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> CoreResult<()> {
        if self.name.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "Project name cannot be empty".to_string(),
            });
        }

        if self.database.path.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "database.path cannot be empty".to_string(),
            });
        }

        if self.reprocess.threads == 0 {
            return Err(CoreError::ConfigInvalid {
                message: "reprocess.threads must be at least 1".to_string(),
            });
        }

        Ok(())
    }

    /// Database path resolved against the project root. `:memory:` is kept.
    pub fn database_path_absolute(&self, root: &Path) -> PathBuf {
        let path = Path::new(&self.database.path);
        if self.database.path == ":memory:" || path.is_absolute() {
            path.to_path_buf()
        } else {
            root.join(path)
        }
    }

    /// Serialize to YAML for writing a starter file
    pub fn to_yaml(&self) -> CoreResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
