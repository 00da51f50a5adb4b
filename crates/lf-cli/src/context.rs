//! Runtime context for CLI commands

use anyhow::{Context, Result};
use lf_core::{Config, PolicyConfig};
use lf_db::{AttendanceStore, DuckDbStore};
use std::path::PathBuf;
use std::sync::Arc;

use crate::cli::GlobalArgs;

/// Runtime context containing loaded config and database connection
pub(crate) struct RuntimeContext {
    /// Project configuration
    pub config: Config,

    /// Attendance store
    pub db: Arc<DuckDbStore>,
}

impl RuntimeContext {
    /// Create a new runtime context from global arguments
    pub fn new(args: &GlobalArgs) -> Result<Self> {
        let root = &args.project_dir;

        // Load config from custom path or project directory
        let config = if let Some(config_path) = &args.config {
            Config::load(config_path).context("Failed to load configuration file")?
        } else {
            Config::load_from_dir(root).context("Failed to load project configuration")?
        };

        let db_path = match &args.database {
            Some(path) => PathBuf::from(path),
            None => config.database_path_absolute(root),
        };
        log::debug!("Opening database {}", db_path.display());
        let db = DuckDbStore::new(&db_path.to_string_lossy())
            .with_context(|| format!("Failed to connect to database {}", db_path.display()))?;

        Ok(Self {
            config,
            db: Arc::new(db),
        })
    }

    /// The store as a trait object, for engine calls that share it across tasks
    pub fn store(&self) -> Arc<dyn AttendanceStore> {
        self.db.clone()
    }

    /// Currently saved policy
    pub async fn policy(&self) -> Result<PolicyConfig> {
        self.db
            .load_policy()
            .await
            .context("Failed to load late penalty policy")
    }
}
