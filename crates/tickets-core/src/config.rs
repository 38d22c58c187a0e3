use crate::error::Result;
use crate::paths;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

fn default_busy_timeout_ms() -> u64 {
    5000
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Settings read from `.tickets/config.yaml`. Every key is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// SQLite file. Relative paths resolve against the project root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<PathBuf>,

    /// How long a write waits on a lock held by another process.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: None,
            busy_timeout_ms: default_busy_timeout_ms(),
        }
    }
}

impl Config {
    /// Load the config for `root`, falling back to defaults when the file is absent.
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(&path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    /// Write the default config unless one already exists. Returns true if written.
    pub fn init(root: &Path) -> Result<bool> {
        let data = serde_yaml::to_string(&Self::default())?;
        crate::io::write_if_missing(&paths::config_path(root), data.as_bytes())
    }

    pub fn database_path(&self, root: &Path) -> PathBuf {
        match &self.database {
            Some(p) => paths::resolve(root, p),
            None => paths::default_db_path(root),
        }
    }

    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }
}
