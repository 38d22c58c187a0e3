use anyhow::Context;
use std::path::{Path, PathBuf};
use tickets_core::{config::Config, paths, Store};

/// Where the store lives for this invocation: the resolved root plus any
/// `--db` override.
#[derive(Debug, Clone)]
pub struct Project {
    root: PathBuf,
    db_override: Option<PathBuf>,
}

impl Project {
    pub fn new(root: PathBuf, db_override: Option<PathBuf>) -> Self {
        Self { root, db_override }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> anyhow::Result<Config> {
        let path = paths::config_path(&self.root);
        Config::load(&self.root).with_context(|| format!("failed to load {}", path.display()))
    }

    pub fn database_path(&self, config: &Config) -> PathBuf {
        match &self.db_override {
            Some(p) => paths::resolve(&self.root, p),
            None => config.database_path(&self.root),
        }
    }

    pub fn open_store(&self) -> anyhow::Result<Store> {
        let config = self.config()?;
        let db = self.database_path(&config);
        Store::open(&db, config.busy_timeout())
            .with_context(|| format!("failed to open store at {}", db.display()))
    }
}
