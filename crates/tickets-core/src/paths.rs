use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const TICKETS_DIR: &str = ".tickets";
pub const CONFIG_FILE: &str = ".tickets/config.yaml";
pub const DEFAULT_DB_FILE: &str = ".tickets/tickets.db";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn tickets_dir(root: &Path) -> PathBuf {
    root.join(TICKETS_DIR)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn default_db_path(root: &Path) -> PathBuf {
    root.join(DEFAULT_DB_FILE)
}

/// Resolve `path` against `root` unless it is already absolute.
pub fn resolve(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}
