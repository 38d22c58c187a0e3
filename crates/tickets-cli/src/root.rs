use std::path::{Path, PathBuf};

use tickets_core::paths::TICKETS_DIR;

/// Resolve the project root that holds `.tickets/`.
///
/// Priority:
/// 1. `--root` flag / `TICKETS_ROOT` env var (passed in as `explicit`)
/// 2. Walk upward from `cwd` looking for `.tickets/`
/// 3. Fall back to `cwd`
pub fn resolve_root(explicit: Option<&Path>) -> PathBuf {
    if let Some(p) = explicit {
        return p.to_path_buf();
    }

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    find_root_from(&cwd).unwrap_or(cwd)
}

fn find_root_from(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(TICKETS_DIR).is_dir())
        .map(Path::to_path_buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn explicit_root_wins() {
        let dir = TempDir::new().unwrap();
        assert_eq!(resolve_root(Some(dir.path())), dir.path());
    }

    #[test]
    fn finds_tickets_dir_from_subdirectory() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(TICKETS_DIR)).unwrap();
        let subdir = dir.path().join("src/deep");
        std::fs::create_dir_all(&subdir).unwrap();

        assert_eq!(find_root_from(&subdir).as_deref(), Some(dir.path()));
    }

    #[test]
    fn no_marker_means_no_root() {
        let dir = TempDir::new().unwrap();
        assert!(find_root_from(dir.path()).is_none());
    }
}
