//! Path utilities for Carelog directory resolution.

use anyhow::Result;
use std::path::PathBuf;

const CARELOG_DIR: &str = ".carelog";
const DB_FILE: &str = "carelog.db";
const BLOBS_DIR: &str = "blobs";
const LOGS_DIR: &str = "logs";

/// Environment variable to override the Carelog directory.
pub const CARELOG_DIR_ENV: &str = "CARELOG_DIR";

/// Resolve the Carelog data directory.
/// Priority: CARELOG_DIR env var > ~/.carelog/
pub fn resolve_data_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(CARELOG_DIR_ENV)
        && !dir.trim().is_empty()
    {
        return Ok(PathBuf::from(dir));
    }
    dirs::home_dir()
        .map(|h| h.join(CARELOG_DIR))
        .ok_or_else(|| anyhow::anyhow!("Failed to determine home directory"))
}

/// Ensure the Carelog directory exists and return its path.
pub fn ensure_data_dir() -> Result<PathBuf> {
    let dir = resolve_data_dir()?;
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Get the database file name inside a given data directory.
pub fn database_path_in(data_dir: &std::path::Path) -> PathBuf {
    data_dir.join(DB_FILE)
}

/// Get the filesystem blob root inside a given data directory.
pub fn blob_root_in(data_dir: &std::path::Path) -> PathBuf {
    data_dir.join(BLOBS_DIR)
}

/// Get the log directory inside a given data directory.
pub fn logs_dir_in(data_dir: &std::path::Path) -> PathBuf {
    data_dir.join(LOGS_DIR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_layout_inside_data_dir() {
        let dir = Path::new("/data/carelog");
        assert_eq!(database_path_in(dir), Path::new("/data/carelog/carelog.db"));
        assert_eq!(blob_root_in(dir), Path::new("/data/carelog/blobs"));
        assert_eq!(logs_dir_in(dir), Path::new("/data/carelog/logs"));
    }
}
