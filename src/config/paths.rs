//! Path resolution for detail-ops directories.
//!
//! Provides XDG-compliant path resolution.

use std::env;
use std::path::PathBuf;

const APP_DIR: &str = "detail-ops";

/// Get XDG-compliant data directory for detail-ops.
///
/// Falls back to the system temp directory when neither `XDG_DATA_HOME`
/// nor `HOME` is set (e.g. inside minimal containers).
///
/// # Returns
/// Path to data directory: `~/.local/share/detail-ops/`
pub fn get_data_dir() -> PathBuf {
    let data_home = env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .or_else(|_| env::var("HOME").map(|home| PathBuf::from(home).join(".local/share")))
        .unwrap_or_else(|_| env::temp_dir());

    data_home.join(APP_DIR)
}

/// Get the sync job lock file path (data_dir/sync-db.lock).
pub fn get_lock_path() -> PathBuf {
    get_data_dir().join("sync-db.lock")
}
