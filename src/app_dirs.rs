use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    /// Directories searched for user supplied themes, quotes and word lists,
    /// in priority order.
    pub fn config_dirs() -> Vec<PathBuf> {
        let mut dirs = Vec::with_capacity(2);
        if let Ok(home) = std::env::var("HOME") {
            dirs.push(PathBuf::from(home).join(".tt"));
        }
        dirs.push(PathBuf::from("/etc/tt"));
        dirs
    }

    /// Directory holding persistent state (file progress, mistakes, logs).
    pub fn state_dir() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            Some(PathBuf::from(home).join(".local").join("state").join("tt"))
        } else {
            ProjectDirs::from("", "", "tt").map(|proj_dirs| proj_dirs.data_local_dir().to_path_buf())
        }
    }
}
