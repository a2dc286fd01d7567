//! Directories the app reads from and writes to.

use std::path::PathBuf;

/// Directory containing the running executable. Falls back to current directory if unavailable.
pub fn exe_directory() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(PathBuf::from))
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

/// Platform config directory, or the executable directory when the platform
/// has none.
pub fn config_directory() -> PathBuf {
    directories::ProjectDirs::from("", "", "ZMapper")
        .map(|d| d.config_dir().to_path_buf())
        .unwrap_or_else(exe_directory)
}

/// Default location offered by "Save figure…".
pub fn figures_directory() -> PathBuf {
    directories::UserDirs::new()
        .and_then(|d| d.picture_dir().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| exe_directory().join("figures"))
}
