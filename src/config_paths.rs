//! Configuration and log directory resolution
//!
//! Everything lives under `~/.config/seam/` (or the platform equivalent
//! reported by `dirs`).

use std::path::PathBuf;

/// Base configuration directory (`~/.config/seam`)
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("seam"))
}

/// Path to the configuration file (`~/.config/seam/config.yaml`)
pub fn config_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.yaml"))
}

/// Directory for log files (`~/.config/seam/logs`)
pub fn logs_dir() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("logs"))
}

/// Ensure the logs directory exists, creating it if needed
pub fn ensure_logs_dir() -> Result<PathBuf, String> {
    let dir = logs_dir().ok_or_else(|| "No config directory available".to_string())?;
    std::fs::create_dir_all(&dir)
        .map_err(|e| format!("Failed to create logs directory {}: {}", dir.display(), e))?;
    Ok(dir)
}
