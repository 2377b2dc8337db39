//! Library configuration persistence
//!
//! Stores pacing defaults and the undo history cap in
//! `~/.config/seam/config.yaml`.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::update::timeline::PacingOptions;

/// Pacing defaults used when a caller requests progressive application
/// without an explicit duration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PacingDefaults {
    /// Total time budget for one paced batch, in milliseconds
    #[serde(default = "default_duration_ms")]
    pub default_duration_ms: u64,
}

fn default_duration_ms() -> u64 {
    1500
}

impl Default for PacingDefaults {
    fn default() -> Self {
        Self {
            default_duration_ms: default_duration_ms(),
        }
    }
}

impl PacingDefaults {
    /// Build pacing options from the configured duration
    pub fn options(&self) -> PacingOptions {
        PacingOptions::new(Duration::from_millis(self.default_duration_ms))
    }
}

/// Configuration that persists across sessions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeamConfig {
    #[serde(default)]
    pub pacing: PacingDefaults,
    /// Cap on undo transactions retained per document
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

fn default_history_limit() -> usize {
    crate::model::document::DEFAULT_HISTORY_LIMIT
}

impl Default for SeamConfig {
    fn default() -> Self {
        Self {
            pacing: PacingDefaults::default(),
            history_limit: default_history_limit(),
        }
    }
}

impl SeamConfig {
    /// Load config from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };

        if !path.exists() {
            tracing::debug!("Config file not found at {}, using defaults", path.display());
            return Self::default();
        }

        match std::fs::read_to_string(&path) {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save config to disk
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> Result<(), String> {
        let path = crate::config_paths::config_file()
            .ok_or_else(|| "No config directory available".to_string())?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        let content = serde_yaml::to_string(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        std::fs::write(&path, content)
            .map_err(|e| format!("Failed to write config to {}: {}", path.display(), e))?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }
}
