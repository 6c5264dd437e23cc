//! User preferences controlling watching and notifications.
//!
//! Both toggles default to true; a missing settings file means defaults.
//! External preference-change signals are delivered to the manager keyed by
//! [`WATCH_DIRECTORIES_KEY`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{LookoutError, Result};

/// Preference key for the directory-watching toggle.
pub const WATCH_DIRECTORIES_KEY: &str = "watch.directories";

/// Preference key for the notification toggle.
pub const NOTIFICATIONS_ENABLED_KEY: &str = "notifications.enabled";

/// User settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Watch detector directories for new installations.
    pub watch_directories: bool,

    /// Show a notification when new installations are discovered.
    pub notifications_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            watch_directories: true,
            notifications_enabled: true,
        }
    }
}

impl Settings {
    /// Load settings from a YAML file; a missing file yields defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&contents).map_err(|e| LookoutError::ConfigParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}
