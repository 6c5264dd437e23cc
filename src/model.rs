//! The discovered-installation value type.
//!
//! An [`Installation`] is produced by a detector, never mutated afterwards,
//! and deduplicated by its stable identity (the canonical home path).

use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

use serde::Serialize;

/// A runtime installation discovered on the local filesystem.
#[derive(Debug, Clone, Serialize)]
pub struct Installation {
    /// Stable identity, used for set deduplication.
    id: String,

    /// Display name, e.g. `"[SDKMAN] temurin-21.0.2"`.
    pub name: String,

    /// Home directory of the installation.
    pub home: PathBuf,

    /// Version string extracted from the installation, if available.
    pub version: Option<String>,
}

impl Installation {
    /// Create an installation rooted at `home`.
    ///
    /// The identity is the canonicalized home path when the directory exists,
    /// falling back to the literal path otherwise.
    pub fn new(name: impl Into<String>, home: impl Into<PathBuf>) -> Self {
        let home = home.into();
        let id = home
            .canonicalize()
            .unwrap_or_else(|_| home.clone())
            .display()
            .to_string();
        Self {
            id,
            name: name.into(),
            home,
            version: None,
        }
    }

    /// Set the version string.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// The stable identity of this installation.
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl PartialEq for Installation {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Installation {}

impl Hash for Installation {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Whether an installation was discovered under a managed root.
///
/// Managed installations carry a `[label]` name prefix assigned by the
/// detector that found them; only those are eligible for notifications.
pub fn is_managed(installation: &Installation) -> bool {
    installation.name.starts_with('[')
}

/// Format a `[label]`-prefixed display name for an installation directory.
pub fn managed_name(label: &str, dir: &Path) -> String {
    let dir_name = dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| dir.display().to_string());
    format!("[{}] {}", label, dir_name)
}
