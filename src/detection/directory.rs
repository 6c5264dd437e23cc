//! Built-in detection strategy: a directory of runtime installations.
//!
//! Install managers keep one installation per immediate child directory of
//! their root (`~/.sdkman/candidates/java/21.0.2-tem`, `~/.jdks/temurin-21`,
//! and so on). The detector probes each child for a runtime layout and labels
//! hits with the descriptor's `[label]` prefix.

use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use regex::Regex;

use crate::config::descriptors::DetectorDescriptor;
use crate::detection::detector::Detector;
use crate::detection::progress::CancelToken;
use crate::error::Result;
use crate::model::{managed_name, Installation};
use crate::watch::{FsWatcher, Watcher};

/// Scans the immediate children of a root directory for installations.
pub struct DirectoryDetector {
    id: String,
    label: String,
    root: PathBuf,
    enabled: bool,
    watch_enabled: bool,
    watcher: Arc<FsWatcher>,
}

impl DirectoryDetector {
    /// Create a detector over `root`.
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        root: impl Into<PathBuf>,
        enabled: bool,
        watch_enabled: bool,
    ) -> Self {
        let label = label.into();
        let root = root.into();
        Self {
            id: id.into(),
            watcher: Arc::new(FsWatcher::new(root.clone(), label.clone())),
            label,
            root,
            enabled,
            watch_enabled,
        }
    }

    /// Create a detector from a descriptor and its resolved root.
    pub fn from_descriptor(descriptor: &DetectorDescriptor, root: PathBuf) -> Self {
        Self::new(
            &descriptor.id,
            &descriptor.label,
            root,
            descriptor.enabled_by_default,
            descriptor.watch_by_default,
        )
    }

    /// The resolved root directory this detector scans.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The display label applied to discovered installations.
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl Detector for DirectoryDetector {
    fn id(&self) -> &str {
        &self.id
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn is_watch_enabled(&self) -> bool {
        self.watch_enabled
    }

    fn scan(&self, cancel: &CancelToken) -> Result<Vec<Installation>> {
        if !self.enabled || !self.root.is_dir() {
            return Ok(Vec::new());
        }

        let mut entries: Vec<PathBuf> = std::fs::read_dir(&self.root)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .collect();
        entries.sort();

        let mut installations = Vec::new();
        for entry in entries {
            if cancel.is_cancelled() {
                break;
            }
            if let Some(installation) = probe_installation(&self.label, &entry) {
                installations.push(installation);
            }
        }
        Ok(installations)
    }

    fn watcher(&self) -> Option<Arc<dyn Watcher>> {
        Some(Arc::clone(&self.watcher) as Arc<dyn Watcher>)
    }
}

/// Probe a directory for a runtime installation layout.
///
/// Recognizes plain JDK layouts (`bin/java`) and macOS bundles
/// (`Contents/Home/bin/java`). Returns `None` for anything else.
pub fn probe_installation(label: &str, dir: &Path) -> Option<Installation> {
    if !dir.is_dir() {
        return None;
    }

    let home = runtime_home(dir)?;
    let mut installation = Installation::new(managed_name(label, dir), home.clone());
    if let Some(version) = read_release_version(&home) {
        installation = installation.with_version(version);
    }
    Some(installation)
}

/// The effective runtime home under `dir`, if `dir` holds an installation.
fn runtime_home(dir: &Path) -> Option<PathBuf> {
    if has_java_launcher(dir) {
        return Some(dir.to_path_buf());
    }
    let bundle_home = dir.join("Contents").join("Home");
    if has_java_launcher(&bundle_home) {
        return Some(bundle_home);
    }
    None
}

fn has_java_launcher(home: &Path) -> bool {
    let bin = home.join("bin");
    bin.join("java").is_file() || bin.join("java.exe").is_file()
}

/// Extract `JAVA_VERSION` from the JDK `release` file, if present.
fn read_release_version(home: &Path) -> Option<String> {
    static VERSION_RE: OnceLock<Regex> = OnceLock::new();
    let re = VERSION_RE
        .get_or_init(|| Regex::new(r#"(?m)^JAVA_VERSION="([^"]+)""#).expect("valid regex"));

    let contents = std::fs::read_to_string(home.join("release")).ok()?;
    re.captures(&contents)
        .map(|captures| captures[1].to_string())
}
