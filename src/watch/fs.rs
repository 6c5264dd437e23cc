//! Notify-backed directory watcher.
//!
//! Watches a detector root recursively (installations are usually unpacked
//! file-by-file, so the interesting marker files appear after the top-level
//! directory does) and probes the affected top-level entry on each event.
//! Burst coalescing is handled downstream by the notification aggregator, so
//! hits are dispatched to listeners as they come.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, Weak};

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher as _};

use crate::detection::directory::probe_installation;
use crate::error::{LookoutError, Result};
use crate::watch::{ListenerSet, WatchListener, Watcher};

/// Watches a single detector root for new runtime installations.
pub struct FsWatcher {
    root: PathBuf,
    label: String,
    listeners: Arc<ListenerSet>,
    // Some while running; dropping the backend stops the OS watch.
    backend: Mutex<Option<RecommendedWatcher>>,
}

impl FsWatcher {
    /// Create a watcher for `root`. The watcher starts out stopped.
    pub fn new(root: impl Into<PathBuf>, label: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            label: label.into(),
            listeners: Arc::new(ListenerSet::new()),
            backend: Mutex::new(None),
        }
    }

    /// The directory this watcher observes.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl std::fmt::Debug for FsWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FsWatcher")
            .field("root", &self.root)
            .field("running", &self.is_running())
            .finish_non_exhaustive()
    }
}

impl Watcher for FsWatcher {
    fn start(&self) -> Result<()> {
        let mut backend = self.backend.lock().expect("watcher lock poisoned");
        if backend.is_some() {
            return Ok(());
        }

        let handler = make_event_handler(
            self.root.clone(),
            self.label.clone(),
            Arc::clone(&self.listeners),
        );
        let mut watcher =
            notify::recommended_watcher(handler).map_err(|e| LookoutError::watcher(&self.root, e))?;
        watcher
            .watch(&self.root, RecursiveMode::Recursive)
            .map_err(|e| LookoutError::watcher(&self.root, e))?;

        tracing::debug!(root = %self.root.display(), "watcher started");
        *backend = Some(watcher);
        Ok(())
    }

    fn stop(&self) -> Result<()> {
        let mut backend = self.backend.lock().expect("watcher lock poisoned");
        if backend.take().is_some() {
            tracing::debug!(root = %self.root.display(), "watcher stopped");
        }
        Ok(())
    }

    fn is_running(&self) -> bool {
        self.backend.lock().expect("watcher lock poisoned").is_some()
    }

    fn add_listener(&self, listener: Weak<dyn WatchListener>) {
        self.listeners.add(listener);
    }
}

/// Build the notify event handler: map event paths to top-level children of
/// the root, probe each once, and fan hits out to listeners.
fn make_event_handler(
    root: PathBuf,
    label: String,
    listeners: Arc<ListenerSet>,
) -> impl Fn(std::result::Result<Event, notify::Error>) + Send + 'static {
    move |result| {
        let event = match result {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!(root = %root.display(), error = %e, "watch event error");
                return;
            }
        };

        if !matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_)) {
            return;
        }

        let mut seen = HashSet::new();
        let mut found = Vec::new();
        for path in &event.paths {
            let Some(candidate) = top_level_child(&root, path) else {
                continue;
            };
            if !seen.insert(candidate.clone()) {
                continue;
            }
            if let Some(installation) = probe_installation(&label, &candidate) {
                tracing::info!(
                    name = %installation.name,
                    home = %installation.home.display(),
                    "installation appeared"
                );
                found.push(installation);
            }
        }

        if !found.is_empty() {
            listeners.notify(found);
        }
    }
}

/// The immediate child of `root` that `path` falls under, if any.
fn top_level_child(root: &Path, path: &Path) -> Option<PathBuf> {
    let relative = path.strip_prefix(root).ok()?;
    let first = relative.components().next()?;
    Some(root.join(first.as_os_str()))
}
