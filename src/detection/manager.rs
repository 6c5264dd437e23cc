//! Detection and watch orchestration.
//!
//! The manager owns the detector set, runs cancellable aggregate detection
//! across it, and treats the start/stop lifecycle of all watchers as a single
//! logical switch driven by the `watch.directories` preference.
//!
//! # Concurrency
//!
//! All mutable state (the detector set, the watching flag, the init guard)
//! lives behind one manager-wide mutex. Detection snapshots the set under the
//! lock and scans outside it, so a long scan never blocks lifecycle
//! operations. Per-detector and per-watcher failures are logged and isolated;
//! none of them aborts the surrounding bulk operation.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use crate::config::descriptors::DetectorDescriptor;
use crate::config::interpolation::{normalize_separators, resolve_template, SubstitutionContext};
use crate::config::settings::WATCH_DIRECTORIES_KEY;
use crate::detection::detector::Detector;
use crate::detection::directory::DirectoryDetector;
use crate::detection::progress::{CancelToken, ScanProgress};
use crate::model::Installation;
use crate::watch::WatchListener;

/// Orchestrates detectors and their watchers.
pub struct DetectorManager {
    listener: Arc<dyn WatchListener>,
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    // Insertion-ordered, deduplicated by detector id.
    detectors: Vec<Arc<dyn Detector>>,
    watching: bool,
    initialized: bool,
}

impl DetectorManager {
    /// Create a manager that registers `listener` on the watchers it builds
    /// during initialization.
    pub fn new(listener: Arc<dyn WatchListener>) -> Self {
        Self {
            listener,
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Build detectors from descriptors, resolving root templates against the
    /// process environment. Idempotent; only the first call has effect.
    pub fn initialize(&self, descriptors: &[DetectorDescriptor]) {
        self.initialize_with_context(descriptors, &SubstitutionContext::from_env());
    }

    /// [`initialize`](Self::initialize) with an explicit substitution context.
    ///
    /// A descriptor whose root template cannot be resolved is skipped with a
    /// warning; one bad descriptor never aborts initialization.
    pub fn initialize_with_context(
        &self,
        descriptors: &[DetectorDescriptor],
        context: &SubstitutionContext,
    ) {
        let mut inner = self.lock();
        if inner.initialized {
            return;
        }
        inner.initialized = true;

        for descriptor in descriptors {
            let root = match resolve_template(&descriptor.root, context) {
                Ok(root) => normalize_separators(&root),
                Err(e) => {
                    tracing::warn!(
                        descriptor = %descriptor.id,
                        error = %e,
                        "skipping descriptor with unresolvable root"
                    );
                    continue;
                }
            };

            let detector = Arc::new(DirectoryDetector::from_descriptor(descriptor, root.into()));
            if let Some(watcher) = detector.watcher() {
                watcher.add_listener(Arc::downgrade(&self.listener));
            }
            Self::add_locked(&mut inner, detector);
        }

        tracing::debug!(detectors = inner.detectors.len(), "manager initialized");
    }

    /// Scan all detectors in insertion order, accumulating an
    /// identity-deduplicated, first-seen-ordered result.
    ///
    /// Cancellation is checked before each detector; a cancelled pass returns
    /// the partial accumulation. Scan failures are logged per detector and do
    /// not affect the others. No detectors means an empty result.
    pub fn detect_installations(
        &self,
        cancel: &CancelToken,
        progress: &dyn ScanProgress,
    ) -> Vec<Installation> {
        let detectors = self.detectors();

        progress.begin(detectors.len());
        let mut seen = HashSet::new();
        let mut installations = Vec::new();

        for detector in detectors {
            if cancel.is_cancelled() {
                tracing::debug!("detection cancelled");
                break;
            }
            progress.detector_started(detector.id());

            let mut found = 0;
            match detector.scan(cancel) {
                Ok(results) => {
                    found = results.len();
                    for installation in results {
                        if seen.insert(installation.id().to_string()) {
                            installations.push(installation);
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!(detector = %detector.id(), error = %e, "detector scan failed");
                }
            }
            progress.detector_finished(detector.id(), found);
        }

        installations
    }

    /// Add a detector. A detector with an already-registered id is a no-op.
    ///
    /// When global watching is on and the detector is enabled, its watcher is
    /// started immediately; a start failure is logged and does not keep the
    /// detector from on-demand detection. Listener registration is the
    /// caller's responsibility and happens before the add.
    pub fn add_detector(&self, detector: Arc<dyn Detector>) {
        let mut inner = self.lock();
        if !Self::add_locked(&mut inner, Arc::clone(&detector)) {
            return;
        }

        let Some(watcher) = detector.watcher() else {
            return;
        };
        if inner.watching && detector.is_enabled() {
            if let Err(e) = watcher.start() {
                tracing::warn!(detector = %detector.id(), error = %e, "failed to start watcher");
            }
        }
    }

    /// Turn global watching on and start the watcher of every enabled,
    /// watch-enabled detector. Individual start failures are logged and
    /// isolated.
    pub fn start_watching(&self) {
        let detectors = {
            let mut inner = self.lock();
            inner.watching = true;
            inner.detectors.clone()
        };

        for detector in detectors
            .iter()
            .filter(|d| d.is_enabled() && d.is_watch_enabled())
        {
            if let Some(watcher) = detector.watcher() {
                if let Err(e) = watcher.start() {
                    tracing::warn!(detector = %detector.id(), error = %e, "failed to start watcher");
                }
            }
        }
    }

    /// Turn global watching off and stop every watcher unconditionally.
    /// Individual stop failures are logged and isolated.
    pub fn stop_watching(&self) {
        let detectors = {
            let mut inner = self.lock();
            inner.watching = false;
            inner.detectors.clone()
        };

        for detector in detectors.iter() {
            if let Some(watcher) = detector.watcher() {
                if let Err(e) = watcher.stop() {
                    tracing::warn!(detector = %detector.id(), error = %e, "failed to stop watcher");
                }
            }
        }
    }

    /// React to an external preference change. Only the watch toggle key is
    /// handled; an absent value means the feature default, which is on.
    pub fn on_settings_change(&self, key: &str, value: Option<&str>) {
        if key != WATCH_DIRECTORIES_KEY {
            return;
        }
        let enabled = value.map_or(true, |v| v.trim().eq_ignore_ascii_case("true"));
        if enabled {
            self.start_watching();
        } else {
            self.stop_watching();
        }
    }

    /// Whether global watching is currently on.
    pub fn is_watching(&self) -> bool {
        self.lock().watching
    }

    /// Snapshot of the detector set in insertion order.
    pub fn detectors(&self) -> Vec<Arc<dyn Detector>> {
        self.lock().detectors.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().expect("manager lock poisoned")
    }

    /// Append under the lock unless the id is already present.
    fn add_locked(inner: &mut Inner, detector: Arc<dyn Detector>) -> bool {
        if inner.detectors.iter().any(|d| d.id() == detector.id()) {
            tracing::debug!(detector = %detector.id(), "detector already registered");
            return false;
        }
        inner.detectors.push(detector);
        true
    }
}
