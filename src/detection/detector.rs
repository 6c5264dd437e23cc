//! The detector trait.

use std::sync::Arc;

use crate::detection::progress::CancelToken;
use crate::error::Result;
use crate::model::Installation;
use crate::watch::Watcher;

/// A pluggable strategy that scans a location for runtime installations.
///
/// Detectors live for the lifetime of the manager that owns them. A detector
/// without a watcher never takes part in watch lifecycle operations but still
/// participates in on-demand detection.
pub trait Detector: Send + Sync {
    /// Unique identity; the manager deduplicates detectors by it.
    fn id(&self) -> &str;

    /// Whether this detector currently participates in detection.
    fn is_enabled(&self) -> bool;

    /// Whether this detector's directory should be watched when global
    /// watching is on.
    fn is_watch_enabled(&self) -> bool;

    /// Scan for installations, checking `cancel` cooperatively.
    ///
    /// A cancelled scan returns whatever was accumulated so far, not an
    /// error. Scan failures are isolated by the manager and never abort the
    /// detection pass over the remaining detectors.
    fn scan(&self, cancel: &CancelToken) -> Result<Vec<Installation>>;

    /// This detector's watcher, if it has one.
    fn watcher(&self) -> Option<Arc<dyn Watcher>>;
}
