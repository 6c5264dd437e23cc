//! Cancellation and progress reporting for detection scans.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cooperative cancellation token.
///
/// Cancellation is coarse: the manager checks it before each detector, and
/// the built-in detector checks it between directory entries. An in-progress
/// probe is never preempted.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. All clones observe it.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Receives scan progress at detector boundaries.
///
/// The manager proportions progress evenly: `begin` announces the detector
/// count, and each detector accounts for exactly one finished unit.
pub trait ScanProgress: Send + Sync {
    /// A detection pass over `total` detectors is starting.
    fn begin(&self, total: usize) {
        let _ = total;
    }

    /// A detector's scan is about to run.
    fn detector_started(&self, id: &str) {
        let _ = id;
    }

    /// A detector's scan finished (successfully or not) with `found` results.
    fn detector_finished(&self, id: &str, found: usize) {
        let _ = (id, found);
    }
}

/// Progress sink that discards everything.
pub struct NoProgress;

impl ScanProgress for NoProgress {}
