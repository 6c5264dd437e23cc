//! Filesystem watching for detector roots.
//!
//! A [`Watcher`] is owned by its detector and has a start/stop lifecycle.
//! While started it observes the detector's root and emits newly discovered
//! installations to registered listeners. Listeners are held as weak
//! references, so registration never extends a listener's lifetime.

pub mod fs;

use std::sync::{Mutex, Weak};

use crate::error::Result;
use crate::model::Installation;

pub use fs::FsWatcher;

/// Receives discovered-installation events from a watcher.
///
/// Callbacks arrive on an arbitrary background thread and must be treated as
/// concurrent with all other operations.
pub trait WatchListener: Send + Sync {
    /// Called when a watcher observes newly present installations.
    fn installations_discovered(&self, installations: Vec<Installation>);
}

/// A start/stop lifecycle around observation of a directory subtree.
pub trait Watcher: Send + Sync {
    /// Begin watching. Redundant starts are no-ops.
    fn start(&self) -> Result<()>;

    /// Stop watching. Redundant stops are no-ops.
    fn stop(&self) -> Result<()>;

    /// Whether the watcher is currently running.
    fn is_running(&self) -> bool;

    /// Register a listener. Dead listeners are pruned on dispatch.
    fn add_listener(&self, listener: Weak<dyn WatchListener>);
}

/// A lock-guarded set of weak listener references with fan-out dispatch.
#[derive(Default)]
pub struct ListenerSet {
    listeners: Mutex<Vec<Weak<dyn WatchListener>>>,
}

impl ListenerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a listener to the set.
    pub fn add(&self, listener: Weak<dyn WatchListener>) {
        self.listeners
            .lock()
            .expect("listener set lock poisoned")
            .push(listener);
    }

    /// Dispatch installations to all live listeners, dropping dead ones.
    pub fn notify(&self, installations: Vec<Installation>) {
        let mut listeners = self.listeners.lock().expect("listener set lock poisoned");
        listeners.retain(|l| l.upgrade().is_some());
        for listener in listeners.iter() {
            if let Some(listener) = listener.upgrade() {
                listener.installations_discovered(installations.clone());
            }
        }
    }

    /// Number of live listeners.
    pub fn len(&self) -> usize {
        let mut listeners = self.listeners.lock().expect("listener set lock poisoned");
        listeners.retain(|l| l.upgrade().is_some());
        listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex as StdMutex};

    struct Recorder {
        received: StdMutex<Vec<Installation>>,
    }

    impl WatchListener for Recorder {
        fn installations_discovered(&self, installations: Vec<Installation>) {
            self.received.lock().unwrap().extend(installations);
        }
    }

    fn recorder() -> Arc<Recorder> {
        Arc::new(Recorder {
            received: StdMutex::new(Vec::new()),
        })
    }

    #[test]
    fn notify_reaches_live_listeners() {
        let set = ListenerSet::new();
        let listener = recorder();
        set.add(Arc::downgrade(&listener) as Weak<dyn WatchListener>);

        set.notify(vec![Installation::new("[T] jdk", "/nonexistent/jdk")]);

        assert_eq!(listener.received.lock().unwrap().len(), 1);
    }

    #[test]
    fn dropped_listeners_are_pruned() {
        let set = ListenerSet::new();
        let listener = recorder();
        set.add(Arc::downgrade(&listener) as Weak<dyn WatchListener>);
        assert_eq!(set.len(), 1);

        drop(listener);
        assert_eq!(set.len(), 0);

        // Dispatch to an empty set is a no-op, not a panic.
        set.notify(vec![Installation::new("[T] jdk", "/nonexistent/jdk")]);
    }

    #[test]
    fn registration_does_not_extend_lifetime() {
        let set = ListenerSet::new();
        let listener = recorder();
        let weak = Arc::downgrade(&listener);
        set.add(weak.clone() as Weak<dyn WatchListener>);

        drop(listener);
        assert!(weak.upgrade().is_none());
    }
}
