//! Debounced, coalescing notification aggregation.
//!
//! A single aggregator instance collects discovery events from all watchers
//! and emits at most one notification per quiet period: a burst of N events
//! inside the delay window produces exactly one notification, and events that
//! arrive while a run is in flight get a fast follow-up run instead of being
//! dropped.
//!
//! # Scheduling
//!
//! One worker thread drives an explicit state machine over
//! {Idle, Scheduled(deadline), Running, Shutdown}. `queue()` always moves the
//! deadline to now + delay, extending a pending run rather than stacking a
//! second one. The end of Running is the only place that decides whether to
//! go Idle or reschedule, which keeps re-entrancy out of the picture.
//!
//! The pending queue has its own lock, independent of the manager's, and is
//! snapshot-and-cleared atomically so no concurrently queued event is lost or
//! delivered twice.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crate::model::Installation;
use crate::watch::WatchListener;

/// Quiet period before a coalesced notification is emitted.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(1000);

/// Classifies installations eligible for notification.
pub type ManagedPredicate = Box<dyn Fn(&Installation) -> bool + Send + Sync>;

/// Runtime check for the notification toggle, evaluated at each run.
pub type EnabledCheck = Box<dyn Fn() -> bool + Send + Sync>;

/// The UI boundary: receives a non-empty, deduplicated batch.
pub type DispatchFn = Box<dyn Fn(Vec<Installation>) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Schedule {
    Idle,
    Scheduled(Instant),
    Running,
    Shutdown,
}

struct Shared {
    // Insertion-ordered, deduplicated by installation identity.
    pending: Mutex<Vec<Installation>>,
    schedule: Mutex<Schedule>,
    tick: Condvar,
    cancelled: AtomicBool,
    delay: Duration,
    enabled: EnabledCheck,
    is_managed: ManagedPredicate,
    dispatch: DispatchFn,
}

/// Collects discovery events and emits coalesced notifications.
pub struct NotificationAggregator {
    shared: Arc<Shared>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl NotificationAggregator {
    /// Create an aggregator with the default quiet period.
    pub fn new(enabled: EnabledCheck, is_managed: ManagedPredicate, dispatch: DispatchFn) -> Self {
        Self::with_delay(DEFAULT_DELAY, enabled, is_managed, dispatch)
    }

    /// Create an aggregator with an explicit quiet period.
    pub fn with_delay(
        delay: Duration,
        enabled: EnabledCheck,
        is_managed: ManagedPredicate,
        dispatch: DispatchFn,
    ) -> Self {
        let shared = Arc::new(Shared {
            pending: Mutex::new(Vec::new()),
            schedule: Mutex::new(Schedule::Idle),
            tick: Condvar::new(),
            cancelled: AtomicBool::new(false),
            delay,
            enabled,
            is_managed,
            dispatch,
        });

        let worker_shared = Arc::clone(&shared);
        let worker = std::thread::Builder::new()
            .name("lookout-notifications".to_string())
            .spawn(move || worker_loop(worker_shared))
            .expect("failed to spawn aggregator worker");

        Self {
            shared,
            worker: Mutex::new(Some(worker)),
        }
    }

    /// Queue installations for the next coalesced notification.
    ///
    /// Non-managed installations are filtered out; an identity already
    /// pending keeps its position. Queueing always resets the quiet period.
    pub fn queue<I>(&self, installations: I)
    where
        I: IntoIterator<Item = Installation>,
    {
        {
            let mut pending = self.shared.pending.lock().expect("pending lock poisoned");
            for installation in installations {
                if !(self.shared.is_managed)(&installation) {
                    continue;
                }
                if pending.iter().any(|p| p.id() == installation.id()) {
                    continue;
                }
                pending.push(installation);
            }
        }
        self.schedule_after(self.shared.delay);
    }

    /// Request cancellation: the next run drops all pending events without
    /// notifying.
    pub fn cancel(&self) {
        self.shared.cancelled.store(true, Ordering::Relaxed);
        self.schedule_after(Duration::ZERO);
    }

    /// Number of pending, not yet notified installations.
    pub fn pending_len(&self) -> usize {
        self.shared.pending.lock().expect("pending lock poisoned").len()
    }

    fn schedule_after(&self, delay: Duration) {
        let mut schedule = self.shared.schedule.lock().expect("schedule lock poisoned");
        if *schedule == Schedule::Shutdown {
            return;
        }
        *schedule = Schedule::Scheduled(Instant::now() + delay);
        self.shared.tick.notify_all();
    }
}

impl WatchListener for NotificationAggregator {
    fn installations_discovered(&self, installations: Vec<Installation>) {
        self.queue(installations);
    }
}

impl Drop for NotificationAggregator {
    fn drop(&mut self) {
        {
            let mut schedule = self.shared.schedule.lock().expect("schedule lock poisoned");
            *schedule = Schedule::Shutdown;
            self.shared.tick.notify_all();
        }
        if let Some(worker) = self.worker.lock().expect("worker lock poisoned").take() {
            let _ = worker.join();
        }
    }
}

fn worker_loop(shared: Arc<Shared>) {
    loop {
        // Wait until a scheduled deadline elapses, tracking extensions.
        {
            let mut schedule = shared.schedule.lock().expect("schedule lock poisoned");
            loop {
                match *schedule {
                    Schedule::Shutdown => return,
                    Schedule::Idle | Schedule::Running => {
                        schedule = shared
                            .tick
                            .wait(schedule)
                            .expect("schedule lock poisoned");
                    }
                    Schedule::Scheduled(deadline) => {
                        let now = Instant::now();
                        if now < deadline {
                            let (guard, _) = shared
                                .tick
                                .wait_timeout(schedule, deadline - now)
                                .expect("schedule lock poisoned");
                            schedule = guard;
                        } else {
                            *schedule = Schedule::Running;
                            break;
                        }
                    }
                }
            }
        }

        run_once(&shared);

        // End of Running: the single authoritative reschedule decision.
        let refilled = !shared
            .pending
            .lock()
            .expect("pending lock poisoned")
            .is_empty();
        let mut schedule = shared.schedule.lock().expect("schedule lock poisoned");
        match *schedule {
            Schedule::Shutdown => return,
            // A queue() that landed during the run already set a fresh
            // deadline; tighten it so late arrivals are delivered promptly.
            Schedule::Scheduled(_) | Schedule::Running => {
                if shared.cancelled.load(Ordering::Relaxed) {
                    *schedule = Schedule::Idle;
                } else if refilled {
                    *schedule = Schedule::Scheduled(Instant::now());
                } else if *schedule == Schedule::Running {
                    *schedule = Schedule::Idle;
                }
            }
            Schedule::Idle => {}
        }
    }
}

/// One debounced run: observe cancellation, snapshot-and-clear the queue,
/// honor the notification toggle, and dispatch fire-and-forget.
fn run_once(shared: &Arc<Shared>) {
    if shared.cancelled.load(Ordering::Relaxed) {
        shared
            .pending
            .lock()
            .expect("pending lock poisoned")
            .clear();
        tracing::debug!("aggregator cancelled, dropping pending notifications");
        return;
    }

    let snapshot = std::mem::take(&mut *shared.pending.lock().expect("pending lock poisoned"));

    if !(shared.enabled)() || snapshot.is_empty() {
        return;
    }

    tracing::debug!(count = snapshot.len(), "dispatching coalesced notification");
    let dispatch_shared = Arc::clone(shared);
    std::thread::spawn(move || (dispatch_shared.dispatch)(snapshot));
}
