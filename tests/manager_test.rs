//! Integration tests for the detection & watch manager, using mock detectors
//! and watchers to pin down lifecycle and isolation behavior.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Weak};

use lookout::detection::{CancelToken, Detector, DetectorManager, NoProgress};
use lookout::error::LookoutError;
use lookout::model::Installation;
use lookout::watch::{WatchListener, Watcher};
use lookout::Result;

struct NullListener;

impl WatchListener for NullListener {
    fn installations_discovered(&self, _installations: Vec<Installation>) {}
}

fn manager() -> DetectorManager {
    DetectorManager::new(Arc::new(NullListener))
}

fn installation(name: &str) -> Installation {
    Installation::new(format!("[T] {name}"), format!("/nonexistent/{name}"))
}

/// Watcher that records lifecycle calls and can be made to fail on start.
#[derive(Default)]
struct MockWatcher {
    running: AtomicBool,
    start_calls: AtomicUsize,
    stop_calls: AtomicUsize,
    fail_start: bool,
}

impl MockWatcher {
    fn failing() -> Self {
        Self {
            fail_start: true,
            ..Default::default()
        }
    }
}

impl Watcher for MockWatcher {
    fn start(&self) -> Result<()> {
        self.start_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_start {
            return Err(LookoutError::WatcherError {
                path: "/mock".into(),
                message: "start refused".into(),
            });
        }
        self.running.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn stop(&self) -> Result<()> {
        self.stop_calls.fetch_add(1, Ordering::SeqCst);
        self.running.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    fn add_listener(&self, _listener: Weak<dyn WatchListener>) {}
}

/// Scripted detector: serves canned results, an error, or cancels mid-scan.
struct MockDetector {
    id: String,
    enabled: bool,
    watch_enabled: bool,
    results: Vec<Installation>,
    fail_scan: bool,
    cancel_after_scan: bool,
    scan_calls: AtomicUsize,
    watcher: Option<Arc<MockWatcher>>,
}

impl MockDetector {
    fn new(id: &str, results: Vec<Installation>) -> Self {
        Self {
            id: id.to_string(),
            enabled: true,
            watch_enabled: true,
            results,
            fail_scan: false,
            cancel_after_scan: false,
            scan_calls: AtomicUsize::new(0),
            watcher: None,
        }
    }

    fn with_watcher(mut self, watcher: Arc<MockWatcher>) -> Self {
        self.watcher = Some(watcher);
        self
    }

    fn failing(id: &str) -> Self {
        let mut d = Self::new(id, Vec::new());
        d.fail_scan = true;
        d
    }

    fn cancelling(id: &str, results: Vec<Installation>) -> Self {
        let mut d = Self::new(id, results);
        d.cancel_after_scan = true;
        d
    }
}

impl Detector for MockDetector {
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
        self.scan_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_scan {
            return Err(LookoutError::ScanFailed {
                detector: self.id.clone(),
                message: "scan refused".into(),
            });
        }
        if self.cancel_after_scan {
            cancel.cancel();
        }
        Ok(self.results.clone())
    }

    fn watcher(&self) -> Option<Arc<dyn Watcher>> {
        self.watcher
            .as_ref()
            .map(|w| Arc::clone(w) as Arc<dyn Watcher>)
    }
}

#[test]
fn failing_detector_does_not_abort_the_pass() {
    let manager = manager();
    manager.add_detector(Arc::new(MockDetector::new("d1", vec![installation("a")])));
    manager.add_detector(Arc::new(MockDetector::failing("d2")));
    manager.add_detector(Arc::new(MockDetector::new("d3", vec![installation("b")])));

    let found = manager.detect_installations(&CancelToken::new(), &NoProgress);

    let names: Vec<_> = found.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["[T] a", "[T] b"]);
}

#[test]
fn cancellation_after_first_detector_skips_the_rest() {
    let manager = manager();
    let d1 = Arc::new(MockDetector::cancelling("d1", vec![installation("a")]));
    let d2 = Arc::new(MockDetector::new("d2", vec![installation("b")]));
    let d3 = Arc::new(MockDetector::new("d3", vec![installation("c")]));
    manager.add_detector(Arc::clone(&d1) as Arc<dyn Detector>);
    manager.add_detector(Arc::clone(&d2) as Arc<dyn Detector>);
    manager.add_detector(Arc::clone(&d3) as Arc<dyn Detector>);

    let cancel = CancelToken::new();
    let found = manager.detect_installations(&cancel, &NoProgress);

    assert_eq!(found.len(), 1, "only D1's partial result is returned");
    assert_eq!(found[0].name, "[T] a");
    assert_eq!(d2.scan_calls.load(Ordering::SeqCst), 0);
    assert_eq!(d3.scan_calls.load(Ordering::SeqCst), 0);
}

#[test]
fn results_preserve_first_seen_order_across_detectors() {
    let manager = manager();
    manager.add_detector(Arc::new(MockDetector::new(
        "d1",
        vec![installation("a"), installation("b")],
    )));
    manager.add_detector(Arc::new(MockDetector::new(
        "d2",
        vec![installation("b"), installation("c")],
    )));

    let found = manager.detect_installations(&CancelToken::new(), &NoProgress);

    let names: Vec<_> = found.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["[T] a", "[T] b", "[T] c"]);
}

#[test]
fn start_then_stop_leaves_every_watcher_stopped_despite_failures() {
    let manager = manager();
    let good = Arc::new(MockWatcher::default());
    let bad = Arc::new(MockWatcher::failing());
    let also_good = Arc::new(MockWatcher::default());
    manager.add_detector(Arc::new(
        MockDetector::new("d1", Vec::new()).with_watcher(Arc::clone(&good)),
    ));
    manager.add_detector(Arc::new(
        MockDetector::new("d2", Vec::new()).with_watcher(Arc::clone(&bad)),
    ));
    manager.add_detector(Arc::new(
        MockDetector::new("d3", Vec::new()).with_watcher(Arc::clone(&also_good)),
    ));

    manager.start_watching();
    assert!(good.is_running());
    assert!(!bad.is_running());
    assert!(also_good.is_running(), "failure in d2 must not block d3");

    manager.stop_watching();
    assert!(!good.is_running());
    assert!(!bad.is_running());
    assert!(!also_good.is_running());
    assert_eq!(bad.stop_calls.load(Ordering::SeqCst), 1);
}

#[test]
fn add_while_watching_starts_the_watcher_exactly_once() {
    let manager = manager();
    manager.start_watching();

    let watcher = Arc::new(MockWatcher::default());
    manager.add_detector(Arc::new(
        MockDetector::new("late", Vec::new()).with_watcher(Arc::clone(&watcher)),
    ));

    assert!(watcher.is_running());
    assert_eq!(watcher.start_calls.load(Ordering::SeqCst), 1);
}

#[test]
fn add_while_not_watching_does_not_start_the_watcher() {
    let manager = manager();
    let watcher = Arc::new(MockWatcher::default());
    manager.add_detector(Arc::new(
        MockDetector::new("early", Vec::new()).with_watcher(Arc::clone(&watcher)),
    ));

    assert!(!watcher.is_running());
    assert_eq!(watcher.start_calls.load(Ordering::SeqCst), 0);
}

#[test]
fn disabled_detector_is_not_started_on_add_while_watching() {
    let manager = manager();
    manager.start_watching();

    let watcher = Arc::new(MockWatcher::default());
    let mut detector = MockDetector::new("disabled", Vec::new()).with_watcher(Arc::clone(&watcher));
    detector.enabled = false;
    manager.add_detector(Arc::new(detector));

    assert!(!watcher.is_running());
}

#[test]
fn watch_disabled_detector_is_skipped_by_bulk_start_but_stopped_by_bulk_stop() {
    let manager = manager();
    let watcher = Arc::new(MockWatcher::default());
    let mut detector = MockDetector::new("no-watch", Vec::new()).with_watcher(Arc::clone(&watcher));
    detector.watch_enabled = false;
    manager.add_detector(Arc::new(detector));

    manager.start_watching();
    assert!(!watcher.is_running());
    assert_eq!(watcher.start_calls.load(Ordering::SeqCst), 0);

    manager.stop_watching();
    assert_eq!(watcher.stop_calls.load(Ordering::SeqCst), 1);
}

#[test]
fn failing_watcher_start_keeps_detector_usable_for_detection() {
    let manager = manager();
    manager.start_watching();
    manager.add_detector(Arc::new(
        MockDetector::new("flaky", vec![installation("a")])
            .with_watcher(Arc::new(MockWatcher::failing())),
    ));

    let found = manager.detect_installations(&CancelToken::new(), &NoProgress);
    assert_eq!(found.len(), 1);
}

#[test]
fn detector_without_watcher_still_detects() {
    let manager = manager();
    manager.add_detector(Arc::new(MockDetector::new("plain", vec![installation("a")])));

    manager.start_watching();
    manager.stop_watching();

    let found = manager.detect_installations(&CancelToken::new(), &NoProgress);
    assert_eq!(found.len(), 1);
}

#[test]
fn concurrent_adds_dedup_by_identity() {
    let manager = Arc::new(manager());
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let manager = Arc::clone(&manager);
            std::thread::spawn(move || {
                manager.add_detector(Arc::new(MockDetector::new("same", Vec::new())));
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(manager.detectors().len(), 1);
}

/// Progress observer recording detector boundaries.
#[derive(Default)]
struct RecordingProgress {
    begun: Mutex<Option<usize>>,
    finished: Mutex<Vec<String>>,
}

impl lookout::detection::ScanProgress for RecordingProgress {
    fn begin(&self, total: usize) {
        *self.begun.lock().unwrap() = Some(total);
    }

    fn detector_finished(&self, id: &str, _found: usize) {
        self.finished.lock().unwrap().push(id.to_string());
    }
}

#[test]
fn progress_is_proportioned_one_unit_per_detector() {
    let manager = manager();
    manager.add_detector(Arc::new(MockDetector::new("d1", Vec::new())));
    manager.add_detector(Arc::new(MockDetector::new("d2", Vec::new())));

    let progress = RecordingProgress::default();
    manager.detect_installations(&CancelToken::new(), &progress);

    assert_eq!(*progress.begun.lock().unwrap(), Some(2));
    assert_eq!(*progress.finished.lock().unwrap(), vec!["d1", "d2"]);
}
