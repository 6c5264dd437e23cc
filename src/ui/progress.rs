//! indicatif-backed scan progress.

use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;

use crate::detection::ScanProgress;

/// A progress bar over the detector set: one unit per detector.
pub struct ScanProgressBar {
    bar: Mutex<ProgressBar>,
}

impl ScanProgressBar {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(ProgressBar::hidden()),
        }
    }

    /// Finish and clear the bar.
    pub fn finish(&self) {
        self.bar.lock().expect("progress lock poisoned").finish_and_clear();
    }
}

impl Default for ScanProgressBar {
    fn default() -> Self {
        Self::new()
    }
}

impl ScanProgress for ScanProgressBar {
    fn begin(&self, total: usize) {
        let bar = ProgressBar::new(total as u64);
        bar.set_style(
            ProgressStyle::with_template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
                .expect("valid progress template")
                .progress_chars("=> "),
        );
        *self.bar.lock().expect("progress lock poisoned") = bar;
    }

    fn detector_started(&self, id: &str) {
        self.bar
            .lock()
            .expect("progress lock poisoned")
            .set_message(id.to_string());
    }

    fn detector_finished(&self, _id: &str, _found: usize) {
        self.bar.lock().expect("progress lock poisoned").inc(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_counts_detectors() {
        let progress = ScanProgressBar::new();
        progress.begin(3);
        progress.detector_started("sdkman");
        progress.detector_finished("sdkman", 2);
        assert_eq!(progress.bar.lock().unwrap().position(), 1);
        progress.finish();
    }
}
