//! Runtime installation detection.
//!
//! # Architecture
//!
//! - [`detector`] - The [`Detector`] trait implemented by detection strategies
//! - [`directory`] - Built-in strategy scanning a directory of installations
//! - [`manager`] - Orchestrates detection and the watch lifecycle
//! - [`progress`] - Cancellation token and scan progress reporting

pub mod detector;
pub mod directory;
pub mod manager;
pub mod progress;

pub use detector::Detector;
pub use directory::DirectoryDetector;
pub use manager::DetectorManager;
pub use progress::{CancelToken, NoProgress, ScanProgress};
