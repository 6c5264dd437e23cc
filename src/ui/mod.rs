//! Terminal output for notifications and scan progress.
//!
//! # Architecture
//!
//! - [`notification`] - Renders coalesced discovery notifications
//! - [`progress`] - indicatif-backed scan progress bar

pub mod notification;
pub mod progress;

pub use notification::show_notification;
pub use progress::ScanProgressBar;
