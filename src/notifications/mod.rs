//! Debounced notification aggregation.

pub mod aggregator;

pub use aggregator::{NotificationAggregator, DEFAULT_DELAY};
