//! Error types for Lookout operations.
//!
//! This module defines [`LookoutError`], the primary error type used throughout
//! the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Use `LookoutError` for domain-specific errors that need distinct handling
//! - Use `anyhow::Error` (via `LookoutError::Other`) for unexpected errors
//! - Per-detector and per-watcher failures are logged and isolated at the call
//!   site; they never abort a bulk operation over the whole detector set

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for Lookout operations.
#[derive(Debug, Error)]
pub enum LookoutError {
    /// Configuration file not found at expected location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse a descriptor or settings file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// A descriptor root template references a variable with no value.
    #[error("Unresolved variable: ${{{name}}}")]
    UnresolvedVariable { name: String },

    /// A detector scan failed.
    #[error("Detector '{detector}' failed: {message}")]
    ScanFailed { detector: String, message: String },

    /// A filesystem watcher could not be started or stopped.
    #[error("Watcher error for {path}: {message}")]
    WatcherError { path: PathBuf, message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LookoutError {
    /// Wrap a `notify` backend error for the given watch root.
    pub fn watcher(path: &std::path::Path, err: notify::Error) -> Self {
        Self::WatcherError {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }
}

/// Result type alias for Lookout operations.
pub type Result<T> = std::result::Result<T, LookoutError>;
