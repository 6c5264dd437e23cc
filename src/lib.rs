//! Lookout - runtime environment discovery and watching.
//!
//! Lookout finds runtime installations (JDKs and similar SDK layouts) in the
//! well-known directories that install managers use, optionally watches those
//! directories so new installs are picked up live, and coalesces bursts of
//! discoveries into a single notification.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Detector descriptors, template interpolation, and settings
//! - [`detection`] - Detector trait, built-in directory detector, and the
//!   detection/watch manager
//! - [`error`] - Error types and result aliases
//! - [`model`] - The discovered-installation value type
//! - [`notifications`] - Debounced notification aggregation
//! - [`ui`] - Terminal output for notifications and scan progress
//! - [`watch`] - Filesystem watcher trait and the notify-backed implementation
//!
//! # Example
//!
//! ```
//! use lookout::config::{SubstitutionContext, resolve_template};
//!
//! // Resolve a descriptor root template against the environment
//! let mut ctx = SubstitutionContext::default();
//! ctx.vars.insert("SDKMAN_DIR".to_string(), "/opt/sdkman".to_string());
//! let root = resolve_template("${SDKMAN_DIR}/candidates/java", &ctx).unwrap();
//! assert_eq!(root, "/opt/sdkman/candidates/java");
//! ```
//!
//! For end-to-end detection, see the integration tests.

pub mod cli;
pub mod config;
pub mod detection;
pub mod error;
pub mod model;
pub mod notifications;
pub mod ui;
pub mod watch;

pub use error::{LookoutError, Result};
pub use model::Installation;
