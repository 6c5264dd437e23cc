//! Configuration: detector descriptors, template interpolation, and settings.
//!
//! # Architecture
//!
//! - [`descriptors`] - Built-in detector catalogue and YAML descriptor loading
//! - [`interpolation`] - `${VAR}` and `~` substitution for root templates
//! - [`settings`] - User preferences (watch toggle, notification toggle)

pub mod descriptors;
pub mod interpolation;
pub mod settings;

pub use descriptors::{builtin_descriptors, load_descriptors, DetectorDescriptor};
pub use interpolation::{normalize_separators, resolve_template, SubstitutionContext};
pub use settings::{Settings, NOTIFICATIONS_ENABLED_KEY, WATCH_DIRECTORIES_KEY};
