//! Detector descriptors: where to look for runtime installations.
//!
//! Lookout ships a built-in catalogue covering the common JDK install
//! managers, and merges an optional user descriptor file over it. The file is
//! an ordered YAML mapping of descriptor id to body:
//!
//! ```yaml
//! sdkman:
//!   label: SDKMAN
//!   root: "${SDKMAN_DIR}/candidates/java"
//! custom:
//!   label: Custom
//!   root: "~/runtimes"
//!   watch: false
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::error::{LookoutError, Result};

/// Immutable description of a detection strategy, consumed once at manager
/// initialization to construct a detector.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectorDescriptor {
    /// Unique descriptor id.
    pub id: String,

    /// Display label, used as the `[label]` prefix on discovered names.
    pub label: String,

    /// Root location template; may contain `~` and `${VAR}` placeholders.
    pub root: String,

    /// Whether the detector starts out enabled.
    pub enabled_by_default: bool,

    /// Whether the detector's directory is watched by default.
    pub watch_by_default: bool,
}

/// Descriptor body as it appears in the YAML file, keyed by id.
#[derive(Debug, Deserialize)]
struct DescriptorBody {
    #[serde(default)]
    label: Option<String>,
    root: String,
    #[serde(default = "default_true")]
    enabled: bool,
    #[serde(default = "default_true")]
    watch: bool,
}

fn default_true() -> bool {
    true
}

impl DescriptorBody {
    fn into_descriptor(self, id: String) -> DetectorDescriptor {
        DetectorDescriptor {
            label: self.label.unwrap_or_else(|| id.clone()),
            id,
            root: self.root,
            enabled_by_default: self.enabled,
            watch_by_default: self.watch,
        }
    }
}

/// The built-in descriptor catalogue.
///
/// Covers the directory conventions of the common JDK install managers.
pub fn builtin_descriptors() -> Vec<DetectorDescriptor> {
    let builtin = |id: &str, label: &str, root: &str| DetectorDescriptor {
        id: id.to_string(),
        label: label.to_string(),
        root: root.to_string(),
        enabled_by_default: true,
        watch_by_default: true,
    };

    vec![
        builtin("sdkman", "SDKMAN", "~/.sdkman/candidates/java"),
        builtin("intellij", "IntelliJ", "~/.jdks"),
        builtin("jabba", "Jabba", "~/.jabba/jdk"),
        builtin("asdf", "asdf", "~/.asdf/installs/java"),
        builtin("gradle", "Gradle", "~/.gradle/jdks"),
    ]
}

/// Load descriptors from a YAML file, preserving document order.
pub fn load_descriptors(path: &Path) -> Result<Vec<DetectorDescriptor>> {
    if !path.exists() {
        return Err(LookoutError::ConfigNotFound {
            path: path.to_path_buf(),
        });
    }

    let contents = std::fs::read_to_string(path)?;
    parse_descriptors(&contents).map_err(|message| LookoutError::ConfigParseError {
        path: path.to_path_buf(),
        message,
    })
}

fn parse_descriptors(contents: &str) -> std::result::Result<Vec<DetectorDescriptor>, String> {
    if contents.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mapping: serde_yaml::Mapping =
        serde_yaml::from_str(contents).map_err(|e| e.to_string())?;

    let mut descriptors = Vec::new();
    for (key, value) in mapping {
        let id = key
            .as_str()
            .ok_or_else(|| format!("descriptor id must be a string, got {:?}", key))?
            .to_string();
        let body: DescriptorBody = serde_yaml::from_value(value)
            .map_err(|e| format!("descriptor '{}': {}", id, e))?;
        descriptors.push(body.into_descriptor(id));
    }
    Ok(descriptors)
}

/// The effective descriptor set: built-ins with the user file merged over
/// them by id. Overrides keep the built-in's position; new ids append in
/// file order. A missing or absent file yields just the built-ins.
pub fn descriptor_set(user_file: Option<&Path>) -> Result<Vec<DetectorDescriptor>> {
    let mut descriptors = builtin_descriptors();

    let Some(path) = user_file else {
        return Ok(descriptors);
    };
    if !path.exists() {
        return Ok(descriptors);
    }

    for user in load_descriptors(path)? {
        match descriptors.iter_mut().find(|d| d.id == user.id) {
            Some(existing) => *existing = user,
            None => descriptors.push(user),
        }
    }
    Ok(descriptors)
}
