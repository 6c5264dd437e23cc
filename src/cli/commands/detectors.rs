//! The `detectors` command: list configured detection strategies.

use std::path::PathBuf;

use console::style;
use serde::Serialize;

use crate::cli::args::DetectorsArgs;
use crate::cli::commands::{Command, CommandResult};
use crate::config::descriptors;
use crate::config::interpolation::{normalize_separators, resolve_template, SubstitutionContext};
use crate::error::Result;

#[derive(Serialize)]
struct DetectorInfo {
    id: String,
    label: String,
    root: String,
    resolved_root: Option<String>,
    enabled: bool,
    watch: bool,
}

/// Lists the effective descriptor set with resolved roots.
pub struct DetectorsCommand {
    config_dir: Option<PathBuf>,
    args: DetectorsArgs,
}

impl DetectorsCommand {
    pub fn new(config_dir: Option<PathBuf>, args: DetectorsArgs) -> Self {
        Self { config_dir, args }
    }
}

impl Command for DetectorsCommand {
    fn execute(&self) -> Result<CommandResult> {
        let descriptor_file = self.config_dir.as_ref().map(|d| d.join("detectors.yml"));
        let descriptors = descriptors::descriptor_set(descriptor_file.as_deref())?;

        let context = SubstitutionContext::from_env();
        let infos: Vec<DetectorInfo> = descriptors
            .iter()
            .map(|d| DetectorInfo {
                id: d.id.clone(),
                label: d.label.clone(),
                root: d.root.clone(),
                resolved_root: resolve_template(&d.root, &context)
                    .ok()
                    .map(|r| normalize_separators(&r)),
                enabled: d.enabled_by_default,
                watch: d.watch_by_default,
            })
            .collect();

        if self.args.json {
            let json = serde_json::to_string_pretty(&infos).map_err(anyhow::Error::new)?;
            println!("{}", json);
            return Ok(CommandResult::success());
        }

        for info in &infos {
            let root = info
                .resolved_root
                .as_deref()
                .unwrap_or("<unresolvable root>");
            let flags = match (info.enabled, info.watch) {
                (true, true) => String::new(),
                (true, false) => format!(" {}", style("[watch off]").yellow()),
                (false, _) => format!(" {}", style("[disabled]").yellow()),
            };
            println!(
                "{:<10} {}  {}{}",
                style(&info.id).cyan(),
                style(format!("[{}]", info.label)).bold(),
                root,
                flags
            );
        }

        Ok(CommandResult::success())
    }
}
