//! The `detect` command: one-shot detection pass.

use std::path::PathBuf;
use std::sync::Arc;

use console::style;

use crate::cli::args::DetectArgs;
use crate::cli::commands::{Command, CommandResult};
use crate::config::descriptors;
use crate::detection::{CancelToken, DetectorManager};
use crate::error::Result;
use crate::model::Installation;
use crate::ui::ScanProgressBar;
use crate::watch::WatchListener;

/// Listener for one-shot detection; watchers never start, so nothing arrives.
struct DiscardListener;

impl WatchListener for DiscardListener {
    fn installations_discovered(&self, _installations: Vec<Installation>) {}
}

/// Runs a single detection pass and prints the results.
pub struct DetectCommand {
    config_dir: Option<PathBuf>,
    args: DetectArgs,
}

impl DetectCommand {
    pub fn new(config_dir: Option<PathBuf>, args: DetectArgs) -> Self {
        Self { config_dir, args }
    }
}

impl Command for DetectCommand {
    fn execute(&self) -> Result<CommandResult> {
        let descriptor_file = self.config_dir.as_ref().map(|d| d.join("detectors.yml"));
        let mut descriptors = descriptors::descriptor_set(descriptor_file.as_deref())?;
        if !self.args.detector.is_empty() {
            descriptors.retain(|d| self.args.detector.contains(&d.id));
        }

        let manager = DetectorManager::new(Arc::new(DiscardListener));
        manager.initialize(&descriptors);

        let found = if self.args.json {
            manager.detect_installations(&CancelToken::new(), &crate::detection::NoProgress)
        } else {
            let progress = ScanProgressBar::new();
            let found = manager.detect_installations(&CancelToken::new(), &progress);
            progress.finish();
            found
        };

        if self.args.json {
            let json = serde_json::to_string_pretty(&found).map_err(anyhow::Error::new)?;
            println!("{}", json);
            return Ok(CommandResult::success());
        }

        if found.is_empty() {
            println!("No runtime installations found.");
            return Ok(CommandResult::success());
        }

        println!(
            "{} installation{} found:",
            found.len(),
            if found.len() == 1 { "" } else { "s" }
        );
        for installation in &found {
            let version = installation
                .version
                .as_deref()
                .map(|v| format!(" ({})", v))
                .unwrap_or_default();
            println!(
                "  {}{}  {}",
                style(&installation.name).cyan(),
                version,
                style(installation.home.display()).dim()
            );
        }

        Ok(CommandResult::success())
    }
}
