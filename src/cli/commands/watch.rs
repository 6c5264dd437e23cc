//! The `watch` command: watch detector directories and announce new installs.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use console::style;

use crate::cli::args::WatchArgs;
use crate::cli::commands::{Command, CommandResult};
use crate::config::descriptors;
use crate::config::settings::Settings;
use crate::detection::{CancelToken, DetectorManager, NoProgress};
use crate::error::Result;
use crate::model::is_managed;
use crate::notifications::NotificationAggregator;
use crate::ui::show_notification;
use crate::watch::WatchListener;

/// Watches all configured detector directories until interrupted or until the
/// requested duration elapses.
pub struct WatchCommand {
    config_dir: Option<PathBuf>,
    args: WatchArgs,
}

impl WatchCommand {
    pub fn new(config_dir: Option<PathBuf>, args: WatchArgs) -> Self {
        Self { config_dir, args }
    }
}

impl Command for WatchCommand {
    fn execute(&self) -> Result<CommandResult> {
        let descriptor_file = self.config_dir.as_ref().map(|d| d.join("detectors.yml"));
        let settings_file = self.config_dir.as_ref().map(|d| d.join("settings.yml"));

        let descriptors = descriptors::descriptor_set(descriptor_file.as_deref())?;
        let settings = match &settings_file {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };

        if !settings.watch_directories {
            println!(
                "{}",
                style("Watching is disabled in settings (watch_directories: false).").yellow()
            );
            return Ok(CommandResult::failure(1));
        }

        let notifications_enabled = settings.notifications_enabled;
        let aggregator = Arc::new(NotificationAggregator::new(
            Box::new(move || notifications_enabled),
            Box::new(is_managed),
            Box::new(|batch| show_notification(&batch)),
        ));

        let manager = DetectorManager::new(Arc::clone(&aggregator) as Arc<dyn WatchListener>);
        manager.initialize(&descriptors);

        if self.args.scan_first {
            let found = manager.detect_installations(&CancelToken::new(), &NoProgress);
            println!(
                "Initial scan found {} installation{}.",
                found.len(),
                if found.len() == 1 { "" } else { "s" }
            );
        }

        manager.start_watching();

        let watching = manager
            .detectors()
            .iter()
            .filter(|d| d.watcher().map(|w| w.is_running()).unwrap_or(false))
            .count();
        println!(
            "Watching {} of {} detector directories. Press Ctrl-C to stop.",
            watching,
            manager.detectors().len()
        );

        if self.args.duration == 0 {
            loop {
                std::thread::sleep(Duration::from_secs(3600));
            }
        }

        std::thread::sleep(Duration::from_secs(self.args.duration));
        manager.stop_watching();
        aggregator.cancel();

        Ok(CommandResult::success())
    }
}
