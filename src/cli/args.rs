//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// Lookout - runtime environment discovery.
#[derive(Debug, Parser)]
#[command(name = "lookout")]
#[command(author, version, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the config directory (detectors.yml, settings.yml)
    #[arg(short, long, global = true, env = "LOOKOUT_CONFIG_DIR")]
    pub config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Scan for installed runtimes (default if no command specified)
    Detect(DetectArgs),

    /// List configured detection strategies and their resolved roots
    Detectors(DetectorsArgs),

    /// Watch detector directories and announce new installs
    Watch(WatchArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `detect` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct DetectArgs {
    /// Output machine-readable JSON
    #[arg(long)]
    pub json: bool,

    /// Only run the given detector ids (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub detector: Vec<String>,
}

/// Arguments for the `detectors` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct DetectorsArgs {
    /// Output machine-readable JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `watch` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct WatchArgs {
    /// Stop after this many seconds (0 = run until interrupted)
    #[arg(long, default_value_t = 0)]
    pub duration: u64,

    /// Run a full detection pass before watching
    #[arg(long)]
    pub scan_first: bool,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_detect_with_json() {
        let cli = Cli::parse_from(["lookout", "detect", "--json"]);
        match cli.command {
            Some(Commands::Detect(args)) => assert!(args.json),
            _ => panic!("expected detect command"),
        }
    }

    #[test]
    fn parses_detector_filter_list() {
        let cli = Cli::parse_from(["lookout", "detect", "--detector", "sdkman,gradle"]);
        match cli.command {
            Some(Commands::Detect(args)) => {
                assert_eq!(args.detector, vec!["sdkman", "gradle"]);
            }
            _ => panic!("expected detect command"),
        }
    }

    #[test]
    fn watch_duration_defaults_to_unbounded() {
        let cli = Cli::parse_from(["lookout", "watch"]);
        match cli.command {
            Some(Commands::Watch(args)) => assert_eq!(args.duration, 0),
            _ => panic!("expected watch command"),
        }
    }

    #[test]
    fn no_subcommand_is_allowed() {
        let cli = Cli::parse_from(["lookout"]);
        assert!(cli.command.is_none());
    }
}
