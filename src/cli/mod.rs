//! Command-line interface for Lookout.
//!
//! # Architecture
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`commands`] - Command implementations

pub mod args;
pub mod commands;

pub use args::{Cli, Commands, CompletionsArgs, DetectArgs, DetectorsArgs, WatchArgs};
pub use commands::{Command, CommandDispatcher, CommandResult};
