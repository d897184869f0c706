//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod calc;
pub mod export;
pub mod settings;
pub mod watch;

pub use calc::{handle_calc_command, handle_list_command, CalcArgs, ListArgs};
pub use export::{handle_export_command, ExportCommands};
pub use settings::{handle_settings_command, SettingsCommands};
pub use watch::{handle_watch_command, WatchArgs};
