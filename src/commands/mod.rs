//! CLI command handlers for chatdeck.
//!
//! - [`gui`] - Launch the desktop window (default)
//! - [`config`] - Show or reset the settings file

mod config;
mod gui;

pub use config::{config_display_command, config_reset_command};
pub use gui::gui_command;
