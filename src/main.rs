//! chatdeck CLI entry point.
//!
//! Parses command-line arguments and dispatches to the appropriate command handler.

use chatdeck::commands::{config_display_command, config_reset_command, gui_command};
use chatdeck::logging::init_logging;
use chatdeck::output::print_error;
use chatdeck::ui::gui::app::AppOptions;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "chatdeck")]
#[command(
    version,
    about = "Desktop chat workspace with a responsive layout shell",
    after_help = "EXAMPLES:
    # Open the window
    chatdeck

    # Preview the phone layout (mouse presses act as touches)
    chatdeck --mobile

    # Inspect or reset the settings file
    chatdeck config
    chatdeck config --reset"
)]
struct Cli {
    /// Force the mobile layout and treat mouse presses as touches
    #[arg(long)]
    mobile: bool,

    /// Log level for chatdeck's own output (RUST_LOG takes precedence)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Settings file to use instead of ~/.config/chatdeck/settings.toml
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the settings file (secrets masked)
    #[command(after_help = "EXAMPLES:
    chatdeck config            # Print path and contents
    chatdeck config --reset    # Restore defaults")]
    Config {
        /// Overwrite the settings file with defaults
        #[arg(long)]
        reset: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let result = match &cli.command {
        Some(Commands::Config { reset: true }) => config_reset_command(cli.settings.as_deref()),
        Some(Commands::Config { reset: false }) => config_display_command(cli.settings.as_deref()),
        None => gui_command(AppOptions {
            force_mobile: cli.mobile,
            settings_path: cli.settings.clone(),
        }),
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "command failed");
        print_error(&e.to_string());
        std::process::exit(1);
    }
}
