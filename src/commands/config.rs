//! Config command handler.
//!
//! Displays and resets the chatdeck settings file.

use std::path::{Path, PathBuf};

use crate::config::{self, Settings};
use crate::error::{ChatdeckError, Result};
use crate::output::{print_success, BOLD, GRAY, RESET, YELLOW};

/// Placeholder printed instead of secret values.
const MASK: &str = "********";

fn resolve_path(path: Option<&Path>) -> Result<PathBuf> {
    match path {
        Some(path) => Ok(path.to_path_buf()),
        None => config::settings_path(),
    }
}

/// Display the settings file.
///
/// Secret values are masked. A missing file is reported and the defaults are
/// shown without creating it.
///
/// # Returns
///
/// * `Ok(())` on success
/// * `Err(ChatdeckError)` if the file cannot be read or parsed
pub fn config_display_command(path: Option<&Path>) -> Result<()> {
    let path = resolve_path(path)?;

    println!("{BOLD}# Settings{RESET}");
    println!("{GRAY}# {}{RESET}", path.display());
    println!();

    if !path.exists() {
        println!("{YELLOW}# (file does not exist, using defaults){RESET}");
        println!();
        print!("{}", render_masked(&Settings::default())?);
        return Ok(());
    }

    let settings = config::load_settings_from(&path)?;
    print!("{}", render_masked(&settings)?);
    Ok(())
}

/// Overwrite the settings file with defaults.
pub fn config_reset_command(path: Option<&Path>) -> Result<()> {
    let path = resolve_path(path)?;
    config::reset_settings_at(&path)?;
    tracing::info!(path = %path.display(), "settings reset");
    print_success(&format!("Settings reset to defaults: {}", path.display()));
    Ok(())
}

/// Serialize `settings` as TOML with secret values replaced by [`MASK`].
fn render_masked(settings: &Settings) -> Result<String> {
    let mut masked = settings.clone();
    for &field in config::SecretField::all() {
        let value = masked.secret_mut(field);
        if !value.is_empty() {
            *value = MASK.to_string();
        }
    }
    for var in &mut masked.env_vars {
        if !var.value.is_empty() {
            var.value = MASK.to_string();
        }
    }

    toml::to_string_pretty(&masked)
        .map_err(|e| ChatdeckError::Config(format!("Failed to serialize settings: {}", e)))
}
