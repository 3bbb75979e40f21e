use crate::error::{ChatdeckError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// The base config directory name under ~/.config/
const CONFIG_DIR_NAME: &str = "chatdeck";

/// The filename for the settings file.
const SETTINGS_FILENAME: &str = "settings.toml";

/// Upper bound on stored environment variables.
pub const MAX_ENV_VARS: usize = 20;

/// Upper bound on stored custom prompts.
pub const MAX_CUSTOM_PROMPTS: usize = 10;

// ============================================================================
// Settings Model
// ============================================================================

/// Color scheme used by the whole window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Returns the opposite theme.
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn is_dark(self) -> bool {
        matches!(self, Theme::Dark)
    }
}

/// An environment variable injected into the sandbox.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvVar {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub value: String,
}

impl EnvVar {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A reusable prompt snippet offered in the chat composer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomPrompt {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub content: String,
}

impl CustomPrompt {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            content: content.into(),
        }
    }
}

/// Keys of the secret fields shown on the General settings tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SecretField {
    GithubToken,
    SandboxApiKey,
}

impl SecretField {
    pub fn all() -> &'static [SecretField] {
        &[SecretField::GithubToken, SecretField::SandboxApiKey]
    }

    pub fn label(self) -> &'static str {
        match self {
            SecretField::GithubToken => "GitHub Token",
            SecretField::SandboxApiKey => "Sandbox API Key",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            SecretField::GithubToken => "Used to clone private repositories into the sandbox.",
            SecretField::SandboxApiKey => "Credentials for the remote sandbox provider.",
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            SecretField::GithubToken => "ghp_...",
            SecretField::SandboxApiKey => "sk-...",
        }
    }
}

/// Persisted user settings.
///
/// Missing fields fall back to their defaults so partial files keep working.
///
/// ```toml
/// theme = "dark"
/// notification_sound_enabled = true
///
/// [[env_vars]]
/// name = "RUST_LOG"
/// value = "debug"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub theme: Theme,

    #[serde(default = "default_true")]
    pub notification_sound_enabled: bool,

    #[serde(default)]
    pub github_token: String,

    #[serde(default)]
    pub sandbox_api_key: String,

    #[serde(default)]
    pub env_vars: Vec<EnvVar>,

    #[serde(default)]
    pub custom_prompts: Vec<CustomPrompt>,
}

fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            notification_sound_enabled: true,
            github_token: String::new(),
            sandbox_api_key: String::new(),
            env_vars: Vec::new(),
            custom_prompts: Vec::new(),
        }
    }
}

impl Settings {
    pub fn secret(&self, field: SecretField) -> &str {
        match field {
            SecretField::GithubToken => &self.github_token,
            SecretField::SandboxApiKey => &self.sandbox_api_key,
        }
    }

    pub fn secret_mut(&mut self, field: SecretField) -> &mut String {
        match field {
            SecretField::GithubToken => &mut self.github_token,
            SecretField::SandboxApiKey => &mut self.sandbox_api_key,
        }
    }

    pub fn env_vars_full(&self) -> bool {
        self.env_vars.len() >= MAX_ENV_VARS
    }

    pub fn custom_prompts_full(&self) -> bool {
        self.custom_prompts.len() >= MAX_CUSTOM_PROMPTS
    }
}

// ============================================================================
// Validation
// ============================================================================

/// Check that a name is usable as a shell environment variable.
pub fn is_valid_env_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Validate settings for logical consistency before they are written.
pub fn validate_settings(settings: &Settings) -> Result<()> {
    if settings.env_vars.len() > MAX_ENV_VARS {
        return Err(ChatdeckError::InvalidSetting(format!(
            "at most {} environment variables are allowed",
            MAX_ENV_VARS
        )));
    }
    if settings.custom_prompts.len() > MAX_CUSTOM_PROMPTS {
        return Err(ChatdeckError::InvalidSetting(format!(
            "at most {} custom prompts are allowed",
            MAX_CUSTOM_PROMPTS
        )));
    }

    let mut seen = HashSet::new();
    for var in &settings.env_vars {
        if !is_valid_env_name(&var.name) {
            return Err(ChatdeckError::InvalidSetting(format!(
                "'{}' is not a valid environment variable name",
                var.name
            )));
        }
        if !seen.insert(var.name.as_str()) {
            return Err(ChatdeckError::InvalidSetting(format!(
                "environment variable '{}' is defined twice",
                var.name
            )));
        }
    }

    if settings.custom_prompts.iter().any(|p| p.name.trim().is_empty()) {
        return Err(ChatdeckError::InvalidSetting(
            "custom prompts need a name".to_string(),
        ));
    }

    Ok(())
}

// ============================================================================
// Settings File Management
// ============================================================================

const DEFAULT_SETTINGS_WITH_COMMENTS: &str = r#"# chatdeck settings
# Edited from the Settings screen; hand edits are picked up on next launch.

# Color scheme: "light" or "dark"
theme = "light"

# Play a sound when the assistant finishes responding
notification_sound_enabled = true

# Sandbox credentials
github_token = ""
sandbox_api_key = ""

# Environment variables ([[env_vars]] tables with name/value)
# Custom prompts ([[custom_prompts]] tables with name/content)
"#;

/// Get the chatdeck config directory path (~/.config/chatdeck/).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| ChatdeckError::Config("Could not determine home directory".to_string()))?;
    Ok(home.join(".config").join(CONFIG_DIR_NAME))
}

/// Get the path to the settings file (~/.config/chatdeck/settings.toml).
pub fn settings_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(SETTINGS_FILENAME))
}

/// Load settings from `path`.
///
/// A missing file is created with commented defaults.
pub fn load_settings_from(path: &Path) -> Result<Settings> {
    if !path.exists() {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, DEFAULT_SETTINGS_WITH_COMMENTS)?;
        tracing::info!(path = %path.display(), "created default settings file");
        return Ok(Settings::default());
    }

    let content = fs::read_to_string(path)?;
    toml::from_str(&content).map_err(|e| {
        ChatdeckError::Config(format!(
            "Failed to parse settings file at {:?}: {}",
            path, e
        ))
    })
}

/// Validate and write settings to `path`.
pub fn save_settings_to(path: &Path, settings: &Settings) -> Result<()> {
    validate_settings(settings)?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let body = toml::to_string_pretty(settings)
        .map_err(|e| ChatdeckError::Config(format!("Failed to serialize settings: {}", e)))?;
    fs::write(path, format!("# chatdeck settings\n\n{}", body))?;
    tracing::debug!(path = %path.display(), "settings saved");
    Ok(())
}

/// Overwrite the settings at `path` with defaults.
pub fn reset_settings_at(path: &Path) -> Result<Settings> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, DEFAULT_SETTINGS_WITH_COMMENTS)?;
    Ok(Settings::default())
}
