//! Configuration management

use crate::core::theme::{ThemeOverride, ThemeVariant};
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Terminal defaults applied to new sessions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerminalConfig {
    /// Shell executable; empty means use $SHELL, falling back to /bin/sh
    #[serde(default)]
    pub shell: String,
    /// Working directory for new sessions; empty means current directory
    #[serde(default)]
    pub working_directory: String,
    /// Scrollback line limit for the screen model
    #[serde(default = "default_scrollback")]
    pub scrollback: usize,
}

fn default_scrollback() -> usize {
    1000
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            shell: String::new(),
            working_directory: String::new(),
            scrollback: default_scrollback(),
        }
    }
}

/// Appearance settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppearanceConfig {
    /// Theme variant
    #[serde(default)]
    pub variant: ThemeVariant,
    /// Per-field theme overrides applied on top of the variant preset
    #[serde(default)]
    pub theme: ThemeOverride,
}

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Terminal configuration
    #[serde(default)]
    pub terminal: TerminalConfig,
    /// Appearance configuration
    #[serde(default)]
    pub appearance: AppearanceConfig,
}

impl Config {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            let config: Config = toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            Ok(config)
        } else {
            // Return default config if file doesn't exist
            Ok(Config::default())
        }
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to a specific file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {:?}", path))?;

        Ok(())
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "agentterm", "AgentTerm")
            .context("Failed to determine config directory")?;
        Ok(proj_dirs.config_dir().join("config.toml"))
    }
}

/// Immutable per-session configuration, read once at view construction.
///
/// The session id is the view's identity: a different id means a different
/// view. Changing any other field after construction has no effect until a
/// new view is created.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Opaque session identifier
    pub id: String,
    /// Initial column count
    pub cols: u16,
    /// Initial row count
    pub rows: u16,
    /// Working directory for the PTY process
    pub working_directory: Option<PathBuf>,
    /// Shell executable; `None` means the bridge default
    pub shell: Option<String>,
    /// Theme variant
    pub variant: ThemeVariant,
    /// Per-field theme overrides
    pub theme: ThemeOverride,
}

impl SessionConfig {
    /// Create a session configuration with default geometry and theme
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            cols: 80,
            rows: 24,
            working_directory: None,
            shell: None,
            variant: ThemeVariant::default(),
            theme: ThemeOverride::default(),
        }
    }
}
