//! Configuration management for the application.
//!
//! This module handles loading, validating, and saving application configuration
//! in TOML format with platform-specific directory resolution.

use crate::constants::APP_NAME;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default input locations used when a command omits them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PathConfig {
    /// Layout table (e.g., "~/zmk-config/corne.layout.json")
    pub layout_table: Option<PathBuf>,
    /// Kconfig map
    pub kconfig_map: Option<PathBuf>,
    /// Keymap template; the built-in template is used when unset
    pub template: Option<PathBuf>,
}

/// Generation output settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Output directory for generated `.keymap` and `.conf` files
    pub output_dir: PathBuf,
}

impl Default for BuildConfig {
    fn default() -> Self {
        // Use config directory for build output by default
        let output_dir = Self::default_output_dir().unwrap_or_else(|_| PathBuf::from(".build"));

        Self { output_dir }
    }
}

impl BuildConfig {
    /// Gets the default output directory path.
    ///
    /// - Linux: `~/.config/LazyZMK/builds/`
    /// - macOS: `~/Library/Application Support/LazyZMK/builds/`
    /// - Windows: `%APPDATA%\LazyZMK\builds\`
    fn default_output_dir() -> Result<PathBuf> {
        Ok(Config::config_dir()?.join("builds"))
    }
}

/// Application configuration.
///
/// # File Location
///
/// - Linux: `~/.config/LazyZMK/config.toml`
/// - macOS: `~/Library/Application Support/LazyZMK/config.toml`
/// - Windows: `%APPDATA%\LazyZMK\config.toml`
///
/// # Validation
///
/// - configured input paths must exist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Default input paths
    pub paths: PathConfig,
    /// Output settings
    pub build: BuildConfig,
}

impl Config {
    /// Creates a new Config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks if the config file exists on disk.
    #[must_use]
    pub fn exists() -> bool {
        Self::config_file_path()
            .map(|path| path.exists())
            .unwrap_or(false)
    }

    /// Gets the platform-specific config directory path.
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to determine config directory")?
            .join(APP_NAME);

        Ok(config_dir)
    }

    /// Gets the full path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Loads configuration from the config file.
    ///
    /// If the file doesn't exist, returns default configuration.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    /// Loads configuration from a specific file.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::new());
        }

        let content = fs::read_to_string(config_path).context(format!(
            "Failed to read config file: {}",
            config_path.display()
        ))?;

        toml::from_str(&content).context(format!(
            "Failed to parse config file: {}",
            config_path.display()
        ))
    }

    /// Saves configuration to the config file.
    ///
    /// Uses temp file + rename pattern for atomic writes.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    /// Saves configuration to a specific file.
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        self.validate()?;

        if let Some(config_dir) = config_path.parent() {
            fs::create_dir_all(config_dir).context(format!(
                "Failed to create config directory: {}",
                config_dir.display()
            ))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;
        let temp_path = config_path.with_extension("toml.tmp");

        fs::write(&temp_path, content).context(format!(
            "Failed to write temp config file: {}",
            temp_path.display()
        ))?;

        // Atomic rename
        fs::rename(&temp_path, config_path).context(format!(
            "Failed to rename temp config file to: {}",
            config_path.display()
        ))?;

        Ok(())
    }

    /// Validates configuration values.
    ///
    /// Checks that every configured input file exists.
    pub fn validate(&self) -> Result<()> {
        let inputs = [
            ("layout table", &self.paths.layout_table),
            ("Kconfig map", &self.paths.kconfig_map),
            ("template", &self.paths.template),
        ];
        for (what, path) in inputs {
            if let Some(path) = path {
                if !path.is_file() {
                    anyhow::bail!("Configured {what} does not exist: {}", path.display());
                }
            }
        }

        Ok(())
    }
}
