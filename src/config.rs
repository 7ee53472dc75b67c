//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.gdrefactor.toml` files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default config file name, looked up in the current directory.
pub const CONFIG_FILE: &str = ".gdrefactor.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Backup settings.
    #[serde(default)]
    pub backup: BackupConfig,

    /// Scene conventions of the game.
    #[serde(default)]
    pub scene: SceneConfig,

    /// Reading-time settings for text objects.
    #[serde(default)]
    pub text_timing: TextTimingConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Project file to refactor.
    #[serde(default = "default_project")]
    pub project: PathBuf,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            project: default_project(),
            verbose: false,
        }
    }
}

fn default_project() -> PathBuf {
    PathBuf::from("./unbound.json")
}

/// Backup settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupConfig {
    /// Copy the project aside before each write.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Backup file name prefix.
    #[serde(default = "default_backup_prefix")]
    pub prefix: String,
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            prefix: default_backup_prefix(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_backup_prefix() -> String {
    "backup".to_string()
}

/// Scene conventions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneConfig {
    /// Layouts whose names start with this are playable levels.
    #[serde(default = "default_level_prefix")]
    pub level_prefix: String,

    /// Game window width in pixels.
    #[serde(default = "default_window_width")]
    pub window_width: f64,

    /// Game window height in pixels.
    #[serde(default = "default_window_height")]
    pub window_height: f64,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            level_prefix: default_level_prefix(),
            window_width: default_window_width(),
            window_height: default_window_height(),
        }
    }
}

fn default_level_prefix() -> String {
    "L_".to_string()
}

fn default_window_width() -> f64 {
    800.0
}

fn default_window_height() -> f64 {
    600.0
}

/// Reading-time settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextTimingConfig {
    /// Instance variable the reading time is stored in.
    #[serde(default = "default_timing_variable")]
    pub variable: String,

    /// Fixed time before the first character, in milliseconds.
    #[serde(default = "default_base_ms")]
    pub base_ms: u64,

    /// Time per visible character, in milliseconds.
    #[serde(default = "default_per_char_ms")]
    pub per_char_ms: u64,

    /// Lower bound, in milliseconds.
    #[serde(default = "default_min_ms")]
    pub min_ms: u64,

    /// Upper bound, in milliseconds.
    #[serde(default = "default_max_ms")]
    pub max_ms: u64,
}

impl Default for TextTimingConfig {
    fn default() -> Self {
        Self {
            variable: default_timing_variable(),
            base_ms: default_base_ms(),
            per_char_ms: default_per_char_ms(),
            min_ms: default_min_ms(),
            max_ms: default_max_ms(),
        }
    }
}

fn default_timing_variable() -> String {
    "ReadTime".to_string()
}

fn default_base_ms() -> u64 {
    1000
}

fn default_per_char_ms() -> u64 {
    50
}

fn default_min_ms() -> u64 {
    1500
}

fn default_max_ms() -> u64 {
    10_000
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref path) = args.path {
            self.general.project = path.clone();
        }

        if args.no_backup {
            self.backup.enabled = false;
        }

        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
