//! Configuration loader/writer plus strongly typed settings structures.
//!
//! `config.toml` carries the styled attributes of the progress bar, the
//! layout it is placed in, and the demo driver settings. A default file is
//! embedded at compile time and extracted on first run.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::widgets::ProgressTextVisibility;

pub mod validator;

pub use validator::{ValidationIssue, ValidationResult, ValidationSeverity};

// Embed default configuration at compile time
const DEFAULT_CONFIG: &str = include_str!("../defaults/config.toml");

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "NUMBER_PROGRESS_DIR";

/// Top-level configuration object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub progress_bar: ProgressBarStyle,
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub demo: DemoConfig,
}

/// Styled attributes applied when a bar is created
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressBarStyle {
    pub reached_color: String,
    pub unreached_color: String,
    pub text_color: String,
    pub text_size: f32,
    pub reached_bar_height: f32,
    pub unreached_bar_height: f32,
    pub text_offset: f32,
    pub text_visibility: ProgressTextVisibility,
    pub progress: i32,
    pub max: i32,
    pub prefix: String,
    pub suffix: String,
}

impl Default for ProgressBarStyle {
    fn default() -> Self {
        Self {
            reached_color: "#4291f1".to_string(),
            unreached_color: "#cccccc".to_string(),
            text_color: "#4291f1".to_string(),
            text_size: 1.0,
            reached_bar_height: 0.75,
            unreached_bar_height: 0.5,
            text_offset: 1.0,
            text_visibility: ProgressTextVisibility::Visible,
            progress: 0,
            max: 100,
            prefix: String::new(),
            suffix: "%".to_string(),
        }
    }
}

/// Where the bar sits inside its window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub padding_left: u16,
    pub padding_right: u16,
    pub padding_top: u16,
    pub padding_bottom: u16,
    pub show_border: bool,
    /// "plain", "rounded", "double" or "thick"
    pub border_style: Option<String>,
    pub border_color: Option<String>,
    pub title: Option<String>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            padding_left: 2,
            padding_right: 2,
            padding_top: 0,
            padding_bottom: 0,
            show_border: true,
            border_style: Some("rounded".to_string()),
            border_color: None,
            title: Some("Number Progress".to_string()),
        }
    }
}

/// Timer-driven demo settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Delay before the first tick
    pub start_delay_ms: u64,
    /// Period between ticks
    pub tick_interval_ms: u64,
    /// Progress added per tick
    pub step: i32,
    pub toast_duration_ms: u64,
    pub finish_message: String,
    /// Restore the bar saved by the previous run
    pub restore_state: bool,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            start_delay_ms: 1000,
            tick_interval_ms: 100,
            step: 1,
            toast_duration_ms: 1500,
            finish_message: "Finished!".to_string(),
            restore_state: true,
        }
    }
}

impl Config {
    /// Load config.toml from the data directory, extracting defaults first
    pub fn load() -> Result<Self> {
        Self::load_from_dir(&Self::config_dir()?)
    }

    /// Load config.toml from `dir`, extracting defaults into it if needed
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        Self::extract_defaults(dir)?;
        Self::load_from_path(&dir.join("config.toml"))
    }

    /// Load config from a custom file path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let contents =
            fs::read_to_string(path).context(format!("Failed to read config file: {:?}", path))?;
        let mut config =
            Self::parse(&contents).context(format!("Failed to parse config file: {:?}", path))?;

        // Validate and auto-fix values the widget or the timer cannot use
        let validation = config.validate();
        if validation.has_errors() {
            tracing::warn!("Config validation found {} errors", validation.errors().len());
            for error in validation.errors() {
                tracing::warn!("  {}", error.message());
            }

            let fixed = validator::auto_fix_config(&mut config, &validation.issues);
            if fixed > 0 {
                tracing::info!("Auto-fixed {} config issues", fixed);
            }
        }
        if validation.has_warnings() {
            for warning in validation.warnings() {
                tracing::warn!("Config warning: {}", warning.message());
            }
        }

        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    pub fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("Invalid config TOML")
    }

    /// The config embedded in the binary
    pub fn embedded_default() -> Result<Self> {
        Self::parse(DEFAULT_CONFIG).context("Failed to parse embedded default config")
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, contents).context("Failed to write config file")?;
        Ok(())
    }

    pub fn validate(&self) -> ValidationResult {
        validator::validate_config(self)
    }

    /// Expose base directory path (~/.number-progress)
    pub fn base_dir() -> Result<PathBuf> {
        Self::config_dir()
    }

    /// Get the base directory, overridable with NUMBER_PROGRESS_DIR
    fn config_dir() -> Result<PathBuf> {
        if let Ok(custom_dir) = std::env::var(DATA_DIR_ENV) {
            return Ok(PathBuf::from(custom_dir));
        }

        let home = dirs::home_dir().context("Could not find home directory")?;
        Ok(home.join(".number-progress"))
    }

    /// Returns: ~/.number-progress/config.toml
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns: ~/.number-progress/state.toml
    pub fn state_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("state.toml"))
    }

    fn extract_defaults(dir: &Path) -> Result<()> {
        fs::create_dir_all(dir).context(format!("Failed to create data directory {:?}", dir))?;

        let config_path = dir.join("config.toml");
        if !config_path.exists() {
            fs::write(&config_path, DEFAULT_CONFIG).context("Failed to write default config.toml")?;
            tracing::info!("Extracted default config to {:?}", config_path);
        }
        Ok(())
    }
}
