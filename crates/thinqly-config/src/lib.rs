//! Shared configuration for the thinqly CLI.
//!
//! TOML config + `THINQ_`-prefixed environment overrides, resolved
//! through figment. Carries the account region (country/language), the
//! state-file location, and transport tuning. The CLI layers its own
//! flag overrides on top.

use std::path::PathBuf;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config struct ──────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Account country code (e.g. "US").
    #[serde(default = "default_country")]
    pub country: String,

    /// Account language code (e.g. "en-US").
    #[serde(default = "default_language")]
    pub language: String,

    /// State-file location. Defaults to the platform data directory.
    pub state_path: Option<PathBuf>,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            country: default_country(),
            language: default_language(),
            state_path: None,
            timeout: default_timeout(),
        }
    }
}

fn default_country() -> String {
    "US".into()
}
fn default_language() -> String {
    "en-US".into()
}
fn default_timeout() -> u64 {
    30
}

impl Config {
    /// The effective state-file path: the configured one, or
    /// `<data dir>/state.json`.
    pub fn state_path(&self) -> PathBuf {
        self.state_path
            .clone()
            .unwrap_or_else(|| data_dir().join("state.json"))
    }

    /// Minimal sanity checks on region codes.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.country.len() != 2 || !self.country.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ConfigError::Validation {
                field: "country".into(),
                reason: format!("expected a two-letter country code, got '{}'", self.country),
            });
        }
        if !self.language.contains('-') {
            return Err(ConfigError::Validation {
                field: "language".into(),
                reason: format!("expected a ll-CC language code, got '{}'", self.language),
            });
        }
        Ok(())
    }
}

// ── Paths ───────────────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "thinqly", "thinqly").map_or_else(
        || dirs_fallback().join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Resolve the data directory (state file home).
pub fn data_dir() -> PathBuf {
    ProjectDirs::from("com", "thinqly", "thinqly").map_or_else(
        dirs_fallback,
        |dirs| dirs.data_dir().to_path_buf(),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("thinqly");
    p
}

// ── Loading / saving ────────────────────────────────────────────────

/// Load the full Config from file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(config_path()))
        .merge(Env::prefixed("THINQ_"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning defaults if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    let path = config_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, toml::to_string_pretty(cfg)?)?;
    Ok(())
}
