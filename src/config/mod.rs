use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub feed: FeedConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Quiet period (ms) before a dangling chained-shortcut prefix is
    /// discarded.
    #[serde(default = "default_chain_delay_ms")]
    pub chain_delay_ms: u64,
    #[serde(default)]
    pub theme: String,
}

fn default_chain_delay_ms() -> u64 {
    800
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            chain_delay_ms: default_chain_delay_ms(),
            theme: String::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FeedConfig {
    /// Default JSON threat feed used by `threatdeck stats`.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

pub fn config_dir() -> Result<PathBuf> {
    let dir = directories::ProjectDirs::from("", "", "threatdeck")
        .context("Could not determine config directory")?
        .config_dir()
        .to_path_buf();
    Ok(dir)
}

pub fn default_config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

/// Load the config, falling back to defaults when no file exists.
pub fn load(path: Option<&Path>) -> Result<Config> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => default_config_path()?,
    };

    if !path.exists() {
        tracing::debug!("No config at {}, using defaults", path.display());
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config from {}", path.display()))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config from {}", path.display()))?;

    Ok(config)
}
