//! Configuration file support.

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::path::PathBuf;

/// Environment variable pointing at the note store root.
pub const ROOT_ENV: &str = "NOTEBOX_PATH";

/// Application configuration loaded from config file.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Note store root directory (contains boxes/, templates/, trash/)
    pub root: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the default config file location.
    ///
    /// Returns default config if the file doesn't exist.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)
            .with_context(|| format!("failed to read config file: {}", config_path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", config_path.display()))
    }

    /// Returns the path to the config file.
    ///
    /// Default: `~/.config/notebox/config.toml`
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("notebox")
            .join("config.toml")
    }

    /// Resolve the note store root.
    ///
    /// Precedence order:
    /// 1. CLI `--root` argument
    /// 2. `NOTEBOX_PATH` environment variable
    /// 3. Config file `root` setting
    pub fn store_root(&self, cli_root: Option<&PathBuf>) -> Result<PathBuf> {
        if let Some(root) = cli_root {
            return Ok(root.clone());
        }
        if let Ok(env_root) = std::env::var(ROOT_ENV) {
            if !env_root.is_empty() {
                return Ok(PathBuf::from(env_root));
            }
        }
        if let Some(root) = &self.root {
            return Ok(root.clone());
        }
        bail!(
            "no note store root configured; pass --root, set {ROOT_ENV}, or add 'root' to {}",
            Self::config_path().display()
        );
    }
}
