// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Configuration module

use crate::http::HttpConfig;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_DIR_NAME: &str = ".apicli";
pub const SETTINGS_FILE: &str = "config.toml";

/// Settings read from `config.toml` inside the config directory
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub http: HttpConfig,
}

/// Resolved configuration for one invocation
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding collection and environment files.
    pub config_dir: PathBuf,
    pub settings: Settings,
}

impl Config {
    /// Load settings from `config_dir`, or from `~/.apicli` when not given.
    pub fn load(config_dir: Option<PathBuf>) -> Result<Self> {
        let config_dir = match config_dir {
            Some(dir) => dir,
            None => default_config_dir()?,
        };

        let settings_path = config_dir.join(SETTINGS_FILE);
        let settings = if settings_path.exists() {
            let content = fs::read_to_string(&settings_path)
                .with_context(|| format!("Failed to read {}", settings_path.display()))?;
            parse_settings(&content)
                .with_context(|| format!("Failed to parse {}", settings_path.display()))?
        } else {
            Settings::default()
        };

        tracing::debug!(config_dir = %config_dir.display(), "loaded configuration");

        Ok(Self {
            config_dir,
            settings,
        })
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }
}

fn default_config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine the home directory; pass --config-dir")?;
    Ok(home.join(CONFIG_DIR_NAME))
}

fn parse_settings(content: &str) -> Result<Settings> {
    Ok(toml::from_str(content)?)
}
