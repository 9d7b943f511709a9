//! Configuration management for Govnet CLI.

use anyhow::{Context, Result};
use govnet::prelude::ModelConfig;
use govnet::runtime::scenario::DEFAULT_SCENARIO_STEPS;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "govnet.toml";

/// Govnet project configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub run: RunConfig,
}

/// How runs are driven from the command line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(default = "default_steps")]
    pub steps: u64,
    /// Runs per scenario for `compare`.
    #[serde(default = "default_runs")]
    pub runs: u64,
    /// First seed for `compare`.
    #[serde(default = "default_base_seed")]
    pub base_seed: u64,
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

// Default value functions
fn default_steps() -> u64 { DEFAULT_SCENARIO_STEPS }
fn default_runs() -> u64 { 10 }
fn default_base_seed() -> u64 { 1 }
fn default_output_dir() -> String { "govnet-output".to_string() }

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            steps: default_steps(),
            runs: default_runs(),
            base_seed: default_base_seed(),
            output_dir: default_output_dir(),
        }
    }
}

impl Config {
    /// Load config from govnet.toml in the current or parent directories.
    pub fn load() -> Result<Self> {
        match find_config_file() {
            Some(path) => Self::load_from(&path),
            None => Ok(Config::default()),
        }
    }

    /// Load config from a specific file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))
    }

    /// Save config to the specified path.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }
}

/// Find govnet.toml in current or parent directories.
fn find_config_file() -> Option<PathBuf> {
    let mut dir = std::env::current_dir().ok()?;
    loop {
        let config_path = dir.join(CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }
        if !dir.pop() {
            break;
        }
    }
    None
}
