//! netcheck configuration loading and parsing

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use netcheck_tools::DiagnosticsConfig;

const DEFAULT_CONFIG_PATH: &str = "/etc/netcheck/config.toml";

/// Root configuration structure
#[derive(Debug, Deserialize, Default)]
pub struct NetcheckConfig {
    #[serde(default)]
    pub system: SystemConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub diagnostics: DiagnosticsConfig,
}

#[derive(Debug, Deserialize)]
pub struct SystemConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Language-model endpoint
#[derive(Debug, Deserialize, Clone)]
pub struct ModelConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// No limit when unset
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            timeout_seconds: None,
        }
    }
}

fn default_log_level() -> String { "info".into() }
fn default_base_url() -> String { "http://localhost:11434".into() }
fn default_model() -> String { "llama3.2".into() }

/// Config file location: `$NETCHECK_CONFIG`, else /etc/netcheck/config.toml
pub fn config_path() -> PathBuf {
    std::env::var("NETCHECK_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Load configuration from `path`, falling back to defaults when the file
/// does not exist.
pub fn load_config_from(path: &Path) -> Result<NetcheckConfig> {
    if !path.exists() {
        return Ok(NetcheckConfig::default());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config from {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse config from {}", path.display()))
}
