//! Configuration module
//!
//! Handles CLI configuration: output mode, the on-disk config file holding
//! the API key, and API key resolution.

use anyhow::{Context, Result, anyhow};
use fal_client::FalClient;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::output::OutputMode;

/// Environment variables checked for an API key, in priority order
pub const API_KEY_ENV_VARS: &[&str] = &[
    "FAL_KEY",
    "FAL_API_KEY",
    "FAL_API",
    "API_KEY_FAL",
    "API_FAL",
    "FAL_PK",
    "FAL_PUBLIC",
    "FAL_API_SECRET",
    "FAL_SECRET_KEY",
    "FAL_API_SECRET_KEY",
    "FAL_SECRET",
    "SECRET_FAL",
    "API_SECRET_FAL",
    "SK_FAL",
    "FAL_SK",
];

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// How results are written to stdout
    pub output: OutputMode,
    /// Location of the config file
    pub config_path: PathBuf,
}

impl Config {
    /// Creates a configuration using the default config file location
    pub fn new(output: OutputMode) -> Self {
        Self {
            output,
            config_path: default_config_path(),
        }
    }

    /// Resolve the API key from the environment, then the config file
    pub fn resolve_api_key(&self) -> Result<ResolvedKey> {
        resolve_api_key_with(|name| std::env::var(name).ok(), &self.config_path)
    }

    /// Build the API client shared by all commands of this invocation
    pub fn connect(&self) -> Result<FalClient> {
        let key = self.resolve_api_key()?;
        tracing::debug!("Using API key from {}", key.source);

        FalClient::new(key.key).context("Failed to initialize HTTP client")
    }
}

/// Default config file path: `<config dir>/fal/config.json`
///
/// - macOS: `~/Library/Application Support/fal/config.json`
/// - Linux: `~/.config/fal/config.json`
/// - Windows: `%AppData%\fal\config.json`
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("fal")
        .join("config.json")
}

/// Contents of the config file
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct StoredConfig {
    /// Saved fal.ai API key. Empty when not set.
    #[serde(default)]
    pub api_key: String,
}

impl StoredConfig {
    /// Loads the config file; a missing file yields an empty config
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let buf = fs::read(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_slice(&buf)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Saves the config file, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write config file {}", path.display()))?;
        restrict_permissions(path)?;

        Ok(())
    }

    /// Removes the config file if it exists
    pub fn clear(path: &Path) -> Result<()> {
        if path.exists() {
            fs::remove_file(path)
                .with_context(|| format!("Failed to remove config file {}", path.display()))?;
        }
        Ok(())
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    Ok(())
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<()> {
    Ok(())
}

/// Where an API key was found
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySource {
    Env(&'static str),
    ConfigFile,
}

impl std::fmt::Display for KeySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeySource::Env(name) => write!(f, "{} env var", name),
            KeySource::ConfigFile => write!(f, "config file"),
        }
    }
}

/// An API key and where it came from
#[derive(Debug, Clone)]
pub struct ResolvedKey {
    pub key: String,
    pub source: KeySource,
}

/// First non-empty API key environment variable
pub fn find_env_key(lookup: impl Fn(&str) -> Option<String>) -> Option<(&'static str, String)> {
    API_KEY_ENV_VARS
        .iter()
        .find_map(|name| lookup(name).filter(|v| !v.is_empty()).map(|v| (*name, v)))
}

/// Resolve the API key: environment aliases first, then the config file
pub fn resolve_api_key_with(
    lookup: impl Fn(&str) -> Option<String>,
    config_path: &Path,
) -> Result<ResolvedKey> {
    if let Some((name, key)) = find_env_key(lookup) {
        return Ok(ResolvedKey {
            key,
            source: KeySource::Env(name),
        });
    }

    let stored = StoredConfig::load(config_path).context("Failed to load config")?;
    if !stored.api_key.is_empty() {
        return Ok(ResolvedKey {
            key: stored.api_key,
            source: KeySource::ConfigFile,
        });
    }

    Err(anyhow!(
        "not authenticated, run: fal auth set-key <api-key>\nor set the FAL_KEY env var"
    ))
}

/// Mask a secret for display
pub fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    match chars.len() {
        0 => "(not set)".to_string(),
        1..=8 => "***".to_string(),
        n => format!(
            "{}...{}",
            chars[..4].iter().collect::<String>(),
            chars[n - 4..].iter().collect::<String>()
        ),
    }
}
