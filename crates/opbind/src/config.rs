//! CLI configuration loading (immutable functional pattern)
//!
//! This module handles loading configuration from:
//! 1. Built-in defaults
//! 2. Global config: `<config dir>/opbind/config.toml`
//! 3. Project config: `.opbind/config.toml`
//! 4. An explicit `--config` file
//! 5. Environment variables: `OPBIND_*`
//!
//! Later sources override earlier ones. All operations return new instances.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Resolved CLI configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Pretty-print JSON output
    pub pretty: bool,
    /// Default tracing filter when `RUST_LOG` is unset
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pretty: false,
            log_level: "info".to_string(),
        }
    }
}

/// One config file; every key optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PartialConfig {
    pub pretty: Option<bool>,
    pub log_level: Option<String>,
}

impl Config {
    /// Overlay the keys present in `partial`.
    #[must_use]
    pub fn merge(self, partial: PartialConfig) -> Self {
        Self {
            pretty: partial.pretty.unwrap_or(self.pretty),
            log_level: partial.log_level.unwrap_or(self.log_level),
        }
    }

    /// Overlay `OPBIND_PRETTY` and `OPBIND_LOG_LEVEL` as read by `lookup`.
    pub fn apply_env<F>(self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let pretty = lookup("OPBIND_PRETTY")
            .map(|v| parse_bool("OPBIND_PRETTY", &v))
            .transpose()?;
        Ok(self.merge(PartialConfig {
            pretty,
            log_level: lookup("OPBIND_LOG_LEVEL"),
        }))
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("{key} must be a boolean, got '{other}'"),
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// PUBLIC API
// ═══════════════════════════════════════════════════════════════════════════

/// Load configuration from all sources with hierarchy
///
/// # Errors
///
/// Returns error if:
/// - A config file exists but cannot be read or is malformed TOML
/// - The explicit `--config` file does not exist
/// - An `OPBIND_*` variable has an invalid value
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let config = [global_config_path(), Some(project_config_path())]
        .into_iter()
        .flatten()
        .filter(|path| path.exists())
        .try_fold(Config::default(), |config, path| {
            load_toml_file(&path).map(|partial| config.merge(partial))
        })?;

    let config = match explicit {
        Some(path) => config.merge(load_toml_file(path)?),
        None => config,
    };

    config.apply_env(|key| std::env::var(key).ok())
}

/// Get path to global config file
pub fn global_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "opbind")
        .map(|proj_dirs| proj_dirs.config_dir().join("config.toml"))
}

/// Path to the project config file, relative to the working directory
#[must_use]
pub fn project_config_path() -> PathBuf {
    PathBuf::from(".opbind").join("config.toml")
}

/// Load a TOML file into a partial config
///
/// # Errors
///
/// Returns error if the file cannot be read or the TOML is malformed.
pub fn load_toml_file(path: &Path) -> Result<PartialConfig> {
    if path.is_dir() {
        anyhow::bail!(
            "Config path is a directory, not a file: {}",
            path.display()
        );
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let partial = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;
    tracing::debug!(path = %path.display(), "loaded config file");
    Ok(partial)
}
