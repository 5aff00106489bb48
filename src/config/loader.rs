//! Configuration loading and discovery for `skinrender.toml`
//!
//! Provides functions to find, load and override configuration.

use super::schema::SkinrenderConfig;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name looked for during discovery.
pub const CONFIG_FILE_NAME: &str = "skinrender.toml";

/// Environment variable overriding `api.api_base_url`.
pub const ENV_API_BASE_URL: &str = "SKINRENDER_API_BASE_URL";
/// Environment variable overriding `api.session_base_url`.
pub const ENV_SESSION_BASE_URL: &str = "SKINRENDER_SESSION_BASE_URL";
/// Environment variable overriding `server.bind`.
pub const ENV_BIND: &str = "SKINRENDER_BIND";
/// Port-only override, as set by most hosting platforms.
pub const ENV_PORT: &str = "PORT";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse skinrender.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// Command-line values that take precedence over everything else
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    /// Override listen address
    pub bind: Option<String>,
    /// Override both upstream base URLs
    pub api_base_url: Option<String>,
}

/// Find skinrender.toml by walking up from the current working directory.
///
/// Search order:
/// 1. Walk up from current directory looking for skinrender.toml
/// 2. Check XDG_CONFIG_HOME/skinrender/skinrender.toml (or ~/.config/skinrender/skinrender.toml)
pub fn find_config() -> Option<PathBuf> {
    if let Ok(cwd) = env::current_dir() {
        if let Some(path) = find_config_from(cwd) {
            return Some(path);
        }
    }

    find_xdg_config()
}

/// Find skinrender.toml in the XDG config directory.
pub fn find_xdg_config() -> Option<PathBuf> {
    let xdg_config = env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|_| env::var("HOME").map(|h| PathBuf::from(h).join(".config")))
        .ok()?;

    let config_path = xdg_config.join("skinrender").join(CONFIG_FILE_NAME);
    if config_path.exists() {
        Some(config_path)
    } else {
        None
    }
}

/// Find skinrender.toml by walking up from `start`.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Load configuration, apply environment overrides and validate.
///
/// An explicit `path` must exist. Without one, discovery runs and a missing
/// file yields the defaults.
pub fn load_config(path: Option<&Path>) -> Result<SkinrenderConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    let mut config = match config_path {
        Some(p) => {
            tracing::debug!(path = %p.display(), "loading config");
            read_config_file(&p)?
        }
        None => SkinrenderConfig::default(),
    };

    apply_env_overrides(&mut config);
    check(&config)?;
    Ok(config)
}

/// Parse a config file without overrides or validation.
fn read_config_file(path: &Path) -> Result<SkinrenderConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    Ok(toml::from_str(&contents)?)
}

/// Turn validation findings into an error.
pub fn check(config: &SkinrenderConfig) -> Result<(), ConfigError> {
    let errors = config.validate();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()))
    }
}

/// Apply overrides from the process environment.
pub fn apply_env_overrides(config: &mut SkinrenderConfig) {
    apply_overrides_from(config, |key| env::var(key).ok());
}

/// Apply overrides read through `lookup`.
///
/// `PORT` replaces only the port of the bind address and loses to an explicit
/// `SKINRENDER_BIND`. Values that do not parse are left for validation to
/// report.
pub fn apply_overrides_from(config: &mut SkinrenderConfig, lookup: impl Fn(&str) -> Option<String>) {
    let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

    if let Some(url) = lookup(ENV_API_BASE_URL) {
        config.api.api_base_url = url;
    }
    if let Some(url) = lookup(ENV_SESSION_BASE_URL) {
        config.api.session_base_url = url;
    }

    if let Some(bind) = lookup(ENV_BIND) {
        config.server.bind = bind;
    } else if let Some(port) = lookup(ENV_PORT) {
        let host = config.server.bind.rsplit_once(':').map_or("0.0.0.0", |(host, _)| host);
        config.server.bind = format!("{}:{}", host, port.trim());
    }
}

/// Merge CLI overrides into a configuration.
pub fn merge_cli_overrides(config: &mut SkinrenderConfig, overrides: &CliOverrides) {
    if let Some(ref bind) = overrides.bind {
        config.server.bind = bind.clone();
    }

    if let Some(ref base) = overrides.api_base_url {
        config.api.api_base_url = base.clone();
        config.api.session_base_url = base.clone();
    }
}
