//! Configuration schema types for `skinrender.toml`
//!
//! Every section is optional; a missing file or section falls back to the
//! public profile service and the stock cache headers.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

use crate::render::{MAX_SIZE, MIN_SIZE};

/// Upstream profile service settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the name lookup API
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Base URL of the session (profile) API
    #[serde(default = "default_session_base_url")]
    pub session_base_url: String,
    /// TCP connect timeout in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    /// Whole-request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    /// User-Agent sent with every upstream request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            session_base_url: default_session_base_url(),
            connect_timeout_secs: default_connect_timeout(),
            request_timeout_secs: default_request_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl ApiConfig {
    /// Point both base URLs at one host, as a local stand-in service would.
    pub fn with_base_url(base: &str) -> Self {
        Self { api_base_url: base.to_string(), session_base_url: base.to_string(), ..Self::default() }
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn default_api_base_url() -> String {
    "https://api.mojang.com".to_string()
}

fn default_session_base_url() -> String {
    "https://sessionserver.mojang.com".to_string()
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_request_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    concat!("skinrender/", env!("CARGO_PKG_VERSION")).to_string()
}

/// Render defaults
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Size used when a request does not name one
    #[serde(default = "default_size")]
    pub default_size: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self { default_size: default_size() }
    }
}

fn default_size() -> u32 {
    crate::render::DEFAULT_SIZE
}

/// HTTP service settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Socket address to listen on
    #[serde(default = "default_bind")]
    pub bind: String,
    /// `Cache-Control` value on successful image responses
    #[serde(default = "default_cache_control")]
    pub cache_control: String,
    /// `CDN-Cache-Control` value on successful image responses
    #[serde(default = "default_cdn_cache_control")]
    pub cdn_cache_control: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            cache_control: default_cache_control(),
            cdn_cache_control: default_cdn_cache_control(),
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_cache_control() -> String {
    "public, max-age=3600, s-maxage=3600".to_string()
}

fn default_cdn_cache_control() -> String {
    "public, max-age=86400".to_string()
}

/// Root configuration (`skinrender.toml`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkinrenderConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// A single invalid field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigValidationError {
    /// Dotted path to the field (e.g. "api.session_base_url")
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "skinrender.toml: '{}' {}", self.field, self.message)
    }
}

impl SkinrenderConfig {
    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();
        let mut push = |field: &str, message: &str| {
            errors.push(ConfigValidationError { field: field.to_string(), message: message.to_string() });
        };

        for (field, url) in [("api.api_base_url", &self.api.api_base_url), ("api.session_base_url", &self.api.session_base_url)] {
            match reqwest::Url::parse(url) {
                Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
                Ok(_) => push(field, "must use http or https"),
                Err(_) => push(field, "must be an absolute URL"),
            }
        }

        if self.api.connect_timeout_secs == 0 {
            push("api.connect_timeout_secs", "must be a positive integer");
        }
        if self.api.request_timeout_secs == 0 {
            push("api.request_timeout_secs", "must be a positive integer");
        }
        if self.api.user_agent.trim().is_empty() {
            push("api.user_agent", "must be a non-empty string");
        }

        if !(MIN_SIZE..=MAX_SIZE).contains(&self.render.default_size) {
            push("render.default_size", "must be between 8 and 512");
        }

        if self.server.bind.parse::<SocketAddr>().is_err() {
            push("server.bind", "must be a socket address such as 0.0.0.0:3000");
        }
        for (field, value) in [
            ("server.cache_control", &self.server.cache_control),
            ("server.cdn_cache_control", &self.server.cdn_cache_control),
        ] {
            if value.is_empty() || !value.chars().all(|c| c.is_ascii_graphic() || c == ' ') {
                push(field, "must be a non-empty printable ASCII header value");
            }
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = SkinrenderConfig::default();
        assert!(config.validate().is_empty());
        assert_eq!(config.api.api_base_url, "https://api.mojang.com");
        assert_eq!(config.api.session_base_url, "https://sessionserver.mojang.com");
        assert_eq!(config.render.default_size, 512);
        assert_eq!(config.server.cache_control, "public, max-age=3600, s-maxage=3600");
        assert_eq!(config.server.cdn_cache_control, "public, max-age=86400");
    }

    #[test]
    fn test_parse_partial_file() {
        let config: SkinrenderConfig = toml::from_str(
            r#"
[api]
session_base_url = "http://127.0.0.1:9000"
request_timeout_secs = 5

[render]
default_size = 128
"#,
        )
        .unwrap();
        assert_eq!(config.api.api_base_url, "https://api.mojang.com");
        assert_eq!(config.api.session_base_url, "http://127.0.0.1:9000");
        assert_eq!(config.api.request_timeout(), Duration::from_secs(5));
        assert_eq!(config.api.connect_timeout(), Duration::from_secs(10));
        assert_eq!(config.render.default_size, 128);
        assert_eq!(config.server, ServerConfig::default());
    }

    #[test]
    fn test_parse_empty_file() {
        let config: SkinrenderConfig = toml::from_str("").unwrap();
        assert_eq!(config, SkinrenderConfig::default());
    }

    #[test]
    fn test_validate_reports_each_field() {
        let mut config = SkinrenderConfig::default();
        config.api.api_base_url = "not a url".to_string();
        config.api.session_base_url = "ftp://example.com".to_string();
        config.api.request_timeout_secs = 0;
        config.render.default_size = 4;
        config.server.bind = "localhost".to_string();
        config.server.cache_control = String::new();

        let fields: Vec<String> = config.validate().into_iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                "api.api_base_url",
                "api.session_base_url",
                "api.request_timeout_secs",
                "render.default_size",
                "server.bind",
                "server.cache_control",
            ]
        );
    }

    #[test]
    fn test_validation_error_display() {
        let err = ConfigValidationError { field: "server.bind".to_string(), message: "is wrong".to_string() };
        assert_eq!(err.to_string(), "skinrender.toml: 'server.bind' is wrong");
    }

    #[test]
    fn test_with_base_url() {
        let api = ApiConfig::with_base_url("http://127.0.0.1:4000");
        assert_eq!(api.api_base_url, "http://127.0.0.1:4000");
        assert_eq!(api.session_base_url, "http://127.0.0.1:4000");
        assert_eq!(api.user_agent, default_user_agent());
    }
}
