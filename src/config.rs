//! Configuration file loading with environment variable overrides.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Default provider REST endpoint.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default provider model.
pub const DEFAULT_MODEL: &str = "imagen-4.0-generate-001";

/// Default server bind address.
pub const DEFAULT_BIND: &str = "127.0.0.1:3000";

/// Default server URL used by `generate`.
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:3000";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Remote provider settings.
    #[serde(default)]
    pub provider: ProviderConfig,

    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Session client settings.
    #[serde(default)]
    pub client: ClientConfig,
}

/// Remote provider settings.
#[derive(Debug, Default, Deserialize)]
pub struct ProviderConfig {
    /// Provider API key.
    pub api_key: Option<String>,
    /// Provider base URL.
    pub base_url: Option<String>,
    /// Provider model identifier.
    pub model: Option<String>,
}

/// HTTP server settings.
#[derive(Debug, Default, Deserialize)]
pub struct ServerConfig {
    /// Address to bind, e.g. `0.0.0.0:8080`.
    pub bind: Option<String>,
}

/// Session client settings.
#[derive(Debug, Default, Deserialize)]
pub struct ClientConfig {
    /// Base URL of a running `redcover serve`.
    pub server_url: Option<String>,
}

impl Config {
    /// Load configuration from the given path, or return defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(path: &Path) -> Result<Self, String> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
        toml::from_str(&contents)
            .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
    }

    /// Provider API key, preferring `GEMINI_API_KEY`.
    #[must_use]
    pub fn api_key(&self) -> Option<String> {
        env_non_empty("GEMINI_API_KEY").or_else(|| self.provider.api_key.clone())
    }

    /// Provider base URL, preferring `GEMINI_BASE_URL`.
    #[must_use]
    pub fn base_url(&self) -> String {
        env_non_empty("GEMINI_BASE_URL")
            .or_else(|| self.provider.base_url.clone())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }

    /// Provider model, preferring `GEMINI_IMAGE_MODEL`.
    #[must_use]
    pub fn model(&self) -> String {
        env_non_empty("GEMINI_IMAGE_MODEL")
            .or_else(|| self.provider.model.clone())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string())
    }

    /// Bind address for `serve`, with an explicit flag taking precedence.
    #[must_use]
    pub fn bind(&self, explicit: Option<&str>) -> String {
        explicit
            .map(str::to_string)
            .or_else(|| self.server.bind.clone())
            .unwrap_or_else(|| DEFAULT_BIND.to_string())
    }

    /// Server URL for `generate`, with an explicit flag taking precedence.
    #[must_use]
    pub fn server_url(&self, explicit: Option<&str>) -> String {
        explicit
            .map(str::to_string)
            .or_else(|| self.client.server_url.clone())
            .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string())
    }
}

fn env_non_empty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// Discover the config file path using the resolution order:
/// 1. Explicit path (from `--config` flag)
/// 2. `REDCOVER_CONFIG` environment variable
/// 3. `~/.config/redcover/config.toml`
#[must_use]
pub fn discover_config_path(explicit: Option<&str>) -> PathBuf {
    if let Some(p) = explicit {
        return PathBuf::from(p);
    }

    if let Ok(p) = std::env::var("REDCOVER_CONFIG") {
        return PathBuf::from(p);
    }

    default_config_path()
}

fn default_config_path() -> PathBuf {
    if let Ok(home) = std::env::var("HOME") {
        PathBuf::from(home).join(".config/redcover/config.toml")
    } else {
        PathBuf::from("redcover.toml")
    }
}
