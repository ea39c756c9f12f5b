use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::secret::Secret;
use crate::{ConfigError, Result};

/// Live REST endpoint.
pub const LIVE_BASE_URL: &str = "https://api-m.paypal.com";
/// Sandbox REST endpoint.
pub const SANDBOX_BASE_URL: &str = "https://api-m.sandbox.paypal.com";

const LOG_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub state: StateConfig,
    #[serde(default)]
    pub sandbox: SandboxConfig,
}

/// Credentials and endpoint for the PayPal REST API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub client_secret: Option<Secret>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String {
    LIVE_BASE_URL.into()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            base_url: default_base_url(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".into()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Where the host keeps resource IDs between runs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateConfig {
    #[serde(default = "default_state_path")]
    pub path: PathBuf,
}

fn default_state_path() -> PathBuf {
    PathBuf::from("paypal-state.json")
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            path: default_state_path(),
        }
    }
}

/// Persistence of the in-memory sandbox between runs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SandboxConfig {
    #[serde(default = "default_snapshot_path")]
    pub snapshot: PathBuf,
}

fn default_snapshot_path() -> PathBuf {
    PathBuf::from("paypal-sandbox.json")
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            snapshot: default_snapshot_path(),
        }
    }
}

impl ProviderConfig {
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.api.base_url).map_err(|e| {
            ConfigError::validation(format!("api.base_url {:?} is not a URL: {e}", self.api.base_url))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::validation(format!(
                "api.base_url must use http or https, got {}",
                url.scheme()
            )));
        }

        let level = self.logging.level.to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::validation(format!(
                "logging.level must be one of {LOG_LEVELS:?}"
            )));
        }
        Ok(())
    }

    /// The client ID and secret, or an error naming the first one missing.
    pub fn require_credentials(&self) -> Result<(&str, &Secret)> {
        let client_id = self
            .api
            .client_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ConfigError::validation("a PayPal client_id is required"))?;
        let client_secret = self
            .api
            .client_secret
            .as_ref()
            .filter(|secret| !secret.is_empty())
            .ok_or_else(|| ConfigError::validation("a PayPal client_secret is required"))?;
        Ok((client_id, client_secret))
    }

    pub fn is_sandbox_endpoint(&self) -> bool {
        self.api.base_url.trim_end_matches('/') == SANDBOX_BASE_URL
    }

    /// Pretty TOML with the client secret masked.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::parse(e.to_string()))
    }
}
