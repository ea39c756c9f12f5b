//! Configuration for the PayPal resource provider.
//!
//! Sources are layered in this order, later ones winning:
//!
//! 1. built-in defaults
//! 2. a TOML file (`paypal.toml` unless another path is given)
//! 3. `PAYPAL__SECTION__KEY` environment variables
//! 4. `PAYPAL_CLIENT_ID`, `PAYPAL_CLIENT_SECRET` and `PAYPAL_BASE_URL`
//!
//! ```toml
//! [api]
//! client_id = "AY..."
//! client_secret = "EL..."
//! base_url = "https://api-m.sandbox.paypal.com"
//!
//! [logging]
//! level = "debug"
//! ```

use std::path::PathBuf;

pub mod loader;
pub mod provider;
pub mod secret;

pub use loader::{ConfigLoader, DEFAULT_CONFIG_FILE, load_config};
pub use provider::{
    ApiConfig, LIVE_BASE_URL, LoggingConfig, ProviderConfig, SANDBOX_BASE_URL, SandboxConfig,
    StateConfig,
};
pub use secret::Secret;

/// Error types for configuration operations
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl ConfigError {
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;
