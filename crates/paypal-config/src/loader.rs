//! Layered loading: defaults, then an optional TOML file, then environment.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat};
use tracing::debug;

use crate::provider::ProviderConfig;
use crate::{ConfigError, Result};

/// File looked for in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "paypal.toml";

/// Variables that set a single API field directly.
const CREDENTIAL_VARS: [(&str, &str); 3] = [
    ("PAYPAL_CLIENT_ID", "api.client_id"),
    ("PAYPAL_CLIENT_SECRET", "api.client_secret"),
    ("PAYPAL_BASE_URL", "api.base_url"),
];

/// Builds a [`ProviderConfig`].
///
/// Environment keys of the form `PAYPAL__SECTION__KEY` override file values,
/// and `PAYPAL_CLIENT_ID`, `PAYPAL_CLIENT_SECRET` and `PAYPAL_BASE_URL`
/// override everything.
#[derive(Debug, Default)]
pub struct ConfigLoader {
    path: Option<PathBuf>,
    env: Option<HashMap<String, String>>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read this file. A missing file is an error, unlike the default file.
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Use these variables instead of the process environment.
    pub fn with_env(mut self, vars: HashMap<String, String>) -> Self {
        self.env = Some(vars);
        self
    }

    fn var(&self, name: &str) -> Option<String> {
        match &self.env {
            Some(vars) => vars.get(name).cloned(),
            None => std::env::var(name).ok(),
        }
    }

    fn read_file(path: &Path) -> Result<String> {
        std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load(&self) -> Result<ProviderConfig> {
        let mut builder = Config::builder();

        let file = match &self.path {
            Some(path) => Some((path.clone(), Self::read_file(path)?)),
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Some((default_path.clone(), Self::read_file(&default_path)?))
                } else {
                    None
                }
            }
        };
        if let Some((path, contents)) = file {
            debug!(path = %path.display(), "Loading configuration file");
            builder = builder.add_source(File::from_str(&contents, FileFormat::Toml));
        }

        // Nested overrides, e.g. PAYPAL__LOGGING__LEVEL=debug
        let mut environment = Environment::with_prefix("PAYPAL")
            .try_parsing(true)
            .separator("__");
        if let Some(vars) = &self.env {
            environment = environment.source(Some(vars.clone().into_iter().collect()));
        }
        builder = builder.add_source(environment);

        for (var, key) in CREDENTIAL_VARS {
            builder = builder
                .set_override_option(key, self.var(var))
                .map_err(|e| ConfigError::parse(format!("{var}: {e}")))?;
        }

        let merged: ProviderConfig = builder
            .build()
            .map_err(|e| ConfigError::parse(format!("config build error: {e}")))?
            .try_deserialize()
            .map_err(|e| ConfigError::parse(format!("config deserialize error: {e}")))?;
        merged.validate()?;
        Ok(merged)
    }
}

/// Load from `path`, or from [`DEFAULT_CONFIG_FILE`] if present.
pub fn load_config(path: Option<&Path>) -> Result<ProviderConfig> {
    let loader = match path {
        Some(path) => ConfigLoader::new().with_file(path),
        None => ConfigLoader::new(),
    };
    loader.load()
}
