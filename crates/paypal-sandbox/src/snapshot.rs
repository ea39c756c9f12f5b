//! Persisting sandbox contents between process runs.

use std::fs;
use std::io;
use std::path::Path;

use paypal_remote::{Product, SubscriptionPlan, Webhook};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while saving or loading a snapshot file.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("invalid snapshot {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Everything the sandbox holds, sorted by ID for stable output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SandboxSnapshot {
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub plans: Vec<SubscriptionPlan>,
    #[serde(default)]
    pub webhooks: Vec<Webhook>,
}

impl SandboxSnapshot {
    /// Reads a snapshot; a missing file yields an empty snapshot.
    pub fn load(path: &Path) -> Result<Self, SnapshotError> {
        let display = path.display().to_string();
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => return Err(SnapshotError::Io { path: display, source }),
        };
        serde_json::from_str(&raw).map_err(|source| SnapshotError::Json { path: display, source })
    }

    pub fn save(&self, path: &Path) -> Result<(), SnapshotError> {
        let display = path.display().to_string();
        let json = serde_json::to_string_pretty(self).map_err(|source| SnapshotError::Json {
            path: display.clone(),
            source,
        })?;
        fs::write(path, json).map_err(|source| SnapshotError::Io { path: display, source })
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty() && self.plans.is_empty() && self.webhooks.is_empty()
    }
}
