use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use paypal_config::ProviderConfig;
use paypal_remote::InstrumentedClient;
use paypal_resources::{HostAdapter, ResourceRegistry};
use paypal_sandbox::{InMemoryPayPal, SandboxSnapshot};
use tracing::debug;

use crate::state::FileStateStore;

/// Everything one command needs: the adapter and the sandbox behind it.
pub struct Runtime {
    pub adapter: HostAdapter,
    client: Arc<InstrumentedClient<InMemoryPayPal>>,
    snapshot_path: PathBuf,
}

impl Runtime {
    pub async fn open(config: &ProviderConfig) -> Result<Self> {
        let snapshot_path = config.sandbox.snapshot.clone();
        let snapshot = SandboxSnapshot::load(&snapshot_path)
            .with_context(|| format!("Failed to load sandbox from {}", snapshot_path.display()))?;
        let client = Arc::new(InstrumentedClient::new(InMemoryPayPal::from_snapshot(
            snapshot,
        )));

        let store = FileStateStore::open(&config.state.path)
            .await
            .context("Failed to open state file")?;
        let registry = ResourceRegistry::with_defaults(client.clone());

        Ok(Self {
            adapter: HostAdapter::new(registry, Arc::new(store)),
            client,
            snapshot_path,
        })
    }

    /// Writes the sandbox back to disk.
    pub fn close(self) -> Result<()> {
        for (operation, stats) in self.client.stats().snapshot() {
            debug!(
                operation = %operation,
                calls = stats.calls,
                failures = stats.failures,
                elapsed_ms = stats.total_elapsed.as_millis() as u64,
                "Remote call summary"
            );
        }
        self.client
            .inner()
            .snapshot()
            .save(&self.snapshot_path)
            .with_context(|| format!("Failed to save sandbox to {}", self.snapshot_path.display()))
    }
}
