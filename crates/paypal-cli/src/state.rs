//! JSON file backed state store.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use paypal_resources::{ReconcileError, Result, StateStore, StoredState};
use tokio::sync::RwLock;
use tracing::debug;

/// Keeps every record in memory and rewrites the whole file on each change.
pub struct FileStateStore {
    path: PathBuf,
    records: RwLock<BTreeMap<String, StoredState>>,
}

impl FileStateStore {
    /// Opens `path`, starting empty when the file does not exist yet.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let records = match tokio::fs::read_to_string(&path).await {
            Ok(content) => {
                let states: Vec<StoredState> = serde_json::from_str(&content).map_err(|e| {
                    ReconcileError::store(format!("{} is not a state file: {e}", path.display()))
                })?;
                states
                    .into_iter()
                    .map(|state| (state.address.clone(), state))
                    .collect()
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                return Err(ReconcileError::store(format!(
                    "cannot read {}: {e}",
                    path.display()
                )));
            }
        };
        debug!(path = %path.display(), records = records.len(), "Opened state file");
        Ok(Self {
            path,
            records: RwLock::new(records),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn flush(&self, records: &BTreeMap<String, StoredState>) -> Result<()> {
        let states: Vec<&StoredState> = records.values().collect();
        let content = serde_json::to_string_pretty(&states)
            .map_err(|e| ReconcileError::store(format!("cannot encode state: {e}")))?;
        tokio::fs::write(&self.path, content)
            .await
            .map_err(|e| ReconcileError::store(format!("cannot write {}: {e}", self.path.display())))
    }
}

#[async_trait]
impl StateStore for FileStateStore {
    async fn load(&self, address: &str) -> Result<Option<StoredState>> {
        Ok(self.records.read().await.get(address).cloned())
    }

    async fn save(&self, state: &StoredState) -> Result<()> {
        let mut records = self.records.write().await;
        records.insert(state.address.clone(), state.clone());
        self.flush(&records).await
    }

    async fn remove(&self, address: &str) -> Result<()> {
        let mut records = self.records.write().await;
        if records.remove(address).is_some() {
            self.flush(&records).await?;
        }
        Ok(())
    }

    async fn list(&self) -> Result<Vec<StoredState>> {
        Ok(self.records.read().await.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use paypal_core::{ResourceKind, attribute_map};

    fn record(address: &str) -> StoredState {
        StoredState {
            address: address.into(),
            kind: ResourceKind::SubscriptionPlan,
            id: "P-1".into(),
            attributes: attribute_map([("name", "Basic")]),
        }
    }

    #[tokio::test]
    async fn test_records_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");

        let store = FileStateStore::open(&path).await.unwrap();
        store.save(&record("basic")).await.unwrap();
        store.save(&record("pro")).await.unwrap();
        store.remove("pro").await.unwrap();

        let reopened = FileStateStore::open(&path).await.unwrap();
        assert_eq!(reopened.list().await.unwrap(), vec![record("basic")]);
    }

    #[tokio::test]
    async fn test_corrupt_file_is_store_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "not json").unwrap();

        let err = FileStateStore::open(&path).await.err().unwrap();
        assert!(matches!(err, ReconcileError::Store { .. }));
    }
}
