//! Persistence of resource IDs and last observed state between operations.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use paypal_core::{AttributeMap, ResourceKind};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::reconciler::ObservedResource;

/// What the host remembers about one managed resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredState {
    /// Host-chosen name for the resource, unique across kinds.
    pub address: String,
    pub kind: ResourceKind,
    /// Remote ID assigned by PayPal.
    pub id: String,
    pub attributes: AttributeMap,
}

impl StoredState {
    pub fn new(address: &str, kind: ResourceKind, observed: ObservedResource) -> Self {
        Self {
            address: address.to_string(),
            kind,
            id: observed.id,
            attributes: observed.attributes,
        }
    }

    pub fn observed(&self) -> ObservedResource {
        ObservedResource {
            id: self.id.clone(),
            attributes: self.attributes.clone(),
        }
    }
}

/// Storage for [`StoredState`] records, keyed by address.
#[async_trait]
pub trait StateStore: Send + Sync {
    async fn load(&self, address: &str) -> Result<Option<StoredState>>;

    /// Insert or replace the record at `state.address`.
    async fn save(&self, state: &StoredState) -> Result<()>;

    /// Forget an address. Removing an unknown address is not an error.
    async fn remove(&self, address: &str) -> Result<()>;

    /// All records, ordered by address.
    async fn list(&self) -> Result<Vec<StoredState>>;
}

pub type DynStateStore = Arc<dyn StateStore>;

/// Process-local state store.
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    records: DashMap<String, StoredState>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl StateStore for MemoryStateStore {
    async fn load(&self, address: &str) -> Result<Option<StoredState>> {
        Ok(self.records.get(address).map(|r| r.value().clone()))
    }

    async fn save(&self, state: &StoredState) -> Result<()> {
        self.records.insert(state.address.clone(), state.clone());
        Ok(())
    }

    async fn remove(&self, address: &str) -> Result<()> {
        self.records.remove(address);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<StoredState>> {
        let mut all: Vec<StoredState> = self.records.iter().map(|r| r.value().clone()).collect();
        all.sort_by(|a, b| a.address.cmp(&b.address));
        Ok(all)
    }
}
