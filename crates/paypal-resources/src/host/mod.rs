//! Host adapter
//!
//! The boundary a host runtime drives. A [`ResourceHandle`] tracks one
//! resource through its Absent/Present lifecycle and refuses operations
//! from the wrong state. [`HostAdapter`] pairs the registry with a
//! [`StateStore`] so that resources can be addressed by name across calls.

mod store;

pub use store::{DynStateStore, MemoryStateStore, StateStore, StoredState};

use paypal_core::{AttributeChange, AttributeMap, ResourceKind};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{ReconcileError, Result};
use crate::reconciler::{DeleteOutcome, ObservedResource, ResourceReconciler};
use crate::registry::ResourceRegistry;

/// Lifecycle state of a managed resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandleState {
    /// No remote ID is known.
    Absent,
    /// A remote ID is known and its state was last seen as given.
    Present(ObservedResource),
}

impl HandleState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Absent => "absent",
            Self::Present(_) => "present",
        }
    }
}

/// Result of an update request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateOutcome {
    /// Differences that were pushed. Empty when nothing was sent.
    pub changes: Vec<AttributeChange>,
    pub observed: ObservedResource,
}

impl UpdateOutcome {
    /// True when the desired state already matched and no remote call was made.
    pub fn is_noop(&self) -> bool {
        self.changes.is_empty()
    }
}

/// One resource and the state machine that guards its operations.
///
/// Every transition leaves the state untouched when it fails.
#[derive(Debug, Clone)]
pub struct ResourceHandle {
    kind: ResourceKind,
    state: HandleState,
}

impl ResourceHandle {
    pub fn absent(kind: ResourceKind) -> Self {
        Self {
            kind,
            state: HandleState::Absent,
        }
    }

    pub fn present(kind: ResourceKind, observed: ObservedResource) -> Self {
        Self {
            kind,
            state: HandleState::Present(observed),
        }
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn state(&self) -> &HandleState {
        &self.state
    }

    pub fn id(&self) -> Option<&str> {
        self.observed().map(|o| o.id.as_str())
    }

    pub fn observed(&self) -> Option<&ObservedResource> {
        match &self.state {
            HandleState::Present(observed) => Some(observed),
            HandleState::Absent => None,
        }
    }

    fn require_absent(&self, operation: &'static str) -> Result<()> {
        match self.state {
            HandleState::Absent => Ok(()),
            HandleState::Present(_) => Err(ReconcileError::invalid_state(
                self.kind,
                operation,
                self.state.name(),
            )),
        }
    }

    fn require_present(&self, operation: &'static str) -> Result<&ObservedResource> {
        self.observed()
            .ok_or_else(|| ReconcileError::invalid_state(self.kind, operation, self.state.name()))
    }

    pub async fn create(
        &mut self,
        reconciler: &dyn ResourceReconciler,
        desired: &AttributeMap,
    ) -> Result<ObservedResource> {
        self.require_absent("create")?;
        let observed = reconciler.create(desired).await?;
        self.state = HandleState::Present(observed.clone());
        Ok(observed)
    }

    /// Enters Present from an ID obtained outside this handle.
    pub async fn import(
        &mut self,
        reconciler: &dyn ResourceReconciler,
        id: &str,
    ) -> Result<ObservedResource> {
        self.require_absent("import")?;
        let observed = reconciler.import(id).await?;
        self.state = HandleState::Present(observed.clone());
        Ok(observed)
    }

    /// Replaces the observed state with a fresh read. A vanished resource
    /// is an error and the handle stays Present.
    pub async fn read(&mut self, reconciler: &dyn ResourceReconciler) -> Result<ObservedResource> {
        let id = self.require_present("read")?.id.clone();
        let observed = reconciler.read(&id).await?;
        self.state = HandleState::Present(observed.clone());
        Ok(observed)
    }

    /// Pushes `desired` when it differs meaningfully from the live remote
    /// state. The comparison uses a fresh read, so edits made outside this
    /// handle are overwritten.
    pub async fn update(
        &mut self,
        reconciler: &dyn ResourceReconciler,
        desired: &AttributeMap,
    ) -> Result<UpdateOutcome> {
        let id = self.require_present("update")?.id.clone();
        reconciler.validate(desired)?;

        let current = reconciler.read(&id).await?;
        let changes = reconciler.schema().diff(&current.attributes, desired);
        if changes.is_empty() {
            debug!(kind = %self.kind, id = %id, "No changes; skipping update");
            self.state = HandleState::Present(current.clone());
            return Ok(UpdateOutcome {
                changes,
                observed: current,
            });
        }

        let observed = reconciler.update(&id, desired).await?;
        self.state = HandleState::Present(observed.clone());
        Ok(UpdateOutcome { changes, observed })
    }

    /// Removes the resource and releases the local reference, whether or
    /// not the remote object survives.
    pub async fn delete(&mut self, reconciler: &dyn ResourceReconciler) -> Result<DeleteOutcome> {
        let id = self.require_present("delete")?.id.clone();
        let outcome = reconciler.delete(&id).await?;
        self.state = HandleState::Absent;
        Ok(outcome)
    }
}

/// Drives the registry on behalf of a host, persisting IDs in a [`StateStore`].
pub struct HostAdapter {
    registry: ResourceRegistry,
    store: DynStateStore,
}

impl HostAdapter {
    pub fn new(registry: ResourceRegistry, store: DynStateStore) -> Self {
        Self { registry, store }
    }

    pub fn registry(&self) -> &ResourceRegistry {
        &self.registry
    }

    pub fn store(&self) -> &DynStateStore {
        &self.store
    }

    /// Rebuilds the handle for `address` from the store.
    async fn handle(&self, kind: ResourceKind, address: &str) -> Result<ResourceHandle> {
        match self.store.load(address).await? {
            None => Ok(ResourceHandle::absent(kind)),
            Some(stored) if stored.kind == kind => Ok(ResourceHandle::present(kind, stored.observed())),
            Some(stored) => Err(ReconcileError::store(format!(
                "address {address} holds a {}, not a {kind}",
                stored.kind
            ))),
        }
    }

    async fn persist(&self, address: &str, kind: ResourceKind, observed: &ObservedResource) -> Result<()> {
        self.store
            .save(&StoredState::new(address, kind, observed.clone()))
            .await
    }

    pub async fn create(
        &self,
        kind_name: &str,
        address: &str,
        desired: &AttributeMap,
    ) -> Result<ObservedResource> {
        let (_, reconciler) = self.registry.resolve(kind_name)?;
        let kind = reconciler.kind();
        let mut handle = self.handle(kind, address).await?;

        let observed = handle.create(reconciler.as_ref(), desired).await?;
        self.persist(address, kind, &observed).await?;
        info!(kind = %kind, address = %address, id = %observed.id, "Resource created");
        Ok(observed)
    }

    pub async fn import(&self, kind_name: &str, address: &str, id: &str) -> Result<ObservedResource> {
        let (_, reconciler) = self.registry.resolve(kind_name)?;
        let kind = reconciler.kind();
        let mut handle = self.handle(kind, address).await?;

        let observed = handle.import(reconciler.as_ref(), id).await?;
        self.persist(address, kind, &observed).await?;
        info!(kind = %kind, address = %address, id = %observed.id, "Resource imported");
        Ok(observed)
    }

    pub async fn read(&self, kind_name: &str, address: &str) -> Result<ObservedResource> {
        let (_, reconciler) = self.registry.resolve(kind_name)?;
        let kind = reconciler.kind();
        let mut handle = self.handle(kind, address).await?;

        let observed = handle.read(reconciler.as_ref()).await?;
        self.persist(address, kind, &observed).await?;
        Ok(observed)
    }

    pub async fn update(
        &self,
        kind_name: &str,
        address: &str,
        desired: &AttributeMap,
    ) -> Result<UpdateOutcome> {
        let (_, reconciler) = self.registry.resolve(kind_name)?;
        let kind = reconciler.kind();
        let mut handle = self.handle(kind, address).await?;

        let outcome = handle.update(reconciler.as_ref(), desired).await?;
        self.persist(address, kind, &outcome.observed).await?;
        if !outcome.is_noop() {
            info!(
                kind = %kind,
                address = %address,
                changes = outcome.changes.len(),
                "Resource updated"
            );
        }
        Ok(outcome)
    }

    pub async fn delete(&self, kind_name: &str, address: &str) -> Result<DeleteOutcome> {
        let (_, reconciler) = self.registry.resolve(kind_name)?;
        let kind = reconciler.kind();
        let mut handle = self.handle(kind, address).await?;

        let outcome = handle.delete(reconciler.as_ref()).await?;
        self.store.remove(address).await?;
        info!(kind = %kind, address = %address, outcome = ?outcome, "Resource released");
        Ok(outcome)
    }

    pub async fn list(&self) -> Result<Vec<StoredState>> {
        self.store.list().await
    }
}
