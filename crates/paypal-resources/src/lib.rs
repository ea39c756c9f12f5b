//! # paypal-resources
//!
//! Reconciliation of declared PayPal resources against the live API.
//!
//! - [`schemas`]: the schema of each resource kind
//! - [`translate`]: attribute trees to and from remote objects
//! - [`reconciler`]: per-kind create, read, update and delete
//! - [`registry`]: kind name lookup, built once at startup
//! - [`host`]: the Absent/Present lifecycle and persisted state
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use paypal_resources::prelude::*;
//!
//! let registry = ResourceRegistry::with_defaults(client);
//! let adapter = HostAdapter::new(registry, Arc::new(MemoryStateStore::new()));
//! let observed = adapter.create("paypal_notification_webhook", "orders", &desired).await?;
//! ```

pub mod error;
pub mod host;
pub mod reconciler;
pub mod registry;
pub mod schemas;
pub mod translate;

pub use error::{ErrorCategory, ReconcileError, Result};
pub use host::{
    DynStateStore, HandleState, HostAdapter, MemoryStateStore, ResourceHandle, StateStore,
    StoredState, UpdateOutcome,
};
pub use reconciler::{
    DeleteOutcome, ObservedResource, PlanReconciler, ProductReconciler, REMOVED_MARKER,
    ResourceReconciler, WebhookReconciler,
};
pub use registry::{DynReconciler, RegistryEntry, ResourceRegistry};
pub use schemas::schema_for;
pub use translate::{RemoteObject, TranslateError, Translator, from_remote, to_remote};

pub mod prelude {
    pub use crate::error::{ReconcileError, Result};
    pub use crate::host::{HostAdapter, MemoryStateStore, ResourceHandle, StateStore, StoredState};
    pub use crate::reconciler::{DeleteOutcome, ObservedResource, ResourceReconciler};
    pub use crate::registry::ResourceRegistry;
    pub use paypal_core::{AttributeMap, AttributeValue, ResourceKind};
}
