//! Per-kind CRUD orchestration against the remote API.
//!
//! A reconciler validates desired state, translates it, issues the remote
//! calls in order and translates the answer back. It never retries and never
//! compensates: each error goes straight back to the caller.

mod plan;
mod product;
mod webhook;

use async_trait::async_trait;
use paypal_core::{AttributeMap, ResourceKind, ResourceSchema};
use serde::Serialize;

use crate::error::Result;

pub use plan::PlanReconciler;
pub use product::{ProductReconciler, REMOVED_MARKER};
pub use webhook::WebhookReconciler;

/// A remote resource as last read: its ID and translated attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObservedResource {
    pub id: String,
    pub attributes: AttributeMap,
}

/// What a successful delete did remotely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeleteOutcome {
    /// The remote resource is gone.
    Deleted,
    /// The remote resource still exists, renamed with [`REMOVED_MARKER`].
    SoftDeleted,
    /// The remote resource still exists in an inactive status.
    Deactivated,
}

impl DeleteOutcome {
    /// True if the remote resource still exists after the delete.
    pub fn remote_persists(&self) -> bool {
        !matches!(self, Self::Deleted)
    }
}

/// CRUD operations for one resource kind.
#[async_trait]
pub trait ResourceReconciler: Send + Sync {
    fn kind(&self) -> ResourceKind;

    fn schema(&self) -> &'static ResourceSchema;

    /// Checks desired state without touching the remote API.
    fn validate(&self, desired: &AttributeMap) -> Result<()> {
        self.schema()
            .validate(desired)
            .into_result(self.kind())
            .map_err(Into::into)
    }

    /// Creates the remote resource and returns its observed state.
    async fn create(&self, desired: &AttributeMap) -> Result<ObservedResource>;

    /// Fetches the remote resource. A missing resource is `NotFound`.
    async fn read(&self, id: &str) -> Result<ObservedResource>;

    /// Pushes desired state to an existing resource, then re-reads it.
    async fn update(&self, id: &str, desired: &AttributeMap) -> Result<ObservedResource>;

    /// Removes the resource, or the closest thing the remote API offers.
    async fn delete(&self, id: &str) -> Result<DeleteOutcome>;

    /// Adopts a resource created elsewhere, known only by its ID.
    async fn import(&self, id: &str) -> Result<ObservedResource> {
        self.read(id).await
    }
}
