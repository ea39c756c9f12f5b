//! Resource registry
//!
//! Maps resource-kind names to their schema and reconciler. Built once at
//! process start and handed to the host adapter; nothing registers later.

use std::sync::Arc;

use indexmap::IndexMap;
use paypal_core::{ResourceKind, ResourceSchema};
use paypal_remote::DynRemoteClient;
use tracing::{debug, info};

use crate::error::{ReconcileError, Result};
use crate::reconciler::{PlanReconciler, ProductReconciler, ResourceReconciler, WebhookReconciler};
use crate::schemas::schema_for;

/// Shared reconciler handle.
pub type DynReconciler = Arc<dyn ResourceReconciler>;

/// A registered kind: its schema and the reconciler that drives it.
#[derive(Clone)]
pub struct RegistryEntry {
    pub schema: &'static ResourceSchema,
    pub reconciler: DynReconciler,
}

/// Resolves resource kinds to their schema and reconciler.
#[derive(Clone, Default)]
pub struct ResourceRegistry {
    entries: IndexMap<ResourceKind, RegistryEntry>,
}

impl ResourceRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the three PayPal kinds, all talking to `client`.
    pub fn with_defaults(client: DynRemoteClient) -> Self {
        let mut registry = Self::new();
        registry.register(
            ResourceKind::CatalogProduct,
            schema_for(ResourceKind::CatalogProduct),
            Arc::new(ProductReconciler::new(client.clone())),
        );
        registry.register(
            ResourceKind::SubscriptionPlan,
            schema_for(ResourceKind::SubscriptionPlan),
            Arc::new(PlanReconciler::new(client.clone())),
        );
        registry.register(
            ResourceKind::NotificationWebhook,
            schema_for(ResourceKind::NotificationWebhook),
            Arc::new(WebhookReconciler::new(client)),
        );
        info!(kinds = registry.len(), "Resource registry initialized");
        registry
    }

    /// Register a kind. A second registration of the same kind replaces the first.
    pub fn register(
        &mut self,
        kind: ResourceKind,
        schema: &'static ResourceSchema,
        reconciler: DynReconciler,
    ) {
        debug!(kind = %kind, "Registering resource kind");
        self.entries.insert(kind, RegistryEntry { schema, reconciler });
    }

    /// Look up a kind by its host-facing name.
    pub fn resolve(&self, name: &str) -> Result<(&'static ResourceSchema, &DynReconciler)> {
        let kind: ResourceKind = name
            .parse()
            .map_err(|_| ReconcileError::UnknownKind(name.to_string()))?;
        self.resolve_kind(kind)
    }

    /// Look up a kind that is already parsed.
    pub fn resolve_kind(&self, kind: ResourceKind) -> Result<(&'static ResourceSchema, &DynReconciler)> {
        self.entries
            .get(&kind)
            .map(|entry| (entry.schema, &entry.reconciler))
            .ok_or_else(|| ReconcileError::UnknownKind(kind.to_string()))
    }

    /// Registered kinds, in registration order.
    pub fn kinds(&self) -> impl Iterator<Item = ResourceKind> + '_ {
        self.entries.keys().copied()
    }

    pub fn contains(&self, kind: ResourceKind) -> bool {
        self.entries.contains_key(&kind)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for ResourceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceRegistry")
            .field("kinds", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}
