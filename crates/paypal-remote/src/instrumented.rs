//! InstrumentedClient - a client wrapper that traces and counts remote calls.
//!
//! The wrapper delegates every call to an inner [`RemoteApiClient`] and
//! records, per operation, how many calls were made, how many failed and how
//! long they took in total.
//!
//! # Example
//!
//! ```ignore
//! use paypal_remote::InstrumentedClient;
//!
//! let client = InstrumentedClient::new(sandbox);
//! let stats = client.stats();
//! client.get_product("PROD-1").await?;
//! assert_eq!(stats.calls(RemoteOperation::GetProduct), 1);
//! ```

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;
use json_patch::Patch;
use tracing::{debug, warn};

use crate::error::RemoteError;
use crate::operation::RemoteOperation;
use crate::traits::RemoteApiClient;
use crate::types::{
    PricingSchemeUpdate, Product, SubscriptionPlan, SubscriptionPlanPatch, Webhook,
};

/// Counters for one operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OperationStats {
    pub calls: u64,
    pub failures: u64,
    pub total_elapsed: Duration,
}

/// Per-operation call statistics, shareable across threads.
#[derive(Debug, Default)]
pub struct CallStats {
    operations: DashMap<RemoteOperation, OperationStats>,
}

impl CallStats {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, operation: RemoteOperation, elapsed: Duration, failed: bool) {
        let mut entry = self.operations.entry(operation).or_default();
        entry.calls += 1;
        entry.total_elapsed += elapsed;
        if failed {
            entry.failures += 1;
        }
    }

    /// Stats for one operation; zeroed if it was never called.
    pub fn get(&self, operation: RemoteOperation) -> OperationStats {
        self.operations
            .get(&operation)
            .map(|entry| *entry)
            .unwrap_or_default()
    }

    pub fn calls(&self, operation: RemoteOperation) -> u64 {
        self.get(operation).calls
    }

    pub fn failures(&self, operation: RemoteOperation) -> u64 {
        self.get(operation).failures
    }

    pub fn total_calls(&self) -> u64 {
        self.operations.iter().map(|entry| entry.calls).sum()
    }

    /// All recorded operations, ordered by operation.
    pub fn snapshot(&self) -> Vec<(RemoteOperation, OperationStats)> {
        let mut all: Vec<_> = self
            .operations
            .iter()
            .map(|entry| (*entry.key(), *entry.value()))
            .collect();
        all.sort_by_key(|(op, _)| *op);
        all
    }
}

/// A client wrapper that emits a tracing event for every remote call.
///
/// Failures are logged at `warn`, successes at `debug`. Errors are passed
/// through unchanged.
pub struct InstrumentedClient<C: RemoteApiClient> {
    inner: C,
    stats: Arc<CallStats>,
}

impl<C: RemoteApiClient> InstrumentedClient<C> {
    pub fn new(inner: C) -> Self {
        Self {
            inner,
            stats: Arc::new(CallStats::new()),
        }
    }

    /// Get a reference to the inner client.
    pub fn inner(&self) -> &C {
        &self.inner
    }

    /// Shared handle to the call statistics.
    pub fn stats(&self) -> Arc<CallStats> {
        Arc::clone(&self.stats)
    }

    async fn observe<T, F>(&self, operation: RemoteOperation, id: &str, call: F) -> Result<T, RemoteError>
    where
        F: Future<Output = Result<T, RemoteError>> + Send,
    {
        let started = Instant::now();
        let result = call.await;
        let elapsed = started.elapsed();
        self.stats.record(operation, elapsed, result.is_err());

        match &result {
            Ok(_) => debug!(
                operation = %operation,
                id = %id,
                elapsed_ms = elapsed.as_millis() as u64,
                "Remote call succeeded"
            ),
            Err(err) => warn!(
                operation = %operation,
                id = %id,
                category = %err.category(),
                error = %err,
                "Remote call failed"
            ),
        }
        result
    }
}

#[async_trait]
impl<C: RemoteApiClient> RemoteApiClient for InstrumentedClient<C> {
    async fn create_product(&self, product: &Product) -> Result<Product, RemoteError> {
        self.observe(
            RemoteOperation::CreateProduct,
            "",
            self.inner.create_product(product),
        )
        .await
    }

    async fn get_product(&self, id: &str) -> Result<Product, RemoteError> {
        self.observe(RemoteOperation::GetProduct, id, self.inner.get_product(id))
            .await
    }

    async fn update_product(&self, product: &Product) -> Result<(), RemoteError> {
        self.observe(
            RemoteOperation::UpdateProduct,
            &product.id,
            self.inner.update_product(product),
        )
        .await
    }

    async fn create_subscription_plan(
        &self,
        plan: &SubscriptionPlan,
    ) -> Result<SubscriptionPlan, RemoteError> {
        self.observe(
            RemoteOperation::CreateSubscriptionPlan,
            "",
            self.inner.create_subscription_plan(plan),
        )
        .await
    }

    async fn get_subscription_plan(&self, id: &str) -> Result<SubscriptionPlan, RemoteError> {
        self.observe(
            RemoteOperation::GetSubscriptionPlan,
            id,
            self.inner.get_subscription_plan(id),
        )
        .await
    }

    async fn update_subscription_plan(
        &self,
        id: &str,
        patch: &SubscriptionPlanPatch,
    ) -> Result<(), RemoteError> {
        self.observe(
            RemoteOperation::UpdateSubscriptionPlan,
            id,
            self.inner.update_subscription_plan(id, patch),
        )
        .await
    }

    async fn update_subscription_plan_pricing(
        &self,
        id: &str,
        updates: &[PricingSchemeUpdate],
    ) -> Result<(), RemoteError> {
        self.observe(
            RemoteOperation::UpdateSubscriptionPlanPricing,
            id,
            self.inner.update_subscription_plan_pricing(id, updates),
        )
        .await
    }

    async fn deactivate_subscription_plan(&self, id: &str) -> Result<(), RemoteError> {
        self.observe(
            RemoteOperation::DeactivateSubscriptionPlan,
            id,
            self.inner.deactivate_subscription_plan(id),
        )
        .await
    }

    async fn create_webhook(&self, webhook: &Webhook) -> Result<Webhook, RemoteError> {
        self.observe(
            RemoteOperation::CreateWebhook,
            "",
            self.inner.create_webhook(webhook),
        )
        .await
    }

    async fn get_webhook(&self, id: &str) -> Result<Webhook, RemoteError> {
        self.observe(RemoteOperation::GetWebhook, id, self.inner.get_webhook(id))
            .await
    }

    async fn update_webhook(&self, id: &str, patch: &Patch) -> Result<Webhook, RemoteError> {
        self.observe(
            RemoteOperation::UpdateWebhook,
            id,
            self.inner.update_webhook(id, patch),
        )
        .await
    }

    async fn delete_webhook(&self, id: &str) -> Result<(), RemoteError> {
        self.observe(
            RemoteOperation::DeleteWebhook,
            id,
            self.inner.delete_webhook(id),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Knows exactly one webhook and nothing else.
    struct OneWebhook;

    #[async_trait]
    impl RemoteApiClient for OneWebhook {
        async fn create_product(&self, _: &Product) -> Result<Product, RemoteError> {
            Err(RemoteError::internal("unsupported"))
        }
        async fn get_product(&self, id: &str) -> Result<Product, RemoteError> {
            Err(RemoteError::not_found("product", id))
        }
        async fn update_product(&self, product: &Product) -> Result<(), RemoteError> {
            Err(RemoteError::not_found("product", &product.id))
        }
        async fn create_subscription_plan(
            &self,
            _: &SubscriptionPlan,
        ) -> Result<SubscriptionPlan, RemoteError> {
            Err(RemoteError::internal("unsupported"))
        }
        async fn get_subscription_plan(&self, id: &str) -> Result<SubscriptionPlan, RemoteError> {
            Err(RemoteError::not_found("plan", id))
        }
        async fn update_subscription_plan(
            &self,
            id: &str,
            _: &SubscriptionPlanPatch,
        ) -> Result<(), RemoteError> {
            Err(RemoteError::not_found("plan", id))
        }
        async fn update_subscription_plan_pricing(
            &self,
            id: &str,
            _: &[PricingSchemeUpdate],
        ) -> Result<(), RemoteError> {
            Err(RemoteError::not_found("plan", id))
        }
        async fn deactivate_subscription_plan(&self, id: &str) -> Result<(), RemoteError> {
            Err(RemoteError::not_found("plan", id))
        }
        async fn create_webhook(&self, _: &Webhook) -> Result<Webhook, RemoteError> {
            Err(RemoteError::internal("unsupported"))
        }
        async fn get_webhook(&self, id: &str) -> Result<Webhook, RemoteError> {
            if id == "WH-1" {
                Ok(Webhook {
                    id: id.to_string(),
                    url: "https://example.com/hook".into(),
                    event_types: vec![],
                })
            } else {
                Err(RemoteError::not_found("webhook", id))
            }
        }
        async fn update_webhook(&self, id: &str, _: &Patch) -> Result<Webhook, RemoteError> {
            self.get_webhook(id).await
        }
        async fn delete_webhook(&self, _: &str) -> Result<(), RemoteError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_counts_calls_and_failures() {
        let client = InstrumentedClient::new(OneWebhook);
        let stats = client.stats();

        assert!(client.get_webhook("WH-1").await.is_ok());
        let err = client.get_webhook("WH-2").await.unwrap_err();
        assert!(err.is_not_found());
        client.delete_webhook("WH-1").await.unwrap();

        assert_eq!(stats.calls(RemoteOperation::GetWebhook), 2);
        assert_eq!(stats.failures(RemoteOperation::GetWebhook), 1);
        assert_eq!(stats.calls(RemoteOperation::DeleteWebhook), 1);
        assert_eq!(stats.calls(RemoteOperation::CreateProduct), 0);
        assert_eq!(stats.total_calls(), 3);
    }

    #[tokio::test]
    async fn test_snapshot_is_ordered() {
        let client = InstrumentedClient::new(OneWebhook);
        let _ = client.delete_webhook("WH-1").await;
        let _ = client.get_product("PROD-1").await;

        let ops: Vec<_> = client.stats().snapshot().into_iter().map(|(op, _)| op).collect();
        assert_eq!(
            ops,
            vec![RemoteOperation::GetProduct, RemoteOperation::DeleteWebhook]
        );
    }
}
