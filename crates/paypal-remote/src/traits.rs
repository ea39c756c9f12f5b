//! The remote API capability consumed by the reconcilers.

use async_trait::async_trait;
use json_patch::Patch;

use crate::error::RemoteError;
use crate::types::{
    PricingSchemeUpdate, Product, SubscriptionPlan, SubscriptionPlanPatch, Webhook,
};

/// The payment platform's resource API.
///
/// Implementations own transport, authentication, retries and pagination;
/// callers see only the object shapes and a [`RemoteError`]. Implementations
/// must be thread-safe (`Send + Sync`).
///
/// # Example
///
/// ```ignore
/// use paypal_remote::{RemoteApiClient, RemoteError, Product};
///
/// async fn product_name(client: &dyn RemoteApiClient, id: &str) -> Result<String, RemoteError> {
///     Ok(client.get_product(id).await?.name)
/// }
/// ```
#[async_trait]
pub trait RemoteApiClient: Send + Sync {
    // ==================== Catalog products ====================

    /// Creates a product and returns it with its assigned ID.
    async fn create_product(&self, product: &Product) -> Result<Product, RemoteError>;

    /// Fetches a product.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::NotFound` if no product has this ID.
    async fn get_product(&self, id: &str) -> Result<Product, RemoteError>;

    /// Replaces the mutable fields of the product identified by `product.id`.
    ///
    /// Products have no delete call.
    async fn update_product(&self, product: &Product) -> Result<(), RemoteError>;

    // ==================== Subscription plans ====================

    async fn create_subscription_plan(
        &self,
        plan: &SubscriptionPlan,
    ) -> Result<SubscriptionPlan, RemoteError>;

    async fn get_subscription_plan(&self, id: &str) -> Result<SubscriptionPlan, RemoteError>;

    /// Updates the non-pricing fields of a plan.
    async fn update_subscription_plan(
        &self,
        id: &str,
        patch: &SubscriptionPlanPatch,
    ) -> Result<(), RemoteError>;

    /// Replaces pricing schemes, one per named billing cycle sequence.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::Rejected` if a sequence names no cycle of the plan.
    async fn update_subscription_plan_pricing(
        &self,
        id: &str,
        updates: &[PricingSchemeUpdate],
    ) -> Result<(), RemoteError>;

    /// Moves a plan to `INACTIVE`. Plans cannot be deleted.
    async fn deactivate_subscription_plan(&self, id: &str) -> Result<(), RemoteError>;

    // ==================== Webhooks ====================

    async fn create_webhook(&self, webhook: &Webhook) -> Result<Webhook, RemoteError>;

    async fn get_webhook(&self, id: &str) -> Result<Webhook, RemoteError>;

    /// Applies a JSON Patch (RFC 6902) to a webhook and returns the result.
    async fn update_webhook(&self, id: &str, patch: &Patch) -> Result<Webhook, RemoteError>;

    async fn delete_webhook(&self, id: &str) -> Result<(), RemoteError>;
}
