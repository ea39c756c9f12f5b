use async_trait::async_trait;
use dashmap::DashMap;
use json_patch::Patch;
use paypal_remote::{
    BillingCycle, PricingSchemeUpdate, Product, RemoteApiClient, RemoteError, RemoteOperation,
    SubscriptionPlan, SubscriptionPlanPatch, Webhook,
};
use serde::Serialize;
use time::OffsetDateTime;
use tracing::debug;
use uuid::Uuid;

use crate::calls::{CallLog, RecordedCall};
use crate::patch::apply_webhook_patch;
use crate::snapshot::SandboxSnapshot;

const PRODUCT_TYPES: &[&str] = &["PHYSICAL", "DIGITAL", "SERVICE"];
const TENURE_TYPES: &[&str] = &["REGULAR", "TRIAL"];
const INTERVAL_UNITS: &[&str] = &["DAY", "WEEK", "MONTH", "YEAR"];
const SETUP_FEE_FAILURE_ACTIONS: &[&str] = &["CONTINUE", "CANCEL"];
const PLAN_STATUSES: &[&str] = &["CREATED", "ACTIVE", "INACTIVE"];
const MAX_BILLING_CYCLES: usize = 3;

/// In-memory emulation of the payment platform's resource API.
///
/// Follows the platform's rules rather than plain CRUD:
/// - products can be created and updated but never deleted
/// - plans start `ACTIVE`, can be deactivated once, and have their pricing
///   versioned per billing cycle
/// - webhooks are updated with JSON Patch and must have unique URLs
///
/// Every call is recorded, and a failure can be scheduled for the next call
/// of any operation with [`InMemoryPayPal::fail_next`].
#[derive(Debug, Default)]
pub struct InMemoryPayPal {
    products: DashMap<String, Product>,
    plans: DashMap<String, SubscriptionPlan>,
    webhooks: DashMap<String, Webhook>,
    faults: DashMap<RemoteOperation, RemoteError>,
    calls: CallLog,
}

impl InMemoryPayPal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restores a sandbox from a snapshot. The call log starts empty.
    pub fn from_snapshot(snapshot: SandboxSnapshot) -> Self {
        let sandbox = Self::new();
        for product in snapshot.products {
            sandbox.products.insert(product.id.clone(), product);
        }
        for plan in snapshot.plans {
            sandbox.plans.insert(plan.id.clone(), plan);
        }
        for webhook in snapshot.webhooks {
            sandbox.webhooks.insert(webhook.id.clone(), webhook);
        }
        sandbox
    }

    pub fn snapshot(&self) -> SandboxSnapshot {
        let mut products: Vec<Product> = self.products.iter().map(|e| e.value().clone()).collect();
        let mut plans: Vec<SubscriptionPlan> = self.plans.iter().map(|e| e.value().clone()).collect();
        let mut webhooks: Vec<Webhook> = self.webhooks.iter().map(|e| e.value().clone()).collect();
        products.sort_by(|a, b| a.id.cmp(&b.id));
        plans.sort_by(|a, b| a.id.cmp(&b.id));
        webhooks.sort_by(|a, b| a.id.cmp(&b.id));
        SandboxSnapshot {
            products,
            plans,
            webhooks,
        }
    }

    /// Makes the next call of `operation` fail with `error`.
    ///
    /// The call is still recorded. The fault is consumed by that one call.
    pub fn fail_next(&self, operation: RemoteOperation, error: RemoteError) {
        self.faults.insert(operation, error);
    }

    pub async fn calls(&self) -> Vec<RecordedCall> {
        self.calls.all().await
    }

    pub async fn call_count(&self, operation: RemoteOperation) -> usize {
        self.calls.count(operation).await
    }

    /// The most recent call of `operation`, if any.
    pub async fn last_call(&self, operation: RemoteOperation) -> Option<RecordedCall> {
        self.calls.last(operation).await
    }

    pub async fn total_calls(&self) -> usize {
        self.calls.all().await.len()
    }

    pub async fn clear_calls(&self) {
        self.calls.clear().await;
    }

    pub fn product_count(&self) -> usize {
        self.products.len()
    }

    pub fn plan_count(&self) -> usize {
        self.plans.len()
    }

    pub fn webhook_count(&self) -> usize {
        self.webhooks.len()
    }

    async fn enter<R: Serialize>(
        &self,
        operation: RemoteOperation,
        id: Option<&str>,
        request: Option<&R>,
    ) -> Result<(), RemoteError> {
        self.calls
            .push(RecordedCall {
                operation,
                id: id.map(str::to_string),
                request: request.and_then(|r| serde_json::to_value(r).ok()),
            })
            .await;

        if let Some((_, error)) = self.faults.remove(&operation) {
            debug!(operation = %operation, error = %error, "Injected fault");
            return Err(error);
        }
        Ok(())
    }
}

fn generate_id(prefix: &str) -> String {
    let raw: String = Uuid::new_v4()
        .simple()
        .to_string()
        .to_uppercase()
        .chars()
        .take(20)
        .collect();
    format!("{prefix}-{raw}")
}

fn check_one_of(field: &str, value: &str, allowed: &[&str]) -> Result<(), RemoteError> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(RemoteError::rejected(
            "INVALID_PARAMETER_VALUE",
            format!("{field} must be one of {}, got {value:?}", allowed.join(", ")),
        ))
    }
}

fn check_not_empty(field: &str, value: &str) -> Result<(), RemoteError> {
    if value.is_empty() {
        Err(RemoteError::rejected(
            "MISSING_REQUIRED_PARAMETER",
            format!("{field} is required"),
        ))
    } else {
        Ok(())
    }
}

fn check_product(product: &Product) -> Result<(), RemoteError> {
    check_not_empty("name", &product.name)?;
    check_not_empty("image_url", &product.image_url)?;
    check_not_empty("home_url", &product.home_url)?;
    check_one_of("type", &product.product_type, PRODUCT_TYPES)
}

fn check_billing_cycles(cycles: &[BillingCycle]) -> Result<(), RemoteError> {
    if cycles.is_empty() || cycles.len() > MAX_BILLING_CYCLES {
        return Err(RemoteError::rejected(
            "INVALID_PARAMETER_VALUE",
            format!("a plan needs 1 to {MAX_BILLING_CYCLES} billing cycles"),
        ));
    }
    for cycle in cycles {
        check_one_of("tenure_type", &cycle.tenure_type, TENURE_TYPES)?;
        check_one_of("interval_unit", &cycle.frequency.interval_unit, INTERVAL_UNITS)?;
        if cycle.frequency.interval_count < 1 {
            return Err(RemoteError::rejected(
                "INVALID_PARAMETER_VALUE",
                "interval_count must be positive",
            ));
        }
    }
    Ok(())
}

#[async_trait]
impl RemoteApiClient for InMemoryPayPal {
    async fn create_product(&self, product: &Product) -> Result<Product, RemoteError> {
        self.enter(RemoteOperation::CreateProduct, None, Some(product)).await?;
        check_product(product)?;

        let now = OffsetDateTime::now_utc();
        let created = Product {
            id: generate_id("PROD"),
            create_time: Some(now),
            update_time: Some(now),
            ..product.clone()
        };
        self.products.insert(created.id.clone(), created.clone());
        debug!(id = %created.id, "Sandbox created product");
        Ok(created)
    }

    async fn get_product(&self, id: &str) -> Result<Product, RemoteError> {
        self.enter::<()>(RemoteOperation::GetProduct, Some(id), None).await?;
        self.products
            .get(id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| RemoteError::not_found("product", id))
    }

    async fn update_product(&self, product: &Product) -> Result<(), RemoteError> {
        self.enter(RemoteOperation::UpdateProduct, Some(product.id.as_str()), Some(product))
            .await?;
        check_product(product)?;

        let mut stored = self
            .products
            .get_mut(&product.id)
            .ok_or_else(|| RemoteError::not_found("product", &product.id))?;
        let create_time = stored.create_time;
        *stored = Product {
            create_time,
            update_time: Some(OffsetDateTime::now_utc()),
            ..product.clone()
        };
        Ok(())
    }

    async fn create_subscription_plan(
        &self,
        plan: &SubscriptionPlan,
    ) -> Result<SubscriptionPlan, RemoteError> {
        self.enter(RemoteOperation::CreateSubscriptionPlan, None, Some(plan))
            .await?;
        if !self.products.contains_key(&plan.product_id) {
            return Err(RemoteError::rejected(
                "INVALID_RESOURCE_ID",
                format!("product {} does not exist", plan.product_id),
            ));
        }
        check_not_empty("name", &plan.name)?;
        check_billing_cycles(&plan.billing_cycles)?;
        check_one_of(
            "setup_fee_failure_action",
            &plan.payment_preferences.setup_fee_failure_action,
            SETUP_FEE_FAILURE_ACTIONS,
        )?;
        let status = plan.status.clone().unwrap_or_else(|| "ACTIVE".to_string());
        check_one_of("status", &status, PLAN_STATUSES)?;

        let mut created = plan.clone();
        created.id = generate_id("P");
        created.status = Some(status);
        for cycle in &mut created.billing_cycles {
            cycle.pricing_scheme.version = Some(1);
        }
        self.plans.insert(created.id.clone(), created.clone());
        debug!(id = %created.id, product_id = %created.product_id, "Sandbox created plan");
        Ok(created)
    }

    async fn get_subscription_plan(&self, id: &str) -> Result<SubscriptionPlan, RemoteError> {
        self.enter::<()>(RemoteOperation::GetSubscriptionPlan, Some(id), None)
            .await?;
        self.plans
            .get(id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| RemoteError::not_found("plan", id))
    }

    async fn update_subscription_plan(
        &self,
        id: &str,
        patch: &SubscriptionPlanPatch,
    ) -> Result<(), RemoteError> {
        self.enter(RemoteOperation::UpdateSubscriptionPlan, Some(id), Some(patch))
            .await?;
        check_not_empty("name", &patch.name)?;
        check_one_of(
            "setup_fee_failure_action",
            &patch.payment_preferences.setup_fee_failure_action,
            SETUP_FEE_FAILURE_ACTIONS,
        )?;

        let mut plan = self
            .plans
            .get_mut(id)
            .ok_or_else(|| RemoteError::not_found("plan", id))?;
        plan.name = patch.name.clone();
        plan.description = patch.description.clone();
        plan.quantity_supported = patch.quantity_supported;
        plan.payment_preferences = patch.payment_preferences.clone();
        plan.taxes = patch.taxes.clone();
        Ok(())
    }

    async fn update_subscription_plan_pricing(
        &self,
        id: &str,
        updates: &[PricingSchemeUpdate],
    ) -> Result<(), RemoteError> {
        self.enter(
            RemoteOperation::UpdateSubscriptionPlanPricing,
            Some(id),
            Some(&updates),
        )
        .await?;

        let mut plan = self
            .plans
            .get_mut(id)
            .ok_or_else(|| RemoteError::not_found("plan", id))?;
        if let Some(unknown) = updates.iter().find(|update| {
            !plan
                .billing_cycles
                .iter()
                .any(|cycle| cycle.sequence == update.billing_cycle_sequence)
        }) {
            return Err(RemoteError::rejected(
                "INVALID_PARAMETER_VALUE",
                format!(
                    "plan {id} has no billing cycle with sequence {}",
                    unknown.billing_cycle_sequence
                ),
            ));
        }

        for update in updates {
            for cycle in plan
                .billing_cycles
                .iter_mut()
                .filter(|cycle| cycle.sequence == update.billing_cycle_sequence)
            {
                let version = cycle.pricing_scheme.version.unwrap_or(0) + 1;
                cycle.pricing_scheme.fixed_price = update.pricing_scheme.fixed_price.clone();
                cycle.pricing_scheme.version = Some(version);
            }
        }
        Ok(())
    }

    async fn deactivate_subscription_plan(&self, id: &str) -> Result<(), RemoteError> {
        self.enter::<()>(RemoteOperation::DeactivateSubscriptionPlan, Some(id), None)
            .await?;

        let mut plan = self
            .plans
            .get_mut(id)
            .ok_or_else(|| RemoteError::not_found("plan", id))?;
        if plan.status.as_deref() == Some("INACTIVE") {
            return Err(RemoteError::rejected(
                "PLAN_STATUS_INVALID",
                format!("plan {id} is already inactive"),
            ));
        }
        plan.status = Some("INACTIVE".to_string());
        Ok(())
    }

    async fn create_webhook(&self, webhook: &Webhook) -> Result<Webhook, RemoteError> {
        self.enter(RemoteOperation::CreateWebhook, None, Some(webhook))
            .await?;
        check_not_empty("url", &webhook.url)?;
        if webhook.event_types.is_empty() {
            return Err(RemoteError::rejected(
                "MISSING_REQUIRED_PARAMETER",
                "event_types is required",
            ));
        }
        if self.webhooks.iter().any(|entry| entry.url == webhook.url) {
            return Err(RemoteError::rejected(
                "WEBHOOK_URL_ALREADY_EXISTS",
                format!("a webhook for {} already exists", webhook.url),
            ));
        }

        let created = Webhook {
            id: generate_id("WH"),
            ..webhook.clone()
        };
        self.webhooks.insert(created.id.clone(), created.clone());
        debug!(id = %created.id, url = %created.url, "Sandbox created webhook");
        Ok(created)
    }

    async fn get_webhook(&self, id: &str) -> Result<Webhook, RemoteError> {
        self.enter::<()>(RemoteOperation::GetWebhook, Some(id), None).await?;
        self.webhooks
            .get(id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| RemoteError::not_found("webhook", id))
    }

    async fn update_webhook(&self, id: &str, patch: &Patch) -> Result<Webhook, RemoteError> {
        self.enter(RemoteOperation::UpdateWebhook, Some(id), Some(patch))
            .await?;

        let current = self
            .webhooks
            .get(id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| RemoteError::not_found("webhook", id))?;
        let patched = apply_webhook_patch(&current, patch)?;
        if self
            .webhooks
            .iter()
            .any(|entry| entry.id != id && entry.url == patched.url)
        {
            return Err(RemoteError::rejected(
                "WEBHOOK_URL_ALREADY_EXISTS",
                format!("a webhook for {} already exists", patched.url),
            ));
        }

        self.webhooks.insert(id.to_string(), patched.clone());
        Ok(patched)
    }

    async fn delete_webhook(&self, id: &str) -> Result<(), RemoteError> {
        self.enter::<()>(RemoteOperation::DeleteWebhook, Some(id), None)
            .await?;
        self.webhooks
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| RemoteError::not_found("webhook", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use paypal_remote::WebhookEventType;

    fn hook(url: &str) -> Webhook {
        Webhook {
            id: String::new(),
            url: url.to_string(),
            event_types: vec![WebhookEventType::named("PAYMENT.SALE.COMPLETED")],
        }
    }

    #[test]
    fn test_generated_ids_carry_platform_prefix() {
        let id = generate_id("PROD");
        assert!(id.starts_with("PROD-"));
        assert_eq!(id.len(), "PROD-".len() + 20);
        assert_ne!(generate_id("WH"), generate_id("WH"));
    }

    #[tokio::test]
    async fn test_fault_is_consumed_once() {
        let sandbox = InMemoryPayPal::new();
        sandbox.fail_next(
            RemoteOperation::CreateWebhook,
            RemoteError::transport("connection reset"),
        );

        let err = sandbox.create_webhook(&hook("https://a")).await.unwrap_err();
        assert_eq!(err, RemoteError::transport("connection reset"));
        assert!(sandbox.create_webhook(&hook("https://a")).await.is_ok());
        assert_eq!(sandbox.call_count(RemoteOperation::CreateWebhook).await, 2);
    }

    #[tokio::test]
    async fn test_snapshot_restores_resources() {
        let sandbox = InMemoryPayPal::new();
        let created = sandbox.create_webhook(&hook("https://a")).await.unwrap();

        let restored = InMemoryPayPal::from_snapshot(sandbox.snapshot());
        assert_eq!(restored.get_webhook(&created.id).await.unwrap(), created);
        assert_eq!(restored.total_calls().await, 1);
    }
}
