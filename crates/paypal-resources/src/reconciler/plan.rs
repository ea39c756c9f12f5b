use async_trait::async_trait;
use paypal_core::{AttributeMap, ResourceKind, ResourceSchema};
use paypal_remote::{DynRemoteClient, PricingSchemeUpdate, RemoteOperation, SubscriptionPlanPatch};
use tracing::{debug, error, info};

use super::{DeleteOutcome, ObservedResource, ResourceReconciler};
use crate::error::{ReconcileError, Result};
use crate::schemas::schema_for;
use crate::translate::{PlanTranslator, Translator};

const KIND: ResourceKind = ResourceKind::SubscriptionPlan;

/// Subscription plans are updated in two calls, general fields first and
/// pricing second, and deleted by deactivation.
pub struct PlanReconciler {
    client: DynRemoteClient,
}

impl PlanReconciler {
    pub fn new(client: DynRemoteClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ResourceReconciler for PlanReconciler {
    fn kind(&self) -> ResourceKind {
        KIND
    }

    fn schema(&self) -> &'static ResourceSchema {
        schema_for(KIND)
    }

    async fn create(&self, desired: &AttributeMap) -> Result<ObservedResource> {
        self.validate(desired)?;
        let plan = PlanTranslator.to_remote(desired)?;

        let created = self
            .client
            .create_subscription_plan(&plan)
            .await
            .map_err(|e| {
                ReconcileError::remote(KIND, "", RemoteOperation::CreateSubscriptionPlan, e)
            })?;
        info!(
            kind = %KIND,
            id = %created.id,
            product_id = %created.product_id,
            "Created subscription plan"
        );

        self.read(&created.id).await
    }

    async fn read(&self, id: &str) -> Result<ObservedResource> {
        let plan = self
            .client
            .get_subscription_plan(id)
            .await
            .map_err(|e| ReconcileError::remote(KIND, id, RemoteOperation::GetSubscriptionPlan, e))?;
        debug!(kind = %KIND, id = %id, cycles = plan.billing_cycles.len(), "Read subscription plan");

        Ok(ObservedResource {
            id: plan.id.clone(),
            attributes: PlanTranslator.from_remote(&plan),
        })
    }

    async fn update(&self, id: &str, desired: &AttributeMap) -> Result<ObservedResource> {
        self.validate(desired)?;
        let plan = PlanTranslator.to_remote(desired)?;

        let patch = SubscriptionPlanPatch::from(&plan);
        self.client
            .update_subscription_plan(id, &patch)
            .await
            .map_err(|e| {
                ReconcileError::remote(KIND, id, RemoteOperation::UpdateSubscriptionPlan, e)
            })?;

        let pricing: Vec<PricingSchemeUpdate> = plan
            .billing_cycles
            .iter()
            .map(|cycle| PricingSchemeUpdate {
                billing_cycle_sequence: cycle.sequence,
                pricing_scheme: cycle.pricing_scheme.clone(),
            })
            .collect();
        if let Err(source) = self
            .client
            .update_subscription_plan_pricing(id, &pricing)
            .await
        {
            error!(
                kind = %KIND,
                id = %id,
                error = %source,
                "Plan fields were updated but the pricing update failed"
            );
            return Err(ReconcileError::PartiallyApplied {
                kind: KIND,
                id: id.to_string(),
                committed: vec![RemoteOperation::UpdateSubscriptionPlan],
                failed: RemoteOperation::UpdateSubscriptionPlanPricing,
                source,
            });
        }

        self.read(id).await
    }

    async fn delete(&self, id: &str) -> Result<DeleteOutcome> {
        self.client
            .deactivate_subscription_plan(id)
            .await
            .map_err(|e| {
                ReconcileError::remote(KIND, id, RemoteOperation::DeactivateSubscriptionPlan, e)
            })?;
        info!(kind = %KIND, id = %id, "Deactivated subscription plan");

        Ok(DeleteOutcome::Deactivated)
    }
}
