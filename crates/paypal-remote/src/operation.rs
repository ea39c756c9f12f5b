use std::fmt;

use serde::{Deserialize, Serialize};

/// Every call the remote API surface offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemoteOperation {
    CreateProduct,
    GetProduct,
    UpdateProduct,
    CreateSubscriptionPlan,
    GetSubscriptionPlan,
    UpdateSubscriptionPlan,
    UpdateSubscriptionPlanPricing,
    DeactivateSubscriptionPlan,
    CreateWebhook,
    GetWebhook,
    UpdateWebhook,
    DeleteWebhook,
}

impl RemoteOperation {
    pub const ALL: [RemoteOperation; 12] = [
        Self::CreateProduct,
        Self::GetProduct,
        Self::UpdateProduct,
        Self::CreateSubscriptionPlan,
        Self::GetSubscriptionPlan,
        Self::UpdateSubscriptionPlan,
        Self::UpdateSubscriptionPlanPricing,
        Self::DeactivateSubscriptionPlan,
        Self::CreateWebhook,
        Self::GetWebhook,
        Self::UpdateWebhook,
        Self::DeleteWebhook,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreateProduct => "create_product",
            Self::GetProduct => "get_product",
            Self::UpdateProduct => "update_product",
            Self::CreateSubscriptionPlan => "create_subscription_plan",
            Self::GetSubscriptionPlan => "get_subscription_plan",
            Self::UpdateSubscriptionPlan => "update_subscription_plan",
            Self::UpdateSubscriptionPlanPricing => "update_subscription_plan_pricing",
            Self::DeactivateSubscriptionPlan => "deactivate_subscription_plan",
            Self::CreateWebhook => "create_webhook",
            Self::GetWebhook => "get_webhook",
            Self::UpdateWebhook => "update_webhook",
            Self::DeleteWebhook => "delete_webhook",
        }
    }

    /// True for calls that change remote state.
    pub fn is_mutation(&self) -> bool {
        !matches!(
            self,
            Self::GetProduct | Self::GetSubscriptionPlan | Self::GetWebhook
        )
    }
}

impl fmt::Display for RemoteOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
