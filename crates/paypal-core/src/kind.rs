use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Resource kinds managed by the provider.
///
/// The string forms are the names a host runtime uses to address a kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ResourceKind {
    #[serde(rename = "paypal_catalog_product")]
    CatalogProduct,
    #[serde(rename = "paypal_subscription_plan")]
    SubscriptionPlan,
    #[serde(rename = "paypal_notification_webhook")]
    NotificationWebhook,
}

impl ResourceKind {
    /// Every kind, in registration order.
    pub const ALL: [ResourceKind; 3] = [
        ResourceKind::CatalogProduct,
        ResourceKind::SubscriptionPlan,
        ResourceKind::NotificationWebhook,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::CatalogProduct => "paypal_catalog_product",
            ResourceKind::SubscriptionPlan => "paypal_subscription_plan",
            ResourceKind::NotificationWebhook => "paypal_notification_webhook",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "paypal_catalog_product" => Ok(ResourceKind::CatalogProduct),
            "paypal_subscription_plan" => Ok(ResourceKind::SubscriptionPlan),
            "paypal_notification_webhook" => Ok(ResourceKind::NotificationWebhook),
            _ => Err(CoreError::unknown_kind(s)),
        }
    }
}
