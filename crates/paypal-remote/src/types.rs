//! Remote object shapes.
//!
//! These mirror the payment platform's JSON representation. Enumerated
//! fields are kept as strings in the platform's upper-case convention
//! (`PHYSICAL`, `REGULAR`, `MONTH`); case conversion is the translator's job.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Assigned by the platform; empty on create requests.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub product_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub image_url: String,
    pub home_url: String,
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub create_time: Option<OffsetDateTime>,
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub update_time: Option<OffsetDateTime>,
}

/// A monetary amount. The value is a decimal string, never a float.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    pub value: String,
    pub currency_code: String,
}

impl Money {
    #[must_use]
    pub fn new(value: impl Into<String>, currency_code: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            currency_code: currency_code.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frequency {
    pub interval_unit: String,
    pub interval_count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingScheme {
    /// Incremented by the platform on every pricing change.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
    pub fixed_price: Money,
}

/// One stage of a plan's billing schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingCycle {
    pub sequence: i64,
    /// Zero means the cycle repeats until cancelled.
    pub total_cycles: i64,
    pub tenure_type: String,
    pub frequency: Frequency,
    pub pricing_scheme: PricingScheme,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentPreferences {
    pub auto_bill_outstanding: bool,
    pub setup_fee: Money,
    pub payment_failure_threshold: i64,
    pub setup_fee_failure_action: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Taxes {
    pub percentage: String,
    pub inclusive: bool,
}

/// A subscription billing plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionPlan {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub product_id: String,
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity_supported: Option<bool>,
    pub billing_cycles: Vec<BillingCycle>,
    pub payment_preferences: PaymentPreferences,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub taxes: Option<Taxes>,
}

/// The fields of a plan the general update call may change.
///
/// Billing cycle pricing is not part of it; pricing only changes through a
/// [`PricingSchemeUpdate`] keyed by cycle sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionPlanPatch {
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity_supported: Option<bool>,
    pub payment_preferences: PaymentPreferences,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub taxes: Option<Taxes>,
}

impl From<&SubscriptionPlan> for SubscriptionPlanPatch {
    fn from(plan: &SubscriptionPlan) -> Self {
        Self {
            name: plan.name.clone(),
            description: plan.description.clone(),
            quantity_supported: plan.quantity_supported,
            payment_preferences: plan.payment_preferences.clone(),
            taxes: plan.taxes.clone(),
        }
    }
}

/// A new pricing scheme for the billing cycle with the given sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingSchemeUpdate {
    pub billing_cycle_sequence: i64,
    pub pricing_scheme: PricingScheme,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookEventType {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl WebhookEventType {
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }
}

/// A webhook subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Webhook {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub url: String,
    pub event_types: Vec<WebhookEventType>,
}
