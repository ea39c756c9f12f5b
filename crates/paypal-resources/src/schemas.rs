//! Schema descriptors for the three resource kinds.
//!
//! Built lazily once per process and read-only afterwards.

use std::sync::LazyLock;

use paypal_core::{BlockSchema, Equivalence, FieldSchema, ResourceKind, ResourceSchema, ScalarKind};

pub const PRODUCT_TYPES: &[&str] = &["physical", "digital", "service"];
pub const TENURE_TYPES: &[&str] = &["regular", "trial"];
pub const INTERVAL_UNITS: &[&str] = &["day", "week", "month", "year"];
pub const SETUP_FEE_FAILURE_ACTIONS: &[&str] = &["continue", "cancel"];
pub const PLAN_STATUSES: &[&str] = &["created", "active", "inactive"];

/// Most billing cycles a plan may declare.
pub const MAX_BILLING_CYCLES: usize = 3;

fn money(description: &str) -> FieldSchema {
    FieldSchema::block(
        BlockSchema::new()
            .field(
                "value",
                FieldSchema::string()
                    .required()
                    .non_empty()
                    .equivalence(Equivalence::NumericString)
                    .describe("Decimal amount as a string"),
            )
            .field(
                "currency_code",
                FieldSchema::string()
                    .required()
                    .non_empty()
                    .describe("The three-character ISO-4217 currency code"),
            ),
    )
    .required()
    .max_items(1)
    .describe(description)
}

pub static CATALOG_PRODUCT: LazyLock<ResourceSchema> = LazyLock::new(|| {
    ResourceSchema::new(ResourceKind::CatalogProduct, "A product in the PayPal catalog")
        .field(
            "name",
            FieldSchema::string()
                .required()
                .non_empty()
                .describe("The name of the product"),
        )
        .field(
            "description",
            FieldSchema::string()
                .optional()
                .describe("The description of the product"),
        )
        .field(
            "image_url",
            FieldSchema::string()
                .required()
                .non_empty()
                .describe("An externally hosted image of the product"),
        )
        .field(
            "home_url",
            FieldSchema::string()
                .required()
                .non_empty()
                .describe("A URL to product information"),
        )
        .field(
            "type",
            FieldSchema::string()
                .required()
                .one_of(PRODUCT_TYPES)
                .describe("The product type"),
        )
        .field(
            "category",
            FieldSchema::string()
                .optional()
                .describe("The product category, passed through as given"),
        )
});

pub static SUBSCRIPTION_PLAN: LazyLock<ResourceSchema> = LazyLock::new(|| {
    let frequency = BlockSchema::new()
        .field(
            "interval_unit",
            FieldSchema::string().required().one_of(INTERVAL_UNITS),
        )
        .field(
            "interval_count",
            FieldSchema::integer()
                .required()
                .describe("The number of intervals after which a subscriber is billed"),
        );

    let pricing_scheme = BlockSchema::new()
        .field(
            "version",
            FieldSchema::integer()
                .optional_computed()
                .describe("Assigned by PayPal; bumped on every pricing change"),
        )
        .field("fixed_price", money("The fixed amount charged per cycle"));

    let billing_cycle = BlockSchema::new()
        .field(
            "sequence",
            FieldSchema::integer()
                .required()
                .range(1, 99)
                .describe("The order in which this cycle runs among the plan's cycles"),
        )
        .field(
            "total_cycles",
            FieldSchema::integer()
                .required()
                .describe("How many times the cycle runs; 0 repeats until cancelled"),
        )
        .field(
            "tenure_type",
            FieldSchema::string().required().one_of(TENURE_TYPES),
        )
        .field(
            "frequency",
            FieldSchema::block(frequency).required().max_items(1),
        )
        .field(
            "pricing_scheme",
            FieldSchema::block(pricing_scheme).required().max_items(1),
        );

    let payment_preferences = BlockSchema::new()
        .field(
            "auto_bill_outstanding",
            FieldSchema::boolean()
                .required()
                .describe("Whether to bill the outstanding amount in the next cycle"),
        )
        .field("setup_fee", money("The initial set-up fee for the service"))
        .field(
            "payment_failure_threshold",
            FieldSchema::integer()
                .required()
                .describe("Consecutive payment failures before the subscription is suspended"),
        )
        .field(
            "setup_fee_failure_action",
            FieldSchema::string()
                .required()
                .one_of(SETUP_FEE_FAILURE_ACTIONS),
        );

    let taxes = BlockSchema::new()
        .field(
            "percentage",
            FieldSchema::string()
                .required()
                .equivalence(Equivalence::NumericString),
        )
        .field("inclusive", FieldSchema::boolean().required());

    ResourceSchema::new(
        ResourceKind::SubscriptionPlan,
        "A subscription billing plan for a catalog product",
    )
    .field(
        "product_id",
        FieldSchema::string()
            .required()
            .non_empty()
            .describe("The ID of the product this plan is for"),
    )
    .field("name", FieldSchema::string().required().non_empty())
    .field("description", FieldSchema::string().required())
    .field(
        "status",
        FieldSchema::string()
            .optional_computed()
            .one_of(PLAN_STATUSES)
            .describe("The status reported by PayPal, stored upper case"),
    )
    .field(
        "quantity_supported",
        FieldSchema::boolean()
            .optional()
            .describe("Whether a subscriber may buy a quantity of the plan"),
    )
    .field(
        "billing_cycle",
        FieldSchema::block(billing_cycle)
            .required()
            .min_items(1)
            .max_items(MAX_BILLING_CYCLES),
    )
    .field(
        "payment_preferences",
        FieldSchema::block(payment_preferences)
            .required()
            .max_items(1),
    )
    .field("taxes", FieldSchema::block(taxes).optional().max_items(1))
});

pub static NOTIFICATION_WEBHOOK: LazyLock<ResourceSchema> = LazyLock::new(|| {
    ResourceSchema::new(
        ResourceKind::NotificationWebhook,
        "A webhook receiving PayPal event notifications",
    )
    .field(
        "url",
        FieldSchema::string()
            .required()
            .non_empty()
            .describe("The URL that PayPal will send notifications to"),
    )
    .field(
        "event_types",
        FieldSchema::list(ScalarKind::String)
            .required()
            .non_empty()
            .ignore_case()
            .describe("Event type names, stored upper case"),
    )
});

/// The schema for `kind`.
pub fn schema_for(kind: ResourceKind) -> &'static ResourceSchema {
    match kind {
        ResourceKind::CatalogProduct => &*CATALOG_PRODUCT,
        ResourceKind::SubscriptionPlan => &*SUBSCRIPTION_PLAN,
        ResourceKind::NotificationWebhook => &*NOTIFICATION_WEBHOOK,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use paypal_core::{ValidationIssue, attributes_from_json};
    use serde_json::json;

    #[test]
    fn test_schemas_match_their_kind() {
        for kind in ResourceKind::ALL {
            assert_eq!(schema_for(kind).kind, kind);
        }
    }

    #[test]
    fn test_money_values_use_numeric_equivalence() {
        let field = SUBSCRIPTION_PLAN
            .field_at("billing_cycle.0.pricing_scheme.0.fixed_price.0.value")
            .unwrap();
        assert_eq!(field.equivalence, Some(Equivalence::NumericString));

        let field = SUBSCRIPTION_PLAN.field_at("taxes.0.percentage").unwrap();
        assert_eq!(field.equivalence, Some(Equivalence::NumericString));
    }

    #[test]
    fn test_product_enum_is_case_insensitive() {
        let tree = attributes_from_json(json!({
            "name": "Widget",
            "image_url": "https://example.com/w.png",
            "home_url": "https://example.com",
            "type": "PHYSICAL"
        }))
        .unwrap();
        assert!(CATALOG_PRODUCT.validate(&tree).is_valid());
    }

    #[test]
    fn test_too_many_billing_cycles() {
        let cycle = json!({
            "sequence": 1,
            "total_cycles": 0,
            "tenure_type": "regular",
            "frequency": [{"interval_unit": "month", "interval_count": 1}],
            "pricing_scheme": [{"fixed_price": [{"value": "1", "currency_code": "USD"}]}]
        });
        let tree = attributes_from_json(json!({
            "product_id": "PROD-1",
            "name": "Basic",
            "description": "d",
            "billing_cycle": [cycle.clone(), cycle.clone(), cycle.clone(), cycle],
            "payment_preferences": [{
                "auto_bill_outstanding": true,
                "setup_fee": [{"value": "0", "currency_code": "USD"}],
                "payment_failure_threshold": 1,
                "setup_fee_failure_action": "continue"
            }]
        }))
        .unwrap();

        let result = SUBSCRIPTION_PLAN.validate(&tree);
        assert_eq!(
            result.issues,
            vec![ValidationIssue::CardinalityExceeded {
                path: "billing_cycle".into(),
                max: 3,
                actual: 4
            }]
        );
    }

    #[test]
    fn test_empty_billing_cycles_and_event_types_are_rejected() {
        let plan = attributes_from_json(json!({
            "product_id": "PROD-1",
            "name": "Basic",
            "description": "d",
            "status": "active",
            "billing_cycle": [],
            "payment_preferences": [{
                "auto_bill_outstanding": true,
                "setup_fee": [{"value": "0", "currency_code": "USD"}],
                "payment_failure_threshold": 1,
                "setup_fee_failure_action": "continue"
            }]
        }))
        .unwrap();
        assert_eq!(
            SUBSCRIPTION_PLAN.validate(&plan).issues,
            vec![ValidationIssue::TooFewItems {
                path: "billing_cycle".into(),
                min: 1,
                actual: 0
            }]
        );

        let webhook = attributes_from_json(json!({
            "url": "https://example.com/hook",
            "event_types": []
        }))
        .unwrap();
        assert_eq!(
            NOTIFICATION_WEBHOOK.validate(&webhook).issues,
            vec![ValidationIssue::EmptyValue {
                path: "event_types".into()
            }]
        );
    }
}
