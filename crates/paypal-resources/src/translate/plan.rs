use paypal_core::{AttributeMap, AttributeValue, ResourceKind, attribute_map};
use paypal_remote::{
    BillingCycle, Frequency, PaymentPreferences, PricingScheme, SubscriptionPlan, Taxes,
};

use super::{Node, TranslateError, Translator, field_case, money_from_remote, money_to_remote};

const KIND: ResourceKind = ResourceKind::SubscriptionPlan;

/// Billing cycles keep the order they were declared in. Sequence numbers
/// are neither sorted nor checked for duplicates.
pub struct PlanTranslator;

impl PlanTranslator {
    fn cycle_to_remote(cycle: Node<'_>) -> Result<BillingCycle, TranslateError> {
        let frequency = cycle.singleton("frequency")?;
        let frequency = frequency.node();
        let pricing = cycle.singleton("pricing_scheme")?;
        let pricing = pricing.node();
        let fixed_price = pricing.singleton("fixed_price")?;

        Ok(BillingCycle {
            sequence: cycle.int("sequence")?,
            total_cycles: cycle.int("total_cycles")?,
            tenure_type: field_case(KIND, "billing_cycle.tenure_type")
                .outbound(cycle.str("tenure_type")?),
            frequency: Frequency {
                interval_unit: field_case(KIND, "billing_cycle.frequency.interval_unit")
                    .outbound(frequency.str("interval_unit")?),
                interval_count: frequency.int("interval_count")?,
            },
            pricing_scheme: PricingScheme {
                version: pricing.opt_int("version")?,
                fixed_price: money_to_remote(fixed_price.node())?,
            },
        })
    }

    fn cycle_from_remote(cycle: &BillingCycle) -> AttributeValue {
        let mut pricing = attribute_map([(
            "fixed_price",
            money_from_remote(&cycle.pricing_scheme.fixed_price),
        )]);
        if let Some(version) = cycle.pricing_scheme.version {
            pricing.insert("version".into(), version.into());
        }

        AttributeValue::Object(attribute_map([
            ("sequence", AttributeValue::from(cycle.sequence)),
            ("total_cycles", cycle.total_cycles.into()),
            (
                "tenure_type",
                field_case(KIND, "billing_cycle.tenure_type")
                    .inbound(&cycle.tenure_type)
                    .into(),
            ),
            (
                "frequency",
                AttributeValue::block(attribute_map([
                    (
                        "interval_unit",
                        AttributeValue::from(
                            field_case(KIND, "billing_cycle.frequency.interval_unit")
                                .inbound(&cycle.frequency.interval_unit),
                        ),
                    ),
                    ("interval_count", cycle.frequency.interval_count.into()),
                ])),
            ),
            ("pricing_scheme", AttributeValue::block(pricing)),
        ]))
    }

    fn preferences_to_remote(prefs: Node<'_>) -> Result<PaymentPreferences, TranslateError> {
        let setup_fee = prefs.singleton("setup_fee")?;
        Ok(PaymentPreferences {
            auto_bill_outstanding: prefs.bool("auto_bill_outstanding")?,
            setup_fee: money_to_remote(setup_fee.node())?,
            payment_failure_threshold: prefs.int("payment_failure_threshold")?,
            setup_fee_failure_action: field_case(KIND, "payment_preferences.setup_fee_failure_action")
                .outbound(prefs.str("setup_fee_failure_action")?),
        })
    }

    fn preferences_from_remote(prefs: &PaymentPreferences) -> AttributeValue {
        AttributeValue::block(attribute_map([
            (
                "auto_bill_outstanding",
                AttributeValue::from(prefs.auto_bill_outstanding),
            ),
            ("setup_fee", money_from_remote(&prefs.setup_fee)),
            (
                "payment_failure_threshold",
                prefs.payment_failure_threshold.into(),
            ),
            (
                "setup_fee_failure_action",
                field_case(KIND, "payment_preferences.setup_fee_failure_action")
                    .inbound(&prefs.setup_fee_failure_action)
                    .into(),
            ),
        ]))
    }
}

impl Translator for PlanTranslator {
    type Remote = SubscriptionPlan;

    fn to_remote(&self, tree: &AttributeMap) -> Result<SubscriptionPlan, TranslateError> {
        let root = Node::root(tree);

        let billing_cycles = root
            .blocks("billing_cycle")?
            .iter()
            .map(|cycle| Self::cycle_to_remote(cycle.node()))
            .collect::<Result<Vec<_>, _>>()?;
        let preferences = root.singleton("payment_preferences")?;
        let taxes = match root.opt_singleton("taxes")? {
            Some(taxes) => {
                let taxes = taxes.node();
                Some(Taxes {
                    percentage: taxes.str("percentage")?.to_string(),
                    inclusive: taxes.bool("inclusive")?,
                })
            }
            None => None,
        };

        Ok(SubscriptionPlan {
            id: String::new(),
            product_id: root.str("product_id")?.to_string(),
            name: root.str("name")?.to_string(),
            description: root.str("description")?.to_string(),
            status: root
                .opt_str("status")?
                .map(|s| field_case(KIND, "status").outbound(s)),
            quantity_supported: root.opt_bool("quantity_supported")?,
            billing_cycles,
            payment_preferences: Self::preferences_to_remote(preferences.node())?,
            taxes,
        })
    }

    fn from_remote(&self, plan: &SubscriptionPlan) -> AttributeMap {
        let mut tree = attribute_map([
            ("product_id", AttributeValue::from(plan.product_id.as_str())),
            ("name", plan.name.as_str().into()),
            ("description", plan.description.as_str().into()),
        ]);
        if let Some(status) = &plan.status {
            tree.insert(
                "status".into(),
                field_case(KIND, "status").inbound(status).into(),
            );
        }
        if let Some(quantity_supported) = plan.quantity_supported {
            tree.insert("quantity_supported".into(), quantity_supported.into());
        }
        tree.insert(
            "billing_cycle".into(),
            AttributeValue::List(plan.billing_cycles.iter().map(Self::cycle_from_remote).collect()),
        );
        tree.insert(
            "payment_preferences".into(),
            Self::preferences_from_remote(&plan.payment_preferences),
        );
        if let Some(taxes) = &plan.taxes {
            tree.insert(
                "taxes".into(),
                AttributeValue::block(attribute_map([
                    ("percentage", AttributeValue::from(taxes.percentage.as_str())),
                    ("inclusive", taxes.inclusive.into()),
                ])),
            );
        }
        tree
    }
}
