//! End-to-end lifecycle tests for the three resource kinds against the sandbox.

use std::sync::Arc;

use paypal_core::{AttributeMap, AttributeValue, ResourceKind, ValidationIssue, attributes_from_json};
use paypal_remote::{RemoteApiClient, RemoteError, RemoteOperation, Webhook, WebhookEventType};
use paypal_resources::{
    DeleteOutcome, HandleState, PlanReconciler, ProductReconciler, ReconcileError, ResourceHandle,
    ResourceReconciler, WebhookReconciler,
};
use paypal_sandbox::{InMemoryPayPal, create_sandbox};
use serde_json::json;

fn product_tree() -> AttributeMap {
    attributes_from_json(json!({
        "name": "Widget",
        "description": "desc",
        "image_url": "https://example.com/widget.png",
        "home_url": "https://example.com/widget",
        "type": "physical",
        "category": "SOFTWARE"
    }))
    .unwrap()
}

fn plan_tree(product_id: &str, setup_fee: &str) -> AttributeMap {
    attributes_from_json(json!({
        "product_id": product_id,
        "name": "Basic",
        "description": "Basic monthly",
        "billing_cycle": [
            {
                "sequence": 1,
                "total_cycles": 1,
                "tenure_type": "trial",
                "frequency": [{"interval_unit": "week", "interval_count": 2}],
                "pricing_scheme": [{"fixed_price": [{"value": "0", "currency_code": "USD"}]}]
            },
            {
                "sequence": 2,
                "total_cycles": 0,
                "tenure_type": "regular",
                "frequency": [{"interval_unit": "month", "interval_count": 1}],
                "pricing_scheme": [{"fixed_price": [{"value": "10", "currency_code": "USD"}]}]
            }
        ],
        "payment_preferences": [{
            "auto_bill_outstanding": true,
            "setup_fee": [{"value": setup_fee, "currency_code": "USD"}],
            "payment_failure_threshold": 3,
            "setup_fee_failure_action": "continue"
        }]
    }))
    .unwrap()
}

fn webhook_tree(url: &str, events: &[&str]) -> AttributeMap {
    attributes_from_json(json!({"url": url, "event_types": events})).unwrap()
}

/// Creates a product and returns a plan handle that is already Present.
async fn plan_fixture(sandbox: &Arc<InMemoryPayPal>) -> (PlanReconciler, ResourceHandle) {
    let products = ProductReconciler::new(sandbox.clone());
    let product = products.create(&product_tree()).await.unwrap();

    let plans = PlanReconciler::new(sandbox.clone());
    let mut handle = ResourceHandle::absent(ResourceKind::SubscriptionPlan);
    handle
        .create(&plans, &plan_tree(&product.id, "1.50"))
        .await
        .unwrap();
    sandbox.clear_calls().await;
    (plans, handle)
}

// =============================================================================
// Catalog products
// =============================================================================

#[tokio::test]
async fn test_product_create_reads_back_declared_state() {
    let sandbox = create_sandbox();
    let reconciler = ProductReconciler::new(sandbox.clone());

    let observed = reconciler.create(&product_tree()).await.unwrap();

    assert!(observed.id.starts_with("PROD-"));
    assert_eq!(observed.attributes, product_tree());
    assert_eq!(sandbox.call_count(RemoteOperation::CreateProduct).await, 1);
    assert_eq!(sandbox.call_count(RemoteOperation::GetProduct).await, 1);

    let sent = sandbox
        .last_call(RemoteOperation::CreateProduct)
        .await
        .and_then(|call| call.request)
        .unwrap();
    assert_eq!(sent["type"], "PHYSICAL");
    assert_eq!(sent["category"], "SOFTWARE");
}

#[tokio::test]
async fn test_invalid_product_type_makes_no_remote_call() {
    let sandbox = create_sandbox();
    let reconciler = ProductReconciler::new(sandbox.clone());
    let mut tree = product_tree();
    tree.insert("type".into(), AttributeValue::from("bogus"));

    let err = reconciler.create(&tree).await.unwrap_err();

    match err {
        ReconcileError::Validation(validation) => assert!(matches!(
            validation.issues(),
            [ValidationIssue::InvalidEnumValue { path, value, .. }] if path == "type" && value == "bogus"
        )),
        other => panic!("expected a validation error, got {other:?}"),
    }
    assert_eq!(sandbox.total_calls().await, 0);
}

#[tokio::test]
async fn test_product_delete_marks_as_removed_and_releases() {
    let sandbox = create_sandbox();
    let reconciler = ProductReconciler::new(sandbox.clone());
    let mut handle = ResourceHandle::absent(ResourceKind::CatalogProduct);
    let created = handle.create(&reconciler, &product_tree()).await.unwrap();

    let outcome = handle.delete(&reconciler).await.unwrap();

    assert_eq!(outcome, DeleteOutcome::SoftDeleted);
    assert!(outcome.remote_persists());
    assert_eq!(handle.id(), None);

    let sent = sandbox
        .last_call(RemoteOperation::UpdateProduct)
        .await
        .and_then(|call| call.request)
        .unwrap();
    assert_eq!(sent["name"], "(removed) Widget");
    assert_eq!(sent["description"], "(removed) desc");

    let remote = sandbox.get_product(&created.id).await.unwrap();
    assert_eq!(remote.name, "(removed) Widget");
    assert_eq!(sandbox.product_count(), 1);
}

#[tokio::test]
async fn test_product_update_pushes_changes() {
    let sandbox = create_sandbox();
    let reconciler = ProductReconciler::new(sandbox.clone());
    let mut handle = ResourceHandle::absent(ResourceKind::CatalogProduct);
    handle.create(&reconciler, &product_tree()).await.unwrap();

    let mut desired = product_tree();
    desired.insert("type".into(), AttributeValue::from("digital"));
    let outcome = handle.update(&reconciler, &desired).await.unwrap();

    assert_eq!(outcome.changes.len(), 1);
    assert_eq!(outcome.changes[0].path, "type");
    assert_eq!(
        outcome.observed.attributes.get("type"),
        Some(&AttributeValue::from("digital"))
    );
}

#[tokio::test]
async fn test_read_of_missing_product_is_not_found() {
    let sandbox = create_sandbox();
    let reconciler = ProductReconciler::new(sandbox);

    let err = reconciler.read("PROD-MISSING").await.unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "paypal_catalog_product PROD-MISSING not found");
}

// =============================================================================
// Subscription plans
// =============================================================================

#[tokio::test]
async fn test_plan_create_sends_upper_case_enums() {
    let sandbox = create_sandbox();
    let (_, handle) = plan_fixture(&sandbox).await;
    let observed = handle.observed().unwrap();

    assert!(observed.id.starts_with("P-"));
    assert_eq!(
        observed.attributes.get("status"),
        Some(&AttributeValue::from("ACTIVE"))
    );

    let plan = sandbox.get_subscription_plan(&observed.id).await.unwrap();
    assert_eq!(plan.billing_cycles[0].tenure_type, "TRIAL");
    assert_eq!(plan.billing_cycles[1].frequency.interval_unit, "MONTH");
    assert_eq!(plan.payment_preferences.setup_fee_failure_action, "CONTINUE");
}

#[tokio::test]
async fn test_declared_plan_status_is_accepted_in_any_case() {
    let sandbox = create_sandbox();
    let product = ProductReconciler::new(sandbox.clone())
        .create(&product_tree())
        .await
        .unwrap();
    let plans = PlanReconciler::new(sandbox.clone());

    let mut desired = plan_tree(&product.id, "1.50");
    desired.insert("status".into(), "active".into());
    let observed = plans.create(&desired).await.unwrap();

    assert_eq!(
        observed.attributes.get("status"),
        Some(&AttributeValue::from("ACTIVE"))
    );
    assert!(plans.schema().diff(&observed.attributes, &desired).is_empty());
}

#[tokio::test]
async fn test_plan_observed_state_matches_declared() {
    let sandbox = create_sandbox();
    let (plans, handle) = plan_fixture(&sandbox).await;
    let observed = handle.observed().unwrap();
    let product_id = observed.attributes["product_id"].as_str().unwrap();

    let changes = plans
        .schema()
        .diff(&observed.attributes, &plan_tree(product_id, "1.50"));
    assert!(changes.is_empty(), "unexpected changes: {changes:?}");
}

#[tokio::test]
async fn test_numerically_equal_money_is_not_an_update() {
    let sandbox = create_sandbox();
    let (plans, mut handle) = plan_fixture(&sandbox).await;
    let product_id = handle.observed().unwrap().attributes["product_id"]
        .as_str()
        .unwrap()
        .to_string();

    let outcome = handle
        .update(&plans, &plan_tree(&product_id, "1.5"))
        .await
        .unwrap();
    assert!(outcome.is_noop());
    // Only the fresh read that the comparison runs against.
    assert_eq!(sandbox.call_count(RemoteOperation::GetSubscriptionPlan).await, 1);
    assert_eq!(sandbox.total_calls().await, 1);

    let outcome = handle
        .update(&plans, &plan_tree(&product_id, "2.00"))
        .await
        .unwrap();
    assert_eq!(
        outcome.changes[0].path,
        "payment_preferences.0.setup_fee.0.value"
    );
    assert_eq!(
        sandbox
            .call_count(RemoteOperation::UpdateSubscriptionPlan)
            .await,
        1
    );
}

#[tokio::test]
async fn test_plan_update_issues_pricing_after_general_update() {
    let sandbox = create_sandbox();
    let (plans, mut handle) = plan_fixture(&sandbox).await;
    let product_id = handle.observed().unwrap().attributes["product_id"]
        .as_str()
        .unwrap()
        .to_string();

    let mut desired = plan_tree(&product_id, "1.50");
    desired.insert("name".into(), AttributeValue::from("Basic plus"));
    handle.update(&plans, &desired).await.unwrap();

    let operations: Vec<RemoteOperation> = sandbox
        .calls()
        .await
        .into_iter()
        .map(|call| call.operation)
        .collect();
    assert_eq!(
        operations,
        vec![
            RemoteOperation::GetSubscriptionPlan,
            RemoteOperation::UpdateSubscriptionPlan,
            RemoteOperation::UpdateSubscriptionPlanPricing,
            RemoteOperation::GetSubscriptionPlan,
        ]
    );

    let general = sandbox
        .last_call(RemoteOperation::UpdateSubscriptionPlan)
        .await
        .and_then(|call| call.request)
        .unwrap();
    assert!(general.get("billing_cycles").is_none());

    let plan = sandbox
        .get_subscription_plan(handle.id().unwrap())
        .await
        .unwrap();
    assert_eq!(plan.name, "Basic plus");
    assert_eq!(plan.billing_cycles[1].pricing_scheme.version, Some(2));
}

#[tokio::test]
async fn test_pricing_failure_reports_partial_apply() {
    let sandbox = create_sandbox();
    let (plans, mut handle) = plan_fixture(&sandbox).await;
    let id = handle.id().unwrap().to_string();
    let product_id = handle.observed().unwrap().attributes["product_id"]
        .as_str()
        .unwrap()
        .to_string();

    let mut desired = plan_tree(&product_id, "1.50");
    desired.insert("name".into(), AttributeValue::from("Renamed"));
    sandbox.fail_next(
        RemoteOperation::UpdateSubscriptionPlanPricing,
        RemoteError::rejected("INVALID_PARAMETER_VALUE", "pricing locked"),
    );

    let err = handle.update(&plans, &desired).await.unwrap_err();

    match err {
        ReconcileError::PartiallyApplied {
            committed,
            failed,
            source,
            ..
        } => {
            assert_eq!(committed, vec![RemoteOperation::UpdateSubscriptionPlan]);
            assert_eq!(failed, RemoteOperation::UpdateSubscriptionPlanPricing);
            assert!(source.is_rejected());
        }
        other => panic!("expected partial apply, got {other:?}"),
    }

    // The general update stays committed and the handle keeps its old view.
    let plan = sandbox.get_subscription_plan(&id).await.unwrap();
    assert_eq!(plan.name, "Renamed");
    assert_eq!(
        handle.observed().unwrap().attributes.get("name"),
        Some(&AttributeValue::from("Basic"))
    );
}

#[tokio::test]
async fn test_unknown_billing_sequence_is_rejected_by_pricing_update() {
    let sandbox = create_sandbox();
    let (plans, handle) = plan_fixture(&sandbox).await;
    let id = handle.id().unwrap();
    let product_id = handle.observed().unwrap().attributes["product_id"]
        .as_str()
        .unwrap();

    let desired = attributes_from_json(json!({
        "product_id": product_id,
        "name": "Basic",
        "description": "Basic monthly",
        "billing_cycle": [{
            "sequence": 7,
            "total_cycles": 0,
            "tenure_type": "regular",
            "frequency": [{"interval_unit": "month", "interval_count": 1}],
            "pricing_scheme": [{"fixed_price": [{"value": "12", "currency_code": "USD"}]}]
        }],
        "payment_preferences": [{
            "auto_bill_outstanding": true,
            "setup_fee": [{"value": "1.50", "currency_code": "USD"}],
            "payment_failure_threshold": 3,
            "setup_fee_failure_action": "continue"
        }]
    }))
    .unwrap();

    let err = plans.update(id, &desired).await.unwrap_err();

    assert!(matches!(err, ReconcileError::PartiallyApplied { .. }));
    assert!(err.to_string().contains("sequence 7"));
}

#[tokio::test]
async fn test_plan_delete_deactivates() {
    let sandbox = create_sandbox();
    let (plans, mut handle) = plan_fixture(&sandbox).await;
    let id = handle.id().unwrap().to_string();

    let outcome = handle.delete(&plans).await.unwrap();

    assert_eq!(outcome, DeleteOutcome::Deactivated);
    assert_eq!(handle.state(), &HandleState::Absent);
    assert_eq!(
        sandbox
            .call_count(RemoteOperation::DeactivateSubscriptionPlan)
            .await,
        1
    );
    assert_eq!(sandbox.total_calls().await, 1);

    let plan = sandbox.get_subscription_plan(&id).await.unwrap();
    assert_eq!(plan.status.as_deref(), Some("INACTIVE"));
}

#[tokio::test]
async fn test_failed_deactivation_keeps_reference() {
    let sandbox = create_sandbox();
    let (plans, mut handle) = plan_fixture(&sandbox).await;
    let id = handle.id().unwrap().to_string();
    sandbox.fail_next(
        RemoteOperation::DeactivateSubscriptionPlan,
        RemoteError::transport("connection reset"),
    );

    let err = handle.delete(&plans).await.unwrap_err();

    assert!(matches!(
        err,
        ReconcileError::Remote {
            operation: RemoteOperation::DeactivateSubscriptionPlan,
            ..
        }
    ));
    assert!(err.is_retryable());
    assert_eq!(handle.id(), Some(id.as_str()));
}

// =============================================================================
// Webhooks
// =============================================================================

#[tokio::test]
async fn test_webhook_event_names_are_upper_cased() {
    let sandbox = create_sandbox();
    let reconciler = WebhookReconciler::new(sandbox.clone());

    let observed = reconciler
        .create(&webhook_tree(
            "https://example.com/hook",
            &["TEST_NaMe_1", "test_name_3"],
        ))
        .await
        .unwrap();

    assert_eq!(
        observed.attributes["event_types"],
        AttributeValue::List(vec!["TEST_NAME_1".into(), "TEST_NAME_3".into()])
    );
    // Observed state comes from the create response.
    assert_eq!(sandbox.call_count(RemoteOperation::GetWebhook).await, 0);
}

#[tokio::test]
async fn test_webhook_update_and_delete() {
    let sandbox = create_sandbox();
    let reconciler = WebhookReconciler::new(sandbox.clone());
    let mut handle = ResourceHandle::absent(ResourceKind::NotificationWebhook);
    handle
        .create(
            &reconciler,
            &webhook_tree("https://example.com/a", &["PAYMENT.SALE.COMPLETED"]),
        )
        .await
        .unwrap();

    let outcome = handle
        .update(
            &reconciler,
            &webhook_tree("https://example.com/b", &["PAYMENT.SALE.COMPLETED"]),
        )
        .await
        .unwrap();
    assert_eq!(
        outcome.observed.attributes["url"],
        AttributeValue::from("https://example.com/b")
    );

    let id = handle.id().unwrap().to_string();
    assert_eq!(handle.delete(&reconciler).await.unwrap(), DeleteOutcome::Deleted);
    assert!(reconciler.read(&id).await.unwrap_err().is_not_found());
    assert_eq!(sandbox.webhook_count(), 0);
}

#[tokio::test]
async fn test_duplicate_webhook_url_leaves_handle_absent() {
    let sandbox = create_sandbox();
    let reconciler = WebhookReconciler::new(sandbox.clone());
    let tree = webhook_tree("https://example.com/hook", &["PAYMENT.SALE.COMPLETED"]);
    reconciler.create(&tree).await.unwrap();

    let mut handle = ResourceHandle::absent(ResourceKind::NotificationWebhook);
    let err = handle.create(&reconciler, &tree).await.unwrap_err();

    assert!(matches!(err, ReconcileError::Remote { .. }));
    assert_eq!(handle.state(), &HandleState::Absent);
}

#[tokio::test]
async fn test_import_enters_present_by_reading() {
    let sandbox = create_sandbox();
    let existing = sandbox
        .create_webhook(&Webhook {
            id: String::new(),
            url: "https://example.com/legacy".into(),
            event_types: vec![WebhookEventType::named("BILLING.PLAN.CREATED")],
        })
        .await
        .unwrap();
    sandbox.clear_calls().await;

    let reconciler = WebhookReconciler::new(sandbox.clone());
    let mut handle = ResourceHandle::absent(ResourceKind::NotificationWebhook);
    let observed = handle.import(&reconciler, &existing.id).await.unwrap();

    assert_eq!(observed.id, existing.id);
    assert_eq!(handle.id(), Some(existing.id.as_str()));
    assert_eq!(sandbox.call_count(RemoteOperation::GetWebhook).await, 1);
}
