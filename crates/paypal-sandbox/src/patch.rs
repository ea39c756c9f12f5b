//! JSON Patch (RFC 6902) application for webhook updates.

use json_patch::{Patch, PatchOperation, patch};
use paypal_remote::{RemoteError, Webhook};

/// Applies `operations` to a copy of `webhook`.
///
/// Patches that touch `/id` are refused, as is any patch whose result no
/// longer has the shape of a webhook.
pub(crate) fn apply_webhook_patch(webhook: &Webhook, operations: &Patch) -> Result<Webhook, RemoteError> {
    for op in &operations.0 {
        let path = operation_path(op);
        if path == "/id" || path.starts_with("/id/") {
            return Err(RemoteError::rejected(
                "INVALID_REQUEST",
                "Cannot modify id with patch",
            ));
        }
    }

    let mut document = serde_json::to_value(webhook)
        .map_err(|e| RemoteError::internal(format!("webhook serialization failed: {e}")))?;
    patch(&mut document, operations)
        .map_err(|e| RemoteError::rejected("INVALID_REQUEST", format!("Patch operation failed: {e}")))?;

    let mut patched: Webhook = serde_json::from_value(document).map_err(|e| {
        RemoteError::rejected("INVALID_REQUEST", format!("Patched webhook is invalid: {e}"))
    })?;
    patched.id = webhook.id.clone();
    Ok(patched)
}

fn operation_path(op: &PatchOperation) -> &str {
    match op {
        PatchOperation::Add(add_op) => add_op.path.as_str(),
        PatchOperation::Remove(remove_op) => remove_op.path.as_str(),
        PatchOperation::Replace(replace_op) => replace_op.path.as_str(),
        PatchOperation::Move(move_op) => move_op.path.as_str(),
        PatchOperation::Copy(copy_op) => copy_op.path.as_str(),
        PatchOperation::Test(test_op) => test_op.path.as_str(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use paypal_remote::WebhookEventType;
    use serde_json::json;

    fn webhook() -> Webhook {
        Webhook {
            id: "WH-1".into(),
            url: "https://example.com/a".into(),
            event_types: vec![WebhookEventType::named("PAYMENT.SALE.COMPLETED")],
        }
    }

    fn ops(value: serde_json::Value) -> Patch {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_replace_url_and_event_types() {
        let patched = apply_webhook_patch(
            &webhook(),
            &ops(json!([
                {"op": "replace", "path": "/url", "value": "https://example.com/b"},
                {"op": "replace", "path": "/event_types", "value": [{"name": "BILLING.PLAN.CREATED"}]}
            ])),
        )
        .unwrap();

        assert_eq!(patched.id, "WH-1");
        assert_eq!(patched.url, "https://example.com/b");
        assert_eq!(patched.event_types, vec![WebhookEventType::named("BILLING.PLAN.CREATED")]);
    }

    #[test]
    fn test_id_is_protected() {
        let err = apply_webhook_patch(
            &webhook(),
            &ops(json!([{"op": "replace", "path": "/id", "value": "WH-2"}])),
        )
        .unwrap_err();
        assert!(err.is_rejected());
    }

    #[test]
    fn test_result_must_remain_a_webhook() {
        let err = apply_webhook_patch(
            &webhook(),
            &ops(json!([{"op": "remove", "path": "/url"}])),
        )
        .unwrap_err();
        assert!(err.to_string().contains("Patched webhook is invalid"));
    }

    #[test]
    fn test_failed_test_operation_is_rejected() {
        let err = apply_webhook_patch(
            &webhook(),
            &ops(json!([{"op": "test", "path": "/url", "value": "https://other"}])),
        )
        .unwrap_err();
        assert!(err.is_rejected());
    }
}
