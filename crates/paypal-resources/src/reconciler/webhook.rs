use async_trait::async_trait;
use json_patch::Patch;
use paypal_core::{AttributeMap, ResourceKind, ResourceSchema};
use paypal_remote::{DynRemoteClient, RemoteOperation, Webhook};
use serde_json::json;
use tracing::{debug, info};

use super::{DeleteOutcome, ObservedResource, ResourceReconciler};
use crate::error::{ReconcileError, Result};
use crate::schemas::schema_for;
use crate::translate::{Translator, WebhookTranslator};

const KIND: ResourceKind = ResourceKind::NotificationWebhook;

/// Webhooks are the one kind with a real delete. Updates are sent as JSON
/// Patch `replace` operations.
pub struct WebhookReconciler {
    client: DynRemoteClient,
}

impl WebhookReconciler {
    pub fn new(client: DynRemoteClient) -> Self {
        Self { client }
    }

    fn observed(webhook: &Webhook) -> ObservedResource {
        ObservedResource {
            id: webhook.id.clone(),
            attributes: WebhookTranslator.from_remote(webhook),
        }
    }
}

/// The replace operations that turn any webhook into `webhook`.
pub(crate) fn replace_patch(webhook: &Webhook) -> Result<Patch> {
    let operations = json!([
        {"op": "replace", "path": "/url", "value": webhook.url},
        {"op": "replace", "path": "/event_types", "value": webhook.event_types},
    ]);
    serde_json::from_value(operations).map_err(|e| ReconcileError::MalformedComposite {
        path: "event_types".into(),
        reason: format!("cannot express update as JSON Patch: {e}"),
    })
}

#[async_trait]
impl ResourceReconciler for WebhookReconciler {
    fn kind(&self) -> ResourceKind {
        KIND
    }

    fn schema(&self) -> &'static ResourceSchema {
        schema_for(KIND)
    }

    /// Observed state comes from the create response; no read follows.
    async fn create(&self, desired: &AttributeMap) -> Result<ObservedResource> {
        self.validate(desired)?;
        let webhook = WebhookTranslator.to_remote(desired)?;

        let created = self
            .client
            .create_webhook(&webhook)
            .await
            .map_err(|e| ReconcileError::remote(KIND, "", RemoteOperation::CreateWebhook, e))?;
        info!(kind = %KIND, id = %created.id, url = %created.url, "Created webhook");

        Ok(Self::observed(&created))
    }

    async fn read(&self, id: &str) -> Result<ObservedResource> {
        let webhook = self
            .client
            .get_webhook(id)
            .await
            .map_err(|e| ReconcileError::remote(KIND, id, RemoteOperation::GetWebhook, e))?;
        debug!(kind = %KIND, id = %id, "Read webhook");

        Ok(Self::observed(&webhook))
    }

    async fn update(&self, id: &str, desired: &AttributeMap) -> Result<ObservedResource> {
        self.validate(desired)?;
        let webhook = WebhookTranslator.to_remote(desired)?;
        let patch = replace_patch(&webhook)?;

        self.client
            .update_webhook(id, &patch)
            .await
            .map_err(|e| ReconcileError::remote(KIND, id, RemoteOperation::UpdateWebhook, e))?;

        self.read(id).await
    }

    async fn delete(&self, id: &str) -> Result<DeleteOutcome> {
        self.client
            .delete_webhook(id)
            .await
            .map_err(|e| ReconcileError::remote(KIND, id, RemoteOperation::DeleteWebhook, e))?;
        info!(kind = %KIND, id = %id, "Deleted webhook");

        Ok(DeleteOutcome::Deleted)
    }
}
