use paypal_core::{AttributeMap, AttributeValue, ResourceKind, attribute_map};
use paypal_remote::{Webhook, WebhookEventType};

use super::{Node, TranslateError, Translator, field_case};

const KIND: ResourceKind = ResourceKind::NotificationWebhook;

/// Event names are upper-cased outbound and come back exactly as stored.
pub struct WebhookTranslator;

impl Translator for WebhookTranslator {
    type Remote = Webhook;

    fn to_remote(&self, tree: &AttributeMap) -> Result<Webhook, TranslateError> {
        let root = Node::root(tree);
        let case = field_case(KIND, "event_types");
        Ok(Webhook {
            id: String::new(),
            url: root.str("url")?.to_string(),
            event_types: root
                .strings("event_types")?
                .into_iter()
                .map(|name| WebhookEventType::named(case.outbound(name)))
                .collect(),
        })
    }

    fn from_remote(&self, webhook: &Webhook) -> AttributeMap {
        let case = field_case(KIND, "event_types");
        attribute_map([
            ("url", AttributeValue::from(webhook.url.as_str())),
            (
                "event_types",
                AttributeValue::List(
                    webhook
                        .event_types
                        .iter()
                        .map(|event| case.inbound(&event.name).into())
                        .collect(),
                ),
            ),
        ])
    }
}
