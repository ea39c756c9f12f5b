//! Translation between attribute trees and remote objects.
//!
//! Each resource kind has a [`Translator`]. Letter case of enumerated values
//! follows a per-field table ([`field_case`]) instead of a global rule,
//! because the remote API is not consistent about it: most enums round-trip
//! to lower case, webhook event names stay upper case, and product category
//! is free text that passes through untouched.
//!
//! `to_remote` assumes a validated tree. It still never panics on a bad one:
//! any shape it cannot translate is a [`TranslateError::MalformedComposite`].

mod plan;
mod product;
mod webhook;

use paypal_core::{AttributeMap, AttributeValue, ResourceKind};
use paypal_remote::{Money, Product, SubscriptionPlan, Webhook};
use serde::Serialize;

pub use plan::PlanTranslator;
pub use product::ProductTranslator;
pub use webhook::WebhookTranslator;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TranslateError {
    #[error("malformed {path}: {reason}")]
    MalformedComposite { path: String, reason: String },
}

impl TranslateError {
    pub(crate) fn malformed(path: &str, reason: impl Into<String>) -> Self {
        Self::MalformedComposite {
            path: path.to_string(),
            reason: reason.into(),
        }
    }
}

/// Converts one resource kind between its attribute tree and remote shape.
pub trait Translator {
    type Remote;

    fn to_remote(&self, tree: &AttributeMap) -> Result<Self::Remote, TranslateError>;

    fn from_remote(&self, remote: &Self::Remote) -> AttributeMap;
}

/// A remote object of any kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RemoteObject {
    Product(Product),
    SubscriptionPlan(SubscriptionPlan),
    Webhook(Webhook),
}

impl RemoteObject {
    pub fn kind(&self) -> ResourceKind {
        match self {
            Self::Product(_) => ResourceKind::CatalogProduct,
            Self::SubscriptionPlan(_) => ResourceKind::SubscriptionPlan,
            Self::Webhook(_) => ResourceKind::NotificationWebhook,
        }
    }
}

/// Translates `tree` into the remote shape of `kind`.
pub fn to_remote(tree: &AttributeMap, kind: ResourceKind) -> Result<RemoteObject, TranslateError> {
    Ok(match kind {
        ResourceKind::CatalogProduct => RemoteObject::Product(ProductTranslator.to_remote(tree)?),
        ResourceKind::SubscriptionPlan => {
            RemoteObject::SubscriptionPlan(PlanTranslator.to_remote(tree)?)
        }
        ResourceKind::NotificationWebhook => {
            RemoteObject::Webhook(WebhookTranslator.to_remote(tree)?)
        }
    })
}

pub fn from_remote(remote: &RemoteObject) -> AttributeMap {
    match remote {
        RemoteObject::Product(product) => ProductTranslator.from_remote(product),
        RemoteObject::SubscriptionPlan(plan) => PlanTranslator.from_remote(plan),
        RemoteObject::Webhook(webhook) => WebhookTranslator.from_remote(webhook),
    }
}

/// How letter case of a field changes between tree and remote object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldCase {
    /// Upper case outbound, lower case inbound.
    Enum,
    /// Upper case outbound, stored form inbound.
    UpperOnly,
    /// Unchanged both ways.
    Verbatim,
}

impl FieldCase {
    pub fn outbound(self, value: &str) -> String {
        match self {
            Self::Enum | Self::UpperOnly => value.to_uppercase(),
            Self::Verbatim => value.to_string(),
        }
    }

    pub fn inbound(self, value: &str) -> String {
        match self {
            Self::Enum => value.to_lowercase(),
            Self::UpperOnly | Self::Verbatim => value.to_string(),
        }
    }
}

/// Case handling per field, addressed by path without list indices.
const CASE_TABLE: &[(ResourceKind, &str, FieldCase)] = &[
    (ResourceKind::CatalogProduct, "type", FieldCase::Enum),
    (ResourceKind::CatalogProduct, "category", FieldCase::Verbatim),
    (ResourceKind::SubscriptionPlan, "status", FieldCase::UpperOnly),
    (ResourceKind::SubscriptionPlan, "billing_cycle.tenure_type", FieldCase::Enum),
    (
        ResourceKind::SubscriptionPlan,
        "billing_cycle.frequency.interval_unit",
        FieldCase::Enum,
    ),
    (
        ResourceKind::SubscriptionPlan,
        "payment_preferences.setup_fee_failure_action",
        FieldCase::Enum,
    ),
    (ResourceKind::NotificationWebhook, "event_types", FieldCase::UpperOnly),
];

/// Case handling for `path` of `kind`; fields not in the table are verbatim.
pub fn field_case(kind: ResourceKind, path: &str) -> FieldCase {
    CASE_TABLE
        .iter()
        .find(|(k, p, _)| *k == kind && *p == path)
        .map(|(_, _, case)| *case)
        .unwrap_or(FieldCase::Verbatim)
}

/// Read access to one object node of a tree, tracking its dotted path.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Node<'a> {
    map: &'a AttributeMap,
    path: &'a str,
}

/// An owned path plus node, for nested blocks whose path is built on the fly.
pub(crate) struct Block<'a> {
    map: &'a AttributeMap,
    path: String,
}

impl<'a> Block<'a> {
    pub(crate) fn node(&self) -> Node<'_> {
        Node {
            map: self.map,
            path: &self.path,
        }
    }
}

impl<'a> Node<'a> {
    pub(crate) fn root(map: &'a AttributeMap) -> Self {
        Self { map, path: "" }
    }

    fn child(&self, key: &str) -> String {
        if self.path.is_empty() {
            key.to_string()
        } else {
            format!("{}.{key}", self.path)
        }
    }

    fn required(&self, key: &str) -> Result<&'a AttributeValue, TranslateError> {
        self.map
            .get(key)
            .ok_or_else(|| TranslateError::malformed(&self.child(key), "missing required attribute"))
    }

    fn mismatch(&self, key: &str, expected: &str, found: &AttributeValue) -> TranslateError {
        TranslateError::malformed(
            &self.child(key),
            format!("expected {expected}, found {}", found.type_name()),
        )
    }

    pub(crate) fn str(&self, key: &str) -> Result<&'a str, TranslateError> {
        let value = self.required(key)?;
        value.as_str().ok_or_else(|| self.mismatch(key, "string", value))
    }

    pub(crate) fn opt_str(&self, key: &str) -> Result<Option<&'a str>, TranslateError> {
        match self.map.get(key) {
            None => Ok(None),
            Some(value) => value
                .as_str()
                .map(Some)
                .ok_or_else(|| self.mismatch(key, "string", value)),
        }
    }

    pub(crate) fn int(&self, key: &str) -> Result<i64, TranslateError> {
        let value = self.required(key)?;
        value.as_i64().ok_or_else(|| self.mismatch(key, "integer", value))
    }

    pub(crate) fn opt_int(&self, key: &str) -> Result<Option<i64>, TranslateError> {
        match self.map.get(key) {
            None => Ok(None),
            Some(value) => value
                .as_i64()
                .map(Some)
                .ok_or_else(|| self.mismatch(key, "integer", value)),
        }
    }

    pub(crate) fn bool(&self, key: &str) -> Result<bool, TranslateError> {
        let value = self.required(key)?;
        value.as_bool().ok_or_else(|| self.mismatch(key, "boolean", value))
    }

    pub(crate) fn opt_bool(&self, key: &str) -> Result<Option<bool>, TranslateError> {
        match self.map.get(key) {
            None => Ok(None),
            Some(value) => value
                .as_bool()
                .map(Some)
                .ok_or_else(|| self.mismatch(key, "boolean", value)),
        }
    }

    /// Scalar strings of a list field.
    pub(crate) fn strings(&self, key: &str) -> Result<Vec<&'a str>, TranslateError> {
        let value = self.required(key)?;
        let items = value
            .as_list()
            .ok_or_else(|| self.mismatch(key, "list", value))?;
        items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                item.as_str().ok_or_else(|| {
                    TranslateError::malformed(
                        &format!("{}.{i}", self.child(key)),
                        format!("expected string, found {}", item.type_name()),
                    )
                })
            })
            .collect()
    }

    /// Every element of a nested block list, in order.
    pub(crate) fn blocks(&self, key: &str) -> Result<Vec<Block<'a>>, TranslateError> {
        let value = self.required(key)?;
        let items = value
            .as_list()
            .ok_or_else(|| self.mismatch(key, "list", value))?;
        let base = self.child(key);
        items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let path = format!("{base}.{i}");
                match item.as_object() {
                    Some(map) => Ok(Block { map, path }),
                    None => Err(TranslateError::malformed(
                        &path,
                        format!("expected object, found {}", item.type_name()),
                    )),
                }
            })
            .collect()
    }

    /// The single element of a block that must hold exactly one.
    pub(crate) fn singleton(&self, key: &str) -> Result<Block<'a>, TranslateError> {
        let mut blocks = self.blocks(key)?;
        match blocks.len() {
            1 => Ok(blocks.remove(0)),
            n => Err(TranslateError::malformed(
                &self.child(key),
                format!("expected exactly one element, found {n}"),
            )),
        }
    }

    /// The element of a block that holds at most one; absent or empty is `None`.
    pub(crate) fn opt_singleton(&self, key: &str) -> Result<Option<Block<'a>>, TranslateError> {
        if !self.map.contains_key(key) {
            return Ok(None);
        }
        let mut blocks = self.blocks(key)?;
        match blocks.len() {
            0 => Ok(None),
            1 => Ok(Some(blocks.remove(0))),
            n => Err(TranslateError::malformed(
                &self.child(key),
                format!("expected at most one element, found {n}"),
            )),
        }
    }
}

pub(crate) fn money_to_remote(node: Node<'_>) -> Result<Money, TranslateError> {
    Ok(Money::new(node.str("value")?, node.str("currency_code")?))
}

pub(crate) fn money_from_remote(money: &Money) -> AttributeValue {
    AttributeValue::block(paypal_core::attribute_map([
        ("value", money.value.as_str()),
        ("currency_code", money.currency_code.as_str()),
    ]))
}
