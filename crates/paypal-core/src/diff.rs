//! Schema-aware change detection between observed and desired state.

use serde::Serialize;

use crate::attribute::{AttributeMap, AttributeValue};
use crate::schema::{BlockSchema, FieldSchema, FieldType, ResourceSchema};

/// One attribute whose desired value differs meaningfully from the observed one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeChange {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<AttributeValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<AttributeValue>,
}

/// Compares `observed` against `desired` field by field.
///
/// Computed fields that the desired tree leaves out keep their observed
/// value and are not reported. String fields carrying an equivalence rule
/// are compared with that rule instead of textually, and enumerated or
/// case-insensitive fields ignore ASCII case.
pub fn diff(
    schema: &ResourceSchema,
    observed: &AttributeMap,
    desired: &AttributeMap,
) -> Vec<AttributeChange> {
    let mut changes = Vec::new();
    diff_block(&schema.fields, observed, desired, "", &mut changes);
    changes
}

/// True when applying `desired` would change the remote resource.
pub fn has_changes(schema: &ResourceSchema, observed: &AttributeMap, desired: &AttributeMap) -> bool {
    !diff(schema, observed, desired).is_empty()
}

fn diff_block(
    block: &BlockSchema,
    observed: &AttributeMap,
    desired: &AttributeMap,
    prefix: &str,
    changes: &mut Vec<AttributeChange>,
) {
    for (name, field) in block.fields() {
        let path = if prefix.is_empty() {
            name.to_string()
        } else {
            format!("{prefix}.{name}")
        };
        let before = observed.get(name);
        let after = desired.get(name);

        match (before, after) {
            (None, None) => {}
            (Some(_), None) if field.presence.is_computed() => {}
            (Some(before), Some(after)) => diff_value(field, before, after, &path, changes),
            (before, after) => changes.push(AttributeChange {
                path,
                before: before.cloned(),
                after: after.cloned(),
            }),
        }
    }
}

fn diff_value(
    field: &FieldSchema,
    before: &AttributeValue,
    after: &AttributeValue,
    path: &str,
    changes: &mut Vec<AttributeChange>,
) {
    if before == after || (field.is_case_insensitive() && same_ignoring_case(before, after)) {
        return;
    }

    match (&field.field_type, before, after) {
        (FieldType::Scalar(_), AttributeValue::String(old), AttributeValue::String(new))
            if field.equivalence.is_some_and(|eq| eq.equivalent(old, new)) => {}
        (FieldType::Block(block), AttributeValue::List(old), AttributeValue::List(new))
            if old.len() == new.len() =>
        {
            for (i, (old, new)) in old.iter().zip(new).enumerate() {
                let item_path = format!("{path}.{i}");
                match (old.as_object(), new.as_object()) {
                    (Some(old), Some(new)) => diff_block(block, old, new, &item_path, changes),
                    _ if old != new => changes.push(AttributeChange {
                        path: item_path,
                        before: Some(old.clone()),
                        after: Some(new.clone()),
                    }),
                    _ => {}
                }
            }
        }
        _ => changes.push(AttributeChange {
            path: path.to_string(),
            before: Some(before.clone()),
            after: Some(after.clone()),
        }),
    }
}

/// Scalars and lists of strings equal under ASCII case folding.
fn same_ignoring_case(before: &AttributeValue, after: &AttributeValue) -> bool {
    match (before, after) {
        (AttributeValue::String(old), AttributeValue::String(new)) => old.eq_ignore_ascii_case(new),
        (AttributeValue::List(old), AttributeValue::List(new)) => {
            old.len() == new.len()
                && old
                    .iter()
                    .zip(new)
                    .all(|(o, n)| o == n || same_ignoring_case(o, n))
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::attributes_from_json;
    use crate::equivalence::Equivalence;
    use crate::kind::ResourceKind;
    use crate::schema::ScalarKind;
    use serde_json::json;

    fn schema() -> ResourceSchema {
        let money = BlockSchema::new()
            .field(
                "value",
                FieldSchema::string()
                    .required()
                    .equivalence(Equivalence::NumericString),
            )
            .field("currency_code", FieldSchema::string().required());
        ResourceSchema::new(ResourceKind::SubscriptionPlan, "test")
            .field("name", FieldSchema::string().required())
            .field("status", FieldSchema::string().optional_computed())
            .field("tags", FieldSchema::list(ScalarKind::String).optional())
            .field("kind", FieldSchema::string().optional().one_of(&["physical", "digital"]))
            .field(
                "events",
                FieldSchema::list(ScalarKind::String).optional().ignore_case(),
            )
            .field("setup_fee", FieldSchema::block(money).required().max_items(1))
    }

    fn tree(value: serde_json::Value) -> AttributeMap {
        attributes_from_json(value).unwrap()
    }

    #[test]
    fn test_numeric_formatting_is_not_a_change() {
        let observed = tree(json!({
            "name": "Basic",
            "status": "ACTIVE",
            "setup_fee": [{"value": "10.00", "currency_code": "USD"}]
        }));
        let desired = tree(json!({
            "name": "Basic",
            "setup_fee": [{"value": "10", "currency_code": "USD"}]
        }));
        assert!(diff(&schema(), &observed, &desired).is_empty());
        assert!(!has_changes(&schema(), &observed, &desired));
    }

    #[test]
    fn test_nested_change_is_reported_at_its_path() {
        let observed = tree(json!({"name": "Basic", "setup_fee": [{"value": "10.00", "currency_code": "USD"}]}));
        let desired = tree(json!({"name": "Basic", "setup_fee": [{"value": "12.5", "currency_code": "USD"}]}));

        let changes = diff(&schema(), &observed, &desired);
        assert_eq!(
            changes,
            vec![AttributeChange {
                path: "setup_fee.0.value".to_string(),
                before: Some("10.00".into()),
                after: Some("12.5".into()),
            }]
        );
    }

    #[test]
    fn test_added_removed_and_list_changes() {
        let observed = tree(json!({"name": "Basic", "tags": ["a"], "setup_fee": []}));
        let desired = tree(json!({
            "name": "Premium",
            "status": "INACTIVE",
            "setup_fee": [{"value": "1", "currency_code": "EUR"}]
        }));

        let paths: Vec<String> = diff(&schema(), &observed, &desired)
            .into_iter()
            .map(|c| c.path)
            .collect();
        assert_eq!(paths, vec!["name", "status", "tags", "setup_fee"]);
    }

    #[test]
    fn test_unparseable_amounts_always_differ() {
        let observed = tree(json!({"name": "n", "setup_fee": [{"value": "ten", "currency_code": "USD"}]}));
        let desired = tree(json!({"name": "n", "setup_fee": [{"value": "10", "currency_code": "USD"}]}));
        assert!(has_changes(&schema(), &observed, &desired));
    }

    #[test]
    fn test_enum_and_case_insensitive_lists_ignore_case() {
        let observed = tree(json!({
            "name": "Basic",
            "kind": "physical",
            "events": ["PAYMENT.SALE.COMPLETED"],
            "setup_fee": []
        }));
        let desired = tree(json!({
            "name": "Basic",
            "kind": "PHYSICAL",
            "events": ["payment.sale.completed"],
            "setup_fee": []
        }));
        assert!(diff(&schema(), &observed, &desired).is_empty());

        let mut renamed = observed.clone();
        renamed.insert("name".into(), "basic".into());
        let paths: Vec<String> = diff(&schema(), &observed, &renamed)
            .into_iter()
            .map(|c| c.path)
            .collect();
        assert_eq!(paths, vec!["name"]);
    }
}
