//! Structural validation of desired state against a [`ResourceSchema`].
//!
//! Validation never talks to the remote API. All issues found in a tree are
//! collected so a caller can report them together.

use std::fmt;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::attribute::{AttributeMap, AttributeValue};
use crate::kind::ResourceKind;
use crate::schema::{BlockSchema, FieldSchema, FieldType, Presence, ResourceSchema, ScalarKind};

/// A single problem found in a desired-state tree.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "issue", rename_all = "snake_case")]
pub enum ValidationIssue {
    #[error("{path}: required attribute is missing")]
    MissingRequiredField { path: String },

    #[error("{path}: {value:?} is not one of {allowed:?}")]
    InvalidEnumValue {
        path: String,
        value: String,
        allowed: Vec<String>,
    },

    #[error("{path}: at most {max} item(s) allowed, found {actual}")]
    CardinalityExceeded {
        path: String,
        max: usize,
        actual: usize,
    },

    #[error("{path}: expected {expected}, found {found}")]
    TypeMismatch {
        path: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("{path}: at least {min} item(s) required, found {actual}")]
    TooFewItems {
        path: String,
        min: usize,
        actual: usize,
    },

    #[error("{path}: {value} is outside the range [{min}, {max}]")]
    ValueOutOfRange {
        path: String,
        value: i64,
        min: i64,
        max: i64,
    },

    #[error("{path}: must not be empty")]
    EmptyValue { path: String },

    #[error("{path}: attribute is computed and cannot be set")]
    ComputedFieldSet { path: String },

    #[error("{path}: unknown attribute")]
    UnknownField { path: String },
}

impl ValidationIssue {
    pub fn path(&self) -> &str {
        match self {
            Self::MissingRequiredField { path }
            | Self::InvalidEnumValue { path, .. }
            | Self::CardinalityExceeded { path, .. }
            | Self::TooFewItems { path, .. }
            | Self::TypeMismatch { path, .. }
            | Self::ValueOutOfRange { path, .. }
            | Self::EmptyValue { path }
            | Self::ComputedFieldSet { path }
            | Self::UnknownField { path } => path,
        }
    }
}

/// Outcome of validating one tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    /// Converts into a `Result`, attributing the issues to `kind`.
    pub fn into_result(self, kind: ResourceKind) -> Result<(), ValidationError> {
        if self.issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError {
                kind,
                issues: self.issues,
            })
        }
    }
}

/// A desired-state tree that violates its schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub kind: ResourceKind,
    pub issues: Vec<ValidationIssue>,
}

impl ValidationError {
    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}: ", self.kind)?;
        for (i, issue) in self.issues.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{issue}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Walks `schema` field by field and reports every violation in `tree`.
pub fn validate(tree: &AttributeMap, schema: &ResourceSchema) -> ValidationResult {
    let mut issues = Vec::new();
    validate_block(tree, &schema.fields, "", &mut issues);
    if !issues.is_empty() {
        debug!(kind = %schema.kind, issues = issues.len(), "Desired state failed validation");
    }
    ValidationResult { issues }
}

fn join(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}

fn validate_block(
    tree: &AttributeMap,
    block: &BlockSchema,
    prefix: &str,
    issues: &mut Vec<ValidationIssue>,
) {
    for (name, field) in block.fields() {
        let path = join(prefix, name);
        match tree.get(name) {
            None if field.presence.is_required() => {
                issues.push(ValidationIssue::MissingRequiredField { path });
            }
            None => {}
            Some(_) if field.presence == Presence::Computed => {
                issues.push(ValidationIssue::ComputedFieldSet { path });
            }
            Some(value) => validate_value(value, field, &path, issues),
        }
    }

    for name in tree.keys() {
        if block.get(name).is_none() {
            issues.push(ValidationIssue::UnknownField {
                path: join(prefix, name),
            });
        }
    }
}

fn validate_value(
    value: &AttributeValue,
    field: &FieldSchema,
    path: &str,
    issues: &mut Vec<ValidationIssue>,
) {
    match (&field.field_type, value) {
        (FieldType::Scalar(kind), value) => validate_scalar(value, *kind, field, path, issues),
        (FieldType::List(element), AttributeValue::List(items)) => {
            if field.non_empty && items.is_empty() {
                issues.push(ValidationIssue::EmptyValue {
                    path: path.to_string(),
                });
            }
            check_cardinality(items.len(), field, path, issues);
            for (i, item) in items.iter().enumerate() {
                validate_scalar(item, *element, field, &join(path, &i.to_string()), issues);
            }
        }
        (FieldType::Block(block), AttributeValue::List(items)) => {
            check_cardinality(items.len(), field, path, issues);
            for (i, item) in items.iter().enumerate() {
                let item_path = join(path, &i.to_string());
                match item {
                    AttributeValue::Object(nested) => {
                        validate_block(nested, block, &item_path, issues)
                    }
                    other => issues.push(ValidationIssue::TypeMismatch {
                        path: item_path,
                        expected: "object",
                        found: other.type_name(),
                    }),
                }
            }
        }
        (field_type, other) => issues.push(ValidationIssue::TypeMismatch {
            path: path.to_string(),
            expected: field_type.name(),
            found: other.type_name(),
        }),
    }
}

fn validate_scalar(
    value: &AttributeValue,
    kind: ScalarKind,
    field: &FieldSchema,
    path: &str,
    issues: &mut Vec<ValidationIssue>,
) {
    match (kind, value) {
        (ScalarKind::String, AttributeValue::String(s)) => {
            if field.non_empty && s.is_empty() {
                issues.push(ValidationIssue::EmptyValue {
                    path: path.to_string(),
                });
            }
            if let Some(allowed) = &field.allowed_values
                && !allowed.iter().any(|a| a.eq_ignore_ascii_case(s))
            {
                issues.push(ValidationIssue::InvalidEnumValue {
                    path: path.to_string(),
                    value: s.clone(),
                    allowed: allowed.clone(),
                });
            }
        }
        (ScalarKind::Integer, AttributeValue::Integer(i)) => {
            if let Some(range) = field.range
                && !range.contains(*i)
            {
                issues.push(ValidationIssue::ValueOutOfRange {
                    path: path.to_string(),
                    value: *i,
                    min: range.min,
                    max: range.max,
                });
            }
        }
        (ScalarKind::Boolean, AttributeValue::Boolean(_)) => {}
        (kind, other) => issues.push(ValidationIssue::TypeMismatch {
            path: path.to_string(),
            expected: kind.name(),
            found: other.type_name(),
        }),
    }
}

fn check_cardinality(
    actual: usize,
    field: &FieldSchema,
    path: &str,
    issues: &mut Vec<ValidationIssue>,
) {
    if let Some(min) = field.min_items
        && actual < min
    {
        issues.push(ValidationIssue::TooFewItems {
            path: path.to_string(),
            min,
            actual,
        });
    }
    if let Some(max) = field.max_items
        && actual > max
    {
        issues.push(ValidationIssue::CardinalityExceeded {
            path: path.to_string(),
            max,
            actual,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::attributes_from_json;
    use crate::schema::BlockSchema;
    use serde_json::json;

    fn schema() -> ResourceSchema {
        ResourceSchema::new(ResourceKind::SubscriptionPlan, "test")
            .field("name", FieldSchema::string().required())
            .field("status", FieldSchema::string().optional_computed())
            .field("create_time", FieldSchema::string().computed())
            .field(
                "billing_cycle",
                FieldSchema::block(
                    BlockSchema::new()
                        .field("sequence", FieldSchema::integer().required().range(1, 99))
                        .field(
                            "tenure_type",
                            FieldSchema::string().required().one_of(&["regular", "trial"]),
                        ),
                )
                .required()
                .max_items(2),
            )
            .field(
                "image_url",
                FieldSchema::string().optional().non_empty(),
            )
    }

    fn tree(value: serde_json::Value) -> AttributeMap {
        attributes_from_json(value).unwrap()
    }

    #[test]
    fn test_valid_tree() {
        let result = validate(
            &tree(json!({
                "name": "Basic",
                "status": "ACTIVE",
                "billing_cycle": [{"sequence": 1, "tenure_type": "REGULAR"}]
            })),
            &schema(),
        );
        assert!(result.is_valid(), "unexpected issues: {:?}", result.issues);
    }

    #[test]
    fn test_missing_required_fields_are_reported_with_paths() {
        let result = validate(&tree(json!({"billing_cycle": [{"sequence": 2}]})), &schema());
        let paths: Vec<&str> = result.issues.iter().map(ValidationIssue::path).collect();
        assert_eq!(paths, vec!["name", "billing_cycle.0.tenure_type"]);
        assert!(result
            .issues
            .iter()
            .all(|i| matches!(i, ValidationIssue::MissingRequiredField { .. })));
    }

    #[test]
    fn test_enum_comparison_is_case_insensitive() {
        let ok = validate(
            &tree(json!({"name": "a", "billing_cycle": [{"sequence": 1, "tenure_type": "TrIaL"}]})),
            &schema(),
        );
        assert!(ok.is_valid());

        let bad = validate(
            &tree(json!({"name": "a", "billing_cycle": [{"sequence": 1, "tenure_type": "bogus"}]})),
            &schema(),
        );
        assert_eq!(
            bad.issues,
            vec![ValidationIssue::InvalidEnumValue {
                path: "billing_cycle.0.tenure_type".to_string(),
                value: "bogus".to_string(),
                allowed: vec!["regular".to_string(), "trial".to_string()],
            }]
        );
    }

    #[test]
    fn test_cardinality_exceeded() {
        let cycle = json!({"sequence": 1, "tenure_type": "regular"});
        let result = validate(
            &tree(json!({"name": "a", "billing_cycle": [cycle.clone(), cycle.clone(), cycle]})),
            &schema(),
        );
        assert!(result.issues.contains(&ValidationIssue::CardinalityExceeded {
            path: "billing_cycle".to_string(),
            max: 2,
            actual: 3,
        }));
    }

    #[test]
    fn test_range_type_and_unknown_field_issues() {
        let result = validate(
            &tree(json!({
                "name": ["not", "a", "string"],
                "colour": "blue",
                "billing_cycle": [{"sequence": 100, "tenure_type": "trial"}, "flat"]
            })),
            &schema(),
        );

        assert!(result.issues.contains(&ValidationIssue::TypeMismatch {
            path: "name".to_string(),
            expected: "string",
            found: "list",
        }));
        assert!(result.issues.contains(&ValidationIssue::ValueOutOfRange {
            path: "billing_cycle.0.sequence".to_string(),
            value: 100,
            min: 1,
            max: 99,
        }));
        assert!(result.issues.contains(&ValidationIssue::TypeMismatch {
            path: "billing_cycle.1".to_string(),
            expected: "object",
            found: "string",
        }));
        assert!(result.issues.contains(&ValidationIssue::UnknownField {
            path: "colour".to_string(),
        }));
    }

    #[test]
    fn test_computed_and_empty_values() {
        let result = validate(
            &tree(json!({
                "name": "a",
                "create_time": "2024-01-01T00:00:00Z",
                "image_url": "",
                "billing_cycle": []
            })),
            &schema(),
        );
        assert_eq!(
            result.issues,
            vec![
                ValidationIssue::ComputedFieldSet {
                    path: "create_time".to_string()
                },
                ValidationIssue::EmptyValue {
                    path: "image_url".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_empty_lists_below_minimum() {
        let schema = ResourceSchema::new(ResourceKind::NotificationWebhook, "test")
            .field(
                "event_types",
                FieldSchema::list(ScalarKind::String).required().non_empty(),
            )
            .field(
                "billing_cycle",
                FieldSchema::block(BlockSchema::new()).required().min_items(1),
            );

        let result = validate(
            &tree(json!({"event_types": [], "billing_cycle": []})),
            &schema,
        );
        assert_eq!(
            result.issues,
            vec![
                ValidationIssue::EmptyValue {
                    path: "event_types".to_string()
                },
                ValidationIssue::TooFewItems {
                    path: "billing_cycle".to_string(),
                    min: 1,
                    actual: 0,
                },
            ]
        );
    }

    #[test]
    fn test_into_result_carries_kind() {
        let err = validate(&tree(json!({})), &schema())
            .into_result(ResourceKind::SubscriptionPlan)
            .unwrap_err();
        assert_eq!(err.kind, ResourceKind::SubscriptionPlan);
        assert_eq!(
            err.to_string(),
            "invalid paypal_subscription_plan: name: required attribute is missing; \
             billing_cycle: required attribute is missing"
        );
    }
}
