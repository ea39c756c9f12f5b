//! Schema descriptors for resource kinds.
//!
//! A [`ResourceSchema`] describes the legal shape of an attribute tree:
//! field names, types, presence rules, cardinality bounds, allowed values
//! and equivalence rules. Schemas are built once at startup and never mutated.

use indexmap::IndexMap;
use serde::Serialize;

use crate::attribute::AttributeMap;
use crate::diff::{AttributeChange, diff};
use crate::equivalence::Equivalence;
use crate::kind::ResourceKind;
use crate::validation::{ValidationResult, validate};

/// Scalar element types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarKind {
    String,
    Integer,
    Boolean,
}

impl ScalarKind {
    pub fn name(&self) -> &'static str {
        match self {
            ScalarKind::String => "string",
            ScalarKind::Integer => "integer",
            ScalarKind::Boolean => "boolean",
        }
    }
}

/// The type of a schema field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "of", rename_all = "snake_case")]
pub enum FieldType {
    Scalar(ScalarKind),
    /// A list of scalars.
    List(ScalarKind),
    /// A list of nested objects, each shaped by the inner block.
    Block(BlockSchema),
}

impl FieldType {
    pub fn name(&self) -> &'static str {
        match self {
            FieldType::Scalar(kind) => kind.name(),
            FieldType::List(_) | FieldType::Block(_) => "list",
        }
    }
}

/// Whether a field is supplied by the caller, the remote system, or both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Presence {
    Required,
    Optional,
    /// Populated only from observed state.
    Computed,
    /// May be supplied; otherwise filled in from observed state.
    OptionalComputed,
}

impl Presence {
    pub fn is_required(&self) -> bool {
        matches!(self, Presence::Required)
    }

    pub fn is_computed(&self) -> bool {
        matches!(self, Presence::Computed | Presence::OptionalComputed)
    }
}

/// Inclusive bounds for an integer field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IntRange {
    pub min: i64,
    pub max: i64,
}

impl IntRange {
    pub fn contains(&self, value: i64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// Definition of a single field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldSchema {
    #[serde(flatten)]
    pub field_type: FieldType,
    pub presence: Presence,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Minimum item count for list and block fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_items: Option<usize>,
    /// Maximum item count for list and block fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_items: Option<usize>,
    /// Allowed values, compared case-insensitively.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_values: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<IntRange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub equivalence: Option<Equivalence>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub non_empty: bool,
    /// String values differ only when they differ ignoring ASCII case.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub ignore_case: bool,
}

impl FieldSchema {
    fn of(field_type: FieldType) -> Self {
        Self {
            field_type,
            presence: Presence::Optional,
            description: String::new(),
            min_items: None,
            max_items: None,
            allowed_values: None,
            range: None,
            equivalence: None,
            non_empty: false,
            ignore_case: false,
        }
    }

    pub fn string() -> Self {
        Self::of(FieldType::Scalar(ScalarKind::String))
    }

    pub fn integer() -> Self {
        Self::of(FieldType::Scalar(ScalarKind::Integer))
    }

    pub fn boolean() -> Self {
        Self::of(FieldType::Scalar(ScalarKind::Boolean))
    }

    pub fn list(element: ScalarKind) -> Self {
        Self::of(FieldType::List(element))
    }

    pub fn block(block: BlockSchema) -> Self {
        Self::of(FieldType::Block(block))
    }

    pub fn required(mut self) -> Self {
        self.presence = Presence::Required;
        self
    }

    pub fn optional(mut self) -> Self {
        self.presence = Presence::Optional;
        self
    }

    pub fn computed(mut self) -> Self {
        self.presence = Presence::Computed;
        self
    }

    pub fn optional_computed(mut self) -> Self {
        self.presence = Presence::OptionalComputed;
        self
    }

    pub fn describe(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn min_items(mut self, min: usize) -> Self {
        self.min_items = Some(min);
        self
    }

    pub fn max_items(mut self, max: usize) -> Self {
        self.max_items = Some(max);
        self
    }

    pub fn one_of(mut self, values: &[&str]) -> Self {
        self.allowed_values = Some(values.iter().map(|v| v.to_string()).collect());
        self
    }

    pub fn range(mut self, min: i64, max: i64) -> Self {
        self.range = Some(IntRange { min, max });
        self
    }

    pub fn equivalence(mut self, equivalence: Equivalence) -> Self {
        self.equivalence = Some(equivalence);
        self
    }

    /// Rejects empty strings, and empty lists for list fields.
    pub fn non_empty(mut self) -> Self {
        self.non_empty = true;
        self
    }

    pub fn ignore_case(mut self) -> Self {
        self.ignore_case = true;
        self
    }

    /// Enumerated fields always compare without regard to case.
    pub fn is_case_insensitive(&self) -> bool {
        self.ignore_case || self.allowed_values.is_some()
    }

    /// Nested block of this field, if it is a block field.
    pub fn nested(&self) -> Option<&BlockSchema> {
        match &self.field_type {
            FieldType::Block(block) => Some(block),
            _ => None,
        }
    }
}

/// An ordered set of named fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct BlockSchema {
    fields: IndexMap<String, FieldSchema>,
}

impl BlockSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: &str, schema: FieldSchema) -> Self {
        self.fields.insert(name.to_string(), schema);
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.get(name)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldSchema)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Schema descriptor for one resource kind.
#[derive(Debug, Clone, Serialize)]
pub struct ResourceSchema {
    pub kind: ResourceKind,
    pub version: u32,
    pub description: String,
    pub fields: BlockSchema,
}

impl ResourceSchema {
    pub fn new(kind: ResourceKind, description: &str) -> Self {
        Self {
            kind,
            version: 0,
            description: description.to_string(),
            fields: BlockSchema::new(),
        }
    }

    pub fn field(mut self, name: &str, schema: FieldSchema) -> Self {
        self.fields = self.fields.field(name, schema);
        self
    }

    /// Looks up a field by dotted path, skipping list indices
    /// (`billing_cycle.0.pricing_scheme.0.fixed_price.0.value`).
    pub fn field_at(&self, path: &str) -> Option<&FieldSchema> {
        let mut block = &self.fields;
        let mut found = None;
        for segment in path.split('.') {
            if segment.parse::<usize>().is_ok() {
                continue;
            }
            let field = block.get(segment)?;
            found = Some(field);
            if let Some(nested) = field.nested() {
                block = nested;
            }
        }
        found
    }

    /// Validate a desired-state tree against this schema
    pub fn validate(&self, tree: &AttributeMap) -> ValidationResult {
        validate(tree, self)
    }

    /// Meaningful differences between observed and desired state
    pub fn diff(&self, observed: &AttributeMap, desired: &AttributeMap) -> Vec<AttributeChange> {
        diff(self, observed, desired)
    }
}
