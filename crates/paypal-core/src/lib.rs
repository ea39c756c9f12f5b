pub mod attribute;
pub mod diff;
pub mod equivalence;
pub mod error;
pub mod kind;
pub mod schema;
pub mod validation;

pub use attribute::{
    AttributeMap, AttributeValue, attribute_map, attributes_from_json, attributes_from_str,
};
pub use diff::{AttributeChange, diff, has_changes};
pub use equivalence::{Equivalence, fields_equivalent};
pub use error::{CoreError, ErrorCategory, Result};
pub use kind::ResourceKind;
pub use schema::{BlockSchema, FieldSchema, FieldType, IntRange, Presence, ResourceSchema, ScalarKind};
pub use validation::{ValidationError, ValidationIssue, ValidationResult, validate};
