//! Equivalence rules used for diff suppression.
//!
//! The remote platform echoes decimal amounts in its own canonical form
//! (`"10"` comes back as `"10.00"`), so textual comparison would report a
//! change on every read.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Serialize;

/// A per-field rule deciding whether two textual values mean the same thing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Equivalence {
    /// Both sides are decimal numbers in string form.
    NumericString,
}

impl Equivalence {
    pub fn equivalent(&self, old: &str, new: &str) -> bool {
        match self {
            Equivalence::NumericString => fields_equivalent(old, new),
        }
    }
}

/// Returns true iff both strings parse as decimal numbers with equal value.
///
/// A value that fails to parse is never equivalent to anything, so the
/// caller treats it as a change and issues an update.
pub fn fields_equivalent(old: &str, new: &str) -> bool {
    match (parse_decimal(old), parse_decimal(new)) {
        (Some(old), Some(new)) => old == new,
        _ => false,
    }
}

fn parse_decimal(value: &str) -> Option<Decimal> {
    Decimal::from_str(value)
        .or_else(|_| Decimal::from_scientific(value))
        .ok()
}
