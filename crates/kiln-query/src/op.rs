//! Comparison operators for filter predicates.
//!
//! Which operators a field accepts depends on its type; the table lives in
//! [`FieldType::supports`](crate::FieldType::supports).

use std::cmp::Ordering;

/// Comparison operator of a filter.
///
/// `Before`, `After` and `Is` are spellings of `Lt`, `Gt` and `Eq` that
/// read better in profiles (`createdAt before 2025-08-01`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Op {
    /// Equal.
    Eq,
    /// Not equal.
    Ne,
    /// Text starts with prefix.
    StartsWith,
    /// Text ends with suffix.
    EndsWith,
    /// Text contains substring; for lists, some element does.
    Contains,
    /// Text matches a regular expression.
    Regex,
    /// Greater than.
    Gt,
    /// Greater than or equal.
    Gte,
    /// Less than.
    Lt,
    /// Less than or equal.
    Lte,
    /// Earlier than (alias for `Lt`).
    Before,
    /// Later than (alias for `Gt`).
    After,
    /// Value is one of a set.
    In,
    /// Some list element equals the value.
    Has,
    /// Alias for `Eq` (reads naturally: `isPinned is true`).
    Is,
}

impl Op {
    /// Resolves `Before`, `After` and `Is` to the operator they stand for.
    pub fn canonical(self) -> Op {
        match self {
            Op::Before => Op::Lt,
            Op::After => Op::Gt,
            Op::Is => Op::Eq,
            other => other,
        }
    }

    /// Returns `true` if `ordering` (field compared to clause) satisfies
    /// this operator. Operators that do not compare by order never hold.
    pub fn holds(self, ordering: Ordering) -> bool {
        match self.canonical() {
            Op::Eq => ordering.is_eq(),
            Op::Ne => ordering.is_ne(),
            Op::Gt => ordering.is_gt(),
            Op::Gte => ordering.is_ge(),
            Op::Lt => ordering.is_lt(),
            Op::Lte => ordering.is_le(),
            _ => false,
        }
    }

    /// Returns the display name of this operator.
    pub fn as_str(self) -> &'static str {
        match self {
            Op::Eq => "eq",
            Op::Ne => "ne",
            Op::StartsWith => "startswith",
            Op::EndsWith => "endswith",
            Op::Contains => "contains",
            Op::Regex => "regex",
            Op::Gt => "gt",
            Op::Gte => "gte",
            Op::Lt => "lt",
            Op::Lte => "lte",
            Op::Before => "before",
            Op::After => "after",
            Op::In => "in",
            Op::Has => "has",
            Op::Is => "is",
        }
    }
}

impl std::fmt::Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
