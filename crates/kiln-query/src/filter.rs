//! Filter predicates.
//!
//! A [`Filter`] names a field, an operator and the value to compare
//! against. A query keeps records that satisfy every one of its filters.

use regex::Regex;

use crate::error::{QueryError, Result};
use crate::op::Op;
use crate::schema::FieldType;
use crate::value::{Number, Timestamp, Value};

/// A single filter predicate.
///
/// ```
/// use kiln_query::{Filter, Op, Value};
///
/// let filter = Filter::new("categoryName", Op::Eq, "Showcase");
/// assert!(filter.matches(&Value::Text("Showcase")));
/// assert!(!filter.matches(&Value::Text("Events")));
/// ```
#[derive(Debug, Clone)]
pub struct Filter {
    /// The field to compare.
    pub field: String,
    /// The comparison operator.
    pub op: Op,
    /// The value to compare against.
    pub value: FilterValue,
}

impl Filter {
    /// Creates a new filter.
    pub fn new(field: impl Into<String>, op: Op, value: impl Into<FilterValue>) -> Self {
        Filter {
            field: field.into(),
            op,
            value: value.into(),
        }
    }

    /// Checks that this filter makes sense for a field of type `ty`.
    pub fn check(&self, ty: FieldType) -> Result<()> {
        if !ty.supports(self.op) {
            return Err(QueryError::invalid(format!(
                "operator '{}' is not valid for {} field '{}'",
                self.op, ty, self.field
            )));
        }
        if !self.value.fits(ty, self.op) {
            return Err(QueryError::invalid(format!(
                "{} field '{}' cannot be compared with a {} value using '{}'",
                ty,
                self.field,
                self.value.kind(),
                self.op
            )));
        }
        Ok(())
    }

    /// Evaluates this filter against a field value.
    ///
    /// `None` field values and mismatched kinds never match.
    pub fn matches(&self, field_value: &Value<'_>) -> bool {
        match (&self.value, field_value) {
            (FilterValue::Text(pattern), Value::Text(s)) => self.match_text(s, pattern),
            (FilterValue::TextSet(set), Value::Text(s)) => {
                self.op == Op::In && set.iter().any(|candidate| candidate == s)
            }
            (FilterValue::Regex(regex), Value::Text(s)) => regex.is_match(s),
            (FilterValue::Text(pattern), Value::TextList(items)) => {
                self.match_text_list(items, pattern)
            }
            (FilterValue::Number(clause), Value::Number(field)) => match field.compare(*clause) {
                Some(ordering) => self.op.holds(ordering),
                None => false,
            },
            (FilterValue::Timestamp(clause), Value::Timestamp(field)) => {
                self.op.holds(field.cmp(clause))
            }
            (FilterValue::Enum(clause), Value::Enum(field)) => match self.op {
                Op::Eq => field == clause,
                Op::Ne => field != clause,
                _ => false,
            },
            (FilterValue::EnumSet(set), Value::Enum(field)) => {
                self.op == Op::In && set.contains(field)
            }
            (FilterValue::Bool(clause), Value::Bool(field)) => match self.op.canonical() {
                Op::Eq => field == clause,
                Op::Ne => field != clause,
                _ => false,
            },
            _ => false,
        }
    }

    fn match_text(&self, field: &str, pattern: &str) -> bool {
        match self.op {
            Op::Eq => field == pattern,
            Op::Ne => field != pattern,
            Op::StartsWith => field.starts_with(pattern),
            Op::EndsWith => field.ends_with(pattern),
            Op::Contains => field.contains(pattern),
            _ => false,
        }
    }

    fn match_text_list(&self, items: &[&str], pattern: &str) -> bool {
        match self.op {
            Op::Has => items.iter().any(|item| *item == pattern),
            Op::Contains => items.iter().any(|item| item.contains(pattern)),
            _ => false,
        }
    }
}

/// Owned comparison value stored in a [`Filter`].
#[derive(Debug, Clone)]
pub enum FilterValue {
    /// Text value.
    Text(String),
    /// Set of text values (for `In`).
    TextSet(Vec<String>),
    /// Compiled regular expression.
    Regex(Regex),
    /// Numeric value.
    Number(Number),
    /// Timestamp value.
    Timestamp(Timestamp),
    /// Single enum discriminant.
    Enum(u32),
    /// Set of enum discriminants (for `In`).
    EnumSet(Vec<u32>),
    /// Boolean value.
    Bool(bool),
}

impl FilterValue {
    /// Returns the kind name used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            FilterValue::Text(_) => "text",
            FilterValue::TextSet(_) => "text set",
            FilterValue::Regex(_) => "regex",
            FilterValue::Number(_) => "number",
            FilterValue::Timestamp(_) => "timestamp",
            FilterValue::Enum(_) => "enum",
            FilterValue::EnumSet(_) => "enum set",
            FilterValue::Bool(_) => "bool",
        }
    }

    fn fits(&self, ty: FieldType, op: Op) -> bool {
        match (ty, self) {
            (FieldType::Text, FilterValue::Regex(_)) => op == Op::Regex,
            (FieldType::Text, FilterValue::TextSet(_)) => op == Op::In,
            (FieldType::Text, FilterValue::Text(_)) => !matches!(op, Op::Regex | Op::In),
            (FieldType::TextList, FilterValue::Text(_)) => true,
            (FieldType::Number, FilterValue::Number(_)) => true,
            (FieldType::Timestamp, FilterValue::Timestamp(_)) => true,
            (FieldType::Enum, FilterValue::EnumSet(_)) => op == Op::In,
            (FieldType::Enum, FilterValue::Enum(_)) => op != Op::In,
            (FieldType::Bool, FilterValue::Bool(_)) => true,
            _ => false,
        }
    }
}

impl From<String> for FilterValue {
    fn from(s: String) -> Self {
        FilterValue::Text(s)
    }
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        FilterValue::Text(s.to_string())
    }
}

impl From<Vec<String>> for FilterValue {
    fn from(set: Vec<String>) -> Self {
        FilterValue::TextSet(set)
    }
}

impl From<Regex> for FilterValue {
    fn from(r: Regex) -> Self {
        FilterValue::Regex(r)
    }
}

impl From<Number> for FilterValue {
    fn from(n: Number) -> Self {
        FilterValue::Number(n)
    }
}

impl From<Timestamp> for FilterValue {
    fn from(t: Timestamp) -> Self {
        FilterValue::Timestamp(t)
    }
}

impl From<Vec<u32>> for FilterValue {
    fn from(set: Vec<u32>) -> Self {
        FilterValue::EnumSet(set)
    }
}

impl From<bool> for FilterValue {
    fn from(b: bool) -> Self {
        FilterValue::Bool(b)
    }
}

macro_rules! filter_value_from_number {
    ($($source:ty),+) => {
        $(
            impl From<$source> for FilterValue {
                fn from(n: $source) -> Self {
                    FilterValue::Number(Number::from(n))
                }
            }
        )+
    };
}

filter_value_from_number!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);
