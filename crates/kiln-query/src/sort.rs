//! Sort keys and type-aware value comparison.

use std::cmp::Ordering;

use crate::value::Value;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Dir {
    /// Smallest first.
    #[default]
    Asc,
    /// Largest first.
    Desc,
}

impl Dir {
    /// Applies this direction to an ordering.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Dir::Asc => ordering,
            Dir::Desc => ordering.reverse(),
        }
    }

    /// Returns the display name of this direction.
    pub fn as_str(self) -> &'static str {
        match self {
            Dir::Asc => "asc",
            Dir::Desc => "desc",
        }
    }
}

impl std::fmt::Display for Dir {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A field and the direction to sort it in.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SortKey {
    /// The field to sort by.
    pub field: String,
    /// The sort direction.
    #[cfg_attr(feature = "serde", serde(default))]
    pub dir: Dir,
}

impl SortKey {
    /// Creates a sort key with the given direction.
    pub fn new(field: impl Into<String>, dir: Dir) -> Self {
        SortKey {
            field: field.into(),
            dir,
        }
    }

    /// Creates an ascending sort key.
    pub fn asc(field: impl Into<String>) -> Self {
        SortKey::new(field, Dir::Asc)
    }

    /// Creates a descending sort key.
    pub fn desc(field: impl Into<String>) -> Self {
        SortKey::new(field, Dir::Desc)
    }

    /// Compares two values of this key's field.
    ///
    /// Missing values sort after present ones whichever way the key
    /// points. The result is a total order even for NaN or for an accessor
    /// that returns mixed kinds, so it is safe to hand to `sort_by`.
    pub fn compare(&self, a: &Value<'_>, b: &Value<'_>) -> Ordering {
        match (a, b) {
            (Value::None, Value::None) => Ordering::Equal,
            (Value::None, _) => Ordering::Greater,
            (_, Value::None) => Ordering::Less,
            _ => {
                let ordering = compare_values(a, b).unwrap_or_else(|| fallback_order(a, b));
                self.dir.apply(ordering)
            }
        }
    }
}

/// Compares two values of the same kind in ascending order.
///
/// Text compares lexicographically, numbers numerically, timestamps
/// chronologically. Returns `None` for mismatched kinds, NaN, or `None`
/// values.
pub fn compare_values(a: &Value<'_>, b: &Value<'_>) -> Option<Ordering> {
    match (a, b) {
        (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
        (Value::TextList(a), Value::TextList(b)) => Some(a.cmp(b)),
        (Value::Number(a), Value::Number(b)) => a.compare(*b),
        (Value::Timestamp(a), Value::Timestamp(b)) => Some(a.cmp(b)),
        (Value::Enum(a), Value::Enum(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

// Orders pairs `compare_values` gives up on: NaN via IEEE total order,
// mismatched kinds by kind.
fn fallback_order(a: &Value<'_>, b: &Value<'_>) -> Ordering {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => a.to_f64().total_cmp(&b.to_f64()),
        _ => kind_rank(a).cmp(&kind_rank(b)),
    }
}

fn kind_rank(value: &Value<'_>) -> u8 {
    match value {
        Value::Text(_) => 0,
        Value::TextList(_) => 1,
        Value::Number(_) => 2,
        Value::Timestamp(_) => 3,
        Value::Enum(_) => 4,
        Value::Bool(_) => 5,
        Value::None => 6,
    }
}

/// Compares two pre-extracted key tuples, one value per sort key.
///
/// The first key decides; later keys only break ties.
pub(crate) fn compare_keys(a: &[Value<'_>], b: &[Value<'_>], keys: &[SortKey]) -> Ordering {
    keys.iter()
        .zip(a.iter().zip(b.iter()))
        .map(|(key, (a, b))| key.compare(a, b))
        .find(|ordering| *ordering != Ordering::Equal)
        .unwrap_or(Ordering::Equal)
}
