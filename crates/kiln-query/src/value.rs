//! Runtime value types for field comparison.
//!
//! The [`Value`] enum is what an accessor hands back for a named field of a
//! record. Values borrow from the record, so reading a field never clones
//! its text.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Runtime value of a record field, borrowed from the record.
///
/// # Example
///
/// ```
/// use kiln_query::{Number, Value};
///
/// struct Post {
///     title: String,
///     comment_count: u32,
/// }
///
/// fn accessor<'a>(post: &'a Post, field: &str) -> Value<'a> {
///     match field {
///         "title" => Value::Text(&post.title),
///         "commentCount" => Value::Number(Number::from(post.comment_count)),
///         _ => Value::None,
///     }
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value<'a> {
    /// Text value.
    Text(&'a str),
    /// List of text values, such as tag names.
    TextList(Vec<&'a str>),
    /// Numeric value.
    Number(Number),
    /// Instant in time.
    Timestamp(Timestamp),
    /// Enum discriminant.
    Enum(u32),
    /// Boolean value.
    Bool(bool),
    /// Field absent, null, or unparseable.
    None,
}

impl<'a> Value<'a> {
    /// Returns `true` if this is a `None` value.
    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    /// Extracts the text value, if present.
    pub fn as_text(&self) -> Option<&'a str> {
        match self {
            Value::Text(s) => Some(*s),
            _ => None,
        }
    }

    /// Extracts the text list, if present.
    pub fn as_text_list(&self) -> Option<&[&'a str]> {
        match self {
            Value::TextList(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    /// Extracts the number value, if present.
    pub fn as_number(&self) -> Option<Number> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Extracts the timestamp value, if present.
    pub fn as_timestamp(&self) -> Option<Timestamp> {
        match self {
            Value::Timestamp(t) => Some(*t),
            _ => None,
        }
    }

    /// Extracts the enum discriminant, if present.
    pub fn as_enum(&self) -> Option<u32> {
        match self {
            Value::Enum(d) => Some(*d),
            _ => None,
        }
    }

    /// Extracts the boolean value, if present.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the kind name used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Text(_) => "text",
            Value::TextList(_) => "text list",
            Value::Number(_) => "number",
            Value::Timestamp(_) => "timestamp",
            Value::Enum(_) => "enum",
            Value::Bool(_) => "bool",
            Value::None => "none",
        }
    }

    /// Returns `true` if any text in this value contains `needle`, ignoring case.
    ///
    /// `needle` must already be lowercased. Non-text values never match.
    pub(crate) fn contains_folded(&self, needle: &str) -> bool {
        match self {
            Value::Text(s) => s.to_lowercase().contains(needle),
            Value::TextList(items) => items.iter().any(|s| s.to_lowercase().contains(needle)),
            _ => false,
        }
    }
}

impl<'a> From<Option<&'a str>> for Value<'a> {
    fn from(text: Option<&'a str>) -> Self {
        text.map_or(Value::None, Value::Text)
    }
}

impl From<Option<Number>> for Value<'_> {
    fn from(number: Option<Number>) -> Self {
        number.map_or(Value::None, Value::Number)
    }
}

impl From<Option<Timestamp>> for Value<'_> {
    fn from(ts: Option<Timestamp>) -> Self {
        ts.map_or(Value::None, Value::Timestamp)
    }
}

/// Numeric value.
///
/// Integers keep their precision; comparisons across variants fall back
/// to `f64`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Number {
    /// Signed 64-bit integer.
    I64(i64),
    /// Unsigned 64-bit integer.
    U64(u64),
    /// 64-bit floating point.
    F64(f64),
}

impl Number {
    /// Converts the number to f64 for comparison.
    pub fn to_f64(self) -> f64 {
        match self {
            Number::I64(n) => n as f64,
            Number::U64(n) => n as f64,
            Number::F64(n) => n,
        }
    }

    /// Compares two numbers, handling mixed types.
    ///
    /// Returns `None` only when a NaN is involved.
    pub fn compare(self, other: Number) -> Option<Ordering> {
        match (self, other) {
            (Number::I64(a), Number::I64(b)) => Some(a.cmp(&b)),
            (Number::U64(a), Number::U64(b)) => Some(a.cmp(&b)),
            (Number::I64(a), Number::U64(b)) => Some(compare_signed_unsigned(a, b)),
            (Number::U64(a), Number::I64(b)) => Some(compare_signed_unsigned(b, a).reverse()),
            _ => self.to_f64().partial_cmp(&other.to_f64()),
        }
    }

    /// Parses a number from text, preferring integer representations.
    pub fn parse(text: &str) -> Option<Number> {
        let text = text.trim();
        if let Ok(n) = text.parse::<i64>() {
            return Some(Number::I64(n));
        }
        if let Ok(n) = text.parse::<u64>() {
            return Some(Number::U64(n));
        }
        text.parse::<f64>().ok().map(Number::F64)
    }
}

fn compare_signed_unsigned(a: i64, b: u64) -> Ordering {
    if a < 0 {
        Ordering::Less
    } else {
        (a as u64).cmp(&b)
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare(*other)
    }
}

macro_rules! number_from {
    ($variant:ident as $target:ty: $($source:ty),+) => {
        $(
            impl From<$source> for Number {
                fn from(n: $source) -> Self {
                    Number::$variant(n as $target)
                }
            }
        )+
    };
}

number_from!(I64 as i64: i8, i16, i32, i64, isize);
number_from!(U64 as u64: u8, u16, u32, u64, usize);
number_from!(F64 as f64: f32, f64);

/// Instant in time as milliseconds since the Unix epoch.
///
/// Timestamps order chronologically regardless of the offset the source
/// text was written in.
///
/// ```
/// use kiln_query::Timestamp;
///
/// let utc = Timestamp::parse("2025-08-21T17:15:00Z").unwrap();
/// let pacific = Timestamp::parse("2025-08-21T10:15:00-07:00").unwrap();
/// assert_eq!(utc, pacific);
/// assert!(Timestamp::parse("yesterday").is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Timestamp(pub i64);

impl Timestamp {
    /// Creates a timestamp from milliseconds since the Unix epoch.
    pub fn from_millis(millis: i64) -> Self {
        Timestamp(millis)
    }

    /// Creates a timestamp from seconds since the Unix epoch.
    pub fn from_secs(secs: i64) -> Self {
        Timestamp(secs.saturating_mul(1000))
    }

    /// Returns the timestamp as milliseconds since the Unix epoch.
    pub fn as_millis(self) -> i64 {
        self.0
    }

    /// Returns the timestamp as seconds since the Unix epoch.
    pub fn as_secs(self) -> i64 {
        self.0.div_euclid(1000)
    }

    /// Parses an ISO-8601 timestamp.
    ///
    /// Accepts RFC 3339 (`2025-08-21T17:15:00Z`, with any offset), a date
    /// and time without offset (read as UTC), or a bare date (midnight UTC).
    pub fn parse(text: &str) -> Option<Timestamp> {
        let text = text.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
            return Some(Timestamp(dt.timestamp_millis()));
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
            return Some(Timestamp(naive.and_utc().timestamp_millis()));
        }
        NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| Timestamp(naive.and_utc().timestamp_millis()))
    }
}

impl From<i64> for Timestamp {
    fn from(millis: i64) -> Self {
        Timestamp(millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_extractors() {
        assert_eq!(Value::Text("glaze").as_text(), Some("glaze"));
        assert_eq!(
            Value::TextList(vec!["a", "b"]).as_text_list(),
            Some(&["a", "b"][..])
        );
        assert_eq!(
            Value::Number(Number::I64(42)).as_number(),
            Some(Number::I64(42))
        );
        assert_eq!(
            Value::Timestamp(Timestamp(1000)).as_timestamp(),
            Some(Timestamp(1000))
        );
        assert_eq!(Value::Enum(5).as_enum(), Some(5));
        assert_eq!(Value::Bool(true).as_bool(), Some(true));

        assert_eq!(Value::Text("x").as_number(), None);
        assert_eq!(Value::Number(Number::I64(1)).as_text(), None);
        assert!(Value::None.is_none());
    }

    #[test]
    fn value_from_options() {
        assert_eq!(Value::from(Some("x")), Value::Text("x"));
        assert_eq!(Value::from(None::<&str>), Value::None);
        assert_eq!(Value::from(Some(Number::U64(3))), Value::Number(Number::U64(3)));
        assert_eq!(Value::from(None::<Timestamp>), Value::None);
    }

    #[test]
    fn contains_folded_ignores_case() {
        assert!(Value::Text("Glazing Techniques").contains_folded("glazing"));
        assert!(Value::TextList(vec!["Celadon", "technique"]).contains_folded("celadon"));
        assert!(!Value::Text("Tea Bowl Set").contains_folded("glazing"));
        assert!(!Value::Number(Number::I64(1)).contains_folded("1"));
        assert!(!Value::None.contains_folded("a"));
    }

    #[test]
    fn number_comparisons_same_type() {
        assert_eq!(Number::I64(5).compare(Number::I64(10)), Some(Ordering::Less));
        assert_eq!(Number::U64(10).compare(Number::U64(5)), Some(Ordering::Greater));
        assert_eq!(Number::F64(5.0).compare(Number::F64(5.0)), Some(Ordering::Equal));
    }

    #[test]
    fn number_comparisons_mixed_types() {
        assert_eq!(Number::I64(5).compare(Number::U64(10)), Some(Ordering::Less));
        assert_eq!(Number::I64(-1).compare(Number::U64(0)), Some(Ordering::Less));
        assert_eq!(Number::U64(u64::MAX).compare(Number::I64(i64::MAX)), Some(Ordering::Greater));
        assert_eq!(Number::I64(5).compare(Number::F64(5.0)), Some(Ordering::Equal));
        assert_eq!(Number::U64(10).compare(Number::F64(5.5)), Some(Ordering::Greater));
    }

    #[test]
    fn number_nan_comparison() {
        assert_eq!(Number::F64(f64::NAN).compare(Number::F64(1.0)), None);
    }

    #[test]
    fn number_parse() {
        assert_eq!(Number::parse("42"), Some(Number::I64(42)));
        assert_eq!(Number::parse(" -3 "), Some(Number::I64(-3)));
        assert_eq!(Number::parse("18446744073709551615"), Some(Number::U64(u64::MAX)));
        assert_eq!(Number::parse("2.5"), Some(Number::F64(2.5)));
        assert_eq!(Number::parse("many"), None);
    }

    #[test]
    fn number_conversions() {
        assert_eq!(Number::from(42i32), Number::I64(42));
        assert_eq!(Number::from(42u8), Number::U64(42));
        assert_eq!(Number::from(42usize), Number::U64(42));
        assert_eq!(Number::from(42.5f64), Number::F64(42.5));
    }

    #[test]
    fn timestamp_parse_formats() {
        let expected = Timestamp(1_755_796_500_000);
        assert_eq!(Timestamp::parse("2025-08-21T17:15:00Z"), Some(expected));
        assert_eq!(Timestamp::parse("2025-08-21T17:15:00.000Z"), Some(expected));
        assert_eq!(Timestamp::parse("2025-08-21T17:15:00"), Some(expected));
        assert_eq!(
            Timestamp::parse("2025-08-21"),
            Some(Timestamp(1_755_734_400_000))
        );
        assert_eq!(Timestamp::parse(""), None);
        assert_eq!(Timestamp::parse("21/08/2025"), None);
    }

    #[test]
    fn timestamp_ordering_is_chronological_across_offsets() {
        let earlier = Timestamp::parse("2025-08-21T10:00:00-07:00").unwrap();
        let later = Timestamp::parse("2025-08-21T17:30:00Z").unwrap();
        assert!(earlier < later);
    }

    #[test]
    fn timestamp_conversions() {
        assert_eq!(Timestamp::from_secs(1).as_millis(), 1000);
        assert_eq!(Timestamp::from_millis(5000).as_secs(), 5);
        assert_eq!(Timestamp::from_millis(-1).as_secs(), -1);
    }
}
