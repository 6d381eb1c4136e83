//! Record access traits.
//!
//! [`Queryable`] is what `#[derive(Queryable)]` from `kiln-query-macros`
//! implements. The `Query*` conversion traits let the generated code read
//! fields of many concrete types without knowing them up front.

use chrono::{DateTime, TimeZone};

use crate::schema::Schema;
use crate::value::{Number, Timestamp, Value};

/// A record type with a declared schema and field accessor.
///
/// # Manual Implementation
///
/// ```
/// use kiln_query::{FieldType, Number, Queryable, Schema, Value};
///
/// struct Work {
///     title: String,
///     upvotes_count: u32,
/// }
///
/// impl Queryable for Work {
///     fn field_value(&self, field: &str) -> Value<'_> {
///         match field {
///             "title" => Value::Text(&self.title),
///             "upvotesCount" => Value::Number(Number::from(self.upvotes_count)),
///             _ => Value::None,
///         }
///     }
///
///     fn schema() -> Schema {
///         Schema::new()
///             .searchable("title", FieldType::Text)
///             .field("upvotesCount", FieldType::Number)
///     }
/// }
/// ```
pub trait Queryable {
    /// Returns the value of a field for filtering, searching and sorting.
    ///
    /// Returns [`Value::None`] for fields that are absent or null.
    fn field_value(&self, field: &str) -> Value<'_>;

    /// Returns the schema of this record type.
    fn schema() -> Schema
    where
        Self: Sized;

    /// Free-function form of [`field_value`](Queryable::field_value),
    /// usable wherever an accessor is expected.
    fn accessor<'a>(item: &'a Self, field: &str) -> Value<'a>
    where
        Self: Sized,
    {
        item.field_value(field)
    }
}

/// Reads a field as text.
pub trait QueryText {
    /// Returns the text, or `None` if absent.
    fn query_text(&self) -> Option<&str>;
}

impl QueryText for String {
    fn query_text(&self) -> Option<&str> {
        Some(self.as_str())
    }
}

impl QueryText for &str {
    fn query_text(&self) -> Option<&str> {
        Some(*self)
    }
}

impl<T: QueryText> QueryText for Option<T> {
    fn query_text(&self) -> Option<&str> {
        self.as_ref().and_then(QueryText::query_text)
    }
}

/// Reads a field as a list of text values.
///
/// Implement this for collections of domain types, such as tags that carry
/// an id next to their name.
pub trait QueryTextList {
    /// Returns the text values in order.
    fn query_text_list(&self) -> Vec<&str>;
}

impl<T: QueryText> QueryTextList for Vec<T> {
    fn query_text_list(&self) -> Vec<&str> {
        self.iter().filter_map(QueryText::query_text).collect()
    }
}

/// Reads a field as a number.
pub trait QueryNumber {
    /// Returns the number, or `None` if absent.
    fn query_number(&self) -> Option<Number>;
}

macro_rules! query_number_primitive {
    ($($source:ty),+) => {
        $(
            impl QueryNumber for $source {
                fn query_number(&self) -> Option<Number> {
                    Some(Number::from(*self))
                }
            }
        )+
    };
}

query_number_primitive!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl<T: QueryNumber> QueryNumber for Option<T> {
    fn query_number(&self) -> Option<Number> {
        self.as_ref().and_then(QueryNumber::query_number)
    }
}

/// Reads a field as an instant.
///
/// Integers are milliseconds since the Unix epoch; strings are parsed as
/// ISO-8601 and read as `None` when they do not parse.
pub trait QueryTimestamp {
    /// Returns the instant, or `None` if absent or unparseable.
    fn query_timestamp(&self) -> Option<Timestamp>;
}

impl QueryTimestamp for i64 {
    fn query_timestamp(&self) -> Option<Timestamp> {
        Some(Timestamp::from_millis(*self))
    }
}

impl QueryTimestamp for u64 {
    fn query_timestamp(&self) -> Option<Timestamp> {
        i64::try_from(*self).ok().map(Timestamp::from_millis)
    }
}

impl QueryTimestamp for String {
    fn query_timestamp(&self) -> Option<Timestamp> {
        Timestamp::parse(self)
    }
}

impl QueryTimestamp for &str {
    fn query_timestamp(&self) -> Option<Timestamp> {
        Timestamp::parse(self)
    }
}

impl<Tz: TimeZone> QueryTimestamp for DateTime<Tz> {
    fn query_timestamp(&self) -> Option<Timestamp> {
        Some(Timestamp::from_millis(self.timestamp_millis()))
    }
}

impl<T: QueryTimestamp> QueryTimestamp for Option<T> {
    fn query_timestamp(&self) -> Option<Timestamp> {
        self.as_ref().and_then(QueryTimestamp::query_timestamp)
    }
}

/// Maps enum variants to stable discriminants.
///
/// ```
/// use kiln_query::QueryEnum;
///
/// #[derive(Clone, Copy)]
/// enum ActivityType {
///     Festival,
///     Fair,
///     Museum,
/// }
///
/// impl QueryEnum for ActivityType {
///     fn query_discriminant(&self) -> u32 {
///         match self {
///             ActivityType::Festival => 0,
///             ActivityType::Fair => 1,
///             ActivityType::Museum => 2,
///         }
///     }
/// }
/// ```
pub trait QueryEnum {
    /// Returns the discriminant for this variant.
    ///
    /// Use explicit values rather than declaration order so reordering
    /// variants does not change query results.
    fn query_discriminant(&self) -> u32;
}
