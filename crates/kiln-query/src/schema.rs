//! Field-type schemas.
//!
//! A [`Schema`] declares every queryable field of a record type together
//! with its [`FieldType`]. Queries are validated against it before they
//! run, so a misspelled field fails loudly instead of silently matching
//! nothing.

use crate::op::Op;
use crate::value::{Number, Timestamp, Value};

/// Semantic type of a queryable field.
///
/// The type selects the comparator used for sorting and the operators a
/// filter may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FieldType {
    /// Free text; compared lexicographically.
    Text,
    /// List of text values such as tags.
    TextList,
    /// Integer or floating point number.
    Number,
    /// ISO-8601 instant; compared chronologically.
    Timestamp,
    /// Enum discriminant.
    Enum,
    /// Boolean flag.
    Bool,
}

impl FieldType {
    /// Returns `true` if filters on this type may use `op`.
    pub fn supports(self, op: Op) -> bool {
        use Op::*;
        match self {
            FieldType::Text => matches!(op, Eq | Ne | StartsWith | EndsWith | Contains | Regex | In),
            FieldType::TextList => matches!(op, Has | Contains),
            FieldType::Number => matches!(op, Eq | Ne | Gt | Gte | Lt | Lte),
            FieldType::Timestamp => matches!(op, Eq | Ne | Gt | Gte | Lt | Lte | Before | After),
            FieldType::Enum => matches!(op, Eq | Ne | In),
            FieldType::Bool => matches!(op, Eq | Ne | Is),
        }
    }

    /// Reads an accessor value as this type.
    ///
    /// Accessors may hand back raw text for typed fields (an ISO-8601 string
    /// for a timestamp, digits for a number). Text is parsed into the
    /// declared kind; anything that cannot be read as this type becomes
    /// [`Value::None`], so it never matches a filter and sorts last.
    pub fn coerce<'a>(self, value: Value<'a>) -> Value<'a> {
        match (self, value) {
            (_, Value::None) => Value::None,
            (FieldType::Text, value @ Value::Text(_)) => value,
            (FieldType::TextList, value @ Value::TextList(_)) => value,
            (FieldType::TextList, Value::Text(s)) => Value::TextList(vec![s]),
            (FieldType::Number, value @ Value::Number(_)) => value,
            (FieldType::Number, Value::Text(s)) => Value::from(Number::parse(s)),
            (FieldType::Timestamp, value @ Value::Timestamp(_)) => value,
            (FieldType::Timestamp, Value::Text(s)) => Value::from(Timestamp::parse(s)),
            (FieldType::Timestamp, Value::Number(Number::I64(ms))) => {
                Value::Timestamp(Timestamp::from_millis(ms))
            }
            (FieldType::Timestamp, Value::Number(Number::U64(ms))) => {
                i64::try_from(ms).map_or(Value::None, |ms| Value::Timestamp(Timestamp::from_millis(ms)))
            }
            (FieldType::Enum, value @ Value::Enum(_)) => value,
            (FieldType::Enum, Value::Number(Number::I64(d))) => {
                u32::try_from(d).map_or(Value::None, Value::Enum)
            }
            (FieldType::Enum, Value::Number(Number::U64(d))) => {
                u32::try_from(d).map_or(Value::None, Value::Enum)
            }
            (FieldType::Bool, value @ Value::Bool(_)) => value,
            (FieldType::Bool, Value::Text(s)) => match s.trim() {
                t if t.eq_ignore_ascii_case("true") => Value::Bool(true),
                t if t.eq_ignore_ascii_case("false") => Value::Bool(false),
                _ => Value::None,
            },
            _ => Value::None,
        }
    }

    /// Returns `true` if free-text search can look inside this type.
    pub fn is_searchable(self) -> bool {
        matches!(self, FieldType::Text | FieldType::TextList)
    }

    /// Returns the display name of this type.
    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::TextList => "text list",
            FieldType::Number => "number",
            FieldType::Timestamp => "timestamp",
            FieldType::Enum => "enum",
            FieldType::Bool => "bool",
        }
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Declaration of one queryable field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    /// Name used by queries.
    pub name: String,
    /// Semantic type.
    pub ty: FieldType,
    /// Whether free-text search looks at this field when a query does not
    /// name its own search fields.
    pub searchable: bool,
}

/// The queryable fields of a record type.
///
/// # Example
///
/// ```
/// use kiln_query::{FieldType, Schema};
///
/// let schema = Schema::new()
///     .searchable("title", FieldType::Text)
///     .searchable("tags", FieldType::TextList)
///     .field("categoryName", FieldType::Text)
///     .field("lastActivityAt", FieldType::Timestamp);
///
/// assert_eq!(schema.type_of("lastActivityAt"), Some(FieldType::Timestamp));
/// assert_eq!(schema.search_fields().collect::<Vec<_>>(), ["title", "tags"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    fields: Vec<FieldDef>,
}

impl Schema {
    /// Creates an empty schema.
    pub fn new() -> Self {
        Schema::default()
    }

    /// Declares a field.
    ///
    /// Declaring a name twice replaces the earlier declaration in place.
    pub fn field(self, name: impl Into<String>, ty: FieldType) -> Self {
        self.with(FieldDef {
            name: name.into(),
            ty,
            searchable: false,
        })
    }

    /// Declares a field that free-text search looks at by default.
    pub fn searchable(self, name: impl Into<String>, ty: FieldType) -> Self {
        self.with(FieldDef {
            name: name.into(),
            ty,
            searchable: true,
        })
    }

    /// Adds a complete field declaration.
    pub fn with(mut self, def: FieldDef) -> Self {
        match self.fields.iter_mut().find(|f| f.name == def.name) {
            Some(existing) => *existing = def,
            None => self.fields.push(def),
        }
        self
    }

    /// Looks up a field declaration by name.
    pub fn get(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Returns the declared type of a field.
    pub fn type_of(&self, name: &str) -> Option<FieldType> {
        self.get(name).map(|f| f.ty)
    }

    /// Returns `true` if the schema declares `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Returns all field declarations in declaration order.
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    /// Returns the names of the default search fields.
    pub fn search_fields(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .filter(|f| f.searchable)
            .map(|f| f.name.as_str())
    }

    /// Returns the number of declared fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if no fields are declared.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
