//! Proc macros for Kiln Query.
//!
//! # Derive Macros
//!
//! - [`Queryable`] - Generate a record's schema, accessor and field name
//!   constants from struct field annotations

mod queryable;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derives the `Queryable` trait for record structs.
///
/// This macro generates an implementation of `kiln_query::Queryable`, so the
/// struct can be queried with `ListQuery::run_on` without a hand-written
/// accessor or schema.
///
/// # Field Attributes
///
/// | Attribute | Description |
/// |-----------|-------------|
/// | `Text` | Text field - requires `QueryText` (String, &str, Option) |
/// | `TextList` | List of text values - requires `QueryTextList` |
/// | `Number` | Numeric field - requires `QueryNumber` (primitives, Option) |
/// | `Timestamp` | Instant - requires `QueryTimestamp` (millis, ISO-8601 strings, chrono) |
/// | `Enum` | Enum field - requires `QueryEnum` |
/// | `Bool` | Boolean field |
/// | `searchable` | Include in free-text search (Text and TextList only) |
/// | `skip` | Exclude this field from queries |
/// | `rename = "..."` | Use a custom name for queries |
/// | `ty = "..."` | String form of the type, e.g. `ty = "enum"` |
///
/// Fields without a `#[query(...)]` type are not queryable.
///
/// # Generated Code
///
/// 1. Field name constants (e.g., `Work::TITLE`, `Work::UPVOTES_COUNT`)
/// 2. `Queryable::field_value()` and `Queryable::schema()`
///
/// # Example
///
/// ```ignore
/// use kiln_query::ListQuery;
/// use kiln_query_macros::Queryable;
///
/// #[derive(Queryable)]
/// struct Work {
///     #[query(Text, searchable)]
///     title: String,
///
///     #[query(Number, rename = "upvotesCount")]
///     upvotes_count: u32,
///
///     #[query(Bool, rename = "isEditorsChoice")]
///     is_editors_choice: bool,
///
///     #[query(skip)]
///     image_url: String,
/// }
///
/// let works = vec![
///     Work { title: "Spiral Vase".into(), upvotes_count: 40, is_editors_choice: true, image_url: String::new() },
///     Work { title: "Tea Bowl Set".into(), upvotes_count: 95, is_editors_choice: false, image_url: String::new() },
/// ];
///
/// let page = ListQuery::new()
///     .filter_eq(Work::IS_EDITORS_CHOICE, true)
///     .sort_desc(Work::UPVOTES_COUNT)
///     .run_on(&works)
///     .unwrap();
/// assert_eq!(page.items[0].title, "Spiral Vase");
/// ```
///
/// # Enum Fields
///
/// Implement `QueryEnum` on the enum type, and use `ty = "enum"` or `Enum`:
///
/// ```ignore
/// use kiln_query::QueryEnum;
///
/// #[derive(Clone, Copy)]
/// enum ActivityType { Festival, Fair, Museum }
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
///
/// #[derive(Queryable)]
/// struct Activity {
///     #[query(Enum, rename = "type")]
///     kind: ActivityType,
/// }
/// ```
#[proc_macro_derive(Queryable, attributes(query))]
pub fn queryable_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    queryable::queryable_derive_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
