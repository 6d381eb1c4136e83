//! Kiln Query - filter, search, sort and paginate in-memory record lists.
//!
//! Every listing screen answers the same question: given a collection of
//! records and a user's choices, which records go on this page? Kiln Query
//! answers it once, for any record type:
//!
//! - Typed fields: text, text lists, numbers, timestamps, enums, booleans
//! - Conjunctive filters with type-checked operators
//! - Case-insensitive free-text search across designated fields
//! - Stable multi-key sorting with missing values last
//! - 1-indexed pagination with match and page counts
//!
//! # Quick Start
//!
//! ```rust
//! use kiln_query::{FieldType, ListQuery, Number, Schema, Value};
//!
//! struct Work {
//!     title: String,
//!     upvotes: u32,
//!     editors_choice: bool,
//! }
//!
//! fn accessor<'a>(work: &'a Work, field: &str) -> Value<'a> {
//!     match field {
//!         "title" => Value::Text(&work.title),
//!         "upvotesCount" => Value::Number(Number::from(work.upvotes)),
//!         "isEditorsChoice" => Value::Bool(work.editors_choice),
//!         _ => Value::None,
//!     }
//! }
//!
//! let schema = Schema::new()
//!     .searchable("title", FieldType::Text)
//!     .field("upvotesCount", FieldType::Number)
//!     .field("isEditorsChoice", FieldType::Bool);
//!
//! let works = vec![
//!     Work { title: "Spiral Vase".into(), upvotes: 40, editors_choice: true },
//!     Work { title: "Tea Bowl Set".into(), upvotes: 95, editors_choice: true },
//!     Work { title: "Ceramic Vessel No. 9".into(), upvotes: 12, editors_choice: false },
//! ];
//!
//! let query = ListQuery::new()
//!     .filter_eq("isEditorsChoice", true)
//!     .sort_desc("upvotesCount")
//!     .page_size(12)
//!     .build();
//!
//! let page = query.run(&works, &schema, accessor).unwrap();
//! assert_eq!(page.total_matched, 2);
//! assert_eq!(page.items[0].title, "Tea Bowl Set");
//! assert_eq!(page.total_pages, 1);
//! ```
//!
//! # Pipeline
//!
//! ```text
//! filter (AND) -> search (OR across fields) -> count -> stable sort -> page
//! ```
//!
//! `total_matched` is counted after filtering and searching but before
//! paging. Records whose sort field is missing sort after every present
//! value, ascending or descending. Records that compare equal keep their
//! input order.
//!
//! # Field Types and Operators
//!
//! | Type | Operators |
//! |------|-----------|
//! | Text | `Eq`, `Ne`, `StartsWith`, `EndsWith`, `Contains`, `Regex`, `In` |
//! | TextList | `Has`, `Contains` |
//! | Number | `Eq`, `Ne`, `Gt`, `Gte`, `Lt`, `Lte` |
//! | Timestamp | `Eq`, `Ne`, `Before`, `After`, `Gt`, `Gte`, `Lt`, `Lte` |
//! | Enum | `Eq`, `Ne`, `In` |
//! | Bool | `Eq`, `Ne`, `Is` |
//!
//! # Errors
//!
//! Queries are validated against the [`Schema`] before any record is
//! touched. A query naming a field the schema lacks fails with
//! [`QueryError::UnknownField`]; anything else malformed (page 0, page size
//! 0, an operator the field type does not support, a bad regex) fails with
//! [`QueryError::InvalidQuery`]. A page past the end is not an error.

mod error;
mod filter;
mod op;
mod page;
mod query;
mod schema;
mod sort;
mod traits;
mod value;

// Re-export public API
pub use error::{ClauseKind, QueryError, Result};
pub use filter::{Filter, FilterValue};
pub use op::Op;
pub use page::{total_pages, ResultPage};
pub use query::{query, ListQuery, Plan, Search, DEFAULT_PAGE_SIZE};
pub use schema::{FieldDef, FieldType, Schema};
pub use sort::{compare_values, Dir, SortKey};
pub use traits::{QueryEnum, QueryNumber, QueryText, QueryTextList, QueryTimestamp, Queryable};
pub use value::{Number, Timestamp, Value};
