//! Query builder and executor.
//!
//! A [`ListQuery`] describes which records to keep, how to order them and
//! which page to return. It is validated against a [`Schema`] and then run
//! over a slice of records:
//!
//! 1. filters, left to right, short-circuiting per record
//! 2. free-text search across the designated text fields
//! 3. count the survivors
//! 4. stable sort by the sort keys
//! 5. slice out the requested page

use regex::Regex;
use tracing::{debug, trace};

use crate::error::{ClauseKind, QueryError, Result};
use crate::filter::{Filter, FilterValue};
use crate::op::Op;
use crate::page::ResultPage;
use crate::schema::{FieldType, Schema};
use crate::sort::{compare_keys, Dir, SortKey};
use crate::traits::Queryable;
use crate::value::{Timestamp, Value};

/// Page size used when a query does not set one.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Free-text search part of a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Search {
    /// The term to look for, case-insensitively. Matched as given,
    /// whitespace included; an empty term disables search.
    pub term: String,
    /// Fields to look in. Empty means the schema's searchable fields.
    pub fields: Vec<String>,
}

/// A declarative list query: filters, search, sort and page.
///
/// # Example
///
/// ```
/// use kiln_query::{FieldType, ListQuery, Schema, Value};
///
/// struct Post {
///     title: String,
///     category: String,
/// }
///
/// fn accessor<'a>(post: &'a Post, field: &str) -> Value<'a> {
///     match field {
///         "title" => Value::Text(&post.title),
///         "categoryName" => Value::Text(&post.category),
///         _ => Value::None,
///     }
/// }
///
/// let schema = Schema::new()
///     .searchable("title", FieldType::Text)
///     .field("categoryName", FieldType::Text);
///
/// let posts = vec![
///     Post { title: "Glazing Techniques for Beginners".into(), category: "How To".into() },
///     Post { title: "Tea Bowl Set".into(), category: "Showcase".into() },
///     Post { title: "Ash glazing results".into(), category: "Showcase".into() },
/// ];
///
/// let query = ListQuery::new()
///     .filter_eq("categoryName", "Showcase")
///     .search("GLAZING")
///     .sort_asc("title")
///     .page_size(10)
///     .build();
///
/// let page = query.run(&posts, &schema, accessor).unwrap();
/// assert_eq!(page.total_matched, 1);
/// assert_eq!(page.items[0].title, "Ash glazing results");
/// ```
#[derive(Debug, Clone)]
pub struct ListQuery {
    filters: Vec<Filter>,
    search: Option<Search>,
    sort: Vec<SortKey>,
    page: usize,
    page_size: usize,
}

impl Default for ListQuery {
    fn default() -> Self {
        ListQuery {
            filters: Vec::new(),
            search: None,
            sort: Vec::new(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ListQuery {
    /// Creates a query that matches everything, unsorted, page 1 of
    /// [`DEFAULT_PAGE_SIZE`].
    pub fn new() -> Self {
        ListQuery::default()
    }

    // ========================================================================
    // Filters
    // ========================================================================

    /// Adds a filter. Records must satisfy every filter.
    pub fn filter(mut self, field: &str, op: Op, value: impl Into<FilterValue>) -> Self {
        self.filters.push(Filter::new(field, op, value));
        self
    }

    /// Adds an equality filter.
    pub fn filter_eq(self, field: &str, value: impl Into<FilterValue>) -> Self {
        self.filter(field, Op::Eq, value)
    }

    /// Adds a not-equal filter.
    pub fn filter_ne(self, field: &str, value: impl Into<FilterValue>) -> Self {
        self.filter(field, Op::Ne, value)
    }

    /// Adds a greater-than filter.
    pub fn filter_gt(self, field: &str, value: impl Into<FilterValue>) -> Self {
        self.filter(field, Op::Gt, value)
    }

    /// Adds a greater-than-or-equal filter.
    pub fn filter_gte(self, field: &str, value: impl Into<FilterValue>) -> Self {
        self.filter(field, Op::Gte, value)
    }

    /// Adds a less-than filter.
    pub fn filter_lt(self, field: &str, value: impl Into<FilterValue>) -> Self {
        self.filter(field, Op::Lt, value)
    }

    /// Adds a less-than-or-equal filter.
    pub fn filter_lte(self, field: &str, value: impl Into<FilterValue>) -> Self {
        self.filter(field, Op::Lte, value)
    }

    /// Adds a case-sensitive substring filter.
    pub fn filter_contains(self, field: &str, value: &str) -> Self {
        self.filter(field, Op::Contains, value)
    }

    /// Adds a prefix filter.
    pub fn filter_startswith(self, field: &str, value: &str) -> Self {
        self.filter(field, Op::StartsWith, value)
    }

    /// Adds a suffix filter.
    pub fn filter_endswith(self, field: &str, value: &str) -> Self {
        self.filter(field, Op::EndsWith, value)
    }

    /// Adds a regular-expression filter.
    ///
    /// Fails with [`QueryError::InvalidQuery`] if the pattern does not compile.
    pub fn filter_regex(self, field: &str, pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern).map_err(|err| {
            QueryError::invalid(format!("invalid regex pattern for '{}': {}", field, err))
        })?;
        Ok(self.filter(field, Op::Regex, regex))
    }

    /// Adds a filter keeping text values found in `values`.
    pub fn filter_in<I, S>(self, field: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set: Vec<String> = values.into_iter().map(Into::into).collect();
        self.filter(field, Op::In, FilterValue::TextSet(set))
    }

    /// Adds a filter keeping enum discriminants found in `values`.
    pub fn filter_in_enum<I>(self, field: &str, values: I) -> Self
    where
        I: IntoIterator<Item = u32>,
    {
        let set: Vec<u32> = values.into_iter().collect();
        self.filter(field, Op::In, FilterValue::EnumSet(set))
    }

    /// Adds a filter keeping records whose list field has `value` as an element.
    pub fn filter_has(self, field: &str, value: &str) -> Self {
        self.filter(field, Op::Has, value)
    }

    /// Adds a filter keeping timestamps earlier than `ts`.
    pub fn filter_before(self, field: &str, ts: Timestamp) -> Self {
        self.filter(field, Op::Before, ts)
    }

    /// Adds a filter keeping timestamps later than `ts`.
    pub fn filter_after(self, field: &str, ts: Timestamp) -> Self {
        self.filter(field, Op::After, ts)
    }

    // ========================================================================
    // Search
    // ========================================================================

    /// Searches the schema's searchable fields for `term`.
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(Search {
            term: term.into(),
            fields: Vec::new(),
        });
        self
    }

    /// Searches the given fields for `term`.
    pub fn search_in<I, S>(mut self, term: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.search = Some(Search {
            term: term.into(),
            fields: fields.into_iter().map(Into::into).collect(),
        });
        self
    }

    // ========================================================================
    // Sort
    // ========================================================================

    /// Adds a sort key. The first key added is the primary key.
    pub fn sort_by(mut self, field: &str, dir: Dir) -> Self {
        self.sort.push(SortKey::new(field, dir));
        self
    }

    /// Adds an ascending sort key.
    pub fn sort_asc(self, field: &str) -> Self {
        self.sort_by(field, Dir::Asc)
    }

    /// Adds a descending sort key.
    pub fn sort_desc(self, field: &str) -> Self {
        self.sort_by(field, Dir::Desc)
    }

    // ========================================================================
    // Pagination
    // ========================================================================

    /// Sets the 1-indexed page to return.
    pub fn page(mut self, page: usize) -> Self {
        self.page = page;
        self
    }

    /// Sets the number of records per page.
    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Finalizes the query.
    pub fn build(self) -> Self {
        self
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    /// Returns the filters in evaluation order.
    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    /// Returns the search clause, if any.
    pub fn get_search(&self) -> Option<&Search> {
        self.search.as_ref()
    }

    /// Returns the sort keys, primary first.
    pub fn sort_keys(&self) -> &[SortKey] {
        &self.sort
    }

    /// Returns the requested page.
    pub fn get_page(&self) -> usize {
        self.page
    }

    /// Returns the requested page size.
    pub fn get_page_size(&self) -> usize {
        self.page_size
    }

    // ========================================================================
    // Validation and execution
    // ========================================================================

    /// Checks this query against a schema without running it.
    pub fn validate(&self, schema: &Schema) -> Result<()> {
        self.plan(schema).map(|_| ())
    }

    /// Validates this query and resolves its search fields.
    ///
    /// The returned [`Plan`] can be executed repeatedly against different
    /// collections of the same record type.
    pub fn plan<'q>(&'q self, schema: &'q Schema) -> Result<Plan<'q>> {
        if self.page == 0 {
            return Err(QueryError::invalid("page must be at least 1"));
        }
        if self.page_size == 0 {
            return Err(QueryError::invalid("page_size must be greater than 0"));
        }

        let mut filter_types = Vec::with_capacity(self.filters.len());
        for filter in &self.filters {
            let ty = schema
                .type_of(&filter.field)
                .ok_or_else(|| QueryError::unknown_field(&filter.field, ClauseKind::Filter))?;
            filter.check(ty)?;
            filter_types.push(ty);
        }

        let mut search_fields = Vec::new();
        let mut search_types = Vec::new();
        let mut needle = None;
        if let Some(search) = &self.search {
            search_fields = if search.fields.is_empty() {
                schema.search_fields().collect()
            } else {
                search.fields.iter().map(String::as_str).collect()
            };
            for field in &search_fields {
                let ty = schema
                    .type_of(field)
                    .ok_or_else(|| QueryError::unknown_field(field, ClauseKind::Search))?;
                if !ty.is_searchable() {
                    return Err(QueryError::invalid(format!(
                        "cannot search {} field '{}'",
                        ty, field
                    )));
                }
                search_types.push(ty);
            }
            // Whitespace is part of the term; only an empty term disables search.
            if !search.term.is_empty() {
                if search_fields.is_empty() {
                    return Err(QueryError::invalid(
                        "search term given but no searchable fields are declared",
                    ));
                }
                needle = Some(search.term.to_lowercase());
            }
        }

        let mut sort_types = Vec::with_capacity(self.sort.len());
        for key in &self.sort {
            let ty = schema
                .type_of(&key.field)
                .ok_or_else(|| QueryError::unknown_field(&key.field, ClauseKind::Sort))?;
            sort_types.push(ty);
        }

        trace!(
            filters = self.filters.len(),
            search = needle.is_some(),
            sort_keys = self.sort.len(),
            "list query validated"
        );

        Ok(Plan {
            query: self,
            filter_types,
            search_fields,
            search_types,
            sort_types,
            needle,
        })
    }

    /// Runs this query over `items` using `accessor` to read fields.
    pub fn run<'a, T, F>(
        &self,
        items: &'a [T],
        schema: &Schema,
        accessor: F,
    ) -> Result<ResultPage<&'a T>>
    where
        for<'b> F: Fn(&'b T, &str) -> Value<'b>,
    {
        Ok(self.plan(schema)?.execute(items, accessor))
    }

    /// Runs this query over records that describe their own schema.
    pub fn run_on<'a, T: Queryable>(&self, items: &'a [T]) -> Result<ResultPage<&'a T>> {
        let schema = T::schema();
        self.run(items, &schema, T::accessor)
    }
}

/// Runs `spec` over `collection`.
///
/// Free-function form of [`ListQuery::run`].
pub fn query<'a, T, F>(
    collection: &'a [T],
    schema: &Schema,
    spec: &ListQuery,
    accessor: F,
) -> Result<ResultPage<&'a T>>
where
    for<'b> F: Fn(&'b T, &str) -> Value<'b>,
{
    spec.run(collection, schema, accessor)
}

/// A validated query, ready to execute.
///
/// Every field a clause reads is resolved to its declared [`FieldType`],
/// and accessor values are read as that type before they are compared.
#[derive(Debug, Clone)]
pub struct Plan<'q> {
    query: &'q ListQuery,
    filter_types: Vec<FieldType>,
    search_fields: Vec<&'q str>,
    search_types: Vec<FieldType>,
    sort_types: Vec<FieldType>,
    needle: Option<String>,
}

impl<'q> Plan<'q> {
    /// Returns the fields free-text search will look in.
    pub fn search_fields(&self) -> &[&'q str] {
        &self.search_fields
    }

    /// Tests one record against the filters and the search term.
    pub fn matches<T, F>(&self, item: &T, accessor: F) -> bool
    where
        for<'b> F: Fn(&'b T, &str) -> Value<'b>,
    {
        let passes_filters = self
            .query
            .filters
            .iter()
            .zip(&self.filter_types)
            .all(|(filter, ty)| filter.matches(&ty.coerce(accessor(item, &filter.field))));
        if !passes_filters {
            return false;
        }

        match &self.needle {
            Some(needle) => self
                .search_fields
                .iter()
                .zip(&self.search_types)
                .any(|(field, ty)| ty.coerce(accessor(item, field)).contains_folded(needle)),
            None => true,
        }
    }

    /// Counts matching records.
    pub fn count<T, F>(&self, items: &[T], accessor: F) -> usize
    where
        for<'b> F: Fn(&'b T, &str) -> Value<'b>,
    {
        items
            .iter()
            .filter(|item| self.matches(*item, &accessor))
            .count()
    }

    /// Returns every matching record in sorted order, without pagination.
    pub fn all_matching<'a, T, F>(&self, items: &'a [T], accessor: F) -> Vec<&'a T>
    where
        for<'b> F: Fn(&'b T, &str) -> Value<'b>,
    {
        let matched: Vec<&'a T> = items
            .iter()
            .filter(|item| self.matches(*item, &accessor))
            .collect();

        let keys = &self.query.sort;
        if keys.is_empty() {
            return matched;
        }

        // Read each record's sort values once, then sort stably on them.
        let mut keyed: Vec<(Vec<Value<'a>>, &'a T)> = matched
            .into_iter()
            .map(|item| {
                let values = keys
                    .iter()
                    .zip(&self.sort_types)
                    .map(|(key, ty)| ty.coerce(accessor(item, &key.field)))
                    .collect();
                (values, item)
            })
            .collect();
        keyed.sort_by(|(a, _), (b, _)| compare_keys(a, b, keys));
        keyed.into_iter().map(|(_, item)| item).collect()
    }

    /// Filters, searches, sorts and paginates `items`.
    pub fn execute<'a, T, F>(&self, items: &'a [T], accessor: F) -> ResultPage<&'a T>
    where
        for<'b> F: Fn(&'b T, &str) -> Value<'b>,
    {
        let sorted = self.all_matching(items, accessor);
        let page = ResultPage::slice(sorted, self.query.page, self.query.page_size);

        debug!(
            collection = items.len(),
            matched = page.total_matched,
            page = page.page,
            page_size = page.page_size,
            total_pages = page.total_pages,
            returned = page.items.len(),
            "list query executed"
        );

        page
    }
}
