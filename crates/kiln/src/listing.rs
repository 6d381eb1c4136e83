//! Running a listing: profile + parameters + records in, one rendered page out.

use std::path::Path;

use kiln_query::{QueryError, Queryable, ResultPage};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::datasets::{self, DataError, RecordKind};
use crate::output::{self, OutputMode, SerializeError};
use crate::params::{ParamError, SearchParams};
use crate::profile::{ListingProfile, ProfileError};
use crate::records::{Activity, ForumPost, Note, PortfolioWork};

/// Anything that can stop a listing from rendering.
#[derive(Debug, Error)]
pub enum ListingError {
    #[error(transparent)]
    Profile(#[from] ProfileError),

    #[error(transparent)]
    Param(#[from] ParamError),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Serialize(#[from] SerializeError),
}

/// One page of a listing, with what the user asked for.
///
/// This is what structured output modes emit and what the text template
/// renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingView<T> {
    pub listing: String,
    pub page: usize,
    pub page_size: usize,
    pub total_matched: usize,
    pub total_pages: usize,
    pub has_next: bool,
    pub has_previous: bool,
    /// The active search term, if any.
    pub search: Option<String>,
    /// Active user filters as `param: value`.
    pub filters: Vec<String>,
    /// Label of the sort option in effect.
    pub sort: Option<String>,
    pub items: Vec<T>,
}

impl<T> ListingView<T> {
    fn new(profile: &ListingProfile, params: &SearchParams, page: ResultPage<T>) -> Self {
        let search = profile
            .search
            .as_ref()
            .and_then(|s| params.get(&s.param))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from);

        let filters = profile
            .filters
            .iter()
            .filter_map(|f| f.active_value(params).map(|v| format!("{}: {}", f.param, v)))
            .collect();

        let sort = profile.sort.as_ref().map(|s| {
            params
                .get(&s.param)
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .unwrap_or(s.default.as_str())
                .to_string()
        });

        ListingView {
            listing: profile.name.clone(),
            page: page.page,
            page_size: page.page_size,
            total_matched: page.total_matched,
            total_pages: page.total_pages,
            has_next: page.has_next(),
            has_previous: page.has_previous(),
            search,
            filters,
            sort,
            items: page.items,
        }
    }
}

/// Queries `records` the way `profile` describes for `params`.
pub fn view<'a, T: Queryable>(
    profile: &ListingProfile,
    params: &SearchParams,
    records: &'a [T],
) -> Result<ListingView<&'a T>, ListingError> {
    let schema = T::schema();
    let query = profile.build_query(params, &schema)?;
    let page = query.run(records, &schema, T::accessor)?;
    info!(
        listing = %profile.name,
        matched = page.total_matched,
        page = page.page,
        "listing queried"
    );
    Ok(ListingView::new(profile, params, page))
}

fn render_records<T>(
    profile: &ListingProfile,
    params: &SearchParams,
    data: Option<&Path>,
    mode: OutputMode,
) -> Result<String, ListingError>
where
    T: Queryable + Serialize + DeserializeOwned,
{
    let records: Vec<T> = datasets::load(profile.records, data)?;
    let view = view(profile, params, &records)?;
    Ok(output::render(&view, mode)?)
}

/// Loads the listing's records, runs its query and renders the page.
///
/// `data` replaces the built-in dataset for the profile's record kind.
pub fn run(
    profile: &ListingProfile,
    params: &SearchParams,
    data: Option<&Path>,
    mode: OutputMode,
) -> Result<String, ListingError> {
    debug!(listing = %profile.name, params = %params.to_query_string(), ?mode, "running listing");
    match profile.records {
        RecordKind::ForumPosts => render_records::<ForumPost>(profile, params, data, mode),
        RecordKind::PortfolioWorks => render_records::<PortfolioWork>(profile, params, data, mode),
        RecordKind::Notes => render_records::<Note>(profile, params, data, mode),
        RecordKind::Activities => render_records::<Activity>(profile, params, data, mode),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::Profiles;

    fn forum() -> ListingProfile {
        Profiles::builtin().unwrap().get("forum").unwrap().clone()
    }

    fn posts() -> Vec<ForumPost> {
        datasets::load(RecordKind::ForumPosts, None).unwrap()
    }

    #[test]
    fn default_forum_page() {
        let posts = posts();
        let view = view(&forum(), &SearchParams::default(), &posts).unwrap();

        assert_eq!(view.total_matched, 23);
        assert_eq!(view.total_pages, 3);
        assert_eq!(view.items.len(), 10);
        assert!(view.has_next);
        assert!(!view.has_previous);
        assert!(view.items.iter().all(|p| !p.is_pinned));
        assert_eq!(view.sort.as_deref(), Some("Latest Activity"));
        assert!(view.filters.is_empty());
        assert_eq!(view.items[0].id, 2);
    }

    #[test]
    fn summary_reflects_params() {
        let posts = posts();
        let params = SearchParams::parse("category=How+To&q=glazing&sort=Newest");
        let view = view(&forum(), &params, &posts).unwrap();

        assert_eq!(view.search.as_deref(), Some("glazing"));
        assert_eq!(view.filters, vec!["category: How To".to_string()]);
        assert_eq!(view.sort.as_deref(), Some("Newest"));
        assert!(view.items.iter().all(|p| p.category_name == "How To"));
    }

    #[test]
    fn page_zero_is_an_engine_error() {
        let posts = posts();
        let err = view(&forum(), &SearchParams::parse("page=0"), &posts).unwrap_err();
        assert!(matches!(err, ListingError::Query(QueryError::InvalidQuery { .. })));
    }

    #[test]
    fn profile_naming_missing_field_fails_at_query_time() {
        let profiles = Profiles::from_yaml(
            r#"
- name: broken
  records: notes
  sort:
    default: Priority
    options:
      - label: Priority
        keys: [{ field: priority, dir: desc }]
"#,
        )
        .unwrap();
        let err = run(
            profiles.get("broken").unwrap(),
            &SearchParams::default(),
            None,
            OutputMode::Json,
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "unknown field 'priority' in sort clause");
    }
}
