//! Listing profiles.
//!
//! A [`ListingProfile`] describes how one listing screen turns its
//! query-string parameters into a [`ListQuery`]: which parameter holds the
//! search term, which sort labels exist, which parameters filter which
//! fields, and which filters always apply.
//!
//! Profiles are YAML. The built-in set is embedded at compile time and can
//! be replaced wholesale from a file.

use std::path::{Path, PathBuf};

use kiln_query::{ListQuery, Op, Schema, SortKey};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::datasets::RecordKind;
use crate::params::{filter_value, ParamError, SearchParams};

const BUILTIN_PROFILES: &str = include_str!("../profiles/listings.yaml");

/// Name of the page-number parameter, shared by every listing.
pub const PAGE_PARAM: &str = "page";

/// Errors loading or looking up profiles.
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("failed to read profiles from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid profile YAML: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("unknown listing '{name}' (available: {available})")]
    UnknownListing { name: String, available: String },

    #[error("profile '{listing}' is invalid: {reason}")]
    Invalid { listing: String, reason: String },
}

/// How one listing maps parameters onto a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListingProfile {
    pub name: String,
    pub records: RecordKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<SearchSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortSpec>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<FilterSpec>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub base_filters: Vec<BaseFilter>,
}

fn default_page_size() -> usize {
    kiln_query::DEFAULT_PAGE_SIZE
}

fn default_search_param() -> String {
    "q".to_string()
}

fn default_sort_param() -> String {
    "sort".to_string()
}

fn default_op() -> Op {
    Op::Eq
}

/// Free-text search parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SearchSpec {
    #[serde(default = "default_search_param")]
    pub param: String,
    /// Fields to search; empty means the record's searchable fields.
    #[serde(default)]
    pub fields: Vec<String>,
}

/// Sort parameter and its labelled options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SortSpec {
    #[serde(default = "default_sort_param")]
    pub param: String,
    /// Label used when the parameter is absent.
    pub default: String,
    pub options: Vec<SortOption>,
}

impl SortSpec {
    /// Finds the option with the given label.
    pub fn option(&self, label: &str) -> Option<&SortOption> {
        self.options.iter().find(|o| o.label == label)
    }

    /// Comma-separated option labels, for error messages.
    pub fn labels(&self) -> String {
        self.options
            .iter()
            .map(|o| o.label.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// One user-selectable ordering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SortOption {
    pub label: String,
    /// Sort keys, primary first.
    pub keys: Vec<SortKey>,
}

/// A parameter that filters one field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilterSpec {
    pub param: String,
    pub field: String,
    #[serde(default = "default_op")]
    pub op: Op,
    /// Value meaning "do not filter", such as `All`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub all: Option<String>,
    /// Accepted values; empty accepts anything.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<String>,
}

impl FilterSpec {
    /// Returns the value this filter applies for, if any.
    ///
    /// Absent, blank and "all" values disable the filter.
    pub fn active_value<'p>(&self, params: &'p SearchParams) -> Option<&'p str> {
        let raw = params.get(&self.param)?.trim();
        if raw.is_empty() || self.all.as_deref() == Some(raw) {
            return None;
        }
        Some(raw)
    }
}

/// A filter applied to every query of a listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BaseFilter {
    pub field: String,
    #[serde(default = "default_op")]
    pub op: Op,
    pub value: String,
}

impl ListingProfile {
    /// Names of every parameter this listing understands.
    pub fn params(&self) -> Vec<&str> {
        let mut names = vec![PAGE_PARAM];
        if let Some(search) = &self.search {
            names.push(search.param.as_str());
        }
        if let Some(sort) = &self.sort {
            names.push(sort.param.as_str());
        }
        names.extend(self.filters.iter().map(|f| f.param.as_str()));
        names
    }

    /// Translates query-string parameters into a list query.
    ///
    /// Malformed values are rejected rather than replaced by defaults. Page
    /// 0 is passed through for the engine to reject. Field names are not
    /// checked here: a profile naming a missing field fails when the query
    /// runs.
    pub fn build_query(&self, params: &SearchParams, schema: &Schema) -> Result<ListQuery, ParamError> {
        let mut query = ListQuery::new().page_size(self.page_size);

        if let Some(raw) = params.get(PAGE_PARAM) {
            let page = raw.trim().parse::<usize>().map_err(|_| ParamError::InvalidValue {
                param: PAGE_PARAM.to_string(),
                value: raw.to_string(),
                expected: "a positive integer".to_string(),
            })?;
            query = query.page(page);
        }

        for base in &self.base_filters {
            let value = filter_value(schema, &base.field, base.op, &base.value, &base.field)?;
            query = query.filter(&base.field, base.op, value);
        }

        for spec in &self.filters {
            let Some(raw) = spec.active_value(params) else {
                continue;
            };
            if !spec.choices.is_empty() && !spec.choices.iter().any(|c| c == raw) {
                return Err(ParamError::NotAChoice {
                    param: spec.param.clone(),
                    value: raw.to_string(),
                    choices: spec.choices.join(", "),
                });
            }
            let value = filter_value(schema, &spec.field, spec.op, raw, &spec.param)?;
            query = query.filter(&spec.field, spec.op, value);
        }

        if let Some(search) = &self.search {
            if let Some(term) = params.get(&search.param).map(str::trim).filter(|t| !t.is_empty()) {
                query = if search.fields.is_empty() {
                    query.search(term)
                } else {
                    query.search_in(term, search.fields.iter().cloned())
                };
            }
        }

        if let Some(sort) = &self.sort {
            let label = params
                .get(&sort.param)
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .unwrap_or(sort.default.as_str());
            let option = sort.option(label).ok_or_else(|| ParamError::UnknownSortOption {
                param: sort.param.clone(),
                value: label.to_string(),
                options: sort.labels(),
            })?;
            for key in &option.keys {
                query = query.sort_by(&key.field, key.dir);
            }
        }

        debug!(listing = %self.name, "built list query from parameters");
        Ok(query.build())
    }

    fn check(&self) -> Result<(), ProfileError> {
        let invalid = |reason: String| ProfileError::Invalid {
            listing: self.name.clone(),
            reason,
        };

        if self.page_size == 0 {
            return Err(invalid("page_size must be greater than 0".to_string()));
        }
        if let Some(sort) = &self.sort {
            if sort.options.is_empty() {
                return Err(invalid("sort needs at least one option".to_string()));
            }
            if sort.option(&sort.default).is_none() {
                return Err(invalid(format!(
                    "default sort '{}' is not one of: {}",
                    sort.default,
                    sort.labels()
                )));
            }
        }
        let params = self.params();
        for (i, name) in params.iter().enumerate() {
            if params[..i].contains(name) {
                return Err(invalid(format!("parameter '{}' is declared twice", name)));
            }
        }
        Ok(())
    }
}

/// A named set of listing profiles.
#[derive(Debug, Clone, PartialEq)]
pub struct Profiles {
    profiles: Vec<ListingProfile>,
}

impl Profiles {
    /// Loads the profiles compiled into the binary.
    pub fn builtin() -> Result<Self, ProfileError> {
        Profiles::from_yaml(BUILTIN_PROFILES)
    }

    /// Loads profiles from a YAML file.
    pub fn from_path(path: &Path) -> Result<Self, ProfileError> {
        let content = std::fs::read_to_string(path).map_err(|source| ProfileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loading listing profiles");
        Profiles::from_yaml(&content)
    }

    /// Parses and checks a YAML list of profiles.
    pub fn from_yaml(content: &str) -> Result<Self, ProfileError> {
        let profiles: Vec<ListingProfile> = serde_yaml::from_str(content)?;
        for (i, profile) in profiles.iter().enumerate() {
            profile.check()?;
            if profiles[..i].iter().any(|p| p.name == profile.name) {
                return Err(ProfileError::Invalid {
                    listing: profile.name.clone(),
                    reason: "listing name is used twice".to_string(),
                });
            }
        }
        Ok(Profiles { profiles })
    }

    /// Looks up a profile by listing name.
    pub fn get(&self, name: &str) -> Result<&ListingProfile, ProfileError> {
        self.profiles
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| ProfileError::UnknownListing {
                name: name.to_string(),
                available: self.names().join(", "),
            })
    }

    /// Listing names in declaration order.
    pub fn names(&self) -> Vec<&str> {
        self.profiles.iter().map(|p| p.name.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ListingProfile> {
        self.profiles.iter()
    }
}
