//! Error types for the query engine.

use thiserror::Error;

/// The part of a query that referenced a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClauseKind {
    /// A filter predicate.
    Filter,
    /// A free-text search field.
    Search,
    /// A sort key.
    Sort,
}

impl ClauseKind {
    /// Returns the display name of this clause kind.
    pub fn as_str(self) -> &'static str {
        match self {
            ClauseKind::Filter => "filter",
            ClauseKind::Search => "search",
            ClauseKind::Sort => "sort",
        }
    }
}

impl std::fmt::Display for ClauseKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Errors raised when a query cannot be executed.
///
/// Both variants describe mistakes in how the caller built the query.
/// Neither is transient, so neither is worth retrying.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// Malformed query: bad pagination, an operator the field type does not
    /// support, a filter value of the wrong kind, or an invalid pattern.
    #[error("invalid query: {reason}")]
    InvalidQuery { reason: String },

    /// A clause names a field the record schema does not declare.
    #[error("unknown field '{field}' in {clause} clause")]
    UnknownField { field: String, clause: ClauseKind },
}

impl QueryError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        QueryError::InvalidQuery {
            reason: reason.into(),
        }
    }

    pub(crate) fn unknown_field(field: &str, clause: ClauseKind) -> Self {
        QueryError::UnknownField {
            field: field.to_string(),
            clause,
        }
    }
}

/// Result type for query operations.
pub type Result<T> = std::result::Result<T, QueryError>;
