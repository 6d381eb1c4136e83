//! Record collections behind the listings.
//!
//! Each listing reads one kind of record. The binary ships a mock dataset
//! for every kind; `--data` swaps in a JSON array from disk.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Errors loading a dataset.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to read data from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid {kind} data in {origin}: {source}")]
    Parse {
        kind: RecordKind,
        origin: String,
        #[source]
        source: serde_json::Error,
    },
}

/// The record type a listing is built over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    ForumPosts,
    PortfolioWorks,
    Notes,
    Activities,
}

impl RecordKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RecordKind::ForumPosts => "forum_posts",
            RecordKind::PortfolioWorks => "portfolio_works",
            RecordKind::Notes => "notes",
            RecordKind::Activities => "activities",
        }
    }

    fn builtin_json(self) -> &'static str {
        match self {
            RecordKind::ForumPosts => include_str!("../data/forum_posts.json"),
            RecordKind::PortfolioWorks => include_str!("../data/portfolio_works.json"),
            RecordKind::Notes => include_str!("../data/notes.json"),
            RecordKind::Activities => include_str!("../data/activities.json"),
        }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Loads the records of `kind`, from `path` when given, else the built-in set.
pub fn load<T: DeserializeOwned>(kind: RecordKind, path: Option<&Path>) -> Result<Vec<T>, DataError> {
    let (content, origin) = match path {
        Some(path) => {
            let content = std::fs::read_to_string(path).map_err(|source| DataError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            (content, path.display().to_string())
        }
        None => (kind.builtin_json().to_string(), "built-in dataset".to_string()),
    };

    let records: Vec<T> = serde_json::from_str(&content).map_err(|source| DataError::Parse {
        kind,
        origin: origin.clone(),
        source,
    })?;
    debug!(%kind, %origin, count = records.len(), "loaded records");
    Ok(records)
}
