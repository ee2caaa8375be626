//! Error types shared by the index builder and the query engine

use std::path::PathBuf;
use thiserror::Error;

/// Failures while turning the content tree into an artifact.
///
/// All of these are fatal for a build: the CLI reports them and exits non-zero.
#[derive(Error, Debug)]
pub enum BuildError {
    #[error("cannot read content directory {path:?}: {source}")]
    ContentRoot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot read document {path:?}: {source}")]
    Document {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("content traversal failed: {0}")]
    Walk(#[from] ignore::Error),
    #[error("failed to serialize artifact: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("cannot write artifact {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failures on the query side. None of these reach the end user as a panic;
/// the session turns them into `Error` state or an empty result set.
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("failed to fetch search artifact: {0}")]
    Fetch(String),
    #[error("failed to parse search artifact: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("search index error: {0}")]
    Index(#[from] tantivy::TantivyError),
}
