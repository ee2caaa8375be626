//! docsearch - search for documentation sites
//!
//! Two halves that meet at a static JSON artifact:
//! - [`indexer`] scans a markdown content tree at site-build time and writes
//!   the artifact.
//! - [`session`] loads the artifact lazily in a browsing session, builds the
//!   [`engine`] index once, and serves debounced, field-weighted
//!   ([`ranker`]) queries with highlighted snippets ([`highlight`]).

pub mod config;
pub mod engine;
pub mod error;
pub mod highlight;
pub mod indexer;
pub mod output;
pub mod ranker;
pub mod session;
pub mod watcher;

pub use config::{BuildConfig, Config, EngineConfig};
pub use engine::{FieldResult, QueryEngine, SearchField, SearchOptions};
pub use error::{BuildError, SearchError};
pub use indexer::{Artifact, Document, Indexer};
pub use ranker::FieldWeights;
pub use session::{
    ArtifactSource, FileSource, Key, KeyOutcome, MemorySource, SearchOutcome, SearchResult,
    SearchSession, SessionState,
};
