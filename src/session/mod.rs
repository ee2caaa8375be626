//! Per-session search state: lazy artifact loading, debounced queries,
//! highlighted results and keyboard selection.
//!
//! A session starts `Uninitialized`. The first `open()` fetches the
//! artifact and builds the index (`Loading`), ending in `Ready` or `Error`.
//! A ready engine is reused for every later open/close cycle.

mod debounce;
mod source;

use serde::Serialize;
use std::fmt;
use std::sync::Arc;

use crate::config::EngineConfig;
use crate::engine::{QueryEngine, SearchOptions};
use crate::error::SearchError;
use crate::highlight::{content_snippet, highlight_text};
use crate::indexer::{Artifact, Document};
use crate::ranker::rank;

pub use debounce::{Debouncer, Ticket};
pub use source::{ArtifactSource, FileSource, MemorySource};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    Loading,
    Ready,
    /// Fetch or parse failed; search stays unavailable until `retry`
    Error(String),
}

impl SessionState {
    pub fn is_ready(&self) -> bool {
        matches!(self, SessionState::Ready)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Uninitialized => f.write_str("uninitialized"),
            SessionState::Loading => f.write_str("loading"),
            SessionState::Ready => f.write_str("ready"),
            SessionState::Error(msg) => write!(f, "unavailable: {}", msg),
        }
    }
}

/// HTML fragments with query terms marked
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Highlights {
    pub title: String,
    pub description: String,
    pub content: String,
}

/// A ranked document ready for display
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    #[serde(flatten)]
    pub doc: Document,
    pub score: u32,
    pub highlights: Highlights,
}

impl SearchResult {
    fn new(doc: Document, score: u32, query: &str, config: &EngineConfig) -> Self {
        let snippet = content_snippet(&doc.content, query, config.snippet_chars, config.snippet_context);
        let highlights = Highlights {
            title: highlight_text(&doc.title, query),
            description: highlight_text(&doc.description, query),
            content: highlight_text(&snippet, query),
        };
        Self {
            doc,
            score,
            highlights,
        }
    }
}

#[derive(Debug)]
pub enum SearchOutcome<'a> {
    Completed(&'a [SearchResult]),
    /// A newer query (or a close) arrived while this one was waiting
    Superseded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowDown,
    ArrowUp,
    Enter,
    Escape,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    Ignored,
    /// Selection moved; the host should scroll this result into view
    Select(usize),
    /// Go to this slug. The surface has already been closed.
    Navigate(String),
    Closed,
}

/// Search surface state owned by the hosting UI
pub struct SearchSession<S: ArtifactSource> {
    source: S,
    config: EngineConfig,
    state: SessionState,
    engine: Option<Arc<QueryEngine>>,
    debouncer: Debouncer,
    is_open: bool,
    query: String,
    results: Vec<SearchResult>,
    selected: usize,
}

impl<S: ArtifactSource> SearchSession<S> {
    pub fn new(source: S, config: EngineConfig) -> Self {
        let debouncer = Debouncer::new(config.debounce());
        Self {
            source,
            config,
            state: SessionState::Uninitialized,
            engine: None,
            debouncer,
            is_open: false,
            query: String::new(),
            results: Vec::new(),
            selected: 0,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn results(&self) -> &[SearchResult] {
        &self.results
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn engine(&self) -> Option<&Arc<QueryEngine>> {
        self.engine.as_ref()
    }

    /// Handle for hosts that drive debouncing themselves
    pub fn debouncer(&self) -> Debouncer {
        self.debouncer.clone()
    }

    /// Show the search surface. Loads the artifact the first time only.
    pub async fn open(&mut self) -> &SessionState {
        self.is_open = true;
        if self.state == SessionState::Uninitialized {
            self.load().await;
        }
        &self.state
    }

    /// Manual "try again" after a failed load. No-op in any other state.
    pub async fn retry(&mut self) -> &SessionState {
        if matches!(self.state, SessionState::Error(_)) {
            tracing::info!("Retrying search artifact load");
            self.load().await;
        }
        &self.state
    }

    /// Hide the surface, drop the query and results, and discard any
    /// debounced query still waiting.
    pub fn close(&mut self) {
        self.is_open = false;
        self.query.clear();
        self.results.clear();
        self.selected = 0;
        self.debouncer.cancel();
    }

    async fn load(&mut self) {
        self.state = SessionState::Loading;
        tracing::info!("Loading search artifact from {}", self.source.describe());

        let loaded = self.fetch_engine().await;
        self.state = match loaded {
            Ok(engine) => {
                self.engine = Some(Arc::new(engine));
                SessionState::Ready
            }
            Err(e) => {
                tracing::error!("Search unavailable: {}", e);
                SessionState::Error(e.to_string())
            }
        };
    }

    async fn fetch_engine(&self) -> Result<QueryEngine, SearchError> {
        let bytes = self.source.fetch().await?;
        let artifact = Artifact::from_slice(&bytes)?;
        if artifact.total_docs != artifact.docs.len() {
            tracing::warn!(
                "Artifact claims {} documents but holds {}",
                artifact.total_docs,
                artifact.docs.len()
            );
        }
        QueryEngine::build(artifact.docs)
    }

    /// Debounced search: waits for the input to go quiet, then runs.
    ///
    /// The session stays mutably borrowed for the whole delay, so two calls
    /// on one session never overlap. Hosts that feed keystrokes concurrently
    /// should settle on a cloned [`Debouncer`] from [`Self::debouncer`] and
    /// hand the ticket to [`Self::run`]; that is what lets a newer query
    /// supersede a pending one.
    pub async fn search(&mut self, query: &str) -> SearchOutcome<'_> {
        self.query = query.to_string();
        let settled = self.debouncer.settle(query).await;
        match settled {
            Some(ticket) => self.run(ticket),
            None => SearchOutcome::Superseded,
        }
    }

    /// Execute a settled query and publish its results, unless a newer query
    /// has been issued since the ticket was handed out.
    pub fn run(&mut self, ticket: Ticket) -> SearchOutcome<'_> {
        if !self.debouncer.is_current(&ticket) {
            return SearchOutcome::Superseded;
        }
        self.results = self.search_now(&ticket.query);
        self.query = ticket.query;
        self.selected = 0;
        SearchOutcome::Completed(&self.results)
    }

    /// Run a query immediately without touching session state.
    ///
    /// Blank queries, a session that is not ready, and index failures all
    /// produce an empty list.
    pub fn search_now(&self, query: &str) -> Vec<SearchResult> {
        let Some(engine) = self.engine.as_ref() else {
            return Vec::new();
        };
        if query.trim().is_empty() {
            return Vec::new();
        }

        let options = SearchOptions {
            limit: self.config.field_limit,
            enrich: true,
        };
        let field_results = match engine.search_fields(query, &options) {
            Ok(results) => results,
            Err(e) => {
                tracing::error!("Search failed for {:?}: {}", query, e);
                return Vec::new();
            }
        };

        let results: Vec<SearchResult> = rank(field_results, &self.config.weights, self.config.display_limit)
            .into_iter()
            .filter_map(|ranked| {
                let doc = ranked.doc.or_else(|| engine.document(ranked.id).cloned())?;
                Some(SearchResult::new(doc, ranked.score, query, &self.config))
            })
            .collect();

        tracing::debug!("Query {:?} returned {} results", query, results.len());
        results
    }

    /// Keyboard navigation over the current result list
    pub fn handle_key(&mut self, key: Key) -> KeyOutcome {
        if key == Key::Escape {
            self.close();
            return KeyOutcome::Closed;
        }
        if !self.is_open || self.results.is_empty() {
            return KeyOutcome::Ignored;
        }

        match key {
            Key::ArrowDown => {
                self.selected = (self.selected + 1).min(self.results.len() - 1);
                KeyOutcome::Select(self.selected)
            }
            Key::ArrowUp => {
                self.selected = self.selected.saturating_sub(1);
                KeyOutcome::Select(self.selected)
            }
            Key::Enter => match self.results.get(self.selected) {
                Some(result) => {
                    let slug = result.doc.slug.clone();
                    self.close();
                    KeyOutcome::Navigate(slug)
                }
                None => KeyOutcome::Ignored,
            },
            Key::Escape => KeyOutcome::Closed,
        }
    }
}
