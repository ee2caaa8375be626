//! Cancel-on-supersede delay for search input
//!
//! Every `settle` call bumps a shared generation counter and sleeps. When it
//! wakes up it only yields a ticket if nothing bumped the counter in the
//! meantime, so out of a burst of keystrokes only the last one runs.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// A query that survived its debounce window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub query: String,
    generation: u64,
}

/// Cloneable handle; all clones share one generation counter
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    generation: Arc<AtomicU64>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Wait out the delay. `None` if a newer query or a cancel arrived first.
    pub async fn settle(&self, query: impl Into<String>) -> Option<Ticket> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let query = query.into();

        tokio::time::sleep(self.delay).await;

        if self.generation.load(Ordering::SeqCst) == generation {
            Some(Ticket { query, generation })
        } else {
            tracing::trace!("Debounced query superseded: {:?}", query);
            None
        }
    }

    /// Whether `ticket` is still the latest query
    pub fn is_current(&self, ticket: &Ticket) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket.generation
    }

    /// Invalidate whatever is pending
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }
}
