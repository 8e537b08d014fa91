//! Core QueueManager struct and constructors.
//!
//! The manager holds no queue state; it only owns the store handle. Queues
//! exist as key namespaces in the store and appear on first registration.

use std::sync::Arc;

use tracing::info;

use super::error::QueueError;
use super::store::{MemoryStore, OrderedScoreStore};
use super::types::{queue_from_wait_key, WAIT_KEY_PATTERN};

pub struct QueueManager {
    pub(crate) store: Arc<dyn OrderedScoreStore>,
}

impl QueueManager {
    /// Create a QueueManager backed by the in-process store.
    pub fn new() -> Arc<Self> {
        Self::with_store(Arc::new(MemoryStore::new()))
    }

    /// Create a QueueManager on top of any ordered-score store.
    pub fn with_store(store: Arc<dyn OrderedScoreStore>) -> Arc<Self> {
        info!(backend = store.name(), "Queue store configured");
        Arc::new(Self { store })
    }

    /// Name of the configured store backend.
    #[inline]
    pub fn store_name(&self) -> &'static str {
        self.store.name()
    }

    /// Names of all queues that currently have waiting users.
    pub async fn list_queues(&self) -> Result<Vec<String>, QueueError> {
        let keys = self.store.scan_keys(WAIT_KEY_PATTERN).await?;
        let mut queues: Vec<String> = keys
            .iter()
            .filter_map(|key| queue_from_wait_key(key))
            .map(str::to_string)
            .collect();
        queues.sort_unstable();
        queues.dedup();
        Ok(queues)
    }
}
