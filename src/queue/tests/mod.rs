//! Queue tests - modular organization.
//!
//! - register: wait queue registration and rank
//! - admission: promotion, admission and token checks
//! - background: admission scheduler sweeps
//! - concurrent: parallel callers against a shared store

mod concurrent;

use std::sync::Arc;

use async_trait::async_trait;

use super::store::{MemoryStore, OrderedScoreStore, ScoredMember, StoreError};
use super::types::{proceed_key, wait_key, NOT_WAITING};
use super::*;

fn setup() -> Arc<QueueManager> {
    QueueManager::new()
}

/// Store that fails commands touching keys containing `poison`.
///
/// `fail_scan` also breaks key enumeration; `fail_proceed` only breaks inserts
/// into proceed collections.
struct FaultyStore {
    inner: MemoryStore,
    poison: Option<String>,
    fail_scan: bool,
    fail_proceed: bool,
}

impl FaultyStore {
    fn poisoned(queue: &str) -> Self {
        Self {
            inner: MemoryStore::new(),
            poison: Some(format!(":{}:", queue)),
            fail_scan: false,
            fail_proceed: false,
        }
    }

    fn broken_scan() -> Self {
        Self {
            inner: MemoryStore::new(),
            poison: None,
            fail_scan: true,
            fail_proceed: false,
        }
    }

    fn broken_proceed() -> Self {
        Self {
            inner: MemoryStore::new(),
            poison: None,
            fail_scan: false,
            fail_proceed: true,
        }
    }

    fn check(&self, key: &str) -> Result<(), StoreError> {
        match &self.poison {
            Some(p) if key.contains(p.as_str()) => {
                Err(StoreError::Unavailable("connection refused".into()))
            }
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl OrderedScoreStore for FaultyStore {
    fn name(&self) -> &'static str {
        "faulty"
    }

    async fn add_if_absent(
        &self,
        key: &str,
        member: &str,
        score: u64,
    ) -> Result<bool, StoreError> {
        self.inner.add_if_absent(key, member, score).await
    }

    async fn add(&self, key: &str, member: &str, score: u64) -> Result<bool, StoreError> {
        if self.fail_proceed && key.ends_with(":proceed") {
            return Err(StoreError::Timeout);
        }
        self.check(key)?;
        self.inner.add(key, member, score).await
    }

    async fn pop_min(&self, key: &str, count: usize) -> Result<Vec<ScoredMember>, StoreError> {
        self.check(key)?;
        self.inner.pop_min(key, count).await
    }

    async fn rank(&self, key: &str, member: &str) -> Result<Option<u64>, StoreError> {
        self.check(key)?;
        self.inner.rank(key, member).await
    }

    async fn count(&self, key: &str) -> Result<u64, StoreError> {
        self.inner.count(key).await
    }

    async fn scan_keys(&self, pattern: &str) -> Result<Vec<String>, StoreError> {
        if self.fail_scan {
            return Err(StoreError::Timeout);
        }
        self.inner.scan_keys(pattern).await
    }
}

/// Seed a queue's wait collection directly, bypassing registration.
async fn seed(store: &dyn OrderedScoreStore, queue: &str, users: &[i64]) {
    for (i, user) in users.iter().enumerate() {
        store
            .add_if_absent(&wait_key(queue), &user.to_string(), i as u64 + 1)
            .await
            .unwrap();
    }
}

fn enabled_config(batch_size: usize) -> SchedulerConfig {
    SchedulerConfig {
        enabled: true,
        initial_delay: std::time::Duration::ZERO,
        interval: std::time::Duration::from_millis(10),
        batch_size,
        max_concurrency: 4,
    }
}
