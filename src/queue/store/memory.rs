//! In-process sorted-set store.
//!
//! Each collection sits behind its own dashmap shard lock, so a single command
//! is atomic with respect to every other command on the same key. Commands on
//! different keys never hold two locks at once.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::debug;

use super::{glob_match, OrderedScoreStore, ScoredMember, StoreError};

/// One sorted set: member -> score, plus the (score, member) ordering.
#[derive(Debug, Default)]
struct ScoredSet {
    scores: HashMap<String, u64>,
    order: BTreeSet<(u64, String)>,
}

impl ScoredSet {
    fn insert(&mut self, member: &str, score: u64) -> bool {
        match self.scores.insert(member.to_string(), score) {
            Some(old) => {
                self.order.remove(&(old, member.to_string()));
                self.order.insert((score, member.to_string()));
                false
            }
            None => {
                self.order.insert((score, member.to_string()));
                true
            }
        }
    }

    fn pop_first(&mut self) -> Option<ScoredMember> {
        let (score, member) = self.order.pop_first()?;
        self.scores.remove(&member);
        Some(ScoredMember { member, score })
    }

    /// Linear in the number of lower-scored members: `BTreeSet` keeps no
    /// subtree sizes. Fine for in-process queues; a networked sorted set
    /// answers in O(log n).
    fn rank(&self, member: &str) -> Option<u64> {
        let score = *self.scores.get(member)?;
        Some(self.order.range(..(score, member.to_string())).count() as u64)
    }

    #[inline]
    fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

/// In-memory [`OrderedScoreStore`] with per-command atomicity.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: DashMap<String, ScoredSet>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderedScoreStore for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn add_if_absent(
        &self,
        key: &str,
        member: &str,
        score: u64,
    ) -> Result<bool, StoreError> {
        let mut set = self.collections.entry(key.to_string()).or_default();
        if set.scores.contains_key(member) {
            return Ok(false);
        }
        Ok(set.insert(member, score))
    }

    async fn add(&self, key: &str, member: &str, score: u64) -> Result<bool, StoreError> {
        let mut set = self.collections.entry(key.to_string()).or_default();
        Ok(set.insert(member, score))
    }

    async fn pop_min(&self, key: &str, count: usize) -> Result<Vec<ScoredMember>, StoreError> {
        if count == 0 {
            return Ok(Vec::new());
        }

        let (popped, emptied) = match self.collections.get_mut(key) {
            Some(mut set) => {
                let mut popped = Vec::with_capacity(count.min(set.scores.len()));
                while popped.len() < count {
                    match set.pop_first() {
                        Some(m) => popped.push(m),
                        None => break,
                    }
                }
                (popped, set.is_empty())
            }
            None => return Ok(Vec::new()),
        };

        // An emptied set disappears, unless someone refilled it in between.
        if emptied {
            self.collections.remove_if(key, |_, set| set.is_empty());
            debug!(key = %key, "Collection emptied and removed");
        }

        Ok(popped)
    }

    async fn rank(&self, key: &str, member: &str) -> Result<Option<u64>, StoreError> {
        Ok(self.collections.get(key).and_then(|set| set.rank(member)))
    }

    async fn count(&self, key: &str) -> Result<u64, StoreError> {
        Ok(self
            .collections
            .get(key)
            .map(|set| set.scores.len() as u64)
            .unwrap_or(0))
    }

    async fn scan_keys(&self, pattern: &str) -> Result<Vec<String>, StoreError> {
        let mut keys: Vec<String> = self
            .collections
            .iter()
            .filter(|entry| !entry.value().is_empty() && glob_match(pattern, entry.key()))
            .map(|entry| entry.key().clone())
            .collect();
        keys.sort_unstable();
        Ok(keys)
    }
}
