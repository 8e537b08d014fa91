//! Ordered-score store abstraction.
//!
//! The admission core keeps no queue state of its own. Everything lives in an
//! external store with sorted-set semantics: named collections of unique
//! members, each carrying a numeric score. Every method on [`OrderedScoreStore`]
//! must be atomic on its own; nothing here promises atomicity across calls.

mod memory;

use async_trait::async_trait;
use thiserror::Error;

pub use memory::MemoryStore;

/// Store error type.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// Store unreachable or refused the command
    #[error("store unavailable: {0}")]
    Unavailable(String),
    /// Command did not complete in time
    #[error("store operation timed out")]
    Timeout,
}

/// A member popped from a collection together with its score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredMember {
    pub member: String,
    pub score: u64,
}

/// Sorted-set contract required by the admission core.
#[async_trait]
pub trait OrderedScoreStore: Send + Sync {
    /// Get the store backend name for logging.
    fn name(&self) -> &'static str;

    /// Insert `member` with `score` unless it is already present.
    ///
    /// Returns `false` (and leaves the existing score untouched) when the
    /// member was already in the collection.
    async fn add_if_absent(&self, key: &str, member: &str, score: u64)
        -> Result<bool, StoreError>;

    /// Insert or re-score `member`. Returns `true` if the member was new.
    async fn add(&self, key: &str, member: &str, score: u64) -> Result<bool, StoreError>;

    /// Remove and return up to `count` lowest-scored members, lowest first.
    ///
    /// A collection emptied by this call ceases to exist.
    async fn pop_min(&self, key: &str, count: usize) -> Result<Vec<ScoredMember>, StoreError>;

    /// 0-based position of `member` by ascending score, ties by member bytes.
    async fn rank(&self, key: &str, member: &str) -> Result<Option<u64>, StoreError>;

    /// Number of members in the collection (0 if it does not exist).
    async fn count(&self, key: &str) -> Result<u64, StoreError>;

    /// Names of existing collections matching a glob `pattern` (`*`, `?`).
    async fn scan_keys(&self, pattern: &str) -> Result<Vec<String>, StoreError>;
}

/// Glob match supporting `*` (any run) and `?` (any single char).
pub(crate) fn glob_match(pattern: &str, text: &str) -> bool {
    let p = pattern.as_bytes();
    let t = text.as_bytes();
    let (mut pi, mut ti) = (0usize, 0usize);
    let mut star: Option<(usize, usize)> = None;

    while ti < t.len() {
        if pi < p.len() && (p[pi] == b'?' || p[pi] == t[ti]) {
            pi += 1;
            ti += 1;
        } else if pi < p.len() && p[pi] == b'*' {
            star = Some((pi, ti));
            pi += 1;
        } else if let Some((sp, st)) = star {
            // backtrack: let the last star swallow one more char
            pi = sp + 1;
            ti = st + 1;
            star = Some((sp, st + 1));
        } else {
            return false;
        }
    }

    while pi < p.len() && p[pi] == b'*' {
        pi += 1;
    }
    pi == p.len()
}
