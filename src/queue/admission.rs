//! Promotion from wait to proceed, and admission checks.
//!
//! Promotion is two store commands: an atomic pop of the lowest-scored waiting
//! members, then one proceed insert per member. Concurrent promotions of the
//! same queue never see the same member, because the pop is atomic. If the
//! process dies (or the store fails) between the pop and the inserts, the
//! popped members are in neither collection. That loss is bounded by the batch
//! size and is not repaired here.

use tracing::{debug, error};

use super::error::QueueError;
use super::manager::QueueManager;
use super::token::{constant_time_eq, derive_token};
use super::types::{now_secs, proceed_key, wait_key, UserId};

impl QueueManager {
    /// Move up to `max_count` of the earliest waiting users into proceed.
    ///
    /// Returns the number actually moved (0 for an empty queue).
    pub async fn promote(&self, queue: &str, max_count: usize) -> Result<u64, QueueError> {
        if max_count == 0 {
            return Ok(0);
        }

        let popped = self.store.pop_min(&wait_key(queue), max_count).await?;
        if popped.is_empty() {
            return Ok(0);
        }

        let key = proceed_key(queue);
        let admitted_at = now_secs();
        let mut moved = 0u64;

        for (i, entry) in popped.iter().enumerate() {
            if let Err(e) = self.store.add(&key, &entry.member, admitted_at).await {
                let lost: Vec<&str> = popped[i..].iter().map(|m| m.member.as_str()).collect();
                error!(
                    queue = %queue,
                    error = %e,
                    lost = ?lost,
                    "Promotion interrupted, popped members were not admitted"
                );
                return Err(e.into());
            }
            moved += 1;
        }

        debug!(queue = %queue, requested = max_count, moved, "Promoted waiting users");
        Ok(moved)
    }

    /// Whether `user_id` has been promoted into the proceed collection.
    pub async fn is_admitted(&self, queue: &str, user_id: UserId) -> Result<bool, QueueError> {
        let rank = self
            .store
            .rank(&proceed_key(queue), &user_id.to_string())
            .await?;
        Ok(rank.is_some())
    }

    /// Check a presented access token against the derived one.
    ///
    /// This only proves possession of the token for `(queue, user_id)`. It does
    /// not look at the proceed collection; use [`is_admitted`] for that.
    ///
    /// [`is_admitted`]: QueueManager::is_admitted
    pub fn check_admission_token(&self, queue: &str, user_id: UserId, token: &str) -> bool {
        let expected = derive_token(queue, user_id);
        let presented = token.to_ascii_lowercase();
        constant_time_eq(expected.as_bytes(), presented.as_bytes())
    }

    /// Issue the access token for `(queue, user_id)`.
    #[inline]
    pub fn issue_token(&self, queue: &str, user_id: UserId) -> String {
        derive_token(queue, user_id)
    }
}
