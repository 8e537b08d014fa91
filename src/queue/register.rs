//! Wait queue registration and rank queries.

use tracing::debug;

use super::error::QueueError;
use super::manager::QueueManager;
use super::types::{
    now_secs, to_rank, validate_queue_name, wait_key, UserId, NOT_WAITING,
};

impl QueueManager {
    /// Register `user_id` in the wait collection of `queue`.
    ///
    /// Returns the 1-based rank, or [`NOT_WAITING`] if a concurrent promotion
    /// already moved the user out before the rank could be read. Queue names
    /// must pass [`validate_queue_name`].
    pub async fn register(&self, queue: &str, user_id: UserId) -> Result<i64, QueueError> {
        self.register_at(queue, user_id, now_secs()).await
    }

    /// Register with an explicit arrival score (unix seconds).
    pub(crate) async fn register_at(
        &self,
        queue: &str,
        user_id: UserId,
        arrived_at: u64,
    ) -> Result<i64, QueueError> {
        validate_queue_name(queue)?;
        let key = wait_key(queue);
        let member = user_id.to_string();

        if !self.store.add_if_absent(&key, &member, arrived_at).await? {
            return Err(QueueError::AlreadyRegistered {
                queue: queue.to_string(),
            });
        }

        let rank = to_rank(self.store.rank(&key, &member).await?);
        if rank == NOT_WAITING {
            debug!(queue = %queue, user_id, "Registered user promoted before rank lookup");
        }
        Ok(rank)
    }

    /// 1-based rank of `user_id` in `queue`, or [`NOT_WAITING`].
    pub async fn get_rank(&self, queue: &str, user_id: UserId) -> Result<i64, QueueError> {
        let rank = self
            .store
            .rank(&wait_key(queue), &user_id.to_string())
            .await?;
        Ok(to_rank(rank))
    }

    /// Number of users currently waiting in `queue`.
    pub async fn waiting_count(&self, queue: &str) -> Result<u64, QueueError> {
        Ok(self.store.count(&wait_key(queue)).await?)
    }
}
