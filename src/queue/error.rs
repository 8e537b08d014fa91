//! Admission error type.

use thiserror::Error;

use super::store::StoreError;

#[derive(Debug, Clone, Error)]
pub enum QueueError {
    /// User already sits in the queue's wait collection
    #[error("Already registered in {queue}")]
    AlreadyRegistered { queue: String },
    /// Queue name unusable in store keys or cookie names
    #[error("Invalid queue name: {queue}")]
    InvalidQueueName { queue: String },
    /// Store unreachable or timed out
    #[error(transparent)]
    StoreUnavailable(#[from] StoreError),
}

impl QueueError {
    /// Stable error code reported to clients.
    pub fn code(&self) -> &'static str {
        match self {
            Self::AlreadyRegistered { .. } => "UQ-0001",
            Self::StoreUnavailable(_) => "UQ-0002",
            Self::InvalidQueueName { .. } => "UQ-0003",
        }
    }
}
