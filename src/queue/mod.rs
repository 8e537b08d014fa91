//! Queue module - wait queues, batched admission and access tokens.
//!
//! ## Module Organization
//!
//! - `manager.rs` - QueueManager struct, constructors, queue discovery
//! - `store/` - OrderedScoreStore trait and the in-process MemoryStore
//! - `types.rs` - Key layout, rank sentinel, clock
//! - `error.rs` - QueueError
//!
//! ### Core operations
//!
//! - `register.rs` - register, get_rank (wait collection)
//! - `admission.rs` - promote, is_admitted, check_admission_token, issue_token
//! - `token.rs` - Access token derivation
//!
//! ### Background
//!
//! - `background.rs` - AdmissionScheduler (periodic promotion sweep)

mod admission;
mod background;
mod error;
mod manager;
mod register;
pub mod store;
mod token;
pub mod types;

#[cfg(test)]
mod tests;

pub use background::{
    AdmissionScheduler, SchedulerConfig, SchedulerHandle, SchedulerStats, SweepReport,
};
pub use error::QueueError;
pub use manager::QueueManager;
pub use token::derive_token;
