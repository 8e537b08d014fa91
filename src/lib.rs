//! waitroom - virtual waiting room admission control.
//!
//! Users wait in per-queue FIFO collections, are promoted in batches into a
//! proceed set, and prove admission with a derived access token.

pub mod config;
pub mod http;
pub mod queue;
pub mod telemetry;
