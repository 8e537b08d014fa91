//! Structured logging setup.
//!
//! `RUST_LOG` selects the filter (default `info`). `LOG_FORMAT=json` switches
//! to one JSON object per line.

use tracing_subscriber::{fmt, EnvFilter};

/// Install the global tracing subscriber. Safe to call more than once.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let result = if json {
        fmt()
            .json()
            .with_env_filter(filter)
            .with_target(false)
            .try_init()
    } else {
        fmt().with_env_filter(filter).with_target(false).try_init()
    };

    if result.is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
}
