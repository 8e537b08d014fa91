//! Health check HTTP handler.

use std::sync::OnceLock;
use std::time::Instant;

use axum::{extract::State, response::Json};
use serde::Serialize;
use utoipa::ToSchema;

use super::types::{ApiResponse, AppState};
use crate::queue::SchedulerStats;

static START_TIME: OnceLock<Instant> = OnceLock::new();

/// Record the server start time (first call wins).
pub fn init_start_time() {
    START_TIME.get_or_init(Instant::now);
}

/// Health check response.
#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    pub uptime_ms: u64,
    pub store: &'static str,
    /// Absent when no scheduler runs in this process
    pub scheduler: Option<SchedulerStats>,
}

/// Health check endpoint.
///
/// Always returns 200 while the server is responsive.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Health status with uptime and scheduler totals", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    let uptime_ms = START_TIME
        .get()
        .map(|t| t.elapsed().as_millis() as u64)
        .unwrap_or(0);

    ApiResponse::success(HealthResponse {
        status: "healthy",
        uptime_ms,
        store: state.qm.store_name(),
        scheduler: state.scheduler_stats.as_ref().map(|s| s.read().clone()),
    })
}
