//! HTTP API request and response types.

use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::config::WaitroomConfig;
use crate::queue::types::{UserId, DEFAULT_QUEUE};
use crate::queue::{QueueError, QueueManager, SchedulerStats};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub qm: Arc<QueueManager>,
    /// Lifetime of the cookie set by `/touch`
    pub token_cookie_max_age_secs: u64,
    /// Present when the admission scheduler runs in this process
    pub scheduler_stats: Option<Arc<RwLock<SchedulerStats>>>,
}

impl AppState {
    pub fn new(qm: Arc<QueueManager>) -> Self {
        Self {
            qm,
            token_cookie_max_age_secs: WaitroomConfig::default().token_cookie_max_age_secs,
            scheduler_stats: None,
        }
    }
}

fn default_queue() -> String {
    DEFAULT_QUEUE.to_string()
}

/// Queue + user query parameters.
#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserQuery {
    pub user_id: UserId,
    #[serde(default = "default_queue")]
    pub queue: String,
}

/// Promotion query parameters.
#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AllowQuery {
    pub count: usize,
    #[serde(default = "default_queue")]
    pub queue: String,
}

/// Token check query parameters.
#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TokenQuery {
    pub user_id: UserId,
    pub token: String,
    #[serde(default = "default_queue")]
    pub queue: String,
}

/// Queue-only query parameters.
#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct QueueQuery {
    #[serde(default = "default_queue")]
    pub queue: String,
}

/// Rank in the wait queue (`-1` when not waiting).
#[derive(Serialize, Deserialize, ToSchema)]
pub struct RankResponse {
    pub rank: i64,
}

/// Result of a promotion request.
#[derive(Serialize, Deserialize, ToSchema)]
pub struct AllowResponse {
    pub requested: usize,
    pub allowed: u64,
}

/// Result of a token check.
#[derive(Serialize, Deserialize, ToSchema)]
pub struct AllowedResponse {
    pub allowed: bool,
}

/// Result of a proceed-membership check.
#[derive(Serialize, Deserialize, ToSchema)]
pub struct AdmittedResponse {
    pub admitted: bool,
}

/// Number of users waiting in a queue.
#[derive(Serialize, Deserialize, ToSchema)]
pub struct WaitingResponse {
    pub queue: String,
    pub waiting: u64,
}

/// Generic API response wrapper.
#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Json<Self> {
        Json(Self {
            ok: true,
            data: Some(data),
            error: None,
            code: None,
        })
    }
}

/// Queue error rendered as an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub QueueError);

impl From<QueueError> for ApiError {
    fn from(e: QueueError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            QueueError::InvalidQueueName { .. } => StatusCode::BAD_REQUEST,
            QueueError::AlreadyRegistered { .. } => StatusCode::CONFLICT,
            QueueError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        };
        let body: ApiResponse<()> = ApiResponse {
            ok: false,
            data: None,
            error: Some(self.0.to_string()),
            code: Some(self.0.code()),
        };
        (status, Json(body)).into_response()
    }
}
