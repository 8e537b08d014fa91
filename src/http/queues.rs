//! Wait queue HTTP handlers.

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Json},
};
use tracing::info;

use crate::queue::types::validate_queue_name;

use super::types::{
    AdmittedResponse, AllowQuery, AllowResponse, AllowedResponse, ApiError, ApiResponse,
    AppState, QueueQuery, RankResponse, TokenQuery, UserQuery, WaitingResponse,
};

/// Register a user in a wait queue.
#[utoipa::path(
    post,
    path = "/api/v1/queue",
    tag = "Queue",
    params(UserQuery),
    responses(
        (status = 200, description = "Registered, 1-based rank returned", body = RankResponse),
        (status = 400, description = "Invalid queue name (UQ-0003)"),
        (status = 409, description = "Already registered in this queue (UQ-0001)")
    )
)]
pub async fn register_user(
    State(state): State<AppState>,
    Query(q): Query<UserQuery>,
) -> Result<Json<ApiResponse<RankResponse>>, ApiError> {
    let rank = state.qm.register(&q.queue, q.user_id).await?;
    Ok(ApiResponse::success(RankResponse { rank }))
}

/// Promote up to `count` waiting users into the proceed set.
#[utoipa::path(
    post,
    path = "/api/v1/queue/allow",
    tag = "Queue",
    params(AllowQuery),
    responses(
        (status = 200, description = "Number of users promoted", body = AllowResponse)
    )
)]
pub async fn allow_users(
    State(state): State<AppState>,
    Query(q): Query<AllowQuery>,
) -> Result<Json<ApiResponse<AllowResponse>>, ApiError> {
    let allowed = state.qm.promote(&q.queue, q.count).await?;
    info!(queue = %q.queue, requested = q.count, allowed, "Manual promotion");
    Ok(ApiResponse::success(AllowResponse {
        requested: q.count,
        allowed,
    }))
}

/// Check a user's access token.
#[utoipa::path(
    get,
    path = "/api/v1/queue/allowed",
    tag = "Queue",
    params(TokenQuery),
    responses(
        (status = 200, description = "Whether the token matches", body = AllowedResponse)
    )
)]
pub async fn is_allowed_user(
    State(state): State<AppState>,
    Query(q): Query<TokenQuery>,
) -> Json<ApiResponse<AllowedResponse>> {
    let allowed = state
        .qm
        .check_admission_token(&q.queue, q.user_id, &q.token);
    ApiResponse::success(AllowedResponse { allowed })
}

/// Check whether a user has been promoted.
#[utoipa::path(
    get,
    path = "/api/v1/queue/admitted",
    tag = "Queue",
    params(UserQuery),
    responses(
        (status = 200, description = "Whether the user is in the proceed set", body = AdmittedResponse)
    )
)]
pub async fn is_admitted_user(
    State(state): State<AppState>,
    Query(q): Query<UserQuery>,
) -> Result<Json<ApiResponse<AdmittedResponse>>, ApiError> {
    let admitted = state.qm.is_admitted(&q.queue, q.user_id).await?;
    Ok(ApiResponse::success(AdmittedResponse { admitted }))
}

/// Get a user's rank in the wait queue.
#[utoipa::path(
    get,
    path = "/api/v1/queue/rank",
    tag = "Queue",
    params(UserQuery),
    responses(
        (status = 200, description = "1-based rank, -1 when not waiting", body = RankResponse)
    )
)]
pub async fn get_user_rank(
    State(state): State<AppState>,
    Query(q): Query<UserQuery>,
) -> Result<Json<ApiResponse<RankResponse>>, ApiError> {
    let rank = state.qm.get_rank(&q.queue, q.user_id).await?;
    Ok(ApiResponse::success(RankResponse { rank }))
}

/// Count users waiting in a queue.
#[utoipa::path(
    get,
    path = "/api/v1/queue/waiting",
    tag = "Queue",
    params(QueueQuery),
    responses(
        (status = 200, description = "Wait queue size", body = WaitingResponse)
    )
)]
pub async fn get_waiting_count(
    State(state): State<AppState>,
    Query(q): Query<QueueQuery>,
) -> Result<Json<ApiResponse<WaitingResponse>>, ApiError> {
    let waiting = state.qm.waiting_count(&q.queue).await?;
    Ok(ApiResponse::success(WaitingResponse {
        queue: q.queue,
        waiting,
    }))
}

/// Issue the access token and set it as a cookie.
#[utoipa::path(
    get,
    path = "/api/v1/queue/touch",
    tag = "Queue",
    params(UserQuery),
    responses(
        (status = 200, description = "Access token, also set as cookie user-queue-{queue}-token", body = String),
        (status = 400, description = "Invalid queue name (UQ-0003)")
    )
)]
pub async fn touch(
    State(state): State<AppState>,
    Query(q): Query<UserQuery>,
) -> Result<impl IntoResponse, ApiError> {
    // the queue name becomes part of the cookie name
    validate_queue_name(&q.queue)?;
    let token = state.qm.issue_token(&q.queue, q.user_id);
    let cookie = format!(
        "user-queue-{}-token={}; Max-Age={}; Path=/",
        q.queue, token, state.token_cookie_max_age_secs
    );
    Ok(([(header::SET_COOKIE, cookie)], token))
}
