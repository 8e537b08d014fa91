//! HTTP API module.
//!
//! Thin REST boundary over the admission core: registration, rank polling,
//! token issue/check and manual promotion.

mod health;
mod openapi;
mod queues;
mod types;

use axum::{
    http::{header, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

pub use types::AppState;

/// Create CORS layer based on environment configuration.
/// Set CORS_ALLOW_ORIGIN env var for production (comma-separated list of origins).
/// If not set, allows all origins (development mode).
fn create_cors_layer() -> CorsLayer {
    match std::env::var("CORS_ALLOW_ORIGIN").ok() {
        Some(origins) if !origins.is_empty() && origins != "*" => {
            let origins: Vec<_> = origins
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
                .allow_credentials(true)
        }
        _ => CorsLayer::permissive(),
    }
}

/// Create the HTTP router with all API routes.
pub fn create_router(state: AppState) -> Router {
    health::init_start_time();

    let api_routes = Router::new()
        .route("/api/v1/queue", post(queues::register_user))
        .route("/api/v1/queue/allow", post(queues::allow_users))
        .route("/api/v1/queue/allowed", get(queues::is_allowed_user))
        .route("/api/v1/queue/admitted", get(queues::is_admitted_user))
        .route("/api/v1/queue/rank", get(queues::get_user_rank))
        .route("/api/v1/queue/waiting", get(queues::get_waiting_count))
        .route("/api/v1/queue/touch", get(queues::touch))
        .route("/health", get(health::health_check))
        .with_state(state);

    Router::new()
        .merge(api_routes)
        .merge(Scalar::with_url("/docs", openapi::ApiDoc::openapi()))
        .layer(create_cors_layer())
}
