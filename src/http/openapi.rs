//! OpenAPI documentation for the waiting room HTTP API.

use utoipa::OpenApi;

use super::health::{self, HealthResponse};
use super::queues;
use super::types::{
    AdmittedResponse, AllowResponse, AllowedResponse, RankResponse, WaitingResponse,
};
use crate::queue::SchedulerStats;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "waitroom API",
        version = "0.1.0",
        description = "Virtual waiting room: wait queues, batched admission, access tokens",
        license(name = "MIT")
    ),
    tags(
        (name = "Queue", description = "Wait queue and admission"),
        (name = "Health", description = "Health checks")
    ),
    paths(
        queues::register_user,
        queues::allow_users,
        queues::is_allowed_user,
        queues::is_admitted_user,
        queues::get_user_rank,
        queues::get_waiting_count,
        queues::touch,
        health::health_check,
    ),
    components(schemas(
        RankResponse,
        AllowResponse,
        AllowedResponse,
        AdmittedResponse,
        WaitingResponse,
        HealthResponse,
        SchedulerStats,
    ))
)]
pub struct ApiDoc;
