pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::interview::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/interviews", post(handlers::handle_start_from_jd))
        .route(
            "/api/v1/interviews/from-skills",
            post(handlers::handle_start_from_skills),
        )
        .route("/api/v1/interviews/:id", get(handlers::handle_get_status))
        .route(
            "/api/v1/interviews/:id/answers",
            post(handlers::handle_submit_answer),
        )
        .route(
            "/api/v1/interviews/:id/complete",
            post(handlers::handle_complete),
        )
        .layer(DefaultBodyLimit::max(upload_limit))
        .with_state(state)
}
