use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::agent_service::handlers;
use crate::agent_service::logging_middleware::request_logging_middleware;
use crate::agent_service::state::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/chat", post(handlers::chat))
        .route("/parse-ticket", post(handlers::parse_ticket))
        .route("/analyze-task", post(handlers::analyze_task))
        .route("/generate-standup", post(handlers::generate_standup))
        .with_state(state)
        .layer(middleware::from_fn(request_logging_middleware))
        .layer(TraceLayer::new_for_http())
}
