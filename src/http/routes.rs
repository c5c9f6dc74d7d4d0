use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Session control
        .route("/interviews/start", post(handlers::start_interview))
        .route("/interviews/:call_id/stop", post(handlers::stop_interview))
        // Session queries
        .route(
            "/interviews/:call_id/status",
            get(handlers::get_interview_status),
        )
        .route(
            "/interviews/:call_id/outcome",
            get(handlers::get_interview_outcome),
        )
        .route(
            "/interviews/:call_id/feedback",
            get(handlers::get_interview_feedback),
        )
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
