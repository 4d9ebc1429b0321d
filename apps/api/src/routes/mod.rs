pub mod health;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::documents::handlers as documents;
use crate::interview::handlers as interview;
use crate::session::handlers as sessions;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Session lifecycle
        .route("/api/v1/sessions", post(sessions::handle_create_session))
        .route("/api/v1/sessions/:id", get(sessions::handle_get_session))
        .route(
            "/api/v1/sessions/:id/position",
            patch(sessions::handle_set_position),
        )
        .route("/api/v1/sessions/:id/report", get(sessions::handle_report))
        // Documents
        .route(
            "/api/v1/sessions/:id/documents",
            post(documents::handle_upload),
        )
        .route(
            "/api/v1/sessions/:id/documents/text",
            post(documents::handle_paste),
        )
        // Interview pipeline
        .route(
            "/api/v1/sessions/:id/questions",
            post(interview::handle_generate_questions),
        )
        .route(
            "/api/v1/sessions/:id/evaluations",
            post(interview::handle_evaluate_answer),
        )
        .route(
            "/api/v1/sessions/:id/followups",
            post(interview::handle_generate_followup),
        )
        .with_state(state)
}
