//! Axum route handlers for session lifecycle, navigation, and export.

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::session::report::render_report;
use crate::session::Session;
use crate::state::AppState;

/// POST /api/v1/sessions
pub async fn handle_create_session(State(state): State<AppState>) -> Json<Session> {
    Json(state.sessions.create().await)
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Session>, AppError> {
    Ok(Json(state.sessions.get(id).await?))
}

#[derive(Debug, Deserialize)]
pub struct PositionRequest {
    pub index: usize,
}

/// PATCH /api/v1/sessions/:id/position
///
/// Moves the navigation cursor; rejected when out of range.
pub async fn handle_set_position(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<PositionRequest>,
) -> Result<Json<Session>, AppError> {
    state
        .sessions
        .update(id, |session| {
            if request.index >= session.questions.len() {
                return Err(AppError::Validation(format!(
                    "index {} is out of range for {} questions",
                    request.index,
                    session.questions.len()
                )));
            }
            session.current_index = request.index;
            Ok(session.clone())
        })
        .await
        .map(Json)
}

/// GET /api/v1/sessions/:id/report
///
/// Renders the Markdown evaluation report for download.
pub async fn handle_report(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let session = state.sessions.get(id).await?;
    let report = render_report(&session);

    Ok((
        [
            (header::CONTENT_TYPE, "text/markdown; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"interview_evaluation_report.md\"",
            ),
        ],
        report,
    ))
}
