//! Axum route handlers for document upload and paste-in.

use axum::extract::{Multipart, Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::documents::{extract_text, DocumentKind};
use crate::errors::AppError;
use crate::state::AppState;

/// Which session slot a document fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentSlot {
    Job,
    Resume,
}

#[derive(Debug, Serialize)]
pub struct DocumentResponse {
    pub slot: DocumentSlot,
    pub characters: usize,
    pub preview: String,
}

#[derive(Debug, Deserialize)]
pub struct PasteRequest {
    pub kind: DocumentSlot,
    pub text: String,
}

/// POST /api/v1/sessions/:id/documents
///
/// Multipart upload: a `kind` field (`job` | `resume`) plus a `file` field.
/// The file's extension decides the extraction strategy.
pub async fn handle_upload(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<DocumentResponse>, AppError> {
    let mut slot: Option<DocumentSlot> = None;
    let mut file: Option<(String, bytes::Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart body: {e}")))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("kind") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("unreadable 'kind' field: {e}")))?;
                slot = Some(parse_slot(&value)?);
            }
            Some("file") => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("unreadable 'file' field: {e}")))?;
                file = Some((filename, data));
            }
            _ => {}
        }
    }

    let slot = slot.ok_or_else(|| AppError::Validation("missing 'kind' field".to_string()))?;
    let (filename, data) =
        file.ok_or_else(|| AppError::Validation("missing 'file' field".to_string()))?;

    let kind = DocumentKind::from_filename(&filename)?;
    let text = extract_text(&data, kind)?;

    store_document(&state, session_id, slot, text).await
}

/// POST /api/v1/sessions/:id/documents/text
///
/// Paste-in alternative to the file upload.
pub async fn handle_paste(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<PasteRequest>,
) -> Result<Json<DocumentResponse>, AppError> {
    store_document(&state, session_id, request.kind, request.text).await
}

fn parse_slot(value: &str) -> Result<DocumentSlot, AppError> {
    match value {
        "job" => Ok(DocumentSlot::Job),
        "resume" => Ok(DocumentSlot::Resume),
        other => Err(AppError::Validation(format!(
            "unknown document kind '{other}' (expected 'job' or 'resume')"
        ))),
    }
}

async fn store_document(
    state: &AppState,
    session_id: Uuid,
    slot: DocumentSlot,
    text: String,
) -> Result<Json<DocumentResponse>, AppError> {
    if text.trim().is_empty() {
        return Err(AppError::Validation(
            "document contains no text".to_string(),
        ));
    }

    let characters = text.chars().count();
    let preview: String = text.chars().take(120).collect();

    state
        .sessions
        .update(session_id, |session| {
            match slot {
                DocumentSlot::Job => session.job_description = Some(text),
                DocumentSlot::Resume => session.resume_text = Some(text),
            }
            Ok(())
        })
        .await?;

    info!("stored {slot:?} document ({characters} chars) for session {session_id}");

    Ok(Json(DocumentResponse {
        slot,
        characters,
        preview,
    }))
}
