//! Axum route handlers for the interview pipeline.

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::evaluation::evaluate_answer;
use crate::interview::followup::generate_followup;
use crate::interview::questions::{generate_questions, Question};
use crate::interview::Source;
use crate::session::EvaluationRecord;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct GenerateQuestionsResponse {
    pub questions: Vec<Question>,
    pub source: Source,
}

#[derive(Debug, Deserialize)]
pub struct EvaluateRequest {
    pub question_index: usize,
    pub answer: String,
}

#[derive(Debug, Serialize)]
pub struct EvaluateResponse {
    pub record: EvaluationRecord,
    pub source: Source,
}

#[derive(Debug, Deserialize)]
pub struct FollowupRequest {
    pub question_index: usize,
    pub answer: String,
}

#[derive(Debug, Serialize)]
pub struct FollowupResponse {
    pub question: Question,
    pub inserted_at: usize,
    pub source: Source,
}

/// POST /api/v1/sessions/:id/questions
///
/// Generates a fresh question set from the loaded documents, resets the
/// navigation cursor, and clears prior evaluations.
pub async fn handle_generate_questions(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<GenerateQuestionsResponse>, AppError> {
    let session = state.sessions.get(session_id).await?;
    let job_description = session.job_description.ok_or_else(|| {
        AppError::Validation("load a job description before generating questions".to_string())
    })?;
    let resume = session.resume_text.ok_or_else(|| {
        AppError::Validation("load a resume before generating questions".to_string())
    })?;

    let generated = generate_questions(state.llm.as_ref(), &job_description, &resume).await;
    let source = generated.source;
    let questions = generated.into_inner();

    state
        .sessions
        .update(session_id, |session| {
            session.questions = questions.clone();
            session.current_index = 0;
            session.evaluations.clear();
            Ok(())
        })
        .await?;

    Ok(Json(GenerateQuestionsResponse { questions, source }))
}

/// POST /api/v1/sessions/:id/evaluations
///
/// Scores one answer and upserts the record for its question index.
pub async fn handle_evaluate_answer(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<EvaluateRequest>,
) -> Result<Json<EvaluateResponse>, AppError> {
    if request.answer.trim().is_empty() {
        return Err(AppError::Validation("answer cannot be empty".to_string()));
    }

    let session = state.sessions.get(session_id).await?;
    let question = session
        .questions
        .get(request.question_index)
        .cloned()
        .ok_or_else(|| {
            AppError::NotFound(format!("question {} not found", request.question_index))
        })?;

    let evaluated = evaluate_answer(state.llm.as_ref(), &question.text, &request.answer).await;
    let source = evaluated.source;
    let record = EvaluationRecord {
        question_index: request.question_index,
        question_text: question.text,
        answer_text: request.answer,
        evaluation: evaluated.into_inner(),
    };

    let stored = record.clone();
    state
        .sessions
        .update(session_id, |session| {
            session.upsert_evaluation(stored);
            Ok(())
        })
        .await?;

    Ok(Json(EvaluateResponse { record, source }))
}

/// POST /api/v1/sessions/:id/followups
///
/// Generates a probing follow-up for a question/answer pair and inserts it
/// immediately after the question that spawned it.
pub async fn handle_generate_followup(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<FollowupRequest>,
) -> Result<Json<FollowupResponse>, AppError> {
    if request.answer.trim().is_empty() {
        return Err(AppError::Validation("answer cannot be empty".to_string()));
    }

    let session = state.sessions.get(session_id).await?;
    let question = session
        .questions
        .get(request.question_index)
        .cloned()
        .ok_or_else(|| {
            AppError::NotFound(format!("question {} not found", request.question_index))
        })?;

    let generated = generate_followup(state.llm.as_ref(), &question.text, &request.answer).await;
    let source = generated.source;
    let followup = generated.into_inner();

    let inserted = followup.clone();
    let inserted_at = state
        .sessions
        .update(session_id, |session| {
            Ok(session.insert_followup(request.question_index, inserted))
        })
        .await?;

    Ok(Json(FollowupResponse {
        question: followup,
        inserted_at,
        source,
    }))
}
