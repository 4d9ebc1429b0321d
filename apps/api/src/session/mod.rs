//! In-memory session state: loaded documents, generated questions, the
//! navigation cursor, and collected evaluations. Nothing is persisted.

pub mod handlers;
pub mod report;

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::evaluation::AnswerEvaluation;
use crate::interview::questions::Question;

/// One interview run. Mutated only by the single active interaction;
/// operations run one at a time per the request/response model.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub job_description: Option<String>,
    pub resume_text: Option<String>,
    pub questions: Vec<Question>,
    pub current_index: usize,
    pub evaluations: Vec<EvaluationRecord>,
}

/// One scored answer, keyed by the index of the question it answers.
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationRecord {
    pub question_index: usize,
    pub question_text: String,
    pub answer_text: String,
    pub evaluation: AnswerEvaluation,
}

impl Session {
    fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            job_description: None,
            resume_text: None,
            questions: Vec::new(),
            current_index: 0,
            evaluations: Vec::new(),
        }
    }

    /// Replaces any prior evaluation for the same question index, so at most
    /// one record per index survives.
    pub fn upsert_evaluation(&mut self, record: EvaluationRecord) {
        match self
            .evaluations
            .iter_mut()
            .find(|e| e.question_index == record.question_index)
        {
            Some(existing) => *existing = record,
            None => self.evaluations.push(record),
        }
    }

    /// Inserts a follow-up immediately after the question that spawned it.
    /// Returns the insertion index.
    pub fn insert_followup(&mut self, after_index: usize, question: Question) -> usize {
        let at = (after_index + 1).min(self.questions.len());
        self.questions.insert(at, question);
        at
    }

    pub fn average_score(&self) -> Option<f64> {
        if self.evaluations.is_empty() {
            return None;
        }
        let total: u32 = self
            .evaluations
            .iter()
            .map(|e| e.evaluation.score as u32)
            .sum();
        Some(total as f64 / self.evaluations.len() as f64)
    }
}

/// In-memory session registry shared across handlers.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<Uuid, Session>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self) -> Session {
        let session = Session::new();
        self.inner.write().await.insert(session.id, session.clone());
        session
    }

    pub async fn get(&self, id: Uuid) -> Result<Session, AppError> {
        self.inner
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))
    }

    /// Runs a closure against one session under the write lock.
    pub async fn update<T>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut Session) -> Result<T, AppError>,
    ) -> Result<T, AppError> {
        let mut sessions = self.inner.write().await;
        let session = sessions
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))?;
        f(session)
    }
}
