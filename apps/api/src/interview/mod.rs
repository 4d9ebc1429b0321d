// Interview pipeline: skill extraction, question generation, answer
// evaluation, follow-up generation. All LLM calls go through llm_client;
// any failure there routes to the operation's deterministic fallback.

pub mod evaluation;
pub mod followup;
pub mod handlers;
pub mod prompts;
pub mod questions;
pub mod skills;

use serde::Serialize;

/// Which branch produced a pipeline result: the LLM path, or the
/// deterministic heuristic that replaces it on any LLM failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    Llm,
    Heuristic,
}

/// A pipeline result tagged with the branch that produced it, so callers and
/// tests can tell the branches apart without a real network failure.
#[derive(Debug, Clone, PartialEq)]
pub struct Sourced<T> {
    pub value: T,
    pub source: Source,
}

impl<T> Sourced<T> {
    pub fn llm(value: T) -> Self {
        Self {
            value,
            source: Source::Llm,
        }
    }

    pub fn heuristic(value: T) -> Self {
        Self {
            value,
            source: Source::Heuristic,
        }
    }

    pub fn into_inner(self) -> T {
        self.value
    }
}
