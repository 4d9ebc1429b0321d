use std::sync::Arc;

use crate::llm_client::TextCompletion;
use crate::session::SessionStore;

/// Shared application state injected into all route handlers via Axum
/// extractors. The LLM lives behind `TextCompletion` so tests can swap in
/// deterministic doubles.
#[derive(Clone)]
pub struct AppState {
    pub llm: Arc<dyn TextCompletion>,
    pub sessions: SessionStore,
}
