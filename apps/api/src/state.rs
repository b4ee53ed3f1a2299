use std::sync::Arc;

use crate::config::Config;
use crate::interview::session::SessionLocks;
use crate::interview::store::InterviewStore;
use crate::llm_client::TextGenerator;
use crate::resume::extract::ExtractorRegistry;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Interview persistence. Postgres when `DATABASE_URL` is set, memory otherwise.
    pub store: Arc<dyn InterviewStore>,
    /// Text generator. `LlmClient` in production.
    pub llm: Arc<dyn TextGenerator>,
    pub extractors: Arc<ExtractorRegistry>,
    /// Serialises answer/finish per interview id.
    pub session_locks: SessionLocks,
    pub config: Config,
}
