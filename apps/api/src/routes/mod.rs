pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::interview::handlers as interview;
use crate::resume::handlers as resume;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Interview API
        .route("/api/interview/start", post(interview::handle_start))
        .route("/api/interview/answer", post(interview::handle_submit_answer))
        .route(
            "/api/interview/:interview_id/answer",
            post(interview::handle_submit_answer_for),
        )
        .route("/api/interview/finish", post(interview::handle_finish))
        .route(
            "/api/interview/:interview_id",
            get(interview::handle_get_interview),
        )
        // Resume API
        .route(
            "/api/resume/upload",
            post(resume::handle_upload).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .with_state(state)
}
