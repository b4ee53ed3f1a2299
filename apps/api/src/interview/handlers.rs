//! Axum route handlers for the Interview API.
//!
//! Bodies are read as loose JSON so the field synonyms older clients send
//! (`parsedData`, `interview_id`, `userAnswer`, ...) keep working. A missing or
//! unparsable body is treated as an empty object and reported field by field.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::session::{
    finish_interview, load, start_interview, submit_answer, AnswerOutcome, FinishOutcome,
    StartOutcome,
};
use crate::models::interview::{InterviewResponse, InterviewStage};
use crate::state::AppState;

const RESUME_KEYS: &[&str] = &["parsedResume", "parsedData", "resumeData"];
const INTERVIEW_ID_KEYS: &[&str] = &["interviewId", "interviewID", "interview_id"];
const ANSWER_KEYS: &[&str] = &["answer", "response", "userAnswer"];

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct InterviewIdQuery {
    #[serde(rename = "interviewId")]
    pub interview_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewView {
    pub interview_id: Uuid,
    pub stage: InterviewStage,
    pub resume_data: Value,
    pub questions: Vec<String>,
    pub current_question_index: usize,
    pub current_question: Option<String>,
    pub responses: Vec<InterviewResponse>,
    pub final_score: Option<f64>,
    pub final_feedback: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/interview/start
pub async fn handle_start(
    State(state): State<AppState>,
    body: Option<Json<Value>>,
) -> Result<Json<StartOutcome>, AppError> {
    let body = unwrap_body(body);

    let resume_data = body_field(&body, RESUME_KEYS)
        .filter(|v| !is_blank(v))
        .cloned()
        .ok_or_else(|| {
            AppError::validation(
                "Missing resume data. Send JSON body with `parsedResume` (or `parsedData`).",
                &["parsedResume"],
            )
        })?;

    let outcome = start_interview(state.store.as_ref(), state.llm.as_ref(), resume_data).await?;
    Ok(Json(outcome))
}

/// POST /api/interview/answer
pub async fn handle_submit_answer(
    State(state): State<AppState>,
    Query(query): Query<InterviewIdQuery>,
    body: Option<Json<Value>>,
) -> Result<Json<AnswerOutcome>, AppError> {
    submit(state, None, query, unwrap_body(body)).await
}

/// POST /api/interview/:interview_id/answer
pub async fn handle_submit_answer_for(
    State(state): State<AppState>,
    Path(interview_id): Path<String>,
    Query(query): Query<InterviewIdQuery>,
    body: Option<Json<Value>>,
) -> Result<Json<AnswerOutcome>, AppError> {
    submit(state, Some(interview_id), query, unwrap_body(body)).await
}

async fn submit(
    state: AppState,
    path_id: Option<String>,
    query: InterviewIdQuery,
    body: Value,
) -> Result<Json<AnswerOutcome>, AppError> {
    let raw_id = interview_id_candidate(&body, path_id, query);
    let answer = body_field(&body, ANSWER_KEYS)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|a| !a.is_empty());

    let mut missing = Vec::new();
    if raw_id.is_none() {
        missing.push("interviewId");
    }
    if answer.is_none() {
        missing.push("answer");
    }
    let (Some(raw_id), Some(answer)) = (raw_id, answer) else {
        return Err(AppError::validation(
            "Missing required fields: `interviewId` and non-empty `answer`.",
            &missing,
        ));
    };

    let interview_id = parse_interview_id(&raw_id)?;
    let outcome = submit_answer(
        state.store.as_ref(),
        state.llm.as_ref(),
        &state.session_locks,
        interview_id,
        answer,
    )
    .await?;
    Ok(Json(outcome))
}

/// POST /api/interview/finish
pub async fn handle_finish(
    State(state): State<AppState>,
    Query(query): Query<InterviewIdQuery>,
    body: Option<Json<Value>>,
) -> Result<Json<FinishOutcome>, AppError> {
    let body = unwrap_body(body);
    let raw_id = interview_id_candidate(&body, None, query).ok_or_else(|| {
        AppError::validation("Missing required field: `interviewId`.", &["interviewId"])
    })?;
    let interview_id = parse_interview_id(&raw_id)?;

    let outcome = finish_interview(state.store.as_ref(), &state.session_locks, interview_id).await?;
    Ok(Json(outcome))
}

/// GET /api/interview/:interview_id
pub async fn handle_get_interview(
    State(state): State<AppState>,
    Path(interview_id): Path<String>,
) -> Result<Json<InterviewView>, AppError> {
    let interview_id = parse_interview_id(&Value::String(interview_id))?;
    let record = load(state.store.as_ref(), interview_id).await?;

    Ok(Json(InterviewView {
        interview_id: record.id,
        stage: record.stage(),
        current_question: record.current_question().map(String::from),
        resume_data: record.resume_data,
        questions: record.questions,
        current_question_index: record.current_question_index,
        responses: record.responses,
        final_score: record.final_score,
        final_feedback: record.final_feedback,
        created_at: record.created_at,
        updated_at: record.updated_at,
    }))
}

// ────────────────────────────────────────────────────────────────────────────
// Body helpers
// ────────────────────────────────────────────────────────────────────────────

fn unwrap_body(body: Option<Json<Value>>) -> Value {
    body.map(|Json(v)| v).unwrap_or(Value::Null)
}

/// First non-null value among `keys`, in order.
fn body_field<'a>(body: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|k| body.get(*k))
        .find(|v| !v.is_null())
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Body first, then path, then query string.
fn interview_id_candidate(
    body: &Value,
    path_id: Option<String>,
    query: InterviewIdQuery,
) -> Option<Value> {
    body_field(body, INTERVIEW_ID_KEYS)
        .filter(|v| !is_blank(v))
        .cloned()
        .or_else(|| {
            [path_id, query.interview_id]
                .into_iter()
                .flatten()
                .find(|s| !s.trim().is_empty())
                .map(Value::String)
        })
}

fn parse_interview_id(raw: &Value) -> Result<Uuid, AppError> {
    raw.as_str()
        .and_then(|s| Uuid::parse_str(s.trim()).ok())
        .ok_or_else(|| AppError::validation("Invalid `interviewId` format.", &["interviewId"]))
}
