//! Interview Session Controller — drives start → answer × N → finish.
//!
//! Every operation mutates an in-memory copy of the record and persists it
//! exactly once at the end, so a failed generator call never leaves a partial
//! write behind. Answer and finish are serialised per interview through
//! `SessionLocks`; the store's revision check covers other processes.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde::Serialize;
use serde_json::Value;
use tokio::sync::OwnedMutexGuard;
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::prompts::{answer_evaluation_prompt, question_generation_prompt};
use crate::interview::question_parser::parse_question_list;
use crate::interview::scoring::{average_score, extract_score, feedback_for};
use crate::interview::store::InterviewStore;
use crate::llm_client::TextGenerator;
use crate::models::interview::{InterviewRecord, InterviewResponse, InterviewStage};

pub const COMPLETION_MESSAGE: &str = "Interview completed. Please finish interview.";

// ────────────────────────────────────────────────────────────────────────────
// Per-interview locks
// ────────────────────────────────────────────────────────────────────────────

/// Registry of one async mutex per interview id.
#[derive(Clone, Default)]
pub struct SessionLocks {
    inner: Arc<Mutex<HashMap<Uuid, Arc<tokio::sync::Mutex<()>>>>>,
}

impl SessionLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to `id`. Released when the guard drops.
    pub async fn acquire(&self, id: Uuid) -> OwnedMutexGuard<()> {
        let lock = {
            let mut map = self.inner.lock().unwrap_or_else(|e| e.into_inner());
            // Entries nobody holds or waits on only have the map's reference.
            map.retain(|_, l| Arc::strong_count(l) > 1);
            map.entry(id).or_default().clone()
        };
        lock.lock_owned().await
    }

    #[cfg(test)]
    fn tracked(&self) -> usize {
        self.inner.lock().unwrap().len()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Outcomes
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartOutcome {
    pub interview_id: Uuid,
    pub question: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnswerOutcome {
    #[serde(rename_all = "camelCase")]
    NextQuestion { next_question: String },
    Completed { message: String },
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinishOutcome {
    pub final_score: f64,
    pub feedback: String,
    pub detailed_responses: Vec<InterviewResponse>,
}

// ────────────────────────────────────────────────────────────────────────────
// Operations
// ────────────────────────────────────────────────────────────────────────────

/// Renders résumé data for the prompt: strings verbatim, anything else as
/// pretty-printed JSON.
pub fn resume_to_prompt_text(resume_data: &Value) -> String {
    match resume_data {
        Value::String(s) => s.clone(),
        other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
    }
}

/// Generates questions for `resume_data` and creates the interview record.
pub async fn start_interview(
    store: &dyn InterviewStore,
    llm: &dyn TextGenerator,
    resume_data: Value,
) -> Result<StartOutcome, AppError> {
    let prompt = question_generation_prompt(&resume_to_prompt_text(&resume_data));
    let raw = llm
        .generate(&prompt)
        .await
        .map_err(|e| AppError::Upstream(format!("Question generation failed: {e}")))?;

    let questions = parse_question_list(&raw);
    debug!("Parsed {} questions from generator output", questions.len());

    let Some(first) = questions.first().cloned() else {
        return Err(AppError::Upstream(
            "Failed to generate interview questions from resume data.".to_string(),
        ));
    };

    let record = InterviewRecord::new(resume_data, questions);
    store.insert(&record).await?;

    info!(
        interview_id = %record.id,
        questions = record.questions.len(),
        "Interview started"
    );

    Ok(StartOutcome {
        interview_id: record.id,
        question: first,
    })
}

/// Evaluates `answer` against the current question and advances the cursor.
pub async fn submit_answer(
    store: &dyn InterviewStore,
    llm: &dyn TextGenerator,
    locks: &SessionLocks,
    interview_id: Uuid,
    answer: &str,
) -> Result<AnswerOutcome, AppError> {
    let _guard = locks.acquire(interview_id).await;

    let mut record = load(store, interview_id).await?;

    match record.stage() {
        InterviewStage::Finished => {
            return Err(AppError::InvalidState(
                "Interview already finished.".to_string(),
            ))
        }
        InterviewStage::Completed => {
            return Err(AppError::InvalidState(
                "Interview already completed. Call /api/interview/finish.".to_string(),
            ))
        }
        InterviewStage::InProgress => {}
    }

    let question = record
        .current_question()
        .map(str::to_string)
        .ok_or_else(|| anyhow::anyhow!("interview {interview_id} has no current question"))?;

    let evaluation = llm
        .generate(&answer_evaluation_prompt(&question, answer))
        .await
        .map_err(|e| AppError::Upstream(format!("Answer evaluation failed: {e}")))?;
    let score = extract_score(&evaluation);

    record.responses.push(InterviewResponse {
        question,
        answer: answer.to_string(),
        evaluation,
        score,
    });
    record.current_question_index += 1;

    store.update(&record).await?;

    info!(
        interview_id = %interview_id,
        answered = record.current_question_index,
        total = record.questions.len(),
        score,
        "Answer recorded"
    );

    Ok(match record.current_question() {
        Some(next) => AnswerOutcome::NextQuestion {
            next_question: next.to_string(),
        },
        None => AnswerOutcome::Completed {
            message: COMPLETION_MESSAGE.to_string(),
        },
    })
}

/// Averages recorded scores and stores the final score and feedback.
/// Calling it again on a finished interview returns the same result.
pub async fn finish_interview(
    store: &dyn InterviewStore,
    locks: &SessionLocks,
    interview_id: Uuid,
) -> Result<FinishOutcome, AppError> {
    let _guard = locks.acquire(interview_id).await;

    let mut record = load(store, interview_id).await?;

    let final_score = average_score(&record.responses).ok_or_else(|| {
        AppError::InvalidState(
            "No answers submitted yet. Submit answers before finishing interview.".to_string(),
        )
    })?;
    let feedback = feedback_for(final_score).to_string();

    let unchanged = record.final_score == Some(final_score)
        && record.final_feedback.as_deref() == Some(feedback.as_str());
    if !unchanged {
        record.final_score = Some(final_score);
        record.final_feedback = Some(feedback.clone());
        store.update(&record).await?;
        info!(interview_id = %interview_id, final_score, "Interview finished");
    }

    Ok(FinishOutcome {
        final_score,
        feedback,
        detailed_responses: record.responses,
    })
}

/// Loads a record or fails with `NotFound`.
pub async fn load(store: &dyn InterviewStore, interview_id: Uuid) -> Result<InterviewRecord, AppError> {
    store
        .get(interview_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Interview not found.".to_string()))
}
