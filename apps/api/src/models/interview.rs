use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// One evaluated answer. Append-only once recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewResponse {
    pub question: String,
    pub answer: String,
    pub evaluation: String,
    pub score: u32,
}

/// Lifecycle position, derived from the cursor and the final fields.
/// There is no persisted stage column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterviewStage {
    InProgress,
    Completed,
    Finished,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewRecord {
    pub id: Uuid,
    pub resume_data: Value,
    pub questions: Vec<String>,
    pub responses: Vec<InterviewResponse>,
    pub current_question_index: usize,
    pub final_score: Option<f64>,
    pub final_feedback: Option<String>,
    /// Bumped by the store on every successful update.
    pub revision: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InterviewRecord {
    pub fn new(resume_data: Value, questions: Vec<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            resume_data,
            questions,
            responses: Vec::new(),
            current_question_index: 0,
            final_score: None,
            final_feedback: None,
            revision: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn stage(&self) -> InterviewStage {
        if self.final_score.is_some() {
            InterviewStage::Finished
        } else if self.current_question_index >= self.questions.len() {
            InterviewStage::Completed
        } else {
            InterviewStage::InProgress
        }
    }

    pub fn current_question(&self) -> Option<&str> {
        self.questions
            .get(self.current_question_index)
            .map(String::as_str)
    }
}

/// Row shape of the `interviews` table.
#[derive(Debug, Clone, FromRow)]
pub struct InterviewRow {
    pub id: Uuid,
    pub resume_data: Value,
    pub questions: Vec<String>,
    pub responses: Json<Vec<InterviewResponse>>,
    pub current_question_index: i32,
    pub final_score: Option<f64>,
    pub final_feedback: Option<String>,
    pub revision: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<InterviewRow> for InterviewRecord {
    type Error = anyhow::Error;

    fn try_from(row: InterviewRow) -> Result<Self, Self::Error> {
        let current_question_index = usize::try_from(row.current_question_index).map_err(|_| {
            anyhow::anyhow!(
                "interview {} has negative question index {}",
                row.id,
                row.current_question_index
            )
        })?;

        Ok(InterviewRecord {
            id: row.id,
            resume_data: row.resume_data,
            questions: row.questions,
            responses: row.responses.0,
            current_question_index,
            final_score: row.final_score,
            final_feedback: row.final_feedback,
            revision: row.revision,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(questions: &[&str]) -> InterviewRecord {
        InterviewRecord::new(
            json!({"skills": ["Go"]}),
            questions.iter().map(|q| q.to_string()).collect(),
        )
    }

    #[test]
    fn test_new_record_starts_in_progress() {
        let r = record(&["Q1", "Q2"]);
        assert_eq!(r.stage(), InterviewStage::InProgress);
        assert_eq!(r.current_question(), Some("Q1"));
        assert_eq!(r.revision, 0);
        assert!(r.responses.is_empty());
    }

    #[test]
    fn test_stage_completed_when_cursor_reaches_end() {
        let mut r = record(&["Q1"]);
        r.current_question_index = 1;
        assert_eq!(r.stage(), InterviewStage::Completed);
        assert_eq!(r.current_question(), None);
    }

    #[test]
    fn test_final_score_means_finished_even_mid_interview() {
        let mut r = record(&["Q1", "Q2"]);
        r.current_question_index = 1;
        r.final_score = Some(6.0);
        assert_eq!(r.stage(), InterviewStage::Finished);
    }

    #[test]
    fn test_row_with_negative_index_is_rejected() {
        let r = record(&["Q1"]);
        let row = InterviewRow {
            id: r.id,
            resume_data: r.resume_data.clone(),
            questions: r.questions.clone(),
            responses: Json(vec![]),
            current_question_index: -1,
            final_score: None,
            final_feedback: None,
            revision: 0,
            created_at: r.created_at,
            updated_at: r.updated_at,
        };
        assert!(InterviewRecord::try_from(row).is_err());
    }

    #[test]
    fn test_response_serializes_camel_case() {
        let resp = InterviewResponse {
            question: "Q".into(),
            answer: "A".into(),
            evaluation: "Score: 8/10".into(),
            score: 8,
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["score"], 8);
        assert_eq!(json["evaluation"], "Score: 8/10");
    }
}
