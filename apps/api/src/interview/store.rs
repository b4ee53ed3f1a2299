//! Interview Record Store — persistence behind a trait so the session
//! controller can run against PostgreSQL in production and memory in tests.
//!
//! Both backends enforce the same optimistic check: `update` only succeeds when
//! the caller's `revision` matches the stored one, and bumps it by one.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::types::Json;
use sqlx::PgPool;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::interview::{InterviewRecord, InterviewRow};

#[async_trait]
pub trait InterviewStore: Send + Sync {
    /// Short backend name for health output and logs.
    fn backend(&self) -> &'static str;

    async fn insert(&self, record: &InterviewRecord) -> Result<(), AppError>;

    async fn get(&self, id: Uuid) -> Result<Option<InterviewRecord>, AppError>;

    /// Writes the mutable fields of `record` if `record.revision` is current.
    /// Returns the new revision, or `AppError::Conflict` on a stale write.
    async fn update(&self, record: &InterviewRecord) -> Result<i32, AppError>;
}

fn stale_write(id: Uuid, revision: i32) -> AppError {
    AppError::Conflict(format!(
        "Interview {id} was modified concurrently (revision {revision} is stale). Retry the request."
    ))
}

fn index_to_db(record: &InterviewRecord) -> Result<i32, AppError> {
    i32::try_from(record.current_question_index).map_err(|_| {
        AppError::Internal(anyhow::anyhow!(
            "question index {} does not fit the interviews table",
            record.current_question_index
        ))
    })
}

// ────────────────────────────────────────────────────────────────────────────
// PostgreSQL
// ────────────────────────────────────────────────────────────────────────────

pub struct PgInterviewStore {
    pool: PgPool,
}

impl PgInterviewStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InterviewStore for PgInterviewStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn insert(&self, record: &InterviewRecord) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO interviews
                (id, resume_data, questions, responses, current_question_index,
                 final_score, final_feedback, revision, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(record.id)
        .bind(&record.resume_data)
        .bind(&record.questions)
        .bind(Json(&record.responses))
        .bind(index_to_db(record)?)
        .bind(record.final_score)
        .bind(&record.final_feedback)
        .bind(record.revision)
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await?;

        debug!("Inserted interview {}", record.id);
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<InterviewRecord>, AppError> {
        let row = sqlx::query_as::<_, InterviewRow>("SELECT * FROM interviews WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(InterviewRecord::try_from)
            .transpose()
            .map_err(AppError::Internal)
    }

    async fn update(&self, record: &InterviewRecord) -> Result<i32, AppError> {
        let revision: Option<i32> = sqlx::query_scalar(
            r#"
            UPDATE interviews
            SET responses = $1,
                current_question_index = $2,
                final_score = $3,
                final_feedback = $4,
                revision = revision + 1,
                updated_at = now()
            WHERE id = $5 AND revision = $6
            RETURNING revision
            "#,
        )
        .bind(Json(&record.responses))
        .bind(index_to_db(record)?)
        .bind(record.final_score)
        .bind(&record.final_feedback)
        .bind(record.id)
        .bind(record.revision)
        .fetch_optional(&self.pool)
        .await?;

        revision.ok_or_else(|| stale_write(record.id, record.revision))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// In-memory
// ────────────────────────────────────────────────────────────────────────────

/// Process-local store. Used when no `DATABASE_URL` is configured and in tests.
#[derive(Default)]
pub struct InMemoryInterviewStore {
    records: RwLock<HashMap<Uuid, InterviewRecord>>,
}

impl InMemoryInterviewStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl InterviewStore for InMemoryInterviewStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn insert(&self, record: &InterviewRecord) -> Result<(), AppError> {
        let mut records = self.records.write().await;
        if records.contains_key(&record.id) {
            return Err(AppError::Conflict(format!(
                "Interview {} already exists",
                record.id
            )));
        }
        records.insert(record.id, record.clone());
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<InterviewRecord>, AppError> {
        Ok(self.records.read().await.get(&id).cloned())
    }

    async fn update(&self, record: &InterviewRecord) -> Result<i32, AppError> {
        let mut records = self.records.write().await;
        let stored = records
            .get_mut(&record.id)
            .ok_or_else(|| AppError::NotFound(format!("Interview {} not found", record.id)))?;

        if stored.revision != record.revision {
            return Err(stale_write(record.id, record.revision));
        }

        let mut next = record.clone();
        next.revision = record.revision + 1;
        next.updated_at = Utc::now();
        let revision = next.revision;
        *stored = next;
        Ok(revision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::interview::InterviewResponse;
    use serde_json::json;

    fn record() -> InterviewRecord {
        InterviewRecord::new(json!({"skills": ["Go"]}), vec!["Q1".into(), "Q2".into()])
    }

    #[tokio::test]
    async fn test_insert_then_get() {
        let store = InMemoryInterviewStore::new();
        let r = record();
        store.insert(&r).await.unwrap();

        let loaded = store.get(r.id).await.unwrap().unwrap();
        assert_eq!(loaded.questions, vec!["Q1", "Q2"]);
        assert_eq!(loaded.revision, 0);
        assert!(store.get(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_bumps_revision() {
        let store = InMemoryInterviewStore::new();
        let mut r = record();
        store.insert(&r).await.unwrap();

        r.responses.push(InterviewResponse {
            question: "Q1".into(),
            answer: "A".into(),
            evaluation: "Score: 7".into(),
            score: 7,
        });
        r.current_question_index = 1;
        assert_eq!(store.update(&r).await.unwrap(), 1);

        let loaded = store.get(r.id).await.unwrap().unwrap();
        assert_eq!(loaded.revision, 1);
        assert_eq!(loaded.current_question_index, 1);
        assert_eq!(loaded.responses.len(), 1);
    }

    #[tokio::test]
    async fn test_stale_revision_is_rejected() {
        let store = InMemoryInterviewStore::new();
        let r = record();
        store.insert(&r).await.unwrap();

        let mut first = r.clone();
        first.current_question_index = 1;
        store.update(&first).await.unwrap();

        let mut second = r.clone();
        second.current_question_index = 1;
        let err = store.update(&second).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_update_unknown_is_not_found() {
        let store = InMemoryInterviewStore::new();
        let err = store.update(&record()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_duplicate_insert_conflicts() {
        let store = InMemoryInterviewStore::new();
        let r = record();
        store.insert(&r).await.unwrap();
        assert!(matches!(
            store.insert(&r).await.unwrap_err(),
            AppError::Conflict(_)
        ));
    }
}
