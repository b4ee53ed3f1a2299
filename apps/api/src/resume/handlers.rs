use axum::extract::{Multipart, State};
use axum::Json;
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::errors::AppError;
use crate::resume::extract::Document;
use crate::resume::parser::parse_resume;
use crate::state::AppState;

const FILE_FIELDS: &[&str] = &["resume", "file"];

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub message: String,
    pub parsed_data: Value,
}

/// POST /api/resume/upload
///
/// Multipart upload with a `resume` file field. Extracts the text and asks the
/// generator to structure it; the result feeds `/api/interview/start`.
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let document = read_document(&mut multipart).await?;
    info!(
        "Received résumé upload {:?} ({} bytes)",
        document.file_name,
        document.bytes.len()
    );

    let text = state.extractors.clone().extract_text(document).await?;
    let parsed_data = parse_resume(state.llm.as_ref(), &text).await?;

    Ok(Json(UploadResponse {
        message: "Resume processed successfully".to_string(),
        parsed_data,
    }))
}

async fn read_document(multipart: &mut Multipart) -> Result<Document, AppError> {
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        AppError::validation(format!("Malformed multipart body: {e}"), &["resume"])
    })? {
        if !field.name().is_some_and(|name| FILE_FIELDS.contains(&name)) {
            continue;
        }

        let file_name = field.file_name().map(String::from);
        let content_type = field.content_type().map(String::from);
        let bytes = field.bytes().await.map_err(|e| {
            AppError::validation(format!("Failed to read uploaded file: {e}"), &["resume"])
        })?;

        return Ok(Document {
            file_name,
            content_type,
            bytes,
        });
    }

    Err(AppError::validation(
        "Missing file upload. Send multipart form data with a `resume` file field.",
        &["resume"],
    ))
}
