//! Résumé structuring — turns extracted document text into résumé data via
//! the text generator.

use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::AppError;
use crate::llm_client::{strip_json_fences, TextGenerator};
use crate::resume::prompts::resume_extraction_prompt;

/// Asks the generator to structure `resume_text`.
///
/// The reply is returned as JSON when it parses as such (fences stripped),
/// otherwise as a plain string. Either shape is accepted by interview start.
pub async fn parse_resume(llm: &dyn TextGenerator, resume_text: &str) -> Result<Value, AppError> {
    let raw = llm
        .generate(&resume_extraction_prompt(resume_text))
        .await
        .map_err(|e| AppError::Upstream(format!("Resume parsing failed: {e}")))?;

    Ok(structured_or_text(&raw))
}

fn structured_or_text(raw: &str) -> Value {
    match serde_json::from_str::<Value>(strip_json_fences(raw)) {
        Ok(value) => {
            debug!("Generator returned structured résumé data");
            value
        }
        Err(e) => {
            warn!("Résumé data is not valid JSON ({e}); keeping raw text");
            Value::String(raw.to_string())
        }
    }
}
