use anyhow::{Context, Result};

use crate::llm_client::{LlmConfig, DEFAULT_API_BASE, DEFAULT_MODEL};

const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL URL. Without it interviews live in process memory.
    pub database_url: Option<String>,
    pub llm: LlmConfig,
    pub port: u16,
    pub rust_log: String,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = var("GOOGLE_AI_API_KEY")
            .context("Required environment variable 'GOOGLE_AI_API_KEY' is not set")?;

        Ok(Config {
            database_url: var("DATABASE_URL"),
            llm: LlmConfig {
                api_base: var("GEMINI_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
                model: var("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                ..LlmConfig::new(api_key)
            },
            port: var("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: var("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            max_upload_bytes: match var("MAX_UPLOAD_BYTES") {
                Some(v) => v
                    .parse::<usize>()
                    .context("MAX_UPLOAD_BYTES must be a byte count")?,
                None => DEFAULT_MAX_UPLOAD_BYTES,
            },
        })
    }
}
