use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::interview::collaborators::RetryPolicy;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub transcriber_url: String,
    pub transcriber_api_key: Option<String>,
    pub transcriber_model: String,
    pub collaborator_timeout_secs: u64,
    pub collaborator_max_attempts: u32,
    pub collaborator_backoff_ms: u64,
    /// Skills kept from a job description; also the default question budget.
    pub max_interview_skills: usize,
    pub max_upload_bytes: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            transcriber_url: require_env("TRANSCRIBER_URL")?,
            transcriber_api_key: std::env::var("TRANSCRIBER_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            transcriber_model: std::env::var("TRANSCRIBER_MODEL")
                .unwrap_or_else(|_| "whisper-1".to_string()),
            collaborator_timeout_secs: parse_env::<u64>("COLLABORATOR_TIMEOUT_SECS", 90)?
                .clamp(1, 600),
            collaborator_max_attempts: parse_env::<u32>("COLLABORATOR_MAX_ATTEMPTS", 3)?.max(1),
            collaborator_backoff_ms: parse_env("COLLABORATOR_BACKOFF_MS", 500)?,
            max_interview_skills: parse_env::<usize>("MAX_INTERVIEW_SKILLS", 8)?.max(1),
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", 25 * 1024 * 1024)?,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    pub fn collaborator_timeout(&self) -> Duration {
        Duration::from_secs(self.collaborator_timeout_secs)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.collaborator_max_attempts,
            base_delay: Duration::from_millis(self.collaborator_backoff_ms),
            call_timeout: self.collaborator_timeout(),
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        Err(_) => Ok(default),
    }
}
