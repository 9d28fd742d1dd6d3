//! Collaborator seam: the external ASR and LLM capabilities the engine calls
//! but does not implement.
//!
//! Each capability is a trait carried as `Arc<dyn Trait>`, so the concrete
//! backends in `analysis` can be swapped for scripted fakes in tests.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::interview::models::Skill;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CollaboratorError {
    #[error("timed out: {0}")]
    Timeout(String),

    #[error("unavailable: {0}")]
    Unavailable(String),

    /// The collaborator answered but refused the input (e.g. unintelligible audio).
    #[error("rejected input: {0}")]
    Rejected(String),
}

impl CollaboratorError {
    /// Only timeouts are retried at the engine boundary; HTTP backends already
    /// retry their own transient statuses.
    pub fn is_retryable(&self) -> bool {
        matches!(self, CollaboratorError::Timeout(_))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcription {
    pub text: String,
    pub language: Option<String>,
    pub confidence: Option<f32>,
}

#[async_trait]
pub trait SkillExtractor: Send + Sync {
    async fn extract(&self, job_description: &str) -> Result<Vec<Skill>, CollaboratorError>;
}

#[async_trait]
pub trait QuestionGenerator: Send + Sync {
    async fn generate(
        &self,
        skills: &[Skill],
        max_questions: usize,
    ) -> Result<Vec<String>, CollaboratorError>;
}

#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, audio: Bytes) -> Result<Transcription, CollaboratorError>;
}

#[async_trait]
pub trait TranscriptCleaner: Send + Sync {
    async fn clean(&self, text: &str) -> Result<String, CollaboratorError>;
}

#[async_trait]
pub trait SkillDetector: Send + Sync {
    /// Returns the subset of `candidates` the text demonstrates.
    async fn detect(
        &self,
        text: &str,
        candidates: &[String],
    ) -> Result<Vec<String>, CollaboratorError>;
}

/// Timeout and backoff applied to every collaborator call the engine makes.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub call_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
            call_timeout: Duration::from_secs(90),
        }
    }
}

impl RetryPolicy {
    /// Delay before attempt `attempt` (1-based retries): base, 2×base, 4×base, …
    pub fn backoff(&self, attempt: u32) -> Duration {
        let shift = attempt.saturating_sub(1).min(16);
        self.base_delay.saturating_mul(1 << shift)
    }
}

/// Runs `call` under the policy's timeout, retrying retryable failures with
/// exponential backoff until attempts run out.
pub async fn call_with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    collaborator: &str,
    mut call: F,
) -> Result<T, CollaboratorError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, CollaboratorError>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        if attempt > 0 {
            let delay = policy.backoff(attempt);
            warn!(
                "{collaborator} attempt {attempt} failed, retrying after {}ms...",
                delay.as_millis()
            );
            tokio::time::sleep(delay).await;
        }
        attempt += 1;

        let result = match tokio::time::timeout(policy.call_timeout, call()).await {
            Ok(result) => result,
            Err(_) => Err(CollaboratorError::Timeout(format!(
                "no reply within {}s",
                policy.call_timeout.as_secs()
            ))),
        };

        match result {
            Ok(value) => return Ok(value),
            Err(e) if e.is_retryable() && attempt < max_attempts => continue,
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use super::*;

    fn policy() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            base_delay: Duration::from_millis(100),
            call_timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn test_backoff_doubles() {
        let p = policy();
        assert_eq!(p.backoff(1), Duration::from_millis(100));
        assert_eq!(p.backoff(2), Duration::from_millis(200));
        assert_eq!(p.backoff(3), Duration::from_millis(400));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeouts_are_retried_until_success() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();

        let result = call_with_retry(&policy(), "transcriber", || {
            let counter = counter.clone();
            async move {
                let n = counter.fetch_add(1, Ordering::SeqCst);
                if n < 2 {
                    Err(CollaboratorError::Timeout("slow".to_string()))
                } else {
                    Ok("done")
                }
            }
        })
        .await;

        assert_eq!(result, Ok("done"));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_call_becomes_timeout_after_max_attempts() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();

        let result: Result<(), _> = call_with_retry(&policy(), "cleaner", || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok(())
            }
        })
        .await;

        assert_eq!(
            result,
            Err(CollaboratorError::Timeout("no reply within 5s".to_string()))
        );
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejected_is_not_retried() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();

        let result: Result<(), _> = call_with_retry(&policy(), "transcriber", || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(CollaboratorError::Rejected("silence".to_string()))
            }
        })
        .await;

        assert!(matches!(result, Err(CollaboratorError::Rejected(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_attempts_still_calls_once() {
        let p = RetryPolicy {
            max_attempts: 0,
            ..policy()
        };
        let result = call_with_retry(&p, "detector", || async { Ok::<_, CollaboratorError>(7) }).await;
        assert_eq!(result, Ok(7));
    }
}
