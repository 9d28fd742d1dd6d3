//! Transcript cleanup: fixes speech recognition errors before detection.

use async_trait::async_trait;

use crate::analysis::prompts::{CLEANUP_PROMPT_TEMPLATE, CLEANUP_SYSTEM};
use crate::interview::collaborators::{CollaboratorError, TranscriptCleaner};
use crate::llm_client::LlmClient;

/// Texts shorter than this are passed through without a model call.
const MIN_CLEANUP_CHARS: usize = 5;

pub struct LlmTranscriptCleaner {
    llm: LlmClient,
}

impl LlmTranscriptCleaner {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl TranscriptCleaner for LlmTranscriptCleaner {
    async fn clean(&self, text: &str) -> Result<String, CollaboratorError> {
        if needs_no_cleanup(text) {
            return Ok(text.to_string());
        }

        let prompt = CLEANUP_PROMPT_TEMPLATE.replace("{text}", text);
        let cleaned = self.llm.call_text(&prompt, CLEANUP_SYSTEM).await?;
        Ok(unquote(&cleaned).unwrap_or(text).to_string())
    }
}

fn needs_no_cleanup(text: &str) -> bool {
    text.trim().chars().count() < MIN_CLEANUP_CHARS
}

/// Models sometimes echo the quotes from the prompt back. Returns `None` for
/// an empty reply.
fn unquote(reply: &str) -> Option<&str> {
    let reply = reply.trim();
    let reply = reply
        .strip_prefix('"')
        .and_then(|r| r.strip_suffix('"'))
        .unwrap_or(reply)
        .trim();
    if reply.is_empty() {
        None
    } else {
        Some(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_skips_cleanup() {
        assert!(needs_no_cleanup("yes"));
        assert!(needs_no_cleanup("  ok   "));
        assert!(!needs_no_cleanup("I have my OSHA ten"));
    }

    #[test]
    fn test_unquote_strips_echoed_quotes() {
        assert_eq!(unquote("\"I have OSHA 10.\""), Some("I have OSHA 10."));
        assert_eq!(unquote("I have OSHA 10."), Some("I have OSHA 10."));
    }

    #[test]
    fn test_unquote_empty_reply_is_none() {
        assert_eq!(unquote("   "), None);
        assert_eq!(unquote("\"\""), None);
    }
}
