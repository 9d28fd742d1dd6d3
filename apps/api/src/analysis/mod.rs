// Concrete collaborator backends: the Claude-backed extractor, question
// generator, cleaner and detector, plus the Whisper speech-to-text client.
// All LLM calls go through llm_client; no direct Anthropic calls here.

pub mod cleaner;
pub mod prompts;
pub mod question_generator;
pub mod skill_detector;
pub mod skill_extractor;
pub mod transcriber;

use crate::interview::collaborators::CollaboratorError;
use crate::llm_client::LlmError;

impl From<LlmError> for CollaboratorError {
    fn from(e: LlmError) -> Self {
        match e {
            e if e.is_timeout() => CollaboratorError::Timeout(e.to_string()),
            LlmError::Parse(e) => CollaboratorError::Rejected(format!("unparseable reply: {e}")),
            LlmError::EmptyContent => {
                CollaboratorError::Rejected("empty reply from model".to_string())
            }
            other => CollaboratorError::Unavailable(other.to_string()),
        }
    }
}
