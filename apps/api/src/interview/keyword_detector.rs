//! Deterministic skill detection by name match. Used when the detector
//! collaborator fails, and by the LLM detector when its reply is unusable.

use async_trait::async_trait;

use crate::interview::collaborators::{CollaboratorError, SkillDetector};

/// Candidates whose name appears verbatim (ignoring case) in the text.
pub fn match_keywords(text: &str, candidates: &[String]) -> Vec<String> {
    let text_lower = text.to_lowercase();
    candidates
        .iter()
        .filter(|name| {
            let name = name.trim().to_lowercase();
            !name.is_empty() && text_lower.contains(&name)
        })
        .cloned()
        .collect()
}

pub struct KeywordSkillDetector;

#[async_trait]
impl SkillDetector for KeywordSkillDetector {
    async fn detect(
        &self,
        text: &str,
        candidates: &[String],
    ) -> Result<Vec<String>, CollaboratorError> {
        Ok(match_keywords(text, candidates))
    }
}
