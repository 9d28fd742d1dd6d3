//! Skill detection: which of the offered skills an answer demonstrates.
//!
//! Default: `LlmSkillDetector` (semantic, handles "I drive a forklift" → "Forklift Operation").
//! Fallback: `interview::keyword_detector` (case-insensitive name match, no I/O).

use async_trait::async_trait;
use tracing::debug;

use crate::analysis::prompts::{SKILL_DETECT_PROMPT_TEMPLATE, SKILL_DETECT_SYSTEM};
use crate::interview::collaborators::{CollaboratorError, SkillDetector};
use crate::interview::keyword_detector::match_keywords;
use crate::llm_client::prompts::{JSON_ARRAY_ONLY, NO_INVENTION_INSTRUCTION};
use crate::llm_client::LlmClient;

pub struct LlmSkillDetector {
    llm: LlmClient,
}

impl LlmSkillDetector {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl SkillDetector for LlmSkillDetector {
    async fn detect(
        &self,
        text: &str,
        candidates: &[String],
    ) -> Result<Vec<String>, CollaboratorError> {
        if candidates.is_empty() || text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let prompt = build_detect_prompt(text, candidates);
        let system = format!("{SKILL_DETECT_SYSTEM} {NO_INVENTION_INSTRUCTION} {JSON_ARRAY_ONLY}");

        match self.llm.call_json::<Vec<String>>(&prompt, &system).await {
            Ok(names) if !names.is_empty() => Ok(names),
            Ok(_) => Ok(match_keywords(text, candidates)),
            // A reply we cannot read still leaves the verbatim mentions.
            Err(crate::llm_client::LlmError::Parse(e)) => {
                debug!("Detector reply unparseable ({e}), using keyword match");
                Ok(match_keywords(text, candidates))
            }
            Err(e) => Err(e.into()),
        }
    }
}

fn build_detect_prompt(text: &str, candidates: &[String]) -> String {
    let skills = candidates
        .iter()
        .map(|c| format!("- {c}"))
        .collect::<Vec<_>>()
        .join("\n");
    SKILL_DETECT_PROMPT_TEMPLATE
        .replace("{skills}", &skills)
        .replace("{text}", text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_detect_prompt_lists_only_candidates() {
        let prompt = build_detect_prompt("I weld", &names(&["Welding", "CPR"]));
        assert!(prompt.contains("- Welding\n- CPR"));
        assert!(prompt.contains("\"I weld\""));
    }
}
