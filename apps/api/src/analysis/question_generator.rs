//! Question generation: one conversational question per skill.
//!
//! Never fails: when the model is unavailable or returns an unusable list,
//! a generic question is produced for every skill instead.

use async_trait::async_trait;
use tracing::warn;

use crate::analysis::prompts::{QUESTION_GEN_PROMPT_TEMPLATE, QUESTION_GEN_SYSTEM};
use crate::interview::collaborators::{CollaboratorError, QuestionGenerator};
use crate::interview::models::Skill;
use crate::llm_client::prompts::JSON_ARRAY_ONLY;
use crate::llm_client::LlmClient;

pub struct LlmQuestionGenerator {
    llm: LlmClient,
}

impl LlmQuestionGenerator {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl QuestionGenerator for LlmQuestionGenerator {
    async fn generate(
        &self,
        skills: &[Skill],
        max_questions: usize,
    ) -> Result<Vec<String>, CollaboratorError> {
        let targeted = &skills[..skills.len().min(max_questions)];
        if targeted.is_empty() {
            return Ok(Vec::new());
        }

        let skill_lines = targeted
            .iter()
            .map(|s| format!("- {} ({})", s.name, s.category))
            .collect::<Vec<_>>()
            .join("\n");
        let prompt = QUESTION_GEN_PROMPT_TEMPLATE
            .replace("{skills}", &skill_lines)
            .replace("{count}", &targeted.len().to_string());
        let system = format!("{QUESTION_GEN_SYSTEM} {JSON_ARRAY_ONLY}");

        match self.llm.call_json::<Vec<String>>(&prompt, &system).await {
            Ok(questions) => Ok(usable_or_generic(questions, targeted)),
            Err(e) => {
                warn!("Question generation failed, using generic questions: {e}");
                Ok(generic_questions(targeted))
            }
        }
    }
}

pub fn generic_questions(skills: &[Skill]) -> Vec<String> {
    skills
        .iter()
        .map(|s| format!("Can you tell me about your experience with {}?", s.name))
        .collect()
}

/// Keeps the model's questions when they line up one-to-one with the skills.
fn usable_or_generic(questions: Vec<String>, skills: &[Skill]) -> Vec<String> {
    let questions: Vec<String> = questions
        .into_iter()
        .map(|q| q.trim().to_string())
        .filter(|q| !q.is_empty())
        .collect();

    if questions.len() == skills.len() {
        questions
    } else {
        warn!(
            "Model returned {} questions for {} skills, using generic questions",
            questions.len(),
            skills.len()
        );
        generic_questions(skills)
    }
}
