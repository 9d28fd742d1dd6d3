use std::sync::Arc;

use crate::config::Config;
use crate::interview::collaborators::{QuestionGenerator, SkillExtractor};
use crate::interview::engine::InterviewEngine;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<InterviewEngine>,
    /// Used only when a session is started from a raw job description.
    pub skill_extractor: Arc<dyn SkillExtractor>,
    pub question_generator: Arc<dyn QuestionGenerator>,
    pub config: Config,
}
