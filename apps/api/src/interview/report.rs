//! Final interview report: a pure derivation of session state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::interview::models::{SessionState, TranscriptRecord};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillHas {
    pub skill: String,
    pub category: String,
    pub question_index: usize,
    pub detected_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillMissing {
    pub skill: String,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub session_id: Uuid,
    /// First-detection order.
    pub skills_has: Vec<SkillHas>,
    /// Original skill order.
    pub skills_missing: Vec<SkillMissing>,
    /// 0.0 – 1.0
    pub coverage: f64,
    pub total_skills: usize,
    pub all_skills_detected: bool,
    pub duration_seconds: i64,
    pub answers: Vec<TranscriptRecord>,
}

pub fn build_report(session: &SessionState) -> Report {
    let skills_has: Vec<SkillHas> = session
        .skills_detected
        .iter()
        .filter_map(|detection| {
            session
                .skills
                .iter()
                .find(|s| s.name == detection.skill)
                .map(|skill| SkillHas {
                    skill: skill.name.clone(),
                    category: skill.category.clone(),
                    question_index: detection.question_index,
                    detected_at: detection.detected_at,
                })
        })
        .collect();

    let skills_missing: Vec<SkillMissing> = session
        .skills
        .iter()
        .filter(|s| !session.is_detected(&s.name))
        .map(|s| SkillMissing {
            skill: s.name.clone(),
            category: s.category.clone(),
        })
        .collect();

    let total_skills = session.skills.len();
    let coverage = if total_skills > 0 {
        skills_has.len() as f64 / total_skills as f64
    } else {
        0.0
    };

    // Active sessions measure up to the last answer so the report stays pure.
    let ended_at = session
        .completed_at
        .or_else(|| session.transcripts.last().map(|t| t.recorded_at))
        .unwrap_or(session.created_at);

    Report {
        session_id: session.session_id,
        all_skills_detected: total_skills > 0 && skills_missing.is_empty(),
        skills_has,
        skills_missing,
        coverage,
        total_skills,
        duration_seconds: (ended_at - session.created_at).num_seconds().max(0),
        answers: session.transcripts.clone(),
    }
}
