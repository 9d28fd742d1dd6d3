//! Session state and the serializable payloads exchanged with the transport layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Category assigned when a skill arrives without one.
pub const DEFAULT_SKILL_CATEGORY: &str = "General";

/// A named capability the interview listens for.
/// Names are unique case-insensitively within a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    pub category: String,
}

impl Skill {
    pub fn new(name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub index: usize,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionStatus {
    Active,
    Completed,
}

/// First detection of a skill. Never overwritten once recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillDetection {
    pub skill: String,
    pub question_index: usize,
    pub detected_at: DateTime<Utc>,
}

/// One submitted answer. Written exactly once per `submit_answer` call,
/// including turns whose transcription failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptRecord {
    pub question_index: usize,
    pub raw_text: String,
    pub cleaned_text: String,
    pub detected_skills_this_turn: Vec<String>,
    pub language: Option<String>,
    pub recorded_at: DateTime<Utc>,
}

/// Full mutable state of one interview. Only the engine mutates it, and only
/// while holding the session's lock.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub session_id: Uuid,
    pub skills: Vec<Skill>,
    pub questions: Vec<Question>,
    pub current_question_index: usize,
    /// Ordered by first detection.
    pub skills_detected: Vec<SkillDetection>,
    pub transcripts: Vec<TranscriptRecord>,
    pub status: SessionStatus,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl SessionState {
    pub fn new(session_id: Uuid, skills: Vec<Skill>, questions: Vec<Question>) -> Self {
        Self {
            session_id,
            skills,
            questions,
            current_question_index: 0,
            skills_detected: Vec::new(),
            transcripts: Vec::new(),
            status: SessionStatus::Active,
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == SessionStatus::Active
    }

    pub fn is_detected(&self, skill_name: &str) -> bool {
        self.detection(skill_name).is_some()
    }

    pub fn detection(&self, skill_name: &str) -> Option<&SkillDetection> {
        self.skills_detected.iter().find(|d| d.skill == skill_name)
    }

    /// Skill names not yet detected, in original skill order.
    pub fn undetected_skill_names(&self) -> Vec<String> {
        self.skills
            .iter()
            .filter(|s| !self.is_detected(&s.name))
            .map(|s| s.name.clone())
            .collect()
    }

    pub fn all_skills_detected(&self) -> bool {
        self.skills_detected.len() == self.skills.len()
    }

    pub fn is_last_question(&self) -> bool {
        self.current_question_index + 1 >= self.questions.len()
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current_question_index)
    }

    pub fn progress(&self) -> Progress {
        Progress::new(self.skills_detected.len(), self.skills.len())
    }

    /// Transitions ACTIVE → COMPLETED. Returns false if already completed.
    pub fn mark_completed(&mut self) -> bool {
        if !self.is_active() {
            return false;
        }
        self.status = SessionStatus::Completed;
        self.completed_at = Some(Utc::now());
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub detected_count: usize,
    pub total_count: usize,
    /// 0 – 100, rounded to the nearest integer.
    pub percentage: u32,
}

impl Progress {
    pub fn new(detected_count: usize, total_count: usize) -> Self {
        let percentage = if total_count == 0 {
            0
        } else {
            (detected_count as f64 * 100.0 / total_count as f64).round() as u32
        };
        Self {
            detected_count,
            total_count,
            percentage,
        }
    }
}

/// Why a turn produced no usable transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptionFailure {
    pub message: String,
}

/// A non-fatal fallback applied during a turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollaboratorDegraded {
    pub collaborator: String,
    pub reason: String,
    pub fallback: String,
}

/// Outcome of a single `submit_answer` turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerResult {
    pub question_index: usize,
    /// Cleaned transcript (raw text when cleanup degraded).
    pub transcript: String,
    pub raw_transcript: String,
    pub language: Option<String>,
    pub detected_skills_this_turn: Vec<String>,
    pub progress: Progress,
    pub has_next_question: bool,
    pub next_question_index: Option<usize>,
    pub next_question: Option<String>,
    pub all_skills_detected: bool,
    pub transcription_error: Option<TranscriptionFailure>,
    pub warnings: Vec<CollaboratorDegraded>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StartedSession {
    pub session_id: Uuid,
    pub total_questions: usize,
    /// Normalized skill list the session was created with.
    pub skills: Vec<Skill>,
    pub questions: Vec<Question>,
}

/// Read-only snapshot of a session for polling clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionStatusView {
    pub session_id: Uuid,
    pub status: SessionStatus,
    pub current_question_index: usize,
    pub current_question: Option<String>,
    pub total_questions: usize,
    pub progress: Progress,
    pub answers_submitted: usize,
    pub skills_detected: Vec<String>,
}

impl From<&SessionState> for SessionStatusView {
    fn from(session: &SessionState) -> Self {
        let current_question = if session.is_active() {
            session.current_question().map(|q| q.text.clone())
        } else {
            None
        };
        Self {
            session_id: session.session_id,
            status: session.status,
            current_question_index: session.current_question_index,
            current_question,
            total_questions: session.questions.len(),
            progress: session.progress(),
            answers_submitted: session.transcripts.len(),
            skills_detected: session
                .skills_detected
                .iter()
                .map(|d| d.skill.clone())
                .collect(),
        }
    }
}
