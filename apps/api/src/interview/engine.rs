//! Interview Session Engine: the turn pipeline and termination policy.
//!
//! Turn flow: transcribe → clean → detect (undetected skills only) → merge →
//!            append transcript → termination check.
//!
//! Every `submit_answer` that passes the state/index checks writes exactly one
//! transcript record and moves the session forward, even when transcription
//! failed or a collaborator degraded.

use std::collections::HashSet;
use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::interview::collaborators::{
    call_with_retry, RetryPolicy, SkillDetector, TranscriptCleaner, Transcriber,
};
use crate::interview::error::InterviewError;
use crate::interview::keyword_detector::match_keywords;
use crate::interview::models::{
    AnswerResult, CollaboratorDegraded, Question, SessionState, SessionStatusView, Skill,
    SkillDetection, StartedSession, TranscriptRecord, TranscriptionFailure,
};
use crate::interview::report::{build_report, Report};
use crate::interview::store::SessionStore;
use crate::interview::validation::{normalize_questions, normalize_skills};

pub struct InterviewEngine {
    store: SessionStore,
    transcriber: Arc<dyn Transcriber>,
    cleaner: Arc<dyn TranscriptCleaner>,
    detector: Arc<dyn SkillDetector>,
    retry: RetryPolicy,
}

impl InterviewEngine {
    pub fn new(
        transcriber: Arc<dyn Transcriber>,
        cleaner: Arc<dyn TranscriptCleaner>,
        detector: Arc<dyn SkillDetector>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            store: SessionStore::new(),
            transcriber,
            cleaner,
            detector,
            retry,
        }
    }

    /// Creates an ACTIVE session from validated skill and question lists.
    pub async fn start(
        &self,
        skills: Vec<Skill>,
        questions: Vec<String>,
    ) -> Result<StartedSession, InterviewError> {
        let skills = normalize_skills(skills)?;
        let questions = normalize_questions(questions)?;
        let total_questions = questions.len();
        let total_skills = skills.len();

        let session_id = self.store.create(skills.clone(), questions.clone()).await;
        info!(
            "[{session_id}] Interview started: {total_skills} skills, {total_questions} questions \
             ({} sessions held)",
            self.store.len().await
        );

        Ok(StartedSession {
            session_id,
            total_questions,
            skills,
            questions,
        })
    }

    pub async fn status(&self, session_id: Uuid) -> Result<SessionStatusView, InterviewError> {
        let session = self.store.get(session_id).await?;
        Ok(SessionStatusView::from(&session))
    }

    /// Runs one turn. The turn lock is held for the whole pipeline, so a
    /// duplicate submission for the same index waits and is then rejected as
    /// stale. State is committed in one step at the end; `status` sees the
    /// previous state until then.
    pub async fn submit_answer(
        &self,
        session_id: Uuid,
        question_index: usize,
        audio: Bytes,
    ) -> Result<AnswerResult, InterviewError> {
        let turn = self.store.begin_turn(session_id).await?;

        // Only this turn can mutate the session from here on, so the checked
        // state stays valid while the state lock is released for collaborator I/O.
        let candidates = {
            let session = turn.state().await;
            if !session.is_active() {
                return Err(InterviewError::InvalidState {
                    session_id,
                    status: session.status,
                });
            }
            if question_index != session.current_question_index {
                return Err(InterviewError::StaleQuestion {
                    expected: session.current_question_index,
                    received: question_index,
                });
            }
            session.undetected_skill_names()
        };

        let mut warnings = Vec::new();

        // Step 1: Transcribe
        let (raw_text, language, transcription_error) = self.transcribe(session_id, audio).await;

        // Steps 2-3: Clean and detect, skipped when there is nothing to analyze
        let (cleaned_text, detected) = if transcription_error.is_some() {
            (String::new(), Vec::new())
        } else {
            let cleaned = self.clean(session_id, &raw_text, &mut warnings).await;
            let detected = self
                .detect(session_id, &cleaned, &candidates, &mut warnings)
                .await;
            (cleaned, detected)
        };

        // Step 4: Merge. Candidates were undetected, but the check keeps this idempotent.
        let mut session = turn.state().await;
        let now = Utc::now();
        for skill in &detected {
            if !session.is_detected(skill) {
                session.skills_detected.push(SkillDetection {
                    skill: skill.clone(),
                    question_index,
                    detected_at: now,
                });
            }
        }

        // Step 5: Append transcript
        session.transcripts.push(TranscriptRecord {
            question_index,
            raw_text: raw_text.clone(),
            cleaned_text: cleaned_text.clone(),
            detected_skills_this_turn: detected.clone(),
            language: language.clone(),
            recorded_at: now,
        });

        // Step 6: Termination check
        let all_skills_detected = session.all_skills_detected();
        if all_skills_detected {
            session.mark_completed();
            info!(
                "[{session_id}] All {} skills detected, interview complete",
                session.skills.len()
            );
        } else if session.is_last_question() {
            session.mark_completed();
            info!(
                "[{session_id}] Questions exhausted with {}/{} skills detected",
                session.skills_detected.len(),
                session.skills.len()
            );
        } else {
            session.current_question_index += 1;
        }

        let next_question = if session.is_active() {
            session.current_question().cloned()
        } else {
            None
        };

        Ok(AnswerResult {
            question_index,
            transcript: cleaned_text,
            raw_transcript: raw_text,
            language,
            detected_skills_this_turn: detected,
            progress: session.progress(),
            has_next_question: next_question.is_some(),
            next_question_index: next_question.as_ref().map(|q: &Question| q.index),
            next_question: next_question.map(|q| q.text),
            all_skills_detected,
            transcription_error,
            warnings,
        })
    }

    /// Forces completion and returns the report. Repeat calls return the same report.
    pub async fn complete(&self, session_id: Uuid) -> Result<Report, InterviewError> {
        let turn = self.store.begin_turn(session_id).await?;
        let mut session = turn.state().await;
        if session.mark_completed() {
            info!(
                "[{session_id}] Interview completed early at question {}",
                session.current_question_index
            );
        }
        Ok(build_report(&session))
    }

    async fn transcribe(
        &self,
        session_id: Uuid,
        audio: Bytes,
    ) -> (String, Option<String>, Option<TranscriptionFailure>) {
        let result = call_with_retry(&self.retry, "transcriber", || {
            self.transcriber.transcribe(audio.clone())
        })
        .await;

        match result {
            Ok(t) if !t.text.trim().is_empty() => {
                info!(
                    "[{session_id}] Transcribed (confidence {:?}): \"{}\"",
                    t.confidence,
                    t.text.trim()
                );
                (t.text.trim().to_string(), t.language, None)
            }
            Ok(t) => {
                warn!("[{session_id}] Transcriber returned empty text");
                (
                    String::new(),
                    t.language,
                    Some(TranscriptionFailure {
                        message: "no speech recognized in the recording".to_string(),
                    }),
                )
            }
            Err(e) => {
                warn!("[{session_id}] Transcription failed: {e}");
                (
                    String::new(),
                    None,
                    Some(TranscriptionFailure {
                        message: format!("transcription failed: {e}"),
                    }),
                )
            }
        }
    }

    async fn clean(
        &self,
        session_id: Uuid,
        raw_text: &str,
        warnings: &mut Vec<CollaboratorDegraded>,
    ) -> String {
        let result =
            call_with_retry(&self.retry, "transcript_cleaner", || self.cleaner.clean(raw_text))
                .await;

        match result {
            Ok(cleaned) if !cleaned.trim().is_empty() => cleaned.trim().to_string(),
            Ok(_) => raw_text.to_string(),
            Err(e) => {
                warn!("[{session_id}] Transcript cleanup degraded: {e}");
                warnings.push(CollaboratorDegraded {
                    collaborator: "transcript_cleaner".to_string(),
                    reason: e.to_string(),
                    fallback: "raw transcript used".to_string(),
                });
                raw_text.to_string()
            }
        }
    }

    /// Detected names are restricted to `candidates`, de-duplicated, and kept
    /// in the order the detector reported them.
    async fn detect(
        &self,
        session_id: Uuid,
        text: &str,
        candidates: &[String],
        warnings: &mut Vec<CollaboratorDegraded>,
    ) -> Vec<String> {
        if candidates.is_empty() || text.trim().is_empty() {
            return Vec::new();
        }

        let result = call_with_retry(&self.retry, "skill_detector", || {
            self.detector.detect(text, candidates)
        })
        .await;

        let reported = match result {
            Ok(names) => names,
            Err(e) => {
                warn!("[{session_id}] Skill detection degraded: {e}");
                warnings.push(CollaboratorDegraded {
                    collaborator: "skill_detector".to_string(),
                    reason: e.to_string(),
                    fallback: "keyword matching".to_string(),
                });
                match_keywords(text, candidates)
            }
        };

        let offered: HashSet<&str> = candidates.iter().map(String::as_str).collect();
        let mut seen = HashSet::new();
        let mut accepted = Vec::new();
        for name in reported {
            if !offered.contains(name.as_str()) {
                warn!("[{session_id}] Discarding detection outside candidate set: '{name}'");
                continue;
            }
            if seen.insert(name.clone()) {
                accepted.push(name);
            }
        }

        if !accepted.is_empty() {
            info!("[{session_id}] Detected skills: {accepted:?}");
        }
        accepted
    }
}
