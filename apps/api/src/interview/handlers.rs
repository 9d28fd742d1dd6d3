//! Axum route handlers for the Interview API.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::collaborators::call_with_retry;
use crate::interview::models::{SessionStatusView, Skill, StartedSession};
use crate::interview::report::Report;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct StartFromJdRequest {
    pub jd_text: String,
    pub max_questions: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct SkillInput {
    pub name: String,
    #[serde(default)]
    pub category: String,
}

#[derive(Debug, Deserialize)]
pub struct StartFromSkillsRequest {
    pub skills: Vec<SkillInput>,
    pub questions: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/interviews
///
/// Extracts skills from a job description, generates one question per skill,
/// and starts a session.
pub async fn handle_start_from_jd(
    State(state): State<AppState>,
    Json(request): Json<StartFromJdRequest>,
) -> Result<Json<StartedSession>, AppError> {
    if request.jd_text.trim().is_empty() {
        return Err(AppError::Validation("jd_text cannot be empty".to_string()));
    }
    let max_questions = request
        .max_questions
        .unwrap_or(state.config.max_interview_skills)
        .max(1);
    let policy = state.config.retry_policy();

    let skills = call_with_retry(&policy, "skill_extractor", || {
        state.skill_extractor.extract(&request.jd_text)
    })
    .await?;
    info!("Extracted {} skills, generating questions", skills.len());

    let questions = call_with_retry(&policy, "question_generator", || {
        state.question_generator.generate(&skills, max_questions)
    })
    .await?;

    Ok(Json(state.engine.start(skills, questions).await?))
}

/// POST /api/v1/interviews/from-skills
///
/// Starts a session from skill and question lists prepared by the caller.
pub async fn handle_start_from_skills(
    State(state): State<AppState>,
    Json(request): Json<StartFromSkillsRequest>,
) -> Result<Json<StartedSession>, AppError> {
    let skills: Vec<Skill> = request
        .skills
        .into_iter()
        .map(|s| Skill::new(s.name, s.category))
        .collect();

    Ok(Json(state.engine.start(skills, request.questions).await?))
}

/// GET /api/v1/interviews/:id
pub async fn handle_get_status(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionStatusView>, AppError> {
    Ok(Json(state.engine.status(session_id).await?))
}

/// POST /api/v1/interviews/:id/answers
///
/// Multipart fields: `question_index` (text) and `audio` (file).
/// A turn whose transcription failed is still recorded; it is answered with
/// 422 and the full turn payload under `result`.
pub async fn handle_submit_answer(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let (question_index, audio) = read_answer_upload(multipart).await?;

    let result = state
        .engine
        .submit_answer(session_id, question_index, audio)
        .await?;

    if let Some(failure) = &result.transcription_error {
        let body = Json(json!({
            "error": {
                "code": "TRANSCRIPTION_FAILED",
                "message": failure.message,
            },
            "result": result,
        }));
        return Ok((StatusCode::UNPROCESSABLE_ENTITY, body).into_response());
    }

    Ok(Json(result).into_response())
}

/// POST /api/v1/interviews/:id/complete
pub async fn handle_complete(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<Report>, AppError> {
    Ok(Json(state.engine.complete(session_id).await?))
}

async fn read_answer_upload(mut multipart: Multipart) -> Result<(usize, Bytes), AppError> {
    let mut question_index = None;
    let mut audio = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("malformed multipart body: {e}")))?
    {
        match field.name() {
            Some("question_index") => {
                let raw = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(e.to_string()))?;
                let index = raw.trim().parse::<usize>().map_err(|_| {
                    AppError::Validation(format!("question_index must be a number, got '{raw}'"))
                })?;
                question_index = Some(index);
            }
            Some("audio") => {
                audio = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|e| AppError::Validation(e.to_string()))?,
                );
            }
            _ => {}
        }
    }

    let question_index = question_index
        .ok_or_else(|| AppError::Validation("question_index field is required".to_string()))?;
    let audio =
        audio.ok_or_else(|| AppError::Validation("audio field is required".to_string()))?;
    Ok((question_index, audio))
}
