#![allow(dead_code)]

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::interview::collaborators::CollaboratorError;
use crate::interview::error::InterviewError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Stale question: {0}")]
    StaleQuestion(String),

    #[error("LLM error: {0}")]
    Llm(String),

    /// Catch-all for failures outside the interview domain; details are logged, not returned.
    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<InterviewError> for AppError {
    fn from(e: InterviewError) -> Self {
        match e {
            InterviewError::NotFound(_) => AppError::NotFound(e.to_string()),
            InterviewError::InvalidState { .. } => AppError::InvalidState(e.to_string()),
            InterviewError::StaleQuestion { .. } => AppError::StaleQuestion(e.to_string()),
            InterviewError::Validation(msg) => AppError::Validation(msg),
        }
    }
}

impl From<CollaboratorError> for AppError {
    fn from(e: CollaboratorError) -> Self {
        AppError::Llm(e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::InvalidState(msg) => (StatusCode::CONFLICT, "INVALID_STATE", msg.clone()),
            AppError::StaleQuestion(msg) => (StatusCode::CONFLICT, "STALE_QUESTION", msg.clone()),
            AppError::Llm(msg) => {
                tracing::error!("LLM error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "LLM_ERROR",
                    "An AI processing error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::interview::models::SessionStatus;

    fn status_of(e: InterviewError) -> StatusCode {
        AppError::from(e).into_response().status()
    }

    #[test]
    fn test_interview_errors_map_to_statuses() {
        let id = Uuid::new_v4();
        assert_eq!(status_of(InterviewError::NotFound(id)), StatusCode::NOT_FOUND);
        assert_eq!(
            status_of(InterviewError::InvalidState {
                session_id: id,
                status: SessionStatus::Completed
            }),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(InterviewError::StaleQuestion {
                expected: 1,
                received: 0
            }),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(InterviewError::Validation("empty".to_string())),
            StatusCode::BAD_REQUEST
        );
    }

    #[tokio::test]
    async fn test_internal_error_hides_details() {
        let response = AppError::from(anyhow::anyhow!("mutex poisoned at engine.rs")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"]["code"], "INTERNAL_ERROR");
        assert_eq!(body["error"]["message"], "An internal server error occurred");
    }

    #[test]
    fn test_collaborator_error_is_bad_gateway() {
        let response =
            AppError::from(CollaboratorError::Unavailable("down".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
