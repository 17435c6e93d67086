use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use super::response::{SkillResponse, APOLOGY_TEXT};
use crate::qna::QnaError;

#[derive(Debug, thiserror::Error)]
pub enum SkillError {
    #[error("application id does not match the configured skill")]
    Unauthorized,
    #[error("unrecognized request type: {0}")]
    UnrecognizedRequestType(String),
    #[error("unrecognized intent: {0}")]
    UnrecognizedIntent(String),
    #[error("missing slot: {0}")]
    MissingSlot(String),
    #[error(transparent)]
    Collaborator(#[from] QnaError),
}

impl IntoResponse for SkillError {
    fn into_response(self) -> Response {
        match self {
            // Rejected callers get no body at all
            SkillError::Unauthorized => StatusCode::BAD_REQUEST.into_response(),
            // handle_request already downgrades these; kept for handlers that return them directly
            _ => (StatusCode::OK, Json(SkillResponse::tell(APOLOGY_TEXT))).into_response(),
        }
    }
}
