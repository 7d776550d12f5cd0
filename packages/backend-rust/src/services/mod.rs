pub mod attempts;
pub mod next_item;
pub mod progress;
pub mod sessions;

use crate::response::{json_error, AppError};
use axum::http::StatusCode;

/// Errors raised by the practice engine. All are per-request and
/// recoverable by the caller; none require cross-request recovery.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("session not found: {0}")]
    SessionNotFound(String),
    #[error("item not found: {0}")]
    ItemNotFound(String),
    #[error("no candidate items match the current filter")]
    NoCandidates,
    #[error("session is completed and no longer accepts attempts")]
    SessionClosed,
    #[error("{0}")]
    Validation(String),
}

impl From<EngineError> for AppError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::SessionNotFound(_) | EngineError::ItemNotFound(_) => {
                AppError::not_found(err.to_string())
            }
            EngineError::NoCandidates => {
                json_error(StatusCode::NOT_FOUND, "NO_CANDIDATES", err.to_string())
            }
            EngineError::SessionClosed => {
                json_error(StatusCode::CONFLICT, "SESSION_CLOSED", err.to_string())
            }
            EngineError::Validation(message) => AppError::validation(message),
        }
    }
}
