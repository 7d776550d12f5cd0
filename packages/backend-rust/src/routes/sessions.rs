use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use crate::response::{AppError, SuccessResponse};
use crate::services::sessions::{self, CreateSessionRequest};
use crate::state::AppState;

const DEFAULT_PAGE_SIZE: usize = 20;
const MAX_PAGE_SIZE: usize = 100;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ListSessionsQuery {
    user_id: String,
    limit: Option<usize>,
    offset: Option<usize>,
}

pub(super) async fn create(
    State(state): State<AppState>,
    Json(request): Json<CreateSessionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let session = sessions::create_session(&state, request).await?;
    Ok(Json(SuccessResponse::new(session)))
}

pub(super) async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListSessionsQuery>,
) -> Result<impl IntoResponse, AppError> {
    if query.user_id.trim().is_empty() {
        return Err(AppError::validation("userId must not be empty"));
    }
    let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE).min(MAX_PAGE_SIZE);
    let offset = query.offset.unwrap_or(0);

    let page = sessions::list_sessions(&state, &query.user_id, limit, offset).await;
    Ok(Json(SuccessResponse::new(page)))
}

pub(super) async fn get(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let session = sessions::get_session(&state, &session_id).await?;
    Ok(Json(SuccessResponse::new(session)))
}

pub(super) async fn progress(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let progress = sessions::get_progress(&state, &session_id).await?;
    Ok(Json(SuccessResponse::new(progress)))
}

pub(super) async fn pause(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let session = sessions::pause_session(&state, &session_id).await?;
    Ok(Json(SuccessResponse::new(session)))
}

pub(super) async fn resume(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let session = sessions::resume_session(&state, &session_id).await?;
    Ok(Json(SuccessResponse::new(session)))
}

pub(super) async fn complete(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let session = sessions::complete_session(&state, &session_id).await?;
    Ok(Json(SuccessResponse::new(session)))
}
