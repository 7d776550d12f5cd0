use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use crate::response::{AppError, SuccessResponse};
use crate::services::next_item::{self, NextItemRequest};
use crate::state::AppState;

pub(super) async fn select(
    State(state): State<AppState>,
    Json(request): Json<NextItemRequest>,
) -> Result<impl IntoResponse, AppError> {
    let response = next_item::next_item(&state, request).await?;
    Ok(Json(SuccessResponse::new(response)))
}
