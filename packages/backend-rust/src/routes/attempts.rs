use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use crate::response::{AppError, SuccessResponse};
use crate::services::attempts::{self, SubmitAttemptRequest};
use crate::state::AppState;

pub(super) async fn submit(
    State(state): State<AppState>,
    Json(request): Json<SubmitAttemptRequest>,
) -> Result<impl IntoResponse, AppError> {
    let response = attempts::submit_attempt(&state, request).await?;
    Ok(Json(SuccessResponse::new(response)))
}
