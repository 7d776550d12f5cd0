mod attempts;
mod health;
mod items;
mod next_item;
mod sessions;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;

use crate::response::json_error;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/practice/sessions",
            get(sessions::list).post(sessions::create),
        )
        .route("/api/practice/sessions/:sessionId", get(sessions::get))
        .route(
            "/api/practice/sessions/:sessionId/progress",
            get(sessions::progress),
        )
        .route(
            "/api/practice/sessions/:sessionId/pause",
            post(sessions::pause),
        )
        .route(
            "/api/practice/sessions/:sessionId/resume",
            post(sessions::resume),
        )
        .route(
            "/api/practice/sessions/:sessionId/complete",
            post(sessions::complete),
        )
        .route("/api/practice/attempts", post(attempts::submit))
        .route("/api/practice/next-item", post(next_item::select))
        .route("/api/practice/items", get(items::list))
        .nest("/health", health::router())
        .fallback(fallback_handler)
        .with_state(state)
}

async fn fallback_handler() -> Response {
    json_error(StatusCode::NOT_FOUND, "NOT_FOUND", "route not found").into_response()
}
