//! Practice session lifecycle.
//!
//! State machine: `active -> {paused, completed}`, `paused -> active`,
//! `completed` is terminal. Transitions outside these edges are
//! validation errors; only completion stamps `ended_at`.

use std::collections::BTreeSet;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::core::{PracticeEvent, SessionEventPayload};
use crate::models::{PracticeSession, SessionProgress, SessionStatus, SessionType};
use crate::services::EngineError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    pub user_id: String,
    pub session_type: SessionType,
    #[serde(default)]
    pub topics: BTreeSet<String>,
    pub jurisdiction: Option<String>,
    pub time_constraint_ms: Option<i64>,
    pub target_item_count: Option<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionList {
    pub sessions: Vec<PracticeSession>,
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
}

pub async fn create_session(
    state: &AppState,
    request: CreateSessionRequest,
) -> Result<PracticeSession, EngineError> {
    if request.user_id.trim().is_empty() {
        return Err(EngineError::Validation("userId must not be empty".into()));
    }
    if let Some(value) = request.time_constraint_ms {
        if value <= 0 {
            return Err(EngineError::Validation(
                "timeConstraintMs must be a positive integer".into(),
            ));
        }
    }
    if let Some(value) = request.target_item_count {
        if value == 0 {
            return Err(EngineError::Validation(
                "targetItemCount must be a positive integer".into(),
            ));
        }
    }

    let session = PracticeSession {
        id: uuid::Uuid::new_v4().to_string(),
        user_id: request.user_id,
        session_type: request.session_type,
        status: SessionStatus::Active,
        started_at: Utc::now(),
        ended_at: None,
        topics: request.topics,
        jurisdiction: request.jurisdiction,
        time_constraint_ms: request.time_constraint_ms,
        target_item_count: request.target_item_count,
    };

    state.sessions().insert(session.clone()).await;
    tracing::info!(session_id = %session.id, user_id = %session.user_id, "practice session created");

    state
        .events()
        .publish(PracticeEvent::SessionStarted(SessionEventPayload {
            user_id: session.user_id.clone(),
            session_id: session.id.clone(),
            timestamp: session.started_at,
        }));

    Ok(session)
}

pub async fn get_session(state: &AppState, id: &str) -> Result<PracticeSession, EngineError> {
    state
        .sessions()
        .snapshot(id)
        .await
        .map(|(session, _)| session)
        .ok_or_else(|| EngineError::SessionNotFound(id.to_string()))
}

pub async fn get_progress(state: &AppState, id: &str) -> Result<SessionProgress, EngineError> {
    state
        .sessions()
        .snapshot(id)
        .await
        .map(|(_, progress)| progress)
        .ok_or_else(|| EngineError::SessionNotFound(id.to_string()))
}

pub async fn list_sessions(
    state: &AppState,
    user_id: &str,
    limit: usize,
    offset: usize,
) -> SessionList {
    let (sessions, total) = state.sessions().list_by_user(user_id, limit, offset).await;
    SessionList {
        sessions,
        total,
        limit,
        offset,
    }
}

pub async fn pause_session(state: &AppState, id: &str) -> Result<PracticeSession, EngineError> {
    transition(state, id, SessionStatus::Paused).await
}

pub async fn resume_session(state: &AppState, id: &str) -> Result<PracticeSession, EngineError> {
    transition(state, id, SessionStatus::Active).await
}

pub async fn complete_session(state: &AppState, id: &str) -> Result<PracticeSession, EngineError> {
    transition(state, id, SessionStatus::Completed).await
}

async fn transition(
    state: &AppState,
    id: &str,
    target: SessionStatus,
) -> Result<PracticeSession, EngineError> {
    let entry = state
        .sessions()
        .entry(id)
        .await
        .ok_or_else(|| EngineError::SessionNotFound(id.to_string()))?;
    let mut guard = entry.lock().await;

    let allowed = matches!(
        (guard.session.status, target),
        (SessionStatus::Active, SessionStatus::Paused)
            | (SessionStatus::Active, SessionStatus::Completed)
            | (SessionStatus::Paused, SessionStatus::Active)
    );
    if !allowed {
        return Err(EngineError::Validation(format!(
            "invalid transition: session is {:?}",
            guard.session.status
        )));
    }

    guard.session.status = target;
    if target == SessionStatus::Completed {
        guard.session.ended_at = Some(Utc::now());
    }
    let session = guard.session.clone();
    drop(guard);

    let payload = SessionEventPayload {
        user_id: session.user_id.clone(),
        session_id: session.id.clone(),
        timestamp: Utc::now(),
    };
    let event = match target {
        SessionStatus::Paused => PracticeEvent::SessionPaused(payload),
        SessionStatus::Active => PracticeEvent::SessionResumed(payload),
        SessionStatus::Completed => PracticeEvent::SessionCompleted(payload),
    };
    state.events().publish(event);

    tracing::debug!(session_id = %session.id, status = ?session.status, "session transition");
    Ok(session)
}
