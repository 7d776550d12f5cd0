//! Attempt submission: validation, grading, idempotent replay.
//!
//! Duplicate submissions with the same `clientAttemptId` return the
//! cached original response instead of double-counting; the per-session
//! lock in the session store makes that hold for concurrent duplicates
//! too. Correctness is set equality against the item's correct-answer
//! set, order-independent for multi-select items.

use std::collections::BTreeSet;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::core::{AttemptRecordedPayload, PracticeEvent};
use crate::models::{
    Attempt, Item, ItemType, SelectedAnswer, SessionProgress, SessionStatus, SessionType,
};
use crate::services::{progress, EngineError};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAttemptRequest {
    pub client_attempt_id: String,
    pub session_id: String,
    pub item_id: String,
    pub selected: SelectedAnswer,
    /// Self-reported confidence, 1-5
    pub confidence: u8,
    pub time_taken_ms: i64,
    #[serde(default)]
    pub hints_used: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAttemptResponse {
    pub attempt_id: String,
    pub client_attempt_id: String,
    pub correct: bool,
    /// SM-2 style recall quality in [0, 5]
    pub quality: f64,
    pub correct_answers: Vec<String>,
    pub progress: SessionProgress,
}

pub async fn submit_attempt(
    state: &AppState,
    request: SubmitAttemptRequest,
) -> Result<SubmitAttemptResponse, EngineError> {
    validate_request(&request)?;

    let entry = state
        .sessions()
        .entry(&request.session_id)
        .await
        .ok_or_else(|| EngineError::SessionNotFound(request.session_id.clone()))?;
    let mut guard = entry.lock().await;

    // Idempotent replay: same clientAttemptId returns the original
    // response without touching progress.
    if let Some(cached) = guard.replay_cache.get(&request.client_attempt_id) {
        tracing::debug!(
            session_id = %request.session_id,
            client_attempt_id = %request.client_attempt_id,
            "replaying cached attempt response"
        );
        return Ok(cached.clone());
    }

    match guard.session.status {
        SessionStatus::Active => {}
        SessionStatus::Completed => return Err(EngineError::SessionClosed),
        SessionStatus::Paused => {
            return Err(EngineError::Validation(
                "session is paused; resume it before submitting attempts".into(),
            ))
        }
    }

    let item = state
        .items()
        .get(&request.item_id)
        .ok_or_else(|| EngineError::ItemNotFound(request.item_id.clone()))?;

    if guard.session.session_type != SessionType::Review
        && guard.attempted_item_ids.contains(&item.id)
    {
        return Err(EngineError::Validation(format!(
            "item already attempted in this session: {}",
            item.id
        )));
    }

    let selected_set = validate_answer_shape(&item, &request.selected)?;
    let is_correct = selected_set == grading_set(&item);

    let quality = practice_algo::quality_score(
        is_correct,
        request.confidence,
        request.time_taken_ms,
        item.estimated_time_ms,
        request.hints_used,
    );

    let attempt = Attempt {
        id: uuid::Uuid::new_v4().to_string(),
        client_attempt_id: request.client_attempt_id.clone(),
        user_id: guard.session.user_id.clone(),
        item_id: item.id.clone(),
        session_id: guard.session.id.clone(),
        selected: request.selected,
        is_correct,
        quality,
        confidence: request.confidence,
        time_taken_ms: request.time_taken_ms,
        hints_used: request.hints_used,
        timestamp: Utc::now(),
    };

    let updated: SessionProgress = progress::record_attempt(&guard.progress, &attempt, &item);

    let response = SubmitAttemptResponse {
        attempt_id: attempt.id.clone(),
        client_attempt_id: attempt.client_attempt_id.clone(),
        correct: is_correct,
        quality,
        correct_answers: item.correct_answers.iter().cloned().collect(),
        progress: updated.clone(),
    };

    guard.progress = updated;
    guard.attempted_item_ids.insert(item.id.clone());
    guard
        .replay_cache
        .insert(request.client_attempt_id.clone(), response.clone());

    let event_payload = AttemptRecordedPayload {
        user_id: attempt.user_id.clone(),
        session_id: attempt.session_id.clone(),
        item_id: attempt.item_id.clone(),
        is_correct,
        quality,
        timestamp: attempt.timestamp,
    };
    guard.attempts.push(attempt);
    drop(guard);

    state
        .events()
        .publish(PracticeEvent::AttemptRecorded(event_payload));

    Ok(response)
}

fn validate_request(request: &SubmitAttemptRequest) -> Result<(), EngineError> {
    if request.client_attempt_id.trim().is_empty() {
        return Err(EngineError::Validation(
            "clientAttemptId must not be empty".into(),
        ));
    }
    if !(1..=5).contains(&request.confidence) {
        return Err(EngineError::Validation(
            "confidence must be between 1 and 5".into(),
        ));
    }
    if request.time_taken_ms < 0 {
        return Err(EngineError::Validation(
            "timeTakenMs must not be negative".into(),
        ));
    }
    Ok(())
}

/// Shape check plus normalization into a comparable answer set.
fn validate_answer_shape(
    item: &Item,
    selected: &SelectedAnswer,
) -> Result<BTreeSet<String>, EngineError> {
    if item.expects_multiple() && !selected.is_multiple() {
        return Err(EngineError::Validation(format!(
            "item {} expects an array of selected answers",
            item.id
        )));
    }
    if !item.expects_multiple() && selected.is_multiple() {
        return Err(EngineError::Validation(format!(
            "item {} expects a single selected answer, not an array",
            item.id
        )));
    }

    let raw = selected.as_set();
    if raw.is_empty() {
        return Err(EngineError::Validation(
            "selected answers must not be empty".into(),
        ));
    }

    match item.item_type {
        ItemType::MultipleChoice | ItemType::TrueFalse => {
            let choice_ids: BTreeSet<&str> = item.choices.iter().map(|c| c.id.as_str()).collect();
            for id in &raw {
                if !choice_ids.contains(id.as_str()) {
                    return Err(EngineError::Validation(format!(
                        "unknown choice id for item {}: {id}",
                        item.id
                    )));
                }
            }
            Ok(raw)
        }
        // Free-text answers compare after trim + lowercase.
        ItemType::FillBlank => Ok(raw
            .into_iter()
            .map(|text| text.trim().to_lowercase())
            .collect()),
    }
}

fn grading_set(item: &Item) -> BTreeSet<String> {
    match item.item_type {
        ItemType::FillBlank => item
            .correct_answers
            .iter()
            .map(|text| text.trim().to_lowercase())
            .collect(),
        _ => item.correct_answers.clone(),
    }
}
