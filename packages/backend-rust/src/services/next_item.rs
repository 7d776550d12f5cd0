//! Next-item selection over the in-memory item bank.
//!
//! Builds a candidate set from session and request filters, derives a
//! learner snapshot from the session's progress, and ranks with
//! `practice-algo`. Already-attempted items are excluded except in
//! review sessions, which deliberately revisit them.

use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

use practice_algo::{
    rank_candidates, ItemParams, LearnerSnapshot, ScoreBreakdown, SelectorWeights, TopicSnapshot,
};

use crate::models::{Item, PracticeSession, SessionProgress, SessionStatus, SessionType};
use crate::services::EngineError;
use crate::state::AppState;
use crate::store::ItemFilter;

/// Break heuristics: long sessions or a recent streak of misses.
const BREAK_ELAPSED_MS: i64 = 25 * 60 * 1000;
const BREAK_MIN_RECENT: usize = 5;
const BREAK_ACCURACY_THRESHOLD: f64 = 0.4;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextItemRequest {
    pub session_id: String,
    /// Overrides the session's topic filter when present
    pub topics: Option<BTreeSet<String>>,
    /// Inclusive difficulty bounds (logit scale)
    pub difficulty_range: Option<(f64, f64)>,
    #[serde(default)]
    pub exclude_ids: Vec<String>,
    /// Per-request weight override; must sum to 1
    pub weights: Option<SelectorWeights>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionContext {
    pub items_attempted: u32,
    /// Time left against the session's advisory budget, if it has one
    pub remaining_time_ms: Option<i64>,
    pub recommended_break: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NextItemResponse {
    pub item: Item,
    pub reasoning: ScoreBreakdown,
    pub session_context: SessionContext,
}

pub async fn next_item(
    state: &AppState,
    request: NextItemRequest,
) -> Result<NextItemResponse, EngineError> {
    let entry = state
        .sessions()
        .entry(&request.session_id)
        .await
        .ok_or_else(|| EngineError::SessionNotFound(request.session_id.clone()))?;
    let guard = entry.lock().await;

    match guard.session.status {
        SessionStatus::Active => {}
        SessionStatus::Completed => return Err(EngineError::SessionClosed),
        SessionStatus::Paused => {
            return Err(EngineError::Validation(
                "session is paused; resume it before requesting items".into(),
            ))
        }
    }

    let weights = match request.weights {
        Some(weights) => weights,
        None => state.selector_weights(),
    };

    let filter = build_filter(&request, &guard.session, &guard.attempted_item_ids);
    let candidates = state.items().candidates(&filter);
    if candidates.is_empty() {
        return Err(EngineError::NoCandidates);
    }

    let params: Vec<ItemParams> = candidates.iter().map(|item| item_params(item)).collect();
    let learner = learner_snapshot(&guard.progress, guard.exploration_seed);

    let (winner, reasoning) = rank_candidates(&params, &learner, &weights)
        .map_err(|err| EngineError::Validation(err.to_string()))?
        .ok_or(EngineError::NoCandidates)?;

    let session_context = session_context(&guard.session, &guard.progress);
    let item = (*candidates[winner]).clone();
    drop(guard);

    tracing::debug!(
        session_id = %request.session_id,
        item_id = %item.id,
        composite = reasoning.composite,
        "next item selected"
    );

    Ok(NextItemResponse {
        item,
        reasoning,
        session_context,
    })
}

fn build_filter(
    request: &NextItemRequest,
    session: &PracticeSession,
    attempted: &HashSet<String>,
) -> ItemFilter {
    let topics = request
        .topics
        .clone()
        .or_else(|| (!session.topics.is_empty()).then(|| session.topics.clone()));

    let mut exclude_ids: HashSet<String> = request.exclude_ids.iter().cloned().collect();
    // Review sessions revisit attempted items; everything else moves on.
    if session.session_type != SessionType::Review {
        exclude_ids.extend(attempted.iter().cloned());
    }

    ItemFilter {
        topics,
        difficulty_range: request.difficulty_range,
        jurisdiction: session.jurisdiction.clone(),
        exclude_ids,
    }
}

fn item_params(item: &Item) -> ItemParams {
    ItemParams {
        id: item.id.clone(),
        difficulty: item.difficulty,
        discrimination: item.discrimination,
        guessing: item.guessing,
        topics: item.topics.iter().cloned().collect(),
    }
}

fn learner_snapshot(progress: &SessionProgress, exploration_seed: u64) -> LearnerSnapshot {
    LearnerSnapshot {
        ability: progress.ability,
        items_attempted: progress.items_attempted,
        topics: progress
            .per_topic
            .iter()
            .map(|(topic, stats)| {
                (
                    topic.clone(),
                    TopicSnapshot {
                        attempted: stats.attempted,
                        correct: stats.correct,
                        mastery: stats.mastery,
                        last_seen_attempt: stats.last_seen_attempt,
                    },
                )
            })
            .collect(),
        exploration_seed,
    }
}

fn session_context(session: &PracticeSession, progress: &SessionProgress) -> SessionContext {
    let remaining_time_ms = session
        .time_constraint_ms
        .map(|budget| (budget - progress.elapsed_ms).max(0));

    let fatigued = progress.recent_results.len() >= BREAK_MIN_RECENT
        && progress
            .recent_accuracy()
            .is_some_and(|accuracy| accuracy < BREAK_ACCURACY_THRESHOLD);
    let recommended_break = progress.elapsed_ms >= BREAK_ELAPSED_MS || fatigued;

    SessionContext {
        items_attempted: progress.items_attempted,
        remaining_time_ms,
        recommended_break,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    use crate::seed::builtin_items;
    use crate::services::sessions::{create_session, CreateSessionRequest};
    use crate::store::ItemStore;

    fn test_state() -> AppState {
        AppState::new(ItemStore::new(builtin_items()), SelectorWeights::default())
    }

    async fn active_session(state: &AppState) -> String {
        create_session(
            state,
            CreateSessionRequest {
                user_id: "learner-1".to_string(),
                session_type: SessionType::Practice,
                topics: BTreeSet::new(),
                jurisdiction: None,
                time_constraint_ms: None,
                target_item_count: None,
            },
        )
        .await
        .unwrap()
        .id
    }

    fn request(session_id: &str) -> NextItemRequest {
        NextItemRequest {
            session_id: session_id.to_string(),
            topics: None,
            difficulty_range: None,
            exclude_ids: Vec::new(),
            weights: None,
        }
    }

    #[tokio::test]
    async fn selects_an_item_with_full_breakdown() {
        let state = test_state();
        let session_id = active_session(&state).await;

        let response = next_item(&state, request(&session_id)).await.unwrap();
        assert!((0.0..=1.0).contains(&response.reasoning.composite));
        assert_eq!(response.session_context.items_attempted, 0);
        assert!(!response.session_context.recommended_break);
    }

    #[tokio::test]
    async fn selection_is_deterministic_for_unchanged_state() {
        let state = test_state();
        let session_id = active_session(&state).await;

        let first = next_item(&state, request(&session_id)).await.unwrap();
        let second = next_item(&state, request(&session_id)).await.unwrap();
        assert_eq!(first.item.id, second.item.id);
        assert_eq!(first.reasoning.composite, second.reasoning.composite);
    }

    #[tokio::test]
    async fn explicit_excludes_are_honored() {
        let state = test_state();
        let session_id = active_session(&state).await;

        let first = next_item(&state, request(&session_id)).await.unwrap();
        let mut retry = request(&session_id);
        retry.exclude_ids = vec![first.item.id.clone()];
        let second = next_item(&state, retry).await.unwrap();
        assert_ne!(first.item.id, second.item.id);
    }

    #[tokio::test]
    async fn unknown_topic_yields_no_candidates() {
        let state = test_state();
        let session_id = active_session(&state).await;

        let mut req = request(&session_id);
        req.topics = Some(BTreeSet::from(["no-such-topic".to_string()]));
        assert!(matches!(
            next_item(&state, req).await,
            Err(EngineError::NoCandidates)
        ));
    }

    #[tokio::test]
    async fn invalid_weight_override_is_rejected() {
        let state = test_state();
        let session_id = active_session(&state).await;

        let mut req = request(&session_id);
        req.weights = Some(SelectorWeights {
            urgency_weight: 0.9,
            mastery_weight: 0.9,
            difficulty_weight: 0.0,
            exploration_weight: 0.0,
        });
        assert!(matches!(
            next_item(&state, req).await,
            Err(EngineError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn completed_session_is_closed() {
        let state = test_state();
        let session_id = active_session(&state).await;
        crate::services::sessions::complete_session(&state, &session_id)
            .await
            .unwrap();

        assert!(matches!(
            next_item(&state, request(&session_id)).await,
            Err(EngineError::SessionClosed)
        ));
    }

    #[tokio::test]
    async fn break_recommended_after_long_elapsed_time() {
        let state = test_state();
        let session_id = active_session(&state).await;

        let entry = state.sessions().entry(&session_id).await.unwrap();
        entry.lock().await.progress.elapsed_ms = BREAK_ELAPSED_MS + 1;

        let response = next_item(&state, request(&session_id)).await.unwrap();
        assert!(response.session_context.recommended_break);
    }

    #[tokio::test]
    async fn remaining_time_never_goes_negative() {
        let state = test_state();
        let session = create_session(
            &state,
            CreateSessionRequest {
                user_id: "learner-1".to_string(),
                session_type: SessionType::Practice,
                topics: BTreeSet::new(),
                jurisdiction: None,
                time_constraint_ms: Some(1_000),
                target_item_count: None,
            },
        )
        .await
        .unwrap();

        let entry = state.sessions().entry(&session.id).await.unwrap();
        entry.lock().await.progress.elapsed_ms = 5_000;

        let response = next_item(&state, request(&session.id)).await.unwrap();
        assert_eq!(response.session_context.remaining_time_ms, Some(0));
    }

    #[tokio::test]
    async fn review_sessions_revisit_attempted_items() {
        let state = test_state();
        let review = create_session(
            &state,
            CreateSessionRequest {
                user_id: "learner-1".to_string(),
                session_type: SessionType::Review,
                topics: BTreeSet::new(),
                jurisdiction: None,
                time_constraint_ms: None,
                target_item_count: None,
            },
        )
        .await
        .unwrap();

        let entry = state.sessions().entry(&review.id).await.unwrap();
        {
            let mut guard = entry.lock().await;
            let all_ids: Vec<String> = state
                .items()
                .candidates(&ItemFilter::default())
                .iter()
                .map(|item| item.id.clone())
                .collect();
            guard.attempted_item_ids.extend(all_ids);
            guard.session.started_at = Utc::now();
        }

        // Every item already attempted, but review still selects one.
        assert!(next_item(&state, request(&review.id)).await.is_ok());
    }
}
