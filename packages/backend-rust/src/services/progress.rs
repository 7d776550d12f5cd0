//! Session progress aggregation.
//!
//! `record_attempt` is a pure function from (progress, attempt, item) to
//! the next progress, so the same attempt log always reproduces the same
//! progress. The average time per item is a running mean updated in
//! O(1); per-topic mastery and the ability estimate come from
//! `practice-algo`.

use std::sync::Arc;

use practice_algo::{update_ability, update_mastery, INITIAL_MASTERY};

use crate::models::{Attempt, Item, SessionProgress, TopicProgress, RECENT_WINDOW};

pub fn record_attempt(
    progress: &SessionProgress,
    attempt: &Attempt,
    item: &Item,
) -> SessionProgress {
    let mut next = progress.clone();
    let attempt_index = progress.items_attempted;

    next.items_attempted += 1;
    next.current_item_index = next.items_attempted;
    if attempt.is_correct {
        next.correct_count += 1;
    }

    let time = attempt.time_taken_ms.max(0);
    next.elapsed_ms += time;
    next.average_time_per_item_ms +=
        (time as f64 - next.average_time_per_item_ms) / next.items_attempted as f64;

    next.ability = update_ability(
        progress.ability,
        item.difficulty,
        item.discrimination,
        item.guessing,
        attempt.is_correct,
        attempt_index,
    );

    for topic in &item.topics {
        let entry = next
            .per_topic
            .entry(topic.clone())
            .or_insert_with(|| TopicProgress {
                attempted: 0,
                correct: 0,
                mastery: INITIAL_MASTERY,
                last_seen_attempt: None,
            });
        entry.mastery = update_mastery(entry.mastery, attempt.is_correct, entry.attempted);
        entry.attempted += 1;
        if attempt.is_correct {
            entry.correct += 1;
        }
        entry.last_seen_attempt = Some(attempt_index);
    }

    next.recent_results.push_back(attempt.is_correct);
    while next.recent_results.len() > RECENT_WINDOW {
        next.recent_results.pop_front();
    }

    next
}

/// Rebuild progress from the append-only attempt log. Attempts whose
/// item has vanished from the bank are skipped with a warning.
pub fn replay(
    total_items: Option<u32>,
    attempts: &[Attempt],
    lookup: impl Fn(&str) -> Option<Arc<Item>>,
) -> SessionProgress {
    let mut progress = SessionProgress::new(total_items);
    for attempt in attempts {
        match lookup(&attempt.item_id) {
            Some(item) => progress = record_attempt(&progress, attempt, &item),
            None => {
                tracing::warn!(item_id = %attempt.item_id, "skipping attempt for unknown item during replay");
            }
        }
    }
    progress
}
