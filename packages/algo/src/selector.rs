//! Next-item candidate scoring and ranking.
//!
//! Four component scores, each normalized to [0, 1], combine into a
//! weighted composite:
//!
//! - **urgency**: topics with low recent accuracy or that have gone
//!   stale within the session score higher
//! - **mastery**: weak topics are prioritized, rescaled by a fairness
//!   floor so a zero-mastery topic cannot starve the rest
//! - **difficulty**: Gaussian proximity of the item's difficulty to the
//!   learner's ability, shifted slightly upward (desirable challenge)
//! - **exploration**: uniform draw from a deterministic per-session
//!   stream, keeping scores a pure function of session state
//!
//! Ties are broken by item id ascending so ranking is stable.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::mastery::INITIAL_MASTERY;
use crate::types::{ItemParams, LearnerSnapshot, ScoreBreakdown, SelectorWeights, WeightsError};

/// Attempts after which an unseen topic counts as fully stale
const STALENESS_WINDOW: f64 = 8.0;

/// Blend between accuracy deficit and staleness inside urgency
const URGENCY_ACCURACY_WEIGHT: f64 = 0.6;
const URGENCY_STALENESS_WEIGHT: f64 = 0.4;

/// Mastery component is rescaled into [FLOOR, 1 - FLOOR]
const FAIRNESS_FLOOR: f64 = 0.1;

/// Preferred gap between item difficulty and ability (logit scale)
const OPTIMAL_CHALLENGE_GAP: f64 = 0.25;
const CHALLENGE_WIDTH: f64 = 1.0;

/// Urgency of one topic: accuracy deficit blended with staleness.
fn topic_urgency(learner: &LearnerSnapshot, topic: &str) -> f64 {
    match learner.topics.get(topic) {
        Some(snapshot) => {
            let accuracy = snapshot.accuracy().unwrap_or(0.5);
            let staleness = match snapshot.last_seen_attempt {
                Some(last_seen) => {
                    let since = learner.items_attempted.saturating_sub(last_seen + 1);
                    (since as f64 / STALENESS_WINDOW).clamp(0.0, 1.0)
                }
                None => 1.0,
            };
            URGENCY_ACCURACY_WEIGHT * (1.0 - accuracy) + URGENCY_STALENESS_WEIGHT * staleness
        }
        // Never practiced: middling accuracy prior, fully stale.
        None => URGENCY_ACCURACY_WEIGHT * 0.5 + URGENCY_STALENESS_WEIGHT,
    }
}

/// Urgency of an item: its most urgent topic.
pub fn urgency_score(item: &ItemParams, learner: &LearnerSnapshot) -> f64 {
    if item.topics.is_empty() {
        return 0.5;
    }
    item.topics
        .iter()
        .map(|topic| topic_urgency(learner, topic))
        .fold(0.0, f64::max)
        .clamp(0.0, 1.0)
}

/// Inverse-mastery score with the fairness floor applied.
pub fn mastery_score(item: &ItemParams, learner: &LearnerSnapshot) -> f64 {
    if item.topics.is_empty() {
        return 0.5;
    }
    let sum: f64 = item
        .topics
        .iter()
        .map(|topic| {
            learner
                .topics
                .get(topic)
                .map(|snapshot| snapshot.mastery)
                .unwrap_or(INITIAL_MASTERY)
        })
        .sum();
    let mean_mastery = (sum / item.topics.len() as f64).clamp(0.0, 1.0);
    FAIRNESS_FLOOR + (1.0 - 2.0 * FAIRNESS_FLOOR) * (1.0 - mean_mastery)
}

/// Gaussian proximity of item difficulty to the desired challenge level.
pub fn difficulty_score(item: &ItemParams, learner: &LearnerSnapshot) -> f64 {
    let target = learner.ability + OPTIMAL_CHALLENGE_GAP;
    let distance = item.difficulty - target;
    (-distance.powi(2) / (2.0 * CHALLENGE_WIDTH.powi(2))).exp()
}

/// Uniform draw in [0, 1) from a stream keyed by (session seed, attempt
/// count, item id). Deterministic for a given session state, different
/// across attempts so repeated calls diversify.
pub fn exploration_score(item: &ItemParams, learner: &LearnerSnapshot) -> f64 {
    let mut seed = learner
        .exploration_seed
        .wrapping_mul(0x9E37_79B9_7F4A_7C15)
        .wrapping_add(learner.items_attempted as u64);
    for byte in item.id.as_bytes() {
        seed = seed.wrapping_mul(0x0100_0000_01B3).wrapping_add(*byte as u64);
    }
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.gen_range(0.0..1.0)
}

/// Full breakdown for one candidate under the given weights.
pub fn score_item(
    item: &ItemParams,
    learner: &LearnerSnapshot,
    weights: &SelectorWeights,
) -> ScoreBreakdown {
    let urgency = urgency_score(item, learner);
    let mastery = mastery_score(item, learner);
    let difficulty = difficulty_score(item, learner);
    let exploration = exploration_score(item, learner);

    let composite = weights.urgency_weight * urgency
        + weights.mastery_weight * mastery
        + weights.difficulty_weight * difficulty
        + weights.exploration_weight * exploration;

    ScoreBreakdown {
        urgency,
        mastery,
        difficulty,
        exploration,
        composite,
    }
}

/// Rank candidates and return the winner's index with its breakdown.
///
/// Returns `None` for an empty candidate list; the caller decides how
/// to surface that. Ties on the composite break by item id ascending.
pub fn rank_candidates(
    candidates: &[ItemParams],
    learner: &LearnerSnapshot,
    weights: &SelectorWeights,
) -> Result<Option<(usize, ScoreBreakdown)>, WeightsError> {
    weights.validate()?;

    let mut best: Option<(usize, ScoreBreakdown)> = None;
    for (index, item) in candidates.iter().enumerate() {
        let breakdown = score_item(item, learner, weights);
        let better = match &best {
            None => true,
            Some((best_index, best_breakdown)) => {
                breakdown.composite > best_breakdown.composite
                    || (breakdown.composite == best_breakdown.composite
                        && item.id < candidates[*best_index].id)
            }
        };
        if better {
            best = Some((index, breakdown));
        }
    }

    Ok(best)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::types::TopicSnapshot;

    fn item(id: &str, difficulty: f64, topics: &[&str]) -> ItemParams {
        ItemParams {
            id: id.to_string(),
            difficulty,
            discrimination: 1.0,
            guessing: 0.25,
            topics: topics.iter().map(|t| t.to_string()).collect(),
        }
    }

    fn learner_with(topics: &[(&str, TopicSnapshot)]) -> LearnerSnapshot {
        LearnerSnapshot {
            ability: 0.0,
            items_attempted: 6,
            topics: topics
                .iter()
                .map(|(name, snapshot)| (name.to_string(), snapshot.clone()))
                .collect(),
            exploration_seed: 42,
        }
    }

    #[test]
    fn weak_topic_is_more_urgent() {
        let learner = learner_with(&[
            (
                "signage",
                TopicSnapshot {
                    attempted: 4,
                    correct: 1,
                    mastery: 0.2,
                    last_seen_attempt: Some(5),
                },
            ),
            (
                "parking",
                TopicSnapshot {
                    attempted: 4,
                    correct: 4,
                    mastery: 0.8,
                    last_seen_attempt: Some(5),
                },
            ),
        ]);

        let weak = urgency_score(&item("a", 0.0, &["signage"]), &learner);
        let strong = urgency_score(&item("b", 0.0, &["parking"]), &learner);
        assert!(weak > strong);
    }

    #[test]
    fn stale_topic_gains_urgency() {
        let recent = learner_with(&[(
            "signage",
            TopicSnapshot {
                attempted: 2,
                correct: 1,
                mastery: 0.5,
                last_seen_attempt: Some(5),
            },
        )]);
        let stale = learner_with(&[(
            "signage",
            TopicSnapshot {
                attempted: 2,
                correct: 1,
                mastery: 0.5,
                last_seen_attempt: Some(0),
            },
        )]);

        let candidate = item("a", 0.0, &["signage"]);
        assert!(urgency_score(&candidate, &stale) > urgency_score(&candidate, &recent));
    }

    #[test]
    fn mastery_component_honors_fairness_floor() {
        let zero = learner_with(&[(
            "signage",
            TopicSnapshot {
                attempted: 10,
                correct: 0,
                mastery: 0.0,
                last_seen_attempt: Some(9),
            },
        )]);
        let full = learner_with(&[(
            "signage",
            TopicSnapshot {
                attempted: 10,
                correct: 10,
                mastery: 1.0,
                last_seen_attempt: Some(9),
            },
        )]);

        let candidate = item("a", 0.0, &["signage"]);
        let at_zero = mastery_score(&candidate, &zero);
        let at_full = mastery_score(&candidate, &full);
        assert!(at_zero <= 1.0 - FAIRNESS_FLOOR + 1e-9);
        assert!(at_full >= FAIRNESS_FLOOR - 1e-9);
        assert!(at_zero > at_full);
    }

    #[test]
    fn difficulty_prefers_slight_challenge() {
        let learner = learner_with(&[]);
        let matched = difficulty_score(&item("a", OPTIMAL_CHALLENGE_GAP, &[]), &learner);
        let too_easy = difficulty_score(&item("b", -2.5, &[]), &learner);
        let too_hard = difficulty_score(&item("c", 2.5, &[]), &learner);
        assert!((matched - 1.0).abs() < 1e-9);
        assert!(matched > too_easy);
        assert!(matched > too_hard);
    }

    #[test]
    fn exploration_is_deterministic_per_state() {
        let learner = learner_with(&[]);
        let candidate = item("a", 0.0, &["signage"]);
        let first = exploration_score(&candidate, &learner);
        let second = exploration_score(&candidate, &learner);
        assert_eq!(first, second);
        assert!((0.0..1.0).contains(&first));

        let mut advanced = learner.clone();
        advanced.items_attempted += 1;
        assert_ne!(first, exploration_score(&candidate, &advanced));
    }

    #[test]
    fn composite_stays_in_unit_interval() {
        let learner = learner_with(&[(
            "signage",
            TopicSnapshot {
                attempted: 3,
                correct: 1,
                mastery: 0.4,
                last_seen_attempt: Some(4),
            },
        )]);
        let weights = SelectorWeights::default();

        for difficulty in [-2.0, -0.5, 0.0, 0.5, 2.0] {
            let breakdown = score_item(
                &item("a", difficulty, &["signage", "parking"]),
                &learner,
                &weights,
            );
            for component in [
                breakdown.urgency,
                breakdown.mastery,
                breakdown.difficulty,
                breakdown.exploration,
                breakdown.composite,
            ] {
                assert!((0.0..=1.0).contains(&component), "{breakdown:?}");
            }
        }
    }

    #[test]
    fn empty_candidates_rank_to_none() {
        let learner = learner_with(&[]);
        let result = rank_candidates(&[], &learner, &SelectorWeights::default()).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn ties_break_by_item_id_ascending() {
        // Weight only the mastery component so two same-topic items tie.
        let weights = SelectorWeights {
            urgency_weight: 0.0,
            mastery_weight: 1.0,
            difficulty_weight: 0.0,
            exploration_weight: 0.0,
        };
        let learner = learner_with(&[]);
        let candidates = vec![
            item("item-b", 0.0, &["signage"]),
            item("item-a", 0.5, &["signage"]),
        ];

        let (winner, _) = rank_candidates(&candidates, &learner, &weights)
            .unwrap()
            .expect("non-empty candidates");
        assert_eq!(candidates[winner].id, "item-a");
    }

    #[test]
    fn invalid_weights_are_rejected() {
        let learner = learner_with(&[]);
        let weights = SelectorWeights {
            urgency_weight: 0.9,
            mastery_weight: 0.9,
            difficulty_weight: 0.0,
            exploration_weight: 0.0,
        };
        assert!(rank_candidates(&[], &learner, &weights).is_err());
    }
}
