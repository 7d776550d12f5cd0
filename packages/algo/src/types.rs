//! Shared types and constants used across the algorithm modules.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Numerical stability epsilon
pub const EPSILON: f64 = 1e-10;

/// Tolerance when checking that selector weights sum to 1
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Ability estimates live on the IRT logit scale and are clamped here
pub const ABILITY_MIN: f64 = -3.0;
pub const ABILITY_MAX: f64 = 3.0;

/// Static parameters of a candidate item, as seen by the selector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemParams {
    pub id: String,
    /// IRT difficulty (logit scale, roughly -3..3)
    pub difficulty: f64,
    /// IRT discrimination (slope), > 0
    pub discrimination: f64,
    /// IRT guessing floor in [0, 1]
    pub guessing: f64,
    pub topics: Vec<String>,
}

/// Per-topic slice of the learner's session progress.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TopicSnapshot {
    pub attempted: u32,
    pub correct: u32,
    /// Mastery estimate in [0, 1]
    pub mastery: f64,
    /// Attempt index (0-based) at which this topic was last practiced
    pub last_seen_attempt: Option<u32>,
}

impl TopicSnapshot {
    pub fn accuracy(&self) -> Option<f64> {
        if self.attempted == 0 {
            None
        } else {
            Some(self.correct as f64 / self.attempted as f64)
        }
    }
}

/// Everything the selector is allowed to know about the learner.
///
/// Derived entirely from one session's progress; there is no hidden
/// global state feeding the scores.
#[derive(Debug, Clone, Default)]
pub struct LearnerSnapshot {
    /// Running ability estimate (logit scale)
    pub ability: f64,
    pub items_attempted: u32,
    pub topics: HashMap<String, TopicSnapshot>,
    /// Session-scoped seed for the deterministic exploration stream
    pub exploration_seed: u64,
}

/// Weights of the four scoring components. Must sum to 1 so composite
/// scores stay comparable across requests.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectorWeights {
    pub urgency_weight: f64,
    pub mastery_weight: f64,
    pub difficulty_weight: f64,
    pub exploration_weight: f64,
}

impl Default for SelectorWeights {
    fn default() -> Self {
        Self {
            urgency_weight: 0.25,
            mastery_weight: 0.25,
            difficulty_weight: 0.25,
            exploration_weight: 0.25,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum WeightsError {
    OutOfRange(&'static str, f64),
    BadSum(f64),
}

impl fmt::Display for WeightsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeightsError::OutOfRange(name, value) => {
                write!(f, "{name} must be in [0, 1], got {value}")
            }
            WeightsError::BadSum(sum) => write!(f, "selector weights must sum to 1, got {sum}"),
        }
    }
}

impl std::error::Error for WeightsError {}

impl SelectorWeights {
    pub fn validate(&self) -> Result<(), WeightsError> {
        for (name, value) in [
            ("urgencyWeight", self.urgency_weight),
            ("masteryWeight", self.mastery_weight),
            ("difficultyWeight", self.difficulty_weight),
            ("explorationWeight", self.exploration_weight),
        ] {
            if !(0.0..=1.0).contains(&value) || !value.is_finite() {
                return Err(WeightsError::OutOfRange(name, value));
            }
        }

        let sum = self.urgency_weight
            + self.mastery_weight
            + self.difficulty_weight
            + self.exploration_weight;
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(WeightsError::BadSum(sum));
        }

        Ok(())
    }
}

/// Component scores for one candidate, each in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub urgency: f64,
    pub mastery: f64,
    pub difficulty: f64,
    pub exploration: f64,
    pub composite: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_weights_are_valid() {
        assert!(SelectorWeights::default().validate().is_ok());
    }

    #[test]
    fn weights_must_sum_to_one() {
        let weights = SelectorWeights {
            urgency_weight: 0.5,
            mastery_weight: 0.5,
            difficulty_weight: 0.5,
            exploration_weight: 0.5,
        };
        assert!(matches!(
            weights.validate(),
            Err(WeightsError::BadSum(sum)) if (sum - 2.0).abs() < EPSILON
        ));
    }

    #[test]
    fn weights_must_be_in_unit_interval() {
        let weights = SelectorWeights {
            urgency_weight: -0.25,
            mastery_weight: 0.5,
            difficulty_weight: 0.5,
            exploration_weight: 0.25,
        };
        assert!(matches!(
            weights.validate(),
            Err(WeightsError::OutOfRange("urgencyWeight", _))
        ));
    }

    #[test]
    fn topic_accuracy_none_before_first_attempt() {
        let snapshot = TopicSnapshot::default();
        assert_eq!(snapshot.accuracy(), None);

        let practiced = TopicSnapshot {
            attempted: 4,
            correct: 3,
            mastery: 0.6,
            last_seen_attempt: Some(3),
        };
        assert_eq!(practiced.accuracy(), Some(0.75));
    }
}
