//! Learner ability estimation on the IRT logit scale.
//!
//! The 3PL model gives the probability of a correct response given
//! ability and the item's difficulty / discrimination / guessing
//! parameters. Ability is updated Elo-style after every attempt: the
//! surprise (actual minus expected) moves the estimate, with a K factor
//! that shrinks as the session accumulates evidence.

use crate::types::{ABILITY_MAX, ABILITY_MIN};

const BASE_K: f64 = 0.4;
const K_DECAY: f64 = 0.05;
const K_MIN: f64 = 0.08;

/// 3PL recall probability: c + (1 - c) / (1 + e^(-a(theta - b))).
pub fn recall_probability(
    ability: f64,
    difficulty: f64,
    discrimination: f64,
    guessing: f64,
) -> f64 {
    let guessing = guessing.clamp(0.0, 1.0);
    let slope = if discrimination > 0.0 {
        discrimination
    } else {
        1.0
    };
    let logistic = 1.0 / (1.0 + (-slope * (ability - difficulty)).exp());
    guessing + (1.0 - guessing) * logistic
}

/// K factor after `attempts` attempts in the session.
pub fn k_factor(attempts: u32) -> f64 {
    (BASE_K / (1.0 + K_DECAY * attempts as f64)).max(K_MIN)
}

/// Elo-style ability update, clamped to the working logit range.
pub fn update_ability(
    ability: f64,
    difficulty: f64,
    discrimination: f64,
    guessing: f64,
    is_correct: bool,
    attempts: u32,
) -> f64 {
    let expected = recall_probability(ability, difficulty, discrimination, guessing);
    let actual = if is_correct { 1.0 } else { 0.0 };
    let next = ability + k_factor(attempts) * (actual - expected);
    next.clamp(ABILITY_MIN, ABILITY_MAX)
}
