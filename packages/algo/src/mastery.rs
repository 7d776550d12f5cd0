//! Per-topic mastery updates.
//!
//! Mastery is a scalar in [0, 1] moved toward 1.0 on a correct answer
//! and toward 0.0 on an incorrect one. The learning rate shrinks as the
//! topic accumulates attempts, so early evidence moves the estimate
//! quickly while a long history stays stable. The update is a pure
//! function of (prior mastery, correctness, prior attempt count), which
//! keeps session progress reproducible from the attempt log.

/// Prior for topics with no recorded attempts
pub const INITIAL_MASTERY: f64 = 0.3;

const BASE_ALPHA: f64 = 0.4;
const ALPHA_DECAY: f64 = 0.15;
const ALPHA_MIN: f64 = 0.05;

/// Learning rate after `prior_attempts` attempts on the topic.
pub fn learning_rate(prior_attempts: u32) -> f64 {
    (BASE_ALPHA / (1.0 + ALPHA_DECAY * prior_attempts as f64)).max(ALPHA_MIN)
}

/// One exponential step toward the observed outcome.
///
/// Because the learning rate is strictly below 1, mastery approaches
/// but never reaches either bound after finitely many attempts.
pub fn update_mastery(prior: f64, is_correct: bool, prior_attempts: u32) -> f64 {
    let prior = prior.clamp(0.0, 1.0);
    let target = if is_correct { 1.0 } else { 0.0 };
    let alpha = learning_rate(prior_attempts);
    prior + alpha * (target - prior)
}
