//! SM-2 style recall quality scoring.
//!
//! Quality is a 0-5 score combining correctness, self-reported
//! confidence and response time relative to the item's estimated time.
//! Correct answers land in [3, 5], incorrect ones in [0, 2], so
//! correctness always dominates the other two signals. Within a band
//! the score is monotonic: faster is never worse, more confident is
//! never worse, and hints only lower it.

/// Fallback estimated time when an item carries none
const DEFAULT_ESTIMATED_MS: f64 = 30_000.0;

const SPEED_WEIGHT: f64 = 1.2;
const CONFIDENCE_WEIGHT: f64 = 0.8;
const HINT_PENALTY: f64 = 0.25;

/// Speed factor in [0, 1]: 1.0 at or under the estimated time, fading
/// to 0.0 at twice the estimate.
pub fn speed_factor(time_taken_ms: i64, estimated_time_ms: i64) -> f64 {
    let estimate = if estimated_time_ms > 0 {
        estimated_time_ms as f64
    } else {
        DEFAULT_ESTIMATED_MS
    };
    let ratio = (time_taken_ms.max(0) as f64) / estimate;
    (2.0 - ratio).clamp(0.0, 1.0)
}

/// Recall quality in [0, 5].
///
/// `confidence` is the learner's 1-5 self report; values outside the
/// range are clamped rather than rejected (the service layer validates
/// the request before calling in here).
pub fn quality_score(
    is_correct: bool,
    confidence: u8,
    time_taken_ms: i64,
    estimated_time_ms: i64,
    hints_used: u32,
) -> f64 {
    let speed = speed_factor(time_taken_ms, estimated_time_ms);
    let confidence_norm = (confidence.clamp(1, 5) - 1) as f64 / 4.0;
    let hint_penalty = HINT_PENALTY * hints_used.min(4) as f64;

    let within_band = SPEED_WEIGHT * speed + CONFIDENCE_WEIGHT * confidence_norm - hint_penalty;

    if is_correct {
        (3.0 + within_band).clamp(3.0, 5.0)
    } else {
        within_band.clamp(0.0, 2.0)
    }
}
