//! # practice-algo - adaptive practice core algorithms
//!
//! Pure Rust implementations of the learning algorithms behind the
//! practice engine:
//!
//! - **Recall quality** - SM-2 style 0-5 quality scores from correctness,
//!   confidence and response time
//! - **Topic mastery** - exponential mastery updates with a shrinking
//!   learning rate
//! - **Ability estimation** - Elo-style updates on the IRT logit scale
//! - **Next-item scoring** - urgency / mastery / difficulty / exploration
//!   composite ranking
//!
//! Design goals:
//! - **Pure** - no I/O, no clock, no global state; every function is a
//!   deterministic map from inputs to outputs
//! - **Reusable** - the service crate owns persistence and transport,
//!   this crate owns the math
//! - **Tested** - every module carries its own unit tests
//!
//! Module map:
//!
//! - [`quality`] - recall quality scoring
//! - [`mastery`] - per-topic mastery updates
//! - [`ability`] - 3PL recall probability and ability updates
//! - [`selector`] - candidate ranking and score breakdowns
//! - [`types`] - shared types and constants

pub mod ability;
pub mod mastery;
pub mod quality;
pub mod selector;
pub mod types;

pub use ability::{recall_probability, update_ability};
pub use mastery::{update_mastery, INITIAL_MASTERY};
pub use quality::quality_score;
pub use selector::{rank_candidates, score_item};
pub use types::{
    ItemParams, LearnerSnapshot, ScoreBreakdown, SelectorWeights, TopicSnapshot, WeightsError,
};
