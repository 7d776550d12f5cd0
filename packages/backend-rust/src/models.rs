//! Domain model for the practice engine.
//!
//! Items are immutable once authored; attempts form an append-only log;
//! `SessionProgress` is derived state recomputable from that log.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Window of recent results kept for urgency / break heuristics
pub const RECENT_WINDOW: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    MultipleChoice,
    TrueFalse,
    FillBlank,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CognitiveLevel {
    Recall,
    Comprehension,
    Application,
    Analysis,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Choice {
    pub id: String,
    pub text: String,
}

/// A practice question item with its IRT parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: String,
    pub slug: String,
    pub content: String,
    pub choices: Vec<Choice>,
    pub correct_answers: BTreeSet<String>,
    /// IRT difficulty (logit scale)
    pub difficulty: f64,
    /// IRT discrimination (slope)
    pub discrimination: f64,
    /// IRT guessing floor in [0, 1]
    pub guessing: f64,
    pub topics: BTreeSet<String>,
    pub jurisdictions: BTreeSet<String>,
    pub item_type: ItemType,
    pub cognitive_level: CognitiveLevel,
    pub estimated_time_ms: i64,
    pub points: i64,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Item {
    /// Whether learners answer with a set rather than a single id.
    pub fn expects_multiple(&self) -> bool {
        self.correct_answers.len() > 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionType {
    Practice,
    Review,
    MockTest,
    Placement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Active,
    Paused,
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticeSession {
    pub id: String,
    pub user_id: String,
    pub session_type: SessionType,
    pub status: SessionStatus,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub topics: BTreeSet<String>,
    pub jurisdiction: Option<String>,
    /// Advisory time budget for the session
    pub time_constraint_ms: Option<i64>,
    pub target_item_count: Option<u32>,
}

/// A learner's answer: a single choice id or a set of ids, depending on
/// the item type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SelectedAnswer {
    Single(String),
    Multiple(Vec<String>),
}

impl SelectedAnswer {
    pub fn is_multiple(&self) -> bool {
        matches!(self, SelectedAnswer::Multiple(_))
    }

    /// The selected ids as a set; order of submission never matters.
    pub fn as_set(&self) -> BTreeSet<String> {
        match self {
            SelectedAnswer::Single(id) => BTreeSet::from([id.clone()]),
            SelectedAnswer::Multiple(ids) => ids.iter().cloned().collect(),
        }
    }
}

/// One recorded response. Immutable after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attempt {
    pub id: String,
    pub client_attempt_id: String,
    pub user_id: String,
    pub item_id: String,
    pub session_id: String,
    pub selected: SelectedAnswer,
    pub is_correct: bool,
    /// SM-2 style recall quality in [0, 5]
    pub quality: f64,
    /// Self-reported confidence, 1-5
    pub confidence: u8,
    pub time_taken_ms: i64,
    pub hints_used: u32,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicProgress {
    pub attempted: u32,
    pub correct: u32,
    /// Mastery estimate in [0, 1]
    pub mastery: f64,
    /// Attempt index (0-based) at which the topic was last practiced
    pub last_seen_attempt: Option<u32>,
}

/// Derived session progress, recomputable from the attempt log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionProgress {
    pub current_item_index: u32,
    pub total_items: Option<u32>,
    pub items_attempted: u32,
    pub correct_count: u32,
    /// Sum of attempt times, so replaying the log reproduces it exactly
    pub elapsed_ms: i64,
    /// Incrementally maintained running mean
    pub average_time_per_item_ms: f64,
    /// Running ability estimate on the IRT logit scale
    pub ability: f64,
    pub per_topic: BTreeMap<String, TopicProgress>,
    /// Outcomes of the most recent attempts, newest last
    pub recent_results: VecDeque<bool>,
}

impl SessionProgress {
    pub fn new(total_items: Option<u32>) -> Self {
        Self {
            current_item_index: 0,
            total_items,
            items_attempted: 0,
            correct_count: 0,
            elapsed_ms: 0,
            average_time_per_item_ms: 0.0,
            ability: 0.0,
            per_topic: BTreeMap::new(),
            recent_results: VecDeque::new(),
        }
    }

    /// Accuracy over the recent window, `None` before any attempt.
    pub fn recent_accuracy(&self) -> Option<f64> {
        if self.recent_results.is_empty() {
            return None;
        }
        let correct = self.recent_results.iter().filter(|&&c| c).count();
        Some(correct as f64 / self.recent_results.len() as f64)
    }
}
