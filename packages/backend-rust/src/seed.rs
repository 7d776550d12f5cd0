//! Built-in item bank and optional JSON loading.
//!
//! The durable content store is an external collaborator; this module
//! gives the engine something to serve: a small driving-theory sample
//! set, replaceable via `ITEMS_PATH` with a JSON array of items.

use crate::config::Config;
use crate::models::{Choice, CognitiveLevel, Item, ItemType};
use crate::store::ItemStore;

pub fn load_item_bank(config: &Config) -> ItemStore {
    if let Some(path) = &config.items_path {
        match std::fs::read_to_string(path) {
            Ok(raw) => match serde_json::from_str::<Vec<Item>>(&raw) {
                Ok(items) if !items.is_empty() => {
                    tracing::info!(count = items.len(), path = %path.display(), "loaded item bank");
                    return ItemStore::new(items);
                }
                Ok(_) => {
                    tracing::warn!(path = %path.display(), "item bank file is empty, using built-in items");
                }
                Err(err) => {
                    tracing::warn!(error = %err, path = %path.display(), "failed to parse item bank, using built-in items");
                }
            },
            Err(err) => {
                tracing::warn!(error = %err, path = %path.display(), "failed to read item bank, using built-in items");
            }
        }
    }

    let items = builtin_items();
    tracing::info!(count = items.len(), "using built-in item bank");
    ItemStore::new(items)
}

struct ItemSpec {
    id: &'static str,
    slug: &'static str,
    content: &'static str,
    choices: &'static [(&'static str, &'static str)],
    correct: &'static [&'static str],
    difficulty: f64,
    discrimination: f64,
    guessing: f64,
    topics: &'static [&'static str],
    jurisdictions: &'static [&'static str],
    item_type: ItemType,
    cognitive_level: CognitiveLevel,
    estimated_time_ms: i64,
    points: i64,
}

impl ItemSpec {
    fn build(&self) -> Item {
        Item {
            id: self.id.to_string(),
            slug: self.slug.to_string(),
            content: self.content.to_string(),
            choices: self
                .choices
                .iter()
                .map(|(id, text)| Choice {
                    id: id.to_string(),
                    text: text.to_string(),
                })
                .collect(),
            correct_answers: self.correct.iter().map(|s| s.to_string()).collect(),
            difficulty: self.difficulty,
            discrimination: self.discrimination,
            guessing: self.guessing,
            topics: self.topics.iter().map(|s| s.to_string()).collect(),
            jurisdictions: self.jurisdictions.iter().map(|s| s.to_string()).collect(),
            item_type: self.item_type,
            cognitive_level: self.cognitive_level,
            estimated_time_ms: self.estimated_time_ms,
            points: self.points,
            tags: Vec::new(),
        }
    }
}

pub fn builtin_items() -> Vec<Item> {
    SAMPLE_ITEMS.iter().map(ItemSpec::build).collect()
}

const SAMPLE_ITEMS: &[ItemSpec] = &[
    ItemSpec {
        id: "item-001",
        slug: "stop-sign-meaning",
        content: "What must you do at a stop sign?",
        choices: &[
            ("a", "Slow down and continue if clear"),
            ("b", "Come to a complete stop"),
            ("c", "Stop only if other vehicles approach"),
        ],
        correct: &["b"],
        difficulty: -0.8,
        discrimination: 1.2,
        guessing: 0.33,
        topics: &["signage"],
        jurisdictions: &[],
        item_type: ItemType::MultipleChoice,
        cognitive_level: CognitiveLevel::Recall,
        estimated_time_ms: 15_000,
        points: 1,
    },
    ItemSpec {
        id: "item-002",
        slug: "warning-sign-shape",
        content: "Which shape do warning signs typically have?",
        choices: &[
            ("a", "Triangle"),
            ("b", "Circle"),
            ("c", "Octagon"),
        ],
        correct: &["a"],
        difficulty: 0.4,
        discrimination: 1.0,
        guessing: 0.33,
        topics: &["signage"],
        jurisdictions: &["de", "at"],
        item_type: ItemType::MultipleChoice,
        cognitive_level: CognitiveLevel::Recall,
        estimated_time_ms: 15_000,
        points: 1,
    },
    ItemSpec {
        id: "item-003",
        slug: "uncontrolled-intersection",
        content: "Who has priority at an uncontrolled intersection?",
        choices: &[
            ("a", "Traffic from the left"),
            ("b", "Traffic from the right"),
            ("c", "The faster vehicle"),
        ],
        correct: &["b"],
        difficulty: 0.1,
        discrimination: 1.3,
        guessing: 0.33,
        topics: &["right_of_way"],
        jurisdictions: &["de", "at"],
        item_type: ItemType::MultipleChoice,
        cognitive_level: CognitiveLevel::Comprehension,
        estimated_time_ms: 20_000,
        points: 2,
    },
    ItemSpec {
        id: "item-004",
        slug: "yield-situations",
        content: "In which situations must you yield? Select all that apply.",
        choices: &[
            ("a", "Entering a roundabout"),
            ("b", "Leaving private property"),
            ("c", "Driving on the priority road"),
        ],
        correct: &["a", "b"],
        difficulty: 0.9,
        discrimination: 1.1,
        guessing: 0.1,
        topics: &["right_of_way"],
        jurisdictions: &["de", "at"],
        item_type: ItemType::MultipleChoice,
        cognitive_level: CognitiveLevel::Application,
        estimated_time_ms: 30_000,
        points: 2,
    },
    ItemSpec {
        id: "item-005",
        slug: "parking-hydrant",
        content: "Parking directly in front of a fire hydrant is permitted.",
        choices: &[("true", "True"), ("false", "False")],
        correct: &["false"],
        difficulty: -1.2,
        discrimination: 1.4,
        guessing: 0.5,
        topics: &["parking"],
        jurisdictions: &[],
        item_type: ItemType::TrueFalse,
        cognitive_level: CognitiveLevel::Recall,
        estimated_time_ms: 10_000,
        points: 1,
    },
    ItemSpec {
        id: "item-006",
        slug: "no-parking-distance",
        content: "How close to a pedestrian crossing may you park?",
        choices: &[
            ("a", "Directly next to it"),
            ("b", "At least 5 meters before it"),
            ("c", "At least 1 meter before it"),
        ],
        correct: &["b"],
        difficulty: -0.2,
        discrimination: 1.0,
        guessing: 0.33,
        topics: &["parking"],
        jurisdictions: &["de"],
        item_type: ItemType::MultipleChoice,
        cognitive_level: CognitiveLevel::Recall,
        estimated_time_ms: 20_000,
        points: 1,
    },
    ItemSpec {
        id: "item-007",
        slug: "builtup-speed-limit",
        content: "What is the default speed limit in built-up areas, in km/h?",
        choices: &[],
        correct: &["50"],
        difficulty: 0.6,
        discrimination: 1.2,
        guessing: 0.0,
        topics: &["speed_limits"],
        jurisdictions: &["de", "at"],
        item_type: ItemType::FillBlank,
        cognitive_level: CognitiveLevel::Recall,
        estimated_time_ms: 15_000,
        points: 1,
    },
    ItemSpec {
        id: "item-008",
        slug: "motorway-minimum-speed",
        content: "Vehicles that cannot exceed 60 km/h may use the motorway.",
        choices: &[("true", "True"), ("false", "False")],
        correct: &["false"],
        difficulty: -0.5,
        discrimination: 1.1,
        guessing: 0.5,
        topics: &["speed_limits"],
        jurisdictions: &["de"],
        item_type: ItemType::TrueFalse,
        cognitive_level: CognitiveLevel::Comprehension,
        estimated_time_ms: 12_000,
        points: 1,
    },
    ItemSpec {
        id: "item-009",
        slug: "novice-alcohol-limit",
        content: "What is the blood alcohol limit for novice drivers, in permille?",
        choices: &[],
        correct: &["0.0"],
        difficulty: 1.3,
        discrimination: 1.5,
        guessing: 0.0,
        topics: &["alcohol_limits"],
        jurisdictions: &["de"],
        item_type: ItemType::FillBlank,
        cognitive_level: CognitiveLevel::Recall,
        estimated_time_ms: 15_000,
        points: 2,
    },
    ItemSpec {
        id: "item-010",
        slug: "priority-sign-combination",
        content: "A priority road sign is combined with a supplementary plate showing a bending course. Who must yield?",
        choices: &[
            ("a", "Traffic following the bend of the priority road"),
            ("b", "Traffic entering from the non-priority arm"),
            ("c", "Nobody, normal right-before-left applies"),
        ],
        correct: &["b"],
        difficulty: 1.0,
        discrimination: 0.9,
        guessing: 0.33,
        topics: &["signage", "right_of_way"],
        jurisdictions: &["de", "at"],
        item_type: ItemType::MultipleChoice,
        cognitive_level: CognitiveLevel::Analysis,
        estimated_time_ms: 35_000,
        points: 3,
    },
];
