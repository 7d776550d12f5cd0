use std::collections::BTreeSet;

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::models::Item;
use crate::response::{AppError, SuccessResponse};
use crate::state::AppState;
use crate::store::ItemFilter;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ListItemsQuery {
    /// Comma-separated topic slugs
    topics: Option<String>,
    jurisdiction: Option<String>,
    min_difficulty: Option<f64>,
    max_difficulty: Option<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ItemList {
    items: Vec<Item>,
    total: usize,
}

pub(super) async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListItemsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let topics = query.topics.as_deref().map(|raw| {
        raw.split(',')
            .map(str::trim)
            .filter(|topic| !topic.is_empty())
            .map(str::to_string)
            .collect::<BTreeSet<String>>()
    });

    let difficulty_range = match (query.min_difficulty, query.max_difficulty) {
        (None, None) => None,
        (min, max) => {
            let (min, max) = (min.unwrap_or(f64::MIN), max.unwrap_or(f64::MAX));
            if min > max {
                return Err(AppError::validation(
                    "minDifficulty must not exceed maxDifficulty",
                ));
            }
            Some((min, max))
        }
    };

    let filter = ItemFilter {
        topics,
        difficulty_range,
        jurisdiction: query.jurisdiction,
        exclude_ids: Default::default(),
    };

    let items: Vec<Item> = state
        .items()
        .candidates(&filter)
        .iter()
        .map(|item| (**item).clone())
        .collect();
    let total = items.len();

    Ok(Json(SuccessResponse::new(ItemList { items, total })))
}
