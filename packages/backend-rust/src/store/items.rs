//! In-memory item bank.
//!
//! Items are immutable once authored, so the store is built once at
//! startup and shared read-only. Iteration order is id-ascending, which
//! keeps candidate lists (and therefore selector tie-breaks) stable.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::Arc;

use crate::models::Item;

#[derive(Debug, Clone, Default)]
pub struct ItemFilter {
    /// Keep items sharing at least one of these topics
    pub topics: Option<BTreeSet<String>>,
    /// Inclusive difficulty bounds (logit scale)
    pub difficulty_range: Option<(f64, f64)>,
    /// Items with an empty jurisdiction set match everywhere
    pub jurisdiction: Option<String>,
    pub exclude_ids: HashSet<String>,
}

pub struct ItemStore {
    items: BTreeMap<String, Arc<Item>>,
}

impl ItemStore {
    pub fn new(items: Vec<Item>) -> Self {
        let items = items
            .into_iter()
            .map(|item| (item.id.clone(), Arc::new(item)))
            .collect();
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<Arc<Item>> {
        self.items.get(id).cloned()
    }

    /// All items passing the filter, id-ascending. An empty result is an
    /// expected state, not a failure; the caller maps it to its own
    /// not-found / no-candidates handling.
    pub fn candidates(&self, filter: &ItemFilter) -> Vec<Arc<Item>> {
        self.items
            .values()
            .filter(|item| Self::matches(item, filter))
            .cloned()
            .collect()
    }

    fn matches(item: &Item, filter: &ItemFilter) -> bool {
        if filter.exclude_ids.contains(&item.id) {
            return false;
        }

        if let Some(topics) = &filter.topics {
            if !topics.is_empty() && item.topics.is_disjoint(topics) {
                return false;
            }
        }

        if let Some((min, max)) = filter.difficulty_range {
            if item.difficulty < min || item.difficulty > max {
                return false;
            }
        }

        if let Some(jurisdiction) = &filter.jurisdiction {
            if !item.jurisdictions.is_empty() && !item.jurisdictions.contains(jurisdiction) {
                return false;
            }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::builtin_items;

    fn store() -> ItemStore {
        ItemStore::new(builtin_items())
    }

    #[test]
    fn topic_filter_keeps_overlapping_items() {
        let store = store();
        let filter = ItemFilter {
            topics: Some(BTreeSet::from(["signage".to_string()])),
            ..Default::default()
        };
        let candidates = store.candidates(&filter);
        assert!(!candidates.is_empty());
        assert!(candidates
            .iter()
            .all(|item| item.topics.contains("signage")));
    }

    #[test]
    fn exclude_ids_are_filtered_out() {
        let store = store();
        let all = store.candidates(&ItemFilter::default());
        let excluded_id = all[0].id.clone();

        let filter = ItemFilter {
            exclude_ids: HashSet::from([excluded_id.clone()]),
            ..Default::default()
        };
        let remaining = store.candidates(&filter);
        assert_eq!(remaining.len(), all.len() - 1);
        assert!(remaining.iter().all(|item| item.id != excluded_id));
    }

    #[test]
    fn difficulty_range_is_inclusive() {
        let store = store();
        let filter = ItemFilter {
            difficulty_range: Some((-0.5, 0.5)),
            ..Default::default()
        };
        assert!(store
            .candidates(&filter)
            .iter()
            .all(|item| (-0.5..=0.5).contains(&item.difficulty)));
    }

    #[test]
    fn unknown_topic_yields_empty_result() {
        let store = store();
        let filter = ItemFilter {
            topics: Some(BTreeSet::from(["no-such-topic".to_string()])),
            ..Default::default()
        };
        assert!(store.candidates(&filter).is_empty());
    }

    #[test]
    fn candidates_come_back_id_ascending() {
        let store = store();
        let candidates = store.candidates(&ItemFilter::default());
        let mut sorted = candidates.clone();
        sorted.sort_by(|a, b| a.id.cmp(&b.id));
        assert_eq!(
            candidates.iter().map(|i| &i.id).collect::<Vec<_>>(),
            sorted.iter().map(|i| &i.id).collect::<Vec<_>>()
        );
    }
}
