use std::sync::Arc;
use std::time::Instant;

use practice_algo::SelectorWeights;

use crate::core::EventBus;
use crate::store::{ItemStore, SessionStore};

#[derive(Clone)]
pub struct AppState {
    started_at: Instant,
    items: Arc<ItemStore>,
    sessions: Arc<SessionStore>,
    selector_weights: SelectorWeights,
    events: Arc<EventBus>,
}

impl AppState {
    pub fn new(items: ItemStore, selector_weights: SelectorWeights) -> Self {
        Self {
            started_at: Instant::now(),
            items: Arc::new(items),
            sessions: Arc::new(SessionStore::new()),
            selector_weights,
            events: Arc::new(EventBus::new()),
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    pub fn items(&self) -> Arc<ItemStore> {
        Arc::clone(&self.items)
    }

    pub fn sessions(&self) -> Arc<SessionStore> {
        Arc::clone(&self.sessions)
    }

    pub fn selector_weights(&self) -> SelectorWeights {
        self.selector_weights
    }

    pub fn events(&self) -> Arc<EventBus> {
        Arc::clone(&self.events)
    }
}
