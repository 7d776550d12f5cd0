//! Session registry and per-session state.
//!
//! Each session owns its progress, its append-only attempt log and its
//! idempotency cache. Entries live behind a per-session `Mutex`, so
//! attempt submissions for one session are serialized: a duplicate
//! `clientAttemptId` arriving concurrently waits for the first write
//! and then replays the cached response instead of double-counting.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};

use crate::models::{Attempt, PracticeSession, SessionProgress};
use crate::services::attempts::SubmitAttemptResponse;

pub struct SessionEntry {
    pub session: PracticeSession,
    pub progress: SessionProgress,
    pub attempts: Vec<Attempt>,
    pub attempted_item_ids: HashSet<String>,
    /// clientAttemptId -> original response, held for the session lifetime
    pub replay_cache: HashMap<String, SubmitAttemptResponse>,
    /// Seed for the selector's deterministic exploration stream
    pub exploration_seed: u64,
}

impl SessionEntry {
    pub fn new(session: PracticeSession) -> Self {
        let exploration_seed = seed_from_id(&session.id);
        let progress = SessionProgress::new(session.target_item_count);
        Self {
            session,
            progress,
            attempts: Vec::new(),
            attempted_item_ids: HashSet::new(),
            replay_cache: HashMap::new(),
            exploration_seed,
        }
    }
}

/// FNV-1a over the session id; the session id is already random, this
/// just folds it into a u64.
fn seed_from_id(id: &str) -> u64 {
    let mut hash: u64 = 0xCBF2_9CE4_8422_2325;
    for byte in id.as_bytes() {
        hash ^= *byte as u64;
        hash = hash.wrapping_mul(0x0100_0000_01B3);
    }
    hash
}

#[derive(Default)]
pub struct SessionStore {
    inner: RwLock<HashMap<String, Arc<Mutex<SessionEntry>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, session: PracticeSession) -> Arc<Mutex<SessionEntry>> {
        let id = session.id.clone();
        let entry = Arc::new(Mutex::new(SessionEntry::new(session)));
        self.inner.write().await.insert(id, Arc::clone(&entry));
        entry
    }

    pub async fn entry(&self, id: &str) -> Option<Arc<Mutex<SessionEntry>>> {
        self.inner.read().await.get(id).cloned()
    }

    pub async fn snapshot(&self, id: &str) -> Option<(PracticeSession, SessionProgress)> {
        let entry = self.entry(id).await?;
        let guard = entry.lock().await;
        Some((guard.session.clone(), guard.progress.clone()))
    }

    /// Sessions for one user, newest first, with limit/offset paging.
    pub async fn list_by_user(
        &self,
        user_id: &str,
        limit: usize,
        offset: usize,
    ) -> (Vec<PracticeSession>, usize) {
        let mut sessions = Vec::new();
        for entry in self.inner.read().await.values() {
            let guard = entry.lock().await;
            if guard.session.user_id == user_id {
                sessions.push(guard.session.clone());
            }
        }
        sessions.sort_by(|a, b| b.started_at.cmp(&a.started_at).then(a.id.cmp(&b.id)));

        let total = sessions.len();
        let page = sessions.into_iter().skip(offset).take(limit).collect();
        (page, total)
    }
}
