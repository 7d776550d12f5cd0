//! Typed in-process event bus for practice lifecycle events.
//!
//! Publishers emit events keyed by user and session id; subscribers get
//! a broadcast receiver and filter on those keys. This is a collaborator
//! interface for eventual real-time delivery; no transport lives here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::debug;

const CHANNEL_CAPACITY: usize = 1024;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum PracticeEvent {
    #[serde(rename = "SESSION_STARTED")]
    SessionStarted(SessionEventPayload),

    #[serde(rename = "SESSION_PAUSED")]
    SessionPaused(SessionEventPayload),

    #[serde(rename = "SESSION_RESUMED")]
    SessionResumed(SessionEventPayload),

    #[serde(rename = "SESSION_COMPLETED")]
    SessionCompleted(SessionEventPayload),

    #[serde(rename = "ATTEMPT_RECORDED")]
    AttemptRecorded(AttemptRecordedPayload),
}

impl PracticeEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            PracticeEvent::SessionStarted(_) => "SESSION_STARTED",
            PracticeEvent::SessionPaused(_) => "SESSION_PAUSED",
            PracticeEvent::SessionResumed(_) => "SESSION_RESUMED",
            PracticeEvent::SessionCompleted(_) => "SESSION_COMPLETED",
            PracticeEvent::AttemptRecorded(_) => "ATTEMPT_RECORDED",
        }
    }

    pub fn user_id(&self) -> &str {
        match self {
            PracticeEvent::SessionStarted(p)
            | PracticeEvent::SessionPaused(p)
            | PracticeEvent::SessionResumed(p)
            | PracticeEvent::SessionCompleted(p) => &p.user_id,
            PracticeEvent::AttemptRecorded(p) => &p.user_id,
        }
    }

    pub fn session_id(&self) -> &str {
        match self {
            PracticeEvent::SessionStarted(p)
            | PracticeEvent::SessionPaused(p)
            | PracticeEvent::SessionResumed(p)
            | PracticeEvent::SessionCompleted(p) => &p.session_id,
            PracticeEvent::AttemptRecorded(p) => &p.session_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionEventPayload {
    pub user_id: String,
    pub session_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptRecordedPayload {
    pub user_id: String,
    pub session_id: String,
    pub item_id: String,
    pub is_correct: bool,
    pub quality: f64,
    pub timestamp: DateTime<Utc>,
}

pub struct EventBus {
    tx: broadcast::Sender<PracticeEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Fire-and-forget publish; no subscribers is a normal state.
    pub fn publish(&self, event: PracticeEvent) {
        let event_type = event.event_type();
        match self.tx.send(event) {
            Ok(receivers) => {
                debug!(event_type, receivers, "practice event published");
            }
            Err(_) => {
                debug!(event_type, "practice event dropped, no subscribers");
            }
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PracticeEvent> {
        self.tx.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(session_id: &str) -> SessionEventPayload {
        SessionEventPayload {
            user_id: "u1".to_string(),
            session_id: session_id.to_string(),
            timestamp: Utc::now(),
        }
    }

    #[tokio::test]
    async fn subscribers_receive_published_events() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();

        bus.publish(PracticeEvent::SessionStarted(payload("s1")));

        let event = rx.recv().await.expect("event delivered");
        assert_eq!(event.event_type(), "SESSION_STARTED");
        assert_eq!(event.session_id(), "s1");
        assert_eq!(event.user_id(), "u1");
    }

    #[tokio::test]
    async fn publish_without_subscribers_does_not_panic() {
        let bus = EventBus::new();
        bus.publish(PracticeEvent::SessionPaused(payload("s1")));
    }

    #[test]
    fn events_serialize_with_type_tag() {
        let event = PracticeEvent::SessionCompleted(payload("s9"));
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "SESSION_COMPLETED");
        assert_eq!(json["payload"]["sessionId"], "s9");
    }
}
