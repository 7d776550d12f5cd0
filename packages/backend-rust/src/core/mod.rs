pub mod event_bus;

pub use event_bus::{AttemptRecordedPayload, EventBus, PracticeEvent, SessionEventPayload};
