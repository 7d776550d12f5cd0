pub mod items;
pub mod sessions;

pub use items::{ItemFilter, ItemStore};
pub use sessions::{SessionEntry, SessionStore};
