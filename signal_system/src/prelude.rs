//! Convenience re-exports for common signal-system usage

pub use crate::event::{DatabaseEvent, EventType};
pub use crate::manager::SignalManager;
pub use crate::types::{serialize_to_payload, EventCallback};
