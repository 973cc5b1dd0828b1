//! # DiagramKit Core
//!
//! Core types shared by every DiagramKit crate: stable object identifiers,
//! the interaction state vocabulary, the recoverable error taxonomy and the
//! synchronous event bus used for editor notifications.

pub mod constants;
pub mod error;
pub mod event_bus;
pub mod types;

pub use error::{EditorError, Result};

pub use event_bus::{
    EditorEvent, EventBus, EventBusConfig, EventCategory, EventFilter, SubscriptionId,
};

pub use types::{InteractionState, ObjectId};
