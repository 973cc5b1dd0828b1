//! # Event Bus Module
//!
//! Synchronous publish/subscribe used for editor notifications.
//!
//! The editor is single-threaded and cooperative, so handlers run on the
//! publishing call stack. Delivery order between handlers is unspecified and
//! handlers must not call back into the editor.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use diagramkit_core::event_bus::{EventBus, EventCategory, EventFilter};
//!
//! let bus = EventBus::new();
//! let id = bus.subscribe(
//!     EventFilter::Categories(vec![EventCategory::Interaction]),
//!     |event| tracing::info!("{}", event.description()),
//! );
//! bus.unsubscribe(id);
//! ```

mod bus;
mod events;

pub use bus::*;
pub use events::*;
