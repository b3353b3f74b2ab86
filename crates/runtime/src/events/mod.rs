//! Topic-based event bus for runtime events.
//!
//! Battle events are routed to topics so consumers can subscribe to turn
//! flow, combat results, or the final outcome independently.

mod bus;

pub use bus::{EventBus, Topic};
