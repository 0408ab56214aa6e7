//! Topic-based event bus for runtime events.
//!
//! Every tick the runtime republishes the core's notifications and anomalies
//! to topics, and consumers subscribe only to the topics they need. Events
//! on the bus are facts; vetoing movement is done with a listener.

mod bus;
mod types;

pub use bus::{Event, EventBus, Topic};
pub use types::{DiagnosticEvent, MovementNotice};
