//! Event types for different topics.

use overworld_core::{Anomaly, EntityId, MovementEvent};

/// A movement notification stamped with the tick that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct MovementNotice {
    pub tick: u64,
    /// Game time at the end of the tick, in seconds.
    pub time: f64,
    pub event: MovementEvent,
}

impl MovementNotice {
    pub fn actor(&self) -> EntityId {
        self.event.actor()
    }
}

/// An anomaly the core corrected during a tick.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagnosticEvent {
    pub tick: u64,
    pub anomaly: Anomaly,
}
