//! Per-tick record of notifications and corrected anomalies.

use crate::error::{CoreError, ErrorContext, ErrorSeverity};
use crate::movement::{Direction, MovementEvent};
use crate::state::EntityId;

/// Something unexpected that was corrected locally during a tick.
///
/// Anomalies never stop the tick; they are collected for diagnostics and
/// logged where they occur.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum Anomaly {
    #[error("actor {actor} lacks {component} required by {system}")]
    MissingComponent {
        actor: EntityId,
        component: &'static str,
        system: &'static str,
    },

    #[error("actor {actor} input buffer full ({capacity}), dropped {direction}")]
    BufferOverflow {
        actor: EntityId,
        direction: Direction,
        capacity: usize,
    },

    #[error("actor {actor} turn clock ran backwards by {seconds}s")]
    NegativeElapsed { actor: EntityId, seconds: f64 },

    #[error("actor {actor} has no duration for {animation}, used {fallback}s")]
    FallbackDuration {
        actor: EntityId,
        animation: &'static str,
        fallback: f64,
    },

    #[error("frame delta {delta} is not a valid duration, treated as 0")]
    InvalidDelta { delta: f32 },
}

impl Anomaly {
    pub fn actor(&self) -> Option<EntityId> {
        match self {
            Self::MissingComponent { actor, .. }
            | Self::BufferOverflow { actor, .. }
            | Self::NegativeElapsed { actor, .. }
            | Self::FallbackDuration { actor, .. } => Some(*actor),
            Self::InvalidDelta { .. } => None,
        }
    }

    pub fn error_context(&self) -> ErrorContext {
        match self.actor() {
            Some(actor) => ErrorContext::new().with_actor(actor),
            None => ErrorContext::new(),
        }
    }
}

impl CoreError for Anomaly {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::MissingComponent { .. } => ErrorSeverity::Internal,
            _ => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingComponent { .. } => "tick.missing_component",
            Self::BufferOverflow { .. } => "tick.buffer_overflow",
            Self::NegativeElapsed { .. } => "tick.negative_elapsed",
            Self::FallbackDuration { .. } => "tick.fallback_duration",
            Self::InvalidDelta { .. } => "tick.invalid_delta",
        }
    }
}

/// Everything observable that happened during one tick.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickReport {
    /// Sequence number of the tick, starting at 1.
    pub tick: u64,
    /// Game time at the end of the tick.
    pub now: f64,
    /// Notifications in emission order. Cancelled starts are not included.
    pub events: Vec<MovementEvent>,
    pub anomalies: Vec<Anomaly>,
}

impl TickReport {
    pub(crate) fn reset(&mut self, tick: u64, now: f64) {
        self.tick = tick;
        self.now = now;
        self.events.clear();
        self.anomalies.clear();
    }

    pub fn is_quiet(&self) -> bool {
        self.events.is_empty() && self.anomalies.is_empty()
    }

    /// Events concerning `actor`.
    pub fn events_for(&self, actor: EntityId) -> impl Iterator<Item = &MovementEvent> {
        self.events.iter().filter(move |event| event.actor() == actor)
    }
}
