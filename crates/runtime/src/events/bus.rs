//! Topic-based event bus implementation.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use super::types::{DiagnosticEvent, MovementNotice};

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Movement notifications (started, completed, blocked)
    Movement,
    /// Anomalies corrected during a tick
    Diagnostics,
}

impl Topic {
    pub const ALL: [Topic; 2] = [Topic::Movement, Topic::Diagnostics];
}

/// Event wrapper that carries the topic and typed event
#[derive(Debug, Clone)]
pub enum Event {
    Movement(MovementNotice),
    Diagnostics(DiagnosticEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Movement(_) => Topic::Movement,
            Event::Diagnostics(_) => Topic::Diagnostics,
        }
    }
}

struct Channels {
    movement: broadcast::Sender<Event>,
    diagnostics: broadcast::Sender<Event>,
}

impl Channels {
    fn sender(&self, topic: Topic) -> &broadcast::Sender<Event> {
        match topic {
            Topic::Movement => &self.movement,
            Topic::Diagnostics => &self.diagnostics,
        }
    }
}

/// Topic-based event bus
///
/// Renderers, audio, and tools subscribe to the topics they care about.
/// Publishing never blocks the tick; slow subscribers lag and lose the oldest
/// events rather than stall the simulation.
pub struct EventBus {
    channels: Arc<Channels>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            channels: Arc::new(Channels {
                movement: broadcast::channel(capacity).0,
                diagnostics: broadcast::channel(capacity).0,
            }),
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: Event) {
        let topic = event.topic();
        if self.channels.sender(topic).send(event).is_err() {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Subscribe to a specific topic
    ///
    /// Returns a receiver that will only receive events for that topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.channels.sender(topic).subscribe()
    }

    /// Number of live receivers on `topic`.
    pub fn subscriber_count(&self, topic: Topic) -> usize {
        self.channels.sender(topic).receiver_count()
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            channels: Arc::clone(&self.channels),
        }
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
    use overworld_core::Anomaly;

    #[test]
    fn subscribers_only_see_their_topic() {
        let bus = EventBus::with_capacity(4);
        let mut diagnostics = bus.subscribe(Topic::Diagnostics);
        let mut movement = bus.subscribe(Topic::Movement);

        bus.publish(Event::Diagnostics(DiagnosticEvent {
            tick: 3,
            anomaly: Anomaly::InvalidDelta { delta: -1.0 },
        }));

        assert!(matches!(
            diagnostics.try_recv(),
            Ok(Event::Diagnostics(DiagnosticEvent { tick: 3, .. }))
        ));
        assert!(movement.try_recv().is_err());
        assert_eq!(bus.subscriber_count(Topic::Movement), 1);
    }

    #[test]
    fn publishing_without_subscribers_is_fine() {
        let bus = EventBus::new();
        bus.publish(Event::Diagnostics(DiagnosticEvent {
            tick: 1,
            anomaly: Anomaly::InvalidDelta { delta: f32::NAN },
        }));
        assert_eq!(bus.subscriber_count(Topic::Diagnostics), 0);
    }
}
