//! Listener registry for fanning movement notifications out in priority order.

use tracing::{debug, trace};

use overworld_core::{MovementBlocked, MovementCompleted, MovementListener, MovementStarted};

use super::RuntimeListener;

/// Registry that owns runtime listeners and dispatches to them.
///
/// Implements [`MovementListener`] so the registry itself can be handed to
/// the movement engine.
#[derive(Default)]
pub struct ListenerRegistry {
    listeners: Vec<Box<dyn RuntimeListener>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry from `listeners`, sorted by priority (lower first).
    pub fn with_listeners(listeners: Vec<Box<dyn RuntimeListener>>) -> Self {
        let mut registry = Self { listeners };
        registry.sort();
        registry
    }

    /// Adds a listener. Equal priorities keep registration order.
    pub fn register(&mut self, listener: Box<dyn RuntimeListener>) {
        debug!(
            target: "runtime::listeners",
            listener = listener.name(),
            priority = listener.priority(),
            "registered listener"
        );
        self.listeners.push(listener);
        self.sort();
    }

    /// Removes every listener called `name`; returns how many were removed.
    pub fn unregister(&mut self, name: &str) -> usize {
        let before = self.listeners.len();
        self.listeners.retain(|listener| listener.name() != name);
        before - self.listeners.len()
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Listener names and priorities in dispatch order (for debugging).
    pub fn listeners(&self) -> impl Iterator<Item = (&'static str, i32)> + '_ {
        self.listeners
            .iter()
            .map(|listener| (listener.name(), listener.priority()))
    }

    fn sort(&mut self) {
        self.listeners.sort_by_key(|listener| listener.priority());
    }
}

impl MovementListener for ListenerRegistry {
    fn on_started(&mut self, event: &mut MovementStarted) {
        for listener in self.listeners.iter_mut() {
            let was_cancelled = event.is_cancelled();
            listener.on_started(event);
            if !was_cancelled && event.is_cancelled() {
                debug!(
                    target: "runtime::listeners",
                    listener = listener.name(),
                    actor = %event.actor,
                    direction = %event.direction,
                    "movement cancelled"
                );
            }
        }
    }

    fn on_completed(&mut self, event: &MovementCompleted) {
        trace!(
            target: "runtime::listeners",
            actor = %event.actor,
            listeners = self.listeners.len(),
            "dispatching completion"
        );
        for listener in self.listeners.iter_mut() {
            listener.on_completed(event);
        }
    }

    fn on_blocked(&mut self, event: &MovementBlocked) {
        for listener in self.listeners.iter_mut() {
            listener.on_blocked(event);
        }
    }
}
