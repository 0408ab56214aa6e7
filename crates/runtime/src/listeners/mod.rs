//! Prioritized movement listeners for runtime orchestration.
//!
//! Listeners observe every movement notification synchronously, inside the
//! tick that produced it. They are the only place a starting transition can
//! be vetoed.
//!
//! # Architecture
//!
//! - Listeners are registered on the [`RuntimeBuilder`](crate::RuntimeBuilder)
//!   and sorted by priority
//! - Every listener sees every notification in priority order, including a
//!   start an earlier listener already cancelled
//! - A cancellation is sticky: later listeners cannot undo it

mod builtin;
mod registry;

pub use builtin::{StepCounter, StepTally, TraceListener};
pub use registry::ListenerRegistry;

use overworld_core::{MovementBlocked, MovementCompleted, MovementStarted};

/// Runtime-side movement observer.
///
/// Mirrors [`overworld_core::MovementListener`] with a name and a priority so
/// the registry can order and report on listeners.
pub trait RuntimeListener: Send {
    /// Human-readable name used in logs.
    fn name(&self) -> &'static str;

    /// Lower values run first. Typical ranges:
    /// - `-100..0`: gameplay rules that may cancel movement
    /// - `0`: default
    /// - `1..100`: observers such as logging and statistics
    fn priority(&self) -> i32 {
        0
    }

    /// Called before a transition begins. Call [`MovementStarted::cancel`]
    /// to veto it.
    fn on_started(&mut self, _event: &mut MovementStarted) {}

    fn on_completed(&mut self, _event: &MovementCompleted) {}

    fn on_blocked(&mut self, _event: &MovementBlocked) {}
}
