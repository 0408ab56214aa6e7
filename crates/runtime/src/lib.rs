//! Runtime orchestration for the overworld movement simulation.
//!
//! This crate wires loaded content, action readers, and movement listeners
//! around the deterministic `overworld-core` tick. Consumers embed
//! [`Runtime`] to step frames, spawn actors, and subscribe to what moved.
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator, its config, and the builder
//! - [`input`] provides keyboard and scripted action readers
//! - [`listeners`] holds the prioritized, cancel-capable listener registry
//! - [`events`] provides topic-based event bus for render and audio consumers
//! - [`oracle`] adapts static content to the core's collaborator traits
pub mod error;
pub mod events;
pub mod input;
pub mod listeners;
pub mod oracle;
pub mod runtime;

pub use error::{Result, RuntimeError};
pub use events::{DiagnosticEvent, Event, EventBus, MovementNotice, Topic};
pub use input::{Key, KeyBindings, KeyboardHandle, KeyboardReader, NoInput, ScriptedReader};
pub use listeners::{ListenerRegistry, RuntimeListener, StepCounter, StepTally, TraceListener};
pub use oracle::{AnimationTableOracle, MapCollisionOracle, OracleManager};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
