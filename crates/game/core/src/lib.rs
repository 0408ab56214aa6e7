//! Deterministic tile-grid movement logic shared by the runtime and tools.
//!
//! `overworld-core` owns the per-actor movement state machine, the input
//! buffer, and the two systems that drive them each tick. It performs no I/O:
//! collision, animation timing, and platform input arrive through the traits
//! in [`env`], and everything observable is reported through
//! [`movement::MovementListener`] and the per-tick [`engine::TickReport`].
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod movement;
pub mod state;

pub use config::{ConfigError, MovementConfig};
pub use engine::{
    Anomaly, GameClock, InputCoordinator, MovementEngine, MovementExecutor, TickReport, TickTime,
};
pub use env::{
    ActionReader, AnimationOracle, CollisionOracle, InputSourceId, MovementEnv, NoAnimations,
    OracleError, SampledInput, TileAccess, TileBehavior,
};
pub use error::{CoreError, ErrorContext, ErrorSeverity};
pub use movement::{
    BlockReason, Direction, InputBuffer, MovementBlocked, MovementCompleted, MovementEvent,
    MovementListener, MovementStarted, MovementState, MovementStatus, PendingIntent,
    Presentation, Transition,
};
pub use state::{
    EntityId, GridPosition, MapId, MoverSpec, SpawnError, SubTilePosition, TilePosition, World,
};
