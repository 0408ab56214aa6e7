//! Runtime wrappers around static movement content.
//!
//! These implementations expose `overworld-core` oracle traits and bundle
//! them into an [`OracleManager`] so the runtime can build a
//! [`MovementEnv`] for every tick. Layouts and animation tables are
//! immutable at runtime; actor occupancy is the only per-tick data.
mod animation;
mod collision;

use overworld_core::MovementEnv;

pub use animation::AnimationTableOracle;
pub use collision::MapCollisionOracle;

/// Owns all oracle implementations and provides unified access.
pub struct OracleManager {
    pub(crate) collision: MapCollisionOracle,
    pub(crate) animation: AnimationTableOracle,
}

impl OracleManager {
    pub fn new(collision: MapCollisionOracle, animation: AnimationTableOracle) -> Self {
        Self {
            collision,
            animation,
        }
    }

    /// Borrows both oracles as a core environment.
    pub fn as_env(&self) -> MovementEnv<'_> {
        MovementEnv::new(&self.collision, &self.animation)
    }

    pub fn collision(&self) -> &MapCollisionOracle {
        &self.collision
    }

    pub fn animation(&self) -> &AnimationTableOracle {
        &self.animation
    }

    pub fn animation_mut(&mut self) -> &mut AnimationTableOracle {
        &mut self.animation
    }
}
