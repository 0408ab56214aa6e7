//! Movement configuration constants and tunable parameters.

use crate::error::{CoreError, ErrorSeverity};

/// Tunable parameters shared by every movable actor.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MovementConfig {
    /// Walking speed in tiles per second for actors spawned without an override.
    pub default_speed: f32,
    /// Number of pending intents an input buffer may hold.
    pub buffer_capacity: usize,
    /// Seconds a buffered intent stays valid.
    pub buffer_window: f64,
    /// Turn-in-place duration used when the animation table has no answer.
    pub turn_fallback: f64,
    /// Size of one tile in sub-tile (pixel) units.
    pub tile_size: f32,
}

impl MovementConfig {
    // ===== compile-time constants =====
    /// Hard ceiling for `buffer_capacity`; input buffers are stack-allocated.
    pub const MAX_BUFFER_CAPACITY: usize = 16;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_SPEED: f32 = 4.0;
    pub const DEFAULT_BUFFER_CAPACITY: usize = 5;
    pub const DEFAULT_BUFFER_WINDOW: f64 = 0.2;
    /// Eight frames at 60 Hz, the length of a fast walk-in-place.
    pub const DEFAULT_TURN_FALLBACK: f64 = 0.133;
    pub const DEFAULT_TILE_SIZE: f32 = 16.0;

    pub const fn new() -> Self {
        Self {
            default_speed: Self::DEFAULT_SPEED,
            buffer_capacity: Self::DEFAULT_BUFFER_CAPACITY,
            buffer_window: Self::DEFAULT_BUFFER_WINDOW,
            turn_fallback: Self::DEFAULT_TURN_FALLBACK,
            tile_size: Self::DEFAULT_TILE_SIZE,
        }
    }

    #[must_use]
    pub const fn with_default_speed(mut self, speed: f32) -> Self {
        self.default_speed = speed;
        self
    }

    #[must_use]
    pub const fn with_buffer(mut self, capacity: usize, window: f64) -> Self {
        self.buffer_capacity = capacity;
        self.buffer_window = window;
        self
    }

    #[must_use]
    pub const fn with_turn_fallback(mut self, seconds: f64) -> Self {
        self.turn_fallback = seconds;
        self
    }

    /// Rejects values that would stall or corrupt the tick loop.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_speed(self.default_speed)?;

        if self.buffer_capacity == 0 || self.buffer_capacity > Self::MAX_BUFFER_CAPACITY {
            return Err(ConfigError::BufferCapacity {
                capacity: self.buffer_capacity,
                max: Self::MAX_BUFFER_CAPACITY,
            });
        }
        if !(self.buffer_window.is_finite() && self.buffer_window > 0.0) {
            return Err(ConfigError::BufferWindow(self.buffer_window));
        }
        if !(self.turn_fallback.is_finite() && self.turn_fallback > 0.0) {
            return Err(ConfigError::TurnFallback(self.turn_fallback));
        }
        if !(self.tile_size.is_finite() && self.tile_size > 0.0) {
            return Err(ConfigError::TileSize(self.tile_size));
        }
        Ok(())
    }
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Checks a walking speed in tiles per second.
pub fn validate_speed(speed: f32) -> Result<(), ConfigError> {
    if speed.is_finite() && speed > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Speed(speed))
    }
}

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("speed must be a positive number of tiles per second (got {0})")]
    Speed(f32),

    #[error("buffer capacity must be within 1..={max} (got {capacity})")]
    BufferCapacity { capacity: usize, max: usize },

    #[error("buffer window must be a positive number of seconds (got {0})")]
    BufferWindow(f64),

    #[error("turn fallback must be a positive number of seconds (got {0})")]
    TurnFallback(f64),

    #[error("tile size must be positive (got {0})")]
    TileSize(f32),
}

impl CoreError for ConfigError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Speed(_) => "config.speed",
            Self::BufferCapacity { .. } => "config.buffer_capacity",
            Self::BufferWindow(_) => "config.buffer_window",
            Self::TurnFallback(_) => "config.turn_fallback",
            Self::TileSize(_) => "config.tile_size",
        }
    }
}
