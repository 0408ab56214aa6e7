//! Errors surfaced while assembling or configuring the runtime.
//!
//! Ticking never fails; everything here is raised by the builder, spawning,
//! or environment overrides so callers can reject bad setup up front.
use thiserror::Error;

use overworld_core::{ConfigError, CoreError, ErrorSeverity, MapId, SpawnError};

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Spawn(#[from] SpawnError),

    #[error("map {0} is not loaded")]
    UnknownMap(MapId),

    #[error("sprite {0:?} has no animations")]
    UnknownSprite(String),

    #[error("runtime requires at least one map before building")]
    MissingMaps,

    #[error("map {0} was provided twice")]
    DuplicateMap(MapId),

    #[error("environment variable {var} has invalid value {value:?}")]
    InvalidEnv { var: &'static str, value: String },

    #[error("frame step {0} must be finite and positive")]
    FrameStep(f32),

    #[error("{0} input sources registered, at most {max} supported", max = overworld_core::env::MAX_INPUT_SOURCES)]
    TooManyInputSources(usize),
}

impl CoreError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Config(inner) => inner.severity(),
            Self::Spawn(inner) => inner.severity(),
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Config(inner) => inner.error_code(),
            Self::Spawn(inner) => inner.error_code(),
            Self::UnknownMap(_) => "runtime.unknown_map",
            Self::UnknownSprite(_) => "runtime.unknown_sprite",
            Self::MissingMaps => "runtime.missing_maps",
            Self::DuplicateMap(_) => "runtime.duplicate_map",
            Self::InvalidEnv { .. } => "runtime.invalid_env",
            Self::FrameStep(_) => "runtime.frame_step",
            Self::TooManyInputSources(_) => "runtime.too_many_input_sources",
        }
    }
}
