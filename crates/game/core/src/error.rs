//! Common error infrastructure for overworld-core.
//!
//! Domain-specific errors (`ConfigError`, `BufferRejection`, `SpawnError`, ...)
//! live next to the code that produces them. This module provides the shared
//! classification used by the runtime to decide between failing construction
//! and logging a tick-local anomaly.
//!
//! # Design Principles
//!
//! - **Nothing gameplay-reachable is fatal**: the tick loop never returns an error
//! - **Construction fails fast**: invalid config or missing collaborators are rejected up front
//! - **Rejections are outcomes**: collision denial is a `MovementBlocked` notification, not an error

use crate::state::{EntityId, MapId, TilePosition};

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Corrected locally with a fallback; the tick continues.
    ///
    /// Examples: negative elapsed time, buffer overflow, unknown animation
    Recoverable,

    /// Invalid input rejected at setup time.
    ///
    /// Examples: zero speed, buffer capacity out of range
    Validation,

    /// Unexpected state inconsistency that indicates a bug.
    ///
    /// Examples: actor missing a required component in the hot loop
    Internal,

    /// The system cannot be constructed.
    ///
    /// Examples: required collaborator not provided
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Contextual information attached to errors and anomalies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ErrorContext {
    pub actor: Option<EntityId>,
    pub tile: Option<TilePosition>,
    pub map: Option<MapId>,
}

impl ErrorContext {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            actor: None,
            tile: None,
            map: None,
        }
    }

    #[must_use]
    pub const fn with_actor(mut self, actor: EntityId) -> Self {
        self.actor = Some(actor);
        self
    }

    #[must_use]
    pub const fn with_tile(mut self, tile: TilePosition, map: MapId) -> Self {
        self.tile = Some(tile);
        self.map = Some(map);
        self
    }
}

/// Common trait for all overworld-core errors.
pub trait CoreError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    fn context(&self) -> Option<&ErrorContext> {
        None
    }

    /// Stable identifier for metrics and tests.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
