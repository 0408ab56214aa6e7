//! Collaborator availability errors.

use crate::error::{CoreError, ErrorSeverity};

/// A required collaborator was not supplied when the environment was built.
///
/// These are construction-time failures; once an [`super::MovementEnv`]
/// exists every tick can rely on its collaborators.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum OracleError {
    #[error("CollisionOracle not available")]
    CollisionNotAvailable,

    #[error("AnimationOracle not available")]
    AnimationNotAvailable,
}

impl CoreError for OracleError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::CollisionNotAvailable => "ORACLE_COLLISION_NOT_AVAILABLE",
            Self::AnimationNotAvailable => "ORACLE_ANIMATION_NOT_AVAILABLE",
        }
    }
}
