//! Traits describing the collaborators the movement core consults.
//!
//! Oracles answer read-only questions: may this actor enter that tile, how
//! long is this animation. [`MovementEnv`] bundles them so the executor can
//! reach everything without coupling to concrete implementations. Platform
//! input arrives separately as a [`SampledInput`] per tick.
mod animation;
mod collision;
mod error;
mod input;

pub use animation::{AnimationOracle, NoAnimations};
pub use collision::{CollisionOracle, TileAccess, TileBehavior};
pub use error::OracleError;
pub use input::{ActionReader, InputSourceId, MAX_INPUT_SOURCES, SampledInput};

/// Resolved collaborators for a tick. Every field is guaranteed present.
#[derive(Clone, Copy)]
pub struct MovementEnv<'a> {
    collision: &'a dyn CollisionOracle,
    animation: &'a dyn AnimationOracle,
}

impl<'a> MovementEnv<'a> {
    pub fn new(collision: &'a dyn CollisionOracle, animation: &'a dyn AnimationOracle) -> Self {
        Self {
            collision,
            animation,
        }
    }

    pub fn builder() -> EnvBuilder<'a> {
        EnvBuilder::default()
    }

    pub fn collision(&self) -> &'a dyn CollisionOracle {
        self.collision
    }

    pub fn animation(&self) -> &'a dyn AnimationOracle {
        self.animation
    }
}

impl core::fmt::Debug for MovementEnv<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MovementEnv").finish_non_exhaustive()
    }
}

/// Collects optional collaborators and fails fast when one is missing.
#[derive(Clone, Copy, Default)]
pub struct EnvBuilder<'a> {
    collision: Option<&'a dyn CollisionOracle>,
    animation: Option<&'a dyn AnimationOracle>,
}

impl<'a> EnvBuilder<'a> {
    pub fn collision(mut self, oracle: &'a dyn CollisionOracle) -> Self {
        self.collision = Some(oracle);
        self
    }

    pub fn animation(mut self, oracle: &'a dyn AnimationOracle) -> Self {
        self.animation = Some(oracle);
        self
    }

    /// # Errors
    ///
    /// Returns the first missing collaborator.
    pub fn build(self) -> Result<MovementEnv<'a>, OracleError> {
        let collision = self.collision.ok_or(OracleError::CollisionNotAvailable)?;
        let animation = self.animation.ok_or(OracleError::AnimationNotAvailable)?;
        Ok(MovementEnv::new(collision, animation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movement::Direction;
    use crate::state::{EntityId, MapId, TilePosition};

    struct OpenField;

    impl CollisionOracle for OpenField {
        fn can_enter(&self, _: EntityId, _: TilePosition, _: MapId, _: Direction) -> TileAccess {
            TileAccess::Walk
        }
    }

    #[test]
    fn builder_requires_collision() {
        let err = MovementEnv::builder()
            .animation(&NoAnimations)
            .build()
            .unwrap_err();
        assert_eq!(err, OracleError::CollisionNotAvailable);
    }

    #[test]
    fn builder_requires_animation() {
        let err = MovementEnv::builder()
            .collision(&OpenField)
            .build()
            .unwrap_err();
        assert_eq!(err, OracleError::AnimationNotAvailable);
    }

    #[test]
    fn builder_succeeds_with_all_collaborators() {
        let env = MovementEnv::builder()
            .collision(&OpenField)
            .animation(&NoAnimations)
            .build()
            .unwrap();
        assert_eq!(
            env.collision()
                .can_enter(EntityId::PLAYER, TilePosition::ORIGIN, MapId(0), Direction::North),
            TileAccess::Walk
        );
    }
}
