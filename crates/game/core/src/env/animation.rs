use crate::state::EntityId;

/// Animation timing lookup.
///
/// The core asks for durations only; frame selection stays with the renderer.
pub trait AnimationOracle: Send + Sync {
    /// Total length in seconds of `animation` (e.g. `go_fast_south`) for
    /// `actor`, or `None` if the actor has no such animation.
    fn duration(&self, actor: EntityId, animation: &str) -> Option<f64>;
}

/// Oracle with no animation data; every lookup falls back.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoAnimations;

impl AnimationOracle for NoAnimations {
    fn duration(&self, _actor: EntityId, _animation: &str) -> Option<f64> {
        None
    }
}
