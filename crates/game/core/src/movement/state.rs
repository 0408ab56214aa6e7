//! Per-actor movement data mutated by the coordinator and the executor.

use super::{Direction, MovementStatus, Presentation};
use crate::config::{ConfigError, MovementConfig, validate_speed};
use crate::state::{SubTilePosition, TilePosition};

/// Absorbs f32 accumulation error so that N equal steps summing to one tile
/// arrive on the Nth frame.
const ARRIVAL_EPSILON: f32 = 1e-4;

/// Reusable intent slot. Filled by the coordinator, drained by the executor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PendingIntent {
    pub direction: Direction,
    pub active: bool,
}

impl PendingIntent {
    pub fn set(&mut self, direction: Direction) {
        self.direction = direction;
        self.active = !direction.is_none();
    }

    pub fn clear(&mut self) {
        self.active = false;
    }

    /// Active direction, if any. Leaves the slot untouched.
    pub fn active_direction(&self) -> Option<Direction> {
        self.active.then_some(self.direction)
    }
}

/// Geometry and bookkeeping of the tile transition in progress.
///
/// Only meaningful while the owning state is `Moving`; the slot is reused
/// across transitions.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Transition {
    pub direction: Direction,
    pub from: TilePosition,
    pub to: TilePosition,
    pub start: SubTilePosition,
    pub target: SubTilePosition,
    /// Game time at which the transition started.
    pub started_at: f64,
    /// Tiles covered: 1 for a walk, 2 for a ledge jump.
    pub tiles: u8,
    pub presentation: Presentation,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MovementState {
    pub(crate) facing: Direction,
    pub(crate) last_movement: Direction,
    pub(crate) status: MovementStatus,
    pub(crate) progress: f32,
    pub(crate) speed: f32,
    pub(crate) locked: bool,
    pub(crate) turn_start: Option<f64>,
    pub(crate) transition: Transition,
    pub(crate) pending: PendingIntent,
    pub(crate) render_position: SubTilePosition,
}

impl MovementState {
    /// Creates an idle, south-facing state walking at `speed` tiles per second.
    pub fn new(speed: f32) -> Result<Self, ConfigError> {
        validate_speed(speed)?;
        Ok(Self {
            facing: Direction::South,
            last_movement: Direction::South,
            status: MovementStatus::Idle,
            progress: 0.0,
            speed,
            locked: false,
            turn_start: None,
            transition: Transition::default(),
            pending: PendingIntent::default(),
            render_position: SubTilePosition::default(),
        })
    }

    pub fn from_config(config: &MovementConfig) -> Result<Self, ConfigError> {
        Self::new(config.default_speed)
    }

    /// Sets both the facing and the last movement direction.
    #[must_use]
    pub fn facing(mut self, direction: Direction) -> Self {
        if !direction.is_none() {
            self.facing = direction;
            self.last_movement = direction;
        }
        self
    }

    pub fn facing_direction(&self) -> Direction {
        self.facing
    }

    pub fn last_movement_direction(&self) -> Direction {
        self.last_movement
    }

    pub fn status(&self) -> MovementStatus {
        self.status
    }

    pub fn is_moving(&self) -> bool {
        self.status == MovementStatus::Moving
    }

    pub fn is_turning(&self) -> bool {
        self.status == MovementStatus::TurningInPlace
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn set_speed(&mut self, speed: f32) -> Result<(), ConfigError> {
        validate_speed(speed)?;
        self.speed = speed;
        Ok(())
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Holds the actor in place; a turn in progress ends immediately.
    ///
    /// A tile transition already under way still completes.
    pub fn lock(&mut self) {
        self.locked = true;
        if self.is_turning() {
            self.finish_turn();
        }
        self.pending.clear();
    }

    pub fn unlock(&mut self) {
        self.locked = false;
    }

    pub fn turn_start(&self) -> Option<f64> {
        self.turn_start
    }

    pub fn pending_intent(&self) -> PendingIntent {
        self.pending
    }

    /// Queues a one-tile move for the next executor pass of `delta` seconds.
    ///
    /// Used by actors without an input source (scripted or AI-driven). Returns
    /// `false` when the request cannot be honoured this tick, including while
    /// a transition will still be under way at the end of the next frame. A
    /// request made on the arrival frame chains into the next tile.
    pub fn request_move(&mut self, direction: Direction, delta: f32) -> bool {
        if direction.is_none()
            || self.locked
            || self.is_turning()
            || self.is_mid_transition(delta)
        {
            return false;
        }
        self.pending.set(direction);
        true
    }

    /// The transition in progress, if the actor is moving.
    pub fn transition(&self) -> Option<&Transition> {
        self.is_moving().then_some(&self.transition)
    }

    /// Interpolated sub-tile position for renderers.
    pub fn render_position(&self) -> SubTilePosition {
        self.render_position
    }

    /// Animation the renderer should currently show.
    pub fn presentation(&self) -> (Presentation, Direction) {
        match self.status {
            MovementStatus::Idle => (Presentation::Face, self.facing),
            MovementStatus::TurningInPlace => (Presentation::Turn, self.facing),
            MovementStatus::Moving => (self.transition.presentation, self.transition.direction),
        }
    }

    /// True while moving and the transition will not finish within `delta` seconds.
    pub fn is_mid_transition(&self, delta: f32) -> bool {
        self.is_moving() && self.progress + self.step(delta) < 1.0 - ARRIVAL_EPSILON
    }

    pub(crate) fn step(&self, delta: f32) -> f32 {
        self.speed * delta / f32::from(self.transition.tiles.max(1))
    }

    pub(crate) fn begin_turn(&mut self, direction: Direction, now: f64) {
        self.status = MovementStatus::TurningInPlace;
        self.facing = direction;
        self.turn_start = Some(now);
    }

    pub(crate) fn finish_turn(&mut self) {
        self.status = MovementStatus::Idle;
        self.turn_start = None;
    }

    /// Starts `transition` with `carry` seconds of travel already behind it.
    pub(crate) fn begin_transition(&mut self, transition: Transition, carry: f32) {
        self.facing = transition.direction;
        self.last_movement = transition.direction;
        self.transition = transition;
        self.progress = self.step(carry).min(1.0);
        self.render_position = transition.start.lerp(transition.target, self.progress);
        self.status = MovementStatus::Moving;
        self.pending.clear();
    }

    /// Advances progress and the interpolated position.
    ///
    /// On arrival returns the part of `delta`, in seconds, left over after
    /// reaching the target.
    pub(crate) fn advance(&mut self, delta: f32) -> Option<f32> {
        let raw = self.progress + self.step(delta);
        self.progress = raw.min(1.0);
        self.render_position = self
            .transition
            .start
            .lerp(self.transition.target, self.progress);
        if raw < 1.0 - ARRIVAL_EPSILON {
            return None;
        }
        let overshoot = raw - 1.0;
        if overshoot <= ARRIVAL_EPSILON {
            return Some(0.0);
        }
        Some(overshoot * f32::from(self.transition.tiles.max(1)) / self.speed)
    }

    pub(crate) fn arrive(&mut self) {
        self.render_position = self.transition.target;
        self.progress = 0.0;
        self.status = MovementStatus::Idle;
    }

    pub(crate) fn sync_to(&mut self, position: SubTilePosition) {
        self.render_position = position;
    }
}

impl Default for MovementState {
    fn default() -> Self {
        Self {
            facing: Direction::South,
            last_movement: Direction::South,
            status: MovementStatus::Idle,
            progress: 0.0,
            speed: MovementConfig::DEFAULT_SPEED,
            locked: false,
            turn_start: None,
            transition: Transition::default(),
            pending: PendingIntent::default(),
            render_position: SubTilePosition::default(),
        }
    }
}
