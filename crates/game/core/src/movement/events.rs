//! Notifications emitted by the movement executor.
//!
//! Every notification describes something that already happened, with one
//! exception: [`MovementStarted`] is delivered to listeners before the
//! transition begins and may be cancelled synchronously.

use super::Direction;
use crate::state::{EntityId, MapId, TilePosition};

/// Why a movement attempt did not start.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BlockReason {
    /// Target lies outside the map.
    OutOfBounds,
    /// Target terrain cannot be walked on.
    Impassable,
    /// Tile behavior forbids entering from this direction.
    DirectionBlocked,
    /// Another actor stands on the target tile.
    Occupied(EntityId),
    /// A ledge was approached from the wrong side or its landing is blocked.
    LedgeBlocked,
    /// Source and target tiles sit on different elevation levels.
    ElevationMismatch,
    /// The collision collaborator does not know the map.
    UnknownMap,
    /// A `MovementStarted` listener vetoed the transition.
    Cancelled,
}

impl BlockReason {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::OutOfBounds => "out_of_bounds",
            Self::Impassable => "impassable",
            Self::DirectionBlocked => "direction_blocked",
            Self::Occupied(_) => "occupied",
            Self::LedgeBlocked => "ledge_blocked",
            Self::ElevationMismatch => "elevation_mismatch",
            Self::UnknownMap => "unknown_map",
            Self::Cancelled => "cancelled",
        }
    }
}

impl core::fmt::Display for BlockReason {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MovementStarted {
    pub actor: EntityId,
    pub map: MapId,
    pub direction: Direction,
    pub start_tile: TilePosition,
    pub target_tile: TilePosition,
    /// True when the transition hops a ledge.
    pub jump: bool,
    cancelled: bool,
}

impl MovementStarted {
    pub fn new(
        actor: EntityId,
        map: MapId,
        direction: Direction,
        start_tile: TilePosition,
        target_tile: TilePosition,
        jump: bool,
    ) -> Self {
        Self {
            actor,
            map,
            direction,
            start_tile,
            target_tile,
            jump,
            cancelled: false,
        }
    }

    /// Vetoes the transition. Cannot be undone by later listeners.
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MovementCompleted {
    pub actor: EntityId,
    pub map: MapId,
    pub direction: Direction,
    pub old_tile: TilePosition,
    pub new_tile: TilePosition,
    /// Game time spent on the transition.
    pub elapsed_seconds: f64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MovementBlocked {
    pub actor: EntityId,
    pub map: MapId,
    pub direction: Direction,
    pub attempted_tile: TilePosition,
    pub reason: BlockReason,
}

/// Any notification produced during a tick, in emission order.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MovementEvent {
    Started(MovementStarted),
    Completed(MovementCompleted),
    Blocked(MovementBlocked),
}

impl MovementEvent {
    pub fn actor(&self) -> EntityId {
        match self {
            Self::Started(event) => event.actor,
            Self::Completed(event) => event.actor,
            Self::Blocked(event) => event.actor,
        }
    }

    pub fn map(&self) -> MapId {
        match self {
            Self::Started(event) => event.map,
            Self::Completed(event) => event.map,
            Self::Blocked(event) => event.map,
        }
    }

    pub fn direction(&self) -> Direction {
        match self {
            Self::Started(event) => event.direction,
            Self::Completed(event) => event.direction,
            Self::Blocked(event) => event.direction,
        }
    }
}

/// Synchronous subscriber to movement notifications.
///
/// `on_started` runs before the transition begins; calling
/// [`MovementStarted::cancel`] aborts it and the executor reports a
/// `MovementBlocked` with [`BlockReason::Cancelled`] instead.
pub trait MovementListener {
    fn on_started(&mut self, _event: &mut MovementStarted) {}

    fn on_completed(&mut self, _event: &MovementCompleted) {}

    fn on_blocked(&mut self, _event: &MovementBlocked) {}
}

/// Listener that ignores everything.
impl MovementListener for () {}

impl<L: MovementListener + ?Sized> MovementListener for &mut L {
    fn on_started(&mut self, event: &mut MovementStarted) {
        (**self).on_started(event);
    }

    fn on_completed(&mut self, event: &MovementCompleted) {
        (**self).on_completed(event);
    }

    fn on_blocked(&mut self, event: &MovementBlocked) {
        (**self).on_blocked(event);
    }
}
