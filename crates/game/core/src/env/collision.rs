use bitflags::bitflags;

use crate::movement::{BlockReason, Direction};
use crate::state::{EntityId, MapId, TilePosition};

/// Spatial permission oracle consulted before a transition starts.
///
/// The answer carries tile-behavior metadata (ledge jumps) alongside
/// walkability so the executor needs a single query per attempt.
pub trait CollisionOracle: Send + Sync {
    /// Can `actor`, moving in `direction`, enter `target` on `map`?
    fn can_enter(
        &self,
        actor: EntityId,
        target: TilePosition,
        map: MapId,
        direction: Direction,
    ) -> TileAccess;
}

/// Outcome of a collision query.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TileAccess {
    /// Plain one-tile walk.
    Walk,
    /// One-way ledge: the actor hops over `target` and lands on `landing`.
    Jump { landing: TilePosition },
    Blocked(BlockReason),
}

impl TileAccess {
    pub const fn is_blocked(&self) -> bool {
        matches!(self, TileAccess::Blocked(_))
    }
}

bitflags! {
    /// Per-tile movement behaviors layered on top of terrain.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct TileBehavior: u16 {
        /// Cannot be entered while moving north.
        const BLOCK_NORTH = 1 << 0;
        const BLOCK_SOUTH = 1 << 1;
        const BLOCK_EAST = 1 << 2;
        const BLOCK_WEST = 1 << 3;
        /// Ledge crossed by moving north; every other direction is blocked.
        const LEDGE_NORTH = 1 << 4;
        const LEDGE_SOUTH = 1 << 5;
        const LEDGE_EAST = 1 << 6;
        const LEDGE_WEST = 1 << 7;

        const LEDGES = Self::LEDGE_NORTH.bits()
            | Self::LEDGE_SOUTH.bits()
            | Self::LEDGE_EAST.bits()
            | Self::LEDGE_WEST.bits();
    }
}

impl TileBehavior {
    /// Entry blocked when moving in `direction`.
    pub fn blocks(self, direction: Direction) -> bool {
        let flag = match direction {
            Direction::None => return false,
            Direction::North => Self::BLOCK_NORTH,
            Direction::South => Self::BLOCK_SOUTH,
            Direction::East => Self::BLOCK_EAST,
            Direction::West => Self::BLOCK_WEST,
        };
        self.contains(flag)
    }

    pub fn is_ledge(self) -> bool {
        self.intersects(Self::LEDGES)
    }

    /// Ledge that can be jumped while moving in `direction`.
    pub fn ledge_toward(self, direction: Direction) -> bool {
        let flag = match direction {
            Direction::None => return false,
            Direction::North => Self::LEDGE_NORTH,
            Direction::South => Self::LEDGE_SOUTH,
            Direction::East => Self::LEDGE_EAST,
            Direction::West => Self::LEDGE_WEST,
        };
        self.contains(flag)
    }
}
