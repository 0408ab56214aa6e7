//! Static map layouts: terrain plus per-tile movement behaviors.
use std::collections::HashMap;

use overworld_core::{Direction, MapId, TileBehavior, TilePosition};

/// Base walkability of a tile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Terrain {
    #[default]
    Floor,
    Wall,
    Water,
    /// Outside the playable area of an otherwise rectangular map.
    Void,
}

impl Terrain {
    pub const fn is_passable(self) -> bool {
        matches!(self, Terrain::Floor)
    }
}

/// Elevation level that connects to every other level (stairs, ramps).
pub const ELEVATION_ANY: u8 = 0;
/// Elevation level that also connects to every level (bridges, multi-level
/// tiles).
pub const ELEVATION_BRIDGE: u8 = 15;
pub const MAX_ELEVATION: u8 = 15;

/// Immutable collision layout of one map.
///
/// Tiles not listed explicitly take the map's default terrain, elevation
/// [`ELEVATION_ANY`] and no behaviors.
#[derive(Clone, Debug, PartialEq)]
pub struct MapLayout {
    id: MapId,
    width: u32,
    height: u32,
    default: Terrain,
    terrain: HashMap<TilePosition, Terrain>,
    behaviors: HashMap<TilePosition, TileBehavior>,
    elevations: HashMap<TilePosition, u8>,
}

impl MapLayout {
    /// Creates a map filled with `default` terrain.
    pub fn new(id: MapId, width: u32, height: u32, default: Terrain) -> Self {
        Self {
            id,
            width,
            height,
            default,
            terrain: HashMap::new(),
            behaviors: HashMap::new(),
            elevations: HashMap::new(),
        }
    }

    /// All-floor map, handy for tests and demos.
    pub fn open(id: MapId, width: u32, height: u32) -> Self {
        Self::new(id, width, height, Terrain::Floor)
    }

    #[must_use]
    pub fn with_terrain(mut self, tile: TilePosition, terrain: Terrain) -> Self {
        self.set_terrain(tile, terrain);
        self
    }

    #[must_use]
    pub fn with_behavior(mut self, tile: TilePosition, behavior: TileBehavior) -> Self {
        self.add_behavior(tile, behavior);
        self
    }

    #[must_use]
    pub fn with_elevation(mut self, tile: TilePosition, level: u8) -> Self {
        self.set_elevation(tile, level);
        self
    }

    pub fn set_terrain(&mut self, tile: TilePosition, terrain: Terrain) {
        if terrain == self.default {
            self.terrain.remove(&tile);
        } else {
            self.terrain.insert(tile, terrain);
        }
    }

    /// Merges `behavior` into the flags already on `tile`.
    pub fn add_behavior(&mut self, tile: TilePosition, behavior: TileBehavior) {
        if !behavior.is_empty() {
            *self.behaviors.entry(tile).or_default() |= behavior;
        }
    }

    /// Sets the elevation of `tile`, capped at [`MAX_ELEVATION`].
    pub fn set_elevation(&mut self, tile: TilePosition, level: u8) {
        let level = level.min(MAX_ELEVATION);
        if level == ELEVATION_ANY {
            self.elevations.remove(&tile);
        } else {
            self.elevations.insert(tile, level);
        }
    }

    pub fn id(&self) -> MapId {
        self.id
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn contains(&self, tile: TilePosition) -> bool {
        tile.x >= 0 && tile.y >= 0 && (tile.x as u32) < self.width && (tile.y as u32) < self.height
    }

    /// Terrain at `tile`, or `None` outside the map.
    pub fn terrain(&self, tile: TilePosition) -> Option<Terrain> {
        self.contains(tile)
            .then(|| self.terrain.get(&tile).copied().unwrap_or(self.default))
    }

    pub fn behavior(&self, tile: TilePosition) -> TileBehavior {
        self.behaviors.get(&tile).copied().unwrap_or_default()
    }

    pub fn elevation(&self, tile: TilePosition) -> u8 {
        self.elevations.get(&tile).copied().unwrap_or(ELEVATION_ANY)
    }

    /// True when stepping from `from` onto `to` crosses between two distinct
    /// fixed levels. Levels 0 and 15 connect to everything.
    pub fn elevation_mismatch(&self, from: TilePosition, to: TilePosition) -> bool {
        let fixed = |level: u8| level != ELEVATION_ANY && level != ELEVATION_BRIDGE;
        let (a, b) = (self.elevation(from), self.elevation(to));
        fixed(a) && fixed(b) && a != b
    }

    /// True if an actor moving in `direction` may stand on `tile` afterwards,
    /// ignoring other actors.
    pub fn is_enterable(&self, tile: TilePosition, direction: Direction) -> bool {
        self.terrain(tile).is_some_and(Terrain::is_passable)
            && !self.behavior(tile).blocks(direction)
            && !self.behavior(tile).is_ledge()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiles_outside_bounds_have_no_terrain() {
        let map = MapLayout::open(MapId(0), 4, 3);
        assert_eq!(map.terrain(TilePosition::new(3, 2)), Some(Terrain::Floor));
        assert_eq!(map.terrain(TilePosition::new(4, 0)), None);
        assert_eq!(map.terrain(TilePosition::new(0, -1)), None);
    }

    #[test]
    fn behaviors_merge() {
        let tile = TilePosition::new(1, 1);
        let map = MapLayout::open(MapId(0), 4, 4)
            .with_behavior(tile, TileBehavior::BLOCK_NORTH)
            .with_behavior(tile, TileBehavior::BLOCK_WEST);
        assert_eq!(
            map.behavior(tile),
            TileBehavior::BLOCK_NORTH | TileBehavior::BLOCK_WEST
        );
    }

    #[test]
    fn elevation_levels_connect_through_zero_and_fifteen() {
        let (low, high, stairs, bridge) = (
            TilePosition::new(0, 0),
            TilePosition::new(1, 0),
            TilePosition::new(2, 0),
            TilePosition::new(3, 0),
        );
        let map = MapLayout::open(MapId(0), 4, 1)
            .with_elevation(low, 3)
            .with_elevation(high, 4)
            .with_elevation(bridge, ELEVATION_BRIDGE);

        assert_eq!(map.elevation(stairs), ELEVATION_ANY);
        assert!(map.elevation_mismatch(low, high));
        assert!(!map.elevation_mismatch(low, stairs));
        assert!(!map.elevation_mismatch(bridge, high));
        assert!(!map.elevation_mismatch(low, low));
    }

    #[test]
    fn setting_default_terrain_clears_override() {
        let tile = TilePosition::new(2, 2);
        let mut map = MapLayout::open(MapId(0), 4, 4).with_terrain(tile, Terrain::Water);
        assert!(!map.is_enterable(tile, Direction::North));

        map.set_terrain(tile, Terrain::Floor);
        assert!(map.is_enterable(tile, Direction::North));
    }
}
