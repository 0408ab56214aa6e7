//! Map layout loader.
//!
//! Loads terrain, elevation and tile behaviors from map RON files. Actor placement is
//! not part of a map; spawns are configured by the caller.

use std::path::Path;

use overworld_core::{MapId, TileBehavior, TilePosition};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};
use crate::maps::{MAX_ELEVATION, MapLayout, Terrain};

/// Tile behavior flag as written in map files.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
enum BehaviorFlag {
    BlockNorth,
    BlockSouth,
    BlockEast,
    BlockWest,
    LedgeNorth,
    LedgeSouth,
    LedgeEast,
    LedgeWest,
}

impl From<BehaviorFlag> for TileBehavior {
    fn from(flag: BehaviorFlag) -> Self {
        match flag {
            BehaviorFlag::BlockNorth => TileBehavior::BLOCK_NORTH,
            BehaviorFlag::BlockSouth => TileBehavior::BLOCK_SOUTH,
            BehaviorFlag::BlockEast => TileBehavior::BLOCK_EAST,
            BehaviorFlag::BlockWest => TileBehavior::BLOCK_WEST,
            BehaviorFlag::LedgeNorth => TileBehavior::LEDGE_NORTH,
            BehaviorFlag::LedgeSouth => TileBehavior::LEDGE_SOUTH,
            BehaviorFlag::LedgeEast => TileBehavior::LEDGE_EAST,
            BehaviorFlag::LedgeWest => TileBehavior::LEDGE_WEST,
        }
    }
}

/// Map data structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct MapDataRon {
    id: u16,
    dimensions: (u32, u32),
    #[serde(default)]
    default: Terrain,
    #[serde(default)]
    tiles: Vec<(i32, i32, Terrain)>, // (x, y, terrain)
    #[serde(default)]
    behaviors: Vec<(i32, i32, Vec<BehaviorFlag>)>,
    #[serde(default)]
    elevations: Vec<(i32, i32, u8)>, // (x, y, level)
}

/// Loader for map layouts from RON files.
pub struct MapLoader;

impl MapLoader {
    /// Load a map layout from a RON file.
    pub fn load(path: &Path) -> LoadResult<MapLayout> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Invalid map {}: {}", path.display(), e))
    }

    pub fn parse(content: &str) -> LoadResult<MapLayout> {
        let data: MapDataRon = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse map RON: {}", e))?;

        let (width, height) = data.dimensions;
        if width == 0 || height == 0 {
            anyhow::bail!("map {} has empty dimensions {}x{}", data.id, width, height);
        }

        let mut map = MapLayout::new(MapId(data.id), width, height, data.default);

        for (x, y, terrain) in data.tiles {
            let tile = TilePosition::new(x, y);
            if !map.contains(tile) {
                anyhow::bail!("terrain at {} lies outside {}x{}", tile, width, height);
            }
            map.set_terrain(tile, terrain);
        }

        for (x, y, flags) in data.behaviors {
            let tile = TilePosition::new(x, y);
            if !map.contains(tile) {
                anyhow::bail!("behavior at {} lies outside {}x{}", tile, width, height);
            }
            let behavior = flags
                .into_iter()
                .fold(TileBehavior::empty(), |acc, flag| acc | flag.into());
            map.add_behavior(tile, behavior);
        }

        for (x, y, level) in data.elevations {
            let tile = TilePosition::new(x, y);
            if !map.contains(tile) {
                anyhow::bail!("elevation at {} lies outside {}x{}", tile, width, height);
            }
            if level > MAX_ELEVATION {
                anyhow::bail!("elevation {} at {} exceeds {}", level, tile, MAX_ELEVATION);
            }
            map.set_elevation(tile, level);
        }

        Ok(map)
    }
}
