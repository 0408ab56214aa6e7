//! Map-backed collision served through [`overworld_core::CollisionOracle`].
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use overworld_content::MapLayout;
use overworld_core::{
    BlockReason, CollisionOracle, Direction, EntityId, GridPosition, MapId, MovementState,
    TileAccess, TilePosition,
};

/// CollisionOracle implementation over static map layouts.
///
/// Layouts never change during play. Actor occupancy is rebuilt by the
/// runtime before every tick and extended with reservations as transitions
/// start, so two actors cannot claim the same tile within one tick.
pub struct MapCollisionOracle {
    maps: HashMap<MapId, MapLayout>,
    occupancy: RwLock<HashMap<(MapId, TilePosition), EntityId>>,
}

impl MapCollisionOracle {
    pub fn new(maps: impl IntoIterator<Item = MapLayout>) -> Self {
        Self {
            maps: maps.into_iter().map(|map| (map.id(), map)).collect(),
            occupancy: RwLock::new(HashMap::new()),
        }
    }

    /// Adds or replaces a layout; returns the one it replaced.
    pub fn insert_map(&mut self, map: MapLayout) -> Option<MapLayout> {
        self.maps.insert(map.id(), map)
    }

    pub fn map(&self, id: MapId) -> Option<&MapLayout> {
        self.maps.get(&id)
    }

    pub fn has_map(&self, id: MapId) -> bool {
        self.maps.contains_key(&id)
    }

    pub fn map_ids(&self) -> impl Iterator<Item = MapId> + '_ {
        self.maps.keys().copied()
    }

    /// Rebuilds occupancy from the current actor positions.
    ///
    /// Actors in the middle of a transition occupy both ends of it.
    pub fn refresh_occupancy<'a>(
        &self,
        movers: impl Iterator<Item = (EntityId, &'a GridPosition, &'a MovementState)>,
    ) {
        let mut occupancy = self.occupancy.write().unwrap_or_else(PoisonError::into_inner);
        occupancy.clear();
        for (actor, position, movement) in movers {
            occupancy.insert((position.map, position.tile), actor);
            if let Some(transition) = movement.transition() {
                occupancy.insert((position.map, transition.to), actor);
            }
        }
    }

    /// Claims `tile` for `actor` until the next refresh.
    pub fn reserve(&self, actor: EntityId, map: MapId, tile: TilePosition) {
        self.occupancy
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert((map, tile), actor);
    }

    pub fn occupant(&self, map: MapId, tile: TilePosition) -> Option<EntityId> {
        self.occupancy
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&(map, tile))
            .copied()
    }

    fn occupied_by_other(&self, actor: EntityId, map: MapId, tile: TilePosition) -> Option<EntityId> {
        self.occupant(map, tile).filter(|occupant| *occupant != actor)
    }
}

impl CollisionOracle for MapCollisionOracle {
    fn can_enter(
        &self,
        actor: EntityId,
        target: TilePosition,
        map: MapId,
        direction: Direction,
    ) -> TileAccess {
        let Some(layout) = self.maps.get(&map) else {
            return TileAccess::Blocked(BlockReason::UnknownMap);
        };
        let Some(terrain) = layout.terrain(target) else {
            return TileAccess::Blocked(BlockReason::OutOfBounds);
        };
        if !terrain.is_passable() {
            return TileAccess::Blocked(BlockReason::Impassable);
        }
        let from = target.offset(direction.delta(), -1);
        if layout.elevation_mismatch(from, target) {
            return TileAccess::Blocked(BlockReason::ElevationMismatch);
        }

        let behavior = layout.behavior(target);
        if behavior.is_ledge() {
            if !behavior.ledge_toward(direction) {
                return TileAccess::Blocked(BlockReason::LedgeBlocked);
            }
            let Some(landing) = target.checked_offset(direction.delta(), 1) else {
                return TileAccess::Blocked(BlockReason::OutOfBounds);
            };
            if !layout.is_enterable(landing, direction)
                || layout.elevation_mismatch(from, landing)
            {
                return TileAccess::Blocked(BlockReason::LedgeBlocked);
            }
            if let Some(occupant) = self.occupied_by_other(actor, map, landing) {
                return TileAccess::Blocked(BlockReason::Occupied(occupant));
            }
            return TileAccess::Jump { landing };
        }

        if behavior.blocks(direction) {
            return TileAccess::Blocked(BlockReason::DirectionBlocked);
        }
        if let Some(occupant) = self.occupied_by_other(actor, map, target) {
            return TileAccess::Blocked(BlockReason::Occupied(occupant));
        }
        TileAccess::Walk
    }
}
