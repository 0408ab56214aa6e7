//! Actor identity, grid coordinates, and the actor store.
//!
//! The store owns every actor's components. Only the coordinator and the
//! executor mutate movement components during a tick.
mod common;
mod world;

pub use common::{EntityId, GridPosition, MapId, SubTilePosition, TilePosition};
pub use world::{ActorRecord, Component, MoverSpec, SpawnError, World};
