//! Minimal deterministic actor store.
//!
//! Actors are component records keyed by [`EntityId`]. Iteration is in
//! ascending id order so every tick visits actors in the same sequence.

use std::collections::BTreeMap;

use super::{EntityId, GridPosition};
use crate::config::{ConfigError, MovementConfig};
use crate::env::InputSourceId;
use crate::error::{CoreError, ErrorSeverity};
use crate::movement::{Direction, InputBuffer, MovementState};

/// Components a movable actor may carry. Every slot is optional; systems
/// skip actors missing what they need.
#[derive(Clone, Debug, Default)]
pub struct ActorRecord {
    pub position: Option<GridPosition>,
    pub movement: Option<MovementState>,
    pub buffer: Option<InputBuffer>,
    pub input: Option<InputSourceId>,
}

/// Typed access to one [`ActorRecord`] slot.
pub trait Component: Sized {
    fn slot(record: &ActorRecord) -> &Option<Self>;
    fn slot_mut(record: &mut ActorRecord) -> &mut Option<Self>;
}

macro_rules! component {
    ($ty:ty, $field:ident) => {
        impl Component for $ty {
            fn slot(record: &ActorRecord) -> &Option<Self> {
                &record.$field
            }

            fn slot_mut(record: &mut ActorRecord) -> &mut Option<Self> {
                &mut record.$field
            }
        }
    };
}

component!(GridPosition, position);
component!(MovementState, movement);
component!(InputBuffer, buffer);
component!(InputSourceId, input);

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum SpawnError {
    #[error("entity {0} already exists")]
    DuplicateId(EntityId),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl CoreError for SpawnError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::DuplicateId(_) => "spawn.duplicate_id",
            Self::Config(inner) => inner.error_code(),
        }
    }
}

/// Everything needed to make an actor movable.
#[derive(Clone, Debug, PartialEq)]
pub struct MoverSpec {
    pub position: GridPosition,
    pub facing: Direction,
    /// Overrides `MovementConfig::default_speed`.
    pub speed: Option<f32>,
    /// Input source driving this actor; `None` for scripted/AI actors.
    pub input: Option<InputSourceId>,
}

impl MoverSpec {
    pub fn at(position: GridPosition) -> Self {
        Self {
            position,
            facing: Direction::South,
            speed: None,
            input: None,
        }
    }

    #[must_use]
    pub fn facing(mut self, direction: Direction) -> Self {
        self.facing = direction;
        self
    }

    #[must_use]
    pub fn speed(mut self, speed: f32) -> Self {
        self.speed = Some(speed);
        self
    }

    #[must_use]
    pub fn controlled_by(mut self, source: InputSourceId) -> Self {
        self.input = Some(source);
        self
    }
}

#[derive(Clone, Debug)]
pub struct World {
    /// Sequential id allocator. Never reused; 0 is reserved for the player.
    next_entity_id: u32,
    actors: BTreeMap<EntityId, ActorRecord>,
}

impl World {
    pub fn new() -> Self {
        Self {
            next_entity_id: 1,
            actors: BTreeMap::new(),
        }
    }

    /// Creates an empty actor and returns its id.
    pub fn create(&mut self) -> EntityId {
        let id = self.allocate_id();
        self.actors.insert(id, ActorRecord::default());
        id
    }

    /// Creates an empty actor with a caller-chosen id.
    pub fn create_with_id(&mut self, id: EntityId) -> Result<(), SpawnError> {
        if self.actors.contains_key(&id) {
            return Err(SpawnError::DuplicateId(id));
        }
        if id.0 >= self.next_entity_id {
            self.next_entity_id = id.0.saturating_add(1);
        }
        self.actors.insert(id, ActorRecord::default());
        Ok(())
    }

    /// Creates a fully equipped movable actor.
    ///
    /// Speed and buffer settings are validated here so the tick loop never
    /// sees an actor that cannot move.
    pub fn spawn_mover(
        &mut self,
        id: Option<EntityId>,
        spec: MoverSpec,
        config: &MovementConfig,
    ) -> Result<EntityId, SpawnError> {
        let mut movement =
            MovementState::new(spec.speed.unwrap_or(config.default_speed))?.facing(spec.facing);
        movement.sync_to(spec.position.tile.to_sub_tile(config.tile_size));
        let buffer = spec
            .input
            .map(|_| InputBuffer::from_config(config))
            .transpose()?;

        let id = match id {
            Some(id) => {
                self.create_with_id(id)?;
                id
            }
            None => self.create(),
        };

        let record = ActorRecord {
            position: Some(spec.position),
            movement: Some(movement),
            buffer,
            input: spec.input,
        };
        self.actors.insert(id, record);
        Ok(id)
    }

    pub fn destroy(&mut self, id: EntityId) -> Option<ActorRecord> {
        self.actors.remove(&id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.actors.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    /// Adds or replaces a component; returns the previous value.
    ///
    /// Returns `Err(component)` if the actor does not exist.
    pub fn insert<C: Component>(&mut self, id: EntityId, component: C) -> Result<Option<C>, C> {
        match self.actors.get_mut(&id) {
            Some(record) => Ok(C::slot_mut(record).replace(component)),
            None => Err(component),
        }
    }

    pub fn remove<C: Component>(&mut self, id: EntityId) -> Option<C> {
        self.actors.get_mut(&id).and_then(|record| C::slot_mut(record).take())
    }

    pub fn get<C: Component>(&self, id: EntityId) -> Option<&C> {
        self.actors
            .get(&id)
            .and_then(|record| C::slot(record).as_ref())
    }

    pub fn get_mut<C: Component>(&mut self, id: EntityId) -> Option<&mut C> {
        self.actors
            .get_mut(&id)
            .and_then(|record| C::slot_mut(record).as_mut())
    }

    pub fn actor(&self, id: EntityId) -> Option<&ActorRecord> {
        self.actors.get(&id)
    }

    pub fn actor_mut(&mut self, id: EntityId) -> Option<&mut ActorRecord> {
        self.actors.get_mut(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &ActorRecord)> {
        self.actors.iter().map(|(id, record)| (*id, record))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (EntityId, &mut ActorRecord)> {
        self.actors.iter_mut().map(|(id, record)| (*id, record))
    }

    /// Actors carrying a movement state, with their grid positions.
    pub fn movers(&self) -> impl Iterator<Item = (EntityId, &GridPosition, &MovementState)> {
        self.actors.iter().filter_map(|(id, record)| {
            Some((*id, record.position.as_ref()?, record.movement.as_ref()?))
        })
    }

    fn allocate_id(&mut self) -> EntityId {
        while self.actors.contains_key(&EntityId(self.next_entity_id)) {
            self.next_entity_id += 1;
        }
        let id = EntityId(self.next_entity_id);
        self.next_entity_id += 1;
        id
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}
