//! High-level runtime orchestrator.
//!
//! The runtime owns the actor store, the movement engine, the oracles, and
//! every registered action reader. Each [`Runtime::step`] is one fixed frame:
//! sample input, refresh occupancy, run the core tick, then fan the tick's
//! notifications out to the event bus.

use std::collections::HashSet;

use tokio::sync::broadcast;
use tracing::{debug, info};

use overworld_content::{AnimationTable, MapLayout};
use overworld_core::env::MAX_INPUT_SOURCES;
use overworld_core::{
    ActionReader, EntityId, GameClock, InputSourceId, MovementBlocked, MovementCompleted,
    MovementConfig, MovementEngine, MovementEnv, MovementListener, MovementStarted, MoverSpec,
    SampledInput, TickReport, World,
};

use crate::error::{Result, RuntimeError};
use crate::events::{DiagnosticEvent, Event, EventBus, MovementNotice, Topic};
use crate::listeners::{ListenerRegistry, RuntimeListener};
use crate::oracle::{AnimationTableOracle, MapCollisionOracle, OracleManager};

/// Runtime configuration shared by the orchestrator and the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeConfig {
    pub movement: MovementConfig,
    /// Seconds of game time per step.
    pub frame_step: f32,
    pub event_buffer_size: usize,
}

impl RuntimeConfig {
    /// Frames per second; overrides `frame_step` with its reciprocal.
    pub const FRAME_RATE_VAR: &'static str = "OVERWORLD_FRAME_RATE";
    /// Per-topic event bus capacity.
    pub const EVENT_BUFFER_VAR: &'static str = "OVERWORLD_EVENT_BUFFER";

    /// Defaults with overrides from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::InvalidEnv`] when a variable is set but does
    /// not parse, or the resulting config fails validation.
    pub fn from_env() -> Result<Self> {
        Self::default().with_overrides(|var| std::env::var(var).ok())
    }

    /// Applies overrides resolved by `lookup` (variable name to raw value).
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(raw) = lookup(Self::FRAME_RATE_VAR) {
            let rate = raw
                .trim()
                .parse::<f32>()
                .ok()
                .filter(|rate| rate.is_finite() && *rate > 0.0)
                .ok_or_else(|| RuntimeError::InvalidEnv {
                    var: Self::FRAME_RATE_VAR,
                    value: raw.clone(),
                })?;
            self.frame_step = 1.0 / rate;
        }

        if let Some(raw) = lookup(Self::EVENT_BUFFER_VAR) {
            self.event_buffer_size = raw
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|size| *size > 0)
                .ok_or_else(|| RuntimeError::InvalidEnv {
                    var: Self::EVENT_BUFFER_VAR,
                    value: raw.clone(),
                })?;
        }

        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        self.movement.validate()?;
        if !self.frame_step.is_finite() || self.frame_step <= 0.0 {
            return Err(RuntimeError::FrameStep(self.frame_step));
        }
        Ok(())
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            movement: MovementConfig::default(),
            frame_step: 1.0 / 60.0,
            event_buffer_size: 100,
        }
    }
}

type BoxedReader = Box<dyn ActionReader + Send>;

/// Main runtime that drives the movement simulation one frame at a time.
pub struct Runtime {
    config: RuntimeConfig,
    world: World,
    engine: MovementEngine,
    oracles: OracleManager,
    readers: Vec<(InputSourceId, BoxedReader)>,
    listeners: ListenerRegistry,
    bus: EventBus,
    clock: GameClock,
    input: SampledInput,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Places a movable actor on a loaded map.
    ///
    /// `sprite` binds the actor to an animation set; without one the
    /// builder's default sprite (if any) supplies turn durations.
    pub fn spawn(
        &mut self,
        id: Option<EntityId>,
        spec: MoverSpec,
        sprite: Option<&str>,
    ) -> Result<EntityId> {
        let map = spec.position.map;
        if !self.oracles.collision().has_map(map) {
            return Err(RuntimeError::UnknownMap(map));
        }
        if let Some(sprite) = sprite {
            if !self.oracles.animation().table().has_sprite(sprite) {
                return Err(RuntimeError::UnknownSprite(sprite.to_string()));
            }
        }

        let tile = spec.position.tile;
        let id = self.world.spawn_mover(id, spec, self.engine.config())?;
        if let Some(sprite) = sprite {
            self.oracles.animation_mut().bind(id, sprite);
        }
        debug!(target: "runtime", actor = %id, %map, %tile, "spawned mover");
        Ok(id)
    }

    /// Removes an actor and its sprite binding. Returns `false` if unknown.
    pub fn despawn(&mut self, id: EntityId) -> bool {
        self.oracles.animation_mut().unbind(id);
        self.world.destroy(id).is_some()
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn oracles(&self) -> &OracleManager {
        &self.oracles
    }

    pub fn clock(&self) -> &GameClock {
        &self.clock
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// Subscribe to one topic of runtime events
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.bus.subscribe(topic)
    }

    pub fn listeners_mut(&mut self) -> &mut ListenerRegistry {
        &mut self.listeners
    }

    /// Replaces or adds the reader for `source`.
    pub fn set_reader(
        &mut self,
        source: InputSourceId,
        reader: impl ActionReader + Send + 'static,
    ) -> Result<()> {
        insert_reader(&mut self.readers, source, Box::new(reader))
    }

    /// Advances the simulation by one frame.
    pub fn step(&mut self) -> &TickReport {
        let time = self.clock.advance(self.config.frame_step);

        self.input.clear();
        for (source, reader) in self.readers.iter_mut() {
            self.input.sample(*source, reader.as_mut());
        }

        self.oracles.collision.refresh_occupancy(self.world.movers());

        let mut dispatcher = Dispatcher {
            listeners: &mut self.listeners,
            collision: &self.oracles.collision,
        };
        let env = MovementEnv::new(&self.oracles.collision, &self.oracles.animation);
        self.engine
            .tick(&mut self.world, env, &self.input, time, &mut dispatcher);

        let report = self.engine.last_report();
        for event in &report.events {
            self.bus.publish(Event::Movement(MovementNotice {
                tick: report.tick,
                time: report.now,
                event: event.clone(),
            }));
        }
        for anomaly in &report.anomalies {
            self.bus.publish(Event::Diagnostics(DiagnosticEvent {
                tick: report.tick,
                anomaly: anomaly.clone(),
            }));
        }
        report
    }

    /// Runs `ticks` frames and returns the number of notifications emitted.
    pub fn run_for(&mut self, ticks: u64) -> usize {
        (0..ticks).map(|_| self.step().events.len()).sum()
    }
}

impl std::fmt::Debug for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runtime")
            .field("config", &self.config)
            .field("actors", &self.world.len())
            .field("readers", &self.readers.len())
            .field("listeners", &self.listeners.len())
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}

/// Forwards notifications to the registry and reserves the target tile of
/// every start that survives the listeners.
struct Dispatcher<'a> {
    listeners: &'a mut ListenerRegistry,
    collision: &'a MapCollisionOracle,
}

impl MovementListener for Dispatcher<'_> {
    fn on_started(&mut self, event: &mut MovementStarted) {
        self.listeners.on_started(event);
        if !event.is_cancelled() {
            self.collision
                .reserve(event.actor, event.map, event.target_tile);
        }
    }

    fn on_completed(&mut self, event: &MovementCompleted) {
        self.listeners.on_completed(event);
    }

    fn on_blocked(&mut self, event: &MovementBlocked) {
        self.listeners.on_blocked(event);
    }
}

fn insert_reader(
    readers: &mut Vec<(InputSourceId, BoxedReader)>,
    source: InputSourceId,
    reader: BoxedReader,
) -> Result<()> {
    if let Some(slot) = readers.iter_mut().find(|(id, _)| *id == source) {
        slot.1 = reader;
        return Ok(());
    }
    if readers.len() >= MAX_INPUT_SOURCES {
        return Err(RuntimeError::TooManyInputSources(readers.len() + 1));
    }
    readers.push((source, reader));
    Ok(())
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    maps: Vec<MapLayout>,
    animations: AnimationTable,
    default_sprite: Option<String>,
    readers: Vec<(InputSourceId, BoxedReader)>,
    listeners: Vec<Box<dyn RuntimeListener>>,
    overflowed_readers: usize,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            maps: Vec::new(),
            animations: AnimationTable::new(),
            default_sprite: None,
            readers: Vec::new(),
            listeners: Vec::new(),
            overflowed_readers: 0,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn map(mut self, map: MapLayout) -> Self {
        self.maps.push(map);
        self
    }

    pub fn maps(mut self, maps: impl IntoIterator<Item = MapLayout>) -> Self {
        self.maps.extend(maps);
        self
    }

    pub fn animations(mut self, animations: AnimationTable) -> Self {
        self.animations = animations;
        self
    }

    /// Sprite used for actors spawned without one.
    pub fn default_sprite(mut self, sprite: impl Into<String>) -> Self {
        self.default_sprite = Some(sprite.into());
        self
    }

    /// Registers the action reader sampled for `source` every tick.
    ///
    /// A later reader for the same source replaces the earlier one.
    pub fn reader(
        mut self,
        source: InputSourceId,
        reader: impl ActionReader + Send + 'static,
    ) -> Self {
        if insert_reader(&mut self.readers, source, Box::new(reader)).is_err() {
            self.overflowed_readers += 1;
        }
        self
    }

    /// Add a movement listener. Listeners run in priority order.
    pub fn listener(mut self, listener: Box<dyn RuntimeListener>) -> Self {
        self.listeners.push(listener);
        self
    }

    /// # Errors
    ///
    /// Fails on invalid configuration, no or duplicate maps, an unknown
    /// default sprite, or more readers than the core can sample.
    pub fn build(self) -> Result<Runtime> {
        self.config.validate()?;

        if self.overflowed_readers > 0 {
            return Err(RuntimeError::TooManyInputSources(
                self.readers.len() + self.overflowed_readers,
            ));
        }
        if self.maps.is_empty() {
            return Err(RuntimeError::MissingMaps);
        }
        let mut seen = HashSet::new();
        for map in &self.maps {
            if !seen.insert(map.id()) {
                return Err(RuntimeError::DuplicateMap(map.id()));
            }
        }

        let mut animation = AnimationTableOracle::new(self.animations);
        if let Some(sprite) = self.default_sprite {
            if !animation.table().has_sprite(&sprite) {
                return Err(RuntimeError::UnknownSprite(sprite));
            }
            animation = animation.with_default_sprite(sprite);
        }

        let engine = MovementEngine::new(self.config.movement.clone())?;
        let oracles = OracleManager::new(MapCollisionOracle::new(self.maps), animation);
        let bus = EventBus::with_capacity(self.config.event_buffer_size);

        info!(
            target: "runtime",
            maps = seen.len(),
            readers = self.readers.len(),
            listeners = self.listeners.len(),
            frame_step = self.config.frame_step,
            "runtime built"
        );

        Ok(Runtime {
            config: self.config,
            world: World::new(),
            engine,
            oracles,
            readers: self.readers,
            listeners: ListenerRegistry::with_listeners(self.listeners),
            bus,
            clock: GameClock::new(),
            input: SampledInput::new(),
        })
    }
}

impl Default for RuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use overworld_core::{CoreError, MapId};

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| vars.get(var).cloned()
    }

    #[test]
    fn overrides_apply_frame_rate_and_buffer() {
        let config = RuntimeConfig::default()
            .with_overrides(lookup(&[
                (RuntimeConfig::FRAME_RATE_VAR, "30"),
                (RuntimeConfig::EVENT_BUFFER_VAR, "8"),
            ]))
            .unwrap();
        assert!((config.frame_step - 1.0 / 30.0).abs() < 1e-6);
        assert_eq!(config.event_buffer_size, 8);
    }

    #[test]
    fn unset_overrides_keep_defaults() {
        let config = RuntimeConfig::default().with_overrides(lookup(&[])).unwrap();
        assert_eq!(config, RuntimeConfig::default());
    }

    #[test]
    fn invalid_frame_rate_is_rejected() {
        let err = RuntimeConfig::default()
            .with_overrides(lookup(&[(RuntimeConfig::FRAME_RATE_VAR, "-5")]))
            .unwrap_err();
        assert!(matches!(
            err,
            RuntimeError::InvalidEnv { var: RuntimeConfig::FRAME_RATE_VAR, .. }
        ));
        assert_eq!(err.error_code(), "runtime.invalid_env");
    }

    #[test]
    fn build_requires_a_map() {
        let err = Runtime::builder().build().unwrap_err();
        assert!(matches!(err, RuntimeError::MissingMaps));
    }

    #[test]
    fn build_rejects_duplicate_maps() {
        let err = Runtime::builder()
            .map(MapLayout::open(MapId(1), 4, 4))
            .map(MapLayout::open(MapId(1), 2, 2))
            .build()
            .unwrap_err();
        assert!(matches!(err, RuntimeError::DuplicateMap(MapId(1))));
    }

    #[test]
    fn build_rejects_unknown_default_sprite() {
        let err = Runtime::builder()
            .map(MapLayout::open(MapId(1), 4, 4))
            .default_sprite("ghost")
            .build()
            .unwrap_err();
        assert!(matches!(err, RuntimeError::UnknownSprite(sprite) if sprite == "ghost"));
    }

    #[test]
    fn readers_for_the_same_source_replace_each_other() {
        use crate::input::NoInput;

        let mut builder = Runtime::builder().map(MapLayout::open(MapId(1), 4, 4));
        for _ in 0..(MAX_INPUT_SOURCES + 2) {
            builder = builder.reader(InputSourceId::PRIMARY, NoInput);
        }
        let runtime = builder.build().unwrap();
        assert_eq!(runtime.readers.len(), 1);
    }

    #[test]
    fn too_many_sources_fail_the_build() {
        use crate::input::NoInput;

        let mut builder = Runtime::builder().map(MapLayout::open(MapId(1), 4, 4));
        for source in 0..=MAX_INPUT_SOURCES {
            builder = builder.reader(InputSourceId(source as u8), NoInput);
        }
        let err = builder.build().unwrap_err();
        assert!(matches!(
            err,
            RuntimeError::TooManyInputSources(n) if n == MAX_INPUT_SOURCES + 1
        ));
    }

    #[test]
    fn spawn_rejects_unknown_map_and_sprite() {
        use overworld_core::GridPosition;

        let mut runtime = Runtime::builder()
            .map(MapLayout::open(MapId(1), 4, 4))
            .build()
            .unwrap();

        let err = runtime
            .spawn(None, MoverSpec::at(GridPosition::new(0, 0, MapId(9))), None)
            .unwrap_err();
        assert!(matches!(err, RuntimeError::UnknownMap(MapId(9))));

        let err = runtime
            .spawn(
                None,
                MoverSpec::at(GridPosition::new(0, 0, MapId(1))),
                Some("ghost"),
            )
            .unwrap_err();
        assert!(matches!(err, RuntimeError::UnknownSprite(_)));
        assert!(runtime.world().is_empty());
    }
}
