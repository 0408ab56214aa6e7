use std::fs;
use std::path::Path;

use overworld_content::{ContentFactory, Hold, InputScript, MapLayout, Terrain};
use overworld_core::{
    Anomaly, BlockReason, Direction, EntityId, GridPosition, InputBuffer, InputSourceId, MapId,
    MovementEvent, MovementStarted, MovementState, MovementStatus, MoverSpec, TileBehavior,
    TilePosition,
};
use overworld_runtime::{
    Event, Key, KeyboardReader, Runtime, RuntimeConfig, RuntimeListener, ScriptedReader,
    StepCounter, Topic, TraceListener,
};

const TOWN: MapId = MapId(1);

fn town() -> MapLayout {
    MapLayout::open(TOWN, 10, 10)
        .with_terrain(TilePosition::new(6, 6), Terrain::Wall)
        .with_behavior(TilePosition::new(2, 3), TileBehavior::LEDGE_SOUTH)
}

fn scripted(holds: &[(u64, u64, Direction)]) -> ScriptedReader {
    ScriptedReader::new(InputScript::new(
        holds
            .iter()
            .map(|(start, end, direction)| Hold::new(*start, *end, *direction))
            .collect(),
    ))
}

fn player_at(x: i32, y: i32, facing: Direction) -> MoverSpec {
    MoverSpec::at(GridPosition::new(x, y, TOWN))
        .facing(facing)
        .controlled_by(InputSourceId::PRIMARY)
}

fn tile_of(runtime: &Runtime, id: EntityId) -> TilePosition {
    runtime.world().get::<GridPosition>(id).unwrap().tile
}

fn status_of(runtime: &Runtime, id: EntityId) -> MovementStatus {
    runtime.world().get::<MovementState>(id).unwrap().status()
}

fn drain_movement(receiver: &mut tokio::sync::broadcast::Receiver<Event>) -> Vec<MovementEvent> {
    let mut events = Vec::new();
    while let Ok(event) = receiver.try_recv() {
        if let Event::Movement(notice) = event {
            events.push(notice.event);
        }
    }
    events
}

/// Cancels every start that would enter a column at or beyond `x`.
struct Fence {
    x: i32,
}

impl RuntimeListener for Fence {
    fn name(&self) -> &'static str {
        "fence"
    }

    fn priority(&self) -> i32 {
        -10
    }

    fn on_started(&mut self, event: &mut MovementStarted) {
        if event.target_tile.x >= self.x {
            event.cancel();
        }
    }
}

#[test]
fn scripted_hold_walks_three_tiles() {
    let counter = StepCounter::new();
    let mut runtime = Runtime::builder()
        .map(town())
        .reader(InputSourceId::PRIMARY, scripted(&[(1, 46, Direction::East)]))
        .listener(Box::new(counter.clone()))
        .listener(Box::new(TraceListener))
        .build()
        .unwrap();
    let player = runtime
        .spawn(Some(EntityId::PLAYER), player_at(1, 1, Direction::East), None)
        .unwrap();

    runtime.run_for(60);

    assert_eq!(tile_of(&runtime, player), TilePosition::new(4, 1));
    assert_eq!(status_of(&runtime, player), MovementStatus::Idle);
    assert_eq!(counter.tally(player).tiles, 3);
    assert_eq!(counter.tally(player).blocked, 0);
}

#[test]
fn ledge_tap_hops_two_tiles() {
    let counter = StepCounter::new();
    let mut runtime = Runtime::builder()
        .map(town())
        .reader(InputSourceId::PRIMARY, scripted(&[(1, 2, Direction::South)]))
        .listener(Box::new(counter.clone()))
        .build()
        .unwrap();
    let player = runtime
        .spawn(Some(EntityId::PLAYER), player_at(2, 2, Direction::South), None)
        .unwrap();

    let report = runtime.step();
    assert!(matches!(
        report.events.as_slice(),
        [MovementEvent::Started(started)]
            if started.jump && started.target_tile == TilePosition::new(2, 4)
    ));

    runtime.run_for(40);

    assert_eq!(tile_of(&runtime, player), TilePosition::new(2, 4));
    let tally = counter.tally(player);
    assert_eq!(tally.tiles, 2);
    assert_eq!(tally.jumps, 1);
}

#[test]
fn standing_actor_blocks_the_way() {
    let mut runtime = Runtime::builder()
        .map(town())
        .reader(InputSourceId::PRIMARY, scripted(&[(1, 40, Direction::East)]))
        .build()
        .unwrap();
    let player = runtime
        .spawn(Some(EntityId::PLAYER), player_at(1, 1, Direction::East), None)
        .unwrap();
    let villager = runtime
        .spawn(None, MoverSpec::at(GridPosition::new(3, 1, TOWN)), None)
        .unwrap();
    let mut movement = runtime.subscribe(Topic::Movement);

    runtime.run_for(30);

    assert_eq!(tile_of(&runtime, player), TilePosition::new(2, 1));
    let blocked: Vec<_> = drain_movement(&mut movement)
        .into_iter()
        .filter_map(|event| match event {
            MovementEvent::Blocked(blocked) => Some(blocked),
            _ => None,
        })
        .collect();
    assert!(!blocked.is_empty());
    assert!(blocked.iter().all(|b| {
        b.reason == BlockReason::Occupied(villager) && b.attempted_tile == TilePosition::new(3, 1)
    }));
}

#[test]
fn first_actor_to_start_claims_a_contested_tile() {
    let mut runtime = Runtime::builder().map(town()).build().unwrap();
    let west = runtime
        .spawn(None, MoverSpec::at(GridPosition::new(1, 5, TOWN)), None)
        .unwrap();
    let east = runtime
        .spawn(None, MoverSpec::at(GridPosition::new(3, 5, TOWN)), None)
        .unwrap();
    assert!(west < east);

    for (id, direction) in [(west, Direction::East), (east, Direction::West)] {
        let movement = runtime.world_mut().get_mut::<MovementState>(id).unwrap();
        assert!(movement.request_move(direction, 1.0 / 60.0));
    }

    let report = runtime.step().clone();

    assert!(matches!(
        report.events.as_slice(),
        [MovementEvent::Started(started), MovementEvent::Blocked(blocked)]
            if started.actor == west
                && blocked.actor == east
                && blocked.reason == BlockReason::Occupied(west)
    ));
    assert_eq!(
        runtime.oracles().collision().occupant(TOWN, TilePosition::new(2, 5)),
        Some(west)
    );
    assert_eq!(status_of(&runtime, east), MovementStatus::Idle);
}

#[test]
fn listener_veto_stops_at_the_fence() {
    let counter = StepCounter::new();
    let mut runtime = Runtime::builder()
        .map(town())
        .reader(InputSourceId::PRIMARY, scripted(&[(1, 25, Direction::East)]))
        .listener(Box::new(Fence { x: 3 }))
        .listener(Box::new(counter.clone()))
        .build()
        .unwrap();
    let player = runtime
        .spawn(Some(EntityId::PLAYER), player_at(1, 1, Direction::East), None)
        .unwrap();

    let mut cancelled = 0;
    for _ in 0..30 {
        let report = runtime.step();
        cancelled += report
            .events
            .iter()
            .filter(|event| {
                matches!(event, MovementEvent::Blocked(b) if b.reason == BlockReason::Cancelled)
            })
            .count();
    }

    assert_eq!(tile_of(&runtime, player), TilePosition::new(2, 1));
    assert!(cancelled > 0);
    assert_eq!(counter.tally(player).blocked as usize, cancelled);
    assert_eq!(
        runtime.oracles().collision().occupant(TOWN, TilePosition::new(3, 1)),
        None
    );

    assert_eq!(runtime.listeners_mut().unregister("fence"), 1);
}

#[test]
fn keyboard_press_moves_facing_actor_immediately() {
    let keyboard = KeyboardReader::default();
    let keys = keyboard.handle();
    let mut runtime = Runtime::builder()
        .map(town())
        .reader(InputSourceId::PRIMARY, keyboard)
        .build()
        .unwrap();
    let player = runtime
        .spawn(Some(EntityId::PLAYER), player_at(4, 4, Direction::West), None)
        .unwrap();

    keys.press(Key::A);
    let report = runtime.step();
    assert!(matches!(
        report.events.as_slice(),
        [MovementEvent::Started(started)] if started.target_tile == TilePosition::new(3, 4)
    ));

    keys.release(Key::A);
    runtime.run_for(20);
    assert_eq!(tile_of(&runtime, player), TilePosition::new(3, 4));
    assert_eq!(status_of(&runtime, player), MovementStatus::Idle);
}

#[test]
fn missing_buffer_is_published_as_diagnostic() {
    let mut runtime = Runtime::builder()
        .map(town())
        .reader(InputSourceId::PRIMARY, scripted(&[(1, 5, Direction::North)]))
        .build()
        .unwrap();
    let player = runtime
        .spawn(Some(EntityId::PLAYER), player_at(5, 5, Direction::North), None)
        .unwrap();
    runtime.world_mut().remove::<InputBuffer>(player);
    let mut diagnostics = runtime.subscribe(Topic::Diagnostics);

    runtime.step();

    match diagnostics.try_recv() {
        Ok(Event::Diagnostics(event)) => {
            assert_eq!(event.tick, 1);
            assert!(matches!(
                event.anomaly,
                Anomaly::MissingComponent { actor, .. } if actor == player
            ));
        }
        other => panic!("expected a diagnostic, got {other:?}"),
    }
    assert_eq!(tile_of(&runtime, player), TilePosition::new(5, 5));
}

fn write(dir: &Path, name: &str, content: &str) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

#[test]
fn content_directory_drives_a_full_run() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "movement.toml", "buffer_window = 0.25\n");
    write(
        dir.path(),
        "animations.ron",
        r#"{ "hero": { "go_fast_east": [4, 4, 1], "go_east": [8, 8] } }"#,
    );
    write(
        dir.path(),
        "maps/town.ron",
        "(id: 1, dimensions: (6, 6), tiles: [(5, 2, Wall)], behaviors: [])",
    );
    write(dir.path(), "scripts/tap_east.ron", "[(1, 3, East)]");

    let factory = ContentFactory::new(dir.path());
    let config = RuntimeConfig {
        movement: factory.load_config().unwrap(),
        ..RuntimeConfig::default()
    };
    let script = factory.load_script("tap_east").unwrap();
    let mut runtime = Runtime::builder()
        .config(config)
        .maps(factory.load_maps().unwrap())
        .animations(factory.load_animations().unwrap())
        .reader(InputSourceId::PRIMARY, ScriptedReader::new(script))
        .build()
        .unwrap();
    assert_eq!(runtime.config().movement.buffer_window, 0.25);

    let player = runtime
        .spawn(
            Some(EntityId::PLAYER),
            player_at(2, 2, Direction::North),
            Some("hero"),
        )
        .unwrap();

    // go_fast_east lasts 9 frames, longer than the 8-frame fallback.
    runtime.run_for(8);
    assert_eq!(status_of(&runtime, player), MovementStatus::TurningInPlace);

    runtime.run_for(4);
    let movement = runtime.world().get::<MovementState>(player).unwrap();
    assert_eq!(movement.status(), MovementStatus::Idle);
    assert_eq!(movement.facing_direction(), Direction::East);
    assert_eq!(tile_of(&runtime, player), TilePosition::new(2, 2));
}
