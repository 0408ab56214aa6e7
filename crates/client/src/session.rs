//! One headless run: load content, replay the script, summarize.
use std::fmt;

use anyhow::{Result, anyhow};
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use overworld_content::ContentFactory;
use overworld_core::{Direction, EntityId, GridPosition, InputSourceId, MovementState, MoverSpec};
use overworld_runtime::{
    Event, Runtime, RuntimeConfig, ScriptedReader, StepCounter, StepTally, Topic, TraceListener,
};

use crate::cli::Cli;

/// What the player did during a run.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub ticks: u64,
    pub seconds: f64,
    pub map: String,
    pub final_position: GridPosition,
    pub facing: Direction,
    pub tally: StepTally,
    /// Notifications the bus consumer saw; lower than emitted if it lagged.
    pub observed: u64,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} ticks ({:.2}s) on {} ({})",
            self.ticks, self.seconds, self.map, self.final_position.map
        )?;
        writeln!(
            f,
            "player ended at {} facing {}",
            self.final_position.tile, self.facing
        )?;
        write!(
            f,
            "tiles walked: {}, ledge hops: {}, blocked attempts: {}, notices observed: {}",
            self.tally.tiles, self.tally.jumps, self.tally.blocked, self.observed
        )
    }
}

pub async fn run(cli: &Cli) -> Result<Summary> {
    let factory = ContentFactory::new(&cli.data_dir);

    let mut config = RuntimeConfig::from_env()?;
    if let Some(rate) = cli.frame_rate {
        config = config.with_overrides(|var| {
            (var == RuntimeConfig::FRAME_RATE_VAR).then(|| rate.to_string())
        })?;
    }
    config.movement = factory.load_config()?;

    let map_id = factory.load_map(&cli.map)?.id();
    let script = factory.load_script(&cli.script)?;
    let ticks = cli.ticks.unwrap_or_else(|| {
        let one_second = (1.0 / config.frame_step).round() as u64;
        script.end_tick() + one_second
    });

    let counter = StepCounter::new();
    let mut runtime = Runtime::builder()
        .config(config)
        .maps(factory.load_maps()?)
        .animations(factory.load_animations()?)
        .reader(InputSourceId::PRIMARY, ScriptedReader::new(script))
        .listener(Box::new(counter.clone()))
        .listener(Box::new(TraceListener))
        .build()?;

    let sprite = if runtime.oracles().animation().table().has_sprite(&cli.sprite) {
        Some(cli.sprite.as_str())
    } else {
        warn!(sprite = %cli.sprite, "sprite has no animations, turns use the fallback duration");
        None
    };
    let spec = MoverSpec::at(GridPosition {
        tile: cli.spawn,
        map: map_id,
    })
    .facing(cli.facing)
    .controlled_by(InputSourceId::PRIMARY);
    let player = runtime.spawn(Some(EntityId::PLAYER), spec, sprite)?;

    let presenter = present(&runtime);
    info!(map = %cli.map, script = %cli.script, ticks, "simulation started");
    for _ in 0..ticks {
        runtime.step();
        tokio::task::yield_now().await;
    }

    let final_position = *runtime
        .world()
        .get::<GridPosition>(player)
        .ok_or_else(|| anyhow!("player {} lost its position", player))?;
    let facing = runtime
        .world()
        .get::<MovementState>(player)
        .map(MovementState::facing_direction)
        .unwrap_or_default();
    let seconds = runtime.clock().now();

    // Dropping the runtime closes the bus so the presenter can finish.
    drop(runtime);
    let observed = presenter.await?;

    info!(ticks, observed, "simulation finished");
    Ok(Summary {
        ticks,
        seconds,
        map: cli.map.clone(),
        final_position,
        facing,
        tally: counter.tally(player),
        observed,
    })
}

/// Stand-in for a renderer: consumes movement notices off the bus.
fn present(runtime: &Runtime) -> JoinHandle<u64> {
    let mut notices = runtime.subscribe(Topic::Movement);
    tokio::spawn(async move {
        let mut observed = 0;
        loop {
            match notices.recv().await {
                Ok(Event::Movement(notice)) => {
                    observed += 1;
                    debug!(
                        tick = notice.tick,
                        actor = %notice.actor(),
                        event = ?notice.event,
                        "notice"
                    );
                }
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "presenter lagged behind the simulation");
                }
                Err(RecvError::Closed) => break,
            }
        }
        observed
    })
}
