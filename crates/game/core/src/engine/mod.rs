//! Per-tick movement pipeline.
//!
//! The [`MovementEngine`] owns the two movement systems and enforces their
//! ordering: the [`InputCoordinator`] runs to completion for every actor
//! before the [`MovementExecutor`] touches any of them, so an intent buffered
//! this tick is visible to the executor this tick.

mod coordinator;
mod executor;
mod report;

pub use coordinator::InputCoordinator;
pub use executor::MovementExecutor;
pub use report::{Anomaly, TickReport};

use tracing::warn;

use crate::config::{ConfigError, MovementConfig};
use crate::env::{MovementEnv, SampledInput};
use crate::movement::MovementListener;
use crate::state::World;

/// Game time handed to both systems for one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TickTime {
    /// Game time at the end of this tick, in seconds.
    pub now: f64,
    /// Length of this tick, in seconds.
    pub delta: f32,
}

impl TickTime {
    pub const fn new(now: f64, delta: f32) -> Self {
        Self { now, delta }
    }

    /// Game time at which this tick began.
    pub fn frame_start(&self) -> f64 {
        self.now - f64::from(self.delta)
    }

    fn is_valid(&self) -> bool {
        self.delta.is_finite() && self.delta >= 0.0 && self.now.is_finite()
    }
}

/// Monotonic game clock advanced once per tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GameClock {
    now: f64,
    ticks: u64,
}

impl GameClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> f64 {
        self.now
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Advances by `delta` seconds. Invalid deltas advance the tick count only.
    pub fn advance(&mut self, delta: f32) -> TickTime {
        self.ticks += 1;
        if delta.is_finite() && delta > 0.0 {
            self.now += f64::from(delta);
        }
        TickTime::new(self.now, delta)
    }
}

pub struct MovementEngine {
    config: MovementConfig,
    coordinator: InputCoordinator,
    executor: MovementExecutor,
    ticks: u64,
    report: TickReport,
}

impl MovementEngine {
    /// # Errors
    ///
    /// Returns the first invalid field of `config`.
    pub fn new(config: MovementConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            coordinator: InputCoordinator::new(),
            executor: MovementExecutor::new(&config),
            config,
            ticks: 0,
            report: TickReport::default(),
        })
    }

    pub fn config(&self) -> &MovementConfig {
        &self.config
    }

    /// Number of ticks run so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Report of the most recent tick.
    pub fn last_report(&self) -> &TickReport {
        &self.report
    }

    /// Runs one tick: the coordinator over every actor, then the executor.
    ///
    /// Never fails. Anomalies are corrected in place, logged, and listed in
    /// the returned report.
    pub fn tick(
        &mut self,
        world: &mut World,
        env: MovementEnv<'_>,
        input: &SampledInput,
        time: TickTime,
        listener: &mut dyn MovementListener,
    ) -> &TickReport {
        self.ticks += 1;
        self.report.reset(self.ticks, time.now);

        let time = if time.is_valid() {
            time
        } else {
            warn!(
                target: "overworld::engine",
                delta = time.delta,
                now = time.now,
                "invalid tick time, treating delta as 0"
            );
            self.report
                .anomalies
                .push(Anomaly::InvalidDelta { delta: time.delta });
            let now = if time.now.is_finite() { time.now } else { 0.0 };
            TickTime::new(now, 0.0)
        };

        self.coordinator
            .run(world, input, time, &mut self.report);
        self.executor
            .run(world, env, time, listener, &mut self.report);

        &self.report
    }
}

impl core::fmt::Debug for MovementEngine {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MovementEngine")
            .field("config", &self.config)
            .field("ticks", &self.ticks)
            .finish_non_exhaustive()
    }
}
