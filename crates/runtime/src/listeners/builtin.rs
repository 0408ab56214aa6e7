//! Listeners shipped with the runtime.
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, trace};

use overworld_core::{EntityId, MovementBlocked, MovementCompleted, MovementStarted};

use super::RuntimeListener;

/// Logs every notification; runs last.
#[derive(Clone, Copy, Debug, Default)]
pub struct TraceListener;

impl RuntimeListener for TraceListener {
    fn name(&self) -> &'static str {
        "trace"
    }

    fn priority(&self) -> i32 {
        100
    }

    fn on_started(&mut self, event: &mut MovementStarted) {
        trace!(
            target: "runtime::listeners",
            actor = %event.actor,
            from = %event.start_tile,
            to = %event.target_tile,
            jump = event.jump,
            cancelled = event.is_cancelled(),
            "started"
        );
    }

    fn on_completed(&mut self, event: &MovementCompleted) {
        debug!(
            target: "runtime::listeners",
            actor = %event.actor,
            map = %event.map,
            tile = %event.new_tile,
            elapsed = event.elapsed_seconds,
            "completed"
        );
    }

    fn on_blocked(&mut self, event: &MovementBlocked) {
        debug!(
            target: "runtime::listeners",
            actor = %event.actor,
            tile = %event.attempted_tile,
            reason = %event.reason,
            "blocked"
        );
    }
}

/// Per-actor tallies kept by [`StepCounter`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepTally {
    pub tiles: u64,
    pub jumps: u64,
    pub blocked: u64,
}

/// Counts completed tiles, ledge hops, and blocked attempts per actor.
///
/// Clone the counter before registering it to keep a reading handle.
#[derive(Clone, Debug, Default)]
pub struct StepCounter {
    tallies: Arc<Mutex<BTreeMap<EntityId, StepTally>>>,
}

impl StepCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tally(&self, actor: EntityId) -> StepTally {
        self.tallies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&actor)
            .copied()
            .unwrap_or_default()
    }

    pub fn snapshot(&self) -> BTreeMap<EntityId, StepTally> {
        self.tallies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn update(&self, actor: EntityId, apply: impl FnOnce(&mut StepTally)) {
        let mut tallies = self.tallies.lock().unwrap_or_else(PoisonError::into_inner);
        apply(tallies.entry(actor).or_default());
    }
}

impl RuntimeListener for StepCounter {
    fn name(&self) -> &'static str {
        "step_counter"
    }

    fn priority(&self) -> i32 {
        50
    }

    fn on_completed(&mut self, event: &MovementCompleted) {
        let distance = (event.new_tile.x - event.old_tile.x).abs()
            + (event.new_tile.y - event.old_tile.y).abs();
        self.update(event.actor, |tally| {
            tally.tiles += distance.unsigned_abs() as u64;
            if distance > 1 {
                tally.jumps += 1;
            }
        });
    }

    fn on_blocked(&mut self, event: &MovementBlocked) {
        self.update(event.actor, |tally| tally.blocked += 1);
    }
}
