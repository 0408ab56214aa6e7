//! Movement executor: advances each actor's state machine by one tick.
//!
//! Runs after the coordinator. Turns are resolved against animation
//! durations, pending intents are checked against collision and turned into
//! tile transitions, and transitions in progress are interpolated until they
//! snap onto their target tile.

use tracing::{debug, trace, warn};

use super::TickTime;
use super::report::{Anomaly, TickReport};
use crate::config::MovementConfig;
use crate::env::{MovementEnv, TileAccess};
use crate::movement::{
    BlockReason, Direction, InputBuffer, MovementBlocked, MovementCompleted, MovementEvent,
    MovementListener, MovementStarted, MovementState, MovementStatus, Presentation, Transition,
};
use crate::state::{EntityId, GridPosition, World};

#[derive(Clone, Copy, Debug)]
pub struct MovementExecutor {
    tile_size: f32,
    turn_fallback: f64,
}

/// Mutable view of the components the executor touches for one actor.
struct Mover<'w> {
    actor: EntityId,
    position: &'w mut GridPosition,
    movement: &'w mut MovementState,
    buffer: Option<&'w mut InputBuffer>,
}

impl MovementExecutor {
    pub fn new(config: &MovementConfig) -> Self {
        Self {
            tile_size: config.tile_size,
            turn_fallback: config.turn_fallback,
        }
    }

    pub fn run(
        &self,
        world: &mut World,
        env: MovementEnv<'_>,
        time: TickTime,
        listener: &mut dyn MovementListener,
        report: &mut TickReport,
    ) {
        for (actor, record) in world.iter_mut() {
            let Some(movement) = record.movement.as_mut() else {
                continue;
            };
            let Some(position) = record.position.as_mut() else {
                warn!(
                    target: "overworld::executor",
                    %actor,
                    "movement state without grid position, skipped this tick"
                );
                report.anomalies.push(Anomaly::MissingComponent {
                    actor,
                    component: "GridPosition",
                    system: "MovementExecutor",
                });
                continue;
            };

            let mut mover = Mover {
                actor,
                position,
                movement,
                buffer: record.buffer.as_mut(),
            };
            self.step(&mut mover, env, time, listener, report);
        }
    }

    fn step(
        &self,
        mover: &mut Mover<'_>,
        env: MovementEnv<'_>,
        time: TickTime,
        listener: &mut dyn MovementListener,
        report: &mut TickReport,
    ) {
        if mover.movement.locked {
            mover.movement.pending.clear();
        }

        match mover.movement.status {
            MovementStatus::TurningInPlace => {
                self.resolve_turn(mover, env, time, report);
                self.sync_to_grid(mover);
            }
            MovementStatus::Moving => {
                if let Some(carry) = mover.movement.advance(time.delta) {
                    self.arrive(mover, carry, env, time, listener, report);
                }
            }
            MovementStatus::Idle => {
                if let Some(direction) = mover.movement.pending.active_direction() {
                    self.try_start(mover, direction, 0.0, env, time, listener, report);
                }
                if !mover.movement.is_moving() {
                    self.sync_to_grid(mover);
                }
            }
        }
    }

    fn resolve_turn(
        &self,
        mover: &mut Mover<'_>,
        env: MovementEnv<'_>,
        time: TickTime,
        report: &mut TickReport,
    ) {
        let actor = mover.actor;
        let movement = &mut *mover.movement;

        let started = *movement.turn_start.get_or_insert(time.now);
        let mut elapsed = time.now - started;
        if elapsed < 0.0 {
            warn!(
                target: "overworld::executor",
                %actor,
                elapsed,
                "turn clock went backwards, restarting turn"
            );
            report
                .anomalies
                .push(Anomaly::NegativeElapsed { actor, seconds: elapsed });
            movement.turn_start = Some(time.now);
            elapsed = 0.0;
        }

        let animation = Presentation::Turn.animation_name(movement.facing);
        let (duration, fallback) = match env.animation().duration(actor, animation) {
            Some(seconds) if seconds.is_finite() && seconds >= 0.0 => (seconds, false),
            _ => (self.turn_fallback, true),
        };

        if elapsed >= duration {
            // Reported once, on the tick the fallback actually ends the turn.
            if fallback {
                warn!(
                    target: "overworld::executor",
                    %actor,
                    animation,
                    fallback = self.turn_fallback,
                    "no turn duration, used fallback"
                );
                report.anomalies.push(Anomaly::FallbackDuration {
                    actor,
                    animation,
                    fallback: self.turn_fallback,
                });
            }
            movement.finish_turn();
            debug!(
                target: "overworld::executor",
                %actor,
                facing = %movement.facing,
                "turn complete"
            );
        }
    }

    /// Snaps onto the target tile `carry` seconds before the end of this frame
    /// and chains into the next intent, handing it the leftover time.
    fn arrive(
        &self,
        mover: &mut Mover<'_>,
        carry: f32,
        env: MovementEnv<'_>,
        time: TickTime,
        listener: &mut dyn MovementListener,
        report: &mut TickReport,
    ) {
        let transition = mover.movement.transition;
        let arrived_at = time.now - f64::from(carry);
        mover.position.tile = transition.to;
        mover.movement.arrive();

        let completed = MovementCompleted {
            actor: mover.actor,
            map: mover.position.map,
            direction: transition.direction,
            old_tile: transition.from,
            new_tile: transition.to,
            elapsed_seconds: arrived_at - transition.started_at,
        };
        debug!(
            target: "overworld::executor",
            actor = %mover.actor,
            from = %transition.from,
            to = %transition.to,
            "tile transition complete"
        );
        listener.on_completed(&completed);
        report.events.push(MovementEvent::Completed(completed));

        let movement = &mut *mover.movement;
        if movement.locked {
            movement.pending.clear();
            return;
        }
        if !movement.pending.active {
            if let Some(direction) = mover
                .buffer
                .as_deref_mut()
                .and_then(|buffer| buffer.try_consume(time.now))
            {
                movement.pending.set(direction);
            }
        }
        if let Some(direction) = movement.pending.active_direction() {
            self.try_start(mover, direction, carry, env, time, listener, report);
        }
    }

    /// Attempts to begin a transition toward `direction`.
    ///
    /// Leaves the actor `Moving` on success, already `carry` seconds into the
    /// transition. On refusal the pending intent is cleared and a
    /// `MovementBlocked` is emitted.
    #[allow(clippy::too_many_arguments)]
    fn try_start(
        &self,
        mover: &mut Mover<'_>,
        direction: Direction,
        carry: f32,
        env: MovementEnv<'_>,
        time: TickTime,
        listener: &mut dyn MovementListener,
        report: &mut TickReport,
    ) {
        let from = mover.position.tile;
        let map = mover.position.map;
        let Some(next) = from.checked_offset(direction.delta(), 1) else {
            let edge = from.offset(direction.delta(), 1);
            self.block(mover, direction, edge, BlockReason::OutOfBounds, listener, report);
            return;
        };

        let (to, tiles, presentation) =
            match env.collision().can_enter(mover.actor, next, map, direction) {
                TileAccess::Walk => (next, 1, Presentation::Walk),
                TileAccess::Jump { landing } => (landing, 2, Presentation::Jump),
                TileAccess::Blocked(reason) => {
                    self.block(mover, direction, next, reason, listener, report);
                    return;
                }
            };

        let mut started = MovementStarted::new(mover.actor, map, direction, from, to, tiles > 1);
        listener.on_started(&mut started);
        if started.is_cancelled() {
            self.block(mover, direction, to, BlockReason::Cancelled, listener, report);
            return;
        }

        mover.movement.begin_transition(
            Transition {
                direction,
                from,
                to,
                start: from.to_sub_tile(self.tile_size),
                target: to.to_sub_tile(self.tile_size),
                started_at: time.now - f64::from(carry),
                tiles,
                presentation,
            },
            carry,
        );
        trace!(
            target: "overworld::executor",
            actor = %mover.actor,
            %direction,
            %from,
            %to,
            "tile transition started"
        );
        report.events.push(MovementEvent::Started(started));
    }

    fn block(
        &self,
        mover: &mut Mover<'_>,
        direction: Direction,
        attempted_tile: crate::state::TilePosition,
        reason: BlockReason,
        listener: &mut dyn MovementListener,
        report: &mut TickReport,
    ) {
        let movement = &mut *mover.movement;
        movement.pending.clear();
        movement.facing = direction;
        movement.status = MovementStatus::Idle;
        self.sync_to_grid(mover);

        let blocked = MovementBlocked {
            actor: mover.actor,
            map: mover.position.map,
            direction,
            attempted_tile,
            reason,
        };
        debug!(
            target: "overworld::executor",
            actor = %mover.actor,
            %direction,
            tile = %attempted_tile,
            %reason,
            "movement blocked"
        );
        listener.on_blocked(&blocked);
        report.events.push(MovementEvent::Blocked(blocked));
    }

    fn sync_to_grid(&self, mover: &mut Mover<'_>) {
        mover
            .movement
            .sync_to(mover.position.tile.to_sub_tile(self.tile_size));
    }
}

impl Default for MovementExecutor {
    fn default() -> Self {
        Self::new(&MovementConfig::default())
    }
}
