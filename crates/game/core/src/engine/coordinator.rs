//! Input coordinator: turns sampled input into buffered intents.
//!
//! Runs before the executor every tick. For each input-driven actor it
//! decides between turning in place and buffering the press, then moves at
//! most one buffered press into the actor's pending-intent slot.

use tracing::{debug, trace, warn};

use super::TickTime;
use super::report::{Anomaly, TickReport};
use crate::env::SampledInput;
use crate::movement::{BufferRejection, Direction, InputBuffer, MovementState, MovementStatus};
use crate::state::{EntityId, World};

#[derive(Clone, Copy, Debug, Default)]
pub struct InputCoordinator;

impl InputCoordinator {
    pub fn new() -> Self {
        Self
    }

    /// Processes every actor bound to an input source.
    pub fn run(
        &self,
        world: &mut World,
        input: &SampledInput,
        time: TickTime,
        report: &mut TickReport,
    ) {
        for (actor, record) in world.iter_mut() {
            let Some(source) = record.input else {
                continue;
            };

            let missing = if record.position.is_none() {
                Some("GridPosition")
            } else if record.movement.is_none() {
                Some("MovementState")
            } else if record.buffer.is_none() {
                Some("InputBuffer")
            } else {
                None
            };
            if let Some(component) = missing {
                warn!(
                    target: "overworld::coordinator",
                    %actor,
                    component,
                    "input-driven actor missing component, skipped this tick"
                );
                report.anomalies.push(Anomaly::MissingComponent {
                    actor,
                    component,
                    system: "InputCoordinator",
                });
                continue;
            }

            if let (Some(movement), Some(buffer)) = (record.movement.as_mut(), record.buffer.as_mut())
            {
                let pressed = input.direction(source);
                self.coordinate(actor, movement, buffer, pressed, time, report);
            }
        }
    }

    /// Applies the turn/buffer/consume rules to a single actor.
    pub fn coordinate(
        &self,
        actor: EntityId,
        movement: &mut MovementState,
        buffer: &mut InputBuffer,
        pressed: Direction,
        time: TickTime,
        report: &mut TickReport,
    ) {
        if movement.locked {
            trace!(target: "overworld::coordinator", %actor, "locked, input ignored");
            return;
        }

        let mid_transition = movement.is_mid_transition(time.delta);

        if pressed.is_none() {
            // Releasing the key never interrupts a turn or a transition.
            if !movement.is_turning() && !movement.is_moving() {
                movement.status = MovementStatus::Idle;
            }
        } else if pressed != movement.last_movement
            && pressed != movement.facing
            && !movement.is_moving()
        {
            // The turn consumes the frame it was pressed in.
            movement.begin_turn(pressed, time.frame_start());
            debug!(
                target: "overworld::coordinator",
                %actor,
                direction = %pressed,
                "turning in place"
            );
        } else if movement.is_turning() && pressed == movement.facing {
            // Still the press that started the turn.
        } else if !mid_transition || pressed != buffer.last_buffered() {
            match buffer.add(pressed, time.now) {
                Ok(()) => trace!(
                    target: "overworld::coordinator",
                    %actor,
                    direction = %pressed,
                    "buffered"
                ),
                Err(BufferRejection::Full { capacity }) => {
                    warn!(
                        target: "overworld::coordinator",
                        %actor,
                        direction = %pressed,
                        capacity,
                        "input buffer full, press dropped"
                    );
                    report.anomalies.push(Anomaly::BufferOverflow {
                        actor,
                        direction: pressed,
                        capacity,
                    });
                }
                Err(BufferRejection::NoDirection) => {}
            }
        }

        if !mid_transition && !movement.is_turning() {
            if let Some(direction) = buffer.try_consume(time.now) {
                movement.pending.set(direction);
                trace!(
                    target: "overworld::coordinator",
                    %actor,
                    %direction,
                    "intent queued"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn time(tick: u32) -> TickTime {
        TickTime::new(f64::from(tick) / 60.0, DT)
    }

    fn facing(direction: Direction) -> (MovementState, InputBuffer) {
        (
            MovementState::default().facing(direction),
            InputBuffer::default(),
        )
    }

    #[test]
    fn new_direction_starts_a_turn_without_buffering() {
        let (mut movement, mut buffer) = facing(Direction::North);
        let mut report = TickReport::default();

        InputCoordinator.coordinate(
            EntityId::PLAYER,
            &mut movement,
            &mut buffer,
            Direction::South,
            time(1),
            &mut report,
        );

        assert_eq!(movement.status(), MovementStatus::TurningInPlace);
        assert_eq!(movement.facing_direction(), Direction::South);
        assert_eq!(movement.last_movement_direction(), Direction::North);
        assert!(movement.turn_start().is_some());
        assert!(buffer.is_empty());
        assert!(!movement.pending_intent().active);
    }

    #[test]
    fn facing_direction_queues_intent_same_tick() {
        let (mut movement, mut buffer) = facing(Direction::East);
        let mut report = TickReport::default();

        InputCoordinator.coordinate(
            EntityId::PLAYER,
            &mut movement,
            &mut buffer,
            Direction::East,
            time(1),
            &mut report,
        );

        assert_eq!(movement.status(), MovementStatus::Idle);
        assert_eq!(
            movement.pending_intent().active_direction(),
            Some(Direction::East)
        );
        assert!(buffer.is_empty());
    }

    #[test]
    fn release_does_not_cancel_turn() {
        let (mut movement, mut buffer) = facing(Direction::North);
        let mut report = TickReport::default();

        InputCoordinator.coordinate(
            EntityId::PLAYER,
            &mut movement,
            &mut buffer,
            Direction::West,
            time(1),
            &mut report,
        );
        InputCoordinator.coordinate(
            EntityId::PLAYER,
            &mut movement,
            &mut buffer,
            Direction::None,
            time(2),
            &mut report,
        );

        assert_eq!(movement.status(), MovementStatus::TurningInPlace);
    }

    #[test]
    fn press_held_through_turn_is_not_buffered() {
        let (mut movement, mut buffer) = facing(Direction::North);
        let mut report = TickReport::default();

        for tick in 1..=4 {
            InputCoordinator.coordinate(
                EntityId::PLAYER,
                &mut movement,
                &mut buffer,
                Direction::West,
                time(tick),
                &mut report,
            );
        }

        assert!(movement.is_turning());
        assert!(buffer.is_empty());
        assert!(report.anomalies.is_empty());
    }

    #[test]
    fn press_during_turn_is_buffered_but_not_consumed() {
        let (mut movement, mut buffer) = facing(Direction::North);
        let mut report = TickReport::default();

        InputCoordinator.coordinate(
            EntityId::PLAYER,
            &mut movement,
            &mut buffer,
            Direction::West,
            time(1),
            &mut report,
        );
        InputCoordinator.coordinate(
            EntityId::PLAYER,
            &mut movement,
            &mut buffer,
            Direction::North,
            time(2),
            &mut report,
        );

        assert!(movement.is_turning());
        assert_eq!(buffer.len(), 1);
        assert!(!movement.pending_intent().active);
    }

    #[test]
    fn locked_actor_ignores_input() {
        let (mut movement, mut buffer) = facing(Direction::North);
        movement.lock();
        let mut report = TickReport::default();

        InputCoordinator.coordinate(
            EntityId::PLAYER,
            &mut movement,
            &mut buffer,
            Direction::South,
            time(1),
            &mut report,
        );

        assert_eq!(movement.status(), MovementStatus::Idle);
        assert_eq!(movement.facing_direction(), Direction::North);
        assert!(buffer.is_empty());
    }

    #[test]
    fn missing_buffer_is_reported_not_fatal() {
        use crate::env::InputSourceId;
        use crate::state::{GridPosition, MapId};

        let mut world = World::new();
        let id = world.create();
        world.insert(id, GridPosition::new(0, 0, MapId(0))).unwrap();
        world.insert(id, MovementState::default()).unwrap();
        world.insert(id, InputSourceId::PRIMARY).unwrap();

        let mut report = TickReport::default();
        let input = SampledInput::single(InputSourceId::PRIMARY, Direction::South);
        InputCoordinator.run(&mut world, &input, time(1), &mut report);

        assert_eq!(
            report.anomalies,
            vec![Anomaly::MissingComponent {
                actor: id,
                component: "InputBuffer",
                system: "InputCoordinator",
            }]
        );
        assert!(!world.get::<MovementState>(id).unwrap().pending_intent().active);
    }
}
