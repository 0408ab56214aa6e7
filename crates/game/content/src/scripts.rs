//! Recorded input for replays and headless runs.
use overworld_core::Direction;

/// `direction` is held from `start_tick` up to, not including, `end_tick`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Hold {
    pub start_tick: u64,
    pub end_tick: u64,
    pub direction: Direction,
}

impl Hold {
    pub const fn new(start_tick: u64, end_tick: u64, direction: Direction) -> Self {
        Self {
            start_tick,
            end_tick,
            direction,
        }
    }

    pub const fn covers(&self, tick: u64) -> bool {
        self.start_tick <= tick && tick < self.end_tick
    }
}

/// Timeline of key holds. Overlapping holds resolve to the most recent press.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InputScript {
    holds: Vec<Hold>,
}

impl InputScript {
    pub fn new(mut holds: Vec<Hold>) -> Self {
        holds.retain(|hold| hold.start_tick < hold.end_tick && !hold.direction.is_none());
        holds.sort_by_key(|hold| hold.start_tick);
        Self { holds }
    }

    /// Direction held on `tick`.
    pub fn direction_at(&self, tick: u64) -> Direction {
        self.holds
            .iter()
            .rev()
            .find(|hold| hold.covers(tick))
            .map(|hold| hold.direction)
            .unwrap_or_default()
    }

    /// First tick after which nothing is held.
    pub fn end_tick(&self) -> u64 {
        self.holds.iter().map(|hold| hold.end_tick).max().unwrap_or(0)
    }

    pub fn holds(&self) -> &[Hold] {
        &self.holds
    }

    pub fn is_empty(&self) -> bool {
        self.holds.is_empty()
    }
}
