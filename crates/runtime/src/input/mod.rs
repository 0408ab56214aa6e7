//! Action readers: per-tick samplers of platform or recorded input.
//!
//! The runtime samples every registered reader exactly once per tick, before
//! the movement systems run, and hands the result to the core as a
//! [`overworld_core::SampledInput`].
mod keyboard;

pub use keyboard::{Key, KeyBindings, KeyboardHandle, KeyboardReader};

use overworld_content::InputScript;
use overworld_core::{ActionReader, Direction};

/// Replays an [`InputScript`], one script tick per sample.
///
/// The first sample reads tick 1, matching the runtime's tick numbering.
#[derive(Clone, Debug)]
pub struct ScriptedReader {
    script: InputScript,
    tick: u64,
}

impl ScriptedReader {
    pub fn new(script: InputScript) -> Self {
        Self { script, tick: 0 }
    }

    /// True once every hold in the script has ended.
    pub fn is_finished(&self) -> bool {
        self.tick >= self.script.end_tick()
    }

    pub fn script(&self) -> &InputScript {
        &self.script
    }
}

impl ActionReader for ScriptedReader {
    fn current_direction(&mut self) -> Direction {
        self.tick += 1;
        self.script.direction_at(self.tick)
    }
}

/// Reader that never presses anything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoInput;

impl ActionReader for NoInput {
    fn current_direction(&mut self) -> Direction {
        Direction::None
    }
}
