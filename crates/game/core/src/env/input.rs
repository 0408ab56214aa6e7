use arrayvec::ArrayVec;

use crate::movement::Direction;

/// Identifies a platform input source (keyboard, gamepad, replay script).
///
/// Every actor bound to the same source sees the same sampled direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InputSourceId(pub u8);

impl InputSourceId {
    pub const PRIMARY: Self = Self(0);
}

/// Converts platform input into a single pressed movement direction.
pub trait ActionReader {
    /// Direction currently held, or `Direction::None`. Called once per tick.
    fn current_direction(&mut self) -> Direction;
}

/// Upper bound on distinct input sources sampled per tick.
pub const MAX_INPUT_SOURCES: usize = 8;

/// Directions sampled from every input source for one tick.
#[derive(Clone, Debug, Default)]
pub struct SampledInput {
    samples: ArrayVec<(InputSourceId, Direction), MAX_INPUT_SOURCES>,
}

impl SampledInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Input where `source` holds `direction` and nothing else is registered.
    pub fn single(source: InputSourceId, direction: Direction) -> Self {
        let mut input = Self::new();
        input.record(source, direction);
        input
    }

    /// Stores the sample for `source`; returns `false` if the table is full.
    pub fn record(&mut self, source: InputSourceId, direction: Direction) -> bool {
        if let Some(slot) = self.samples.iter_mut().find(|(id, _)| *id == source) {
            slot.1 = direction;
            return true;
        }
        self.samples.try_push((source, direction)).is_ok()
    }

    /// Samples `reader` once and records the result.
    pub fn sample(&mut self, source: InputSourceId, reader: &mut dyn ActionReader) -> Direction {
        let direction = reader.current_direction();
        if !self.record(source, direction) {
            tracing::warn!(
                target: "overworld::input",
                source = source.0,
                "too many input sources, sample dropped"
            );
        }
        direction
    }

    /// Direction held on `source`; unknown sources read as `None`.
    pub fn direction(&self, source: InputSourceId) -> Direction {
        self.samples
            .iter()
            .find(|(id, _)| *id == source)
            .map(|(_, direction)| *direction)
            .unwrap_or_default()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Held(Direction);

    impl ActionReader for Held {
        fn current_direction(&mut self) -> Direction {
            self.0
        }
    }

    #[test]
    fn samples_are_per_source() {
        let mut input = SampledInput::new();
        input.sample(InputSourceId(0), &mut Held(Direction::North));
        input.sample(InputSourceId(1), &mut Held(Direction::West));

        assert_eq!(input.direction(InputSourceId(0)), Direction::North);
        assert_eq!(input.direction(InputSourceId(1)), Direction::West);
        assert_eq!(input.direction(InputSourceId(7)), Direction::None);
    }

    #[test]
    fn resampling_overwrites() {
        let mut input = SampledInput::single(InputSourceId::PRIMARY, Direction::East);
        input.record(InputSourceId::PRIMARY, Direction::None);
        assert_eq!(input.direction(InputSourceId::PRIMARY), Direction::None);
    }
}
