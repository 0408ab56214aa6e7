//! Time-windowed FIFO of pending directional intents.
//!
//! The buffer keeps a short memory of presses so a direction tapped slightly
//! before the actor can act is not lost. Entries expire by age and are purged
//! both on insert and on read. Overflow drops the newest press; the oldest
//! entries are never overwritten.

use arrayvec::ArrayVec;

use super::Direction;
use crate::config::{ConfigError, MovementConfig};
use crate::error::{CoreError, ErrorSeverity};

const MAX: usize = MovementConfig::MAX_BUFFER_CAPACITY;

/// One buffered press.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BufferedInput {
    pub direction: Direction,
    /// Game time of the press, in seconds.
    pub timestamp: f64,
    /// First instant at which the press is no longer valid.
    pub expires_at: f64,
}

/// Reason an [`InputBuffer::add`] call did not store the press.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BufferRejection {
    #[error("cannot buffer an empty direction")]
    NoDirection,

    #[error("input buffer full ({capacity} entries), dropping newest press")]
    Full { capacity: usize },
}

impl CoreError for BufferRejection {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Recoverable
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NoDirection => "buffer.no_direction",
            Self::Full { .. } => "buffer.full",
        }
    }
}

#[derive(Clone, Debug)]
pub struct InputBuffer {
    entries: ArrayVec<BufferedInput, MAX>,
    capacity: usize,
    window: f64,
    last_buffered: Direction,
    dropped: u64,
}

impl InputBuffer {
    /// Creates a buffer holding at most `capacity` presses for `window` seconds.
    pub fn new(capacity: usize, window: f64) -> Result<Self, ConfigError> {
        if capacity == 0 || capacity > MAX {
            return Err(ConfigError::BufferCapacity { capacity, max: MAX });
        }
        if !(window.is_finite() && window > 0.0) {
            return Err(ConfigError::BufferWindow(window));
        }
        Ok(Self {
            entries: ArrayVec::new(),
            capacity,
            window,
            last_buffered: Direction::None,
            dropped: 0,
        })
    }

    pub fn from_config(config: &MovementConfig) -> Result<Self, ConfigError> {
        Self::new(config.buffer_capacity, config.buffer_window)
    }

    /// Stores a press made at `now`.
    pub fn add(&mut self, direction: Direction, now: f64) -> Result<(), BufferRejection> {
        if direction.is_none() {
            return Err(BufferRejection::NoDirection);
        }

        self.purge_expired(now);

        if self.entries.len() >= self.capacity {
            self.dropped += 1;
            return Err(BufferRejection::Full {
                capacity: self.capacity,
            });
        }

        // capacity <= MAX, so the push cannot fail
        self.entries.push(BufferedInput {
            direction,
            timestamp: now,
            expires_at: now + self.window,
        });
        self.last_buffered = direction;
        Ok(())
    }

    /// Removes and returns the oldest press that is still valid at `now`.
    pub fn try_consume(&mut self, now: f64) -> Option<Direction> {
        self.purge_expired(now);
        if self.entries.is_empty() {
            return None;
        }
        Some(self.entries.remove(0).direction)
    }

    /// Returns the oldest valid press without removing it.
    pub fn try_peek(&mut self, now: f64) -> Option<Direction> {
        self.purge_expired(now);
        self.entries.first().map(|entry| entry.direction)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.last_buffered = Direction::None;
    }

    /// Direction of the most recent accepted press, even if already consumed.
    pub fn last_buffered(&self) -> Direction {
        self.last_buffered
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Total number of presses rejected because the buffer was full.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Buffered presses in arrival order, including ones that may have expired.
    pub fn entries(&self) -> impl Iterator<Item = &BufferedInput> {
        self.entries.iter()
    }

    fn purge_expired(&mut self, now: f64) {
        self.entries.retain(|entry| now < entry.expires_at);
    }
}

impl Default for InputBuffer {
    fn default() -> Self {
        Self {
            entries: ArrayVec::new(),
            capacity: MovementConfig::DEFAULT_BUFFER_CAPACITY,
            window: MovementConfig::DEFAULT_BUFFER_WINDOW,
            last_buffered: Direction::None,
            dropped: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directions(buffer: &InputBuffer) -> Vec<Direction> {
        buffer.entries().map(|entry| entry.direction).collect()
    }

    #[test]
    fn rejects_none() {
        let mut buffer = InputBuffer::default();
        assert_eq!(
            buffer.add(Direction::None, 0.0),
            Err(BufferRejection::NoDirection)
        );
        assert!(buffer.is_empty());
    }

    #[test]
    fn sixth_press_within_window_is_dropped() {
        let mut buffer = InputBuffer::new(5, 0.2).unwrap();
        let presses = [
            Direction::North,
            Direction::East,
            Direction::South,
            Direction::West,
            Direction::North,
            Direction::East,
        ];

        let mut rejected = Vec::new();
        for (i, direction) in presses.into_iter().enumerate() {
            if let Err(rejection) = buffer.add(direction, i as f64 * 0.002) {
                rejected.push((i, rejection));
            }
        }

        assert_eq!(rejected, vec![(5, BufferRejection::Full { capacity: 5 })]);
        assert_eq!(directions(&buffer), presses[..5].to_vec());
        assert_eq!(buffer.dropped(), 1);
    }

    #[test]
    fn entries_expire_at_window_boundary() {
        let mut buffer = InputBuffer::new(5, 0.2).unwrap();
        let t0 = 1.0;
        buffer.add(Direction::West, t0).unwrap();

        assert_eq!(buffer.try_peek(t0 + 0.19), Some(Direction::West));
        assert_eq!(buffer.try_consume(t0 + 0.2), None);
        assert!(buffer.is_empty());
    }

    #[test]
    fn consume_returns_oldest_first() {
        let mut buffer = InputBuffer::default();
        buffer.add(Direction::North, 0.0).unwrap();
        buffer.add(Direction::East, 0.01).unwrap();

        assert_eq!(buffer.try_peek(0.02), Some(Direction::North));
        assert_eq!(buffer.try_consume(0.02), Some(Direction::North));
        assert_eq!(buffer.try_consume(0.02), Some(Direction::East));
        assert_eq!(buffer.try_consume(0.02), None);
    }

    #[test]
    fn insert_purges_expired_before_capacity_check() {
        let mut buffer = InputBuffer::new(2, 0.2).unwrap();
        buffer.add(Direction::North, 0.0).unwrap();
        buffer.add(Direction::North, 0.05).unwrap();

        // both expired by now, so the buffer has room again
        buffer.add(Direction::South, 0.5).unwrap();
        assert_eq!(directions(&buffer), vec![Direction::South]);
    }

    #[test]
    fn last_buffered_survives_consume_but_not_clear() {
        let mut buffer = InputBuffer::default();
        buffer.add(Direction::East, 0.0).unwrap();
        buffer.try_consume(0.0);
        assert_eq!(buffer.last_buffered(), Direction::East);

        buffer.clear();
        assert_eq!(buffer.last_buffered(), Direction::None);
    }

    #[test]
    fn new_validates_arguments() {
        assert!(InputBuffer::new(0, 0.2).is_err());
        assert!(InputBuffer::new(MAX + 1, 0.2).is_err());
        assert!(InputBuffer::new(3, 0.0).is_err());
    }
}
