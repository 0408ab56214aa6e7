//! Keyboard-style reader fed by platform key events.
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use overworld_core::{ActionReader, Direction};

/// Physical keys the default bindings understand.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    W,
    A,
    S,
    D,
}

/// Key-to-direction table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyBindings {
    map: HashMap<Key, Direction>,
}

impl KeyBindings {
    pub fn empty() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    #[must_use]
    pub fn bind(mut self, key: Key, direction: Direction) -> Self {
        self.map.insert(key, direction);
        self
    }

    pub fn direction(&self, key: Key) -> Option<Direction> {
        self.map.get(&key).copied()
    }
}

/// Arrow keys and WASD.
impl Default for KeyBindings {
    fn default() -> Self {
        Self::empty()
            .bind(Key::Up, Direction::North)
            .bind(Key::Down, Direction::South)
            .bind(Key::Left, Direction::West)
            .bind(Key::Right, Direction::East)
            .bind(Key::W, Direction::North)
            .bind(Key::S, Direction::South)
            .bind(Key::A, Direction::West)
            .bind(Key::D, Direction::East)
    }
}

#[derive(Debug, Default)]
struct HeldKeys {
    /// Bound keys currently down, oldest press first.
    order: Vec<Key>,
}

/// Cloneable handle the platform event loop uses to report key changes.
#[derive(Clone, Debug, Default)]
pub struct KeyboardHandle {
    held: Arc<Mutex<HeldKeys>>,
}

impl KeyboardHandle {
    pub fn press(&self, key: Key) {
        let mut held = self.held.lock().unwrap_or_else(PoisonError::into_inner);
        held.order.retain(|k| *k != key);
        held.order.push(key);
    }

    pub fn release(&self, key: Key) {
        self.held
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .order
            .retain(|k| *k != key);
    }

    pub fn release_all(&self) {
        self.held
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .order
            .clear();
    }
}

/// Reports the direction of the most recently pressed bound key still held.
pub struct KeyboardReader {
    bindings: KeyBindings,
    handle: KeyboardHandle,
}

impl KeyboardReader {
    pub fn new(bindings: KeyBindings) -> Self {
        Self {
            bindings,
            handle: KeyboardHandle::default(),
        }
    }

    pub fn handle(&self) -> KeyboardHandle {
        self.handle.clone()
    }
}

impl Default for KeyboardReader {
    fn default() -> Self {
        Self::new(KeyBindings::default())
    }
}

impl ActionReader for KeyboardReader {
    fn current_direction(&mut self) -> Direction {
        let held = self
            .handle
            .held
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        held.order
            .iter()
            .rev()
            .find_map(|key| self.bindings.direction(*key))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn most_recent_press_wins() {
        let mut reader = KeyboardReader::default();
        let keys = reader.handle();

        keys.press(Key::Right);
        keys.press(Key::Up);
        assert_eq!(reader.current_direction(), Direction::North);

        keys.release(Key::Up);
        assert_eq!(reader.current_direction(), Direction::East);

        keys.release_all();
        assert_eq!(reader.current_direction(), Direction::None);
    }

    #[test]
    fn unbound_keys_are_ignored() {
        let mut reader = KeyboardReader::new(KeyBindings::empty().bind(Key::W, Direction::North));
        let keys = reader.handle();

        keys.press(Key::W);
        keys.press(Key::Left);
        assert_eq!(reader.current_direction(), Direction::North);
    }
}
