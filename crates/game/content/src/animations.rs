//! Sprite animation timing tables.
use std::collections::HashMap;

/// Frame rate the frame counts in animation data are authored at.
pub const FRAME_RATE: f64 = 60.0;

/// Per-sprite animation lengths, in seconds.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AnimationTable {
    sprites: HashMap<String, HashMap<String, f64>>,
}

impl AnimationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an animation from per-frame durations given in 60 Hz frames.
    pub fn insert_frames(&mut self, sprite: &str, animation: &str, frames: &[u16]) {
        let total: u32 = frames.iter().map(|&f| u32::from(f)).sum();
        self.insert_seconds(sprite, animation, f64::from(total) / FRAME_RATE);
    }

    pub fn insert_seconds(&mut self, sprite: &str, animation: &str, seconds: f64) {
        self.sprites
            .entry(sprite.to_owned())
            .or_default()
            .insert(animation.to_owned(), seconds);
    }

    pub fn duration(&self, sprite: &str, animation: &str) -> Option<f64> {
        self.sprites.get(sprite)?.get(animation).copied()
    }

    pub fn has_sprite(&self, sprite: &str) -> bool {
        self.sprites.contains_key(sprite)
    }

    pub fn sprites(&self) -> impl Iterator<Item = &str> {
        self.sprites.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.sprites.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_convert_to_seconds() {
        let mut table = AnimationTable::new();
        table.insert_frames("player", "go_fast_south", &[4, 4]);

        let seconds = table.duration("player", "go_fast_south").unwrap();
        assert!((seconds - 8.0 / 60.0).abs() < 1e-12);
        assert_eq!(table.duration("player", "go_fast_north"), None);
        assert_eq!(table.duration("npc", "go_fast_south"), None);
    }
}
