//! Animation table loader.

use std::collections::HashMap;
use std::path::Path;

use crate::animations::AnimationTable;
use crate::loaders::{LoadResult, read_file};

/// Loader for animation timing tables from RON files.
///
/// File format: `{ sprite: { animation: [frame durations at 60 Hz] } }`
///
/// ```ron
/// {
///     "player": { "go_fast_south": [4, 4], "go_south": [8, 8] },
/// }
/// ```
pub struct AnimationLoader;

impl AnimationLoader {
    pub fn load(path: &Path) -> LoadResult<AnimationTable> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Invalid animation table {}: {}", path.display(), e))
    }

    pub fn parse(content: &str) -> LoadResult<AnimationTable> {
        let raw: HashMap<String, HashMap<String, Vec<u16>>> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse animation RON: {}", e))?;

        let mut table = AnimationTable::new();
        for (sprite, animations) in raw {
            for (animation, frames) in animations {
                if frames.is_empty() {
                    tracing::warn!(
                        target: "content::animations",
                        %sprite,
                        %animation,
                        "animation has no frames, skipped"
                    );
                    continue;
                }
                table.insert_frames(&sprite, &animation, &frames);
            }
        }
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations_are_frame_sums() {
        let table = AnimationLoader::parse(
            r#"{ "player": { "go_fast_west": [2, 2, 2, 2], "face_west": [] } }"#,
        )
        .unwrap();

        let seconds = table.duration("player", "go_fast_west").unwrap();
        assert!((seconds - 8.0 / 60.0).abs() < 1e-12);
        assert_eq!(table.duration("player", "face_west"), None);
    }
}
