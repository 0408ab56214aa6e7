//! Input script loader.

use std::path::Path;

use overworld_core::Direction;

use crate::loaders::{LoadResult, read_file};
use crate::scripts::{Hold, InputScript};

/// Loader for input scripts from RON files.
///
/// File format: a list of `(start_tick, end_tick, direction)` holds.
///
/// ```ron
/// [(1, 40, East), (60, 62, North)]
/// ```
pub struct ScriptLoader;

impl ScriptLoader {
    pub fn load(path: &Path) -> LoadResult<InputScript> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Invalid input script {}: {}", path.display(), e))
    }

    pub fn parse(content: &str) -> LoadResult<InputScript> {
        let raw: Vec<(u64, u64, Direction)> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse input script RON: {}", e))?;

        let holds = raw
            .into_iter()
            .map(|(start, end, direction)| {
                if end < start {
                    anyhow::bail!("hold {:?} ends at {} before it starts at {}", direction, end, start);
                }
                Ok(Hold::new(start, end, direction))
            })
            .collect::<LoadResult<Vec<_>>>()?;

        Ok(InputScript::new(holds))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_holds() {
        let script = ScriptLoader::parse("[(1, 40, East), (60, 62, North)]").unwrap();
        assert_eq!(script.holds().len(), 2);
        assert_eq!(script.direction_at(61), Direction::North);
    }

    #[test]
    fn reversed_hold_is_rejected() {
        assert!(ScriptLoader::parse("[(10, 2, East)]").is_err());
    }
}
