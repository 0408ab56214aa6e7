//! Content factory for loading every movement asset from a data directory.

use std::path::{Path, PathBuf};

use overworld_core::MovementConfig;

use crate::animations::AnimationTable;
use crate::loaders::{AnimationLoader, ConfigLoader, LoadResult, MapLoader, ScriptLoader};
use crate::maps::MapLayout;
use crate::scripts::InputScript;

/// Content factory that loads all movement content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── movement.toml
/// ├── animations.ron
/// ├── maps/
/// │   └── route_101.ron
/// └── scripts/
///     └── stroll.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load movement configuration from `movement.toml`.
    ///
    /// A missing file yields the default configuration.
    pub fn load_config(&self) -> LoadResult<MovementConfig> {
        let path = self.data_dir.join("movement.toml");
        if !path.exists() {
            tracing::debug!(
                target: "content::factory",
                path = %path.display(),
                "no movement config, using defaults"
            );
            return Ok(MovementConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load animation timings from `animations.ron`.
    pub fn load_animations(&self) -> LoadResult<AnimationTable> {
        AnimationLoader::load(&self.data_dir.join("animations.ron"))
    }

    /// Load a map from `maps/{map_name}.ron`.
    pub fn load_map(&self, map_name: &str) -> LoadResult<MapLayout> {
        let path = self.data_dir.join("maps").join(format!("{}.ron", map_name));
        MapLoader::load(&path)
    }

    /// Load every `.ron` file under `maps/`, sorted by file name.
    pub fn load_maps(&self) -> LoadResult<Vec<MapLayout>> {
        let dir = self.data_dir.join("maps");
        let entries = std::fs::read_dir(&dir)
            .map_err(|e| anyhow::anyhow!("Failed to list maps in {}: {}", dir.display(), e))?;

        let mut paths = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "ron") {
                paths.push(path);
            }
        }
        paths.sort();

        let maps = paths
            .iter()
            .map(|path| MapLoader::load(path))
            .collect::<LoadResult<Vec<_>>>()?;

        let mut ids: Vec<_> = maps.iter().map(MapLayout::id).collect();
        ids.sort();
        if let Some(pair) = ids.windows(2).find(|pair| pair[0] == pair[1]) {
            anyhow::bail!("duplicate map id {} in {}", pair[0], dir.display());
        }

        Ok(maps)
    }

    /// Load an input script from `scripts/{script_name}.ron`.
    pub fn load_script(&self, script_name: &str) -> LoadResult<InputScript> {
        let path = self
            .data_dir
            .join("scripts")
            .join(format!("{}.ron", script_name));
        ScriptLoader::load(&path)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use overworld_core::{MapId, TilePosition};

    fn write(dir: &Path, name: &str, content: &str) {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
    }

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
    }

    #[test]
    fn missing_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let factory = ContentFactory::new(dir.path());
        assert_eq!(factory.load_config().unwrap(), MovementConfig::default());
    }

    #[test]
    fn loads_all_maps_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "maps/b.ron", "(id: 2, dimensions: (3, 3))");
        write(dir.path(), "maps/a.ron", "(id: 1, dimensions: (4, 4), tiles: [(1, 1, Wall)])");
        write(dir.path(), "maps/notes.txt", "ignored");

        let maps = ContentFactory::new(dir.path()).load_maps().unwrap();
        let ids: Vec<_> = maps.iter().map(MapLayout::id).collect();
        assert_eq!(ids, vec![MapId(1), MapId(2)]);
        assert!(!maps[0].is_enterable(TilePosition::new(1, 1), overworld_core::Direction::North));
    }

    #[test]
    fn duplicate_map_ids_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "maps/a.ron", "(id: 1, dimensions: (2, 2))");
        write(dir.path(), "maps/b.ron", "(id: 1, dimensions: (2, 2))");

        let err = ContentFactory::new(dir.path()).load_maps().unwrap_err();
        assert!(err.to_string().contains("duplicate"), "{err}");
    }
}
