//! Movement configuration loader.

use std::path::Path;

use overworld_core::MovementConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for movement configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load and validate a [`MovementConfig`] from a TOML file.
    ///
    /// Missing keys take their defaults, so an empty file is valid.
    pub fn load(path: &Path) -> LoadResult<MovementConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Invalid movement config {}: {}", path.display(), e))
    }

    pub fn parse(content: &str) -> LoadResult<MovementConfig> {
        let config: MovementConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;
        config.validate()?;
        Ok(config)
    }
}
