//! Content loaders for reading movement data from files.
//!
//! Each loader parses one file format into the plain data types exported at
//! the crate root; [`ContentFactory`] ties them to a data directory layout.

pub mod animation;
pub mod config;
pub mod factory;
pub mod map;
pub mod script;

pub use animation::AnimationLoader;
pub use config::ConfigLoader;
pub use factory::ContentFactory;
pub use map::MapLoader;
pub use script::ScriptLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
