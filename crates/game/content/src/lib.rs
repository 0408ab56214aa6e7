//! Data-driven movement content and its loaders.
//!
//! This crate houses static content the runtime's collaborators serve:
//! - Map layouts: terrain and tile behaviors (RON)
//! - Animation timing tables (RON)
//! - Input scripts for headless runs and replays (RON)
//! - Movement configuration (TOML)
//!
//! Content is consumed by runtime oracles and never appears in actor state.

pub mod animations;
pub mod maps;
pub mod scripts;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use animations::{AnimationTable, FRAME_RATE};
pub use maps::{ELEVATION_ANY, ELEVATION_BRIDGE, MAX_ELEVATION, MapLayout, Terrain};
pub use scripts::{Hold, InputScript};

#[cfg(feature = "loaders")]
pub use loaders::{
    AnimationLoader, ConfigLoader, ContentFactory, LoadResult, MapLoader, ScriptLoader,
};
