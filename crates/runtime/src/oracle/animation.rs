//! Animation timings served through [`overworld_core::AnimationOracle`].
use std::collections::HashMap;

use overworld_content::AnimationTable;
use overworld_core::{AnimationOracle, EntityId};

/// AnimationOracle implementation over a loaded [`AnimationTable`].
///
/// Each actor is bound to a sprite; unbound actors use the default sprite
/// when one is set.
pub struct AnimationTableOracle {
    table: AnimationTable,
    bindings: HashMap<EntityId, String>,
    default_sprite: Option<String>,
}

impl AnimationTableOracle {
    pub fn new(table: AnimationTable) -> Self {
        Self {
            table,
            bindings: HashMap::new(),
            default_sprite: None,
        }
    }

    #[must_use]
    pub fn with_default_sprite(mut self, sprite: impl Into<String>) -> Self {
        self.default_sprite = Some(sprite.into());
        self
    }

    pub fn table(&self) -> &AnimationTable {
        &self.table
    }

    pub fn bind(&mut self, actor: EntityId, sprite: impl Into<String>) {
        self.bindings.insert(actor, sprite.into());
    }

    pub fn unbind(&mut self, actor: EntityId) -> Option<String> {
        self.bindings.remove(&actor)
    }

    pub fn sprite_of(&self, actor: EntityId) -> Option<&str> {
        self.bindings
            .get(&actor)
            .or(self.default_sprite.as_ref())
            .map(String::as_str)
    }
}

impl AnimationOracle for AnimationTableOracle {
    fn duration(&self, actor: EntityId, animation: &str) -> Option<f64> {
        self.table.duration(self.sprite_of(actor)?, animation)
    }
}
