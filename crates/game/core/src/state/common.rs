use std::fmt;

/// Unique identifier for any actor tracked by the store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityId(pub u32);

impl EntityId {
    /// Reserved identifier for the controllable player character.
    pub const PLAYER: Self = Self(0);

    #[inline]
    pub const fn is_player(self) -> bool {
        self.0 == Self::PLAYER.0
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::PLAYER
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identifier of the map an actor currently stands on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapId(pub u16);

impl fmt::Display for MapId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "map:{}", self.0)
    }
}

/// Discrete grid position expressed in tile coordinates.
///
/// Screen-space convention: `y` grows downward, so north is `y - 1`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TilePosition {
    pub x: i32,
    pub y: i32,
}

impl TilePosition {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the tile `steps` tiles away along `(dx, dy)`, saturating at
    /// the edge of the coordinate range.
    pub const fn offset(self, (dx, dy): (i32, i32), steps: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx.saturating_mul(steps)),
            y: self.y.saturating_add(dy.saturating_mul(steps)),
        }
    }

    /// Like [`offset`](Self::offset), but `None` when the result does not
    /// fit in the coordinate range.
    pub const fn checked_offset(self, (dx, dy): (i32, i32), steps: i32) -> Option<Self> {
        let (Some(sx), Some(sy)) = (dx.checked_mul(steps), dy.checked_mul(steps)) else {
            return None;
        };
        match (self.x.checked_add(sx), self.y.checked_add(sy)) {
            (Some(x), Some(y)) => Some(Self { x, y }),
            _ => None,
        }
    }

    /// Top-left corner of the tile in sub-tile units.
    pub fn to_sub_tile(self, tile_size: f32) -> SubTilePosition {
        SubTilePosition::new(self.x as f32 * tile_size, self.y as f32 * tile_size)
    }
}

impl fmt::Display for TilePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Continuous (pixel-equivalent) position used for rendering interpolation.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SubTilePosition {
    pub x: f32,
    pub y: f32,
}

impl SubTilePosition {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Linear interpolation towards `to`; `t` is clamped to `[0, 1]`.
    pub fn lerp(self, to: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        Self {
            x: self.x + (to.x - self.x) * t,
            y: self.y + (to.y - self.y) * t,
        }
    }
}

/// Tile coordinates plus the map they belong to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridPosition {
    pub tile: TilePosition,
    pub map: MapId,
}

impl GridPosition {
    pub const fn new(x: i32, y: i32, map: MapId) -> Self {
        Self {
            tile: TilePosition::new(x, y),
            map,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lerp_clamps_progress() {
        let from = SubTilePosition::new(0.0, 0.0);
        let to = SubTilePosition::new(16.0, -16.0);

        assert_eq!(from.lerp(to, 0.5), SubTilePosition::new(8.0, -8.0));
        assert_eq!(from.lerp(to, 1.7), to);
        assert_eq!(from.lerp(to, -0.3), from);
    }

    #[test]
    fn offset_scales_by_steps() {
        let tile = TilePosition::new(5, 5);
        assert_eq!(tile.offset((0, -1), 1), TilePosition::new(5, 4));
        assert_eq!(tile.offset((1, 0), 2), TilePosition::new(7, 5));
        assert_eq!(tile.checked_offset((1, 0), 2), Some(TilePosition::new(7, 5)));
    }

    #[test]
    fn offset_at_the_coordinate_edge() {
        let edge = TilePosition::new(i32::MAX, i32::MIN);
        assert_eq!(edge.checked_offset((1, 0), 1), None);
        assert_eq!(edge.checked_offset((0, -1), 1), None);
        assert_eq!(edge.offset((1, 0), 1), edge);
        assert_eq!(
            edge.checked_offset((-1, 1), 1),
            Some(TilePosition::new(i32::MAX - 1, i32::MIN + 1))
        );
    }
}
