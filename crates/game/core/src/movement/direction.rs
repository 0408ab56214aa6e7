use strum::{EnumIter, EnumString, IntoStaticStr};

/// Orthogonal movement direction. `None` means "no direction pressed".
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, EnumIter, EnumString, IntoStaticStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Direction {
    #[default]
    None,
    North,
    South,
    East,
    West,
}

impl Direction {
    pub const CARDINALS: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    #[inline]
    pub const fn is_none(self) -> bool {
        matches!(self, Direction::None)
    }

    pub const fn opposite(self) -> Self {
        match self {
            Direction::None => Direction::None,
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
        }
    }

    /// Unit tile delta; north is negative y.
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::None => (0, 0),
            Direction::North => (0, -1),
            Direction::South => (0, 1),
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
        }
    }

    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

impl core::fmt::Display for Direction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the animation collaborator should show for a direction.
///
/// The core never picks frames; it only names the animation it needs a
/// duration for or wants rendered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, EnumIter, IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Presentation {
    /// Standing still, facing a direction.
    Face,
    /// One tile transition.
    #[default]
    Walk,
    /// Turn-in-place.
    Turn,
    /// Hop over a one-way ledge.
    Jump,
}

impl Presentation {
    /// Animation name for this presentation, e.g. `go_fast_south`.
    ///
    /// `Direction::None` resolves to the south-facing variant.
    pub const fn animation_name(self, direction: Direction) -> &'static str {
        use Direction as D;
        match (self, direction) {
            (Presentation::Face, D::North) => "face_north",
            (Presentation::Face, D::East) => "face_east",
            (Presentation::Face, D::West) => "face_west",
            (Presentation::Face, D::South | D::None) => "face_south",
            (Presentation::Walk, D::North) => "go_north",
            (Presentation::Walk, D::East) => "go_east",
            (Presentation::Walk, D::West) => "go_west",
            (Presentation::Walk, D::South | D::None) => "go_south",
            (Presentation::Turn, D::North) => "go_fast_north",
            (Presentation::Turn, D::East) => "go_fast_east",
            (Presentation::Turn, D::West) => "go_fast_west",
            (Presentation::Turn, D::South | D::None) => "go_fast_south",
            (Presentation::Jump, D::North) => "jump_north",
            (Presentation::Jump, D::East) => "jump_east",
            (Presentation::Jump, D::West) => "jump_west",
            (Presentation::Jump, D::South | D::None) => "jump_south",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn opposite_is_an_involution() {
        for direction in Direction::iter() {
            assert_eq!(direction.opposite().opposite(), direction);
        }
    }

    #[test]
    fn deltas_cancel_with_opposites() {
        for direction in Direction::CARDINALS {
            let (dx, dy) = direction.delta();
            let (ox, oy) = direction.opposite().delta();
            assert_eq!((dx + ox, dy + oy), (0, 0));
            assert_eq!(dx.abs() + dy.abs(), 1);
        }
        assert_eq!(Direction::None.delta(), (0, 0));
    }

    #[test]
    fn parses_names_case_insensitively() {
        assert_eq!("east".parse::<Direction>(), Ok(Direction::East));
        assert_eq!("North".parse::<Direction>(), Ok(Direction::North));
        assert!("up".parse::<Direction>().is_err());
    }

    #[test]
    fn animation_names_follow_presentation() {
        assert_eq!(Presentation::Face.animation_name(Direction::North), "face_north");
        assert_eq!(Presentation::Walk.animation_name(Direction::West), "go_west");
        assert_eq!(Presentation::Turn.animation_name(Direction::South), "go_fast_south");
        assert_eq!(Presentation::Jump.animation_name(Direction::East), "jump_east");
        assert_eq!(Presentation::Face.animation_name(Direction::None), "face_south");
    }

    #[test]
    fn every_animation_name_ends_with_its_direction() {
        for presentation in Presentation::iter() {
            for direction in Direction::CARDINALS {
                let name = presentation.animation_name(direction);
                assert!(name.ends_with(direction.as_str()), "{name}");
            }
        }
    }
}
