//! Command-line arguments for the headless overworld runner.
use std::path::PathBuf;

use clap::Parser;
use overworld_core::{Direction, TilePosition};

/// Replays an input script against a map and reports how the player moved.
#[derive(Debug, Parser)]
#[command(name = "overworld")]
#[command(about = "Headless tile-grid movement simulation", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Content directory holding movement.toml, animations.ron, maps/ and scripts/
    #[arg(long, default_value = "data")]
    pub data_dir: PathBuf,

    /// Map file name under maps/, without extension
    #[arg(long, default_value = "town")]
    pub map: String,

    /// Input script name under scripts/, without extension
    #[arg(long, default_value = "stroll")]
    pub script: String,

    /// Player spawn tile as `x,y`
    #[arg(long, default_value = "1,1", value_parser = parse_tile)]
    pub spawn: TilePosition,

    /// Direction the player faces at spawn
    #[arg(long, default_value = "south", value_parser = parse_direction)]
    pub facing: Direction,

    /// Sprite whose animation timings the player uses
    #[arg(long, default_value = "player")]
    pub sprite: String,

    /// Frames to simulate; defaults to the script length plus one second
    #[arg(long)]
    pub ticks: Option<u64>,

    /// Simulation rate in Hz; overrides OVERWORLD_FRAME_RATE
    #[arg(long)]
    pub frame_rate: Option<f32>,
}

fn parse_tile(raw: &str) -> Result<TilePosition, String> {
    let (x, y) = raw
        .split_once(',')
        .ok_or_else(|| format!("expected `x,y`, got {raw:?}"))?;
    let x = x.trim().parse().map_err(|e| format!("bad x in {raw:?}: {e}"))?;
    let y = y.trim().parse().map_err(|e| format!("bad y in {raw:?}: {e}"))?;
    Ok(TilePosition::new(x, y))
}

fn parse_direction(raw: &str) -> Result<Direction, String> {
    match raw.parse::<Direction>() {
        Ok(Direction::None) | Err(_) => Err(format!(
            "expected north, south, east or west, got {raw:?}"
        )),
        Ok(direction) => Ok(direction),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_parse() {
        let cli = Cli::try_parse_from(["overworld"]).unwrap();
        assert_eq!(cli.map, "town");
        assert_eq!(cli.spawn, TilePosition::new(1, 1));
        assert_eq!(cli.facing, Direction::South);
        assert!(cli.ticks.is_none());
    }

    #[test]
    fn spawn_and_facing_flags() {
        let cli = Cli::try_parse_from([
            "overworld",
            "--spawn",
            "4, -2",
            "--facing",
            "West",
            "--ticks",
            "90",
        ])
        .unwrap();
        assert_eq!(cli.spawn, TilePosition::new(4, -2));
        assert_eq!(cli.facing, Direction::West);
        assert_eq!(cli.ticks, Some(90));
    }

    #[test]
    fn none_is_not_a_facing() {
        assert!(Cli::try_parse_from(["overworld", "--facing", "none"]).is_err());
        assert!(Cli::try_parse_from(["overworld", "--spawn", "3"]).is_err());
    }
}
