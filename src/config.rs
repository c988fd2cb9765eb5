use std::env;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::model::{Difficulty, Grid};

/// Grid and difficulty for a new game.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub grid: Grid,
    pub difficulty: Difficulty,
}

impl GameConfig {
    /// Reads `MINESWEEPER_WIDTH`, `MINESWEEPER_HEIGHT` and
    /// `MINESWEEPER_DIFFICULTY`, keeping the default for anything missing or
    /// unparseable.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let width = parse_or(&lookup, "MINESWEEPER_WIDTH", defaults.grid.width);
        let height = parse_or(&lookup, "MINESWEEPER_HEIGHT", defaults.grid.height);
        let difficulty = parse_or(&lookup, "MINESWEEPER_DIFFICULTY", defaults.difficulty);

        Self {
            grid: Grid::new(width, height),
            difficulty,
        }
    }
}

fn parse_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> T {
    match lookup(key) {
        None => default,
        Some(value) => value.trim().parse().unwrap_or_else(|_| {
            warn!("Ignoring invalid {}={:?}", key, value);
            default
        }),
    }
}
