use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::Error;

#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Pos {
    pub x: usize,
    pub y: usize,
}

impl Pos {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Board dimensions. Committed once per game.
#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Grid {
    pub width: usize,
    pub height: usize,
}

impl Grid {
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    pub const fn area(&self) -> usize {
        self.width * self.height
    }

    pub const fn contains(&self, pos: Pos) -> bool {
        pos.x < self.width && pos.y < self.height
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self {
            width: 9,
            height: 9,
        }
    }
}

const EASY_MULTIPLIER: f32 = 0.1;
const MEDIUM_MULTIPLIER: f32 = 0.2;
const HARD_MULTIPLIER: f32 = 0.5;

/// Selects the share of the board that is mined.
#[derive(Deserialize, Serialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// 10% of the cells are bombs.
    #[default]
    Easy,
    /// 20% of the cells are bombs.
    Medium,
    /// 50% of the cells are bombs.
    Hard,
}

impl Difficulty {
    pub const fn multiplier(self) -> f32 {
        match self {
            Self::Easy => EASY_MULTIPLIER,
            Self::Medium => MEDIUM_MULTIPLIER,
            Self::Hard => HARD_MULTIPLIER,
        }
    }

    /// Number of bombs placed on a board of `area` cells: `floor(area * multiplier)`.
    pub fn bomb_count(self, area: usize) -> usize {
        (area as f64 * f64::from(self.multiplier())).floor() as usize
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        })
    }
}

impl FromStr for Difficulty {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            other => Err(Error::UnknownDifficulty(other.to_string())),
        }
    }
}

/// Terminal outcome of a game.
#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Event {
    Win,
    Lose,
}

/// Classification of a revealed cell as stored in the move history.
#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Unknown,
    Number,
    Bomb,
}

#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Record {
    pub pos: Pos,
    pub action: Action,
}
