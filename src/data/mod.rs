use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::{Action, Grid, Pos};

/// Content of a cell as produced by board generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Node {
    /// No adjacent bombs.
    Unknown,
    /// Number of adjacent bombs, always in `1..=8`.
    Number { value: u8 },
    Bomb,
}

impl From<Node> for Action {
    fn from(value: Node) -> Self {
        match value {
            Node::Unknown => Self::Unknown,
            Node::Number { .. } => Self::Number,
            Node::Bomb => Self::Bomb,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub(crate) node: Node,
    pub(crate) pos: Pos,
    pub(crate) visited: bool,
    pub(crate) flagged: bool,
}

impl Cell {
    fn new(pos: Pos) -> Self {
        Self {
            node: Node::Unknown,
            pos,
            visited: false,
            flagged: false,
        }
    }

    pub fn node(&self) -> Node {
        self.node
    }

    pub fn pos(&self) -> Pos {
        self.pos
    }

    pub fn x(&self) -> usize {
        self.pos.x
    }

    pub fn y(&self) -> usize {
        self.pos.y
    }

    /// Adjacent bomb count; zero for bombs and blank cells.
    pub fn value(&self) -> u8 {
        match self.node {
            Node::Number { value } => value,
            _ => 0,
        }
    }

    pub fn is_bomb(&self) -> bool {
        self.node == Node::Bomb
    }

    pub fn visited(&self) -> bool {
        self.visited
    }

    pub fn flagged(&self) -> bool {
        self.flagged
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.node {
            Node::Unknown => "blank",
            Node::Number { .. } => "number",
            Node::Bomb => "bomb",
        };
        write!(
            f,
            "{kind} cell at x:{} y:{} (value {}, visited: {}, flagged: {})",
            self.pos.x,
            self.pos.y,
            self.value(),
            self.visited,
            self.flagged
        )
    }
}

/// Row-major cell storage for one game.
#[derive(Debug, Clone)]
pub struct Board {
    pub grid: Grid,
    pub multiplier: f32,
    pub cells: Vec<Cell>,
}

impl Board {
    /// Allocates a board of blank cells, each holding its fixed coordinate.
    pub fn new(grid: Grid) -> Self {
        let cells = (0..grid.area())
            .map(|i| Cell::new(Pos::new(i % grid.width, i / grid.width)))
            .collect();

        Self {
            grid,
            multiplier: 0.0,
            cells,
        }
    }

    pub fn index(&self, pos: Pos) -> Option<usize> {
        self.grid
            .contains(pos)
            .then(|| pos.x + pos.y * self.grid.width)
    }

    pub fn get(&self, pos: Pos) -> Option<&Cell> {
        self.index(pos).and_then(|i| self.cells.get(i))
    }

    pub fn get_mut(&mut self, pos: Pos) -> Option<&mut Cell> {
        self.index(pos).and_then(|i| self.cells.get_mut(i))
    }

    /// Indices of the up to 8 cells surrounding `index`.
    pub fn neighbours(&self, index: usize) -> impl Iterator<Item = usize> + use<> {
        let width = self.grid.width as i64;
        let height = self.grid.height as i64;
        let x = index as i64 % width.max(1);
        let y = index as i64 / width.max(1);

        (-1..=1i64)
            .flat_map(|dy| (-1..=1i64).map(move |dx| (dx, dy)))
            .filter(|&(dx, dy)| dx != 0 || dy != 0)
            .filter_map(move |(dx, dy)| {
                let new_x = x + dx;
                let new_y = y + dy;
                (new_x >= 0 && new_x < width && new_y >= 0 && new_y < height)
                    .then(|| (new_x + new_y * width) as usize)
            })
    }

    /// Bombs to place: `floor(area * multiplier)`, never more than the area.
    pub fn bomb_target(&self) -> usize {
        let area = self.grid.area();
        ((area as f64 * f64::from(self.multiplier)).floor() as usize).min(area)
    }

    pub fn total_bombs(&self) -> usize {
        self.cells.iter().filter(|c| c.is_bomb()).count()
    }

    pub fn total_non_bombs(&self) -> usize {
        self.grid.area() - self.total_bombs()
    }

    pub fn bomb_locations(&self) -> Vec<Cell> {
        self.cells.iter().filter(|c| c.is_bomb()).copied().collect()
    }

    pub fn hint_locations(&self) -> Vec<Cell> {
        self.cells
            .iter()
            .filter(|c| matches!(c.node, Node::Number { .. }))
            .copied()
            .collect()
    }
}
