use rand::Rng;
use tracing::debug;

use crate::{
    data::{Board, Node},
    model::Grid,
};

/// How many cells past a taken draw the placement scan may move before the
/// draw is thrown away.
pub const CONSECUTIVE_RANDOM_LIMIT: usize = 3;

/// Next cell in row-major order, wrapping from the last cell back to the first.
pub fn shift_position(grid: &Grid, x: usize, y: usize) -> (usize, usize) {
    if x + 1 >= grid.width {
        if y + 1 >= grid.height {
            (0, 0)
        } else {
            (0, y + 1)
        }
    } else {
        (x + 1, y)
    }
}

/// Seeds `board.bomb_target()` bombs.
///
/// A draw that lands on a bomb scans forward (wrapping) for up to
/// [`CONSECUTIVE_RANDOM_LIMIT`] cells; if all of them are taken the draw is
/// discarded and redrawn. The scan favours cells that follow dense runs, so
/// the layout is not uniformly distributed.
pub(crate) fn place_bombs<R: Rng + ?Sized>(board: &mut Board, rng: &mut R) {
    let grid = board.grid;
    let area = grid.area();
    let mut redraws = 0usize;

    for _ in 0..board.bomb_target() {
        'draw: loop {
            let random_pos = rng.random_range(0..area);
            let (mut x, mut y) = (random_pos % grid.width, random_pos / grid.width);

            for _ in 0..=CONSECUTIVE_RANDOM_LIMIT {
                let index = x + y * grid.width;
                if board.cells[index].node == Node::Unknown {
                    board.cells[index].node = Node::Bomb;
                    break 'draw;
                }
                (x, y) = shift_position(&grid, x, y);
            }

            redraws += 1;
        }
    }

    debug!(
        "Placed {} bombs on {}x{} grid ({} redraws)",
        board.bomb_target(),
        grid.width,
        grid.height,
        redraws
    );
}

/// Turns every non-bomb neighbour of a bomb into a [`Node::Number`] holding its
/// adjacent bomb count.
pub(crate) fn tally_hints(board: &mut Board) {
    for index in 0..board.cells.len() {
        if board.cells[index].node != Node::Bomb {
            continue;
        }

        for adj_index in board.neighbours(index) {
            let cell = &mut board.cells[adj_index];
            cell.node = match cell.node {
                Node::Bomb => Node::Bomb,
                Node::Unknown => Node::Number { value: 1 },
                Node::Number { value } => Node::Number { value: value + 1 },
            };
        }
    }
}
