use std::sync::Arc;

use tokio::sync::{Mutex, mpsc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    config::GameConfig,
    data::{Board, Cell, Node},
    error::{Error, Result},
    generate::{place_bombs, tally_hints},
    history::{History, Recorder},
    model::{Difficulty, Event, Grid, Pos, Record},
    validate::{self, Events},
};

#[derive(Debug, Default)]
pub(crate) struct State {
    pub board: Option<Board>,
    pub difficulty: Option<Difficulty>,
    pub started: bool,
    pub history: Recorder,
    pub outcome: Option<Event>,
}

impl State {
    /// Visiting before `play()` is a caller bug, not a recoverable error.
    fn board_in_play(&mut self) -> (&mut Board, &mut Recorder) {
        let State {
            board,
            difficulty,
            started,
            history,
            ..
        } = self;
        match (board, difficulty, *started) {
            (None, _, _) => panic!("{}", Error::UnspecifiedGrid),
            (Some(_), None, _) => panic!("{}", Error::UnspecifiedDifficulty),
            (Some(_), Some(_), false) => panic!("play() must succeed before visiting cells"),
            (Some(board), Some(_), true) => (board, history),
        }
    }
}

/// Reveal state machine over one board.
struct Reveal<'a> {
    board: &'a mut Board,
    history: &'a mut Recorder,
}

impl Reveal<'_> {
    /// Entry point for `Game::visit`: chords on a revealed number, otherwise
    /// visits the single cell.
    fn visit(&mut self, index: usize) -> Result<Vec<Cell>> {
        let cell = self.board.cells[index];
        if cell.visited && matches!(cell.node, Node::Number { .. }) {
            return self.chord(index, cell.value());
        }
        self.visit_cell(index)
    }

    fn chord(&mut self, index: usize, value: u8) -> Result<Vec<Cell>> {
        let mut flagged = 0;
        let mut to_visit = Vec::new();
        for adj_index in self.board.neighbours(index) {
            if self.board.cells[adj_index].flagged {
                flagged += 1;
            } else {
                to_visit.push(adj_index);
            }
        }

        if flagged != usize::from(value) {
            debug!(
                "Chord at {} skipped: {} flags around value {}",
                self.board.cells[index].pos, flagged, value
            );
            return Ok(Vec::new());
        }

        let mut revealed = Vec::new();
        for adj_index in to_visit {
            revealed.extend(self.visit_cell(adj_index)?);
        }
        Ok(revealed)
    }

    fn visit_cell(&mut self, index: usize) -> Result<Vec<Cell>> {
        let cell = self.board.cells[index];
        if cell.flagged || cell.visited {
            return Ok(Vec::new());
        }

        match cell.node {
            Node::Number { .. } => Ok(vec![self.mark(index)]),
            Node::Bomb => {
                let exploded = self.mark(index);
                let revealed = std::iter::once(exploded)
                    .chain(
                        self.board
                            .cells
                            .iter()
                            .filter(|c| c.is_bomb() && c.pos != exploded.pos)
                            .copied(),
                    )
                    .collect();
                Err(Error::Exploded {
                    pos: exploded.pos,
                    revealed,
                })
            }
            Node::Unknown => Ok(self.flood_fill(index)),
        }
    }

    /// Reveals the blank region around `start` and its numbered border.
    /// Flags inside the region do not stop it; revealed cells lose their flag.
    fn flood_fill(&mut self, start: usize) -> Vec<Cell> {
        let mut revealed = vec![self.mark(start)];
        let mut stack = vec![start];

        while let Some(index) = stack.pop() {
            for adj_index in self.board.neighbours(index) {
                let cell = self.board.cells[adj_index];
                if cell.visited {
                    continue;
                }
                match cell.node {
                    Node::Unknown => {
                        revealed.push(self.mark(adj_index));
                        stack.push(adj_index);
                    }
                    Node::Number { .. } => revealed.push(self.mark(adj_index)),
                    Node::Bomb => {}
                }
            }
        }

        revealed
    }

    fn mark(&mut self, index: usize) -> Cell {
        let cell = &mut self.board.cells[index];
        cell.visited = true;
        cell.flagged = false;
        self.history.add(Record {
            pos: cell.pos,
            action: cell.node.into(),
        });
        *cell
    }
}

/// Handle to one minesweeper session. Clones share the same game.
#[derive(Clone)]
pub struct Game {
    id: Uuid,
    state: Arc<Mutex<State>>,
    events: mpsc::Sender<Event>,
}

impl Game {
    /// Creates a session and the stream its terminal event is delivered on.
    /// A supplied grid is committed right away.
    pub fn new(grid: Option<Grid>) -> (Self, Events) {
        Self::from_state(State {
            board: grid.map(Board::new),
            ..State::default()
        })
    }

    /// Creates a session configured from `config`. `play()` still has to be
    /// called.
    pub fn from_config(config: &GameConfig) -> (Self, Events) {
        Self::from_state(State {
            board: Some(Board::new(config.grid)),
            difficulty: Some(config.difficulty),
            ..State::default()
        })
    }

    /// Creates a started game with bombs at exactly `bombs`. Positions outside
    /// the grid are ignored.
    #[cfg(any(test, feature = "test-util"))]
    pub fn with_layout(grid: Grid, difficulty: Difficulty, bombs: &[Pos]) -> (Self, Events) {
        let mut board = Board::new(grid);
        board.multiplier = difficulty.multiplier();
        for &pos in bombs {
            if let Some(cell) = board.get_mut(pos) {
                cell.node = Node::Bomb;
            }
        }
        tally_hints(&mut board);

        Self::from_state(State {
            board: Some(board),
            difficulty: Some(difficulty),
            started: true,
            ..State::default()
        })
    }

    fn from_state(state: State) -> (Self, Events) {
        let (events, receiver) = Events::channel();
        let game = Self {
            id: Uuid::new_v4(),
            state: Arc::new(Mutex::new(state)),
            events,
        };
        debug!("Created game {}", game.id);
        (game, receiver)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub async fn set_grid(&self, width: usize, height: usize) -> Result<()> {
        let mut state = self.state.lock().await;
        if state.board.is_some() {
            warn!("Game {}: grid is already set", self.id);
            return Err(Error::GameAlreadyStarted);
        }

        state.board = Some(Board::new(Grid::new(width, height)));
        info!("Game {}: grid set to {}x{}", self.id, width, height);
        Ok(())
    }

    pub async fn set_difficulty(&self, difficulty: Difficulty) -> Result<()> {
        let mut state = self.state.lock().await;
        if state.started {
            warn!("Game {}: difficulty change after play()", self.id);
            return Err(Error::GameAlreadyStarted);
        }

        state.difficulty = Some(difficulty);
        debug!("Game {}: difficulty set to {}", self.id, difficulty);
        Ok(())
    }

    /// Places the bombs and tallies the hints. Grid and difficulty must be set.
    pub async fn play(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        if state.started {
            return Err(Error::GameAlreadyStarted);
        }

        let difficulty = state.difficulty.ok_or(Error::UnspecifiedDifficulty)?;
        let board = state.board.as_mut().ok_or(Error::UnspecifiedGrid)?;

        board.multiplier = difficulty.multiplier();
        place_bombs(board, &mut rand::rng());
        tally_hints(board);

        info!(
            "Game {} started: {}x{} {} with {} bombs",
            self.id,
            board.grid.width,
            board.grid.height,
            difficulty,
            board.total_bombs()
        );
        state.started = true;
        Ok(())
    }

    /// Toggles the flag on an unrevealed cell. Revealed cells are left as is.
    pub async fn flag(&self, x: usize, y: usize) -> Result<()> {
        let mut state = self.state.lock().await;
        let board = state.board.as_mut().ok_or(Error::UnspecifiedGrid)?;
        let pos = Pos::new(x, y);
        let grid = board.grid;
        let cell = board.get_mut(pos).ok_or(Error::OutOfBounds { pos, grid })?;

        if !cell.visited {
            cell.flagged = !cell.flagged;
            debug!("Game {}: flag at {} -> {}", self.id, pos, cell.flagged);
        }
        Ok(())
    }

    /// Reveals the cell at `(x, y)` and returns every cell it uncovered.
    ///
    /// - A numbered cell reveals just itself.
    /// - A blank cell flood-fills its region, itself first.
    /// - A bomb fails with [`Error::Exploded`], whose list starts with the
    ///   detonated cell followed by every other bomb.
    /// - An already revealed number whose flagged neighbours match its value
    ///   reveals all unflagged neighbours (chording). With a mismatched flag
    ///   count nothing happens.
    /// - Flagged or already revealed cells yield an empty list.
    ///
    /// # Panics
    ///
    /// If `play()` has not succeeded on this game.
    pub async fn visit(&self, x: usize, y: usize) -> Result<Vec<Cell>> {
        let mut state = self.state.lock().await;
        let (board, history) = state.board_in_play();

        let pos = Pos::new(x, y);
        let index = board.index(pos).ok_or(Error::OutOfBounds {
            pos,
            grid: board.grid,
        })?;

        let result = Reveal { board, history }.visit(index);
        match &result {
            Ok(revealed) if revealed.is_empty() => {}
            Ok(revealed) => {
                debug!("Game {}: visit {} revealed {} cells", self.id, pos, revealed.len());
                self.check_solution();
            }
            Err(error @ Error::Exploded { .. }) => {
                debug!("Game {}: {}", self.id, error);
                self.check_solution();
            }
            Err(_) => {}
        }
        result
    }

    fn check_solution(&self) {
        validate::schedule(self.id, self.state.clone(), self.events.clone());
    }

    pub async fn bomb_locations(&self) -> Vec<Cell> {
        let state = self.state.lock().await;
        state
            .board
            .as_ref()
            .map(Board::bomb_locations)
            .unwrap_or_default()
    }

    pub async fn hint_locations(&self) -> Vec<Cell> {
        let state = self.state.lock().await;
        state
            .board
            .as_ref()
            .map(Board::hint_locations)
            .unwrap_or_default()
    }

    /// Every recorded reveal, newest first. `None` until something is revealed.
    pub async fn history(&self) -> Option<Arc<History>> {
        self.state.lock().await.history.head()
    }

    pub async fn last_action(&self) -> Option<Record> {
        self.state.lock().await.history.last()
    }

    pub async fn cell(&self, x: usize, y: usize) -> Option<Cell> {
        let state = self.state.lock().await;
        state.board.as_ref()?.get(Pos::new(x, y)).copied()
    }

    /// Copy of the whole board, for renderers.
    pub async fn board(&self) -> Option<Board> {
        self.state.lock().await.board.clone()
    }

    pub async fn grid(&self) -> Option<Grid> {
        self.state.lock().await.board.as_ref().map(|b| b.grid)
    }

    pub async fn difficulty(&self) -> Option<Difficulty> {
        self.state.lock().await.difficulty
    }

    pub async fn total_bombs(&self) -> usize {
        let state = self.state.lock().await;
        state.board.as_ref().map_or(0, Board::total_bombs)
    }

    pub async fn total_non_bombs(&self) -> usize {
        let state = self.state.lock().await;
        state.board.as_ref().map_or(0, Board::total_non_bombs)
    }

    pub async fn is_playing(&self) -> bool {
        let state = self.state.lock().await;
        state.started && state.outcome.is_none()
    }

    /// The terminal event, once the background check has latched one.
    pub async fn outcome(&self) -> Option<Event> {
        self.state.lock().await.outcome
    }
}
