use std::sync::Arc;

use tokio::sync::{Mutex, mpsc};
use tracing::{debug, info};
use uuid::Uuid;

use crate::{data::Board, logic::State, model::Event};

/// Stream of terminal game events.
///
/// Backed by a single-slot channel: the terminal event is buffered even when
/// nobody is listening yet, and at most one event is ever delivered.
pub struct Events {
    receiver: mpsc::Receiver<Event>,
}

impl Events {
    pub(crate) fn channel() -> (mpsc::Sender<Event>, Self) {
        let (sender, receiver) = mpsc::channel(1);
        (sender, Self { receiver })
    }

    /// Waits for the terminal event. Returns `None` once every handle to the
    /// game has been dropped without the game ending.
    pub async fn recv(&mut self) -> Option<Event> {
        self.receiver.recv().await
    }

    /// Returns the terminal event if it has already been emitted.
    pub fn try_recv(&mut self) -> Option<Event> {
        self.receiver.try_recv().ok()
    }
}

/// Scans the board for a terminal condition.
pub fn evaluate(board: &Board) -> Option<Event> {
    let mut visited = 0;
    for cell in &board.cells {
        match (cell.is_bomb(), cell.visited) {
            (true, true) => return Some(Event::Lose),
            (false, true) => visited += 1,
            _ => {}
        }
    }

    (visited == board.total_non_bombs()).then_some(Event::Win)
}

/// Spawns a detached win/lose check. The first terminal event is latched in
/// the game state; later checks never emit again.
pub(crate) fn schedule(id: Uuid, state: Arc<Mutex<State>>, sender: mpsc::Sender<Event>) {
    tokio::spawn(async move {
        let mut state = state.lock().await;
        if state.outcome.is_some() {
            return;
        }

        let Some(event) = state.board.as_ref().and_then(evaluate) else {
            return;
        };

        state.outcome = Some(event);
        info!("Game {} ended: {:?}", id, event);

        if sender.try_send(event).is_err() {
            debug!("Game {}: event receiver is gone", id);
        }
    });
}
