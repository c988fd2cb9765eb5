use std::{collections::HashSet, time::Duration};

use minesweeper_engine::{Difficulty, Error, Event, Events, Game, Grid, Pos};
use tokio::time::timeout;

const EVENT_TIMEOUT: Duration = Duration::from_secs(5);
const QUIET_PERIOD: Duration = Duration::from_millis(200);

async fn expect_event(events: &mut Events) -> Event {
    timeout(EVENT_TIMEOUT, events.recv())
        .await
        .expect("was expecting an event in less than 5 seconds")
        .expect("event channel closed")
}

async fn expect_quiet(events: &mut Events) {
    assert!(
        timeout(QUIET_PERIOD, events.recv()).await.is_err(),
        "no further event may be emitted"
    );
}

async fn started(width: usize, height: usize, difficulty: Difficulty) -> (Game, Events) {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let (game, events) = Game::new(Some(Grid::new(width, height)));
    game.set_difficulty(difficulty).await.expect("difficulty");
    game.play().await.expect("play");
    (game, events)
}

#[tokio::test]
async fn clearing_the_board_wins_once() {
    let (game, mut events) = started(10, 40, Difficulty::Easy).await;
    let board = game.board().await.expect("board");

    for cell in board.cells.iter().filter(|c| !c.is_bomb()) {
        game.visit(cell.x(), cell.y()).await.expect("safe visit");
    }

    assert_eq!(expect_event(&mut events).await, Event::Win);
    assert_eq!(game.outcome().await, Some(Event::Win));
    assert!(!game.is_playing().await);

    // Chording a cleared number changes nothing and emits nothing.
    if let Some(hint) = game.hint_locations().await.first() {
        let _ = game.visit(hint.x(), hint.y()).await;
    }
    expect_quiet(&mut events).await;
}

#[tokio::test]
async fn exploding_loses_once() {
    let (game, mut events) = started(10, 40, Difficulty::Medium).await;
    let bombs = game.bomb_locations().await;

    for bomb in bombs.iter().take(3) {
        let err = game.visit(bomb.x(), bomb.y()).await.expect_err("explodes");
        assert!(matches!(err, Error::Exploded { .. }));
    }

    assert_eq!(expect_event(&mut events).await, Event::Lose);
    assert_eq!(game.outcome().await, Some(Event::Lose));
    expect_quiet(&mut events).await;
}

#[tokio::test]
async fn safe_reveal_does_not_end_the_game() {
    let (game, mut events) =
        Game::with_layout(Grid::new(3, 3), Difficulty::Easy, &[Pos::new(0, 0)]);
    game.visit(1, 1).await.expect("hint");

    expect_quiet(&mut events).await;
    assert_eq!(game.outcome().await, None);
    assert!(game.is_playing().await);
}

#[tokio::test]
async fn event_is_buffered_without_a_listener() {
    let (game, mut events) =
        Game::with_layout(Grid::new(5, 5), Difficulty::Easy, &[Pos::new(4, 4)]);
    game.visit(0, 0).await.expect("flood fill");

    // Let the background check finish before anyone listens.
    while game.outcome().await.is_none() {
        tokio::task::yield_now().await;
    }
    assert_eq!(events.try_recv(), Some(Event::Win));
    assert_eq!(events.try_recv(), None);
}

#[tokio::test]
async fn losing_after_winning_is_not_reported() {
    let (game, mut events) =
        Game::with_layout(Grid::new(5, 5), Difficulty::Easy, &[Pos::new(4, 4)]);
    game.visit(0, 0).await.expect("flood fill");
    assert_eq!(expect_event(&mut events).await, Event::Win);

    assert!(game.visit(4, 4).await.is_err());
    expect_quiet(&mut events).await;
    assert_eq!(game.outcome().await, Some(Event::Win));
}

#[tokio::test]
async fn events_close_when_the_game_is_dropped() {
    let (game, mut events) = Game::new(Some(Grid::new(3, 3)));
    drop(game);
    assert_eq!(timeout(EVENT_TIMEOUT, events.recv()).await, Ok(None));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_visits_reveal_each_cell_once() {
    let (game, mut events) = started(16, 30, Difficulty::Easy).await;
    let board = game.board().await.expect("board");
    let safe: Vec<Pos> = board
        .cells
        .iter()
        .filter(|c| !c.is_bomb())
        .map(|c| c.pos())
        .collect();

    let mut tasks = Vec::new();
    for worker in 0..4 {
        let game = game.clone();
        let targets: Vec<Pos> = safe.iter().copied().skip(worker).step_by(4).collect();
        tasks.push(tokio::spawn(async move {
            let mut revealed = Vec::new();
            for pos in targets {
                revealed.extend(game.visit(pos.x, pos.y).await.expect("safe visit"));
            }
            revealed
        }));
    }

    let mut seen = HashSet::new();
    for task in tasks {
        for cell in task.await.expect("worker") {
            assert!(seen.insert(cell.pos()), "{} revealed twice", cell.pos());
        }
    }
    assert_eq!(seen.len(), safe.len());

    assert_eq!(expect_event(&mut events).await, Event::Win);
    expect_quiet(&mut events).await;
}
