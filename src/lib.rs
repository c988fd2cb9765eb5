//! Minesweeper Engine
//!
//! An embeddable minesweeper rules engine: board generation, cell reveal
//! (including flood-fill and chorded reveal), flagging and win/lose
//! detection. Rendering and user input are left to the caller.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use minesweeper_engine::{Difficulty, Error, Event, Game, Grid};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Error> {
//!     let (game, mut events) = Game::new(Some(Grid::new(10, 40)));
//!     game.set_difficulty(Difficulty::Easy).await?;
//!     game.play().await?;
//!
//!     game.flag(3, 6).await?;
//!     match game.visit(0, 0).await {
//!         Ok(revealed) => println!("revealed {} cells", revealed.len()),
//!         Err(Error::Exploded { pos, .. }) => println!("boom at {pos}"),
//!         Err(e) => return Err(e),
//!     }
//!
//!     if let Some(Event::Win) = events.try_recv() {
//!         println!("cleared the board");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! The terminal [`Event`] is decided by a background task spawned after
//! each reveal, so [`Game::visit`] must run inside a tokio runtime.

pub mod config;
pub mod data;
pub mod error;
pub mod generate;
pub mod history;
pub mod logic;
pub mod model;
pub mod validate;

pub use config::GameConfig;
pub use data::{Board, Cell, Node};
pub use error::{Error, Result};
pub use history::History;
pub use logic::Game;
pub use model::{Action, Difficulty, Event, Grid, Pos, Record};
pub use validate::Events;
