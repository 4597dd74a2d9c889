//! Othello engine: board rules, a game with undo/redo, and computer players.
//!
//! ```
//! use othello_engine::*;
//!
//! let mut game = Game::new();
//! assert_eq!(game.valid_moves().len(), 4);
//!
//! assert!(game.play(Coord::new(2, 3)));
//! assert_eq!(game.whos_turn(), Tile::O);
//!
//! game.undo();
//! assert_eq!(game.moves(), 0);
//! ```

pub mod arena;
pub mod console;
pub mod elo;
pub mod game;
pub mod history;
pub mod othello;
pub mod query;
pub mod save;
pub mod session;
pub mod strategy;

pub use game::{Game, GameError, Snapshot};
pub use history::{Action, History};
pub use othello::*;
pub use query::{count_tokens, valid_moves};
pub use session::{Match, Progress};
pub use strategy::{Decision, Greedy, Manual, Player, PlayerKind, RandomStrategy, Strategy};
