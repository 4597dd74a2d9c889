use crate::history::{Action, History};
use crate::othello::*;
use crate::query;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

/// Complete state of a game at one instant: everything needed to continue
/// playing from it. `turn` is `Tile::Empty` once nobody can move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Snapshot {
    pub board: Board,
    pub turn: Tile,
    pub moves: usize,
}

impl Snapshot {
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            turn: Tile::X,
            moves: 0,
        }
    }

    /// Checks that this state could have been reached by playing from the
    /// opening position.
    pub fn validate(&self) -> Result<(), GameError> {
        let mobility = self.board.has_move();

        let turn_ok = match self.turn {
            Tile::Empty => mobility == Mobility::Neither,
            player => self.board.has_move_for(player),
        };

        if !turn_ok {
            return Err(GameError::InconsistentTurn {
                turn: self.turn,
                mobility,
            });
        }

        let tokens = query::count_tokens(&self.board, Tile::X) + query::count_tokens(&self.board, Tile::O);

        if self.moves.checked_add(4) != Some(tokens) {
            return Err(GameError::MoveCount {
                moves: self.moves,
                tokens,
            });
        }

        Ok(())
    }
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("{turn:?} cannot be the player to move when mobility is {mobility:?}")]
    InconsistentTurn { turn: Tile, mobility: Mobility },
    #[error("{moves} moves cannot leave {tokens} tokens on the board")]
    MoveCount { moves: usize, tokens: usize },
}

/// One successful move, stored as the states on either side of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub before: Snapshot,
    pub after: Snapshot,
    pub mv: Coord,
}

impl Action<Snapshot> for Transition {
    fn apply(&mut self, state: &mut Snapshot) {
        *state = self.after;
    }

    fn revert(&mut self, state: &mut Snapshot) {
        *state = self.before;
    }
}

/// Who moves after `mover` has played on `board`. The opponent normally; the
/// mover again if the opponent is stuck; nobody if both are.
fn next_turn(board: &Board, mover: Tile) -> Tile {
    match board.has_move() {
        Mobility::Both => mover.opponent(),
        Mobility::Only(player) => player,
        Mobility::Neither => Tile::Empty,
    }
}

#[derive(Debug, Clone)]
pub struct Game {
    state: Snapshot,
    history: History<Transition>,
}

impl Game {
    pub fn new() -> Self {
        Self {
            state: Snapshot::new(),
            history: History::new(),
        }
    }

    pub fn reset(&mut self) {
        debug!("reset");
        self.state = Snapshot::new();
        self.history.clear();
    }

    pub fn board(&self) -> &Board {
        &self.state.board
    }

    pub fn token(&self, place: Coord) -> Tile {
        self.state.board.get(place)
    }

    /// `Tile::Empty` once the game is over.
    pub fn whos_turn(&self) -> Tile {
        self.state.turn
    }

    pub fn is_game_over(&self) -> bool {
        self.state.turn == Tile::Empty
    }

    pub fn moves(&self) -> usize {
        self.state.moves
    }

    pub fn count_tokens(&self, player: Tile) -> usize {
        query::count_tokens(&self.state.board, player)
    }

    /// Legal squares for the player to move.
    pub fn valid_moves(&self) -> Vec<Coord> {
        query::valid_moves(&self.state.board, self.state.turn)
    }

    pub fn is_valid_move(&self, place: Coord) -> bool {
        self.state.board.is_valid_move(place, self.state.turn)
    }

    /// The player with more tokens once the game is over. `Tile::Empty` for a
    /// draw, or while the game is still running.
    pub fn winner(&self) -> Tile {
        if !self.is_game_over() {
            return Tile::Empty;
        }

        let x = self.count_tokens(Tile::X);
        let o = self.count_tokens(Tile::O);

        match x.cmp(&o) {
            std::cmp::Ordering::Greater => Tile::X,
            std::cmp::Ordering::Less => Tile::O,
            std::cmp::Ordering::Equal => Tile::Empty,
        }
    }

    /// Plays `place` for the player to move. Returns false and changes
    /// nothing if the move is not legal for them.
    #[instrument(level = "debug", skip(self), fields(player = ?self.state.turn))]
    pub fn play(&mut self, place: Coord) -> bool {
        let before = self.state;
        let mover = before.turn;

        if mover == Tile::Empty {
            return false;
        }

        let mut board = before.board;
        if !board.play(place, mover) {
            return false;
        }

        let after = Snapshot {
            board,
            turn: next_turn(&board, mover),
            moves: before.moves + 1,
        };

        if after.turn == mover {
            debug!(passed = ?mover.opponent(), "opponent has no move, turn does not pass");
        } else if after.turn == Tile::Empty {
            debug!(
                x = query::count_tokens(&board, Tile::X),
                o = query::count_tokens(&board, Tile::O),
                "game over"
            );
        }

        self.history.execute(
            Transition {
                before,
                after,
                mv: place,
            },
            &mut self.state,
        );

        true
    }

    /// Steps back one move. The recorded turn is restored as it was, so the
    /// player whose move was taken back is to move again.
    pub fn undo(&mut self) -> bool {
        let undone = self.history.undo(&mut self.state);
        debug!(undone, moves = self.state.moves, "undo");
        undone
    }

    pub fn redo(&mut self) -> bool {
        let redone = self.history.redo(&mut self.state);
        debug!(redone, moves = self.state.moves, "redo");
        redone
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// The square of the move that produced the current position.
    pub fn last_move(&self) -> Option<Coord> {
        self.history.last().map(|transition| transition.mv)
    }

    /// The board before the move that produced the current position.
    pub fn previous_board(&self) -> Board {
        self.history
            .last()
            .map_or(self.state.board, |transition| transition.before.board)
    }

    pub fn snapshot(&self) -> Snapshot {
        self.state
    }

    /// Replaces the whole game with `snapshot`, dropping undo/redo history.
    /// On error the game is left as it was.
    pub fn restore(&mut self, snapshot: Snapshot) -> Result<(), GameError> {
        snapshot.validate()?;

        debug!(moves = snapshot.moves, turn = ?snapshot.turn, "restored snapshot");
        self.state = snapshot;
        self.history.clear();

        Ok(())
    }

    pub fn from_snapshot(snapshot: Snapshot) -> Result<Self, GameError> {
        let mut game = Self::new();
        game.restore(snapshot)?;
        Ok(game)
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(row: isize, col: isize) -> Coord {
        Coord::new(row, col)
    }

    fn total(game: &Game) -> usize {
        game.count_tokens(Tile::X) + game.count_tokens(Tile::O) + game.count_tokens(Tile::Empty)
    }

    #[test]
    fn fresh_game() {
        let game = Game::new();

        assert_eq!(game.whos_turn(), Tile::X);
        assert_eq!(game.moves(), 0);
        assert!(!game.is_game_over());
        assert_eq!(game.winner(), Tile::Empty);
        assert!(!game.can_undo());
        assert_eq!(game.last_move(), None);
    }

    #[test]
    fn turns_alternate() {
        let mut game = Game::new();

        assert!(game.play(c(2, 3)));
        assert_eq!(game.whos_turn(), Tile::O);
        assert_eq!(game.moves(), 1);
        assert_eq!(game.last_move(), Some(c(2, 3)));

        // X's legal square is not O's
        assert!(!game.play(c(3, 2)));
        assert!(game.play(c(2, 2)));
        assert_eq!(game.whos_turn(), Tile::X);
        assert_eq!(total(&game), 64);
    }

    #[test]
    fn illegal_move_changes_nothing() {
        let mut game = Game::new();
        let before = game.snapshot();

        assert!(!game.play(c(0, 0)));
        assert!(!game.play(c(3, 3)));
        assert!(!game.play(c(9, 9)));

        assert_eq!(game.snapshot(), before);
        assert!(!game.can_undo());
    }

    #[test]
    fn undo_redo_round_trip() {
        let mut game = Game::new();
        game.play(c(2, 3));
        let before = game.snapshot();

        assert!(game.play(c(2, 2)));
        let after = game.snapshot();

        assert!(game.undo());
        assert_eq!(game.snapshot(), before);
        assert_eq!(game.whos_turn(), Tile::O);

        assert!(game.redo());
        assert_eq!(game.snapshot(), after);
        assert!(!game.redo());
    }

    #[test]
    fn new_move_clears_redo() {
        let mut game = Game::new();
        game.play(c(2, 3));
        game.undo();
        assert!(game.can_redo());

        game.play(c(3, 2));
        assert!(!game.can_redo());
        assert!(!game.redo());
    }

    #[test]
    fn undo_on_fresh_game_is_a_no_op() {
        let mut game = Game::new();

        assert!(!game.undo());
        assert!(!game.redo());
        assert_eq!(game.snapshot(), Snapshot::new());
    }

    #[test]
    fn reset_clears_everything() {
        let mut game = Game::new();
        game.play(c(2, 3));
        game.play(c(2, 2));
        game.undo();

        game.reset();

        assert_eq!(game.snapshot(), Snapshot::new());
        assert!(!game.can_undo());
        assert!(!game.can_redo());
    }

    #[test]
    fn stuck_opponent_keeps_the_turn() {
        let board = Board::from_rows(&[
            ".OX.....",
            "........",
            "........",
            "........",
            "........",
            "........",
            "......OX",
            "........",
        ])
        .unwrap();
        let mut game = Game::from_snapshot(Snapshot {
            board,
            turn: Tile::X,
            moves: 0,
        })
        .unwrap();

        assert!(game.play(c(0, 0)));
        assert!(!game.board().has_move_for(Tile::O));
        assert_eq!(game.whos_turn(), Tile::X);
        assert_eq!(game.moves(), 1);

        assert!(game.play(c(6, 5)));
        assert!(game.is_game_over());
        assert_eq!(game.moves(), 2);
        assert_eq!(game.winner(), Tile::X);
    }

    #[test]
    fn game_over_and_winner() {
        let board = Board::from_rows(&[
            "XO......",
            "........",
            "........",
            "........",
            "........",
            "........",
            "........",
            "........",
        ])
        .unwrap();
        let mut game = Game::new();
        game.state = Snapshot { board, turn: Tile::X, moves: 0 };

        assert!(game.play(c(0, 2)));
        assert!(game.is_game_over());
        assert_eq!(game.whos_turn(), Tile::Empty);
        assert_eq!(game.winner(), Tile::X);
        assert!(!game.play(c(5, 5)));

        assert!(game.undo());
        assert!(!game.is_game_over());
        assert_eq!(game.winner(), Tile::Empty);
    }

    #[test]
    fn draw_when_counts_are_equal() {
        let board = Board::from_rows(&[
            "XXOO....",
            "........",
            "........",
            "........",
            "........",
            "........",
            "........",
            "........",
        ])
        .unwrap();
        let mut game = Game::new();
        game.state = Snapshot { board, turn: Tile::Empty, moves: 0 };

        assert!(game.is_game_over());
        assert_eq!(game.winner(), Tile::Empty);
    }

    #[test]
    fn restore_rejects_inconsistent_snapshots() {
        let mut game = Game::new();
        game.play(c(2, 3));
        let kept = game.snapshot();

        let wrong_turn = Snapshot {
            turn: Tile::Empty,
            ..Snapshot::new()
        };
        assert!(matches!(
            game.restore(wrong_turn),
            Err(GameError::InconsistentTurn { .. })
        ));

        let wrong_count = Snapshot {
            moves: 7,
            ..Snapshot::new()
        };
        assert!(matches!(
            game.restore(wrong_count),
            Err(GameError::MoveCount { moves: 7, tokens: 4 })
        ));

        assert_eq!(game.snapshot(), kept);
        assert!(game.can_undo());
    }

    #[test]
    fn restore_accepts_a_real_position() {
        let mut source = Game::new();
        source.play(c(2, 3));
        source.play(c(2, 2));

        let mut game = Game::new();
        game.play(c(3, 2));
        game.restore(source.snapshot()).unwrap();

        assert_eq!(game.snapshot(), source.snapshot());
        assert!(!game.can_undo());
    }
}
