//! The turn loop that seats two players at a [`Game`].

use crate::console::*;
use crate::game::{Game, GameError, Snapshot};
use crate::othello::*;
use crate::strategy::*;

/// What a single [`Match::update`] step did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    Played(Coord),
    /// The player to move is a human with no square submitted yet.
    Waiting,
    /// The submitted square was not legal; nothing changed.
    Rejected(Coord),
    Finished,
    /// The player to move offered no square although the game is running.
    Stuck,
}

#[derive(Debug)]
pub struct Match<P: Strategy = Player> {
    pub id: usize,
    pub game: Game,
    /// `players[0]` plays `X`, `players[1]` plays `O`.
    pub players: [P; 2],
}

impl<P: Strategy> Match<P> {
    pub fn new(id: usize, players: [P; 2]) -> Self {
        debug_assert_eq!(players[0].tile(), Tile::X);
        debug_assert_eq!(players[1].tile(), Tile::O);

        Self {
            id,
            game: Game::new(),
            players,
        }
    }

    fn formatted_id(&self) -> String {
        format!("#{:_>3}>", self.id)
    }

    pub fn next_player(&self) -> Option<&P> {
        if self.game.is_game_over() {
            None
        } else {
            Some(&self.players[self.game.whos_turn().index()])
        }
    }

    pub fn next_player_mut(&mut self) -> Option<&mut P> {
        if self.game.is_game_over() {
            None
        } else {
            Some(&mut self.players[self.game.whos_turn().index()])
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.game.is_game_over()
    }

    pub fn winner_player(&self) -> Option<&P> {
        match self.game.winner() {
            Tile::Empty => None,
            winner => Some(&self.players[winner.index()]),
        }
    }

    /// 1 for a win, 0.5 for a draw, 0 for a loss. `None` until the game ends.
    pub fn score_for(&self, tile: Tile) -> Option<f32> {
        debug_assert!(tile != Tile::Empty);

        if !self.game.is_game_over() {
            return None;
        }

        Some(match self.game.winner() {
            Tile::Empty => 0.5,
            winner if winner == tile => 1.0,
            _ => 0.0,
        })
    }

    pub fn announce_result(&self, console: &Console) {
        let x = self.game.count_tokens(Tile::X);
        let o = self.game.count_tokens(Tile::O);

        match self.game.winner() {
            Tile::Empty => console.info(&format!("{} Game ended in a draw, {x}-{o}", self.formatted_id())),
            winner => console.info(&format!(
                "{} Game ended, winner: {} ({}), {x}-{o}",
                self.formatted_id(),
                winner,
                self.players[winner.index()].name()
            )),
        }
    }

    /// Plays `mv` for whoever is to move. Returns false if it was illegal.
    pub fn play(&mut self, mv: Coord, notes: &str, console: &Console) -> bool {
        let mover = self.game.whos_turn();

        if !self.game.play(mv) {
            return false;
        }

        console.info(&format!(
            "{} {}: {} ({})",
            self.formatted_id(),
            mover,
            mv.move_string(),
            notes
        ));

        if self.game.is_game_over() {
            self.announce_result(console);
        } else if self.game.whos_turn() == mover {
            console.info(&format!(
                "{} {} has no move and passes",
                self.formatted_id(),
                mover.opponent()
            ));
        }

        true
    }

    /// Asks the player to move for a decision and applies it.
    pub fn update(&mut self, console: &Console) -> Progress {
        if self.game.is_game_over() {
            return Progress::Finished;
        }

        let decision = self.players[self.game.whos_turn().index()].decide(&self.game);

        match decision {
            Decision::Play { mv, notes } => {
                if self.play(mv, &notes, console) {
                    Progress::Played(mv)
                } else {
                    console.warn(&format!(
                        "{} {} cannot play {}",
                        self.formatted_id(),
                        self.game.whos_turn(),
                        mv.move_string()
                    ));
                    Progress::Rejected(mv)
                }
            }
            Decision::Wait => Progress::Waiting,
            Decision::NoMove if self.game.is_game_over() => Progress::Finished,
            Decision::NoMove => Progress::Stuck,
        }
    }

    /// Steps until the game ends or a human has to act.
    pub fn run(&mut self, console: &Console) -> Progress {
        loop {
            match self.update(console) {
                Progress::Played(_) => continue,
                other => return other,
            }
        }
    }

    pub fn undo(&mut self, console: &Console) -> bool {
        let undone = self.game.undo();

        if undone {
            console.info(&format!("{} Undid move", self.formatted_id()));
        }

        undone
    }

    pub fn redo(&mut self, console: &Console) -> bool {
        let redone = self.game.redo();

        if redone {
            console.info(&format!("{} Redid move", self.formatted_id()));
        }

        redone
    }

    pub fn reset(&mut self, console: &Console) {
        self.game.reset();
        console.info(&format!("{} Game restarted", self.formatted_id()));
    }

    /// Swaps in a saved position. The match is untouched on error.
    pub fn load(&mut self, snapshot: Snapshot, console: &Console) -> Result<(), GameError> {
        self.game.restore(snapshot)?;
        console.info(&format!(
            "{} Loaded position after {} moves",
            self.formatted_id(),
            snapshot.moves
        ));
        Ok(())
    }
}

impl Match<Player> {
    /// Builds a match from two kinds. `seed` drives any random players, each
    /// colour getting its own stream.
    pub fn from_kinds(id: usize, kinds: [PlayerKind; 2], seed: u64) -> Self {
        use rand::SeedableRng;

        let players = [
            kinds[0].build(Tile::X, rand::rngs::StdRng::seed_from_u64(seed)),
            kinds[1].build(Tile::O, rand::rngs::StdRng::seed_from_u64(seed.wrapping_add(1))),
        ];

        Self::new(id, players)
    }

    pub fn has_human(&self) -> bool {
        self.players.iter().any(|player| player.kind() == PlayerKind::Human)
    }

    /// Hands `mv` to the player to move if that player is human.
    pub fn submit(&mut self, mv: Coord) -> bool {
        self.next_player_mut().map_or(false, |player| player.submit(mv))
    }

    /// Takes back moves until a human is to move again, so that undo in a
    /// game against the computer also removes the computer's reply. Does
    /// nothing when both players are automated.
    pub fn undo_to_human(&mut self, console: &Console) -> bool {
        if !self.has_human() {
            return false;
        }

        let mut undone = false;

        while self.undo(console) {
            undone = true;

            if let Some(Player::Human(_)) = self.next_player() {
                break;
            }
        }

        undone
    }
}
