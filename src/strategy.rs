//! Move-choosing policies.
//!
//! A strategy plays one colour. The front-end's turn loop asks it for a
//! [`Decision`] whenever that colour is to move; the [`Game`] itself never
//! knows which of its players are automated.

use crate::game::Game;
use crate::othello::*;
use crate::query;
use ambassador::{delegatable_trait, Delegate};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Play { mv: Coord, notes: String },
    /// The game is over, it is not this player's turn, or there is no legal
    /// square.
    NoMove,
    /// A manual player that has not been given a square yet.
    Wait,
}

#[delegatable_trait]
pub trait Strategy {
    fn name(&self) -> String;
    fn tile(&self) -> Tile;
    fn decide(&mut self, game: &Game) -> Decision;
}

fn is_my_turn(game: &Game, tile: Tile) -> bool {
    !game.is_game_over() && game.whos_turn() == tile
}

/// Hands over whatever square the caller submitted.
#[derive(Debug, Clone)]
pub struct Manual {
    tile: Tile,
    pending: Option<Coord>,
}

impl Manual {
    pub fn new(tile: Tile) -> Self {
        Self { tile, pending: None }
    }

    pub fn submit(&mut self, mv: Coord) {
        self.pending = Some(mv);
    }
}

impl Strategy for Manual {
    fn name(&self) -> String {
        "human".to_owned()
    }

    fn tile(&self) -> Tile {
        self.tile
    }

    fn decide(&mut self, game: &Game) -> Decision {
        if !is_my_turn(game, self.tile) {
            return Decision::NoMove;
        }

        match self.pending.take() {
            Some(mv) => Decision::Play {
                mv,
                notes: "human".to_owned(),
            },
            None => Decision::Wait,
        }
    }
}

/// Picks uniformly among the legal squares.
#[derive(Debug, Clone)]
pub struct RandomStrategy {
    tile: Tile,
    rng: StdRng,
}

impl RandomStrategy {
    pub fn new(tile: Tile, rng: StdRng) -> Self {
        Self { tile, rng }
    }

    pub fn seeded(tile: Tile, seed: u64) -> Self {
        Self::new(tile, StdRng::seed_from_u64(seed))
    }
}

impl Strategy for RandomStrategy {
    fn name(&self) -> String {
        "random".to_owned()
    }

    fn tile(&self) -> Tile {
        self.tile
    }

    fn decide(&mut self, game: &Game) -> Decision {
        if !is_my_turn(game, self.tile) {
            return Decision::NoMove;
        }

        let moves = query::valid_moves(game.board(), self.tile);

        match moves.choose(&mut self.rng) {
            Some(&mv) => Decision::Play {
                mv,
                notes: format!("random of {}", moves.len()),
            },
            None => Decision::NoMove,
        }
    }
}

/// Takes the square that captures the most tokens right now. Ties go to the
/// first square in row-major order.
#[derive(Debug, Clone)]
pub struct Greedy {
    tile: Tile,
}

impl Greedy {
    pub fn new(tile: Tile) -> Self {
        Self { tile }
    }

    /// Tokens `player` would capture at `place`, measured by playing it on a
    /// scratch copy of `board`.
    pub fn gain(board: &Board, place: Coord, player: Tile) -> usize {
        let mut scratch = *board;

        if !scratch.play(place, player) {
            return 0;
        }

        query::count_tokens(&scratch, player) - query::count_tokens(board, player) - 1
    }
}

impl Strategy for Greedy {
    fn name(&self) -> String {
        "greedy".to_owned()
    }

    fn tile(&self) -> Tile {
        self.tile
    }

    fn decide(&mut self, game: &Game) -> Decision {
        if !is_my_turn(game, self.tile) {
            return Decision::NoMove;
        }

        let mut best: Option<(Coord, usize)> = None;

        for mv in query::valid_moves(game.board(), self.tile) {
            let gain = Self::gain(game.board(), mv, self.tile);

            if best.map_or(true, |(_, best_gain)| gain > best_gain) {
                best = Some((mv, gain));
            }
        }

        match best {
            Some((mv, gain)) => Decision::Play {
                mv,
                notes: format!("greedy, captures {gain}"),
            },
            None => Decision::NoMove,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PlayerKind {
    Human,
    Random,
    Greedy,
}

impl PlayerKind {
    pub const ALL: [PlayerKind; 3] = [PlayerKind::Human, PlayerKind::Random, PlayerKind::Greedy];

    /// `rng` is only used by [`PlayerKind::Random`].
    pub fn build(self, tile: Tile, rng: StdRng) -> Player {
        match self {
            PlayerKind::Human => Player::Human(Manual::new(tile)),
            PlayerKind::Random => Player::Random(RandomStrategy::new(tile, rng)),
            PlayerKind::Greedy => Player::Greedy(Greedy::new(tile)),
        }
    }

    pub fn is_automated(self) -> bool {
        self != PlayerKind::Human
    }
}

impl fmt::Display for PlayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PlayerKind::Human => "human",
            PlayerKind::Random => "random",
            PlayerKind::Greedy => "greedy",
        };

        write!(f, "{name}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown player kind '{0}', expected human, random or greedy")]
pub struct PlayerKindParseError(pub String);

impl FromStr for PlayerKind {
    type Err = PlayerKindParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "human" => Ok(PlayerKind::Human),
            "random" => Ok(PlayerKind::Random),
            "greedy" => Ok(PlayerKind::Greedy),
            _ => Err(PlayerKindParseError(s.to_owned())),
        }
    }
}

/// A seat at the table, chosen once by [`PlayerKind`].
#[derive(Debug, Clone, Delegate)]
#[delegate(Strategy)]
pub enum Player {
    Human(Manual),
    Random(RandomStrategy),
    Greedy(Greedy),
}

impl Player {
    pub fn kind(&self) -> PlayerKind {
        match self {
            Player::Human(_) => PlayerKind::Human,
            Player::Random(_) => PlayerKind::Random,
            Player::Greedy(_) => PlayerKind::Greedy,
        }
    }

    /// Passes a square to a human player. Returns false for automated ones.
    pub fn submit(&mut self, mv: Coord) -> bool {
        match self {
            Player::Human(manual) => {
                manual.submit(mv);
                true
            }
            Player::Random(_) | Player::Greedy(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Snapshot;

    fn c(row: isize, col: isize) -> Coord {
        Coord::new(row, col)
    }

    fn one_or_three() -> Game {
        let board = Board::from_rows(&[
            "XO......",
            "........",
            "........",
            "........",
            "........",
            "........",
            "........",
            "XOOO....",
        ])
        .unwrap();

        Game::from_snapshot(Snapshot {
            board,
            turn: Tile::X,
            moves: 2,
        })
        .unwrap()
    }

    #[test]
    fn greedy_takes_the_bigger_capture() {
        let game = one_or_three();

        assert_eq!(game.valid_moves(), vec![c(0, 2), c(7, 4)]);
        assert_eq!(Greedy::gain(game.board(), c(0, 2), Tile::X), 1);
        assert_eq!(Greedy::gain(game.board(), c(7, 4), Tile::X), 3);

        let decision = Greedy::new(Tile::X).decide(&game);
        assert!(matches!(decision, Decision::Play { mv, .. } if mv == c(7, 4)));
    }

    #[test]
    fn greedy_breaks_ties_in_scan_order() {
        let game = Game::new();
        let decision = Greedy::new(Tile::X).decide(&game);

        assert!(matches!(decision, Decision::Play { mv, .. } if mv == c(2, 3)));
    }

    #[test]
    fn greedy_does_not_touch_the_game() {
        let game = one_or_three();
        let before = game.snapshot();

        Greedy::new(Tile::X).decide(&game);

        assert_eq!(game.snapshot(), before);
    }

    #[test]
    fn random_stays_legal_and_replays_with_the_same_seed() {
        let mut a = RandomStrategy::seeded(Tile::X, 7);
        let mut b = RandomStrategy::seeded(Tile::X, 7);
        let game = Game::new();
        let legal = game.valid_moves();

        for _ in 0..20 {
            let da = a.decide(&game);
            let db = b.decide(&game);

            match &da {
                Decision::Play { mv, .. } => assert!(legal.contains(mv)),
                other => panic!("unexpected decision {other:?}"),
            }
            assert_eq!(da, db);
        }
    }

    #[test]
    fn strategies_wait_for_their_turn() {
        let game = Game::new();

        assert_eq!(Greedy::new(Tile::O).decide(&game), Decision::NoMove);
        assert_eq!(RandomStrategy::seeded(Tile::O, 1).decide(&game), Decision::NoMove);
        assert_eq!(Manual::new(Tile::O).decide(&game), Decision::NoMove);
    }

    #[test]
    fn manual_passes_the_submitted_square_once() {
        let game = Game::new();
        let mut human = Manual::new(Tile::X);

        assert_eq!(human.decide(&game), Decision::Wait);

        human.submit(c(0, 0));
        assert!(matches!(human.decide(&game), Decision::Play { mv, .. } if mv == c(0, 0)));
        assert_eq!(human.decide(&game), Decision::Wait);
    }

    #[test]
    fn kinds_build_matching_players() {
        for kind in PlayerKind::ALL {
            let player = kind.build(Tile::O, StdRng::seed_from_u64(0));

            assert_eq!(player.kind(), kind);
            assert_eq!(player.tile(), Tile::O);
            assert_eq!(player.name(), kind.to_string());
            assert_eq!(kind.to_string().parse::<PlayerKind>(), Ok(kind));
        }

        assert!("minimax".parse::<PlayerKind>().is_err());
    }

    #[test]
    fn only_humans_accept_input() {
        let mut human = PlayerKind::Human.build(Tile::X, StdRng::seed_from_u64(0));
        let mut greedy = PlayerKind::Greedy.build(Tile::X, StdRng::seed_from_u64(0));

        assert!(human.submit(c(2, 3)));
        assert!(!greedy.submit(c(2, 3)));
    }
}
