//! Batches of computer-only games for comparing strategies.

use crate::{console::*, elo, othello::*, session::*, strategy::*};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Submode {
    /// Two kinds, alternating colours every game.
    Compare,
    /// Every ordered pair of distinct kinds, rated with Elo.
    Tournament,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ArenaError {
    #[error("a human cannot take part in an arena")]
    HumanEntrant,
    #[error("a tournament needs at least two different entrants")]
    TooFewEntrants,
    #[error(transparent)]
    Elo(#[from] elo::EloError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Standing {
    pub kind: PlayerKind,
    pub score: f32,
    pub elo: Option<f64>,
}

#[derive(Debug)]
pub struct Arena {
    matches: Vec<Match>,
    pub console: Console,
    submode: Submode,
}

impl Arena {
    pub fn compare(
        kinds: [PlayerKind; 2],
        games: usize,
        seed: u64,
        console: Console,
    ) -> Result<Self, ArenaError> {
        check_entrants(&kinds)?;

        let matches = (0..games)
            .map(|i| {
                let seats = if i % 2 == 0 {
                    kinds
                } else {
                    [kinds[1], kinds[0]]
                };
                Match::from_kinds(i, seats, seed.wrapping_add(2 * i as u64))
            })
            .collect();

        Ok(Self {
            matches,
            console,
            submode: Submode::Compare,
        })
    }

    /// `games` games for every ordered pair of distinct kinds.
    pub fn tournament(
        kinds: &[PlayerKind],
        games: usize,
        seed: u64,
        console: Console,
    ) -> Result<Self, ArenaError> {
        check_entrants(kinds)?;

        let mut distinct = kinds.to_vec();
        distinct.sort();
        distinct.dedup();

        if distinct.len() < 2 {
            return Err(ArenaError::TooFewEntrants);
        }

        let mut matches = Vec::new();

        for &first in &distinct {
            for &second in &distinct {
                if first == second {
                    continue;
                }

                for _ in 0..games {
                    let id = matches.len();
                    matches.push(Match::from_kinds(
                        id,
                        [first, second],
                        seed.wrapping_add(2 * id as u64),
                    ));
                }
            }
        }

        Ok(Self {
            matches,
            console,
            submode: Submode::Tournament,
        })
    }

    pub fn submode(&self) -> Submode {
        self.submode
    }

    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    /// Plays every game to the end and returns the standings, best first.
    pub fn run(&mut self) -> Result<Vec<Standing>, ArenaError> {
        let total = self.matches.len();

        for done in 0..total {
            self.console.pin(format!("Games done: {done}/{total}"));

            let game = &mut self.matches[done];
            if game.run(&self.console) == Progress::Stuck {
                self.console.warn(&format!("Game {} got stuck and was abandoned", game.id));
            }
        }

        self.console.unpin();

        let standings = match self.submode {
            Submode::Compare => self.finish_compare(),
            Submode::Tournament => self.finish_tournament()?,
        };

        Ok(standings)
    }

    fn scores(&self) -> HashMap<PlayerKind, f32> {
        let mut scores: HashMap<PlayerKind, f32> = HashMap::new();

        for game in &self.matches {
            for tile in Tile::opponent_iter() {
                let kind = game.players[tile.index()].kind();
                *scores.entry(kind).or_insert(0.0) += game.score_for(tile).unwrap_or(0.0);
            }
        }

        scores
    }

    fn finish_compare(&self) -> Vec<Standing> {
        let mut standings: Vec<_> = self
            .scores()
            .into_iter()
            .map(|(kind, score)| Standing {
                kind,
                score,
                elo: None,
            })
            .collect();

        sort_standings(&mut standings);
        standings
    }

    fn finish_tournament(&self) -> Result<Vec<Standing>, ArenaError> {
        let elo_games: Vec<_> = self
            .matches
            .iter()
            .filter(|game| game.is_game_over())
            .map(|game| elo::Game {
                players: [game.players[0].kind(), game.players[1].kind()],
                score: game.score_for(Tile::X).unwrap_or(0.5),
            })
            .collect();

        let elos = elo::from_single_tournament(&elo_games, 50, 16.0)?;

        let mut standings: Vec<_> = self
            .scores()
            .into_iter()
            .map(|(kind, score)| Standing {
                kind,
                score,
                elo: elos.get(&kind).copied(),
            })
            .collect();

        sort_standings(&mut standings);
        Ok(standings)
    }

    pub fn print_standings(&self, standings: &[Standing]) {
        match self.submode {
            Submode::Compare => {
                for (i, standing) in standings.iter().enumerate() {
                    self.console
                        .print(&format!("Score {} ({}): {:.1}", i + 1, standing.kind, standing.score));
                }
            }
            Submode::Tournament => {
                self.console.print(&format!("{: >4} {: >5} Player", "Elo", "Score"));

                for standing in standings {
                    self.console.print(&format!(
                        "{: >4.0} {: >5.1} {}",
                        standing.elo.unwrap_or(elo::START_RATING),
                        standing.score,
                        standing.kind
                    ));
                }
            }
        }
    }
}

fn check_entrants(kinds: &[PlayerKind]) -> Result<(), ArenaError> {
    if kinds.iter().any(|kind| !kind.is_automated()) {
        return Err(ArenaError::HumanEntrant);
    }

    Ok(())
}

fn sort_standings(standings: &mut [Standing]) {
    standings.sort_by(|a, b| b.score.total_cmp(&a.score).then(a.kind.cmp(&b.kind)));
}
