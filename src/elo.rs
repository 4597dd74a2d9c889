//! Elo ratings from one finished round of games, by repeatedly rating every
//! entrant against the current estimate of everybody else until the numbers
//! settle.

use skillratings::{elo::*, Outcomes};
use std::{collections::HashMap, hash::Hash};
use thiserror::Error;

pub const START_RATING: f64 = 1000.0;

/// One finished game. `score` is from `players[0]`'s point of view.
#[derive(Debug, Clone, PartialEq)]
pub struct Game<E> {
    pub players: [E; 2],
    pub score: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("score {0} is not a win, draw or loss")]
pub struct EloError(pub f32);

struct HalfGame<E> {
    opponent: E,
    outcome: Outcomes,
}

pub fn score_to_outcome(score: f32) -> Result<Outcomes, EloError> {
    match score {
        s if s == 0.0 => Ok(Outcomes::LOSS),
        s if s == 0.5 => Ok(Outcomes::DRAW),
        s if s == 1.0 => Ok(Outcomes::WIN),
        s => Err(EloError(s)),
    }
}

fn new_elo<E>(entrant: &E, games: &[HalfGame<E>], elos: &HashMap<E, f64>, k: f64) -> f64
where
    E: Eq + Hash,
{
    let rating = EloRating {
        rating: elos[entrant],
    };

    let games: Vec<_> = games
        .iter()
        .map(|HalfGame { opponent, outcome }| {
            (
                EloRating {
                    rating: elos[opponent],
                },
                *outcome,
            )
        })
        .collect();

    elo_rating_period(&rating, &games, &EloConfig { k }).rating
}

/// Rates every entrant of `games` from a common [`START_RATING`].
///
/// Each of the `iterations` passes re-rates every entrant against its
/// opponents' ratings from the previous pass, so the result does not depend
/// on the order of `games`. `k` is the Elo step size. A small `k` with more
/// iterations converges more smoothly. Fails on a score that is not 0, 0.5
/// or 1.
pub fn from_single_tournament<E>(
    games: &[Game<E>],
    iterations: usize,
    k: f64,
) -> Result<HashMap<E, f64>, EloError>
where
    E: Clone + Eq + Hash,
{
    let mut games_by_entrant: HashMap<E, Vec<HalfGame<E>>> = HashMap::new();
    let mut elos: HashMap<E, f64> = HashMap::new();

    for game in games {
        let [first, second] = &game.players;

        elos.entry(first.clone()).or_insert(START_RATING);
        elos.entry(second.clone()).or_insert(START_RATING);

        games_by_entrant.entry(first.clone()).or_default().push(HalfGame {
            opponent: second.clone(),
            outcome: score_to_outcome(game.score)?,
        });

        games_by_entrant.entry(second.clone()).or_default().push(HalfGame {
            opponent: first.clone(),
            outcome: score_to_outcome(1.0 - game.score)?,
        });
    }

    for _ in 0..iterations {
        let mut new_elos = elos.clone();

        for (entrant, games) in &games_by_entrant {
            new_elos.insert(entrant.clone(), new_elo(entrant, games, &elos, k));
        }

        elos = new_elos;
    }

    Ok(elos)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn g(players: [&'static str; 2], score: f32) -> Game<&'static str> {
        Game { players, score }
    }

    #[test]
    fn two_entrants_keep_the_rating_pool() {
        let games = vec![g(["a", "b"], 0.0), g(["b", "a"], 0.5)];

        let elos = from_single_tournament(&games, 50, 16.0).unwrap();

        assert!((elos["a"] + elos["b"] - 2000.0).abs() < 1.0);
        assert!(elos["b"] > elos["a"]);
    }

    #[test]
    fn three_entrants_keep_the_rating_pool() {
        let games = vec![
            g(["a", "b"], 0.0),
            g(["b", "a"], 0.5),
            g(["a", "c"], 1.0),
            g(["c", "a"], 0.5),
            g(["b", "c"], 1.0),
            g(["c", "b"], 0.0),
        ];

        let elos = from_single_tournament(&games, 50, 16.0).unwrap();

        assert!((elos["a"] + elos["b"] + elos["c"] - 3000.0).abs() < 5.0);
    }

    #[test]
    fn odd_scores_are_rejected() {
        let games = vec![g(["a", "b"], 0.3)];

        assert_eq!(from_single_tournament(&games, 1, 16.0), Err(EloError(0.3)));
    }
}
