//! Whole-board queries. Plain functions over a borrowed [`Board`], so new
//! scans can be added here without touching the board itself.

use crate::othello::*;

/// Number of squares holding `player`. Recomputed from scratch every call.
pub fn count_tokens(board: &Board, player: Tile) -> usize {
    Coord::board_iter()
        .filter(|&place| board.get(place) == player)
        .count()
}

/// Every square `player` could legally play on, row-major, each square once.
pub fn valid_moves(board: &Board, player: Tile) -> Vec<Coord> {
    if !player.is_player() {
        return Vec::new();
    }

    Coord::board_iter()
        .filter(|&place| {
            DIRECTIONS
                .iter()
                .any(|&step| board.has_move_dir(place, step) == player)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opening_counts() {
        let board = Board::new();

        assert_eq!(count_tokens(&board, Tile::X), 2);
        assert_eq!(count_tokens(&board, Tile::O), 2);
        assert_eq!(count_tokens(&board, Tile::Empty), 60);
    }

    #[test]
    fn opening_moves_for_x() {
        let moves = valid_moves(&Board::new(), Tile::X);

        assert_eq!(
            moves,
            vec![
                Coord::new(2, 3),
                Coord::new(3, 2),
                Coord::new(4, 5),
                Coord::new(5, 4),
            ]
        );
    }

    #[test]
    fn opening_moves_for_o() {
        let moves = valid_moves(&Board::new(), Tile::O);

        assert_eq!(
            moves,
            vec![
                Coord::new(2, 4),
                Coord::new(3, 5),
                Coord::new(4, 2),
                Coord::new(5, 3),
            ]
        );
    }

    #[test]
    fn square_reachable_from_two_directions_is_listed_once() {
        let board = Board::from_rows(&[
            "........",
            "...X....",
            "...O....",
            ".XO.....",
            "........",
            "........",
            "........",
            "........",
        ])
        .unwrap();

        let moves = valid_moves(&board, Tile::X);

        assert_eq!(moves.iter().filter(|&&m| m == Coord::new(3, 3)).count(), 1);
        assert!(moves.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn agrees_with_board_legality() {
        let mut board = Board::new();
        board.play(Coord::new(2, 3), Tile::X);
        board.play(Coord::new(2, 2), Tile::O);

        for player in Tile::opponent_iter() {
            let moves = valid_moves(&board, player);
            for place in Coord::board_iter() {
                assert_eq!(moves.contains(&place), board.is_valid_move(place, player));
            }
        }
    }

    #[test]
    fn empty_is_nobody() {
        assert!(valid_moves(&Board::new(), Tile::Empty).is_empty());
    }
}
