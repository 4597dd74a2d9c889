//! Saved games on disk: a small JSON document wrapping a [`Snapshot`].

use crate::game::{Game, GameError, Snapshot};
use serde::{Deserialize, Serialize};
use std::{fs, io, path::Path};
use thiserror::Error;
use tracing::debug;

pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("could not access save file: {0}")]
    Io(#[from] io::Error),
    #[error("save file is not valid: {0}")]
    Json(#[from] serde_json::Error),
    #[error("save file has format version {0}, expected {FORMAT_VERSION}")]
    Version(u32),
    #[error("save file holds an impossible position: {0}")]
    Invalid(#[from] GameError),
}

#[derive(Debug, Serialize, Deserialize)]
struct SaveFile {
    version: u32,
    game: Snapshot,
}

pub fn to_string(snapshot: &Snapshot) -> Result<String, SaveError> {
    let file = SaveFile {
        version: FORMAT_VERSION,
        game: *snapshot,
    };

    Ok(serde_json::to_string_pretty(&file)?)
}

/// Parses and validates a saved game. Nothing is returned unless the whole
/// position is usable.
pub fn from_str(s: &str) -> Result<Snapshot, SaveError> {
    let file: SaveFile = serde_json::from_str(s)?;

    if file.version != FORMAT_VERSION {
        return Err(SaveError::Version(file.version));
    }

    file.game.validate()?;

    Ok(file.game)
}

pub fn save(path: &Path, game: &Game) -> Result<(), SaveError> {
    fs::write(path, to_string(&game.snapshot())?)?;
    debug!(path = %path.display(), moves = game.moves(), "saved game");
    Ok(())
}

pub fn load(path: &Path) -> Result<Snapshot, SaveError> {
    let snapshot = from_str(&fs::read_to_string(path)?)?;
    debug!(path = %path.display(), moves = snapshot.moves, "loaded game");
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::othello::*;

    #[test]
    fn written_games_read_back() {
        let mut game = Game::new();
        game.play(Coord::new(2, 3));
        game.play(Coord::new(2, 2));

        let text = to_string(&game.snapshot()).unwrap();

        assert_eq!(from_str(&text).unwrap(), game.snapshot());
    }

    #[test]
    fn board_is_stored_as_rows() {
        let text = to_string(&Snapshot::new()).unwrap();

        assert!(text.contains("\"...OX...\""));
        assert!(text.contains("\"turn\": \"X\""));
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(matches!(from_str("not json"), Err(SaveError::Json(_))));

        let bad_symbol = to_string(&Snapshot::new()).unwrap().replace("...OX...", "...OZ...");
        assert!(matches!(from_str(&bad_symbol), Err(SaveError::Json(_))));
    }

    #[test]
    fn impossible_positions_are_rejected() {
        let text = to_string(&Snapshot::new())
            .unwrap()
            .replace("\"moves\": 0", "\"moves\": 12");

        assert!(matches!(
            from_str(&text),
            Err(SaveError::Invalid(GameError::MoveCount { .. }))
        ));

        let huge = to_string(&Snapshot::new())
            .unwrap()
            .replace("\"moves\": 0", &format!("\"moves\": {}", usize::MAX));

        assert!(matches!(
            from_str(&huge),
            Err(SaveError::Invalid(GameError::MoveCount { .. }))
        ));
    }

    #[test]
    fn other_versions_are_rejected() {
        let text = to_string(&Snapshot::new())
            .unwrap()
            .replace("\"version\": 1", "\"version\": 2");

        assert!(matches!(from_str(&text), Err(SaveError::Version(2))));
    }
}
