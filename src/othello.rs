use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign};
use std::str::FromStr;
use thiserror::Error;

/// Side length of the board. Only the standard 8x8 game is supported.
pub const DIMENSION: usize = 8;

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tile {
    Empty = 0,
    /// Player one, moves first.
    X = 1,
    /// Player two.
    O = 2,
}

impl Tile {
    pub fn opponent(&self) -> Tile {
        match self {
            Self::X => Self::O,
            Self::O => Self::X,
            Self::Empty => panic!("Called opponent on empty tile"),
        }
    }

    /// Iterates over the two players, `X` first.
    pub fn opponent_iter() -> TileOpponentIter {
        TileOpponentIter::new()
    }

    pub fn is_player(&self) -> bool {
        *self != Tile::Empty
    }

    /// Index of a player into a two element array, `X` is 0.
    pub fn index(&self) -> usize {
        match self {
            Self::X => 0,
            Self::O => 1,
            Self::Empty => panic!("Called index on empty tile"),
        }
    }

    pub fn symbol(&self) -> char {
        match self {
            Self::X => 'X',
            Self::O => 'O',
            Self::Empty => '.',
        }
    }

    pub fn from_symbol(symbol: char) -> Option<Tile> {
        match symbol {
            'X' | 'x' => Some(Self::X),
            'O' | 'o' => Some(Self::O),
            '.' | '-' | '_' => Some(Self::Empty),
            _ => None,
        }
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

pub struct TileOpponentIter {
    cur: Tile,
}

impl TileOpponentIter {
    fn new() -> Self {
        Self { cur: Tile::Empty }
    }
}

impl Iterator for TileOpponentIter {
    type Item = Tile;

    fn next(&mut self) -> Option<Self::Item> {
        let ret = match self.cur {
            Tile::Empty => Some(Tile::X),
            Tile::X => Some(Tile::O),
            Tile::O => None,
        };

        self.cur = match self.cur {
            Tile::Empty => Tile::X,
            Tile::X | Tile::O => Tile::O,
        };

        ret
    }
}


/// A square on the board, or a step between squares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub row: isize,
    pub col: isize,
}

/// The eight compass steps, scanned in this order.
pub const DIRECTIONS: [Coord; 8] = [
    Coord::new(-1, -1),
    Coord::new(-1, 0),
    Coord::new(-1, 1),
    Coord::new(0, -1),
    Coord::new(0, 1),
    Coord::new(1, -1),
    Coord::new(1, 0),
    Coord::new(1, 1),
];

impl Coord {
    pub const fn new(row: isize, col: isize) -> Coord {
        Coord { row, col }
    }

    pub fn is_in_board(&self) -> bool {
        (0..DIMENSION as isize).contains(&self.row) && (0..DIMENSION as isize).contains(&self.col)
    }

    /// Every square, row-major.
    pub fn board_iter() -> CoordBoardIter {
        CoordBoardIter { next: 0 }
    }

    /// Algebraic name of the square, e.g. `d3` for row 2, column 3.
    pub fn move_string(&self) -> String {
        self.to_string()
    }
}

impl Add<Coord> for Coord {
    type Output = Coord;

    fn add(self, rhs: Coord) -> Self::Output {
        Coord::new(self.row + rhs.row, self.col + rhs.col)
    }
}

impl AddAssign<Coord> for Coord {
    fn add_assign(&mut self, rhs: Coord) {
        self.row += rhs.row;
        self.col += rhs.col;
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_in_board() {
            return write!(f, "({}, {})", self.row, self.col);
        }

        write!(f, "{}{}", (b'a' + self.col as u8) as char, self.row + 1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{0}' is not a square, expected a letter a-h followed by a digit 1-8")]
pub struct CoordParseError(pub String);

impl FromStr for Coord {
    type Err = CoordParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || CoordParseError(s.to_owned());
        let mut chars = s.trim().chars();

        let col_char = chars.next().ok_or_else(err)?.to_ascii_lowercase();
        let row_char = chars.next().ok_or_else(err)?;

        if chars.next().is_some() || !('a'..='h').contains(&col_char) || !('1'..='8').contains(&row_char) {
            return Err(err());
        }

        Ok(Coord::new(
            row_char as isize - '1' as isize,
            col_char as isize - 'a' as isize,
        ))
    }
}

pub struct CoordBoardIter {
    next: usize,
}

impl Iterator for CoordBoardIter {
    type Item = Coord;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= DIMENSION * DIMENSION {
            return None;
        }

        let cur = Coord::new((self.next / DIMENSION) as isize, (self.next % DIMENSION) as isize);
        self.next += 1;

        Some(cur)
    }
}

/// Which players could place a token somewhere on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mobility {
    Neither,
    Only(Tile),
    Both,
}

/// The 8x8 grid. Two bits per square packed into a single `u128`, so copies
/// are cheap and never alias.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "Vec<String>", try_from = "Vec<String>")]
pub struct Board {
    state: u128,
}

impl Board {
    pub fn empty() -> Board {
        Board { state: 0 }
    }

    /// The standard opening position.
    pub fn new() -> Board {
        let mut board = Board::empty();
        let half = DIMENSION as isize / 2;

        board.set(Coord::new(half - 1, half - 1), Tile::O);
        board.set(Coord::new(half - 1, half), Tile::X);
        board.set(Coord::new(half, half - 1), Tile::X);
        board.set(Coord::new(half, half), Tile::O);

        board
    }

    /// Builds a board from one string per row, using `X`, `O` and `.`.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Board, BoardParseError> {
        if rows.len() != DIMENSION {
            return Err(BoardParseError::RowCount(rows.len()));
        }

        let mut board = Board::empty();

        for (row, line) in rows.iter().enumerate() {
            let line: Vec<char> = line.as_ref().chars().filter(|c| !c.is_whitespace()).collect();

            if line.len() != DIMENSION {
                return Err(BoardParseError::RowLength { row, len: line.len() });
            }

            for (col, symbol) in line.into_iter().enumerate() {
                let tile = Tile::from_symbol(symbol).ok_or(BoardParseError::Symbol { row, col, symbol })?;
                board.set(Coord::new(row as isize, col as isize), tile);
            }
        }

        Ok(board)
    }

    pub fn rows(&self) -> Vec<String> {
        (0..DIMENSION as isize)
            .map(|row| {
                (0..DIMENSION as isize)
                    .map(|col| self.get(Coord::new(row, col)).symbol())
                    .collect()
            })
            .collect()
    }

    pub fn dimension(&self) -> usize {
        DIMENSION
    }

    fn get_raw_place(&self, place: usize) -> Tile {
        match (self.state >> place) & 0b11 {
            0 => Tile::Empty,
            1 => Tile::X,
            _ => Tile::O,
        }
    }

    fn set_raw_place(&mut self, place: usize, tile: Tile) {
        self.state &= !(0b11 << place);
        self.state |= (tile as u128) << place;
    }

    fn raw_place(place: Coord) -> usize {
        (place.row * DIMENSION as isize + place.col) as usize * 2
    }

    pub fn try_get(&self, pos: Coord) -> Option<Tile> {
        pos.is_in_board().then(|| self.get_raw_place(Self::raw_place(pos)))
    }

    /// # Panics
    /// Panics if `pos` is off the board.
    pub fn get(&self, pos: Coord) -> Tile {
        self.try_get(pos)
            .unwrap_or_else(|| panic!("{pos:?} is outside the {DIMENSION}x{DIMENSION} board"))
    }

    fn set(&mut self, pos: Coord, tile: Tile) {
        assert!(pos.is_in_board(), "{pos:?} is outside the {DIMENSION}x{DIMENSION} board");
        self.set_raw_place(Self::raw_place(pos), tile);
    }

    /// Number of opponent tokens `player` would capture from `place` along
    /// `step`. Zero when the run is not closed by one of `player`'s tokens.
    fn capture_len(&self, place: Coord, step: Coord, player: Tile) -> usize {
        let opponent = player.opponent();
        let mut cur = place + step;
        let mut len = 0;

        while self.try_get(cur) == Some(opponent) {
            cur += step;
            len += 1;
        }

        if len > 0 && self.try_get(cur) == Some(player) {
            len
        } else {
            0
        }
    }

    /// The opponent tokens a move by `player` at `place` would flip, without
    /// touching the board. Empty when the move is illegal.
    pub fn flips(&self, place: Coord, player: Tile) -> Vec<Coord> {
        if !player.is_player() || self.try_get(place) != Some(Tile::Empty) {
            return Vec::new();
        }

        let mut flipped = Vec::new();

        for step in DIRECTIONS {
            let len = self.capture_len(place, step, player);
            let mut cur = place;

            for _ in 0..len {
                cur += step;
                flipped.push(cur);
            }
        }

        flipped
    }

    pub fn is_valid_move(&self, place: Coord, player: Tile) -> bool {
        player.is_player()
            && self.try_get(place) == Some(Tile::Empty)
            && DIRECTIONS.iter().any(|&step| self.capture_len(place, step, player) > 0)
    }

    /// Places `player` at `place` and flips every bracketed run. Returns
    /// false and leaves the board untouched when nothing would be captured,
    /// the square is occupied or off the board.
    pub fn play(&mut self, place: Coord, player: Tile) -> bool {
        let flipped = self.flips(place, player);

        if flipped.is_empty() {
            return false;
        }

        self.set(place, player);
        for cur in flipped {
            self.set(cur, player);
        }

        true
    }

    /// Lifts the token at `place`. Captured tokens are not flipped back.
    pub fn remove_token(&mut self, place: Coord) {
        self.set(place, Tile::Empty);
    }

    /// Which player could legally play on the empty square `place` using only
    /// the single direction `step` to capture. `Tile::Empty` when neither can.
    pub fn has_move_dir(&self, place: Coord, step: Coord) -> Tile {
        if step == Coord::new(0, 0) || self.try_get(place) != Some(Tile::Empty) {
            return Tile::Empty;
        }

        let first = match self.try_get(place + step) {
            Some(tile) if tile.is_player() => tile,
            _ => return Tile::Empty,
        };

        let mover = first.opponent();
        if self.capture_len(place, step, mover) > 0 {
            mover
        } else {
            Tile::Empty
        }
    }

    pub fn has_move_for(&self, player: Tile) -> bool {
        Coord::board_iter().any(|place| self.is_valid_move(place, player))
    }

    pub fn has_move(&self) -> Mobility {
        match (self.has_move_for(Tile::X), self.has_move_for(Tile::O)) {
            (true, true) => Mobility::Both,
            (true, false) => Mobility::Only(Tile::X),
            (false, true) => Mobility::Only(Tile::O),
            (false, false) => Mobility::Neither,
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, " ")?;
        for col in 0..DIMENSION {
            write!(f, " {}", (b'a' + col as u8) as char)?;
        }
        writeln!(f)?;

        for (row, line) in self.rows().iter().enumerate() {
            write!(f, "{}", row + 1)?;
            for symbol in line.chars() {
                write!(f, " {symbol}")?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardParseError {
    #[error("expected {DIMENSION} rows, found {0}")]
    RowCount(usize),
    #[error("row {row} has {len} squares, expected {DIMENSION}")]
    RowLength { row: usize, len: usize },
    #[error("unknown symbol '{symbol}' at row {row}, column {col}")]
    Symbol { row: usize, col: usize, symbol: char },
}

impl From<Board> for Vec<String> {
    fn from(board: Board) -> Self {
        board.rows()
    }
}

impl TryFrom<Vec<String>> for Board {
    type Error = BoardParseError;

    fn try_from(rows: Vec<String>) -> Result<Self, Self::Error> {
        Board::from_rows(&rows)
    }
}
