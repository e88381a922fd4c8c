//! Text forms of positions, boards and game records.
//!
//! # Cell Keys
//!
//! ```text
//! "row,col"   zero-based, e.g. "0,2"
//! ```
//!
//! # Share Format
//!
//! ```text
//! Setup: "<board>" Moves: <moves>
//!
//! board:  rows top to bottom joined by '|', one symbol per cell
//!         B = Blue, R = Red, * = Empty          e.g. "B**|*R*"
//! moves:  "<turn>. <description>" joined by ", "
//!         e.g. 1. Expanded at (1, 1) (+2), 2. Placed at (3, 3)
//! ```

use std::fmt;
use std::str::FromStr;

use crate::engine::MoveRecord;
use crate::error::NotationError;
use crate::{Board, Cell, Pos, MAX_DIM};

impl Pos {
    /// Canonical `"row,col"` key.
    pub fn key(self) -> String {
        self.to_string()
    }

    /// Parse a key produced by [`Pos::key`].
    pub fn parse_key(key: &str) -> Result<Pos, NotationError> {
        let bad = || NotationError::BadKey(key.to_string());
        let (row, col) = key.split_once(',').ok_or_else(bad)?;
        let row: u8 = row.parse().map_err(|_| bad())?;
        let col: u8 = col.parse().map_err(|_| bad())?;
        if row >= MAX_DIM || col >= MAX_DIM {
            return Err(bad());
        }
        Ok(Pos::new(row, col))
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.row, self.col)
    }
}

impl FromStr for Pos {
    type Err = NotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Pos::parse_key(s)
    }
}

impl Cell {
    /// Share-format symbol.
    #[inline]
    pub fn symbol(self) -> char {
        match self {
            Cell::Empty => '*',
            Cell::Blue => 'B',
            Cell::Red => 'R',
        }
    }

    #[inline]
    pub fn from_symbol(symbol: char) -> Option<Cell> {
        match symbol {
            '*' => Some(Cell::Empty),
            'B' => Some(Cell::Blue),
            'R' => Some(Cell::Red),
            _ => None,
        }
    }
}

/// Serialize a board as `|`-separated rows of `B`/`R`/`*`.
pub fn setup_string(board: &Board) -> String {
    let mut out = String::with_capacity(board.rows() as usize * (board.cols() as usize + 1));
    for (pos, cell) in board.cells() {
        if pos.col == 0 && pos.row > 0 {
            out.push('|');
        }
        out.push(cell.symbol());
    }
    out
}

/// Parse a board produced by [`setup_string`].
pub fn parse_setup(text: &str) -> Result<Board, NotationError> {
    let rows = text
        .split('|')
        .map(|row| {
            row.chars()
                .map(|ch| Cell::from_symbol(ch).ok_or(NotationError::BadSymbol(ch)))
                .collect::<Result<Vec<_>, _>>()
        })
        .collect::<Result<Vec<_>, _>>()?;
    Board::from_rows(rows)
}

/// Numbered move list, e.g. `1. Expanded at (1, 1) (+2), 2. Placed at (3, 3)`.
pub fn moves_string(history: &[MoveRecord]) -> String {
    history
        .iter()
        .map(|record| format!("{}. {}", record.turn_index, record.description))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Full share text for a setup board and the moves played from it.
pub fn share_text(setup: &Board, history: &[MoveRecord]) -> String {
    format!(
        "Setup: \"{}\" Moves: {}",
        setup_string(setup),
        moves_string(history)
    )
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (pos, cell) in self.cells() {
            if pos.col == 0 && pos.row > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", cell.symbol())?;
        }
        Ok(())
    }
}
