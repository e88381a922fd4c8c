//! Expansion game logic with bit-set coordinate representation.
//!
//! # Board Layout
//!
//! ```text
//! rows × cols cells (each dimension 1-15), stored row-major in a Vec<Cell>.
//!
//! Cell states:
//!   0 = Empty
//!   1 = Blue (player A)
//!   2 = Red  (player B)
//! ```
//!
//! # Coordinate Set Encoding (256-bit)
//!
//! ```text
//! Bit index = row * 16 + col, spread over four u64 words:
//!   word = index / 64, bit = index % 64
//!
//! The stride is fixed at 16 regardless of board width, so a set built on one
//! board can be compared against any other board's sets.
//!
//! Index layout (first rows):
//!   (0,0)=0   (0,1)=1   ... (0,14)=14
//!   (1,0)=16  (1,1)=17  ... (1,14)=30
//! ```
//!
//! # Moves
//!
//! ```text
//! Expand { origin }  every empty cell 4-adjacent to the group at origin
//!                    becomes the mover's color
//! Place { cell }     void-expansion only: an empty cell touching none of the
//!                    mover's pieces becomes the mover's color
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod notation;

#[cfg(feature = "wasm")]
pub mod wasm;

use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};

pub use config::GameConfig;
pub use engine::{Game, MoveRecord, Outcome, Phase, Preview, Snapshot};
pub use error::{ConfigError, MoveError, NotationError};

/// Largest supported row or column count.
pub const MAX_DIM: u8 = 15;

/// Dimension bound of the classic ruleset.
pub const CLASSIC_MAX_DIM: u8 = 10;

/// Bit stride of one row inside a [`CellSet`].
const STRIDE: usize = 16;

/// Player identifier.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Player {
    Blue = 1,
    Red = 2,
}

impl Player {
    /// Get the opponent player.
    #[inline]
    pub fn opponent(self) -> Player {
        match self {
            Player::Blue => Player::Red,
            Player::Red => Player::Blue,
        }
    }

    /// The cell state this player's pieces occupy.
    #[inline]
    pub fn cell(self) -> Cell {
        match self {
            Player::Blue => Cell::Blue,
            Player::Red => Cell::Red,
        }
    }

    /// Convert from u8 (1 or 2) to Player.
    #[inline]
    pub fn from_bits(bits: u8) -> Option<Player> {
        match bits {
            1 => Some(Player::Blue),
            2 => Some(Player::Red),
            _ => None,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::Blue => f.write_str("Blue"),
            Player::Red => f.write_str("Red"),
        }
    }
}

/// State of a single board cell.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Cell {
    #[default]
    Empty = 0,
    Blue = 1,
    Red = 2,
}

impl Cell {
    /// The player occupying this cell, if any.
    #[inline]
    pub fn owner(self) -> Option<Player> {
        Player::from_bits(self as u8)
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    /// Next state in the setup editor cycle: Empty -> Blue -> Red -> Empty.
    #[inline]
    pub fn cycled(self) -> Cell {
        match self {
            Cell::Empty => Cell::Blue,
            Cell::Blue => Cell::Red,
            Cell::Red => Cell::Empty,
        }
    }
}

/// Position on the board.
///
/// Ordering is row-major, which is also the iteration order of [`CellSet`].
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Pos {
    pub row: u8,
    pub col: u8,
}

impl Pos {
    #[inline]
    pub const fn new(row: u8, col: u8) -> Pos {
        Pos { row, col }
    }

    /// Bit index inside a [`CellSet`].
    #[inline]
    fn bit(self) -> usize {
        debug_assert!((self.row as usize) < STRIDE && (self.col as usize) < STRIDE);
        self.row as usize * STRIDE + self.col as usize
    }

    #[inline]
    fn from_bit(idx: usize) -> Pos {
        Pos::new((idx / STRIDE) as u8, (idx % STRIDE) as u8)
    }
}

/// A move in the game.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Move {
    /// Grow the group containing `origin` into its whole frontier.
    Expand { origin: Pos },
    /// Drop a new isolated piece (void-expansion only).
    Place { cell: Pos },
}

impl Move {
    /// The cell the player clicked to make this move.
    #[inline]
    pub fn target(&self) -> Pos {
        match self {
            Move::Expand { origin } => *origin,
            Move::Place { cell } => *cell,
        }
    }
}

/// Ruleset modifier.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Variant {
    /// Expansion moves only.
    #[default]
    Normal,
    /// Expansion moves plus isolated placements.
    VoidExpansion,
}

impl Variant {
    #[inline]
    pub fn allows_placement(self) -> bool {
        self == Variant::VoidExpansion
    }
}

// ============================================================================
// COORDINATE SETS - Allocation-free groups and frontiers
// ============================================================================

/// Set of board positions packed into 256 bits.
///
/// See module documentation for the bit layout.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CellSet([u64; 4]);

impl CellSet {
    /// Create an empty set.
    #[inline]
    pub const fn new() -> CellSet {
        CellSet([0; 4])
    }

    /// Add a position. Returns true if it was not already present.
    #[inline]
    pub fn insert(&mut self, pos: Pos) -> bool {
        let idx = pos.bit();
        let mask = 1u64 << (idx % 64);
        let fresh = self.0[idx / 64] & mask == 0;
        self.0[idx / 64] |= mask;
        fresh
    }

    /// Remove a position. Returns true if it was present.
    #[inline]
    pub fn remove(&mut self, pos: Pos) -> bool {
        let idx = pos.bit();
        let mask = 1u64 << (idx % 64);
        let present = self.0[idx / 64] & mask != 0;
        self.0[idx / 64] &= !mask;
        present
    }

    #[inline]
    pub fn contains(&self, pos: Pos) -> bool {
        let idx = pos.bit();
        self.0[idx / 64] & (1u64 << (idx % 64)) != 0
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.iter().map(|w| w.count_ones() as usize).sum()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|&w| w == 0)
    }

    /// Positions in either set.
    #[inline]
    pub fn union(&self, other: &CellSet) -> CellSet {
        let mut words = self.0;
        for (w, o) in words.iter_mut().zip(other.0) {
            *w |= o;
        }
        CellSet(words)
    }

    /// Positions in both sets.
    #[inline]
    pub fn intersection(&self, other: &CellSet) -> CellSet {
        let mut words = self.0;
        for (w, o) in words.iter_mut().zip(other.0) {
            *w &= o;
        }
        CellSet(words)
    }

    /// Positions in `self` but not in `other`.
    #[inline]
    pub fn difference(&self, other: &CellSet) -> CellSet {
        let mut words = self.0;
        for (w, o) in words.iter_mut().zip(other.0) {
            *w &= !o;
        }
        CellSet(words)
    }

    #[inline]
    pub fn is_disjoint(&self, other: &CellSet) -> bool {
        self.intersection(other).is_empty()
    }

    /// Iterate over positions in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = Pos> + '_ {
        self.0.iter().enumerate().flat_map(|(w, &word)| {
            let mut bits = word;
            std::iter::from_fn(move || {
                if bits == 0 {
                    return None;
                }
                let tz = bits.trailing_zeros() as usize;
                bits &= bits - 1;
                Some(Pos::from_bit(w * 64 + tz))
            })
        })
    }
}

impl fmt::Debug for CellSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter().map(|p| (p.row, p.col))).finish()
    }
}

impl FromIterator<Pos> for CellSet {
    fn from_iter<I: IntoIterator<Item = Pos>>(iter: I) -> Self {
        let mut set = CellSet::new();
        set.extend(iter);
        set
    }
}

impl Extend<Pos> for CellSet {
    fn extend<I: IntoIterator<Item = Pos>>(&mut self, iter: I) {
        for pos in iter {
            self.insert(pos);
        }
    }
}

impl Serialize for CellSet {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

// ============================================================================
// BOARD MODEL
// ============================================================================

/// Rectangular grid of cells.
///
/// Serializes as a list of rows, matching the nested-array board of the UI.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<Cell>>", into = "Vec<Vec<Cell>>")]
pub struct Board {
    rows: u8,
    cols: u8,
    cells: Vec<Cell>,
}

impl Board {
    /// Neighbor offsets: up, down, left, right.
    const DIRECTIONS: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

    /// Create an all-empty board.
    ///
    /// Panics if either dimension is outside 1..=MAX_DIM; sizes are validated
    /// by [`GameConfig::validate`] before a board is ever built.
    pub fn new(rows: u8, cols: u8) -> Board {
        assert!(
            (1..=MAX_DIM).contains(&rows) && (1..=MAX_DIM).contains(&cols),
            "board dimensions {rows}x{cols} outside 1..={MAX_DIM}"
        );
        Board {
            rows,
            cols,
            cells: vec![Cell::Empty; rows as usize * cols as usize],
        }
    }

    /// Build a board from a list of rows.
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Result<Board, NotationError> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        let limit = MAX_DIM as usize;
        if !(1..=limit).contains(&height) || !(1..=limit).contains(&width) {
            return Err(NotationError::Dimensions {
                rows: height,
                cols: width,
            });
        }
        if let Some((row, found)) = rows
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|&(_, len)| len != width)
        {
            return Err(NotationError::Ragged {
                row,
                expected: width,
                found,
            });
        }
        Ok(Board {
            rows: height as u8,
            cols: width as u8,
            cells: rows.into_iter().flatten().collect(),
        })
    }

    #[inline]
    pub fn rows(&self) -> u8 {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> u8 {
        self.cols
    }

    /// Check if a position lies on this board.
    #[inline]
    pub fn contains(&self, pos: Pos) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    #[inline]
    fn index(&self, pos: Pos) -> usize {
        assert!(
            self.contains(pos),
            "({}, {}) outside {}x{} board",
            pos.row,
            pos.col,
            self.rows,
            self.cols
        );
        pos.row as usize * self.cols as usize + pos.col as usize
    }

    /// Get the state of a cell. Panics when out of bounds.
    #[inline]
    pub fn get(&self, pos: Pos) -> Cell {
        self.cells[self.index(pos)]
    }

    /// Set the state of a cell. Panics when out of bounds.
    #[inline]
    pub fn set(&mut self, pos: Pos, cell: Cell) {
        let idx = self.index(pos);
        self.cells[idx] = cell;
    }

    /// Iterate over all positions in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Pos> {
        let cols = self.cols;
        (0..self.rows).flat_map(move |row| (0..cols).map(move |col| Pos::new(row, col)))
    }

    /// Iterate over `(position, state)` pairs in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (Pos, Cell)> + '_ {
        self.positions().zip(self.cells.iter().copied())
    }

    /// Count cells holding the given state.
    pub fn count(&self, cell: Cell) -> usize {
        self.cells.iter().filter(|&&c| c == cell).count()
    }

    /// In-bounds 4-neighbors of a position (up, down, left, right).
    pub fn neighbors(&self, pos: Pos) -> impl Iterator<Item = Pos> {
        let (rows, cols) = (self.rows as i16, self.cols as i16);
        Self::DIRECTIONS.into_iter().filter_map(move |(dr, dc)| {
            let r = pos.row as i16 + dr as i16;
            let c = pos.col as i16 + dc as i16;
            (r >= 0 && r < rows && c >= 0 && c < cols).then(|| Pos::new(r as u8, c as u8))
        })
    }

    // ========== Connectivity ==========

    /// Maximal 4-connected group of same-colored cells containing `origin`.
    ///
    /// Empty cells have no group; the result is then the empty set.
    pub fn connected_group(&self, origin: Pos) -> CellSet {
        let color = self.get(origin);
        let mut group = CellSet::new();
        if color.is_empty() {
            return group;
        }

        let mut queue = VecDeque::from([origin]);
        group.insert(origin);
        while let Some(pos) = queue.pop_front() {
            for next in self.neighbors(pos) {
                if self.get(next) == color && group.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        group
    }

    /// All groups of a player, each listed once, ordered by their first cell.
    pub fn groups(&self, player: Player) -> Vec<CellSet> {
        let color = player.cell();
        let mut visited = CellSet::new();
        let mut groups = Vec::new();
        for (pos, cell) in self.cells() {
            if cell == color && !visited.contains(pos) {
                let group = self.connected_group(pos);
                visited = visited.union(&group);
                groups.push(group);
            }
        }
        groups
    }

    // ========== Move Generation ==========

    /// Empty cells 4-adjacent to at least one cell of `group`.
    pub fn expansion_frontier(&self, group: &CellSet) -> CellSet {
        let mut frontier = CellSet::new();
        for pos in group.iter() {
            for next in self.neighbors(pos) {
                if self.get(next).is_empty() {
                    frontier.insert(next);
                }
            }
        }
        frontier
    }

    /// Every in-bounds cell 4-adjacent to one of the player's pieces.
    ///
    /// May include occupied cells.
    pub fn adjacent_to(&self, player: Player) -> CellSet {
        let color = player.cell();
        let mut touched = CellSet::new();
        for (pos, cell) in self.cells() {
            if cell == color {
                touched.extend(self.neighbors(pos));
            }
        }
        touched
    }

    /// Empty cells touching none of the player's pieces.
    pub fn isolated_empty_cells(&self, player: Player) -> CellSet {
        let touched = self.adjacent_to(player);
        self.cells()
            .filter(|&(pos, cell)| cell.is_empty() && !touched.contains(pos))
            .map(|(pos, _)| pos)
            .collect()
    }

    /// Check whether the player has at least one legal move.
    ///
    /// Stops at the first group with a non-empty frontier; isolated cells are
    /// only computed when no expansion exists.
    pub fn has_legal_move(&self, player: Player, variant: Variant) -> bool {
        let color = player.cell();
        let mut visited = CellSet::new();
        for (pos, cell) in self.cells() {
            if cell != color || visited.contains(pos) {
                continue;
            }
            let group = self.connected_group(pos);
            visited = visited.union(&group);
            if !self.expansion_frontier(&group).is_empty() {
                return true;
            }
        }

        variant.allows_placement() && !self.isolated_empty_cells(player).is_empty()
    }

    /// Enumerate all legal moves for the player.
    ///
    /// One expansion per group with a non-empty frontier (origin is the group's
    /// first cell in row-major order), then in void-expansion one placement
    /// per isolated empty cell.
    pub fn legal_moves(&self, player: Player, variant: Variant) -> Vec<Move> {
        let mut moves: Vec<Move> = self
            .groups(player)
            .into_iter()
            .filter(|group| !self.expansion_frontier(group).is_empty())
            .filter_map(|group| group.iter().next())
            .map(|origin| Move::Expand { origin })
            .collect();

        if variant.allows_placement() {
            moves.extend(
                self.isolated_empty_cells(player)
                    .iter()
                    .map(|cell| Move::Place { cell }),
            );
        }
        moves
    }
}

impl TryFrom<Vec<Vec<Cell>>> for Board {
    type Error = NotationError;

    fn try_from(rows: Vec<Vec<Cell>>) -> Result<Self, Self::Error> {
        Board::from_rows(rows)
    }
}

impl From<Board> for Vec<Vec<Cell>> {
    fn from(board: Board) -> Self {
        board
            .cells
            .chunks(board.cols as usize)
            .map(<[Cell]>::to_vec)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Random board with roughly a third of the cells in each state.
    fn random_board(rng: &mut impl rand::Rng) -> Board {
        let rows = rng.random_range(1..=8);
        let cols = rng.random_range(1..=8);
        let mut board = Board::new(rows, cols);
        for pos in board.positions().collect::<Vec<_>>() {
            let cell = match rng.random_range(0..3) {
                0 => Cell::Empty,
                1 => Cell::Blue,
                _ => Cell::Red,
            };
            board.set(pos, cell);
        }
        board
    }

    fn set_of(cells: &[(u8, u8)]) -> CellSet {
        cells.iter().map(|&(r, c)| Pos::new(r, c)).collect()
    }

    #[test]
    fn test_player_opponent() {
        assert_eq!(Player::Blue.opponent(), Player::Red);
        assert_eq!(Player::Red.opponent(), Player::Blue);
    }

    #[test]
    fn test_cell_owner() {
        assert_eq!(Cell::Empty.owner(), None);
        assert_eq!(Cell::Blue.owner(), Some(Player::Blue));
        assert_eq!(Cell::Red.owner(), Some(Player::Red));
        assert_eq!(Player::Red.cell().owner(), Some(Player::Red));
    }

    #[test]
    fn test_cell_cycle() {
        assert_eq!(Cell::Empty.cycled(), Cell::Blue);
        assert_eq!(Cell::Blue.cycled(), Cell::Red);
        assert_eq!(Cell::Red.cycled(), Cell::Empty);
    }

    // ========== Coordinate Set Tests ==========

    #[test]
    fn test_cell_set_insert_remove() {
        let mut set = CellSet::new();
        assert!(set.is_empty());
        assert!(set.insert(Pos::new(3, 4)));
        assert!(!set.insert(Pos::new(3, 4)));
        assert!(set.contains(Pos::new(3, 4)));
        assert!(!set.contains(Pos::new(4, 3)));
        assert_eq!(set.len(), 1);
        assert!(set.remove(Pos::new(3, 4)));
        assert!(!set.remove(Pos::new(3, 4)));
        assert!(set.is_empty());
    }

    #[test]
    fn test_cell_set_corners() {
        // Exercise every word boundary of the 256-bit layout.
        let corners = [(0, 0), (3, 15), (4, 0), (7, 15), (8, 0), (14, 14), (15, 15)];
        let set = set_of(&corners);
        assert_eq!(set.len(), corners.len());
        let listed: Vec<_> = set.iter().map(|p| (p.row, p.col)).collect();
        assert_eq!(listed, corners);
    }

    #[test]
    fn test_cell_set_iter_row_major() {
        let set = set_of(&[(2, 1), (0, 5), (2, 0), (1, 9)]);
        let listed: Vec<_> = set.iter().collect();
        let mut sorted = listed.clone();
        sorted.sort();
        assert_eq!(listed, sorted);
    }

    #[test]
    fn test_cell_set_algebra() {
        let a = set_of(&[(0, 0), (0, 1), (1, 1)]);
        let b = set_of(&[(1, 1), (2, 2)]);
        assert_eq!(a.union(&b), set_of(&[(0, 0), (0, 1), (1, 1), (2, 2)]));
        assert_eq!(a.intersection(&b), set_of(&[(1, 1)]));
        assert_eq!(a.difference(&b), set_of(&[(0, 0), (0, 1)]));
        assert!(!a.is_disjoint(&b));
        assert!(a.difference(&b).is_disjoint(&b));
    }

    // ========== Board Model Tests ==========

    #[test]
    fn test_board_new() {
        let board = Board::new(3, 5);
        assert_eq!(board.rows(), 3);
        assert_eq!(board.cols(), 5);
        assert_eq!(board.count(Cell::Empty), 15);
        assert!(board.cells().all(|(_, c)| c.is_empty()));
    }

    #[test]
    #[should_panic]
    fn test_board_new_rejects_zero() {
        Board::new(0, 4);
    }

    #[test]
    #[should_panic]
    fn test_board_new_rejects_oversize() {
        Board::new(4, MAX_DIM + 1);
    }

    #[test]
    #[should_panic]
    fn test_board_get_out_of_bounds() {
        let board = Board::new(2, 2);
        board.get(Pos::new(2, 0));
    }

    #[test]
    fn test_board_set_get() {
        let mut board = Board::new(4, 3);
        board.set(Pos::new(3, 2), Cell::Red);
        board.set(Pos::new(0, 1), Cell::Blue);
        assert_eq!(board.get(Pos::new(3, 2)), Cell::Red);
        assert_eq!(board.get(Pos::new(0, 1)), Cell::Blue);
        assert_eq!(board.get(Pos::new(1, 1)), Cell::Empty);
        assert_eq!(board.count(Cell::Red), 1);
    }

    #[test]
    fn test_board_clone_is_independent() {
        let mut board = Board::new(2, 2);
        let snapshot = board.clone();
        board.set(Pos::new(0, 0), Cell::Blue);
        assert_eq!(snapshot.get(Pos::new(0, 0)), Cell::Empty);
    }

    #[test]
    fn test_neighbors_corner_and_center() {
        let board = Board::new(3, 3);
        let corner: Vec<_> = board.neighbors(Pos::new(0, 0)).collect();
        assert_eq!(corner, vec![Pos::new(1, 0), Pos::new(0, 1)]);

        let center: Vec<_> = board.neighbors(Pos::new(1, 1)).collect();
        assert_eq!(
            center,
            vec![Pos::new(0, 1), Pos::new(2, 1), Pos::new(1, 0), Pos::new(1, 2)]
        );
    }

    #[test]
    fn test_neighbors_single_cell_board() {
        let board = Board::new(1, 1);
        assert_eq!(board.neighbors(Pos::new(0, 0)).count(), 0);
    }

    #[test]
    fn test_from_rows_ragged() {
        let rows = vec![vec![Cell::Empty; 3], vec![Cell::Empty; 2]];
        assert_eq!(
            Board::from_rows(rows),
            Err(NotationError::Ragged {
                row: 1,
                expected: 3,
                found: 2
            })
        );
    }

    #[test]
    fn test_from_rows_dimensions() {
        assert_eq!(
            Board::from_rows(vec![]),
            Err(NotationError::Dimensions { rows: 0, cols: 0 })
        );
        assert_eq!(
            Board::from_rows(vec![vec![Cell::Empty; 16]]),
            Err(NotationError::Dimensions { rows: 1, cols: 16 })
        );
    }

    // ========== Connectivity Tests ==========

    #[test]
    fn test_group_of_empty_cell_is_empty() {
        let board = Board::new(3, 3);
        assert!(board.connected_group(Pos::new(1, 1)).is_empty());
    }

    #[test]
    fn test_group_stops_at_other_color() {
        let mut board = Board::new(3, 4);
        // B B R .
        // . B R .
        // B . . .
        board.set(Pos::new(0, 0), Cell::Blue);
        board.set(Pos::new(0, 1), Cell::Blue);
        board.set(Pos::new(1, 1), Cell::Blue);
        board.set(Pos::new(0, 2), Cell::Red);
        board.set(Pos::new(1, 2), Cell::Red);
        board.set(Pos::new(2, 0), Cell::Blue);

        assert_eq!(
            board.connected_group(Pos::new(0, 0)),
            set_of(&[(0, 0), (0, 1), (1, 1)])
        );
        assert_eq!(board.connected_group(Pos::new(2, 0)), set_of(&[(2, 0)]));
        assert_eq!(
            board.connected_group(Pos::new(1, 2)),
            set_of(&[(0, 2), (1, 2)])
        );
    }

    #[test]
    fn test_group_ignores_diagonals() {
        let mut board = Board::new(2, 2);
        board.set(Pos::new(0, 0), Cell::Red);
        board.set(Pos::new(1, 1), Cell::Red);
        assert_eq!(board.connected_group(Pos::new(0, 0)), set_of(&[(0, 0)]));
    }

    #[test]
    fn test_group_snake() {
        let mut board = Board::new(3, 3);
        // B B B
        // . . B
        // B B B
        for (r, c) in [(0, 0), (0, 1), (0, 2), (1, 2), (2, 2), (2, 1), (2, 0)] {
            board.set(Pos::new(r, c), Cell::Blue);
        }
        assert_eq!(board.connected_group(Pos::new(2, 0)).len(), 7);
        assert_eq!(
            board.expansion_frontier(&board.connected_group(Pos::new(0, 0))),
            set_of(&[(1, 0), (1, 1)])
        );
    }

    #[test]
    fn test_groups_lists_each_once() {
        let mut board = Board::new(3, 3);
        board.set(Pos::new(0, 0), Cell::Blue);
        board.set(Pos::new(0, 1), Cell::Blue);
        board.set(Pos::new(2, 2), Cell::Blue);
        board.set(Pos::new(1, 1), Cell::Red);

        let groups = board.groups(Player::Blue);
        assert_eq!(groups, vec![set_of(&[(0, 0), (0, 1)]), set_of(&[(2, 2)])]);
        assert_eq!(board.groups(Player::Red).len(), 1);
    }

    #[test]
    fn test_group_same_from_every_member_fuzz() {
        use rand::prelude::*;

        let mut rng = rand::rng();

        for _ in 0..200 {
            let board = random_board(&mut rng);
            for (pos, cell) in board.cells() {
                let group = board.connected_group(pos);
                if cell.is_empty() {
                    assert!(group.is_empty());
                    continue;
                }
                assert!(group.contains(pos));
                for member in group.iter() {
                    assert_eq!(board.get(member), cell);
                    assert_eq!(board.connected_group(member), group, "board:\n{board}");
                }
            }
        }
    }

    // ========== Move Generation Tests ==========

    #[test]
    fn test_frontier_of_empty_group() {
        let board = Board::new(3, 3);
        assert!(board.expansion_frontier(&CellSet::new()).is_empty());
    }

    #[test]
    fn test_frontier_corner_piece() {
        let mut board = Board::new(2, 2);
        board.set(Pos::new(0, 0), Cell::Blue);
        let group = board.connected_group(Pos::new(0, 0));
        assert_eq!(board.expansion_frontier(&group), set_of(&[(0, 1), (1, 0)]));
    }

    #[test]
    fn test_frontier_blocked_by_opponent() {
        let mut board = Board::new(1, 3);
        board.set(Pos::new(0, 0), Cell::Blue);
        board.set(Pos::new(0, 1), Cell::Red);
        let group = board.connected_group(Pos::new(0, 0));
        assert!(board.expansion_frontier(&group).is_empty());
    }

    #[test]
    fn test_frontier_never_occupied_fuzz() {
        use rand::prelude::*;

        let mut rng = rand::rng();

        for _ in 0..200 {
            let board = random_board(&mut rng);
            for pos in board.positions() {
                let frontier = board.expansion_frontier(&board.connected_group(pos));
                for target in frontier.iter() {
                    assert!(board.get(target).is_empty());
                }
            }
        }
    }

    #[test]
    fn test_isolated_cells() {
        let mut board = Board::new(3, 3);
        board.set(Pos::new(0, 0), Cell::Blue);
        board.set(Pos::new(2, 2), Cell::Red);

        let isolated = board.isolated_empty_cells(Player::Blue);
        assert_eq!(
            isolated,
            set_of(&[(0, 2), (1, 1), (1, 2), (2, 0), (2, 1)])
        );
        assert!(!isolated.contains(Pos::new(0, 1)));
        assert!(!isolated.contains(Pos::new(1, 0)));
    }

    #[test]
    fn test_isolated_cells_no_pieces() {
        let board = Board::new(2, 3);
        assert_eq!(board.isolated_empty_cells(Player::Red).len(), 6);
    }

    #[test]
    fn test_isolated_partition_fuzz() {
        use rand::prelude::*;

        let mut rng = rand::rng();

        for _ in 0..200 {
            let board = random_board(&mut rng);
            for player in [Player::Blue, Player::Red] {
                let isolated = board.isolated_empty_cells(player);
                let touched = board.adjacent_to(player);
                let empty: CellSet = board
                    .cells()
                    .filter(|(_, c)| c.is_empty())
                    .map(|(p, _)| p)
                    .collect();

                assert!(isolated.is_disjoint(&touched));
                assert_eq!(isolated.union(&touched).intersection(&empty), empty);
            }
        }
    }

    #[test]
    fn test_has_legal_move_no_pieces() {
        let board = Board::new(3, 3);
        assert!(!board.has_legal_move(Player::Blue, Variant::Normal));
        assert!(board.has_legal_move(Player::Blue, Variant::VoidExpansion));
    }

    #[test]
    fn test_has_legal_move_full_board() {
        let mut board = Board::new(2, 2);
        for pos in board.positions().collect::<Vec<_>>() {
            board.set(pos, Cell::Red);
        }
        assert!(!board.has_legal_move(Player::Red, Variant::VoidExpansion));
        assert!(!board.has_legal_move(Player::Blue, Variant::VoidExpansion));
    }

    #[test]
    fn test_has_legal_move_walled_in() {
        // B R .
        // R . .
        let mut board = Board::new(2, 3);
        board.set(Pos::new(0, 0), Cell::Blue);
        board.set(Pos::new(0, 1), Cell::Red);
        board.set(Pos::new(1, 0), Cell::Red);

        assert!(!board.has_legal_move(Player::Blue, Variant::Normal));
        // (0,2), (1,1), (1,2) are not adjacent to blue
        assert!(board.has_legal_move(Player::Blue, Variant::VoidExpansion));
        assert!(board.has_legal_move(Player::Red, Variant::Normal));
    }

    #[test]
    fn test_legal_moves_order() {
        let mut board = Board::new(3, 3);
        board.set(Pos::new(0, 1), Cell::Blue);
        board.set(Pos::new(0, 2), Cell::Blue);
        board.set(Pos::new(2, 0), Cell::Blue);

        assert_eq!(
            board.legal_moves(Player::Blue, Variant::Normal),
            vec![
                Move::Expand { origin: Pos::new(0, 1) },
                Move::Expand { origin: Pos::new(2, 0) },
            ]
        );

        let void = board.legal_moves(Player::Blue, Variant::VoidExpansion);
        // only (2,2) touches no blue piece
        assert_eq!(void.len(), 3);
        assert_eq!(void[2], Move::Place { cell: Pos::new(2, 2) });
    }

    #[test]
    fn test_has_legal_move_matches_enumeration_fuzz() {
        use rand::prelude::*;

        let mut rng = rand::rng();

        for _ in 0..300 {
            let board = random_board(&mut rng);
            for player in [Player::Blue, Player::Red] {
                let expandable = board
                    .groups(player)
                    .iter()
                    .any(|g| !board.expansion_frontier(g).is_empty());
                let isolated = !board.isolated_empty_cells(player).is_empty();

                assert_eq!(board.has_legal_move(player, Variant::Normal), expandable);
                assert_eq!(
                    board.has_legal_move(player, Variant::VoidExpansion),
                    expandable || isolated
                );
                for variant in [Variant::Normal, Variant::VoidExpansion] {
                    assert_eq!(
                        board.has_legal_move(player, variant),
                        !board.legal_moves(player, variant).is_empty()
                    );
                }
            }
        }
    }

    #[test]
    fn test_move_target() {
        let expand = Move::Expand { origin: Pos::new(1, 2) };
        let place = Move::Place { cell: Pos::new(3, 0) };
        assert_eq!(expand.target(), Pos::new(1, 2));
        assert_eq!(place.target(), Pos::new(3, 0));
    }
}
