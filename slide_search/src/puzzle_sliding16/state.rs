use crate::error::StateError;
use crate::puzzle_sliding16::utils::{BITS_PER_CELL, BITS_PER_CELL_MASK64, MAX_SIDE, MIN_SIDE};
use std::fmt;
use std::iter::FusedIterator;

/// Board state of a square sliding puzzle.
///
/// Tiles are stored row by row, 0 denotes the blank.
/// `State` is `Copy`: moving the blank produces a new value and never changes a shared one.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct State {
    /// Indexed by board indices, gives tiles numbers that occupy given board cell.
    pub board: u64,

    /// Number of rows (and columns).
    side: u8
}

impl State {

    /// Constructs `State` of `side`x`side` board from `tiles` given row by row.
    ///
    /// Fails if `side` is not supported or `tiles` is not a permutation of `0..side*side`.
    pub fn new(side: u8, tiles: &[u8]) -> Result<Self, StateError> {
        if !(MIN_SIDE..=MAX_SIDE).contains(&side) { return Err(StateError::UnsupportedSide(side)); }
        let cells = side * side;
        if tiles.len() != cells as usize {
            return Err(StateError::WrongTileCount { expected: cells as usize, actual: tiles.len() });
        }
        let mut seen = 0u16;
        for &t in tiles {
            if t >= cells { return Err(StateError::TileOutOfRange { tile: t, cells }); }
            if seen & (1 << t) != 0 {
                return Err(if t == 0 { StateError::BlankCount(2) } else { StateError::DuplicateTile(t) });
            }
            seen |= 1 << t;
        }
        Ok(Self::from_tiles_unchecked(side, tiles.iter().copied()))
    }

    /// Constructs `State` from rows of tiles, e.g. `&[[1, 2, 3], [4, 0, 6], [7, 5, 8]]`.
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> Result<Self, StateError> {
        let side = rows.len();
        let mut tiles = Vec::with_capacity(side * side);
        for row in rows {
            let row = row.as_ref();
            if row.len() != side {
                return Err(StateError::WrongTileCount { expected: side * side, actual: side * (side - 1) + row.len() });
            }
            tiles.extend_from_slice(row);
        }
        let side = u8::try_from(side).map_err(|_| StateError::UnsupportedSide(u8::MAX))?;
        Self::new(side, &tiles)
    }

    /// Packs `tiles` without any validation.
    /// The result may have no blank or several blanks, see `blank_cell`.
    pub fn from_tiles_unchecked(side: u8, tiles: impl IntoIterator<Item=u8>) -> Self {
        let mut board = 0u64;
        let mut index = 0;
        for t in tiles {
            board |= (t as u64) << index;
            index += BITS_PER_CELL;
        }
        Self { board, side }
    }

    /// Constructs goal state for the `side`x`side` board: ascending tiles, blank in the bottom-right corner.
    /// `side` must be supported (see `Board::new`).
    pub fn goal(side: u8) -> Self {
        let cells = side * side;
        Self::from_tiles_unchecked(side, (1..cells).chain(std::iter::once(0)))
    }

    #[inline] pub fn side(&self) -> u8 { self.side }

    /// Returns number of cells in board.
    #[inline] pub fn board_size(&self) -> u8 { self.side * self.side }

    /// Swap blank with the tile that occupy new_blank_position.
    /// Returns number of this tile.
    pub fn move_blank(&mut self, current_blank_position: u8, new_blank_position: u8) -> u8 {
        let new_blank_index = new_blank_position * BITS_PER_CELL;
        let result = (self.board >> new_blank_index) & BITS_PER_CELL_MASK64;
        self.board &= !(BITS_PER_CELL_MASK64 << new_blank_index);       // clear cell which should be blank
        self.board |= result << (current_blank_position * BITS_PER_CELL);    // set old blank cell to result
        result as u8
    }

    /// Returns a copy of `self` with blank moved from `current_blank_position` to `new_blank_position`.
    #[inline] pub fn moved_blank(mut self, current_blank_position: u8, new_blank_position: u8) -> Self {
        self.move_blank(current_blank_position, new_blank_position);
        self
    }

    /// Tile at position.
    #[inline] pub fn tile_at(&self, position: u8) -> u8 {
        ((self.board >> (position * BITS_PER_CELL)) & BITS_PER_CELL_MASK64) as u8
    }

    /// Tile at given `row` and `col`.
    #[inline] pub fn tile(&self, row: u8, col: u8) -> u8 {
        self.tile_at(row * self.side + col)
    }

    /// Returns the cell occupied by the blank.
    /// Fails if there is no blank or there are more than one.
    pub fn blank_cell(&self) -> Result<u8, StateError> {
        let mut blank = None;
        let mut count = 0;
        for (cell, t) in self.iter().enumerate() {
            if t == 0 {
                count += 1;
                blank = Some(cell as u8);
            }
        }
        match (count, blank) {
            (1, Some(cell)) => Ok(cell),
            _ => Err(StateError::BlankCount(count))
        }
    }

    /// Checks that `self` holds a permutation of `0..board_size()` and no bits past the last cell.
    ///
    /// Blank errors are reported before duplicated tiles.
    pub fn validate(&self) -> Result<(), StateError> {
        if !(MIN_SIDE..=MAX_SIDE).contains(&self.side) { return Err(StateError::UnsupportedSide(self.side)); }
        let used_bits = self.board_size() * BITS_PER_CELL;
        if (used_bits as u32) < u64::BITS && self.board >> used_bits != 0 {
            return Err(StateError::BitsBeyondBoard);
        }
        self.blank_cell()?;
        let cells = self.board_size();
        let mut seen = 0u16;
        for t in self.iter() {
            if t >= cells { return Err(StateError::TileOutOfRange { tile: t, cells }); }
            if seen & (1 << t) != 0 { return Err(StateError::DuplicateTile(t)); }
            seen |= 1 << t;
        }
        Ok(())
    }

    /// Returns (row, column) of the blank.
    pub fn blank_position(&self) -> Result<(u8, u8), StateError> {
        let cell = self.blank_cell()?;
        Ok((cell / self.side, cell % self.side))
    }

    #[inline] pub fn iter(&self) -> TilesIterator {
        TilesIterator::new(self.board, self.board_size())
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.side {
            if row != 0 { writeln!(f)?; }
            for col in 0..self.side {
                if col != 0 { write!(f, " ")?; }
                match self.tile(row, col) {
                    0 => write!(f, " _")?,
                    t => write!(f, "{:2}", t)?
                }
            }
        }
        Ok(())
    }
}

impl fmt::Debug for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "State(")?;
        for (cell, t) in self.iter().enumerate() {
            if cell != 0 { write!(f, "{}", if cell % self.side as usize == 0 { " / " } else { " " })?; }
            write!(f, "{}", t)?;
        }
        write!(f, ")")
    }
}

/// Iterator over tiles of `State`, row by row.
#[derive(Copy, Clone)]
pub struct TilesIterator {
    rest: u64,
    remaining: u8
}

impl TilesIterator {
    #[inline] pub fn new(board: u64, board_size: u8) -> Self {
        Self { rest: board, remaining: board_size }
    }
}

impl Iterator for TilesIterator {
    type Item = u8;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 { return None; }
        self.remaining -= 1;
        let result = (self.rest & BITS_PER_CELL_MASK64) as u8;
        self.rest >>= BITS_PER_CELL;
        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining as usize, Some(self.remaining as usize))
    }
}

impl ExactSizeIterator for TilesIterator {}
impl FusedIterator for TilesIterator {}
