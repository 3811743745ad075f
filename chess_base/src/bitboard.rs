use crate::types::Coord;
use derive_more::{BitAnd, BitAndAssign, BitOr, BitOrAssign, Not};
use std::fmt;
use std::iter::FromIterator;

/// Set of squares, one bit per square index
///
/// Bit `row * 8 + col` stands for the square on board row `row`, so row 0 (the 8th rank)
/// occupies the lowest byte. Shifting right by 8 moves every square one row toward row 0.
#[derive(Default, Copy, Clone, PartialEq, Eq, Hash, BitAnd, BitAndAssign, BitOr, BitOrAssign, Not)]
pub struct Bitboard(u64);

impl Bitboard {
    pub const EMPTY: Bitboard = Bitboard(0);

    /// Builds a set from its bit mask, used for the rank and file tables
    pub const fn from_raw(mask: u64) -> Bitboard {
        Bitboard(mask)
    }

    pub const fn from_coord(coord: Coord) -> Bitboard {
        Bitboard(1 << coord.index())
    }

    pub const fn with(self, coord: Coord) -> Bitboard {
        Bitboard(self.0 | Self::from_coord(coord).0)
    }

    pub const fn without(self, coord: Coord) -> Bitboard {
        Bitboard(self.0 & !Self::from_coord(coord).0)
    }

    /// Moves every square `by` indices up, dropping those that fall off row 7
    pub const fn shl(self, by: usize) -> Bitboard {
        Bitboard(self.0 << by)
    }

    /// Moves every square `by` indices down, dropping those that fall off row 0
    pub const fn shr(self, by: usize) -> Bitboard {
        Bitboard(self.0 >> by)
    }

    #[inline]
    pub fn set(&mut self, coord: Coord) {
        self.0 |= Self::from_coord(coord).0;
    }

    #[inline]
    pub fn unset(&mut self, coord: Coord) {
        self.0 &= !Self::from_coord(coord).0;
    }

    pub const fn has(&self, coord: Coord) -> bool {
        self.0 & Self::from_coord(coord).0 != 0
    }

    /// Number of squares in the set
    pub const fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub const fn is_nonempty(&self) -> bool {
        self.0 != 0
    }
}

impl fmt::Debug for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "Bitboard({})", self)
    }
}

/// Rows from row 0 to row 7, separated by `/`, with `x` for a member square
impl fmt::Display for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        for row in 0..8 {
            if row != 0 {
                write!(f, "/")?;
            }
            for col in 0..8 {
                let c = if self.has(Coord::from_row_col(row, col)) { 'x' } else { '.' };
                write!(f, "{}", c)?;
            }
        }
        Ok(())
    }
}

/// Iterator over the squares of a [`Bitboard`] in index order
pub struct Iter(Bitboard);

impl Iterator for Iter {
    type Item = Coord;

    fn next(&mut self) -> Option<Coord> {
        if self.0.is_empty() {
            return None;
        }
        let coord = Coord::from_index(self.0 .0.trailing_zeros() as usize);
        self.0.unset(coord);
        Some(coord)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.0.len(), Some(self.0.len()))
    }
}

impl ExactSizeIterator for Iter {}

impl IntoIterator for Bitboard {
    type Item = Coord;
    type IntoIter = Iter;

    fn into_iter(self) -> Iter {
        Iter(self)
    }
}

impl FromIterator<Coord> for Bitboard {
    fn from_iter<I: IntoIterator<Item = Coord>>(iter: I) -> Self {
        iter.into_iter().fold(Bitboard::EMPTY, Bitboard::with)
    }
}
