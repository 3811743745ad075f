//! Legal destination generator
//!
//! Only pawns are able to move. Any other piece kind yields no destinations at all, and
//! king safety is never taken into account.

use crate::bitboard::Bitboard;
use crate::bitboard_consts;
use crate::board::Board;
use crate::geometry::{self, Heading};
use crate::moves::Move;
use crate::types::{Cell, Color, Coord, Piece};

use std::ops::{Deref, DerefMut};
use std::slice;

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

/// Policy selecting where the pawns of each color advance
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PawnDirection {
    /// All pawns advance toward row 0, start their double step from row 6 and promote
    /// on row 0, whatever their color is
    #[default]
    Fixed,
    /// White pawns advance toward row 0, black pawns advance toward row 7
    ByColor,
}

impl PawnDirection {
    /// Returns the heading of the pawns with color `c`
    #[inline]
    pub fn heading(self, c: Color) -> Heading {
        match (self, c) {
            (Self::Fixed, _) | (Self::ByColor, Color::White) => Heading::Up,
            (Self::ByColor, Color::Black) => Heading::Down,
        }
    }
}

#[derive(Default, Debug, Clone, Eq, PartialEq)]
pub struct MoveList(ArrayVec<Move, 256>);

impl Deref for MoveList {
    type Target = ArrayVec<Move, 256>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for MoveList {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl MoveList {
    pub fn new() -> MoveList {
        MoveList(ArrayVec::new())
    }
}

pub trait MovePush {
    fn push(&mut self, m: Move);
}

impl MovePush for MoveList {
    fn push(&mut self, m: Move) {
        self.0.push(m);
    }
}

impl MovePush for Vec<Move> {
    fn push(&mut self, m: Move) {
        self.push(m);
    }
}

fn pawn_destinations(b: &Board, c: Color, at: Coord, h: Heading) -> Bitboard {
    let src = Bitboard::from_coord(at);
    let empty = !b.occupied();

    let single = geometry::advance_forward(h, src) & empty;
    let mut res = single;
    if single.is_nonempty() && (src & bitboard_consts::rank(geometry::home_rank(h))).is_nonempty()
    {
        res |= geometry::advance_forward(h, single) & empty;
    }

    let enemy = b.color(c.inv());
    res | ((geometry::advance_left(h, src) | geometry::advance_right(h, src)) & enemy)
}

/// Returns the set of legal destinations for `cell` standing on `at`
///
/// Does the same as [`legal_destinations_with`] with the [`PawnDirection::Fixed`] policy.
#[inline]
pub fn legal_destinations(b: &Board, cell: Cell, at: Coord) -> Bitboard {
    legal_destinations_with(b, cell, at, PawnDirection::Fixed)
}

/// Returns the set of legal destinations for `cell` standing on `at`
///
/// A pawn may step forward onto an empty square, step forward twice from its home rank
/// if both squares are empty, and capture diagonally forward onto a square with a piece
/// of the opposite color. Empty cells and non-pawn pieces have no destinations.
///
/// # Example
///
/// ```
/// # use minichess::{Board, Coord, movegen};
/// #
/// let b = Board::initial();
/// let at = Coord::from_row_col(6, 4);
/// let dsts = movegen::legal_destinations(&b, b.get(at), at);
/// assert_eq!(
///     dsts.into_iter().map(|c| c.to_string()).collect::<Vec<_>>(),
///     vec!["e4", "e3"],
/// );
/// ```
pub fn legal_destinations_with(
    b: &Board,
    cell: Cell,
    at: Coord,
    direction: PawnDirection,
) -> Bitboard {
    match (cell.color(), cell.piece()) {
        (Some(c), Some(Piece::Pawn)) => pawn_destinations(b, c, at, direction.heading(c)),
        _ => Bitboard::EMPTY,
    }
}

/// Pushes every move of the side `c` into `dst`
pub fn candidates_into<P: MovePush>(b: &Board, c: Color, direction: PawnDirection, dst: &mut P) {
    for (src, cell) in b.pieces(c) {
        for to in legal_destinations_with(b, cell, src, direction) {
            dst.push(Move::new(src, to));
        }
    }
}

/// Enumerates every move of the side `c`
///
/// The moves are ordered by source square index, then by destination square index.
pub fn candidates(b: &Board, c: Color, direction: PawnDirection) -> MoveList {
    let mut res = MoveList::new();
    candidates_into(b, c, direction, &mut res);
    res
}

/// Returns `true` if the side `c` has at least one legal move
pub fn has_moves(b: &Board, c: Color, direction: PawnDirection) -> bool {
    b.pieces(c)
        .any(|(src, cell)| legal_destinations_with(b, cell, src, direction).is_nonempty())
}
