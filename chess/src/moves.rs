//! Moves and their application

use crate::board::Board;
use crate::geometry;
use crate::movegen::{self, PawnDirection};
use crate::types::{Cell, Coord, CoordParseError, Piece};

use std::fmt::{self, Display};
use std::str::FromStr;

use thiserror::Error;

/// Error parsing a move from its `e2e4` form
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum ParseError {
    #[error("bad string length")]
    BadLength,
    #[error("bad source: {0}")]
    BadSrc(#[source] CoordParseError),
    #[error("bad destination: {0}")]
    BadDst(#[source] CoordParseError),
}

/// Error applying a move with [`apply_checked`]
#[derive(Debug, Copy, Clone, Error, Eq, PartialEq)]
pub enum ApplyError {
    #[error("no piece on source square {0}")]
    EmptySource(Coord),
    #[error("destination {dst} is not legal for the piece on {src}")]
    DestinationNotLegal { src: Coord, dst: Coord },
}

/// Chess move
///
/// Only the source and the destination squares are stored. Everything else (capture,
/// promotion) is derived from the board when the move is applied.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Move {
    src: Coord,
    dst: Coord,
}

impl Move {
    #[inline]
    pub const fn new(src: Coord, dst: Coord) -> Move {
        Move { src, dst }
    }

    #[inline]
    pub const fn src(&self) -> Coord {
        self.src
    }

    #[inline]
    pub const fn dst(&self) -> Coord {
        self.dst
    }

    /// Returns `true` if the destination square is occupied before the move
    #[inline]
    pub fn is_capture(&self, b: &Board) -> bool {
        b.get(self.dst).is_occupied()
    }
}

impl Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}{}", self.src, self.dst)
    }
}

impl FromStr for Move {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Move, Self::Err> {
        if s.len() != 4 || !s.is_ascii() {
            return Err(ParseError::BadLength);
        }
        let src = Coord::from_str(&s[0..2]).map_err(ParseError::BadSrc)?;
        let dst = Coord::from_str(&s[2..4]).map_err(ParseError::BadDst)?;
        Ok(Move { src, dst })
    }
}

/// Result of applying a move
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MoveRecord {
    /// Applied move
    pub mv: Move,
    /// Move in `e2-e4` or `e4xd5` form
    pub notation: String,
    /// `true` if a piece was removed from the destination square
    pub capture: bool,
    /// `true` if the moved pawn turned into a queen
    pub promotion: bool,
}

/// Applies `mv` to the board, pawns promoting on row 0
///
/// Does the same as [`apply_move_with`] with the [`PawnDirection::Fixed`] policy.
#[inline]
pub fn apply_move(b: &mut Board, mv: Move) -> MoveRecord {
    apply_move_with(b, mv, PawnDirection::Fixed)
}

/// Applies `mv` to the board without checking that the destination is legal
///
/// Whatever stands on the destination square is removed. A pawn reaching the promotion
/// rank of `direction` becomes a queen of the same color.
///
/// # Panics
///
/// The function panics if the source square is empty. Use [`apply_checked`] for moves
/// that are not known to be legal.
pub fn apply_move_with(b: &mut Board, mv: Move, direction: PawnDirection) -> MoveRecord {
    let capture = mv.is_capture(b);
    let mut cell = b.take(mv.src);
    let color = cell.color();
    assert!(color.is_some(), "no piece on {}", mv.src);

    let mut promotion = false;
    if let Some(color) = color {
        let promote = geometry::promote_rank(direction.heading(color));
        if cell.piece() == Some(Piece::Pawn) && mv.dst.rank() == promote {
            cell = cell.with_piece(Piece::Queen);
            promotion = true;
        }
    }
    b.put(mv.dst, cell);

    let sep = if capture { 'x' } else { '-' };
    MoveRecord {
        mv,
        notation: format!("{}{}{}", mv.src, sep, mv.dst),
        capture,
        promotion,
    }
}

/// Checks `mv` against the legal destinations and applies it
///
/// The board is left untouched on error.
pub fn apply_checked(
    b: &mut Board,
    mv: Move,
    direction: PawnDirection,
) -> Result<MoveRecord, ApplyError> {
    let cell: Cell = b.get(mv.src);
    if cell.is_empty() {
        return Err(ApplyError::EmptySource(mv.src));
    }
    if !movegen::legal_destinations_with(b, cell, mv.src, direction).has(mv.dst) {
        return Err(ApplyError::DestinationNotLegal {
            src: mv.src,
            dst: mv.dst,
        });
    }
    Ok(apply_move_with(b, mv, direction))
}
