//! Board and related things

use crate::bitboard::Bitboard;
use crate::types::{Cell, Color, Coord, File, Piece, Rank};

use std::fmt::{self, Display};
use std::str::FromStr;

use thiserror::Error;

/// Error parsing the board diagram (the piece placement part of FEN)
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum CellsParseError {
    /// Rank is too large
    #[error("too many items in rank {0}")]
    RankOverflow(Rank),
    /// Rank is too small
    #[error("not enough items in rank {0}")]
    RankUnderflow(Rank),
    /// Too many ranks
    #[error("too many ranks")]
    Overflow,
    /// Not enough ranks
    #[error("not enough ranks")]
    Underflow,
    /// Unexpected character
    #[error("unexpected char {0:?}")]
    UnexpectedChar(char),
}

/// Chess board
///
/// An 8×8 grid where each square holds at most one piece. Row 0 is Black's back rank
/// and row 7 is White's back rank. Alongside the cells, the board keeps one [`Bitboard`]
/// per color, so occupancy queries don't need to scan the grid.
///
/// Unlike a full chess position, the board doesn't know whose turn it is: the side to
/// move belongs to the [`Session`](crate::session::Session) owning the board.
///
/// # Example
///
/// ```
/// # use minichess::{Board, Cell, Color, Coord, Piece};
/// #
/// let mut b = Board::empty();
/// b.put(Coord::from_row_col(6, 4), Cell::from_parts(Color::White, Piece::Pawn));
/// assert_eq!(b.as_cells(), "8/8/8/8/8/8/4P3/8");
/// ```
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Board {
    cells: [Cell; 64],
    white: Bitboard,
    black: Bitboard,
}

impl Board {
    /// Returns a board without any pieces
    #[inline]
    pub const fn empty() -> Board {
        Board {
            cells: [Cell::EMPTY; 64],
            white: Bitboard::EMPTY,
            black: Bitboard::EMPTY,
        }
    }

    /// Returns a board with the initial position
    pub fn initial() -> Board {
        let mut res = Board::empty();
        for file in File::iter() {
            res.put2(file, Rank::R2, Cell::from_parts(Color::White, Piece::Pawn));
            res.put2(file, Rank::R7, Cell::from_parts(Color::Black, Piece::Pawn));
        }
        for (color, rank) in [(Color::White, Rank::R1), (Color::Black, Rank::R8)] {
            res.put2(File::A, rank, Cell::from_parts(color, Piece::Rook));
            res.put2(File::B, rank, Cell::from_parts(color, Piece::Knight));
            res.put2(File::C, rank, Cell::from_parts(color, Piece::Bishop));
            res.put2(File::D, rank, Cell::from_parts(color, Piece::Queen));
            res.put2(File::E, rank, Cell::from_parts(color, Piece::King));
            res.put2(File::F, rank, Cell::from_parts(color, Piece::Bishop));
            res.put2(File::G, rank, Cell::from_parts(color, Piece::Knight));
            res.put2(File::H, rank, Cell::from_parts(color, Piece::Rook));
        }
        res
    }

    /// Parses a board from the piece placement part of FEN
    ///
    /// Does the same as [`Board::from_str`].
    #[inline]
    pub fn from_cells(s: &str) -> Result<Board, CellsParseError> {
        Board::from_str(s)
    }

    /// Returns the contents of the square with coordinate `c`
    #[inline]
    pub fn get(&self, c: Coord) -> Cell {
        self.cells[c.index()]
    }

    /// Returns the contents of the square with file `file` and rank `rank`
    #[inline]
    pub fn get2(&self, file: File, rank: Rank) -> Cell {
        self.get(Coord::from_parts(file, rank))
    }

    /// Puts `cell` to the square with coordinate `c`, replacing whatever was there
    pub fn put(&mut self, c: Coord, cell: Cell) {
        let old = self.cells[c.index()];
        if let Some(color) = old.color() {
            self.color_mut(color).unset(c);
        }
        if let Some(color) = cell.color() {
            self.color_mut(color).set(c);
        }
        self.cells[c.index()] = cell;
    }

    /// Puts `cell` to the square with file `file` and rank `rank`
    #[inline]
    pub fn put2(&mut self, file: File, rank: Rank, cell: Cell) {
        self.put(Coord::from_parts(file, rank), cell);
    }

    /// Empties the square `c` and returns its former contents
    #[inline]
    pub fn take(&mut self, c: Coord) -> Cell {
        let cell = self.get(c);
        self.put(c, Cell::EMPTY);
        cell
    }

    /// Returns the bitboard over all the pieces with color `c`
    #[inline]
    pub fn color(&self, c: Color) -> Bitboard {
        match c {
            Color::White => self.white,
            Color::Black => self.black,
        }
    }

    #[inline]
    fn color_mut(&mut self, c: Color) -> &mut Bitboard {
        match c {
            Color::White => &mut self.white,
            Color::Black => &mut self.black,
        }
    }

    /// Returns the bitboard over all the occupied squares
    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.white | self.black
    }

    /// Returns the number of pieces of color `c`
    #[inline]
    pub fn count(&self, c: Color) -> usize {
        self.color(c).len()
    }

    /// Returns the total number of pieces on the board
    #[inline]
    pub fn len(&self) -> usize {
        self.occupied().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.occupied().is_empty()
    }

    /// Iterates over the pieces of color `c` in square index order
    pub fn pieces(&self, c: Color) -> impl Iterator<Item = (Coord, Cell)> + '_ {
        self.color(c).into_iter().map(move |p| (p, self.get(p)))
    }

    /// Wraps the board to allow pretty-printing with the given style `Style`
    ///
    /// The resulting wrapper implements [`fmt::Display`], so can be used with
    /// `write!()`, `println!()`, or `ToString::to_string`.
    ///
    /// # Example
    ///
    /// ```
    /// # use minichess::{Board, board::PrettyStyle};
    /// #
    /// let b = Board::initial();
    ///
    /// let res = r#"
    /// 8|rnbqkbnr
    /// 7|pppppppp
    /// 6|........
    /// 5|........
    /// 4|........
    /// 3|........
    /// 2|PPPPPPPP
    /// 1|RNBQKBNR
    /// -+--------
    ///  |abcdefgh
    /// "#;
    /// assert_eq!(b.pretty(PrettyStyle::Ascii).to_string().trim(), res.trim());
    /// ```
    #[inline]
    pub fn pretty(&self, style: PrettyStyle) -> Pretty<'_> {
        Pretty { board: self, style }
    }

    /// Converts the board into the piece placement part of FEN
    ///
    /// Does the same as `Board::to_string()`.
    #[inline]
    pub fn as_cells(&self) -> String {
        self.to_string()
    }
}

impl Default for Board {
    #[inline]
    fn default() -> Board {
        Board::empty()
    }
}

/// Style for [`Board::pretty()`]
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PrettyStyle {
    /// Print pieces and frames as ASCII characters
    Ascii,
    /// Print pieces and frames as fancy Unicode characters
    Utf8,
}

/// Wrapper to pretty-print the board
///
/// See docs for [`Board::pretty()`] for more details.
pub struct Pretty<'a> {
    board: &'a Board,
    style: PrettyStyle,
}

fn parse_cells(s: &str) -> Result<[Cell; 64], CellsParseError> {
    type Error = CellsParseError;

    let mut file = 0_usize;
    let mut rank = 0_usize;
    let mut pos = 0_usize;
    let mut cells = [Cell::EMPTY; 64];
    for b in s.bytes() {
        match b {
            b'1'..=b'8' => {
                let add = (b - b'0') as usize;
                if file + add > 8 {
                    return Err(Error::RankOverflow(Rank::from_index(rank)));
                }
                file += add;
                pos += add;
            }
            b'/' => {
                if file < 8 {
                    return Err(Error::RankUnderflow(Rank::from_index(rank)));
                }
                rank += 1;
                file = 0;
                if rank >= 8 {
                    return Err(Error::Overflow);
                }
            }
            _ => {
                if file >= 8 {
                    return Err(Error::RankOverflow(Rank::from_index(rank)));
                }
                cells[pos] = match b {
                    b'.' => None,
                    _ => Cell::from_char(b as char),
                }
                .ok_or(Error::UnexpectedChar(b as char))?;
                file += 1;
                pos += 1;
            }
        };
    }

    if file < 8 {
        return Err(Error::RankUnderflow(Rank::from_index(rank)));
    }
    if rank < 7 {
        return Err(Error::Underflow);
    }

    Ok(cells)
}

impl FromStr for Board {
    type Err = CellsParseError;

    fn from_str(s: &str) -> Result<Board, Self::Err> {
        let cells = parse_cells(s)?;
        let mut res = Board::empty();
        for (idx, cell) in cells.into_iter().enumerate() {
            res.put(Coord::from_index(idx), cell);
        }
        Ok(res)
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        for rank in Rank::iter() {
            if rank.index() != 0 {
                write!(f, "/")?;
            }
            let mut empty = 0;
            for file in File::iter() {
                let cell = self.get2(file, rank);
                if cell.is_empty() {
                    empty += 1;
                    continue;
                }
                if empty != 0 {
                    write!(f, "{}", (b'0' + empty) as char)?;
                    empty = 0;
                }
                write!(f, "{}", cell)?;
            }
            if empty != 0 {
                write!(f, "{}", (b'0' + empty) as char)?;
            }
        }
        Ok(())
    }
}

trait StyleTable {
    const HORZ_FRAME: char;
    const VERT_FRAME: char;
    const ANGLE_FRAME: char;

    fn cell(c: Cell) -> char;

    fn fmt(b: &Board, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        for rank in Rank::iter() {
            write!(f, "{}{}", rank, Self::VERT_FRAME)?;
            for file in File::iter() {
                write!(f, "{}", Self::cell(b.get2(file, rank)))?;
            }
            writeln!(f)?;
        }
        write!(f, "{}{}", Self::HORZ_FRAME, Self::ANGLE_FRAME)?;
        for _ in File::iter() {
            write!(f, "{}", Self::HORZ_FRAME)?;
        }
        writeln!(f)?;
        write!(f, " {}", Self::VERT_FRAME)?;
        for file in File::iter() {
            write!(f, "{}", file)?;
        }
        writeln!(f)?;
        Ok(())
    }
}

struct AsciiStyleTable;
struct Utf8StyleTable;

impl StyleTable for AsciiStyleTable {
    const HORZ_FRAME: char = '-';
    const VERT_FRAME: char = '|';
    const ANGLE_FRAME: char = '+';

    fn cell(c: Cell) -> char {
        c.as_char()
    }
}

impl StyleTable for Utf8StyleTable {
    const HORZ_FRAME: char = '─';
    const VERT_FRAME: char = '│';
    const ANGLE_FRAME: char = '┼';

    fn cell(c: Cell) -> char {
        c.as_utf8_char()
    }
}

impl<'a> Display for Pretty<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        match self.style {
            PrettyStyle::Ascii => AsciiStyleTable::fmt(self.board, f),
            PrettyStyle::Utf8 => Utf8StyleTable::fmt(self.board, f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INI_CELLS: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";

    #[test]
    fn test_initial() {
        let b = Board::initial();
        assert_eq!(b.as_cells(), INI_CELLS);
        assert_eq!(Board::from_cells(INI_CELLS), Ok(b));
        assert_eq!(b.count(Color::White), 16);
        assert_eq!(b.count(Color::Black), 16);
        assert_eq!(b.len(), 32);

        for col in 0..8 {
            assert_eq!(
                b.get(Coord::from_row_col(6, col)),
                Cell::from_parts(Color::White, Piece::Pawn)
            );
            assert_eq!(
                b.get(Coord::from_row_col(1, col)),
                Cell::from_parts(Color::Black, Piece::Pawn)
            );
            for row in 2..6 {
                assert!(b.get(Coord::from_row_col(row, col)).is_empty());
            }
        }
        assert_eq!(
            b.get(Coord::from_row_col(7, 4)),
            Cell::from_parts(Color::White, Piece::King)
        );
        assert_eq!(
            b.get(Coord::from_row_col(0, 3)),
            Cell::from_parts(Color::Black, Piece::Queen)
        );
    }

    #[test]
    fn test_put_take() {
        let mut b = Board::empty();
        assert!(b.is_empty());
        let c = Coord::from_row_col(4, 4);
        b.put(c, Cell::from_parts(Color::White, Piece::Pawn));
        assert!(b.color(Color::White).has(c));
        b.put(c, Cell::from_parts(Color::Black, Piece::Rook));
        assert!(!b.color(Color::White).has(c));
        assert!(b.color(Color::Black).has(c));
        assert_eq!(b.len(), 1);
        assert_eq!(b.take(c), Cell::from_parts(Color::Black, Piece::Rook));
        assert!(b.is_empty());
        assert_eq!(b, Board::empty());
    }

    #[test]
    fn test_pieces() {
        let b = Board::from_cells("4k3/8/8/3p4/4P3/8/8/4K3").unwrap();
        let white: Vec<_> = b.pieces(Color::White).collect();
        assert_eq!(
            white,
            vec![
                (
                    Coord::from_row_col(4, 4),
                    Cell::from_parts(Color::White, Piece::Pawn)
                ),
                (
                    Coord::from_row_col(7, 4),
                    Cell::from_parts(Color::White, Piece::King)
                ),
            ]
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            Board::from_cells("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP"),
            Err(CellsParseError::Underflow)
        );
        assert_eq!(
            Board::from_cells("rnbqkbnr/ppppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR"),
            Err(CellsParseError::RankOverflow(Rank::R7))
        );
        assert_eq!(
            Board::from_cells("rnbqkbnr/ppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR"),
            Err(CellsParseError::RankUnderflow(Rank::R7))
        );
        assert_eq!(
            Board::from_cells("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR/8"),
            Err(CellsParseError::Overflow)
        );
        assert_eq!(
            Board::from_cells("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNx"),
            Err(CellsParseError::UnexpectedChar('x'))
        );
        assert_eq!(
            Board::from_cells("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBN."),
            Err(CellsParseError::UnexpectedChar('.'))
        );
    }

    #[test]
    fn test_pretty_utf8() {
        let b = Board::initial();
        let res = r#"
8│♜♞♝♛♚♝♞♜
7│♟♟♟♟♟♟♟♟
6│........
5│........
4│........
3│........
2│♙♙♙♙♙♙♙♙
1│♖♘♗♕♔♗♘♖
─┼────────
 │abcdefgh
"#;
        assert_eq!(b.pretty(PrettyStyle::Utf8).to_string().trim(), res.trim());
    }
}
