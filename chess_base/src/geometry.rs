use crate::bitboard::Bitboard;
use crate::bitboard_consts;
use crate::types::{File, Rank};

/// Direction in which a pawn advances across the board
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Heading {
    /// Toward row 0 (the 8th rank)
    Up,
    /// Toward row 7 (the 1st rank)
    Down,
}

/// Rank from which a pawn with heading `h` may make a double step
pub const fn home_rank(h: Heading) -> Rank {
    match h {
        Heading::Up => Rank::R2,
        Heading::Down => Rank::R7,
    }
}

/// Rank on which a pawn with heading `h` is promoted
pub const fn promote_rank(h: Heading) -> Rank {
    match h {
        Heading::Up => Rank::R8,
        Heading::Down => Rank::R1,
    }
}

#[inline]
pub fn advance_forward(h: Heading, b: Bitboard) -> Bitboard {
    match h {
        Heading::Up => b.shr(8),
        Heading::Down => b.shl(8),
    }
}

#[inline]
pub fn advance_left(h: Heading, b: Bitboard) -> Bitboard {
    let b = b & !bitboard_consts::file(File::A);
    match h {
        Heading::Up => b.shr(9),
        Heading::Down => b.shl(7),
    }
}

#[inline]
pub fn advance_right(h: Heading, b: Bitboard) -> Bitboard {
    let b = b & !bitboard_consts::file(File::H);
    match h {
        Heading::Up => b.shr(7),
        Heading::Down => b.shl(9),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Coord;

    #[test]
    fn test_advance() {
        let e2 = Bitboard::from_coord(Coord::from_row_col(6, 4));
        assert_eq!(
            advance_forward(Heading::Up, e2),
            Bitboard::from_coord(Coord::from_row_col(5, 4))
        );
        assert_eq!(
            advance_left(Heading::Up, e2),
            Bitboard::from_coord(Coord::from_row_col(5, 3))
        );
        assert_eq!(
            advance_right(Heading::Down, e2),
            Bitboard::from_coord(Coord::from_row_col(7, 5))
        );
    }

    #[test]
    fn test_edges() {
        let a5 = Bitboard::from_coord(Coord::from_row_col(3, 0));
        let h5 = Bitboard::from_coord(Coord::from_row_col(3, 7));
        let a8 = Bitboard::from_coord(Coord::from_row_col(0, 0));
        let h1 = Bitboard::from_coord(Coord::from_row_col(7, 7));
        assert!(advance_left(Heading::Up, a5).is_empty());
        assert!(advance_left(Heading::Down, a5).is_empty());
        assert!(advance_right(Heading::Up, h5).is_empty());
        assert!(advance_right(Heading::Down, h5).is_empty());
        assert!(advance_forward(Heading::Up, a8).is_empty());
        assert!(advance_forward(Heading::Down, h1).is_empty());
    }

    #[test]
    fn test_ranks() {
        assert_eq!(home_rank(Heading::Up).index(), 6);
        assert_eq!(home_rank(Heading::Down).index(), 1);
        assert_eq!(promote_rank(Heading::Up).index(), 0);
        assert_eq!(promote_rank(Heading::Down).index(), 7);
    }
}
