//! Automated opponent

use crate::board::Board;
use crate::movegen::{self, PawnDirection};
use crate::moves::Move;
use crate::types::Color;

use std::fmt::{self, Display};
use std::str::FromStr;

use arrayvec::ArrayVec;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Error, Eq, PartialEq)]
#[error("unknown difficulty {0:?}")]
pub struct DifficultyParseError(pub String);

/// Difficulty level of the automated opponent
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Picks any move at random
    #[default]
    Easy,
    /// Picks a random capture if there is one
    Medium,
    /// Same as [`Difficulty::Medium`]
    Hard,
}

impl Difficulty {
    pub fn iter() -> impl Iterator<Item = Self> {
        [Self::Easy, Self::Medium, Self::Hard].into_iter()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }

    /// Returns `true` if the opponent picks among captures when any capture exists
    #[inline]
    pub fn prefers_captures(&self) -> bool {
        !matches!(self, Self::Easy)
    }
}

impl Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = DifficultyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| DifficultyParseError(s.to_string()))
    }
}

/// Chooses a move for the side `c`
///
/// All the candidates are enumerated with [`movegen::candidates`]. On [`Difficulty::Easy`],
/// the move is chosen uniformly among all of them. On other difficulties, it is chosen
/// uniformly among the captures, falling back to all the candidates if no capture exists.
///
/// Returns `None` if the side has no moves.
pub fn choose_move<R: Rng + ?Sized>(
    b: &Board,
    c: Color,
    difficulty: Difficulty,
    direction: PawnDirection,
    rng: &mut R,
) -> Option<Move> {
    let all = movegen::candidates(b, c, direction);
    if difficulty.prefers_captures() {
        let enemy = b.color(c.inv());
        let captures: ArrayVec<Move, 256> = all
            .iter()
            .copied()
            .filter(|mv| enemy.has(mv.dst()))
            .collect();
        if let Some(mv) = captures.choose(rng) {
            return Some(*mv);
        }
    }
    all.choose(rng).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const TWO_MOVES: &str = "8/8/8/4P3/3p4/8/8/8";
    const TRIALS: usize = 2000;

    #[test]
    fn test_difficulty_str() {
        for d in Difficulty::iter() {
            assert_eq!(Difficulty::from_str(&d.to_string()), Ok(d));
        }
        assert_eq!(Difficulty::from_str("hard"), Ok(Difficulty::Hard));
        assert_eq!(
            Difficulty::from_str("Expert"),
            Err(DifficultyParseError("Expert".to_string()))
        );
        assert_eq!(Difficulty::default(), Difficulty::Easy);
    }

    #[test]
    fn test_easy_uniform() {
        let b = Board::from_cells(TWO_MOVES).unwrap();
        let quiet: Move = "d4d5".parse().unwrap();
        let capture: Move = "d4e5".parse().unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        let mut n_capture = 0;
        for _ in 0..TRIALS {
            let mv = choose_move(
                &b,
                Color::Black,
                Difficulty::Easy,
                PawnDirection::Fixed,
                &mut rng,
            )
            .unwrap();
            assert!(mv == quiet || mv == capture);
            if mv == capture {
                n_capture += 1;
            }
        }
        assert!((800..1200).contains(&n_capture), "{}", n_capture);
    }

    #[test]
    fn test_prefers_captures() {
        let b = Board::from_cells(TWO_MOVES).unwrap();
        let capture: Move = "d4e5".parse().unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        for d in [Difficulty::Medium, Difficulty::Hard] {
            for _ in 0..TRIALS {
                let mv = choose_move(&b, Color::Black, d, PawnDirection::Fixed, &mut rng);
                assert_eq!(mv, Some(capture));
            }
        }
    }

    #[test]
    fn test_fallback() {
        let b = Board::from_cells("8/8/8/8/3p4/8/8/8").unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let mv = choose_move(
            &b,
            Color::Black,
            Difficulty::Hard,
            PawnDirection::Fixed,
            &mut rng,
        );
        assert_eq!(mv, Some("d4d5".parse().unwrap()));
    }

    #[test]
    fn test_no_moves() {
        let b = Board::initial();
        let mut rng = StdRng::seed_from_u64(1);
        for d in Difficulty::iter() {
            assert_eq!(
                choose_move(&b, Color::Black, d, PawnDirection::Fixed, &mut rng),
                None
            );
        }
        assert!(
            choose_move(&b, Color::Black, Difficulty::Easy, PawnDirection::ByColor, &mut rng)
                .is_some()
        );
    }
}
