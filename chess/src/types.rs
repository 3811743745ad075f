pub use minichess_base::types::*;

use std::fmt::{self, Display};

/// Reason why the game was won
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum WinReason {
    /// The loser has no legal moves
    ///
    /// No check condition is verified here: a side with zero legal destinations
    /// is considered checkmated regardless of its king.
    Checkmate,
    /// The loser resigned
    Resign,
}

/// Result of a finished game
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Outcome {
    pub winner: Color,
    pub reason: WinReason,
}

impl Outcome {
    #[inline]
    pub fn win(winner: Color, reason: WinReason) -> Outcome {
        Outcome { winner, reason }
    }

    #[inline]
    pub fn winner(&self) -> Color {
        self.winner
    }

    #[inline]
    pub fn loser(&self) -> Color {
        self.winner.inv()
    }
}

impl Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        match self.reason {
            WinReason::Checkmate => write!(f, "Checkmate! {} wins!", self.winner.name()),
            WinReason::Resign => write!(f, "{} wins by resignation!", self.winner.name()),
        }
    }
}

/// Status line shown to the player
///
/// The [`Display`] implementation yields the exact text shown by the host UI.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Status {
    WhiteToMove,
    ComputerThinking,
    Finished(Outcome),
}

impl Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        match self {
            Self::WhiteToMove => write!(f, "White to move"),
            Self::ComputerThinking => write!(f, "Computer thinking..."),
            Self::Finished(outcome) => outcome.fmt(f),
        }
    }
}
