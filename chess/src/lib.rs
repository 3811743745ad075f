//! Pawn-only chess mini-game against a computer opponent
//!
//! The crate contains a deliberately small subset of chess rules: only pawns are able to
//! move, there is no king safety, and a side which has no moves is considered checkmated.
//! The player always controls white, and the computer controls black.
//!
//! The main entry point is [`Session`], a turn controller driven by explicit commands. For
//! interactive hosts, [`Driver`] wraps a session together with the delayed opponent moves
//! and the UI callbacks.
//!
//! # Example
//!
//! ```
//! use minichess::{Coord, GameConfig, Session, Status};
//!
//! let mut session = Session::new(GameConfig::default());
//! session.select(Coord::from_row_col(6, 4));
//! let update = session.select(Coord::from_row_col(4, 4));
//! assert_eq!(update.record.unwrap().notation, "e2-e4");
//! assert_eq!(update.status, Some(Status::ComputerThinking));
//! assert!(update.schedule.is_some());
//! ```
//!
//! # Features
//!
//! - `client`: blocking HTTP client for the account and leaderboard service, see
//!   [`api::ApiClient`](crate::api)

pub mod api;
pub mod board;
pub mod config;
pub mod driver;
pub mod history;
pub mod movegen;
pub mod moves;
pub mod opponent;
pub mod session;
pub mod timer;
pub mod types;

pub use minichess_base::{bitboard, bitboard_consts, geometry};

pub use bitboard::Bitboard;
pub use board::Board;
pub use config::GameConfig;
pub use driver::{Driver, Observer};
pub use history::MoveHistory;
pub use movegen::{MoveList, PawnDirection};
pub use moves::{ApplyError, Move, MoveRecord};
pub use opponent::Difficulty;
pub use session::{Session, SessionState, Update};
pub use types::{Cell, Color, Coord, File, Outcome, Piece, Rank, Status, WinReason};
