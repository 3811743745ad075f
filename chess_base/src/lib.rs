//! # Base types for minichess
//!
//! This is an auxiliary crate for `minichess` with the board vocabulary: squares, pieces,
//! square sets and pawn geometry. It has no notion of turns or games.
//!
//! Normally you don't want to use this crate directly. Use `minichess` instead.

pub mod bitboard;
pub mod bitboard_consts;
pub mod geometry;
pub mod types;
