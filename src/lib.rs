#![deny(
    warnings,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs
)]
//! Types for working with a santorini-style two player game on a fixed
//! 5x5 board.
//! The goal is to provide the pure game-state core an interactive host
//! hangs its rendering and input handling on: bitmask board geometry
//! that answers "which neighbor cells can this pawn reach", a compact
//! [`BitBoard`](board_representation::BitBoard) state with one 25-bit
//! mask per structure level, and a single-line notation for board
//! setup and history.
//! Everything is synchronous and pure; a full legal-direction lookup
//! touches nothing heavier than a handful of small masks, so hosts can
//! re-run queries on every interaction without caching.

use board_representation::BitBoard;

pub mod board_representation;
pub mod notation;
pub mod types;

/// Loads a board from a notation literal
pub fn board_fixture(line: &str) -> BitBoard {
    let board: Result<BitBoard, _> = BitBoard::from_notation(line);
    board.expect("the notation literal is valid")
}
