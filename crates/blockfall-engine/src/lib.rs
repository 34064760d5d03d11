//! Rule engine for a falling-block puzzle game.
//!
//! The engine owns the board, the falling piece with its one-piece look-ahead,
//! and the score/speed progression. It does no drawing, input handling or
//! frame scheduling: a driver calls [`Session`] verbs and reads the state back.
//!
//! # Example
//!
//! ```
//! use blockfall_engine::{PieceSeed, Session, SessionConfig};
//!
//! let config = SessionConfig {
//!     seed: Some(PieceSeed::from_bytes([7; 16])),
//!     ..SessionConfig::default()
//! };
//! let mut session = Session::with_config(config).unwrap();
//!
//! session.move_left();
//! session.rotate_clockwise();
//! let event = session.hard_drop().unwrap();
//!
//! assert_eq!(event.rows_cleared, 0);
//! assert_eq!(session.progression().completed_pieces(), 1);
//! ```

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("piece colliding after move or rotation")]
pub struct PieceCollisionError;

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("board must be at least {min} columns wide, got {cols}")]
    BoardTooNarrow { cols: usize, min: usize },
    #[display("board must be at least {min} rows tall, got {rows}")]
    BoardTooShort { rows: usize, min: usize },
    #[display("board of {cols}x{rows} cells is too large")]
    BoardTooLarge { cols: usize, rows: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum BoardParseError {
    #[display("board text has no rows")]
    Empty,
    #[display("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[display("invalid cell {found:?} at row {row}, column {col}")]
    InvalidCell { row: usize, col: usize, found: char },
}
