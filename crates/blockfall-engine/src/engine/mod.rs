//! Game rules and session state.
//!
//! This module drives the core board and piece types through a game:
//!
//! - [`Session`] - Board, falling piece, progression and play state
//! - [`PieceState`] - Falling piece with its position and look-ahead
//! - [`PieceGenerator`] - Uniform random piece supply
//! - [`PieceSeed`] - Seed for deterministic piece generation
//! - [`Progression`] - Score, lines, level and drop interval
//! - [`SessionConfig`] - Board size and seed for a new session
//!
//! # Game Flow
//!
//! 1. Create a [`Session`]; the first piece spawns at the top center
//! 2. A timer feeds elapsed time to [`Session::tick`], which lowers the piece
//! 3. Input moves, rotates or drops the piece
//! 4. A piece that cannot fall further locks, full rows are swept and scored
//! 5. The look-ahead piece spawns; if it collides the session is over
//!
//! # Example
//!
//! ```
//! use blockfall_engine::{Session, SessionState};
//!
//! let mut session = Session::new();
//! while !session.is_game_over() {
//!     session.hard_drop();
//! }
//!
//! assert_eq!(session.state(), SessionState::GameOver);
//! assert_eq!(session.hard_drop(), None);
//!
//! session.reset();
//! assert_eq!(session.state(), SessionState::Playing);
//! ```

pub use self::{config::*, piece_generator::*, piece_state::*, progression::*, session::*};

mod config;
mod piece_generator;
mod piece_state;
mod progression;
mod session;
