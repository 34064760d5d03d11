use std::time::Duration;

use log::{debug, info, trace};
use serde::Serialize;

use crate::{
    ConfigError,
    core::{
        board::Board,
        piece::{Position, RotationDirection, Shape},
    },
};

use super::{
    config::SessionConfig, piece_generator::PieceGenerator, piece_state::PieceState,
    progression::Progression,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, derive_more::IsVariant)]
pub enum SessionState {
    Playing,
    Paused,
    GameOver,
}

/// What happened when a piece locked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockEvent {
    /// Rows removed by the sweep that followed the lock.
    pub rows_cleared: usize,
    pub score_gained: u64,
    /// The clear moved progression to a higher level.
    pub level_up: bool,
    /// The next piece collided at spawn and the session is over.
    pub topped_out: bool,
}

/// Owned, serializable view of a session for renderers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    /// Locked cells with the falling piece drawn in.
    pub board: Board,
    /// Where the falling piece would land on a hard drop.
    pub ghost: Position,
    pub next: Shape,
    pub progression: Progression,
    pub state: SessionState,
}

/// A single game: board, falling piece, progression and play state.
///
/// The session is driven from outside. A timer calls [`Self::tick`] with the
/// elapsed time and an input layer calls the move, rotate and drop verbs.
/// Every call runs to completion and leaves the falling piece clear of locked
/// cells unless the session has just topped out.
///
/// While paused, ticks and move/rotate are ignored but soft and hard drops
/// still apply. After game over, only [`Self::reset`] changes anything.
#[derive(Debug, Clone)]
pub struct Session {
    board: Board,
    piece: PieceState,
    progression: Progression,
    generator: PieceGenerator,
    state: SessionState,
    drop_counter_ms: u64,
    play_time_ms: u64,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Creates a 12×20 session with a random piece order.
    #[must_use]
    pub fn new() -> Self {
        Self::build(SessionConfig::default())
    }

    pub fn with_config(config: SessionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: SessionConfig) -> Self {
        let mut generator = config
            .seed
            .map_or_else(PieceGenerator::new, PieceGenerator::with_seed);
        let board = Board::new(config.cols, config.rows);
        let piece = PieceState::spawn(&board, None, &mut generator);
        Self {
            board,
            piece,
            progression: Progression::new(),
            generator,
            state: SessionState::Playing,
            drop_counter_ms: 0,
            play_time_ms: 0,
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn piece(&self) -> &PieceState {
        &self.piece
    }

    #[must_use]
    pub fn next_shape(&self) -> &Shape {
        self.piece.next()
    }

    #[must_use]
    pub fn progression(&self) -> &Progression {
        &self.progression
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.state.is_paused()
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.state.is_game_over()
    }

    /// Total time fed through [`Self::tick`] while playing.
    #[must_use]
    pub fn play_time(&self) -> Duration {
        Duration::from_millis(self.play_time_ms)
    }

    /// Landing position of the falling piece.
    #[must_use]
    pub fn ghost_position(&self) -> Position {
        self.piece.landing_position(&self.board)
    }

    /// Returns a copy of the board with the falling piece drawn in.
    ///
    /// Piece cells above row 0 are clipped.
    #[must_use]
    pub fn render_board(&self) -> Board {
        let mut board = self.board.clone();
        board.merge(self.piece.shape(), self.piece.position());
        board
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            board: self.render_board(),
            ghost: self.ghost_position(),
            next: self.piece.next().clone(),
            progression: self.progression.clone(),
            state: self.state,
        }
    }

    pub fn toggle_pause(&mut self) {
        self.state = match self.state {
            SessionState::Playing => SessionState::Paused,
            SessionState::Paused => SessionState::Playing,
            SessionState::GameOver => SessionState::GameOver,
        };
        debug!("session state: {:?}", self.state);
    }

    /// Advances the fall timer by `elapsed_ms`.
    ///
    /// Once the accumulated time exceeds the drop interval the piece takes one
    /// soft-drop step, which may lock it.
    pub fn tick(&mut self, elapsed_ms: u64) -> Option<LockEvent> {
        if !self.state.is_playing() {
            return None;
        }
        self.play_time_ms = self.play_time_ms.saturating_add(elapsed_ms);
        self.drop_counter_ms = self.drop_counter_ms.saturating_add(elapsed_ms);
        if self.drop_counter_ms > self.progression.drop_interval_ms() {
            return self.soft_drop();
        }
        None
    }

    /// Shifts the falling piece `dx` columns. Returns whether it moved.
    pub fn move_piece(&mut self, dx: i32) -> bool {
        self.state.is_playing() && self.piece.try_shift(&self.board, dx).is_ok()
    }

    pub fn move_left(&mut self) -> bool {
        self.move_piece(-1)
    }

    pub fn move_right(&mut self) -> bool {
        self.move_piece(1)
    }

    /// Rotates the falling piece with wall kicks. Returns whether it rotated.
    pub fn rotate(&mut self, direction: RotationDirection) -> bool {
        self.state.is_playing() && self.piece.try_rotate(&self.board, direction).is_ok()
    }

    pub fn rotate_clockwise(&mut self) -> bool {
        self.rotate(RotationDirection::Clockwise)
    }

    pub fn rotate_counter_clockwise(&mut self) -> bool {
        self.rotate(RotationDirection::CounterClockwise)
    }

    /// Moves the piece down one row, locking it if it cannot move.
    ///
    /// Resets the fall timer either way.
    pub fn soft_drop(&mut self) -> Option<LockEvent> {
        if self.state.is_game_over() {
            return None;
        }
        self.drop_counter_ms = 0;
        if self.piece.try_step_down(&self.board).is_ok() {
            return None;
        }
        Some(self.lock_piece())
    }

    /// Drops the piece to its landing position and locks it.
    pub fn hard_drop(&mut self) -> Option<LockEvent> {
        if self.state.is_game_over() {
            return None;
        }
        let distance = self.piece.drop_to_landing(&self.board);
        trace!("{:?} hard dropped {distance} rows", self.piece.kind());
        self.drop_counter_ms = 0;
        Some(self.lock_piece())
    }

    /// Starts a new game on the same board dimensions.
    ///
    /// The look-ahead is discarded so the first piece is freshly drawn.
    pub fn reset(&mut self) {
        self.board.clear();
        self.progression.reset();
        self.piece = PieceState::spawn(&self.board, None, &mut self.generator);
        self.state = SessionState::Playing;
        self.drop_counter_ms = 0;
        self.play_time_ms = 0;
        debug!("session reset");
    }

    fn lock_piece(&mut self) -> LockEvent {
        self.board.merge(self.piece.shape(), self.piece.position());
        let rows_cleared = self.board.sweep_full_rows();

        let level = self.progression.level();
        let score_gained = self.progression.complete_piece_lock(rows_cleared);
        let level_up = self.progression.level() > level;
        debug!(
            "{:?} locked at {:?}, cleared {rows_cleared} rows (+{score_gained})",
            self.piece.kind(),
            self.piece.position()
        );
        if level_up {
            debug!(
                "level {} reached, drop interval {} ms",
                self.progression.level(),
                self.progression.drop_interval_ms()
            );
        }

        self.piece.respawn(&self.board, &mut self.generator);
        let topped_out = self.piece.is_colliding(&self.board);
        if topped_out {
            self.state = SessionState::GameOver;
            info!(
                "game over: score {}, {} lines",
                self.progression.score(),
                self.progression.lines_cleared()
            );
        }

        LockEvent {
            rows_cleared,
            score_gained,
            level_up,
            topped_out,
        }
    }
}
