use log::trace;

use crate::{
    PieceCollisionError,
    core::{
        board::Board,
        piece::{PieceKind, Position, RotationDirection, Shape},
    },
};

use super::piece_generator::PieceGenerator;

/// The falling piece, its board position, and the look-ahead piece.
///
/// Every mutator checks the board before committing, so a piece that was
/// not colliding stays that way: blocked moves and rotations leave shape and
/// position exactly as they were.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieceState {
    shape: Shape,
    position: Position,
    next: Shape,
}

impl PieceState {
    #[must_use]
    pub fn new(shape: Shape, position: Position, next: Shape) -> Self {
        Self {
            shape,
            position,
            next,
        }
    }

    /// Spawns a piece at the top center of `board`.
    ///
    /// `next` becomes the falling piece; when there is no look-ahead yet one
    /// is drawn first. A new look-ahead is drawn afterwards. The spawned piece
    /// may collide with locked cells: checking that is the caller's job.
    pub fn spawn(board: &Board, next: Option<Shape>, generator: &mut PieceGenerator) -> Self {
        let shape = next.unwrap_or_else(|| generator.draw());
        let next = generator.draw();
        let position = Position::spawn(board.cols(), shape.width());
        Self {
            shape,
            position,
            next,
        }
    }

    /// Promotes the look-ahead to the falling piece and draws a new one.
    pub fn respawn(&mut self, board: &Board, generator: &mut PieceGenerator) {
        self.shape = std::mem::replace(&mut self.next, generator.draw());
        self.position = Position::spawn(board.cols(), self.shape.width());
    }

    #[must_use]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    #[must_use]
    pub fn kind(&self) -> PieceKind {
        self.shape.kind()
    }

    #[must_use]
    pub fn position(&self) -> Position {
        self.position
    }

    #[must_use]
    pub fn next(&self) -> &Shape {
        &self.next
    }

    #[must_use]
    pub fn is_colliding(&self, board: &Board) -> bool {
        board.collides(&self.shape, self.position)
    }

    fn try_move_to(&mut self, board: &Board, position: Position) -> Result<(), PieceCollisionError> {
        if board.collides(&self.shape, position) {
            return Err(PieceCollisionError);
        }
        self.position = position;
        Ok(())
    }

    /// Shifts the piece `dx` columns (negative is left).
    pub fn try_shift(&mut self, board: &Board, dx: i32) -> Result<(), PieceCollisionError> {
        self.try_move_to(board, self.position.shifted(dx, 0))
    }

    /// Moves the piece one row down.
    pub fn try_step_down(&mut self, board: &Board) -> Result<(), PieceCollisionError> {
        self.try_move_to(board, self.position.shifted(0, 1))
    }

    /// Rotates the piece 90°, kicking it sideways if the new orientation collides.
    ///
    /// Kicks are tried at cumulative x offsets +1, -1, +2, -2, ... produced by
    /// the step sequence +1, -2, +3, -4, ... The search gives up once the next
    /// step would exceed the shape width; the rotation is then undone and the
    /// piece is left untouched.
    ///
    /// This is a symmetric wall kick, not a standard rotation system kick table.
    pub fn try_rotate(
        &mut self,
        board: &Board,
        direction: RotationDirection,
    ) -> Result<(), PieceCollisionError> {
        let original = self.position;
        let limit = i32::try_from(self.shape.width()).unwrap_or(i32::MAX);

        self.shape.rotate(direction);
        let mut offset: i32 = 1;
        while board.collides(&self.shape, self.position) {
            self.position = self.position.shifted(offset, 0);
            offset = -(offset + offset.signum());
            if offset > limit {
                trace!("{:?} rotation blocked at {original:?}", self.kind());
                self.shape.rotate(direction.inverse());
                self.position = original;
                return Err(PieceCollisionError);
            }
        }

        if self.position != original {
            trace!(
                "{:?} kicked from x={} to x={}",
                self.kind(),
                original.x(),
                self.position.x()
            );
        }
        Ok(())
    }

    /// Returns the lowest position the piece can fall to from where it is.
    #[must_use]
    pub fn landing_position(&self, board: &Board) -> Position {
        let mut position = self.position;
        while !board.collides(&self.shape, position.shifted(0, 1)) {
            position = position.shifted(0, 1);
        }
        position
    }

    /// Moves the piece to its landing position and returns the rows travelled.
    pub fn drop_to_landing(&mut self, board: &Board) -> usize {
        let landing = self.landing_position(board);
        let distance = landing.y() - self.position.y();
        self.position = landing;
        usize::try_from(distance).unwrap_or(0)
    }
}
