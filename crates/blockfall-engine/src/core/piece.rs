use std::fmt;

use arrayvec::ArrayVec;
use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize, Serializer};

use super::board::{Cell, row_text};

/// Side length of the largest shape grid (the I-piece).
pub const MAX_SHAPE_SIZE: usize = 4;

/// Enum representing the type of piece.
///
/// The discriminants are the cell tags renderers use for color lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum PieceKind {
    /// I-piece.
    I = 1,
    /// L-piece.
    L = 2,
    /// J-piece.
    J = 3,
    /// O-piece.
    O = 4,
    /// Z-piece.
    Z = 5,
    /// S-piece.
    S = 6,
    /// T-piece.
    T = 7,
}

impl Distribution<PieceKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind {
        PieceKind::ALL[rng.random_range(0..PieceKind::LEN)]
    }
}

impl PieceKind {
    /// Number of piece types (7).
    pub const LEN: usize = 7;

    /// All piece kinds in tag order.
    pub const ALL: [Self; Self::LEN] = [
        PieceKind::I,
        PieceKind::L,
        PieceKind::J,
        PieceKind::O,
        PieceKind::Z,
        PieceKind::S,
        PieceKind::T,
    ];

    /// Returns the numeric tag (1..=7) of this kind.
    #[must_use]
    pub const fn tag(self) -> u8 {
        self as u8
    }

    /// Returns the single character representation of this piece kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::I.as_char(), 'I');
    /// assert_eq!(PieceKind::T.as_char(), 'T');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::L => 'L',
            PieceKind::J => 'J',
            PieceKind::O => 'O',
            PieceKind::Z => 'Z',
            PieceKind::S => 'S',
            PieceKind::T => 'T',
        }
    }

    /// Parses a piece kind from a single character.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_char('J'), Some(PieceKind::J));
    /// assert_eq!(PieceKind::from_char('X'), None);
    /// ```
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(PieceKind::I),
            'L' => Some(PieceKind::L),
            'J' => Some(PieceKind::J),
            'O' => Some(PieceKind::O),
            'Z' => Some(PieceKind::Z),
            'S' => Some(PieceKind::S),
            'T' => Some(PieceKind::T),
            _ => None,
        }
    }
}

/// Direction of a 90° rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationDirection {
    Clockwise,
    CounterClockwise,
}

impl RotationDirection {
    #[must_use]
    pub const fn inverse(self) -> Self {
        match self {
            RotationDirection::Clockwise => RotationDirection::CounterClockwise,
            RotationDirection::CounterClockwise => RotationDirection::Clockwise,
        }
    }
}

/// Board-relative offset of a shape's top-left corner.
///
/// Coordinates are signed: a shape whose leftmost columns are empty may sit
/// at a negative `x`, and rows above the board have a negative `y`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Position {
    x: i32,
    y: i32,
}

impl Position {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Spawn position for a shape of the given width: horizontally centered, top row.
    #[must_use]
    #[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub const fn spawn(board_cols: usize, shape_width: usize) -> Self {
        Self::new((board_cols / 2) as i32 - (shape_width / 2) as i32, 0)
    }

    #[must_use]
    pub const fn x(self) -> i32 {
        self.x
    }

    #[must_use]
    pub const fn y(self) -> i32 {
        self.y
    }

    #[must_use]
    pub const fn shifted(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

type ShapeRow = ArrayVec<Cell, MAX_SHAPE_SIZE>;

/// A piece kind in one orientation: a square grid of cells.
///
/// Grids are 2×2 (O), 3×3 (J, L, S, T, Z) or 4×4 (I). Rotation permutes the
/// grid in place, so any orientation can be reached from any other and four
/// rotations in the same direction give back the original grid.
///
/// # Example
///
/// ```
/// use blockfall_engine::{PieceKind, RotationDirection, Shape};
///
/// let t = Shape::canonical(PieceKind::T);
/// let right = t.rotated(RotationDirection::Clockwise);
/// assert_eq!(right.to_string(), ".T.\n.TT\n.T.");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape {
    kind: PieceKind,
    rows: ArrayVec<ShapeRow, MAX_SHAPE_SIZE>,
}

impl Serialize for Shape {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // Format: [".T.", "TTT", "..."]
        serializer.collect_seq(self.rows.iter().map(|row| row_text(row)))
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            f.write_str(&row_text(row))?;
        }
        Ok(())
    }
}

impl Shape {
    /// Returns the spawn orientation of `kind`.
    #[must_use]
    pub fn canonical(kind: PieceKind) -> Self {
        const C: bool = true;
        const E: bool = false;

        let pattern: &[&[bool]] = match kind {
            PieceKind::I => &[&[E, C, E, E], &[E, C, E, E], &[E, C, E, E], &[E, C, E, E]],
            PieceKind::L => &[&[E, C, E], &[E, C, E], &[E, C, C]],
            PieceKind::J => &[&[E, C, E], &[E, C, E], &[C, C, E]],
            PieceKind::O => &[&[C, C], &[C, C]],
            PieceKind::Z => &[&[C, C, E], &[E, C, C], &[E, E, E]],
            PieceKind::S => &[&[E, C, C], &[C, C, E], &[E, E, E]],
            PieceKind::T => &[&[E, C, E], &[C, C, C], &[E, E, E]],
        };

        let rows = pattern
            .iter()
            .map(|row| {
                row.iter()
                    .map(|&filled| {
                        if filled {
                            Cell::Piece(kind)
                        } else {
                            Cell::Empty
                        }
                    })
                    .collect()
            })
            .collect();
        Self { kind, rows }
    }

    #[must_use]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    /// Side length of the grid.
    #[must_use]
    pub fn size(&self) -> usize {
        self.rows.len()
    }

    /// Width of the grid; equal to [`Self::size`] since grids are square.
    #[must_use]
    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, ArrayVec::len)
    }

    #[must_use]
    pub fn cell(&self, x: usize, y: usize) -> Cell {
        self.rows[y][x]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.rows.iter().map(ArrayVec::as_slice)
    }

    /// Returns shape-local `(x, y)` coordinates of occupied cells.
    pub fn occupied_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.rows.iter().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, cell)| cell.is_occupied())
                .map(move |(x, _)| (x, y))
        })
    }

    /// Rotates the grid 90° in place.
    ///
    /// Transposes the grid, then mirrors it horizontally for a clockwise turn
    /// or vertically for a counter-clockwise one.
    pub fn rotate(&mut self, direction: RotationDirection) {
        let size = self.rows.len();
        for y in 0..size {
            for x in 0..y {
                let upper = self.rows[x][y];
                self.rows[x][y] = self.rows[y][x];
                self.rows[y][x] = upper;
            }
        }

        match direction {
            RotationDirection::Clockwise => {
                for row in &mut self.rows {
                    row.reverse();
                }
            }
            RotationDirection::CounterClockwise => self.rows.reverse(),
        }
    }

    #[must_use]
    pub fn rotated(&self, direction: RotationDirection) -> Self {
        let mut shape = self.clone();
        shape.rotate(direction);
        shape
    }
}
