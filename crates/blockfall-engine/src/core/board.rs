use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::BoardParseError;

use super::piece::{PieceKind, Position, Shape};

/// A single cell of the board or of a shape grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    /// Empty cell (no piece).
    #[default]
    Empty,
    /// Cell occupied by a piece of a specific type.
    Piece(PieceKind),
}

impl Cell {
    #[must_use]
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    #[must_use]
    pub fn is_occupied(self) -> bool {
        !self.is_empty()
    }

    /// Numeric tag for color lookup: `0` for empty, the kind's tag otherwise.
    #[must_use]
    pub const fn tag(self) -> u8 {
        match self {
            Cell::Empty => 0,
            Cell::Piece(kind) => kind.tag(),
        }
    }

    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Piece(kind) => kind.as_char(),
        }
    }

    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            '.' => Some(Cell::Empty),
            _ => match PieceKind::from_char(c) {
                Some(kind) => Some(Cell::Piece(kind)),
                None => None,
            },
        }
    }
}

/// Where a shape cell lands relative to the board.
enum Slot {
    /// Past the left, right or bottom edge.
    Blocked,
    /// Above row 0.
    Above,
    Inside(usize),
}

pub(crate) fn row_text(cells: &[Cell]) -> String {
    cells.iter().map(|cell| cell.as_char()).collect()
}

/// Grid of locked cells beneath the falling piece.
///
/// Row 0 is the top (spawn side) and row `rows - 1` the floor. Dimensions are
/// fixed at creation. Collision treats the left, right and bottom edges as
/// walls but leaves the top open, so shapes may hang above row 0 while
/// spawning or rotating.
///
/// # Example
///
/// ```
/// use blockfall_engine::{Board, PieceKind, Position, Shape};
///
/// let mut board = Board::new(4, 3);
/// let o = Shape::canonical(PieceKind::O);
///
/// assert!(!board.collides(&o, Position::new(0, 1)));
/// board.merge(&o, Position::new(0, 1));
/// board.merge(&o, Position::new(2, 1));
///
/// assert_eq!(board.sweep_full_rows(), 2);
/// assert!(board.cells().all(|cell| cell.is_empty()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    cols: usize,
    rows: usize,
    cells: Vec<Cell>,
}

impl Serialize for Board {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // Format: ["......", "..TTT.", ...] (one string per row, top first)
        serializer.collect_seq(self.row_slices().map(row_text))
    }
}

impl<'de> Deserialize<'de> for Board {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let rows = Vec::<String>::deserialize(deserializer)?;
        Self::from_rows(rows.iter().map(String::as_str)).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (y, row) in self.row_slices().enumerate() {
            if y > 0 {
                f.write_str("\n")?;
            }
            f.write_str(&row_text(row))?;
        }
        Ok(())
    }
}

impl Board {
    /// Creates a board with every cell empty.
    #[must_use]
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            cols,
            rows,
            cells: vec![Cell::Empty; cols * rows],
        }
    }

    /// Parses a board from text, one line per row, top row first.
    ///
    /// `.` is an empty cell and a piece letter (`I`, `L`, `J`, `O`, `Z`, `S`,
    /// `T`) is a locked cell. Blank lines and surrounding whitespace are ignored.
    ///
    /// # Example
    ///
    /// ```
    /// use blockfall_engine::{Board, Cell, PieceKind};
    ///
    /// let board = Board::from_ascii(
    ///     "
    ///     ....
    ///     T...
    ///     TTIO
    ///     ",
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(board.cols(), 4);
    /// assert_eq!(board.cell(0, 1), Cell::Piece(PieceKind::T));
    /// assert!(board.is_row_full(2));
    /// ```
    pub fn from_ascii(art: &str) -> Result<Self, BoardParseError> {
        Self::from_rows(art.lines().map(str::trim).filter(|line| !line.is_empty()))
    }

    fn from_rows<'a>(lines: impl IntoIterator<Item = &'a str>) -> Result<Self, BoardParseError> {
        let mut cols = None;
        let mut cells = Vec::new();
        let mut rows = 0;

        for (row, line) in lines.into_iter().enumerate() {
            let start = cells.len();
            for (col, ch) in line.chars().enumerate() {
                let cell = Cell::from_char(ch)
                    .ok_or(BoardParseError::InvalidCell { row, col, found: ch })?;
                cells.push(cell);
            }
            let found = cells.len() - start;
            if found == 0 {
                return Err(BoardParseError::Empty);
            }
            let expected = *cols.get_or_insert(found);
            if found != expected {
                return Err(BoardParseError::RaggedRow {
                    row,
                    expected,
                    found,
                });
            }
            rows += 1;
        }

        let cols = cols.ok_or(BoardParseError::Empty)?;
        Ok(Self { cols, rows, cells })
    }

    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Returns the cell at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinate is outside the board.
    #[must_use]
    pub fn cell(&self, x: usize, y: usize) -> Cell {
        assert!(x < self.cols && y < self.rows, "({x}, {y}) is outside the board");
        self.cells[y * self.cols + x]
    }

    /// Overwrites a single cell. Used to prepare boards outside normal play.
    ///
    /// # Panics
    ///
    /// Panics if the coordinate is outside the board.
    pub fn set_cell(&mut self, x: usize, y: usize, cell: Cell) {
        assert!(x < self.cols && y < self.rows, "({x}, {y}) is outside the board");
        self.cells[y * self.cols + x] = cell;
    }

    #[must_use]
    pub fn row(&self, y: usize) -> &[Cell] {
        &self.cells[y * self.cols..][..self.cols]
    }

    /// Returns an iterator over the rows, top first.
    pub fn row_slices(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks_exact(self.cols.max(1))
    }

    /// Returns an iterator over all cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.cells.iter().copied()
    }

    #[must_use]
    pub fn is_row_full(&self, y: usize) -> bool {
        self.row(y).iter().all(|cell| cell.is_occupied())
    }

    /// Resets every cell to empty.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::Empty);
    }

    fn slot(&self, position: Position, x: usize, y: usize) -> Slot {
        let (Ok(dx), Ok(dy)) = (i64::try_from(x), i64::try_from(y)) else {
            return Slot::Blocked;
        };
        let Ok(bx) = usize::try_from(i64::from(position.x()) + dx) else {
            return Slot::Blocked;
        };
        if bx >= self.cols {
            return Slot::Blocked;
        }
        let Ok(by) = usize::try_from(i64::from(position.y()) + dy) else {
            return Slot::Above;
        };
        if by >= self.rows {
            return Slot::Blocked;
        }
        Slot::Inside(by * self.cols + bx)
    }

    /// Checks whether `shape` placed at `position` overlaps a wall, the floor
    /// or a locked cell.
    #[must_use]
    pub fn collides(&self, shape: &Shape, position: Position) -> bool {
        shape
            .occupied_cells()
            .any(|(x, y)| match self.slot(position, x, y) {
                Slot::Blocked => true,
                Slot::Above => false,
                Slot::Inside(index) => self.cells[index].is_occupied(),
            })
    }

    /// Writes the occupied cells of `shape` into the board.
    ///
    /// The caller must check [`Self::collides`] first: overlapping locked
    /// cells are overwritten, and cells outside the board are dropped.
    pub fn merge(&mut self, shape: &Shape, position: Position) {
        for (x, y) in shape.occupied_cells() {
            if let Slot::Inside(index) = self.slot(position, x, y) {
                self.cells[index] = shape.cell(x, y);
            }
        }
    }

    /// Removes full rows and returns how many were removed.
    ///
    /// Remaining rows keep their relative order and fall by the number of
    /// removed rows beneath them; the top is refilled with empty rows.
    pub fn sweep_full_rows(&mut self) -> usize {
        let cols = self.cols;
        let mut count = 0;
        for y in (0..self.rows).rev() {
            if self.is_row_full(y) {
                count += 1;
                continue;
            }
            if count > 0 {
                let start = y * cols;
                self.cells
                    .copy_within(start..start + cols, start + count * cols);
            }
        }
        self.cells[..count * cols].fill(Cell::Empty);
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill_row(board: &mut Board, y: usize) {
        for x in 0..board.cols() {
            board.set_cell(x, y, Cell::Piece(PieceKind::I));
        }
    }

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new(12, 20);
        assert_eq!(board.cols(), 12);
        assert_eq!(board.rows(), 20);
        assert_eq!(board.cells().count(), 240);
        assert!(board.cells().all(Cell::is_empty));
    }

    #[test]
    fn test_collision_inside_empty_board() {
        let board = Board::new(12, 20);
        for kind in PieceKind::ALL {
            let shape = Shape::canonical(kind);
            assert!(!board.collides(&shape, Position::new(4, 5)), "{kind:?}");
        }
    }

    #[test]
    fn test_collision_past_walls_and_floor() {
        let board = Board::new(12, 20);
        // Occupies x in 0..3, y in 0..2 relative to its position.
        let t = Shape::canonical(PieceKind::T);

        assert!(!board.collides(&t, Position::new(0, 0)));
        assert!(board.collides(&t, Position::new(-1, 0)));

        assert!(!board.collides(&t, Position::new(9, 0)));
        assert!(board.collides(&t, Position::new(10, 0)));

        // The empty third row may hang below the floor.
        assert!(!board.collides(&t, Position::new(4, 18)));
        assert!(board.collides(&t, Position::new(4, 19)));
    }

    #[test]
    fn test_collision_ignores_empty_shape_columns() {
        let board = Board::new(12, 20);
        // Only column 1 of the I grid is occupied.
        let i = Shape::canonical(PieceKind::I);
        assert!(!board.collides(&i, Position::new(-1, 0)));
        assert!(board.collides(&i, Position::new(-2, 0)));
        assert!(!board.collides(&i, Position::new(10, 0)));
        assert!(board.collides(&i, Position::new(11, 0)));
    }

    #[test]
    fn test_collision_top_is_open() {
        let board = Board::new(12, 20);
        let o = Shape::canonical(PieceKind::O);
        assert!(!board.collides(&o, Position::new(5, -1)));
        assert!(!board.collides(&o, Position::new(5, -5)));
    }

    #[test]
    fn test_collision_with_locked_cell() {
        let mut board = Board::new(12, 20);
        board.set_cell(5, 10, Cell::Piece(PieceKind::Z));
        let o = Shape::canonical(PieceKind::O);
        assert!(board.collides(&o, Position::new(4, 9)));
        assert!(board.collides(&o, Position::new(5, 10)));
        assert!(!board.collides(&o, Position::new(6, 10)));
        assert!(!board.collides(&o, Position::new(4, 11)));
    }

    #[test]
    fn test_merge_writes_shape_cells() {
        let mut board = Board::new(6, 4);
        board.merge(&Shape::canonical(PieceKind::T), Position::new(1, 2));
        assert_eq!(
            board.to_string(),
            "......\n......\n..T...\n.TTT.."
        );
    }

    #[test]
    fn test_merge_drops_cells_above_board() {
        let mut board = Board::new(4, 3);
        board.merge(&Shape::canonical(PieceKind::I), Position::new(0, -2));
        assert_eq!(board.to_string(), ".I..\n.I..\n....");
    }

    #[test]
    fn test_sweep_without_full_rows() {
        let mut board = Board::from_ascii(
            "
            ....
            TTT.
            .OO.
            ",
        )
        .unwrap();
        let before = board.clone();
        assert_eq!(board.sweep_full_rows(), 0);
        assert_eq!(board, before);
    }

    #[test]
    fn test_sweep_single_bottom_row() {
        let mut board = Board::from_ascii(
            "
            ....
            .Z..
            ZZIO
            ",
        )
        .unwrap();
        assert_eq!(board.sweep_full_rows(), 1);
        assert_eq!(board.to_string(), "....\n....\n.Z..");
    }

    #[test]
    fn test_sweep_includes_top_row() {
        let mut board = Board::new(4, 3);
        fill_row(&mut board, 0);
        board.set_cell(2, 2, Cell::Piece(PieceKind::S));
        assert_eq!(board.sweep_full_rows(), 1);
        assert_eq!(board.to_string(), "....\n....\n..S.");
    }

    #[test]
    fn test_sweep_consecutive_rows() {
        let mut board = Board::from_ascii(
            "
            .L..
            LLLL
            JJJJ
            .J..
            ",
        )
        .unwrap();
        assert_eq!(board.sweep_full_rows(), 2);
        assert_eq!(board.to_string(), "....\n....\n.L..\n.J..");
    }

    #[test]
    fn test_sweep_non_contiguous_rows_preserves_order() {
        let mut board = Board::new(12, 20);
        let full = [2, 5, 7];
        let kinds = PieceKind::ALL;
        for y in 0..board.rows() {
            if full.contains(&y) {
                fill_row(&mut board, y);
            } else {
                // A distinct marker per row so order can be checked.
                board.set_cell(y % 12, y, Cell::Piece(kinds[y % kinds.len()]));
            }
        }
        let survivors: Vec<Vec<Cell>> = (0..board.rows())
            .filter(|y| !full.contains(y))
            .map(|y| board.row(y).to_vec())
            .collect();

        assert_eq!(board.sweep_full_rows(), 3);

        for y in 0..3 {
            assert!(board.row(y).iter().all(|cell| cell.is_empty()), "row {y}");
        }
        let remaining: Vec<Vec<Cell>> = (3..board.rows()).map(|y| board.row(y).to_vec()).collect();
        assert_eq!(remaining, survivors);

        // Rows below the lowest full row do not move.
        assert_eq!(board.cell(19 % 12, 19), Cell::Piece(kinds[19 % kinds.len()]));
        // Row 6 sits between full rows 5 and 7, so it falls by one.
        assert_eq!(board.cell(6, 7), Cell::Piece(kinds[6]));
    }

    #[test]
    fn test_sweep_all_rows() {
        let mut board = Board::new(5, 6);
        for y in 0..6 {
            fill_row(&mut board, y);
        }
        assert_eq!(board.sweep_full_rows(), 6);
        assert!(board.cells().all(Cell::is_empty));
    }

    #[test]
    fn test_clear() {
        let mut board = Board::from_ascii("TT\nOO").unwrap();
        board.clear();
        assert_eq!(board, Board::new(2, 2));
    }

    #[test]
    fn test_from_ascii_errors() {
        assert_eq!(Board::from_ascii("  \n "), Err(BoardParseError::Empty));
        assert_eq!(
            Board::from_ascii("...\n.."),
            Err(BoardParseError::RaggedRow {
                row: 1,
                expected: 3,
                found: 2,
            })
        );
        assert_eq!(
            Board::from_ascii("..\n.x"),
            Err(BoardParseError::InvalidCell {
                row: 1,
                col: 1,
                found: 'x',
            })
        );
    }

    #[test]
    fn test_board_serialization() {
        let board = Board::from_ascii(
            "
            ...
            .S.
            SS.
            ",
        )
        .unwrap();
        let serialized = serde_json::to_string(&board).unwrap();
        assert_eq!(serialized, r#"["...",".S.","SS."]"#);

        let deserialized: Board = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, board);

        assert!(serde_json::from_str::<Board>(r#"["...",".."]"#).is_err());
        assert!(serde_json::from_str::<Board>("[]").is_err());
    }

    #[test]
    fn test_cell_tags() {
        assert_eq!(Cell::Empty.tag(), 0);
        assert_eq!(Cell::Piece(PieceKind::I).tag(), 1);
        assert_eq!(Cell::Piece(PieceKind::T).tag(), 7);
        assert_eq!(Cell::from_char('.'), Some(Cell::Empty));
        assert_eq!(Cell::from_char('O'), Some(Cell::Piece(PieceKind::O)));
        assert_eq!(Cell::from_char('#'), None);
    }
}
