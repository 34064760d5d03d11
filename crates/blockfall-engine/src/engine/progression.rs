use serde::Serialize;

/// Base score values for line clears, before the level multiplier.
///
/// Index corresponds to number of lines cleared simultaneously:
/// - 1 line: 100 points
/// - 2 lines: 300 points
/// - 3 lines: 500 points
/// - 4 lines: 800 points
const SCORE_TABLE: [u64; 5] = [0, 100, 300, 500, 800];

const LINES_PER_LEVEL: u64 = 10;
const BASE_DROP_INTERVAL_MS: u64 = 1000;
const DROP_INTERVAL_STEP_MS: u64 = 50;
const MIN_DROP_INTERVAL_MS: u64 = 100;

/// Score, cleared lines, level and the fall speed derived from them.
///
/// - **Level** is `lines_cleared / 10 + 1`.
/// - **Drop interval** starts at 1000 ms and shrinks by 50 ms per level,
///   bottoming out at 100 ms from level 19 on.
/// - **Score** for a clear is the table value times the level in effect
///   before the clear is counted.
///
/// # Example
///
/// ```
/// use blockfall_engine::Progression;
///
/// let mut progression = Progression::new();
/// progression.apply_line_clear(4);
/// progression.apply_line_clear(4);
/// progression.apply_line_clear(2);
///
/// assert_eq!(progression.score(), 1900);
/// assert_eq!(progression.level(), 2);
/// assert_eq!(progression.drop_interval_ms(), 950);
///
/// progression.apply_line_clear(1);
/// assert_eq!(progression.score(), 2100);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Progression {
    score: u64,
    lines_cleared: u64,
    level: u64,
    drop_interval_ms: u64,
    completed_pieces: u64,
    line_clear_counter: [u64; 5],
}

impl Default for Progression {
    fn default() -> Self {
        Self::new()
    }
}

impl Progression {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            lines_cleared: 0,
            level: 1,
            drop_interval_ms: BASE_DROP_INTERVAL_MS,
            completed_pieces: 0,
            line_clear_counter: [0; 5],
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    #[must_use]
    pub const fn score(&self) -> u64 {
        self.score
    }

    #[must_use]
    pub const fn lines_cleared(&self) -> u64 {
        self.lines_cleared
    }

    #[must_use]
    pub const fn level(&self) -> u64 {
        self.level
    }

    /// Time in milliseconds between automatic one-row descents.
    #[must_use]
    pub const fn drop_interval_ms(&self) -> u64 {
        self.drop_interval_ms
    }

    /// Returns the total number of pieces that have been locked into place.
    #[must_use]
    pub const fn completed_pieces(&self) -> u64 {
        self.completed_pieces
    }

    /// Returns a histogram of locks by rows cleared.
    ///
    /// Index 0 counts locks that cleared nothing, indices 1 to 4 count
    /// singles, doubles, triples and four-row clears.
    #[must_use]
    pub const fn line_clear_counter(&self) -> &[u64; 5] {
        &self.line_clear_counter
    }

    /// Adds the score for clearing `rows_cleared` rows at once and advances
    /// lines, level and drop interval. Returns the points gained.
    ///
    /// # Panics
    ///
    /// Panics if `rows_cleared` is greater than 4; no piece spans more rows.
    pub fn apply_line_clear(&mut self, rows_cleared: usize) -> u64 {
        assert!(
            rows_cleared < SCORE_TABLE.len(),
            "cleared {rows_cleared} rows with a single piece"
        );
        if rows_cleared == 0 {
            return 0;
        }

        let gained = SCORE_TABLE[rows_cleared] * self.level;
        self.score += gained;
        self.lines_cleared += rows_cleared as u64;
        self.level = self.lines_cleared / LINES_PER_LEVEL + 1;
        self.drop_interval_ms = BASE_DROP_INTERVAL_MS
            .saturating_sub((self.level - 1) * DROP_INTERVAL_STEP_MS)
            .max(MIN_DROP_INTERVAL_MS);
        gained
    }

    /// Records a locked piece and the rows it cleared. Returns the points gained.
    ///
    /// # Panics
    ///
    /// Panics if `rows_cleared` is greater than 4.
    pub fn complete_piece_lock(&mut self, rows_cleared: usize) -> u64 {
        let gained = self.apply_line_clear(rows_cleared);
        self.completed_pieces += 1;
        self.line_clear_counter[rows_cleared] += 1;
        gained
    }
}
