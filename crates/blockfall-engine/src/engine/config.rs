use serde::{Deserialize, Serialize};

use crate::{ConfigError, MAX_SHAPE_SIZE};

use super::piece_generator::PieceSeed;

/// Construction parameters for a [`Session`](super::Session).
///
/// Missing fields take their defaults when deserializing, so a partial
/// object such as `{"cols": 10}` is a valid configuration.
///
/// # Example
///
/// ```
/// use blockfall_engine::SessionConfig;
///
/// let config: SessionConfig = serde_json::from_str(r#"{"cols": 10}"#).unwrap();
/// assert_eq!(config.cols, 10);
/// assert_eq!(config.rows, SessionConfig::DEFAULT_ROWS);
/// assert!(config.seed.is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Board width in cells.
    pub cols: usize,
    /// Board height in cells.
    pub rows: usize,
    /// Seed for the piece order; random when `None`.
    pub seed: Option<PieceSeed>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cols: Self::DEFAULT_COLS,
            rows: Self::DEFAULT_ROWS,
            seed: None,
        }
    }
}

impl SessionConfig {
    pub const DEFAULT_COLS: usize = 12;
    pub const DEFAULT_ROWS: usize = 20;

    /// Checks that every piece fits on the board in every orientation and
    /// that board coordinates and cell count stay representable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cols < MAX_SHAPE_SIZE {
            return Err(ConfigError::BoardTooNarrow {
                cols: self.cols,
                min: MAX_SHAPE_SIZE,
            });
        }
        if self.rows < MAX_SHAPE_SIZE {
            return Err(ConfigError::BoardTooShort {
                rows: self.rows,
                min: MAX_SHAPE_SIZE,
            });
        }
        let fits_position = i32::try_from(self.cols).is_ok() && i32::try_from(self.rows).is_ok();
        if !fits_position || self.cols.checked_mul(self.rows).is_none() {
            return Err(ConfigError::BoardTooLarge {
                cols: self.cols,
                rows: self.rows,
            });
        }
        Ok(())
    }
}
