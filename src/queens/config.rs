use serde::{Deserialize, Serialize};

use crate::ReplayError;

use super::board::Board;

/// Largest supported board
pub const MAX_BOARD_SIZE: usize = 12;

/// Board size plus an optional seed
///
/// JSON shape: `{"size": 4, "initialBoard": [-1, 2, -1, -1]}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueensConfig {
    /// Rows and columns
    pub size: usize,
    /// Queens fixed before the search starts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_board: Option<Board>,
}

impl QueensConfig {
    /// Empty board of `size`
    pub fn new(size: usize) -> Self {
        Self {
            size,
            initial_board: None,
        }
    }

    /// Seeded board; the size is taken from the board
    pub fn seeded(board: Board) -> Self {
        Self {
            size: board.size(),
            initial_board: Some(board),
        }
    }

    /// Size in range and seed length matching
    pub fn validate(&self) -> Result<(), ReplayError> {
        if self.size == 0 || self.size > MAX_BOARD_SIZE {
            return Err(ReplayError::InvalidBoardSize {
                size: self.size,
                max: MAX_BOARD_SIZE,
            });
        }
        if let Some(board) = &self.initial_board {
            if board.size() != self.size {
                return Err(ReplayError::InvalidConfig(format!(
                    "initial board has {} rows, expected {}",
                    board.size(),
                    self.size
                )));
            }
        }
        Ok(())
    }

    /// Board the search starts from
    pub fn seed(&self) -> Board {
        self.initial_board
            .clone()
            .unwrap_or_else(|| Board::empty(self.size))
    }

    /// Parse and validate a JSON config; any problem is an import failure
    pub fn from_json(text: &str) -> Result<Self, ReplayError> {
        let config: Self =
            serde_json::from_str(text).map_err(|e| ReplayError::ImportFailed(e.to_string()))?;
        config
            .validate()
            .map_err(|e| ReplayError::ImportFailed(e.to_string()))?;
        Ok(config)
    }

    /// Serialize to the import shape
    pub fn to_json(&self) -> Result<String, ReplayError> {
        serde_json::to_string(self).map_err(|e| ReplayError::InvalidConfig(e.to_string()))
    }
}

/// Preset problems: empty 4×4 and 8×8 boards
pub fn standard_test_cases() -> Vec<(&'static str, QueensConfig)> {
    vec![
        ("4 queens", QueensConfig::seeded(Board::empty(4))),
        ("8 queens", QueensConfig::seeded(Board::empty(8))),
    ]
}
