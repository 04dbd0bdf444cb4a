//! N-Queens board
//!
//! One optional column per row. Serialized as an array of integers with
//! `-1` marking an empty row.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ReplayError;

/// A queen (or conflict) location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Row index
    pub row: usize,
    /// Column index
    pub col: usize,
}

impl Position {
    /// Create a position
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Same column or same diagonal
    pub fn attacks(&self, other: &Position) -> bool {
        self.col == other.col || self.row.abs_diff(other.row) == self.col.abs_diff(other.col)
    }
}

/// Square board, `cells[row] = Some(col)` when a queen is placed
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "Vec<i64>", try_from = "Vec<i64>")]
pub struct Board {
    cells: Vec<Option<usize>>,
}

impl Board {
    /// Board of `size` empty rows
    pub fn empty(size: usize) -> Self {
        Self {
            cells: vec![None; size],
        }
    }

    /// Number of rows (and columns)
    #[inline]
    pub fn size(&self) -> usize {
        self.cells.len()
    }

    /// Column of the queen on `row`
    #[inline]
    pub fn get(&self, row: usize) -> Option<usize> {
        self.cells.get(row).copied().flatten()
    }

    /// Put a queen on `(row, col)`, replacing any queen on that row
    pub fn place(&mut self, row: usize, col: usize) {
        if let Some(cell) = self.cells.get_mut(row) {
            *cell = Some(col);
        }
    }

    /// Empty `row`, returning the column it held
    pub fn clear(&mut self, row: usize) -> Option<usize> {
        self.cells.get_mut(row).and_then(Option::take)
    }

    /// Copy with a queen on `(row, col)`
    pub fn with_queen(&self, row: usize, col: usize) -> Self {
        let mut next = self.clone();
        next.place(row, col);
        next
    }

    /// Copy with `row` emptied
    pub fn without_queen(&self, row: usize) -> Self {
        let mut next = self.clone();
        next.clear(row);
        next
    }

    /// Placed queens in row order
    pub fn queens(&self) -> impl Iterator<Item = Position> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(row, col)| col.map(|col| Position::new(row, col)))
    }

    /// Number of placed queens
    pub fn queen_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Every row holds a queen
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// Queens on other rows that attack `(row, col)`
    pub fn conflicts_at(&self, row: usize, col: usize) -> Vec<Position> {
        let target = Position::new(row, col);
        self.queens()
            .filter(|queen| queen.row != row && queen.attacks(&target))
            .collect()
    }

    /// Every queen involved in an attacking pair (both ends of each pair)
    pub fn validate(&self) -> Vec<Position> {
        let queens: Vec<Position> = self.queens().collect();
        let mut conflicts = Vec::new();
        for (i, a) in queens.iter().enumerate() {
            for b in &queens[i + 1..] {
                if a.attacks(b) {
                    conflicts.push(*a);
                    conflicts.push(*b);
                }
            }
        }
        conflicts
    }

    /// Full and conflict-free
    pub fn is_complete(&self) -> bool {
        self.is_full() && self.validate().is_empty()
    }

    /// Columns with `-1` for empty rows
    pub fn to_columns(&self) -> Vec<i64> {
        self.cells
            .iter()
            .map(|c| c.map_or(-1, |col| col as i64))
            .collect()
    }
}

impl From<Board> for Vec<i64> {
    fn from(board: Board) -> Self {
        board.to_columns()
    }
}

impl TryFrom<Vec<i64>> for Board {
    type Error = ReplayError;

    fn try_from(columns: Vec<i64>) -> Result<Self, Self::Error> {
        let size = columns.len();
        let cells = columns
            .into_iter()
            .enumerate()
            .map(|(row, col)| match col {
                -1 => Ok(None),
                c if c >= 0 && (c as usize) < size => Ok(Some(c as usize)),
                _ => Err(ReplayError::InvalidConfig(format!(
                    "row {} has column {} outside -1..{}",
                    row, col, size
                ))),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { cells })
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, cell) in self.cells.iter().enumerate() {
            if row > 0 {
                writeln!(f)?;
            }
            for col in 0..self.size() {
                let mark = if *cell == Some(col) { 'Q' } else { '.' };
                write!(f, "{}", mark)?;
            }
        }
        Ok(())
    }
}
