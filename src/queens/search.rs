//! Exhaustive backtracking search and its step vocabulary

use std::fmt;

use crate::framework::{count_visited, Trace};

use super::board::{Board, Position};

/// Step discriminator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Conflict test for one cell
    Check,
    /// Queen put down
    Place,
    /// Queen taken back
    Remove,
    /// Complete, conflict-free board
    Solution,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Action::Check => "CHECK",
            Action::Place => "PLACE",
            Action::Remove => "REMOVE",
            Action::Solution => "SOLUTION",
        })
    }
}

/// One recorded transition with the board as it stands afterwards
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueensStep {
    /// Conflict test; `col` is `None` for the starting state
    Check {
        /// Row being tried
        row: usize,
        /// Column being tried
        col: Option<usize>,
        /// Board snapshot
        board: Board,
        /// Queens attacking the cell (empty means placeable)
        conflicts: Vec<Position>,
    },
    /// Queen placed on `(row, col)`
    Place {
        /// Row
        row: usize,
        /// Column
        col: usize,
        /// Board snapshot including the new queen
        board: Board,
    },
    /// Queen removed from `(row, col)`
    Remove {
        /// Row
        row: usize,
        /// Column the queen occupied
        col: usize,
        /// Board snapshot without the queen
        board: Board,
    },
    /// Found a solution
    Solution {
        /// The solved board
        board: Board,
        /// Solution number, from 1
        number: usize,
    },
}

impl QueensStep {
    /// Step discriminator
    pub fn action(&self) -> Action {
        match self {
            QueensStep::Check { .. } => Action::Check,
            QueensStep::Place { .. } => Action::Place,
            QueensStep::Remove { .. } => Action::Remove,
            QueensStep::Solution { .. } => Action::Solution,
        }
    }

    /// Board snapshot
    pub fn board(&self) -> &Board {
        match self {
            QueensStep::Check { board, .. }
            | QueensStep::Place { board, .. }
            | QueensStep::Remove { board, .. }
            | QueensStep::Solution { board, .. } => board,
        }
    }

    /// Row the step is about (board size for a solution)
    pub fn row(&self) -> usize {
        match self {
            QueensStep::Check { row, .. }
            | QueensStep::Place { row, .. }
            | QueensStep::Remove { row, .. } => *row,
            QueensStep::Solution { board, .. } => board.size(),
        }
    }

    /// Whether the step marks a found solution
    pub fn is_solution(&self) -> bool {
        matches!(self, QueensStep::Solution { .. })
    }

    /// Human-readable description (rows and columns counted from 1)
    pub fn explanation(&self) -> String {
        match self {
            QueensStep::Check { col: None, .. } => "Initialize the board".to_string(),
            QueensStep::Check {
                row,
                col: Some(col),
                conflicts,
                ..
            } => {
                if conflicts.is_empty() {
                    format!("Check: row {}, column {} is safe", row + 1, col + 1)
                } else {
                    format!(
                        "Check: row {}, column {} conflicts with {} placed queen(s)",
                        row + 1,
                        col + 1,
                        conflicts.len()
                    )
                }
            }
            QueensStep::Place { row, col, .. } => {
                format!("Place a queen at row {}, column {}", row + 1, col + 1)
            }
            QueensStep::Remove { row, col, .. } => format!(
                "Remove the queen at row {}, column {} (backtrack)",
                row + 1,
                col + 1
            ),
            QueensStep::Solution { board, number } => format!(
                "Solution {}: all {} queens placed without attacking each other",
                number,
                board.size()
            ),
        }
    }
}

/// Counters derived from `steps[0..=cursor]`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueensStats {
    /// Row of the current step
    pub depth: usize,
    /// Cursor position
    pub nodes_visited: usize,
    /// REMOVE steps visited
    pub backtracks: usize,
    /// SOLUTION steps visited
    pub solutions_found: usize,
}

/// Marker type plugging N-Queens into the replay framework
#[derive(Debug, Clone, Copy)]
pub struct QueensTrace;

impl Trace for QueensTrace {
    type Step = QueensStep;
    type Stats = QueensStats;

    fn aggregate(steps: &[QueensStep], cursor: Option<usize>) -> QueensStats {
        let Some(index) = cursor else {
            return QueensStats::default();
        };
        QueensStats {
            depth: steps.get(index).map_or(0, QueensStep::row),
            nodes_visited: index,
            backtracks: count_visited(steps, cursor, |s| s.action() == Action::Remove),
            solutions_found: count_visited(steps, cursor, QueensStep::is_solution),
        }
    }

    fn explain(step: &QueensStep) -> String {
        step.explanation()
    }
}

/// Result of one exhaustive search
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// Recorded steps
    pub steps: Vec<QueensStep>,
    /// Solved boards in discovery order
    pub solutions: Vec<Board>,
}

struct Search {
    board: Board,
    steps: Vec<QueensStep>,
    solutions: Vec<Board>,
}

impl Search {
    fn solve(&mut self, row: usize) {
        let n = self.board.size();
        if row == n {
            self.solutions.push(self.board.clone());
            self.steps.push(QueensStep::Solution {
                board: self.board.clone(),
                number: self.solutions.len(),
            });
            return;
        }

        // Seeded rows stay fixed; they are checked once and never backtracked.
        if let Some(col) = self.board.get(row) {
            let conflicts = self.board.conflicts_at(row, col);
            let safe = conflicts.is_empty();
            self.check(row, col, conflicts);
            if safe {
                self.solve(row + 1);
            }
            return;
        }

        for col in 0..n {
            let conflicts = self.board.conflicts_at(row, col);
            let safe = conflicts.is_empty();
            self.check(row, col, conflicts);
            if !safe {
                continue;
            }

            self.board.place(row, col);
            self.steps.push(QueensStep::Place {
                row,
                col,
                board: self.board.clone(),
            });

            self.solve(row + 1);

            self.board.clear(row);
            self.steps.push(QueensStep::Remove {
                row,
                col,
                board: self.board.clone(),
            });
        }
    }

    fn check(&mut self, row: usize, col: usize, conflicts: Vec<Position>) {
        self.steps.push(QueensStep::Check {
            row,
            col: Some(col),
            board: self.board.clone(),
            conflicts,
        });
    }
}

/// Run the full backtracking search from `seed`
///
/// The first step is a CHECK of row 0 with no column, showing the seed.
pub fn search(seed: Board) -> SearchOutcome {
    let _span = tracing::debug_span!("queens_search", size = seed.size()).entered();

    let mut search = Search {
        steps: vec![QueensStep::Check {
            row: 0,
            col: None,
            board: seed.clone(),
            conflicts: Vec::new(),
        }],
        board: seed,
        solutions: Vec::new(),
    };
    search.solve(0);

    tracing::debug!(
        steps = search.steps.len(),
        solutions = search.solutions.len(),
        "queens search finished"
    );
    SearchOutcome {
        steps: search.steps,
        solutions: search.solutions,
    }
}
