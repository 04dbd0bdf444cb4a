//! Backtracking engine: N-Queens
//!
//! `init` runs the exhaustive search once and records:
//! - CHECK for every cell tried (with the attacking queens)
//! - PLACE / REMOVE around every recursive descent
//! - SOLUTION whenever the last row is filled
//!
//! Manual edits (`place_queen` / `clear_queen`) work on the board under the
//! cursor and splice new steps right after it instead of re-running the search.

mod board;
mod config;
mod search;

pub use board::{Board, Position};
pub use config::{standard_test_cases, QueensConfig, MAX_BOARD_SIZE};
pub use search::{search, Action, QueensStats, QueensStep, QueensTrace, SearchOutcome};

use std::time::Duration;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::framework::{FrameOf, Replay, SubscriptionId};
use crate::ledger::CursorStart;
use crate::playback::{Advance, Playback};
use crate::ReplayError;

/// Auto-play interval at 1x
pub const BASE_INTERVAL: Duration = Duration::from_millis(500);

/// A numbered solved board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Solution {
    /// Number, from 1 in discovery order
    pub id: usize,
    /// The board
    pub board: Board,
}

/// N-Queens replay engine
#[derive(Debug)]
pub struct QueensEngine {
    config: Option<QueensConfig>,
    replay: Replay<QueensTrace>,
    solutions: Vec<Solution>,
    playback: Playback,
}

impl QueensEngine {
    /// Engine with an empty log
    pub fn new() -> Self {
        Self {
            config: None,
            replay: Replay::new(),
            solutions: Vec::new(),
            playback: Playback::new(BASE_INTERVAL),
        }
    }

    /// Validate `config`, run the search and show step 0
    ///
    /// On error the previous log, cursor and solutions are left untouched.
    pub fn init(&mut self, config: QueensConfig) -> Result<(), ReplayError> {
        if let Err(err) = config.validate() {
            tracing::warn!(%err, "rejected queens config");
            return Err(err);
        }
        let outcome = search(config.seed());

        self.playback.pause();
        self.solutions = outcome
            .solutions
            .into_iter()
            .enumerate()
            .map(|(i, board)| Solution { id: i + 1, board })
            .collect();
        self.config = Some(config);
        self.replay.load(outcome.steps, CursorStart::First);
        Ok(())
    }

    /// `init` from a JSON config
    pub fn import_json(&mut self, text: &str) -> Result<(), ReplayError> {
        let config = QueensConfig::from_json(text)?;
        self.init(config)
    }

    /// Loaded config
    pub fn config(&self) -> Option<&QueensConfig> {
        self.config.as_ref()
    }

    /// Solutions found so far (search first, then manual ones)
    pub fn solutions(&self) -> &[Solution] {
        &self.solutions
    }

    /// Board under the cursor
    pub fn current_board(&self) -> Option<&Board> {
        self.replay.current().map(QueensStep::board)
    }

    /// Put a queen on `(row, col)` of the board under the cursor
    ///
    /// Splices a CHECK step, then PLACE when the cell is safe, then SOLUTION
    /// when the board is complete. Returns whether the queen was placed.
    pub fn place_queen(&mut self, row: usize, col: usize) -> Result<bool, ReplayError> {
        let board = self.editable_board()?;
        if row >= board.size() || col >= board.size() {
            return Err(ReplayError::InvalidPosition {
                row,
                col,
                size: board.size(),
            });
        }

        let conflicts = board.conflicts_at(row, col);
        let safe = conflicts.is_empty();
        self.replay.splice(QueensStep::Check {
            row,
            col: Some(col),
            board: board.clone(),
            conflicts,
        });
        if !safe {
            tracing::trace!(row, col, "manual placement rejected");
            return Ok(false);
        }

        let placed = board.with_queen(row, col);
        self.replay.splice(QueensStep::Place {
            row,
            col,
            board: placed.clone(),
        });
        tracing::trace!(row, col, "manual placement");

        if placed.is_complete() {
            let number = self.record_solution(&placed);
            self.replay.splice(QueensStep::Solution {
                board: placed,
                number,
            });
        }
        Ok(true)
    }

    /// Remove the queen on `row` of the board under the cursor
    ///
    /// Splices one REMOVE step; an empty row is a no-op returning `false`.
    pub fn clear_queen(&mut self, row: usize) -> Result<bool, ReplayError> {
        let board = self.editable_board()?;
        if row >= board.size() {
            return Err(ReplayError::InvalidRow {
                row,
                size: board.size(),
            });
        }
        let Some(col) = board.get(row) else {
            return Ok(false);
        };

        self.replay.splice(QueensStep::Remove {
            row,
            col,
            board: board.without_queen(row),
        });
        tracing::trace!(row, col, "manual removal");
        Ok(true)
    }

    fn editable_board(&self) -> Result<Board, ReplayError> {
        self.current_board()
            .cloned()
            .ok_or_else(|| ReplayError::InvalidConfig("no board loaded".to_string()))
    }

    // Manual solutions continue the search numbering; a known board keeps its id.
    fn record_solution(&mut self, board: &Board) -> usize {
        if let Some(known) = self.solutions.iter().find(|s| s.board == *board) {
            return known.id;
        }
        let id = self.solutions.len() + 1;
        self.solutions.push(Solution {
            id,
            board: board.clone(),
        });
        id
    }

    /// Step forward
    pub fn step(&mut self) -> bool {
        self.replay.advance()
    }

    /// Step backward
    pub fn prev(&mut self) -> bool {
        self.replay.retreat()
    }

    /// Jump to `index`
    pub fn goto(&mut self, index: usize) -> bool {
        self.replay.seek(index)
    }

    /// Step under the cursor
    pub fn current(&self) -> Option<&QueensStep> {
        self.replay.current()
    }

    /// Cursor position
    pub fn cursor(&self) -> Option<usize> {
        self.replay.cursor()
    }

    /// All recorded steps
    pub fn steps(&self) -> &[QueensStep] {
        self.replay.log().steps()
    }

    /// Number of recorded steps
    pub fn len(&self) -> usize {
        self.replay.len()
    }

    /// Whether no trace is loaded
    pub fn is_empty(&self) -> bool {
        self.replay.is_empty()
    }

    /// Statistics at the cursor
    pub fn stats(&self) -> QueensStats {
        self.replay.stats()
    }

    /// Frame at the cursor
    pub fn frame(&self) -> Option<FrameOf<QueensTrace>> {
        self.replay.frame()
    }

    /// Register a frame callback
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&FrameOf<QueensTrace>) + 'static,
    {
        self.replay.subscribe(callback)
    }

    /// Drop a frame callback
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.replay.unsubscribe(id)
    }

    /// Start auto-play
    pub fn play(&mut self, now: Duration) -> bool {
        self.playback.play(now)
    }

    /// Stop auto-play
    pub fn pause(&mut self) -> bool {
        self.playback.pause()
    }

    /// Change auto-play speed
    pub fn set_speed(&mut self, multiplier: f64, now: Duration) -> Result<(), ReplayError> {
        self.playback.set_speed(multiplier, now)
    }

    /// Run due auto-play ticks
    pub fn tick(&mut self, now: Duration) -> usize {
        self.playback.poll(now, &mut self.replay)
    }

    /// Auto-play state
    pub fn playback(&self) -> &Playback {
        &self.playback
    }
}

impl Default for QueensEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl Advance for QueensEngine {
    fn advance(&mut self) -> bool {
        self.step()
    }

    fn is_at_end(&self) -> bool {
        self.replay.is_at_end()
    }
}

/// Greedy random seed: rows top to bottom, a random safe column each
///
/// Rows without a safe column are skipped, so fewer than `count` queens may
/// be placed.
pub fn generate_random_board<R: Rng + ?Sized>(
    size: usize,
    count: usize,
    rng: &mut R,
) -> Result<Board, ReplayError> {
    QueensConfig::new(size).validate()?;

    let mut board = Board::empty(size);
    let mut placed = 0;
    for row in 0..size {
        if placed >= count {
            break;
        }
        let safe: Vec<usize> = (0..size)
            .filter(|&col| board.conflicts_at(row, col).is_empty())
            .collect();
        let Some(&col) = safe.choose(rng) else {
            continue;
        };
        board.place(row, col);
        placed += 1;
    }
    Ok(board)
}

/// All attacking pairs on `board`, both queens of each pair listed
pub fn validate_board(board: &Board) -> Vec<Position> {
    board.validate()
}

/// Full and conflict-free
pub fn is_complete(board: &Board) -> bool {
    board.is_complete()
}

/// `{size, initialBoard}` JSON for `board`
pub fn export_json(board: &Board) -> Result<String, ReplayError> {
    QueensConfig::seeded(board.clone()).to_json()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn engine(size: usize) -> QueensEngine {
        let mut engine = QueensEngine::new();
        engine.init(QueensConfig::new(size)).unwrap();
        engine
    }

    #[test]
    fn test_init_numbers_solutions() {
        let engine = engine(4);
        let ids: Vec<_> = engine.solutions().iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(engine.cursor(), Some(0));
        assert_eq!(engine.current().map(QueensStep::explanation).as_deref(), Some("Initialize the board"));
    }

    #[test]
    fn test_place_then_clear_splices_after_cursor() {
        let mut engine = engine(4);
        let before = engine.len();

        assert!(engine.place_queen(0, 1).unwrap());
        assert_eq!(engine.cursor(), Some(2));
        assert_eq!(engine.current_board().and_then(|b| b.get(0)), Some(1));
        assert_eq!(engine.current().map(QueensStep::action), Some(Action::Place));

        assert!(engine.clear_queen(0).unwrap());
        assert_eq!(engine.cursor(), Some(3));
        assert_eq!(engine.current_board().and_then(|b| b.get(0)), None);
        assert_eq!(engine.len(), before + 3);
    }

    #[test]
    fn test_conflicting_place_only_checks() {
        let mut engine = engine(4);
        engine.place_queen(0, 0).unwrap();
        let len = engine.len();
        assert!(!engine.place_queen(1, 1).unwrap());
        assert_eq!(engine.len(), len + 1);
        assert_eq!(engine.current().map(QueensStep::action), Some(Action::Check));
        assert_eq!(engine.current_board().and_then(|b| b.get(1)), None);
    }

    #[test]
    fn test_manual_solution_reuses_number() {
        let mut engine = engine(4);
        for (row, col) in [(0, 2), (1, 0), (2, 3), (3, 1)] {
            assert!(engine.place_queen(row, col).unwrap());
        }
        match engine.current() {
            Some(QueensStep::Solution { number, .. }) => assert_eq!(*number, 2),
            other => panic!("expected a solution step, got {:?}", other),
        }
        assert_eq!(engine.solutions().len(), 2);
    }

    #[test]
    fn test_manual_solution_on_seeded_board_gets_next_number() {
        let mut engine = QueensEngine::new();
        // seed blocks every solution, so the search finds none
        engine
            .init(QueensConfig::seeded(Board::empty(4).with_queen(0, 0)))
            .unwrap();
        assert!(engine.solutions().is_empty());

        engine.clear_queen(0).unwrap();
        for (row, col) in [(0, 1), (1, 3), (2, 0), (3, 2)] {
            engine.place_queen(row, col).unwrap();
        }
        assert_eq!(engine.solutions().len(), 1);
        assert_eq!(engine.solutions()[0].id, 1);
    }

    #[test]
    fn test_edit_errors() {
        let mut empty = QueensEngine::new();
        assert!(empty.place_queen(0, 0).is_err());

        let mut engine = engine(4);
        assert!(matches!(
            engine.place_queen(4, 0),
            Err(ReplayError::InvalidPosition { row: 4, col: 0, size: 4 })
        ));
        assert!(matches!(engine.clear_queen(7), Err(ReplayError::InvalidRow { .. })));
        assert!(!engine.clear_queen(2).unwrap());
    }

    #[test]
    fn test_random_board_is_conflict_free() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..20 {
            let board = generate_random_board(8, 5, &mut rng).unwrap();
            assert!(board.queen_count() <= 5);
            assert!(validate_board(&board).is_empty());
        }
        assert!(generate_random_board(0, 1, &mut rng).is_err());
    }

    #[test]
    fn test_export_then_import() {
        let board = Board::empty(4).with_queen(0, 1);
        let text = export_json(&board).unwrap();
        let mut engine = QueensEngine::new();
        engine.import_json(&text).unwrap();
        assert_eq!(engine.current_board(), Some(&board));
        assert_eq!(engine.solutions().len(), 1);
    }
}
