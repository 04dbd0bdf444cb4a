//! Step ledger
//!
//! Ordered sequence of immutable step snapshots plus a movable read cursor.
//! Cursor range: `None` ("not started") or `Some(i)` with `i < len`.
//! Navigation never panics; out-of-range moves are reported as `false`.

/// Where the cursor lands after a log is (re)loaded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorStart {
    /// Cursor before the first step (`-1`)
    Unstarted,
    /// First step immediately visible
    First,
}

/// Append/splice-capable step log with a read cursor
///
/// Steps are never mutated once stored; the only structural edit is
/// [`StepLog::insert_after_cursor`].
#[derive(Debug, Clone)]
pub struct StepLog<S> {
    steps: Vec<S>,
    cursor: Option<usize>,
}

impl<S> Default for StepLog<S> {
    fn default() -> Self {
        Self {
            steps: Vec::new(),
            cursor: None,
        }
    }
}

impl<S> StepLog<S> {
    /// Create an empty, unstarted log
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a log from precomputed steps
    pub fn from_steps(steps: Vec<S>, start: CursorStart) -> Self {
        let mut log = Self::new();
        log.reset(steps, start);
        log
    }

    /// Replace every step and reposition the cursor
    pub fn reset(&mut self, steps: Vec<S>, start: CursorStart) {
        self.steps = steps;
        self.rewind(start);
    }

    /// Move the cursor back to the start without touching the steps
    pub fn rewind(&mut self, start: CursorStart) {
        self.cursor = match start {
            CursorStart::First if !self.steps.is_empty() => Some(0),
            _ => None,
        };
    }

    /// Number of steps
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the log holds no steps
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Cursor position (`None` = not started)
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Step under the cursor
    pub fn current(&self) -> Option<&S> {
        self.cursor.and_then(|idx| self.steps.get(idx))
    }

    /// Step at an arbitrary index
    pub fn get(&self, index: usize) -> Option<&S> {
        self.steps.get(index)
    }

    /// All steps in log order
    pub fn steps(&self) -> &[S] {
        &self.steps
    }

    /// Steps `0..=cursor` (empty when not started)
    pub fn visited(&self) -> &[S] {
        match self.cursor {
            Some(idx) => &self.steps[..=idx],
            None => &[],
        }
    }

    /// Whether the cursor sits on the last step
    pub fn is_at_end(&self) -> bool {
        match self.cursor {
            Some(idx) => idx + 1 == self.steps.len(),
            None => self.steps.is_empty(),
        }
    }

    /// Move forward one step. Returns `false` at the last step.
    pub fn advance(&mut self) -> bool {
        let next = self.cursor.map_or(0, |idx| idx + 1);
        if next >= self.steps.len() {
            return false;
        }
        self.cursor = Some(next);
        true
    }

    /// Move back one step. Returns `false` at cursor `<= 0`.
    pub fn retreat(&mut self) -> bool {
        match self.cursor {
            Some(idx) if idx > 0 => {
                self.cursor = Some(idx - 1);
                true
            }
            _ => false,
        }
    }

    /// Jump to `index`. Out-of-range indices leave the cursor untouched.
    pub fn seek(&mut self, index: usize) -> bool {
        if index >= self.steps.len() {
            return false;
        }
        self.cursor = Some(index);
        true
    }

    /// Splice a step directly after the cursor and move onto it
    ///
    /// On an unstarted log the step becomes index 0. Returns the new cursor.
    pub fn insert_after_cursor(&mut self, step: S) -> usize {
        let at = self.cursor.map_or(0, |idx| idx + 1);
        self.steps.insert(at, step);
        self.cursor = Some(at);
        at
    }

    /// Iterate over all steps
    pub fn iter(&self) -> std::slice::Iter<'_, S> {
        self.steps.iter()
    }
}
