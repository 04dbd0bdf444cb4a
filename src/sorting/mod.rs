//! Sorting traces: bubble, quick and merge sort
//!
//! Each step holds a full array snapshot with per-element marks and the
//! running comparison/swap counters, replayed through the same ledger and
//! playback contract as the other engines.

mod algorithms;

pub use algorithms::{bubble_sort, merge_sort, quick_sort};

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::framework::{FrameOf, Replay, SubscriptionId, Trace};
use crate::ledger::CursorStart;
use crate::playback::{Advance, Playback};
use crate::ReplayError;

/// Auto-play interval at 1x
pub const BASE_INTERVAL: Duration = Duration::from_millis(300);

/// Longest accepted input
pub const MAX_ELEMENTS: usize = 64;

/// Which sort to trace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    /// Adjacent compare-and-swap passes
    Bubble,
    /// Lomuto partitioning
    Quick,
    /// Top-down merging
    Merge,
}

impl Algorithm {
    /// Record every step of sorting `values`
    pub fn trace(self, values: &[i64]) -> Vec<SortStep> {
        match self {
            Algorithm::Bubble => bubble_sort(values),
            Algorithm::Quick => quick_sort(values),
            Algorithm::Merge => merge_sort(values),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Algorithm::Bubble => "bubble",
            Algorithm::Quick => "quick",
            Algorithm::Merge => "merge",
        })
    }
}

impl FromStr for Algorithm {
    type Err = ReplayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bubble" => Ok(Algorithm::Bubble),
            "quick" => Ok(Algorithm::Quick),
            "merge" => Ok(Algorithm::Merge),
            other => Err(ReplayError::InvalidConfig(format!(
                "unknown sorting algorithm '{}'",
                other
            ))),
        }
    }
}

/// Visual state of one element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Mark {
    /// Untouched
    #[default]
    Idle,
    /// Being compared or swapped
    Comparing,
    /// Current pivot
    Pivot,
    /// In its final position
    Sorted,
    /// Part of the left run being merged
    LeftRun,
    /// Part of the right run being merged
    RightRun,
}

/// Value plus mark
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Element {
    /// Value
    pub value: i64,
    /// Mark
    pub mark: Mark,
}

impl Element {
    /// Unmarked element
    pub fn new(value: i64) -> Self {
        Self {
            value,
            mark: Mark::Idle,
        }
    }
}

/// One snapshot of the array
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortStep {
    /// What happened
    pub description: String,
    /// Array after the step
    pub array: Vec<Element>,
    /// Comparisons so far
    pub comparisons: usize,
    /// Swaps so far
    pub swaps: usize,
}

/// Counters at the cursor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortStats {
    /// Comparisons so far
    pub comparisons: usize,
    /// Swaps so far
    pub swaps: usize,
    /// Cursor position
    pub step_index: usize,
}

/// Marker type plugging sorting into the replay framework
#[derive(Debug, Clone, Copy)]
pub struct SortingTrace;

impl Trace for SortingTrace {
    type Step = SortStep;
    type Stats = SortStats;

    // Counters are cumulative in every snapshot, so the current step suffices.
    fn aggregate(steps: &[SortStep], cursor: Option<usize>) -> SortStats {
        match cursor.and_then(|idx| steps.get(idx).map(|step| (idx, step))) {
            Some((step_index, step)) => SortStats {
                comparisons: step.comparisons,
                swaps: step.swaps,
                step_index,
            },
            None => SortStats::default(),
        }
    }

    fn explain(step: &SortStep) -> String {
        step.description.clone()
    }
}

/// Sorting replay engine
#[derive(Debug)]
pub struct SortingEngine {
    algorithm: Algorithm,
    input: Vec<i64>,
    replay: Replay<SortingTrace>,
    playback: Playback,
}

impl SortingEngine {
    /// Engine with an empty log
    pub fn new(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            input: Vec::new(),
            replay: Replay::new(),
            playback: Playback::new(BASE_INTERVAL),
        }
    }

    /// Trace `values` with the engine's algorithm; step 0 is shown
    pub fn init(&mut self, values: Vec<i64>) -> Result<(), ReplayError> {
        if values.is_empty() || values.len() > MAX_ELEMENTS {
            let err = ReplayError::InvalidConfig(format!(
                "expected 1 to {} values, got {}",
                MAX_ELEMENTS,
                values.len()
            ));
            tracing::warn!(%err, "rejected sorting input");
            return Err(err);
        }
        let steps = self.algorithm.trace(&values);
        tracing::debug!(algorithm = %self.algorithm, steps = steps.len(), "sorting trace built");

        self.playback.pause();
        self.input = values;
        self.replay.load(steps, CursorStart::First);
        Ok(())
    }

    /// Switch algorithm and re-trace the current input
    pub fn set_algorithm(&mut self, algorithm: Algorithm) -> Result<(), ReplayError> {
        self.algorithm = algorithm;
        if self.input.is_empty() {
            return Ok(());
        }
        let input = std::mem::take(&mut self.input);
        self.init(input)
    }

    /// Selected algorithm
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Unsorted input
    pub fn input(&self) -> &[i64] {
        &self.input
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
    pub fn current(&self) -> Option<&SortStep> {
        self.replay.current()
    }

    /// Cursor position
    pub fn cursor(&self) -> Option<usize> {
        self.replay.cursor()
    }

    /// All recorded steps
    pub fn steps(&self) -> &[SortStep] {
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

    /// Counters at the cursor
    pub fn stats(&self) -> SortStats {
        self.replay.stats()
    }

    /// Frame at the cursor
    pub fn frame(&self) -> Option<FrameOf<SortingTrace>> {
        self.replay.frame()
    }

    /// Register a frame callback
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&FrameOf<SortingTrace>) + 'static,
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

impl Advance for SortingEngine {
    fn advance(&mut self) -> bool {
        self.step()
    }

    fn is_at_end(&self) -> bool {
        self.replay.is_at_end()
    }
}
