//! Dynamic-programming engine: 0/1 knapsack
//!
//! The whole table is filled on `init`, one step per cell. The cursor then
//! starts unstarted; the optimal path is revealed once the last cell is shown.

mod config;
mod dp;

pub use config::{random_items, Item, KnapsackConfig, MAX_CAPACITY, MAX_ITEMS};
pub use dp::{
    fill_table, reconstruct, Decision, DpTable, KnapsackSolution, KnapsackStats, KnapsackStep,
    KnapsackTrace,
};

use std::time::Duration;

use crate::framework::{FrameOf, Replay, SubscriptionId};
use crate::ledger::CursorStart;
use crate::playback::{Advance, Playback};
use crate::ReplayError;

/// Auto-play interval at 1x
pub const BASE_INTERVAL: Duration = Duration::from_millis(1000);

const START_HINT: &str = "Press play or next to start the algorithm.";

/// Knapsack replay engine
#[derive(Debug)]
pub struct KnapsackEngine {
    config: Option<KnapsackConfig>,
    replay: Replay<KnapsackTrace>,
    solution: Option<KnapsackSolution>,
    playback: Playback,
}

impl KnapsackEngine {
    /// Engine with an empty log
    pub fn new() -> Self {
        Self {
            config: None,
            replay: Replay::new(),
            solution: None,
            playback: Playback::new(BASE_INTERVAL),
        }
    }

    /// Validate `config`, fill the table and reconstruct the optimal set
    ///
    /// The cursor starts unstarted. On error nothing changes.
    pub fn init(&mut self, config: KnapsackConfig) -> Result<(), ReplayError> {
        if let Err(err) = config.validate() {
            tracing::warn!(%err, "rejected knapsack config");
            return Err(err);
        }
        let (steps, table) = fill_table(&config);
        let solution = reconstruct(&table, &config);

        self.playback.pause();
        self.solution = Some(solution);
        self.config = Some(config);
        self.replay.load(steps, CursorStart::Unstarted);
        Ok(())
    }

    /// `init` from a JSON config
    pub fn import_json(&mut self, text: &str) -> Result<(), ReplayError> {
        let config = KnapsackConfig::from_json(text)?;
        self.init(config)
    }

    /// Current config as JSON
    pub fn export_json(&self) -> Result<String, ReplayError> {
        self.config
            .as_ref()
            .ok_or_else(|| ReplayError::InvalidConfig("no configuration loaded".to_string()))?
            .to_json()
    }

    /// Loaded config
    pub fn config(&self) -> Option<&KnapsackConfig> {
        self.config.as_ref()
    }

    /// Show the next cell
    pub fn next(&mut self) -> bool {
        self.replay.advance()
    }

    /// Show the previous cell; `false` at the first cell or before it
    pub fn prev(&mut self) -> bool {
        self.replay.retreat()
    }

    /// Jump to cell step `index`
    pub fn goto(&mut self, index: usize) -> bool {
        self.replay.seek(index)
    }

    /// Back to "not yet run", stopping auto-play
    pub fn reset(&mut self) {
        self.playback.pause();
        self.replay.rewind(CursorStart::Unstarted);
    }

    /// Cursor on the final cell
    pub fn is_complete(&self) -> bool {
        !self.replay.is_empty() && self.replay.is_at_end() && self.replay.cursor().is_some()
    }

    /// Optimal value of the loaded instance
    pub fn best_value(&self) -> Option<u64> {
        self.solution.as_ref().map(|s| s.max_value)
    }

    /// Value of the cell under the cursor (0 before the first step)
    pub fn current_best_value(&self) -> u64 {
        self.replay.current().map_or(0, |step| step.value)
    }

    /// Reconstructed optimal choice
    pub fn solution(&self) -> Option<&KnapsackSolution> {
        self.solution.as_ref()
    }

    /// Cells of the optimal path, only once the table is complete
    pub fn optimal_path(&self) -> &[(usize, usize)] {
        match &self.solution {
            Some(solution) if self.is_complete() => &solution.path,
            _ => &[],
        }
    }

    /// Description for the cursor position, with a summary at the end
    pub fn explanation(&self) -> String {
        let Some(step) = self.replay.current() else {
            return START_HINT.to_string();
        };
        match &self.solution {
            Some(solution) if self.is_complete() => {
                let names: Vec<&str> = solution.items.iter().map(|i| i.name.as_str()).collect();
                format!(
                    "Done! The optimal value is {}, chosen items: {}.",
                    solution.max_value,
                    names.join(", ")
                )
            }
            _ => step.explanation(),
        }
    }

    /// Step under the cursor
    pub fn current(&self) -> Option<&KnapsackStep> {
        self.replay.current()
    }

    /// Cursor position
    pub fn cursor(&self) -> Option<usize> {
        self.replay.cursor()
    }

    /// All recorded steps
    pub fn steps(&self) -> &[KnapsackStep] {
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
    pub fn stats(&self) -> KnapsackStats {
        self.replay.stats()
    }

    /// Frame at the cursor
    pub fn frame(&self) -> Option<FrameOf<KnapsackTrace>> {
        self.replay.frame()
    }

    /// Register a frame callback
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&FrameOf<KnapsackTrace>) + 'static,
    {
        self.replay.subscribe(callback)
    }

    /// Drop a frame callback
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.replay.unsubscribe(id)
    }

    /// Start auto-run
    pub fn play(&mut self, now: Duration) -> bool {
        self.playback.play(now)
    }

    /// Stop auto-run
    pub fn pause(&mut self) -> bool {
        self.playback.pause()
    }

    /// Change auto-run speed
    pub fn set_speed(&mut self, multiplier: f64, now: Duration) -> Result<(), ReplayError> {
        self.playback.set_speed(multiplier, now)
    }

    /// Run due auto-run ticks
    pub fn tick(&mut self, now: Duration) -> usize {
        self.playback.poll(now, &mut self.replay)
    }

    /// Auto-run state
    pub fn playback(&self) -> &Playback {
        &self.playback
    }
}

impl Default for KnapsackEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl Advance for KnapsackEngine {
    fn advance(&mut self) -> bool {
        self.next()
    }

    fn is_at_end(&self) -> bool {
        self.replay.is_at_end()
    }
}
