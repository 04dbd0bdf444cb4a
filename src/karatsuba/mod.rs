//! Divide-and-conquer engine: Karatsuba multiplication
//!
//! Recorded events per node:
//! - DIVIDE: split into z2 / z1 / z0 children (all three created together)
//! - CONQUER: entry into each child, in the order z2, z0, z1
//! - BASE_CASE: long multiplication once an operand is short enough
//! - COMBINE: `z2·10^(2m) + (z1 − z2 − z0)·10^m + z0`
//!
//! Every step carries its own version of the recursion tree, so seeking
//! backwards always shows the tree exactly as it was at that point.

mod build;
mod config;
mod step;

pub use build::build_trace;
pub use config::{standard_test_cases, KaratsubaConfig, MAX_OPERAND_DIGITS};
pub use step::{
    Event, KaratsubaStats, KaratsubaStep, KaratsubaTrace, Split, StepKind, SubProblem,
    SubResults,
};

use std::time::Duration;

use crate::framework::{FrameOf, Replay, SubscriptionId};
use crate::ledger::CursorStart;
use crate::playback::{Advance, Playback};
use crate::ReplayError;

/// Auto-play interval at 1x
pub const BASE_INTERVAL: Duration = Duration::from_millis(800);

/// Karatsuba replay engine
#[derive(Debug)]
pub struct KaratsubaEngine {
    config: Option<KaratsubaConfig>,
    replay: Replay<KaratsubaTrace>,
    playback: Playback,
}

impl KaratsubaEngine {
    /// Engine with an empty log
    pub fn new() -> Self {
        Self {
            config: None,
            replay: Replay::new(),
            playback: Playback::new(BASE_INTERVAL),
        }
    }

    /// Validate `config`, build the full trace and show step 0
    ///
    /// On error the previous log, cursor and config are left untouched.
    pub fn init(&mut self, config: KaratsubaConfig) -> Result<(), ReplayError> {
        if let Err(err) = config.validate() {
            tracing::warn!(%err, "rejected karatsuba config");
            return Err(err);
        }
        let steps = build_trace(&config)?;
        self.playback.pause();
        self.config = Some(config);
        self.replay.load(steps, CursorStart::First);
        Ok(())
    }

    /// `init` from a JSON config
    pub fn import_json(&mut self, text: &str) -> Result<(), ReplayError> {
        let config = KaratsubaConfig::from_json(text)?;
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
    pub fn config(&self) -> Option<&KaratsubaConfig> {
        self.config.as_ref()
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
    pub fn current(&self) -> Option<&KaratsubaStep> {
        self.replay.current()
    }

    /// Cursor position
    pub fn cursor(&self) -> Option<usize> {
        self.replay.cursor()
    }

    /// All recorded steps
    pub fn steps(&self) -> &[KaratsubaStep] {
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
    pub fn stats(&self) -> KaratsubaStats {
        self.replay.stats()
    }

    /// Frame at the cursor
    pub fn frame(&self) -> Option<FrameOf<KaratsubaTrace>> {
        self.replay.frame()
    }

    /// Final product of the loaded trace
    pub fn product(&self) -> Option<&str> {
        self.steps().iter().rev().find_map(|step| match &step.event {
            Event::Result { product, .. } => Some(product.as_str()),
            _ => None,
        })
    }

    /// Register a frame callback
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&FrameOf<KaratsubaTrace>) + 'static,
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

impl Default for KaratsubaEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl Advance for KaratsubaEngine {
    fn advance(&mut self) -> bool {
        self.step()
    }

    fn is_at_end(&self) -> bool {
        self.replay.is_at_end()
    }
}
