//! Generic trace-replay framework built on top of the step ledger.
//!
//! Every engine follows the same shape: run the algorithm once, record each
//! state transition as an immutable step, then scrub over the recorded steps.
//! An engine plugs in by implementing [`Trace`] for a marker type; the
//! [`Replay`] driver owns the ledger, publishes [`Frame`]s to subscribers and
//! recomputes statistics on every cursor move.

mod observer;
mod replay;
mod stats;

pub use observer::{Observers, SubscriptionId};
pub use replay::Replay;
pub use stats::{count_visited, visited};

use std::fmt;

/// Step and statistics shapes of one algorithm trace.
pub trait Trace {
    /// Immutable snapshot recorded for one state transition.
    type Step: Clone + fmt::Debug;

    /// Summary derived from the log up to the cursor.
    type Stats: Clone + fmt::Debug + Default + PartialEq;

    /// Recompute statistics from scratch for `steps[0..=cursor]`.
    ///
    /// Must be a pure function of its inputs; no counters are carried between
    /// calls, so backward moves and spliced steps can never drift.
    fn aggregate(steps: &[Self::Step], cursor: Option<usize>) -> Self::Stats;

    /// Human-readable description of a step.
    fn explain(step: &Self::Step) -> String;
}

/// What subscribers receive on every successful navigation.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame<S, St> {
    /// Cursor position of `step`.
    pub index: usize,
    /// Log length at publication time.
    pub total: usize,
    /// The step under the cursor.
    pub step: S,
    /// Description of the step.
    pub explanation: String,
    /// Statistics recomputed for this cursor.
    pub stats: St,
}

/// Frame type published by a [`Replay`] over `T`.
pub type FrameOf<T> = Frame<<T as Trace>::Step, <T as Trace>::Stats>;
