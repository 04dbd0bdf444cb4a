//! # Step-Log Trace Replay
//!
//! Algorithm visualizations built on one contract: an engine runs its
//! algorithm once, records every step as a self-contained snapshot, and a
//! cursor replays the recording forwards, backwards or at random.
//!
//! ## Engines
//!
//! 1. **Backtracking** (`queens`): N-Queens search with manual edits spliced
//!    into the log after the cursor
//! 2. **Divide and conquer** (`karatsuba`): decimal-string Karatsuba
//!    multiplication over a persistent recursion tree
//! 3. **Dynamic programming** (`knapsack`): 0/1 knapsack table fill with
//!    backward-induction reconstruction
//! 4. **Sorting** (`sorting`): bubble, quick and merge sort traces
//! 5. **Graphs** (`graph`): Dijkstra shortest paths, Prim and Kruskal
//!    spanning trees
//!
//! Every engine publishes a [`framework::Frame`] (step, explanation and
//! derived statistics) on each cursor move, and can be auto-played with a
//! [`playback::Playback`] timer.
//!
//! ## Usage Example
//!
//! ```ignore
//! use trace_replay::karatsuba::{KaratsubaConfig, KaratsubaEngine};
//!
//! let mut engine = KaratsubaEngine::new();
//! engine.init(KaratsubaConfig::new("1234", "5678", 2))?;
//! while engine.step() {}
//! assert_eq!(engine.product(), Some("7006652"));
//! ```

#![warn(missing_docs, missing_debug_implementations)]
#![allow(clippy::new_without_default)]

// Shared replay machinery
pub mod ledger;     // Step log and cursor
pub mod framework;  // Trace trait, publication and stats helpers
pub mod playback;   // Auto-play timer

// Engines and their building blocks
pub mod bigint;     // Decimal-string arithmetic
pub mod tree;       // Persistent recursion tree
pub mod queens;     // Backtracking engine
pub mod karatsuba;  // Divide-and-conquer engine
pub mod knapsack;   // Dynamic-programming engine
pub mod sorting;    // Sorting traces
pub mod graph;      // Shortest-path and spanning-tree traces
pub mod avl;        // Balanced search tree with an operation log

// Re-exports for convenience
pub use framework::{Frame, FrameOf, Replay, SubscriptionId, Trace};
pub use ledger::{CursorStart, StepLog};
pub use playback::{Advance, Clock, ManualClock, Playback, SystemClock};
pub use queens::QueensEngine;
pub use karatsuba::KaratsubaEngine;
pub use knapsack::KnapsackEngine;
pub use sorting::SortingEngine;
pub use graph::GraphEngine;
pub use avl::AvlTree;

use thiserror::Error;

/// Errors raised by configuration, manual edits and trace construction
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReplayError {
    /// Board size outside `1..=max`
    #[error("Invalid board size {size} (expected 1 to {max})")]
    InvalidBoardSize {
        /// Requested size
        size: usize,
        /// Largest accepted size
        max: usize,
    },

    /// Cell outside the board
    #[error("Invalid position ({row}, {col}) on a {size}x{size} board")]
    InvalidPosition {
        /// Row
        row: usize,
        /// Column
        col: usize,
        /// Board size
        size: usize,
    },

    /// Row outside the board
    #[error("Invalid row {row} on a {size}x{size} board")]
    InvalidRow {
        /// Row
        row: usize,
        /// Board size
        size: usize,
    },

    /// Operand is not a non-empty decimal string
    #[error("Invalid operand '{0}': expected decimal digits")]
    InvalidOperand(String),

    /// Operand longer than the supported maximum
    #[error("Operand has {digits} digits, at most {max} supported")]
    OperandTooLong {
        /// Digits supplied
        digits: usize,
        /// Digit limit
        max: usize,
    },

    /// Karatsuba threshold below 1
    #[error("Invalid threshold {0}: must be at least 1")]
    InvalidThreshold(usize),

    /// Knapsack capacity outside `1..=max`
    #[error("Invalid capacity {capacity} (expected 1 to {max})")]
    InvalidCapacity {
        /// Requested capacity
        capacity: usize,
        /// Largest accepted capacity
        max: usize,
    },

    /// Knapsack without items
    #[error("Item list is empty")]
    EmptyItems,

    /// More items than supported
    #[error("{count} items given, at most {max} supported")]
    TooManyItems {
        /// Items supplied
        count: usize,
        /// Item limit
        max: usize,
    },

    /// Malformed item
    #[error("Invalid item {index}: {reason}")]
    InvalidItem {
        /// 0-based position in the item list
        index: usize,
        /// What is wrong with it
        reason: String,
    },

    /// Graph node id not in the node list
    #[error("Unknown node '{0}'")]
    UnknownNode(String),

    /// Playback multiplier not finite and positive
    #[error("Invalid playback speed {0}")]
    InvalidSpeed(f64),

    /// Any other configuration problem
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// JSON import rejected
    #[error("Import failed: {0}")]
    ImportFailed(String),

    /// Internal structure broken while building a trace
    #[error("Invariant violated: {0}")]
    InvariantViolated(String),
}
