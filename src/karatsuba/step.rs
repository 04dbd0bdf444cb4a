//! Karatsuba step payloads and statistics

use std::fmt;

use crate::framework::{visited, Trace};
use crate::tree::{NodeId, Problem, RecursionTree};

/// Step discriminator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepKind {
    /// Starting state
    Init,
    /// Node split into three sub-problems
    Divide,
    /// About to recurse into a child
    Conquer,
    /// Sub-results merged into a node product
    Combine,
    /// Node solved by long multiplication
    BaseCase,
    /// Final product of the root
    Result,
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StepKind::Init => "INIT",
            StepKind::Divide => "DIVIDE",
            StepKind::Conquer => "CONQUER",
            StepKind::Combine => "COMBINE",
            StepKind::BaseCase => "BASE_CASE",
            StepKind::Result => "RESULT",
        };
        f.write_str(name)
    }
}

/// Which of the three sub-products a child computes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubProblem {
    /// `a1 × b1`
    Z2,
    /// `(a1 + a0) × (b1 + b0)`
    Z1,
    /// `a0 × b0`
    Z0,
}

impl fmt::Display for SubProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SubProblem::Z2 => "z2",
            SubProblem::Z1 => "z1",
            SubProblem::Z0 => "z0",
        })
    }
}

/// High/low halves of both operands around split point `m`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    /// High part of `a`
    pub a1: String,
    /// Low part of `a`
    pub a0: String,
    /// High part of `b`
    pub b1: String,
    /// Low part of `b`
    pub b0: String,
    /// Number of low digits
    pub m: usize,
}

/// The three sub-products a combine merges
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubResults {
    /// `a1 × b1`
    pub z2: String,
    /// Middle term after subtracting `z2` and `z0`
    pub z1: String,
    /// `a0 × b0`
    pub z0: String,
}

/// Engine-specific payload of a step
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Starting state
    Init {
        /// Operands as configured
        problem: Problem,
    },
    /// Split of the current node
    Divide {
        /// Normalized operands of the node
        problem: Problem,
        /// Halves and split point
        split: Split,
    },
    /// Entry into one child
    Conquer {
        /// Operands of the child
        problem: Problem,
        /// Which sub-product the child is
        part: SubProblem,
    },
    /// Long multiplication at a leaf
    BaseCase {
        /// Operands of the leaf
        problem: Problem,
        /// Product
        result: String,
        /// Threshold that stopped the recursion
        threshold: usize,
    },
    /// Merge of three sub-products
    Combine {
        /// Sub-products (z1 already adjusted)
        parts: SubResults,
        /// Split point `m`
        shift: usize,
        /// Node product
        result: String,
    },
    /// Root product
    Result {
        /// Operands as configured
        problem: Problem,
        /// Product
        product: String,
    },
}

/// One recorded transition with the tree version it produced
#[derive(Debug, Clone, PartialEq)]
pub struct KaratsubaStep {
    /// Node the step is about
    pub node: NodeId,
    /// Tree snapshot after the step
    pub tree: RecursionTree,
    /// Payload
    pub event: Event,
}

impl KaratsubaStep {
    /// Step discriminator
    pub fn kind(&self) -> StepKind {
        match self.event {
            Event::Init { .. } => StepKind::Init,
            Event::Divide { .. } => StepKind::Divide,
            Event::Conquer { .. } => StepKind::Conquer,
            Event::BaseCase { .. } => StepKind::BaseCase,
            Event::Combine { .. } => StepKind::Combine,
            Event::Result { .. } => StepKind::Result,
        }
    }

    /// Depth of `node` in this step's tree
    pub fn depth(&self) -> usize {
        self.tree.depth_of(self.node).unwrap_or(0)
    }

    /// Product carried by the step, if any
    pub fn result(&self) -> Option<&str> {
        match &self.event {
            Event::BaseCase { result, .. } | Event::Combine { result, .. } => Some(result),
            Event::Result { product, .. } => Some(product),
            _ => None,
        }
    }

    /// Human-readable description
    pub fn explanation(&self) -> String {
        match &self.event {
            Event::Init { problem } => format!("Initialize: compute {}", problem),
            Event::Divide { problem, split } => format!(
                "Divide: {} = {} × 10^{m} + {}, {} = {} × 10^{m} + {}; \
                 sub-problems z2 = {} × {}, z1 = ({} + {}) × ({} + {}), z0 = {} × {}",
                problem.a,
                split.a1,
                split.a0,
                problem.b,
                split.b1,
                split.b0,
                split.a1,
                split.b1,
                split.a1,
                split.a0,
                split.b1,
                split.b0,
                split.a0,
                split.b0,
                m = split.m,
            ),
            Event::Conquer { problem, part } => format!("Solve {} = {}", part, problem),
            Event::BaseCase {
                problem,
                result,
                threshold,
            } => format!(
                "Base case: {} = {} (an operand has at most {} digits, multiply directly)",
                problem, result, threshold
            ),
            Event::Combine {
                parts,
                shift,
                result,
            } => format!(
                "Combine: z2 × 10^{} + z1 × 10^{} + z0 = {} × 10^{} + {} × 10^{} + {} = {}",
                2 * shift,
                shift,
                parts.z2,
                2 * shift,
                parts.z1,
                shift,
                parts.z0,
                result
            ),
            Event::Result { problem, product } => format!("Result: {} = {}", problem, product),
        }
    }
}

/// Counters derived from `steps[0..=cursor]`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KaratsubaStats {
    /// Depth of the current step's node
    pub depth: usize,
    /// Deepest node visited so far
    pub max_depth: usize,
    /// DIVIDE steps visited
    pub divide_count: usize,
    /// COMBINE steps visited
    pub combine_count: usize,
    /// BASE_CASE steps visited
    pub base_case_count: usize,
    /// Cursor position
    pub step_index: usize,
    /// Index of the last step
    pub total_steps: usize,
}

/// Marker type plugging Karatsuba into the replay framework
#[derive(Debug, Clone, Copy)]
pub struct KaratsubaTrace;

impl Trace for KaratsubaTrace {
    type Step = KaratsubaStep;
    type Stats = KaratsubaStats;

    fn aggregate(steps: &[KaratsubaStep], cursor: Option<usize>) -> KaratsubaStats {
        let mut stats = KaratsubaStats {
            step_index: cursor.unwrap_or(0),
            total_steps: steps.len().saturating_sub(1),
            ..KaratsubaStats::default()
        };

        for step in visited(steps, cursor) {
            match step.kind() {
                StepKind::Divide => stats.divide_count += 1,
                StepKind::Combine => stats.combine_count += 1,
                StepKind::BaseCase => stats.base_case_count += 1,
                _ => {}
            }
            stats.depth = step.depth();
            stats.max_depth = stats.max_depth.max(stats.depth);
        }
        stats
    }

    fn explain(step: &KaratsubaStep) -> String {
        step.explanation()
    }
}
