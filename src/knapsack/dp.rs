//! Bottom-up table fill and backward-induction reconstruction

use std::fmt;

use crate::framework::Trace;

use super::config::{Item, KnapsackConfig};

/// `(items + 1) × (capacity + 1)` value table; row 0 and column 0 stay zero
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DpTable {
    rows: usize,
    cols: usize,
    cells: Vec<u64>,
}

impl DpTable {
    /// All-zero table
    pub fn new(items: usize, capacity: usize) -> Self {
        let rows = items + 1;
        let cols = capacity + 1;
        Self {
            rows,
            cols,
            cells: vec![0; rows * cols],
        }
    }

    /// Number of rows (`items + 1`)
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns (`capacity + 1`)
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Value at `(i, w)`; 0 outside the table
    #[inline]
    pub fn get(&self, i: usize, w: usize) -> u64 {
        if i < self.rows && w < self.cols {
            self.cells[i * self.cols + w]
        } else {
            0
        }
    }

    fn set(&mut self, i: usize, w: usize, value: u64) {
        self.cells[i * self.cols + w] = value;
    }

    /// One row as a slice
    pub fn row(&self, i: usize) -> &[u64] {
        let start = (i * self.cols).min(self.cells.len());
        let end = (start + self.cols).min(self.cells.len());
        &self.cells[start..end]
    }
}

/// Outcome of one cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decision {
    /// Item heavier than `w`, value copied from the row above
    TooHeavy,
    /// Taking the item is strictly better
    Include {
        /// `table[i-1][w-weight] + value`
        with: u64,
        /// `table[i-1][w]`
        without: u64,
    },
    /// Leaving the item out is at least as good
    Exclude {
        /// `table[i-1][w-weight] + value`
        with: u64,
        /// `table[i-1][w]`
        without: u64,
    },
}

impl Decision {
    /// Whether the item went in
    pub fn includes(&self) -> bool {
        matches!(self, Decision::Include { .. })
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Decision::TooHeavy => "too heavy",
            Decision::Include { .. } => "include",
            Decision::Exclude { .. } => "exclude",
        })
    }
}

/// One filled cell with the table as it stands afterwards
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnapsackStep {
    /// Row `i` (1-based item index)
    pub item_index: usize,
    /// Column `w`
    pub weight_index: usize,
    /// Item of row `i`
    pub item: Item,
    /// Choice made
    pub decision: Decision,
    /// `table[i][w]`
    pub value: u64,
    /// Table snapshot
    pub table: DpTable,
}

impl KnapsackStep {
    /// Human-readable description
    pub fn explanation(&self) -> String {
        let Self {
            item_index: i,
            weight_index: w,
            item,
            value,
            ..
        } = self;
        match self.decision {
            Decision::TooHeavy => format!(
                "Item {} ({}, weight {}, value {}) is heavier than capacity {}, skip it. Best value = {}.",
                i, item.name, item.weight, item.value, w, value
            ),
            Decision::Include { with, without } => format!(
                "Including item {} ({}) is better: {} + {} = {} > {} (exclude). Best value = {}.",
                i,
                item.name,
                with - item.value,
                item.value,
                with,
                without,
                value
            ),
            Decision::Exclude { with, without } => format!(
                "Excluding item {} ({}) is better: {} >= {} (include). Best value = {}.",
                i, item.name, without, with, value
            ),
        }
    }
}

/// Cell-local statistics: no rescan, the step already holds everything
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KnapsackStats {
    /// Active cell, `None` before the first step
    pub cell: Option<(usize, usize)>,
    /// Decision at the active cell
    pub decision: Option<Decision>,
    /// `table[i][w]` at the active cell
    pub best_value: u64,
}

/// Marker type plugging the knapsack DP into the replay framework
#[derive(Debug, Clone, Copy)]
pub struct KnapsackTrace;

impl Trace for KnapsackTrace {
    type Step = KnapsackStep;
    type Stats = KnapsackStats;

    fn aggregate(steps: &[KnapsackStep], cursor: Option<usize>) -> KnapsackStats {
        match cursor.and_then(|idx| steps.get(idx)) {
            Some(step) => KnapsackStats {
                cell: Some((step.item_index, step.weight_index)),
                decision: Some(step.decision),
                best_value: step.value,
            },
            None => KnapsackStats::default(),
        }
    }

    fn explain(step: &KnapsackStep) -> String {
        step.explanation()
    }
}

/// Optimal choice recovered from a finished table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnapsackSolution {
    /// `table[items][capacity]`
    pub max_value: u64,
    /// Chosen items in item order
    pub items: Vec<Item>,
    /// 1-based indices of the chosen items, ascending
    pub indices: Vec<usize>,
    /// Cells `(i, w)` where an item was taken, walking backwards
    pub path: Vec<(usize, usize)>,
    /// Sum of chosen weights
    pub total_weight: usize,
}

/// Fill the table row by row, one step per cell
pub fn fill_table(config: &KnapsackConfig) -> (Vec<KnapsackStep>, DpTable) {
    let _span = tracing::debug_span!(
        "knapsack_fill",
        capacity = config.capacity,
        items = config.items.len()
    )
    .entered();

    let mut table = DpTable::new(config.items.len(), config.capacity);
    let mut steps = Vec::with_capacity(config.items.len() * (config.capacity + 1));

    for (row, item) in config.items.iter().enumerate() {
        let i = row + 1;
        for w in 0..=config.capacity {
            let without = table.get(i - 1, w);
            let decision = if item.weight > w {
                Decision::TooHeavy
            } else {
                let with = table.get(i - 1, w - item.weight) + item.value;
                if with > without {
                    Decision::Include { with, without }
                } else {
                    Decision::Exclude { with, without }
                }
            };
            let value = match decision {
                Decision::Include { with, .. } => with,
                _ => without,
            };
            table.set(i, w, value);
            steps.push(KnapsackStep {
                item_index: i,
                weight_index: w,
                item: item.clone(),
                decision,
                value,
                table: table.clone(),
            });
        }
    }

    tracing::debug!(
        steps = steps.len(),
        max_value = table.get(config.items.len(), config.capacity),
        "knapsack table filled"
    );
    (steps, table)
}

/// Walk back from `(items, capacity)`: item `i` is taken iff its row changed the value
pub fn reconstruct(table: &DpTable, config: &KnapsackConfig) -> KnapsackSolution {
    let mut i = config.items.len();
    let mut w = config.capacity;
    let mut indices = Vec::new();
    let mut path = Vec::new();

    while i > 0 && w > 0 {
        if table.get(i, w) != table.get(i - 1, w) {
            let weight = config.items[i - 1].weight;
            indices.insert(0, i);
            path.push((i, w));
            w = w.saturating_sub(weight);
        }
        i -= 1;
    }

    let items: Vec<Item> = indices.iter().map(|&i| config.items[i - 1].clone()).collect();
    KnapsackSolution {
        max_value: table.get(config.items.len(), config.capacity),
        total_weight: items.iter().map(|item| item.weight).sum(),
        items,
        indices,
        path,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_recurrence() {
        let config = KnapsackConfig::default();
        let (steps, table) = fill_table(&config);
        assert_eq!(steps.len(), 4 * 11);
        for i in 1..table.rows() {
            let item = &config.items[i - 1];
            for w in 0..table.cols() {
                let above = table.get(i - 1, w);
                let expected = if item.weight > w {
                    above
                } else {
                    above.max(table.get(i - 1, w - item.weight) + item.value)
                };
                assert_eq!(table.get(i, w), expected, "cell ({}, {})", i, w);
            }
        }
        assert!(table.row(0).iter().all(|&v| v == 0));
        assert!((0..table.rows()).all(|i| table.get(i, 0) == 0));
    }

    #[test]
    fn test_ties_exclude() {
        let config = KnapsackConfig::new(2, vec![Item::new("a", 1, 5), Item::new("b", 1, 5)]);
        let (steps, _) = fill_table(&config);
        // row 2, w = 1: with = 0 + 5, without = 5
        let tie = steps
            .iter()
            .find(|s| s.item_index == 2 && s.weight_index == 1)
            .unwrap();
        assert_eq!(tie.decision, Decision::Exclude { with: 5, without: 5 });
    }

    #[test]
    fn test_snapshots_are_independent() {
        let (steps, _) = fill_table(&KnapsackConfig::default());
        assert_eq!(steps[0].table.get(1, 2), 0);
        assert_eq!(steps[2].table.get(1, 2), 6);
    }

    #[test]
    fn test_reconstruct() {
        let config = KnapsackConfig::default();
        let (_, table) = fill_table(&config);
        let solution = reconstruct(&table, &config);
        assert_eq!(solution.max_value, 29);
        assert_eq!(solution.indices, vec![1, 2, 4]);
        assert_eq!(solution.total_weight, 10);
        let value: u64 = solution.items.iter().map(|i| i.value).sum();
        assert_eq!(value, solution.max_value);
        assert_eq!(solution.path, vec![(4, 10), (2, 5), (1, 2)]);
    }
}
