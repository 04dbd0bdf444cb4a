//! Self-balancing binary search tree with an operation log
//!
//! Every mutation or search returns the [`TreeOperation`]s it performed so a
//! renderer can animate them:
//! - `insert`/`delete` log the structural change plus any rotation
//! - `dfs`/`bfs` log one highlight per visited node
//!
//! Duplicate inserts are ignored.

mod node;

use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};

use node::{height, Link};

/// What a logged operation did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationKind {
    /// Leaf added
    Insert,
    /// Node removed
    Delete,
    /// Single left rotation at the unbalanced node
    RotateLeft,
    /// Single right rotation at the unbalanced node
    RotateRight,
    /// Left rotation of the child, then right rotation of the node
    #[serde(rename = "ROTATE_LR")]
    RotateLeftRight,
    /// Right rotation of the child, then left rotation of the node
    #[serde(rename = "ROTATE_RL")]
    RotateRightLeft,
    /// Node visited by a search
    Highlight,
}

impl OperationKind {
    /// Any of the four rotations
    pub fn is_rotation(self) -> bool {
        matches!(
            self,
            OperationKind::RotateLeft
                | OperationKind::RotateRight
                | OperationKind::RotateLeftRight
                | OperationKind::RotateRightLeft
        )
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OperationKind::Insert => "INSERT",
            OperationKind::Delete => "DELETE",
            OperationKind::RotateLeft => "ROTATE_LEFT",
            OperationKind::RotateRight => "ROTATE_RIGHT",
            OperationKind::RotateLeftRight => "ROTATE_LR",
            OperationKind::RotateRightLeft => "ROTATE_RL",
            OperationKind::Highlight => "HIGHLIGHT",
        })
    }
}

/// One logged operation; `nodes[0]` is the node it centres on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeOperation {
    /// Kind
    #[serde(rename = "type")]
    pub kind: OperationKind,
    /// Values of the nodes involved
    pub nodes: Vec<i64>,
}

impl TreeOperation {
    /// Create an operation
    pub fn new(kind: OperationKind, nodes: Vec<i64>) -> Self {
        Self { kind, nodes }
    }
}

/// Outcome of the last `dfs`/`bfs`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    /// Value searched for
    pub target: i64,
    /// Whether it was reached
    pub found: bool,
    /// Values in visit order
    pub visited: Vec<i64>,
}

/// Counters shown beside the tree
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeMetrics {
    /// Nodes in the tree
    pub node_count: usize,
    /// Height; 0 when empty, 1 for a single node
    pub height: usize,
    /// Successful inserts so far
    pub insert_count: usize,
    /// Rotations so far
    pub rotate_count: usize,
    /// Nodes visited by the last search
    pub visited_count: usize,
    /// Last search
    pub last_search: Option<SearchResult>,
}

/// AVL tree over `i64`
#[derive(Debug, Clone, Default)]
pub struct AvlTree {
    root: Link,
    operations: Vec<TreeOperation>,
    insert_count: usize,
    rotate_count: usize,
    last_search: Option<SearchResult>,
}

impl AvlTree {
    /// Empty tree
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert each value in order
    pub fn from_values<I: IntoIterator<Item = i64>>(values: I) -> Self {
        let mut tree = Self::new();
        for value in values {
            tree.insert(value);
        }
        tree
    }

    /// Insert `value`; `false` for a duplicate
    pub fn insert(&mut self, value: i64) -> bool {
        let mut ops = Vec::new();
        let mut inserted = false;
        self.root = Some(node::insert(self.root.take(), value, &mut ops, &mut inserted));
        if inserted {
            self.insert_count += 1;
        }
        self.record(ops);
        tracing::trace!(value, inserted, "avl insert");
        inserted
    }

    /// Remove `value`; `false` if absent
    pub fn delete(&mut self, value: i64) -> bool {
        let mut ops = Vec::new();
        let mut removed = false;
        self.root = node::remove(self.root.take(), value, &mut ops, &mut removed);
        self.record(ops);
        tracing::trace!(value, removed, "avl delete");
        removed
    }

    fn record(&mut self, ops: Vec<TreeOperation>) {
        self.rotate_count += ops.iter().filter(|op| op.kind.is_rotation()).count();
        self.operations = ops;
    }

    /// Binary-search lookup; logs nothing
    pub fn contains(&self, value: i64) -> bool {
        let mut link = &self.root;
        while let Some(node) = link {
            if value == node.value {
                return true;
            }
            link = if value < node.value { &node.left } else { &node.right };
        }
        false
    }

    /// Pre-order search for `target`, highlighting each visited node
    pub fn dfs(&mut self, target: i64) -> bool {
        let mut visited = Vec::new();
        let mut stack: Vec<&node::Node> = self.root.as_deref().into_iter().collect();
        while let Some(node) = stack.pop() {
            visited.push(node.value);
            if node.value == target {
                break;
            }
            stack.extend(node.right.as_deref());
            stack.extend(node.left.as_deref());
        }
        self.finish_search(target, visited)
    }

    /// Level-order search for `target`, highlighting each visited node
    pub fn bfs(&mut self, target: i64) -> bool {
        let mut visited = Vec::new();
        let mut queue: VecDeque<&node::Node> = self.root.as_deref().into_iter().collect();
        while let Some(node) = queue.pop_front() {
            visited.push(node.value);
            if node.value == target {
                break;
            }
            queue.extend(node.left.as_deref());
            queue.extend(node.right.as_deref());
        }
        self.finish_search(target, visited)
    }

    fn finish_search(&mut self, target: i64, visited: Vec<i64>) -> bool {
        let found = visited.last() == Some(&target);
        self.operations = visited
            .iter()
            .map(|&value| TreeOperation::new(OperationKind::Highlight, vec![value]))
            .collect();
        self.last_search = Some(SearchResult {
            target,
            found,
            visited,
        });
        found
    }

    /// In-order values (ascending)
    pub fn values(&self) -> Vec<i64> {
        fn walk(link: &Link, out: &mut Vec<i64>) {
            if let Some(node) = link {
                walk(&node.left, out);
                out.push(node.value);
                walk(&node.right, out);
            }
        }
        let mut out = Vec::new();
        walk(&self.root, &mut out);
        out
    }

    /// Value at the root
    pub fn root_value(&self) -> Option<i64> {
        self.root.as_ref().map(|node| node.value)
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        fn count(link: &Link) -> usize {
            link.as_ref()
                .map_or(0, |node| 1 + count(&node.left) + count(&node.right))
        }
        count(&self.root)
    }

    /// Whether the tree has no nodes
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Tree height
    pub fn height(&self) -> usize {
        height(&self.root)
    }

    /// Operations of the last insert, delete or search
    pub fn operations(&self) -> &[TreeOperation] {
        &self.operations
    }

    /// Current counters
    pub fn metrics(&self) -> TreeMetrics {
        TreeMetrics {
            node_count: self.len(),
            height: self.height(),
            insert_count: self.insert_count,
            rotate_count: self.rotate_count,
            visited_count: self.last_search.as_ref().map_or(0, |s| s.visited.len()),
            last_search: self.last_search.clone(),
        }
    }

    /// Whether every node is ordered and balanced with a correct cached height
    pub fn is_balanced(&self) -> bool {
        fn check(link: &Link, lo: Option<i64>, hi: Option<i64>) -> Option<usize> {
            let Some(node) = link else {
                return Some(0);
            };
            if lo.is_some_and(|lo| node.value <= lo) || hi.is_some_and(|hi| node.value >= hi) {
                return None;
            }
            let left = check(&node.left, lo, Some(node.value))?;
            let right = check(&node.right, Some(node.value), hi)?;
            let h = 1 + left.max(right);
            (left.abs_diff(right) <= 1 && node.height == h).then_some(h)
        }
        check(&self.root, None, None).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(tree: &AvlTree) -> Vec<OperationKind> {
        tree.operations().iter().map(|op| op.kind).collect()
    }

    #[test]
    fn test_single_rotations() {
        let mut tree = AvlTree::from_values([1, 2]);
        tree.insert(3);
        assert_eq!(kinds(&tree), vec![OperationKind::Insert, OperationKind::RotateLeft]);
        assert_eq!(tree.operations()[1].nodes, vec![1]);
        assert_eq!(tree.root_value(), Some(2));

        let mut tree = AvlTree::from_values([3, 2]);
        tree.insert(1);
        assert_eq!(kinds(&tree), vec![OperationKind::Insert, OperationKind::RotateRight]);
        assert_eq!(tree.root_value(), Some(2));
    }

    #[test]
    fn test_double_rotations() {
        let mut tree = AvlTree::from_values([3, 1]);
        tree.insert(2);
        assert_eq!(tree.operations()[1], TreeOperation::new(OperationKind::RotateLeftRight, vec![3, 1]));
        assert_eq!(tree.root_value(), Some(2));

        let mut tree = AvlTree::from_values([1, 3]);
        tree.insert(2);
        assert_eq!(tree.operations()[1].kind, OperationKind::RotateRightLeft);
        assert_eq!(tree.root_value(), Some(2));
        assert!(tree.is_balanced());
    }

    #[test]
    fn test_duplicates_ignored() {
        let mut tree = AvlTree::from_values([5, 3, 8]);
        assert!(!tree.insert(3));
        assert!(tree.operations().is_empty());
        assert_eq!(tree.metrics().insert_count, 3);
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn test_delete_two_children_uses_successor() {
        let mut tree = AvlTree::from_values([4, 2, 6, 1, 3, 5, 7]);
        assert!(tree.delete(4));
        assert_eq!(tree.root_value(), Some(5));
        assert_eq!(tree.values(), vec![1, 2, 3, 5, 6, 7]);
        assert!(tree.is_balanced());
        assert!(!tree.delete(42));
        assert!(tree.operations().is_empty());
    }

    #[test]
    fn test_delete_rebalances() {
        let mut tree = AvlTree::from_values([2, 1, 3, 4]);
        tree.delete(1);
        assert!(kinds(&tree).contains(&OperationKind::RotateLeft));
        assert!(tree.is_balanced());
        assert_eq!(tree.height(), 2);
    }

    #[test]
    fn test_sequential_inserts_stay_logarithmic() {
        let tree = AvlTree::from_values(1..=127);
        assert!(tree.is_balanced());
        assert_eq!(tree.height(), 7);
        assert_eq!(tree.values(), (1..=127).collect::<Vec<_>>());
        assert!(tree.metrics().rotate_count > 0);
    }

    #[test]
    fn test_searches_highlight_visit_order() {
        let mut tree = AvlTree::from_values([4, 2, 6, 1, 3, 5, 7]);
        assert!(tree.dfs(3));
        assert_eq!(tree.metrics().last_search.unwrap().visited, vec![4, 2, 1, 3]);
        assert!(tree.operations().iter().all(|op| op.kind == OperationKind::Highlight));

        assert!(tree.bfs(5));
        let metrics = tree.metrics();
        assert_eq!(metrics.visited_count, 6);
        assert_eq!(metrics.last_search.unwrap().visited, vec![4, 2, 6, 1, 3, 5]);

        assert!(!tree.bfs(9));
        assert_eq!(tree.metrics().visited_count, 7);
        assert!(tree.contains(7));
        assert!(!tree.contains(9));
    }

    #[test]
    fn test_operation_kind_wire_names() {
        let json = serde_json::to_string(&TreeOperation::new(OperationKind::RotateLeftRight, vec![3, 1])).unwrap();
        assert_eq!(json, r#"{"type":"ROTATE_LR","nodes":[3,1]}"#);
        assert_eq!(OperationKind::RotateLeft.to_string(), "ROTATE_LEFT");
    }
}
