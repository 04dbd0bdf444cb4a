//! Recursion tree node
//!
//! One node per sub-multiplication:
//!   Leaf: base case, solved directly
//!   Inner: exactly three children (z2, z1, z0) created together at divide time

use std::fmt;
use std::sync::Arc;

/// Node identifier, assigned monotonically from 1 at the root
pub type NodeId = u32;

/// The pair of operands a node multiplies
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Problem {
    /// Left operand (decimal)
    pub a: String,

    /// Right operand (decimal)
    pub b: String,
}

impl Problem {
    /// Create a problem from two decimal strings
    pub fn new(a: impl Into<String>, b: impl Into<String>) -> Self {
        Self {
            a: a.into(),
            b: b.into(),
        }
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} × {}", self.a, self.b)
    }
}

/// Recursion tree node
///
/// Children are shared between tree versions through [`Arc`]; a node is never
/// mutated once it is reachable from a published tree.
#[derive(Debug, Clone, PartialEq)]
pub struct RecursionNode {
    id: NodeId,
    parent_id: Option<NodeId>,
    depth: usize,
    problem: Problem,
    result: Option<String>,
    completed: bool,
    children: Vec<Arc<RecursionNode>>,
}

impl RecursionNode {
    /// Root node (depth 0, no parent)
    pub fn root(id: NodeId, problem: Problem) -> Self {
        Self {
            id,
            parent_id: None,
            depth: 0,
            problem,
            result: None,
            completed: false,
            children: Vec::new(),
        }
    }

    /// Fresh child of `parent`
    pub fn child_of(parent: &RecursionNode, id: NodeId, problem: Problem) -> Self {
        Self {
            id,
            parent_id: Some(parent.id),
            depth: parent.depth + 1,
            problem,
            result: None,
            completed: false,
            children: Vec::new(),
        }
    }

    /// Node id
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Parent id (`None` at the root)
    pub fn parent_id(&self) -> Option<NodeId> {
        self.parent_id
    }

    /// Distance from the root
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Operands
    pub fn problem(&self) -> &Problem {
        &self.problem
    }

    /// Product, once known
    pub fn result(&self) -> Option<&str> {
        self.result.as_deref()
    }

    /// Whether the node's product is final
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Child nodes (empty or exactly three)
    pub fn children(&self) -> impl ExactSizeIterator<Item = &RecursionNode> {
        self.children.iter().map(|child| child.as_ref())
    }

    /// Number of children
    #[inline]
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Whether the node has not been divided
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub(crate) fn child_arcs(&self) -> &[Arc<RecursionNode>] {
        &self.children
    }

    pub(crate) fn child_arcs_mut(&mut self) -> &mut Vec<Arc<RecursionNode>> {
        &mut self.children
    }

    /// Record the product and mark the node completed
    pub(crate) fn complete(&mut self, result: String) {
        self.result = Some(result);
        self.completed = true;
    }

    /// Attach the three sub-problems
    pub(crate) fn divide(&mut self, children: [RecursionNode; 3]) {
        self.children = children.into_iter().map(Arc::new).collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_depth_and_parent() {
        let root = RecursionNode::root(1, Problem::new("12", "34"));
        let child = RecursionNode::child_of(&root, 2, Problem::new("1", "3"));
        assert_eq!(child.depth(), 1);
        assert_eq!(child.parent_id(), Some(1));
        assert!(child.is_leaf());
        assert!(!child.is_completed());
    }

    #[test]
    fn test_complete_sets_result() {
        let mut node = RecursionNode::root(1, Problem::new("6", "7"));
        node.complete("42".to_string());
        assert!(node.is_completed());
        assert_eq!(node.result(), Some("42"));
    }
}
