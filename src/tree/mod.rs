//! Persistent recursion tree
//!
//! Every version of the tree is an independent, immutable value:
//! - `patch` copies the path from the root to the target node
//! - Subtrees off that path are shared (`Arc`), never mutated
//! - Older versions keep their original `result`/`completed` values
//!
//! Node lookup is by id, so a patch never needs parent pointers.

mod node;
mod traversal;

pub use node::{NodeId, Problem, RecursionNode};
pub use traversal::PreOrder;

use crate::ReplayError;
use std::collections::HashSet;
use std::sync::Arc;

/// One immutable version of a recursion tree
#[derive(Debug, Clone, PartialEq)]
pub struct RecursionTree {
    root: Arc<RecursionNode>,
}

impl RecursionTree {
    /// Single-node tree
    pub fn new(root_id: NodeId, problem: Problem) -> Self {
        Self {
            root: Arc::new(RecursionNode::root(root_id, problem)),
        }
    }

    /// Root node
    pub fn root(&self) -> &RecursionNode {
        &self.root
    }

    /// Find a node by id
    pub fn find(&self, id: NodeId) -> Option<&RecursionNode> {
        self.iter().find(|node| node.id() == id)
    }

    /// Depth of node `id`, if present
    pub fn depth_of(&self, id: NodeId) -> Option<usize> {
        self.find(id).map(RecursionNode::depth)
    }

    /// Total number of nodes
    pub fn node_count(&self) -> usize {
        self.iter().count()
    }

    /// Deepest node depth
    pub fn max_depth(&self) -> usize {
        self.iter().map(RecursionNode::depth).max().unwrap_or(0)
    }

    /// Pre-order iteration
    pub fn iter(&self) -> PreOrder<'_> {
        PreOrder::new(&self.root)
    }

    /// New version with `f` applied to node `id`
    ///
    /// Only the nodes on the root-to-target path are copied. Returns `None`
    /// when no node has that id; `self` is never modified.
    pub fn patch<F>(&self, id: NodeId, f: F) -> Option<RecursionTree>
    where
        F: FnOnce(&mut RecursionNode),
    {
        patch_node(&self.root, id, f)
            .ok()
            .map(|root| RecursionTree { root })
    }

    /// Like [`patch`](Self::patch) but a missing id is an invariant violation
    pub fn try_patch<F>(&self, id: NodeId, f: F) -> Result<RecursionTree, ReplayError>
    where
        F: FnOnce(&mut RecursionNode),
    {
        self.patch(id, f).ok_or_else(|| {
            ReplayError::InvariantViolated(format!("node {} not found in recursion tree", id))
        })
    }

    /// Whether both versions hold the very same allocation for node `id`
    pub fn shares_node(&self, other: &RecursionTree, id: NodeId) -> bool {
        match (find_arc(&self.root, id), find_arc(&other.root, id)) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Check structural invariants
    ///
    /// 0 or 3 children per node, `completed` implies a result, child depth is
    /// parent depth + 1, parent ids match, ids are unique.
    pub fn validate(&self) -> Result<(), ReplayError> {
        if self.root.parent_id().is_some() || self.root.depth() != 0 {
            return Err(ReplayError::InvariantViolated(
                "root must have depth 0 and no parent".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for node in self.iter() {
            if !seen.insert(node.id()) {
                return Err(ReplayError::InvariantViolated(format!(
                    "duplicate node id {}",
                    node.id()
                )));
            }
            if !matches!(node.child_count(), 0 | 3) {
                return Err(ReplayError::InvariantViolated(format!(
                    "node {} has {} children",
                    node.id(),
                    node.child_count()
                )));
            }
            if node.is_completed() && node.result().is_none() {
                return Err(ReplayError::InvariantViolated(format!(
                    "node {} completed without a result",
                    node.id()
                )));
            }
            for child in node.children() {
                if child.parent_id() != Some(node.id()) || child.depth() != node.depth() + 1 {
                    return Err(ReplayError::InvariantViolated(format!(
                        "node {} is not a well-formed child of {}",
                        child.id(),
                        node.id()
                    )));
                }
            }
        }
        Ok(())
    }
}

fn find_arc(node: &Arc<RecursionNode>, id: NodeId) -> Option<&Arc<RecursionNode>> {
    if node.id() == id {
        return Some(node);
    }
    node.child_arcs().iter().find_map(|child| find_arc(child, id))
}

// Hands `f` back on a miss so the caller can try the next sibling.
fn patch_node<F>(node: &Arc<RecursionNode>, id: NodeId, f: F) -> Result<Arc<RecursionNode>, F>
where
    F: FnOnce(&mut RecursionNode),
{
    if node.id() == id {
        let mut copy = RecursionNode::clone(node);
        f(&mut copy);
        return Ok(Arc::new(copy));
    }

    let mut f = f;
    for (slot, child) in node.child_arcs().iter().enumerate() {
        match patch_node(child, id, f) {
            Ok(patched) => {
                let mut copy = RecursionNode::clone(node);
                copy.child_arcs_mut()[slot] = patched;
                return Ok(Arc::new(copy));
            }
            Err(back) => f = back,
        }
    }
    Err(f)
}
