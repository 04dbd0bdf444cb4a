//! Pre-order traversal
//!
//! Explicit stack of borrowed nodes, children pushed in reverse so the
//! iteration order is node, z2, z1, z0.

use super::RecursionNode;

/// Depth-first pre-order iterator over a recursion tree
#[derive(Debug)]
pub struct PreOrder<'a> {
    stack: Vec<&'a RecursionNode>,
}

impl<'a> PreOrder<'a> {
    /// Start at `root`
    pub fn new(root: &'a RecursionNode) -> Self {
        Self { stack: vec![root] }
    }
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = &'a RecursionNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        for child in node.child_arcs().iter().rev() {
            self.stack.push(child.as_ref());
        }
        Some(node)
    }
}
