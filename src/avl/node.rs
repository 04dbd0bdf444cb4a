//! Owned AVL nodes and the rebalancing primitives

use super::{OperationKind, TreeOperation};

pub(crate) type Link = Option<Box<Node>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Node {
    pub(crate) value: i64,
    pub(crate) height: usize,
    pub(crate) left: Link,
    pub(crate) right: Link,
}

impl Node {
    fn leaf(value: i64) -> Self {
        Self {
            value,
            height: 1,
            left: None,
            right: None,
        }
    }

    fn update_height(&mut self) {
        self.height = 1 + height(&self.left).max(height(&self.right));
    }

    fn balance(&self) -> isize {
        height(&self.left) as isize - height(&self.right) as isize
    }
}

pub(crate) fn height(link: &Link) -> usize {
    link.as_ref().map_or(0, |node| node.height)
}

fn balance(link: &Link) -> isize {
    link.as_ref().map_or(0, |node| node.balance())
}

fn rotate_right(mut node: Box<Node>) -> Box<Node> {
    let Some(mut pivot) = node.left.take() else {
        return node;
    };
    node.left = pivot.right.take();
    node.update_height();
    pivot.right = Some(node);
    pivot.update_height();
    pivot
}

fn rotate_left(mut node: Box<Node>) -> Box<Node> {
    let Some(mut pivot) = node.right.take() else {
        return node;
    };
    node.right = pivot.left.take();
    node.update_height();
    pivot.left = Some(node);
    pivot.update_height();
    pivot
}

/// Restore the AVL balance at `node`, logging any rotation
fn rebalance(mut node: Box<Node>, ops: &mut Vec<TreeOperation>) -> Box<Node> {
    node.update_height();
    let factor = node.balance();

    if factor > 1 {
        let child = node.left.as_ref().map_or(node.value, |l| l.value);
        if balance(&node.left) < 0 {
            ops.push(TreeOperation::new(
                OperationKind::RotateLeftRight,
                vec![node.value, child],
            ));
            node.left = node.left.take().map(rotate_left);
        } else {
            ops.push(TreeOperation::new(OperationKind::RotateRight, vec![node.value]));
        }
        return rotate_right(node);
    }

    if factor < -1 {
        let child = node.right.as_ref().map_or(node.value, |r| r.value);
        if balance(&node.right) > 0 {
            ops.push(TreeOperation::new(
                OperationKind::RotateRightLeft,
                vec![node.value, child],
            ));
            node.right = node.right.take().map(rotate_right);
        } else {
            ops.push(TreeOperation::new(OperationKind::RotateLeft, vec![node.value]));
        }
        return rotate_left(node);
    }

    node
}

pub(crate) fn insert(
    link: Link,
    value: i64,
    ops: &mut Vec<TreeOperation>,
    inserted: &mut bool,
) -> Box<Node> {
    let Some(mut node) = link else {
        *inserted = true;
        ops.push(TreeOperation::new(OperationKind::Insert, vec![value]));
        return Box::new(Node::leaf(value));
    };
    if value < node.value {
        node.left = Some(insert(node.left.take(), value, ops, inserted));
    } else if value > node.value {
        node.right = Some(insert(node.right.take(), value, ops, inserted));
    } else {
        return node;
    }
    rebalance(node, ops)
}

pub(crate) fn remove(
    link: Link,
    value: i64,
    ops: &mut Vec<TreeOperation>,
    removed: &mut bool,
) -> Link {
    let mut node = link?;
    if value < node.value {
        node.left = remove(node.left.take(), value, ops, removed);
    } else if value > node.value {
        node.right = remove(node.right.take(), value, ops, removed);
    } else {
        *removed = true;
        ops.push(TreeOperation::new(OperationKind::Delete, vec![value]));
        match (node.left.take(), node.right.take()) {
            (None, right) => return right,
            (left, None) => return left,
            (Some(left), Some(right)) => {
                // in-order successor takes the removed value's place
                let (rest, successor) = remove_min(right, ops);
                node.value = successor;
                node.left = Some(left);
                node.right = rest;
            }
        }
    }
    Some(rebalance(node, ops))
}

fn remove_min(mut node: Box<Node>, ops: &mut Vec<TreeOperation>) -> (Link, i64) {
    match node.left.take() {
        None => {
            let value = node.value;
            (node.right.take(), value)
        }
        Some(left) => {
            let (rest, min) = remove_min(left, ops);
            node.left = rest;
            (Some(rebalance(node, ops)), min)
        }
    }
}
