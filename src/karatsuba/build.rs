//! Recursive trace construction
//!
//! Node ids are handed out in creation order (root = 1, then z2/z1/z0 of each
//! divide). Children are solved z2, z0, z1 so the middle term can reuse both
//! outer products.

use crate::bigint::{add, multiply, normalize, shift, subtract};
use crate::tree::{NodeId, Problem, RecursionNode, RecursionTree};
use crate::ReplayError;

use super::config::KaratsubaConfig;
use super::step::{Event, KaratsubaStep, Split, SubProblem, SubResults};

const ROOT_ID: NodeId = 1;

struct TraceBuilder {
    threshold: usize,
    next_id: NodeId,
    tree: RecursionTree,
    steps: Vec<KaratsubaStep>,
}

impl TraceBuilder {
    fn push(&mut self, node: NodeId, event: Event) {
        self.steps.push(KaratsubaStep {
            node,
            tree: self.tree.clone(),
            event,
        });
    }

    fn allocate(&mut self) -> NodeId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn solve(&mut self, node: NodeId, a: &str, b: &str) -> Result<String, ReplayError> {
        let a = normalize(a);
        let b = normalize(b);
        let problem = Problem::new(a, b);

        if a.len() <= self.threshold || b.len() <= self.threshold {
            let result = multiply(a, b);
            let done = result.clone();
            self.tree = self.tree.try_patch(node, |n| n.complete(done))?;
            self.push(
                node,
                Event::BaseCase {
                    problem,
                    result: result.clone(),
                    threshold: self.threshold,
                },
            );
            return Ok(result);
        }

        let split = split_operands(a, b);
        let sum_a = add(&split.a1, &split.a0);
        let sum_b = add(&split.b1, &split.b0);

        let ids = [self.allocate(), self.allocate(), self.allocate()];
        let problems = [
            Problem::new(split.a1.clone(), split.b1.clone()),
            Problem::new(sum_a.clone(), sum_b.clone()),
            Problem::new(split.a0.clone(), split.b0.clone()),
        ];
        self.tree = self.tree.try_patch(node, |parent| {
            let [p2, p1, p0] = problems;
            let children = [
                RecursionNode::child_of(parent, ids[0], p2),
                RecursionNode::child_of(parent, ids[1], p1),
                RecursionNode::child_of(parent, ids[2], p0),
            ];
            parent.divide(children);
        })?;
        let m = split.m;
        self.push(
            node,
            Event::Divide {
                problem,
                split: split.clone(),
            },
        );

        let children: Vec<NodeId> = self
            .tree
            .find(node)
            .map(|n| n.children().map(RecursionNode::id).collect())
            .unwrap_or_default();
        let &[z2_id, z1_id, z0_id] = children.as_slice() else {
            return Err(ReplayError::InvariantViolated(format!(
                "node {} divided into {} children",
                node,
                children.len()
            )));
        };

        let z2 = self.conquer(z2_id, SubProblem::Z2, &split.a1, &split.b1)?;
        let z0 = self.conquer(z0_id, SubProblem::Z0, &split.a0, &split.b0)?;
        let z1_raw = self.conquer(z1_id, SubProblem::Z1, &sum_a, &sum_b)?;

        let z1 = subtract(&z1_raw, &z2).sub(&z0).into_unsigned().ok_or_else(|| {
            ReplayError::InvariantViolated(format!(
                "negative middle term for node {}: {} - {} - {}",
                node, z1_raw, z2, z0
            ))
        })?;

        let result = add(&add(&shift(&z2, 2 * m), &shift(&z1, m)), &z0);
        let done = result.clone();
        self.tree = self.tree.try_patch(node, |n| n.complete(done))?;
        self.push(
            node,
            Event::Combine {
                parts: SubResults { z2, z1, z0 },
                shift: m,
                result: result.clone(),
            },
        );
        Ok(result)
    }

    fn conquer(
        &mut self,
        child: NodeId,
        part: SubProblem,
        a: &str,
        b: &str,
    ) -> Result<String, ReplayError> {
        self.push(
            child,
            Event::Conquer {
                problem: Problem::new(a, b),
                part,
            },
        );
        self.solve(child, a, b)
    }
}

/// Left-pad both operands to `n = max(len)` and cut off the low `n / 2` digits
fn split_operands(a: &str, b: &str) -> Split {
    let n = a.len().max(b.len());
    let m = n / 2;
    let pa = format!("{:0>width$}", a, width = n);
    let pb = format!("{:0>width$}", b, width = n);
    let (a1, a0) = pa.split_at(n - m);
    let (b1, b0) = pb.split_at(n - m);
    Split {
        a1: normalize(a1).to_string(),
        a0: normalize(a0).to_string(),
        b1: normalize(b1).to_string(),
        b0: normalize(b0).to_string(),
        m,
    }
}

/// Run Karatsuba once and record every transition
///
/// The config must already be validated. A RESULT step closes every trace,
/// including one whose root is itself a base case.
pub fn build_trace(config: &KaratsubaConfig) -> Result<Vec<KaratsubaStep>, ReplayError> {
    let _span = tracing::debug_span!(
        "karatsuba_trace",
        num1 = %config.num1,
        num2 = %config.num2,
        threshold = config.threshold
    )
    .entered();

    let problem = Problem::new(config.num1.as_str(), config.num2.as_str());
    let mut builder = TraceBuilder {
        threshold: config.threshold,
        next_id: ROOT_ID + 1,
        tree: RecursionTree::new(ROOT_ID, problem.clone()),
        steps: Vec::new(),
    };

    builder.push(
        ROOT_ID,
        Event::Init {
            problem: problem.clone(),
        },
    );
    let product = builder.solve(ROOT_ID, &config.num1, &config.num2)?;
    builder.push(ROOT_ID, Event::Result { problem, product });

    builder.tree.validate()?;
    tracing::debug!(
        steps = builder.steps.len(),
        nodes = builder.tree.node_count(),
        "karatsuba trace built"
    );
    Ok(builder.steps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::karatsuba::StepKind;

    fn trace(a: &str, b: &str, threshold: usize) -> Vec<KaratsubaStep> {
        build_trace(&KaratsubaConfig::new(a, b, threshold)).unwrap()
    }

    #[test]
    fn test_split_pads_shorter_operand() {
        let split = split_operands("1234", "56");
        assert_eq!(split.m, 2);
        assert_eq!((split.a1.as_str(), split.a0.as_str()), ("12", "34"));
        assert_eq!((split.b1.as_str(), split.b0.as_str()), ("0", "56"));

        let split = split_operands("12345", "6789");
        assert_eq!(split.m, 2);
        assert_eq!((split.a1.as_str(), split.a0.as_str()), ("123", "45"));
        assert_eq!((split.b1.as_str(), split.b0.as_str()), ("67", "89"));
    }

    #[test]
    fn test_root_base_case_still_ends_with_result() {
        let steps = trace("12", "34", 2);
        let kinds: Vec<_> = steps.iter().map(KaratsubaStep::kind).collect();
        assert_eq!(kinds, vec![StepKind::Init, StepKind::BaseCase, StepKind::Result]);
        assert_eq!(steps[2].result(), Some("408"));
    }

    #[test]
    fn test_conquer_order_is_z2_z0_z1() {
        let steps = trace("1234", "5678", 2);
        let parts: Vec<_> = steps
            .iter()
            .filter_map(|s| match &s.event {
                Event::Conquer { part, .. } => Some(*part),
                _ => None,
            })
            .collect();
        assert_eq!(parts, vec![SubProblem::Z2, SubProblem::Z0, SubProblem::Z1]);
        assert_eq!(steps.last().and_then(KaratsubaStep::result), Some("7006652"));
    }

    #[test]
    fn test_node_ids_are_monotonic() {
        let steps = trace("12345678", "87654321", 1);
        let last = &steps[steps.len() - 1].tree;
        let mut ids: Vec<_> = last.iter().map(RecursionNode::id).collect();
        ids.sort_unstable();
        let expected: Vec<NodeId> = (1..=ids.len() as NodeId).collect();
        assert_eq!(ids, expected);
        assert!(last.validate().is_ok());
        assert!(last.iter().all(RecursionNode::is_completed));
    }

    #[test]
    fn test_zero_operand() {
        let steps = trace("0", "98765", 1);
        assert_eq!(steps.last().and_then(KaratsubaStep::result), Some("0"));

        let steps = trace("100000", "000", 1);
        assert_eq!(steps.last().and_then(KaratsubaStep::result), Some("0"));
    }
}
