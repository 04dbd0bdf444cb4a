//! Minimum spanning trees: Prim and Kruskal

use super::model::{Graph, Topology};
use super::{EdgeMark, GraphStep, NodeMark};
use crate::ReplayError;

/// Result of a spanning-tree run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpanningTree {
    /// Chosen edge indices in the order they were added
    pub edges: Vec<usize>,
    /// Sum of the chosen edge weights
    pub total_weight: u64,
    /// Whether the tree spans every node; `false` means a forest (Kruskal) or a partial tree (Prim)
    pub connected: bool,
}

/// Union-find over node indices with path compression and union by rank
#[derive(Debug, Clone)]
struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u8>,
    sets: usize,
}

impl DisjointSet {
    fn new(size: usize) -> Self {
        Self {
            parent: (0..size).collect(),
            rank: vec![0; size],
            sets: size,
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        while self.parent[x] != root {
            let next = self.parent[x];
            self.parent[x] = root;
            x = next;
        }
        root
    }

    /// Merge the sets of `a` and `b`; `false` when already joined
    fn union(&mut self, a: usize, b: usize) -> bool {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return false;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
        self.sets -= 1;
        true
    }
}

fn tree_edges(edge_count: usize, chosen: &[usize]) -> Vec<EdgeMark> {
    let mut marks = vec![EdgeMark::Idle; edge_count];
    for &edge in chosen {
        marks[edge] = EdgeMark::InTree;
    }
    marks
}

/// Nodes touched by a chosen edge
fn tree_nodes(topology: &Topology, chosen: &[usize]) -> Vec<NodeMark> {
    let mut marks = vec![NodeMark::Idle; topology.node_count()];
    for &edge in chosen {
        let (u, v) = topology.ends[edge];
        marks[u] = NodeMark::InTree;
        marks[v] = NodeMark::InTree;
    }
    marks
}

fn label(graph: &Graph, topology: &Topology, edge: usize) -> String {
    let (u, v) = topology.ends[edge];
    format!("{} - {}", graph.id(u), graph.id(v))
}

/// Grow a tree from `start`, always taking the lightest edge leaving it
///
/// Ties go to the edge listed first. Stops early when the remaining nodes
/// cannot be reached.
pub fn prim(graph: &Graph, start: &str) -> Result<(Vec<GraphStep>, SpanningTree), ReplayError> {
    let topology = graph.topology()?;
    let root = graph.index_of(start)?;
    let (n, m) = (topology.node_count(), topology.ends.len());

    let mut in_tree = vec![false; n];
    in_tree[root] = true;
    let mut chosen = Vec::new();
    let mut total = 0u64;

    let mut steps = Vec::new();
    let mut nodes = vec![NodeMark::Idle; n];
    nodes[root] = NodeMark::Current;
    steps.push(GraphStep::new(
        format!("Initialize: grow the minimum spanning tree from {}", start),
        nodes,
        vec![EdgeMark::Idle; m],
        0,
    ));

    loop {
        let lightest = (0..m)
            .filter(|&e| {
                let (u, v) = topology.ends[e];
                in_tree[u] != in_tree[v]
            })
            .min_by_key(|&e| (topology.weights[e], e));
        let Some(edge) = lightest else {
            break;
        };

        let (u, v) = topology.ends[edge];
        let added = if in_tree[u] { v } else { u };
        in_tree[added] = true;
        chosen.push(edge);
        total += topology.weights[edge];

        let mut nodes: Vec<NodeMark> = in_tree
            .iter()
            .map(|&inside| if inside { NodeMark::InTree } else { NodeMark::Idle })
            .collect();
        nodes[added] = NodeMark::Current;
        let mut edges = tree_edges(m, &chosen);
        edges[edge] = EdgeMark::Considered;
        steps.push(GraphStep::new(
            format!(
                "Add edge {} (weight {}) to the tree",
                label(graph, &topology, edge),
                topology.weights[edge]
            ),
            nodes,
            edges,
            total,
        ));
    }

    let connected = in_tree.iter().all(|&inside| inside);
    let description = if connected {
        format!("Done: minimum spanning tree weight {}", total)
    } else {
        let reached = in_tree.iter().filter(|&&inside| inside).count();
        format!(
            "Done: graph is disconnected, tree reaches {} of {} nodes with weight {}",
            reached, n, total
        )
    };
    let nodes = in_tree
        .iter()
        .map(|&inside| if inside { NodeMark::InTree } else { NodeMark::Idle })
        .collect();
    steps.push(GraphStep::new(description, nodes, tree_edges(m, &chosen), total));

    tracing::debug!(steps = steps.len(), total, connected, "prim trace built");
    Ok((
        steps,
        SpanningTree {
            edges: chosen,
            total_weight: total,
            connected,
        },
    ))
}

/// Scan edges by ascending weight, keeping each one that joins two sets
///
/// Equal weights keep their listed order. Stops once `n - 1` edges are chosen;
/// on a disconnected graph the result is a minimum spanning forest.
pub fn kruskal(graph: &Graph) -> Result<(Vec<GraphStep>, SpanningTree), ReplayError> {
    let topology = graph.topology()?;
    let (n, m) = (topology.node_count(), topology.ends.len());

    let mut order: Vec<usize> = (0..m).collect();
    order.sort_by_key(|&e| topology.weights[e]);

    let mut steps = vec![GraphStep::new(
        "Initialize: every node is its own set".to_string(),
        vec![NodeMark::Idle; n],
        vec![EdgeMark::Idle; m],
        0,
    )];
    let sorted: Vec<String> = order
        .iter()
        .map(|&e| format!("{}({})", label(graph, &topology, e), topology.weights[e]))
        .collect();
    steps.push(GraphStep::new(
        format!("Sort edges by weight: {}", sorted.join(", ")),
        vec![NodeMark::Idle; n],
        vec![EdgeMark::Idle; m],
        0,
    ));

    let mut sets = DisjointSet::new(n);
    let mut chosen = Vec::new();
    let mut total = 0u64;

    for edge in order {
        if chosen.len() + 1 >= n {
            break;
        }
        let weight = topology.weights[edge];
        let mut edges = tree_edges(m, &chosen);
        edges[edge] = EdgeMark::Considered;
        steps.push(GraphStep::new(
            format!(
                "Consider edge {} (weight {})",
                label(graph, &topology, edge),
                weight
            ),
            tree_nodes(&topology, &chosen),
            edges,
            total,
        ));

        let (u, v) = topology.ends[edge];
        if sets.union(u, v) {
            chosen.push(edge);
            total += weight;
            let mut edges = tree_edges(m, &chosen);
            edges[edge] = EdgeMark::Considered;
            steps.push(GraphStep::new(
                format!(
                    "Add edge {} to the tree, merging two sets",
                    label(graph, &topology, edge)
                ),
                tree_nodes(&topology, &chosen),
                edges,
                total,
            ));
        } else {
            let mut edges = tree_edges(m, &chosen);
            edges[edge] = EdgeMark::Rejected;
            steps.push(GraphStep::new(
                format!(
                    "Skip edge {}: it would close a cycle",
                    label(graph, &topology, edge)
                ),
                tree_nodes(&topology, &chosen),
                edges,
                total,
            ));
        }
    }

    let connected = sets.sets == 1;
    let description = if connected {
        format!("Done: minimum spanning tree weight {}", total)
    } else {
        format!("Done: graph is disconnected, spanning forest weight {}", total)
    };
    steps.push(GraphStep::new(
        description,
        tree_nodes(&topology, &chosen),
        tree_edges(m, &chosen),
        total,
    ));

    tracing::debug!(steps = steps.len(), total, connected, "kruskal trace built");
    Ok((
        steps,
        SpanningTree {
            edges: chosen,
            total_weight: total,
            connected,
        },
    ))
}
