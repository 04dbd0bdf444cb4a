//! Dijkstra shortest paths

use super::model::{Graph, Topology};
use super::{EdgeMark, GraphStep, NodeMark};
use crate::ReplayError;

/// Result of a shortest-path run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortestPath {
    /// Start node index
    pub source: usize,
    /// End node index, if one was requested
    pub target: Option<usize>,
    /// Settled or tentative distance per node; `None` is unreached
    pub distances: Vec<Option<u64>>,
    /// Node indices from source to target; empty when unreachable or no target
    pub path: Vec<usize>,
    /// Length of `path`
    pub distance: Option<u64>,
}

/// Nodes and edges walked back from `node` along the recorded predecessor edges
fn walk_back(topology: &Topology, via: &[Option<usize>], mut node: usize) -> (Vec<usize>, Vec<usize>) {
    let mut nodes = vec![node];
    let mut edges = Vec::new();
    while let Some(edge) = via[node] {
        let (u, v) = topology.ends[edge];
        node = if u == node { v } else { u };
        edges.push(edge);
        nodes.push(node);
    }
    nodes.reverse();
    edges.reverse();
    (nodes, edges)
}

fn edge_marks(edge_count: usize, path: &[usize]) -> Vec<EdgeMark> {
    let mut marks = vec![EdgeMark::Idle; edge_count];
    for &edge in path {
        marks[edge] = EdgeMark::Path;
    }
    marks
}

fn node_marks(visited: &[bool]) -> Vec<NodeMark> {
    visited
        .iter()
        .map(|&seen| if seen { NodeMark::Visited } else { NodeMark::Idle })
        .collect()
}

/// Run Dijkstra from `start`, stopping once `end` is settled
///
/// Edges are undirected. The next node settled is the unvisited one with the
/// smallest tentative distance, ties going to the earlier node. Every settle
/// and every distance improvement is a step.
pub fn dijkstra(
    graph: &Graph,
    start: &str,
    end: Option<&str>,
) -> Result<(Vec<GraphStep>, ShortestPath), ReplayError> {
    let topology = graph.topology()?;
    let source = graph.index_of(start)?;
    let target = end.map(|id| graph.index_of(id)).transpose()?;
    let (n, m) = (topology.node_count(), topology.ends.len());

    let mut distances: Vec<Option<u64>> = vec![None; n];
    let mut via: Vec<Option<usize>> = vec![None; n];
    let mut visited = vec![false; n];
    distances[source] = Some(0);

    let mut steps = Vec::new();
    let mut nodes = vec![NodeMark::Idle; n];
    nodes[source] = NodeMark::Current;
    steps.push(GraphStep::new(
        format!("Initialize: {} at distance 0, every other node at infinity", start),
        nodes,
        vec![EdgeMark::Idle; m],
        0,
    ));

    loop {
        let next = (0..n)
            .filter(|&i| !visited[i])
            .filter_map(|i| distances[i].map(|d| (d, i)))
            .min();
        let Some((distance, current)) = next else {
            break;
        };
        visited[current] = true;
        let (_, path_edges) = walk_back(&topology, &via, current);
        let mut nodes = node_marks(&visited);
        nodes[current] = NodeMark::Current;

        if Some(current) == target {
            steps.push(GraphStep::new(
                format!("Reach end node {} at distance {}", graph.id(current), distance),
                nodes,
                edge_marks(m, &path_edges),
                distance,
            ));
            break;
        }
        steps.push(GraphStep::new(
            format!("Visit node {}, distance {}", graph.id(current), distance),
            nodes,
            edge_marks(m, &path_edges),
            distance,
        ));

        for &(neighbor, edge) in &topology.adjacency[current] {
            if visited[neighbor] {
                continue;
            }
            let alt = distance.saturating_add(topology.weights[edge]);
            if distances[neighbor].map_or(false, |old| alt >= old) {
                continue;
            }
            distances[neighbor] = Some(alt);
            via[neighbor] = Some(edge);

            let mut nodes = node_marks(&visited);
            nodes[current] = NodeMark::Current;
            nodes[neighbor] = NodeMark::Frontier;
            let (_, known) = walk_back(&topology, &via, current);
            let mut edges = edge_marks(m, &known);
            edges[edge] = EdgeMark::Considered;
            steps.push(GraphStep::new(
                format!(
                    "Update node {}: distance {} via {}",
                    graph.id(neighbor),
                    alt,
                    graph.id(current)
                ),
                nodes,
                edges,
                alt,
            ));
        }
    }

    let mut outcome = ShortestPath {
        source,
        target,
        distances,
        path: Vec::new(),
        distance: None,
    };

    match target {
        Some(target) => match outcome.distances[target] {
            Some(distance) => {
                let (path, path_edges) = walk_back(&topology, &via, target);
                let mut nodes = node_marks(&visited);
                for &node in &path {
                    nodes[node] = NodeMark::Path;
                }
                let route: Vec<&str> = path.iter().map(|&i| graph.id(i)).collect();
                steps.push(GraphStep::new(
                    format!(
                        "Done: shortest path {} with distance {}",
                        route.join(" -> "),
                        distance
                    ),
                    nodes,
                    edge_marks(m, &path_edges),
                    distance,
                ));
                outcome.path = path;
                outcome.distance = Some(distance);
            }
            None => {
                let mut nodes = node_marks(&visited);
                nodes[source] = NodeMark::Current;
                steps.push(GraphStep::new(
                    format!("Done: {} cannot be reached from {}", graph.id(target), start),
                    nodes,
                    vec![EdgeMark::Idle; m],
                    0,
                ));
            }
        },
        None => {
            let table: Vec<String> = outcome
                .distances
                .iter()
                .enumerate()
                .map(|(i, d)| match d {
                    Some(d) => format!("{}={}", graph.id(i), d),
                    None => format!("{}=inf", graph.id(i)),
                })
                .collect();
            let mut edges = vec![EdgeMark::Idle; m];
            for edge in via.iter().flatten() {
                edges[*edge] = EdgeMark::Path;
            }
            steps.push(GraphStep::new(
                format!("Done: distances {}", table.join(", ")),
                node_marks(&visited),
                edges,
                0,
            ));
        }
    }

    tracing::debug!(steps = steps.len(), distance = ?outcome.distance, "dijkstra trace built");
    Ok((steps, outcome))
}
