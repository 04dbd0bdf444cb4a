//! Weighted undirected graphs addressed by node id

use std::collections::HashMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::ReplayError;

/// Most nodes accepted (one per letter)
pub const MAX_NODES: usize = 26;

/// Most edges accepted
pub const MAX_EDGES: usize = 128;

/// Graph node; extra JSON fields such as layout coordinates are ignored
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Node {
    /// Unique id
    pub id: String,
}

/// Undirected weighted edge between two node ids
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    /// One endpoint
    pub source: String,
    /// Other endpoint
    pub target: String,
    /// Non-negative weight
    pub weight: u64,
}

impl Edge {
    /// Edge `source - target`
    pub fn new(source: impl Into<String>, target: impl Into<String>, weight: u64) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            weight,
        }
    }
}

/// Node list plus edge list
///
/// JSON shape: `{"nodes": [{"id": "A"}, ...], "edges": [{"source": "A", "target": "B", "weight": 4}]}`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Graph {
    /// Nodes in display order
    pub nodes: Vec<Node>,
    /// Edges in display order
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl Graph {
    /// Graph from node ids and edges
    pub fn new<I, S>(ids: I, edges: Vec<Edge>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            nodes: ids.into_iter().map(|id| Node { id: id.into() }).collect(),
            edges,
        }
    }

    /// Position of `id` in the node list
    pub fn index_of(&self, id: &str) -> Result<usize, ReplayError> {
        self.nodes
            .iter()
            .position(|node| node.id == id)
            .ok_or_else(|| ReplayError::UnknownNode(id.to_string()))
    }

    /// Node id at `index`
    pub fn id(&self, index: usize) -> &str {
        self.nodes.get(index).map_or("?", |node| node.id.as_str())
    }

    /// Sizes in range, ids unique, every edge endpoint known
    pub fn validate(&self) -> Result<(), ReplayError> {
        self.topology().map(|_| ())
    }

    /// Resolve edge endpoints to node indices and build the adjacency lists
    pub(crate) fn topology(&self) -> Result<Topology, ReplayError> {
        if self.nodes.is_empty() || self.nodes.len() > MAX_NODES {
            return Err(ReplayError::InvalidConfig(format!(
                "expected 1 to {} nodes, got {}",
                MAX_NODES,
                self.nodes.len()
            )));
        }
        if self.edges.len() > MAX_EDGES {
            return Err(ReplayError::InvalidConfig(format!(
                "at most {} edges supported, got {}",
                MAX_EDGES,
                self.edges.len()
            )));
        }

        let mut index = HashMap::with_capacity(self.nodes.len());
        for (i, node) in self.nodes.iter().enumerate() {
            if index.insert(node.id.as_str(), i).is_some() {
                return Err(ReplayError::InvalidConfig(format!(
                    "duplicate node id '{}'",
                    node.id
                )));
            }
        }
        let lookup = |id: &str| {
            index
                .get(id)
                .copied()
                .ok_or_else(|| ReplayError::UnknownNode(id.to_string()))
        };

        let mut ends = Vec::with_capacity(self.edges.len());
        let mut adjacency = vec![Vec::new(); self.nodes.len()];
        for (e, edge) in self.edges.iter().enumerate() {
            let (u, v) = (lookup(&edge.source)?, lookup(&edge.target)?);
            ends.push((u, v));
            adjacency[u].push((v, e));
            if u != v {
                adjacency[v].push((u, e));
            }
        }

        Ok(Topology {
            ends,
            weights: self.edges.iter().map(|edge| edge.weight).collect(),
            adjacency,
        })
    }
}

/// Index-based view of a validated graph
#[derive(Debug, Clone)]
pub(crate) struct Topology {
    /// `(source, target)` per edge
    pub ends: Vec<(usize, usize)>,
    pub weights: Vec<u64>,
    /// `(neighbor, edge)` pairs per node, in edge order
    pub adjacency: Vec<Vec<(usize, usize)>>,
}

impl Topology {
    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }
}

/// Nodes `A`, `B`, ... with each pair joined with probability `density`, weights `1..=10`
pub fn random_graph<R: Rng + ?Sized>(node_count: usize, density: f64, rng: &mut R) -> Graph {
    let count = node_count.clamp(1, MAX_NODES);
    let ids: Vec<String> = (0..count)
        .map(|i| char::from(b'A' + i as u8).to_string())
        .collect();

    let density = if density.is_nan() { 0.0 } else { density.clamp(0.0, 1.0) };
    let mut edges = Vec::new();
    for i in 0..count {
        for j in i + 1..count {
            if edges.len() < MAX_EDGES && rng.gen_bool(density) {
                edges.push(Edge::new(ids[i].clone(), ids[j].clone(), rng.gen_range(1..=10)));
            }
        }
    }
    Graph::new(ids, edges)
}
