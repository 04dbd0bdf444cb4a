//! Graph traces: Dijkstra shortest paths, Prim and Kruskal spanning trees
//!
//! Every step carries a mark per node and per edge plus a running weight
//! (the distance just settled or relaxed for Dijkstra, the tree weight so far
//! for the spanning trees). Traces are replayed through the same ledger and
//! playback contract as the other engines.

mod model;
mod paths;
mod spanning;

pub use model::{random_graph, Edge, Graph, Node, MAX_EDGES, MAX_NODES};
pub use paths::{dijkstra, ShortestPath};
pub use spanning::{kruskal, prim, SpanningTree};

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::framework::{FrameOf, Replay, SubscriptionId, Trace};
use crate::ledger::CursorStart;
use crate::playback::{Advance, Playback};
use crate::ReplayError;

/// Auto-play interval at 1x
pub const BASE_INTERVAL: Duration = Duration::from_millis(500);

/// Which graph algorithm to trace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphAlgorithm {
    /// Single-source shortest path
    #[default]
    Dijkstra,
    /// Minimum spanning tree grown from a start node
    Prim,
    /// Minimum spanning tree from sorted edges
    Kruskal,
}

impl fmt::Display for GraphAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            GraphAlgorithm::Dijkstra => "dijkstra",
            GraphAlgorithm::Prim => "prim",
            GraphAlgorithm::Kruskal => "kruskal",
        })
    }
}

impl FromStr for GraphAlgorithm {
    type Err = ReplayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dijkstra" => Ok(GraphAlgorithm::Dijkstra),
            "prim" => Ok(GraphAlgorithm::Prim),
            "kruskal" => Ok(GraphAlgorithm::Kruskal),
            other => Err(ReplayError::InvalidConfig(format!(
                "unknown graph algorithm '{}'",
                other
            ))),
        }
    }
}

/// Visual state of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum NodeMark {
    /// Untouched
    #[default]
    Idle,
    /// Being visited or just added
    Current,
    /// Distance settled
    Visited,
    /// Distance just improved
    Frontier,
    /// Part of the spanning tree
    InTree,
    /// On the final shortest path
    Path,
}

/// Visual state of an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EdgeMark {
    /// Untouched
    #[default]
    Idle,
    /// Being relaxed, considered or just added
    Considered,
    /// On a known shortest path
    Path,
    /// Chosen for the spanning tree
    InTree,
    /// Skipped because it closes a cycle
    Rejected,
}

/// One snapshot of the graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStep {
    /// What happened
    pub description: String,
    /// Mark per node, in node order
    pub nodes: Vec<NodeMark>,
    /// Mark per edge, in edge order
    pub edges: Vec<EdgeMark>,
    /// Distance or tree weight at this step
    pub weight: u64,
}

impl GraphStep {
    pub(crate) fn new(
        description: String,
        nodes: Vec<NodeMark>,
        edges: Vec<EdgeMark>,
        weight: u64,
    ) -> Self {
        Self {
            description,
            nodes,
            edges,
            weight,
        }
    }
}

/// Counters at the cursor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GraphStats {
    /// Nodes with any mark
    pub touched_nodes: usize,
    /// Edges in the tree or on a path
    pub chosen_edges: usize,
    /// Distance or tree weight
    pub weight: u64,
    /// Cursor position
    pub step_index: usize,
}

/// Marker type plugging graph traces into the replay framework
#[derive(Debug, Clone, Copy)]
pub struct GraphTrace;

impl Trace for GraphTrace {
    type Step = GraphStep;
    type Stats = GraphStats;

    fn aggregate(steps: &[GraphStep], cursor: Option<usize>) -> GraphStats {
        match cursor.and_then(|idx| steps.get(idx).map(|step| (idx, step))) {
            Some((step_index, step)) => GraphStats {
                touched_nodes: step.nodes.iter().filter(|&&m| m != NodeMark::Idle).count(),
                chosen_edges: step
                    .edges
                    .iter()
                    .filter(|&&m| matches!(m, EdgeMark::InTree | EdgeMark::Path))
                    .count(),
                weight: step.weight,
                step_index,
            },
            None => GraphStats::default(),
        }
    }

    fn explain(step: &GraphStep) -> String {
        step.description.clone()
    }
}

/// Graph, algorithm and endpoints
///
/// JSON shape: `{"nodes": [...], "edges": [...], "algorithm": "dijkstra", "start": "A", "end": "D"}`.
/// A missing `start` means the first node; a missing `end` means the last node.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GraphConfig {
    /// Nodes and edges
    #[serde(flatten)]
    pub graph: Graph,
    /// Algorithm to trace
    #[serde(default)]
    pub algorithm: GraphAlgorithm,
    /// Start node id (Dijkstra, Prim)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    /// End node id (Dijkstra)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
}

impl GraphConfig {
    /// Config with default endpoints
    pub fn new(graph: Graph, algorithm: GraphAlgorithm) -> Self {
        Self {
            graph,
            algorithm,
            start: None,
            end: None,
        }
    }

    /// Set the start and end node ids
    pub fn with_endpoints(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.start = Some(start.into());
        self.end = Some(end.into());
        self
    }

    /// Start id, defaulting to the first node
    pub fn start_id(&self) -> Option<&str> {
        self.start
            .as_deref()
            .or_else(|| self.graph.nodes.first().map(|node| node.id.as_str()))
    }

    /// End id, defaulting to the last node
    pub fn end_id(&self) -> Option<&str> {
        self.end
            .as_deref()
            .or_else(|| self.graph.nodes.last().map(|node| node.id.as_str()))
    }

    /// Graph valid and endpoints known
    pub fn validate(&self) -> Result<(), ReplayError> {
        self.graph.validate()?;
        for id in [self.start.as_deref(), self.end.as_deref()].into_iter().flatten() {
            self.graph.index_of(id)?;
        }
        Ok(())
    }

    /// Parse and validate a JSON config; every failure is `ImportFailed`
    pub fn from_json(text: &str) -> Result<Self, ReplayError> {
        let config: Self =
            serde_json::from_str(text).map_err(|e| ReplayError::ImportFailed(e.to_string()))?;
        config
            .validate()
            .map_err(|e| ReplayError::ImportFailed(e.to_string()))?;
        Ok(config)
    }

    /// Serialize to the import shape
    pub fn to_json(&self) -> Result<String, ReplayError> {
        serde_json::to_string(self).map_err(|e| ReplayError::InvalidConfig(e.to_string()))
    }

    /// Record the configured algorithm
    pub fn run(&self) -> Result<(Vec<GraphStep>, GraphOutcome), ReplayError> {
        self.validate()?;
        let start = self.start_id().unwrap_or_default();
        match self.algorithm {
            GraphAlgorithm::Dijkstra => dijkstra(&self.graph, start, self.end_id())
                .map(|(steps, path)| (steps, GraphOutcome::ShortestPath(path))),
            GraphAlgorithm::Prim => prim(&self.graph, start)
                .map(|(steps, tree)| (steps, GraphOutcome::SpanningTree(tree))),
            GraphAlgorithm::Kruskal => kruskal(&self.graph)
                .map(|(steps, tree)| (steps, GraphOutcome::SpanningTree(tree))),
        }
    }
}

/// What a finished run computed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphOutcome {
    /// Dijkstra result
    ShortestPath(ShortestPath),
    /// Prim or Kruskal result
    SpanningTree(SpanningTree),
}

/// Graph replay engine
#[derive(Debug)]
pub struct GraphEngine {
    config: Option<GraphConfig>,
    outcome: Option<GraphOutcome>,
    replay: Replay<GraphTrace>,
    playback: Playback,
}

impl GraphEngine {
    /// Engine with an empty log
    pub fn new() -> Self {
        Self {
            config: None,
            outcome: None,
            replay: Replay::new(),
            playback: Playback::new(BASE_INTERVAL),
        }
    }

    /// Record the configured algorithm; step 0 is shown. A rejected config leaves the engine untouched.
    pub fn init(&mut self, config: GraphConfig) -> Result<(), ReplayError> {
        let (steps, outcome) = match config.run() {
            Ok(run) => run,
            Err(err) => {
                tracing::warn!(%err, "rejected graph config");
                return Err(err);
            }
        };
        tracing::debug!(algorithm = %config.algorithm, steps = steps.len(), "graph trace built");

        self.playback.pause();
        self.outcome = Some(outcome);
        self.config = Some(config);
        self.replay.load(steps, CursorStart::First);
        Ok(())
    }

    /// Parse a JSON config and [`init`](Self::init) with it
    pub fn import_json(&mut self, text: &str) -> Result<(), ReplayError> {
        let config = GraphConfig::from_json(text)?;
        self.init(config)
    }

    /// Loaded config
    pub fn config(&self) -> Option<&GraphConfig> {
        self.config.as_ref()
    }

    /// Result of the loaded run
    pub fn outcome(&self) -> Option<&GraphOutcome> {
        self.outcome.as_ref()
    }

    /// Node ids along the shortest path, empty for spanning trees
    pub fn path_ids(&self) -> Vec<&str> {
        match (&self.config, &self.outcome) {
            (Some(config), Some(GraphOutcome::ShortestPath(path))) => {
                path.path.iter().map(|&i| config.graph.id(i)).collect()
            }
            _ => Vec::new(),
        }
    }

    /// Step forward
    pub fn step(&mut self) -> bool {
        self.replay.advance()
    }

    /// Step backward
    pub fn prev(&mut self) -> bool {
        self.replay.retreat()
    }

    /// Jump to `index`
    pub fn goto(&mut self, index: usize) -> bool {
        self.replay.seek(index)
    }

    /// Step under the cursor
    pub fn current(&self) -> Option<&GraphStep> {
        self.replay.current()
    }

    /// Cursor position
    pub fn cursor(&self) -> Option<usize> {
        self.replay.cursor()
    }

    /// All recorded steps
    pub fn steps(&self) -> &[GraphStep] {
        self.replay.log().steps()
    }

    /// Number of recorded steps
    pub fn len(&self) -> usize {
        self.replay.len()
    }

    /// Whether no trace is loaded
    pub fn is_empty(&self) -> bool {
        self.replay.is_empty()
    }

    /// Counters at the cursor
    pub fn stats(&self) -> GraphStats {
        self.replay.stats()
    }

    /// Frame at the cursor
    pub fn frame(&self) -> Option<FrameOf<GraphTrace>> {
        self.replay.frame()
    }

    /// Register a frame callback
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&FrameOf<GraphTrace>) + 'static,
    {
        self.replay.subscribe(callback)
    }

    /// Drop a frame callback
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.replay.unsubscribe(id)
    }

    /// Start auto-play
    pub fn play(&mut self, now: Duration) -> bool {
        self.playback.play(now)
    }

    /// Stop auto-play
    pub fn pause(&mut self) -> bool {
        self.playback.pause()
    }

    /// Change auto-play speed
    pub fn set_speed(&mut self, multiplier: f64, now: Duration) -> Result<(), ReplayError> {
        self.playback.set_speed(multiplier, now)
    }

    /// Run due auto-play ticks
    pub fn tick(&mut self, now: Duration) -> usize {
        self.playback.poll(now, &mut self.replay)
    }

    /// Auto-play state
    pub fn playback(&self) -> &Playback {
        &self.playback
    }
}

impl Advance for GraphEngine {
    fn advance(&mut self) -> bool {
        self.step()
    }

    fn is_at_end(&self) -> bool {
        self.replay.is_at_end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line() -> Graph {
        Graph::new(
            ["A", "B", "C"],
            vec![Edge::new("A", "B", 2), Edge::new("B", "C", 3)],
        )
    }

    #[test]
    fn test_algorithm_from_str() {
        assert_eq!("Kruskal".parse::<GraphAlgorithm>().unwrap(), GraphAlgorithm::Kruskal);
        assert!("bellman-ford".parse::<GraphAlgorithm>().is_err());
    }

    #[test]
    fn test_default_endpoints() {
        let config = GraphConfig::new(line(), GraphAlgorithm::Dijkstra);
        assert_eq!(config.start_id(), Some("A"));
        assert_eq!(config.end_id(), Some("C"));

        let mut engine = GraphEngine::new();
        engine.init(config).unwrap();
        assert_eq!(engine.path_ids(), vec!["A", "B", "C"]);
        assert_eq!(engine.cursor(), Some(0));
    }

    #[test]
    fn test_json_import() {
        let mut engine = GraphEngine::new();
        engine
            .import_json(
                r#"{"nodes":[{"id":"A"},{"id":"B"}],"edges":[{"source":"A","target":"B","weight":7}],"algorithm":"prim"}"#,
            )
            .unwrap();
        assert!(matches!(
            engine.outcome(),
            Some(GraphOutcome::SpanningTree(SpanningTree { total_weight: 7, .. }))
        ));

        let err = engine
            .import_json(r#"{"nodes":[{"id":"A"}],"edges":[],"start":"Q"}"#)
            .unwrap_err();
        assert!(matches!(err, ReplayError::ImportFailed(_)));
        assert_eq!(engine.config().unwrap().algorithm, GraphAlgorithm::Prim);
    }

    #[test]
    fn test_stats_follow_cursor() {
        let mut engine = GraphEngine::new();
        engine
            .init(GraphConfig::new(line(), GraphAlgorithm::Kruskal))
            .unwrap();
        let last = engine.len() - 1;
        engine.goto(last);
        let stats = engine.stats();
        assert_eq!(stats.step_index, last);
        assert_eq!(stats.chosen_edges, 2);
        assert_eq!(stats.touched_nodes, 3);
        assert_eq!(stats.weight, 5);
    }
}
