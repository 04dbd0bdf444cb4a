//! Full integration tests: engines driven through their public surface

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use trace_replay::graph::{Edge, Graph, GraphAlgorithm, GraphConfig, GraphEngine, NodeMark};
use trace_replay::karatsuba::{KaratsubaConfig, KaratsubaEngine, StepKind};
use trace_replay::knapsack::{KnapsackConfig, KnapsackEngine};
use trace_replay::playback::{Advance, Clock, ManualClock, Playback};
use trace_replay::queens::{Action, QueensConfig, QueensEngine};
use trace_replay::sorting::{Algorithm, SortingEngine};
use trace_replay::ReplayError;
use test_helpers::*;

#[test]
fn test_manual_edits_splice_after_cursor() {
    let mut engine = QueensEngine::new();
    engine.init(QueensConfig::new(4)).unwrap();
    let original: Vec<_> = engine.steps().to_vec();

    assert!(engine.place_queen(0, 1).unwrap());
    assert_eq!(engine.cursor(), Some(2));
    assert_eq!(engine.len(), original.len() + 2);
    assert_eq!(engine.steps()[1].action(), Action::Check);
    assert_eq!(engine.steps()[2].action(), Action::Place);
    // the recorded search continues unchanged after the spliced steps
    assert_eq!(&engine.steps()[3..], &original[1..]);

    // (1, 0) is attacked by (0, 1): only a CHECK is spliced
    assert!(!engine.place_queen(1, 0).unwrap());
    assert_eq!(engine.cursor(), Some(3));
    assert_eq!(engine.current_board().unwrap().queen_count(), 1);
    assert_eq!(engine.steps()[3].action(), Action::Check);

    assert!(engine.clear_queen(0).unwrap());
    assert_eq!(engine.current().unwrap().action(), Action::Remove);
    assert_eq!(engine.current_board().unwrap().queen_count(), 0);
}

#[test]
fn test_manual_solution_reuses_known_id() {
    let mut engine = QueensEngine::new();
    engine.init(QueensConfig::new(4)).unwrap();
    for (row, col) in [(0, 2), (1, 0), (2, 3), (3, 1)] {
        assert!(engine.place_queen(row, col).unwrap());
    }
    assert_eq!(engine.current().unwrap().action(), Action::Solution);
    assert!(engine.current().unwrap().is_solution());
    // [2, 0, 3, 1] is the second solution the search found
    assert_eq!(engine.solutions().len(), 2);
    assert_eq!(engine.stats().solutions_found, 1);
}

#[test]
fn test_manual_edit_errors() {
    let mut engine = QueensEngine::new();
    assert!(matches!(engine.place_queen(0, 0), Err(ReplayError::InvalidConfig(_))));

    engine.init(QueensConfig::new(4)).unwrap();
    let len = engine.len();
    assert!(matches!(
        engine.place_queen(0, 9),
        Err(ReplayError::InvalidPosition { .. })
    ));
    assert!(matches!(engine.clear_queen(4), Err(ReplayError::InvalidRow { .. })));
    assert_eq!(engine.len(), len);
    assert_eq!(engine.cursor(), Some(0));
}

#[test]
fn test_failed_init_keeps_previous_state() {
    let mut engine = QueensEngine::new();
    engine.init(QueensConfig::new(4)).unwrap();
    engine.goto(10);
    assert!(engine.init(QueensConfig::new(0)).is_err());
    assert!(engine.import_json("{\"size\": 4, \"initialBoard\": [0, 0]}").is_err());
    assert_eq!(engine.cursor(), Some(10));
    assert_eq!(engine.solutions().len(), 2);

    let mut engine = KaratsubaEngine::new();
    engine.init(KaratsubaConfig::new("12", "34", 1)).unwrap();
    assert!(engine.init(KaratsubaConfig::new("12", "x", 1)).is_err());
    assert_eq!(engine.config().unwrap().num2, "34");
}

#[test]
fn test_frames_follow_cursor_moves() {
    let frames = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&frames);

    let mut engine = KaratsubaEngine::new();
    engine.subscribe(move |frame| sink.borrow_mut().push((frame.index, frame.stats.step_index)));
    engine.init(KaratsubaConfig::new("1234", "5678", 2)).unwrap();
    assert!(engine.step());
    assert!(engine.step());
    assert!(engine.prev());
    assert!(!engine.goto(engine.len()));
    assert!(engine.goto(0));
    assert!(!engine.prev());

    let seen = frames.borrow();
    assert_eq!(*seen, vec![(0, 0), (1, 1), (2, 2), (1, 1), (0, 0)]);
}

#[test]
fn test_unsubscribed_observer_gets_nothing() {
    let count = Rc::new(RefCell::new(0));
    let sink = Rc::clone(&count);

    let mut engine = KnapsackEngine::new();
    let id = engine.subscribe(move |_| *sink.borrow_mut() += 1);
    engine.init(KnapsackConfig::default()).unwrap();
    // unstarted load publishes nothing
    assert_eq!(*count.borrow(), 0);
    engine.next();
    assert!(engine.unsubscribe(id));
    engine.next();
    assert_eq!(*count.borrow(), 1);
}

#[test]
fn test_karatsuba_snapshots_are_immutable() {
    let steps = karatsuba_trace("1234", "5678", 2);
    let combine = steps
        .iter()
        .position(|s| s.kind() == StepKind::Combine && s.node == 1)
        .unwrap();

    // the root was still open in every earlier snapshot
    for step in &steps[..combine] {
        assert!(!step.tree.root().is_completed());
        assert_eq!(step.tree.root().result(), None);
    }
    assert_eq!(steps[combine].tree.root().result(), Some("7006652"));

    // completing the root copies only the root; finished children are shared
    let before = &steps[combine - 1].tree;
    let after = &steps[combine].tree;
    assert!(!after.shares_node(before, 1));
    for child in after.root().children() {
        assert!(after.shares_node(before, child.id()));
    }
}

#[test]
fn test_karatsuba_stats_track_depth() {
    let mut engine = KaratsubaEngine::new();
    engine.init(KaratsubaConfig::new("12345678", "87654321", 2)).unwrap();
    let total = engine.len() - 1;
    engine.goto(total);
    let stats = engine.stats();
    assert_eq!(stats.total_steps, total);
    assert_eq!(stats.step_index, total);
    assert_eq!(stats.divide_count, stats.combine_count);
    assert!(stats.max_depth >= 2);
    assert_eq!(stats.depth, 0);
    assert_eq!(engine.product(), Some("1082152022374638"));
}

#[test]
fn test_autoplay_runs_to_end_and_stops() {
    let clock = ManualClock::new();
    let mut engine = SortingEngine::new(Algorithm::Quick);
    engine.init(vec![5, 2, 9, 1, 7]).unwrap();

    let mut playback = Playback::new(Duration::from_millis(300));
    playback.set_speed(2.0, clock.now()).unwrap();
    assert!(playback.play(clock.now()));
    let advanced = playback.drive(&mut engine, &clock);

    assert_eq!(advanced, engine.len() - 1);
    assert!(engine.is_at_end());
    assert!(!playback.is_playing());
    assert_eq!(clock.now(), Duration::from_millis(150) * advanced as u32);
}

#[test]
fn test_autoplay_ticks_on_interval() {
    let mut engine = QueensEngine::new();
    engine.init(QueensConfig::new(4)).unwrap();
    engine.play(Duration::ZERO);

    assert_eq!(engine.tick(Duration::from_millis(499)), 0);
    assert_eq!(engine.tick(Duration::from_millis(500)), 1);
    assert_eq!(engine.tick(Duration::from_millis(1600)), 2);
    assert_eq!(engine.cursor(), Some(3));

    assert!(engine.pause());
    assert_eq!(engine.tick(Duration::from_secs(60)), 0);
    assert!(engine.set_speed(0.0, Duration::ZERO).is_err());
}

#[test]
fn test_knapsack_full_run() {
    let mut engine = KnapsackEngine::new();
    engine.init(KnapsackConfig::default()).unwrap();
    while engine.next() {}
    assert!(engine.is_complete());
    let solution = engine.solution().unwrap();
    assert_eq!(solution.max_value, brute_force_knapsack(engine.config().unwrap()));
    assert_eq!(engine.optimal_path(), solution.path.as_slice());

    engine.reset();
    assert!(!engine.is_complete());
    assert!(engine.optimal_path().is_empty());
}

#[test]
fn test_revisiting_an_index_republishes_the_same_frame() {
    let frames = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&frames);

    let mut engine = KaratsubaEngine::new();
    engine.init(KaratsubaConfig::new("98765", "4321", 1)).unwrap();
    engine.subscribe(move |frame| sink.borrow_mut().push(frame.clone()));
    let k = engine.len() / 2;
    assert!(engine.goto(k));
    assert!(engine.goto(0));
    assert!(engine.goto(k));

    let seen = frames.borrow();
    assert_eq!(seen.len(), 3);
    assert_eq!(seen[0], seen[2]);
    assert_eq!(seen[0].index, k);
    assert_eq!(seen[1].index, 0);
}

#[test]
fn test_graph_engine_replays_dijkstra() {
    let graph = Graph::new(
        ["A", "B", "C", "D"],
        vec![
            Edge::new("A", "B", 1),
            Edge::new("B", "D", 6),
            Edge::new("A", "C", 2),
            Edge::new("C", "D", 2),
        ],
    );
    let frames = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&frames);

    let mut engine = GraphEngine::new();
    engine.subscribe(move |frame| sink.borrow_mut().push(frame.stats.weight));
    engine
        .init(GraphConfig::new(graph.clone(), GraphAlgorithm::Dijkstra))
        .unwrap();
    assert_eq!(engine.path_ids(), vec!["A", "C", "D"]);

    let clock = ManualClock::new();
    let mut playback = Playback::new(Duration::from_millis(500));
    playback.play(clock.now());
    let advanced = playback.drive(&mut engine, &clock);
    assert_eq!(advanced, engine.len() - 1);
    assert_eq!(clock.now(), Duration::from_millis(500) * advanced as u32);

    let last = engine.current().unwrap();
    assert_eq!(
        last.nodes,
        vec![NodeMark::Path, NodeMark::Visited, NodeMark::Path, NodeMark::Path]
    );
    assert_eq!(frames.borrow().last(), Some(&4));

    // a bad endpoint keeps the loaded trace
    let bad = GraphConfig::new(graph, GraphAlgorithm::Prim).with_endpoints("A", "Z");
    assert_eq!(
        engine.init(bad),
        Err(ReplayError::UnknownNode("Z".to_string()))
    );
    assert_eq!(engine.config().unwrap().algorithm, GraphAlgorithm::Dijkstra);
    assert!(engine.is_at_end());
}
