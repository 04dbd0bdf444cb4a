//! Correctness tests: every engine's recorded answer matches a direct computation

use test_case::test_case;
use trace_replay::graph::{dijkstra, kruskal, prim, Edge, EdgeMark, Graph};
use trace_replay::karatsuba::{standard_test_cases, Event, StepKind};
use trace_replay::knapsack::{fill_table, reconstruct, KnapsackConfig};
use trace_replay::queens::{search, Board, QueensConfig, QueensEngine, QueensStep};
use trace_replay::sorting::Algorithm;
use test_helpers::*;

#[test_case(1, 1)]
#[test_case(2, 0)]
#[test_case(3, 0)]
#[test_case(4, 2)]
#[test_case(5, 10)]
#[test_case(6, 4)]
#[test_case(8, 92)]
fn test_queens_solution_count(size: usize, expected: usize) {
    let outcome = search(Board::empty(size));
    assert_eq!(outcome.solutions.len(), expected);
    for solution in &outcome.solutions {
        assert_valid_solution(solution);
    }
}

#[test]
fn test_queens_solution_steps_are_numbered_in_order() {
    let mut engine = QueensEngine::new();
    engine.init(QueensConfig::new(6)).unwrap();
    let numbers: Vec<usize> = engine
        .steps()
        .iter()
        .filter_map(|step| match step {
            QueensStep::Solution { number, .. } => Some(*number),
            _ => None,
        })
        .collect();
    assert_eq!(numbers, vec![1, 2, 3, 4]);
    let ids: Vec<usize> = engine.solutions().iter().map(|s| s.id).collect();
    assert_eq!(ids, numbers);
}

#[test]
fn test_queens_seeded_search_keeps_seed() {
    // a queen at (0, 1) leaves only the first 4-queens solution
    let outcome = search(board(&[1, -1, -1, -1]));
    assert_eq!(outcome.solutions.len(), 1);
    assert_eq!(outcome.solutions[0].to_columns(), vec![1, 3, 0, 2]);
    assert!(outcome
        .steps
        .iter()
        .all(|step| step.board().get(0) == Some(1)));
}

#[test]
fn test_queens_search_nodes_are_consistent() {
    let outcome = search(Board::empty(5));
    for step in &outcome.steps {
        match step {
            QueensStep::Place { row, col, board } => {
                assert_eq!(board.get(*row), Some(*col));
                assert!(board.validate().is_empty());
            }
            QueensStep::Remove { row, board, .. } => assert_eq!(board.get(*row), None),
            QueensStep::Check { conflicts, col: Some(col), row, board } => {
                assert_eq!(*conflicts, board.conflicts_at(*row, *col));
            }
            _ => {}
        }
    }
}

#[test_case("123", "456", "56088")]
#[test_case("1234", "5678", "7006652")]
#[test_case("99", "99", "9801")]
#[test_case("0", "987654321", "0")]
#[test_case("1000", "1000", "1000000")]
#[test_case("123456789", "987654321", "121932631112635269")]
fn test_karatsuba_product(a: &str, b: &str, expected: &str) {
    for threshold in 1..=10 {
        let steps = karatsuba_trace(a, b, threshold);
        assert_eq!(final_product(&steps), expected, "threshold {}", threshold);
    }
}

#[test_case(1; "threshold 1")]
#[test_case(2; "threshold 2")]
#[test_case(4; "threshold 4")]
#[test_case(6; "threshold 6")]
#[test_case(10; "threshold 10")]
fn test_karatsuba_nineteen_digit_pair(threshold: usize) {
    let a = "1234567890123456789";
    let b = "9876543210987654321";
    let expected = (1234567890123456789u128 * 9876543210987654321u128).to_string();
    let steps = karatsuba_trace(a, b, threshold);
    assert_eq!(final_product(&steps), expected);
}

#[test]
fn test_karatsuba_standard_cases() {
    for config in standard_test_cases() {
        let steps = karatsuba_trace(&config.num1, &config.num2, config.threshold);
        let a: u128 = config.num1.parse().unwrap();
        let b: u128 = config.num2.parse().unwrap();
        assert_eq!(final_product(&steps), (a * b).to_string());
    }
}

#[test]
fn test_karatsuba_every_node_completes() {
    let steps = karatsuba_trace("12345678", "87654321", 2);
    assert_eq!(steps[0].kind(), StepKind::Init);
    assert_eq!(steps.last().unwrap().kind(), StepKind::Result);

    let tree = &steps.last().unwrap().tree;
    assert!(tree.validate().is_ok());
    for node in tree.iter() {
        assert!(node.is_completed(), "node {} unfinished", node.id());
        assert!(node.child_count() == 0 || node.child_count() == 3);
        let (a, b) = (&node.problem().a, &node.problem().b);
        let expected = a.parse::<u128>().unwrap() * b.parse::<u128>().unwrap();
        assert_eq!(node.result().map(str::to_string), Some(expected.to_string()));
    }

    let divides = steps.iter().filter(|s| s.kind() == StepKind::Divide).count();
    let combines = steps.iter().filter(|s| s.kind() == StepKind::Combine).count();
    assert_eq!(divides, combines);
    assert!(steps.iter().any(|s| matches!(s.event, Event::BaseCase { .. })));
}

#[test]
fn test_knapsack_matches_brute_force() {
    let config = KnapsackConfig::default();
    let (_, table) = fill_table(&config);
    let solution = reconstruct(&table, &config);
    assert_eq!(brute_force_knapsack(&config), 29);
    assert_eq!(solution.max_value, 29);
    assert!(solution.total_weight <= config.capacity);
}

#[test_case(Algorithm::Bubble)]
#[test_case(Algorithm::Quick)]
#[test_case(Algorithm::Merge)]
fn test_sort_final_snapshot_is_sorted(algorithm: Algorithm) {
    let input = [38, 27, 43, 3, 9, 82, 10, 3];
    let steps = algorithm.trace(&input);
    let last: Vec<i64> = steps.last().unwrap().array.iter().map(|e| e.value).collect();
    let mut expected = input.to_vec();
    expected.sort_unstable();
    assert_eq!(last, expected);
}

fn nine_node_graph() -> Graph {
    let edges = [
        ("a", "b", 4), ("a", "h", 8), ("b", "c", 8), ("b", "h", 11), ("c", "d", 7),
        ("c", "f", 4), ("c", "i", 2), ("d", "e", 9), ("d", "f", 14), ("e", "f", 10),
        ("f", "g", 2), ("g", "h", 1), ("g", "i", 6), ("h", "i", 7),
    ];
    Graph::new(
        ["a", "b", "c", "d", "e", "f", "g", "h", "i"],
        edges.iter().map(|&(u, v, w)| Edge::new(u, v, w)).collect(),
    )
}

#[test]
fn test_dijkstra_distances_on_nine_node_graph() {
    let graph = nine_node_graph();
    let (_, outcome) = dijkstra(&graph, "a", None).unwrap();
    let distances: Vec<u64> = outcome.distances.iter().map(|d| d.unwrap()).collect();
    assert_eq!(distances, vec![0, 4, 12, 19, 21, 11, 9, 8, 14]);
    assert_eq!(floyd_warshall(&graph)[0], outcome.distances);
}

#[test_case("a", "e", &["a", "h", "g", "f", "e"], 21)]
#[test_case("a", "i", &["a", "b", "c", "i"], 14)]
#[test_case("e", "e", &["e"], 0)]
fn test_dijkstra_route(start: &str, end: &str, route: &[&str], distance: u64) {
    let graph = nine_node_graph();
    let (steps, outcome) = dijkstra(&graph, start, Some(end)).unwrap();
    let ids: Vec<&str> = outcome.path.iter().map(|&i| graph.id(i)).collect();
    assert_eq!(ids, route);
    assert_eq!(outcome.distance, Some(distance));

    let last = steps.last().unwrap();
    let on_path = last.edges.iter().filter(|&&m| m == EdgeMark::Path).count();
    assert_eq!(on_path, route.len() - 1);
}

#[test]
fn test_spanning_tree_weight_on_nine_node_graph() {
    let graph = nine_node_graph();
    let (_, by_prim) = prim(&graph, "a").unwrap();
    let (_, by_kruskal) = kruskal(&graph).unwrap();
    assert_eq!(by_prim.total_weight, 37);
    assert_eq!(by_kruskal.total_weight, 37);
    assert_eq!(by_prim.edges.len(), 8);
    assert_eq!(by_kruskal.edges.len(), 8);
}
