//! Property tests: recorded answers agree with reference computations

use proptest::prelude::*;
use rand::{rngs::StdRng, SeedableRng};
use trace_replay::bigint::{add, multiply, subtract};
use trace_replay::graph::{dijkstra, kruskal, prim, random_graph};
use trace_replay::karatsuba::{build_trace, KaratsubaConfig, StepKind};
use trace_replay::knapsack::{fill_table, reconstruct, Item, KnapsackConfig};
use trace_replay::sorting::Algorithm;
use test_helpers::*;

fn items() -> impl Strategy<Value = Vec<Item>> {
    proptest::collection::vec((1usize..=8, 0u64..=30), 1..=8).prop_map(|raw| {
        raw.into_iter()
            .enumerate()
            .map(|(i, (weight, value))| Item::new(format!("Item {}", i + 1), weight, value))
            .collect()
    })
}

proptest! {
    #[test]
    fn karatsuba_matches_u128(a in 0u64..=u64::MAX, b in 0u64..=u64::MAX, threshold in 1usize..=10) {
        let steps = build_trace(&KaratsubaConfig::new(a.to_string(), b.to_string(), threshold))
            .expect("valid config");
        prop_assert_eq!(final_product(&steps), (a as u128 * b as u128).to_string());
        prop_assert_eq!(steps[0].kind(), StepKind::Init);
        prop_assert!(steps.last().expect("non-empty").tree.validate().is_ok());
    }

    #[test]
    fn bigint_ops_match_u128(a in 0u64..=u64::MAX, b in 0u64..=u64::MAX) {
        let (sa, sb) = (a.to_string(), b.to_string());
        prop_assert_eq!(add(&sa, &sb), (a as u128 + b as u128).to_string());
        prop_assert_eq!(multiply(&sa, &sb), (a as u128 * b as u128).to_string());
        let diff = subtract(&sa, &sb);
        prop_assert_eq!(diff.to_string(), (a as i128 - b as i128).to_string());
    }

    #[test]
    fn knapsack_matches_brute_force(capacity in 1usize..=20, items in items()) {
        let config = KnapsackConfig::new(capacity, items);
        let (steps, table) = fill_table(&config);
        let solution = reconstruct(&table, &config);

        prop_assert_eq!(steps.len(), config.items.len() * (capacity + 1));
        prop_assert_eq!(solution.max_value, brute_force_knapsack(&config));
        prop_assert!(solution.total_weight <= capacity);
        let value: u64 = solution.items.iter().map(|item| item.value).sum();
        prop_assert_eq!(value, solution.max_value);
    }

    #[test]
    fn sorts_produce_sorted_permutations(
        values in proptest::collection::vec(-50i64..50, 1..24),
        algorithm in prop_oneof![Just(Algorithm::Bubble), Just(Algorithm::Quick), Just(Algorithm::Merge)],
    ) {
        let steps = algorithm.trace(&values);
        let mut expected = values.clone();
        expected.sort_unstable();
        for step in &steps {
            prop_assert_eq!(step.array.len(), values.len());
        }
        let last: Vec<i64> = steps.last().expect("non-empty").array.iter().map(|e| e.value).collect();
        prop_assert_eq!(last, expected);
    }

    #[test]
    fn dijkstra_matches_floyd_warshall(seed in any::<u64>(), nodes in 1usize..=8, start in 0usize..8) {
        let graph = random_graph(nodes, 0.4, &mut StdRng::seed_from_u64(seed));
        let source = start % nodes;
        let reference = floyd_warshall(&graph);
        let (steps, outcome) = dijkstra(&graph, &graph.nodes[source].id, None).expect("valid graph");
        prop_assert_eq!(&outcome.distances, &reference[source]);
        for step in &steps {
            prop_assert_eq!(step.nodes.len(), nodes);
            prop_assert_eq!(step.edges.len(), graph.edges.len());
        }
    }

    #[test]
    fn spanning_trees_have_minimum_weight(seed in any::<u64>(), nodes in 1usize..=5) {
        let graph = random_graph(nodes, 0.5, &mut StdRng::seed_from_u64(seed));
        let (_, by_kruskal) = kruskal(&graph).expect("valid graph");
        prop_assert_eq!(by_kruskal.total_weight, brute_force_forest_weight(&graph));

        let (_, by_prim) = prim(&graph, &graph.nodes[0].id).expect("valid graph");
        prop_assert_eq!(by_prim.connected, by_kruskal.connected);
        if by_prim.connected {
            prop_assert_eq!(by_prim.total_weight, by_kruskal.total_weight);
            prop_assert_eq!(by_prim.edges.len(), nodes - 1);
        }
    }
}
