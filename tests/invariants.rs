// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Invariant tests for the step generators
//!
//! Random small graphs are checked against petgraph's own algorithms:
//! 1. BFS path length equals the minimum edge count
//! 2. Dijkstra, Bellman-Ford and Floyd-Warshall agree on distances
//! 3. Kruskal picks `V - components` edges of minimum total weight
//! 4. Cycle detection and topological order agree with petgraph
//! 5. Traces are deterministic and incremental runs match batch runs

use graphsteps::generator::generate;
use graphsteps::graph::Graph;
use graphsteps::mst::kruskal;
use graphsteps::runner::RunnerContext;
use graphsteps::selector::{
    BellmanFordVariant, BfsVariant, DfsVariant, DijkstraVariant, FloydWarshallVariant, Selection,
};
use graphsteps::types::{Edge, Node, NodeId, Outcome};
use graphsteps::weighted::{bellman_ford, dijkstra, floyd_warshall};
use petgraph::algo;
use petgraph::data::Element;
use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;
use proptest::prelude::*;
use std::collections::BTreeMap;

// =============================================================================
// Test Helpers
// =============================================================================

fn id(i: usize) -> NodeId {
    format!("N{i}")
}

fn arb_graph(directed: bool) -> impl Strategy<Value = Graph> {
    (2usize..8).prop_flat_map(move |n| {
        prop::collection::vec((0..n, 0..n, 1u8..10), 0..n * 2).prop_map(move |raw| {
            let nodes = (0..n).map(|i| Node::new(id(i))).collect();
            let edges = raw
                .into_iter()
                .filter(|(a, b, _)| a != b)
                .map(|(a, b, w)| Edge::weighted(id(a), id(b), f64::from(w)))
                .collect();
            Graph::new(nodes, edges, directed).unwrap()
        })
    })
}

/// petgraph's Dijkstra over the same backing graph
fn oracle_distances(graph: &Graph, start: usize, unit: bool) -> BTreeMap<NodeId, f64> {
    let g = graph.as_petgraph();
    algo::dijkstra(g, NodeIndex::new(start), None, |e| if unit { 1.0 } else { *e.weight() })
        .into_iter()
        .map(|(idx, d)| (g[idx].clone(), d))
        .collect()
}

// =============================================================================
// Shortest Paths
// =============================================================================

proptest! {
    #[test]
    fn bfs_path_length_is_minimum_edge_count(graph in arb_graph(true)) {
        let goal = id(graph.node_count() - 1);
        let trace = generate(&graph, Selection::Bfs(BfsVariant::ShortestPath), "N0", Some(&goal)).unwrap();
        let oracle = oracle_distances(&graph, 0, true);
        match (&trace.outcome, oracle.get(&goal)) {
            (Outcome::PathFound { path, cost }, Some(hops)) => {
                prop_assert_eq!(cost, hops);
                prop_assert_eq!(path.len() as f64, hops + 1.0);
            }
            (Outcome::NoPath, None) => {}
            (outcome, hops) => prop_assert!(false, "outcome {:?} vs oracle {:?}", outcome, hops),
        }
    }

    #[test]
    fn bidirectional_bfs_finds_a_real_path(graph in arb_graph(true)) {
        let goal = id(graph.node_count() - 1);
        let trace = generate(&graph, Selection::Bfs(BfsVariant::Bidirectional), "N0", Some(&goal)).unwrap();
        let oracle = oracle_distances(&graph, 0, true);
        match (&trace.outcome, oracle.get(&goal)) {
            (Outcome::PathFound { path, cost }, Some(hops)) => {
                prop_assert!(cost >= hops);
                prop_assert_eq!(*cost, (path.len() - 1) as f64);
                prop_assert_eq!(path.first(), Some(&id(0)));
                prop_assert_eq!(path.last(), Some(&goal));
                for pair in path.windows(2) {
                    prop_assert!(graph.weight_between(&pair[0], &pair[1]).is_some());
                }
            }
            (Outcome::NoPath, None) => {}
            (outcome, hops) => prop_assert!(false, "outcome {:?} vs oracle {:?}", outcome, hops),
        }
    }

    #[test]
    fn dijkstra_matches_bellman_ford_and_petgraph(graph in arb_graph(true)) {
        let ours = dijkstra(&graph, "N0", DijkstraVariant::Standard).unwrap();
        let relaxed = bellman_ford(&graph, "N0", BellmanFordVariant::Standard).unwrap();
        let queued = bellman_ford(&graph, "N0", BellmanFordVariant::Spfa).unwrap();
        prop_assert_eq!(&ours.distances, &relaxed.distances);
        prop_assert_eq!(&ours.distances, &queued.distances);
        prop_assert_eq!(ours.distances, oracle_distances(&graph, 0, false));
    }

    #[test]
    fn floyd_warshall_matches_dijkstra_from_every_node(graph in arb_graph(true)) {
        let all = floyd_warshall(&graph, FloydWarshallVariant::Standard);
        for from in graph.node_ids() {
            let single = dijkstra(&graph, from, DijkstraVariant::Standard).unwrap();
            for to in graph.node_ids() {
                prop_assert_eq!(all.distance(from, to), single.distance_to(to));
            }
        }
    }

    #[test]
    fn transitive_closure_matches_reachability(graph in arb_graph(true)) {
        let closure = floyd_warshall(&graph, FloydWarshallVariant::TransitiveClosure);
        for (i, from) in graph.node_ids().enumerate() {
            let reachable = oracle_distances(&graph, i, true);
            for to in graph.node_ids() {
                prop_assert_eq!(closure.reachable(from, to), Some(reachable.contains_key(to)));
            }
        }
    }

    #[test]
    fn reconstructed_paths_cost_their_distance(graph in arb_graph(false)) {
        let run = dijkstra(&graph, "N0", DijkstraVariant::PathReconstruction).unwrap();
        for (node, distance) in &run.distances {
            let path = run.path_to(node).unwrap();
            let cost: f64 = path
                .windows(2)
                .map(|w| graph.weight_between(&w[0], &w[1]).unwrap())
                .sum();
            prop_assert!(cost >= *distance);
            prop_assert_eq!(path.first().map(String::as_str), Some("N0"));
        }
    }
}

// =============================================================================
// Spanning Forest and Cycles
// =============================================================================

proptest! {
    #[test]
    fn kruskal_matches_petgraph_forest(graph in arb_graph(false)) {
        let result = kruskal(&graph);
        let components = algo::connected_components(graph.as_petgraph());
        prop_assert_eq!(result.components, components);
        prop_assert_eq!(result.edges.len(), graph.node_count() - components);

        let oracle: f64 = algo::min_spanning_tree(graph.as_petgraph())
            .filter_map(|element| match element {
                Element::Edge { weight, .. } => Some(weight),
                Element::Node { .. } => None,
            })
            .sum();
        prop_assert_eq!(result.total_weight, oracle);
    }

    #[test]
    fn cycle_detection_agrees_with_petgraph(graph in arb_graph(true)) {
        let trace = generate(&graph, Selection::Dfs(DfsVariant::CycleDetection), "N0", None).unwrap();
        let cyclic = algo::is_cyclic_directed(graph.as_petgraph());
        prop_assert_eq!(matches!(trace.outcome, Outcome::CycleDetected { .. }), cyclic);
        if let Outcome::CycleDetected { from, to } = &trace.outcome {
            prop_assert!(graph.weight_between(from, to).is_some());
        }
    }

    #[test]
    fn topological_order_respects_every_edge(graph in arb_graph(true)) {
        let trace = generate(&graph, Selection::Dfs(DfsVariant::Topological), "N0", None).unwrap();
        if algo::toposort(graph.as_petgraph(), None).is_err() {
            prop_assert!(matches!(trace.outcome, Outcome::CyclicInput { .. }), "{:?}", trace.outcome);
            return Ok(());
        }
        let order = &trace.summary.topological_order;
        prop_assert_eq!(order.len(), graph.node_count());
        let position = |n: &str| order.iter().position(|o| o == n).unwrap();
        for edge in graph.as_petgraph().edge_references() {
            let g = graph.as_petgraph();
            prop_assert!(position(&g[edge.source()]) < position(&g[edge.target()]));
        }
    }
}

// =============================================================================
// Determinism and Drive Modes
// =============================================================================

proptest! {
    #[test]
    fn traces_are_deterministic(graph in arb_graph(false)) {
        for selection in [
            Selection::Bfs(BfsVariant::Components),
            Selection::Dfs(DfsVariant::Timestamps),
            Selection::Dijkstra(DijkstraVariant::AllPaths),
            Selection::Kruskal,
        ] {
            let a = generate(&graph, selection, "N0", None).unwrap();
            let b = generate(&graph, selection, "N0", None).unwrap();
            prop_assert_eq!(a.fingerprint(), b.fingerprint());
            prop_assert_eq!(a.replay_visit_order(), a.summary.visit_order.clone());
        }
    }

    #[test]
    fn incremental_runs_match_batch_traces(graph in arb_graph(true)) {
        for selection in [Selection::Bfs(BfsVariant::Levels), Selection::Dfs(DfsVariant::Recursive)] {
            let batch = generate(&graph, selection, "N0", None).unwrap();
            let mut ctx = RunnerContext::new(graph.clone(), selection, "N0", None).unwrap();
            let mut steps = Vec::new();
            while let Some(step) = ctx.step().unwrap() {
                steps.push(step);
            }
            prop_assert_eq!(&steps, &batch.steps);
            prop_assert_eq!(ctx.outcome(), Some(batch.outcome.clone()));
        }
    }
}
