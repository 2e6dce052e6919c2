// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! End-to-end lesson scenarios on the built-in fixtures

use graphsteps::fixtures;
use graphsteps::prelude::*;
use graphsteps::runner::RunnerContext;
use graphsteps::selector::{
    AStarVariant, BellmanFordVariant, BfsVariant, DfsVariant, DijkstraVariant,
    FloydWarshallVariant,
};

fn ids(list: &[&str]) -> Vec<NodeId> {
    list.iter().map(|s| (*s).to_string()).collect()
}

fn run(fixture: &str, selection: Selection, start: &str, goal: Option<&str>) -> Trace {
    let graph = fixtures::by_name(fixture).unwrap();
    generate(&graph, selection, start, goal).unwrap()
}

// =============================================================================
// Traversal
// =============================================================================

#[test]
fn test_bfs_visits_level_by_level() {
    let trace = run("traversal-directed", Selection::Bfs(BfsVariant::Standard), "A", None);
    assert_eq!(
        trace.summary.visit_order,
        ids(&["A", "B", "C", "D", "E", "F", "G", "H", "I", "J"])
    );
    assert_eq!(trace.outcome, Outcome::Completed);
}

#[test]
fn test_bfs_levels_group_nodes() {
    let trace = run("traversal", Selection::Bfs(BfsVariant::Levels), "A", None);
    assert_eq!(trace.summary.levels["A"], 0);
    assert_eq!(trace.summary.levels["C"], 1);
    assert_eq!(trace.summary.levels["F"], 2);
    assert_eq!(trace.summary.levels["J"], 3);
}

#[test]
fn test_dfs_topological_order_on_dag() {
    let graph = fixtures::traversal_directed().unwrap();
    let trace = generate(&graph, Selection::Dfs(DfsVariant::Topological), "A", None).unwrap();
    let order = &trace.summary.topological_order;
    assert_eq!(order.len(), 10);
    assert_eq!(order.first().map(String::as_str), Some("A"));
    let pos = |n: &str| order.iter().position(|o| o == n).unwrap();
    for edge in graph.edges() {
        assert!(pos(&edge.source) < pos(&edge.target), "{} -> {}", edge.source, edge.target);
    }
}

#[test]
fn test_cycle_detection_and_topological_refusal() {
    let detected = run("cyclic", Selection::Dfs(DfsVariant::CycleDetection), "A", None);
    assert_eq!(
        detected.outcome,
        Outcome::CycleDetected {
            from: "C".into(),
            to: "A".into()
        }
    );
    let topo = run("cyclic", Selection::Dfs(DfsVariant::Topological), "A", None);
    assert!(matches!(topo.outcome, Outcome::CyclicInput { .. }));
    assert!(topo.summary.topological_order.is_empty());
}

#[test]
fn test_unreachable_goal_is_an_outcome_not_an_error() {
    let trace = run("traversal-directed", Selection::Bfs(BfsVariant::ShortestPath), "J", Some("A"));
    assert_eq!(trace.outcome, Outcome::NoPath);
    assert_eq!(trace.steps.last().unwrap().action, StepAction::NoPath);
}

// =============================================================================
// Weighted Shortest Paths
// =============================================================================

#[test]
fn test_dijkstra_lesson_distances() {
    let trace = run("weighted", Selection::Dijkstra(DijkstraVariant::Standard), "A", None);
    let expected = [
        ("A", 0.0),
        ("D", 2.0),
        ("B", 3.0),
        ("C", 6.0),
        ("E", 8.0),
        ("F", 9.0),
        ("G", 9.0),
        ("H", 11.0),
    ];
    for (node, distance) in expected {
        assert_eq!(trace.summary.distances[node], distance, "{node}");
    }
}

#[test]
fn test_escape_route_takes_nine_minutes() {
    let fastest = run("escape", Selection::Dijkstra(DijkstraVariant::PathReconstruction), "A", Some("D"));
    assert_eq!(
        fastest.outcome,
        Outcome::PathFound {
            path: ids(&["A", "C", "D"]),
            cost: 9.0
        }
    );

    let every = run("escape", Selection::Dijkstra(DijkstraVariant::AllPaths), "A", Some("D"));
    assert_eq!(every.summary.distances["D"], 9.0);
    assert_eq!(
        every.summary.all_paths,
        vec![ids(&["A", "B", "D"]), ids(&["A", "C", "B", "D"]), ids(&["A", "C", "D"])]
    );
}

#[test]
fn test_random_fixture_is_reproducible() {
    let a = run("random", Selection::Dijkstra(DijkstraVariant::Standard), "A", None);
    let b = run("random", Selection::Dijkstra(DijkstraVariant::Standard), "A", None);
    assert_eq!(a.fingerprint(), b.fingerprint());
}

#[test]
fn test_every_weighted_algorithm_agrees_on_the_lesson_graph() {
    let dijkstra = run("weighted", Selection::Dijkstra(DijkstraVariant::Standard), "A", None);
    let bellman = run("weighted", Selection::BellmanFord(BellmanFordVariant::Spfa), "A", None);
    let floyd = run("weighted", Selection::FloydWarshall(FloydWarshallVariant::Standard), "A", None);
    assert_eq!(dijkstra.summary.distances, bellman.summary.distances);
    assert_eq!(dijkstra.summary.distances, floyd.summary.distances);
}

#[test]
fn test_negative_cycle_reported_by_bellman_ford_and_floyd_warshall() {
    let bellman = run("negative-cycle", Selection::BellmanFord(BellmanFordVariant::CycleDetection), "A", None);
    assert!(matches!(bellman.outcome, Outcome::NegativeCycle { .. }));
    assert!(bellman.summary.distances.is_empty());
    let floyd = run("negative-cycle", Selection::FloydWarshall(FloydWarshallVariant::Standard), "A", None);
    assert!(matches!(floyd.outcome, Outcome::NegativeCycle { .. }));
    assert!(floyd.summary.distances.is_empty());
    assert!(floyd.summary.matrix.is_none());
}

#[test]
fn test_dijkstra_refuses_negative_weights() {
    let graph = fixtures::negative_cycle().unwrap();
    let err = generate(&graph, Selection::Dijkstra(DijkstraVariant::Standard), "A", None).unwrap_err();
    assert!(matches!(err, TraceError::NegativeWeight { .. }));
}

// =============================================================================
// Informed Search and Spanning Trees
// =============================================================================

#[test]
fn test_astar_heuristics_find_the_optimal_route() {
    for variant in [AStarVariant::Manhattan, AStarVariant::Euclidean, AStarVariant::Chebyshev] {
        let trace = run("heuristic", Selection::AStar(variant), "A", Some("H"));
        assert_eq!(
            trace.outcome,
            Outcome::PathFound {
                path: ids(&["A", "B", "E", "G", "H"]),
                cost: 12.0
            },
            "{variant}"
        );
    }
}

#[test]
fn test_informed_search_without_coordinates_fails() {
    let err = fixtures::spanning()
        .and_then(|g| generate(&g, Selection::Greedy, "A", Some("E")))
        .unwrap_err();
    assert_eq!(err, TraceError::MissingCoordinates("A".into()));
}

#[test]
fn test_kruskal_lesson_tree() {
    let trace = run("spanning", Selection::Kruskal, "A", None);
    let Outcome::SpanningTree { edges, total_weight } = trace.outcome else {
        panic!("expected a spanning tree");
    };
    assert_eq!(edges.len(), 4);
    assert_eq!(total_weight, 24.0);
}

// =============================================================================
// Runner
// =============================================================================

#[test]
fn test_single_step_matches_full_trace() {
    let graph = fixtures::traversal().unwrap();
    let selection = Selection::parse("dfs", Some("timestamps")).unwrap();
    let expected = generate(&graph, selection, "A", None).unwrap();

    let mut ctx = RunnerContext::new(graph, selection, "A", None).unwrap();
    let mut steps = Vec::new();
    while let Some(step) = ctx.step().unwrap() {
        steps.push(step);
    }
    assert_eq!(steps, expected.steps);
    assert_eq!(expected.summary.discovery["A"], 1);
    assert_eq!(expected.summary.finish["A"], 20);
}

#[test]
fn test_selection_change_blocked_while_running() {
    let graph = fixtures::weighted().unwrap();
    let mut ctx = RunnerContext::new(graph, Selection::Kruskal, "A", None).unwrap();
    ctx.start().unwrap();
    assert_eq!(ctx.select(Selection::default_for(Algorithm::Bfs)), Err(TraceError::RunInProgress));
    ctx.reset();
    assert!(ctx.select(Selection::default_for(Algorithm::Bfs)).is_ok());
}
