// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Trace generation benchmarks
//!
//! Measures:
//! - Full trace generation per algorithm family on the lesson fixtures
//! - Scaling of Dijkstra and Floyd-Warshall on larger grid graphs

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use graphsteps::fixtures;
use graphsteps::generator::generate;
use graphsteps::graph::Graph;
use graphsteps::selector::Selection;
use graphsteps::types::{Edge, Node};

// =============================================================================
// Helpers
// =============================================================================

/// `side × side` grid with coordinates and weights from the cell position
fn grid(side: usize) -> Graph {
    let id = |r: usize, c: usize| format!("R{r}C{c}");
    let mut nodes = Vec::with_capacity(side * side);
    let mut edges = Vec::new();
    for r in 0..side {
        for c in 0..side {
            #[allow(clippy::cast_precision_loss)]
            nodes.push(Node::at(id(r, c), c as f64, r as f64));
            #[allow(clippy::cast_precision_loss)]
            let weight = ((r * 7 + c * 3) % 5 + 1) as f64;
            if c + 1 < side {
                edges.push(Edge::weighted(id(r, c), id(r, c + 1), weight));
            }
            if r + 1 < side {
                edges.push(Edge::weighted(id(r, c), id(r + 1, c), weight));
            }
        }
    }
    Graph::undirected(nodes, edges).expect("grid is valid")
}

// =============================================================================
// Lesson Fixtures
// =============================================================================

fn bench_fixture_traces(c: &mut Criterion) {
    let cases = [
        ("bfs", Some("levels"), None),
        ("dfs", Some("timestamps"), None),
        ("dijkstra", Some("all-paths"), Some("H")),
        ("bellman-ford", Some("spfa"), None),
        ("floyd-warshall", Some("path-reconstruction"), Some("H")),
        ("astar", Some("euclidean"), Some("H")),
        ("idastar", None, Some("H")),
        ("kruskal", None, None),
    ];
    let mut group = c.benchmark_group("fixture_trace");
    for (algorithm, variant, goal) in cases {
        let selection = Selection::parse(algorithm, variant).expect("known selector");
        let graph = fixtures::by_name(selection.algorithm().default_fixture()).expect("fixture");
        group.bench_function(selection.to_string(), |b| {
            b.iter(|| black_box(generate(&graph, selection, "A", goal)));
        });
    }
    group.finish();
}

// =============================================================================
// Scaling
// =============================================================================

fn bench_grid_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("grid_scaling");
    for side in [4usize, 8, 16] {
        let graph = grid(side);
        let goal = format!("R{0}C{0}", side - 1);
        group.throughput(Throughput::Elements(graph.node_count() as u64));

        let dijkstra = Selection::parse("dijkstra", Some("path-reconstruction")).expect("selector");
        group.bench_with_input(BenchmarkId::new("dijkstra", side), &graph, |b, g| {
            b.iter(|| black_box(generate(g, dijkstra, "R0C0", Some(&goal))));
        });

        let astar = Selection::parse("astar", Some("manhattan")).expect("selector");
        group.bench_with_input(BenchmarkId::new("astar", side), &graph, |b, g| {
            b.iter(|| black_box(generate(g, astar, "R0C0", Some(&goal))));
        });

        if side <= 8 {
            let floyd = Selection::parse("floyd-warshall", None).expect("selector");
            group.bench_with_input(BenchmarkId::new("floyd-warshall", side), &graph, |b, g| {
                b.iter(|| black_box(generate(g, floyd, "R0C0", None)));
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_fixture_traces, bench_grid_scaling);
criterion_main!(benches);
