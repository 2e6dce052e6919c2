// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Built-in lesson graphs

use crate::error::{Result, TraceError};
use crate::graph::Graph;
use crate::random::RandomGraph;
use crate::types::{Edge, Node};

/// Registered fixture names with a one-line description
pub const FIXTURES: &[(&str, &str)] = &[
    ("traversal", "10-node undirected tree-like graph for BFS/DFS (A-J)"),
    ("traversal-directed", "the traversal graph with one-way edges (a DAG)"),
    ("weighted", "8-node undirected weighted graph for shortest paths (A-H)"),
    ("heuristic", "9-node undirected grid with coordinates for A*, greedy, IDA*"),
    ("spanning", "5-node undirected weighted graph for Kruskal"),
    ("cyclic", "4-node directed graph with the cycle A -> B -> C -> A"),
    ("negative-cycle", "directed graph with the negative cycle B -> C -> B"),
    ("demo", "6-edge directed weighted graph from the graph theory lesson"),
    ("escape", "4-node directed escape-route graph, Bank (A) to Hideout (D)"),
    ("random", "6-node random weighted graph, seed 0 (see `graphsteps random`)"),
];

/// Look a fixture up by name
///
/// # Errors
///
/// Returns [`TraceError::UnknownFixture`] for unregistered names.
pub fn by_name(name: &str) -> Result<Graph> {
    match name {
        "traversal" => traversal(),
        "traversal-directed" => traversal_directed(),
        "weighted" => weighted(),
        "heuristic" => heuristic(),
        "spanning" => spanning(),
        "cyclic" => cyclic(),
        "negative-cycle" => negative_cycle(),
        "demo" => demo(),
        "escape" => escape(),
        "random" => RandomGraph::default().build(),
        other => Err(TraceError::UnknownFixture(other.to_string())),
    }
}

/// Goal used when a goal-requiring run names none
#[must_use]
pub fn default_goal(name: &str) -> Option<&'static str> {
    match name {
        "traversal" | "traversal-directed" => Some("J"),
        "weighted" | "heuristic" => Some("H"),
        "demo" => Some("E"),
        "cyclic" | "negative-cycle" | "escape" => Some("D"),
        _ => None,
    }
}

fn traversal_parts() -> (Vec<Node>, Vec<Edge>) {
    let nodes = vec![
        Node::at("A", 400.0, 80.0),
        Node::at("B", 200.0, 180.0),
        Node::at("C", 600.0, 180.0),
        Node::at("D", 100.0, 300.0),
        Node::at("E", 300.0, 300.0),
        Node::at("F", 500.0, 300.0),
        Node::at("G", 700.0, 300.0),
        Node::at("H", 150.0, 420.0),
        Node::at("I", 350.0, 420.0),
        Node::at("J", 550.0, 420.0),
    ];
    let edges = [
        ("A", "B"),
        ("A", "C"),
        ("B", "D"),
        ("B", "E"),
        ("C", "F"),
        ("C", "G"),
        ("D", "H"),
        ("E", "I"),
        ("F", "J"),
        ("E", "F"),
    ]
    .into_iter()
    .map(|(s, t)| Edge::new(s, t))
    .collect();
    (nodes, edges)
}

/// Unweighted traversal graph, default start `A`, goal `J`
///
/// # Errors
///
/// Never fails in practice; construction is validated.
pub fn traversal() -> Result<Graph> {
    let (nodes, edges) = traversal_parts();
    Graph::undirected(nodes, edges)
}

/// The traversal graph with one-way edges
///
/// # Errors
///
/// Never fails in practice; construction is validated.
pub fn traversal_directed() -> Result<Graph> {
    let (nodes, edges) = traversal_parts();
    Graph::directed(nodes, edges)
}

/// Weighted shortest-path graph, default start `A`, goal `H`
///
/// # Errors
///
/// Never fails in practice; construction is validated.
pub fn weighted() -> Result<Graph> {
    let nodes = vec![
        Node::at("A", 150.0, 150.0),
        Node::at("B", 300.0, 100.0),
        Node::at("C", 450.0, 150.0),
        Node::at("D", 300.0, 250.0),
        Node::at("E", 600.0, 100.0),
        Node::at("F", 750.0, 200.0),
        Node::at("G", 450.0, 350.0),
        Node::at("H", 600.0, 400.0),
    ];
    let edges = [
        ("A", "B", 4.0),
        ("A", "D", 2.0),
        ("B", "C", 3.0),
        ("B", "D", 1.0),
        ("C", "E", 2.0),
        ("D", "C", 5.0),
        ("D", "G", 7.0),
        ("E", "F", 1.0),
        ("G", "H", 3.0),
        ("C", "F", 6.0),
        ("F", "H", 2.0),
    ];
    Graph::undirected(nodes, weighted_edges(&edges))
}

/// Grid graph with coordinates, default start `A`, goal `H`
///
/// # Errors
///
/// Never fails in practice; construction is validated.
pub fn heuristic() -> Result<Graph> {
    let nodes = vec![
        Node::at("A", 0.0, 5.0),
        Node::at("B", 2.0, 2.0),
        Node::at("C", 2.0, 8.0),
        Node::at("D", 5.0, 1.0),
        Node::at("E", 5.0, 5.0),
        Node::at("F", 5.0, 9.0),
        Node::at("G", 8.0, 3.0),
        Node::at("H", 10.0, 5.0),
        Node::at("I", 8.0, 8.0),
    ];
    let edges = [
        ("A", "B", 3.0),
        ("A", "C", 5.0),
        ("B", "D", 4.0),
        ("B", "E", 3.0),
        ("C", "E", 2.0),
        ("C", "F", 4.0),
        ("D", "G", 5.0),
        ("E", "G", 4.0),
        ("E", "I", 3.0),
        ("F", "I", 3.0),
        ("G", "H", 2.0),
        ("I", "H", 4.0),
    ];
    Graph::undirected(nodes, weighted_edges(&edges))
}

/// Kruskal lesson graph
///
/// # Errors
///
/// Never fails in practice; construction is validated.
pub fn spanning() -> Result<Graph> {
    let nodes = ["A", "B", "C", "D", "E"].into_iter().map(Node::new).collect();
    let edges = [
        ("A", "B", 7.0),
        ("A", "D", 5.0),
        ("B", "C", 8.0),
        ("B", "D", 9.0),
        ("B", "E", 7.0),
        ("C", "E", 5.0),
        ("D", "E", 15.0),
    ];
    Graph::undirected(nodes, weighted_edges(&edges))
}

/// Directed graph containing a cycle
///
/// # Errors
///
/// Never fails in practice; construction is validated.
pub fn cyclic() -> Result<Graph> {
    let nodes = ["A", "B", "C", "D"].into_iter().map(Node::new).collect();
    let edges = vec![
        Edge::new("A", "B"),
        Edge::new("B", "C"),
        Edge::new("C", "A"),
        Edge::new("C", "D"),
    ];
    Graph::directed(nodes, edges)
}

/// Directed graph whose cycle `B -> C -> B` has total weight -1
///
/// # Errors
///
/// Never fails in practice; construction is validated.
pub fn negative_cycle() -> Result<Graph> {
    let nodes = ["A", "B", "C", "D"].into_iter().map(Node::new).collect();
    let edges = [
        ("A", "B", 1.0),
        ("B", "C", -2.0),
        ("C", "B", 1.0),
        ("A", "D", 4.0),
    ];
    Graph::directed(nodes, weighted_edges(&edges))
}

/// Small directed demo graph from the graph theory lesson
///
/// # Errors
///
/// Never fails in practice; construction is validated.
pub fn demo() -> Result<Graph> {
    let nodes = ["A", "B", "C", "D", "E"].into_iter().map(Node::new).collect();
    let edges = [
        ("A", "B", 4.0),
        ("A", "D", 2.0),
        ("B", "C", 3.0),
        ("B", "D", 1.0),
        ("C", "E", 2.0),
        ("D", "E", 5.0),
    ];
    Graph::directed(nodes, weighted_edges(&edges))
}

/// Escape-route graph: every road is one-way, weights are minutes
///
/// Three routes from the bank to the hideout take 9 minutes.
///
/// # Errors
///
/// Never fails in practice; construction is validated.
pub fn escape() -> Result<Graph> {
    let nodes = vec![
        Node::at("A", 70.0, 140.0).with_label("Bank"),
        Node::at("B", 190.0, 70.0).with_label("North"),
        Node::at("C", 190.0, 210.0).with_label("South"),
        Node::at("D", 310.0, 140.0).with_label("Hideout"),
    ];
    let edges = [
        ("A", "B", 5.0),
        ("A", "C", 3.0),
        ("B", "D", 4.0),
        ("C", "B", 2.0),
        ("C", "D", 6.0),
    ];
    Graph::directed(nodes, weighted_edges(&edges))
}

fn weighted_edges(edges: &[(&str, &str, f64)]) -> Vec<Edge> {
    edges
        .iter()
        .map(|&(s, t, w)| Edge::weighted(s, t, w))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_registered_fixture_builds() {
        for (name, _) in FIXTURES {
            let graph = by_name(name).unwrap();
            assert!(graph.node_count() > 0, "{name}");
        }
    }

    #[test]
    fn test_unknown_fixture() {
        assert_eq!(
            by_name("petersen").unwrap_err(),
            TraceError::UnknownFixture("petersen".into())
        );
    }

    #[test]
    fn test_heuristic_fixture_has_coordinates() {
        let graph = heuristic().unwrap();
        assert!(graph.nodes().iter().all(|n| n.coordinates.is_some()));
        assert_eq!(graph.edge_count(), 12);
    }

    #[test]
    fn test_default_goals_exist() {
        for (name, _) in FIXTURES {
            if let Some(goal) = default_goal(name) {
                assert!(by_name(name).unwrap().contains(goal), "{name}");
            }
        }
        assert_eq!(default_goal("spanning"), None);
    }

    #[test]
    fn test_escape_fixture_is_labelled() {
        let graph = escape().unwrap();
        assert!(graph.is_directed());
        assert_eq!(graph.node("A").unwrap().label.as_deref(), Some("Bank"));
        assert_eq!(graph.node("D").unwrap().label.as_deref(), Some("Hideout"));
        assert!(graph.to_dot().contains("xlabel=\"Hideout\""));
    }
}
