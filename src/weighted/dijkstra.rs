// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Dijkstra single-source shortest paths

use super::{describe_distances, finite_distances, reject_negative_weights};
use crate::error::Result;
use crate::graph::Graph;
use crate::selector::DijkstraVariant;
use crate::state::{PriorityFrontier, StepLog};
use crate::types::{format_cost, NodeId, Step, StepAction, StepData};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Result of a Dijkstra run
#[derive(Debug, Clone, Default)]
pub struct ShortestPaths {
    /// Source node
    pub start: NodeId,
    /// Recorded transitions
    pub steps: Vec<Step>,
    /// Final distances of reachable nodes
    pub distances: BTreeMap<NodeId, f64>,
    /// Shortest-path predecessors; empty for the standard variant
    pub predecessors: BTreeMap<NodeId, Vec<NodeId>>,
    /// Settle order
    pub visit_order: Vec<NodeId>,
}

impl ShortestPaths {
    /// Distance to a node, `None` if unreachable
    #[must_use]
    pub fn distance_to(&self, target: &str) -> Option<f64> {
        self.distances.get(target).copied()
    }

    /// One shortest path, following the first recorded predecessor
    #[must_use]
    pub fn path_to(&self, target: &str) -> Option<Vec<NodeId>> {
        if !self.distances.contains_key(target) {
            return None;
        }
        let mut path = vec![target.to_string()];
        let mut current = target;
        while current != self.start {
            let pred = self.predecessors.get(current)?.first()?;
            if path.contains(pred) {
                return None;
            }
            path.push(pred.clone());
            current = pred;
        }
        path.reverse();
        Some(path)
    }

    /// Every shortest path to `target`, sorted
    #[must_use]
    pub fn all_paths_to(&self, target: &str) -> Vec<Vec<NodeId>> {
        let mut out = Vec::new();
        if self.distances.contains_key(target) {
            let mut suffix = Vec::new();
            self.collect_paths(target, &mut suffix, &mut out);
        }
        out.sort();
        out
    }

    fn collect_paths(&self, node: &str, suffix: &mut Vec<NodeId>, out: &mut Vec<Vec<NodeId>>) {
        suffix.push(node.to_string());
        if node == self.start {
            out.push(suffix.iter().rev().cloned().collect());
        } else if let Some(preds) = self.predecessors.get(node) {
            for pred in preds {
                self.collect_paths(pred, suffix, out);
            }
        }
        suffix.pop();
    }
}

/// Run Dijkstra from `start`
///
/// # Errors
///
/// Returns [`TraceError::NegativeWeight`](crate::error::TraceError) before
/// doing anything if an edge weight is negative, or
/// [`TraceError::UnknownNode`](crate::error::TraceError) for an unknown start.
#[allow(clippy::float_cmp)]
pub fn dijkstra(graph: &Graph, start: &str, variant: DijkstraVariant) -> Result<ShortestPaths> {
    graph.require(start)?;
    reject_negative_weights(graph, "dijkstra")?;
    debug!(%variant, start, "dijkstra run started");

    let track_predecessors = variant != DijkstraVariant::Standard;
    let mut log = StepLog::new();
    let mut dist: BTreeMap<NodeId, f64> = BTreeMap::new();
    let mut predecessors: BTreeMap<NodeId, Vec<NodeId>> = BTreeMap::new();
    let mut visited: BTreeSet<NodeId> = BTreeSet::new();
    let mut visit_order = Vec::new();
    let mut frontier = PriorityFrontier::new();

    dist.insert(start.to_string(), 0.0);
    frontier.push(start.to_string(), 0.0, 0.0);
    log.push(
        Step::new(StepAction::Init, format!("Set distance of {start} to 0"))
            .with_node(start)
            .with_frontier(frontier.snapshot())
            .with_data(StepData::Distance { distance: 0.0 }),
    );

    while let Some(popped) = frontier.pop() {
        let node = popped.node;
        let d = popped.cost;
        let best = dist.get(&node).copied().unwrap_or(f64::INFINITY);
        if visited.contains(&node) || d > best {
            log.push(
                Step::new(
                    StepAction::Skip,
                    format!("Skip stale entry {node} ({})", format_cost(d)),
                )
                .with_node(node)
                .with_frontier(frontier.snapshot())
                .with_visited(visited.iter().cloned().collect()),
            );
            continue;
        }

        visited.insert(node.clone());
        visit_order.push(node.clone());
        let mut visit = Step::new(
            StepAction::Visit,
            format!("Visit {node} (distance {})", format_cost(d)),
        )
        .with_node(node.clone())
        .with_frontier(frontier.snapshot())
        .with_visited(visited.iter().cloned().collect())
        .with_data(StepData::Distance { distance: d });
        if let Some(pred) = predecessors.get(&node).and_then(|p| p.first()) {
            visit = visit.with_from(pred.clone());
        }
        log.push(visit);

        for (next, weight) in graph.weighted_neighbors(&node) {
            if visited.contains(&next) {
                continue;
            }
            let candidate = d + weight;
            let current = dist.get(&next).copied().unwrap_or(f64::INFINITY);
            if candidate < current {
                dist.insert(next.clone(), candidate);
                if track_predecessors {
                    predecessors.insert(next.clone(), vec![node.clone()]);
                }
                frontier.push(next.clone(), candidate, candidate);
                log.push(
                    Step::new(
                        StepAction::Relax,
                        format!(
                            "Relax {node} → {next}: {} → {}",
                            format_cost(current),
                            format_cost(candidate)
                        ),
                    )
                    .with_node(next)
                    .with_from(node.clone())
                    .with_frontier(frontier.snapshot())
                    .with_visited(visited.iter().cloned().collect())
                    .with_data(StepData::Distance { distance: candidate }),
                );
            } else if candidate == current && variant == DijkstraVariant::AllPaths {
                let preds = predecessors.entry(next.clone()).or_default();
                if !preds.contains(&node) {
                    preds.push(node.clone());
                    log.push(
                        Step::new(
                            StepAction::Update,
                            format!(
                                "Tie: {node} → {next} also reaches {next} at {}",
                                format_cost(candidate)
                            ),
                        )
                        .with_node(next)
                        .with_from(node.clone())
                        .with_frontier(frontier.snapshot())
                        .with_visited(visited.iter().cloned().collect())
                        .with_data(StepData::Distance { distance: candidate }),
                    );
                }
            }
        }
    }

    log.push(
        Step::new(
            StepAction::Done,
            format!("All reachable nodes settled: {}", describe_distances(graph, &dist)),
        )
        .with_visited(visited.iter().cloned().collect()),
    );

    Ok(ShortestPaths {
        start: start.to_string(),
        steps: log.into_steps(),
        distances: finite_distances(&dist),
        predecessors,
        visit_order,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TraceError;
    use crate::fixtures;
    use crate::types::{Edge, Node};

    fn make_square() -> Graph {
        Graph::undirected(
            ["A", "B", "C", "D"].into_iter().map(Node::new).collect(),
            vec![
                Edge::weighted("A", "B", 1.0),
                Edge::weighted("A", "C", 1.0),
                Edge::weighted("B", "D", 1.0),
                Edge::weighted("C", "D", 1.0),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_weighted_fixture_distances() {
        let graph = fixtures::weighted().unwrap();
        let run = dijkstra(&graph, "A", DijkstraVariant::Standard).unwrap();
        let expected = [
            ("A", 0.0),
            ("B", 3.0),
            ("C", 6.0),
            ("D", 2.0),
            ("E", 8.0),
            ("F", 9.0),
            ("G", 9.0),
            ("H", 11.0),
        ];
        for (node, d) in expected {
            assert_eq!(run.distance_to(node), Some(d), "{node}");
        }
        assert_eq!(run.visit_order, vec!["A", "D", "B", "C", "E", "G", "F", "H"]);
        assert!(run.predecessors.is_empty());
    }

    #[test]
    fn test_path_reconstruction() {
        let graph = fixtures::weighted().unwrap();
        let run = dijkstra(&graph, "A", DijkstraVariant::PathReconstruction).unwrap();
        assert_eq!(
            run.path_to("H").unwrap(),
            vec!["A", "D", "B", "C", "E", "F", "H"]
        );
        assert_eq!(run.path_to("A").unwrap(), vec!["A"]);
    }

    #[test]
    fn test_all_paths_records_ties() {
        let run = dijkstra(&make_square(), "A", DijkstraVariant::AllPaths).unwrap();
        assert_eq!(run.predecessors["D"], vec!["B", "C"]);
        assert_eq!(
            run.all_paths_to("D"),
            vec![vec!["A", "B", "D"], vec!["A", "C", "D"]]
        );
        assert!(run.steps.iter().any(|s| s.action == StepAction::Update));
    }

    #[test]
    fn test_path_variant_keeps_single_predecessor() {
        let run = dijkstra(&make_square(), "A", DijkstraVariant::PathReconstruction).unwrap();
        assert_eq!(run.predecessors["D"], vec!["B"]);
    }

    #[test]
    fn test_unreachable_nodes_are_absent() {
        let graph = Graph::directed(
            ["A", "B", "C"].into_iter().map(Node::new).collect(),
            vec![Edge::weighted("A", "B", 2.0)],
        )
        .unwrap();
        let run = dijkstra(&graph, "A", DijkstraVariant::PathReconstruction).unwrap();
        assert_eq!(run.distance_to("C"), None);
        assert_eq!(run.path_to("C"), None);
        assert_eq!(run.steps.last().unwrap().action, StepAction::Done);
    }

    #[test]
    fn test_rejects_negative_weights() {
        let graph = fixtures::negative_cycle().unwrap();
        let err = dijkstra(&graph, "A", DijkstraVariant::Standard).unwrap_err();
        assert!(matches!(err, TraceError::NegativeWeight { weight, .. } if weight == -2.0));
    }

    #[test]
    fn test_skips_stale_entries() {
        let graph = fixtures::weighted().unwrap();
        let run = dijkstra(&graph, "A", DijkstraVariant::Standard).unwrap();
        // B is queued at 4 then improved to 3 through D
        assert!(run
            .steps
            .iter()
            .any(|s| s.action == StepAction::Skip && s.node.as_deref() == Some("B")));
    }
}
