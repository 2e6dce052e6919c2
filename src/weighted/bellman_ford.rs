// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Bellman-Ford shortest paths with negative weights

use super::{describe_distances, finite_distances};
use crate::error::Result;
use crate::graph::Graph;
use crate::selector::BellmanFordVariant;
use crate::state::{walk_parents, StepLog};
use crate::types::{format_cost, NodeId, Step, StepAction, StepData};
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use tracing::debug;

/// Result of a Bellman-Ford run
#[derive(Debug, Clone, Default)]
pub struct BellmanFordRun {
    /// Recorded transitions
    pub steps: Vec<Step>,
    /// Final distances of reachable nodes
    pub distances: BTreeMap<NodeId, f64>,
    /// Last relaxing predecessor of each node
    pub parents: BTreeMap<NodeId, NodeId>,
    /// Edge still relaxable after V-1 passes, when checked
    pub negative_cycle: Option<(NodeId, NodeId)>,
    /// Nodes taken from the SPFA work queue, in order
    pub visit_order: Vec<NodeId>,
    /// Relaxation passes performed (standard and cycle-detection)
    pub passes: usize,
}

impl BellmanFordRun {
    /// Path from the start through recorded parents
    #[must_use]
    pub fn path_to(&self, target: &str) -> Option<Vec<NodeId>> {
        if self.negative_cycle.is_some() || !self.distances.contains_key(target) {
            return None;
        }
        Some(walk_parents(&self.parents, target))
    }
}

struct Relaxer<'a> {
    graph: &'a Graph,
    log: StepLog,
    dist: BTreeMap<NodeId, f64>,
    parents: BTreeMap<NodeId, NodeId>,
}

impl Relaxer<'_> {
    fn distance(&self, node: &str) -> f64 {
        self.dist.get(node).copied().unwrap_or(f64::INFINITY)
    }

    /// Whether `from -> to` would improve `to`
    fn improves(&self, from: &str, to: &str, weight: f64) -> Option<f64> {
        let base = self.distance(from);
        if base.is_infinite() {
            return None;
        }
        let candidate = base + weight;
        (candidate < self.distance(to)).then_some(candidate)
    }

    fn relax(&mut self, from: &str, to: &str, candidate: f64, iteration: usize) {
        let previous = self.distance(to);
        self.dist.insert(to.to_string(), candidate);
        self.parents.insert(to.to_string(), from.to_string());
        self.log.push(
            Step::new(
                StepAction::Relax,
                format!(
                    "Relax {from} → {to}: {} → {}",
                    format_cost(previous),
                    format_cost(candidate)
                ),
            )
            .with_node(to)
            .with_from(from)
            .with_data(StepData::Relaxation {
                iteration,
                distance: candidate,
            }),
        );
    }

    fn report_cycle(&mut self, from: &str, to: &str) {
        self.log.push(
            Step::new(
                StepAction::Cycle,
                format!("Edge {from} → {to} still relaxes: negative cycle reachable from the start"),
            )
            .with_node(to)
            .with_from(from),
        );
    }
}

/// Run Bellman-Ford from `start`
///
/// # Errors
///
/// Returns [`TraceError::UnknownNode`](crate::error::TraceError) for an unknown start.
pub fn bellman_ford(
    graph: &Graph,
    start: &str,
    variant: BellmanFordVariant,
) -> Result<BellmanFordRun> {
    graph.require(start)?;
    debug!(%variant, start, "bellman-ford run started");

    let mut relaxer = Relaxer {
        graph,
        log: StepLog::new(),
        dist: BTreeMap::from([(start.to_string(), 0.0)]),
        parents: BTreeMap::new(),
    };
    relaxer.log.push(
        Step::new(
            StepAction::Init,
            format!("Set distance of {start} to 0, every other node to ∞"),
        )
        .with_node(start)
        .with_data(StepData::Distance { distance: 0.0 }),
    );

    let (negative_cycle, visit_order, passes) = match variant {
        BellmanFordVariant::Standard => {
            let passes = relax_passes(&mut relaxer);
            (None, Vec::new(), passes)
        }
        BellmanFordVariant::CycleDetection => {
            let passes = relax_passes(&mut relaxer);
            let offending = relaxer
                .graph
                .arcs()
                .into_iter()
                .find(|(u, v, w)| relaxer.improves(u, v, *w).is_some())
                .map(|(u, v, _)| (u, v));
            match &offending {
                Some((u, v)) => relaxer.report_cycle(u, v),
                None => relaxer.log.push(Step::new(
                    StepAction::Iteration,
                    "Check pass: no edge relaxes, no negative cycle",
                )),
            }
            (offending, Vec::new(), passes)
        }
        BellmanFordVariant::Spfa => {
            let (offending, order) = spfa(&mut relaxer, start);
            (offending, order, 0)
        }
    };

    let message = match &negative_cycle {
        Some(_) => "Stopped: distances are undefined on a negative cycle".to_string(),
        None => format!(
            "Final distances: {}",
            describe_distances(graph, &relaxer.dist)
        ),
    };
    relaxer.log.push(Step::new(StepAction::Done, message));

    Ok(BellmanFordRun {
        steps: relaxer.log.into_steps(),
        distances: finite_distances(&relaxer.dist),
        parents: relaxer.parents,
        negative_cycle,
        visit_order,
        passes,
    })
}

/// Up to V-1 passes over every arc, stopping after a pass with no change
fn relax_passes(relaxer: &mut Relaxer<'_>) -> usize {
    let arcs = relaxer.graph.arcs();
    let limit = relaxer.graph.node_count().saturating_sub(1);
    let mut passes = 0;

    for pass in 1..=limit {
        passes = pass;
        relaxer
            .log
            .push(Step::new(StepAction::Iteration, format!("Pass {pass} of {limit}")));
        let mut changed = false;
        for (u, v, w) in &arcs {
            if let Some(candidate) = relaxer.improves(u, v, *w) {
                relaxer.relax(u, v, candidate, pass);
                changed = true;
            }
        }
        if !changed {
            relaxer.log.push(Step::new(
                StepAction::Skip,
                format!("No distance changed in pass {pass}; stopping early"),
            ));
            break;
        }
    }
    passes
}

/// Queue-based relaxation; a path of V edges means a negative cycle
fn spfa(relaxer: &mut Relaxer<'_>, start: &str) -> (Option<(NodeId, NodeId)>, Vec<NodeId>) {
    let node_count = relaxer.graph.node_count();
    let mut queue = VecDeque::from([start.to_string()]);
    let mut queued = BTreeSet::from([start.to_string()]);
    let mut hops: BTreeMap<NodeId, usize> = BTreeMap::from([(start.to_string(), 0)]);
    let mut order = Vec::new();
    let mut round = 0;

    while let Some(node) = queue.pop_front() {
        queued.remove(&node);
        order.push(node.clone());
        round += 1;
        relaxer.log.push(
            Step::new(StepAction::Visit, format!("Process {node}"))
                .with_node(node.clone())
                .with_frontier(
                    queue
                        .iter()
                        .map(|n| crate::types::FrontierItem::keyed(n.clone(), relaxer.distance(n)))
                        .collect(),
                )
                .with_data(StepData::Distance {
                    distance: relaxer.distance(&node),
                }),
        );

        for (next, weight) in relaxer.graph.weighted_neighbors(&node) {
            let Some(candidate) = relaxer.improves(&node, &next, weight) else {
                continue;
            };
            let depth = hops.get(&node).copied().unwrap_or(0) + 1;
            if depth >= node_count {
                relaxer.report_cycle(&node, &next);
                return (Some((node, next)), order);
            }
            hops.insert(next.clone(), depth);
            relaxer.relax(&node, &next, candidate, round);
            if queued.insert(next.clone()) {
                queue.push_back(next.clone());
                relaxer.log.push(
                    Step::new(StepAction::Enqueue, format!("Enqueue {next}"))
                        .with_node(next)
                        .with_from(node.clone()),
                );
            }
        }
    }
    (None, order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::selector::DijkstraVariant;
    use crate::weighted::dijkstra;

    #[test]
    fn test_matches_dijkstra_on_weighted_fixture() {
        let graph = fixtures::weighted().unwrap();
        let reference = dijkstra(&graph, "A", DijkstraVariant::Standard).unwrap();
        for variant in BellmanFordVariant::ALL {
            let run = bellman_ford(&graph, "A", *variant).unwrap();
            assert_eq!(run.distances, reference.distances, "{variant}");
            assert!(run.negative_cycle.is_none());
        }
    }

    #[test]
    fn test_stops_early_when_nothing_changes() {
        let graph = fixtures::weighted().unwrap();
        let run = bellman_ford(&graph, "A", BellmanFordVariant::Standard).unwrap();
        assert!(run.passes < graph.node_count() - 1);
        assert!(run
            .steps
            .iter()
            .any(|s| s.action == StepAction::Skip && s.message.contains("stopping early")));
    }

    #[test]
    fn test_negative_weights_without_cycle() {
        let graph = Graph::directed(
            ["S", "A", "B"].into_iter().map(crate::types::Node::new).collect(),
            vec![
                crate::types::Edge::weighted("S", "A", 4.0),
                crate::types::Edge::weighted("S", "B", 5.0),
                crate::types::Edge::weighted("B", "A", -3.0),
            ],
        )
        .unwrap();
        let run = bellman_ford(&graph, "S", BellmanFordVariant::CycleDetection).unwrap();
        assert_eq!(run.distances["A"], 2.0);
        assert_eq!(run.path_to("A").unwrap(), vec!["S", "B", "A"]);
        assert!(run.negative_cycle.is_none());
    }

    #[test]
    fn test_cycle_detection_reports_edge() {
        let graph = fixtures::negative_cycle().unwrap();
        let run = bellman_ford(&graph, "A", BellmanFordVariant::CycleDetection).unwrap();
        let (from, to) = run.negative_cycle.clone().unwrap();
        assert!(["B", "C"].contains(&from.as_str()));
        assert!(["B", "C"].contains(&to.as_str()));
        assert!(run.steps.iter().any(|s| s.action == StepAction::Cycle));
        assert_eq!(run.path_to("D"), None);
    }

    #[test]
    fn test_standard_variant_does_not_check() {
        let graph = fixtures::negative_cycle().unwrap();
        let run = bellman_ford(&graph, "A", BellmanFordVariant::Standard).unwrap();
        assert!(run.negative_cycle.is_none());
        assert_eq!(run.passes, 3);
    }

    #[test]
    fn test_spfa_terminates_on_negative_cycle() {
        let graph = fixtures::negative_cycle().unwrap();
        let run = bellman_ford(&graph, "A", BellmanFordVariant::Spfa).unwrap();
        assert!(run.negative_cycle.is_some());
        assert_eq!(run.visit_order.first().map(String::as_str), Some("A"));
    }

    #[test]
    fn test_unreachable_nodes_are_absent() {
        let graph = fixtures::demo().unwrap();
        let run = bellman_ford(&graph, "C", BellmanFordVariant::Spfa).unwrap();
        assert_eq!(run.distances.len(), 2);
        assert_eq!(run.distances["E"], 2.0);
    }
}
