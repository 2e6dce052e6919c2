// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Full trace generation for any selection

use crate::error::{Result, TraceError};
use crate::graph::Graph;
use crate::heuristic::{self, Manhattan};
use crate::mst;
use crate::selector::{
    BellmanFordVariant, DijkstraVariant, FloydWarshallVariant, Selection,
};
use crate::traversal::{run_to_completion, BfsStepper, DfsStepper, Stepper};
use crate::types::{NodeId, Outcome, Step, StepAction, Summary};
use crate::weighted;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Complete output of one run
#[derive(Debug, Clone, Serialize)]
pub struct Trace {
    /// Algorithm and variant
    pub selection: Selection,
    /// Start node
    pub start: NodeId,
    /// Goal node, when given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goal: Option<NodeId>,
    /// Ordered transitions
    pub steps: Vec<Step>,
    /// Terminal result
    pub outcome: Outcome,
    /// Derived tables
    pub summary: Summary,
}

impl Trace {
    /// Nodes of `visit` and `goal` steps in order
    #[must_use]
    pub fn replay_visit_order(&self) -> Vec<NodeId> {
        self.steps
            .iter()
            .filter(|s| matches!(s.action, StepAction::Visit | StepAction::Goal))
            .filter_map(|s| s.node.clone())
            .collect()
    }

    /// SHA-256 hex digest of the serialized steps
    #[must_use]
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for step in &self.steps {
            // Step serialization cannot fail: every field is plain data
            if let Ok(bytes) = serde_json::to_vec(step) {
                hasher.update(&bytes);
            }
            hasher.update(b"\n");
        }
        hex::encode(hasher.finalize())
    }
}

/// Check endpoints and goal requirements before any run state is touched
///
/// # Errors
///
/// Returns [`TraceError::UnknownNode`] or [`TraceError::MissingGoal`].
pub fn validate(graph: &Graph, selection: Selection, start: &str, goal: Option<&str>) -> Result<()> {
    graph.require(start)?;
    if let Some(goal) = goal {
        graph.require(goal)?;
    } else if selection.requires_goal() {
        return Err(TraceError::MissingGoal(selection.to_string()));
    }
    Ok(())
}

/// Stepper for incremental selections, `None` for batch ones
#[must_use]
pub fn stepper_for(selection: Selection, start: &str, goal: Option<&str>) -> Option<Box<dyn Stepper>> {
    match selection {
        Selection::Bfs(variant) => Some(Box::new(BfsStepper::new(
            variant,
            start,
            goal.map(String::from),
        ))),
        Selection::Dfs(variant) => Some(Box::new(DfsStepper::new(variant, start))),
        _ => None,
    }
}

/// Produce the full trace for a selection
///
/// # Errors
///
/// Fails on unknown endpoints, a missing goal, negative weights for
/// Dijkstra and the informed searches, and missing coordinates for the
/// informed searches.
pub fn generate(graph: &Graph, selection: Selection, start: &str, goal: Option<&str>) -> Result<Trace> {
    validate(graph, selection, start, goal)?;
    info!(%selection, start, goal, "generating trace");

    let (steps, outcome, summary) = match selection {
        Selection::Bfs(_) | Selection::Dfs(_) => match stepper_for(selection, start, goal) {
            Some(mut stepper) => run_to_completion(stepper.as_mut(), graph),
            None => (Vec::new(), Outcome::Completed, Summary::default()),
        },
        Selection::Dijkstra(variant) => shortest_paths(graph, variant, start, goal)?,
        Selection::BellmanFord(variant) => negative_weights(graph, variant, start, goal)?,
        Selection::FloydWarshall(variant) => all_pairs(graph, variant, start, goal),
        Selection::AStar(variant) => {
            let (h, weight) = variant.heuristic();
            let goal = required(selection, goal)?;
            informed(heuristic::astar(graph, start, goal, h.as_ref(), weight)?)
        }
        Selection::Greedy => {
            let goal = required(selection, goal)?;
            informed(heuristic::greedy(graph, start, goal, &Manhattan)?)
        }
        Selection::IdaStar => {
            let goal = required(selection, goal)?;
            informed(heuristic::idastar(graph, start, goal, &Manhattan)?)
        }
        Selection::Kruskal => {
            let result = mst::kruskal(graph);
            let outcome = result.outcome();
            (result.steps, outcome, Summary::default())
        }
    };

    debug!(steps = steps.len(), ?outcome, "trace generated");
    Ok(Trace {
        selection,
        start: start.to_string(),
        goal: goal.map(String::from),
        steps,
        outcome,
        summary,
    })
}

type Parts = (Vec<Step>, Outcome, Summary);

fn required(selection: Selection, goal: Option<&str>) -> Result<&str> {
    goal.ok_or_else(|| TraceError::MissingGoal(selection.to_string()))
}

fn path_outcome(path: Option<Vec<NodeId>>, cost: Option<f64>) -> Outcome {
    match (path, cost) {
        (Some(path), Some(cost)) => Outcome::PathFound { path, cost },
        _ => Outcome::NoPath,
    }
}

fn shortest_paths(
    graph: &Graph,
    variant: DijkstraVariant,
    start: &str,
    goal: Option<&str>,
) -> Result<Parts> {
    let run = weighted::dijkstra(graph, start, variant)?;
    let outcome = match (variant, goal) {
        (DijkstraVariant::Standard, _) | (_, None) => Outcome::Completed,
        (_, Some(goal)) => path_outcome(run.path_to(goal), run.distance_to(goal)),
    };
    let parents: BTreeMap<NodeId, NodeId> = run
        .predecessors
        .iter()
        .filter_map(|(node, preds)| preds.first().map(|p| (node.clone(), p.clone())))
        .collect();
    let all_paths = match (variant, goal) {
        (DijkstraVariant::AllPaths, Some(goal)) => run.all_paths_to(goal),
        _ => Vec::new(),
    };
    let predecessors = if variant == DijkstraVariant::AllPaths {
        run.predecessors.clone()
    } else {
        BTreeMap::new()
    };
    let summary = Summary {
        visit_order: run.visit_order.clone(),
        distances: run.distances.clone(),
        parents,
        predecessors,
        all_paths,
        ..Summary::default()
    };
    Ok((run.steps, outcome, summary))
}

fn negative_weights(
    graph: &Graph,
    variant: BellmanFordVariant,
    start: &str,
    goal: Option<&str>,
) -> Result<Parts> {
    let run = weighted::bellman_ford(graph, start, variant)?;
    if let Some((from, to)) = run.negative_cycle.clone() {
        // No distance table on a negative cycle
        let summary = Summary {
            visit_order: run.visit_order,
            ..Summary::default()
        };
        return Ok((run.steps, Outcome::NegativeCycle { from, to }, summary));
    }
    let outcome = match goal {
        Some(goal) => path_outcome(run.path_to(goal), run.distances.get(goal).copied()),
        None => Outcome::Completed,
    };
    let summary = Summary {
        visit_order: run.visit_order.clone(),
        distances: run.distances.clone(),
        parents: run.parents.clone(),
        ..Summary::default()
    };
    Ok((run.steps, outcome, summary))
}

fn all_pairs(graph: &Graph, variant: FloydWarshallVariant, start: &str, goal: Option<&str>) -> Parts {
    let run = weighted::floyd_warshall(graph, variant);
    if variant == FloydWarshallVariant::TransitiveClosure {
        let summary = Summary {
            reachability: Some(run.reach.clone()),
            ..Summary::default()
        };
        return (run.steps, Outcome::Completed, summary);
    }

    let negative = run
        .nodes
        .iter()
        .enumerate()
        .find(|(i, _)| run.dist[*i][*i] < 0.0)
        .map(|(_, node)| node.clone());
    if let Some(node) = negative {
        // No distance table on a negative cycle
        let outcome = Outcome::NegativeCycle {
            from: node.clone(),
            to: node,
        };
        return (run.steps, outcome, Summary::default());
    }

    let distances = graph
        .node_ids()
        .filter_map(|to| run.distance(start, to).map(|d| (to.to_string(), d)))
        .collect();
    let summary = Summary {
        distances,
        matrix: Some(run.matrix()),
        ..Summary::default()
    };
    let outcome = match (variant, goal) {
        (FloydWarshallVariant::PathReconstruction, Some(goal)) => {
            path_outcome(run.path(start, goal), run.distance(start, goal))
        }
        _ => Outcome::Completed,
    };
    (run.steps, outcome, summary)
}

fn informed(run: heuristic::HeuristicSearch) -> Parts {
    let summary = Summary {
        visit_order: run.visit_order,
        distances: run.g_scores,
        parents: run.parents,
        ..Summary::default()
    };
    (run.steps, run.outcome, summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::selector::{AStarVariant, BfsVariant, DfsVariant};

    #[test]
    fn test_missing_goal_rejected_before_run() {
        let graph = fixtures::traversal().unwrap();
        let err = generate(&graph, Selection::Bfs(BfsVariant::ShortestPath), "A", None).unwrap_err();
        assert_eq!(err, TraceError::MissingGoal("bfs/shortest-path".into()));
    }

    #[test]
    fn test_unknown_endpoints_rejected() {
        let graph = fixtures::traversal().unwrap();
        let sel = Selection::Bfs(BfsVariant::Standard);
        assert_eq!(
            generate(&graph, sel, "Z", None).unwrap_err(),
            TraceError::UnknownNode("Z".into())
        );
        assert_eq!(
            generate(&graph, sel, "A", Some("Q")).unwrap_err(),
            TraceError::UnknownNode("Q".into())
        );
    }

    #[test]
    fn test_replay_matches_summary_for_every_family() {
        let cases = [
            ("traversal", Selection::Bfs(BfsVariant::Levels), "A", None),
            ("traversal", Selection::Dfs(DfsVariant::Recursive), "A", None),
            ("weighted", Selection::Dijkstra(DijkstraVariant::Standard), "A", None),
            ("heuristic", Selection::AStar(AStarVariant::Manhattan), "A", Some("H")),
            ("heuristic", Selection::Greedy, "A", Some("H")),
            ("heuristic", Selection::IdaStar, "A", Some("H")),
        ];
        for (fixture, selection, start, goal) in cases {
            let graph = fixtures::by_name(fixture).unwrap();
            let trace = generate(&graph, selection, start, goal).unwrap();
            assert_eq!(trace.replay_visit_order(), trace.summary.visit_order, "{selection}");
            assert!(trace.steps.iter().enumerate().all(|(i, s)| s.index == i));
        }
    }

    #[test]
    fn test_dijkstra_path_variant_reports_path() {
        let graph = fixtures::weighted().unwrap();
        let trace = generate(
            &graph,
            Selection::Dijkstra(DijkstraVariant::PathReconstruction),
            "A",
            Some("H"),
        )
        .unwrap();
        assert!(matches!(trace.outcome, Outcome::PathFound { cost, .. } if cost == 11.0));
        assert_eq!(trace.summary.distances["H"], 11.0);
    }

    #[test]
    fn test_negative_cycle_has_no_distance_table() {
        let graph = fixtures::negative_cycle().unwrap();
        let trace = generate(
            &graph,
            Selection::BellmanFord(BellmanFordVariant::CycleDetection),
            "A",
            None,
        )
        .unwrap();
        assert!(matches!(trace.outcome, Outcome::NegativeCycle { .. }));
        assert!(trace.summary.distances.is_empty());
    }

    #[test]
    fn test_floyd_warshall_summary() {
        let graph = fixtures::weighted().unwrap();
        let trace = generate(
            &graph,
            Selection::FloydWarshall(FloydWarshallVariant::PathReconstruction),
            "A",
            Some("H"),
        )
        .unwrap();
        assert_eq!(trace.summary.matrix.as_ref().unwrap().get("A", "H"), Some(11.0));
        assert_eq!(trace.outcome.path().unwrap().len(), 7);
    }

    #[test]
    fn test_kruskal_outcome() {
        let graph = fixtures::spanning().unwrap();
        let trace = generate(&graph, Selection::Kruskal, "A", None).unwrap();
        assert!(matches!(
            trace.outcome,
            Outcome::SpanningTree { total_weight, .. } if total_weight == 24.0
        ));
    }

    #[test]
    fn test_fingerprint_is_deterministic() {
        let graph = fixtures::weighted().unwrap();
        let sel = Selection::Dijkstra(DijkstraVariant::AllPaths);
        let a = generate(&graph, sel, "A", Some("H")).unwrap();
        let b = generate(&graph, sel, "A", Some("H")).unwrap();
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.fingerprint().len(), 64);
        let c = generate(&graph, sel, "B", Some("H")).unwrap();
        assert_ne!(a.fingerprint(), c.fingerprint());
    }
}
