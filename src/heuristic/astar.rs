// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! A* search with a pluggable heuristic

use super::{check_inputs, found, Estimator, Heuristic, HeuristicSearch};
use crate::error::Result;
use crate::graph::Graph;
use crate::state::{PriorityFrontier, StepLog};
use crate::types::{format_cost, NodeId, Outcome, Step, StepAction, StepData};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Search from `start` to `goal` ordering the frontier by `f = g + weight·h`
///
/// With `weight = 1` and an admissible heuristic the path is optimal; with
/// `weight > 1` its cost is at most `weight` times the optimum.
///
/// # Errors
///
/// Fails on unknown endpoints, negative weights, or nodes without coordinates.
pub fn astar(
    graph: &Graph,
    start: &str,
    goal: &str,
    heuristic: &dyn Heuristic,
    weight: f64,
) -> Result<HeuristicSearch> {
    check_inputs(graph, start, goal, "A*")?;
    let estimator = Estimator::new(graph, goal, heuristic)?;
    debug!(heuristic = heuristic.name(), weight, start, goal, "A* run started");

    let mut log = StepLog::new();
    let mut frontier = PriorityFrontier::new();
    let mut g_scores: BTreeMap<NodeId, f64> = BTreeMap::from([(start.to_string(), 0.0)]);
    let mut parents: BTreeMap<NodeId, NodeId> = BTreeMap::new();
    let mut closed: BTreeSet<NodeId> = BTreeSet::new();
    let mut visit_order = Vec::new();

    let h0 = estimator.h(start);
    frontier.push(start.to_string(), weight * h0, 0.0);
    log.push(
        Step::new(
            StepAction::Init,
            format!("Open {start} with h = {} ({})", format_cost(h0), heuristic.name()),
        )
        .with_node(start)
        .with_frontier(frontier.snapshot())
        .with_data(StepData::Scores {
            g: 0.0,
            h: h0,
            f: weight * h0,
        }),
    );

    while let Some(popped) = frontier.pop() {
        let node = popped.node;
        let g = popped.cost;
        let best = g_scores.get(&node).copied().unwrap_or(f64::INFINITY);
        if closed.contains(&node) || g > best {
            log.push(
                Step::new(StepAction::Skip, format!("Skip stale entry {node}"))
                    .with_node(node)
                    .with_frontier(frontier.snapshot())
                    .with_visited(closed.iter().cloned().collect()),
            );
            continue;
        }

        closed.insert(node.clone());
        visit_order.push(node.clone());
        let h = estimator.h(&node);
        let scores = StepData::Scores {
            g,
            h,
            f: g + weight * h,
        };

        if node == goal {
            let outcome = found(&parents, goal, g);
            let path = outcome.path().map(|p| p.join(" → ")).unwrap_or_default();
            log.push(
                Step::new(
                    StepAction::Goal,
                    format!("Reached {goal} with cost {}: {path}", format_cost(g)),
                )
                .with_node(node)
                .with_frontier(frontier.snapshot())
                .with_visited(closed.iter().cloned().collect())
                .with_data(scores),
            );
            return Ok(HeuristicSearch {
                steps: log.into_steps(),
                outcome,
                visit_order,
                g_scores,
                parents,
            });
        }

        let mut visit = Step::new(
            StepAction::Visit,
            format!(
                "Expand {node}: g = {}, h = {}, f = {}",
                format_cost(g),
                format_cost(h),
                format_cost(g + weight * h)
            ),
        )
        .with_node(node.clone())
        .with_frontier(frontier.snapshot())
        .with_visited(closed.iter().cloned().collect())
        .with_data(scores);
        if let Some(parent) = parents.get(&node) {
            visit = visit.with_from(parent.clone());
        }
        log.push(visit);

        for (next, cost) in graph.weighted_neighbors(&node) {
            if closed.contains(&next) {
                continue;
            }
            let tentative = g + cost;
            if tentative < g_scores.get(&next).copied().unwrap_or(f64::INFINITY) {
                let h_next = estimator.h(&next);
                let f = tentative + weight * h_next;
                g_scores.insert(next.clone(), tentative);
                parents.insert(next.clone(), node.clone());
                frontier.push(next.clone(), f, tentative);
                log.push(
                    Step::new(
                        StepAction::Update,
                        format!(
                            "Open {next} via {node}: g = {}, h = {}, f = {}",
                            format_cost(tentative),
                            format_cost(h_next),
                            format_cost(f)
                        ),
                    )
                    .with_node(next)
                    .with_from(node.clone())
                    .with_frontier(frontier.snapshot())
                    .with_data(StepData::Scores {
                        g: tentative,
                        h: h_next,
                        f,
                    }),
                );
            }
        }
    }

    log.push(
        Step::new(
            StepAction::NoPath,
            format!("Open set exhausted; {goal} is unreachable from {start}"),
        )
        .with_visited(closed.iter().cloned().collect()),
    );
    Ok(HeuristicSearch {
        steps: log.into_steps(),
        outcome: Outcome::NoPath,
        visit_order,
        g_scores,
        parents,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::heuristic::{Chebyshev, Euclidean, Manhattan, WEIGHTED_FACTOR};
    use crate::selector::AStarVariant;
    use crate::types::{Edge, Node};

    fn expected_path() -> Vec<NodeId> {
        ["A", "B", "E", "G", "H"].map(String::from).to_vec()
    }

    #[test]
    fn test_every_variant_finds_cost_twelve() {
        let graph = fixtures::heuristic().unwrap();
        for variant in AStarVariant::ALL {
            let (h, w) = variant.heuristic();
            let run = astar(&graph, "A", "H", h.as_ref(), w).unwrap();
            assert_eq!(
                run.outcome,
                Outcome::PathFound {
                    path: expected_path(),
                    cost: 12.0
                },
                "{variant}"
            );
        }
    }

    #[test]
    fn test_goal_is_last_expansion() {
        let graph = fixtures::heuristic().unwrap();
        let run = astar(&graph, "A", "H", &Chebyshev, 1.0).unwrap();
        assert_eq!(run.visit_order.first().map(String::as_str), Some("A"));
        assert_eq!(run.visit_order.last().map(String::as_str), Some("H"));
        assert_eq!(run.steps.last().unwrap().action, StepAction::Goal);
    }

    #[test]
    fn test_weighted_expands_no_more_than_plain() {
        let graph = fixtures::heuristic().unwrap();
        let plain = astar(&graph, "A", "H", &Manhattan, 1.0).unwrap();
        let weighted = astar(&graph, "A", "H", &Manhattan, WEIGHTED_FACTOR).unwrap();
        assert!(weighted.visit_order.len() <= plain.visit_order.len());
    }

    #[test]
    fn test_start_equals_goal() {
        let graph = fixtures::heuristic().unwrap();
        let run = astar(&graph, "E", "E", &Euclidean, 1.0).unwrap();
        assert_eq!(
            run.outcome,
            Outcome::PathFound {
                path: vec!["E".into()],
                cost: 0.0
            }
        );
    }

    #[test]
    fn test_unreachable_goal() {
        let graph = Graph::undirected(
            vec![Node::at("A", 0.0, 0.0), Node::at("B", 1.0, 0.0), Node::at("C", 5.0, 5.0)],
            vec![Edge::weighted("A", "B", 1.0)],
        )
        .unwrap();
        let run = astar(&graph, "A", "C", &Manhattan, 1.0).unwrap();
        assert_eq!(run.outcome, Outcome::NoPath);
        assert_eq!(run.steps.last().unwrap().action, StepAction::NoPath);
    }

    #[test]
    fn test_requires_coordinates() {
        let graph = fixtures::weighted().unwrap();
        assert!(astar(&graph, "A", "H", &Manhattan, 1.0).is_ok());
        let graph = fixtures::spanning().unwrap();
        assert!(astar(&graph, "A", "E", &Manhattan, 1.0).is_err());
    }
}
