// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Greedy best-first search

use super::{check_inputs, found, path_cost, Estimator, Heuristic, HeuristicSearch};
use crate::error::Result;
use crate::graph::Graph;
use crate::state::{walk_parents, PriorityFrontier, StepLog};
use crate::types::{format_cost, NodeId, Outcome, Step, StepAction, StepData};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Always expand the open node that looks closest to the goal
///
/// A node is opened at most once, so the result is fast but not optimal.
///
/// # Errors
///
/// Fails on unknown endpoints, negative weights, or nodes without coordinates.
pub fn greedy(graph: &Graph, start: &str, goal: &str, heuristic: &dyn Heuristic) -> Result<HeuristicSearch> {
    check_inputs(graph, start, goal, "greedy best-first")?;
    let estimator = Estimator::new(graph, goal, heuristic)?;
    debug!(heuristic = heuristic.name(), start, goal, "greedy run started");

    let mut log = StepLog::new();
    let mut frontier = PriorityFrontier::new();
    let mut opened: BTreeSet<NodeId> = BTreeSet::from([start.to_string()]);
    let mut closed: BTreeSet<NodeId> = BTreeSet::new();
    let mut parents: BTreeMap<NodeId, NodeId> = BTreeMap::new();
    let mut visit_order = Vec::new();

    let h0 = estimator.h(start);
    frontier.push(start.to_string(), h0, h0);
    log.push(
        Step::new(StepAction::Init, format!("Open {start} with h = {}", format_cost(h0)))
            .with_node(start)
            .with_frontier(frontier.snapshot())
            .with_data(StepData::Scores { g: 0.0, h: h0, f: h0 }),
    );

    while let Some(popped) = frontier.pop() {
        let node = popped.node;
        let h = popped.priority;
        closed.insert(node.clone());
        visit_order.push(node.clone());

        if node == goal {
            let path = walk_parents(&parents, goal);
            let cost = path_cost(graph, &path);
            log.push(
                Step::new(
                    StepAction::Goal,
                    format!("Reached {goal}: {} (cost {})", path.join(" → "), format_cost(cost)),
                )
                .with_node(node)
                .with_frontier(frontier.snapshot())
                .with_visited(closed.iter().cloned().collect())
                .with_data(StepData::Scores { g: cost, h, f: h }),
            );
            let g_scores = g_scores_along(graph, &parents, &closed);
            return Ok(HeuristicSearch {
                steps: log.into_steps(),
                outcome: found(&parents, goal, cost),
                visit_order,
                g_scores,
                parents,
            });
        }

        let mut visit = Step::new(
            StepAction::Visit,
            format!("Expand {node} (h = {})", format_cost(h)),
        )
        .with_node(node.clone())
        .with_frontier(frontier.snapshot())
        .with_visited(closed.iter().cloned().collect())
        .with_data(StepData::Scores { g: 0.0, h, f: h });
        if let Some(parent) = parents.get(&node) {
            visit = visit.with_from(parent.clone());
        }
        log.push(visit);

        for next in graph.neighbors(&node) {
            if closed.contains(&next) || !opened.insert(next.clone()) {
                continue;
            }
            let h_next = estimator.h(&next);
            parents.insert(next.clone(), node.clone());
            frontier.push(next.clone(), h_next, h_next);
            log.push(
                Step::new(
                    StepAction::Enqueue,
                    format!("Open {next} (h = {})", format_cost(h_next)),
                )
                .with_node(next)
                .with_from(node.clone())
                .with_frontier(frontier.snapshot())
                .with_data(StepData::Scores {
                    g: 0.0,
                    h: h_next,
                    f: h_next,
                }),
            );
        }
    }

    log.push(
        Step::new(
            StepAction::NoPath,
            format!("Open set exhausted; {goal} is unreachable from {start}"),
        )
        .with_visited(closed.iter().cloned().collect()),
    );
    let g_scores = g_scores_along(graph, &parents, &closed);
    Ok(HeuristicSearch {
        steps: log.into_steps(),
        outcome: Outcome::NoPath,
        visit_order,
        g_scores,
        parents,
    })
}

/// Cost of the tree path to each expanded node
fn g_scores_along(
    graph: &Graph,
    parents: &BTreeMap<NodeId, NodeId>,
    closed: &BTreeSet<NodeId>,
) -> BTreeMap<NodeId, f64> {
    closed
        .iter()
        .map(|node| {
            let path = walk_parents(parents, node);
            (node.clone(), path_cost(graph, &path))
        })
        .collect()
}
