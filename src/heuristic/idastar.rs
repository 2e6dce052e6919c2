// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Iterative deepening A*

use super::{check_inputs, Estimator, Heuristic, HeuristicSearch};
use crate::error::{Result, TraceError};
use crate::graph::Graph;
use crate::state::StepLog;
use crate::types::{format_cost, NodeId, Outcome, Step, StepAction, StepData};
use std::collections::BTreeMap;
use tracing::debug;

/// Node expansions allowed across all rounds of one run
pub const EXPANSION_LIMIT: usize = 50_000;

enum Probe {
    Found(f64),
    /// Smallest f that exceeded the bound, infinite when nothing did
    Exceeded(f64),
    /// The expansion budget ran out
    Exhausted,
}

struct Deepening<'a> {
    graph: &'a Graph,
    goal: &'a str,
    estimator: Estimator<'a>,
    log: StepLog,
    path: Vec<NodeId>,
    visit_order: Vec<NodeId>,
    g_scores: BTreeMap<NodeId, f64>,
    expansions: usize,
}

impl Deepening<'_> {
    fn probe(&mut self, node: &str, g: f64, bound: f64) -> Probe {
        let h = self.estimator.h(node);
        let f = g + h;
        let scores = StepData::Scores { g, h, f };
        let parent = self.path.iter().rev().nth(1).cloned();

        if f > bound {
            let mut step = Step::new(
                StepAction::Skip,
                format!(
                    "Prune {node}: f = {} exceeds bound {}",
                    format_cost(f),
                    format_cost(bound)
                ),
            )
            .with_node(node)
            .with_data(scores);
            if let Some(parent) = parent {
                step = step.with_from(parent);
            }
            self.log.push(step);
            return Probe::Exceeded(f);
        }

        self.expansions += 1;
        if self.expansions > EXPANSION_LIMIT {
            return Probe::Exhausted;
        }
        self.visit_order.push(node.to_string());
        let best = self.g_scores.entry(node.to_string()).or_insert(g);
        *best = best.min(g);

        let frontier = self
            .path
            .iter()
            .rev()
            .map(|n| crate::types::FrontierItem::plain(n.clone()))
            .collect();
        if node == self.goal {
            self.log.push(
                Step::new(
                    StepAction::Goal,
                    format!(
                        "Reached {node} with cost {}: {}",
                        format_cost(g),
                        self.path.join(" → ")
                    ),
                )
                .with_node(node)
                .with_frontier(frontier)
                .with_data(scores),
            );
            return Probe::Found(g);
        }

        let mut step = Step::new(
            StepAction::Visit,
            format!("Expand {node}: g = {}, f = {}", format_cost(g), format_cost(f)),
        )
        .with_node(node)
        .with_frontier(frontier)
        .with_data(scores);
        if let Some(parent) = parent {
            step = step.with_from(parent);
        }
        self.log.push(step);

        let mut smallest = f64::INFINITY;
        for (next, cost) in self.graph.weighted_neighbors(node) {
            // Only simple paths
            if self.path.contains(&next) {
                continue;
            }
            self.path.push(next.clone());
            match self.probe(&next, g + cost, bound) {
                Probe::Found(total) => return Probe::Found(total),
                Probe::Exhausted => return Probe::Exhausted,
                Probe::Exceeded(over) => smallest = smallest.min(over),
            }
            self.path.pop();
        }
        Probe::Exceeded(smallest)
    }
}

/// Depth-first probes bounded by `f = g + h`, raising the bound each round
///
/// # Errors
///
/// Fails on unknown endpoints, negative weights, nodes without coordinates,
/// or once the search expands more than [`EXPANSION_LIMIT`] nodes.
pub fn idastar(graph: &Graph, start: &str, goal: &str, heuristic: &dyn Heuristic) -> Result<HeuristicSearch> {
    check_inputs(graph, start, goal, "IDA*")?;
    let estimator = Estimator::new(graph, goal, heuristic)?;
    debug!(heuristic = heuristic.name(), start, goal, "IDA* run started");

    let mut bound = estimator.h(start);
    let mut search = Deepening {
        graph,
        goal,
        estimator,
        log: StepLog::new(),
        path: vec![start.to_string()],
        visit_order: Vec::new(),
        g_scores: BTreeMap::new(),
        expansions: 0,
    };
    search.log.push(
        Step::new(
            StepAction::Init,
            format!("Initial bound h({start}) = {}", format_cost(bound)),
        )
        .with_node(start)
        .with_data(StepData::Threshold { threshold: bound }),
    );

    let mut round = 0;
    let outcome = loop {
        round += 1;
        search.log.push(
            Step::new(
                StepAction::Iteration,
                format!("Round {round}: bound {}", format_cost(bound)),
            )
            .with_data(StepData::Threshold { threshold: bound }),
        );
        search.path.truncate(1);
        match search.probe(start, 0.0, bound) {
            Probe::Found(cost) => {
                break Outcome::PathFound {
                    path: search.path.clone(),
                    cost,
                };
            }
            Probe::Exceeded(next) if next.is_infinite() => {
                search.log.push(Step::new(
                    StepAction::NoPath,
                    format!("No pruned branch left; {goal} is unreachable from {start}"),
                ));
                break Outcome::NoPath;
            }
            Probe::Exceeded(next) => bound = next,
            Probe::Exhausted => {
                debug!(round, limit = EXPANSION_LIMIT, "IDA* expansion budget exhausted");
                return Err(TraceError::SearchLimit {
                    algorithm: "IDA*".to_string(),
                    limit: EXPANSION_LIMIT,
                });
            }
        }
    };

    // Tree parents along the found path
    let parents = match &outcome {
        Outcome::PathFound { path, .. } => path
            .windows(2)
            .map(|pair| (pair[1].clone(), pair[0].clone()))
            .collect(),
        _ => BTreeMap::new(),
    };
    Ok(HeuristicSearch {
        steps: search.log.into_steps(),
        outcome,
        visit_order: search.visit_order,
        g_scores: search.g_scores,
        parents,
    })
}
