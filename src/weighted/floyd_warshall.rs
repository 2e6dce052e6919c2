// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Floyd-Warshall all-pairs shortest paths and transitive closure

use crate::graph::Graph;
use crate::selector::FloydWarshallVariant;
use crate::state::StepLog;
use crate::types::{format_cost, DistanceMatrix, NodeId, Step, StepAction, StepData};
use tracing::debug;

/// Result of a Floyd-Warshall run; matrices are indexed in graph order
#[derive(Debug, Clone, Default)]
pub struct FloydWarshallRun {
    /// Row and column labels
    pub nodes: Vec<NodeId>,
    /// Recorded transitions
    pub steps: Vec<Step>,
    /// Distance matrix; empty for transitive closure
    pub dist: Vec<Vec<f64>>,
    /// Next-hop matrix; only filled by path reconstruction
    pub next: Vec<Vec<Option<usize>>>,
    /// Reachability matrix; only filled by transitive closure
    pub reach: Vec<Vec<bool>>,
    /// A diagonal entry went negative
    pub negative_cycle: bool,
}

impl FloydWarshallRun {
    fn index(&self, id: &str) -> Option<usize> {
        self.nodes.iter().position(|n| n == id)
    }

    /// Shortest distance, `None` when unreachable or undefined by a negative cycle
    #[must_use]
    pub fn distance(&self, from: &str, to: &str) -> Option<f64> {
        if self.negative_cycle {
            return None;
        }
        let d = *self.dist.get(self.index(from)?)?.get(self.index(to)?)?;
        d.is_finite().then_some(d)
    }

    /// Whether `to` is reachable from `from` in the closure
    #[must_use]
    pub fn reachable(&self, from: &str, to: &str) -> Option<bool> {
        self.reach.get(self.index(from)?)?.get(self.index(to)?).copied()
    }

    /// Rebuild a path from the next-hop matrix
    #[must_use]
    pub fn path(&self, from: &str, to: &str) -> Option<Vec<NodeId>> {
        if self.negative_cycle {
            return None;
        }
        let (mut i, j) = (self.index(from)?, self.index(to)?);
        self.next.get(i)?.get(j).copied().flatten()?;
        let mut path = vec![self.nodes[i].clone()];
        while i != j {
            i = self.next[i][j]?;
            path.push(self.nodes[i].clone());
            if path.len() > self.nodes.len() {
                return None;
            }
        }
        Some(path)
    }

    /// Distance table for summaries
    #[must_use]
    pub fn matrix(&self) -> DistanceMatrix {
        DistanceMatrix {
            nodes: self.nodes.clone(),
            rows: self
                .dist
                .iter()
                .map(|row| row.iter().map(|d| d.is_finite().then_some(*d)).collect())
                .collect(),
        }
    }
}

/// Run Floyd-Warshall over every node, k outermost
#[must_use]
pub fn floyd_warshall(graph: &Graph, variant: FloydWarshallVariant) -> FloydWarshallRun {
    debug!(%variant, nodes = graph.node_count(), "floyd-warshall run started");
    let nodes: Vec<NodeId> = graph.node_ids().map(String::from).collect();
    let mut log = StepLog::new();

    if variant == FloydWarshallVariant::TransitiveClosure {
        let reach = closure(graph, &nodes, &mut log);
        return FloydWarshallRun {
            nodes,
            steps: log.into_steps(),
            reach,
            ..FloydWarshallRun::default()
        };
    }

    let n = nodes.len();
    let track_next = variant == FloydWarshallVariant::PathReconstruction;
    let mut dist = vec![vec![f64::INFINITY; n]; n];
    let mut next: Vec<Vec<Option<usize>>> = vec![vec![None; n]; n];
    for i in 0..n {
        dist[i][i] = 0.0;
        next[i][i] = Some(i);
    }
    for (u, v, w) in graph.arcs() {
        let (Some(i), Some(j)) = (graph.position(&u), graph.position(&v)) else {
            continue;
        };
        if w < dist[i][j] {
            dist[i][j] = w;
            next[i][j] = Some(j);
        }
    }
    log.push(Step::new(
        StepAction::Init,
        format!("Initialise {n}×{n} matrix from edge weights"),
    ));

    for k in 0..n {
        log.push(
            Step::new(
                StepAction::Iteration,
                format!("Allow {} as an intermediate node", nodes[k]),
            )
            .with_node(nodes[k].clone()),
        );
        for i in 0..n {
            if dist[i][k].is_infinite() {
                continue;
            }
            for j in 0..n {
                let through = dist[i][k] + dist[k][j];
                if through < dist[i][j] {
                    dist[i][j] = through;
                    next[i][j] = next[i][k];
                    log.push(
                        Step::new(
                            StepAction::Update,
                            format!(
                                "dist[{}][{}] = {} via {}",
                                nodes[i],
                                nodes[j],
                                format_cost(through),
                                nodes[k]
                            ),
                        )
                        .with_node(nodes[j].clone())
                        .with_from(nodes[i].clone())
                        .with_data(StepData::Cell {
                            i: nodes[i].clone(),
                            j: nodes[j].clone(),
                            k: nodes[k].clone(),
                            value: through,
                        }),
                    );
                }
            }
        }
    }

    let negative = (0..n).find(|&i| dist[i][i] < 0.0);
    if let Some(i) = negative {
        log.push(
            Step::new(
                StepAction::Cycle,
                format!(
                    "dist[{0}][{0}] = {1} < 0: {0} lies on a negative cycle",
                    nodes[i],
                    format_cost(dist[i][i])
                ),
            )
            .with_node(nodes[i].clone()),
        );
    }
    log.push(Step::new(StepAction::Done, "All pairs computed"));

    FloydWarshallRun {
        nodes,
        steps: log.into_steps(),
        dist,
        next: if track_next { next } else { Vec::new() },
        reach: Vec::new(),
        negative_cycle: negative.is_some(),
    }
}

fn closure(graph: &Graph, nodes: &[NodeId], log: &mut StepLog) -> Vec<Vec<bool>> {
    let n = nodes.len();
    let mut reach = vec![vec![false; n]; n];
    for (i, row) in reach.iter_mut().enumerate() {
        row[i] = true;
    }
    for (u, v, _) in graph.arcs() {
        if let (Some(i), Some(j)) = (graph.position(&u), graph.position(&v)) {
            reach[i][j] = true;
        }
    }
    log.push(Step::new(
        StepAction::Init,
        "Mark every node reachable from itself and along each edge",
    ));

    for k in 0..n {
        log.push(
            Step::new(
                StepAction::Iteration,
                format!("Allow {} as an intermediate node", nodes[k]),
            )
            .with_node(nodes[k].clone()),
        );
        for i in 0..n {
            if !reach[i][k] {
                continue;
            }
            for j in 0..n {
                if reach[k][j] && !reach[i][j] {
                    reach[i][j] = true;
                    log.push(
                        Step::new(
                            StepAction::Update,
                            format!("{} reaches {} via {}", nodes[i], nodes[j], nodes[k]),
                        )
                        .with_node(nodes[j].clone())
                        .with_from(nodes[i].clone())
                        .with_data(StepData::Cell {
                            i: nodes[i].clone(),
                            j: nodes[j].clone(),
                            k: nodes[k].clone(),
                            value: 1.0,
                        }),
                    );
                }
            }
        }
    }
    log.push(Step::new(StepAction::Done, "Reachability computed"));
    reach
}
