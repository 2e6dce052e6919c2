// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Minimum spanning forest (Kruskal with union-find)

use crate::graph::Graph;
use crate::state::StepLog;
use crate::types::{format_cost, Edge, Outcome, Step, StepAction, StepData};
use tracing::debug;

/// Disjoint sets over `0..n` with union by rank and path compression
#[derive(Debug, Clone)]
pub struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl UnionFind {
    /// `n` singleton sets
    #[must_use]
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    /// Representative of the set holding `x`
    pub fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut current = x;
        while self.parent[current] != root {
            let next = self.parent[current];
            self.parent[current] = root;
            current = next;
        }
        root
    }

    /// Merge the sets of `a` and `b`; false if they were already one set
    pub fn union(&mut self, a: usize, b: usize) -> bool {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return false;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
        true
    }

    /// Number of disjoint sets
    pub fn count(&mut self) -> usize {
        (0..self.parent.len()).filter(|&x| self.find(x) == x).count()
    }
}

/// Result of a Kruskal run
#[derive(Debug, Clone)]
pub struct MstResult {
    /// Recorded transitions
    pub steps: Vec<Step>,
    /// Accepted edges in acceptance order
    pub edges: Vec<Edge>,
    /// Sum of accepted weights
    pub total_weight: f64,
    /// Trees in the resulting forest
    pub components: usize,
}

impl MstResult {
    /// `SpanningTree` when every node is connected, otherwise `SpanningForest`
    #[must_use]
    pub fn outcome(&self) -> Outcome {
        if self.components <= 1 {
            Outcome::SpanningTree {
                edges: self.edges.clone(),
                total_weight: self.total_weight,
            }
        } else {
            Outcome::SpanningForest {
                edges: self.edges.clone(),
                total_weight: self.total_weight,
                components: self.components,
            }
        }
    }
}

/// Kruskal over the graph's edges, ignoring direction
#[must_use]
pub fn kruskal(graph: &Graph) -> MstResult {
    let n = graph.node_count();
    debug!(nodes = n, edges = graph.edge_count(), "kruskal run started");
    let mut log = StepLog::new();

    // Stable: equal weights keep input order
    let mut sorted: Vec<&Edge> = graph.edges().iter().collect();
    sorted.sort_by(|a, b| a.cost().total_cmp(&b.cost()));
    log.push(Step::new(
        StepAction::Init,
        format!(
            "Sort {} edges by weight: {}",
            sorted.len(),
            sorted
                .iter()
                .map(|e| format!("{}-{}({})", e.source, e.target, format_cost(e.cost())))
                .collect::<Vec<_>>()
                .join(", ")
        ),
    ));

    let mut sets = UnionFind::new(n);
    let mut accepted: Vec<Edge> = Vec::new();
    let mut total = 0.0;
    let target = n.saturating_sub(1);

    for edge in sorted {
        if accepted.len() == target {
            break;
        }
        let (Some(a), Some(b)) = (graph.position(&edge.source), graph.position(&edge.target)) else {
            continue;
        };
        let weight = edge.cost();
        if sets.union(a, b) {
            total += weight;
            accepted.push(edge.clone());
            log.push(
                Step::new(
                    StepAction::Accept,
                    format!(
                        "Accept {}-{} ({}); total {}",
                        edge.source,
                        edge.target,
                        format_cost(weight),
                        format_cost(total)
                    ),
                )
                .with_node(edge.target.clone())
                .with_from(edge.source.clone())
                .with_data(StepData::EdgeWeight { weight, total }),
            );
        } else {
            log.push(
                Step::new(
                    StepAction::Reject,
                    format!(
                        "Reject {}-{} ({}): would close a cycle",
                        edge.source,
                        edge.target,
                        format_cost(weight)
                    ),
                )
                .with_node(edge.target.clone())
                .with_from(edge.source.clone())
                .with_data(StepData::EdgeWeight { weight, total }),
            );
        }
    }

    let components = sets.count();
    let message = if components <= 1 {
        format!("Spanning tree with {} edges, weight {}", accepted.len(), format_cost(total))
    } else {
        format!(
            "Graph is disconnected: spanning forest of {components} trees, weight {}",
            format_cost(total)
        )
    };
    log.push(Step::new(StepAction::Done, message));

    MstResult {
        steps: log.into_steps(),
        edges: accepted,
        total_weight: total,
        components,
    }
}
