// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Heuristic (informed) search
//!
//! A*, greedy best-first and IDA* share the [`Heuristic`] seam: swapping the
//! distance function never touches the search loops.

pub mod astar;
pub mod greedy;
pub mod idastar;

pub use astar::astar;
pub use greedy::greedy;
pub use idastar::idastar;

use crate::error::{Result, TraceError};
use crate::graph::Graph;
use crate::selector::AStarVariant;
use crate::state::walk_parents;
use crate::types::{Coordinates, NodeId, Outcome, Step};
use std::collections::{BTreeMap, HashMap};

/// Inflation factor of the weighted A* variant
pub const WEIGHTED_FACTOR: f64 = 1.5;

/// Estimated distance between two positions
pub trait Heuristic: Send + Sync {
    /// Display name
    fn name(&self) -> &'static str;

    /// Estimate the remaining cost from `from` to `to`
    fn estimate(&self, from: Coordinates, to: Coordinates) -> f64;
}

/// `|dx| + |dy|`
#[derive(Debug, Clone, Copy, Default)]
pub struct Manhattan;

/// Straight-line distance
#[derive(Debug, Clone, Copy, Default)]
pub struct Euclidean;

/// `max(|dx|, |dy|)`
#[derive(Debug, Clone, Copy, Default)]
pub struct Chebyshev;

impl Heuristic for Manhattan {
    fn name(&self) -> &'static str {
        "manhattan"
    }

    fn estimate(&self, from: Coordinates, to: Coordinates) -> f64 {
        (from.x - to.x).abs() + (from.y - to.y).abs()
    }
}

impl Heuristic for Euclidean {
    fn name(&self) -> &'static str {
        "euclidean"
    }

    fn estimate(&self, from: Coordinates, to: Coordinates) -> f64 {
        (from.x - to.x).hypot(from.y - to.y)
    }
}

impl Heuristic for Chebyshev {
    fn name(&self) -> &'static str {
        "chebyshev"
    }

    fn estimate(&self, from: Coordinates, to: Coordinates) -> f64 {
        (from.x - to.x).abs().max((from.y - to.y).abs())
    }
}

impl AStarVariant {
    /// Distance function and weight `w` in `f = g + w·h`
    #[must_use]
    pub fn heuristic(self) -> (Box<dyn Heuristic>, f64) {
        match self {
            Self::Manhattan => (Box::new(Manhattan), 1.0),
            Self::Euclidean => (Box::new(Euclidean), 1.0),
            Self::Chebyshev => (Box::new(Chebyshev), 1.0),
            Self::Weighted => (Box::new(Manhattan), WEIGHTED_FACTOR),
        }
    }
}

/// Result of an informed search
#[derive(Debug, Clone)]
pub struct HeuristicSearch {
    /// Recorded transitions
    pub steps: Vec<Step>,
    /// `PathFound` or `NoPath`
    pub outcome: Outcome,
    /// Expansion order
    pub visit_order: Vec<NodeId>,
    /// Best known cost from the start
    pub g_scores: BTreeMap<NodeId, f64>,
    /// Search-tree parents
    pub parents: BTreeMap<NodeId, NodeId>,
}

/// Heuristic bound to a goal, with every node position resolved
pub(crate) struct Estimator<'a> {
    positions: HashMap<&'a str, Coordinates>,
    target: Coordinates,
    heuristic: &'a dyn Heuristic,
}

impl<'a> Estimator<'a> {
    pub(crate) fn new(graph: &'a Graph, goal: &str, heuristic: &'a dyn Heuristic) -> Result<Self> {
        let mut positions = HashMap::with_capacity(graph.node_count());
        for node in graph.nodes() {
            let coords = node
                .coordinates
                .ok_or_else(|| TraceError::MissingCoordinates(node.id.clone()))?;
            positions.insert(node.id.as_str(), coords);
        }
        let target = positions
            .get(goal)
            .copied()
            .ok_or_else(|| TraceError::UnknownNode(goal.to_string()))?;
        Ok(Self {
            positions,
            target,
            heuristic,
        })
    }

    /// Unweighted estimate from `node` to the goal
    pub(crate) fn h(&self, node: &str) -> f64 {
        self.positions
            .get(node)
            .map_or(f64::INFINITY, |c| self.heuristic.estimate(*c, self.target))
    }
}

/// Validate endpoints and weights shared by every informed search
pub(crate) fn check_inputs(graph: &Graph, start: &str, goal: &str, algorithm: &str) -> Result<()> {
    graph.require(start)?;
    graph.require(goal)?;
    crate::weighted::reject_negative_weights(graph, algorithm)
}

/// Cost of following `path` through the cheapest edges
pub(crate) fn path_cost(graph: &Graph, path: &[NodeId]) -> f64 {
    path.windows(2)
        .map(|pair| graph.weight_between(&pair[0], &pair[1]).unwrap_or(f64::INFINITY))
        .sum()
}

pub(crate) fn found(parents: &BTreeMap<NodeId, NodeId>, goal: &str, cost: f64) -> Outcome {
    Outcome::PathFound {
        path: walk_parents(parents, goal),
        cost,
    }
}
