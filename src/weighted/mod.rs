// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Weighted shortest-path algorithms
//!
//! These produce their whole step sequence in one call.

pub mod bellman_ford;
pub mod dijkstra;
pub mod floyd_warshall;

pub use bellman_ford::{bellman_ford, BellmanFordRun};
pub use dijkstra::{dijkstra, ShortestPaths};
pub use floyd_warshall::{floyd_warshall, FloydWarshallRun};

use crate::error::{Result, TraceError};
use crate::graph::Graph;
use crate::types::NodeId;
use std::collections::BTreeMap;

/// Fail if any edge weight is negative
pub(crate) fn reject_negative_weights(graph: &Graph, algorithm: &str) -> Result<()> {
    match graph.negative_edge() {
        Some(edge) => Err(TraceError::NegativeWeight {
            algorithm: algorithm.to_string(),
            from: edge.source.clone(),
            to: edge.target.clone(),
            weight: edge.cost(),
        }),
        None => Ok(()),
    }
}

/// Keep only finite distances
pub(crate) fn finite_distances(dist: &BTreeMap<NodeId, f64>) -> BTreeMap<NodeId, f64> {
    dist.iter()
        .filter(|(_, d)| d.is_finite())
        .map(|(n, d)| (n.clone(), *d))
        .collect()
}

/// Distance table rendered for a step message
pub(crate) fn describe_distances(graph: &Graph, dist: &BTreeMap<NodeId, f64>) -> String {
    graph
        .node_ids()
        .map(|id| {
            let d = dist.get(id).copied().unwrap_or(f64::INFINITY);
            format!("{id}:{}", crate::types::format_cost(d))
        })
        .collect::<Vec<_>>()
        .join(" ")
}
