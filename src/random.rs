// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Seeded random lesson graphs
//!
//! Vertices `A`, `B`, ... sit on a circle; every pair is joined with a
//! probability set by the density, weighted 1 to 9. Directed graphs
//! sometimes get the opposite edge too. The same seed always yields the
//! same graph, so traces over it stay reproducible.

use crate::error::{Result, TraceError};
use crate::graph::Graph;
use crate::types::{Edge, Node};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;
use tracing::debug;

/// Largest vertex count; ids are single letters
pub const MAX_NODES: usize = 26;

/// Chance that a directed edge also gets a reverse edge
const REVERSE_PROBABILITY: f64 = 0.3;

const CENTER: (f64, f64) = (200.0, 175.0);
const RADIUS: f64 = 140.0;

/// How likely each vertex pair is to be connected
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Density {
    /// 15% of pairs
    Low,
    /// 30% of pairs
    #[default]
    Medium,
    /// 60% of pairs
    High,
}

impl Density {
    /// Parse a density name
    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" | "sparse" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" | "dense" => Some(Self::High),
            _ => None,
        }
    }

    /// Edge probability per vertex pair
    #[must_use]
    pub fn probability(self) -> f64 {
        match self {
            Self::Low => 0.15,
            Self::Medium => 0.3,
            Self::High => 0.6,
        }
    }
}

impl fmt::Display for Density {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        })
    }
}

/// Parameters of a random graph
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RandomGraph {
    /// Vertex count, `1..=MAX_NODES`
    pub nodes: usize,
    /// Pair connection probability
    pub density: Density,
    /// One-way edges with occasional reverse edges
    pub directed: bool,
    /// RNG seed
    pub seed: u64,
}

impl Default for RandomGraph {
    fn default() -> Self {
        Self {
            nodes: 6,
            density: Density::Medium,
            directed: false,
            seed: 0,
        }
    }
}

impl RandomGraph {
    /// Build the graph
    ///
    /// # Errors
    ///
    /// Returns [`TraceError::RandomGraph`] when `nodes` is outside
    /// `1..=MAX_NODES`.
    pub fn build(&self) -> Result<Graph> {
        if !(1..=MAX_NODES).contains(&self.nodes) {
            return Err(TraceError::RandomGraph(format!(
                "{} vertices requested, expected 1 to {MAX_NODES}",
                self.nodes
            )));
        }
        let mut rng = StdRng::seed_from_u64(self.seed);
        let n = self.nodes;

        let nodes: Vec<Node> = (0..n)
            .map(|i| {
                let angle = 2.0 * PI * i as f64 / n as f64 - PI / 2.0;
                let (x, y) = (CENTER.0 + RADIUS * angle.cos(), CENTER.1 + RADIUS * angle.sin());
                Node::at(vertex_id(i), x.round(), y.round())
            })
            .collect();

        let p = self.density.probability();
        let mut edges = Vec::new();
        for i in 0..n {
            for j in i + 1..n {
                if !rng.gen_bool(p) {
                    continue;
                }
                let weight = f64::from(rng.gen_range(1..=9u8));
                edges.push(Edge::weighted(vertex_id(i), vertex_id(j), weight));
                if self.directed && rng.gen_bool(REVERSE_PROBABILITY) {
                    let weight = f64::from(rng.gen_range(1..=9u8));
                    edges.push(Edge::weighted(vertex_id(j), vertex_id(i), weight));
                }
            }
        }
        debug!(
            nodes = n,
            edges = edges.len(),
            density = %self.density,
            seed = self.seed,
            "random graph built"
        );
        Graph::new(nodes, edges, self.directed)
    }
}

fn vertex_id(i: usize) -> String {
    char::from(b'A' + (i as u8)).to_string()
}
