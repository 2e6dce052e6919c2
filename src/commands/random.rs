// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Random command - writes a seeded random lesson graph

use super::export::write_graph;
use crate::random::{Density, RandomGraph};
use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

/// Run the random command
pub fn run(
    nodes: usize,
    density: &str,
    directed: bool,
    seed: u64,
    format: &str,
    output: Option<&Path>,
) -> Result<()> {
    let density = Density::from_str(density)
        .ok_or_else(|| anyhow::anyhow!("Unknown density: {}. Supported: low, medium, high", density))?;
    let params = RandomGraph {
        nodes,
        density,
        directed,
        seed,
    };
    info!(nodes, %density, directed, seed, "Generating random graph");
    let graph = params.build().context("Failed to generate random graph")?;
    write_graph(&graph, format, output)
}
