// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Run command - prints the full trace of one algorithm run

use super::{write_output, TraceRequest};
use crate::config::Settings;
use crate::generator::generate;
use crate::render::{trace_dot, trace_json, Renderer, TraceFormat};
use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

/// Run the run command
pub fn run(
    request: &TraceRequest,
    format: &str,
    output: Option<&Path>,
    settings: &Settings,
    renderer: Renderer,
) -> Result<()> {
    let format = TraceFormat::from_str(format)
        .ok_or_else(|| anyhow::anyhow!("Unknown trace format: {format}. Supported: text, json, dot"))?;
    let resolved = request.resolve(settings)?;
    info!(selection = %resolved.selection, start = %resolved.start, "running");

    let trace = generate(
        &resolved.graph,
        resolved.selection,
        &resolved.start,
        resolved.goal.as_deref(),
    )
    .with_context(|| format!("Cannot run {}", resolved.selection))?;
    info!(steps = trace.steps.len(), fingerprint = %trace.fingerprint(), "trace ready");

    let content = match format {
        TraceFormat::Text => renderer.render_trace(&trace),
        TraceFormat::Json => trace_json(&trace)?,
        TraceFormat::Dot => trace_dot(&resolved.graph, &trace),
    };
    write_output(&content, output)
}
