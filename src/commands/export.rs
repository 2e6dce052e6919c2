// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Export command - exports a graph to various formats

use super::{write_output, GraphSource};
use crate::config::Settings;
use crate::graph::Graph;
use anyhow::Result;
use std::path::Path;
use tracing::info;

/// Supported export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Graphviz DOT format
    Dot,
    /// JSON graph file, loadable with `--file`
    Json,
    /// TOML graph file, loadable with `--file`
    Toml,
}

impl ExportFormat {
    /// Parse format from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "dot" | "graphviz" => Some(Self::Dot),
            "json" => Some(Self::Json),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }

    /// Get file extension for format
    #[must_use]
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Dot => "dot",
            Self::Json => "json",
            Self::Toml => "toml",
        }
    }
}

/// Run the export command
pub fn run(source: &GraphSource, format: &str, output: Option<&Path>, settings: &Settings) -> Result<()> {
    info!("Exporting to {}", format);
    let (graph, _) = source.load(settings, "demo")?;
    write_graph(&graph, format, output)
}

/// Serialize `graph` in the named format to a file or stdout
pub fn write_graph(graph: &Graph, format: &str, output: Option<&Path>) -> Result<()> {
    let export_format = ExportFormat::from_str(format)
        .ok_or_else(|| anyhow::anyhow!("Unknown export format: {}. Supported: dot, json, toml", format))?;

    if let Some(path) = output {
        if path.extension().and_then(|e| e.to_str()) != Some(export_format.extension()) {
            tracing::warn!(path = %path.display(), "output extension does not match {}", export_format.extension());
        }
    }

    let content = match export_format {
        ExportFormat::Dot => graph.to_dot(),
        ExportFormat::Json => graph.to_json()?,
        ExportFormat::Toml => toml::to_string_pretty(&graph.description())?,
    };
    write_output(&content, output)
}
