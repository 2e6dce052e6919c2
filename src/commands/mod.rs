// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Command implementations

pub mod completions;
pub mod export;
pub mod list;
pub mod play;
pub mod random;
pub mod run;

use crate::config::Settings;
use crate::fixtures;
use crate::graph::Graph;
use crate::selector::{Algorithm, Selection};
use crate::types::NodeId;
use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Where a command takes its graph from
#[derive(Debug, Clone, Default)]
pub struct GraphSource {
    /// Built-in fixture name
    pub fixture: Option<String>,
    /// JSON or TOML graph file; wins over `fixture`
    pub file: Option<PathBuf>,
}

impl GraphSource {
    /// Load the graph, falling back to the settings' fixture and then `fallback`
    ///
    /// Returns the graph and the fixture name it came from, if any.
    pub fn load(&self, settings: &Settings, fallback: &str) -> Result<(Graph, Option<String>)> {
        if let Some(path) = &self.file {
            let graph = Graph::load(path)?;
            info!(path = %path.display(), nodes = graph.node_count(), "graph loaded");
            return Ok((graph, None));
        }
        let name = self
            .fixture
            .clone()
            .or_else(|| settings.fixture.clone())
            .unwrap_or_else(|| fallback.to_string());
        let graph = fixtures::by_name(&name).with_context(|| {
            let known: Vec<&str> = fixtures::FIXTURES.iter().map(|(n, _)| *n).collect();
            format!("Cannot load fixture (known: {})", known.join(", "))
        })?;
        debug!(fixture = %name, "fixture loaded");
        Ok((graph, Some(name)))
    }
}

/// Everything needed to produce one trace
#[derive(Debug, Clone, Default)]
pub struct TraceRequest {
    /// Algorithm name
    pub algorithm: String,
    /// Variant name, the algorithm's first variant when unset
    pub variant: Option<String>,
    /// Graph to run on
    pub source: GraphSource,
    /// Start node override
    pub start: Option<String>,
    /// Goal node override
    pub goal: Option<String>,
}

/// A request with every default applied
#[derive(Debug, Clone)]
pub struct Resolved {
    /// Graph to run on
    pub graph: Graph,
    /// Parsed selection
    pub selection: Selection,
    /// Start node
    pub start: NodeId,
    /// Goal node
    pub goal: Option<NodeId>,
}

impl TraceRequest {
    /// Parse the selection and fill in graph, start and goal
    ///
    /// A goal-requiring selection without a goal uses the fixture's default goal.
    pub fn resolve(&self, settings: &Settings) -> Result<Resolved> {
        let selection = Selection::parse(&self.algorithm, self.variant.as_deref())?;
        let algorithm: Algorithm = selection.algorithm();
        let (graph, fixture) = self.source.load(settings, algorithm.default_fixture())?;

        let start = self.start.clone().unwrap_or_else(|| settings.start.clone());
        let goal = self.goal.clone().or_else(|| settings.goal.clone()).or_else(|| {
            if selection.requires_goal() {
                fixture
                    .as_deref()
                    .and_then(fixtures::default_goal)
                    .map(String::from)
            } else {
                None
            }
        });
        Ok(Resolved {
            graph,
            selection,
            start,
            goal,
        })
    }
}

/// Write to a file, or stdout when no path is given
pub fn write_output(content: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, content)
                .with_context(|| format!("Failed to write to {}", path.display()))?;
            eprintln!("Wrote {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(content.as_bytes())?;
            if !content.ends_with('\n') {
                stdout.write_all(b"\n")?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selector::BfsVariant;

    #[test]
    fn test_resolve_uses_algorithm_fixture() {
        let request = TraceRequest {
            algorithm: "kruskal".into(),
            ..TraceRequest::default()
        };
        let resolved = request.resolve(&Settings::default()).unwrap();
        assert_eq!(resolved.selection, Selection::Kruskal);
        assert_eq!(resolved.graph.node_count(), 5);
        assert_eq!(resolved.start, "A");
        assert_eq!(resolved.goal, None);
    }

    #[test]
    fn test_resolve_fills_default_goal() {
        let request = TraceRequest {
            algorithm: "bfs".into(),
            variant: Some("shortest_path".into()),
            ..TraceRequest::default()
        };
        let resolved = request.resolve(&Settings::default()).unwrap();
        assert_eq!(resolved.selection, Selection::Bfs(BfsVariant::ShortestPath));
        assert_eq!(resolved.goal.as_deref(), Some("J"));
    }

    #[test]
    fn test_resolve_prefers_explicit_fixture() {
        let settings = Settings {
            fixture: Some("spanning".into()),
            ..Settings::default()
        };
        let request = TraceRequest {
            algorithm: "dfs".into(),
            source: GraphSource {
                fixture: Some("cyclic".into()),
                file: None,
            },
            ..TraceRequest::default()
        };
        let resolved = request.resolve(&settings).unwrap();
        assert!(resolved.graph.is_directed());
        assert_eq!(resolved.graph.node_count(), 4);
    }

    #[test]
    fn test_unknown_algorithm_is_reported() {
        let request = TraceRequest {
            algorithm: "prim".into(),
            ..TraceRequest::default()
        };
        let err = request.resolve(&Settings::default()).unwrap_err();
        assert!(err.to_string().contains("prim"));
    }
}
