// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Plain-text, JSON and DOT views of traces

use crate::generator::Trace;
use crate::graph::Graph;
use crate::types::{format_cost, NodeId, Outcome, Step, StepAction, Summary};
use owo_colors::OwoColorize;
use std::collections::{BTreeMap, HashSet};
use std::fmt::Write;

/// Output format for a rendered trace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TraceFormat {
    /// Human-readable step log
    #[default]
    Text,
    /// Pretty-printed JSON trace
    Json,
    /// Graphviz with the result highlighted
    Dot,
}

impl TraceFormat {
    /// Parse a format name
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Some(Self::Text),
            "json" => Some(Self::Json),
            "dot" | "graphviz" => Some(Self::Dot),
            _ => None,
        }
    }
}

fn label(action: StepAction) -> &'static str {
    match action {
        StepAction::Init => "init",
        StepAction::Enqueue => "enqueue",
        StepAction::Visit => "visit",
        StepAction::Skip => "skip",
        StepAction::Relax => "relax",
        StepAction::Update => "update",
        StepAction::Backtrack => "backtrack",
        StepAction::Cycle => "cycle",
        StepAction::Goal => "goal",
        StepAction::NoPath => "no-path",
        StepAction::Accept => "accept",
        StepAction::Reject => "reject",
        StepAction::Iteration => "iteration",
        StepAction::Done => "done",
    }
}

/// Text renderer with optional ANSI colors
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    color: bool,
}

impl Renderer {
    /// Create a renderer
    #[must_use]
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn action(&self, action: StepAction) -> String {
        let text = format!("{:<9}", label(action));
        if !self.color {
            return text;
        }
        match action {
            StepAction::Goal | StepAction::Accept => text.green().bold().to_string(),
            StepAction::NoPath | StepAction::Cycle | StepAction::Reject => text.red().bold().to_string(),
            StepAction::Visit => text.cyan().to_string(),
            StepAction::Enqueue | StepAction::Relax | StepAction::Update => text.yellow().to_string(),
            _ => text.dimmed().to_string(),
        }
    }

    fn heading(&self, text: &str) -> String {
        if self.color {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    /// One step, with its frontier on a second line when non-empty
    #[must_use]
    pub fn render_step(&self, step: &Step) -> String {
        let mut out = format!("[{:>3}] {} {}", step.index, self.action(step.action), step.message);
        if !step.frontier.is_empty() {
            let items: Vec<String> = step
                .frontier
                .iter()
                .map(|item| match item.priority {
                    Some(p) => format!("{}({})", item.node, format_cost(p)),
                    None => item.node.clone(),
                })
                .collect();
            let _ = write!(out, "\n      frontier: {}", items.join(", "));
        }
        out
    }

    /// Terminal result as a single line
    #[must_use]
    pub fn render_outcome(&self, outcome: &Outcome) -> String {
        let text = match outcome {
            Outcome::Completed => "completed".to_string(),
            Outcome::PathFound { path, cost } => {
                format!("path {} (cost {})", path.join(" → "), format_cost(*cost))
            }
            Outcome::NoPath => "no path".to_string(),
            Outcome::Acyclic => "acyclic".to_string(),
            Outcome::CycleDetected { from, to } => format!("cycle detected at {from} → {to}"),
            Outcome::NegativeCycle { from, to } => format!("negative cycle through {from} → {to}"),
            Outcome::CyclicInput { from, to } => {
                format!("no topological order: {from} → {to} closes a cycle")
            }
            Outcome::SpanningTree { edges, total_weight } => format!(
                "spanning tree of {} edges, weight {}",
                edges.len(),
                format_cost(*total_weight)
            ),
            Outcome::SpanningForest {
                edges,
                total_weight,
                components,
            } => format!(
                "spanning forest of {components} trees ({} edges), weight {}",
                edges.len(),
                format_cost(*total_weight)
            ),
        };
        let line = format!("Outcome: {text}");
        if !self.color {
            line
        } else if outcome.is_failure() {
            line.red().to_string()
        } else {
            line.green().to_string()
        }
    }

    /// Non-empty summary tables, one block each
    #[must_use]
    pub fn render_summary(&self, summary: &Summary) -> String {
        let mut out = String::new();
        if !summary.visit_order.is_empty() {
            let _ = writeln!(out, "{} {}", self.heading("Visit order:"), summary.visit_order.join(", "));
        }
        if !summary.distances.is_empty() {
            let _ = writeln!(out, "{}", self.heading("Distances:"));
            for (node, distance) in sorted_by_value(&summary.distances) {
                let _ = writeln!(out, "  {node}: {}", format_cost(distance));
            }
        }
        if !summary.predecessors.is_empty() {
            let _ = writeln!(out, "{}", self.heading("Predecessors:"));
            for (node, preds) in &summary.predecessors {
                let _ = writeln!(out, "  {node}: {}", preds.join(", "));
            }
        }
        if !summary.levels.is_empty() {
            let mut by_level: BTreeMap<u32, Vec<&str>> = BTreeMap::new();
            for (node, level) in &summary.levels {
                by_level.entry(*level).or_default().push(node);
            }
            let _ = writeln!(out, "{}", self.heading("Levels:"));
            for (level, nodes) in by_level {
                let _ = writeln!(out, "  {level}: {}", nodes.join(", "));
            }
        }
        if !summary.components.is_empty() {
            let _ = writeln!(out, "{}", self.heading("Components:"));
            for (i, component) in summary.components.iter().enumerate() {
                let _ = writeln!(out, "  {}: {}", i + 1, component.join(", "));
            }
        }
        if !summary.discovery.is_empty() {
            let _ = writeln!(out, "{}", self.heading("Timestamps (discovery/finish):"));
            for (node, d) in &summary.discovery {
                let f = summary.finish.get(node).map_or("-".to_string(), ToString::to_string);
                let _ = writeln!(out, "  {node}: {d}/{f}");
            }
        }
        if !summary.topological_order.is_empty() {
            let _ = writeln!(
                out,
                "{} {}",
                self.heading("Topological order:"),
                summary.topological_order.join(", ")
            );
        }
        if let Some(matrix) = &summary.matrix {
            let _ = writeln!(out, "{}", self.heading("Distance matrix:"));
            let _ = writeln!(out, "{}", table(&matrix.nodes, |i, j| {
                matrix.rows[i][j].map_or("∞".to_string(), format_cost)
            }));
        }
        if let Some(reach) = &summary.reachability {
            let nodes: Vec<NodeId> = summary
                .matrix
                .as_ref()
                .map(|m| m.nodes.clone())
                .unwrap_or_else(|| (0..reach.len()).map(|i| i.to_string()).collect());
            let _ = writeln!(out, "{}", self.heading("Reachability:"));
            let _ = writeln!(out, "{}", table(&nodes, |i, j| {
                if reach[i][j] { "1" } else { "0" }.to_string()
            }));
        }
        if !summary.all_paths.is_empty() {
            let _ = writeln!(out, "{}", self.heading("All shortest paths:"));
            for path in &summary.all_paths {
                let _ = writeln!(out, "  {}", path.join(" → "));
            }
        }
        out
    }

    /// Header, every step, outcome and summary
    #[must_use]
    pub fn render_trace(&self, trace: &Trace) -> String {
        let mut header = trace.selection.to_string();
        if trace.selection.uses_start() {
            let _ = write!(header, " from {}", trace.start);
        }
        if let Some(goal) = &trace.goal {
            let _ = write!(header, " to {goal}");
        }
        let mut out = format!("{}\n", self.heading(&header));
        for step in &trace.steps {
            let _ = writeln!(out, "{}", self.render_step(step));
        }
        let _ = writeln!(out, "{}", self.render_outcome(&trace.outcome));
        out.push_str(&self.render_summary(&trace.summary));
        out
    }
}

fn sorted_by_value(map: &BTreeMap<NodeId, f64>) -> Vec<(&str, f64)> {
    let mut entries: Vec<(&str, f64)> = map.iter().map(|(k, v)| (k.as_str(), *v)).collect();
    entries.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(b.0)));
    entries
}

fn table(labels: &[NodeId], cell: impl Fn(usize, usize) -> String) -> String {
    let cells: Vec<Vec<String>> = (0..labels.len())
        .map(|i| (0..labels.len()).map(|j| cell(i, j)).collect())
        .collect();
    let width = labels
        .iter()
        .map(|l| l.chars().count())
        .chain(cells.iter().flatten().map(|c| c.chars().count()))
        .max()
        .unwrap_or(1);
    let mut out = format!("  {:>width$}", "");
    for label in labels {
        let _ = write!(out, " {label:>width$}");
    }
    for (label, row) in labels.iter().zip(&cells) {
        let _ = write!(out, "\n  {label:>width$}");
        for value in row {
            let _ = write!(out, " {value:>width$}");
        }
    }
    out
}

/// DOT export highlighting the trace's result
///
/// Paths mark their nodes and edges, spanning results mark their edges,
/// anything else marks the visited nodes.
#[must_use]
pub fn trace_dot(graph: &Graph, trace: &Trace) -> String {
    let mut nodes: HashSet<NodeId> = HashSet::new();
    let mut edges: HashSet<(NodeId, NodeId)> = HashSet::new();
    match &trace.outcome {
        Outcome::PathFound { path, .. } => {
            nodes.extend(path.iter().cloned());
            edges.extend(path.windows(2).map(|w| (w[0].clone(), w[1].clone())));
        }
        Outcome::SpanningTree { edges: tree, .. } | Outcome::SpanningForest { edges: tree, .. } => {
            edges.extend(tree.iter().map(|e| (e.source.clone(), e.target.clone())));
        }
        _ => nodes.extend(trace.replay_visit_order()),
    }
    graph.to_dot_with(&nodes, &edges)
}

/// Pretty JSON of the whole trace
///
/// # Errors
///
/// Fails only if serialization fails.
pub fn trace_json(trace: &Trace) -> anyhow::Result<String> {
    serde_json::to_string_pretty(trace).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::generator::generate;
    use crate::selector::{BfsVariant, FloydWarshallVariant, Selection};

    fn bfs_path() -> (Graph, Trace) {
        let graph = fixtures::traversal().unwrap();
        let trace = generate(&graph, Selection::Bfs(BfsVariant::ShortestPath), "A", Some("J")).unwrap();
        (graph, trace)
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!(TraceFormat::from_str("JSON"), Some(TraceFormat::Json));
        assert_eq!(TraceFormat::from_str("graphviz"), Some(TraceFormat::Dot));
        assert_eq!(TraceFormat::from_str("yaml"), None);
    }

    #[test]
    fn test_plain_text_has_no_escape_codes() {
        let (_, trace) = bfs_path();
        let text = Renderer::new(false).render_trace(&trace);
        assert!(!text.contains('\u{1b}'));
        assert!(text.starts_with("bfs/shortest-path from A to J"));
        assert!(text.contains("Outcome: path A → C → F → J (cost 3)"));
        assert!(text.contains("[  0] init"));
    }

    #[test]
    fn test_header_omits_start_for_whole_graph_runs() {
        let graph = fixtures::spanning().unwrap();
        let trace = generate(&graph, Selection::Kruskal, "A", None).unwrap();
        let text = Renderer::new(false).render_trace(&trace);
        assert!(text.starts_with("kruskal/standard\n"));
    }

    #[test]
    fn test_colored_output_uses_ansi() {
        let (_, trace) = bfs_path();
        let text = Renderer::new(true).render_outcome(&trace.outcome);
        assert!(text.contains('\u{1b}'));
    }

    #[test]
    fn test_frontier_line_shows_priorities() {
        let step = Step::new(StepAction::Visit, "Visit A").with_frontier(vec![
            crate::types::FrontierItem::keyed("B", 2.0),
            crate::types::FrontierItem::plain("C"),
        ]);
        let text = Renderer::new(false).render_step(&step);
        assert!(text.ends_with("frontier: B(2), C"));
    }

    #[test]
    fn test_matrix_table() {
        let labels = vec!["A".to_string(), "BB".to_string()];
        let text = table(&labels, |i, j| if i == j { "0".into() } else { "∞".into() });
        assert_eq!(text, "      A BB\n   A  0  ∞\n  BB  ∞  0");
    }

    #[test]
    fn test_floyd_warshall_summary_has_matrix() {
        let graph = fixtures::weighted().unwrap();
        let trace = generate(&graph, Selection::FloydWarshall(FloydWarshallVariant::Standard), "A", None).unwrap();
        let text = Renderer::new(false).render_summary(&trace.summary);
        assert!(text.contains("Distance matrix:"));
        assert!(text.contains("  H: 11"));
    }

    #[test]
    fn test_dot_highlights_path_edges() {
        let (graph, trace) = bfs_path();
        let dot = trace_dot(&graph, &trace);
        let line = |id: &str| {
            dot.lines()
                .find(|l| l.trim_start().starts_with(&format!("\"{id}\" [")))
                .unwrap()
                .to_string()
        };
        assert!(dot.contains("\"A\" -- \"C\" [color="));
        assert!(line("J").contains("style=filled"));
        assert!(!line("B").contains("style=filled"));
    }

    #[test]
    fn test_json_trace_parses() {
        let (_, trace) = bfs_path();
        let json = trace_json(&trace).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["outcome"]["status"], "path_found");
        assert_eq!(value["selection"]["algorithm"], "bfs");
    }
}
