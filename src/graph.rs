// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Immutable lesson graph with petgraph backing

use crate::error::{Result, TraceError};
use crate::types::{format_cost, Edge, Node, NodeId};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

/// Serializable form of a graph, as stored in JSON or TOML files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphDescription {
    /// Whether edges are one-way
    #[serde(default)]
    pub directed: bool,
    /// Nodes in graph order
    pub nodes: Vec<Node>,
    /// Edges in input order
    #[serde(default)]
    pub edges: Vec<Edge>,
}

/// A validated graph. Node order is declaration order, edge order is input order.
#[derive(Debug, Clone)]
pub struct Graph {
    /// Edge weights keyed by node index; undirected edges are stored once
    graph: DiGraph<NodeId, f64>,
    /// Map from node ID to node index
    node_indices: HashMap<NodeId, NodeIndex>,
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    directed: bool,
}

impl Graph {
    /// Build and validate a graph
    ///
    /// # Errors
    ///
    /// Rejects an empty node list, duplicate node ids, edges with undeclared
    /// endpoints and NaN weights.
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>, directed: bool) -> Result<Self> {
        if nodes.is_empty() {
            return Err(TraceError::EmptyGraph);
        }

        let mut graph = DiGraph::with_capacity(nodes.len(), edges.len());
        let mut node_indices = HashMap::with_capacity(nodes.len());
        for node in &nodes {
            if node_indices.contains_key(&node.id) {
                return Err(TraceError::DuplicateNode(node.id.clone()));
            }
            let idx = graph.add_node(node.id.clone());
            node_indices.insert(node.id.clone(), idx);
        }

        for edge in &edges {
            let lookup = |id: &NodeId| {
                node_indices
                    .get(id)
                    .copied()
                    .ok_or_else(|| TraceError::UnknownEndpoint {
                        from: edge.source.clone(),
                        to: edge.target.clone(),
                        missing: id.clone(),
                    })
            };
            let from = lookup(&edge.source)?;
            let to = lookup(&edge.target)?;
            if edge.cost().is_nan() {
                return Err(TraceError::InvalidWeight {
                    from: edge.source.clone(),
                    to: edge.target.clone(),
                });
            }
            graph.add_edge(from, to, edge.cost());
        }

        Ok(Self {
            graph,
            node_indices,
            nodes,
            edges,
            directed,
        })
    }

    /// Build a directed graph
    ///
    /// # Errors
    ///
    /// See [`Graph::new`].
    pub fn directed(nodes: Vec<Node>, edges: Vec<Edge>) -> Result<Self> {
        Self::new(nodes, edges, true)
    }

    /// Build an undirected graph
    ///
    /// # Errors
    ///
    /// See [`Graph::new`].
    pub fn undirected(nodes: Vec<Node>, edges: Vec<Edge>) -> Result<Self> {
        Self::new(nodes, edges, false)
    }

    /// Build from a parsed description
    ///
    /// # Errors
    ///
    /// See [`Graph::new`].
    pub fn from_description(description: GraphDescription) -> Result<Self> {
        Self::new(description.nodes, description.edges, description.directed)
    }

    /// Parse a JSON description
    ///
    /// # Errors
    ///
    /// Returns [`TraceError::Load`] on malformed input, or a validation error.
    pub fn from_json(content: &str) -> Result<Self> {
        let description: GraphDescription =
            serde_json::from_str(content).map_err(|e| TraceError::Load(e.to_string()))?;
        Self::from_description(description)
    }

    /// Parse a TOML description
    ///
    /// # Errors
    ///
    /// Returns [`TraceError::Load`] on malformed input, or a validation error.
    pub fn from_toml(content: &str) -> Result<Self> {
        let description: GraphDescription =
            toml::from_str(content).map_err(|e| TraceError::Load(e.to_string()))?;
        Self::from_description(description)
    }

    /// Load a graph file; `.toml` files are read as TOML, anything else as JSON
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        use anyhow::Context;

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let is_toml = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("toml"));
        let graph = if is_toml {
            Self::from_toml(&content)
        } else {
            Self::from_json(&content)
        };
        graph.with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Serializable copy of this graph
    #[must_use]
    pub fn description(&self) -> GraphDescription {
        GraphDescription {
            directed: self.directed,
            nodes: self.nodes.clone(),
            edges: self.edges.clone(),
        }
    }

    /// Whether edges are one-way
    #[must_use]
    pub fn is_directed(&self) -> bool {
        self.directed
    }

    /// Number of nodes
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges as declared
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Nodes in graph order
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Edges in input order
    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Node ids in graph order
    pub fn node_ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.nodes.iter().map(|n| n.id.as_str())
    }

    /// Look up a node
    #[must_use]
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.position(id).map(|i| &self.nodes[i])
    }

    /// Whether the id is declared
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.node_indices.contains_key(id)
    }

    /// Position of the node in graph order
    #[must_use]
    pub fn position(&self, id: &str) -> Option<usize> {
        self.node_indices.get(id).map(|idx| idx.index())
    }

    /// Fail with [`TraceError::UnknownNode`] unless the id is declared
    ///
    /// # Errors
    ///
    /// Returns an error for undeclared ids.
    pub fn require(&self, id: &str) -> Result<()> {
        if self.contains(id) {
            Ok(())
        } else {
            Err(TraceError::UnknownNode(id.to_string()))
        }
    }

    /// Adjacent node ids in ascending lexical order
    ///
    /// Undirected graphs see both endpoints of every edge; directed graphs
    /// only follow `source -> target`.
    #[must_use]
    pub fn neighbors(&self, id: &str) -> Vec<NodeId> {
        let Some(&idx) = self.node_indices.get(id) else {
            return Vec::new();
        };
        let iter: Box<dyn Iterator<Item = NodeIndex>> = if self.directed {
            Box::new(self.graph.neighbors(idx))
        } else {
            Box::new(self.graph.neighbors_undirected(idx))
        };
        let mut ids: Vec<NodeId> = iter.map(|n| self.graph[n].clone()).collect();
        ids.sort();
        ids.dedup();
        ids
    }

    /// Nodes with an edge into `id`, sorted; same as [`Graph::neighbors`] when undirected
    #[must_use]
    pub fn predecessors(&self, id: &str) -> Vec<NodeId> {
        if !self.directed {
            return self.neighbors(id);
        }
        let Some(&idx) = self.node_indices.get(id) else {
            return Vec::new();
        };
        let mut ids: Vec<NodeId> = self
            .graph
            .neighbors_directed(idx, Direction::Incoming)
            .map(|n| self.graph[n].clone())
            .collect();
        ids.sort();
        ids.dedup();
        ids
    }

    /// Nodes sharing an edge with `id` in either direction, sorted
    #[must_use]
    pub fn adjacent(&self, id: &str) -> Vec<NodeId> {
        let Some(&idx) = self.node_indices.get(id) else {
            return Vec::new();
        };
        let mut ids: Vec<NodeId> = self
            .graph
            .neighbors_undirected(idx)
            .map(|n| self.graph[n].clone())
            .collect();
        ids.sort();
        ids.dedup();
        ids
    }

    /// Targets of edges leaving `id`, sorted, regardless of the directed flag
    #[must_use]
    pub fn successors(&self, id: &str) -> Vec<NodeId> {
        let Some(&idx) = self.node_indices.get(id) else {
            return Vec::new();
        };
        let mut ids: Vec<NodeId> = self
            .graph
            .neighbors_directed(idx, Direction::Outgoing)
            .map(|n| self.graph[n].clone())
            .collect();
        ids.sort();
        ids.dedup();
        ids
    }

    /// Adjacent nodes with edge weights, sorted by id then weight
    #[must_use]
    pub fn weighted_neighbors(&self, id: &str) -> Vec<(NodeId, f64)> {
        let Some(&idx) = self.node_indices.get(id) else {
            return Vec::new();
        };
        let mut out: Vec<(NodeId, f64)> = self
            .graph
            .edges_directed(idx, Direction::Outgoing)
            .map(|e| (self.graph[e.target()].clone(), *e.weight()))
            .collect();
        if !self.directed {
            out.extend(
                self.graph
                    .edges_directed(idx, Direction::Incoming)
                    .filter(|e| e.source() != e.target())
                    .map(|e| (self.graph[e.source()].clone(), *e.weight())),
            );
        }
        out.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.total_cmp(&b.1)));
        out
    }

    /// Every traversable arc in input order
    ///
    /// Undirected edges contribute the reverse arc right after the forward one.
    #[must_use]
    pub fn arcs(&self) -> Vec<(NodeId, NodeId, f64)> {
        let mut arcs = Vec::with_capacity(self.edges.len() * 2);
        for edge in &self.edges {
            arcs.push((edge.source.clone(), edge.target.clone(), edge.cost()));
            if !self.directed && edge.source != edge.target {
                arcs.push((edge.target.clone(), edge.source.clone(), edge.cost()));
            }
        }
        arcs
    }

    /// Cheapest weight of an arc from `from` to `to`
    #[must_use]
    pub fn weight_between(&self, from: &str, to: &str) -> Option<f64> {
        self.weighted_neighbors(from)
            .into_iter()
            .filter(|(n, _)| n == to)
            .map(|(_, w)| w)
            .reduce(f64::min)
    }

    /// First edge with a negative weight, in input order
    #[must_use]
    pub fn negative_edge(&self) -> Option<&Edge> {
        self.edges.iter().find(|e| e.cost() < 0.0)
    }

    /// The underlying petgraph graph
    #[must_use]
    pub fn as_petgraph(&self) -> &DiGraph<NodeId, f64> {
        &self.graph
    }

    /// Export to DOT format
    #[must_use]
    pub fn to_dot(&self) -> String {
        self.to_dot_with(&HashSet::new(), &HashSet::new())
    }

    /// Export to DOT, drawing the given nodes and edges emphasised
    ///
    /// Edge keys are `(source, target)` pairs; undirected edges match either
    /// orientation.
    #[must_use]
    pub fn to_dot_with(
        &self,
        marked_nodes: &HashSet<NodeId>,
        marked_edges: &HashSet<(NodeId, NodeId)>,
    ) -> String {
        let (keyword, arrow) = if self.directed {
            ("digraph", "->")
        } else {
            ("graph", "--")
        };
        let mut dot = String::new();
        let _ = writeln!(dot, "{keyword} graphsteps {{");
        dot.push_str("  node [shape=circle];\n");

        for node in &self.nodes {
            let mut attrs = Vec::new();
            if let Some(label) = &node.label {
                attrs.push(format!("xlabel=\"{label}\""));
            }
            if let Some(c) = node.coordinates {
                attrs.push(format!("pos=\"{},{}!\"", c.x, c.y));
            }
            if marked_nodes.contains(&node.id) {
                attrs.push("style=filled, fillcolor=\"#ffd866\"".to_string());
            }
            if attrs.is_empty() {
                let _ = writeln!(dot, "  \"{}\";", node.id);
            } else {
                let _ = writeln!(dot, "  \"{}\" [{}];", node.id, attrs.join(", "));
            }
        }

        dot.push('\n');
        for edge in &self.edges {
            let mut attrs = Vec::new();
            if let Some(w) = edge.weight {
                attrs.push(format!("label=\"{}\"", format_cost(w)));
            }
            let forward = (edge.source.clone(), edge.target.clone());
            let backward = (edge.target.clone(), edge.source.clone());
            if marked_edges.contains(&forward)
                || (!self.directed && marked_edges.contains(&backward))
            {
                attrs.push("color=\"#d9480f\", penwidth=2.5".to_string());
            }
            if attrs.is_empty() {
                let _ = writeln!(dot, "  \"{}\" {arrow} \"{}\";", edge.source, edge.target);
            } else {
                let _ = writeln!(
                    dot,
                    "  \"{}\" {arrow} \"{}\" [{}];",
                    edge.source,
                    edge.target,
                    attrs.join(", ")
                );
            }
        }

        dot.push_str("}\n");
        dot
    }

    /// Export to JSON format
    pub fn to_json(&self) -> anyhow::Result<String> {
        serde_json::to_string_pretty(&self.description()).map_err(Into::into)
    }
}
