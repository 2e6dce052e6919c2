// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Graphsteps library - step-by-step traces of classic graph algorithms
//!
//! This crate turns small fixed graphs into ordered, replayable sequences of
//! algorithm steps (node visited, edge relaxed, frontier contents) that a
//! renderer can animate one transition at a time.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod commands;
pub mod config;
pub mod error;
pub mod fixtures;
pub mod generator;
pub mod graph;
pub mod heuristic;
pub mod mst;
pub mod random;
pub mod render;
pub mod runner;
pub mod selector;
pub mod state;
pub mod traversal;
pub mod weighted;

/// Core data types shared by every generator
pub mod types {
    use serde::{Deserialize, Serialize};
    use std::collections::BTreeMap;

    /// Node identifier as written in the graph fixture
    pub type NodeId = String;

    // =========================================================================
    // Graph Elements
    // =========================================================================

    /// Planar position used by distance heuristics
    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    pub struct Coordinates {
        /// X coordinate
        pub x: f64,
        /// Y coordinate
        pub y: f64,
    }

    /// A vertex of the graph
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct Node {
        /// Unique identifier
        pub id: NodeId,
        /// Optional coordinates, required by heuristic search
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub coordinates: Option<Coordinates>,
        /// Optional display name shown next to the id
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub label: Option<String>,
    }

    impl Node {
        /// Create a node without coordinates
        #[must_use]
        pub fn new(id: impl Into<NodeId>) -> Self {
            Self {
                id: id.into(),
                coordinates: None,
                label: None,
            }
        }

        /// Create a node placed at `(x, y)`
        #[must_use]
        pub fn at(id: impl Into<NodeId>, x: f64, y: f64) -> Self {
            Self {
                id: id.into(),
                coordinates: Some(Coordinates { x, y }),
                label: None,
            }
        }

        /// Attach a display name
        #[must_use]
        pub fn with_label(mut self, label: impl Into<String>) -> Self {
            self.label = Some(label.into());
            self
        }
    }

    /// A connection between two nodes
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct Edge {
        /// Source node ID
        pub source: NodeId,
        /// Target node ID
        pub target: NodeId,
        /// Edge weight; unweighted edges cost 1
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub weight: Option<f64>,
    }

    impl Edge {
        /// Create an unweighted edge
        #[must_use]
        pub fn new(source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
            Self {
                source: source.into(),
                target: target.into(),
                weight: None,
            }
        }

        /// Create a weighted edge
        #[must_use]
        pub fn weighted(source: impl Into<NodeId>, target: impl Into<NodeId>, weight: f64) -> Self {
            Self {
                source: source.into(),
                target: target.into(),
                weight: Some(weight),
            }
        }

        /// Traversal cost of this edge
        #[must_use]
        pub fn cost(&self) -> f64 {
            self.weight.unwrap_or(1.0)
        }
    }

    // =========================================================================
    // Steps
    // =========================================================================

    /// Kind of transition a step records
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "kebab-case")]
    pub enum StepAction {
        /// Initial state before any node is processed
        Init,
        /// A node entered the frontier without being processed
        Enqueue,
        /// A node was taken from the frontier and processed
        Visit,
        /// A frontier entry was discarded (stale or already visited)
        Skip,
        /// A tentative distance improved through an edge
        Relax,
        /// A score or table entry changed without a strict improvement
        Update,
        /// A depth-first frame was exhausted and popped
        Backtrack,
        /// A cycle-creating edge was found
        Cycle,
        /// The goal was reached
        Goal,
        /// The goal is unreachable
        NoPath,
        /// An edge was added to the spanning forest
        Accept,
        /// An edge was rejected because it would close a cycle
        Reject,
        /// A new relaxation pass or deepening round began
        Iteration,
        /// The run finished without a goal to reach
        Done,
    }

    /// One entry of a frontier snapshot
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct FrontierItem {
        /// Queued node
        pub node: NodeId,
        /// Priority key for priority frontiers
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub priority: Option<f64>,
    }

    impl FrontierItem {
        /// Entry of a plain queue or stack
        #[must_use]
        pub fn plain(node: impl Into<NodeId>) -> Self {
            Self {
                node: node.into(),
                priority: None,
            }
        }

        /// Entry of a priority frontier
        #[must_use]
        pub fn keyed(node: impl Into<NodeId>, priority: f64) -> Self {
            Self {
                node: node.into(),
                priority: Some(priority),
            }
        }
    }

    /// Which end a bidirectional search expanded from
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum SearchSide {
        /// Search rooted at the start node
        Forward,
        /// Search rooted at the goal node
        Backward,
    }

    /// Algorithm-specific payload of a step
    #[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
    #[serde(tag = "kind", rename_all = "snake_case")]
    pub enum StepData {
        /// No extra data
        #[default]
        None,
        /// Hop distance from the start
        Level {
            /// Level of the node
            level: u32,
        },
        /// Cumulative distance from the start
        Distance {
            /// Distance of the node
            distance: f64,
        },
        /// A* style scores
        Scores {
            /// Cost from the start
            g: f64,
            /// Heuristic estimate to the goal
            h: f64,
            /// Frontier key
            f: f64,
        },
        /// Depth-first timestamp
        Time {
            /// Counter value
            time: u32,
        },
        /// Relaxation within a numbered pass
        Relaxation {
            /// Pass number, starting at 1
            iteration: usize,
            /// New distance of the target
            distance: f64,
        },
        /// All-pairs matrix cell change
        Cell {
            /// Row node
            i: NodeId,
            /// Column node
            j: NodeId,
            /// Intermediate node
            k: NodeId,
            /// New value (distance, or 1 for reachable)
            value: f64,
        },
        /// Spanning forest edge decision
        EdgeWeight {
            /// Weight of the considered edge
            weight: f64,
            /// Accumulated forest weight
            total: f64,
        },
        /// Iterative deepening bound
        Threshold {
            /// Current f bound
            threshold: f64,
        },
        /// Connected component membership
        Component {
            /// Zero-based component index
            index: usize,
        },
        /// Bidirectional expansion
        Side {
            /// Side that was expanded
            side: SearchSide,
            /// Snapshot of the opposite frontier
            other_frontier: Vec<NodeId>,
        },
    }

    /// An immutable record of a single algorithm transition
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct Step {
        /// Position in the trace, starting at 0
        pub index: usize,
        /// Transition kind
        pub action: StepAction,
        /// Primary node involved
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub node: Option<NodeId>,
        /// Node the transition came from (edge source)
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub from: Option<NodeId>,
        /// Frontier contents after the transition
        #[serde(default)]
        pub frontier: Vec<FrontierItem>,
        /// Visited set after the transition, sorted
        #[serde(default)]
        pub visited: Vec<NodeId>,
        /// Algorithm-specific payload
        #[serde(default)]
        pub data: StepData,
        /// Human-readable description
        pub message: String,
    }

    impl Step {
        /// Create a step; the index is assigned when it is recorded
        #[must_use]
        pub fn new(action: StepAction, message: impl Into<String>) -> Self {
            Self {
                index: 0,
                action,
                node: None,
                from: None,
                frontier: Vec::new(),
                visited: Vec::new(),
                data: StepData::None,
                message: message.into(),
            }
        }

        /// Set the primary node
        #[must_use]
        pub fn with_node(mut self, node: impl Into<NodeId>) -> Self {
            self.node = Some(node.into());
            self
        }

        /// Set the originating node
        #[must_use]
        pub fn with_from(mut self, from: impl Into<NodeId>) -> Self {
            self.from = Some(from.into());
            self
        }

        /// Attach a frontier snapshot
        #[must_use]
        pub fn with_frontier(mut self, frontier: Vec<FrontierItem>) -> Self {
            self.frontier = frontier;
            self
        }

        /// Attach a visited-set snapshot
        #[must_use]
        pub fn with_visited(mut self, visited: Vec<NodeId>) -> Self {
            self.visited = visited;
            self
        }

        /// Attach algorithm data
        #[must_use]
        pub fn with_data(mut self, data: StepData) -> Self {
            self.data = data;
            self
        }
    }

    // =========================================================================
    // Results
    // =========================================================================

    /// Terminal result of a run
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(tag = "status", rename_all = "snake_case")]
    pub enum Outcome {
        /// The run explored everything it was asked to
        Completed,
        /// A path to the goal was found
        PathFound {
            /// Node sequence from start to goal
            path: Vec<NodeId>,
            /// Total cost (edge count for unweighted searches)
            cost: f64,
        },
        /// The goal cannot be reached from the start
        NoPath,
        /// Cycle detection finished without finding a back edge
        Acyclic,
        /// A back edge to an in-progress node was found
        CycleDetected {
            /// Edge source
            from: NodeId,
            /// In-progress edge target
            to: NodeId,
        },
        /// A relaxation was still possible after V-1 passes
        NegativeCycle {
            /// Edge source
            from: NodeId,
            /// Edge target
            to: NodeId,
        },
        /// Topological order was requested on a cyclic graph
        CyclicInput {
            /// Edge source
            from: NodeId,
            /// Edge target closing the cycle
            to: NodeId,
        },
        /// Kruskal connected every node
        SpanningTree {
            /// Selected edges in acceptance order
            edges: Vec<Edge>,
            /// Sum of selected weights
            total_weight: f64,
        },
        /// Kruskal ran out of edges before connecting every node
        SpanningForest {
            /// Selected edges in acceptance order
            edges: Vec<Edge>,
            /// Sum of selected weights
            total_weight: f64,
            /// Number of trees in the forest
            components: usize,
        },
    }

    impl Outcome {
        /// Path to the goal, if one was found
        #[must_use]
        pub fn path(&self) -> Option<&[NodeId]> {
            match self {
                Self::PathFound { path, .. } => Some(path),
                _ => None,
            }
        }

        /// Whether this outcome reports a failure condition of the input
        #[must_use]
        pub fn is_failure(&self) -> bool {
            matches!(
                self,
                Self::NoPath
                    | Self::NegativeCycle { .. }
                    | Self::CyclicInput { .. }
                    | Self::SpanningForest { .. }
            )
        }
    }

    /// All-pairs distance table in graph node order
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct DistanceMatrix {
        /// Row and column labels
        pub nodes: Vec<NodeId>,
        /// `rows[i][j]` is the distance from `nodes[i]` to `nodes[j]`
        pub rows: Vec<Vec<Option<f64>>>,
    }

    impl DistanceMatrix {
        /// Distance between two nodes, `None` when unreachable or unknown
        #[must_use]
        pub fn get(&self, from: &str, to: &str) -> Option<f64> {
            let i = self.nodes.iter().position(|n| n == from)?;
            let j = self.nodes.iter().position(|n| n == to)?;
            self.rows[i][j]
        }
    }

    /// Derived tables of a finished run
    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    pub struct Summary {
        /// Nodes in the order they were processed
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        pub visit_order: Vec<NodeId>,
        /// Final distances of reachable nodes
        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        pub distances: BTreeMap<NodeId, f64>,
        /// Search-tree parent of each discovered node
        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        pub parents: BTreeMap<NodeId, NodeId>,
        /// Every shortest-path predecessor of each node
        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        pub predecessors: BTreeMap<NodeId, Vec<NodeId>>,
        /// Hop level of each reached node
        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        pub levels: BTreeMap<NodeId, u32>,
        /// Connected components in discovery order
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        pub components: Vec<Vec<NodeId>>,
        /// Discovery timestamps
        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        pub discovery: BTreeMap<NodeId, u32>,
        /// Finish timestamps
        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        pub finish: BTreeMap<NodeId, u32>,
        /// Reverse post-order of a DAG
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        pub topological_order: Vec<NodeId>,
        /// All-pairs shortest distances
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub matrix: Option<DistanceMatrix>,
        /// All-pairs reachability in graph node order
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub reachability: Option<Vec<Vec<bool>>>,
        /// Every shortest path to the goal, when enumerated
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        pub all_paths: Vec<Vec<NodeId>>,
    }

    /// Format a cost without trailing zeros for whole numbers
    #[must_use]
    pub fn format_cost(value: f64) -> String {
        if value.is_infinite() {
            "∞".to_string()
        } else if value.fract() == 0.0 {
            format!("{value:.0}")
        } else {
            format!("{value:.1}")
        }
    }
}

/// Prelude for common imports
pub mod prelude {
    pub use crate::error::{Result, TraceError};
    pub use crate::generator::{generate, Trace};
    pub use crate::graph::Graph;
    pub use crate::selector::{Algorithm, Selection};
    pub use crate::types::*;
}
