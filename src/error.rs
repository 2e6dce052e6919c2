// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Library error type

use crate::types::NodeId;
use thiserror::Error;

/// Everything that can stop a trace from being produced
///
/// Terminal conditions of a run (unreachable goal, negative cycle, cyclic
/// input to a topological sort) are reported through
/// [`Outcome`](crate::types::Outcome), not through this type.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TraceError {
    /// A graph must have at least one node
    #[error("graph has no nodes")]
    EmptyGraph,

    /// Two nodes share an identifier
    #[error("duplicate node id '{0}'")]
    DuplicateNode(NodeId),

    /// An edge mentions an undeclared node
    #[error("edge {from} -> {to} references unknown node '{missing}'")]
    UnknownEndpoint {
        /// Edge source as written
        from: NodeId,
        /// Edge target as written
        to: NodeId,
        /// The endpoint that is not declared
        missing: NodeId,
    },

    /// An edge weight is not a number
    #[error("edge {from} -> {to} has an invalid weight")]
    InvalidWeight {
        /// Edge source
        from: NodeId,
        /// Edge target
        to: NodeId,
    },

    /// Start or goal is not part of the graph
    #[error("unknown node '{0}'")]
    UnknownNode(NodeId),

    /// Fixture name is not registered
    #[error("unknown graph fixture '{0}'")]
    UnknownFixture(String),

    /// Algorithm selector did not match
    #[error("unknown algorithm '{name}' (expected one of: {expected})")]
    UnknownAlgorithm {
        /// Selector as given
        name: String,
        /// Accepted selectors
        expected: String,
    },

    /// Variant selector did not match the algorithm
    #[error("unknown variant '{variant}' for {algorithm} (expected one of: {expected})")]
    UnknownVariant {
        /// Algorithm the variant was given for
        algorithm: String,
        /// Variant as given
        variant: String,
        /// Accepted variants
        expected: String,
    },

    /// The selected variant needs a goal node
    #[error("{0} requires a goal node")]
    MissingGoal(String),

    /// A non-negative-weight algorithm saw a negative edge
    #[error("edge {from} -> {to} has negative weight {weight}; {algorithm} needs non-negative weights")]
    NegativeWeight {
        /// Algorithm that rejected the graph
        algorithm: String,
        /// Edge source
        from: NodeId,
        /// Edge target
        to: NodeId,
        /// Offending weight
        weight: f64,
    },

    /// Heuristic search needs a position for every node
    #[error("node '{0}' has no coordinates; heuristic search needs them on every node")]
    MissingCoordinates(NodeId),

    /// Random graph parameters are out of range
    #[error("invalid random graph: {0}")]
    RandomGraph(String),

    /// An exhaustive search outgrew its expansion budget
    #[error("{algorithm} gave up after {limit} node expansions; the graph is too large for it")]
    SearchLimit {
        /// Algorithm that stopped
        algorithm: String,
        /// Expansions allowed
        limit: usize,
    },

    /// A run is being driven and must be stopped first
    #[error("a run is in progress; stop or reset it first")]
    RunInProgress,

    /// Tick requested while nothing is running
    #[error("no run in progress")]
    NotRunning,

    /// A graph description could not be parsed
    #[error("failed to load graph: {0}")]
    Load(String),
}

/// Result alias for library operations
pub type Result<T, E = TraceError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_offender() {
        let err = TraceError::UnknownEndpoint {
            from: "A".into(),
            to: "Z".into(),
            missing: "Z".into(),
        };
        assert_eq!(err.to_string(), "edge A -> Z references unknown node 'Z'");

        let err = TraceError::MissingGoal("bfs/shortest-path".into());
        assert!(err.to_string().contains("requires a goal"));
    }
}
