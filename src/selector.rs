// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Algorithm and variant selectors
//!
//! A [`Selection`] is validated when it is parsed, so a bad selector never
//! reaches a run.

use crate::error::{Result, TraceError};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Declares a selector enum with its canonical names and accepted aliases
macro_rules! selector_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $label:literal $(| $alias:literal)* ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "kebab-case")]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// Every value in declaration order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Canonical selector name
            #[must_use]
            pub fn name(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }

            fn lookup(s: &str) -> Option<Self> {
                match s {
                    $($label $(| $alias)* => Some($name::$variant),)+
                    _ => None,
                }
            }

            fn expected() -> String {
                Self::ALL.iter().map(|v| v.name()).collect::<Vec<_>>().join(", ")
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

selector_enum! {
    /// Algorithm family
    Algorithm {
        /// Breadth-first search
        Bfs => "bfs" | "breadth-first",
        /// Depth-first search
        Dfs => "dfs" | "depth-first",
        /// Dijkstra shortest paths
        Dijkstra => "dijkstra",
        /// Bellman-Ford shortest paths
        BellmanFord => "bellman-ford" | "bellmanford" | "bf",
        /// Floyd-Warshall all pairs
        FloydWarshall => "floyd-warshall" | "floyd" | "fw",
        /// A* search
        AStar => "astar" | "a*" | "a-star",
        /// Greedy best-first search
        Greedy => "greedy" | "best-first" | "greedy-best-first",
        /// Iterative deepening A*
        IdaStar => "idastar" | "ida*" | "ida-star",
        /// Kruskal minimum spanning tree
        Kruskal => "kruskal" | "mst",
    }
}

selector_enum! {
    /// Breadth-first variants
    BfsVariant {
        /// Plain visit order
        Standard => "standard",
        /// Hop level per node
        Levels => "levels",
        /// Stop at the goal and rebuild the path
        ShortestPath => "shortest-path" | "path",
        /// Partition every node into components
        Components => "components" | "connected-components",
        /// Search from both ends
        Bidirectional => "bidirectional",
    }
}

selector_enum! {
    /// Depth-first variants
    DfsVariant {
        /// Explicit stack of node ids
        Iterative => "iterative",
        /// Explicit stack of frames
        Recursive => "recursive" | "recursive-simulated",
        /// Discovery and finish times
        Timestamps => "timestamps",
        /// White/gray/black cycle detection
        CycleDetection => "cycle-detection" | "cycle",
        /// Reverse finish order of a DAG
        Topological => "topological" | "topological-sort",
    }
}

selector_enum! {
    /// Dijkstra variants
    DijkstraVariant {
        /// Distances only
        Standard => "standard",
        /// One predecessor per node
        PathReconstruction => "path-reconstruction" | "path",
        /// Every tying predecessor
        AllPaths => "all-paths" | "all-shortest-paths",
    }
}

selector_enum! {
    /// Bellman-Ford variants
    BellmanFordVariant {
        /// Up to V-1 passes
        Standard => "standard",
        /// Extra pass reporting negative cycles
        CycleDetection => "cycle-detection" | "cycle",
        /// Work-queue relaxation
        Spfa => "spfa",
    }
}

selector_enum! {
    /// Floyd-Warshall variants
    FloydWarshallVariant {
        /// Distance matrix
        Standard => "standard",
        /// Distance and next-hop matrices
        PathReconstruction => "path-reconstruction" | "path",
        /// Boolean reachability
        TransitiveClosure => "transitive-closure" | "closure",
    }
}

selector_enum! {
    /// A* heuristics
    AStarVariant {
        /// |dx| + |dy|
        Manhattan => "manhattan",
        /// Straight-line distance
        Euclidean => "euclidean",
        /// max(|dx|, |dy|)
        Chebyshev => "chebyshev",
        /// Manhattan inflated by 1.5
        Weighted => "weighted",
    }
}

/// How a selection is driven by the runner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriveMode {
    /// Whole trace computed up front, replayed one step per tick
    Batch,
    /// One transition computed per tick
    Incremental,
}

impl Algorithm {
    /// Variant names accepted for this algorithm
    #[must_use]
    pub fn variant_names(self) -> Vec<&'static str> {
        match self {
            Self::Bfs => BfsVariant::ALL.iter().map(|v| v.name()).collect(),
            Self::Dfs => DfsVariant::ALL.iter().map(|v| v.name()).collect(),
            Self::Dijkstra => DijkstraVariant::ALL.iter().map(|v| v.name()).collect(),
            Self::BellmanFord => BellmanFordVariant::ALL.iter().map(|v| v.name()).collect(),
            Self::FloydWarshall => FloydWarshallVariant::ALL.iter().map(|v| v.name()).collect(),
            Self::AStar => AStarVariant::ALL.iter().map(|v| v.name()).collect(),
            Self::Greedy | Self::IdaStar | Self::Kruskal => vec![STANDARD],
        }
    }

    /// Suggested fixture for demonstrating this algorithm
    #[must_use]
    pub fn default_fixture(self) -> &'static str {
        match self {
            Self::Bfs | Self::Dfs => "traversal",
            Self::Dijkstra | Self::BellmanFord | Self::FloydWarshall => "weighted",
            Self::AStar | Self::Greedy | Self::IdaStar => "heuristic",
            Self::Kruskal => "spanning",
        }
    }
}

impl FromStr for Algorithm {
    type Err = TraceError;

    fn from_str(s: &str) -> Result<Self> {
        Self::lookup(&normalize(s)).ok_or_else(|| TraceError::UnknownAlgorithm {
            name: s.to_string(),
            expected: Self::expected(),
        })
    }
}

const STANDARD: &str = "standard";

/// A validated algorithm and variant pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Selection {
    /// Breadth-first search
    Bfs(BfsVariant),
    /// Depth-first search
    Dfs(DfsVariant),
    /// Dijkstra
    Dijkstra(DijkstraVariant),
    /// Bellman-Ford
    BellmanFord(BellmanFordVariant),
    /// Floyd-Warshall
    FloydWarshall(FloydWarshallVariant),
    /// A* with the given heuristic
    AStar(AStarVariant),
    /// Greedy best-first
    Greedy,
    /// Iterative deepening A*
    IdaStar,
    /// Kruskal MST
    Kruskal,
}

impl Selection {
    /// Parse an algorithm name and optional variant name
    ///
    /// # Errors
    ///
    /// Returns [`TraceError::UnknownAlgorithm`] or [`TraceError::UnknownVariant`].
    pub fn parse(algorithm: &str, variant: Option<&str>) -> Result<Self> {
        let algorithm: Algorithm = algorithm.parse()?;
        let Some(raw) = variant else {
            return Ok(Self::default_for(algorithm));
        };
        let key = normalize(raw);
        let unknown = || TraceError::UnknownVariant {
            algorithm: algorithm.name().to_string(),
            variant: raw.to_string(),
            expected: algorithm.variant_names().join(", "),
        };

        let selection = match algorithm {
            Algorithm::Bfs => BfsVariant::lookup(&key).map(Self::Bfs),
            Algorithm::Dfs => DfsVariant::lookup(&key).map(Self::Dfs),
            Algorithm::Dijkstra => DijkstraVariant::lookup(&key).map(Self::Dijkstra),
            Algorithm::BellmanFord => BellmanFordVariant::lookup(&key).map(Self::BellmanFord),
            Algorithm::FloydWarshall => {
                FloydWarshallVariant::lookup(&key).map(Self::FloydWarshall)
            }
            Algorithm::AStar => AStarVariant::lookup(&key).map(Self::AStar),
            Algorithm::Greedy | Algorithm::IdaStar | Algorithm::Kruskal => {
                (key == STANDARD).then(|| Self::default_for(algorithm))
            }
        };
        selection.ok_or_else(unknown)
    }

    /// First variant of an algorithm
    #[must_use]
    pub fn default_for(algorithm: Algorithm) -> Self {
        match algorithm {
            Algorithm::Bfs => Self::Bfs(BfsVariant::Standard),
            Algorithm::Dfs => Self::Dfs(DfsVariant::Iterative),
            Algorithm::Dijkstra => Self::Dijkstra(DijkstraVariant::Standard),
            Algorithm::BellmanFord => Self::BellmanFord(BellmanFordVariant::Standard),
            Algorithm::FloydWarshall => Self::FloydWarshall(FloydWarshallVariant::Standard),
            Algorithm::AStar => Self::AStar(AStarVariant::Manhattan),
            Algorithm::Greedy => Self::Greedy,
            Algorithm::IdaStar => Self::IdaStar,
            Algorithm::Kruskal => Self::Kruskal,
        }
    }

    /// Algorithm family
    #[must_use]
    pub fn algorithm(self) -> Algorithm {
        match self {
            Self::Bfs(_) => Algorithm::Bfs,
            Self::Dfs(_) => Algorithm::Dfs,
            Self::Dijkstra(_) => Algorithm::Dijkstra,
            Self::BellmanFord(_) => Algorithm::BellmanFord,
            Self::FloydWarshall(_) => Algorithm::FloydWarshall,
            Self::AStar(_) => Algorithm::AStar,
            Self::Greedy => Algorithm::Greedy,
            Self::IdaStar => Algorithm::IdaStar,
            Self::Kruskal => Algorithm::Kruskal,
        }
    }

    /// Canonical variant name
    #[must_use]
    pub fn variant_name(self) -> &'static str {
        match self {
            Self::Bfs(v) => v.name(),
            Self::Dfs(v) => v.name(),
            Self::Dijkstra(v) => v.name(),
            Self::BellmanFord(v) => v.name(),
            Self::FloydWarshall(v) => v.name(),
            Self::AStar(v) => v.name(),
            Self::Greedy | Self::IdaStar | Self::Kruskal => STANDARD,
        }
    }

    /// Batch for priority-queue and table algorithms, incremental for BFS/DFS
    #[must_use]
    pub fn mode(self) -> DriveMode {
        match self {
            Self::Bfs(_) | Self::Dfs(_) => DriveMode::Incremental,
            _ => DriveMode::Batch,
        }
    }

    /// Whether a run needs a goal node
    #[must_use]
    pub fn requires_goal(self) -> bool {
        matches!(
            self,
            Self::Bfs(BfsVariant::ShortestPath | BfsVariant::Bidirectional)
                | Self::AStar(_)
                | Self::Greedy
                | Self::IdaStar
        )
    }

    /// Whether a run starts from a particular node
    #[must_use]
    pub fn uses_start(self) -> bool {
        !matches!(
            self,
            Self::Kruskal
                | Self::Bfs(BfsVariant::Components)
                | Self::FloydWarshall(FloydWarshallVariant::TransitiveClosure)
        )
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.algorithm(), self.variant_name())
    }
}

impl Serialize for Selection {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Selection", 2)?;
        s.serialize_field("algorithm", self.algorithm().name())?;
        s.serialize_field("variant", self.variant_name())?;
        s.end()
    }
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase().replace(['_', ' '], "-")
}
