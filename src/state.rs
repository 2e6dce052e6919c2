// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Mutable per-run search state and step recording

use crate::types::{FrontierItem, NodeId, Step};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, BinaryHeap, VecDeque};

// =============================================================================
// Frontier containers
// =============================================================================

/// FIFO or LIFO frontier of node ids
#[derive(Debug, Clone)]
pub enum Frontier {
    /// Breadth-first queue
    Queue(VecDeque<NodeId>),
    /// Depth-first stack; the top is the last element
    Stack(Vec<NodeId>),
}

impl Frontier {
    /// Empty queue
    #[must_use]
    pub fn queue() -> Self {
        Self::Queue(VecDeque::new())
    }

    /// Empty stack
    #[must_use]
    pub fn stack() -> Self {
        Self::Stack(Vec::new())
    }

    /// Add a node at the back (queue) or top (stack)
    pub fn push(&mut self, node: NodeId) {
        match self {
            Self::Queue(q) => q.push_back(node),
            Self::Stack(s) => s.push(node),
        }
    }

    /// Remove the next node to process
    pub fn pop(&mut self) -> Option<NodeId> {
        match self {
            Self::Queue(q) => q.pop_front(),
            Self::Stack(s) => s.pop(),
        }
    }

    /// Whether the node is waiting in the frontier
    #[must_use]
    pub fn contains(&self, node: &str) -> bool {
        match self {
            Self::Queue(q) => q.iter().any(|n| n == node),
            Self::Stack(s) => s.iter().any(|n| n == node),
        }
    }

    /// Number of waiting entries
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Queue(q) => q.len(),
            Self::Stack(s) => s.len(),
        }
    }

    /// Whether nothing is waiting
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Entries in processing order (queue front first, stack top first)
    #[must_use]
    pub fn ids(&self) -> Vec<NodeId> {
        match self {
            Self::Queue(q) => q.iter().cloned().collect(),
            Self::Stack(s) => s.iter().rev().cloned().collect(),
        }
    }

    /// Snapshot for a step
    #[must_use]
    pub fn snapshot(&self) -> Vec<FrontierItem> {
        self.ids().into_iter().map(FrontierItem::plain).collect()
    }
}

#[derive(Debug, Clone)]
struct Entry {
    priority: f64,
    seq: u64,
    node: NodeId,
    cost: f64,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse for a min-heap; equal keys pop in insertion order
        other
            .priority
            .total_cmp(&self.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Min-priority frontier with insertion-order tie breaking
///
/// Entries are never decreased in place; callers push a new entry and skip
/// the stale one when it pops.
#[derive(Debug, Clone, Default)]
pub struct PriorityFrontier {
    heap: BinaryHeap<Entry>,
    next_seq: u64,
}

/// An entry taken from a [`PriorityFrontier`]
#[derive(Debug, Clone, PartialEq)]
pub struct Popped {
    /// Node id
    pub node: NodeId,
    /// Key the entry was ordered by
    pub priority: f64,
    /// Path cost carried with the entry
    pub cost: f64,
}

impl PriorityFrontier {
    /// Empty frontier
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node with its key and carried cost
    pub fn push(&mut self, node: NodeId, priority: f64, cost: f64) {
        self.heap.push(Entry {
            priority,
            seq: self.next_seq,
            node,
            cost,
        });
        self.next_seq += 1;
    }

    /// Remove the entry with the smallest key
    pub fn pop(&mut self) -> Option<Popped> {
        self.heap.pop().map(|e| Popped {
            node: e.node,
            priority: e.priority,
            cost: e.cost,
        })
    }

    /// Whether any entry holds this node
    #[must_use]
    pub fn contains(&self, node: &str) -> bool {
        self.heap.iter().any(|e| e.node == node)
    }

    /// Number of entries, stale ones included
    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Whether the frontier is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Entries in pop order
    #[must_use]
    pub fn snapshot(&self) -> Vec<FrontierItem> {
        let mut entries: Vec<&Entry> = self.heap.iter().collect();
        entries.sort_by(|a, b| b.cmp(a));
        entries
            .into_iter()
            .map(|e| FrontierItem::keyed(e.node.clone(), e.priority))
            .collect()
    }
}

// =============================================================================
// Search state
// =============================================================================

/// Tri-color marking for depth-first cycle detection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    /// Not yet discovered
    White,
    /// Discovered, neighbors still being explored
    Gray,
    /// Every neighbor explored
    Black,
}

/// Mutable record of one run; created fresh per run and never shared
#[derive(Debug, Clone)]
pub struct SearchState {
    /// Queue or stack of waiting nodes
    pub frontier: Frontier,
    /// Processed (or, for bidirectional search, discovered) nodes
    pub visited: BTreeSet<NodeId>,
    /// Processing order
    pub visit_order: Vec<NodeId>,
    /// Search-tree parents
    pub parent: BTreeMap<NodeId, NodeId>,
    /// Hop levels
    pub level: BTreeMap<NodeId, u32>,
    /// Discovery timestamps
    pub discovery: BTreeMap<NodeId, u32>,
    /// Finish timestamps
    pub finish: BTreeMap<NodeId, u32>,
    /// Cycle-detection colors; absent means white
    pub color: BTreeMap<NodeId, Color>,
}

impl SearchState {
    /// Fresh state around the given frontier
    #[must_use]
    pub fn new(frontier: Frontier) -> Self {
        Self {
            frontier,
            visited: BTreeSet::new(),
            visit_order: Vec::new(),
            parent: BTreeMap::new(),
            level: BTreeMap::new(),
            discovery: BTreeMap::new(),
            finish: BTreeMap::new(),
            color: BTreeMap::new(),
        }
    }

    /// Mark a node processed and append it to the visit log
    pub fn visit(&mut self, node: &str) {
        self.visited.insert(node.to_string());
        self.visit_order.push(node.to_string());
    }

    /// Whether the node has been processed
    #[must_use]
    pub fn is_visited(&self, node: &str) -> bool {
        self.visited.contains(node)
    }

    /// Current color of a node
    #[must_use]
    pub fn color_of(&self, node: &str) -> Color {
        self.color.get(node).copied().unwrap_or(Color::White)
    }

    /// Sorted copy of the visited set
    #[must_use]
    pub fn visited_snapshot(&self) -> Vec<NodeId> {
        self.visited.iter().cloned().collect()
    }

    /// Walk parent pointers back from `node` and return the root-first path
    #[must_use]
    pub fn path_to(&self, node: &str) -> Vec<NodeId> {
        walk_parents(&self.parent, node)
    }
}

/// Follow `parent` links from `node` to the root, returning root-first order
#[must_use]
pub fn walk_parents(parent: &BTreeMap<NodeId, NodeId>, node: &str) -> Vec<NodeId> {
    let mut path = vec![node.to_string()];
    let mut current = node;
    while let Some(p) = parent.get(current) {
        // Parent maps are trees; the guard only protects against bad input
        if path.len() > parent.len() + 1 {
            break;
        }
        path.push(p.clone());
        current = p;
    }
    path.reverse();
    path
}

// =============================================================================
// Step recording
// =============================================================================

/// Ordered step recorder that assigns sequence indices
#[derive(Debug, Clone, Default)]
pub struct StepLog {
    steps: Vec<Step>,
}

impl StepLog {
    /// Empty log
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step, stamping its index
    pub fn push(&mut self, mut step: Step) {
        step.index = self.steps.len();
        tracing::trace!(index = step.index, action = ?step.action, "{}", step.message);
        self.steps.push(step);
    }

    /// Number of recorded steps
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether nothing was recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Hand over the recorded steps
    #[must_use]
    pub fn into_steps(self) -> Vec<Step> {
        self.steps
    }
}
