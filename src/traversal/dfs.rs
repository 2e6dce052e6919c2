// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Depth-first search variants
//!
//! Every variant runs on an explicit stack. The iterative variant keeps a
//! stack of node ids; the others keep `(node, next neighbor index)` frames so
//! that finishing a node is an observable transition.

use super::{Counter, Stepper};
use crate::graph::Graph;
use crate::selector::DfsVariant;
use crate::state::{Color, Frontier, SearchState};
use crate::types::{FrontierItem, NodeId, Outcome, Step, StepAction, StepData, Summary};
use std::collections::VecDeque;
use tracing::debug;

#[derive(Debug, Clone)]
struct Frame {
    node: NodeId,
    neighbors: Vec<NodeId>,
    next: usize,
}

/// Incremental depth-first search
#[derive(Debug, Clone)]
pub struct DfsStepper {
    variant: DfsVariant,
    start: NodeId,
    state: SearchState,
    frames: Vec<Frame>,
    roots: VecDeque<NodeId>,
    time: u32,
    /// Nodes in finish order
    finished: Vec<NodeId>,
    started: bool,
    outcome: Option<Outcome>,
    counter: Counter,
}

impl DfsStepper {
    /// Prepare a run from `start`
    #[must_use]
    pub fn new(variant: DfsVariant, start: impl Into<NodeId>) -> Self {
        Self {
            variant,
            start: start.into(),
            state: SearchState::new(Frontier::stack()),
            frames: Vec::new(),
            roots: VecDeque::new(),
            time: 0,
            finished: Vec::new(),
            started: false,
            outcome: None,
            counter: Counter::default(),
        }
    }

    /// Cycle detection and topological order look at the graph as directed
    fn follows_successors(&self) -> bool {
        matches!(
            self.variant,
            DfsVariant::CycleDetection | DfsVariant::Topological
        )
    }

    /// Whether the run covers every node, not just the start's reach
    fn covers_all_nodes(&self) -> bool {
        matches!(
            self.variant,
            DfsVariant::Timestamps | DfsVariant::CycleDetection | DfsVariant::Topological
        )
    }

    fn init(&mut self, graph: &Graph) -> Step {
        debug!(variant = %self.variant, start = %self.start, "dfs run started");
        self.roots.push_back(self.start.clone());
        if self.covers_all_nodes() {
            self.roots
                .extend(graph.node_ids().filter(|id| *id != self.start).map(String::from));
        }
        if self.variant == DfsVariant::Iterative {
            self.state.frontier.push(self.start.clone());
            return Step::new(StepAction::Init, format!("Push start node {}", self.start))
                .with_node(self.start.clone())
                .with_frontier(self.state.frontier.snapshot());
        }
        Step::new(StepAction::Init, format!("Depth-first search from {}", self.start))
            .with_node(self.start.clone())
    }

    // =========================================================================
    // Iterative
    // =========================================================================

    fn advance_iterative(&mut self, graph: &Graph) -> Step {
        let Some(current) = self.state.frontier.pop() else {
            self.outcome = Some(Outcome::Completed);
            return Step::new(
                StepAction::Done,
                format!("Stack empty; visited {} nodes", self.state.visited.len()),
            )
            .with_visited(self.state.visited_snapshot());
        };

        if self.state.is_visited(&current) {
            return Step::new(StepAction::Skip, format!("{current} already visited"))
                .with_node(current)
                .with_frontier(self.state.frontier.snapshot())
                .with_visited(self.state.visited_snapshot());
        }

        self.state.visit(&current);
        // Reverse push so the smallest neighbor pops first
        let mut pushed = Vec::new();
        for next in graph.neighbors(&current).into_iter().rev() {
            if !self.state.is_visited(&next) {
                self.state.parent.insert(next.clone(), current.clone());
                self.state.frontier.push(next.clone());
                pushed.push(next);
            }
        }

        let mut message = format!("Visit {current}");
        if !pushed.is_empty() {
            message.push_str(&format!("; push {}", pushed.join(", ")));
        }
        let mut step = Step::new(StepAction::Visit, message)
            .with_node(current.clone())
            .with_frontier(self.state.frontier.snapshot())
            .with_visited(self.state.visited_snapshot());
        if let Some(parent) = self.state.parent.get(&current) {
            step = step.with_from(parent.clone());
        }
        step
    }

    // =========================================================================
    // Frame based
    // =========================================================================

    fn frames_snapshot(&self) -> Vec<FrontierItem> {
        self.frames
            .iter()
            .rev()
            .map(|f| FrontierItem::plain(f.node.clone()))
            .collect()
    }

    fn enter(&mut self, graph: &Graph, node: NodeId, from: Option<NodeId>) -> Step {
        self.state.visit(&node);
        self.state.color.insert(node.clone(), Color::Gray);
        self.time += 1;
        self.state.discovery.insert(node.clone(), self.time);
        if let Some(parent) = &from {
            self.state.parent.insert(node.clone(), parent.clone());
        }

        let neighbors = if self.follows_successors() {
            graph.successors(&node)
        } else {
            graph.neighbors(&node)
        };
        self.frames.push(Frame {
            node: node.clone(),
            neighbors,
            next: 0,
        });

        let message = match (&from, self.variant) {
            (_, DfsVariant::Timestamps) => format!("Discover {node} at time {}", self.time),
            (Some(parent), _) => format!("Descend {parent} → {node}"),
            (None, _) => format!("Visit root {node}"),
        };
        let data = if self.variant == DfsVariant::Timestamps {
            StepData::Time { time: self.time }
        } else {
            StepData::None
        };
        let mut step = Step::new(StepAction::Visit, message)
            .with_node(node)
            .with_frontier(self.frames_snapshot())
            .with_visited(self.state.visited_snapshot())
            .with_data(data);
        if let Some(parent) = from {
            step = step.with_from(parent);
        }
        step
    }

    fn advance_frames(&mut self, graph: &Graph) -> Step {
        let detect_cycles = self.follows_successors();
        let Some(frame) = self.frames.last_mut() else {
            while let Some(root) = self.roots.pop_front() {
                if !self.state.is_visited(&root) {
                    return self.enter(graph, root, None);
                }
            }
            return self.finish_run();
        };

        let top = frame.node.clone();
        while frame.next < frame.neighbors.len() {
            let next = frame.neighbors[frame.next].clone();
            frame.next += 1;

            let color = self.state.color_of(&next);
            if color == Color::Gray && detect_cycles {
                return self.report_cycle(top, next);
            }
            if color == Color::White {
                return self.enter(graph, next, Some(top));
            }
        }

        // Every neighbor explored
        self.frames.pop();
        self.state.color.insert(top.clone(), Color::Black);
        self.time += 1;
        self.state.finish.insert(top.clone(), self.time);
        self.finished.push(top.clone());

        let message = match self.variant {
            DfsVariant::Timestamps => format!("Finish {top} at time {}", self.time),
            DfsVariant::Topological => format!("Finish {top}; prepend to order"),
            _ => format!("Backtrack from {top}"),
        };
        let data = if self.variant == DfsVariant::Timestamps {
            StepData::Time { time: self.time }
        } else {
            StepData::None
        };
        let mut step = Step::new(StepAction::Backtrack, message)
            .with_node(top)
            .with_frontier(self.frames_snapshot())
            .with_visited(self.state.visited_snapshot())
            .with_data(data);
        if let Some(frame) = self.frames.last() {
            step = step.with_from(frame.node.clone());
        }
        step
    }

    fn report_cycle(&mut self, from: NodeId, to: NodeId) -> Step {
        let (outcome, message) = if self.variant == DfsVariant::Topological {
            (
                Outcome::CyclicInput {
                    from: from.clone(),
                    to: to.clone(),
                },
                format!("Edge {from} → {to} closes a cycle; no topological order exists"),
            )
        } else {
            (
                Outcome::CycleDetected {
                    from: from.clone(),
                    to: to.clone(),
                },
                format!("Back edge {from} → {to}: {to} is still in progress"),
            )
        };
        self.outcome = Some(outcome);
        Step::new(StepAction::Cycle, message)
            .with_node(to)
            .with_from(from)
            .with_frontier(self.frames_snapshot())
            .with_visited(self.state.visited_snapshot())
    }

    fn finish_run(&mut self) -> Step {
        let visited = self.state.visited_snapshot();
        let (outcome, message) = match self.variant {
            DfsVariant::CycleDetection => (Outcome::Acyclic, "No back edge found; the graph is acyclic".to_string()),
            DfsVariant::Topological => {
                let order: Vec<_> = self.finished.iter().rev().cloned().collect();
                (Outcome::Completed, format!("Topological order: {}", order.join(", ")))
            }
            _ => (
                Outcome::Completed,
                format!("Stack empty; visited {} nodes", visited.len()),
            ),
        };
        self.outcome = Some(outcome);
        Step::new(StepAction::Done, message).with_visited(visited)
    }
}

impl Stepper for DfsStepper {
    fn advance(&mut self, graph: &Graph) -> Option<Step> {
        if self.outcome.is_some() {
            return None;
        }
        let step = if !self.started {
            self.started = true;
            self.init(graph)
        } else if self.variant == DfsVariant::Iterative {
            self.advance_iterative(graph)
        } else {
            self.advance_frames(graph)
        };
        Some(self.counter.stamp(step))
    }

    fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    fn summary(&self) -> Summary {
        let mut summary = Summary {
            visit_order: self.state.visit_order.clone(),
            parents: self.state.parent.clone(),
            ..Summary::default()
        };
        if self.variant == DfsVariant::Timestamps {
            summary.discovery = self.state.discovery.clone();
            summary.finish = self.state.finish.clone();
        }
        if self.variant == DfsVariant::Topological && self.outcome == Some(Outcome::Completed) {
            summary.topological_order = self.finished.iter().rev().cloned().collect();
        }
        summary
    }
}
