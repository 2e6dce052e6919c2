// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Breadth-first search variants

use super::{hop_cost, Counter, Stepper};
use crate::graph::Graph;
use crate::selector::BfsVariant;
use crate::state::{Frontier, SearchState};
use crate::types::{NodeId, Outcome, SearchSide, Step, StepAction, StepData, Summary};
use std::collections::VecDeque;
use tracing::debug;

/// Incremental breadth-first search
#[derive(Debug, Clone)]
pub struct BfsStepper {
    variant: BfsVariant,
    start: NodeId,
    goal: Option<NodeId>,
    forward: SearchState,
    /// Goal-rooted search, only used by the bidirectional variant
    backward: SearchState,
    /// Expansion order across both sides of a bidirectional run
    expansions: Vec<NodeId>,
    roots: VecDeque<NodeId>,
    components: Vec<Vec<NodeId>>,
    started: bool,
    outcome: Option<Outcome>,
    counter: Counter,
}

impl BfsStepper {
    /// Prepare a run; nothing happens until the first [`Stepper::advance`]
    #[must_use]
    pub fn new(variant: BfsVariant, start: impl Into<NodeId>, goal: Option<NodeId>) -> Self {
        Self {
            variant,
            start: start.into(),
            goal,
            forward: SearchState::new(Frontier::queue()),
            backward: SearchState::new(Frontier::queue()),
            expansions: Vec::new(),
            roots: VecDeque::new(),
            components: Vec::new(),
            started: false,
            outcome: None,
            counter: Counter::default(),
        }
    }

    fn init(&mut self, graph: &Graph) -> Step {
        debug!(variant = %self.variant, start = %self.start, "bfs run started");
        match self.variant {
            BfsVariant::Components => {
                self.roots = graph.node_ids().map(String::from).collect();
                Step::new(
                    StepAction::Init,
                    format!("Partition {} nodes into connected components", graph.node_count()),
                )
            }
            BfsVariant::Bidirectional => {
                let Some(goal) = self.goal.clone() else {
                    self.outcome = Some(Outcome::NoPath);
                    return Step::new(StepAction::NoPath, "No goal given for bidirectional search");
                };
                self.forward.frontier.push(self.start.clone());
                self.forward.visited.insert(self.start.clone());
                self.backward.frontier.push(goal.clone());
                self.backward.visited.insert(goal.clone());
                Step::new(
                    StepAction::Init,
                    format!("Search from {} and from {goal} at the same time", self.start),
                )
                .with_node(self.start.clone())
                .with_frontier(self.forward.frontier.snapshot())
                .with_data(StepData::Side {
                    side: SearchSide::Forward,
                    other_frontier: self.backward.frontier.ids(),
                })
            }
            _ => {
                self.forward.frontier.push(self.start.clone());
                self.forward.level.insert(self.start.clone(), 0);
                Step::new(StepAction::Init, format!("Enqueue start node {}", self.start))
                    .with_node(self.start.clone())
                    .with_frontier(self.forward.frontier.snapshot())
            }
        }
    }

    /// Dequeue one node, visit it and enqueue its undiscovered neighbors
    fn expand(&mut self, graph: &Graph) -> Step {
        let Some(current) = self.forward.frontier.pop() else {
            return self.exhausted();
        };
        self.forward.visit(&current);
        let level = self.forward.level.get(&current).copied().unwrap_or(0);

        if self.variant == BfsVariant::ShortestPath && self.goal.as_deref() == Some(current.as_str()) {
            let path = self.forward.path_to(&current);
            let message = format!("Reached goal {current}: {}", path.join(" → "));
            self.outcome = Some(Outcome::PathFound {
                cost: hop_cost(&path),
                path,
            });
            return Step::new(StepAction::Goal, message)
                .with_node(current)
                .with_frontier(self.forward.frontier.snapshot())
                .with_visited(self.forward.visited_snapshot())
                .with_data(StepData::Level { level });
        }

        let neighbors = if self.variant == BfsVariant::Components {
            graph.adjacent(&current)
        } else {
            graph.neighbors(&current)
        };
        let mut discovered = Vec::new();
        for next in neighbors {
            if self.forward.is_visited(&next) || self.forward.frontier.contains(&next) {
                continue;
            }
            self.forward.parent.insert(next.clone(), current.clone());
            self.forward.level.insert(next.clone(), level + 1);
            self.forward.frontier.push(next.clone());
            discovered.push(next);
        }

        let mut message = match self.variant {
            BfsVariant::Levels => format!("Visit {current} at level {level}"),
            _ => format!("Visit {current}"),
        };
        if !discovered.is_empty() {
            message.push_str(&format!("; enqueue {}", discovered.join(", ")));
        }
        let data = match self.variant {
            BfsVariant::Levels => StepData::Level { level },
            BfsVariant::Components => StepData::Component {
                index: self.components.len().saturating_sub(1),
            },
            _ => StepData::None,
        };

        let mut step = Step::new(StepAction::Visit, message)
            .with_node(current.clone())
            .with_frontier(self.forward.frontier.snapshot())
            .with_visited(self.forward.visited_snapshot())
            .with_data(data);
        if let Some(parent) = self.forward.parent.get(&current) {
            step = step.with_from(parent.clone());
        }
        if let Some(component) = self.components.last_mut() {
            component.push(current);
        }
        step
    }

    fn exhausted(&mut self) -> Step {
        let visited = self.forward.visited_snapshot();
        if self.variant == BfsVariant::ShortestPath {
            self.outcome = Some(Outcome::NoPath);
            let goal = self.goal.as_deref().unwrap_or("goal");
            return Step::new(
                StepAction::NoPath,
                format!("Queue exhausted; {goal} is unreachable from {}", self.start),
            )
            .with_visited(visited);
        }
        self.outcome = Some(Outcome::Completed);
        Step::new(
            StepAction::Done,
            format!("Queue empty; visited {} nodes", visited.len()),
        )
        .with_visited(visited)
    }

    fn advance_components(&mut self, graph: &Graph) -> Step {
        if !self.forward.frontier.is_empty() {
            return self.expand(graph);
        }
        while let Some(root) = self.roots.pop_front() {
            if self.forward.is_visited(&root) {
                continue;
            }
            self.components.push(Vec::new());
            self.forward.level.insert(root.clone(), 0);
            self.forward.frontier.push(root.clone());
            return Step::new(
                StepAction::Enqueue,
                format!("Start component {} at {root}", self.components.len()),
            )
            .with_node(root)
            .with_frontier(self.forward.frontier.snapshot())
            .with_visited(self.forward.visited_snapshot())
            .with_data(StepData::Component {
                index: self.components.len() - 1,
            });
        }
        self.outcome = Some(Outcome::Completed);
        Step::new(
            StepAction::Done,
            format!("Found {} connected components", self.components.len()),
        )
        .with_visited(self.forward.visited_snapshot())
    }

    fn advance_bidirectional(&mut self, graph: &Graph) -> Step {
        if self.forward.frontier.is_empty() || self.backward.frontier.is_empty() {
            self.outcome = Some(Outcome::NoPath);
            return Step::new(
                StepAction::NoPath,
                "A frontier is exhausted; start and goal are not connected",
            )
            .with_visited(self.forward.visited_snapshot());
        }

        let side = if self.forward.frontier.len() <= self.backward.frontier.len() {
            SearchSide::Forward
        } else {
            SearchSide::Backward
        };
        let (this, other) = match side {
            SearchSide::Forward => (&mut self.forward, &self.backward),
            SearchSide::Backward => (&mut self.backward, &self.forward),
        };
        let Some(current) = this.frontier.pop() else {
            self.outcome = Some(Outcome::NoPath);
            return Step::new(StepAction::NoPath, "Frontier exhausted");
        };
        self.expansions.push(current.clone());

        if other.visited.contains(&current) {
            let mut path = self.forward.path_to(&current);
            let mut tail = self.backward.path_to(&current);
            tail.reverse();
            path.extend(tail.into_iter().skip(1));
            let message = format!("Frontiers meet at {current}: {}", path.join(" → "));
            self.outcome = Some(Outcome::PathFound {
                cost: hop_cost(&path),
                path,
            });
            return Step::new(StepAction::Goal, message)
                .with_node(current)
                .with_visited(self.forward.visited_snapshot());
        }

        // The goal-rooted side walks edges backwards
        let neighbors = match side {
            SearchSide::Forward => graph.neighbors(&current),
            SearchSide::Backward => graph.predecessors(&current),
        };
        let mut discovered = Vec::new();
        for next in neighbors {
            if this.visited.insert(next.clone()) {
                this.parent.insert(next.clone(), current.clone());
                this.frontier.push(next.clone());
                discovered.push(next);
            }
        }

        let label = match side {
            SearchSide::Forward => "start",
            SearchSide::Backward => "goal",
        };
        let mut message = format!("Expand {current} from the {label} side");
        if !discovered.is_empty() {
            message.push_str(&format!("; enqueue {}", discovered.join(", ")));
        }
        let mut step = Step::new(StepAction::Visit, message)
            .with_node(current.clone())
            .with_frontier(this.frontier.snapshot())
            .with_visited(this.visited_snapshot())
            .with_data(StepData::Side {
                side,
                other_frontier: other.frontier.ids(),
            });
        if let Some(parent) = this.parent.get(&current) {
            step = step.with_from(parent.clone());
        }
        step
    }
}

impl Stepper for BfsStepper {
    fn advance(&mut self, graph: &Graph) -> Option<Step> {
        if self.outcome.is_some() {
            return None;
        }
        let step = if self.started {
            match self.variant {
                BfsVariant::Components => self.advance_components(graph),
                BfsVariant::Bidirectional => self.advance_bidirectional(graph),
                _ => self.expand(graph),
            }
        } else {
            self.started = true;
            if self.variant == BfsVariant::ShortestPath && self.goal.is_none() {
                self.outcome = Some(Outcome::NoPath);
                Step::new(StepAction::NoPath, "No goal given for shortest-path search")
            } else {
                self.init(graph)
            }
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
        let visit_order = if self.variant == BfsVariant::Bidirectional {
            self.expansions.clone()
        } else {
            self.forward.visit_order.clone()
        };
        let levels = match self.variant {
            BfsVariant::Levels | BfsVariant::ShortestPath => self
                .forward
                .level
                .iter()
                .filter(|(node, _)| self.forward.is_visited(node))
                .map(|(n, l)| (n.clone(), *l))
                .collect(),
            _ => Default::default(),
        };
        Summary {
            visit_order,
            parents: self.forward.parent.clone(),
            levels,
            components: self.components.clone(),
            ..Summary::default()
        }
    }
}
