// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Animation driver
//!
//! [`RunnerContext`] owns everything an animation needs: the graph, the
//! current selection, the speed, the running flag and the active session.
//! Batch selections replay a precomputed trace; BFS/DFS compute one
//! transition per tick.

use crate::error::{Result, TraceError};
use crate::generator::{generate, stepper_for, validate, Trace};
use crate::graph::Graph;
use crate::selector::Selection;
use crate::traversal::Stepper;
use crate::types::{NodeId, Outcome, Step};
use std::time::Duration;
use tracing::{debug, info};

/// Slowest accepted speed
pub const MIN_SPEED: u32 = 100;
/// Fastest accepted speed
pub const MAX_SPEED: u32 = 2000;
/// Speed slider default
pub const DEFAULT_SPEED: u32 = 800;

enum Session {
    Batch { trace: Box<Trace>, cursor: usize },
    Incremental { stepper: Box<dyn Stepper> },
}

impl Session {
    fn is_finished(&self) -> bool {
        match self {
            Self::Batch { trace, cursor } => *cursor >= trace.steps.len(),
            Self::Incremental { stepper } => stepper.is_finished(),
        }
    }

    fn outcome(&self) -> Option<Outcome> {
        match self {
            Self::Batch { trace, .. } => self.is_finished().then(|| trace.outcome.clone()),
            Self::Incremental { stepper } => stepper.outcome().cloned(),
        }
    }
}

/// Explicit animation state
pub struct RunnerContext {
    graph: Graph,
    selection: Selection,
    start: NodeId,
    goal: Option<NodeId>,
    speed: u32,
    running: bool,
    emitted: usize,
    session: Option<Session>,
}

impl RunnerContext {
    /// Create a stopped context
    ///
    /// # Errors
    ///
    /// Fails on unknown endpoints or a missing goal.
    pub fn new(graph: Graph, selection: Selection, start: &str, goal: Option<&str>) -> Result<Self> {
        validate(&graph, selection, start, goal)?;
        Ok(Self {
            graph,
            selection,
            start: start.to_string(),
            goal: goal.map(String::from),
            speed: DEFAULT_SPEED,
            running: false,
            emitted: 0,
            session: None,
        })
    }

    /// The graph being animated
    #[must_use]
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Current selection
    #[must_use]
    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Whether a driver is active
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Steps emitted by the current session
    #[must_use]
    pub fn steps_emitted(&self) -> usize {
        self.emitted
    }

    /// Terminal result once the session has produced its last step
    #[must_use]
    pub fn outcome(&self) -> Option<Outcome> {
        self.session.as_ref().and_then(Session::outcome)
    }

    /// Whether the session has produced its last step
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.session.as_ref().is_some_and(Session::is_finished)
    }

    /// Change algorithm or variant; discards the current session
    ///
    /// A rejected selection leaves the context untouched.
    ///
    /// # Errors
    ///
    /// Returns [`TraceError::RunInProgress`] while running, or
    /// [`TraceError::MissingGoal`] when the selection needs a goal and none
    /// is set.
    pub fn select(&mut self, selection: Selection) -> Result<()> {
        if self.running {
            return Err(TraceError::RunInProgress);
        }
        validate(&self.graph, selection, &self.start, self.goal.as_deref())?;
        self.selection = selection;
        self.discard();
        Ok(())
    }

    /// Change start and goal; discards the current session
    ///
    /// # Errors
    ///
    /// Returns [`TraceError::RunInProgress`] while running,
    /// [`TraceError::UnknownNode`] for undeclared ids, or
    /// [`TraceError::MissingGoal`] when dropping the goal of a selection
    /// that needs one.
    pub fn set_endpoints(&mut self, start: &str, goal: Option<&str>) -> Result<()> {
        if self.running {
            return Err(TraceError::RunInProgress);
        }
        validate(&self.graph, self.selection, start, goal)?;
        self.start = start.to_string();
        self.goal = goal.map(String::from);
        self.discard();
        Ok(())
    }

    /// Set the speed, clamped to `MIN_SPEED..=MAX_SPEED`; returns the stored value
    pub fn set_speed(&mut self, speed: u32) -> u32 {
        self.speed = speed.clamp(MIN_SPEED, MAX_SPEED);
        self.speed
    }

    /// Current speed
    #[must_use]
    pub fn speed(&self) -> u32 {
        self.speed
    }

    /// Delay between ticks: faster speeds tick sooner
    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(u64::from(MAX_SPEED + MIN_SPEED - self.speed))
    }

    /// Begin driving; a finished session is replaced by a fresh one
    ///
    /// # Errors
    ///
    /// Returns [`TraceError::RunInProgress`] if already running, or any
    /// validation or generation error of the selection.
    pub fn start(&mut self) -> Result<()> {
        if self.running {
            return Err(TraceError::RunInProgress);
        }
        if self.is_finished() {
            self.discard();
        }
        self.ensure_session()?;
        self.running = true;
        info!(selection = %self.selection, "run started");
        Ok(())
    }

    /// Advance one step of a running session
    ///
    /// Returns `None` and stops once the session is exhausted.
    ///
    /// # Errors
    ///
    /// Returns [`TraceError::NotRunning`] unless started.
    pub fn tick(&mut self) -> Result<Option<Step>> {
        if !self.running {
            return Err(TraceError::NotRunning);
        }
        let step = self.next_step();
        if step.is_none() || self.is_finished() {
            self.running = false;
            debug!(steps = self.emitted, "run finished");
        }
        Ok(step)
    }

    /// Advance exactly one step without starting a driver
    ///
    /// # Errors
    ///
    /// Returns [`TraceError::RunInProgress`] while running.
    pub fn step(&mut self) -> Result<Option<Step>> {
        if self.running {
            return Err(TraceError::RunInProgress);
        }
        self.ensure_session()?;
        Ok(self.next_step())
    }

    /// Produce every remaining step at once
    ///
    /// # Errors
    ///
    /// Returns [`TraceError::RunInProgress`] while running.
    pub fn run_to_completion(&mut self) -> Result<Vec<Step>> {
        if self.running {
            return Err(TraceError::RunInProgress);
        }
        self.ensure_session()?;
        let mut steps = Vec::new();
        while let Some(step) = self.next_step() {
            steps.push(step);
        }
        Ok(steps)
    }

    /// Stop driving; the session is kept so stepping can resume. Idempotent.
    pub fn stop(&mut self) {
        if self.running {
            debug!(steps = self.emitted, "run stopped");
        }
        self.running = false;
    }

    /// Stop and discard the session
    pub fn reset(&mut self) {
        self.running = false;
        self.discard();
    }

    /// Drive the session on a timer until it finishes or is stopped
    ///
    /// # Errors
    ///
    /// Fails if the run cannot be started.
    pub async fn play<F>(&mut self, mut on_step: F) -> Result<Option<Outcome>>
    where
        F: FnMut(&Step),
    {
        self.start()?;
        let mut interval = tokio::time::interval(self.tick_interval());
        while self.running {
            interval.tick().await;
            match self.tick()? {
                Some(step) => on_step(&step),
                None => break,
            }
        }
        Ok(self.outcome())
    }

    fn discard(&mut self) {
        self.session = None;
        self.emitted = 0;
    }

    fn ensure_session(&mut self) -> Result<()> {
        if self.session.is_some() {
            return Ok(());
        }
        let goal = self.goal.as_deref();
        validate(&self.graph, self.selection, &self.start, goal)?;
        let session = match stepper_for(self.selection, &self.start, goal) {
            Some(stepper) => Session::Incremental { stepper },
            None => Session::Batch {
                trace: Box::new(generate(&self.graph, self.selection, &self.start, goal)?),
                cursor: 0,
            },
        };
        debug!(selection = %self.selection, mode = ?self.selection.mode(), "session opened");
        self.session = Some(session);
        Ok(())
    }

    fn next_step(&mut self) -> Option<Step> {
        let step = match self.session.as_mut()? {
            Session::Batch { trace, cursor } => {
                let step = trace.steps.get(*cursor).cloned();
                if step.is_some() {
                    *cursor += 1;
                }
                step
            }
            Session::Incremental { stepper } => stepper.advance(&self.graph),
        };
        if step.is_some() {
            self.emitted += 1;
        }
        step
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::selector::{BfsVariant, DijkstraVariant};
    use crate::types::{Edge, Node, StepAction};

    fn make_context(selection: Selection) -> RunnerContext {
        RunnerContext::new(fixtures::traversal().unwrap(), selection, "A", Some("J")).unwrap()
    }

    #[test]
    fn test_speed_clamped_and_interval() {
        let mut ctx = make_context(Selection::Bfs(BfsVariant::Standard));
        assert_eq!(ctx.speed(), DEFAULT_SPEED);
        assert_eq!(ctx.tick_interval(), Duration::from_millis(1300));
        assert_eq!(ctx.set_speed(5), MIN_SPEED);
        assert_eq!(ctx.tick_interval(), Duration::from_millis(2000));
        assert_eq!(ctx.set_speed(9000), MAX_SPEED);
        assert_eq!(ctx.tick_interval(), Duration::from_millis(100));
    }

    #[test]
    fn test_duplicate_start_rejected() {
        let mut ctx = make_context(Selection::Bfs(BfsVariant::Standard));
        ctx.start().unwrap();
        assert_eq!(ctx.start().unwrap_err(), TraceError::RunInProgress);
        assert_eq!(
            ctx.select(Selection::Kruskal).unwrap_err(),
            TraceError::RunInProgress
        );
        assert_eq!(ctx.set_endpoints("B", None).unwrap_err(), TraceError::RunInProgress);
        assert_eq!(ctx.step().unwrap_err(), TraceError::RunInProgress);
        ctx.stop();
        ctx.stop();
        assert!(!ctx.is_running());
        assert!(ctx.select(Selection::Kruskal).is_ok());
    }

    #[test]
    fn test_tick_requires_running() {
        let mut ctx = make_context(Selection::Bfs(BfsVariant::Standard));
        assert_eq!(ctx.tick().unwrap_err(), TraceError::NotRunning);
    }

    #[test]
    fn test_tick_stops_when_exhausted() {
        let mut ctx = make_context(Selection::Dijkstra(DijkstraVariant::Standard));
        ctx.select(Selection::Bfs(BfsVariant::ShortestPath)).unwrap();
        ctx.start().unwrap();
        let mut last = None;
        while ctx.is_running() {
            last = ctx.tick().unwrap().or(last);
        }
        assert_eq!(last.unwrap().action, StepAction::Goal);
        assert!(ctx.outcome().unwrap().path().is_some());
        assert_eq!(ctx.tick().unwrap_err(), TraceError::NotRunning);
    }

    #[test]
    fn test_single_step_then_resume() {
        let mut ctx = make_context(Selection::Bfs(BfsVariant::Standard));
        let first = ctx.step().unwrap().unwrap();
        assert_eq!(first.action, StepAction::Init);
        assert_eq!(ctx.steps_emitted(), 1);
        let rest = ctx.run_to_completion().unwrap();
        assert_eq!(rest.first().unwrap().index, 1);
        assert_eq!(rest.last().unwrap().action, StepAction::Done);
        assert!(ctx.step().unwrap().is_none());
    }

    #[test]
    fn test_batch_replays_precomputed_trace() {
        let graph = fixtures::weighted().unwrap();
        let sel = Selection::Dijkstra(DijkstraVariant::Standard);
        let expected = generate(&graph, sel, "A", None).unwrap();
        let mut ctx = RunnerContext::new(graph, sel, "A", None).unwrap();
        let steps = ctx.run_to_completion().unwrap();
        assert_eq!(steps, expected.steps);
        assert_eq!(ctx.outcome(), Some(Outcome::Completed));
    }

    #[test]
    fn test_reset_discards_session() {
        let mut ctx = make_context(Selection::Bfs(BfsVariant::Standard));
        ctx.step().unwrap();
        ctx.step().unwrap();
        ctx.reset();
        assert_eq!(ctx.steps_emitted(), 0);
        assert_eq!(ctx.step().unwrap().unwrap().action, StepAction::Init);
    }

    #[test]
    fn test_restart_after_finish_begins_fresh() {
        let mut ctx = make_context(Selection::Bfs(BfsVariant::Standard));
        ctx.run_to_completion().unwrap();
        ctx.start().unwrap();
        assert_eq!(ctx.tick().unwrap().unwrap().action, StepAction::Init);
    }

    #[test]
    fn test_missing_goal_rejected_at_selection_time() {
        let mut ctx = make_context(Selection::Bfs(BfsVariant::Standard));
        ctx.set_endpoints("A", None).unwrap();
        ctx.step().unwrap();

        assert_eq!(
            ctx.select(Selection::Greedy).unwrap_err(),
            TraceError::MissingGoal("greedy/standard".into())
        );
        assert_eq!(
            ctx.select(Selection::Bfs(BfsVariant::Bidirectional)).unwrap_err(),
            TraceError::MissingGoal("bfs/bidirectional".into())
        );
        assert_eq!(ctx.selection(), Selection::Bfs(BfsVariant::Standard));
        assert_eq!(ctx.steps_emitted(), 1);
        assert_eq!(ctx.step().unwrap().unwrap().index, 1);
    }

    #[test]
    fn test_dropping_required_goal_rejected() {
        let mut ctx = make_context(Selection::Bfs(BfsVariant::ShortestPath));
        ctx.step().unwrap();
        assert_eq!(
            ctx.set_endpoints("A", None).unwrap_err(),
            TraceError::MissingGoal("bfs/shortest-path".into())
        );
        assert_eq!(
            ctx.set_endpoints("Z", Some("J")).unwrap_err(),
            TraceError::UnknownNode("Z".into())
        );
        assert_eq!(ctx.steps_emitted(), 1);
        ctx.set_endpoints("B", Some("J")).unwrap();
        assert_eq!(ctx.steps_emitted(), 0);
    }

    #[tokio::test]
    async fn test_play_drives_to_completion() {
        let graph = Graph::undirected(
            ["A", "B", "C"].into_iter().map(Node::new).collect(),
            vec![Edge::new("A", "B"), Edge::new("B", "C")],
        )
        .unwrap();
        let mut ctx =
            RunnerContext::new(graph, Selection::Bfs(BfsVariant::Standard), "A", None).unwrap();
        ctx.set_speed(MAX_SPEED);
        let mut seen = Vec::new();
        let outcome = ctx.play(|step| seen.push(step.action)).await.unwrap();
        assert_eq!(outcome, Some(Outcome::Completed));
        assert_eq!(seen.len(), 5);
        assert!(!ctx.is_running());
    }
}
