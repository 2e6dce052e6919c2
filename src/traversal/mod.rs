// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Incremental breadth-first and depth-first traversals
//!
//! Each call to [`Stepper::advance`] performs exactly one transition, so a
//! driver can single-step a run or play it on a timer.

pub mod bfs;
pub mod dfs;

pub use bfs::BfsStepper;
pub use dfs::DfsStepper;

use crate::graph::Graph;
use crate::types::{Outcome, Step, Summary};

/// A traversal that produces its trace one step at a time
pub trait Stepper: Send {
    /// Perform the next transition; `None` once the run has finished
    fn advance(&mut self, graph: &Graph) -> Option<Step>;

    /// Whether the terminal step has been produced
    fn is_finished(&self) -> bool;

    /// Terminal result, available once finished
    fn outcome(&self) -> Option<&Outcome>;

    /// Tables derived from the state so far
    fn summary(&self) -> Summary;
}

/// Drive a stepper until it finishes
pub fn run_to_completion(stepper: &mut dyn Stepper, graph: &Graph) -> (Vec<Step>, Outcome, Summary) {
    let mut steps = Vec::new();
    while let Some(step) = stepper.advance(graph) {
        steps.push(step);
    }
    let outcome = stepper.outcome().cloned().unwrap_or(Outcome::Completed);
    (steps, outcome, stepper.summary())
}

/// Edge count of a path, as a cost
#[allow(clippy::cast_precision_loss)]
pub(crate) fn hop_cost(path: &[crate::types::NodeId]) -> f64 {
    path.len().saturating_sub(1) as f64
}

/// Sequence counter shared by the steppers
#[derive(Debug, Clone, Default)]
pub(crate) struct Counter(usize);

impl Counter {
    pub(crate) fn stamp(&mut self, mut step: Step) -> Step {
        step.index = self.0;
        self.0 += 1;
        tracing::trace!(index = step.index, action = ?step.action, "{}", step.message);
        step
    }
}
