// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Play command - animates a trace on a timer until done or Ctrl-C

use super::TraceRequest;
use crate::config::Settings;
use crate::render::Renderer;
use crate::runner::RunnerContext;
use anyhow::Result;
use tracing::{info, warn};

/// Run the play command
pub async fn run(
    request: &TraceRequest,
    speed: Option<u32>,
    settings: &Settings,
    renderer: Renderer,
) -> Result<()> {
    let resolved = request.resolve(settings)?;
    let mut ctx = RunnerContext::new(
        resolved.graph,
        resolved.selection,
        &resolved.start,
        resolved.goal.as_deref(),
    )?;
    let speed = ctx.set_speed(speed.unwrap_or(settings.speed));
    info!(selection = %ctx.selection(), speed, interval_ms = ctx.tick_interval().as_millis(), "playing");

    let outcome = tokio::select! {
        outcome = ctx.play(|step| println!("{}", renderer.render_step(step))) => outcome?,
        _ = tokio::signal::ctrl_c() => {
            warn!("interrupted");
            None
        }
    };
    ctx.stop();

    match outcome {
        Some(outcome) => println!("{}", renderer.render_outcome(&outcome)),
        None => println!("Stopped after {} steps", ctx.steps_emitted()),
    }
    Ok(())
}
