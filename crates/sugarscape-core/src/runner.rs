//! Bounded simulation loop.
//!
//! [`run_simulation`] wraps the single-tick [`run_tick`] function with the
//! run-level concerns: a tick budget, early stop on extinction, and a
//! [`TickCallback`] hook invoked after every tick (the engine binary uses it
//! to stream reports).
//!
//! [`run_tick`]: crate::tick::run_tick

use tracing::{info, warn};

use crate::tick::{self, SimulationState, TickError, TickSummary};

/// Errors that can occur during the simulation run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// A tick execution failed.
    #[error("tick error: {source}")]
    Tick {
        /// The underlying tick error.
        #[from]
        source: TickError,
    },
}

/// Why the simulation stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationEndReason {
    /// The configured number of ticks ran.
    MaxTicksReached,
    /// Every trader died.
    Extinction,
}

/// Result of the simulation run.
#[derive(Debug)]
pub struct SimulationResult {
    /// The reason the simulation ended.
    pub end_reason: SimulationEndReason,
    /// The last tick summary, if any tick completed.
    pub final_summary: Option<TickSummary>,
    /// Total number of ticks executed.
    pub total_ticks: u64,
}

/// Callback invoked after each tick completes.
pub trait TickCallback {
    /// Called after a tick completes successfully.
    fn on_tick(&mut self, summary: &TickSummary, state: &SimulationState);
}

/// A no-op tick callback for testing.
pub struct NoOpCallback;

impl TickCallback for NoOpCallback {
    fn on_tick(&mut self, _summary: &TickSummary, _state: &SimulationState) {}
}

/// Run up to `max_ticks` ticks, stopping early if the population dies out.
///
/// # Errors
///
/// Returns [`RunnerError`] if a tick execution fails.
pub fn run_simulation(
    state: &mut SimulationState,
    max_ticks: u64,
    callback: &mut dyn TickCallback,
) -> Result<SimulationResult, RunnerError> {
    info!(
        max_ticks,
        traders = state.population(),
        "Simulation starting"
    );

    let mut last_summary: Option<TickSummary> = None;
    let mut total_ticks: u64 = 0;

    while total_ticks < max_ticks {
        let summary = tick::run_tick(state)?;
        total_ticks = total_ticks.saturating_add(1);

        callback.on_tick(&summary, state);

        if summary.traders_alive == 0 {
            warn!(tick = summary.tick, "All traders dead -- extinction");
            return Ok(SimulationResult {
                end_reason: SimulationEndReason::Extinction,
                final_summary: Some(summary),
                total_ticks,
            });
        }
        last_summary = Some(summary);
    }

    info!(max_ticks, "Tick limit reached");
    Ok(SimulationResult {
        end_reason: SimulationEndReason::MaxTicksReached,
        final_summary: last_summary,
        total_ticks,
    })
}

/// Log the simulation end sequence.
pub fn log_simulation_end(result: &SimulationResult) {
    info!(
        reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        final_tick = result.final_summary.as_ref().map(|s| s.tick),
        final_traders_alive = result.final_summary.as_ref().map(|s| s.traders_alive),
        final_price = result.final_summary.as_ref().and_then(|s| s.record.price),
        "Simulation ended"
    );
}
