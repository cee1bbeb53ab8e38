//! Tick callback that streams reports as JSON lines.
//!
//! Every tick produces one `{"kind":"model",...}` line. With agent reporting
//! on, it is followed by one `{"kind":"agent",...}` line per trader that
//! traded during the tick.

use std::io::Write;

use serde::Serialize;
use sugarscape_core::runner::TickCallback;
use sugarscape_core::tick::{SimulationState, TickSummary};
use sugarscape_types::{AgentRecord, ModelRecord};
use tracing::warn;

use crate::error::EngineError;

/// One line of report output.
#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum ReportLine<'a> {
    /// Model-level aggregates.
    Model(&'a ModelRecord),
    /// One trader's trades.
    Agent(&'a AgentRecord),
}

/// Callback that writes reports to any [`Write`] sink.
///
/// The tick loop cannot be interrupted from a callback, so the first write
/// error is kept and returned by [`JsonLinesReporter::finish`]; later ticks
/// are not written.
pub struct JsonLinesReporter<W: Write> {
    out: W,
    report_agents: bool,
    failure: Option<std::io::Error>,
}

impl<W: Write> JsonLinesReporter<W> {
    /// Create a reporter writing to `out`.
    pub const fn new(out: W, report_agents: bool) -> Self {
        Self {
            out,
            report_agents,
            failure: None,
        }
    }

    /// Flush output and surface any write error from the run.
    pub fn finish(mut self) -> Result<W, EngineError> {
        if let Some(source) = self.failure.take() {
            return Err(EngineError::Report { source });
        }
        self.out
            .flush()
            .map_err(|source| EngineError::Report { source })?;
        Ok(self.out)
    }

    fn write_tick(
        &mut self,
        summary: &TickSummary,
        state: &SimulationState,
    ) -> std::io::Result<()> {
        write_line(&mut self.out, &ReportLine::Model(&summary.record))?;
        if self.report_agents {
            for record in state.collector.agent_records_for(summary.tick) {
                write_line(&mut self.out, &ReportLine::Agent(record))?;
            }
        }
        Ok(())
    }
}

impl<W: Write> TickCallback for JsonLinesReporter<W> {
    fn on_tick(&mut self, summary: &TickSummary, state: &SimulationState) {
        if self.failure.is_some() {
            return;
        }
        if let Err(e) = self.write_tick(summary, state) {
            warn!(tick = summary.tick, error = %e, "Report output failed");
            self.failure = Some(e);
        }
    }
}

fn write_line<W: Write>(out: &mut W, line: &ReportLine<'_>) -> std::io::Result<()> {
    serde_json::to_writer(&mut *out, line)?;
    out.write_all(b"\n")
}
