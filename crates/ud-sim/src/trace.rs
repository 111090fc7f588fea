//! Event-trace observers.
//!
//! [`EventTrace`] keeps every dispatched event in memory (tests, small
//! runs); [`CsvTraceWriter`] streams the same rows to any `io::Write`.

use std::io::Write;

use serde::Serialize;
use ud_behavior::{AgentAction, CommunityMember};
use ud_core::{Tick, TickConverter};
use ud_schedule::FiredEvent;

use crate::{SimError, SimObserver, SimResult};

/// One dispatched event, flattened for output.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TraceRow {
    pub tick:     f64,
    pub day:      u8,
    pub hour:     f64,
    pub agent:    u32,
    pub action:   String,
    /// Facility the agent ended up in; empty when at home.
    pub location: String,
    pub state:    String,
}

impl TraceRow {
    pub fn new(event: &FiredEvent<AgentAction>, member: &CommunityMember, converter: TickConverter) -> Self {
        let at = converter.ticks_to_day_time(event.at);
        Self {
            tick:     event.at.0,
            day:      at.day,
            hour:     at.hour,
            agent:    event.target.0,
            action:   event.action.to_string(),
            location: member.location().map(|f| f.to_string()).unwrap_or_default(),
            state:    format!("{:?}", member.state()),
        }
    }
}

// ── EventTrace ────────────────────────────────────────────────────────────────

/// In-memory trace of every dispatched event.
#[derive(Clone, Debug, Default)]
pub struct EventTrace {
    converter: TickConverter,
    rows:      Vec<TraceRow>,
}

impl EventTrace {
    pub fn new(converter: TickConverter) -> Self {
        Self { converter, rows: Vec::new() }
    }

    pub fn rows(&self) -> &[TraceRow] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<TraceRow> {
        self.rows
    }
}

impl SimObserver for EventTrace {
    fn on_event(&mut self, event: &FiredEvent<AgentAction>, member: &CommunityMember) {
        self.rows.push(TraceRow::new(event, member, self.converter));
    }
}

// ── CsvTraceWriter ────────────────────────────────────────────────────────────

/// A [`SimObserver`] that writes one CSV row per dispatched event.
///
/// Errors from the writer are stored internally because `SimObserver`
/// methods have no return value.  After `sim.run()` returns, check with
/// [`take_error`][Self::take_error] or call [`finish`][Self::finish].
pub struct CsvTraceWriter<W: Write> {
    writer:     csv::Writer<W>,
    converter:  TickConverter,
    rows:       u64,
    last_error: Option<SimError>,
}

impl<W: Write> CsvTraceWriter<W> {
    /// The header row is written with the first record.
    pub fn new(writer: W, converter: TickConverter) -> Self {
        Self {
            writer: csv::Writer::from_writer(writer),
            converter,
            rows: 0,
            last_error: None,
        }
    }

    pub fn rows_written(&self) -> u64 {
        self.rows
    }

    /// Take the stored write error (if any).
    pub fn take_error(&mut self) -> Option<SimError> {
        self.last_error.take()
    }

    /// Flush and return the inner writer, or the first error seen.
    pub fn finish(mut self) -> SimResult<W> {
        if let Some(e) = self.last_error.take() {
            return Err(e);
        }
        self.writer.flush()?;
        self.writer.into_inner().map_err(|e| SimError::Io(e.into_error()))
    }

    fn store_err(&mut self, result: SimResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: Write> SimObserver for CsvTraceWriter<W> {
    fn on_event(&mut self, event: &FiredEvent<AgentAction>, member: &CommunityMember) {
        if self.last_error.is_some() {
            return;
        }
        let row = TraceRow::new(event, member, self.converter);
        let result = self.writer.serialize(&row).map_err(SimError::from);
        if result.is_ok() {
            self.rows += 1;
        }
        self.store_err(result);
    }

    fn on_sim_end(&mut self, _final_tick: Tick, _dispatched: u64) {
        let result = self.writer.flush().map_err(SimError::from);
        self.store_err(result);
    }
}
