//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by rendering every [`SchedulerEvent`] as a
//! log line.  On the host that goes to `env_logger`; a dashboard or
//! telemetry adapter would implement the same trait.

use log::info;

use crate::app::events::SchedulerEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`SchedulerEvent`].
#[derive(Debug, Default)]
pub struct LogEventSink {
    emitted: u64,
}

impl LogEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of events rendered so far.
    pub fn emitted(&self) -> u64 {
        self.emitted
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &SchedulerEvent) {
        self.emitted += 1;
        match event {
            SchedulerEvent::Scheduled { command } => {
                info!("CMD   | {} scheduled", command);
            }
            SchedulerEvent::Interrupted {
                command,
                by: Some(by),
            } => {
                info!("CMD   | {} interrupted by {}", command, by);
            }
            SchedulerEvent::Interrupted { command, by: None } => {
                info!("CMD   | {} canceled", command);
            }
            SchedulerEvent::Finished { command } => {
                info!("CMD   | {} finished", command);
            }
            SchedulerEvent::ModeChanged { from, to } => {
                info!("MODE  | {:?} -> {:?}", from, to);
            }
            SchedulerEvent::AutoSelected { option } => {
                info!("AUTO  | selected '{}'", option);
            }
        }
    }
}
