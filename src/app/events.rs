//! Outbound scheduler events.
//!
//! The [`Scheduler`](crate::scheduler::Scheduler) and
//! [`Robot`](crate::robot::Robot) emit these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them: log to console, push to a
//! dashboard, record for tests.

use crate::robot::RobotMode;
use crate::selector::OptionName;

/// Structured events emitted by the command core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchedulerEvent {
    /// A command was admitted and its `on_start` hook ran.
    Scheduled { command: &'static str },

    /// A command was ended early.  `by` names the displacing command, or
    /// `None` for an explicit cancel.
    Interrupted {
        command: &'static str,
        by: Option<&'static str>,
    },

    /// A command reported `is_finished` and ended naturally.
    Finished { command: &'static str },

    /// The robot changed operating mode.
    ModeChanged { from: RobotMode, to: RobotMode },

    /// The autonomous routine was resolved from the chooser.
    AutoSelected { option: OptionName },
}
