//! Application boundary: port traits and the events crossing them.
//!
//! Everything the command core needs from the outside world (input
//! readings, motor outputs, the dashboard chooser, an event sink) is
//! expressed as a trait in [`ports`], keeping the scheduler fully
//! testable without real peripherals.

pub mod events;
pub mod ports;
